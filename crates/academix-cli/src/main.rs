mod cli;
mod format;

use academix_core::{Aggregator, Direction};
use academix_model::{validate, PaperSource};
use clap::Parser;
use cli::{Backend, Cli, Command, NetworkDirection, OutputFormat};

fn print_json<T: serde::Serialize>(val: &T) {
    println!("{}", serde_json::to_string_pretty(val).expect("JSON serialization failed"));
}

fn exit_err(msg: &str) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

fn emit<T: serde::Serialize>(format: OutputFormat, value: &T, markdown: impl FnOnce(&T) -> String) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Markdown => print!("{}", markdown(value)),
    }
}

fn paper_ids_from_csv(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let email = std::env::var("ACADEMIC_MCP_EMAIL").ok();
    let semantic_scholar_api_key = std::env::var("SEMANTIC_SCHOLAR_API_KEY").ok();
    let aggregator = Aggregator::new(email, semantic_scholar_api_key);

    match cli.command {
        Command::Search { query, limit, offset, source, year_from, year_to, venue, sort } => {
            if let Err(e) = validate::non_empty(&query, "query") {
                exit_err(&e.to_string());
            }
            if let Err(e) = validate::limit(limit, 100) {
                exit_err(&e.to_string());
            }
            if let Err(e) = validate::year_range(year_from, year_to) {
                exit_err(&e.to_string());
            }
            let source: Option<PaperSource> = source.map(Into::into);
            match aggregator
                .search(&query, limit, offset, source, year_from, year_to, venue.as_deref(), sort.as_deref())
                .await
            {
                Ok(result) => emit(cli.format, &result, |r| format::format_search_result(r)),
                Err(e) => exit_err(&e.to_string()),
            }
        }

        Command::Get { paper_id, source } => {
            if let Err(e) = validate::non_empty(&paper_id, "paper_id") {
                exit_err(&e.to_string());
            }
            let source: Option<PaperSource> = source.map(Into::into);
            match aggregator.get_paper(&paper_id, source).await {
                Ok(Some(paper)) => emit(cli.format, &paper, |p| format::format_paper(p)),
                Ok(None) => exit_err(&format!("no paper found for {paper_id}")),
                Err(e) => exit_err(&e.to_string()),
            }
        }

        Command::Bibtex { paper_ids, source, use_dblp } => {
            let ids = paper_ids_from_csv(&paper_ids);
            if let Err(e) = validate::paper_ids(&ids) {
                exit_err(&e.to_string());
            }
            let source: Option<PaperSource> = source.map(Into::into);
            let entries = aggregator.get_bibtex_batch(&ids, source, use_dblp).await;
            match cli.format {
                OutputFormat::Json => {
                    let map: std::collections::HashMap<&str, &Option<String>> =
                        ids.iter().map(|s| s.as_str()).zip(entries.iter()).collect();
                    print_json(&map);
                }
                OutputFormat::Markdown => print!("{}", format::format_bibtex_batch(&ids, &entries)),
            }
        }

        Command::Citations { paper_id, limit, offset, source } => {
            if let Err(e) = validate::non_empty(&paper_id, "paper_id") {
                exit_err(&e.to_string());
            }
            if let Err(e) = validate::limit(limit, 100) {
                exit_err(&e.to_string());
            }
            let source: Option<PaperSource> = source.map(Into::into);
            let result = aggregator.get_citations(&paper_id, limit, offset, source).await;
            emit(cli.format, &result, |r| format::format_citations(r));
        }

        Command::Author { author_name, limit, offset, source } => {
            if let Err(e) = validate::non_empty(&author_name, "author_name") {
                exit_err(&e.to_string());
            }
            if let Err(e) = validate::limit(limit, 100) {
                exit_err(&e.to_string());
            }
            let source: Option<PaperSource> = source.map(Into::into);
            match aggregator.search_by_author(&author_name, limit, offset, source).await {
                Ok(result) => emit(cli.format, &result, |r| format::format_search_result(r)),
                Err(e) => exit_err(&e.to_string()),
            }
        }

        Command::Related { s2_paper_id, limit } => {
            if let Err(e) = validate::non_empty(&s2_paper_id, "s2_paper_id") {
                exit_err(&e.to_string());
            }
            if let Err(e) = validate::limit(limit, 100) {
                exit_err(&e.to_string());
            }
            match aggregator.get_related(&s2_paper_id, limit).await {
                Ok(result) => emit(cli.format, &result, |r| format::format_related(r)),
                Err(e) => exit_err(&e.to_string()),
            }
        }

        Command::Network { paper_id, direction, max_nodes } => {
            if let Err(e) = validate::non_empty(&paper_id, "paper_id") {
                exit_err(&e.to_string());
            }
            if let Err(e) = validate::max_nodes(max_nodes) {
                exit_err(&e.to_string());
            }
            let direction = match direction {
                NetworkDirection::Citing => Direction::Citing,
                NetworkDirection::Cited => Direction::Cited,
                NetworkDirection::Both => Direction::Both,
            };
            match aggregator.get_citation_network(&paper_id, direction, max_nodes as usize).await {
                Ok(network) => emit(cli.format, &network, |n| format::format_network(n)),
                Err(e) => exit_err(&e.to_string()),
            }
        }

        Command::CacheStats => {
            let stats = aggregator.cache_stats();
            match cli.format {
                OutputFormat::Json => {
                    let payload = serde_json::json!({
                        "search": {"hits": stats.search.hits, "misses": stats.search.misses, "size": stats.search.size},
                        "paper": {"hits": stats.paper.hits, "misses": stats.paper.misses, "size": stats.paper.size},
                        "bibtex": {"hits": stats.bibtex.hits, "misses": stats.bibtex.misses, "size": stats.bibtex.size},
                    });
                    print_json(&payload);
                }
                OutputFormat::Markdown => print!("{}", format::format_cache_stats(&stats)),
            }
        }
    }

    aggregator.close().await;
}
