//! Minimal markdown rendering for tool replies (spec.md §1 scopes full
//! markdown rendering out — this is the few-lines-per-record fallback
//! `response_format=markdown` asks for; `json` just pretty-prints the
//! underlying struct).

use academix_core::CacheStatsSnapshot;
use academix_model::{CitationNetwork, CitationResult, Paper, RelatedPapersResult, SearchResult};

fn paper_line(paper: &Paper) -> String {
    let year = paper.year.map_or(String::new(), |y| format!(" ({y})"));
    let authors = paper.authors.iter().map(|a| a.name.as_str()).collect::<Vec<_>>().join(", ");
    format!(
        "- **{}**{year} — {authors} · {} citations · {} · `{}`",
        paper.title, paper.citation_count, paper.source, paper.id
    )
}

pub fn search_result(result: &SearchResult) -> String {
    let mut out = format!(
        "Found {} result(s) for \"{}\" (showing {}, offset {}{})\n",
        result.total_results,
        result.query,
        result.returned_count,
        result.offset,
        if result.has_more { ", more available" } else { "" },
    );
    for paper in &result.papers {
        out.push_str(&paper_line(paper));
        out.push('\n');
    }
    out
}

pub fn paper(paper: &Paper) -> String {
    let mut out = format!("## {}\n", paper.title);
    if !paper.authors.is_empty() {
        let names = paper.authors.iter().map(|a| a.name.as_str()).collect::<Vec<_>>().join(", ");
        out.push_str(&format!("{names}\n"));
    }
    if let Some(year) = paper.year {
        out.push_str(&format!("Year: {year}\n"));
    }
    if let Some(venue) = &paper.venue {
        out.push_str(&format!("Venue: {venue}\n"));
    }
    if let Some(doi) = &paper.doi {
        out.push_str(&format!("DOI: {doi}\n"));
    }
    out.push_str(&format!("Citations: {}\n", paper.citation_count));
    out.push_str(&format!("Source: {} (`{}`)\n", paper.source, paper.id));
    if let Some(abstract_text) = &paper.abstract_text {
        out.push_str(&format!("\n{abstract_text}\n"));
    }
    out
}

/// Joins batch entries with two blank lines (spec.md §6: "two blank lines
/// between entries in batch output").
pub fn bibtex_batch(paper_ids: &[String], entries: &[Option<String>]) -> String {
    let rendered: Vec<String> = paper_ids
        .iter()
        .zip(entries)
        .map(|(id, entry)| match entry {
            Some(bibtex) => bibtex.trim_end().to_string(),
            None => format!("% no bibtex found for {id}"),
        })
        .collect();
    let mut out = rendered.join("\n\n\n");
    out.push('\n');
    out
}

pub fn citations(result: &CitationResult) -> String {
    let mut out = format!("{} has {} citation(s)\n", result.paper_id, result.citation_count);
    for paper in &result.citing_papers {
        out.push_str(&paper_line(paper));
        out.push('\n');
    }
    if result.has_more {
        out.push_str("(more citing papers available)\n");
    }
    out
}

pub fn related(result: &RelatedPapersResult) -> String {
    let mut out = format!("Papers related to {} (via {})\n", result.paper_id, result.recommendation_source);
    for paper in &result.related_papers {
        out.push_str(&paper_line(paper));
        out.push('\n');
    }
    out
}

pub fn network(network: &CitationNetwork) -> String {
    let mut out = format!(
        "Citation network around {} (depth {}, {} nodes, {} edges)\n",
        network.center_paper_id,
        network.depth,
        network.nodes.len(),
        network.edges.len(),
    );
    for node in &network.nodes {
        let year = node.year.map_or(String::new(), |y| format!(" ({y})"));
        out.push_str(&format!("- {}{} · {} citations · `{}`\n", node.title, year, node.citation_count, node.paper_id));
    }
    for edge in &network.edges {
        out.push_str(&format!("- {} -> {}\n", edge.source, edge.target));
    }
    out
}

pub fn cache_stats(stats: &CacheStatsSnapshot) -> String {
    let line = |label: &str, s: &academix_cache::CacheStats| {
        format!("{label}: {} hits, {} misses, {} entries ({} hit rate)\n", s.hits, s.misses, s.size, s.hit_rate_percent())
    };
    let mut out = String::new();
    out.push_str(&line("search", &stats.search));
    out.push_str(&line("paper", &stats.paper));
    out.push_str(&line("bibtex", &stats.bibtex));
    out
}
