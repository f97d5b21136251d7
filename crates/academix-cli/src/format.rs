use academix_core::CacheStatsSnapshot;
use academix_model::{CitationNetwork, CitationResult, Paper, RelatedPapersResult, SearchResult};

fn author_list(paper: &Paper) -> String {
    if paper.authors.is_empty() {
        String::new()
    } else {
        paper.authors.iter().map(|a| a.name.as_str()).collect::<Vec<_>>().join(", ")
    }
}

fn paper_line(i: usize, paper: &Paper) -> String {
    let year = paper.year.map_or(String::new(), |y| format!(" ({y})"));
    let mut out = format!(" {:>2}  {}{}\n", i + 1, paper.title, year);
    let authors = author_list(paper);
    if !authors.is_empty() {
        out.push_str(&format!("     {authors}\n"));
    }
    let mut meta = Vec::new();
    if let Some(v) = &paper.venue {
        meta.push(v.clone());
    }
    meta.push(format!("{} citations", paper.citation_count));
    meta.push(paper.source.to_string());
    meta.push(paper.id.clone());
    out.push_str(&format!("     {}\n", meta.join(" · ")));
    out
}

pub fn format_search_result(result: &SearchResult) -> String {
    let mut out = format!(
        "Found {} results (showing {}, offset {}{})\n",
        result.total_results,
        result.returned_count,
        result.offset,
        if result.has_more { ", more available" } else { "" },
    );
    for (i, paper) in result.papers.iter().enumerate() {
        out.push('\n');
        out.push_str(&paper_line(i, paper));
    }
    out
}

pub fn format_paper(paper: &Paper) -> String {
    let mut out = format!("{}\n", paper.title);
    let authors = author_list(paper);
    if !authors.is_empty() {
        out.push_str(&format!("{authors}\n"));
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
    if let Some(arxiv_id) = &paper.arxiv_id {
        out.push_str(&format!("arXiv: {arxiv_id}\n"));
    }
    out.push_str(&format!("Citations: {}\n", paper.citation_count));
    out.push_str(&format!("Source: {}\n", paper.source));
    out.push_str(&format!("Id: {}\n", paper.id));
    if let Some(url) = &paper.url {
        out.push_str(&format!("URL: {url}\n"));
    }
    if let Some(abstract_text) = &paper.abstract_text {
        out.push_str(&format!("\n{abstract_text}\n"));
    }
    out
}

/// Joins batch entries with two blank lines (spec.md §6: "two blank lines
/// between entries in batch output").
pub fn format_bibtex_batch(paper_ids: &[String], entries: &[Option<String>]) -> String {
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

pub fn format_citations(result: &CitationResult) -> String {
    let mut out = format!(
        "{} has {} citation(s)\n",
        result.paper_id, result.citation_count
    );
    for (i, paper) in result.citing_papers.iter().enumerate() {
        out.push('\n');
        out.push_str(&paper_line(i, paper));
    }
    if result.has_more {
        out.push_str("\n(more citing papers available)\n");
    }
    out
}

pub fn format_related(result: &RelatedPapersResult) -> String {
    let mut out = format!(
        "Papers related to {} (via {})\n",
        result.paper_id, result.recommendation_source
    );
    for (i, paper) in result.related_papers.iter().enumerate() {
        out.push('\n');
        out.push_str(&paper_line(i, paper));
    }
    out
}

pub fn format_network(network: &CitationNetwork) -> String {
    let mut out = format!(
        "Citation network around {} (depth {})\n",
        network.center_paper_id, network.depth
    );
    out.push_str(&format!("\nNodes ({}):\n", network.nodes.len()));
    for node in &network.nodes {
        let year = node.year.map_or(String::new(), |y| format!(" ({y})"));
        out.push_str(&format!(" - {}{} · {} citations · {}\n", node.title, year, node.citation_count, node.paper_id));
    }
    out.push_str(&format!("\nEdges ({}):\n", network.edges.len()));
    for edge in &network.edges {
        out.push_str(&format!(" - {} -> {}\n", edge.source, edge.target));
    }
    out
}

pub fn format_cache_stats(stats: &CacheStatsSnapshot) -> String {
    let line = |label: &str, s: &academix_cache::CacheStats| {
        format!(
            "{label}: {} hits, {} misses, {} entries ({} hit rate)\n",
            s.hits, s.misses, s.size, s.hit_rate_percent()
        )
    };
    let mut out = String::new();
    out.push_str(&line("search", &stats.search));
    out.push_str(&line("paper", &stats.paper));
    out.push_str(&line("bibtex", &stats.bibtex));
    out
}
