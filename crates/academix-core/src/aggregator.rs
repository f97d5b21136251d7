use std::collections::HashSet;

use academix_arxiv::ArxivClient;
use academix_crossref::CrossrefClient;
use academix_dblp::DblpClient;
use academix_cache::CacheStats;
use academix_model::{
    Adapter, CitationNetwork, CitationNetworkEdge, CitationNetworkNode, CitationResult, Paper,
    PaperSource, RelatedPapersResult, SearchResult, SharedCaches,
};
use academix_openalex::OpenAlexClient;
use academix_semanticscholar::SemanticScholarClient;

use crate::detect::detect_source;

/// Edge direction requested for [`Aggregator::get_citation_network`]
/// (spec.md §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Citing,
    Cited,
    Both,
}

/// The maximum citing/referenced papers fetched per direction per call.
const MAX_EDGES_PER_DIRECTION: usize = 20;

#[derive(Debug, Clone)]
pub struct CacheStatsSnapshot {
    pub search: CacheStats,
    pub paper: CacheStats,
    pub bibtex: CacheStats,
}

/// Owns one client per backend plus the shared cache tier, and implements
/// every cross-backend operation spec.md §4.5 describes: source
/// detection, search fallback, ordered paper lookup, BibTeX single/batch,
/// citations, and citation-network assembly.
pub struct Aggregator {
    openalex: OpenAlexClient,
    dblp: DblpClient,
    semantic_scholar: SemanticScholarClient,
    arxiv: ArxivClient,
    crossref: CrossrefClient,
    caches: SharedCaches,
}

impl Aggregator {
    pub fn new(email: Option<String>, semantic_scholar_api_key: Option<String>) -> Self {
        let caches = academix_model::new_shared_caches();
        Self {
            openalex: OpenAlexClient::new(email.clone(), caches.clone()),
            dblp: DblpClient::new(caches.clone()),
            semantic_scholar: SemanticScholarClient::new(semantic_scholar_api_key, caches.clone()),
            arxiv: ArxivClient::new(caches.clone()),
            crossref: CrossrefClient::new(email, caches.clone()),
            caches,
        }
    }

    fn adapter_for(&self, source: PaperSource) -> &dyn Adapter {
        match source {
            PaperSource::Openalex => &self.openalex,
            PaperSource::Dblp => &self.dblp,
            PaperSource::SemanticScholar => &self.semantic_scholar,
            PaperSource::Arxiv => &self.arxiv,
            PaperSource::Crossref => &self.crossref,
        }
    }

    /// Explicit `source` wins. Otherwise: try OpenAlex; on failure, try
    /// DBLP; on its failure, try Semantic Scholar. Explicit-source calls
    /// never fall back (spec.md §4.5, §7).
    #[allow(clippy::too_many_arguments)]
    pub async fn search(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
        source: Option<PaperSource>,
        year_from: Option<i32>,
        year_to: Option<i32>,
        venue: Option<&str>,
        sort: Option<&str>,
    ) -> academix_model::error::Result<SearchResult> {
        if let Some(source) = source {
            return self
                .adapter_for(source)
                .search(query, limit, offset, year_from, year_to, venue, sort)
                .await;
        }

        match self.openalex.search(query, limit, offset, year_from, year_to, venue, sort).await {
            Ok(result) => return Ok(result),
            Err(e) => tracing::warn!(error = %e, "search: openalex failed, falling back to dblp"),
        }
        match self.dblp.search(query, limit, offset, year_from, year_to, venue, sort).await {
            Ok(result) => return Ok(result),
            Err(e) => tracing::warn!(error = %e, "search: dblp failed, falling back to semantic_scholar"),
        }
        self.semantic_scholar.search(query, limit, offset, year_from, year_to, venue, sort).await
    }

    pub async fn search_by_author(
        &self,
        author_name: &str,
        limit: u32,
        offset: u32,
        source: Option<PaperSource>,
    ) -> academix_model::error::Result<SearchResult> {
        if let Some(source) = source {
            return self.adapter_for(source).search_by_author(author_name, limit, offset).await;
        }
        match self.openalex.search_by_author(author_name, limit, offset).await {
            Ok(result) => return Ok(result),
            Err(e) => tracing::warn!(error = %e, "search_by_author: openalex failed, falling back to dblp"),
        }
        match self.dblp.search_by_author(author_name, limit, offset).await {
            Ok(result) => return Ok(result),
            Err(e) => tracing::warn!(error = %e, "search_by_author: dblp failed, falling back to semantic_scholar"),
        }
        self.semantic_scholar.search_by_author(author_name, limit, offset).await
    }

    /// Builds the ordered dispatch list for a paper lookup: the detected
    /// (or explicit) source first, with OpenAlex appended as a catch-all
    /// when it isn't already first. The OpenAlex-detected case (DOIs and
    /// unrecognized ids) additionally falls through CrossRef and Semantic
    /// Scholar, matching the default search fallback chain.
    fn paper_lookup_order(paper_id: &str, source: Option<PaperSource>) -> Vec<PaperSource> {
        if let Some(source) = source {
            return vec![source];
        }
        let detected = detect_source(paper_id);
        if detected == PaperSource::Openalex {
            vec![PaperSource::Openalex, PaperSource::Crossref, PaperSource::SemanticScholar]
        } else {
            vec![detected, PaperSource::Openalex]
        }
    }

    /// Walks [`paper_lookup_order`], returning the first non-null result.
    /// Per-adapter errors are downgraded to null-and-continue.
    pub async fn get_paper(&self, paper_id: &str, source: Option<PaperSource>) -> academix_model::error::Result<Option<Paper>> {
        for candidate in Self::paper_lookup_order(paper_id, source) {
            match self.adapter_for(candidate).get_paper(paper_id).await {
                Ok(Some(paper)) => return Ok(Some(paper)),
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(error = %e, source = %candidate, "get_paper: adapter failed, continuing");
                    continue;
                }
            }
        }
        Ok(None)
    }

    /// DBLP native export first (when `use_dblp`), falling back to a
    /// normal paper lookup fed through the synthesizer. Cached under a
    /// cross-source `bibtex:{paper_id}` key (spec.md §4.5).
    pub async fn get_bibtex(
        &self,
        paper_id: &str,
        source: Option<PaperSource>,
        use_dblp: bool,
    ) -> academix_model::error::Result<Option<String>> {
        let cache_key = academix_model::AppCaches::bibtex_key(paper_id);
        if let Some(hit) = self.caches.bibtex.get(&cache_key) {
            return Ok(Some(hit));
        }

        if use_dblp {
            match self.dblp.get_bibtex(paper_id).await {
                Ok(Some(bibtex)) => {
                    self.caches.bibtex.set(&cache_key, bibtex.clone());
                    return Ok(Some(bibtex));
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "get_bibtex: dblp native export failed, synthesizing"),
            }
        }

        let Some(paper) = self.get_paper(paper_id, source).await? else {
            return Ok(None);
        };
        let bibtex = academix_bibtex::generate_bibtex(&paper);
        self.caches.bibtex.set(&cache_key, bibtex.clone());
        Ok(Some(bibtex))
    }

    /// Fans out [`Aggregator::get_bibtex`] concurrently, preserving input
    /// order; per-paper failures map to `None` (spec.md §4.5, §8 batch
    /// ordering invariant).
    pub async fn get_bibtex_batch(
        &self,
        paper_ids: &[String],
        source: Option<PaperSource>,
        use_dblp: bool,
    ) -> Vec<Option<String>> {
        let futures = paper_ids.iter().map(|id| self.get_bibtex(id, source, use_dblp));
        futures::future::join_all(futures)
            .await
            .into_iter()
            .map(|r| r.unwrap_or(None))
            .collect()
    }

    /// Always attempts OpenAlex; on failure, returns an empty result
    /// carrying whatever citation count the detected source reported
    /// (spec.md §4.5).
    pub async fn get_citations(
        &self,
        paper_id: &str,
        limit: u32,
        offset: u32,
        source: Option<PaperSource>,
    ) -> CitationResult {
        match self.openalex.get_citations(paper_id, limit, offset).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "get_citations: openalex failed, degrading to citation count only");
                let citation_count = self
                    .get_paper(paper_id, source)
                    .await
                    .ok()
                    .flatten()
                    .map(|p| p.citation_count)
                    .unwrap_or(0);
                CitationResult {
                    paper_id: paper_id.to_string(),
                    citation_count,
                    citing_papers: Vec::new(),
                    has_more: false,
                }
            }
        }
    }

    /// Semantic Scholar is currently the only AI-backed recommendation
    /// source (spec.md §3 `RelatedPapersResult`).
    pub async fn get_related(&self, s2_paper_id: &str, limit: u32) -> academix_model::error::Result<RelatedPapersResult> {
        self.semantic_scholar.get_related(s2_paper_id, limit).await
    }

    /// Builds a one-hop citation network. Only `depth=1` is supported —
    /// callers must validate `depth` before calling (spec.md §6 input
    /// schema already restricts it to `1`).
    pub async fn get_citation_network(
        &self,
        paper_id: &str,
        direction: Direction,
        max_nodes: usize,
    ) -> academix_model::error::Result<CitationNetwork> {
        let center = self
            .openalex
            .get_paper(paper_id)
            .await?
            .ok_or_else(|| academix_model::AdapterError::Validation(format!("paper not found: {paper_id}")))?;

        let mut seen = HashSet::new();
        seen.insert(center.id.clone());
        let mut nodes = vec![node_from(&center)];
        let mut edges = Vec::new();

        if matches!(direction, Direction::Citing | Direction::Both) {
            let budget = max_nodes.saturating_sub(nodes.len()).min(MAX_EDGES_PER_DIRECTION);
            if budget > 0 {
                if let Ok(citations) = self.openalex.get_citations(&center.id, budget as u32, 0).await {
                    for citer in citations.citing_papers {
                        if nodes.len() >= max_nodes {
                            break;
                        }
                        if seen.insert(citer.id.clone()) {
                            edges.push(CitationNetworkEdge { source: citer.id.clone(), target: center.id.clone() });
                            nodes.push(node_from(&citer));
                        }
                    }
                }
            }
        }

        if matches!(direction, Direction::Cited | Direction::Both) {
            let budget = max_nodes.saturating_sub(nodes.len()).min(MAX_EDGES_PER_DIRECTION);
            if budget > 0 {
                if let Ok(referenced_ids) = self.openalex.referenced_works(&center.id).await {
                    for referenced_id in referenced_ids.into_iter().take(budget) {
                        if nodes.len() >= max_nodes {
                            break;
                        }
                        if let Ok(Some(referenced)) = self.openalex.get_paper(&referenced_id).await {
                            if seen.insert(referenced.id.clone()) {
                                edges.push(CitationNetworkEdge { source: center.id.clone(), target: referenced.id.clone() });
                                nodes.push(node_from(&referenced));
                            }
                        }
                    }
                }
            }
        }

        Ok(CitationNetwork { center_paper_id: center.id, nodes, edges, depth: 1 })
    }

    pub fn cache_stats(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            search: self.caches.search.stats(),
            paper: self.caches.paper.stats(),
            bibtex: self.caches.bibtex.stats(),
        }
    }

    /// Awaits `close()` on all five adapters in parallel (spec.md §5).
    pub async fn close(&self) {
        tokio::join!(
            self.openalex.close(),
            self.dblp.close(),
            self.semantic_scholar.close(),
            self.arxiv.close(),
            self.crossref.close(),
        );
    }
}

fn node_from(paper: &Paper) -> CitationNetworkNode {
    CitationNetworkNode {
        paper_id: paper.id.clone(),
        title: paper.title.clone(),
        year: paper.year,
        citation_count: paper.citation_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paper_lookup_order_appends_openalex_catch_all() {
        let order = Aggregator::paper_lookup_order("conf/icml/DoeR20", None);
        assert_eq!(order, vec![PaperSource::Dblp, PaperSource::Openalex]);
    }

    #[test]
    fn paper_lookup_order_falls_through_crossref_and_semantic_scholar_for_openalex_detected() {
        let order = Aggregator::paper_lookup_order("W123", None);
        assert_eq!(order, vec![PaperSource::Openalex, PaperSource::Crossref, PaperSource::SemanticScholar]);
    }

    #[test]
    fn paper_lookup_order_falls_through_for_doi() {
        let order = Aggregator::paper_lookup_order("10.1038/nature14539", None);
        assert_eq!(order, vec![PaperSource::Openalex, PaperSource::Crossref, PaperSource::SemanticScholar]);
    }

    #[test]
    fn paper_lookup_order_respects_explicit_source() {
        let order = Aggregator::paper_lookup_order("anything", Some(PaperSource::Crossref));
        assert_eq!(order, vec![PaperSource::Crossref]);
    }
}
