use std::sync::Arc;

use academix_core::{Aggregator, Direction};
use academix_model::{AdapterError, ResponseFormat};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use serde::Serialize;

use crate::params::{
    parse_source, CacheStatsParams, GetBibtexParams, GetCitationNetworkParams, GetCitationsParams,
    GetPaperDetailsParams, GetRelatedPapersParams, SearchAuthorParams, SearchPapersParams,
};
use crate::{format, params::parse_response_format};

/// Renders `Ok` as markdown or pretty JSON depending on `format`; renders
/// `Err` as a short string (§7: "never leaks stack traces").
fn render<T: Serialize>(
    format: ResponseFormat,
    result: Result<T, AdapterError>,
    markdown: impl FnOnce(&T) -> String,
) -> Result<String, String> {
    match result {
        Ok(value) => match format {
            ResponseFormat::Json => {
                serde_json::to_string_pretty(&value).map_err(|e| format!("serialization error: {e}"))
            }
            ResponseFormat::Markdown => Ok(markdown(&value)),
        },
        Err(e) => Err(e.to_string()),
    }
}

/// MCP tool façade: one `#[tool]` method per spec.md §6 operation, all
/// sharing one [`Aggregator`]. Holding the aggregator behind an `Arc`
/// lets `main` keep a handle after `serve()` consumes `self`, so it can
/// await [`Aggregator::close`] once the transport shuts down (lifespan
/// stop).
#[derive(Clone)]
pub struct AcademixMcp {
    aggregator: Arc<Aggregator>,
    tool_router: ToolRouter<Self>,
}

impl AcademixMcp {
    pub fn new(aggregator: Arc<Aggregator>) -> Self {
        Self {
            aggregator,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router(vis = "pub")]
impl AcademixMcp {
    /// Search across academic bibliographic databases by keyword, with
    /// optional year/venue filters and source restriction.
    #[tool]
    pub async fn search_papers(&self, Parameters(p): Parameters<SearchPapersParams>) -> Result<String, String> {
        if let Err(e) = p.validate() {
            return Err(e.to_string());
        }
        let format = parse_response_format(p.response_format.as_deref()).expect("validated above");
        let source = parse_source(p.source.as_deref()).expect("validated above");
        let result = self
            .aggregator
            .search(&p.query, p.limit.unwrap_or(10), p.offset.unwrap_or(0), source, p.year_from, p.year_to, p.venue.as_deref(), p.sort.as_deref())
            .await;
        render(format, result, format::search_result)
    }

    /// Fetch a single paper's full normalized metadata by identifier.
    #[tool]
    pub async fn get_paper_details(&self, Parameters(p): Parameters<GetPaperDetailsParams>) -> Result<String, String> {
        if let Err(e) = p.validate() {
            return Err(e.to_string());
        }
        let format = parse_response_format(p.response_format.as_deref()).expect("validated above");
        let source = parse_source(p.source.as_deref()).expect("validated above");
        match self.aggregator.get_paper(&p.paper_id, source).await {
            Ok(Some(paper)) => render(format, Ok(paper), format::paper),
            Ok(None) => Err(format!("no paper found for {}", p.paper_id)),
            Err(e) => Err(e.to_string()),
        }
    }

    /// Generate BibTeX entries for one or more comma-separated paper
    /// identifiers (1-50), preferring DBLP's native export when applicable.
    #[tool]
    pub async fn get_bibtex(&self, Parameters(p): Parameters<GetBibtexParams>) -> Result<String, String> {
        if let Err(e) = p.validate() {
            return Err(e.to_string());
        }
        let source = parse_source(p.source.as_deref()).expect("validated above");
        let ids = p.ids();
        let entries = self.aggregator.get_bibtex_batch(&ids, source, p.use_dblp.unwrap_or(true)).await;
        Ok(format::bibtex_batch(&ids, &entries))
    }

    /// Fetch a paper's citation count and, where available, the papers
    /// citing it.
    #[tool]
    pub async fn get_citations(&self, Parameters(p): Parameters<GetCitationsParams>) -> Result<String, String> {
        if let Err(e) = p.validate() {
            return Err(e.to_string());
        }
        let format = parse_response_format(p.response_format.as_deref()).expect("validated above");
        let source = parse_source(p.source.as_deref()).expect("validated above");
        let result = self.aggregator.get_citations(&p.paper_id, p.limit.unwrap_or(10), p.offset.unwrap_or(0), source).await;
        render(format, Ok(result), format::citations)
    }

    /// Search for papers by author name.
    #[tool]
    pub async fn search_by_author(&self, Parameters(p): Parameters<SearchAuthorParams>) -> Result<String, String> {
        if let Err(e) = p.validate() {
            return Err(e.to_string());
        }
        let format = parse_response_format(p.response_format.as_deref()).expect("validated above");
        let source = parse_source(p.source.as_deref()).expect("validated above");
        let result = self.aggregator.search_by_author(&p.author_name, p.limit.unwrap_or(10), p.offset.unwrap_or(0), source).await;
        render(format, result, format::search_result)
    }

    /// Fetch AI-recommended papers related to a given Semantic Scholar
    /// paper id.
    #[tool]
    pub async fn get_related_papers(&self, Parameters(p): Parameters<GetRelatedPapersParams>) -> Result<String, String> {
        if let Err(e) = p.validate() {
            return Err(e.to_string());
        }
        let format = parse_response_format(p.response_format.as_deref()).expect("validated above");
        let result = self.aggregator.get_related(&p.paper_id, p.limit.unwrap_or(10)).await;
        render(format, result, format::related)
    }

    /// Build a one-hop citation network around a paper (citing papers,
    /// referenced papers, or both).
    #[tool]
    pub async fn get_citation_network(&self, Parameters(p): Parameters<GetCitationNetworkParams>) -> Result<String, String> {
        if let Err(e) = p.validate() {
            return Err(e.to_string());
        }
        let format = parse_response_format(p.response_format.as_deref()).expect("validated above");
        let direction = match p.direction.as_deref().unwrap_or("both") {
            "citing" => Direction::Citing,
            "cited" => Direction::Cited,
            _ => Direction::Both,
        };
        let result = self
            .aggregator
            .get_citation_network(&p.paper_id, direction, p.max_nodes.unwrap_or(50) as usize)
            .await;
        render(format, result, format::network)
    }

    /// Report hit/miss/size statistics for the three cache tiers.
    #[tool]
    pub async fn cache_stats(&self, Parameters(p): Parameters<CacheStatsParams>) -> Result<String, String> {
        if let Err(e) = p.validate() {
            return Err(e.to_string());
        }
        let format = parse_response_format(p.response_format.as_deref()).expect("validated above");
        let stats = self.aggregator.cache_stats();
        render(format, Ok(stats), format::cache_stats)
    }
}

#[tool_handler]
impl ServerHandler for AcademixMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: rmcp::model::Implementation {
                name: "academix-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Aggregates academic paper metadata across OpenAlex, DBLP, Semantic Scholar, \
                 arXiv, and CrossRef. Provides tools to search papers, fetch paper details, \
                 generate BibTeX, look up citations, search by author, find related papers, \
                 and build citation networks."
                    .into(),
            ),
        }
    }
}
