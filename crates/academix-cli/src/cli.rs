use clap::{Parser, Subcommand, ValueEnum};

/// Output format shared by every subcommand.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

/// Citation-network edge direction.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NetworkDirection {
    Citing,
    Cited,
    #[default]
    Both,
}

/// Which backend to restrict a call to, bypassing the aggregator's
/// default-source fallback chain.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    Openalex,
    Dblp,
    SemanticScholar,
    Arxiv,
    Crossref,
}

impl From<Backend> for academix_model::PaperSource {
    fn from(b: Backend) -> Self {
        match b {
            Backend::Openalex => academix_model::PaperSource::Openalex,
            Backend::Dblp => academix_model::PaperSource::Dblp,
            Backend::SemanticScholar => academix_model::PaperSource::SemanticScholar,
            Backend::Arxiv => academix_model::PaperSource::Arxiv,
            Backend::Crossref => academix_model::PaperSource::Crossref,
        }
    }
}

#[derive(Parser)]
#[command(name = "academix", about = "Query academic paper metadata across five bibliographic APIs", term_width = 100)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format for every subcommand.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Command {
    /// Search for papers by keyword.
    Search {
        query: String,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
        #[arg(long, value_enum)]
        source: Option<Backend>,
        #[arg(long)]
        year_from: Option<i32>,
        #[arg(long)]
        year_to: Option<i32>,
        #[arg(long)]
        venue: Option<String>,
        #[arg(long)]
        sort: Option<String>,
    },
    /// Fetch a single paper's full metadata by identifier.
    Get {
        paper_id: String,
        #[arg(long, value_enum)]
        source: Option<Backend>,
    },
    /// Generate BibTeX for one or more comma-separated paper identifiers.
    Bibtex {
        /// Comma-separated paper identifiers (1-50).
        paper_ids: String,
        #[arg(long, value_enum)]
        source: Option<Backend>,
        /// Prefer DBLP's native .bib export when the identifier looks DBLP-shaped.
        #[arg(long, default_value_t = true)]
        use_dblp: bool,
    },
    /// Fetch a paper's citation count and (where available) citing papers.
    Citations {
        paper_id: String,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
        #[arg(long, value_enum)]
        source: Option<Backend>,
    },
    /// Search for papers by author name.
    Author {
        author_name: String,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
        #[arg(long, value_enum)]
        source: Option<Backend>,
    },
    /// Fetch Semantic Scholar's recommended papers related to a given paper.
    Related {
        /// Semantic Scholar paper id.
        s2_paper_id: String,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Build a one-hop citation network around a paper.
    Network {
        paper_id: String,
        #[arg(long, value_enum, default_value_t = NetworkDirection::Both)]
        direction: NetworkDirection,
        #[arg(long, default_value_t = 50)]
        max_nodes: u32,
    },
    /// Report cache hit/miss/size statistics for the three cache tiers.
    CacheStats,
}
