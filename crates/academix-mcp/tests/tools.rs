use std::sync::Arc;

use academix_core::Aggregator;
use academix_mcp::params::{
    CacheStatsParams, GetBibtexParams, GetCitationNetworkParams, GetCitationsParams,
    GetPaperDetailsParams, GetRelatedPapersParams, SearchAuthorParams, SearchPapersParams,
};
use academix_mcp::AcademixMcp;
use rmcp::handler::server::wrapper::Parameters;

fn make_server() -> AcademixMcp {
    AcademixMcp::new(Arc::new(Aggregator::new(None, None)))
}

#[test]
fn tool_router_lists_every_operation() {
    let tools = AcademixMcp::tool_router().list_all();
    let names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
    let expected = [
        "search_papers",
        "get_paper_details",
        "get_bibtex",
        "get_citations",
        "search_by_author",
        "get_related_papers",
        "get_citation_network",
        "cache_stats",
    ];
    for name in &expected {
        assert!(names.contains(name), "missing tool: {name}");
    }
    assert_eq!(tools.len(), expected.len());
}

#[test]
fn every_tool_has_a_non_empty_description() {
    let tools = AcademixMcp::tool_router().list_all();
    for tool in tools {
        let description = tool.description.as_deref().unwrap_or_default();
        assert!(!description.trim().is_empty(), "tool {} has no description", tool.name);
    }
}

#[test]
fn search_papers_schema_exposes_expected_fields() {
    let schema = schemars::schema_for!(SearchPapersParams);
    let json = serde_json::to_value(&schema).unwrap();
    assert_eq!(json["type"], "object");
    let props = json["properties"].as_object().unwrap();
    for field in ["query", "limit", "offset", "source", "year_from", "year_to", "venue", "sort", "response_format"] {
        assert!(props.contains_key(field), "schema missing field: {field}");
    }
}

#[tokio::test]
async fn search_papers_rejects_blank_query() {
    let server = make_server();
    let params = SearchPapersParams {
        query: "   ".to_string(),
        limit: None,
        offset: None,
        source: None,
        year_from: None,
        year_to: None,
        venue: None,
        sort: None,
        response_format: None,
    };
    let result = server.search_papers(Parameters(params)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn search_papers_rejects_unknown_source() {
    let server = make_server();
    let params = SearchPapersParams {
        query: "transformers".to_string(),
        limit: None,
        offset: None,
        source: Some("google_scholar".to_string()),
        year_from: None,
        year_to: None,
        venue: None,
        sort: None,
        response_format: None,
    };
    let result = server.search_papers(Parameters(params)).await;
    assert!(result.unwrap_err().contains("source"));
}

#[tokio::test]
async fn get_paper_details_rejects_blank_id() {
    let server = make_server();
    let params = GetPaperDetailsParams { paper_id: "".to_string(), source: None, response_format: None };
    let result = server.get_paper_details(Parameters(params)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn get_bibtex_rejects_empty_id_list() {
    let server = make_server();
    let params = GetBibtexParams { paper_ids: " , ,".to_string(), source: None, use_dblp: None };
    let result = server.get_bibtex(Parameters(params)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn get_citations_rejects_limit_over_one_hundred() {
    let server = make_server();
    let params = GetCitationsParams {
        paper_id: "W123".to_string(),
        limit: Some(500),
        offset: None,
        source: None,
        response_format: None,
    };
    let result = server.get_citations(Parameters(params)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn search_by_author_rejects_blank_name() {
    let server = make_server();
    let params = SearchAuthorParams {
        author_name: "".to_string(),
        limit: None,
        offset: None,
        source: None,
        response_format: None,
    };
    let result = server.search_by_author(Parameters(params)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn get_related_papers_rejects_blank_id() {
    let server = make_server();
    let params = GetRelatedPapersParams { paper_id: "".to_string(), limit: None, response_format: None };
    let result = server.get_related_papers(Parameters(params)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn get_citation_network_rejects_unsupported_depth() {
    let server = make_server();
    let params = GetCitationNetworkParams {
        paper_id: "W123".to_string(),
        direction: None,
        max_nodes: None,
        depth: Some(3),
        response_format: None,
    };
    let result = server.get_citation_network(Parameters(params)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn get_citation_network_rejects_bad_direction() {
    let server = make_server();
    let params = GetCitationNetworkParams {
        paper_id: "W123".to_string(),
        direction: Some("sideways".to_string()),
        max_nodes: None,
        depth: None,
        response_format: None,
    };
    let result = server.get_citation_network(Parameters(params)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn cache_stats_reports_all_three_tiers() {
    let server = make_server();
    let params = CacheStatsParams { response_format: Some("json".to_string()) };
    let result = server.cache_stats(Parameters(params)).await.unwrap();
    assert!(result.contains("\"search\""));
    assert!(result.contains("\"paper\""));
    assert!(result.contains("\"bibtex\""));
}
