//! Integration tests for the query → engine → projection pipeline.
//!
//! A wiremock server stands in for Elasticsearch, so these run without a
//! cluster.

use erowid_es::{EsClient, EsConfig, EsError, SearchQuery};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> EsClient {
    let config = EsConfig {
        host: server.uri(),
        ..Default::default()
    };
    EsClient::new(&config).expect("client")
}

fn query(text: &str) -> SearchQuery {
    SearchQuery::new(Some(text.to_owned())).expect("non-empty query")
}

#[tokio::test]
async fn full_pipeline_projects_highlighted_and_plain_hits() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/reports/_search"))
        .and(body_json(json!({
            "query": {"multi_match": {"query": "lsd", "fields": ["title", "body^7"]}},
            "highlight": {
                "pre_tags": ["<b>"],
                "post_tags": ["</b>"],
                "fields": {
                    "title": {"number_of_fragments": 1, "fragment_size": 100},
                    "body": {"number_of_fragments": 3, "fragment_size": 100}
                }
            },
            "size": 20
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": {"hits": [
                {
                    "_id": "12345",
                    "_source": {
                        "title": "First LSD Trip",
                        "body": "long text",
                        "substanceInfo": [
                            {"substance": "LSD"}, {"substance": "LSD"}, {"substance": "MDMA"}
                        ],
                        "meta": {"erowidId": 12345, "gender": "M", "age": null, "year": 2010}
                    },
                    "highlight": {
                        "title": ["First <b>LSD</b> Trip"],
                        "body": ["took <b>LSD</b>", "the <b>LSD</b> hit"]
                    }
                },
                {
                    "_id": "777",
                    "_source": {
                        "title": "Quiet Evening",
                        "body": "nothing matched in the body",
                        "substanceInfo": [{"substance": "Cannabis"}],
                        "meta": {"erowidId": 777, "gender": "", "age": 40, "year": 0}
                    }
                }
            ]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let results = erowid_es::search(&client_for(&server), query("lsd"))
        .await
        .expect("search should succeed");
    assert_eq!(results.len(), 2);

    let first = &results[0];
    assert_eq!(first.title, "First <b>LSD</b> Trip");
    assert_eq!(first.display_text, "took <b>LSD</b> … the <b>LSD</b> hit … ");
    assert_eq!(
        first.link,
        "http://erowid.org.global.prod.fastly.net/experiences/exp.php?ID=12345"
    );
    let tags: Vec<String> = first.tags.iter().map(|t| t.label.to_string()).collect();
    assert_eq!(tags, vec!["LSD", "MDMA"]);
    let obtrusive: Vec<String> = first.obtrusive_tags.iter().map(|t| t.label.to_string()).collect();
    assert_eq!(obtrusive, vec!["M", "2010"]);

    let second = &results[1];
    assert_eq!(second.title, "Quiet Evening");
    assert_eq!(second.display_text, "nothing matched in the body…");
    let obtrusive: Vec<String> = second.obtrusive_tags.iter().map(|t| t.label.to_string()).collect();
    assert_eq!(obtrusive, vec!["40y"]);
}

#[tokio::test]
async fn no_hits_yields_no_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/reports/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hits": {"hits": []}})))
        .mount(&server)
        .await;

    let results = erowid_es::search(&client_for(&server), query("nothing"))
        .await
        .expect("search should succeed");
    assert!(results.is_empty());
}

#[tokio::test]
async fn engine_error_fails_the_whole_search() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {"type": "search_phase_execution_exception"}
        })))
        .mount(&server)
        .await;

    let err = erowid_es::search(&client_for(&server), query("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, EsError::Status { status: 500, .. }));
}

#[tokio::test]
async fn custom_index_changes_search_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/reports_v2/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hits": {"hits": []}})))
        .expect(1)
        .mount(&server)
        .await;

    let config = EsConfig {
        host: server.uri(),
        index: "reports_v2".into(),
        ..Default::default()
    };
    let client = EsClient::new(&config).expect("client");
    assert!(erowid_es::search(&client, query("x")).await.is_ok());
}
