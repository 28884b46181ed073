//! Consul provider against a stand-in catalog service

use ferret_rs::network::HttpClient;
use ferret_rs::providers::consul::ConsulProvider;
use ferret_rs::providers::{Provider, ProviderError};
use ferret_rs::search::{Cancellation, SearchRequest};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> ConsulProvider {
    ConsulProvider::new(&server.uri(), HttpClient::new().unwrap()).unwrap()
}

fn ok(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

async fn mount_datacenters(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/v1/catalog/datacenters"))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_services(server: &MockServer, dc: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/v1/catalog/services"))
        .and(query_param("dc", dc))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn single_dc_server(catalog: Value) -> MockServer {
    let server = MockServer::start().await;
    mount_datacenters(&server, ok(json!(["dc1"]))).await;
    mount_services(&server, "dc1", ok(catalog)).await;
    server
}

fn titles(results: &ferret_rs::Results) -> Vec<&str> {
    results.iter().map(|r| r.title.as_str()).collect()
}

#[tokio::test]
async fn test_service_with_tag() {
    let server = single_dc_server(json!({"web": ["tag1"], "db": []})).await;
    let consul = provider(&server);

    let results = consul
        .search(&SearchRequest::new("web"), &Cancellation::new())
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0].link,
        format!("{}/ui/#/dc1/services/web", server.uri())
    );
    assert_eq!(results[0].title, "tag1.web.service.dc1.consul");
}

#[tokio::test]
async fn test_service_without_tags() {
    let server = single_dc_server(json!({"web": ["tag1"], "db": []})).await;
    let consul = provider(&server);

    let results = consul
        .search(&SearchRequest::new("db"), &Cancellation::new())
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].link, format!("{}/ui/#/dc1/services/db", server.uri()));
    assert_eq!(results[0].title, "db.service.dc1.consul");
}

#[tokio::test]
async fn test_no_match_is_empty() {
    let server = single_dc_server(json!({"web": ["tag1"], "db": []})).await;

    let results = provider(&server)
        .search(&SearchRequest::new("zzz"), &Cancellation::new())
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_empty_keyword_lists_everything() {
    let server = single_dc_server(json!({"web": ["a", "b"], "db": []})).await;

    let results = provider(&server)
        .search(&SearchRequest::new(""), &Cancellation::new())
        .await
        .unwrap();
    assert_eq!(
        titles(&results),
        vec![
            "db.service.dc1.consul",
            "a.web.service.dc1.consul",
            "b.web.service.dc1.consul",
        ]
    );
}

#[tokio::test]
async fn test_pagination() {
    let catalog: serde_json::Map<String, Value> = (0..25)
        .map(|i| (format!("svc{:02}", i), json!([])))
        .collect();
    let server = single_dc_server(Value::Object(catalog)).await;
    let consul = provider(&server);
    let cancel = Cancellation::new();

    let page3 = consul
        .search(&SearchRequest::new("svc").with_page(3), &cancel)
        .await
        .unwrap();
    assert_eq!(page3.len(), 5);
    assert_eq!(page3[0].title, "svc20.service.dc1.consul");
    assert_eq!(page3[4].title, "svc24.service.dc1.consul");

    let page10 = consul
        .search(&SearchRequest::new("svc").with_page(10), &cancel)
        .await
        .unwrap();
    assert!(page10.is_empty());

    let first = consul
        .search(&SearchRequest::new("svc"), &cancel)
        .await
        .unwrap();
    let page0 = consul
        .search(&SearchRequest::new("svc").with_page(0), &cancel)
        .await
        .unwrap();
    assert_eq!(first.len(), 10);
    assert_eq!(first, page0);
}

#[tokio::test]
async fn test_datacenters_visited_in_order() {
    let server = MockServer::start().await;
    mount_datacenters(&server, ok(json!(["dc2", "dc1"]))).await;
    mount_services(&server, "dc1", ok(json!({"web": []}))).await;
    mount_services(&server, "dc2", ok(json!({"web": []}))).await;
    let consul = provider(&server);

    let results = consul
        .search(&SearchRequest::new("web"), &Cancellation::new())
        .await
        .unwrap();
    assert_eq!(
        titles(&results),
        vec!["web.service.dc2.consul", "web.service.dc1.consul"]
    );

    let again = consul
        .search(&SearchRequest::new("web"), &Cancellation::new())
        .await
        .unwrap();
    assert_eq!(results, again);
}

#[tokio::test]
async fn test_zero_datacenters() {
    let server = MockServer::start().await;
    mount_datacenters(&server, ok(json!([]))).await;
    Mock::given(path("/v1/catalog/services"))
        .respond_with(ok(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let results = provider(&server)
        .search(&SearchRequest::new(""), &Cancellation::new())
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_null_datacenter_list_is_empty() {
    let server = MockServer::start().await;
    mount_datacenters(&server, ok(Value::Null)).await;

    let results = provider(&server)
        .search(&SearchRequest::new(""), &Cancellation::new())
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_null_tags_are_untagged() {
    let server = single_dc_server(json!({"web": null, "db": []})).await;

    let results = provider(&server)
        .search(&SearchRequest::new("web"), &Cancellation::new())
        .await
        .unwrap();
    assert_eq!(titles(&results), vec!["web.service.dc1.consul"]);
}

#[tokio::test]
async fn test_null_catalog_is_empty() {
    let server = single_dc_server(Value::Null).await;

    let results = provider(&server)
        .search(&SearchRequest::new(""), &Cancellation::new())
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_datacenter_is_escaped() {
    let server = MockServer::start().await;
    mount_datacenters(&server, ok(json!(["east 1&x"]))).await;
    mount_services(&server, "east 1&x", ok(json!({"web": []}))).await;

    let results = provider(&server)
        .search(&SearchRequest::new("web"), &Cancellation::new())
        .await
        .unwrap();
    assert_eq!(titles(&results), vec!["web.service.east 1&x.consul"]);
}

#[tokio::test]
async fn test_one_failing_datacenter_fails_search() {
    let server = MockServer::start().await;
    mount_datacenters(&server, ok(json!(["dc1", "dc2"]))).await;
    mount_services(&server, "dc1", ok(json!({"web": []}))).await;
    mount_services(&server, "dc2", ResponseTemplate::new(500)).await;

    let err = provider(&server)
        .search(&SearchRequest::new("web"), &Cancellation::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::BadResponse { status: 500 }));
    assert!(!err.is_cancellation());
}

/// Lists `dc1`, then drops every later connection without answering.
async fn dropping_catalog() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                return;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let body = r#"["dc1"]"#;
        let response = format!(
            "HTTP/1.1 200 OK\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\r\n{}",
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        drop(socket);

        while let Ok((socket, _)) = listener.accept().await {
            drop(socket);
        }
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_datacenter_connection_failure_fails_search() {
    let url = dropping_catalog().await;
    let consul = ConsulProvider::new(&url, HttpClient::new().unwrap()).unwrap();

    let err = consul
        .search(&SearchRequest::new("web"), &Cancellation::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Fetch(_)));
    assert!(!err.is_cancellation());
}

#[tokio::test]
async fn test_datacenter_listing_failure() {
    let server = MockServer::start().await;
    mount_datacenters(&server, ResponseTemplate::new(503)).await;

    let err = provider(&server)
        .search(&SearchRequest::new("web"), &Cancellation::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Datacenters { .. }));
    assert_eq!(err.status(), Some(503));
    assert!(err.to_string().starts_with("failed to fetch data"));
}

#[tokio::test]
async fn test_datacenter_listing_decode_failure() {
    let server = MockServer::start().await;
    mount_datacenters(&server, ok(json!({"dc1": 1}))).await;

    let err = provider(&server)
        .datacenters(&Cancellation::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Decode(_)));
}

#[tokio::test]
async fn test_services_decode_failure() {
    let server = MockServer::start().await;
    mount_datacenters(&server, ok(json!(["dc1"]))).await;
    mount_services(&server, "dc1", ResponseTemplate::new(200).set_body_string("not json")).await;

    let err = provider(&server)
        .search(&SearchRequest::new("web"), &Cancellation::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_catalog() {
    let consul = ConsulProvider::new("http://127.0.0.1:1", HttpClient::new().unwrap()).unwrap();

    let err = consul
        .search(&SearchRequest::new("web"), &Cancellation::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Datacenters { .. }));
    assert!(!err.is_cancellation());
}

#[tokio::test]
async fn test_deadline_aborts_service_fetch() {
    let server = MockServer::start().await;
    mount_datacenters(&server, ok(json!(["dc1"]))).await;
    mount_services(
        &server,
        "dc1",
        ResponseTemplate::new(200)
            .set_body_json(json!({"web": []}))
            .set_delay(Duration::from_secs(5)),
    )
    .await;

    let err = provider(&server)
        .search(
            &SearchRequest::new("web"),
            &Cancellation::with_timeout(Duration::from_millis(300)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::DeadlineExceeded));
    assert!(err.is_cancellation());
}

#[tokio::test]
async fn test_cancel_aborts_datacenter_listing() {
    let server = MockServer::start().await;
    mount_datacenters(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!(["dc1"]))
            .set_delay(Duration::from_secs(5)),
    )
    .await;

    let cancel = Cancellation::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let err = provider(&server)
        .search(&SearchRequest::new("web"), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::Datacenters { ref source } if matches!(**source, ProviderError::Cancelled)
    ));
    assert!(err.is_cancellation());
}
