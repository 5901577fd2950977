//! Integration tests for the crawler
//!
//! These tests use wiremock to stand up mock sites and exercise the full
//! crawl cycle end-to-end: robots enforcement, product discovery, scope
//! filtering, depth bounds, and rate-limit retry behavior.

use shopmap::config::UserAgentConfig;
use shopmap::crawler::{build_http_client, CrawlEngine, CrawlLimits, HttpFetcher};
use shopmap::robots::RobotsCache;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Engine with test-friendly delays over the real HTTP fetcher
fn test_engine(max_depth: u32) -> CrawlEngine {
    let limits = CrawlLimits {
        max_depth,
        max_concurrent_fetches: 5,
        politeness_delay: Duration::from_millis(5),
        retry_backoff: Duration::from_millis(10),
        max_retries: 1,
        max_frontier: 1000,
        session_timeout: Some(Duration::from_secs(30)),
    };
    let client = build_http_client(&UserAgentConfig::default()).expect("client");
    let fetcher = Arc::new(HttpFetcher::new(client.clone()));
    let robots = Arc::new(RobotsCache::new(client));
    CrawlEngine::new(limits, fetcher, robots)
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", body),
        "text/html",
    )
}

async fn mount_allow_all_robots(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /\n"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_crawl_discovers_products_and_ignores_off_domain_links() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_allow_all_robots(&server).await;

    // "localhost" resolves to the same mock server but is a different host,
    // so the link is off-domain and must never be requested.
    let off_domain = base.replace("127.0.0.1", "localhost") + "/offdomain";

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            r#"<a href="{base}/product/1">Widget</a>
               <a href="{off_domain}">Elsewhere</a>
               <a href="{base}/catalog">Catalog</a>"#
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/catalog"))
        .respond_with(html_page(&format!(r#"<a href="{base}/item/abc">Gadget</a>"#)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/offdomain"))
        .respond_with(html_page("should never be served"))
        .expect(0)
        .mount(&server)
        .await;

    let seed = format!("{}/", base);
    let results = test_engine(2).crawl_all(std::slice::from_ref(&seed)).await;

    let products = &results[&seed];
    assert_eq!(products.len(), 2);
    assert!(products.contains(&format!("{}/product/1", base)));
    assert!(products.contains(&format!("{}/item/abc", base)));
    // expect(0) on /offdomain is verified when the mock server drops.
}

#[tokio::test]
async fn test_robots_txt_disallow_is_respected() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private\n"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            r#"<a href="{base}/private/catalog">Hidden</a>
               <a href="{base}/public">Public</a>"#
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/public"))
        .respond_with(html_page(&format!(r#"<a href="{base}/product/2">P</a>"#)))
        .mount(&server)
        .await;

    // The disallowed branch must never be fetched, so the product behind it
    // stays undiscovered.
    Mock::given(method("GET"))
        .and(path("/private/catalog"))
        .respond_with(html_page(&format!(r#"<a href="{base}/product/9">Secret</a>"#)))
        .expect(0)
        .mount(&server)
        .await;

    let products = test_engine(2).crawl(&format!("{}/", base)).await.unwrap();

    assert!(products.contains(&format!("{}/product/2", base)));
    assert!(!products.contains(&format!("{}/product/9", base)));
}

#[tokio::test]
async fn test_unreachable_robots_txt_fails_open() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(r#"<a href="{base}/product/1">W</a>"#)))
        .mount(&server)
        .await;

    let products = test_engine(2).crawl(&format!("{}/", base)).await.unwrap();

    assert!(products.contains(&format!("{}/product/1", base)));
}

#[tokio::test]
async fn test_rate_limited_page_retried_exactly_once() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_allow_all_robots(&server).await;

    // Always 429: the engine must try twice (initial + one retry), then
    // give the branch up.
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(429))
        .expect(2)
        .mount(&server)
        .await;

    let products = test_engine(2).crawl(&format!("{}/", base)).await.unwrap();

    assert!(products.is_empty());
    // expect(2) is verified when the mock server drops.
}

#[tokio::test]
async fn test_server_error_is_dropped_without_retry() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_allow_all_robots(&server).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            r#"<a href="{base}/broken">B</a><a href="{base}/product/1">P</a>"#
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let products = test_engine(2).crawl(&format!("{}/", base)).await.unwrap();

    assert!(products.contains(&format!("{}/product/1", base)));
}

#[tokio::test]
async fn test_crawl_respects_depth_limit() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_allow_all_robots(&server).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(r#"<a href="{base}/level1">1</a>"#)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/level1"))
        .respond_with(html_page(&format!(r#"<a href="{base}/level2">2</a>"#)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/level2"))
        .respond_with(html_page(&format!(r#"<a href="{base}/level3">3</a>"#)))
        .mount(&server)
        .await;

    // level3 sits at depth 3, past the bound of 2.
    Mock::given(method("GET"))
        .and(path("/level3"))
        .respond_with(html_page("too deep"))
        .expect(0)
        .mount(&server)
        .await;

    test_engine(2).crawl(&format!("{}/", base)).await.unwrap();
    // expect(0) on /level3 is verified when the mock server drops.
}

#[tokio::test]
async fn test_batch_isolates_unreachable_seed() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_allow_all_robots(&server).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(r#"<a href="{base}/p/7">P</a>"#)))
        .mount(&server)
        .await;

    let good_seed = format!("{}/", base);
    // Port 1 refuses connections; the seed fetch fails at the network level.
    let dead_seed = "http://127.0.0.1:1/".to_string();
    let seeds = vec![good_seed.clone(), dead_seed.clone()];

    let results = test_engine(2).crawl_all(&seeds).await;

    assert_eq!(results.len(), 2);
    assert!(results[&good_seed].contains(&format!("{}/p/7", base)));
    assert!(results[&dead_seed].is_empty());
}

#[tokio::test]
async fn test_duplicate_links_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_allow_all_robots(&server).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            r#"<a href="{base}/shared">A</a>
               <a href="{base}/other">B</a>"#
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/other"))
        .respond_with(html_page(&format!(r#"<a href="{base}/shared">A again</a>"#)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/shared"))
        .respond_with(html_page("leaf"))
        .expect(1)
        .mount(&server)
        .await;

    test_engine(2).crawl(&format!("{}/", base)).await.unwrap();
    // expect(1) on /shared is verified when the mock server drops.
}
