//! Integration tests for the scraper
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! fetcher, the sitemap reader and the full scrape cycle end-to-end.

use img_harvest::config::{Config, OutputConfig, ScraperConfig, SitemapConfig, UserAgentConfig};
use img_harvest::crawler::{
    read_sitemap, run_scrape, ConcurrencyBudget, Fetcher, HtmlExtractor, HttpFetcher,
    ScrapeCoordinator, UserAgentPool,
};
use img_harvest::{FetchError, HarvestError};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_AGENT: &str = "HarvestTest/1.0";

fn create_test_fetcher(timeout: Duration) -> HttpFetcher {
    let pool = UserAgentPool::seeded(vec![TEST_AGENT.to_string()], 0).expect("pool");
    HttpFetcher::new(pool, timeout).expect("Failed to build fetcher")
}

/// Creates a test configuration pointing at a mock sitemap
fn create_test_config(sitemap_url: String, report_path: String) -> Config {
    Config {
        sitemap: SitemapConfig { url: sitemap_url },
        scraper: ScraperConfig {
            concurrency: 2,
            request_timeout_secs: 5,
        },
        user_agent: UserAgentConfig {
            pool: vec![TEST_AGENT.to_string()],
        },
        output: OutputConfig { report_path },
    }
}

fn sitemap_xml(urls: &[String]) -> String {
    let entries: String = urls
        .iter()
        .map(|u| format!("<url><loc>{}</loc></url>", u))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

fn html_page(description: &str, images: &[&str]) -> String {
    let imgs: String = images
        .iter()
        .map(|src| format!(r#"<img src="{}">"#, src))
        .collect();
    format!(
        r#"<html><head><meta name="description" content="{}"></head><body>{}<img alt="no source"></body></html>"#,
        description, imgs
    )
}

#[tokio::test]
async fn test_fetch_returns_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>hi</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(Duration::from_secs(5));
    let url = format!("{}/page", mock_server.uri());
    let document = fetcher.fetch(&url).await.expect("fetch failed");

    assert_eq!(document.status_code, 200);
    assert_eq!(document.body, "<html>hi</html>");
    assert_eq!(document.url, url);
}

#[tokio::test]
async fn test_fetch_non_success_status_is_not_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<html>not found</html>"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(Duration::from_secs(5));

    let missing = fetcher
        .fetch(&format!("{}/missing", mock_server.uri()))
        .await
        .expect("404 should not be an error");
    assert_eq!(missing.status_code, 404);

    let broken = fetcher
        .fetch(&format!("{}/broken", mock_server.uri()))
        .await
        .expect("500 should not be an error");
    assert_eq!(broken.status_code, 500);
}

#[tokio::test]
async fn test_fetch_sends_user_agent_from_pool() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header("user-agent", TEST_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(Duration::from_secs(5));
    let url = format!("{}/ua", mock_server.uri());

    for _ in 0..2 {
        let document = fetcher.fetch(&url).await.expect("fetch failed");
        assert_eq!(document.status_code, 200);
    }
}

#[tokio::test]
async fn test_fetch_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(Duration::from_millis(200));
    let result = fetcher
        .fetch(&format!("{}/slow", mock_server.uri()))
        .await;

    assert!(
        matches!(result, Err(FetchError::Timeout { .. })),
        "expected timeout, got {:?}",
        result
    );
}

#[tokio::test]
async fn test_fetch_reports_redirected_url() {
    let mock_server = MockServer::start().await;
    let final_url = format!("{}/final", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", final_url.as_str()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/final"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>landed</html>"))
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(Duration::from_secs(5));
    let document = fetcher
        .fetch(&format!("{}/start", mock_server.uri()))
        .await
        .expect("fetch failed");

    assert_eq!(document.url, final_url);
    assert_eq!(document.status_code, 200);
}

#[tokio::test]
async fn test_read_sitemap() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap_xml(&[
            "https://x/1".to_string(),
            "https://x/2".to_string(),
        ])))
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(Duration::from_secs(5));
    let urls = read_sitemap(&fetcher, &format!("{}/sitemap.xml", mock_server.uri()))
        .await
        .expect("sitemap read failed");

    assert_eq!(urls, vec!["https://x/1", "https://x/2"]);
}

#[tokio::test]
async fn test_read_sitemap_rejects_html() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<html><body>Not Found</body></html>"))
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(Duration::from_secs(5));
    let result = read_sitemap(&fetcher, &format!("{}/sitemap.xml", mock_server.uri())).await;

    assert!(matches!(result, Err(HarvestError::Sitemap { .. })));
}

#[tokio::test]
async fn test_read_sitemap_fetch_failure_is_fatal() {
    let fetcher = create_test_fetcher(Duration::from_secs(5));
    let result = read_sitemap(&fetcher, "not a url").await;

    assert!(matches!(
        result,
        Err(HarvestError::Fetch(FetchError::InvalidUrl { .. }))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_coordinator_against_mock_server() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    for i in 0..8 {
        Mock::given(method("GET"))
            .and(path(format!("/page{}", i)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(html_page(&format!("page {}", i), &["a.png"]))
                    .set_delay(Duration::from_millis(20)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let urls: Vec<String> = (0..8).map(|i| format!("{}/page{}", base_url, i)).collect();
    let coordinator = ScrapeCoordinator::new(
        Arc::new(create_test_fetcher(Duration::from_secs(5))),
        Arc::new(HtmlExtractor::new()),
        ConcurrencyBudget::new(3).unwrap(),
    );

    let mut records = coordinator.scrape(urls.clone()).await;
    records.sort_by(|a, b| a.source_url.cmp(&b.source_url));

    assert_eq!(records.len(), 8);
    for (record, url) in records.iter().zip(urls.iter()) {
        assert_eq!(&record.source_url, url);
        assert_eq!(record.image_refs, vec!["a.png"]);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_full_scrape() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let pages = vec![
        format!("{}/article/1", base_url),
        format!("{}/article/2", base_url),
        format!("{}/article/3", base_url),
        format!("{}/article/missing", base_url),
    ];

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap_xml(&pages)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/article/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page("First story", &["a.png", "b.jpg"])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/article/2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><head></head><body><p>No images here</p></body></html>"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/article/3"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string(html_page("Server error page", &[])),
        )
        .mount(&mock_server)
        .await;

    // /article/missing is unmatched: wiremock answers 404 with an empty
    // body, which cannot be extracted and is dropped

    let dir = tempdir().expect("Failed to create temp dir");
    let report_path = dir.path().join("image_results.txt");
    let config = create_test_config(
        format!("{}/sitemap.xml", base_url),
        report_path.display().to_string(),
    );

    let stats = run_scrape(&config).await.expect("Scrape failed");

    assert_eq!(stats.urls_discovered, 4);
    assert_eq!(stats.pages_scraped, 3);
    assert_eq!(stats.pages_failed, 1);
    assert_eq!(stats.images_found, 2);
    assert_eq!(stats.non_success_status, 1);

    let report = std::fs::read_to_string(&report_path).expect("Failed to read report");

    assert!(report.contains(&format!(
        "URL: {}/article/1\nStatusCode: 200\nMeta Description: First story\nImages:\n- a.png\n- b.jpg\n\n",
        base_url
    )));
    assert!(report.contains(&format!(
        "URL: {}/article/2\nStatusCode: 200\nMeta Description: \nImages:\n\n",
        base_url
    )));
    assert!(report.contains(&format!(
        "URL: {}/article/3\nStatusCode: 500\nMeta Description: Server error page\nImages:\n\n",
        base_url
    )));
    assert!(!report.contains("/article/missing"));
    assert_eq!(report.matches("URL: ").count(), 3);
}

#[tokio::test]
async fn test_unwritable_report_aborts_before_fetching() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap_xml(&[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = tempdir().expect("Failed to create temp dir");
    let report_path = dir.path().join("no-such-dir").join("results.txt");
    let config = create_test_config(
        format!("{}/sitemap.xml", mock_server.uri()),
        report_path.display().to_string(),
    );

    let result = run_scrape(&config).await;

    assert!(matches!(result, Err(HarvestError::Output(_))));
}

#[tokio::test]
async fn test_bad_sitemap_aborts_run() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<sitemapindex></sitemapindex>"))
        .mount(&mock_server)
        .await;

    let dir = tempdir().expect("Failed to create temp dir");
    let report_path = dir.path().join("results.txt");
    let config = create_test_config(
        format!("{}/sitemap.xml", mock_server.uri()),
        report_path.display().to_string(),
    );

    let result = run_scrape(&config).await;

    assert!(matches!(result, Err(HarvestError::Sitemap { .. })));
    let report = std::fs::read_to_string(&report_path).unwrap_or_default();
    assert!(report.is_empty());
}

#[tokio::test]
async fn test_empty_sitemap_writes_empty_report() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap_xml(&[])))
        .mount(&mock_server)
        .await;

    let dir = tempdir().expect("Failed to create temp dir");
    let report_path = dir.path().join("results.txt");
    let config = create_test_config(
        format!("{}/sitemap.xml", mock_server.uri()),
        report_path.display().to_string(),
    );

    let stats = run_scrape(&config).await.expect("Scrape failed");

    assert_eq!(stats.urls_discovered, 0);
    assert_eq!(std::fs::read_to_string(&report_path).unwrap(), "");
}
