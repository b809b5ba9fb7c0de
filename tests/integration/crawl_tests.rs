//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl cycle end-to-end through the reqwest-backed client.

use pdf_scout::config::{Config, CrawlMode};
use pdf_scout::crawler::{crawl, ShutdownSignal};
use pdf_scout::output::export_site_csv;
use pdf_scout::{ConfigError, ScoutError};
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a fast test configuration
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.crawler.request_delay_seconds = 0.0;
    config.crawler.request_timeout_seconds = 5;
    config.crawler.max_crawl_depth = 1;
    config.crawler.max_pages_per_site = 10;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.user_agent.crawler_version = "1.0.0".to_string();
    config
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", body),
        "text/html",
    )
}

fn pdf(size: usize) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(vec![b'%'; size], "application/pdf")
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html(body))
        .mount(server)
        .await;
}

async fn mount_pdf(server: &MockServer, pdf_path: &str, size: usize) {
    Mock::given(method("HEAD"))
        .and(path(pdf_path))
        .respond_with(pdf(size))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_crawl_finds_pdf_and_skips_external_site() {
    let site = MockServer::start().await;
    let elsewhere = MockServer::start().await;
    let base_url = site.uri();

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&site)
        .await;
    mount_page(
        &site,
        "/",
        format!(
            r#"<a href="/paper.pdf">Annual paper</a>
            <a href="{}/about">About</a>
            <a href="{}/page">Elsewhere</a>"#,
            base_url,
            elsewhere.uri()
        ),
    )
    .await;
    mount_page(&site, "/about", String::new()).await;
    mount_pdf(&site, "/paper.pdf", 2_097_152).await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html(String::new()))
        .expect(0)
        .mount(&elsewhere)
        .await;

    let outcome = crawl(
        create_test_config(),
        &format!("{}/", base_url),
        ShutdownSignal::new(),
    )
    .await
    .expect("crawl should succeed");

    assert_eq!(outcome.store.len(), 1);
    let record = &outcome.store.records()[0];
    assert_eq!(record.url, format!("{}/paper.pdf", base_url));
    assert_eq!(record.file_size_bytes, Some(2_097_152));
    assert_eq!(record.content_type.as_deref(), Some("application/pdf"));
    assert_eq!(record.http_status, Some(200));
    assert_eq!(record.link_text, "Annual paper");
    assert_eq!(record.depth, 0);

    assert_eq!(outcome.stats.pages_crawled, 2);
    assert_eq!(outcome.stats.external_urls_skipped, 1);
    assert!(!outcome.interrupted);
}

#[tokio::test]
async fn test_robots_txt_disallow_respected() {
    let site = MockServer::start().await;
    let base_url = site.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("User-agent: *\nDisallow: /private/\n", "text/plain"),
        )
        .expect(1)
        .mount(&site)
        .await;
    mount_page(
        &site,
        "/",
        r#"<a href="/private/report">Private</a><a href="/public">Public</a>"#.to_string(),
    )
    .await;
    mount_page(&site, "/public", String::new()).await;
    Mock::given(method("GET"))
        .and(path("/private/report"))
        .respond_with(html(String::new()))
        .expect(0)
        .mount(&site)
        .await;

    let outcome = crawl(
        create_test_config(),
        &format!("{}/", base_url),
        ShutdownSignal::new(),
    )
    .await
    .expect("crawl should succeed");

    assert_eq!(outcome.stats.pages_crawled, 2);
    assert_eq!(outcome.stats.robots_blocked_urls, 1);
}

#[tokio::test]
async fn test_robots_ignored_when_disabled() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("User-agent: *\nDisallow: /\n", "text/plain"),
        )
        .mount(&site)
        .await;
    mount_page(&site, "/", String::new()).await;

    let mut config = create_test_config();
    config.crawler.respect_robots = false;
    config.crawler.use_sitemaps = false;

    let outcome = crawl(config, &format!("{}/", site.uri()), ShutdownSignal::new())
        .await
        .expect("crawl should succeed");

    assert_eq!(outcome.stats.pages_crawled, 1);
    assert_eq!(outcome.stats.robots_blocked_urls, 0);
}

#[tokio::test]
async fn test_failed_pages_are_recorded() {
    let site = MockServer::start().await;

    mount_page(
        &site,
        "/",
        r#"<a href="/gone">Gone</a><a href="/broken">Broken</a><a href="/ok">Ok</a>"#.to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&site)
        .await;
    mount_page(&site, "/ok", String::new()).await;

    let outcome = crawl(
        create_test_config(),
        &format!("{}/", site.uri()),
        ShutdownSignal::new(),
    )
    .await
    .expect("crawl should succeed");

    assert_eq!(outcome.stats.pages_crawled, 2);
    assert_eq!(outcome.stats.errors_count, 2);
    let reasons: Vec<&str> = outcome
        .stats
        .failed_urls
        .iter()
        .map(|failed| failed.reason.as_str())
        .collect();
    assert!(reasons.contains(&"HTTP status 404"));
    assert!(reasons.contains(&"HTTP status 503"));
}

#[tokio::test]
async fn test_unreachable_seed_fails_before_crawling() {
    let result = crawl(
        create_test_config(),
        "http://127.0.0.1:1/",
        ShutdownSignal::new(),
    )
    .await;

    assert!(matches!(
        result,
        Err(ScoutError::Config(ConfigError::UnreachableSeed { .. }))
    ));
}

#[tokio::test]
async fn test_interrupted_crawl_is_not_an_error() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(String::new()))
        .expect(0)
        .mount(&site)
        .await;

    let shutdown = ShutdownSignal::new();
    shutdown.trigger();

    let outcome = crawl(create_test_config(), &format!("{}/", site.uri()), shutdown)
        .await
        .expect("an interrupted crawl still returns its results");

    assert!(outcome.interrupted);
    assert_eq!(outcome.stats.pages_crawled, 0);
}

#[tokio::test]
async fn test_book_crawl_extracts_metadata() {
    let site = MockServer::start().await;

    mount_page(
        &site,
        "/",
        r#"<div>Recommended reading:
            <a href="/books/Deep_Learning-Ian_Goodfellow.pdf">Deep Learning textbook</a>
            <a href="/books/isbn9781234567890_python_book.pdf">Python</a>
        </div>"#
            .to_string(),
    )
    .await;
    mount_pdf(&site, "/books/Deep_Learning-Ian_Goodfellow.pdf", 2 * 1024 * 1024).await;
    mount_pdf(&site, "/books/isbn9781234567890_python_book.pdf", 1024).await;

    let mut config = create_test_config();
    config.crawler.mode = CrawlMode::Book;

    let outcome = crawl(config, &format!("{}/", site.uri()), ShutdownSignal::new())
        .await
        .expect("crawl should succeed");

    assert_eq!(outcome.store.len(), 2);
    let records = outcome.store.records();

    let deep = records
        .iter()
        .find(|r| r.url.contains("Goodfellow"))
        .expect("deep learning record");
    assert!(deep.title.contains("Deep Learning"));
    assert_eq!(deep.author.as_deref(), Some("Ian Goodfellow"));
    assert!(deep.link_context.contains("Recommended reading"));

    let python = records
        .iter()
        .find(|r| r.url.contains("python"))
        .expect("python record");
    assert_eq!(python.isbn.as_deref(), Some("9781234567890"));

    for record in records {
        assert!((0.0..=1.0).contains(&record.confidence_score));
    }
    assert!(deep.confidence_score > python.confidence_score);
}

#[tokio::test]
async fn test_crawl_results_export_to_csv() {
    let site = MockServer::start().await;

    mount_page(
        &site,
        "/",
        r#"<a href="/a.pdf">First, with a comma</a><a href="/b.pdf">Second</a>"#.to_string(),
    )
    .await;
    mount_pdf(&site, "/a.pdf", 64 * 1024).await;
    mount_pdf(&site, "/b.pdf", 128 * 1024).await;

    let outcome = crawl(
        create_test_config(),
        &format!("{}/", site.uri()),
        ShutdownSignal::new(),
    )
    .await
    .expect("crawl should succeed");

    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("pdfs.csv");
    assert_eq!(
        export_site_csv(outcome.store.records(), &csv_path).unwrap(),
        2
    );

    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    assert_eq!(reader.headers().unwrap().len(), 14);
    let rows: Vec<csv::StringRecord> = reader.records().map(|row| row.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][11], "First, with a comma");
    assert_eq!(&rows[0][3], "65536");
}

#[tokio::test]
async fn test_pdf_by_content_type_at_depth_limit() {
    let site = MockServer::start().await;

    mount_page(
        &site,
        "/",
        r#"<p>Latest issue: <a href="/download/42">Issue 42</a></p>"#.to_string(),
    )
    .await;
    mount_pdf(&site, "/download/42", 300_000).await;
    Mock::given(method("GET"))
        .and(path("/download/42"))
        .respond_with(pdf(300_000))
        .expect(0)
        .mount(&site)
        .await;

    let mut config = create_test_config();
    config.crawler.max_crawl_depth = 0;

    let outcome = crawl(config, &format!("{}/", site.uri()), ShutdownSignal::new())
        .await
        .expect("crawl should succeed");

    assert_eq!(outcome.store.len(), 1);
    let record = &outcome.store.records()[0];
    assert_eq!(record.url, format!("{}/download/42", site.uri()));
    assert_eq!(record.file_size_bytes, Some(300_000));
    assert_eq!(record.link_text, "Issue 42");
    assert_eq!(record.depth, 0);
    assert_eq!(outcome.stats.pages_crawled, 1);
}

#[tokio::test]
async fn test_huge_crawl_delay_is_capped() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("User-agent: *\nCrawl-delay: 1e20\n", "text/plain"),
        )
        .mount(&site)
        .await;
    mount_page(&site, "/", r#"<a href="/next">Next</a>"#.to_string()).await;
    mount_page(&site, "/next", String::new()).await;

    let mut config = create_test_config();
    config.crawler.max_crawl_delay_seconds = 0.0;

    let outcome = crawl(config, &format!("{}/", site.uri()), ShutdownSignal::new())
        .await
        .expect("crawl should succeed");

    assert_eq!(outcome.stats.pages_crawled, 2);
}
