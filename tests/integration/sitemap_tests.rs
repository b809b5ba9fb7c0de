//! Integration tests for sitemap seeding
//!
//! Sitemaps are served by wiremock and fetched through the reqwest-backed
//! client, both directly through the seeder and as part of a crawl.

use pdf_scout::config::{Config, UserAgentConfig};
use pdf_scout::crawler::{crawl, ReqwestHttpClient, ShutdownSignal};
use pdf_scout::sitemap::SitemapSeeder;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn urlset(urls: &[String]) -> String {
    let entries: String = urls
        .iter()
        .map(|u| format!("<url><loc>{}</loc></url>", u))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

fn sitemap_index(children: &[String]) -> String {
    let entries: String = children
        .iter()
        .map(|u| format!("<sitemap><loc>{}</loc></sitemap>", u))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#,
        entries
    )
}

fn xml(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "application/xml")
}

fn seeder() -> SitemapSeeder {
    let client = ReqwestHttpClient::from_config(&UserAgentConfig::default(), 1024 * 1024)
        .expect("client should build");
    SitemapSeeder::new(Arc::new(client), Duration::from_secs(5))
}

#[tokio::test]
async fn test_index_with_one_missing_child() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml(sitemap_index(&[
            format!("{}/sitemap-posts.xml", base),
            format!("{}/sitemap-gone.xml", base),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap-posts.xml"))
        .respond_with(xml(urlset(&[
            format!("{}/posts/1", base),
            format!("{}/posts/2", base),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap-gone.xml"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let urls = seeder()
        .discover(&Url::parse(&base).unwrap())
        .collect_all()
        .await;

    assert_eq!(
        urls,
        vec![format!("{}/posts/1", base), format!("{}/posts/2", base)]
    );
}

#[tokio::test]
async fn test_robots_sitemap_directive() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            format!("User-agent: *\nDisallow:\n\nSitemap: {}/maps/site.xml\n", base),
            "text/plain",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/maps/site.xml"))
        .respond_with(xml(urlset(&[format!("{}/listed", base)])))
        .mount(&server)
        .await;

    let urls = seeder()
        .discover(&Url::parse(&base).unwrap())
        .collect_all()
        .await;

    assert_eq!(urls, vec![format!("{}/listed", base)]);
}

#[tokio::test]
async fn test_text_sitemap_fallback() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            format!("{}/a\n# comment\n\n{}/b\n", base, base),
            "text/plain",
        ))
        .mount(&server)
        .await;

    let urls = seeder()
        .discover(&Url::parse(&base).unwrap())
        .collect_all()
        .await;

    assert_eq!(urls, vec![format!("{}/a", base), format!("{}/b", base)]);
}

#[tokio::test]
async fn test_malformed_sitemap_yields_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml("<?xml version=\"1.0\"?><urlset><url><loc>".to_string()))
        .mount(&server)
        .await;

    let urls = seeder()
        .discover(&Url::parse(&server.uri()).unwrap())
        .collect_all()
        .await;

    assert!(urls.is_empty());
}

#[tokio::test]
async fn test_crawl_visits_pages_only_listed_in_sitemap() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml(urlset(&[
            format!("{}/orphan", base),
            format!("{}/orphan", base),
            format!("{}/files/listing.pdf", base),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orphan"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/files/listing.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(vec![b'%'; 32 * 1024], "application/pdf"),
        )
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.crawler.request_delay_seconds = 0.0;

    let outcome = crawl(config, &format!("{}/", base), ShutdownSignal::new())
        .await
        .expect("crawl should succeed");

    assert_eq!(outcome.sitemap_urls.len(), 3);
    assert_eq!(outcome.stats.pages_crawled, 2);
    assert_eq!(outcome.store.len(), 1);
    assert_eq!(
        outcome.store.records()[0].discovered_on_page,
        format!("{}/sitemap.xml", base)
    );
}

#[tokio::test]
async fn test_crawl_without_sitemaps() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml(urlset(&[format!("{}/orphan", base)])))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.crawler.request_delay_seconds = 0.0;
    config.crawler.use_sitemaps = false;

    let outcome = crawl(config, &format!("{}/", base), ShutdownSignal::new())
        .await
        .expect("crawl should succeed");

    assert!(outcome.sitemap_urls.is_empty());
    assert_eq!(outcome.stats.pages_crawled, 1);
}
