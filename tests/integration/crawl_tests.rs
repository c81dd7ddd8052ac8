//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl pipeline end-to-end, from the first request to the files left on
//! disk.

use site_cartographer::config::Config;
use site_cartographer::crawler::crawl;
use site_cartographer::output::read_site_map;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing under `output`
fn create_test_config(output: &TempDir) -> Config {
    let mut config = Config::default();
    config.output.base_dir = output.path().display().to_string();
    config.crawler.sitemap = false;
    config.retry.base_delay_ms = 1;
    config
}

/// Folder the crawler creates for the mock server's host
fn site_dir(output: &TempDir) -> PathBuf {
    output.path().join("127_0_0_1")
}

async fn mount_page(server: &MockServer, route: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Serves `response` verbatim on the first `served` connections and drops
/// every later one as soon as it is accepted
///
/// Returns the root URL and the number of connections accepted so far.
async fn spawn_raw_server(served: usize, response: &'static str) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&accepted);

    tokio::spawn(async move {
        loop {
            let mut socket = match listener.accept().await {
                Ok((socket, _)) => socket,
                Err(_) => break,
            };
            if counter.fetch_add(1, Ordering::SeqCst) < served {
                let mut request = [0u8; 4096];
                let _ = socket.read(&mut request).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        }
    });

    (format!("http://{}/", addr), accepted)
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<html><body>
            <h1>Home</h1>
            <a href="{base}/page1">Page 1</a>
            <a href="/page2">Page 2</a>
            <a href="https://elsewhere.example/x">Elsewhere</a>
            </body></html>"#,
            base = base_url
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/page1",
        r#"<html><body><h1>Page 1</h1><a href="/">Home</a></body></html>"#.to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/page2",
        r#"<html><body><h1>Page 2</h1><p>Content 2</p></body></html>"#.to_string(),
    )
    .await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(&output);
    let seed = format!("{}/", base_url);

    let summary = crawl(&config, &seed, None).await.expect("Crawl failed");

    assert_eq!(summary.pages, 3);
    assert_eq!(summary.base_domain, "127.0.0.1");

    let site_map = read_site_map(&site_dir(&output).join("sitemap.json")).unwrap();
    let urls: Vec<String> = site_map.urls().map(str::to_string).collect();
    assert_eq!(
        urls,
        vec![
            seed.clone(),
            format!("{}/page1", base_url),
            format!("{}/page2", base_url),
        ]
    );

    let home = site_map.get(&seed).unwrap();
    assert_eq!(home.http_status_code, Some(200));
    assert!(home.content_size_mb.unwrap() > 0.0);
    assert_eq!(home.viewport_width, 1366);
    assert!(home
        .links
        .contains(&"https://elsewhere.example/x".to_string()));

    let home_text = std::fs::read_to_string(&home.text_file_path).unwrap();
    assert!(home_text.starts_with("# Home"));
    assert!(site_dir(&output).join("crawl_summary.md").is_file());
}

#[tokio::test]
async fn test_depth_limit_respected() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/one">1</a>"#.to_string()).await;
    mount_page(&mock_server, "/one", r#"<a href="/two">2</a>"#.to_string()).await;
    mount_page(&mock_server, "/two", r#"<p>End</p>"#.to_string()).await;

    let output = TempDir::new().unwrap();
    let mut config = create_test_config(&output);
    config.crawler.max_depth = 1;

    let summary = crawl(&config, &format!("{}/", base_url), None)
        .await
        .unwrap();

    assert_eq!(summary.pages, 2);
    let site_map = read_site_map(&summary.site_map_path).unwrap();
    assert!(!site_map.contains(&format!("{}/two", base_url)));
}

#[tokio::test]
async fn test_error_status_is_recorded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/gone">Gone</a>"#.to_string()).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<h1>Not Found</h1>"))
        .mount(&mock_server)
        .await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(&output);

    let summary = crawl(&config, &format!("{}/", base_url), None)
        .await
        .unwrap();

    let site_map = read_site_map(&summary.site_map_path).unwrap();
    let gone = site_map.get(&format!("{}/gone", base_url)).unwrap();
    assert_eq!(gone.http_status_code, Some(404));
}

#[tokio::test]
async fn test_unreachable_page_is_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Same host, different port: in scope, but nothing is listening
    mount_page(
        &mock_server,
        "/",
        r#"<a href="http://127.0.0.1:1/dead">Dead</a><a href="/alive">Alive</a>"#.to_string(),
    )
    .await;
    mount_page(&mock_server, "/alive", "<p>Alive</p>".to_string()).await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(&output);

    let summary = crawl(&config, &format!("{}/", base_url), None)
        .await
        .unwrap();

    assert_eq!(summary.pages, 2);
    assert_eq!(summary.stats.capture_failures, 1);
    let site_map = read_site_map(&summary.site_map_path).unwrap();
    assert!(!site_map.contains("http://127.0.0.1:1/dead"));
}

#[tokio::test]
async fn test_verification_timeout_records_nulls() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // First request (the capture) answers immediately; every later one
    // (the verification attempts) outlasts the client timeout
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Slow</h1>"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<h1>Slow</h1>")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let output = TempDir::new().unwrap();
    let mut config = create_test_config(&output);
    config.crawler.max_depth = 0;
    config.http.page_load_timeout_secs = 1;

    let seed = format!("{}/slow", base_url);
    let summary = crawl(&config, &seed, None).await.unwrap();

    let site_map = read_site_map(&summary.site_map_path).unwrap();
    let slow = site_map.get(&seed).unwrap();
    assert_eq!(slow.http_status_code, None);
    assert_eq!(slow.content_size_mb, None);
    assert_eq!(summary.stats.degraded_verifications, 1);

    let json = std::fs::read_to_string(&summary.site_map_path).unwrap();
    assert!(json.contains("\"http_status_code\": null"));
}

#[tokio::test]
async fn test_dropped_connections_are_retried_then_recorded_as_nulls() {
    const PAGE: &str = "HTTP/1.1 200 OK\r\n\
        Content-Type: text/html\r\n\
        Content-Length: 14\r\n\
        Connection: close\r\n\r\n\
        <h1>Flaky</h1>";

    // One connection for the capture, then every verification attempt
    // has its connection closed before a response is written
    let (seed, accepted) = spawn_raw_server(1, PAGE).await;

    let output = TempDir::new().unwrap();
    let mut config = create_test_config(&output);
    config.crawler.max_depth = 0;

    let summary = crawl(&config, &seed, None).await.unwrap();

    assert_eq!(accepted.load(Ordering::SeqCst), 1 + 3);
    let site_map = read_site_map(&summary.site_map_path).unwrap();
    let page = site_map.get(&seed).unwrap();
    assert_eq!(page.http_status_code, None);
    assert_eq!(page.content_size_mb, None);
    assert_eq!(summary.stats.degraded_verifications, 1);
}

#[tokio::test]
async fn test_truncated_body_is_degraded_capture() {
    // Promises 500 bytes, sends 16, then closes
    const TRUNCATED: &str = "HTTP/1.1 200 OK\r\n\
        Content-Type: text/html\r\n\
        Content-Length: 500\r\n\
        Connection: close\r\n\r\n\
        <h1>Cut off</h1>";

    let (seed, _) = spawn_raw_server(usize::MAX, TRUNCATED).await;

    let output = TempDir::new().unwrap();
    let mut config = create_test_config(&output);
    config.crawler.max_depth = 0;

    let summary = crawl(&config, &seed, None).await.unwrap();

    assert_eq!(summary.pages, 1);
    assert_eq!(summary.stats.degraded_captures, 1);
    assert_eq!(summary.stats.capture_failures, 0);
    let site_map = read_site_map(&summary.site_map_path).unwrap();
    assert!(site_map.contains(&seed));
}

#[tokio::test]
async fn test_sitemap_merge_adds_unlinked_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", "<h1>Home</h1>".to_string()).await;
    mount_page(
        &mock_server,
        "/orphan",
        r#"<h1>Orphan</h1><a href="/orphan/child">Child</a>"#.to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/orphan/child",
        r#"<h1>Child</h1><a href="/orphan/child/deeper">Deeper</a>"#.to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>{base}/pages.xml</loc></sitemap>
</sitemapindex>"#,
            base = base_url
        )))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pages.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{base}/</loc></url>
  <url><loc>{base}/orphan</loc></url>
</urlset>"#,
            base = base_url
        )))
        .mount(&mock_server)
        .await;

    let output = TempDir::new().unwrap();
    let mut config = create_test_config(&output);
    config.crawler.sitemap = true;

    let summary = crawl(&config, &format!("{}/", base_url), None)
        .await
        .unwrap();

    let site_map = read_site_map(&summary.site_map_path).unwrap();
    assert_eq!(site_map.len(), 3);
    assert!(site_map.contains(&format!("{}/orphan", base_url)));
    assert!(site_map.contains(&format!("{}/orphan/child", base_url)));
    assert!(!site_map.contains(&format!("{}/orphan/child/deeper", base_url)));
    assert_eq!(summary.stats.sitemap_documents, 2);
    assert_eq!(summary.stats.sitemap_pages_added, 2);
}

#[tokio::test]
async fn test_missing_sitemap_does_not_fail_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", "<h1>Home</h1>".to_string()).await;

    let output = TempDir::new().unwrap();
    let mut config = create_test_config(&output);
    config.crawler.sitemap = true;

    let summary = crawl(&config, &format!("{}/", base_url), None)
        .await
        .unwrap();

    assert_eq!(summary.pages, 1);
    assert_eq!(summary.stats.failed_sitemaps, 1);
}

#[tokio::test]
async fn test_duplicate_text_artifacts_removed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let same = "<h1>Same page</h1><p>Identical body.</p>".to_string();
    mount_page(
        &mock_server,
        "/",
        r#"<h1>Home</h1><a href="/a">A</a><a href="/about">About</a>"#.to_string(),
    )
    .await;
    mount_page(&mock_server, "/a", same.clone()).await;
    mount_page(&mock_server, "/about", same).await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(&output);

    let summary = crawl(&config, &format!("{}/", base_url), None)
        .await
        .unwrap();

    let site_map = read_site_map(&summary.site_map_path).unwrap();
    let short = &site_map.get(&format!("{}/a", base_url)).unwrap().text_file_path;
    let long = &site_map
        .get(&format!("{}/about", base_url))
        .unwrap()
        .text_file_path;

    assert!(short.is_file());
    assert!(!long.exists());
    // Dedup never touches the site map itself
    assert_eq!(site_map.len(), 3);
    assert_eq!(summary.dedup.map(|d| d.removed.len()), Some(1));
}
