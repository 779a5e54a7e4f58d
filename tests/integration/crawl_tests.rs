//! Integration tests for the crawler
//!
//! Crawl behaviour is tested against an in-memory link graph behind a mock
//! fetcher. The HTTP fetcher, the service, and the server are tested
//! end-to-end against wiremock servers.

use async_trait::async_trait;
use sitemap_crawler::config::{CrawlerConfig, FetcherConfig};
use sitemap_crawler::crawler::{
    Coordinator, Fetcher, FetcherFactory, HttpFetcher, HttpFetcherFactory, Page,
};
use sitemap_crawler::server::{self, AppState};
use sitemap_crawler::{CrawlerError, FetchError, SitemapFormat, SitemapService};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A site described as a link graph: page URL -> hrefs on that page
#[derive(Default)]
struct Site {
    pages: HashMap<String, Vec<String>>,
    disallowed: Vec<String>,
    statuses: HashMap<String, u16>,
    hanging: HashSet<String>,
    robots_unavailable: bool,
}

impl Site {
    fn new(pages: &[(&str, &[&str])]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(page, links)| {
                    (page.to_string(), links.iter().map(|l| l.to_string()).collect())
                })
                .collect(),
            ..Default::default()
        }
    }

    fn disallow(mut self, prefix: &str) -> Self {
        self.disallowed.push(prefix.to_string());
        self
    }

    fn status(mut self, url: &str, status: u16) -> Self {
        self.statuses.insert(url.to_string(), status);
        self
    }

    fn hang(mut self, url: &str) -> Self {
        self.hanging.insert(url.to_string());
        self
    }

    fn without_robots(mut self) -> Self {
        self.robots_unavailable = true;
        self
    }
}

/// Decrements the in-flight counter when a fetch finishes or is dropped
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Clone)]
struct MockFetcher {
    site: Arc<Site>,
    in_flight: Arc<AtomicUsize>,
    fetched: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    fn new(site: Site) -> Self {
        Self {
            site: Arc::new(site),
            in_flight: Arc::new(AtomicUsize::new(0)),
            fetched: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn factory(&self) -> Arc<dyn FetcherFactory> {
        let fetcher = self.clone();
        Arc::new(move || -> Arc<dyn Fetcher> { Arc::new(fetcher.clone()) })
    }

    fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &Url, _cancel: &CancellationToken) -> Result<Page, FetchError> {
        let _in_flight = InFlight::enter(&self.in_flight);

        if url.path().ends_with("/robots.txt") {
            if self.site.robots_unavailable {
                return Err(FetchError::InvalidStatus { status: 503 });
            }
            let robots: String = self
                .site
                .disallowed
                .iter()
                .map(|prefix| format!("Disallow: {}\n", prefix))
                .collect();
            return Ok(Page {
                status: 200,
                body: robots.into_bytes(),
            });
        }

        let key = url.to_string();
        self.fetched.lock().unwrap().push(key.clone());

        if self.site.hanging.contains(&key) {
            std::future::pending::<()>().await;
        }
        if let Some(status) = self.site.statuses.get(&key) {
            return Err(FetchError::InvalidStatus { status: *status });
        }

        let mut html = String::from("<html><body>");
        for link in self.site.pages.get(&key).into_iter().flatten() {
            html.push_str(&format!(r#"<a href="{0}">{0}</a>"#, link));
        }
        html.push_str("</body></html>");

        Ok(Page {
            status: 200,
            body: html.into_bytes(),
        })
    }
}

async fn crawl_with(
    base: &str,
    fetcher: &MockFetcher,
    workers: usize,
) -> Result<Vec<String>, CrawlerError> {
    let sitemap = Coordinator::new(Url::parse(base).unwrap(), fetcher.factory())
        .with_workers(workers)
        .with_timeout(Duration::from_secs(10))
        .run(&CancellationToken::new())
        .await?;

    Ok(sitemap
        .entries()
        .iter()
        .map(|e| e.location.to_string())
        .collect())
}

#[tokio::test]
async fn test_single_page_site() {
    let fetcher = MockFetcher::new(Site::new(&[("https://google.com/", &[])]));

    let entries = crawl_with("https://google.com", &fetcher, 3).await.unwrap();
    assert_eq!(entries, vec!["https://google.com/"]);
}

#[tokio::test]
async fn test_two_pages_linking_each_other() {
    for workers in [1, 3, 10] {
        let fetcher = MockFetcher::new(Site::new(&[
            ("https://google.com/", &["https://google.com/1"]),
            ("https://google.com/1", &["https://google.com"]),
        ]));

        let entries = crawl_with("https://google.com", &fetcher, workers).await.unwrap();
        assert_eq!(
            entries,
            vec!["https://google.com/", "https://google.com/1"],
            "workers = {}",
            workers
        );
    }
}

#[tokio::test]
async fn test_robots_disallowed_page_is_skipped() {
    let fetcher = MockFetcher::new(
        Site::new(&[
            ("https://google.com/", &["https://google.com/1"]),
            ("https://google.com/1", &["https://google.com"]),
        ])
        .disallow("/1"),
    );

    let entries = crawl_with("https://google.com", &fetcher, 3).await.unwrap();
    assert_eq!(entries, vec!["https://google.com/"]);
    assert!(!fetcher.fetched().contains(&"https://google.com/1".to_string()));
}

#[tokio::test]
async fn test_disallow_everything() {
    let fetcher = MockFetcher::new(
        Site::new(&[("https://example.com/", &["/a"])]).disallow("/"),
    );

    let entries = crawl_with("https://example.com/", &fetcher, 3).await.unwrap();
    assert!(entries.is_empty());
    assert!(fetcher.fetched().is_empty());
}

#[tokio::test]
async fn test_blank_disallow_excludes_site() {
    let fetcher = MockFetcher::new(
        Site::new(&[("https://example.com/docs", &["/docs/a"])]).disallow(""),
    );

    let entries = crawl_with("https://example.com/docs", &fetcher, 3).await.unwrap();
    assert!(entries.is_empty());
    assert!(fetcher.fetched().is_empty());
}

#[tokio::test]
async fn test_robots_failure_is_not_fatal() {
    let fetcher = MockFetcher::new(
        Site::new(&[("https://example.com/", &["/a"]), ("https://example.com/a", &[])])
            .without_robots(),
    );

    let entries = crawl_with("https://example.com/", &fetcher, 3).await.unwrap();
    assert_eq!(entries, vec!["https://example.com/", "https://example.com/a"]);
}

#[tokio::test]
async fn test_other_hosts_are_not_crawled() {
    let fetcher = MockFetcher::new(Site::new(&[
        (
            "https://example.com/",
            &[
                "https://other.com/page",
                "https://sub.example.com/",
                "mailto:admin@example.com",
                "/local",
            ],
        ),
        ("https://example.com/local", &[]),
    ]));

    let entries = crawl_with("https://example.com/", &fetcher, 3).await.unwrap();
    assert_eq!(entries, vec!["https://example.com/", "https://example.com/local"]);
    assert!(fetcher
        .fetched()
        .iter()
        .all(|u| u.starts_with("https://example.com/")));
}

#[tokio::test]
async fn test_crawl_is_scoped_to_base_path() {
    let fetcher = MockFetcher::new(Site::new(&[
        ("https://example.com/docs", &["/docs/intro", "/blog", "/"]),
        ("https://example.com/docs/intro", &["/docs/guide"]),
        ("https://example.com/docs/guide", &[]),
    ]));

    let entries = crawl_with("https://example.com/docs", &fetcher, 3).await.unwrap();
    assert_eq!(
        entries,
        vec![
            "https://example.com/docs",
            "https://example.com/docs/intro",
            "https://example.com/docs/guide",
        ]
    );
}

#[tokio::test]
async fn test_failed_pages_do_not_stop_the_crawl() {
    let fetcher = MockFetcher::new(
        Site::new(&[
            ("https://example.com/", &["/missing", "/broken", "/ok"]),
            ("https://example.com/ok", &["/after"]),
            ("https://example.com/after", &[]),
        ])
        .status("https://example.com/missing", 404)
        .status("https://example.com/broken", 500),
    );

    let entries = crawl_with("https://example.com/", &fetcher, 2).await.unwrap();

    // Entries are added on acceptance, before the page is fetched
    assert_eq!(entries.len(), 5);
    assert!(entries.contains(&"https://example.com/missing".to_string()));
    assert!(entries.contains(&"https://example.com/broken".to_string()));
    assert!(entries.contains(&"https://example.com/after".to_string()));
}

#[tokio::test]
async fn test_link_variants_are_deduplicated() {
    let fetcher = MockFetcher::new(Site::new(&[
        (
            "https://example.com/",
            &["/a", "/a#top", "//example.com/a", "/a?", "a", "/b//c"],
        ),
        ("https://example.com/a", &["/", "/a"]),
        ("https://example.com/b/c", &[]),
    ]));

    let entries = crawl_with("https://example.com/", &fetcher, 4).await.unwrap();
    assert_eq!(
        entries,
        vec![
            "https://example.com/",
            "https://example.com/a",
            "https://example.com/b/c",
        ]
    );

    // Every accepted page is fetched exactly once
    let mut fetched = fetcher.fetched();
    fetched.sort();
    assert_eq!(
        fetched,
        vec![
            "https://example.com/",
            "https://example.com/a",
            "https://example.com/b/c",
        ]
    );
}

#[tokio::test]
async fn test_chain_is_crawled_in_order() {
    let fetcher = MockFetcher::new(Site::new(&[
        ("https://example.com/", &["/a"]),
        ("https://example.com/a", &["/b"]),
        ("https://example.com/b", &["/c"]),
        ("https://example.com/c", &["/"]),
    ]));

    let entries = crawl_with("https://example.com/", &fetcher, 5).await.unwrap();
    assert_eq!(
        entries,
        vec![
            "https://example.com/",
            "https://example.com/a",
            "https://example.com/b",
            "https://example.com/c",
        ]
    );
}

#[tokio::test]
async fn test_large_cyclic_site() {
    let pages: Vec<(String, Vec<String>)> = (0..60)
        .map(|i| {
            let page = if i == 0 {
                "https://example.com/".to_string()
            } else {
                format!("https://example.com/p{}", i)
            };
            let links = vec![
                format!("/p{}", (i + 1) % 60),
                format!("/p{}", (i * 7) % 60),
                "/".to_string(),
            ];
            (page, links)
        })
        .collect();

    let fetcher = MockFetcher::new(Site {
        pages: pages.into_iter().collect(),
        ..Default::default()
    });

    let entries = crawl_with("https://example.com/", &fetcher, 10).await.unwrap();

    let unique: HashSet<&String> = entries.iter().collect();
    assert_eq!(unique.len(), entries.len());
    assert_eq!(entries[0], "https://example.com/");
    for i in 1..60 {
        assert!(entries.contains(&format!("https://example.com/p{}", i)));
    }

    let fetched = fetcher.fetched();
    let unique: HashSet<&String> = fetched.iter().collect();
    assert_eq!(unique.len(), fetched.len());
}

#[tokio::test]
async fn test_parent_is_listed_before_children() {
    let fetcher = MockFetcher::new(Site::new(&[
        ("https://example.com/", &["/a", "/b"]),
        ("https://example.com/a", &["/a/1", "/a/2"]),
        ("https://example.com/b", &["/b/1"]),
        ("https://example.com/a/1", &["/a/1/x"]),
        ("https://example.com/a/2", &[]),
        ("https://example.com/b/1", &[]),
        ("https://example.com/a/1/x", &[]),
    ]));

    let entries = crawl_with("https://example.com/", &fetcher, 4).await.unwrap();
    assert_eq!(entries.len(), 7);

    let position = |u: &str| entries.iter().position(|e| e == u).unwrap();
    for (parent, child) in [
        ("https://example.com/", "https://example.com/a"),
        ("https://example.com/a", "https://example.com/a/1"),
        ("https://example.com/a/1", "https://example.com/a/1/x"),
        ("https://example.com/b", "https://example.com/b/1"),
    ] {
        assert!(position(parent) < position(child), "{} before {}", parent, child);
    }
}

#[tokio::test]
async fn test_deadline_cancels_crawl() {
    let fetcher = MockFetcher::new(
        Site::new(&[("https://example.com/", &["/slow", "/fast"])])
            .hang("https://example.com/slow"),
    );

    let result = Coordinator::new(Url::parse("https://example.com/").unwrap(), fetcher.factory())
        .with_workers(3)
        .with_timeout(Duration::from_millis(200))
        .run(&CancellationToken::new())
        .await;

    assert!(matches!(result, Err(CrawlerError::Cancelled)));
    // All workers were joined, so no fetch is still running
    assert_eq!(fetcher.in_flight.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_external_cancel_stops_crawl() {
    let fetcher = MockFetcher::new(
        Site::new(&[("https://example.com/", &["/slow"])]).hang("https://example.com/slow"),
    );
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let crawl = Coordinator::new(Url::parse("https://example.com/").unwrap(), fetcher.factory())
        .with_workers(2)
        .run(&cancel);
    let result = tokio::time::timeout(Duration::from_secs(5), crawl)
        .await
        .expect("crawl did not stop after cancel");

    assert!(matches!(result, Err(CrawlerError::Cancelled)));
    assert_eq!(fetcher.in_flight.load(Ordering::SeqCst), 0);
}

// HTTP fetcher, service, and server against a real socket

fn fetcher_config(max_body_bytes: usize) -> FetcherConfig {
    FetcherConfig {
        request_timeout_secs: 5,
        max_body_bytes,
        ..FetcherConfig::default()
    }
}

fn crawler_config() -> CrawlerConfig {
    CrawlerConfig {
        workers: 3,
        timeout_secs: 10,
        queue_capacity: 16,
    }
}

/// Mounts a small site: `/` and `/about` link to each other, `/private` is
/// disallowed, and one link leaves the host
async fn mount_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\r\nDisallow: /private\r\n"),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(
                    r#"<html><body>
                    <a href="/about">About</a>
                    <a href="/private/page">Private</a>
                    <a href="https://elsewhere.example/">Elsewhere</a>
                    </body></html>"#,
                )
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<a href="/">Home</a><a href="about#team">Team</a>"#)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_http_fetcher_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::from_config(&fetcher_config(1024)).unwrap();
    let url = Url::parse(&format!("{}/page", server.uri())).unwrap();
    let page = fetcher.fetch(&url, &CancellationToken::new()).await.unwrap();

    assert_eq!(page.status, 200);
    assert_eq!(page.body, b"hello");
}

#[tokio::test]
async fn test_http_fetcher_reports_status() {
    let server = MockServer::start().await;

    let fetcher = HttpFetcher::from_config(&fetcher_config(1024)).unwrap();
    let url = Url::parse(&format!("{}/nothing-here", server.uri())).unwrap();
    let result = fetcher.fetch(&url, &CancellationToken::new()).await;

    assert!(matches!(result, Err(FetchError::InvalidStatus { status: 404 })));
}

#[tokio::test]
async fn test_http_fetcher_caps_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/big"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(4096)))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::from_config(&fetcher_config(100)).unwrap();
    let url = Url::parse(&format!("{}/big", server.uri())).unwrap();
    let page = fetcher.fetch(&url, &CancellationToken::new()).await.unwrap();

    assert_eq!(page.body.len(), 100);
}

#[tokio::test]
async fn test_service_end_to_end() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let factory = HttpFetcherFactory::new(&fetcher_config(1024 * 1024)).unwrap();
    let service = SitemapService::new(Arc::new(factory), crawler_config());
    let base = Url::parse(&server.uri()).unwrap();

    let plaintext = service
        .generate_sitemap(&CancellationToken::new(), base.clone(), SitemapFormat::Plaintext)
        .await
        .unwrap();
    assert_eq!(
        String::from_utf8(plaintext).unwrap(),
        format!("{0}/\n{0}/about\n", server.uri())
    );

    let xml = service
        .generate_sitemap(&CancellationToken::new(), base, SitemapFormat::Xml)
        .await
        .unwrap();
    let xml = String::from_utf8(xml).unwrap();
    assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
    assert!(xml.contains(&format!("<loc>{}/about</loc>", server.uri())));
    assert!(!xml.contains("private"));
    assert!(!xml.contains("elsewhere"));
}

#[tokio::test]
async fn test_server_routes() {
    let site = MockServer::start().await;
    mount_site(&site).await;

    let factory = HttpFetcherFactory::new(&fetcher_config(1024 * 1024)).unwrap();
    let service = SitemapService::new(Arc::new(factory), crawler_config());
    let state = AppState::new(Arc::new(service), SitemapFormat::Plaintext);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let api = format!("http://{}", listener.local_addr().unwrap());
    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(server::serve(listener, state, shutdown.clone()));

    let client = reqwest::Client::new();

    for probe in ["/readiness", "/liveness"] {
        let response = client.get(format!("{}{}", api, probe)).send().await.unwrap();
        assert_eq!(response.status().as_u16(), 204);
    }

    let response = client.get(format!("{}/sitemap", api)).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let response = client
        .get(format!("{}/sitemap", api))
        .query(&[("url", "::not a url::")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 422);

    let response = client
        .get(format!("{}/sitemap", api))
        .query(&[("url", site.uri().as_str()), ("format", "json")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let response = client
        .get(format!("{}/sitemap", api))
        .query(&[("url", site.uri().as_str()), ("format", "xml")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/xml"
    );
    let body = response.text().await.unwrap();
    assert!(body.contains(&format!("<loc>{}/</loc>", site.uri())));

    drop(client);
    shutdown.cancel();
    handle.await.unwrap().unwrap();
}
