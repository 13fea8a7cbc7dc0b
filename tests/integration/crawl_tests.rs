//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small knowledge base and run the
//! full catalog → listing → article → image cycle against a temp directory.

use kb_mirror::config::{Config, CrawlerConfig, OutputConfig, SelectorConfig, SiteConfig};
use kb_mirror::crawler::Crawler;
use kb_mirror::output::CrawlReport;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SESSION_ID: &str = "test-session";

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, root_dir: &Path) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            catalog_url: Some(format!("{}/catalog", base_url)),
            cookie_name: "PHPSESSID".to_string(),
            session_id: None,
        },
        crawler: CrawlerConfig {
            request_timeout_secs: 5,
            category_delay_ms: 0,
            user_agent: "kb-mirror-test".to_string(),
        },
        output: OutputConfig {
            root_dir: root_dir.to_string_lossy().into_owned(),
            images_dir: "images".to_string(),
            log_file: None,
        },
        selectors: SelectorConfig::default(),
    }
}

async fn run_crawl(config: &Config) -> CrawlReport {
    Crawler::new(config, SESSION_ID)
        .expect("crawler should build")
        .run()
        .await
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

fn catalog_page(categories: &[&str]) -> String {
    let links: String = categories
        .iter()
        .map(|href| format!(r#"<a class="knowBaze_section_elem" href="{}">cat</a>"#, href))
        .collect();

    format!(
        r#"<html><body>
        <div class="knowBaze">
          <a class="kb-title-link" href="/kb/s/1">Сеть</a>
          {}
        </div>
        </body></html>"#,
        links
    )
}

fn listing_page(articles: &[&str], next_offset: Option<u64>) -> String {
    let links: String = articles
        .iter()
        .map(|href| format!(r#"<a class="kb-artile-list__item" href="{}">article</a>"#, href))
        .collect();

    let load_more = match next_offset {
        Some(offset) => format!(
            r#"<input type="hidden" name="offset_knowledge" value="{}">
            <a class="btn btn--gray" onclick="showMoreKnowledge()">Показать ещё</a>"#,
            offset
        ),
        None => String::new(),
    };

    format!("<html><body>{}{}</body></html>", links, load_more)
}

fn article_page(crumbs: &[&str], title: &str, content: &str) -> String {
    let crumbs: String = crumbs
        .iter()
        .map(|crumb| format!(r#"<li class="breadcrumbs__item"><a>{}</a></li>"#, crumb))
        .collect();

    format!(
        r#"<html><body>
        <ul>{}</ul>
        <h1 class="kb-article-title">{}</h1>
        <div class="kb-article-content">{}</div>
        </body></html>"#,
        crumbs, title, content
    )
}

fn image() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0])
        .insert_header("content-type", "image/jpeg")
}

fn article_file(root: &Path, segments: &[&str], title: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for segment in segments {
        path.push(segment);
    }
    path.push(format!("{}.txt", title));
    path
}

/// Mounts a catalog with two categories:
/// - `/kb/c/1` lists two pages (`/kb/item/1`, `/kb/item/2`, then `/kb/item/3`)
/// - `/kb/c/2` lists `/kb/item/4` and repeats `/kb/item/1`
async fn mount_knowledge_base(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/catalog"))
        .respond_with(html(catalog_page(&["/kb/c/1", "/kb/c/2"])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/kb/c/1"))
        .and(query_param("offset", "2"))
        .respond_with(html(listing_page(&["/kb/item/3"], None)))
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/kb/c/1"))
        .respond_with(html(listing_page(&["/kb/item/1", "/kb/item/2"], Some(2))))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/kb/c/2"))
        .respond_with(html(listing_page(&["/kb/item/4", "/kb/item/1"], None)))
        .mount(server)
        .await;

    mount_article_one(server, "Откройте настройки").await;

    Mock::given(method("GET"))
        .and(path("/kb/item/2"))
        .respond_with(html(article_page(
            &["База", "Сеть", "VPN"],
            "Второй шаг",
            "<p>Без картинок</p>",
        )))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/kb/item/3"))
        .respond_with(html(article_page(
            &["База", "Сеть", "VPN"],
            "Третий шаг",
            "<p>Последний</p>",
        )))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/kb/item/4"))
        .respond_with(html(article_page(
            &["База", "Почта", "SMTP"],
            "Отправка",
            "<p>Порт 25</p>",
        )))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/upload/a.jpg"))
        .respond_with(image())
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/upload/b.jpg"))
        .respond_with(image())
        .mount(server)
        .await;
}

async fn mount_article_one(server: &MockServer, first_paragraph: &str) {
    Mock::given(method("GET"))
        .and(path("/kb/item/1"))
        .respond_with(html(article_page(
            &["База", "Сеть", "VPN"],
            "Настройка VPN",
            &format!(
                r#"<p>{}</p><p><img src="/upload/a.jpg"> Нажмите кнопку</p><p>Готово <img src="/upload/b.jpg"></p>"#,
                first_paragraph
            ),
        )))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_writes_every_article() {
    let server = MockServer::start().await;
    mount_knowledge_base(&server).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path());

    let report = run_crawl(&config).await;

    assert_eq!(report.categories, 2);
    assert_eq!(report.article_links, 5);
    assert_eq!(report.written, 4);
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(report.processed, 4);
    assert_eq!(report.images_downloaded, 2);

    let first = article_file(dir.path(), &["База", "Сеть", "VPN"], "Настройка VPN");
    let content = std::fs::read_to_string(&first).unwrap();
    let expected = format!(
        "# Метаданные\n\
         # URL: {}/kb/item/1\n\
         # Название: Настройка VPN\n\
         # База: База\n\
         # Раздел: Сеть\n\
         # Категория: VPN\n\
         \n\
         # Содержание\n\
         \n\
         Откройте настройки\n\n$1 Нажмите кнопку\n\nГотово $2",
        server.uri()
    );
    assert_eq!(content, expected);

    assert!(dir.path().join("images").join("Настройка VPN-1.jpg").is_file());
    assert!(dir.path().join("images").join("Настройка VPN-2.jpg").is_file());
    assert!(article_file(dir.path(), &["База", "Сеть", "VPN"], "Третий шаг").is_file());
    assert!(article_file(dir.path(), &["База", "Почта", "SMTP"], "Отправка").is_file());
}

#[tokio::test]
async fn test_second_run_writes_nothing() {
    let server = MockServer::start().await;
    mount_knowledge_base(&server).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path());

    let first = run_crawl(&config).await;
    assert_eq!(first.written, 4);

    let path = article_file(dir.path(), &["База", "Сеть", "VPN"], "Настройка VPN");
    let modified = std::fs::metadata(&path).unwrap().modified().unwrap();

    let second = run_crawl(&config).await;
    assert_eq!(second.written, 0);
    assert_eq!(second.fresh, 4);
    assert_eq!(second.images_downloaded, 0);
    assert_eq!(
        std::fs::metadata(&path).unwrap().modified().unwrap(),
        modified
    );
}

#[tokio::test]
async fn test_pagination_stops_on_repeated_offset() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/catalog"))
        .respond_with(html(catalog_page(&["/kb/c/1"])))
        .mount(&server)
        .await;

    // The second page points at itself again
    Mock::given(method("GET"))
        .and(path("/kb/c/1"))
        .and(query_param("offset", "10"))
        .respond_with(html(listing_page(&["/kb/item/2"], Some(10))))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/kb/c/1"))
        .respond_with(html(listing_page(&["/kb/item/1"], Some(10))))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path());
    let crawler = Crawler::new(&config, SESSION_ID).unwrap();

    let category = Url::parse(&format!("{}/kb/c/1", server.uri())).unwrap();
    let links = crawler.collect_articles(&category).await;

    let paths: Vec<&str> = links.iter().map(Url::path).collect();
    assert_eq!(paths, vec!["/kb/item/1", "/kb/item/2"]);
}

#[tokio::test]
async fn test_failing_category_does_not_abort_crawl() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/catalog"))
        .respond_with(html(catalog_page(&["/kb/c/broken", "/kb/c/2"])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/kb/c/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/kb/c/2"))
        .respond_with(html(listing_page(&["/kb/item/4", "/kb/item/gone"], None)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/kb/item/4"))
        .respond_with(html(article_page(
            &["База", "Почта", "SMTP"],
            "Отправка",
            "<p>Порт 25</p>",
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/kb/item/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path());

    let report = run_crawl(&config).await;

    assert_eq!(report.categories, 2);
    assert_eq!(report.written, 1);
    assert_eq!(report.failed, 1);
    assert!(article_file(dir.path(), &["База", "Почта", "SMTP"], "Отправка").is_file());
}

#[tokio::test]
async fn test_changed_article_is_rewritten() {
    let server = MockServer::start().await;
    mount_knowledge_base(&server).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path());
    run_crawl(&config).await;

    server.reset().await;
    mount_article_one(&server, "Откройте новые настройки").await;
    Mock::given(method("GET"))
        .and(path("/upload/a.jpg"))
        .respond_with(image())
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/upload/b.jpg"))
        .respond_with(image())
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/kb/item/1", server.uri())).unwrap();
    let report = Crawler::new(&config, SESSION_ID)
        .unwrap()
        .run_single(&url)
        .await;

    assert_eq!(report.written, 1);
    assert_eq!(report.images_downloaded, 2);

    let path = article_file(dir.path(), &["База", "Сеть", "VPN"], "Настройка VPN");
    let content = std::fs::read_to_string(path).unwrap();
    assert!(content.ends_with("Откройте новые настройки\n\n$1 Нажмите кнопку\n\nГотово $2"));
}

#[tokio::test]
async fn test_missing_image_is_downloaded_again() {
    let server = MockServer::start().await;
    mount_knowledge_base(&server).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path());
    run_crawl(&config).await;

    let second_image = dir.path().join("images").join("Настройка VPN-2.jpg");
    std::fs::remove_file(&second_image).unwrap();

    server.reset().await;
    mount_article_one(&server, "Откройте настройки").await;
    Mock::given(method("GET"))
        .and(path("/upload/a.jpg"))
        .respond_with(image())
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/upload/b.jpg"))
        .respond_with(image())
        .expect(1)
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/kb/item/1", server.uri())).unwrap();
    let report = Crawler::new(&config, SESSION_ID)
        .unwrap()
        .run_single(&url)
        .await;

    assert_eq!(report.written, 1);
    assert_eq!(report.images_downloaded, 1);
    assert!(second_image.is_file());

    let path = article_file(dir.path(), &["База", "Сеть", "VPN"], "Настройка VPN");
    let content = std::fs::read_to_string(path).unwrap();
    assert!(content.ends_with("Откройте настройки\n\n$1 Нажмите кнопку\n\nГотово $2"));

    server.verify().await;
}

#[tokio::test]
async fn test_short_breadcrumb_uses_fallback_segments() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/kb/item/7"))
        .respond_with(html(article_page(&["Справка"], "Кратко", "<p>Текст</p>")))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path());

    let url = Url::parse(&format!("{}/kb/item/7", server.uri())).unwrap();
    let report = Crawler::new(&config, SESSION_ID)
        .unwrap()
        .run_single(&url)
        .await;

    assert_eq!(report.written, 1);

    let path = article_file(
        dir.path(),
        &["Справка", "Без раздела", "Без подраздела"],
        "Кратко",
    );
    let content = std::fs::read_to_string(path).unwrap();
    assert!(content.contains("# Раздел: Без раздела\n# Категория: Без подраздела\n"));
}

#[tokio::test]
async fn test_unsafe_names_are_sanitized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/kb/item/8"))
        .respond_with(html(article_page(
            &["База", "TCP/IP", "Вопросы?"],
            "Что такое a/b: c?",
            r#"<p><img src="/upload/c.jpg"></p>"#,
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/upload/c.jpg"))
        .respond_with(image())
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path());

    let url = Url::parse(&format!("{}/kb/item/8", server.uri())).unwrap();
    let report = Crawler::new(&config, SESSION_ID)
        .unwrap()
        .run_single(&url)
        .await;

    assert_eq!(report.written, 1);
    assert!(article_file(dir.path(), &["База", "TCP_IP", "Вопросы_"], "Что такое a_b_ c_").is_file());
    assert!(dir.path().join("images").join("Что такое a_b_ c_-1.jpg").is_file());
}

#[tokio::test]
async fn test_session_cookie_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/catalog"))
        .and(wiremock::matchers::header("cookie", "PHPSESSID=test-session"))
        .respond_with(html(catalog_page(&["/kb/c/1"])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path());
    let categories = Crawler::new(&config, SESSION_ID)
        .unwrap()
        .collect_categories()
        .await;

    assert_eq!(categories.len(), 1);
}

#[tokio::test]
async fn test_needs_update_follows_source_changes() {
    use kb_mirror::crawler::{CompiledSelectors, ContentExtractor, PageFetcher, StalenessChecker};
    use kb_mirror::storage::ArticleStore;

    let server = MockServer::start().await;
    mount_knowledge_base(&server).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path());
    let url = Url::parse(&format!("{}/kb/item/1", server.uri())).unwrap();

    let fetcher = PageFetcher::from_config(&config, SESSION_ID).unwrap();
    let selectors = CompiledSelectors::from_config(&config.selectors).unwrap();
    let extractor = ContentExtractor::new(&selectors);
    let store = ArticleStore::from_config(&config.output);
    let checker = StalenessChecker::new(&store);

    assert!(checker.needs_update(&fetcher, &extractor, &url).await);

    Crawler::new(&config, SESSION_ID)
        .unwrap()
        .run_single(&url)
        .await;
    assert!(!checker.needs_update(&fetcher, &extractor, &url).await);

    server.reset().await;
    mount_article_one(&server, "Откройте другие настройки").await;
    assert!(checker.needs_update(&fetcher, &extractor, &url).await);

    let second_image = dir.path().join("images").join("Настройка VPN-2.jpg");
    std::fs::remove_file(&second_image).unwrap();
    server.reset().await;
    mount_article_one(&server, "Откройте настройки").await;
    assert!(checker.needs_update(&fetcher, &extractor, &url).await);
}

#[tokio::test]
async fn test_same_title_articles_do_not_share_images() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/catalog"))
        .respond_with(html(catalog_page(&["/kb/c/1", "/kb/c/2"])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/kb/c/1"))
        .respond_with(html(listing_page(&["/kb/item/a"], None)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/kb/c/2"))
        .respond_with(html(listing_page(&["/kb/item/b"], None)))
        .mount(&server)
        .await;

    for (item, category, image_path, byte) in [
        ("a", "VPN", "/upload/a.jpg", 0xAAu8),
        ("b", "DNS", "/upload/b.jpg", 0xBBu8),
    ] {
        Mock::given(method("GET"))
            .and(path(format!("/kb/item/{}", item)))
            .respond_with(html(article_page(
                &["База", "Сеть", category],
                "Обзор",
                &format!(r#"<p>{} <img src="{}"></p>"#, item.to_uppercase(), image_path),
            )))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(image_path))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![byte; 4]))
            .mount(&server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), dir.path());
    let image = dir.path().join("images").join("Обзор-1.jpg");

    let first = run_crawl(&config).await;
    assert_eq!(first.written, 1);
    assert_eq!(first.failed, 1);
    assert_eq!(std::fs::read(&image).unwrap(), vec![0xAA; 4]);

    let stored = article_file(dir.path(), &["База", "Сеть", "VPN"], "Обзор");
    assert!(std::fs::read_to_string(&stored).unwrap().ends_with("A $1"));
    assert!(!article_file(dir.path(), &["База", "Сеть", "DNS"], "Обзор").exists());

    let second = run_crawl(&config).await;
    assert_eq!(second.fresh, 1);
    assert_eq!(second.written, 0);
    assert_eq!(second.failed, 1);
    assert_eq!(std::fs::read(&image).unwrap(), vec![0xAA; 4]);
}
