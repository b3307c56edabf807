use article_harvester::config::{
    Config, ConsumerConfig, LimitsConfig, ProducerConfig, QueueConfig, SiteEntry,
};
use article_harvester::pipeline::{Pipeline, PipelineError};
use article_harvester::ArticleRecord;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Upper bound for any single pipeline run in these tests
const RUN_DEADLINE: Duration = Duration::from_secs(20);

/// Creates a test configuration that treats `/clanek/` pages on the mock
/// server as articles
fn create_test_config(seed: String, output_dir: &Path, consumers: usize) -> Config {
    Config {
        producer: ProducerConfig {
            count: 1,
            produce_interval: 0.01, // Very short for testing
            start_urls: vec![seed],
            fetch_timeout: 2.0,
            put_timeout: 1.0,
        },
        consumer: ConsumerConfig {
            count: consumers,
            consume_interval: 0.01,
            output_dir: output_dir.to_string_lossy().into_owned(),
            read_timeout: 0.1,
            batch_size: 10,
        },
        queue: QueueConfig { max_size: 10 },
        logging: None,
        limits: LimitsConfig::default(),
        sites: vec![SiteEntry {
            domain: "127.0.0.1".to_string(),
            pattern: "^/clanek/".to_string(),
        }],
    }
}

fn article_page(title: &str, body: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(
        r#"<html><head>
        <meta property="article:published_time" content="2024-03-01T08:30:00+01:00">
        </head><body>
        <h1 class="article-title">{}</h1>
        <div class="article-content"><p>{}</p></div>
        {}
        </body></html>"#,
        title, body, anchors
    )
}

async fn mount_page(server: &MockServer, route: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

/// Mounts three interlinked articles plus links the filter must ignore
async fn mount_site(server: &MockServer) {
    mount_page(
        server,
        "/clanek/1",
        article_page(
            "První článek",
            "Příliš žluťoučký kůň úpěl ďábelské ódy",
            &[
                "/clanek/2",
                "/clanek/3",
                "/clanek/foto.jpg",
                "/galerie/1",
                "https://example.com/clanek/9",
            ],
        ),
    )
    .await;
    mount_page(
        server,
        "/clanek/2",
        article_page("Druhý článek", "Obsah dva", &["/clanek/1", "/clanek/3"]),
    )
    .await;
    mount_page(
        server,
        "/clanek/3",
        article_page("Třetí článek", "Obsah tři", &["/clanek/1"]),
    )
    .await;
}

/// Reads every writer snapshot under `output_dir`
fn load_snapshots(output_dir: &Path) -> Vec<ArticleRecord> {
    let mut records = Vec::new();
    for entry in std::fs::read_dir(output_dir).unwrap() {
        let snapshot = entry.unwrap().path().join("articles.json");
        if snapshot.exists() {
            let content = std::fs::read_to_string(&snapshot).unwrap();
            let mut batch: Vec<ArticleRecord> = serde_json::from_str(&content).unwrap();
            records.append(&mut batch);
        }
    }
    records
}

#[tokio::test]
async fn test_full_harvest_single_site() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    let output = TempDir::new().unwrap();

    let seed = format!("{}/clanek/1", mock_server.uri());
    let mut config = create_test_config(seed, output.path(), 2);
    config.limits.max_records = Some(3);

    let pipeline = Pipeline::new(config).unwrap();
    let report = tokio::time::timeout(RUN_DEADLINE, pipeline.run_until(std::future::pending()))
        .await
        .expect("pipeline did not reach the record limit")
        .unwrap();

    assert_eq!(report.records_accepted(), 3);
    assert_eq!(report.duplicates_rejected(), 0);
    assert_eq!(report.writers.len(), 2);

    let records = load_snapshots(output.path());
    let urls: HashSet<String> = records.iter().map(|r| r.url.clone()).collect();
    let expected: HashSet<String> = (1..=3)
        .map(|i| format!("{}/clanek/{}", mock_server.uri(), i))
        .collect();
    assert_eq!(records.len(), 3);
    assert_eq!(urls, expected);

    let first = records
        .iter()
        .find(|r| r.url.ends_with("/clanek/1"))
        .unwrap();
    assert_eq!(first.title, "První článek");
    assert_eq!(first.content, "Příliš žluťoučký kůň úpěl ďábelské ódy");
    assert_eq!(first.created_at, "2024-03-01T08:30:00+01:00");
    let expected_source = url::Url::parse(&mock_server.uri())
        .unwrap()
        .host_str()
        .unwrap()
        .to_string();
    assert!(first.source_website.starts_with(&expected_source));
}

#[tokio::test]
async fn test_snapshot_keeps_non_ascii_text_readable() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    let output = TempDir::new().unwrap();

    let seed = format!("{}/clanek/1", mock_server.uri());
    let mut config = create_test_config(seed, output.path(), 1);
    config.limits.max_records = Some(3);

    let pipeline = Pipeline::new(config).unwrap();
    tokio::time::timeout(RUN_DEADLINE, pipeline.run_until(std::future::pending()))
        .await
        .unwrap()
        .unwrap();

    let snapshot = output.path().join("consumer-1").join("articles.json");
    let raw = std::fs::read_to_string(snapshot).unwrap();
    assert!(raw.contains("Příliš žluťoučký kůň"));
    assert!(!raw.contains("\\u"));
}

#[tokio::test]
async fn test_rerun_does_not_duplicate_records() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server).await;
    let output = TempDir::new().unwrap();
    let seed = format!("{}/clanek/1", mock_server.uri());

    let mut config = create_test_config(seed.clone(), output.path(), 1);
    config.limits.max_records = Some(3);
    let first = tokio::time::timeout(
        RUN_DEADLINE,
        Pipeline::new(config).unwrap().run_until(std::future::pending()),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(first.records_accepted(), 3);

    // Second run over the same output: every record is already stored
    let mut config = create_test_config(seed, output.path(), 1);
    config.limits.max_runtime = Some(1.0);
    let second = tokio::time::timeout(
        RUN_DEADLINE,
        Pipeline::new(config).unwrap().run_until(std::future::pending()),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(second.records_accepted(), 0);
    assert!(second.duplicates_rejected() >= 1);
    assert_eq!(load_snapshots(output.path()).len(), 3);
}

#[tokio::test]
async fn test_failing_seed_yields_empty_snapshots() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    let output = TempDir::new().unwrap();

    let seed = format!("{}/clanek/missing", mock_server.uri());
    let config = create_test_config(seed, output.path(), 2);
    let pipeline = Pipeline::new(config).unwrap();
    let report = tokio::time::timeout(
        RUN_DEADLINE,
        pipeline.run_until(tokio::time::sleep(Duration::from_millis(300))),
    )
    .await
    .unwrap()
    .unwrap();

    assert!(report.fetch_failures() >= 1);
    assert_eq!(report.records_produced(), 0);
    assert!(load_snapshots(output.path()).is_empty());
    for i in 1..=2 {
        let snapshot = output
            .path()
            .join(format!("consumer-{}", i))
            .join("articles.json");
        assert_eq!(std::fs::read_to_string(snapshot).unwrap().trim(), "[]");
    }
}

#[tokio::test]
async fn test_zero_producers_is_rejected() {
    let output = TempDir::new().unwrap();
    let seed = "https://novinky.cz/clanek/1".to_string();
    let mut config = create_test_config(seed, output.path(), 1);
    config.producer.count = 0;

    assert!(matches!(Pipeline::new(config), Err(PipelineError::NoProducers(0))));
}
