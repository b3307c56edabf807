use article_harvester::config::load_config_with_hash;
use article_harvester::pipeline::Pipeline;
use article_harvester::url::ArticleFilter;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_config_file_builds_pipeline() {
    let output = TempDir::new().unwrap();
    let file = write_config(&format!(
        r#"
[producer]
count = 2
produce_interval = 0.5
start_urls = ["https://www.novinky.cz/clanek/1", "https://www.idnes.cz/zpravy/2"]

[consumer]
count = 3
consume_interval = 0.5
output_dir = "{}"

[queue]
max_size = 16

[limits]
max_records = 50
"#,
        output.path().display()
    ));

    let (config, hash) = load_config_with_hash(file.path()).unwrap();
    assert_eq!(hash.len(), 64);
    assert_eq!(config.limits.max_records, Some(50));

    // No [[sites]] table: the built-in sites apply
    let filter = ArticleFilter::from_entries(&config.sites).unwrap();
    assert!(filter.is_article_url("https://www.idnes.cz/zpravy/domaci/1"));
    assert!(!filter.is_article_url("https://www.idnes.cz/sport/1"));

    let pipeline = Pipeline::new(config).unwrap();
    assert_eq!(pipeline.queue().capacity(), 16);
    assert!(!pipeline.is_started());
    for i in 1..=3 {
        assert!(output.path().join(format!("consumer-{}", i)).is_dir());
    }
}

#[test]
fn test_config_with_custom_sites() {
    let output = TempDir::new().unwrap();
    let file = write_config(&format!(
        r#"
[producer]
count = 1
produce_interval = 1.0
start_urls = ["https://news.example.org/"]

[consumer]
count = 1
consume_interval = 1.0
output_dir = "{}"

[queue]
max_size = 4

[[sites]]
domain = "example.org"
pattern = "^/stories/\\d+"
"#,
        output.path().display()
    ));

    let (config, _) = load_config_with_hash(file.path()).unwrap();
    let filter = ArticleFilter::from_entries(&config.sites).unwrap();

    assert_eq!(filter.sites().len(), 1);
    assert!(filter.is_article_url("https://news.example.org/stories/42"));
    assert!(!filter.is_article_url("https://news.example.org/about"));
    assert!(!filter.is_article_url("https://www.novinky.cz/clanek/1"));
}

#[test]
fn test_invalid_config_file_is_rejected() {
    let file = write_config(
        r#"
[producer]
count = 1
produce_interval = 1.0
start_urls = ["ftp://example.org/file"]

[consumer]
count = 1
consume_interval = 1.0
output_dir = "out"

[queue]
max_size = 4
"#,
    );

    assert!(load_config_with_hash(file.path()).is_err());
}
