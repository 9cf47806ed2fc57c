use docsearch_config::{DEFAULT_ENDPOINT, DocSearchConfigLoader};
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn test_config_load() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
endpoint: "https://${DOCS_HOST}/search?affiliate=docs&query="
format: json
timeout_secs: 10
selectors:
  result: ".content-block-item.result"
  link: "a.title"
launchers:
  linux: ["xdg-open"]
logging:
  dir: "/tmp/docsearch-logs"
  filter: "debug"
  "#;
    let p = write_yaml(&tmp, "docsearch.yaml", file_yaml);

    temp_env::with_var("DOCS_HOST", Some("search.example"), || {
        let config = DocSearchConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load docsearch config");

        assert_eq!(
            config.endpoint,
            "https://search.example/search?affiliate=docs&query="
        );
        assert_eq!(config.format, "json");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.selectors.link, "a.title");
        assert_eq!(config.logging.dir.as_deref(), Some("/tmp/docsearch-logs"));
        assert_eq!(config.logging.filter, "debug");
    });
}

#[test]
#[serial]
fn environment_wins_over_file() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(
        &tmp,
        "docsearch.yaml",
        "format: json\ntimeout_secs: 10\nendpoint: \"https://file.example/?q=\"\n",
    );

    temp_env::with_vars(
        [
            ("DOCSEARCH__FORMAT", Some("human")),
            ("DOCSEARCH__TIMEOUT_SECS", Some("3")),
            ("DOCSEARCH__SELECTORS__RESULT", Some(".hit")),
        ],
        || {
            let config = DocSearchConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("load docsearch config");

            assert_eq!(config.format, "human");
            assert_eq!(config.timeout_secs, 3);
            assert_eq!(config.selectors.result, ".hit");
            assert_eq!(config.selectors.link, "a");
            assert_eq!(config.endpoint, "https://file.example/?q=");
        },
    );
}

#[test]
#[serial]
fn later_files_override_earlier_ones() {
    let tmp = TempDir::new().unwrap();
    let base = write_yaml(&tmp, "base.yaml", "format: json\ntimeout_secs: 12\n");
    let local = write_yaml(&tmp, "local.yaml", "format: human\n");

    let config = DocSearchConfigLoader::new()
        .with_file(base)
        .with_optional_file(local)
        .with_optional_file(tmp.path().join("absent.yaml"))
        .load()
        .expect("load docsearch config");

    assert_eq!(config.format, "human");
    assert_eq!(config.timeout_secs, 12);
    assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
}

#[test]
#[serial]
fn malformed_file_is_reported() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "docsearch.yaml", "timeout_secs: [not, a, number]\n");

    let err = DocSearchConfigLoader::new().with_file(p).load();
    assert!(err.is_err());
}
