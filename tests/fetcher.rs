use std::collections::HashMap;
use std::sync::Mutex;

use assert_matches::assert_matches;
use camino::Utf8PathBuf;

use static_lode::app::DocumentationFetcher;
use static_lode::config::{ConfigLoader, FetchConfig, OntologyMap};
use static_lode::error::LodeError;
use static_lode::lode::{LodeClient, LodeResponse};
use static_lode::output::JsonOutput;

#[derive(Default)]
struct StubLode {
    pages: HashMap<String, LodeResponse>,
    calls: Mutex<Vec<String>>,
}

impl StubLode {
    fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            LodeResponse {
                status: 200,
                body: body.to_string(),
            },
        );
        self
    }
}

impl LodeClient for StubLode {
    fn fetch(&self, url: &str) -> Result<LodeResponse, LodeError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| LodeError::LodeHttp(format!("connection refused: {url}")))
    }
}

fn output_dir(temp: &tempfile::TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(temp.path().join("docs")).unwrap()
}

fn ontologies(json: &str) -> OntologyMap {
    ConfigLoader::parse(json).unwrap()
}

#[test]
fn writes_one_file_per_acronym() {
    let temp = tempfile::tempdir().unwrap();
    let config = FetchConfig::new(output_dir(&temp));
    let stub = StubLode::default()
        .with_page(
            "https://w3id.org/lode/owlapi/lang=en/http://purl.org/spar/cito",
            "<html>cito</html>",
        )
        .with_page(
            "https://w3id.org/lode/owlapi/lang=en/http://purl.org/spar/fabio",
            "<html>fabio</html>",
        );
    let map = ontologies(
        r#"{"cito": "http://purl.org/spar/cito", "fabio": "http://purl.org/spar/fabio"}"#,
    );

    let fetcher = DocumentationFetcher::new(stub, &config, map).unwrap();
    let report = fetcher.produce(&JsonOutput).unwrap();

    assert_eq!(report.documents.len(), 2);
    let mut names: Vec<String> = std::fs::read_dir(config.output_dir.as_std_path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["cito.html", "fabio.html"]);
    assert_eq!(
        std::fs::read_to_string(config.output_dir.join("cito.html").as_std_path()).unwrap(),
        "<html>cito</html>"
    );
}

#[test]
fn request_url_uses_owlapi_template() {
    let temp = tempfile::tempdir().unwrap();
    let config = FetchConfig::new(output_dir(&temp));
    let url = "https://w3id.org/lode/owlapi/lang=en/http://purl.org/spar/cito";
    let stub = StubLode::default().with_page(url, "<html/>");
    let fetcher =
        DocumentationFetcher::new(stub, &config, ontologies(r#"{"cito": "http://purl.org/spar/cito"}"#))
            .unwrap();

    let report = fetcher.produce(&JsonOutput).unwrap();
    assert_eq!(report.documents[0].request_url, url);
}

#[test]
fn rerun_produces_identical_bytes() {
    let temp = tempfile::tempdir().unwrap();
    let mut config = FetchConfig::new(output_dir(&temp));
    config.imported_url = Some("../imports".to_string());
    config.string_replace = Some(static_lode::config::DEFAULT_STRING_REPLACE.to_string());
    let body = r#"<link href="https://w3id.org/lode/owl.css"/><a href="http://150.146.207.114/lode/help"/><object data="http://purl.org/spar/cito/a.svg"></object>"#;
    let url = "https://w3id.org/lode/owlapi/lang=en/http://purl.org/spar/cito";
    let path = config.output_dir.join("cito.html");

    let mut outputs = Vec::new();
    for _ in 0..2 {
        let stub = StubLode::default().with_page(url, body);
        let fetcher = DocumentationFetcher::new(
            stub,
            &config,
            ontologies(r#"{"cito": "http://purl.org/spar/cito"}"#),
        )
        .unwrap();
        fetcher.produce(&JsonOutput).unwrap();
        outputs.push(std::fs::read(path.as_std_path()).unwrap());
    }

    assert_eq!(outputs[0], outputs[1]);
    assert_eq!(
        String::from_utf8(outputs[0].clone()).unwrap(),
        r#"<link href="../imports/owl.css"/><a href="../imports/help"/><object data="a.svg"></object>"#
    );
}

#[test]
fn first_failure_aborts_remaining_entries() {
    let temp = tempfile::tempdir().unwrap();
    let config = FetchConfig::new(output_dir(&temp));
    let stub = StubLode::default()
        .with_page("https://w3id.org/lode/owlapi/lang=en/http://example.org/a", "a")
        .with_page("https://w3id.org/lode/owlapi/lang=en/http://example.org/c", "c");
    let map = ontologies(
        r#"{"a": "http://example.org/a", "b": "http://example.org/b", "c": "http://example.org/c"}"#,
    );

    let fetcher = DocumentationFetcher::new(stub, &config, map).unwrap();
    let err = fetcher.produce(&JsonOutput).unwrap_err();

    assert_matches!(err, LodeError::LodeHttp(_));
    assert!(config.output_dir.join("a.html").as_std_path().exists());
    assert!(!config.output_dir.join("c.html").as_std_path().exists());
}

#[test]
fn non_success_status_body_is_still_written() {
    let temp = tempfile::tempdir().unwrap();
    let config = FetchConfig::new(output_dir(&temp));
    let mut stub = StubLode::default();
    stub.pages.insert(
        "https://w3id.org/lode/owlapi/lang=en/http://example.org/missing".to_string(),
        LodeResponse {
            status: 500,
            body: "<html>error</html>".to_string(),
        },
    );

    let fetcher = DocumentationFetcher::new(
        stub,
        &config,
        ontologies(r#"{"missing": "http://example.org/missing"}"#),
    )
    .unwrap();
    let report = fetcher.produce(&JsonOutput).unwrap();

    assert_eq!(report.documents[0].status, 500);
    assert_eq!(
        std::fs::read_to_string(config.output_dir.join("missing.html").as_std_path()).unwrap(),
        "<html>error</html>"
    );
}

#[test]
fn invalid_rule_fails_before_any_request() {
    let temp = tempfile::tempdir().unwrap();
    let mut config = FetchConfig::new(output_dir(&temp));
    config.string_replace = Some("([unclosed->x".to_string());

    let result = DocumentationFetcher::new(
        StubLode::default(),
        &config,
        ontologies(r#"{"cito": "http://purl.org/spar/cito"}"#),
    );

    assert_matches!(result.err(), Some(LodeError::InvalidPattern { .. }));
    assert!(!config.output_dir.as_std_path().exists());
}

#[test]
fn filesystem_failure_aborts_remaining_entries() {
    let temp = tempfile::tempdir().unwrap();
    let config = FetchConfig::new(output_dir(&temp));
    std::fs::create_dir_all(config.output_dir.join("b.html").as_std_path()).unwrap();
    let stub = StubLode::default()
        .with_page("https://w3id.org/lode/owlapi/lang=en/http://example.org/a", "a")
        .with_page("https://w3id.org/lode/owlapi/lang=en/http://example.org/b", "b")
        .with_page("https://w3id.org/lode/owlapi/lang=en/http://example.org/c", "c");
    let map = ontologies(
        r#"{"a": "http://example.org/a", "b": "http://example.org/b", "c": "http://example.org/c"}"#,
    );

    let fetcher = DocumentationFetcher::new(stub, &config, map).unwrap();
    let err = fetcher.produce(&JsonOutput).unwrap_err();

    assert_matches!(err, LodeError::Filesystem(_));
    assert_eq!(
        *fetcher.client().calls.lock().unwrap(),
        vec![
            "https://w3id.org/lode/owlapi/lang=en/http://example.org/a".to_string(),
            "https://w3id.org/lode/owlapi/lang=en/http://example.org/b".to_string(),
        ]
    );
    assert!(config.output_dir.join("a.html").as_std_path().is_file());
    assert!(!config.output_dir.join("c.html").as_std_path().exists());
}
