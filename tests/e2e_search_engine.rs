//! End-to-end tests for the search engine over a real index file, plus CLI
//! runs of `hdla search`.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use hdl_assistant::model::types::SearchResult;
use hdl_assistant::search::{EngineConfig, SearchEngine};

fn write_index(dir: &Path, entries: &serde_json::Value) -> PathBuf {
    let path = dir.join("file_index.json");
    fs::write(&path, serde_json::to_string_pretty(entries).unwrap()).unwrap();
    path
}

fn sample_index(dir: &Path) -> PathBuf {
    write_index(
        dir,
        &serde_json::json!([
            {
                "name": "YE00820 KNX кабель J-Y(ST)Y, 2x2x0,8 экранированный.pdf",
                "path": "/01. iOT Systems/02. iOT Кабель/YE00820 ru.pdf",
                "norm_name": "ye00820 knx cable j y st y 2x2x0 8"
            },
            {
                "name": "Датчик R5-60G-KNX технический паспорт.pdf",
                "path": "/01. iOT Systems/03. Датчики/R5-60G.pdf",
                "norm_name": "sensor r5 60g knx datasheet"
            },
            {
                "name": "HDL Granit Classic панель.pdf",
                "path": "/02. HDL/Granit Classic.pdf",
                "norm_name": "hdl granit classic panel"
            }
        ]),
    )
}

#[test]
fn knx_cable_query_ranks_part_number_above_sensor() {
    let dir = tempfile::TempDir::new().unwrap();
    let engine = SearchEngine::load(&sample_index(dir.path()), EngineConfig::default());

    let results = engine.hybrid_search("кабель knx", 3);
    assert!(!results.is_empty());
    assert!(results[0].name().contains("YE00820"));
    if let Some(second) = results.get(1) {
        assert!(results[0].relevance().unwrap() > second.relevance().unwrap());
    }
}

#[test]
fn redirect_phrase_wins_regardless_of_index_contents() {
    let dir = tempfile::TempDir::new().unwrap();
    let engine = SearchEngine::load(&sample_index(dir.path()), EngineConfig::default());

    let results = engine.hybrid_search("изикул", 3);
    assert_eq!(results.len(), 1);
    match &results[0] {
        SearchResult::FolderLink { link, .. } => {
            assert!(link.folder_link.contains("EasyCool"));
        }
        other => panic!("expected folder link, got {other:?}"),
    }
}

#[test]
fn empty_index_file_searches_to_empty() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_index(dir.path(), &serde_json::json!([]));
    let engine = SearchEngine::load(&path, EngineConfig::default());
    assert!(engine.hybrid_search("hdl granit", 3).is_empty());
}

#[test]
fn malformed_index_file_degrades_to_empty_engine() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("file_index.json");
    fs::write(&path, "{broken").unwrap();
    let engine = SearchEngine::load(&path, EngineConfig::default());
    assert!(engine.is_empty());
    assert!(engine.hybrid_search("hdl", 3).is_empty());
}

#[test]
fn object_of_objects_index_shape_is_accepted() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_index(
        dir.path(),
        &serde_json::json!({
            "k1": {"name": "HDL Granit.pdf", "path": "/02. HDL/granit.pdf", "norm_name": "hdl granit"}
        }),
    );
    let engine = SearchEngine::load(&path, EngineConfig::default());
    assert_eq!(engine.len(), 1);
    let results = engine.hybrid_search("granit", 3);
    assert!(!results.is_empty());
}

#[test]
fn cli_search_json_returns_folder_link_for_redirect_phrase() {
    let dir = tempfile::TempDir::new().unwrap();
    let index = sample_index(dir.path());

    let output = Command::cargo_bin("hdla")
        .unwrap()
        .args(["search", "изикул", "--json", "--index"])
        .arg(&index)
        .output()
        .unwrap();
    assert!(output.status.success());

    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["kind"], "folder_link");
    assert_eq!(results[0]["is_folder_link"], true);
}

#[test]
fn cli_search_json_ranks_knx_cable_first() {
    let dir = tempfile::TempDir::new().unwrap();
    let index = sample_index(dir.path());

    let output = Command::cargo_bin("hdla")
        .unwrap()
        .args(["search", "кабель knx", "--json", "--index"])
        .arg(&index)
        .output()
        .unwrap();
    assert!(output.status.success());

    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let first = &results.as_array().unwrap()[0];
    assert_eq!(first["kind"], "document");
    assert!(first["name"].as_str().unwrap().contains("YE00820"));
    assert!(first["relevance"].as_f64().unwrap() > 0.0);
}

#[test]
fn cli_search_reports_no_results_for_missing_index() {
    let dir = tempfile::TempDir::new().unwrap();
    Command::cargo_bin("hdla")
        .unwrap()
        .args(["search", "что-нибудь", "--index"])
        .arg(dir.path().join("missing.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("No documents found"));
}
