//! Flat JSON file index: tolerant loading and the offline builder.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info, warn};

use crate::disk::DiskClient;
use crate::model::types::DocumentRecord;
use crate::search::normalize::Normalizer;

/// Load the index from disk.
///
/// The store may be a JSON array of records or an object-of-objects; both
/// shapes are accepted. A missing or malformed file yields an empty index
/// (searches then return no documents); the engine never fails to start
/// because of the index. Entries without `name`/`path` are skipped.
pub fn load_file_index(path: &Path) -> Vec<DocumentRecord> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(path = %path.display(), %err, "index file not readable, starting empty");
            return Vec::new();
        }
    };

    let value: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            error!(path = %path.display(), %err, "index file is not valid JSON, starting empty");
            return Vec::new();
        }
    };

    let entries: Vec<serde_json::Value> = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        other => {
            error!(
                path = %path.display(),
                shape = other.to_string(),
                "index file has unexpected top-level shape, starting empty"
            );
            return Vec::new();
        }
    };

    let mut records = Vec::with_capacity(entries.len());
    for entry in entries {
        match serde_json::from_value::<DocumentRecord>(entry) {
            Ok(record) => records.push(record),
            Err(err) => warn!(%err, "skipping malformed index entry"),
        }
    }
    info!(path = %path.display(), documents = records.len(), "file index loaded");
    records
}

/// Crawl the disk folder tree and write the flat index.
///
/// Iterative walk with a visited set (the original tree contains folder
/// cycles through shared links); only `.pdf` entries are indexed. The
/// normalized name is computed from the file name without its extension.
pub async fn build_index(
    disk: &DiskClient,
    base_path: &str,
    out: &Path,
    normalizer: &Normalizer,
) -> Result<usize> {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg}").expect("valid progress template"),
    );

    let mut all_files: Vec<DocumentRecord> = Vec::new();
    let mut stack = vec![base_path.to_string()];
    let mut visited: HashSet<String> = HashSet::new();

    while let Some(current) = stack.pop() {
        if !visited.insert(current.clone()) {
            continue;
        }
        bar.set_message(format!("{} ({} pdf)", current, all_files.len()));
        bar.tick();

        let items = match disk.get_folder_contents(&current).await {
            Ok(items) => items,
            Err(err) => {
                warn!(folder = %current, %err, "skipping unreadable folder");
                continue;
            }
        };

        for item in items {
            let full_path = format!("{}/{}", current.trim_end_matches('/'), item.name);
            if item.is_dir() {
                stack.push(full_path);
            } else if item.name.to_lowercase().ends_with(".pdf") {
                let stem = item
                    .name
                    .rsplit_once('.')
                    .map(|(stem, _)| stem)
                    .unwrap_or(&item.name);
                all_files.push(DocumentRecord {
                    norm_name: normalizer.normalize(stem),
                    name: item.name,
                    path: full_path,
                });
            }
        }
    }
    bar.finish_and_clear();

    if let Some(parent) = out.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating index directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&all_files)?;
    tokio::fs::write(out, json)
        .await
        .with_context(|| format!("writing {}", out.display()))?;

    info!(documents = all_files.len(), out = %out.display(), "file index written");
    Ok(all_files.len())
}
