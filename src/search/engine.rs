//! Hybrid search over the in-memory file index.
//!
//! Stage order is fixed: special cases → redirect table → generic scored
//! search (with a coarse post-filter) → legacy three-tier fallback. The first
//! stage producing a non-empty result list wins. Every failure mode degrades
//! to "fewer or no results"; the engine has no fatal error path.

use std::path::Path;

use tracing::{debug, info};

use crate::indexer;
use crate::model::types::{DocumentRecord, SearchResult};
use crate::search::normalize::{Normalizer, DEFAULT_SUBSTITUTIONS};
use crate::search::redirect::{RedirectTable, RedirectTarget};
use crate::search::score::{self, DocumentText};
use crate::search::special;
use crate::search::synonyms::SynonymTable;

/// Default result-list size, matching the bot's three-document replies.
pub const DEFAULT_LIMIT: usize = 3;

/// Injected configuration: all rule tables are data, constructed once at
/// startup and owned by the engine, so tests can swap in fixture tables.
pub struct EngineConfig {
    pub substitutions: Vec<(String, String)>,
    pub synonyms: SynonymTable,
    pub redirects: RedirectTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            substitutions: DEFAULT_SUBSTITUTIONS.clone(),
            synonyms: SynonymTable::default(),
            redirects: RedirectTable::default(),
        }
    }
}

struct IndexedDocument {
    record: DocumentRecord,
    text: DocumentText,
}

pub struct SearchEngine {
    docs: Vec<IndexedDocument>,
    normalizer: Normalizer,
    synonyms: SynonymTable,
    redirects: RedirectTable,
}

impl SearchEngine {
    /// Load the flat JSON index and build the engine. A missing or malformed
    /// index file yields an empty engine (all searches return no documents),
    /// never an error.
    pub fn load(index_path: &Path, config: EngineConfig) -> Self {
        let records = indexer::load_file_index(index_path);
        Self::from_records(records, config)
    }

    pub fn from_records(records: Vec<DocumentRecord>, config: EngineConfig) -> Self {
        let docs = records
            .into_iter()
            .map(|record| {
                let text = DocumentText::new(&record.name, &record.path, &record.norm_name);
                IndexedDocument { record, text }
            })
            .collect();
        Self {
            docs,
            normalizer: Normalizer::new(&config.substitutions),
            synonyms: config.synonyms,
            redirects: config.redirects,
        }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// The consumer-facing decision procedure.
    pub fn hybrid_search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        let raw = query.trim();
        if raw.is_empty() {
            return Vec::new();
        }
        let query_lower = raw.to_lowercase();
        let normalized = self.normalizer.normalize(raw);

        // 1. Voice-assistant integration: one curated link.
        if special::is_voice_integration_query(&query_lower) {
            info!(stage = "special_voice", query = raw, "hybrid_stage");
            return vec![special::voice_integration_result()];
        }

        // 2. KNX cable: dedicated marker scan with its own ranking.
        if special::is_knx_cable_query(&query_lower, &normalized) {
            let mut results = special::find_knx_cable_files(
                self.docs.iter().map(|d| (&d.record, &d.text)),
            );
            if !results.is_empty() {
                info!(stage = "special_knx", query = raw, hits = results.len(), "hybrid_stage");
                results.truncate(limit);
                return results;
            }
        }

        // 3. Curated folder redirects.
        if let Some(target) = self.redirects.check(&normalized) {
            info!(stage = "redirect", query = raw, "hybrid_stage");
            return render_redirect(target);
        }

        // 4. Generic scored search, post-filtered.
        let candidates = self.search(raw, limit * 2);
        let filtered = filter_obviously_irrelevant(candidates, &query_lower, &normalized);
        if !filtered.is_empty() {
            info!(stage = "scored", query = raw, hits = filtered.len(), "hybrid_stage");
            let mut results = filtered;
            results.truncate(limit);
            return results;
        }

        // 5. Legacy fallback.
        let mut results = self.legacy_search(&normalized);
        info!(stage = "legacy", query = raw, hits = results.len(), "hybrid_stage");
        results.truncate(limit);
        results
    }

    /// Generic synonym-expanded, scored search.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        if query.trim().is_empty() || self.docs.is_empty() {
            return Vec::new();
        }
        let normalized = self.normalizer.normalize(query);
        let variants = self.synonyms.expand(&normalized);
        if variants.is_empty() {
            return Vec::new();
        }
        debug!(query, ?variants, "expanded_query");

        let mut scored: Vec<(f64, &IndexedDocument)> = self
            .docs
            .iter()
            .filter_map(|doc| {
                let relevance =
                    score::score(&doc.text, variants.iter().map(String::as_str));
                (relevance > 0.0).then_some((relevance, doc))
            })
            .collect();

        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.record.name.cmp(&b.1.record.name))
        });

        for (i, (relevance, doc)) in scored.iter().take(5).enumerate() {
            debug!(rank = i + 1, name = %doc.record.name, relevance, "top_candidate");
        }

        scored
            .into_iter()
            .take(limit)
            .map(|(relevance, doc)| SearchResult::document(doc.record.clone(), relevance))
            .collect()
    }

    /// Three-tier fallback kept from the pre-scoring search: exact
    /// all-keywords, then ≥2-keyword combinations, then single important
    /// keywords. Operates on `norm_name` only.
    fn legacy_search(&self, normalized: &str) -> Vec<SearchResult> {
        let keywords: Vec<&str> = normalized
            .split_whitespace()
            .filter(|w| w.len() >= 2)
            .collect();
        if keywords.is_empty() {
            return Vec::new();
        }

        // Tier 1: every keyword present.
        let exact: Vec<SearchResult> = self
            .docs
            .iter()
            .filter(|d| keywords.iter().all(|kw| d.text.norm_name.contains(kw)))
            .map(|d| SearchResult::document(d.record.clone(), keywords.len() as f64))
            .collect();
        if !exact.is_empty() {
            debug!(tier = 1, hits = exact.len(), "legacy_tier");
            return exact;
        }

        // Tier 2: at least two keywords, weighted.
        if keywords.len() >= 2 {
            let mut combo: Vec<(f64, &IndexedDocument)> = self
                .docs
                .iter()
                .filter_map(|d| {
                    let norm = &d.text.norm_name;
                    let mut score = 0.0;
                    if norm.contains("alisa") && norm.contains("knx") {
                        score += 100.0;
                    }
                    let matched = keywords.iter().filter(|kw| norm.contains(*kw)).count();
                    if matched >= 2 {
                        score += matched as f64 * 20.0;
                    }
                    let matched_in_name = keywords
                        .iter()
                        .filter(|kw| d.text.name.contains(*kw))
                        .count();
                    score += matched_in_name as f64 * 10.0;
                    (score > 0.0).then_some((score, d))
                })
                .collect();
            if !combo.is_empty() {
                combo.sort_by(|a, b| {
                    b.0.partial_cmp(&a.0)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then_with(|| a.1.record.name.cmp(&b.1.record.name))
                });
                debug!(tier = 2, hits = combo.len(), "legacy_tier");
                return combo
                    .into_iter()
                    .map(|(s, d)| SearchResult::document(d.record.clone(), s))
                    .collect();
            }
        }

        // Tier 3: single important keywords.
        const IMPORTANT: &[&str] = &["alisa", "knx", "integration", "connect", "gateway", "voice"];
        let present: Vec<&&str> = IMPORTANT
            .iter()
            .filter(|kw| normalized.contains(**kw))
            .collect();
        if present.is_empty() {
            return Vec::new();
        }
        let mut important: Vec<(f64, &IndexedDocument)> = self
            .docs
            .iter()
            .filter_map(|d| {
                let score = present
                    .iter()
                    .filter(|kw| d.text.norm_name.contains(***kw))
                    .count() as f64
                    * 30.0;
                (score > 0.0).then_some((score, d))
            })
            .collect();
        important.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.record.name.cmp(&b.1.record.name))
        });
        debug!(tier = 3, hits = important.len(), "legacy_tier");
        important
            .into_iter()
            .map(|(s, d)| SearchResult::document(d.record.clone(), s))
            .collect()
    }
}

fn render_redirect(target: RedirectTarget) -> Vec<SearchResult> {
    match target {
        RedirectTarget::Single(link) => vec![SearchResult::folder_link(link)],
        RedirectTarget::Pair(a, b) => vec![
            SearchResult::folder_link(a),
            SearchResult::folder_link(b),
        ],
    }
}

/// Coarse post-filter over generic results; a rejection filter, not a score
/// adjustment.
fn filter_obviously_irrelevant(
    results: Vec<SearchResult>,
    query_lower: &str,
    normalized: &str,
) -> Vec<SearchResult> {
    let integration_query = ["integration", "connect", "setup", "protocol", "api"]
        .iter()
        .any(|kw| normalized.contains(kw))
        || ["интеграци", "подключ", "настро", "протокол"]
            .iter()
            .any(|kw| query_lower.contains(kw));
    let controller_query = normalized.contains("controller");

    if !integration_query && !controller_query {
        return results;
    }

    results
        .into_iter()
        .filter(|r| {
            let name = r.name().to_lowercase();
            if integration_query
                && ["паспорт", "passport", "datasheet", "технич", "r5-"]
                    .iter()
                    .any(|m| name.contains(m))
            {
                return false;
            }
            if controller_query
                && ["датчик", "sensor", "реле", "relay", "кабель", "cable"]
                    .iter()
                    .any(|m| name.contains(m))
            {
                return false;
            }
            true
        })
        .collect()
}

/// True when every result looks like a technical datasheet rather than a
/// guide; the bot then offers the AI assistant as a follow-up.
pub fn has_only_technical_files(results: &[SearchResult]) -> bool {
    if results.is_empty() || results[0].is_folder_link() {
        return false;
    }
    const TECHNICAL: &[&str] = &[
        "r5-",
        "датчик",
        "sensor",
        "техническ",
        "паспорт",
        "technical",
        "datasheet",
    ];
    results.iter().all(|r| {
        let name = r.name().to_lowercase();
        TECHNICAL.iter().any(|p| name.contains(p))
    })
}
