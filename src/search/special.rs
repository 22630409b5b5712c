//! Hand-coded overrides for two known-ambiguous query patterns.
//!
//! Both are checked by the orchestrator before anything else: generic scoring
//! previously produced wrong top results for them (a same-named sensor
//! datasheet outranking the KNX cable datasheet, voice-assistant questions
//! surfacing random hardware manuals).

use crate::model::types::{DocumentRecord, FolderLink, SearchResult};
use crate::search::score::DocumentText;

/// Curated voice-assistant integration documentation.
pub const VOICE_INTEGRATION_URL: &str = "https://hdlautomation.ru/faq/prilozheniya/";

pub const VOICE_KEYWORDS: &[&str] = &["алис", "alisa", "alice", "голосов", "voice"];

pub const INTEGRATION_KEYWORDS: &[&str] = &[
    "интеграци",
    "подключ",
    "настро",
    "связать",
    "объединить",
    "совместн",
    "integration",
    "connect",
    "setup",
];

/// Exact phrasings that always mean "the KNX bus cable".
const KNX_CABLE_PHRASES: &[&str] = &[
    "кабель knx",
    "knx кабель",
    "cable knx",
    "knx cable",
    "knx кабел",
    "ye00820",
    "j-y(st)y",
    "2x2x0,8",
];

/// Markers identifying KNX cable files in `name + path`, most specific first.
const KNX_CABLE_MARKERS: &[&str] = &[
    "ye00820",
    "j-y(st)y",
    "2x2x0,8",
    "knx кабель",
    "кабель knx",
    "knx cable",
    "cable knx",
    "кабель j-y",
    "j-y st y",
];

/// Dedicated ranking for KNX cable candidates: the canonical part number
/// weighs most, then the cable type, the wire gauge, and the plain phrase.
const KNX_RANK: &[(&str, f64)] = &[
    ("ye00820", 1000.0),
    ("j-y(st)y", 500.0),
    ("2x2x0,8", 300.0),
];
const KNX_PHRASE_RANK: f64 = 200.0;

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Special case 1: a voice-assistant query that also asks about
/// integration/setup. The curated link answers it better than any scored
/// search, and better than the AI.
pub fn is_voice_integration_query(query_lower: &str) -> bool {
    contains_any(query_lower, VOICE_KEYWORDS) && contains_any(query_lower, INTEGRATION_KEYWORDS)
}

pub fn voice_integration_result() -> SearchResult {
    SearchResult::folder_link(FolderLink::new(
        "Интеграция с голосовыми помощниками",
        VOICE_INTEGRATION_URL,
    ))
}

/// Special case 2: the query asks for the KNX bus cable.
///
/// Matched against both the raw lowercased query and its normalized form, so
/// transliterated phrasings ("кабель кникс") are caught after
/// canonicalization.
pub fn is_knx_cable_query(query_lower: &str, normalized: &str) -> bool {
    if contains_any(query_lower, KNX_CABLE_PHRASES) || contains_any(normalized, KNX_CABLE_PHRASES) {
        return true;
    }
    let has_knx = |q: &str| q.split_whitespace().any(|w| w.contains("knx"));
    let has_cable = |q: &str| {
        q.split_whitespace()
            .any(|w| w.contains("кабел") || w.contains("cable") || w == "провод")
    };
    (has_knx(query_lower) && has_cable(query_lower)) || (has_knx(normalized) && has_cable(normalized))
}

/// Collect every index entry whose combined name+path text carries a KNX
/// cable marker, ranked by the dedicated weighting.
pub fn find_knx_cable_files<'a, I>(docs: I) -> Vec<SearchResult>
where
    I: IntoIterator<Item = (&'a DocumentRecord, &'a DocumentText)>,
{
    let mut scored: Vec<(f64, &DocumentRecord)> = docs
        .into_iter()
        .filter(|(_, text)| contains_any(&text.search_text, KNX_CABLE_MARKERS))
        .map(|(record, text)| {
            let mut score = 0.0;
            for (marker, weight) in KNX_RANK {
                if text.search_text.contains(marker) {
                    score += weight;
                }
            }
            if ["knx кабель", "кабель knx", "knx cable"]
                .iter()
                .any(|p| text.search_text.contains(p))
            {
                score += KNX_PHRASE_RANK;
            }
            (score, record)
        })
        .collect();

    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.1.name.cmp(&b.1.name))
    });

    scored
        .into_iter()
        .map(|(score, record)| SearchResult::document(record.clone(), score))
        .collect()
}
