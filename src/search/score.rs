//! Heuristic relevance scoring of one document against one query.
//!
//! Signals are additive and independently triggered; the document's final
//! score is the maximum over all query variants, so matching one phrasing
//! well is never penalized by the other phrasings.

use std::collections::HashSet;

use strsim::normalized_levenshtein;

/// Exact substring of the variant in the display name.
const W_EXACT_NAME: f64 = 10.0;
/// All variant tokens form a subset of the display-name tokens.
const W_NAME_WORD_SUBSET: f64 = 8.0;
/// Exact substring in the precomputed normalized name.
const W_EXACT_NORM: f64 = 7.0;
/// Exact substring in the storage path.
const W_EXACT_PATH: f64 = 6.0;
/// Scale for the 0..1 string-similarity ratio (smooth fallback signal).
const W_SIMILARITY: f64 = 5.0;
/// Per-token partial credit. The normalized name is already
/// synonym-canonicalized, so it carries the highest of the three.
const W_TOKEN_NAME: f64 = 2.0;
const W_TOKEN_NORM: f64 = 3.0;
const W_TOKEN_PATH: f64 = 1.0;

/// KNX-cable hard case: part-number markers in the combined searchable text.
const W_KNX_PART_NUMBER: f64 = 100.0;
const W_KNX_CABLE_TYPE: f64 = 80.0;
const W_KNX_WIRE_GAUGE: f64 = 60.0;
const W_KNX_PHRASE: f64 = 40.0;
/// Sensor datasheets share generic vocabulary with the KNX cable; a sensor
/// marker in the searchable text disqualifies the document for cable queries.
const P_KNX_SENSOR_CONFLICT: f64 = 50.0;

/// Lowercased matching surfaces of one indexed document.
#[derive(Debug, Clone)]
pub struct DocumentText {
    pub name: String,
    pub path: String,
    pub norm_name: String,
    /// `name + " " + path + " " + norm_name`, used by the domain rules.
    pub search_text: String,
}

impl DocumentText {
    pub fn new(name: &str, path: &str, norm_name: &str) -> Self {
        let name = name.to_lowercase();
        let path = path.to_lowercase();
        let norm_name = norm_name.to_lowercase();
        let search_text = format!("{name} {path} {norm_name}");
        Self {
            name,
            path,
            norm_name,
            search_text,
        }
    }
}

/// Score a document against a set of query variants: max over per-variant
/// sums. Documents scoring ≤ 0 are dropped by the caller.
pub fn score<'a, I>(doc: &DocumentText, variants: I) -> f64
where
    I: IntoIterator<Item = &'a str>,
{
    variants
        .into_iter()
        .map(|v| score_variant(doc, v))
        .fold(0.0, f64::max)
}

fn score_variant(doc: &DocumentText, query: &str) -> f64 {
    if query.is_empty() {
        return 0.0;
    }
    let mut score = 0.0;

    if doc.name.contains(query) {
        score += W_EXACT_NAME;
    }

    let query_words: HashSet<&str> = query.split_whitespace().collect();
    let name_words: HashSet<&str> = doc.name.split_whitespace().collect();
    if !query_words.is_empty() && query_words.is_subset(&name_words) {
        score += W_NAME_WORD_SUBSET;
    }

    if doc.norm_name.contains(query) {
        score += W_EXACT_NORM;
    }
    if doc.path.contains(query) {
        score += W_EXACT_PATH;
    }

    let similarity = normalized_levenshtein(query, &doc.name)
        .max(normalized_levenshtein(query, &doc.path));
    score += similarity * W_SIMILARITY;

    for word in query.split_whitespace() {
        if doc.name.contains(word) {
            score += W_TOKEN_NAME;
        }
        if doc.norm_name.contains(word) {
            score += W_TOKEN_NORM;
        }
        if doc.path.contains(word) {
            score += W_TOKEN_PATH;
        }
    }

    score += knx_cable_adjustment(doc, query);
    score
}

fn knx_cable_adjustment(doc: &DocumentText, query: &str) -> f64 {
    let has_cable = query.contains("cable") || query.contains("кабел");
    if !(has_cable && query.contains("knx")) {
        return 0.0;
    }
    let text = &doc.search_text;
    let mut adj = 0.0;
    if text.contains("ye00820") {
        adj += W_KNX_PART_NUMBER;
    }
    if text.contains("j-y(st)y") {
        adj += W_KNX_CABLE_TYPE;
    }
    if text.contains("2x2x0,8") {
        adj += W_KNX_WIRE_GAUGE;
    }
    if ["knx кабель", "кабель knx", "knx cable", "cable knx"]
        .iter()
        .any(|p| text.contains(p))
    {
        adj += W_KNX_PHRASE;
    }
    if text.contains("датчик") || text.contains("sensor") {
        adj -= P_KNX_SENSOR_CONFLICT;
    }
    adj
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str, path: &str, norm: &str) -> DocumentText {
        DocumentText::new(name, path, norm)
    }

    #[test]
    fn score_is_nonnegative_without_domain_penalty() {
        let d = doc("HDL MDL64.pdf", "/02. HDL/MDL64.pdf", "hdl mdl64");
        assert!(score(&d, ["совсем другое"]) >= 0.0);
        assert!(score(&d, ["hdl"]) > 0.0);
    }

    #[test]
    fn exact_name_match_strictly_increases_score() {
        let with_match = doc("hdl granit panel.pdf", "/x/y.pdf", "hdl granit panel");
        let without = doc("granit keypad.pdf", "/x/y.pdf", "granit keypad");
        let q = ["hdl granit panel"];
        assert!(score(&with_match, q) > score(&without, q));
    }

    #[test]
    fn word_subset_bonus_fires_regardless_of_order() {
        let d = doc("granit hdl panel.pdf", "/a/b.pdf", "");
        let reordered = score(&d, ["hdl granit"]);
        let missing = score(&d, ["hdl granit extra"]);
        assert!(reordered > missing);
    }

    #[test]
    fn max_over_variants_not_sum() {
        let d = doc("YE00820 KNX кабель J-Y(ST)Y.pdf", "/01/02/ye00820.pdf", "ye00820 knx cable");
        let one = score(&d, ["cable knx"]);
        let many = score(&d, ["cable knx", "zzz qqq", "провод knx"]);
        // Adding weaker variants must never lower (or raise beyond max) the score.
        assert!(many >= one);
        assert_eq!(many, score(&d, ["провод knx"]).max(one));
    }

    #[test]
    fn knx_cable_markers_outweigh_sensor_datasheet() {
        let cable = doc(
            "YE00820 KNX кабель J-Y(ST)Y, 2x2x0,8.pdf",
            "/01. iOT Systems/02. iOT Кабель/YE00820.pdf",
            "ye00820 knx cable j y st y 2x2x0 8",
        );
        let sensor = doc(
            "Датчик KNX кабельный R5-60G.pdf",
            "/01. iOT Systems/03. Датчики/R5-60G.pdf",
            "sensor knx cable r5 60g",
        );
        let variants = ["cable knx", "кабель knx"];
        assert!(score(&cable, variants) > score(&sensor, variants));
    }

    #[test]
    fn sensor_penalty_only_applies_to_knx_cable_queries() {
        let sensor = doc("Датчик движения Matech.pdf", "/08. Matech/sensor.pdf", "sensor matech");
        assert!(score(&sensor, ["sensor matech"]) > 0.0);
    }

    #[test]
    fn token_credit_prefers_normalized_name() {
        let in_norm = doc("aaa.pdf", "/x/aaa.pdf", "granit");
        let in_path = doc("bbb.pdf", "/granit/bbb.pdf", "");
        assert!(score(&in_norm, ["granit"]) > score(&in_path, ["granit"]));
    }
}
