//! The "skip search, go straight to the AI assistant" gate.
//!
//! Evaluated on the raw query text before any search is attempted; this is an
//! independent, earlier decision than the orchestrator's own fallback to AI
//! when search comes up empty. The cascade order is load-bearing: marker
//! lists have been retuned over time but the precedence never changes.

use crate::search::special::{INTEGRATION_KEYWORDS, VOICE_KEYWORDS};

/// Queries naming a reseller brand or explicitly asking for a document never
/// go to the AI; the documentation base answers them.
const NEVER_AI_MARKERS: &[&str] = &[
    "hdl",
    "хдл",
    "buspro",
    "баспро",
    "matech",
    "матек",
    "urri",
    "урри",
    "yeelight",
    "йилайт",
    "easycool",
    "изикул",
    "coolautomation",
    "moorgen",
    "мурген",
    "insprid",
    "casatunes",
    "creatrol",
    "паспорт",
    "passport",
    "datasheet",
    "мануал",
    "manual",
    "инструкц",
    "руководств",
    "техничк",
    "документац",
    "спецификац",
    "specification",
];

/// Complex technical questions the file index cannot answer.
const COMPLEX_MARKERS: &[&str] = &[
    "почему",
    "why",
    "не работает",
    "not working",
    "не включается",
    "сравн",
    "compare",
    "versus",
    " vs ",
    "отлич",
    "разниц",
    "лучше",
    "принцип работы",
    "принцип действия",
    "how does",
    "можно ли",
    "возможно ли",
    "подскаж",
    "посоветуй",
    "knx",
    "кникс",
    "кнх",
    "dali",
    "modbus",
    "zigbee",
    "rs485",
    "протокол",
    "protocol",
    "api",
];

/// Explicit "find/send me a document" verbs keep long queries in search.
const REQUEST_VERBS: &[&str] = &[
    "найди",
    "найти",
    "пришли",
    "прислать",
    "скинь",
    "скинуть",
    "отправь",
    "дай",
    "покажи",
    "send",
    "find",
    "share",
    "нужен",
    "нужна",
    "нужно",
];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// The routing cascade, injectable for tests.
#[derive(Debug, Clone)]
pub struct AiRoutingPolicy {
    never_ai: Vec<String>,
    voice: Vec<String>,
    integration: Vec<String>,
    complex: Vec<String>,
    request_verbs: Vec<String>,
}

impl Default for AiRoutingPolicy {
    fn default() -> Self {
        let owned = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect();
        Self {
            never_ai: owned(NEVER_AI_MARKERS),
            voice: owned(VOICE_KEYWORDS),
            integration: owned(INTEGRATION_KEYWORDS),
            complex: owned(COMPLEX_MARKERS),
            request_verbs: owned(REQUEST_VERBS),
        }
    }
}

impl AiRoutingPolicy {
    /// Decide whether to route the query to the AI assistant without
    /// attempting document search at all.
    pub fn should_use_ai_directly(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        if q.trim().is_empty() {
            return false;
        }

        let has = |list: &[String]| list.iter().any(|m| q.contains(m.as_str()));

        // 1. Brand names and document-request words force search.
        if has(&self.never_ai) {
            return false;
        }

        // 2. Voice-assistant questions: integration/setup phrasings go to
        // search (the curated link answers them); anything else about the
        // assistant is a clarifying question for the AI.
        if has(&self.voice) {
            return !has(&self.integration);
        }

        // 3. Complex technical questions.
        if has(&self.complex) {
            return true;
        }

        // 4. Very short queries are lookups.
        let tokens = q.split_whitespace().count();
        if tokens <= 2 {
            return false;
        }

        // 5. Long queries without an explicit document-request verb are
        // questions, not lookups.
        if tokens >= 4 && !has(&self.request_verbs) {
            return true;
        }

        false
    }
}

/// Convenience wrapper over the default policy.
pub fn should_use_ai_directly(query: &str) -> bool {
    static POLICY: once_cell::sync::Lazy<AiRoutingPolicy> =
        once_cell::sync::Lazy::new(AiRoutingPolicy::default);
    POLICY.should_use_ai_directly(query)
}
