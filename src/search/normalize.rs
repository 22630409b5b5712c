//! Text normalization for the matching surface.
//!
//! Every string that takes part in matching (user queries at search time,
//! file names at index-build time) goes through the same pipeline:
//!
//! 1. lowercase
//! 2. substitution of known misspellings / transliterations / Cyrillic domain
//!    terms to their canonical ASCII token, longest key first so multi-word
//!    triggers are not shadowed by shorter ones
//! 3. strip everything that is not lowercase ASCII alphanumeric or whitespace
//! 4. collapse whitespace runs, trim
//!
//! The function is pure and idempotent, and the same query is normalized on
//! every search branch, so results are memoized per `Normalizer` instance.

use lru::LruCache;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::num::NonZeroUsize;

/// Memo table capacity. Queries repeat heavily (same user retrying, the
/// orchestrator normalizing once per stage), file names do not go through
/// the cache at all during a search.
const CACHE_CAPACITY: usize = 512;

/// Canonical substitution table: misspelled / transliterated / Cyrillic
/// domain term → ASCII token. Keys are matched as substrings after
/// lowercasing, so short stems cover the inflected forms.
pub static DEFAULT_SUBSTITUTIONS: Lazy<Vec<(String, String)>> = Lazy::new(|| {
    [
        // brands and protocols
        ("кникс", "knx"),
        ("кнх", "knx"),
        ("хдл", "hdl"),
        ("баспро", "buspro"),
        ("баспр", "buspro"),
        ("матеч", "matech"),
        ("матек", "matech"),
        ("урри", "urri"),
        ("юрии", "urri"),
        ("йилайт", "yeelight"),
        ("yee light", "yeelight"),
        ("изи кул", "easycool"),
        ("изикул", "easycool"),
        ("easy cool", "easycool"),
        ("кулавтомейшн", "coolautomation"),
        ("мурген", "moorgen"),
        ("айоти", "iot"),
        ("иот", "iot"),
        // domain vocabulary
        ("кабел", "cable"),
        ("провод", "cable"),
        ("датчик", "sensor"),
        ("сенсор", "sensor"),
        ("детектор", "sensor"),
        ("реле", "relay"),
        ("контроллер", "controller"),
        ("панел", "panel"),
        ("инструкци", "manual"),
        ("руководств", "manual"),
        ("паспорт", "datasheet"),
        ("техничк", "datasheet"),
        ("техническ", "datasheet"),
        ("замок", "lock"),
        ("замк", "lock"),
        ("двер", "door"),
        ("штор", "curtain"),
        ("карниз", "curtain"),
        ("кондиционер", "aircon"),
        ("алис", "alisa"),
        ("голосов", "voice"),
        ("интеграци", "integration"),
        ("подключ", "connect"),
        ("настро", "setup"),
        ("шлюз", "gateway"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
});

/// Memoizing text normalizer.
pub struct Normalizer {
    /// Substitutions sorted longest-key-first.
    subs: Vec<(String, String)>,
    cache: Mutex<LruCache<String, String>>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&DEFAULT_SUBSTITUTIONS)
    }
}

impl Normalizer {
    pub fn new(table: &[(String, String)]) -> Self {
        let mut subs: Vec<(String, String)> = table.to_vec();
        // Longest key first; stable for equal lengths so table order decides.
        subs.sort_by_key(|(k, _)| std::cmp::Reverse(k.chars().count()));
        Self {
            subs,
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(CACHE_CAPACITY).expect("nonzero cache capacity"),
            )),
        }
    }

    /// Normalize `text`. Empty or whitespace-only input yields `""`.
    pub fn normalize(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        if let Some(hit) = self.cache.lock().get(text) {
            return hit.clone();
        }
        let out = self.normalize_uncached(text);
        self.cache.lock().put(text.to_string(), out.clone());
        out
    }

    fn normalize_uncached(&self, text: &str) -> String {
        // Stripping can expose a multi-word ASCII trigger ("easy?cool" →
        // "easy cool"), so the pass repeats until the text is stable. Two
        // rounds always suffice: after the first the text is pure ASCII and
        // only the space-containing keys can still fire.
        let mut cur = text.to_lowercase();
        for _ in 0..3 {
            let next = self.pass(&cur);
            if next == cur {
                break;
            }
            cur = next;
        }
        cur
    }

    fn pass(&self, input: &str) -> String {
        let mut s = input.to_string();
        for (wrong, correct) in &self.subs {
            if s.contains(wrong.as_str()) {
                s = s.replace(wrong.as_str(), correct);
            }
        }
        let cleaned: String = s
            .chars()
            .map(|c| {
                if c.is_ascii_lowercase() || c.is_ascii_digit() {
                    c
                } else {
                    ' '
                }
            })
            .collect();
        cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn norm(s: &str) -> String {
        Normalizer::default().normalize(s)
    }

    #[test]
    fn empty_and_whitespace_inputs_yield_empty() {
        assert_eq!(norm(""), "");
        assert_eq!(norm("   \t\n "), "");
        assert_eq!(norm("!!! ??? ..."), "");
    }

    #[test]
    fn transliterations_map_to_canonical_tokens() {
        assert_eq!(norm("кабель КНИКС"), "cable knx");
        assert_eq!(norm("хдл панель"), "hdl panel");
        assert_eq!(norm("изикул"), "easycool");
        assert_eq!(norm("изи кул"), "easycool");
        assert_eq!(norm("техничка на кабель"), "datasheet cable");
    }

    #[test]
    fn longest_key_wins_over_shorter_prefix() {
        // "баспро" must not be consumed by the shorter "баспр" leaving a tail.
        assert_eq!(norm("баспро"), "buspro");
        assert_eq!(norm("easy cool сплит"), "easycool");
    }

    #[test]
    fn strips_punctuation_and_collapses_whitespace() {
        assert_eq!(norm("  HDL,   Buspro!  MDL64-BP.53 "), "hdl buspro mdl64 bp 53");
    }

    #[test]
    fn inflected_cyrillic_forms_collapse_to_one_token() {
        assert_eq!(norm("кабели"), "cable");
        assert_eq!(norm("замки"), "lock");
        assert_eq!(norm("датчики движения"), "sensor");
        assert_eq!(norm("датчики"), "sensor");
    }

    #[test]
    fn memoized_result_matches_uncached() {
        let n = Normalizer::default();
        let first = n.normalize("Кабель KNX J-Y(ST)Y");
        let second = n.normalize("Кабель KNX J-Y(ST)Y");
        assert_eq!(first, second);
        assert_eq!(first, "cable knx j y st y");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(s in "\\PC{0,64}") {
            let n = Normalizer::default();
            let once = n.normalize(&s);
            let twice = n.normalize(&once);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn output_is_ascii_lower_alnum_and_single_spaces(s in "\\PC{0,64}") {
            let n = Normalizer::default();
            let out = n.normalize(&s);
            prop_assert!(out
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' '));
            prop_assert!(!out.contains("  "));
            prop_assert_eq!(out.trim(), out.as_str());
        }
    }
}
