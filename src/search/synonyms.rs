//! Query variant generation by synonym substitution.

use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashMap};

/// Token → alternatives, in the normalized (ASCII canonical) token space.
///
/// Alternatives deliberately include the Cyrillic originals: display names and
/// storage paths in the index are raw, so a variant like "кабель knx" is what
/// actually matches a file called "YE00820 KNX кабель …".
pub static DEFAULT_SYNONYMS: Lazy<HashMap<String, Vec<String>>> = Lazy::new(|| {
    [
        ("cable", &["кабель", "провод", "wire"][..]),
        ("sensor", &["датчик", "сенсор", "detector"]),
        ("relay", &["реле", "переключатель"]),
        ("controller", &["контроллер", "control"]),
        ("panel", &["панель"]),
        ("manual", &["инструкция", "руководство", "instruction"]),
        ("datasheet", &["паспорт", "технический", "technical"]),
        ("lock", &["замок", "замки", "door lock"]),
        ("door", &["дверной"]),
        ("curtain", &["шторы", "карниз", "track"]),
        ("aircon", &["кондиционер", "conditioner"]),
        ("gateway", &["шлюз"]),
        ("integration", &["интеграция"]),
        ("connect", &["подключение"]),
        ("alisa", &["алиса", "alice"]),
        ("voice", &["голосовой"]),
        ("hdl", &["хдл"]),
        ("buspro", &["баспро"]),
        ("matech", &["матек"]),
        ("yeelight", &["йилайт"]),
        ("easycool", &["изикул", "easy cool"]),
        ("urri", &["урри"]),
        ("iot", &["иот"]),
    ]
    .iter()
    .map(|(k, vs)| {
        (
            k.to_string(),
            vs.iter().map(|v| v.to_string()).collect::<Vec<_>>(),
        )
    })
    .collect()
});

/// Synonym table used by [`expand`].
#[derive(Debug, Clone)]
pub struct SynonymTable {
    entries: HashMap<String, Vec<String>>,
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_SYNONYMS.clone(),
        }
    }
}

impl SynonymTable {
    pub fn new(entries: HashMap<String, Vec<String>>) -> Self {
        Self { entries }
    }

    /// Expand a normalized query into its variant set.
    ///
    /// The input itself is always a member. For each token with registered
    /// synonyms, one variant per synonym is produced by substituting that
    /// token in place; substitutions are never combined across tokens, which
    /// bounds the variant count to O(tokens × synonyms-per-token).
    pub fn expand(&self, normalized_query: &str) -> BTreeSet<String> {
        let mut variants = BTreeSet::new();
        if normalized_query.is_empty() {
            return variants;
        }
        variants.insert(normalized_query.to_string());

        let words: Vec<&str> = normalized_query.split_whitespace().collect();
        for (i, word) in words.iter().enumerate() {
            if let Some(alts) = self.entries.get(*word) {
                for alt in alts {
                    let mut replaced: Vec<&str> = words.clone();
                    replaced[i] = alt;
                    variants.insert(replaced.join(" "));
                }
            }
        }
        variants
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expansion_contains_the_input() {
        let t = SynonymTable::default();
        let v = t.expand("cable knx");
        assert!(v.contains("cable knx"));
    }

    #[test]
    fn one_variant_per_synonym_single_token_substitution() {
        let t = SynonymTable::default();
        let v = t.expand("cable knx");
        assert!(v.contains("кабель knx"));
        assert!(v.contains("провод knx"));
        assert!(v.contains("wire knx"));
        // knx has no registered synonyms: input + 3 cable alternatives.
        assert_eq!(v.len(), 4);
    }

    #[test]
    fn substitutions_are_not_combined_across_tokens() {
        let t = SynonymTable::default();
        let v = t.expand("cable sensor");
        // "кабель датчик" would require two simultaneous substitutions.
        assert!(!v.contains("кабель датчик"));
        assert!(v.contains("кабель sensor"));
        assert!(v.contains("cable датчик"));
    }

    #[test]
    fn empty_query_expands_to_nothing() {
        let t = SynonymTable::default();
        assert!(t.expand("").is_empty());
    }

    #[test]
    fn unknown_tokens_pass_through_untouched() {
        let t = SynonymTable::default();
        let v = t.expand("mdl64 bp 53");
        assert_eq!(v.len(), 1);
    }
}
