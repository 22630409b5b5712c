//! Curated folder redirects for high-confidence query categories.
//!
//! Checked before generic scoring. The table is ordered data: exact-phrase
//! entries first, then category keyword rules in a fixed priority order.
//! Precedence is an explicit, testable property of the table rather than
//! control flow.

use crate::model::types::FolderLink;

pub const CABLE_FOLDER_URL: &str =
    "https://disk.360.yandex.ru/d/xJi6eEXBTq01sw/01.%20iOT%20Systems/02.%20iOT%20%D0%9A%D0%B0%D0%B1%D0%B5%D0%BB%D1%8C";
pub const LOCKS_FOLDER_URL: &str =
    "https://disk.360.yandex.ru/d/xJi6eEXBTq01sw/01.%20iOT%20Systems/04.%20%D0%94%D0%B2%D0%B5%D1%80%D0%BD%D1%8B%D0%B5%20%D0%B7%D0%B0%D0%BC%D0%BA%D0%B8%20iOT%20Systems";
pub const COOLAUTOMATION_FOLDER_URL: &str =
    "https://disk.360.yandex.ru/d/xJi6eEXBTq01sw/03.%20Coolautomation";
pub const EASYCOOL_FOLDER_URL: &str =
    "https://disk.360.yandex.ru/d/xJi6eEXBTq01sw/11.%20EasyCool";
pub const MOORGEN_FOLDER_URL: &str = "https://disk.360.yandex.ru/d/xJi6eEXBTq01sw/05.%20Moorgen";
pub const URRI_FOLDER_URL: &str =
    "https://disk.360.yandex.ru/d/xJi6eEXBTq01sw/10.%20URRI.%20%D0%9F%D0%BB%D0%B5%D0%B5%D1%80%D1%8B%2C%20%D1%80%D0%B5%D1%81%D0%B8%D0%B2%D0%B5%D1%80%D1%8B";

/// Resolution of a redirect rule: one curated link, or the "both vendor
/// variants" sentinel rendered as two labeled links.
#[derive(Debug, Clone, PartialEq)]
pub enum RedirectTarget {
    Single(FolderLink),
    Pair(FolderLink, FolderLink),
}

/// One category rule: fires when any trigger keyword occurs in the
/// normalized query and no exclude keyword does.
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub label: &'static str,
    pub any: &'static [&'static str],
    pub exclude: &'static [&'static str],
    pub target: RedirectTarget,
}

impl CategoryRule {
    fn matches(&self, normalized_query: &str) -> bool {
        self.any.iter().any(|kw| normalized_query.contains(kw))
            && !self.exclude.iter().any(|kw| normalized_query.contains(kw))
    }
}

/// Ordered redirect table.
#[derive(Debug, Clone)]
pub struct RedirectTable {
    exact: Vec<(String, RedirectTarget)>,
    categories: Vec<CategoryRule>,
}

fn cable_link() -> FolderLink {
    FolderLink::new("Кабель iOT Systems", CABLE_FOLDER_URL)
}

fn locks_link() -> FolderLink {
    FolderLink::new("Дверные замки iOT Systems", LOCKS_FOLDER_URL)
}

fn easycool_link() -> FolderLink {
    FolderLink::new("Кондиционеры EasyCool", EASYCOOL_FOLDER_URL)
}

fn coolautomation_link() -> FolderLink {
    FolderLink::new("Кондиционеры CoolAutomation", COOLAUTOMATION_FOLDER_URL)
}

fn moorgen_link() -> FolderLink {
    FolderLink::new("Шторы и карнизы Moorgen", MOORGEN_FOLDER_URL)
}

fn urri_link() -> FolderLink {
    FolderLink::new("URRI: плееры и ресиверы", URRI_FOLDER_URL)
}

impl Default for RedirectTable {
    fn default() -> Self {
        let exact = [
            ("cable", RedirectTarget::Single(cable_link())),
            ("cable iot", RedirectTarget::Single(cable_link())),
            ("iot cable", RedirectTarget::Single(cable_link())),
            ("datasheet cable", RedirectTarget::Single(cable_link())),
            ("cable datasheet", RedirectTarget::Single(cable_link())),
            ("lock", RedirectTarget::Single(locks_link())),
            ("door lock", RedirectTarget::Single(locks_link())),
            ("lock iot", RedirectTarget::Single(locks_link())),
            ("iot lock", RedirectTarget::Single(locks_link())),
            ("easycool", RedirectTarget::Single(easycool_link())),
            ("coolautomation", RedirectTarget::Single(coolautomation_link())),
            ("moorgen", RedirectTarget::Single(moorgen_link())),
            ("curtain", RedirectTarget::Single(moorgen_link())),
            ("urri", RedirectTarget::Single(urri_link())),
        ]
        .into_iter()
        .map(|(k, t)| (k.to_string(), t))
        .collect();

        // Priority order: air-conditioner vendors → generic air-conditioner
        // pair → curtains → URRI → cable → locks. KNX queries are excluded
        // from the cable/lock paths; the KNX cable special case owns them.
        let categories = vec![
            CategoryRule {
                label: "easycool",
                any: &["easycool"],
                exclude: &[],
                target: RedirectTarget::Single(easycool_link()),
            },
            CategoryRule {
                label: "coolautomation",
                any: &["coolautomation"],
                exclude: &[],
                target: RedirectTarget::Single(coolautomation_link()),
            },
            CategoryRule {
                label: "aircon",
                any: &["aircon", "conditioner"],
                exclude: &[],
                target: RedirectTarget::Pair(easycool_link(), coolautomation_link()),
            },
            CategoryRule {
                label: "curtain",
                any: &["curtain", "moorgen"],
                exclude: &[],
                target: RedirectTarget::Single(moorgen_link()),
            },
            CategoryRule {
                label: "urri",
                any: &["urri"],
                exclude: &[],
                target: RedirectTarget::Single(urri_link()),
            },
            CategoryRule {
                label: "cable",
                any: &["cable"],
                exclude: &["knx"],
                target: RedirectTarget::Single(cable_link()),
            },
            CategoryRule {
                label: "lock",
                any: &["lock", "door lock"],
                exclude: &["knx"],
                target: RedirectTarget::Single(locks_link()),
            },
        ];

        Self { exact, categories }
    }
}

impl RedirectTable {
    pub fn new(exact: Vec<(String, RedirectTarget)>, categories: Vec<CategoryRule>) -> Self {
        Self { exact, categories }
    }

    /// Check a fully normalized query against the table. `None` means "no
    /// redirect applies" and is not an error.
    pub fn check(&self, normalized_query: &str) -> Option<RedirectTarget> {
        if normalized_query.is_empty() {
            return None;
        }
        for (phrase, target) in &self.exact {
            if normalized_query == phrase {
                return Some(target.clone());
            }
        }
        for rule in &self.categories {
            if rule.matches(normalized_query) {
                return Some(rule.target.clone());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_phrase_match_returns_single_link() {
        let t = RedirectTable::default();
        match t.check("easycool") {
            Some(RedirectTarget::Single(link)) => assert_eq!(link.folder_link, EASYCOOL_FOLDER_URL),
            other => panic!("expected single easycool link, got {other:?}"),
        }
    }

    #[test]
    fn generic_aircon_query_returns_both_vendors() {
        let t = RedirectTable::default();
        match t.check("aircon hdl") {
            Some(RedirectTarget::Pair(a, b)) => {
                assert_eq!(a.folder_link, EASYCOOL_FOLDER_URL);
                assert_eq!(b.folder_link, COOLAUTOMATION_FOLDER_URL);
            }
            other => panic!("expected vendor pair, got {other:?}"),
        }
    }

    #[test]
    fn vendor_keyword_beats_generic_aircon_rule() {
        let t = RedirectTable::default();
        match t.check("easycool aircon setup") {
            Some(RedirectTarget::Single(link)) => assert_eq!(link.folder_link, EASYCOOL_FOLDER_URL),
            other => panic!("expected single easycool link, got {other:?}"),
        }
    }

    #[test]
    fn cable_queries_redirect_unless_knx_present() {
        let t = RedirectTable::default();
        assert!(matches!(
            t.check("cable iot"),
            Some(RedirectTarget::Single(_))
        ));
        assert!(matches!(
            t.check("iot systems cable"),
            Some(RedirectTarget::Single(_))
        ));
        assert_eq!(t.check("cable knx"), None);
        assert_eq!(t.check("knx cable"), None);
    }

    #[test]
    fn lock_phrasings_redirect_to_locks_folder() {
        let t = RedirectTable::default();
        for q in ["lock", "door lock", "iot lock", "door lock iot systems"] {
            match t.check(q) {
                Some(RedirectTarget::Single(link)) => {
                    assert_eq!(link.folder_link, LOCKS_FOLDER_URL)
                }
                other => panic!("query {q:?}: expected locks link, got {other:?}"),
            }
        }
    }

    #[test]
    fn curtain_category_redirects_to_moorgen() {
        let t = RedirectTable::default();
        match t.check("curtain control hdl") {
            Some(RedirectTarget::Single(link)) => assert_eq!(link.folder_link, MOORGEN_FOLDER_URL),
            other => panic!("expected moorgen link, got {other:?}"),
        }
    }

    #[test]
    fn unrelated_query_does_not_redirect() {
        let t = RedirectTable::default();
        assert_eq!(t.check("hdl granit panel"), None);
        assert_eq!(t.check(""), None);
    }
}
