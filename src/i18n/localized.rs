//! LocalizedString: a table of per-tag text variants resolved through a langpath.
//!
//! An instance never caches a "current value". Every read walks the langpath it
//! is given (or the one held by a [`ResolutionContext`]), so changing the active
//! langpath retroactively changes what every instance renders to and how
//! instances compare.

use crate::i18n::{Langpath, LocalizedError, ResolutionContext, ResolutionMetrics};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Tag used for text that carries no language information.
pub const NO_LANG: &str = "NOLANG";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Variant {
    tag: String,
    text: String,
}

/// Immutable tag → text table with a default tag.
///
/// Cloning is cheap: the variants are shared behind an `Arc`.
///
/// Serialized as a list of `[tag, text]` pairs with the default variant first;
/// deserialization runs through the same validation as [`LocalizedString::new`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<(String, String)>",
    into = "Vec<(String, String)>"
)]
pub struct LocalizedString {
    variants: Arc<[Variant]>,
    /// Index into `variants` used when no langpath tag matches
    default: usize,
}

/// How a resolution found its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    /// A langpath tag matched
    Preferred(usize),
    /// No langpath tag matched; the default tag answered
    Fallback(usize),
}

impl Resolution {
    fn index(self) -> usize {
        match self {
            Resolution::Preferred(i) | Resolution::Fallback(i) => i,
        }
    }
}

impl LocalizedString {
    /// Create a localized string from `(tag, text)` pairs.
    ///
    /// The first pair becomes the default tag.
    ///
    /// # Returns
    /// * `Err(LocalizedError::EmptyInput)` if `pairs` is empty
    /// * `Err(LocalizedError::DuplicateTag)` if a tag repeats
    ///
    /// # Example
    /// ```
    /// use langpath_sort::i18n::{Langpath, LocalizedString};
    ///
    /// let label = LocalizedString::new([("en", "dog"), ("fr", "chien")])?;
    /// assert_eq!(label.resolve(&Langpath::new(["fr"]))?, "chien");
    /// # Ok::<(), langpath_sort::i18n::LocalizedError>(())
    /// ```
    pub fn new<I, T, S>(pairs: I) -> Result<Self, LocalizedError>
    where
        I: IntoIterator<Item = (T, S)>,
        T: Into<String>,
        S: Into<String>,
    {
        let mut variants: Vec<Variant> = Vec::new();
        for (tag, text) in pairs {
            let tag = tag.into();
            if variants.iter().any(|v| v.tag == tag) {
                return Err(LocalizedError::DuplicateTag(tag));
            }
            variants.push(Variant {
                tag,
                text: text.into(),
            });
        }

        if variants.is_empty() {
            return Err(LocalizedError::EmptyInput);
        }

        Ok(Self {
            variants: variants.into(),
            default: 0,
        })
    }

    /// Single variant under the [`NO_LANG`] tag.
    pub fn untagged(text: impl Into<String>) -> Self {
        Self {
            variants: vec![Variant {
                tag: NO_LANG.to_string(),
                text: text.into(),
            }]
            .into(),
            default: 0,
        }
    }

    /// Use `tag` instead of the first pair as the fallback.
    pub fn with_default(mut self, tag: &str) -> Result<Self, LocalizedError> {
        self.default = self
            .index_of(tag)
            .ok_or_else(|| LocalizedError::UnknownDefaultTag(tag.to_string()))?;
        Ok(self)
    }

    /// Text stored under exactly `tag`, without any fallback.
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.index_of(tag).map(|i| self.variants[i].text.as_str())
    }

    /// Tags in insertion order.
    pub fn tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.variants.iter().map(|v| v.tag.as_str())
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn default_tag(&self) -> Option<&str> {
        self.variants.get(self.default).map(|v| v.tag.as_str())
    }

    /// Resolve against `langpath`.
    ///
    /// Walks the langpath in order and returns the text of the first tag this
    /// instance carries; otherwise the default tag's text.
    ///
    /// # Returns
    /// * `Err(LocalizedError::EmptyValue)` if there is nothing to return
    pub fn resolve(&self, langpath: &Langpath) -> Result<&str, LocalizedError> {
        self.resolve_recorded(langpath, ResolutionMetrics::global())
    }

    fn resolve_recorded(
        &self,
        langpath: &Langpath,
        metrics: &ResolutionMetrics,
    ) -> Result<&str, LocalizedError> {
        let resolution = self.locate(langpath).ok_or(LocalizedError::EmptyValue)?;

        match resolution {
            Resolution::Preferred(_) => metrics.record_langpath_hit(),
            Resolution::Fallback(_) => metrics.record_default_fallback(),
        }

        Ok(self.variants[resolution.index()].text.as_str())
    }

    /// Resolve against a snapshot of `ctx`.
    pub fn resolve_in(&self, ctx: &ResolutionContext) -> Result<&str, LocalizedError> {
        self.resolve(&ctx.snapshot())
    }

    /// Resolve against the process-wide langpath.
    pub fn resolve_active(&self) -> Result<&str, LocalizedError> {
        self.resolve_in(ResolutionContext::global())
    }

    /// Tag whose text `langpath` resolves to.
    pub fn matched_tag(&self, langpath: &Langpath) -> Option<&str> {
        self.locate(langpath)
            .map(|r| self.variants[r.index()].tag.as_str())
    }

    /// Order two instances by their resolved text (code-point lexicographic).
    pub fn compare(a: &Self, b: &Self, langpath: &Langpath) -> Ordering {
        a.text_under(langpath).cmp(&b.text_under(langpath))
    }

    /// Like [`compare`](Self::compare), but ignoring letter case.
    ///
    /// Texts differing only by case fall back to the exact order so the result
    /// remains a total order.
    pub fn compare_case_insensitive(a: &Self, b: &Self, langpath: &Langpath) -> Ordering {
        match (a.text_under(langpath), b.text_under(langpath)) {
            (Some(x), Some(y)) => fold_case_cmp(x, y),
            (x, y) => x.cmp(&y),
        }
    }

    // Metrics are only recorded by the public resolve path; comparisons run
    // inside sorts and would swamp the counters.
    fn text_under(&self, langpath: &Langpath) -> Option<&str> {
        self.locate(langpath)
            .map(|r| self.variants[r.index()].text.as_str())
    }

    fn locate(&self, langpath: &Langpath) -> Option<Resolution> {
        langpath
            .tags()
            .iter()
            .find_map(|tag| self.index_of(tag))
            .map(Resolution::Preferred)
            .or_else(|| {
                (self.default < self.variants.len()).then_some(Resolution::Fallback(self.default))
            })
    }

    fn index_of(&self, tag: &str) -> Option<usize> {
        self.variants.iter().position(|v| v.tag == tag)
    }
}

/// Case-folded comparison with an exact tie-break.
pub(crate) fn fold_case_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

/// Renders under the process-wide langpath.
impl fmt::Display for LocalizedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.text_under(&ResolutionContext::global().snapshot()).unwrap_or_default())
    }
}

impl fmt::Debug for LocalizedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (i, v) in self.variants.iter().enumerate() {
            if i == self.default {
                map.entry(&format_args!("{}*", v.tag), &v.text);
            } else {
                map.entry(&v.tag, &v.text);
            }
        }
        map.finish()
    }
}

impl TryFrom<Vec<(String, String)>> for LocalizedString {
    type Error = LocalizedError;

    fn try_from(pairs: Vec<(String, String)>) -> Result<Self, Self::Error> {
        Self::new(pairs)
    }
}

impl From<LocalizedString> for Vec<(String, String)> {
    fn from(value: LocalizedString) -> Self {
        let mut pairs: Vec<(String, String)> = value
            .variants
            .iter()
            .map(|v| (v.tag.clone(), v.text.clone()))
            .collect();
        if value.default < pairs.len() {
            pairs[..=value.default].rotate_right(1);
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dog() -> LocalizedString {
        LocalizedString::new([("en", "dog"), ("fr", "chien"), ("de", "Hund")]).unwrap()
    }

    fn lp(tags: &[&str]) -> Langpath {
        Langpath::new(tags.iter().copied())
    }

    // ==================== Construction Tests ====================

    #[test]
    fn test_new_keeps_insertion_order() {
        let label = dog();
        assert_eq!(label.tags().collect::<Vec<_>>(), vec!["en", "fr", "de"]);
        assert_eq!(label.len(), 3);
        assert!(!label.is_empty());
    }

    #[test]
    fn test_new_empty_input_fails() {
        let result = LocalizedString::new(Vec::<(String, String)>::new());
        assert_eq!(result.unwrap_err(), LocalizedError::EmptyInput);
    }

    #[test]
    fn test_new_duplicate_tag_fails() {
        let result = LocalizedString::new([("en", "dog"), ("fr", "chien"), ("en", "hound")]);
        assert_eq!(
            result.unwrap_err(),
            LocalizedError::DuplicateTag("en".to_string())
        );
    }

    #[test]
    fn test_first_pair_is_default() {
        assert_eq!(dog().default_tag(), Some("en"));
    }

    #[test]
    fn test_with_default() {
        let label = dog().with_default("de").unwrap();
        assert_eq!(label.default_tag(), Some("de"));
        assert_eq!(label.resolve(&lp(&["it"])).unwrap(), "Hund");
    }

    #[test]
    fn test_with_default_unknown_tag_fails() {
        let result = dog().with_default("it");
        assert_eq!(
            result.unwrap_err(),
            LocalizedError::UnknownDefaultTag("it".to_string())
        );
    }

    #[test]
    fn test_untagged() {
        let label = LocalizedString::untagged("42");
        assert_eq!(label.tags().collect::<Vec<_>>(), vec![NO_LANG]);
        assert_eq!(label.resolve(&lp(&["fr"])).unwrap(), "42");
    }

    #[test]
    fn test_get_is_exact() {
        let label = dog();
        assert_eq!(label.get("fr"), Some("chien"));
        assert_eq!(label.get("it"), None);
    }

    // ==================== Resolution Tests ====================

    #[test]
    fn test_resolve_first_preferred_tag() {
        assert_eq!(dog().resolve(&lp(&["fr"])).unwrap(), "chien");
    }

    #[test]
    fn test_resolve_walks_langpath_in_order() {
        assert_eq!(dog().resolve(&lp(&["it", "de", "fr"])).unwrap(), "Hund");
    }

    #[test]
    fn test_resolve_skips_missing_tags() {
        assert_eq!(dog().resolve(&lp(&["it", "en"])).unwrap(), "dog");
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let label = LocalizedString::new([("fr", "chien"), ("de", "Hund")]).unwrap();
        assert_eq!(label.resolve(&lp(&["it", "es"])).unwrap(), "chien");
    }

    #[test]
    fn test_resolve_empty_langpath_uses_default() {
        assert_eq!(dog().resolve(&Langpath::new(Vec::<String>::new())).unwrap(), "dog");
    }

    #[test]
    fn test_resolve_in_reads_context_each_time() {
        let ctx = ResolutionContext::new(lp(&["fr"]));
        let label = dog();
        assert_eq!(label.resolve_in(&ctx).unwrap(), "chien");
        ctx.set(lp(&["de"]));
        assert_eq!(label.resolve_in(&ctx).unwrap(), "Hund");
    }

    #[test]
    fn test_resolve_counts_hits_and_fallbacks() {
        let metrics = ResolutionMetrics::new();
        let label = dog();

        assert_eq!(label.resolve_recorded(&lp(&["fr"]), &metrics).unwrap(), "chien");
        assert_eq!(metrics.langpath_hits(), 1);
        assert_eq!(metrics.default_fallbacks(), 0);

        assert_eq!(label.resolve_recorded(&lp(&["it"]), &metrics).unwrap(), "dog");
        assert_eq!(metrics.langpath_hits(), 1);
        assert_eq!(metrics.default_fallbacks(), 1);

        // Default tag reached through the langpath counts as a hit
        label.resolve_recorded(&lp(&["it", "en"]), &metrics).unwrap();
        assert_eq!(metrics.langpath_hits(), 2);
        assert_eq!(metrics.default_fallbacks(), 1);
    }

    #[test]
    fn test_matched_tag() {
        let label = dog();
        assert_eq!(label.matched_tag(&lp(&["it", "de"])), Some("de"));
        assert_eq!(label.matched_tag(&lp(&["it"])), Some("en"));
    }

    // ==================== Comparison Tests ====================

    #[test]
    fn test_compare_uses_resolved_text() {
        let cat = LocalizedString::new([("en", "cat"), ("fr", "chat"), ("de", "Katze")]).unwrap();
        let dog = dog();

        assert_eq!(LocalizedString::compare(&cat, &dog, &lp(&["en"])), Ordering::Less);
        // "Katze" > "Hund"
        assert_eq!(LocalizedString::compare(&cat, &dog, &lp(&["de"])), Ordering::Greater);
    }

    #[test]
    fn test_compare_is_code_point_order() {
        let upper = LocalizedString::new([("en", "Zebra")]).unwrap();
        let lower = LocalizedString::new([("en", "apple")]).unwrap();
        assert_eq!(
            LocalizedString::compare(&upper, &lower, &lp(&["en"])),
            Ordering::Less
        );
    }

    #[test]
    fn test_compare_case_insensitive() {
        let upper = LocalizedString::new([("en", "Zebra")]).unwrap();
        let lower = LocalizedString::new([("en", "apple")]).unwrap();
        assert_eq!(
            LocalizedString::compare_case_insensitive(&upper, &lower, &lp(&["en"])),
            Ordering::Greater
        );
    }

    #[test]
    fn test_case_insensitive_ties_break_exactly() {
        assert_eq!(fold_case_cmp("Hund", "hund"), Ordering::Less);
        assert_eq!(fold_case_cmp("hund", "hund"), Ordering::Equal);
    }

    #[test]
    fn test_equal_text_does_not_imply_equal_tables() {
        let a = LocalizedString::new([("en", "chat"), ("fr", "chat")]).unwrap();
        let b = LocalizedString::new([("fr", "chat"), ("de", "Katze")]).unwrap();
        assert_eq!(LocalizedString::compare(&a, &b, &lp(&["fr"])), Ordering::Equal);
        assert_ne!(a, b);
    }

    // ==================== Formatting Tests ====================

    #[test]
    fn test_debug_marks_default() {
        let debug = format!("{:?}", dog().with_default("fr").unwrap());
        assert!(debug.contains("fr*"));
        assert!(debug.contains("chien"));
    }

    // ==================== Serde Tests ====================

    #[test]
    fn test_deserialize_pairs() {
        let label: LocalizedString =
            serde_json::from_str(r#"[["en","dog"],["fr","chien"]]"#).expect("Should deserialize");
        assert_eq!(label.get("fr"), Some("chien"));
    }

    #[test]
    fn test_deserialize_rejects_duplicates() {
        let result: Result<LocalizedString, _> =
            serde_json::from_str(r#"[["en","dog"],["en","hound"]]"#);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("duplicate tag 'en'"));
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        let result: Result<LocalizedString, _> = serde_json::from_str("[]");
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_puts_default_first() {
        let label = dog().with_default("de").unwrap();
        let json = serde_json::to_string(&label).expect("Should serialize");
        assert_eq!(json, r#"[["de","Hund"],["en","dog"],["fr","chien"]]"#);

        let restored: LocalizedString = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.default_tag(), Some("de"));
    }
}
