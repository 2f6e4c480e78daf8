//! Langpath: the ordered list of preferred tags, and the context holding it.
//!
//! A [`ResolutionContext`] is a cheap, cloneable handle to one shared langpath.
//! Callers may hold their own context per view, or use the process-wide one
//! returned by [`ResolutionContext::global`], which is what
//! [`set_active_langpath`] and `Display` for localized strings operate on.

use crate::i18n::LocalizedError;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use tracing::info;

/// Tag used by the default langpath.
pub const FALLBACK_TAG: &str = "en";

/// Separator between tags in the textual langpath form (`"de:fr:en"`).
pub const SEPARATOR: char = ':';

/// Ordered tag preference, most preferred first.
///
/// Duplicate tags are dropped on construction (first occurrence wins), since a
/// repeated tag can never change the outcome of a fallback walk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Langpath {
    tags: Vec<String>,
}

impl Langpath {
    /// Build a langpath from tags in preference order.
    ///
    /// No validation against any localized string happens here; resolution
    /// simply falls through to an instance's default tag when nothing matches.
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.into();
            if !unique.contains(&tag) {
                unique.push(tag);
            }
        }
        Self { tags: unique }
    }

    /// Parse the colon-separated form, e.g. `"de:fr:en"`.
    ///
    /// Whitespace around tags is trimmed and empty segments are skipped.
    ///
    /// # Returns
    /// * `Err(LocalizedError::EmptyLangpath)` if no tag remains
    pub fn parse(raw: &str) -> Result<Self, LocalizedError> {
        let langpath = Self::new(
            raw.split(SEPARATOR)
                .map(str::trim)
                .filter(|tag| !tag.is_empty()),
        );
        if langpath.is_empty() {
            return Err(LocalizedError::EmptyLangpath);
        }
        Ok(langpath)
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Preference rank of `tag` (0 = most preferred).
    pub fn position(&self, tag: &str) -> Option<usize> {
        self.tags.iter().position(|t| t == tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.position(tag).is_some()
    }
}

impl Default for Langpath {
    fn default() -> Self {
        Self::new([FALLBACK_TAG])
    }
}

impl fmt::Display for Langpath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tag) in self.tags.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", SEPARATOR)?;
            }
            f.write_str(tag)?;
        }
        Ok(())
    }
}

impl FromStr for Langpath {
    type Err = LocalizedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<S: Into<String>> FromIterator<S> for Langpath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Shared, mutable holder of the active langpath.
///
/// Readers take a [`snapshot`](Self::snapshot) and keep using it for the whole
/// operation, so a sort never observes two different langpaths. Every
/// [`set`](Self::set) bumps a generation counter that lets collections detect
/// that their order was computed under an outdated langpath.
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    inner: Arc<ContextState>,
}

#[derive(Debug)]
struct ContextState {
    langpath: RwLock<Arc<Langpath>>,
    generation: AtomicU64,
}

/// Process-wide context (initialized lazily)
static GLOBAL: OnceLock<ResolutionContext> = OnceLock::new();

impl ResolutionContext {
    pub fn new(langpath: Langpath) -> Self {
        Self {
            inner: Arc::new(ContextState {
                langpath: RwLock::new(Arc::new(langpath)),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Get the process-wide resolution context.
    ///
    /// Initialized with [`Langpath::default`] on first access.
    pub fn global() -> &'static ResolutionContext {
        GLOBAL.get_or_init(Self::default)
    }

    /// Current langpath, read once.
    pub fn snapshot(&self) -> Arc<Langpath> {
        self.versioned_snapshot().0
    }

    /// Current langpath together with the generation it belongs to.
    ///
    /// Both values are read under the same lock, so they always match.
    pub fn versioned_snapshot(&self) -> (Arc<Langpath>, u64) {
        let guard = self
            .inner
            .langpath
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let generation = self.inner.generation.load(Ordering::Acquire);
        (Arc::clone(&guard), generation)
    }

    /// Replace the langpath atomically and return the previous one.
    pub fn set(&self, langpath: Langpath) -> Arc<Langpath> {
        let mut guard = self
            .inner
            .langpath
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut *guard, Arc::new(langpath));
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        previous
    }

    /// Number of times [`set`](Self::set) has been called on this context.
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire)
    }

    /// Whether both handles point at the same shared state.
    pub fn ptr_eq(&self, other: &ResolutionContext) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for ResolutionContext {
    fn default() -> Self {
        Self::new(Langpath::default())
    }
}

/// Replace the process-wide langpath.
///
/// Takes effect for every later resolution of every localized string that
/// reads the global context. Collections are not re-sorted; call `resort` on
/// each affected set afterwards.
pub fn set_active_langpath<I, S>(tags: I) -> Arc<Langpath>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let langpath = Langpath::new(tags);
    info!("Setting active langpath to '{}'", langpath);
    ResolutionContext::global().set(langpath)
}

/// Snapshot of the process-wide langpath.
pub fn active_langpath() -> Arc<Langpath> {
    ResolutionContext::global().snapshot()
}
