//! Internationalization (i18n) module: localized strings and langpath resolution.
//!
//! # Architecture
//!
//! - `langpath`: ordered tag preference and the shared context that holds it
//! - `localized`: `LocalizedString`, a per-tag text table resolved through a langpath
//! - `error`: typed construction/resolution failures
//! - `metrics`: resolution observability
//!
//! # Example
//!
//! ```rust
//! use langpath_sort::i18n::{Langpath, LocalizedString, ResolutionContext};
//!
//! let ctx = ResolutionContext::new(Langpath::new(["it", "en"]));
//! let label = LocalizedString::new([("en", "dog"), ("fr", "chien")]).unwrap();
//! assert_eq!(label.resolve_in(&ctx).unwrap(), "dog");
//!
//! ctx.set(Langpath::new(["fr"]));
//! assert_eq!(label.resolve_in(&ctx).unwrap(), "chien");
//! ```

mod error;
mod langpath;
mod localized;
mod metrics;

pub use error::LocalizedError;
pub use langpath::{
    active_langpath, set_active_langpath, Langpath, ResolutionContext, FALLBACK_TAG, SEPARATOR,
};
pub use localized::{LocalizedString, NO_LANG};
pub use metrics::{MetricsReport, ResolutionMetrics};

pub(crate) use localized::fold_case_cmp;
