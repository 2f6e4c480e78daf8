//! Error conditions raised while building or resolving localized strings.

use thiserror::Error;

/// Failure raised by [`LocalizedString`](crate::i18n::LocalizedString) construction
/// or resolution, and by langpath parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocalizedError {
    /// The pair sequence handed to the constructor was empty.
    #[error("localized string needs at least one tag/text pair")]
    EmptyInput,

    /// The same tag appeared twice in one instance.
    #[error("duplicate tag '{0}' in localized string")]
    DuplicateTag(String),

    /// An explicit default tag was requested that the instance does not carry.
    #[error("default tag '{0}' has no variant in this localized string")]
    UnknownDefaultTag(String),

    /// Nothing to resolve: no langpath tag matched and no default exists.
    #[error("localized string has no value to resolve")]
    EmptyValue,

    /// A langpath string contained no tags.
    #[error("langpath contains no tags")]
    EmptyLangpath,
}
