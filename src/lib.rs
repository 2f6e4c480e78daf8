//! Langpath-aware sorting: localized strings resolved through a mutable
//! language preference, and ordered sets that re-sort on demand when that
//! preference changes.

pub mod collections;
pub mod config;
pub mod i18n;
pub mod records;
