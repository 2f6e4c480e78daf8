//! Collate: ordering that may depend on the active langpath.

use crate::i18n::{fold_case_cmp, Langpath, LocalizedString};
use std::cmp::Ordering;

/// A sort key that can be ordered under a langpath.
///
/// Plain values ignore the langpath; [`LocalizedString`] resolves both sides
/// through it before comparing.
pub trait Collate {
    fn collate(&self, other: &Self, langpath: &Langpath) -> Ordering;

    /// Case-insensitive variant; defaults to [`collate`](Self::collate) for
    /// keys without letter case.
    fn collate_folded(&self, other: &Self, langpath: &Langpath) -> Ordering {
        self.collate(other, langpath)
    }
}

macro_rules! collate_by_ord {
    ($($t:ty),* $(,)?) => {
        $(
            impl Collate for $t {
                fn collate(&self, other: &Self, _langpath: &Langpath) -> Ordering {
                    self.cmp(other)
                }
            }
        )*
    };
}

collate_by_ord!(bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl Collate for str {
    fn collate(&self, other: &Self, _langpath: &Langpath) -> Ordering {
        self.cmp(other)
    }

    fn collate_folded(&self, other: &Self, _langpath: &Langpath) -> Ordering {
        fold_case_cmp(self, other)
    }
}

impl Collate for String {
    fn collate(&self, other: &Self, langpath: &Langpath) -> Ordering {
        self.as_str().collate(other.as_str(), langpath)
    }

    fn collate_folded(&self, other: &Self, langpath: &Langpath) -> Ordering {
        self.as_str().collate_folded(other.as_str(), langpath)
    }
}

impl Collate for LocalizedString {
    fn collate(&self, other: &Self, langpath: &Langpath) -> Ordering {
        LocalizedString::compare(self, other, langpath)
    }

    fn collate_folded(&self, other: &Self, langpath: &Langpath) -> Ordering {
        LocalizedString::compare_case_insensitive(self, other, langpath)
    }
}

impl<K: Collate + ?Sized> Collate for &K {
    fn collate(&self, other: &Self, langpath: &Langpath) -> Ordering {
        (**self).collate(*other, langpath)
    }

    fn collate_folded(&self, other: &Self, langpath: &Langpath) -> Ordering {
        (**self).collate_folded(*other, langpath)
    }
}

/// Missing keys sort first.
impl<K: Collate> Collate for Option<K> {
    fn collate(&self, other: &Self, langpath: &Langpath) -> Ordering {
        match (self, other) {
            (Some(a), Some(b)) => a.collate(b, langpath),
            (a, b) => a.is_some().cmp(&b.is_some()),
        }
    }

    fn collate_folded(&self, other: &Self, langpath: &Langpath) -> Ordering {
        match (self, other) {
            (Some(a), Some(b)) => a.collate_folded(b, langpath),
            (a, b) => a.is_some().cmp(&b.is_some()),
        }
    }
}

impl<A: Collate, B: Collate> Collate for (A, B) {
    fn collate(&self, other: &Self, langpath: &Langpath) -> Ordering {
        self.0
            .collate(&other.0, langpath)
            .then_with(|| self.1.collate(&other.1, langpath))
    }

    fn collate_folded(&self, other: &Self, langpath: &Langpath) -> Ordering {
        self.0
            .collate_folded(&other.0, langpath)
            .then_with(|| self.1.collate_folded(&other.1, langpath))
    }
}
