//! OrderedKeyedSet: unique members kept sorted by a pluggable key extractor.
//!
//! Members are shared handles (`Rc<T>`) and are compared by identity, so two
//! distinct members may carry equal keys. The order is maintained
//! incrementally by [`add`](OrderedKeyedSet::add) and
//! [`remove`](OrderedKeyedSet::remove), and rebuilt from scratch only by
//! [`resort`](OrderedKeyedSet::resort).
//!
//! The set never re-sorts on its own. When something the key depends on
//! changes (the active langpath, the key extractor, the direction, or a
//! member's own fields) the caller batches those changes and calls `resort`
//! once.
//!
//! Positional updates compare keys under the langpath snapshot taken by the
//! last `resort` (or at creation), which is the langpath the current order was
//! built with. Using `add`, `remove` or `has` after the context's langpath moved
//! on logs a warning once per langpath change.
//!
//! A member whose key changed without a `resort` can be missed by `has` (which
//! only searches the member's key range) while `add` still reports it as
//! present (it falls back to a linear identity scan).

use crate::collections::Collate;
use crate::i18n::{Langpath, ResolutionContext, ResolutionMetrics};
use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;
use std::rc::Rc;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

type KeyFn<T, K> = Box<dyn Fn(&T) -> K>;
type CompareFn<K> = Box<dyn Fn(&K, &K, &Langpath) -> Ordering>;

/// Sort direction of an [`OrderedKeyedSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }

    /// Where the smallest keys (including `None`) end up: `"first"` or `"last"`.
    pub fn smallest_end(self) -> &'static str {
        match self {
            Direction::Ascending => "first",
            Direction::Descending => "last",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Direction::Ascending),
            "desc" | "descending" => Ok(Direction::Descending),
            other => Err(format!("Unknown sort direction: '{}'", other)),
        }
    }
}

/// Ordered collection of unique (by identity) members.
///
/// # Example
/// ```
/// use langpath_sort::collections::OrderedKeyedSet;
/// use langpath_sort::i18n::{Langpath, LocalizedString, ResolutionContext};
/// use std::rc::Rc;
///
/// let ctx = ResolutionContext::new(Langpath::new(["fr"]));
/// let mut set = OrderedKeyedSet::with_context(|s: &LocalizedString| s.clone(), ctx.clone());
/// set.add(Rc::new(LocalizedString::new([("en", "dog"), ("fr", "chien")]).unwrap()));
/// set.add(Rc::new(LocalizedString::new([("en", "cat"), ("fr", "chat")]).unwrap()));
///
/// ctx.set(Langpath::new(["en"]));
/// set.resort();
/// let labels: Vec<String> = set
///     .iter()
///     .map(|s| s.resolve_in(&ctx).unwrap().to_string())
///     .collect();
/// assert_eq!(labels, ["cat", "dog"]);
/// ```
pub struct OrderedKeyedSet<T, K> {
    members: Vec<Rc<T>>,
    key_fn: KeyFn<T, K>,
    compare: CompareFn<K>,
    direction: Direction,
    context: ResolutionContext,
    /// Langpath the current order was computed under
    sorted_under: Arc<Langpath>,
    /// Context generation `sorted_under` belongs to
    generation: u64,
    /// Last stale generation a warning was logged for
    warned_generation: Cell<u64>,
}

impl<T, K: Collate + 'static> OrderedKeyedSet<T, K> {
    /// Empty set ordered by `key_fn`, resolving against the process-wide context.
    pub fn new<F>(key_fn: F) -> Self
    where
        F: Fn(&T) -> K + 'static,
    {
        Self::with_context(key_fn, ResolutionContext::global().clone())
    }

    /// Empty set ordered by `key_fn`, resolving against `context`.
    pub fn with_context<F>(key_fn: F, context: ResolutionContext) -> Self
    where
        F: Fn(&T) -> K + 'static,
    {
        Self::with_comparator(key_fn, K::collate, context)
    }

    /// Switch to case-insensitive ordering of the keys (takes effect on the
    /// next `resort`).
    pub fn case_insensitive(mut self) -> Self {
        self.compare = Box::new(K::collate_folded);
        self
    }
}

impl<T, K> OrderedKeyedSet<T, K> {
    /// Empty set with a custom key comparison.
    pub fn with_comparator<F, C>(key_fn: F, compare: C, context: ResolutionContext) -> Self
    where
        F: Fn(&T) -> K + 'static,
        C: Fn(&K, &K, &Langpath) -> Ordering + 'static,
    {
        let (sorted_under, generation) = context.versioned_snapshot();
        Self {
            members: Vec::new(),
            key_fn: Box::new(key_fn),
            compare: Box::new(compare),
            direction: Direction::default(),
            context,
            sorted_under,
            generation,
            warned_generation: Cell::new(generation),
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn context(&self) -> &ResolutionContext {
        &self.context
    }

    /// Langpath the current order was computed under.
    pub fn sorted_under(&self) -> &Langpath {
        &self.sorted_under
    }

    /// Whether the context's langpath changed since the order was computed.
    pub fn is_stale(&self) -> bool {
        self.context.generation() != self.generation
    }

    /// Insert `member` at its sorted position.
    ///
    /// Among members with equal keys the newcomer goes last.
    ///
    /// Presence is checked by identity over the whole set, so a member whose
    /// key changed without a `resort` is still reported as present even when
    /// [`has`](Self::has) misses it.
    ///
    /// # Returns
    /// `false` if this exact handle is already present (the set is unchanged).
    pub fn add(&mut self, member: Rc<T>) -> bool {
        self.warn_if_stale("add");
        if self.position(&member).is_some() {
            return false;
        }
        let key = self.key_of(&member);
        let index = self.equal_range(&key).end;
        self.members.insert(index, member);
        debug!("Added member at {} of {}", index, self.members.len());
        true
    }

    /// Add every member of `members`; returns how many were new.
    pub fn extend<I>(&mut self, members: I) -> usize
    where
        I: IntoIterator<Item = Rc<T>>,
    {
        members
            .into_iter()
            .map(|member| self.add(member))
            .filter(|added| *added)
            .count()
    }

    /// Remove `member` by identity.
    ///
    /// # Returns
    /// The removed handle, or `None` if it was not in the set.
    pub fn remove(&mut self, member: &Rc<T>) -> Option<Rc<T>> {
        self.warn_if_stale("remove");
        let index = self.position(member)?;
        Some(self.members.remove(index))
    }

    /// Identity membership test by binary search on the member's key.
    ///
    /// A member whose key changed since it was placed may be missed until the
    /// next `resort`.
    pub fn has(&self, member: &Rc<T>) -> bool {
        self.warn_if_stale("has");
        self.locate(member).is_some()
    }

    /// Current index of `member` in iteration order.
    ///
    /// Tries the member's key range first and falls back to a linear scan, so
    /// a member is found even if its key changed without a `resort`.
    pub fn position(&self, member: &Rc<T>) -> Option<usize> {
        self.locate(member).or_else(|| {
            let index = self.members.iter().position(|m| Rc::ptr_eq(m, member))?;
            debug!(
                "Member found at {} outside its key range; the set needs a resort",
                index
            );
            Some(index)
        })
    }

    pub fn get(&self, index: usize) -> Option<&Rc<T>> {
        self.members.get(index)
    }

    pub fn first(&self) -> Option<&Rc<T>> {
        self.members.first()
    }

    pub fn last(&self) -> Option<&Rc<T>> {
        self.members.last()
    }

    /// First member (in iteration order) whose key compares equal to `key`.
    pub fn find_by_key(&self, key: &K) -> Option<&Rc<T>> {
        let range = self.equal_range(key);
        self.members[range].first()
    }

    /// Members in sorted order.
    ///
    /// The iterator borrows the set, so the set cannot change while it runs;
    /// call [`to_vec`](Self::to_vec) for a snapshot that outlives mutation.
    pub fn iter(&self) -> std::slice::Iter<'_, Rc<T>> {
        self.members.iter()
    }

    /// Fold over the members in sorted order.
    pub fn reduce<B, F>(&self, init: B, f: F) -> B
    where
        F: FnMut(B, &Rc<T>) -> B,
    {
        self.iter().fold(init, f)
    }

    pub fn to_vec(&self) -> Vec<Rc<T>> {
        self.members.clone()
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Rebuild the order from scratch.
    ///
    /// Reads the context's langpath once, evaluates every member's key once,
    /// and runs a stable sort: members with equal keys keep their relative
    /// order. Handles are moved, never replaced.
    pub fn resort(&mut self) {
        let (langpath, generation) = self.context.versioned_snapshot();

        let key_fn = &self.key_fn;
        let mut keyed: Vec<(K, Rc<T>)> = self
            .members
            .drain(..)
            .map(|member| (key_fn(&*member), member))
            .collect();

        let compare = &self.compare;
        let direction = self.direction;
        keyed.sort_by(|(a, _), (b, _)| direction.apply(compare(a, b, langpath.as_ref())));

        self.members.extend(keyed.into_iter().map(|(_, member)| member));
        self.sorted_under = langpath;
        self.generation = generation;

        ResolutionMetrics::global().record_resort();
        debug!(
            "Resorted {} members under langpath '{}'",
            self.members.len(),
            self.sorted_under
        );
    }

    /// Change what drives the order. Takes effect on the next `resort`.
    pub fn set_key_extractor<F>(&mut self, key_fn: F)
    where
        F: Fn(&T) -> K + 'static,
    {
        self.key_fn = Box::new(key_fn);
    }

    /// Change the key comparison. Takes effect on the next `resort`.
    pub fn set_comparator<C>(&mut self, compare: C)
    where
        C: Fn(&K, &K, &Langpath) -> Ordering + 'static,
    {
        self.compare = Box::new(compare);
    }

    /// Change the direction. Takes effect on the next `resort`.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Check that iteration order is non-decreasing under the langpath the
    /// order was computed with.
    pub fn validate(&self) -> bool {
        self.members.windows(2).all(|pair| {
            let a = self.key_of(&pair[0]);
            let b = self.key_of(&pair[1]);
            self.order(&a, &b) != Ordering::Greater
        })
    }

    fn key_of(&self, member: &Rc<T>) -> K {
        (self.key_fn)(&**member)
    }

    fn order(&self, a: &K, b: &K) -> Ordering {
        self.direction.apply((self.compare)(a, b, self.sorted_under.as_ref()))
    }

    fn warn_if_stale(&self, operation: &str) {
        let current = self.context.generation();
        if current == self.generation || current == self.warned_generation.get() {
            return;
        }
        self.warned_generation.set(current);
        warn!(
            "{} on a stale set: langpath changed from '{}' to '{}'; call resort",
            operation,
            self.sorted_under,
            self.context.snapshot()
        );
    }

    /// Indices of members whose key compares equal to `key`.
    fn equal_range(&self, key: &K) -> Range<usize> {
        let start = self
            .members
            .partition_point(|m| self.order(&self.key_of(m), key) == Ordering::Less);
        let len = self.members[start..]
            .partition_point(|m| self.order(&self.key_of(m), key) != Ordering::Greater);
        start..start + len
    }

    fn locate(&self, member: &Rc<T>) -> Option<usize> {
        let key = self.key_of(member);
        self.equal_range(&key)
            .find(|&i| Rc::ptr_eq(&self.members[i], member))
    }
}

impl<'a, T, K> IntoIterator for &'a OrderedKeyedSet<T, K> {
    type Item = &'a Rc<T>;
    type IntoIter = std::slice::Iter<'a, Rc<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Debug, K> fmt::Debug for OrderedKeyedSet<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedKeyedSet")
            .field("direction", &self.direction)
            .field("sorted_under", &self.sorted_under.to_string())
            .field("members", &self.members)
            .finish()
    }
}
