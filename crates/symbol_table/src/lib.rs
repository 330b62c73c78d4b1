mod error;

pub mod impls;

pub use error::{Error, InvariantViolation, Result};
pub use impls::{Keys, LlrbTreeMap, Range, StdBTreeMap};

/// Ordered symbol table interface.
///
/// - Keys are unique and totally ordered; each maps to one value.
/// - `put` overwrites the existing value and returns the old one.
/// - `delete` on an absent key is a no-op that returns `None`.
/// - `min`, `max`, `delete_min` and `delete_max` fail with [`Error::EmptyTree`] on an
///   empty table; `select` fails with [`Error::IndexOutOfRange`] outside `[0, len)`.
/// - `rank(key)` counts keys strictly less than `key`; `select(rank(k)) == k` for every
///   present key.
/// - `keys_range(lo, hi)` yields the keys in `[lo, hi]` in ascending order, nothing when
///   `lo > hi`.
pub trait OrderedSymbolTable {
    type Key: Ord;
    type Value;

    fn new() -> Self;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, key: &Self::Key) -> Option<&Self::Value>;

    fn contains(&self, key: &Self::Key) -> bool {
        self.get(key).is_some()
    }

    fn put(&mut self, key: Self::Key, value: Self::Value) -> Option<Self::Value>;

    fn delete(&mut self, key: &Self::Key) -> Option<Self::Value>;

    fn delete_min(&mut self) -> Result<(Self::Key, Self::Value)>;

    fn delete_max(&mut self) -> Result<(Self::Key, Self::Value)>;

    fn min(&self) -> Result<&Self::Key>;

    fn max(&self) -> Result<&Self::Key>;

    fn floor(&self, key: &Self::Key) -> Option<&Self::Key>;

    fn ceiling(&self, key: &Self::Key) -> Option<&Self::Key>;

    fn select(&self, index: usize) -> Result<&Self::Key>;

    fn rank(&self, key: &Self::Key) -> usize;

    fn keys(&self) -> impl Iterator<Item = &Self::Key>;

    fn keys_range(&self, lo: &Self::Key, hi: &Self::Key) -> impl Iterator<Item = &Self::Key>;

    /// Number of keys in `[lo, hi]`.
    fn count_range(&self, lo: &Self::Key, hi: &Self::Key) -> usize {
        if lo > hi {
            return 0;
        }
        self.rank(hi) - self.rank(lo) + usize::from(self.contains(hi))
    }
}
