use std::cmp::Ordering;
use std::fmt;

use crate::OrderedSymbolTable;
use crate::error::{Error, Result};

mod check;
mod iter;

pub use iter::{Keys, Range};

/// Ordered symbol table on a left-leaning red-black BST.
///
/// - Red links lean left, no node touches two red links, and every root-to-null path
///   crosses the same number of black links, so the height stays within
///   `2 * log2(n + 1)`.
/// - Every node stores the size of its subtree, which gives `rank` and `select` in
///   O(log n).
/// - Deletes borrow a red link from the sibling on the way down and rebalance on the
///   way up; a deleted inner node is replaced by its in-order successor.
#[derive(Clone)]
pub struct LlrbTreeMap<K, V> {
    root: Link<K, V>,
}

type Link<K, V> = Option<Box<Node<K, V>>>;

#[derive(Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    /// Color of the link from the parent.
    red: bool,
    size: usize,
    left: Link<K, V>,
    right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            red: true,
            size: 1,
            left: None,
            right: None,
        }
    }

    fn size(node: &Link<K, V>) -> usize {
        node.as_ref().map(|n| n.size).unwrap_or(0)
    }

    fn recalc(&mut self) {
        self.size = 1 + Self::size(&self.left) + Self::size(&self.right);
    }
}

impl<K, V> LlrbTreeMap<K, V> {
    pub const fn new() -> Self {
        Self { root: None }
    }

    pub fn len(&self) -> usize {
        Node::size(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes on the longest root-to-leaf path; 0 for an empty table.
    pub fn height(&self) -> usize {
        Self::height_of(self.root.as_deref())
    }

    fn height_of(node: Option<&Node<K, V>>) -> usize {
        match node {
            None => 0,
            Some(n) => {
                1 + Self::height_of(n.left.as_deref()).max(Self::height_of(n.right.as_deref()))
            }
        }
    }

    fn is_red(node: &Link<K, V>) -> bool {
        node.as_ref().map(|n| n.red).unwrap_or(false)
    }

    fn is_red_left_child(node: &Link<K, V>) -> bool {
        node.as_ref().is_some_and(|n| Self::is_red(&n.left))
    }

    /// Requires a right child; `h` is returned untouched otherwise.
    fn rotate_left(mut h: Box<Node<K, V>>) -> Box<Node<K, V>> {
        let Some(mut x) = h.right.take() else {
            return h;
        };
        h.right = x.left.take();
        x.red = h.red;
        h.red = true;
        x.size = h.size;
        h.recalc();
        x.left = Some(h);
        x
    }

    /// Requires a left child; `h` is returned untouched otherwise.
    fn rotate_right(mut h: Box<Node<K, V>>) -> Box<Node<K, V>> {
        let Some(mut x) = h.left.take() else {
            return h;
        };
        h.left = x.right.take();
        x.red = h.red;
        h.red = true;
        x.size = h.size;
        h.recalc();
        x.right = Some(h);
        x
    }

    fn flip_colors(h: &mut Node<K, V>) {
        h.red = !h.red;
        if let Some(left) = h.left.as_deref_mut() {
            left.red = !left.red;
        }
        if let Some(right) = h.right.as_deref_mut() {
            right.red = !right.red;
        }
    }

    fn balance(mut h: Box<Node<K, V>>) -> Box<Node<K, V>> {
        if Self::is_red(&h.right) && !Self::is_red(&h.left) {
            h = Self::rotate_left(h);
        }
        if Self::is_red(&h.left) && Self::is_red_left_child(&h.left) {
            h = Self::rotate_right(h);
        }
        if Self::is_red(&h.left) && Self::is_red(&h.right) {
            Self::flip_colors(&mut h);
        }
        h.recalc();
        h
    }

    // Assuming h is red and both h.left and h.left.left are black,
    // make h.left or one of its children red.
    fn move_red_left(mut h: Box<Node<K, V>>) -> Box<Node<K, V>> {
        Self::flip_colors(&mut h);
        if Self::is_red_left_child(&h.right) {
            h.right = h.right.take().map(Self::rotate_right);
            h = Self::rotate_left(h);
            Self::flip_colors(&mut h);
        }
        h
    }

    // Assuming h is red and both h.right and h.right.left are black,
    // make h.right or one of its children red.
    fn move_red_right(mut h: Box<Node<K, V>>) -> Box<Node<K, V>> {
        Self::flip_colors(&mut h);
        if Self::is_red_left_child(&h.left) {
            h = Self::rotate_right(h);
            Self::flip_colors(&mut h);
        }
        h
    }

    fn blacken_root(&mut self) {
        if let Some(root) = self.root.as_deref_mut() {
            root.red = false;
        }
    }

    // A 2-node root has nothing to lend; make it red so the first step down can borrow.
    fn redden_root(&mut self) {
        if let Some(root) = self.root.as_deref_mut()
            && !Self::is_red(&root.left)
            && !Self::is_red(&root.right)
        {
            root.red = true;
        }
    }

    fn delete_min_link(h: Link<K, V>) -> (Link<K, V>, Option<(K, V)>) {
        let Some(mut h) = h else {
            return (None, None);
        };
        if h.left.is_none() {
            let Node { key, value, right, .. } = *h;
            return (right, Some((key, value)));
        }
        if !Self::is_red(&h.left) && !Self::is_red_left_child(&h.left) {
            h = Self::move_red_left(h);
        }
        let (left, min) = Self::delete_min_link(h.left.take());
        h.left = left;
        (Some(Self::balance(h)), min)
    }

    fn delete_max_link(h: Link<K, V>) -> (Link<K, V>, Option<(K, V)>) {
        let Some(mut h) = h else {
            return (None, None);
        };
        if Self::is_red(&h.left) {
            h = Self::rotate_right(h);
        }
        if h.right.is_none() {
            let Node { key, value, left, .. } = *h;
            return (left, Some((key, value)));
        }
        if !Self::is_red(&h.right) && !Self::is_red_left_child(&h.right) {
            h = Self::move_red_right(h);
        }
        let (right, max) = Self::delete_max_link(h.right.take());
        h.right = right;
        (Some(Self::balance(h)), max)
    }

    /// Removes and returns the entry with the smallest key.
    pub fn delete_min(&mut self) -> Result<(K, V)> {
        self.redden_root();
        let (root, min) = Self::delete_min_link(self.root.take());
        self.root = root;
        self.blacken_root();
        min.ok_or(Error::empty("delete_min"))
    }

    /// Removes and returns the entry with the largest key.
    pub fn delete_max(&mut self) -> Result<(K, V)> {
        self.redden_root();
        let (root, max) = Self::delete_max_link(self.root.take());
        self.root = root;
        self.blacken_root();
        max.ok_or(Error::empty("delete_max"))
    }

    pub fn iter(&self) -> Range<'_, K, V> {
        Range::all(self.root.as_deref(), self.len())
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }
}

impl<K: Ord, V> LlrbTreeMap<K, V> {
    fn find(&self, key: &K) -> Option<&Node<K, V>> {
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            match key.cmp(&node.key) {
                Ordering::Less => cur = node.left.as_deref(),
                Ordering::Greater => cur = node.right.as_deref(),
                Ordering::Equal => return Some(node),
            }
        }
        None
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|n| &n.value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let mut cur = self.root.as_deref_mut();
        while let Some(node) = cur {
            match key.cmp(&node.key) {
                Ordering::Less => cur = node.left.as_deref_mut(),
                Ordering::Greater => cur = node.right.as_deref_mut(),
                Ordering::Equal => return Some(&mut node.value),
            }
        }
        None
    }

    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Inserts `key`, or overwrites its value and returns the old one.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let (root, old) = Self::put_link(self.root.take(), key, value);
        self.root = Some(root);
        self.blacken_root();
        old
    }

    fn put_link(h: Link<K, V>, key: K, value: V) -> (Box<Node<K, V>>, Option<V>) {
        let Some(mut h) = h else {
            return (Box::new(Node::new(key, value)), None);
        };
        let old = match key.cmp(&h.key) {
            Ordering::Less => {
                let (left, old) = Self::put_link(h.left.take(), key, value);
                h.left = Some(left);
                old
            }
            Ordering::Greater => {
                let (right, old) = Self::put_link(h.right.take(), key, value);
                h.right = Some(right);
                old
            }
            Ordering::Equal => {
                let old = std::mem::replace(&mut h.value, value);
                return (h, Some(old));
            }
        };
        (Self::balance(h), old)
    }

    /// Removes `key` and returns its value. An absent key leaves the table untouched.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        if !self.contains(key) {
            tracing::debug!(len = self.len(), "delete: key not present, ignoring");
            return None;
        }
        self.redden_root();
        let (root, removed) = Self::delete_link(self.root.take(), key);
        self.root = root;
        self.blacken_root();
        removed
    }

    // The key must be present: the descent relies on finding it before falling off.
    fn delete_link(h: Link<K, V>, key: &K) -> (Link<K, V>, Option<V>) {
        let Some(mut h) = h else {
            return (None, None);
        };
        if key < &h.key {
            if !Self::is_red(&h.left) && !Self::is_red_left_child(&h.left) {
                h = Self::move_red_left(h);
            }
            let (left, removed) = Self::delete_link(h.left.take(), key);
            h.left = left;
            return (Some(Self::balance(h)), removed);
        }

        if Self::is_red(&h.left) {
            h = Self::rotate_right(h);
        }
        if key == &h.key && h.right.is_none() {
            let Node { value, left, .. } = *h;
            return (left, Some(value));
        }
        if !Self::is_red(&h.right) && !Self::is_red_left_child(&h.right) {
            h = Self::move_red_right(h);
        }
        let removed = if key == &h.key {
            let (right, successor) = Self::delete_min_link(h.right.take());
            h.right = right;
            successor.map(|(key, value)| {
                h.key = key;
                std::mem::replace(&mut h.value, value)
            })
        } else {
            let (right, removed) = Self::delete_link(h.right.take(), key);
            h.right = right;
            removed
        };
        (Some(Self::balance(h)), removed)
    }

    pub fn min(&self) -> Result<&K> {
        let mut node = self.root.as_deref().ok_or(Error::empty("min"))?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Ok(&node.key)
    }

    pub fn max(&self) -> Result<&K> {
        let mut node = self.root.as_deref().ok_or(Error::empty("max"))?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Ok(&node.key)
    }

    /// Largest key `<= key`.
    pub fn floor(&self, key: &K) -> Option<&K> {
        let mut cur = self.root.as_deref();
        let mut candidate = None;
        while let Some(node) = cur {
            match key.cmp(&node.key) {
                Ordering::Equal => return Some(&node.key),
                Ordering::Less => cur = node.left.as_deref(),
                Ordering::Greater => {
                    candidate = Some(&node.key);
                    cur = node.right.as_deref();
                }
            }
        }
        candidate
    }

    /// Smallest key `>= key`.
    pub fn ceiling(&self, key: &K) -> Option<&K> {
        let mut cur = self.root.as_deref();
        let mut candidate = None;
        while let Some(node) = cur {
            match key.cmp(&node.key) {
                Ordering::Equal => return Some(&node.key),
                Ordering::Greater => cur = node.right.as_deref(),
                Ordering::Less => {
                    candidate = Some(&node.key);
                    cur = node.left.as_deref();
                }
            }
        }
        candidate
    }

    /// Key of 0-based rank `index` in sorted order.
    pub fn select(&self, index: usize) -> Result<&K> {
        let len = self.len();
        let out_of_range = Error::IndexOutOfRange { index, len };
        if index >= len {
            return Err(out_of_range);
        }
        let mut cur = self.root.as_deref();
        let mut rest = index;
        while let Some(node) = cur {
            let left_size = Node::size(&node.left);
            match rest.cmp(&left_size) {
                Ordering::Less => cur = node.left.as_deref(),
                Ordering::Equal => return Ok(&node.key),
                Ordering::Greater => {
                    rest -= left_size + 1;
                    cur = node.right.as_deref();
                }
            }
        }
        Err(out_of_range)
    }

    /// Number of keys strictly less than `key`.
    pub fn rank(&self, key: &K) -> usize {
        let mut cur = self.root.as_deref();
        let mut rank = 0;
        while let Some(node) = cur {
            match key.cmp(&node.key) {
                Ordering::Less => cur = node.left.as_deref(),
                Ordering::Equal => return rank + Node::size(&node.left),
                Ordering::Greater => {
                    rank += 1 + Node::size(&node.left);
                    cur = node.right.as_deref();
                }
            }
        }
        rank
    }

    /// Number of keys in `[lo, hi]`.
    pub fn count_range(&self, lo: &K, hi: &K) -> usize {
        if lo > hi {
            return 0;
        }
        self.rank(hi) - self.rank(lo) + usize::from(self.contains(hi))
    }

    /// Entries with keys in `[lo, hi]`, in ascending order.
    pub fn range(&self, lo: &K, hi: &K) -> Range<'_, K, V> {
        Range::seek(self.root.as_deref(), lo, self.count_range(lo, hi))
    }

    pub fn keys_range(&self, lo: &K, hi: &K) -> Keys<'_, K, V> {
        Keys::new(self.range(lo, hi))
    }
}

impl<K, V> Default for LlrbTreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for LlrbTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> Extend<(K, V)> for LlrbTreeMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for LlrbTreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V> IntoIterator for &'a LlrbTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Range<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Ord, V> OrderedSymbolTable for LlrbTreeMap<K, V> {
    type Key = K;
    type Value = V;

    fn new() -> Self {
        Self::new()
    }

    fn len(&self) -> usize {
        self.len()
    }

    fn get(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        self.put(key, value)
    }

    fn delete(&mut self, key: &K) -> Option<V> {
        self.delete(key)
    }

    fn delete_min(&mut self) -> Result<(K, V)> {
        self.delete_min()
    }

    fn delete_max(&mut self) -> Result<(K, V)> {
        self.delete_max()
    }

    fn min(&self) -> Result<&K> {
        self.min()
    }

    fn max(&self) -> Result<&K> {
        self.max()
    }

    fn floor(&self, key: &K) -> Option<&K> {
        self.floor(key)
    }

    fn ceiling(&self, key: &K) -> Option<&K> {
        self.ceiling(key)
    }

    fn select(&self, index: usize) -> Result<&K> {
        self.select(index)
    }

    fn rank(&self, key: &K) -> usize {
        self.rank(key)
    }

    fn keys(&self) -> impl Iterator<Item = &K> {
        self.keys()
    }

    fn keys_range(&self, lo: &K, hi: &K) -> impl Iterator<Item = &K> {
        self.keys_range(lo, hi)
    }
}
