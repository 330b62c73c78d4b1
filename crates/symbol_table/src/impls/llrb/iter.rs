use std::iter::FusedIterator;

use super::Node;

/// In-order iterator over the entries of an [`LlrbTreeMap`](super::LlrbTreeMap).
///
/// The number of entries it yields is fixed when it is created, so it stops right
/// after the last key inside the requested range without looking past it.
pub struct Range<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Range<'a, K, V> {
    pub(super) fn all(root: Option<&'a Node<K, V>>, len: usize) -> Self {
        let mut range = Self {
            stack: Vec::new(),
            remaining: len,
        };
        range.push_left(root);
        range
    }

    fn push_left(&mut self, mut node: Option<&'a Node<K, V>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a, K: Ord, V> Range<'a, K, V> {
    /// Positions the iterator on the smallest key `>= lo`.
    pub(super) fn seek(root: Option<&'a Node<K, V>>, lo: &K, count: usize) -> Self {
        let mut stack = Vec::new();
        if count > 0 {
            let mut cur = root;
            while let Some(node) = cur {
                if lo <= &node.key {
                    stack.push(node);
                    cur = node.left.as_deref();
                } else {
                    cur = node.right.as_deref();
                }
            }
        }
        Self {
            stack,
            remaining: count,
        }
    }
}

impl<'a, K, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.stack.pop()?;
        self.remaining -= 1;
        self.push_left(node.right.as_deref());
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Range<'_, K, V> {}

impl<K, V> FusedIterator for Range<'_, K, V> {}

/// Keys of a [`Range`], in ascending order.
pub struct Keys<'a, K, V> {
    inner: Range<'a, K, V>,
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(super) fn new(inner: Range<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}
