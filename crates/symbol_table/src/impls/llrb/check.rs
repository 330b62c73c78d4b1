use super::{LlrbTreeMap, Node};
use crate::error::InvariantViolation;

impl<K: Ord, V> LlrbTreeMap<K, V> {
    /// Verifies every structural invariant and reports the first one broken.
    ///
    /// Each step is a full traversal, so this is meant for tests.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let root = self.root.as_deref();
        if !Self::is_ordered(root, None, None) {
            return Err(InvariantViolation::NotOrdered);
        }
        Self::check_sizes(root)?;
        self.check_ranks()?;
        if root.is_some_and(|r| r.red) {
            return Err(InvariantViolation::RedRoot);
        }
        Self::check_colors(root)?;
        Self::check_black_balance(root)
    }

    /// `true` when [`validate`](Self::validate) finds nothing wrong.
    pub fn check(&self) -> bool {
        match self.validate() {
            Ok(()) => true,
            Err(violation) => {
                tracing::warn!(%violation, len = self.len(), "llrb structural check failed");
                false
            }
        }
    }

    fn is_ordered(node: Option<&Node<K, V>>, lo: Option<&K>, hi: Option<&K>) -> bool {
        let Some(node) = node else {
            return true;
        };
        if lo.is_some_and(|lo| node.key <= *lo) || hi.is_some_and(|hi| node.key >= *hi) {
            return false;
        }
        Self::is_ordered(node.left.as_deref(), lo, Some(&node.key))
            && Self::is_ordered(node.right.as_deref(), Some(&node.key), hi)
    }

    fn check_sizes(node: Option<&Node<K, V>>) -> Result<usize, InvariantViolation> {
        let Some(node) = node else {
            return Ok(0);
        };
        let expected =
            1 + Self::check_sizes(node.left.as_deref())? + Self::check_sizes(node.right.as_deref())?;
        if node.size != expected {
            return Err(InvariantViolation::SizeMismatch {
                expected,
                found: node.size,
            });
        }
        Ok(expected)
    }

    fn check_ranks(&self) -> Result<(), InvariantViolation> {
        for index in 0..self.len() {
            match self.select(index) {
                Ok(key) if self.rank(key) == index => {}
                _ => return Err(InvariantViolation::RankMismatch { index }),
            }
        }
        for key in self.keys() {
            let index = self.rank(key);
            if self.select(index).ok() != Some(key) {
                return Err(InvariantViolation::RankMismatch { index });
            }
        }
        Ok(())
    }

    fn check_colors(node: Option<&Node<K, V>>) -> Result<(), InvariantViolation> {
        let Some(node) = node else {
            return Ok(());
        };
        if Self::is_red(&node.right) {
            return Err(InvariantViolation::RedRightLink);
        }
        if node.red && Self::is_red(&node.left) {
            return Err(InvariantViolation::ConsecutiveReds);
        }
        Self::check_colors(node.left.as_deref())?;
        Self::check_colors(node.right.as_deref())
    }

    fn check_black_balance(root: Option<&Node<K, V>>) -> Result<(), InvariantViolation> {
        let mut expected = 0;
        let mut cur = root;
        while let Some(node) = cur {
            if !node.red {
                expected += 1;
            }
            cur = node.left.as_deref();
        }
        Self::check_blacks(root, 0, expected)
    }

    fn check_blacks(
        node: Option<&Node<K, V>>,
        blacks: usize,
        expected: usize,
    ) -> Result<(), InvariantViolation> {
        let Some(node) = node else {
            if blacks != expected {
                return Err(InvariantViolation::UnbalancedBlacks {
                    expected,
                    found: blacks,
                });
            }
            return Ok(());
        };
        let blacks = blacks + usize::from(!node.red);
        Self::check_blacks(node.left.as_deref(), blacks, expected)?;
        Self::check_blacks(node.right.as_deref(), blacks, expected)
    }
}
