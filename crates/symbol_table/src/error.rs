use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a symbol-table operation.
///
/// Absent keys are not errors; lookups and `delete` report them with `None`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// `min`, `max`, `delete_min` or `delete_max` on an empty table.
    #[error("{op} called on an empty symbol table")]
    EmptyTree { op: &'static str },

    /// `select` with an index outside `[0, len)`.
    #[error("select index {index} out of range for a table of {len} keys")]
    IndexOutOfRange { index: usize, len: usize },
}

impl Error {
    pub(crate) fn empty(op: &'static str) -> Self {
        Error::EmptyTree { op }
    }
}

/// First structural invariant found broken by [`crate::LlrbTreeMap::validate`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("keys are not in symmetric order")]
    NotOrdered,

    #[error("subtree size is {found}, expected {expected}")]
    SizeMismatch { expected: usize, found: usize },

    #[error("rank(select({index})) != {index}")]
    RankMismatch { index: usize },

    #[error("root link is red")]
    RedRoot,

    #[error("red link leans right")]
    RedRightLink,

    #[error("two red links in a row")]
    ConsecutiveReds,

    #[error("unbalanced black links: expected {expected} on every path, found {found}")]
    UnbalancedBlacks { expected: usize, found: usize },
}
