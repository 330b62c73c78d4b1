mod llrb;
mod std_btree;

pub use llrb::{Keys, LlrbTreeMap, Range};
pub use std_btree::StdBTreeMap;
