//! Ordered dictionary on a general balanced tree.
//!
//! The tree carries no per-node balance data. After an insertion lands too
//! deep for the current size, the smallest too-light subtree on the insertion
//! path is rebuilt into perfect balance (vine-to-tree compaction). Deletions
//! are paid for by an occasional rebuild of the whole tree.

mod arena;
mod balance;
mod config;
mod dict;
mod dump;
mod error;
mod policy;

#[cfg(test)]
mod proptests;

pub use arena::NodeRef;
pub use config::{
    Config, DEFAULT_BALANCE, DEFAULT_MAX_DELETIONS, DEFAULT_MAX_HEIGHT, DUMP_DEPTH,
    MinWeightTable, SCREEN_WIDTH,
};
pub use dict::Dictionary;
pub use dump::Dump;
pub use error::{Error, Result};
pub use policy::{DefaultPolicy, KeyPolicy, LessOnly};
