//! Batch accumulation and commit message synthesis.

pub mod batch;
pub mod message;

pub use batch::{ChangeBatch, SharedBatch};
pub use message::{
    BULLET, CommitMessage, MULTIPLE_UPDATES_HEADER, summarize, summarize_changes,
};
