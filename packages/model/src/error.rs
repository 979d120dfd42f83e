//! Error types for the document model

use crate::NodeId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Offset {offset} out of range for {path} (length {len})")]
    OutOfRange {
        path: String,
        offset: usize,
        len: usize,
    },

    #[error("Node {node} is still referenced by {referrer}")]
    DanglingReference { node: NodeId, referrer: NodeId },

    #[error("Node {node} is already attached to {owner}")]
    AlreadyAttached { node: NodeId, owner: NodeId },

    #[error("Would create cycle: {0} is an ancestor of {1}")]
    CycleDetected(NodeId, NodeId),

    #[error("Node id already in use: {0}")]
    DuplicateId(NodeId),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid content for node type {node_type}: expected {expected}")]
    InvalidContent {
        node_type: String,
        expected: &'static str,
    },

    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),
}

/// Result alias used throughout the model
pub type DocumentResult<T> = Result<T, DocumentError>;
