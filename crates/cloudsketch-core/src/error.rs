//! Structural errors raised while freezing a diagram.

use thiserror::Error;

use crate::identifier::Id;

/// A diagram description that cannot be turned into a valid graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("edge #{edge} references node #{node}, which is not declared before it")]
    DanglingEdge { edge: usize, node: usize },

    #[error("node `{0}` is declared more than once")]
    DuplicateNode(Id),

    #[error("cluster `{0}` is declared more than once")]
    DuplicateCluster(Id),

    #[error("`{0}` is reserved for generated references")]
    ReservedId(Id),

    #[error("cluster #{cluster} is not declared before `{referrer}`")]
    UnknownCluster { cluster: usize, referrer: String },

    #[error("cluster `{0}` has no members")]
    EmptyCluster(String),

    #[error("unknown node kind `{0}`")]
    UnknownKind(String),
}
