//! cloudsketch core types
//!
//! This crate holds the graph model behind cloudsketch diagrams:
//!
//! - **Identifiers**: interned node and cluster references ([`identifier::Id`])
//! - **Kinds**: the services a node can depict ([`kind::NodeKind`])
//! - **Attributes**: ordered pass-through Graphviz attributes ([`attrs::Attrs`])
//! - **Diagram**: the frozen, validated graph ([`diagram::Diagram`])
//! - **Scope**: the closure-based builder used to declare a diagram ([`scope::Scope`])

pub mod attrs;
pub mod diagram;
pub mod error;
pub mod identifier;
pub mod kind;
pub mod scope;

pub use error::GraphError;
