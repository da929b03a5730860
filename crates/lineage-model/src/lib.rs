//! `lineage-model` defines the core in-memory field-lineage data structures.
//!
//! The crate is intentionally self-contained so it can be reused by:
//! - document ingestion layers (e.g. the workbook-tree parser)
//! - presentation layers via `serde` (JSON-safe schema)
//!
//! The model is a typed node map plus a flat list of direct reference edges;
//! [`Graph`] answers direct and transitive ("who references me" / "what do I
//! reference") lineage queries over them.

mod graph;
mod ident;
mod node;

pub use graph::{Graph, Reference, ReferenceTarget};
pub use ident::{node_id, slug, strip_brackets};
pub use node::{display_name, DataType, Field, InvalidRoleError, Node, Role};
