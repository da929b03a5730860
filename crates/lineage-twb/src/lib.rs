//! `lineage-twb` turns a decoded workbook document tree into a
//! [`lineage_model::Graph`].
//!
//! The pipeline runs strictly left to right: tree -> nodes -> formula
//! references -> edges. XML decoding is an external collaborator; this crate
//! consumes its attributed-tree output (see [`tree`] docs for the shape) and
//! produces the queryable graph:
//!
//! ```
//! use lineage_twb::{parse_workbook, ParseOptions};
//! use serde_json::json;
//!
//! let tree = json!({
//!     "workbook": { "datasources": { "datasource": {
//!         "@name": "Sales",
//!         "column": [
//!             { "@name": "[Profit]", "@role": "measure", "@datatype": "real" },
//!             { "@name": "[Profit Sign]", "@role": "measure", "@datatype": "integer",
//!               "calculation": { "@formula": "SIGN([Profit])" } },
//!         ],
//!     }}},
//! });
//!
//! let graph = parse_workbook(&tree, &ParseOptions::default()).unwrap();
//! assert_eq!(graph.nodes.len(), 2);
//! assert_eq!(graph.referenced("Sales--Profit-Sign").len(), 1);
//! ```
//!
//! Everything is synchronous and pure; a failed load returns an error and
//! leaves any previously built graph in the caller's hands untouched.

mod builder;
mod entities;
mod error;
mod resolve;
mod scanner;
mod tree;

pub use builder::parse_workbook;
pub use entities::decode_entities;
pub use error::ParseError;
pub use scanner::{extract_references, FieldReference};
pub use tree::ParseOptions;
