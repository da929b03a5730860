use thiserror::Error;

/// Errors raised while turning a decoded workbook tree into a lineage graph.
///
/// Every variant is fatal for the whole load: the entry point returns at the
/// first failure and produces no partial graph. Conditions the pipeline
/// absorbs locally (unrecognized data types, unresolved references) never
/// appear here.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The caller supplied a value of a kind the pipeline cannot read as a
    /// document tree. Rejected before any parsing begins.
    #[error("unsupported input: expected a decoded document tree, got {0}")]
    UnsupportedInput(&'static str),

    /// The decoded tree lacks the expected top-level shape.
    #[error("document structure error: {0}")]
    Structure(String),

    /// A field record lacks the mandatory role attribute.
    #[error("Role is required for field '{field}' in datasource '{datasource}'")]
    MissingRole { datasource: String, field: String },

    /// A field record carries a role outside the closed measure/dimension set.
    #[error("invalid role '{role}' for field '{field}' in datasource '{datasource}'")]
    InvalidRole {
        datasource: String,
        field: String,
        role: String,
    },

    /// Two distinct field records slugified to the same node id.
    #[error("duplicate field id '{id}' (from datasource '{datasource}', field '{field}')")]
    DuplicateId {
        id: String,
        datasource: String,
        field: String,
    },
}
