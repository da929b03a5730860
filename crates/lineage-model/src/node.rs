use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ident::strip_brackets;

/// Data type of a workbook field.
///
/// The set is closed; anything the source document reports outside of it maps
/// to [`DataType::String`] (see [`DataType::from_raw`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    #[default]
    String,
    Integer,
    Real,
    Boolean,
    Date,
    Datetime,
    Spatial,
}

impl DataType {
    /// Maps a raw document datatype string, case-insensitively.
    ///
    /// Unrecognized values fall back to [`DataType::String`]. This is
    /// intentionally lenient, in contrast to [`Role::from_raw`]: a wrong data
    /// type degrades display only, while a wrong role would misclassify the
    /// field everywhere it is aggregated.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "integer" => DataType::Integer,
            "real" => DataType::Real,
            "boolean" => DataType::Boolean,
            "date" => DataType::Date,
            "datetime" => DataType::Datetime,
            "spatial" => DataType::Spatial,
            _ => DataType::String,
        }
    }
}

/// Raised when a field record carries a role outside the closed set.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid role '{0}' (expected 'measure' or 'dimension')")]
pub struct InvalidRoleError(pub String);

/// Analytical role of a field. Mandatory: there is no default role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Measure,
    Dimension,
}

impl Role {
    /// Maps a raw document role string, case-insensitively.
    pub fn from_raw(raw: &str) -> Result<Self, InvalidRoleError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "measure" => Ok(Role::Measure),
            "dimension" => Ok(Role::Dimension),
            _ => Err(InvalidRoleError(raw.to_string())),
        }
    }

    /// Canonical lowercase spelling, matching the document vocabulary.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Measure => "measure",
            Role::Dimension => "dimension",
        }
    }
}

/// Shared record carried by every [`Node`] variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Stable identifier, unique within a loaded document. See
    /// [`crate::node_id`] for the derivation.
    pub id: String,
    /// Raw column name, possibly bracket-wrapped (e.g. `[Sales Amount]`).
    pub name: String,
    /// User-facing name; see [`display_name`] for the derivation.
    pub display_name: String,
    pub data_type: DataType,
    pub role: Role,
    /// Name of the datasource that owns this field.
    pub datasource: String,
}

/// A node in the field-lineage graph.
///
/// Classification happens once, at build time; downstream code matches on the
/// variant instead of probing optional attributes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// A field sourced directly from an external connection (no formula).
    Datasource(Field),
    /// A field whose value derives from a formula that may name other fields.
    Calculation {
        #[serde(flatten)]
        field: Field,
        /// Formula text with document entities already decoded.
        formula: String,
    },
    /// A user-configurable, workbook-level value.
    Parameter(Field),
}

impl Node {
    /// The shared field record, regardless of variant.
    pub fn field(&self) -> &Field {
        match self {
            Node::Datasource(field) | Node::Parameter(field) => field,
            Node::Calculation { field, .. } => field,
        }
    }

    pub fn id(&self) -> &str {
        &self.field().id
    }

    pub fn name(&self) -> &str {
        &self.field().name
    }

    pub fn display_name(&self) -> &str {
        &self.field().display_name
    }

    pub fn datasource(&self) -> &str {
        &self.field().datasource
    }

    /// Decoded formula text for calculations, `None` otherwise.
    pub fn formula(&self) -> Option<&str> {
        match self {
            Node::Calculation { formula, .. } => Some(formula),
            _ => None,
        }
    }
}

/// Derive the user-facing name for a field.
///
/// Caption wins when present; otherwise a bracket-wrapped raw name is
/// unwrapped; otherwise the raw name is used unchanged.
pub fn display_name(caption: Option<&str>, name: &str) -> String {
    match caption {
        Some(caption) if !caption.is_empty() => caption.to_string(),
        _ => strip_brackets(name).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_mapping_is_case_insensitive_and_defaults_to_string() {
        assert_eq!(DataType::from_raw("Integer"), DataType::Integer);
        assert_eq!(DataType::from_raw("DATETIME"), DataType::Datetime);
        assert_eq!(DataType::from_raw("spatial"), DataType::Spatial);
        assert_eq!(DataType::from_raw("table"), DataType::String);
        assert_eq!(DataType::from_raw(""), DataType::String);
    }

    #[test]
    fn role_mapping_has_no_default() {
        assert_eq!(Role::from_raw("measure"), Ok(Role::Measure));
        assert_eq!(Role::from_raw("Dimension"), Ok(Role::Dimension));
        assert_eq!(
            Role::from_raw("quantitative"),
            Err(InvalidRoleError("quantitative".to_string()))
        );
    }

    #[test]
    fn display_name_prefers_caption_then_unwrapped_name() {
        assert_eq!(display_name(Some("Sales"), "[sales_amt]"), "Sales");
        assert_eq!(display_name(None, "[Sales Amount]"), "Sales Amount");
        assert_eq!(display_name(None, "Sales Amount"), "Sales Amount");
        assert_eq!(display_name(Some(""), "[Sales]"), "Sales");
    }
}
