//! Node construction: walks the decoded workbook tree, classifies each field
//! record into a [`Node`] variant, and hands the finished node map to the
//! reference resolver.

use std::sync::OnceLock;

use indexmap::{map::Entry, IndexMap};
use regex::Regex;
use serde_json::Value;

use lineage_model::{display_name, node_id, DataType, Field, Graph, Node, Role};

use crate::entities::decode_entities;
use crate::error::ParseError;
use crate::resolve::resolve_references;
use crate::tree::{attr_text, child, children, value_kind, ParseOptions};

/// Names like `[__tableau_internal_object_id__].[...]` mark internal plumbing
/// objects, not user-visible fields.
fn internal_object_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[?__tableau_internal").expect("valid regex"))
}

/// Parse a decoded workbook tree into a lineage [`Graph`].
///
/// This is the single entry point of the pipeline: build every node, then
/// resolve every formula reference against the completed node map. The
/// function is pure; on error the caller's previously loaded graph (if any)
/// is untouched and no partial graph escapes.
pub fn parse_workbook(tree: &Value, options: &ParseOptions) -> Result<Graph, ParseError> {
    if !tree.is_object() {
        return Err(ParseError::UnsupportedInput(value_kind(tree)));
    }
    let workbook = tree
        .get("workbook")
        .ok_or_else(|| ParseError::Structure("missing top-level 'workbook' element".to_string()))?;
    if !workbook.is_object() {
        return Err(ParseError::Structure(format!(
            "'workbook' element is {}, expected an object",
            value_kind(workbook)
        )));
    }

    let mut nodes: IndexMap<String, Node> = IndexMap::new();
    let datasources = child(workbook, "datasources")
        .map(|element| children(element, "datasource"))
        .unwrap_or_default();

    for datasource in datasources {
        // Formulas qualify references by the user-visible datasource name,
        // so the caption (when present) is the name everything keys off.
        let datasource_name = attr_text(datasource, options, "caption")
            .or_else(|| attr_text(datasource, options, "name"))
            .unwrap_or_default();

        for record in children(datasource, "column") {
            let Some(node) = build_node(&datasource_name, record, options)? else {
                continue;
            };
            match nodes.entry(node.id().to_string()) {
                Entry::Occupied(entry) => {
                    return Err(ParseError::DuplicateId {
                        id: entry.key().clone(),
                        datasource: datasource_name.clone(),
                        field: node.name().to_string(),
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(node);
                }
            }
        }
    }

    let references = resolve_references(&nodes);
    log::debug!(
        "built lineage graph: {} nodes, {} references ({} unresolved)",
        nodes.len(),
        references.len(),
        references
            .iter()
            .filter(|r| r.target_id().is_none())
            .count(),
    );

    Ok(Graph { nodes, references })
}

/// Classify one raw field record and build its node.
///
/// Priority: a calculation sub-block wins, then a list/range parameter
/// domain marker, then a plain datasource field. Returns `Ok(None)` for
/// records excluded from the graph (internal objects, nameless records).
fn build_node(
    datasource: &str,
    record: &Value,
    options: &ParseOptions,
) -> Result<Option<Node>, ParseError> {
    let Some(name) = attr_text(record, options, "name") else {
        log::debug!("skipping nameless column record in datasource '{datasource}'");
        return Ok(None);
    };
    if internal_object_marker().is_match(&name) {
        log::debug!("skipping internal object '{name}' in datasource '{datasource}'");
        return Ok(None);
    }

    let role_raw =
        attr_text(record, options, "role").ok_or_else(|| ParseError::MissingRole {
            datasource: datasource.to_string(),
            field: name.clone(),
        })?;
    let role = Role::from_raw(&role_raw).map_err(|err| ParseError::InvalidRole {
        datasource: datasource.to_string(),
        field: name.clone(),
        role: err.0,
    })?;

    let data_type = attr_text(record, options, "datatype")
        .map(|raw| DataType::from_raw(&raw))
        .unwrap_or_default();
    let caption = attr_text(record, options, "caption");

    let field = Field {
        id: node_id(datasource, &name),
        display_name: display_name(caption.as_deref(), &name),
        name,
        data_type,
        role,
        datasource: datasource.to_string(),
    };

    if let Some(calculation) = child(record, "calculation") {
        // Bins and similar derived columns carry a calculation block with no
        // formula attribute; they still classify as calculations.
        let raw_formula = attr_text(calculation, options, "formula").unwrap_or_default();
        let formula = if options.decode_entities {
            decode_entities(&raw_formula)
        } else {
            raw_formula
        };
        return Ok(Some(Node::Calculation { field, formula }));
    }

    if matches!(
        attr_text(record, options, "param-domain-type").as_deref(),
        Some("list") | Some("range")
    ) {
        return Ok(Some(Node::Parameter(field)));
    }

    Ok(Some(Node::Datasource(field)))
}
