//! Reference resolution: matching extracted formula references against the
//! completed node map.
//!
//! Resolution runs only after every node is built; the node map is the
//! synchronization barrier between per-record classification and edge
//! construction.

use indexmap::IndexMap;

use lineage_model::{strip_brackets, Node, Reference, ReferenceTarget};

use crate::scanner::extract_references;

/// Build the edge list for every calculation node, in node insertion order.
///
/// References that match nothing are retained as unresolved edges carrying
/// the raw field text: a formula may legitimately name a field outside the
/// parsed document.
pub(crate) fn resolve_references(nodes: &IndexMap<String, Node>) -> Vec<Reference> {
    let mut references = Vec::new();
    for (source_id, node) in nodes {
        let Some(formula) = node.formula() else {
            continue;
        };
        for occurrence in extract_references(formula) {
            let target = match find_target(nodes, occurrence.qualifier.as_deref(), &occurrence.field)
            {
                Some(target_id) => ReferenceTarget::Resolved {
                    target_id: target_id.to_string(),
                },
                None => ReferenceTarget::Unresolved {
                    raw_field: occurrence.field,
                },
            };
            references.push(Reference {
                source_id: source_id.clone(),
                target,
                matched_text: occurrence.matched_text,
                qualifier: occurrence.qualifier,
            });
        }
    }
    references
}

/// Locate the node a reference points at.
///
/// Matching is case-sensitive and exact, on the bracket-stripped raw name or
/// the display name. A qualifier restricts the search to its datasource; a
/// bare reference searches the whole node map. Iteration is insertion order
/// and the first match wins (documented tie-break).
fn find_target<'a>(
    nodes: &'a IndexMap<String, Node>,
    qualifier: Option<&str>,
    field: &str,
) -> Option<&'a str> {
    nodes.iter().find_map(|(id, node)| {
        let in_scope = qualifier.map_or(true, |q| node.datasource() == q);
        let name_matches =
            strip_brackets(node.name()) == field || node.display_name() == field;
        (in_scope && name_matches).then_some(id.as_str())
    })
}
