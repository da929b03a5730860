//! The queryable field-lineage graph: an insertion-ordered node map plus a
//! flat edge list, with direct and transitive lineage queries.
//!
//! A graph is built once per loaded document and replaced wholesale when a
//! new document loads; queries only read it.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::node::Node;

/// Resolution outcome of one formula reference.
///
/// Unresolved references are retained, not dropped: a formula may
/// legitimately name a field that lives outside the parsed document (e.g. a
/// cross-workbook parameter). Note this is distinct from a *derived*
/// transitive relationship, which is never materialized as an edge at all.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReferenceTarget {
    /// The reference matched a node in the graph.
    Resolved { target_id: String },
    /// No node matched; the raw field text is kept for display.
    Unresolved { raw_field: String },
}

/// A direct reference edge: one occurrence of a field name inside one
/// calculation's formula.
///
/// Edges are not deduplicated; a field named twice in one formula yields two
/// edges.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Id of the calculation node whose formula contains the reference.
    /// Always present in the owning graph's node map.
    pub source_id: String,
    pub target: ReferenceTarget,
    /// Verbatim matched substring from the formula, kept for formula-text
    /// display substitution.
    pub matched_text: String,
    /// Datasource qualifier, when the reference was written
    /// `[Datasource].[Field]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
}

impl Reference {
    /// Resolved target id, if any.
    pub fn target_id(&self) -> Option<&str> {
        match &self.target {
            ReferenceTarget::Resolved { target_id } => Some(target_id),
            ReferenceTarget::Unresolved { .. } => None,
        }
    }
}

/// The whole lineage graph for one loaded document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    /// Node map keyed by id. Iteration order is insertion order, which is
    /// the documented tie-break for reference resolution.
    pub nodes: IndexMap<String, Node>,
    /// Direct reference edges, in formula scan order.
    pub references: Vec<Reference>,
}

impl Graph {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Edges that failed to resolve against the node map.
    pub fn unresolved(&self) -> impl Iterator<Item = &Reference> {
        self.references
            .iter()
            .filter(|r| matches!(r.target, ReferenceTarget::Unresolved { .. }))
    }

    /// Nodes whose calculation directly names `id`.
    pub fn referencing(&self, id: &str) -> Vec<&Node> {
        self.lookup(self.referencing_ids(id))
    }

    /// Nodes directly named by `id`'s own formula.
    pub fn referenced(&self, id: &str) -> Vec<&Node> {
        self.lookup(self.referenced_ids(id))
    }

    /// Nodes that reach `id` through chains of two or more direct
    /// references. Direct neighbors and `id` itself are excluded.
    pub fn indirect_referencing(&self, id: &str) -> Vec<&Node> {
        self.lookup(self.walk_indirect(id, |graph, node| graph.referencing_ids(node)))
    }

    /// Nodes `id` reaches through chains of two or more direct references.
    /// Direct neighbors and `id` itself are excluded.
    pub fn indirect_referenced(&self, id: &str) -> Vec<&Node> {
        self.lookup(self.walk_indirect(id, |graph, node| graph.referenced_ids(node)))
    }

    /// De-duplicated source ids of resolved edges targeting `id`,
    /// in edge-list order.
    fn referencing_ids<'a>(&'a self, id: &str) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        self.references
            .iter()
            .filter(|r| r.target_id() == Some(id))
            .map(|r| r.source_id.as_str())
            .filter(|source| seen.insert(*source))
            .collect()
    }

    /// De-duplicated resolved target ids of edges sourced at `id`,
    /// in edge-list order.
    fn referenced_ids<'a>(&'a self, id: &str) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        self.references
            .iter()
            .filter(|r| r.source_id == id)
            .filter_map(|r| r.target_id())
            .filter(|target| seen.insert(*target))
            .collect()
    }

    /// Iterative depth-first walk over one edge direction.
    ///
    /// One visited set is scoped to the whole call (not per path), which both
    /// terminates cycles and single-counts nodes reachable along convergent
    /// paths. Only nodes first discovered at depth >= 2 land in the result;
    /// a node already claimed at depth 1 is never added, even when a longer
    /// path to it exists.
    fn walk_indirect<'a, F>(&'a self, start: &str, neighbors: F) -> Vec<&'a str>
    where
        F: Fn(&'a Graph, &str) -> Vec<&'a str>,
    {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut result: Vec<&str> = Vec::new();
        let mut stack: Vec<(&str, usize)> = Vec::new();

        if let Some((key, _)) = self.nodes.get_key_value(start) {
            visited.insert(key.as_str());
        }
        for direct in neighbors(self, start) {
            if visited.insert(direct) {
                stack.push((direct, 1));
            }
        }

        while let Some((node, depth)) = stack.pop() {
            if depth >= 2 {
                result.push(node);
            }
            for next in neighbors(self, node) {
                if visited.insert(next) {
                    stack.push((next, depth + 1));
                }
            }
        }
        result
    }

    fn lookup<'a>(&'a self, ids: Vec<&'a str>) -> Vec<&'a Node> {
        ids.into_iter().filter_map(|id| self.nodes.get(id)).collect()
    }
}
