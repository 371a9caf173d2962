//! Structural export for downstream renderers

use crate::graph::FamilyGraph;
use roots_model::{Location, Pedigree, PersonId, Sex};
use serde::{Deserialize, Serialize};

/// Exported person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportNode {
    /// Id
    pub id: PersonId,
    /// Display name
    pub name: String,
    /// Sex
    pub sex: Sex,
    /// Birth date as written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub born: Option<String>,
    /// Death date as written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub died: Option<String>,
    /// Source document
    pub location: Location,
}

/// Edge kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EdgeKind {
    /// `from` is a parent of `to`
    Parent {
        /// Pedigree of the link
        pedigree: Pedigree,
    },
    /// Partners; emitted once per pair
    Spouse,
}

/// Exported edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEdge {
    /// Source
    pub from: PersonId,
    /// Target
    pub to: PersonId,
    /// Kind
    #[serde(flatten)]
    pub kind: EdgeKind,
}

/// Nodes and edges of a graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphExport {
    /// People
    pub nodes: Vec<ExportNode>,
    /// Relationships
    pub edges: Vec<ExportEdge>,
}

impl GraphExport {
    /// Export a graph
    #[must_use]
    pub fn from_graph(graph: &FamilyGraph) -> Self {
        let mut export = Self::default();
        for node in graph.nodes() {
            export.nodes.push(ExportNode {
                id: node.id.clone(),
                name: node.name.clone(),
                sex: node.sex,
                born: node.born.clone(),
                died: node.died.clone(),
                location: node.location.clone(),
            });
            for child in &node.children {
                export.edges.push(ExportEdge {
                    from: node.id.clone(),
                    to: child.id.clone(),
                    kind: EdgeKind::Parent {
                        pedigree: child.pedigree,
                    },
                });
            }
            for spouse in node.spouses.iter().filter(|s| node.id < **s) {
                export.edges.push(ExportEdge {
                    from: node.id.clone(),
                    to: spouse.clone(),
                    kind: EdgeKind::Spouse,
                });
            }
        }
        export
    }
}

impl FamilyGraph {
    /// Structural export of nodes and edges
    #[must_use]
    pub fn export(&self) -> GraphExport {
        GraphExport::from_graph(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PersonNode;
    use serde_json::json;

    #[test]
    fn spouse_edges_once_and_parent_edges_tagged() {
        let mut graph = FamilyGraph::default();
        let mut a = PersonNode::new(PersonId::new("a"), Location::new("A.md"), "A");
        let mut b = PersonNode::new(PersonId::new("b"), Location::new("B.md"), "B");
        a.spouses.push(PersonId::new("b"));
        b.spouses.push(PersonId::new("a"));
        a.add_child(&PersonId::new("c"), Pedigree::Adopted);
        graph.insert(a);
        graph.insert(b);

        let export = graph.export();
        assert_eq!(export.nodes.len(), 2);
        assert_eq!(export.edges.len(), 2);

        let json = serde_json::to_value(&export.edges).unwrap();
        assert_eq!(json[0], json!({"from": "a", "to": "c", "type": "parent", "pedigree": "adopted"}));
        assert_eq!(json[1], json!({"from": "a", "to": "b", "type": "spouse"}));
    }
}
