//! Parent→child cycle detection
//!
//! Runs over every parent→child edge regardless of pedigree. Strongly
//! connected components narrow the search; inside each one every elementary
//! cycle is reported once, rooted at its smallest id and walked in id order.

use crate::graph::FamilyGraph;
use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use roots_model::PersonId;
use std::collections::HashMap;

/// Upper bound on cycles enumerated inside one component
const MAX_CYCLES_PER_COMPONENT: usize = 256;

/// Cycles in adjacency order; the last member is a parent of the first
#[must_use]
pub fn find_cycles(graph: &FamilyGraph) -> Vec<Vec<PersonId>> {
    let mut dag: DiGraphMap<usize, ()> = DiGraphMap::new();
    for (idx, node) in graph.nodes.values().enumerate() {
        dag.add_node(idx);
        for edge in &node.children {
            if let Some(child) = graph.nodes.get_index_of(&edge.id) {
                dag.add_edge(idx, child, ());
            }
        }
    }

    let mut cycles: Vec<Vec<PersonId>> = tarjan_scc(&dag)
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .flat_map(|scc| CycleSearch::new(&dag, &scc, graph).run())
        .filter_map(|cycle| {
            cycle
                .into_iter()
                .map(|idx| id_at(graph, idx).cloned())
                .collect::<Option<Vec<_>>>()
        })
        .collect();
    cycles.sort();
    cycles
}

fn id_at(graph: &FamilyGraph, idx: usize) -> Option<&PersonId> {
    graph.nodes.get_index(idx).map(|(id, _)| id)
}

/// Depth-first enumeration of one component's elementary cycles
struct CycleSearch<'a> {
    dag: &'a DiGraphMap<usize, ()>,
    /// Member → position in id order
    rank: HashMap<usize, usize>,
    order: Vec<usize>,
    found: Vec<Vec<usize>>,
}

impl<'a> CycleSearch<'a> {
    fn new(dag: &'a DiGraphMap<usize, ()>, scc: &[usize], graph: &FamilyGraph) -> Self {
        let mut order = scc.to_vec();
        order.sort_by_key(|idx| id_at(graph, *idx));
        let rank = order.iter().enumerate().map(|(r, idx)| (*idx, r)).collect();
        Self {
            dag,
            rank,
            order,
            found: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Vec<usize>> {
        for start in self.order.clone() {
            let mut path = vec![start];
            self.walk(start, &mut path);
        }
        if self.found.len() >= MAX_CYCLES_PER_COMPONENT {
            tracing::warn!(
                members = self.order.len(),
                limit = MAX_CYCLES_PER_COMPONENT,
                "cycle enumeration truncated"
            );
        }
        self.found
    }

    /// Successors inside the component, in id order
    fn successors(&self, node: usize) -> Vec<usize> {
        let mut next: Vec<usize> = self
            .dag
            .neighbors_directed(node, Direction::Outgoing)
            .filter(|n| self.rank.contains_key(n))
            .collect();
        next.sort_by_key(|n| self.rank.get(n).copied());
        next
    }

    /// Extend `path` through members ranked above `start` only, so each
    /// cycle is found from its smallest member and nowhere else
    fn walk(&mut self, start: usize, path: &mut Vec<usize>) {
        let Some(&node) = path.last() else {
            return;
        };
        for next in self.successors(node) {
            if self.found.len() >= MAX_CYCLES_PER_COMPONENT {
                return;
            }
            if next == start {
                self.found.push(path.clone());
            } else if self.rank.get(&next) > self.rank.get(&start) && !path.contains(&next) {
                path.push(next);
                self.walk(start, path);
                path.pop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PersonNode;
    use roots_model::{Location, Pedigree};

    fn graph_with_edges(ids: &[&str], edges: &[(&str, &str)]) -> FamilyGraph {
        let mut graph = FamilyGraph::default();
        for id in ids {
            graph.insert(PersonNode::new(
                PersonId::new(*id),
                Location::new(format!("{id}.md")),
                *id,
            ));
        }
        for (parent, child) in edges {
            if let Some(node) = graph.node_mut(&PersonId::new(*parent)) {
                node.add_child(&PersonId::new(*child), Pedigree::Biological);
            }
        }
        graph
    }

    fn ids(cycle: &[PersonId]) -> Vec<&str> {
        cycle.iter().map(PersonId::as_str).collect()
    }

    #[test]
    fn three_cycle_reported_once_in_order() {
        let graph = graph_with_edges(&["C", "A", "B"], &[("A", "B"), ("B", "C"), ("C", "A")]);
        let cycles = find_cycles(&graph);
        assert_eq!(cycles.len(), 1);
        assert_eq!(ids(&cycles[0]), vec!["A", "B", "C"]);
    }

    #[test]
    fn acyclic_graph_has_no_cycles() {
        let graph = graph_with_edges(&["A", "B", "C"], &[("A", "B"), ("A", "C"), ("B", "C")]);
        assert!(find_cycles(&graph).is_empty());
    }

    #[test]
    fn two_disjoint_cycles() {
        let graph = graph_with_edges(
            &["A", "B", "X", "Y", "Z"],
            &[("A", "B"), ("B", "A"), ("X", "Y"), ("Y", "Z"), ("Z", "X")],
        );
        let cycles = find_cycles(&graph);
        assert_eq!(cycles.len(), 2);
        assert_eq!(ids(&cycles[0]), vec!["A", "B"]);
        assert_eq!(ids(&cycles[1]), vec!["X", "Y", "Z"]);
    }

    #[test]
    fn cycles_sharing_a_person_are_each_reported() {
        let graph = graph_with_edges(&["A", "B", "C"], &[("A", "B"), ("B", "A"), ("A", "C"), ("C", "A")]);
        let cycles = find_cycles(&graph);
        assert_eq!(cycles.len(), 2);
        assert_eq!(ids(&cycles[0]), vec!["A", "B"]);
        assert_eq!(ids(&cycles[1]), vec!["A", "C"]);
    }

    #[test]
    fn overlapping_cycles_in_one_component() {
        // A→B→C→A and B→C→B share the B→C edge
        let graph = graph_with_edges(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("C", "A"), ("C", "B")]);
        let cycles = find_cycles(&graph);
        assert_eq!(cycles.len(), 2);
        assert_eq!(ids(&cycles[0]), vec!["A", "B", "C"]);
        assert_eq!(ids(&cycles[1]), vec!["B", "C"]);
    }

    #[test]
    fn edges_to_unknown_people_are_ignored() {
        let graph = graph_with_edges(&["A"], &[("A", "ghost")]);
        assert!(find_cycles(&graph).is_empty());
    }
}
