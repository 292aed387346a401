//! Read-only graph views over a section's symbols.
//!
//! Grouping edges and search relations are stored as ordinary symbols. The
//! views here rebuild them as `petgraph` graphs for queries that later stages
//! and tests need: children in declaration order, primary selection and search
//! evaluation order.

use std::{cmp::Reverse, collections::BinaryHeap};

use indexmap::IndexMap;
use log::debug;
use petgraph::{
    Direction,
    algo::tarjan_scc,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};
use thiserror::Error;

use tessera_core::{
    reference::{ComplexReferenceChildType, ComplexReferenceParentType},
    section::Section,
    symbol::definitions::{wix_complex_reference, wix_search, wix_search_relation},
};

use crate::analyzer::SearchRelationFlags;

/// A grouping edge as read back from a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingEdge {
    child_type: ComplexReferenceChildType,
    is_primary: bool,
    parent_language: Option<String>,
}

impl GroupingEdge {
    pub fn child_type(&self) -> ComplexReferenceChildType {
        self.child_type
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn parent_language(&self) -> Option<&str> {
        self.parent_language.as_deref()
    }
}

/// A parent that marks more than one child of one type as primary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryConflict {
    pub parent_type: ComplexReferenceParentType,
    pub parent_id: String,
    pub child_type: ComplexReferenceChildType,
    pub children: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupingNode {
    Parent(ComplexReferenceParentType, String),
    Child(ComplexReferenceChildType, String),
}

/// Parent/child structure recorded by complex references.
#[derive(Debug, Default)]
pub struct GroupingGraph {
    graph: DiGraph<GroupingNode, GroupingEdge>,
    nodes: IndexMap<GroupingNode, NodeIndex>,
}

impl GroupingGraph {
    /// Builds the view from the section's complex references.
    ///
    /// Rows with an unrecognized parent or child type code are skipped.
    pub fn from_section(section: &Section) -> Self {
        let mut view = Self::default();

        for symbol in section.symbols_of(wix_complex_reference::TABLE) {
            let parent_type = symbol
                .number(wix_complex_reference::PARENT_TYPE)
                .and_then(ComplexReferenceParentType::from_code);
            let child_type = symbol
                .number(wix_complex_reference::CHILD_TYPE)
                .and_then(ComplexReferenceChildType::from_code);
            let (Some(parent_type), Some(child_type)) = (parent_type, child_type) else {
                continue;
            };

            let parent = view.node(GroupingNode::Parent(
                parent_type,
                symbol
                    .string(wix_complex_reference::PARENT)
                    .unwrap_or_default()
                    .to_string(),
            ));
            let child = view.node(GroupingNode::Child(
                child_type,
                symbol
                    .string(wix_complex_reference::CHILD)
                    .unwrap_or_default()
                    .to_string(),
            ));
            view.graph.add_edge(
                parent,
                child,
                GroupingEdge {
                    child_type,
                    is_primary: symbol.flag(wix_complex_reference::IS_PRIMARY).unwrap_or(false),
                    parent_language: symbol
                        .string(wix_complex_reference::PARENT_LANGUAGE)
                        .map(str::to_string),
                },
            );
        }

        debug!(
            nodes = view.graph.node_count(),
            edges = view.graph.edge_count();
            "Built grouping view"
        );
        view
    }

    fn node(&mut self, node: GroupingNode) -> NodeIndex {
        if let Some(&index) = self.nodes.get(&node) {
            return index;
        }
        let index = self.graph.add_node(node.clone());
        self.nodes.insert(node, index);
        index
    }

    /// Returns the children of a parent in the order they were referenced.
    pub fn children(
        &self,
        parent_type: ComplexReferenceParentType,
        parent_id: &str,
    ) -> Vec<(&str, &GroupingEdge)> {
        let key = GroupingNode::Parent(parent_type, parent_id.to_string());
        let Some(&index) = self.nodes.get(&key) else {
            return Vec::new();
        };

        let mut edges: Vec<_> = self
            .graph
            .edges_directed(index, Direction::Outgoing)
            .collect();
        edges.sort_by_key(|edge| edge.id());
        edges
            .into_iter()
            .filter_map(|edge| match &self.graph[edge.target()] {
                GroupingNode::Child(_, id) => Some((id.as_str(), edge.weight())),
                GroupingNode::Parent(..) => None,
            })
            .collect()
    }

    /// Returns the first child of `child_type` marked primary under a parent.
    pub fn primary_child(
        &self,
        parent_type: ComplexReferenceParentType,
        parent_id: &str,
        child_type: ComplexReferenceChildType,
    ) -> Option<&str> {
        self.children(parent_type, parent_id)
            .into_iter()
            .find(|(_, edge)| edge.child_type == child_type && edge.is_primary)
            .map(|(id, _)| id)
    }

    /// Returns every parent that marks more than one child of the same type
    /// as primary.
    pub fn primary_conflicts(&self) -> Vec<PrimaryConflict> {
        let mut conflicts = Vec::new();
        for (node, _) in &self.nodes {
            let GroupingNode::Parent(parent_type, parent_id) = node else {
                continue;
            };

            let mut primaries: IndexMap<ComplexReferenceChildType, Vec<String>> = IndexMap::new();
            for (child, edge) in self.children(*parent_type, parent_id) {
                if edge.is_primary {
                    primaries
                        .entry(edge.child_type)
                        .or_default()
                        .push(child.to_string());
                }
            }

            conflicts.extend(
                primaries
                    .into_iter()
                    .filter(|(_, children)| children.len() > 1)
                    .map(|(child_type, children)| PrimaryConflict {
                        parent_type: *parent_type,
                        parent_id: parent_id.clone(),
                        child_type,
                        children,
                    }),
            );
        }
        conflicts
    }
}

/// Searches that depend on each other in a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("searches depend on each other in a cycle: {}", ids.join(", "))]
pub struct SearchCycle {
    pub ids: Vec<String>,
}

/// Searches and the ordering relations between them.
///
/// Edges point from a search to the searches ordered after it.
#[derive(Debug, Default)]
pub struct SearchGraph {
    graph: DiGraph<String, SearchRelationFlags>,
    nodes: IndexMap<String, NodeIndex>,
}

impl SearchGraph {
    /// Builds the view from the section's searches and relations.
    ///
    /// Searches are added in declaration order; a relation to a search
    /// defined elsewhere adds that search after the local ones.
    pub fn from_section(section: &Section) -> Self {
        let mut view = Self::default();

        for symbol in section.symbols_of(wix_search::TABLE) {
            if let Some(id) = symbol.id() {
                view.node(id.id());
            }
        }

        for symbol in section.symbols_of(wix_search_relation::TABLE) {
            let (Some(child), Some(parent)) = (
                symbol.id(),
                symbol.string(wix_search_relation::PARENT_SEARCH_REF),
            ) else {
                continue;
            };
            let flags = symbol
                .number(wix_search_relation::ATTRIBUTES)
                .and_then(|bits| u32::try_from(bits).ok())
                .map_or(SearchRelationFlags::NONE, SearchRelationFlags::from_bits);

            let parent = view.node(parent);
            let child = view.node(child.id());
            view.graph.add_edge(parent, child, flags);
        }

        debug!(
            searches = view.graph.node_count(),
            relations = view.graph.edge_count();
            "Built search view"
        );
        view
    }

    fn node(&mut self, id: &str) -> NodeIndex {
        if let Some(&index) = self.nodes.get(id) {
            return index;
        }
        let index = self.graph.add_node(id.to_string());
        self.nodes.insert(id.to_string(), index);
        index
    }

    /// Returns the search ids in the order they entered the view.
    pub fn searches(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Returns the searches `id` is ordered after, with the relation flags.
    pub fn parents_of(&self, id: &str) -> Vec<(&str, SearchRelationFlags)> {
        let Some(&index) = self.nodes.get(id) else {
            return Vec::new();
        };
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(index, Direction::Incoming)
            .collect();
        edges.sort_by_key(|edge| edge.id());
        edges
            .into_iter()
            .map(|edge| (self.graph[edge.source()].as_str(), *edge.weight()))
            .collect()
    }

    /// Orders the searches so every search follows its parents.
    ///
    /// Among searches that are ready at the same time, the one declared
    /// first comes first.
    ///
    /// # Errors
    ///
    /// Returns a [`SearchCycle`] naming the searches of the first cycle found.
    pub fn evaluation_order(&self) -> Result<Vec<String>, SearchCycle> {
        let mut in_degree: Vec<usize> = self
            .graph
            .node_indices()
            .map(|index| {
                self.graph
                    .neighbors_directed(index, Direction::Incoming)
                    .count()
            })
            .collect();

        let mut ready: BinaryHeap<Reverse<NodeIndex>> = self
            .graph
            .node_indices()
            .filter(|index| in_degree[index.index()] == 0)
            .map(Reverse)
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(Reverse(index)) = ready.pop() {
            order.push(self.graph[index].clone());
            for next in self.graph.neighbors_directed(index, Direction::Outgoing) {
                let degree = &mut in_degree[next.index()];
                *degree -= 1;
                if *degree == 0 {
                    ready.push(Reverse(next));
                }
            }
        }

        if order.len() == self.graph.node_count() {
            return Ok(order);
        }

        let mut ids: Vec<String> = tarjan_scc(&self.graph)
            .into_iter()
            .find(|component| component.len() > 1)
            .unwrap_or_default()
            .into_iter()
            .map(|index| self.graph[index].clone())
            .collect();
        ids.sort_by_key(|id| self.nodes.get_index_of(id));
        Err(SearchCycle { ids })
    }
}
