//! Dependency graph export for resolved closures.
//!
//! Builds a petgraph `DiGraph` over the skills of a [`ResolutionClosure`]
//! with edges from dependent to dependency, and renders it as Graphviz DOT.

use std::collections::HashMap;
use std::fmt;

use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use skillpro_types::resolve::ResolutionClosure;

use super::paths::canonical_skill_id;

/// Whether an edge is a mandatory or optional dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Required,
    Optional,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "required"),
            Self::Optional => write!(f, "optional"),
        }
    }
}

/// Graph views of a resolution closure.
pub trait DependencyGraph {
    /// Nodes are skill ids in resolution order. Dependencies that failed to
    /// resolve have no node and no edge.
    fn dependency_graph(&self) -> DiGraph<String, EdgeKind>;

    /// Graphviz DOT rendering of [`DependencyGraph::dependency_graph`].
    fn to_dot(&self) -> String;
}

impl DependencyGraph for ResolutionClosure {
    fn dependency_graph(&self) -> DiGraph<String, EdgeKind> {
        let mut graph = DiGraph::new();
        let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();

        for id in &self.order {
            nodes.insert(id.as_str(), graph.add_node(id.clone()));
        }

        for skill in self.ordered_skills() {
            let Some(&from) = nodes.get(skill.id.as_str()) else {
                continue;
            };
            for dep in &skill.dependencies {
                let target = canonical_skill_id(dep).and_then(|id| nodes.get(id.as_str()).copied());
                let Some(to) = target else {
                    continue;
                };
                if graph.contains_edge(from, to) {
                    continue;
                }
                let kind = if skill.is_optional_dependency(dep) {
                    EdgeKind::Optional
                } else {
                    EdgeKind::Required
                };
                graph.add_edge(from, to, kind);
            }
        }
        graph
    }

    fn to_dot(&self) -> String {
        let graph = self.dependency_graph();
        let body = Dot::with_config(&graph, &[Config::GraphContentOnly]);
        format!("digraph skills {{\n{body}}}\n")
    }
}
