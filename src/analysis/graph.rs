//! Arena of function nodes with index-based dependency edges.
//!
//! Edges point from a consumer to the functions it reads. Parent ranges are
//! stored CSR-style; children are kept as linked adjacency lists for
//! downstream walks.
use super::topology;
use crate::compute::FunctionNode;
use crate::error::FunctionError;
use crate::parameter::Parameterized;
use rayon::prelude::*;
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
    pub fn new(idx: usize) -> Self {
        Self(idx as u32)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeMetadata {
    pub name: String,
    pub label: String,
    pub variable: Option<String>,
}

#[derive(Default)]
pub struct FunctionGraph {
    pub nodes: Vec<Arc<dyn FunctionNode>>,
    pub meta: Vec<NodeMetadata>,

    pub parents_flat: Vec<NodeId>,
    pub parents_ranges: Vec<(u32, u32)>, // (start, count)
    // Extra ordering edges added after a node was registered.
    pub extra_parents: Vec<Vec<NodeId>>,

    pub first_child: Vec<u32>,
    pub child_targets: Vec<NodeId>,
    pub next_child: Vec<u32>,

    used_names: HashSet<String>,
    identity: HashMap<usize, NodeId>,
}

impl FunctionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.nodes.len()
    }

    /// Registers the roots and, transitively, every function reachable through
    /// their function-valued parameters. Shared instances become one node.
    pub fn from_roots(roots: &[Arc<dyn FunctionNode>]) -> Self {
        let mut graph = Self::new();
        for root in roots {
            graph.insert_recursive(root);
        }
        graph
    }

    fn insert_recursive(&mut self, node: &Arc<dyn FunctionNode>) -> NodeId {
        if let Some(&id) = self.identity.get(&identity_key(node)) {
            return id;
        }
        let dependencies: SmallVec<[Arc<dyn FunctionNode>; 4]> = node
            .parameters()
            .iter()
            .filter_map(|p| p.value().as_function_node())
            .collect();
        let parents: SmallVec<[NodeId; 4]> = dependencies.iter().map(|d| self.insert_recursive(d)).collect();
        self.add_node(Arc::clone(node), &parents)
    }

    pub fn add_node(&mut self, node: Arc<dyn FunctionNode>, parents: &[NodeId]) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);

        let base = node.function_type().name.clone();
        let mut candidate = match node.variable() {
            Some(v) => format!("{}({})", base, v),
            None => base,
        };
        let original = candidate.clone();
        let mut counter = 1;
        while self.used_names.contains(&candidate) {
            candidate = format!("{}_{}", original, counter);
            counter += 1;
        }
        self.used_names.insert(candidate.clone());

        let start = self.parents_flat.len() as u32;
        self.parents_flat.extend_from_slice(parents);
        self.parents_ranges.push((start, parents.len() as u32));
        self.extra_parents.push(Vec::new());
        self.first_child.push(u32::MAX);
        for &parent in parents {
            self.link_child(parent, id);
        }

        self.meta.push(NodeMetadata {
            name: candidate,
            label: node.function_type().label.clone(),
            variable: node.variable().map(str::to_string),
        });
        self.identity.insert(identity_key(&node), id);
        self.nodes.push(node);
        id
    }

    /// Declares that `consumer` must run after `dependency` even though no
    /// parameter links them.
    pub fn add_dependency(&mut self, consumer: NodeId, dependency: NodeId) {
        self.extra_parents[consumer.index()].push(dependency);
        self.link_child(dependency, consumer);
    }

    fn link_child(&mut self, parent: NodeId, child: NodeId) {
        let p_idx = parent.index();
        let head = self.first_child[p_idx];
        let new_edge = self.child_targets.len() as u32;
        self.child_targets.push(child);
        self.next_child.push(head);
        self.first_child[p_idx] = new_edge;
    }

    #[inline(always)]
    pub fn get_parents(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let (start, count) = self.parents_ranges[id.index()];
        self.parents_flat[start as usize..(start + count) as usize]
            .iter()
            .chain(self.extra_parents[id.index()].iter())
            .copied()
    }

    pub fn get_children(&self, id: NodeId) -> Vec<NodeId> {
        let mut children = Vec::new();
        let mut edge_idx = self.first_child[id.index()];
        while edge_idx != u32::MAX {
            children.push(self.child_targets[edge_idx as usize]);
            edge_idx = self.next_child[edge_idx as usize];
        }
        children
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.meta.iter().position(|m| m.name == name).map(NodeId::new)
    }

    pub fn node(&self, id: NodeId) -> &Arc<dyn FunctionNode> {
        &self.nodes[id.index()]
    }

    /// Forces every node, dependencies first. Fails before evaluating anything
    /// if the graph has a cycle.
    pub fn evaluate(&self) -> Result<Vec<NodeId>, FunctionError> {
        let order = topology::sort(self).map_err(FunctionError::CycleDetected)?;
        for &id in &order {
            self.nodes[id.index()].force()?;
        }
        Ok(order)
    }

    /// Forces each topological level in parallel.
    pub fn evaluate_parallel(&self) -> Result<(), FunctionError> {
        let levels = topology::levels(self).map_err(FunctionError::CycleDetected)?;
        for level in levels {
            level
                .par_iter()
                .try_for_each(|id| self.nodes[id.index()].force())?;
        }
        Ok(())
    }
}

fn identity_key(node: &Arc<dyn FunctionNode>) -> usize {
    Arc::as_ptr(node) as *const () as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{FunctionType, LazyFunction, ScalarFunction};
    use crate::parameter::{Parameter, ParameterList};
    use crate::store::Scalar;

    fn constant(name: &str, value: f64) -> Arc<ScalarFunction> {
        Arc::new(LazyFunction::new(FunctionType::new(name, name), None, ParameterList::new(), move |_| {
            Ok(Scalar::from(value))
        }))
    }

    fn add(name: &str, a: &Arc<ScalarFunction>, b: &Arc<ScalarFunction>) -> Arc<ScalarFunction> {
        let params: ParameterList = vec![
            Parameter::new("a", None, Arc::clone(a)),
            Parameter::new("b", None, Arc::clone(b)),
        ]
        .into_iter()
        .collect();
        Arc::new(LazyFunction::new(FunctionType::new(name, name), None, params, |p| {
            Ok(Scalar::from(p.get_double("a")? + p.get_double("b")?))
        }))
    }

    #[test]
    fn test_shared_dependency_is_one_node() {
        let a = constant("a", 1.0);
        let b = add("b", &a, &a);
        let c = add("c", &a, &b);
        let graph = FunctionGraph::from_roots(&[c.clone() as Arc<dyn FunctionNode>]);

        assert_eq!(graph.count(), 3);
        let a_id = graph.find("a").unwrap();
        assert_eq!(graph.get_children(a_id).len(), 3);

        graph.evaluate().unwrap();
        assert!(a.is_evaluated() && b.is_evaluated());
        assert_eq!(c.compute().unwrap().as_double(), 3.0);
    }

    #[test]
    fn test_duplicate_names_are_suffixed() {
        let a1 = constant("mean", 1.0);
        let a2 = constant("mean", 2.0);
        let graph = FunctionGraph::from_roots(&[a1 as Arc<dyn FunctionNode>, a2 as Arc<dyn FunctionNode>]);
        assert_eq!(graph.meta[0].name, "mean");
        assert_eq!(graph.meta[1].name, "mean_1");
    }

    #[test]
    fn test_parallel_evaluation_forces_everything() {
        let x = constant("x", 2.0);
        let y = constant("y", 3.0);
        let s = add("s", &x, &y);
        let t = add("t", &s, &x);
        let graph = FunctionGraph::from_roots(&[t.clone() as Arc<dyn FunctionNode>]);
        graph.evaluate_parallel().unwrap();
        assert!(graph.nodes.iter().all(|n| n.is_evaluated()));
        assert_eq!(t.compute().unwrap().as_double(), 7.0);
    }

    #[test]
    fn test_explicit_cycle_blocks_evaluation() {
        let a = constant("a", 1.0);
        let b = add("b", &a, &a);
        let mut graph = FunctionGraph::from_roots(&[b.clone() as Arc<dyn FunctionNode>]);
        let (a_id, b_id) = (graph.find("a").unwrap(), graph.find("b").unwrap());
        graph.add_dependency(a_id, b_id);

        let err = graph.evaluate().unwrap_err();
        assert!(matches!(err, FunctionError::CycleDetected(_)));
        assert!(!a.is_evaluated());
    }
}
