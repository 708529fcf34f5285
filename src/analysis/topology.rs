use super::graph::{FunctionGraph, NodeId};
use std::collections::{HashSet, VecDeque};

/// Topological order via depth-first search: every dependency appears before
/// the functions that read it.
pub fn sort(graph: &FunctionGraph) -> Result<Vec<NodeId>, String> {
    let count = graph.count();
    let mut order = Vec::with_capacity(count);
    let mut state = vec![VisitState::None; count];

    // Edges point consumer -> dependency, so DFS post-order yields
    // [dependency, ..., consumer]. Every node is a start point so disconnected
    // roots are included.
    for i in 0..count {
        if state[i] == VisitState::None {
            visit(NodeId::new(i), graph, &mut state, &mut order)?;
        }
    }

    Ok(order)
}

#[derive(Clone, PartialEq, Eq)]
enum VisitState {
    None,
    Visiting,
    Visited,
}

fn visit(
    node: NodeId,
    graph: &FunctionGraph,
    state: &mut Vec<VisitState>,
    order: &mut Vec<NodeId>,
) -> Result<(), String> {
    let idx = node.index();

    match state[idx] {
        VisitState::Visited => return Ok(()),
        VisitState::Visiting => {
            return Err(format!("Cycle detected involving node '{}'", graph.meta[idx].name))
        }
        VisitState::None => state[idx] = VisitState::Visiting,
    }

    let parents: Vec<NodeId> = graph.get_parents(node).collect();
    for parent in parents {
        visit(parent, graph, state, order)?;
    }

    state[idx] = VisitState::Visited;
    order.push(node);
    Ok(())
}

/// Groups nodes by depth: level 0 has no dependencies, level k depends only on
/// levels below k. Nodes within a level are independent of each other.
pub fn levels(graph: &FunctionGraph) -> Result<Vec<Vec<NodeId>>, String> {
    let order = sort(graph)?;
    let mut depth = vec![0usize; graph.count()];
    let mut levels: Vec<Vec<NodeId>> = Vec::new();

    for node in order {
        let d = graph
            .get_parents(node)
            .map(|p| depth[p.index()] + 1)
            .max()
            .unwrap_or(0);
        depth[node.index()] = d;
        if levels.len() <= d {
            levels.resize_with(d + 1, Vec::new);
        }
        levels[d].push(node);
    }
    Ok(levels)
}

/// Every node that reads, directly or transitively, from one of `start_nodes`
/// (the start nodes included).
pub fn downstream_from(graph: &FunctionGraph, start_nodes: &[NodeId]) -> HashSet<NodeId> {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::from(start_nodes.to_vec());

    while let Some(node) = queue.pop_front() {
        if visited.insert(node) {
            queue.extend(graph.get_children(node));
        }
    }
    visited
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{FunctionNode, FunctionType, LazyFunction};
    use crate::parameter::ParameterList;
    use crate::store::Scalar;
    use std::sync::Arc;

    fn node(name: &str) -> Arc<dyn FunctionNode> {
        Arc::new(LazyFunction::new(FunctionType::new(name, name), None, ParameterList::new(), |_| {
            Ok(Scalar::from(0))
        }))
    }

    fn diamond() -> (FunctionGraph, [NodeId; 4]) {
        // Shape: A -> B, A -> C, B+C -> D
        let mut graph = FunctionGraph::new();
        let a = graph.add_node(node("A"), &[]);
        let b = graph.add_node(node("B"), &[a]);
        let c = graph.add_node(node("C"), &[a]);
        let d = graph.add_node(node("D"), &[b, c]);
        (graph, [a, b, c, d])
    }

    #[test]
    fn test_sort_diamond_dependency() {
        let (graph, [a, b, c, d]) = diamond();
        let res = sort(&graph).expect("Sort failed");

        let pos = |id: NodeId| res.iter().position(|&x| x == id).unwrap();
        assert!(pos(a) < pos(b));
        assert!(pos(a) < pos(c));
        assert!(pos(b) < pos(d));
        assert!(pos(c) < pos(d));
    }

    #[test]
    fn test_levels_of_diamond() {
        let (graph, [a, b, c, d]) = diamond();
        let lv = levels(&graph).unwrap();
        assert_eq!(lv.len(), 3);
        assert_eq!(lv[0], vec![a]);
        assert!(lv[1].contains(&b) && lv[1].contains(&c));
        assert_eq!(lv[2], vec![d]);
    }

    #[test]
    fn test_downstream_from_root() {
        let (graph, [a, b, c, d]) = diamond();
        let down = downstream_from(&graph, &[b]);
        assert!(down.contains(&b) && down.contains(&d));
        assert!(!down.contains(&a) && !down.contains(&c));
        assert_eq!(downstream_from(&graph, &[a]).len(), 4);
    }

    #[test]
    fn test_cycle_detection_explicit() {
        let mut graph = FunctionGraph::new();
        let a = graph.add_node(node("A"), &[]);
        let b = graph.add_node(node("B"), &[a]);

        // HACK: inject the reverse edge directly into the CSR arrays.
        assert_eq!(graph.parents_ranges[0].1, 0);
        graph.parents_flat.push(b);
        let new_start = (graph.parents_flat.len() - 1) as u32;
        graph.parents_ranges[0] = (new_start, 1);

        let err = sort(&graph).unwrap_err();
        assert!(err.contains("Cycle detected"), "Msg: {}", err);
    }
}
