use crate::analysis::{topology, FunctionGraph, NodeId};
use crate::compute::Model;
use crate::parameter::Value;
use std::collections::HashMap;
use std::fmt::Write;

/// Renders the dependency tree under `target`: each function with its value,
/// its non-function inputs as leaves, and the functions it reads as branches.
/// A function reached a second time prints a reference to its first level.
pub fn format_trace(graph: &FunctionGraph, target: NodeId) -> String {
    let mut tracer = Tracer {
        graph,
        visited_at_level: HashMap::new(),
        output: String::new(),
    };

    if target.index() < graph.count() {
        let name = &graph.meta[target.index()].name;
        let _ = writeln!(tracer.output, "AUDIT TRACE for function '{}':", name);
        let _ = writeln!(tracer.output, "--------------------------------------------------");
        tracer.trace_node(target, 1, "");
    } else {
        let _ = writeln!(tracer.output, "Error: Invalid Node ID {:?}", target);
    }
    tracer.output
}

/// Lists every function that reads `source`, directly or through others,
/// in evaluation order.
pub fn format_impact(graph: &FunctionGraph, source: NodeId) -> String {
    let mut output = String::new();
    if source.index() >= graph.count() {
        let _ = writeln!(output, "Error: Invalid Node ID {:?}", source);
        return output;
    }
    let downstream = topology::downstream_from(graph, &[source]);
    let _ = writeln!(output, "IMPACT of '{}':", graph.meta[source.index()].name);
    let order = topology::sort(graph).unwrap_or_else(|_| (0..graph.count()).map(NodeId::new).collect());
    for id in order.into_iter().filter(|id| *id != source && downstream.contains(id)) {
        let _ = writeln!(output, "  -> {}", graph.meta[id.index()].name);
    }
    output
}

/// Coefficients of a model, one per line, after its parameters.
pub fn format_model(model: &dyn Model) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "MODEL '{}':", model.name());
    let _ = writeln!(output, "--------------------------------------------------");
    for p in model.parameters() {
        let _ = writeln!(output, "  param {}", p);
    }
    if model.coefficient_set().is_empty() {
        let _ = writeln!(output, "  (not solved)");
    }
    for c in model.coefficients() {
        let _ = writeln!(output, "  {} [{}] = {}", c.label().unwrap_or(c.name()), c.name(), c.value());
    }
    output
}

struct Tracer<'a> {
    graph: &'a FunctionGraph,
    visited_at_level: HashMap<NodeId, usize>,
    output: String,
}

impl<'a> Tracer<'a> {
    fn trace_node(&mut self, node_id: NodeId, level: usize, prefix: &str) {
        if let Some(&first_seen) = self.visited_at_level.get(&node_id) {
            let _ = writeln!(self.output, "{}-> (Ref to L{})", prefix, first_seen);
            return;
        }
        self.visited_at_level.insert(node_id, level);

        let node = self.graph.node(node_id);
        let meta = &self.graph.meta[node_id.index()];
        let _ = writeln!(
            self.output,
            "{}[L{}] {} ({}){}",
            prefix,
            level,
            meta.name,
            meta.label,
            format_value(node.rendered_value())
        );

        let leaves: Vec<String> = node
            .parameters()
            .iter()
            .filter(|p| p.value().as_function_node().is_none())
            .map(|p| match p.variable() {
                Some(v) => format!("{}({}) -> Var({})", p.name(), v, format_input(p.value())),
                None => format!("{} -> Var({})", p.name(), format_input(p.value())),
            })
            .collect();
        let parents: Vec<NodeId> = self.graph.get_parents(node_id).collect();

        let stem = build_child_stem(prefix);
        let total = leaves.len() + parents.len();
        for (i, leaf) in leaves.iter().enumerate() {
            let connector = if i + 1 == total { "`--" } else { "|--" };
            let _ = writeln!(self.output, "{}{} {}", stem, connector, leaf);
        }
        for (i, &parent) in parents.iter().enumerate() {
            let connector = if leaves.len() + i + 1 == total { "`--" } else { "|--" };
            let full_prefix = format!("{}{} ", stem, connector);
            self.trace_node(parent, level + 1, &full_prefix);
        }
    }
}

fn format_value(rendered: Option<String>) -> String {
    match rendered {
        Some(v) => format!(" = [{}]", v),
        None => " = [?]".to_string(),
    }
}

fn format_input(value: &Value) -> String {
    value.render()
}

fn build_child_stem(current_prefix: &str) -> String {
    current_prefix.replace("`-- ", "    ").replace("|-- ", "|   ")
}
