//! You can also export circuits to the Graphviz dot format using [`Circuit::to_dot`].
//!
//! ```rust
//! use ciraig::Circuit;
//! use ciraig::dot::GraphvizStyle;
//!
//! let cir = Circuit::read_circuit("aag 3 2 0 1 1\n2\n4\n7\n6 2 5\n".as_bytes()).unwrap();
//! let dot = cir.to_dot(GraphvizStyle::default().rankdir("LR"));
//! assert!(dot.contains("rankdir=\"LR\""));
//! ```
//!
//! Only the canonical subgraph is drawn: gates no output depends on are left out.
//! You can then render the graphs using the DOT engine.

use std::{fmt::Display, ops::Add};

use crate::cir::{CirGate, Circuit, GateKind, Pin};

// Definining default global style.
const DEFAULT_RANKDIR: &str = "BT";

// Defining default style for nodes.
const DEFAULT_FALSE_NODE_FORMAT: &str = "[shape=point, width=1.5]";
const DEFAULT_INPUT_NODE_FORMAT: &str = "[shape=box]";
const DEFAULT_AND_NODE_FORMAT: &str = "[shape=circle]";
const DEFAULT_UNDEFINED_NODE_FORMAT: &str = "[shape=circle, style=\"dashed\"]";
/// See https://stackoverflow.com/questions/50822798/how-to-use-graphviz-to-draw-a-node-pointed-by-an-arrow.
const DEFAULT_OUTPUT_NODE_FORMAT: &str = "[shape=none, height=.0, width=.0]";

// Defining default style for edges.
const DEFAULT_EDGE_ALL_FORMAT: &str = "[arrowsize=0.3]";
const DEFAULT_EDGE_COMPLEMENT_FORMAT: &str = "[headlabel=\"●\", labelangle=.0, labeldistance=1.5]";
const DEFAULT_EDGE_UNDEFINED_FORMAT: &str = "[style=\"dashed\"]";
const DEFAULT_EDGE_OUTPUT_FORMAT: &str = "[arrowhead=none]";

/// String containing the graphviz node style (you must manually include square brackets).
///
/// See [`GraphvizStyle`] for what kind of nodes can be described.
#[derive(Debug, Clone)]
pub struct GraphvizNodeStyle(String);

impl Display for GraphvizNodeStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GraphvizNodeStyle {
    fn from(style: &str) -> Self {
        GraphvizNodeStyle(style.to_string())
    }
}

/// String containing the graphviz edge style (you must manually include square brackets).
///
/// See [`GraphvizStyle`] for what kind of edges can be described.
#[derive(Debug, Clone, Default)]
pub struct GraphvizEdgeStyle(String);

impl Display for GraphvizEdgeStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GraphvizEdgeStyle {
    fn from(style: &str) -> Self {
        GraphvizEdgeStyle(style.to_string())
    }
}

impl Add for GraphvizEdgeStyle {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        GraphvizEdgeStyle(format!("{}{}", self.0, rhs.0))
    }
}

/// Parameters for Graphviz rendering.
///
/// ### Global parameters
/// - `rankdir`
///
/// ### Nodes
/// The following nodes can be rendered using [`GraphvizNodeStyle`]:
/// - [`GateKind::Const0`]
/// - [`GateKind::PrimaryInput`]
/// - [`GateKind::And`]
/// - [`GateKind::PrimaryOutput`] (by default, invisible node just to get an arrow)
/// - [`GateKind::Undefined`].
///
/// ### Edges
/// Edge styles are additive. All edges implement the `edge_all` style. To that can be added:
/// - `edge_complement` if the edge is inverted
/// - `edge_undefined` if the edge comes from an undefined gate
/// - `edge_output` if the edge is directed to an output.
#[derive(Debug, Clone)]
pub struct GraphvizStyle {
    // Global
    rankdir: String,

    // Nodes
    cst_false: GraphvizNodeStyle,
    input: GraphvizNodeStyle,
    and: GraphvizNodeStyle,
    output: GraphvizNodeStyle,
    undefined: GraphvizNodeStyle,

    // Edges
    edge_all: GraphvizEdgeStyle,
    edge_complement: GraphvizEdgeStyle,
    edge_undefined: GraphvizEdgeStyle,
    edge_output: GraphvizEdgeStyle,
}

impl Default for GraphvizStyle {
    fn default() -> Self {
        GraphvizStyle {
            rankdir: DEFAULT_RANKDIR.to_string(),

            cst_false: DEFAULT_FALSE_NODE_FORMAT.into(),
            input: DEFAULT_INPUT_NODE_FORMAT.into(),
            and: DEFAULT_AND_NODE_FORMAT.into(),
            output: DEFAULT_OUTPUT_NODE_FORMAT.into(),
            undefined: DEFAULT_UNDEFINED_NODE_FORMAT.into(),

            edge_all: DEFAULT_EDGE_ALL_FORMAT.into(),
            edge_complement: DEFAULT_EDGE_COMPLEMENT_FORMAT.into(),
            edge_undefined: DEFAULT_EDGE_UNDEFINED_FORMAT.into(),
            edge_output: DEFAULT_EDGE_OUTPUT_FORMAT.into(),
        }
    }
}

impl GraphvizStyle {
    pub fn rankdir(mut self, rankdir: &str) -> Self {
        self.rankdir = rankdir.to_string();
        self
    }

    /// Style of the nodes of one gate kind.
    pub fn node(mut self, kind: GateKind, style: GraphvizNodeStyle) -> Self {
        match kind {
            GateKind::Const0 => self.cst_false = style,
            GateKind::PrimaryInput => self.input = style,
            GateKind::PrimaryOutput => self.output = style,
            GateKind::And => self.and = style,
            GateKind::Undefined => self.undefined = style,
        }
        self
    }

    pub fn edge_complement(mut self, style: GraphvizEdgeStyle) -> Self {
        self.edge_complement = style;
        self
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

impl CirGate {
    fn graphviz_label(&self) -> String {
        if let Some(symbol) = self.get_symbol() {
            return escape(symbol);
        }
        match self.get_kind() {
            GateKind::Const0 => "GND".to_string(),
            GateKind::PrimaryInput => format!("i{}", self.get_id()),
            GateKind::PrimaryOutput => format!("o{}", self.get_id()),
            GateKind::And | GateKind::Undefined => self.get_id().to_string(),
        }
    }

    fn graphviz_decl(&self) -> String {
        format!("{} [label=\"{}\"]\n", self.get_id(), self.graphviz_label())
    }
}

impl Pin {
    fn graphviz_decl(
        &self,
        to: &CirGate,
        from_undefined: bool,
        graphviz_style: &GraphvizStyle,
    ) -> String {
        let mut style = GraphvizEdgeStyle::default();
        if self.is_inverted() {
            style = style + graphviz_style.edge_complement.clone();
        }
        if from_undefined {
            style = style + graphviz_style.edge_undefined.clone();
        }
        if to.is_output() {
            style = style + graphviz_style.edge_output.clone();
        }
        format!("{} -> {} {}\n", self.get_gate_id(), to.get_id(), style)
    }
}

impl Circuit {
    /// Returns a DOT representation of the canonical subgraph of the circuit.
    pub fn to_dot(&self, graphviz_style: GraphvizStyle) -> String {
        let mut decl_edges = String::new();

        // Creating different subgraphs for node declarations
        let mut decl_leaves = String::new();
        let mut decl_inputs = format!("subgraph inputs {{\n node {}\n", graphviz_style.input);
        let mut decl_ands = format!("subgraph ands {{\n node {}\n", graphviz_style.and);
        let mut decl_outputs = format!("subgraph outputs {{\n node {}\n", graphviz_style.output);

        // The constant and undefined gates are not in the canonical order,
        // they are declared when first met as a fanin.
        let generation = self.next_generation();
        for gate in self.dfs_list.iter().filter_map(|&id| self.get_gate(id)) {
            match gate.get_kind() {
                GateKind::PrimaryInput => decl_inputs.push_str(&gate.graphviz_decl()),
                GateKind::And => decl_ands.push_str(&gate.graphviz_decl()),
                GateKind::PrimaryOutput => decl_outputs.push_str(&gate.graphviz_decl()),
                GateKind::Const0 | GateKind::Undefined => (),
            }
            for pin in gate.get_fanins() {
                let Some(fanin) = self.get_gate(pin.get_gate_id()) else {
                    continue;
                };
                let leaf_style = match fanin.get_kind() {
                    GateKind::Const0 => Some(&graphviz_style.cst_false),
                    GateKind::Undefined => Some(&graphviz_style.undefined),
                    _ => None,
                };
                if let Some(leaf_style) = leaf_style {
                    if !fanin.is_visited(generation) {
                        fanin.mark_visited(generation);
                        decl_leaves.push_str(&format!(
                            "{} [label=\"{}\"] {}\n",
                            fanin.get_id(),
                            fanin.graphviz_label(),
                            leaf_style
                        ));
                    }
                }
                decl_edges.push_str(&pin.graphviz_decl(gate, fanin.is_undefined(), &graphviz_style));
            }
        }

        // Concatenating everything together
        format!(
            "
strict digraph {{
    rankdir=\"{}\"
    edge {}
    {}
    {}
    }}
    {}
    }}
    {}
    }}
    {}
}}",
            graphviz_style.rankdir,
            graphviz_style.edge_all,
            decl_leaves,
            decl_inputs,
            decl_ands,
            decl_outputs,
            decl_edges
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn read(src: &str) -> Circuit {
        Circuit::read_circuit(src.as_bytes()).unwrap()
    }

    #[test]
    fn half_adder_to_dot() {
        // sum = !(!(1 & !2) & !(!1 & 2)), carry = 1 & 2
        let src = "aag 7 2 0 2 4\n2\n4\n13\n6\n6 2 4\n8 2 5\n10 3 4\n12 9 11\ni0 a\ni1 b\no0 sum\no1 carry\n";
        let dot = read(src).to_dot(GraphvizStyle::default());
        println!("{}", dot);

        assert!(dot.contains("rankdir=\"BT\""));
        assert!(dot.contains("1 [label=\"a\"]\n"));
        assert!(dot.contains("2 [label=\"b\"]\n"));
        assert!(dot.contains("8 [label=\"sum\"]\n"));
        assert!(dot.contains("3 [label=\"3\"]\n"));
        assert!(dot.contains("2 -> 4 [headlabel=\"●\", labelangle=.0, labeldistance=1.5]\n"));
        assert!(dot.contains(
            "6 -> 8 [headlabel=\"●\", labelangle=.0, labeldistance=1.5][arrowhead=none]\n"
        ));
        assert!(dot.contains("3 -> 9 [arrowhead=none]\n"));
        assert!(dot.contains("1 -> 3 \n"));
    }

    #[test]
    fn leaves_to_dot() {
        // 3 = const & !undefined 2, output 4 = 3
        let src = "aag 3 1 0 1 1\n2\n6\n6 0 5\n";
        let dot = read(src).to_dot(GraphvizStyle::default());
        println!("{}", dot);

        assert_eq!(dot.matches("[label=\"GND\"]").count(), 1);
        assert!(dot.contains("2 [label=\"2\"] [shape=circle, style=\"dashed\"]\n"));
        assert!(dot.contains(
            "2 -> 3 [headlabel=\"●\", labelangle=.0, labeldistance=1.5][style=\"dashed\"]\n"
        ));
        // Input 1 is not in the canonical subgraph.
        assert!(!dot.contains("1 [label=\"i1\"]"));
    }

    #[test]
    fn custom_style_to_dot() {
        let style = GraphvizStyle::default()
            .rankdir("LR")
            .node(GateKind::And, "[shape=square]".into())
            .edge_complement("[color=red]".into());
        let dot = read("aag 3 2 0 1 1\n2\n4\n6\n6 2 5\n").to_dot(style);
        assert!(dot.contains("rankdir=\"LR\""));
        assert!(dot.contains("subgraph ands {\n node [shape=square]\n"));
        assert!(dot.contains("2 -> 3 [color=red]\n"));
    }

    #[test]
    fn symbol_escape_test() {
        let dot = read("aag 1 1 0 1 0\n2\n2\ni0 say \"hi\"\n").to_dot(GraphvizStyle::default());
        assert!(dot.contains("1 [label=\"say \\\"hi\\\"\"]\n"));
    }
}
