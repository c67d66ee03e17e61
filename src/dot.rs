//! Graphviz rendering of automata, for eyeballing what the builders produce.

use graphviz_rust::{
    dot_structures::{Attribute, Edge, EdgeTy, Graph, Id, Node, NodeId, Stmt, Vertex},
    printer::{DotPrinter, PrinterContext},
};

use crate::dfa::Dfa;
use crate::nfa::{Nfa, StateId};

fn node_id(state: StateId) -> NodeId {
    NodeId(Id::Plain(format!("q{state}")), None)
}

fn attr(key: &str, value: &str) -> Attribute {
    Attribute(Id::Plain(key.to_string()), Id::Plain(value.to_string()))
}

fn label(text: &str) -> Attribute {
    Attribute(Id::Plain("label".to_string()), Id::Escaped(format!("\"{text}\"")))
}

fn state_stmt(state: StateId, accepting: bool) -> Stmt {
    let shape = if accepting { "doublecircle" } else { "circle" };
    Stmt::Node(Node::new(node_id(state), vec![attr("shape", shape)]))
}

fn edge_stmt(from: StateId, to: StateId, text: &str) -> Stmt {
    Stmt::Edge(Edge {
        ty: EdgeTy::Pair(Vertex::N(node_id(from)), Vertex::N(node_id(to))),
        attributes: vec![label(text)],
    })
}

/// An invisible point with an arrow into the start state.
fn entry_stmts(start: StateId) -> [Stmt; 2] {
    let entry = NodeId(Id::Plain("entry".to_string()), None);
    [
        Stmt::Node(Node::new(entry.clone(), vec![attr("shape", "point")])),
        Stmt::Edge(Edge {
            ty: EdgeTy::Pair(Vertex::N(entry), Vertex::N(node_id(start))),
            attributes: vec![],
        }),
    ]
}

fn print(name: &str, stmts: Vec<Stmt>) -> String {
    let graph = Graph::DiGraph {
        id: Id::Plain(name.to_string()),
        strict: false,
        stmts,
    };
    graph.print(&mut PrinterContext::default())
}

impl Nfa {
    pub fn to_dot(&self) -> String {
        let mut stmts: Vec<Stmt> = entry_stmts(self.start()).into_iter().collect();
        for (id, state) in self.states().iter().enumerate() {
            stmts.push(state_stmt(id, state.accepting));
            if let Some((c, to)) = state.transition {
                stmts.push(edge_stmt(id, to, &c.to_string()));
            }
            for &to in &state.empty_transitions {
                stmts.push(edge_stmt(id, to, "ε"));
            }
        }
        print("nfa", stmts)
    }
}

impl Dfa {
    pub fn to_dot(&self) -> String {
        let mut stmts: Vec<Stmt> = entry_stmts(self.start()).into_iter().collect();
        for (id, state) in self.states().iter().enumerate() {
            stmts.push(state_stmt(id, state.accepting));
            for (&c, &to) in &state.transitions {
                stmts.push(edge_stmt(id, to, &c.to_string()));
            }
        }
        print("dfa", stmts)
    }
}
