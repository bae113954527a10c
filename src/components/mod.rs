//! UI components.

pub mod term_graph;
