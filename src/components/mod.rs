pub mod force_graph;
pub mod knowledge_graph;
pub mod navigation;
pub mod toast;
