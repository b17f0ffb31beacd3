mod component;
mod detail;
mod model;

pub use component::InteractiveGraph;
