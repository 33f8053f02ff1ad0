pub mod collapse;
pub mod error;
pub mod exposed;
pub mod geometry;
pub mod graph;
pub mod hierarchical;
pub mod layout;
pub mod repulsion;
pub mod runner;
pub mod scaler;
pub mod settings;
pub mod tree_model;

pub use collapse::{CollapseData, Collapser, HiddenNodeMap};
pub use error::GraphError;
pub use exposed::{ExposedGraph, project, project_graph};
pub use geometry::{Point, Rect};
pub use graph::DependencyGraph;
pub use hierarchical::{HierarchicalLayout, Projection};
pub use layout::{LayoutAlgorithm, LayoutContext, LayoutRegistry, grid_positions};
pub use repulsion::RepulsionLayout;
pub use runner::{IterativeLayout, IterativeRunner, LayoutRunner};
pub use scaler::LayoutScaler;
pub use settings::{LayoutSettings, RepulsionSettings};
pub use tree_model::TreeModel;
