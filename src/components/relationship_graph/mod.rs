//! Relationship graph viewer.
//!
//! Renders an interactive force-directed network on an HTML canvas with:
//! - A validated, read-only graph model with a precomputed adjacency index
//! - A layout engine that owns every node position and velocity
//! - Pan, zoom, node dragging and click-to-select interactions
//! - A detail panel describing the selected node and its connections
//!
//! The model, layout, camera and selection modules have no browser dependency.
//!
//! # Example
//!
//! ```ignore
//! use guild_graph::{Category, Edge, GraphDataset, Node, RelationshipGraphViewer};
//!
//! let data = GraphDataset {
//!     nodes: vec![
//!         Node::new("a", "Node A", Category::Agent, 8.0),
//!         Node::new("b", "Node B", Category::Target, 6.0),
//!     ],
//!     edges: vec![Edge::new("a", "b", 3.0)],
//!     layout: None,
//! };
//!
//! view! { <RelationshipGraphViewer data=data fullscreen=true /> }
//! ```

pub mod camera;
mod component;
pub mod dataset;
pub mod error;
pub mod layout;
pub mod model;
mod render;
pub mod scale;
pub mod selection;
pub mod theme;
pub mod types;

pub use camera::{Camera, CameraLimits};
pub use component::RelationshipGraphViewer;
pub use error::{GraphError, ValidationError};
pub use layout::{LayoutEngine, LayoutSnapshot, Point, PositionVelocity, SimulationParameters};
pub use model::GraphModel;
pub use selection::{Connection, SelectionPresenter, SelectionState, SelectionView};
pub use theme::Theme;
pub use types::{Category, Edge, GraphDataset, Node, NodeDetail};
