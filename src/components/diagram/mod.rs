//! Interactive system-design diagram: graph model, store, pointer
//! controller, throughput styling and the canvas that ties them together.

mod component;
pub mod controller;
pub mod persist;
mod render;
pub mod settings;
pub mod state;
pub mod store;
pub mod style;
pub mod types;

pub use component::DiagramCanvas;
pub use settings::EditorSettings;
pub use store::DiagramStore;
pub use types::{Edge, EdgeId, Node, NodeId, NodeKind, NodeTemplate, Point};
