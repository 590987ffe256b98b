//! Canvas renderer with a force-directed layout.

mod component;
mod frame_loop;
mod render;
mod state;
mod types;

pub use component::ForceGraphCanvas;
pub use state::kind_color;
pub use types::{GraphData, GraphLink, GraphNode, NodeKind};
