pub mod arrowhead;
pub mod bounds;
pub mod canvas;
pub mod config;
pub mod controls;
pub mod corners;
pub mod drawing;
pub mod error;
pub mod freehand;
pub mod history;
pub mod hit_test;
pub mod math;
pub mod registry;
pub mod renderer;
pub mod rough;
pub mod scene;
pub mod tessellate;
mod vertex;

// Re-export the main public interface
pub use bounds::{Bounds, common_bounds, shape_bounds};
pub use canvas::{ViewUniforms, Viewport};
pub use config::RenderConfig;
pub use controls::TransformIntent;
pub use drawing::{Shape, ShapeKind, ShapeStyle, ShapeType, StylePatch};
pub use error::{ConfigError, ModelError};
pub use freehand::FreehandSession;
pub use history::History;
pub use renderer::{DrawingContent, RenderOptions, Renderer, ShapeDrawing};
pub use scene::Scene;
pub use tessellate::Mesh;
pub use vertex::Vertex;
