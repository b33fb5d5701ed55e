mod uniform;
mod viewport;

pub use uniform::ViewUniforms;
pub use viewport::Viewport;
