use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown shape type `{0}`")]
    UnknownShapeType(String),

    #[error("shape record has no `type` tag")]
    MissingTypeTag,

    #[error("shape {0} not found in scene")]
    ShapeNotFound(Uuid),

    #[error("shape {0} is locked")]
    ShapeLocked(Uuid),

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid zoom range {min}..{max}")]
    InvalidZoomRange { min: f64, max: f64 },

    #[error("flatten tolerance must be positive, got {0}")]
    InvalidTolerance(f64),
}
