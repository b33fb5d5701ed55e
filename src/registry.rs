use crate::config::RenderConfig;
use crate::drawing::{Shape, ShapeType};
use crate::error::ModelError;
use crate::hit_test;
use crate::math::Vec2;
use crate::renderer::{self, DrawingContent};
use crate::rough::RoughGenerator;
use anyhow::Context;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

pub type RenderFn = fn(&RoughGenerator, &RenderConfig, &Shape) -> DrawingContent;
pub type HitTestFn = fn(&Shape, Vec2, f64) -> bool;

pub struct ShapeHandlers {
    pub shape_type: ShapeType,
    pub deserialize: fn(Value) -> anyhow::Result<Shape>,
    pub serialize: fn(&Shape) -> anyhow::Result<Value>,
    pub render: RenderFn,
    pub hit_test: HitTestFn,
}

fn deserialize_shape(value: Value) -> anyhow::Result<Shape> {
    let mut shape: Shape = serde_json::from_value(value).context("malformed shape record")?;
    shape.sanitize();
    Ok(shape)
}

fn serialize_shape(shape: &Shape) -> anyhow::Result<Value> {
    serde_json::to_value(shape).with_context(|| format!("failed to serialize shape {}", shape.id()))
}

const fn handlers(shape_type: ShapeType, render: RenderFn, hit_test: HitTestFn) -> ShapeHandlers {
    ShapeHandlers {
        shape_type,
        deserialize: deserialize_shape,
        serialize: serialize_shape,
        render,
        hit_test,
    }
}

// Indexed by `ShapeType as usize`; order must follow `ShapeType::ALL`.
static HANDLERS: [ShapeHandlers; 8] = [
    handlers(ShapeType::Rectangle, renderer::render_rectangle, hit_test::hit_rectangle),
    handlers(ShapeType::Ellipse, renderer::render_ellipse, hit_test::hit_ellipse),
    handlers(ShapeType::Diamond, renderer::render_diamond, hit_test::hit_diamond),
    handlers(ShapeType::Line, renderer::render_linear, hit_test::hit_linear),
    handlers(ShapeType::Arrow, renderer::render_linear, hit_test::hit_linear),
    handlers(ShapeType::Freehand, renderer::render_freehand, hit_test::hit_freehand),
    handlers(ShapeType::Image, renderer::render_image, hit_test::hit_frame),
    handlers(ShapeType::Text, renderer::render_text, hit_test::hit_frame),
];

static BY_TAG: LazyLock<HashMap<&'static str, ShapeType>> =
    LazyLock::new(|| ShapeType::ALL.iter().map(|t| (t.as_str(), *t)).collect());

pub fn handlers_for(shape_type: ShapeType) -> &'static ShapeHandlers {
    &HANDLERS[shape_type as usize]
}

pub fn lookup(tag: &str) -> Result<&'static ShapeHandlers, ModelError> {
    BY_TAG.get(tag).map(|t| handlers_for(*t)).ok_or_else(|| {
        log::debug!("no handlers registered for shape type `{tag}`");
        ModelError::UnknownShapeType(tag.to_string())
    })
}

pub fn shape_from_value(value: Value) -> anyhow::Result<Shape> {
    let tag = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ModelError::MissingTypeTag)?;
    let handlers = lookup(tag)?;
    (handlers.deserialize)(value)
}

pub fn shape_to_value(shape: &Shape) -> anyhow::Result<Value> {
    (handlers_for(shape.shape_type()).serialize)(shape)
}
