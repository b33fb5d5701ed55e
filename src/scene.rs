use crate::bounds::{Bounds, common_bounds};
use crate::controls::TransformIntent;
use crate::drawing::{Shape, StylePatch};
use crate::error::ModelError;
use crate::hit_test::hit_test;
use crate::math::Vec2;
use crate::registry;
use anyhow::Context;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    shapes: Vec<Arc<Shape>>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_shapes(shapes: impl IntoIterator<Item = Shape>) -> Self {
        Self {
            shapes: shapes.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn shapes(&self) -> &[Arc<Shape>] {
        &self.shapes
    }

    pub fn visible(&self) -> impl Iterator<Item = &Arc<Shape>> + Clone {
        self.shapes.iter().filter(|s| !s.is_deleted())
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    fn index_of(&self, id: Uuid) -> Option<usize> {
        self.shapes.iter().position(|s| s.id() == id)
    }

    pub fn get(&self, id: Uuid) -> Option<&Arc<Shape>> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn insert(&mut self, shape: Shape) -> Arc<Shape> {
        let shape = Arc::new(shape);
        log::debug!("inserted {} {}", shape.shape_type().as_str(), shape.id());
        self.shapes.push(Arc::clone(&shape));
        shape
    }

    pub fn replace(&mut self, shape: Shape) -> Result<Arc<Shape>, ModelError> {
        let index = self.index_of(shape.id()).ok_or(ModelError::ShapeNotFound(shape.id()))?;
        let shape = Arc::new(shape);
        self.shapes[index] = Arc::clone(&shape);
        Ok(shape)
    }

    fn editable(&self, id: Uuid) -> Result<usize, ModelError> {
        let index = self
            .index_of(id)
            .filter(|&i| !self.shapes[i].is_deleted())
            .ok_or(ModelError::ShapeNotFound(id))?;
        if self.shapes[index].attrs.locked {
            return Err(ModelError::ShapeLocked(id));
        }
        Ok(index)
    }

    pub fn update(&mut self, id: Uuid, edit: impl FnOnce(&Shape) -> Shape) -> Result<Arc<Shape>, ModelError> {
        let index = self.editable(id)?;
        let next = Arc::new(edit(&self.shapes[index]));
        self.shapes[index] = Arc::clone(&next);
        Ok(next)
    }

    pub fn set_locked(&mut self, id: Uuid, locked: bool) -> Result<Arc<Shape>, ModelError> {
        let index = self.index_of(id).ok_or(ModelError::ShapeNotFound(id))?;
        let next = Arc::new(self.shapes[index].with_locked(locked));
        self.shapes[index] = Arc::clone(&next);
        Ok(next)
    }

    pub fn delete(&mut self, id: Uuid) -> Result<(), ModelError> {
        self.update(id, Shape::as_deleted)?;
        log::debug!("tombstoned {id}");
        Ok(())
    }

    /// Applies `patch` to every id in `ids`. Nothing changes unless every id
    /// names a live, unlocked shape.
    pub fn apply_style_patch(&mut self, ids: &[Uuid], patch: &StylePatch) -> Result<Vec<Arc<Shape>>, ModelError> {
        let indices = ids.iter().map(|&id| self.editable(id)).collect::<Result<Vec<_>, _>>()?;
        Ok(indices
            .into_iter()
            .map(|i| {
                let next = Arc::new(self.shapes[i].with_style_patch(patch));
                self.shapes[i] = Arc::clone(&next);
                next
            })
            .collect())
    }

    pub fn apply_intent(&mut self, intent: &TransformIntent) -> Result<Arc<Shape>, ModelError> {
        match *intent {
            TransformIntent::RotateTo { id, angle } => self.update(id, |s| s.rotated_to(angle)),
            TransformIntent::ResizeTo { id, frame } => self.update(id, |s| s.resized_to(frame)),
            TransformIntent::Clone { id, offset } => {
                let index = self.editable(id)?;
                let copy = Arc::new(self.shapes[index].duplicate(offset));
                log::debug!("cloned {id} as {}", copy.id());
                self.shapes.insert(index + 1, Arc::clone(&copy));
                Ok(copy)
            }
        }
    }

    pub fn shape_at(&self, point: Vec2, tolerance: f64) -> Option<&Arc<Shape>> {
        self.shapes.iter().rev().find(|s| hit_test(s, point, tolerance))
    }

    pub fn bounds(&self) -> Option<Bounds> {
        common_bounds(self.shapes.iter().map(|s| s.as_ref()))
    }

    pub fn prune_deleted(&mut self) -> usize {
        let before = self.shapes.len();
        self.shapes.retain(|s| !s.is_deleted());
        before - self.shapes.len()
    }

    pub fn snapshot(&self) -> Vec<Arc<Shape>> {
        self.shapes.clone()
    }

    pub fn restore(&mut self, snapshot: Vec<Arc<Shape>>) {
        self.shapes = snapshot;
    }

    pub fn to_json(&self) -> anyhow::Result<Value> {
        self.shapes
            .iter()
            .map(|s| registry::shape_to_value(s))
            .collect::<anyhow::Result<Vec<_>>>()
            .map(Value::Array)
    }

    pub fn from_json(value: Value) -> anyhow::Result<Self> {
        let Value::Array(records) = value else {
            anyhow::bail!("scene must be a JSON array of shape records");
        };
        let shapes = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| registry::shape_from_value(record).with_context(|| format!("shape record {i}")))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self::from_shapes(shapes))
    }

    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let value: Value = serde_json::from_str(json).context("scene is not valid JSON")?;
        Self::from_json(value)
    }
}
