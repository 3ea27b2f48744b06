//! Collision outlines that follow their entities around.
//!
//! Removal is deferred: dead entities have their bound marked during one
//! pass and dropped in a batch at the end of [`Bounds::update`], so the list
//! is never mutated while it is being walked.

use crate::entity::EntityId;
use crate::geometry::{Shape, Vec2};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bound {
    target: EntityId,
    center: Vec2,
    shape: Shape,
}

impl Bound {
    pub fn new(target: EntityId, center: Vec2, shape: Shape) -> Self {
        Self { target, center, shape }
    }

    pub fn target(&self) -> EntityId {
        self.target
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn collides_with(&self, other: &Bound) -> bool {
        self.shape.intersects(self.center, &other.shape, other.center)
    }

    /// Strictly inside `container` on both axes.
    pub fn contained_in(&self, container: &Bound) -> bool {
        let (x0, y0, x1, y1) = self.shape.aabb(self.center);
        let (cx0, cy0, cx1, cy1) = container.shape.aabb(container.center);
        cx0 < x0 && cx1 > x1 && cy0 < y0 && cy1 > y1
    }
}

#[derive(Clone, Debug, Default)]
pub struct Bounds {
    bounds: Vec<Bound>,
    marked: Vec<EntityId>,
    visible: bool,
}

impl Bounds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps one bound per target: a second add replaces the first.
    pub fn add(&mut self, bound: Bound) {
        match self.bounds.iter_mut().find(|b| b.target == bound.target) {
            Some(existing) => *existing = bound,
            None => self.bounds.push(bound),
        }
    }

    pub fn bound_for(&self, target: EntityId) -> Option<&Bound> {
        self.bounds.iter().find(|b| b.target == target)
    }

    /// Unknown targets are ignored.
    pub fn mark_for_deletion(&mut self, target: EntityId) {
        let known = self.bounds.iter().any(|b| b.target == target);
        if known && !self.marked.contains(&target) {
            self.marked.push(target);
        }
    }

    /// Re-centres every bound on its target, then drops the marked ones.
    /// `locate` returns `None` for targets that no longer exist.
    pub fn update(&mut self, locate: impl Fn(EntityId) -> Option<Vec2>) {
        for bound in &mut self.bounds {
            if let Some(center) = locate(bound.target) {
                bound.center = center;
            }
        }
        self.purge();
    }

    fn purge(&mut self) {
        if self.marked.is_empty() {
            return;
        }
        let marked = std::mem::take(&mut self.marked);
        self.bounds.retain(|b| !marked.contains(&b.target));
    }

    pub fn toggle_visibility(&mut self) {
        self.visible = !self.visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bound> {
        self.bounds.iter()
    }
}
