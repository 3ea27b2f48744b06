//! Pond-to-cloud distance tracking and the rule that turns distance into
//! pond fill.

use crate::entity::EntityId;
use crate::geometry::Vec2;

/// A measurement from a fixed pond to a drifting cloud.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceLine {
    pond: EntityId,
    cloud: EntityId,
    start: Vec2,
    end: Vec2,
}

impl DistanceLine {
    pub fn new(pond: EntityId, pond_position: Vec2, cloud: EntityId, cloud_position: Vec2) -> Self {
        Self {
            pond,
            cloud,
            start: pond_position,
            end: cloud_position,
        }
    }

    pub fn pond(&self) -> EntityId {
        self.pond
    }

    pub fn cloud(&self) -> EntityId {
        self.cloud
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn end(&self) -> Vec2 {
        self.end
    }

    pub fn distance(&self) -> f64 {
        self.start.distance_to(self.end)
    }

    pub fn midpoint(&self) -> Vec2 {
        self.start.midpoint(self.end)
    }

    pub fn label(&self) -> String {
        format!("{}", self.distance() as i64)
    }
}

#[derive(Clone, Debug, Default)]
pub struct DistanceLines {
    lines: Vec<DistanceLine>,
    marked: Vec<EntityId>,
    visible: bool,
}

impl DistanceLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the line for a pond/cloud pair unless one already exists.
    pub fn connect(&mut self, pond: EntityId, pond_position: Vec2, cloud: EntityId, cloud_position: Vec2) {
        let exists = self.lines.iter().any(|l| l.pond == pond && l.cloud == cloud);
        if !exists {
            self.lines.push(DistanceLine::new(pond, pond_position, cloud, cloud_position));
        }
    }

    /// Marks every line ending on `cloud` for the next purge.
    pub fn mark_cloud_for_deletion(&mut self, cloud: EntityId) {
        let known = self.lines.iter().any(|l| l.cloud == cloud);
        if known && !self.marked.contains(&cloud) {
            self.marked.push(cloud);
        }
    }

    /// Moves each dynamic endpoint to its cloud, then drops marked lines.
    pub fn update(&mut self, locate: impl Fn(EntityId) -> Option<Vec2>) {
        for line in &mut self.lines {
            if let Some(end) = locate(line.cloud) {
                line.end = end;
            }
        }
        if !self.marked.is_empty() {
            let marked = std::mem::take(&mut self.marked);
            self.lines.retain(|l| !marked.contains(&l.cloud));
        }
    }

    pub fn toggle_visibility(&mut self) {
        self.visible = !self.visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DistanceLine> {
        self.lines.iter()
    }
}

/// Fill multiplier for a cloud `distance` away from a pond of `max_radius`.
///
/// In range (`distance <= k * diameter`) the multiplier falls off linearly
/// from 1 at the pond centre to 0 at the edge of range; out of range the
/// cloud does not rain on the pond at all.
pub fn rain_fill_multiplier(distance: f64, max_radius: f64, range_multiplier: f64) -> Option<f64> {
    let reach = range_multiplier * 2.0 * max_radius;
    if reach <= 0.0 || distance > reach {
        return None;
    }
    Some(1.0 - distance / reach)
}
