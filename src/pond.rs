//! Ponds that rain fills, and the helipad the round ends on.

use std::f64::consts::PI;

use rand::Rng;

use crate::config::Config;
use crate::entity::{EntityId, GameObject, IdAllocator};
use crate::geometry::{random_in_range, random_position_in_bound, Vec2};

#[derive(Clone, Debug, PartialEq)]
pub struct Pond {
    id: EntityId,
    position: Vec2,
    max_radius: f64,
    current_radius: f64,
    max_area: f64,
    current_area: f64,
    percent_full: u8,
}

impl Pond {
    pub fn new(id: EntityId, position: Vec2, max_radius: f64, current_radius: f64) -> Self {
        let current_radius = current_radius.clamp(0.0, max_radius);
        let max_area = PI * max_radius.powi(2);
        let current_area = PI * current_radius.powi(2);
        Self {
            id,
            position,
            max_radius,
            current_radius,
            max_area,
            current_area,
            percent_full: percent_of(current_area, max_area),
        }
    }

    /// Adds `multiplier` percent of the maximum area, capped at full.
    pub fn fill_by_increment(&mut self, multiplier: f64) {
        if multiplier <= 0.0 {
            return;
        }
        self.current_area = (self.current_area + self.max_area * 0.01 * multiplier).min(self.max_area);
        self.current_radius = (self.current_area / PI).sqrt();
        self.percent_full = percent_of(self.current_area, self.max_area);
    }

    pub fn percent_full(&self) -> u8 {
        self.percent_full
    }

    pub fn percent_label(&self) -> String {
        format!("{}%", self.percent_full)
    }

    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    pub fn current_radius(&self) -> f64 {
        self.current_radius
    }

    pub fn max_area(&self) -> f64 {
        self.max_area
    }

    pub fn current_area(&self) -> f64 {
        self.current_area
    }
}

fn percent_of(area: f64, max_area: f64) -> u8 {
    if max_area <= 0.0 {
        return 0;
    }
    // Nudge past float noise so 9.0 reads as 9, not 8.
    (area / max_area * 100.0 + 1e-9).floor().clamp(0.0, 100.0) as u8
}

impl GameObject for Pond {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Vec2 {
        self.position
    }
}

/// The fixed set of ponds for a round.
#[derive(Clone, Debug, Default)]
pub struct Ponds {
    ponds: Vec<Pond>,
}

impl Ponds {
    pub fn scatter(rng: &mut impl Rng, config: &Config, ids: &mut IdAllocator) -> Self {
        let ponds = (0..config.pond_count)
            .map(|_| {
                let position = random_position_in_bound(
                    rng,
                    Vec2::new(0.0, config.scatter_floor()),
                    Vec2::new(config.width, config.height),
                );
                let radius = random_in_range(rng, config.pond_min_radius, config.pond_max_starting_radius);
                Pond::new(ids.next_id(), position, config.pond_max_radius, radius)
            })
            .collect();
        Self { ponds }
    }

    pub fn push(&mut self, pond: Pond) {
        self.ponds.push(pond);
    }

    /// Sum of every pond's fill fraction; three full ponds make 3.0.
    pub fn total_capacity(&self) -> f64 {
        let total: u32 = self.ponds.iter().map(|p| u32::from(p.percent_full)).sum();
        f64::from(total) / 100.0
    }

    pub fn get(&self, id: EntityId) -> Option<&Pond> {
        self.ponds.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Pond> {
        self.ponds.iter_mut().find(|p| p.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pond> {
        self.ponds.iter()
    }

    pub fn len(&self) -> usize {
        self.ponds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ponds.is_empty()
    }
}

impl<'a> IntoIterator for &'a Ponds {
    type Item = &'a Pond;
    type IntoIter = std::slice::Iter<'a, Pond>;

    fn into_iter(self) -> Self::IntoIter {
        self.ponds.iter()
    }
}

/// Where the helicopter starts and must land to win.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Helipad {
    id: EntityId,
    position: Vec2,
    size: Vec2,
}

impl Helipad {
    pub fn new(id: EntityId, position: Vec2, size: Vec2) -> Self {
        Self { id, position, size }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }
}

impl GameObject for Helipad {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Vec2 {
        self.position
    }
}
