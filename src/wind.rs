//! Wind: one scalar speed, resampled on a cadence and pushed to every
//! registered cloud.

use log::debug;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::cloud::Cloud;
use crate::entity::{EntityId, GameObject};

#[derive(Clone, Debug)]
pub struct Wind {
    id: EntityId,
    speed: f64,
    mean: f64,
    std_dev: f64,
    observers: Vec<EntityId>,
}

impl Wind {
    pub fn new(id: EntityId, mean: f64, std_dev: f64) -> Self {
        Self {
            id,
            speed: mean,
            mean,
            std_dev,
            observers: Vec::new(),
        }
    }

    /// Emitter id for the wind's own ambience.
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn add_observer(&mut self, id: EntityId) {
        if !self.observers.contains(&id) {
            self.observers.push(id);
        }
    }

    pub fn remove_observer(&mut self, id: EntityId) {
        self.observers.retain(|o| *o != id);
    }

    pub fn observers(&self) -> &[EntityId] {
        &self.observers
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Draws a new speed from `Normal(mean, std_dev)`.
    pub fn resample(&mut self, rng: &mut impl Rng) -> f64 {
        self.speed = match Normal::new(self.mean, self.std_dev) {
            Ok(normal) => normal.sample(rng),
            Err(_) => self.mean,
        };
        self.speed
    }

    /// Resamples, then imparts the new speed to every registered cloud.
    pub fn gust(&mut self, rng: &mut impl Rng, clouds: &mut [Cloud]) {
        let speed = self.resample(rng);
        debug!("wind gust {speed:.3} to {} clouds", self.observers.len());
        for cloud in clouds.iter_mut().filter(|c| self.observers.contains(&c.id())) {
            cloud.impart_speed(speed);
        }
    }
}
