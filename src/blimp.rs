//! Blimps: slow fuel tankers that cross the field once.

use log::debug;
use rand::Rng;

use crate::audio::{Cue, Mixer, Playback};
use crate::config::Config;
use crate::entity::{EntityId, GameObject, IdAllocator};
use crate::geometry::{random_in_range, Vec2};
use crate::transient::{Drift, TransientState};

/// Fuel rides along with the lifecycle; a dead blimp has none left to give.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BlimpState {
    Created { fuel: f64 },
    InView { fuel: f64 },
    Dead,
}

#[derive(Clone, Debug)]
pub struct Blimp {
    id: EntityId,
    drift: Drift,
    body: Vec2,
    state: BlimpState,
}

impl Blimp {
    pub fn new(id: EntityId, position: Vec2, speed: f64, speed_offset: f64, fuel: f64, body: Vec2) -> Self {
        Self {
            id,
            drift: Drift::new(position, speed, speed_offset, body.x / 2.0),
            body,
            state: BlimpState::Created { fuel: fuel.max(0.0) },
        }
    }

    /// A fresh blimp one body length left of the field at a random altitude.
    pub fn spawn(rng: &mut impl Rng, config: &Config, ids: &mut IdAllocator) -> Self {
        let position = Vec2::new(-config.blimp_body.x, random_in_range(rng, 0.0, config.height));
        let speed = random_in_range(rng, config.blimp_speed.min, config.blimp_speed.max);
        let offset = random_in_range(rng, config.blimp_speed_offset.min, config.blimp_speed_offset.max);
        let fuel = random_in_range(rng, config.blimp_fuel.min, config.blimp_fuel.max);
        Self::new(ids.next_id(), position, speed, offset, fuel, config.blimp_body)
    }

    pub fn update(&mut self, field_width: f64, mixer: &mut dyn Mixer) {
        let Some(next) = self.drift.advance(field_width) else {
            return;
        };
        self.state = match (self.state, next) {
            (BlimpState::Created { fuel }, TransientState::InView) => {
                mixer.play(self.id, Cue::BlimpEngine, Playback::Looping);
                BlimpState::InView { fuel }
            }
            (BlimpState::InView { .. }, TransientState::Dead) => {
                mixer.stop(self.id, Cue::BlimpEngine);
                BlimpState::Dead
            }
            (state, _) => state,
        };
        debug!("blimp {} -> {:?}", self.id, self.state);
    }

    /// Hands over up to `rate` units. Only an in-view blimp gives fuel.
    pub fn extract_fuel(&mut self, rate: f64) -> f64 {
        match &mut self.state {
            BlimpState::InView { fuel } => {
                let taken = fuel.min(rate.max(0.0));
                *fuel -= taken;
                taken
            }
            _ => 0.0,
        }
    }

    pub fn fuel(&self) -> f64 {
        match self.state {
            BlimpState::Created { fuel } | BlimpState::InView { fuel } => fuel,
            BlimpState::Dead => 0.0,
        }
    }

    pub fn fuel_label(&self) -> String {
        format!("{}", self.fuel() as i64)
    }

    pub fn stop_audio(&self, mixer: &mut dyn Mixer) {
        if let BlimpState::InView { .. } = self.state {
            mixer.stop(self.id, Cue::BlimpEngine);
        }
    }

    pub fn speed(&self) -> f64 {
        self.drift.speed()
    }

    pub fn state(&self) -> BlimpState {
        self.state
    }

    pub fn is_dead(&self) -> bool {
        self.state == BlimpState::Dead
    }

    pub fn body(&self) -> Vec2 {
        self.body
    }
}

impl GameObject for Blimp {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Vec2 {
        self.drift.position
    }
}
