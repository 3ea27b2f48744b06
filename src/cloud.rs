//! Clouds: drift with the wind, soak up seed, rain it back out.

use log::debug;
use rand::Rng;

use crate::audio::{Cue, Mixer, Playback};
use crate::config::Config;
use crate::entity::{EntityId, GameObject};
use crate::geometry::{check_probability, Vec2};
use crate::transient::{Drift, TransientState};

pub const FULL_SATURATION: u8 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };

    fn darker(self) -> Rgb {
        Rgb {
            r: self.r.saturating_sub(1),
            g: self.g.saturating_sub(1),
            b: self.b.saturating_sub(1),
        }
    }

    fn lighter(self) -> Rgb {
        Rgb {
            r: self.r.saturating_add(1),
            g: self.g.saturating_add(1),
            b: self.b.saturating_add(1),
        }
    }
}

/// Only an `InView` cloud can be seeded or rain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloudState {
    Created,
    InView,
    Dead,
}

impl From<TransientState> for CloudState {
    fn from(state: TransientState) -> Self {
        match state {
            TransientState::Created => CloudState::Created,
            TransientState::InView => CloudState::InView,
            TransientState::Dead => CloudState::Dead,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Cloud {
    id: EntityId,
    drift: Drift,
    major_radius: f64,
    minor_radius: f64,
    seed_percentage: u8,
    color: Rgb,
    state: CloudState,
}

impl Cloud {
    pub fn new(
        id: EntityId,
        position: Vec2,
        major_radius: f64,
        minor_radius: f64,
        speed: f64,
        speed_offset: f64,
    ) -> Self {
        Self {
            id,
            drift: Drift::new(position, speed, speed_offset, major_radius),
            major_radius,
            minor_radius,
            seed_percentage: 0,
            color: Rgb::WHITE,
            state: CloudState::Created,
        }
    }

    pub fn update(&mut self, field_width: f64, mixer: &mut dyn Mixer) {
        if let Some(next) = self.drift.advance(field_width) {
            let next = CloudState::from(next);
            debug!("cloud {} {:?} -> {:?}", self.id, self.state, next);
            if next == CloudState::Dead {
                self.stop_audio(mixer);
            }
            self.state = next;
        }
    }

    pub fn seed(&mut self) {
        if self.state != CloudState::InView || self.seed_percentage >= FULL_SATURATION {
            return;
        }
        self.seed_percentage += 1;
        self.color = self.color.darker();
    }

    /// Rains one step if saturated enough. Returns whether it rained.
    pub fn try_to_rain(&mut self, rng: &mut impl Rng, mixer: &mut dyn Mixer, config: &Config) -> bool {
        if self.state != CloudState::InView {
            return false;
        }

        if self.seed_percentage < config.min_saturation_to_rain {
            if mixer.is_playing(self.id, Cue::Rain) {
                mixer.stop(self.id, Cue::Rain);
            }
            return false;
        }

        self.seed_percentage -= 1;
        self.color = self.color.lighter();

        if !mixer.is_playing(self.id, Cue::Rain) {
            mixer.play(self.id, Cue::Rain, Playback::Looping);
        }
        if check_probability(rng, config.thunder_chance) && !mixer.is_playing(self.id, Cue::Thunder) {
            mixer.play(self.id, Cue::Thunder, Playback::Once);
        }
        true
    }

    pub fn stop_audio(&self, mixer: &mut dyn Mixer) {
        mixer.stop(self.id, Cue::Rain);
    }

    pub fn impart_speed(&mut self, speed: f64) {
        self.drift.impart_speed(speed);
    }

    pub fn speed(&self) -> f64 {
        self.drift.speed()
    }

    pub fn state(&self) -> CloudState {
        self.state
    }

    pub fn is_dead(&self) -> bool {
        self.state == CloudState::Dead
    }

    pub fn seed_percentage(&self) -> u8 {
        self.seed_percentage
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn saturation_label(&self) -> String {
        format!("{}%", self.seed_percentage)
    }

    pub fn width(&self) -> f64 {
        self.major_radius * 2.0
    }

    pub fn height(&self) -> f64 {
        self.minor_radius * 2.0
    }
}

impl GameObject for Cloud {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Vec2 {
        self.drift.position
    }
}
