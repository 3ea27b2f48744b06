//! The player's helicopter and its ignition cycle.
//!
//! ```text
//!   Off ──toggle──▶ Starting ──rotor at speed──▶ Ready
//!    ▲                │   ▲                        │
//!    │             toggle toggle                 toggle
//!    │                ▼   │                        │
//!    └──rotor still── Stopping ◀───────────────────┘
//! ```

use log::debug;

use crate::audio::{Cue, Mixer, Playback};
use crate::config::Config;
use crate::entity::{EntityId, GameObject};
use crate::geometry::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeliState {
    Off,
    Starting,
    Ready,
    Stopping,
}

/// Flight-model numbers lifted out of [`Config`] at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Handling {
    pub min_speed: f64,
    pub max_speed: f64,
    pub speed_step: f64,
    pub heading_step: f64,
    pub rotor_max_speed: f64,
    pub rotor_acceleration: f64,
    pub base_fuel_consumption: f64,
    pub effectively_zero: f64,
}

impl From<&Config> for Handling {
    fn from(config: &Config) -> Self {
        Self {
            min_speed: config.heli_min_speed,
            max_speed: config.heli_max_speed,
            speed_step: config.heli_speed_step,
            heading_step: config.heli_heading_step,
            rotor_max_speed: config.rotor_max_speed,
            rotor_acceleration: config.rotor_acceleration,
            base_fuel_consumption: config.base_fuel_consumption,
            effectively_zero: config.effectively_zero,
        }
    }
}

/// Blade spin. Its speed gates the Starting and Stopping transitions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotor {
    speed: f64,
    angle: f64,
    spinning: bool,
}

impl Rotor {
    fn spin_up(&mut self) {
        self.spinning = true;
    }

    fn spin_down(&mut self) {
        self.spinning = false;
    }

    fn advance(&mut self, max_speed: f64, acceleration: f64) {
        if self.spinning && self.speed < max_speed {
            self.speed += acceleration;
        } else if !self.spinning && self.speed > 0.0 {
            self.speed = (self.speed - acceleration).max(0.0);
        }
        self.angle = (self.angle + self.speed).rem_euclid(360.0);
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn is_up_to_speed(&self, max_speed: f64) -> bool {
        self.speed >= max_speed
    }

    pub fn is_rotating(&self, effectively_zero: f64) -> bool {
        self.speed.abs() > effectively_zero
    }
}

#[derive(Clone, Debug)]
pub struct Helicopter {
    id: EntityId,
    position: Vec2,
    /// Degrees clockwise from straight up.
    heading: f64,
    speed: f64,
    fuel: f64,
    rotor: Rotor,
    state: HeliState,
    handling: Handling,
}

impl Helicopter {
    pub fn new(id: EntityId, position: Vec2, fuel: f64, handling: Handling) -> Self {
        Self {
            id,
            position,
            heading: 0.0,
            speed: 0.0,
            fuel: fuel.max(0.0),
            rotor: Rotor::default(),
            state: HeliState::Off,
            handling,
        }
    }

    pub fn toggle_ignition(&mut self, mixer: &mut dyn Mixer) {
        let next = match self.state {
            HeliState::Off => {
                self.rotor.spin_up();
                mixer.play(self.id, Cue::HeliStartup, Playback::Once);
                HeliState::Starting
            }
            HeliState::Starting => {
                self.rotor.spin_down();
                mixer.stop(self.id, Cue::HeliStartup);
                mixer.play(self.id, Cue::HeliShutdown, Playback::Once);
                HeliState::Stopping
            }
            HeliState::Ready => {
                self.rotor.spin_down();
                mixer.stop(self.id, Cue::HeliHum);
                mixer.play(self.id, Cue::HeliShutdown, Playback::Once);
                HeliState::Stopping
            }
            HeliState::Stopping => {
                self.rotor.spin_up();
                mixer.stop(self.id, Cue::HeliShutdown);
                mixer.play(self.id, Cue::HeliStartup, Playback::Once);
                HeliState::Starting
            }
        };
        self.change_state(next);
    }

    pub fn update(&mut self, mixer: &mut dyn Mixer) {
        let h = self.handling;
        self.rotor.advance(h.rotor_max_speed, h.rotor_acceleration);
        self.fuel = self.consume_fuel();

        match self.state {
            HeliState::Off => {}
            HeliState::Starting => {
                if self.rotor.is_up_to_speed(h.rotor_max_speed) {
                    mixer.play(self.id, Cue::HeliHum, Playback::Looping);
                    self.change_state(HeliState::Ready);
                }
            }
            HeliState::Ready => {
                let radians = self.heading.to_radians();
                self.position = self
                    .position
                    .translate(radians.sin() * self.speed, radians.cos() * self.speed);
            }
            HeliState::Stopping => {
                if !self.rotor.is_rotating(h.effectively_zero) {
                    mixer.stop(self.id, Cue::HeliShutdown);
                    self.change_state(HeliState::Off);
                }
            }
        }
    }

    fn consume_fuel(&self) -> f64 {
        let burn = match self.state {
            HeliState::Starting => self.handling.base_fuel_consumption,
            HeliState::Ready => self.handling.base_fuel_consumption + self.speed.abs(),
            HeliState::Off | HeliState::Stopping => 0.0,
        };
        (self.fuel - burn).max(0.0)
    }

    fn change_state(&mut self, next: HeliState) {
        debug!("helicopter {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    // ── Flight controls (Ready only) ─────────────────────────────────────────

    pub fn turn_left(&mut self) {
        self.turn(-self.handling.heading_step);
    }

    pub fn turn_right(&mut self) {
        self.turn(self.handling.heading_step);
    }

    fn turn(&mut self, degrees: f64) {
        // No spinning in place.
        if self.state == HeliState::Ready && self.speed.abs() > self.handling.effectively_zero {
            self.heading = (self.heading + degrees).rem_euclid(360.0);
        }
    }

    pub fn increase_speed(&mut self) {
        if self.state == HeliState::Ready && self.speed < self.handling.max_speed {
            self.speed = (self.speed + self.handling.speed_step).min(self.handling.max_speed);
        }
    }

    pub fn decrease_speed(&mut self) {
        if self.state == HeliState::Ready && self.speed > self.handling.min_speed {
            self.speed = (self.speed - self.handling.speed_step).max(self.handling.min_speed);
        }
    }

    /// Airborne refuelling; ignored unless flying.
    pub fn refuel_by(&mut self, amount: f64) {
        if self.state == HeliState::Ready && amount > 0.0 {
            self.fuel += amount;
        }
    }

    pub fn stop_audio(&self, mixer: &mut dyn Mixer) {
        match self.state {
            HeliState::Off => {}
            HeliState::Starting => mixer.stop(self.id, Cue::HeliStartup),
            HeliState::Ready => mixer.stop(self.id, Cue::HeliHum),
            HeliState::Stopping => mixer.stop(self.id, Cue::HeliShutdown),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn has_fuel(&self) -> bool {
        self.fuel > 0.0
    }

    pub fn is_engine_off(&self) -> bool {
        matches!(self.state, HeliState::Off | HeliState::Stopping)
    }

    pub fn is_stationary(&self) -> bool {
        self.speed.abs() < self.handling.effectively_zero
    }

    pub fn state(&self) -> HeliState {
        self.state
    }

    pub fn fuel(&self) -> f64 {
        self.fuel
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn rotor(&self) -> &Rotor {
        &self.rotor
    }
}

impl GameObject for Helicopter {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Vec2 {
        self.position
    }
}
