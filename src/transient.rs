//! Horizontal drift shared by clouds and blimps.
//!
//! A transient object enters from the left, crosses the playfield and dies
//! once its trailing edge has left on the right. Death is terminal.

use crate::geometry::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransientState {
    /// Spawned with no part visible yet.
    Created,
    InView,
    Dead,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Drift {
    pub position: Vec2,
    speed: f64,
    speed_offset: f64,
    half_width: f64,
    state: TransientState,
}

impl Drift {
    pub fn new(position: Vec2, speed: f64, speed_offset: f64, half_width: f64) -> Self {
        Self {
            position,
            speed,
            speed_offset,
            half_width,
            state: TransientState::Created,
        }
    }

    pub fn state(&self) -> TransientState {
        self.state
    }

    pub fn speed_offset(&self) -> f64 {
        self.speed_offset
    }

    /// Moves one tick along x. Returns the new state when a transition fired.
    pub fn advance(&mut self, field_width: f64) -> Option<TransientState> {
        let next = match self.state {
            TransientState::Dead => return None,
            TransientState::Created => {
                self.position.x += self.speed;
                if self.position.x + self.half_width > 0.0 {
                    TransientState::InView
                } else {
                    TransientState::Created
                }
            }
            TransientState::InView => {
                self.position.x += self.speed;
                if self.position.x - self.half_width > field_width {
                    TransientState::Dead
                } else {
                    TransientState::InView
                }
            }
        };

        if next == self.state {
            return None;
        }
        self.state = next;
        Some(next)
    }

    /// Wind injection: the imparted speed plus this object's own jitter.
    pub fn impart_speed(&mut self, speed: f64) {
        if self.state != TransientState::Dead {
            self.speed = speed + self.speed_offset;
        }
    }

    pub fn speed(&self) -> f64 {
        match self.state {
            TransientState::Dead => 0.0,
            _ => self.speed,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.state == TransientState::Dead
    }
}
