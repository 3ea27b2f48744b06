//! RainMaker simulation core.
//!
//! Pure game logic: entity state machines, wind, bounds and the rain-fill
//! rule, driven one frame at a time by [`game::Game`]. Rendering, input and
//! real audio playback belong to the host binary.

pub mod audio;
pub mod blimp;
pub mod bounds;
pub mod cloud;
pub mod config;
pub mod distance;
pub mod entity;
pub mod game;
pub mod geometry;
pub mod helicopter;
pub mod pond;
pub mod transient;
pub mod wind;
