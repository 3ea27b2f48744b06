//! The sound seam between the simulation and whatever plays audio.
//!
//! State machines only ever ask a [`Mixer`] to start, stop, or query a cue
//! for a given emitter. Decoding and output are the host's business.

use std::collections::HashSet;

use crate::entity::EntityId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    HeliStartup,
    HeliHum,
    HeliShutdown,
    BlimpEngine,
    Wind,
    Rain,
    Thunder,
    Seeding,
    Refueling,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Playback {
    Once,
    Looping,
}

pub trait Mixer {
    fn play(&mut self, source: EntityId, cue: Cue, playback: Playback);
    fn stop(&mut self, source: EntityId, cue: Cue);
    fn is_playing(&self, source: EntityId, cue: Cue) -> bool;
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silence;

impl Mixer for Silence {
    fn play(&mut self, _: EntityId, _: Cue, _: Playback) {}
    fn stop(&mut self, _: EntityId, _: Cue) {}
    fn is_playing(&self, _: EntityId, _: Cue) -> bool {
        false
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundEvent {
    Play { source: EntityId, cue: Cue, playback: Playback },
    Stop { source: EntityId, cue: Cue },
}

/// Records every request and remembers which loops are running.
///
/// One-shots are never reported as playing, since their length is only
/// known to the real output device.
#[derive(Clone, Debug, Default)]
pub struct SoundLog {
    events: Vec<SoundEvent>,
    looping: HashSet<(EntityId, Cue)>,
}

impl SoundLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SoundEvent] {
        &self.events
    }

    /// Takes the recorded events, leaving loop tracking intact.
    pub fn drain(&mut self) -> Vec<SoundEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn played(&self, cue: Cue) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SoundEvent::Play { cue: c, .. } if *c == cue))
            .count()
    }

    pub fn active_loops(&self) -> usize {
        self.looping.len()
    }
}

impl Mixer for SoundLog {
    fn play(&mut self, source: EntityId, cue: Cue, playback: Playback) {
        if playback == Playback::Looping {
            self.looping.insert((source, cue));
        }
        self.events.push(SoundEvent::Play { source, cue, playback });
    }

    fn stop(&mut self, source: EntityId, cue: Cue) {
        self.looping.remove(&(source, cue));
        self.events.push(SoundEvent::Stop { source, cue });
    }

    fn is_playing(&self, source: EntityId, cue: Cue) -> bool {
        self.looping.contains(&(source, cue))
    }
}
