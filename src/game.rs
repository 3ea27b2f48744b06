//! The per-frame driver.
//!
//! [`Game::tick`] runs one frame in a fixed order: timers, deferred purge,
//! entity motion, bounds and distance lines, wind, blimp spawning,
//! refuelling, seeding, rain fill, cloud respawn, then lose/win checks.
//! Collision and distance checks later in the frame rely on positions that
//! were updated earlier in the same frame.
//!
//! All randomness comes through the injected RNG and all sound through the
//! injected [`Mixer`], so a seeded RNG replays a round exactly.

use std::time::Duration;

use log::{debug, info, trace};
use rand::Rng;

use crate::audio::{Cue, Mixer, Playback};
use crate::blimp::Blimp;
use crate::bounds::{Bound, Bounds};
use crate::cloud::Cloud;
use crate::config::{Config, ConfigError};
use crate::distance::{rain_fill_multiplier, DistanceLines};
use crate::entity::{EntityId, GameObject, IdAllocator};
use crate::geometry::{check_probability, random_in_range, random_position_in_bound, Shape, Vec2};
use crate::helicopter::{Handling, Helicopter};
use crate::pond::{Helipad, Ponds};
use crate::wind::Wind;

// ── Host-facing vocabulary ───────────────────────────────────────────────────

/// Discrete player intents, already decoded from raw input by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    TurnLeft,
    TurnRight,
    IncreaseSpeed,
    DecreaseSpeed,
    /// One-shot: consumed by the next tick.
    Seed,
    ToggleIgnition,
    Restart,
    ToggleBounds,
    ToggleDistanceLines,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RoundOutcome {
    Won { score: f64 },
    Lost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Restart,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Status {
    Running,
    /// Frozen until the host resolves the outcome.
    Concluded(RoundOutcome),
    Quit,
}

// ── Timekeeping ──────────────────────────────────────────────────────────────

/// Seconds between successive `now` readings; the first reading yields 0.
#[derive(Clone, Copy, Debug, Default)]
struct FrameClock {
    last: Option<Duration>,
}

impl FrameClock {
    fn delta(&mut self, now: Duration) -> f64 {
        let delta = match self.last {
            Some(last) => now.saturating_sub(last).as_secs_f64(),
            None => 0.0,
        };
        self.last = Some(now);
        delta
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Timers {
    since_rain: f64,
    since_wind: f64,
    since_blimp_try: f64,
}

impl Timers {
    fn advance(&mut self, delta: f64) {
        self.since_rain += delta;
        self.since_wind += delta;
        self.since_blimp_try += delta;
    }
}

// ── Round judgement (pure) ───────────────────────────────────────────────────

/// Decides whether a round has ended.
///
/// Running dry loses. Winning needs enough water in the ponds, fuel left,
/// the engine off and the helicopter parked wholly on the helipad.
pub fn judge_round(
    total_capacity: f64,
    helicopter: &Helicopter,
    on_helipad: bool,
    win_capacity: f64,
) -> Option<RoundOutcome> {
    if !helicopter.has_fuel() {
        return Some(RoundOutcome::Lost);
    }
    if total_capacity >= win_capacity && helicopter.is_engine_off() && on_helipad {
        return Some(RoundOutcome::Won {
            score: helicopter.fuel() * total_capacity,
        });
    }
    None
}

// ── Game ─────────────────────────────────────────────────────────────────────

pub struct Game {
    config: Config,
    ids: IdAllocator,
    clock: FrameClock,
    timers: Timers,
    helicopter: Helicopter,
    helipad: Helipad,
    ponds: Ponds,
    clouds: Vec<Cloud>,
    blimps: Vec<Blimp>,
    wind: Wind,
    bounds: Bounds,
    lines: DistanceLines,
    seed_requested: bool,
    status: Status,
}

impl Game {
    pub fn new(config: Config, rng: &mut impl Rng, mixer: &mut dyn Mixer) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, rng, mixer))
    }

    fn build(config: Config, rng: &mut impl Rng, mixer: &mut dyn Mixer) -> Self {
        let mut ids = IdAllocator::new();

        let wind = Wind::new(ids.next_id(), config.wind_mean, config.wind_std_dev);
        let ponds = Ponds::scatter(rng, &config, &mut ids);
        let helipad = Helipad::new(ids.next_id(), config.helipad_position, config.helipad_size);
        let helicopter = Helicopter::new(
            ids.next_id(),
            config.helipad_position,
            config.starting_fuel,
            Handling::from(&config),
        );

        let mut bounds = Bounds::new();
        bounds.add(Bound::new(
            helipad.id(),
            helipad.position(),
            Shape::Rect {
                width: helipad.size().x,
                height: helipad.size().y,
            },
        ));
        bounds.add(Bound::new(
            helicopter.id(),
            helicopter.position(),
            Shape::Circle {
                radius: config.rotor_length / 2.0,
            },
        ));

        let mut game = Self {
            config,
            ids,
            clock: FrameClock::default(),
            timers: Timers::default(),
            helicopter,
            helipad,
            ponds,
            clouds: Vec::new(),
            blimps: Vec::new(),
            wind,
            bounds,
            lines: DistanceLines::new(),
            seed_requested: false,
            status: Status::Running,
        };

        let initial_clouds = rng.gen_range(game.config.min_clouds..=game.config.max_clouds);
        for _ in 0..initial_clouds {
            let position = random_position_in_bound(
                rng,
                Vec2::new(0.0, game.config.scatter_floor()),
                Vec2::new(game.config.width, game.config.height),
            );
            let cloud = game.make_cloud(rng, position);
            game.insert_cloud(cloud);
        }

        mixer.play(game.wind.id(), Cue::Wind, Playback::Looping);
        info!(
            "round started: {} ponds, {} clouds, fuel {}",
            game.ponds.len(),
            game.clouds.len(),
            game.helicopter.fuel()
        );
        game
    }

    fn make_cloud(&mut self, rng: &mut impl Rng, position: Vec2) -> Cloud {
        let major = random_in_range(rng, self.config.cloud_major_radius.min, self.config.cloud_major_radius.max);
        let minor = random_in_range(rng, self.config.cloud_minor_radius.min, self.config.cloud_minor_radius.max);
        let offset = random_in_range(rng, 0.0, self.config.wind_std_dev);
        Cloud::new(self.ids.next_id(), position, major, minor, self.config.wind_mean, offset)
    }

    /// Allocates an id for an entity built outside the game.
    pub fn next_id(&mut self) -> EntityId {
        self.ids.next_id()
    }

    /// Puts a cloud into play with its bound, its distance lines and its
    /// wind registration.
    pub fn insert_cloud(&mut self, cloud: Cloud) {
        let id = cloud.id();
        self.bounds.add(Bound::new(
            id,
            cloud.position(),
            Shape::Rect {
                width: cloud.width(),
                height: cloud.height(),
            },
        ));
        for pond in &self.ponds {
            self.lines.connect(pond.id(), pond.position(), id, cloud.position());
        }
        self.wind.add_observer(id);
        self.clouds.push(cloud);
    }

    pub fn insert_blimp(&mut self, blimp: Blimp) {
        self.bounds.add(Bound::new(
            blimp.id(),
            blimp.position(),
            Shape::Rect {
                width: blimp.body().x,
                height: blimp.body().y,
            },
        ));
        self.blimps.push(blimp);
    }

    // ── Commands ─────────────────────────────────────────────────────────────

    pub fn apply(&mut self, command: Command, rng: &mut impl Rng, mixer: &mut dyn Mixer) {
        match command {
            Command::Restart => {
                info!("round restarted");
                self.stop_all_audio(mixer);
                *self = Self::build(self.config.clone(), rng, mixer);
                return;
            }
            Command::ToggleBounds => {
                self.bounds.toggle_visibility();
                return;
            }
            Command::ToggleDistanceLines => {
                self.lines.toggle_visibility();
                return;
            }
            _ => {}
        }

        if self.status != Status::Running {
            return;
        }
        match command {
            Command::TurnLeft => self.helicopter.turn_left(),
            Command::TurnRight => self.helicopter.turn_right(),
            Command::IncreaseSpeed => self.helicopter.increase_speed(),
            Command::DecreaseSpeed => self.helicopter.decrease_speed(),
            Command::Seed => self.seed_requested = true,
            Command::ToggleIgnition => {
                if self.helicopter.is_stationary() && self.is_helicopter_within_helipad() {
                    self.helicopter.toggle_ignition(mixer);
                }
            }
            Command::Restart | Command::ToggleBounds | Command::ToggleDistanceLines => {}
        }
    }

    /// Hands a finished round to `decide` and acts on the answer.
    /// Returns `None` while the round is still running.
    pub fn resolve(
        &mut self,
        decide: impl FnOnce(&RoundOutcome) -> Decision,
        rng: &mut impl Rng,
        mixer: &mut dyn Mixer,
    ) -> Option<Decision> {
        let Status::Concluded(outcome) = self.status else {
            return None;
        };
        let decision = decide(&outcome);
        match decision {
            Decision::Restart => *self = Self::build(self.config.clone(), rng, mixer),
            Decision::Quit => self.status = Status::Quit,
        }
        Some(decision)
    }

    // ── Frame ────────────────────────────────────────────────────────────────

    /// Advances one frame. `now` is any monotonic timestamp; only the
    /// difference between calls matters. Returns the outcome on the frame
    /// a round ends.
    pub fn tick(&mut self, now: Duration, rng: &mut impl Rng, mixer: &mut dyn Mixer) -> Option<RoundOutcome> {
        if self.status != Status::Running {
            return None;
        }

        let delta = self.clock.delta(now);
        self.timers.advance(delta);

        self.mark_dead_for_deletion();
        self.update_game_objects(mixer);
        self.update_wind(rng);
        self.try_spawning_blimp(rng);
        self.refuel_if_near_blimp(mixer);
        self.seed_if_near_cloud(mixer);
        self.fill_ponds_with_rain(rng, mixer);
        self.try_respawning_clouds(rng);

        let outcome = judge_round(
            self.ponds.total_capacity(),
            &self.helicopter,
            self.is_helicopter_within_helipad(),
            self.config.win_capacity,
        )?;
        info!("round over: {outcome:?}");
        self.stop_all_audio(mixer);
        self.status = Status::Concluded(outcome);
        Some(outcome)
    }

    fn mark_dead_for_deletion(&mut self) {
        for cloud in self.clouds.iter().filter(|c| c.is_dead()) {
            self.bounds.mark_for_deletion(cloud.id());
            self.lines.mark_cloud_for_deletion(cloud.id());
        }
        for blimp in self.blimps.iter().filter(|b| b.is_dead()) {
            self.bounds.mark_for_deletion(blimp.id());
        }
    }

    fn update_game_objects(&mut self, mixer: &mut dyn Mixer) {
        let width = self.config.width;

        let mut dead_blimps = Vec::new();
        for blimp in &mut self.blimps {
            if blimp.is_dead() {
                dead_blimps.push(blimp.id());
            } else {
                blimp.update(width, mixer);
            }
        }
        self.blimps.retain(|b| !dead_blimps.contains(&b.id()));

        self.helicopter.update(mixer);

        let mut dead_clouds = Vec::new();
        for cloud in &mut self.clouds {
            if cloud.is_dead() {
                dead_clouds.push(cloud.id());
            } else {
                cloud.update(width, mixer);
            }
        }
        for id in &dead_clouds {
            self.wind.remove_observer(*id);
        }
        self.clouds.retain(|c| !dead_clouds.contains(&c.id()));

        let (helicopter, helipad, clouds, blimps) = (&self.helicopter, &self.helipad, &self.clouds, &self.blimps);
        let find = |id| locate(helicopter, helipad, clouds, blimps, id);
        self.bounds.update(find);
        self.lines.update(find);
    }

    fn update_wind(&mut self, rng: &mut impl Rng) {
        if self.timers.since_wind >= self.config.wind_interval {
            self.wind.gust(rng, &mut self.clouds);
            self.timers.since_wind = 0.0;
        }
    }

    fn try_spawning_blimp(&mut self, rng: &mut impl Rng) {
        if self.timers.since_blimp_try < self.config.blimp_spawn_interval {
            return;
        }
        if check_probability(rng, self.config.blimp_spawn_chance) {
            let blimp = Blimp::spawn(rng, &self.config, &mut self.ids);
            info!("blimp {} spawned carrying {:.0} fuel", blimp.id(), blimp.fuel());
            self.insert_blimp(blimp);
        }
        self.timers.since_blimp_try = 0.0;
    }

    fn refuel_if_near_blimp(&mut self, mixer: &mut dyn Mixer) {
        let Some(heli_bound) = self.bounds.bound_for(self.helicopter.id()).copied() else {
            return;
        };
        for blimp in &mut self.blimps {
            let Some(blimp_bound) = self.bounds.bound_for(blimp.id()) else {
                continue;
            };
            let colliding = heli_bound.collides_with(blimp_bound);
            let matching = (self.helicopter.speed() - blimp.speed()).abs() < self.config.refuel_speed_margin;
            if !(colliding && matching) {
                continue;
            }

            let extracted = blimp.extract_fuel(self.config.refuel_rate);
            self.helicopter.refuel_by(extracted);
            if extracted > 0.0 {
                debug!("refuelled {extracted:.0} from blimp {}", blimp.id());
                if !mixer.is_playing(self.helicopter.id(), Cue::Refueling) {
                    mixer.play(self.helicopter.id(), Cue::Refueling, Playback::Once);
                }
            }
        }
    }

    fn seed_if_near_cloud(&mut self, mixer: &mut dyn Mixer) {
        if self.seed_requested {
            if let Some(heli_bound) = self.bounds.bound_for(self.helicopter.id()).copied() {
                for cloud in &mut self.clouds {
                    let touching = self
                        .bounds
                        .bound_for(cloud.id())
                        .is_some_and(|b| heli_bound.collides_with(b));
                    if touching {
                        cloud.seed();
                        mixer.play(self.helicopter.id(), Cue::Seeding, Playback::Once);
                    }
                }
            }
        }
        self.seed_requested = false;
    }

    fn fill_ponds_with_rain(&mut self, rng: &mut impl Rng, mixer: &mut dyn Mixer) {
        if self.timers.since_rain < self.config.rain_interval {
            return;
        }
        for line in self.lines.iter() {
            let Some(pond) = self.ponds.get_mut(line.pond()) else {
                panic!("distance line {} -> {} does not start at a pond", line.pond(), line.cloud());
            };
            let Some(cloud) = self.clouds.iter_mut().find(|c| c.id() == line.cloud()) else {
                panic!("distance line {} -> {} does not end at a cloud", line.pond(), line.cloud());
            };
            let Some(multiplier) =
                rain_fill_multiplier(line.distance(), pond.max_radius(), self.config.rain_range_multiplier)
            else {
                continue;
            };
            if cloud.try_to_rain(rng, mixer, &self.config) {
                pond.fill_by_increment(multiplier);
                trace!("cloud {} rained x{multiplier:.2} on pond {}", cloud.id(), pond.id());
            }
        }
        self.timers.since_rain = 0.0;
    }

    fn try_respawning_clouds(&mut self, rng: &mut impl Rng) {
        let count = self.clouds.len();
        let wanted = count < self.config.min_clouds
            || (count < self.config.max_clouds && check_probability(rng, self.config.cloud_respawn_chance));
        if !wanted {
            return;
        }
        let x = -self.config.cloud_major_radius.max * 2.0;
        let position = random_position_in_bound(
            rng,
            Vec2::new(x, self.config.scatter_floor()),
            Vec2::new(x, self.config.height),
        );
        let cloud = self.make_cloud(rng, position);
        debug!("cloud {} respawned at y {:.0}", cloud.id(), position.y);
        self.insert_cloud(cloud);
    }

    fn stop_all_audio(&self, mixer: &mut dyn Mixer) {
        mixer.stop(self.wind.id(), Cue::Wind);
        self.helicopter.stop_audio(mixer);
        for blimp in &self.blimps {
            blimp.stop_audio(mixer);
        }
        for cloud in &self.clouds {
            cloud.stop_audio(mixer);
        }
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn is_helicopter_within_helipad(&self) -> bool {
        match (
            self.bounds.bound_for(self.helicopter.id()),
            self.bounds.bound_for(self.helipad.id()),
        ) {
            (Some(heli), Some(pad)) => heli.contained_in(pad),
            _ => false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn helicopter(&self) -> &Helicopter {
        &self.helicopter
    }

    pub fn helipad(&self) -> &Helipad {
        &self.helipad
    }

    pub fn ponds(&self) -> &Ponds {
        &self.ponds
    }

    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    pub fn blimps(&self) -> &[Blimp] {
        &self.blimps
    }

    pub fn wind(&self) -> &Wind {
        &self.wind
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn lines(&self) -> &DistanceLines {
        &self.lines
    }
}

fn locate(helicopter: &Helicopter, helipad: &Helipad, clouds: &[Cloud], blimps: &[Blimp], id: EntityId) -> Option<Vec2> {
    if id == helicopter.id() {
        return Some(helicopter.position());
    }
    if id == helipad.id() {
        return Some(helipad.position());
    }
    clouds
        .iter()
        .find(|c| c.id() == id)
        .map(GameObject::position)
        .or_else(|| blimps.iter().find(|b| b.id() == id).map(GameObject::position))
}
