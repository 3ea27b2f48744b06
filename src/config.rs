//! Every tunable number of a round, gathered in one struct.

use thiserror::Error;

use crate::geometry::Vec2;

/// A closed numeric range used for randomised spawn parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("playfield must have a positive size, got {width}x{height}")]
    EmptyPlayfield { width: f64, height: f64 },
    #[error("at least one pond is required")]
    NoPonds,
    #[error("{field}: min {min} is greater than max {max}")]
    InvertedRange { field: &'static str, min: f64, max: f64 },
    #[error("{field}: probability {value} is outside [0, 1]")]
    Probability { field: &'static str, value: f64 },
    #[error("{field}: must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field}: must be zero or more, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("min_clouds ({min}) exceeds max_clouds ({max})")]
    CloudCount { min: usize, max: usize },
    #[error("saturation threshold {0} is above 100")]
    SaturationThreshold(u8),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    // ── Playfield ────────────────────────────────────────────────────────────
    pub width: f64,
    pub height: f64,

    // ── Ponds ────────────────────────────────────────────────────────────────
    pub pond_count: usize,
    pub pond_min_radius: f64,
    pub pond_max_radius: f64,
    pub pond_max_starting_radius: f64,
    /// Sum of every pond's fill fraction needed to win.
    pub win_capacity: f64,

    // ── Clouds ───────────────────────────────────────────────────────────────
    pub min_clouds: usize,
    pub max_clouds: usize,
    pub cloud_major_radius: Span,
    pub cloud_minor_radius: Span,
    /// Chance per tick of topping up clouds while between min and max.
    pub cloud_respawn_chance: f64,
    /// Seconds between rain-fill passes.
    pub rain_interval: f64,
    pub min_saturation_to_rain: u8,
    /// Pond diameters a cloud can be away and still fill it.
    pub rain_range_multiplier: f64,
    /// Chance per successful rain of a thunder clap.
    pub thunder_chance: f64,

    // ── Wind ─────────────────────────────────────────────────────────────────
    pub wind_mean: f64,
    pub wind_std_dev: f64,
    pub wind_interval: f64,

    // ── Helipad ──────────────────────────────────────────────────────────────
    pub helipad_size: Vec2,
    pub helipad_position: Vec2,

    // ── Blimps ───────────────────────────────────────────────────────────────
    pub blimp_body: Vec2,
    pub refuel_rate: f64,
    pub refuel_speed_margin: f64,
    pub blimp_speed: Span,
    pub blimp_speed_offset: Span,
    pub blimp_fuel: Span,
    pub blimp_spawn_interval: f64,
    pub blimp_spawn_chance: f64,

    // ── Helicopter ───────────────────────────────────────────────────────────
    pub heli_min_speed: f64,
    pub heli_max_speed: f64,
    pub heli_speed_step: f64,
    pub heli_heading_step: f64,
    pub rotor_length: f64,
    pub rotor_max_speed: f64,
    pub rotor_acceleration: f64,
    pub starting_fuel: f64,
    pub base_fuel_consumption: f64,
    pub effectively_zero: f64,
}

impl Default for Config {
    fn default() -> Self {
        let width = 800.0;
        let height = 800.0;
        let helipad_size = Vec2::new(100.0, 100.0);
        Self {
            width,
            height,

            pond_count: 3,
            pond_min_radius: 5.0,
            pond_max_radius: 50.0,
            pond_max_starting_radius: 15.0,
            win_capacity: 0.8,

            min_clouds: 3,
            max_clouds: 5,
            cloud_major_radius: Span::new(60.0, 100.0),
            cloud_minor_radius: Span::new(40.0, 60.0),
            cloud_respawn_chance: 0.5,
            rain_interval: 0.6,
            min_saturation_to_rain: 30,
            rain_range_multiplier: 4.0,
            thunder_chance: 0.01,

            wind_mean: 0.4,
            wind_std_dev: 0.15,
            wind_interval: 5.0,

            helipad_size,
            helipad_position: Vec2::new(width / 2.0, height / 25.0 + helipad_size.y / 2.0),

            blimp_body: Vec2::new(200.0, 68.0),
            refuel_rate: 30.0,
            refuel_speed_margin: 0.1,
            blimp_speed: Span::new(0.7, 1.0),
            blimp_speed_offset: Span::new(0.2, 0.4),
            blimp_fuel: Span::new(5000.0, 10000.0),
            blimp_spawn_interval: 5.0,
            blimp_spawn_chance: 0.18,

            heli_min_speed: -2.0,
            heli_max_speed: 10.0,
            heli_speed_step: 0.1,
            heli_heading_step: 15.0,
            rotor_length: 80.0,
            rotor_max_speed: 15.0,
            rotor_acceleration: 0.075,
            starting_fuel: 25000.0,
            base_fuel_consumption: 5.0,
            effectively_zero: 1e-3,
        }
    }
}

impl Config {
    /// Lowest y at which ponds and clouds are scattered.
    pub fn scatter_floor(&self) -> f64 {
        self.height * 0.33
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(ConfigError::EmptyPlayfield {
                width: self.width,
                height: self.height,
            });
        }
        if self.pond_count == 0 {
            return Err(ConfigError::NoPonds);
        }
        if self.min_clouds > self.max_clouds {
            return Err(ConfigError::CloudCount {
                min: self.min_clouds,
                max: self.max_clouds,
            });
        }
        if self.min_saturation_to_rain > 100 {
            return Err(ConfigError::SaturationThreshold(self.min_saturation_to_rain));
        }

        let ranges = [
            ("pond radius", Span::new(self.pond_min_radius, self.pond_max_starting_radius)),
            ("pond starting radius", Span::new(self.pond_max_starting_radius, self.pond_max_radius)),
            ("cloud_major_radius", self.cloud_major_radius),
            ("cloud_minor_radius", self.cloud_minor_radius),
            ("blimp_speed", self.blimp_speed),
            ("blimp_speed_offset", self.blimp_speed_offset),
            ("blimp_fuel", self.blimp_fuel),
            ("heli speed", Span::new(self.heli_min_speed, self.heli_max_speed)),
        ];
        for (field, span) in ranges {
            if span.min > span.max {
                return Err(ConfigError::InvertedRange {
                    field,
                    min: span.min,
                    max: span.max,
                });
            }
        }

        let probabilities = [
            ("cloud_respawn_chance", self.cloud_respawn_chance),
            ("thunder_chance", self.thunder_chance),
            ("blimp_spawn_chance", self.blimp_spawn_chance),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Probability { field, value });
            }
        }

        let positives = [
            ("pond_max_radius", self.pond_max_radius),
            ("rain_interval", self.rain_interval),
            ("rain_range_multiplier", self.rain_range_multiplier),
            ("wind_interval", self.wind_interval),
            ("blimp_spawn_interval", self.blimp_spawn_interval),
            ("rotor_max_speed", self.rotor_max_speed),
            ("rotor_acceleration", self.rotor_acceleration),
            ("starting_fuel", self.starting_fuel),
            ("refuel_rate", self.refuel_rate),
            ("heli_speed_step", self.heli_speed_step),
            ("heli_heading_step", self.heli_heading_step),
            ("effectively_zero", self.effectively_zero),
        ];
        for (field, value) in positives {
            // NaN fails both comparisons, so test for the good case.
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let non_negatives = [
            ("win_capacity", self.win_capacity),
            ("wind_std_dev", self.wind_std_dev),
            ("base_fuel_consumption", self.base_fuel_consumption),
            ("refuel_speed_margin", self.refuel_speed_margin),
        ];
        for (field, value) in non_negatives {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }

        Ok(())
    }
}
