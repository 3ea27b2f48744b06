use rainmaker::audio::{Cue, Silence, SoundLog};
use rainmaker::cloud::{Cloud, CloudState, Rgb, FULL_SATURATION};
use rainmaker::config::Config;
use rainmaker::entity::EntityId;
use rainmaker::geometry::Vec2;

use rand::rngs::StdRng;
use rand::SeedableRng;

const WIDTH: f64 = 800.0;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn cloud_in_view() -> Cloud {
    let mut cloud = Cloud::new(EntityId(7), Vec2::new(400.0, 500.0), 60.0, 40.0, 0.0, 0.0);
    cloud.update(WIDTH, &mut Silence);
    assert_eq!(cloud.state(), CloudState::InView);
    cloud
}

fn seeded_to(level: u8) -> Cloud {
    let mut cloud = cloud_in_view();
    for _ in 0..level {
        cloud.seed();
    }
    cloud
}

// ── Seeding ───────────────────────────────────────────────────────────────────

#[test]
fn fresh_cloud_is_white_and_dry() {
    let cloud = Cloud::new(EntityId(1), Vec2::new(-200.0, 500.0), 80.0, 50.0, 0.4, 0.1);
    assert_eq!(cloud.state(), CloudState::Created);
    assert_eq!(cloud.seed_percentage(), 0);
    assert_eq!(cloud.color(), Rgb::WHITE);
    assert_eq!(cloud.width(), 160.0);
    assert_eq!(cloud.height(), 100.0);
}

#[test]
fn seeding_before_view_does_nothing() {
    let mut cloud = Cloud::new(EntityId(1), Vec2::new(-200.0, 500.0), 80.0, 50.0, 0.4, 0.1);
    cloud.seed();
    assert_eq!(cloud.seed_percentage(), 0);
}

#[test]
fn seeding_darkens_one_step() {
    let cloud = seeded_to(3);
    assert_eq!(cloud.seed_percentage(), 3);
    assert_eq!(cloud.color(), Rgb { r: 252, g: 252, b: 252 });
    assert_eq!(cloud.saturation_label(), "3%");
}

#[test]
fn seeding_caps_at_full() {
    let cloud = seeded_to(FULL_SATURATION + 5);
    assert_eq!(cloud.seed_percentage(), FULL_SATURATION);
}

// ── Rain ──────────────────────────────────────────────────────────────────────

#[test]
fn too_little_seed_means_no_rain() {
    let config = Config::default();
    let mut cloud = seeded_to(config.min_saturation_to_rain - 1);
    assert!(!cloud.try_to_rain(&mut seeded_rng(), &mut Silence, &config));
    assert_eq!(cloud.seed_percentage(), config.min_saturation_to_rain - 1);
}

#[test]
fn raining_spends_one_percent_and_lightens() {
    let config = Config::default();
    let mut cloud = seeded_to(30);
    let before = cloud.color();

    assert!(cloud.try_to_rain(&mut seeded_rng(), &mut Silence, &config));
    assert_eq!(cloud.seed_percentage(), 29);
    assert_eq!(cloud.color().r, before.r + 1);
}

#[test]
fn cloud_out_of_view_never_rains() {
    let config = Config::default();
    let mut cloud = Cloud::new(EntityId(1), Vec2::new(-500.0, 500.0), 80.0, 50.0, 0.0, 0.0);
    assert!(!cloud.try_to_rain(&mut seeded_rng(), &mut Silence, &config));
}

#[test]
fn rain_loop_starts_once_and_stops_when_spent() {
    let config = Config {
        thunder_chance: 0.0,
        ..Config::default()
    };
    let mut rng = seeded_rng();
    let mut sound = SoundLog::new();
    let mut cloud = seeded_to(31);

    assert!(cloud.try_to_rain(&mut rng, &mut sound, &config));
    assert!(cloud.try_to_rain(&mut rng, &mut sound, &config));
    assert_eq!(sound.played(Cue::Rain), 1);
    assert_eq!(sound.active_loops(), 1);

    // 29 now, below the threshold
    assert!(!cloud.try_to_rain(&mut rng, &mut sound, &config));
    assert_eq!(sound.active_loops(), 0);
    assert_eq!(sound.played(Cue::Thunder), 0);
}

#[test]
fn certain_thunder_plays_on_rain() {
    let config = Config {
        thunder_chance: 1.0,
        ..Config::default()
    };
    let mut sound = SoundLog::new();
    let mut cloud = seeded_to(40);
    cloud.try_to_rain(&mut seeded_rng(), &mut sound, &config);
    assert_eq!(sound.played(Cue::Thunder), 1);
}

#[test]
fn dying_cloud_silences_its_rain() {
    let config = Config::default();
    let mut sound = SoundLog::new();
    let mut cloud = Cloud::new(EntityId(3), Vec2::new(850.0, 500.0), 60.0, 40.0, 10.0, 0.0);
    cloud.update(WIDTH, &mut sound);
    for _ in 0..40 {
        cloud.seed();
    }
    cloud.try_to_rain(&mut seeded_rng(), &mut sound, &config);
    assert_eq!(sound.active_loops(), 1);

    cloud.update(WIDTH, &mut sound); // 870 - 60 > 800
    assert!(cloud.is_dead());
    assert_eq!(sound.active_loops(), 0);
    assert_eq!(cloud.speed(), 0.0);
}
