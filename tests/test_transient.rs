use rainmaker::audio::{Cue, Silence, SoundLog};
use rainmaker::blimp::{Blimp, BlimpState};
use rainmaker::entity::{EntityId, GameObject};
use rainmaker::geometry::Vec2;
use rainmaker::transient::{Drift, TransientState};

const WIDTH: f64 = 800.0;

// ── Drift ─────────────────────────────────────────────────────────────────────

#[test]
fn drift_starts_created() {
    let d = Drift::new(Vec2::new(-50.0, 100.0), 1.0, 0.0, 10.0);
    assert_eq!(d.state(), TransientState::Created);
    assert!(!d.is_dead());
}

#[test]
fn drift_enters_view_once_leading_edge_crosses_zero() {
    let mut d = Drift::new(Vec2::new(-12.0, 0.0), 1.0, 0.0, 10.0);
    assert_eq!(d.advance(WIDTH), None); // -11 + 10 = -1
    assert_eq!(d.advance(WIDTH), None); // -10 + 10 = 0, not past the edge
    assert_eq!(d.advance(WIDTH), Some(TransientState::InView));
    assert_eq!(d.state(), TransientState::InView);
}

#[test]
fn drift_dies_once_trailing_edge_leaves() {
    let mut d = Drift::new(Vec2::new(808.0, 0.0), 1.0, 0.0, 10.0);
    assert_eq!(d.advance(WIDTH), Some(TransientState::InView));
    assert_eq!(d.advance(WIDTH), None); // 810 - 10 = 800, still on the field
    assert_eq!(d.advance(WIDTH), Some(TransientState::Dead));
    assert!(d.is_dead());
}

#[test]
fn dead_drift_ignores_everything() {
    let mut d = Drift::new(Vec2::new(900.0, 0.0), 1.0, 0.0, 10.0);
    d.advance(WIDTH);
    d.advance(WIDTH);
    assert!(d.is_dead());

    let x = d.position.x;
    assert_eq!(d.advance(WIDTH), None);
    assert_eq!(d.position.x, x);

    d.impart_speed(5.0);
    assert_eq!(d.speed(), 0.0);
}

#[test]
fn imparted_speed_includes_offset() {
    let mut d = Drift::new(Vec2::default(), 0.0, 0.25, 10.0);
    d.impart_speed(1.0);
    assert_eq!(d.speed(), 1.25);
    assert_eq!(d.speed_offset(), 0.25);
}

// ── Blimp lifecycle ───────────────────────────────────────────────────────────

fn blimp_at(x: f64, fuel: f64) -> Blimp {
    Blimp::new(EntityId(1), Vec2::new(x, 400.0), 1.0, 0.0, fuel, Vec2::new(200.0, 68.0))
}

#[test]
fn blimp_uses_half_its_body_as_edge() {
    let mut blimp = blimp_at(-101.0, 100.0);
    blimp.update(WIDTH, &mut Silence);
    assert_eq!(blimp.position().x, -100.0);
    assert_eq!(blimp.state(), BlimpState::Created { fuel: 100.0 });

    blimp.update(WIDTH, &mut Silence);
    assert_eq!(blimp.state(), BlimpState::InView { fuel: 100.0 });
}

#[test]
fn blimp_engine_loops_only_while_in_view() {
    let mut sound = SoundLog::new();
    let mut blimp = blimp_at(-100.0, 100.0);
    blimp.update(WIDTH, &mut sound);
    assert_eq!(sound.played(Cue::BlimpEngine), 1);
    assert_eq!(sound.active_loops(), 1);

    let mut far = Blimp::new(EntityId(2), Vec2::new(899.0, 400.0), 1.0, 0.0, 100.0, Vec2::new(200.0, 68.0));
    far.update(WIDTH, &mut sound);
    far.update(WIDTH, &mut sound);
    assert!(far.is_dead());
    assert_eq!(sound.active_loops(), 1); // only the first blimp is still humming
}

#[test]
fn blimp_gives_fuel_in_rate_sized_chunks() {
    let mut blimp = blimp_at(0.0, 100.0);
    blimp.update(WIDTH, &mut Silence);

    let taken: Vec<f64> = (0..5).map(|_| blimp.extract_fuel(30.0)).collect();
    assert_eq!(taken, vec![30.0, 30.0, 30.0, 10.0, 0.0]);
    assert_eq!(blimp.fuel(), 0.0);
}

#[test]
fn blimp_gives_nothing_outside_view() {
    let mut blimp = blimp_at(-500.0, 100.0);
    assert_eq!(blimp.extract_fuel(30.0), 0.0);
    assert_eq!(blimp.fuel(), 100.0);
}

#[test]
fn dead_blimp_has_no_fuel_or_speed() {
    let mut blimp = blimp_at(899.0, 100.0);
    blimp.update(WIDTH, &mut Silence);
    blimp.update(WIDTH, &mut Silence);
    assert!(blimp.is_dead());
    assert_eq!(blimp.fuel(), 0.0);
    assert_eq!(blimp.speed(), 0.0);
    assert_eq!(blimp.extract_fuel(30.0), 0.0);
}
