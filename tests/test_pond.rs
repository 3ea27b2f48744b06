use std::f64::consts::PI;

use rainmaker::config::Config;
use rainmaker::entity::{EntityId, GameObject, IdAllocator};
use rainmaker::geometry::Vec2;
use rainmaker::pond::{Pond, Ponds};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn pond(radius: f64) -> Pond {
    Pond::new(EntityId(1), Vec2::new(300.0, 500.0), 50.0, radius)
}

#[test]
fn starting_radius_sets_percent() {
    let p = pond(15.0);
    assert_eq!(p.percent_full(), 9); // 225 / 2500
    assert_eq!(p.percent_label(), "9%");
    assert!((p.max_area() - PI * 2500.0).abs() < 1e-9);
}

#[test]
fn full_multiplier_adds_one_percent_of_max_area() {
    let mut p = pond(15.0);
    let before = p.current_area();
    p.fill_by_increment(1.0);
    assert!((p.current_area() - before - p.max_area() * 0.01).abs() < 1e-9);
    assert_eq!(p.percent_full(), 10);
    assert!((p.current_radius() - (p.current_area() / PI).sqrt()).abs() < 1e-9);
}

#[test]
fn partial_multiplier_scales_fill() {
    let mut p = pond(15.0);
    let before = p.current_area();
    p.fill_by_increment(0.5);
    assert!((p.current_area() - before - p.max_area() * 0.005).abs() < 1e-9);
}

#[test]
fn non_positive_multiplier_is_ignored() {
    let mut p = pond(15.0);
    let before = p.clone();
    p.fill_by_increment(0.0);
    p.fill_by_increment(-1.0);
    assert_eq!(p, before);
}

#[test]
fn pond_caps_at_full() {
    let mut p = pond(49.0);
    for _ in 0..20 {
        p.fill_by_increment(1.0);
    }
    assert_eq!(p.percent_full(), 100);
    assert_eq!(p.current_area(), p.max_area());
    assert!((p.current_radius() - 50.0).abs() < 1e-9);
}

#[test]
fn fill_never_shrinks() {
    let mut p = pond(5.0);
    let mut last = p.percent_full();
    for step in 0..150 {
        p.fill_by_increment(f64::from(step % 3) * 0.4);
        assert!(p.percent_full() >= last);
        last = p.percent_full();
    }
}

// ── Ponds ─────────────────────────────────────────────────────────────────────

#[test]
fn total_capacity_sums_fractions() {
    let mut ponds = Ponds::default();
    ponds.push(Pond::new(EntityId(1), Vec2::default(), 50.0, 50.0));
    ponds.push(Pond::new(EntityId(2), Vec2::default(), 50.0, 15.0));
    assert!((ponds.total_capacity() - 1.09).abs() < 1e-9);
}

#[test]
fn scatter_keeps_ponds_in_the_upper_field() {
    let config = Config::default();
    let mut rng = StdRng::seed_from_u64(42);
    let mut ids = IdAllocator::new();
    let ponds = Ponds::scatter(&mut rng, &config, &mut ids);

    assert_eq!(ponds.len(), config.pond_count);
    for p in &ponds {
        let at = p.position();
        assert!((0.0..config.width).contains(&at.x));
        assert!((config.scatter_floor()..config.height).contains(&at.y));
        assert!(p.current_radius() >= config.pond_min_radius);
        assert!(p.current_radius() <= config.pond_max_starting_radius);
        assert_eq!(p.max_radius(), config.pond_max_radius);
    }
}

#[test]
fn lookup_by_id() {
    let mut ponds = Ponds::default();
    ponds.push(pond(10.0));
    assert!(ponds.get(EntityId(1)).is_some());
    assert!(ponds.get(EntityId(2)).is_none());
    if let Some(p) = ponds.get_mut(EntityId(1)) {
        p.fill_by_increment(1.0);
    }
    assert_eq!(ponds.get(EntityId(1)).map(Pond::percent_full), Some(5));
}
