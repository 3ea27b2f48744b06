use rainmaker::config::{Config, ConfigError, Span};

#[test]
fn defaults_are_valid() {
    assert_eq!(Config::default().validate(), Ok(()));
}

#[test]
fn defaults_match_the_classic_round() {
    let c = Config::default();
    assert_eq!((c.width, c.height), (800.0, 800.0));
    assert_eq!(c.pond_count, 3);
    assert_eq!(c.win_capacity, 0.8);
    assert_eq!(c.min_saturation_to_rain, 30);
    assert_eq!(c.starting_fuel, 25000.0);
    assert_eq!(c.refuel_rate, 30.0);
    assert_eq!(c.helipad_position.x, 400.0);
    assert_eq!(c.scatter_floor(), 800.0 * 0.33);
}

#[test]
fn rejects_empty_playfield() {
    let c = Config {
        width: 0.0,
        ..Config::default()
    };
    assert!(matches!(c.validate(), Err(ConfigError::EmptyPlayfield { .. })));
}

#[test]
fn rejects_no_ponds() {
    let c = Config {
        pond_count: 0,
        ..Config::default()
    };
    assert_eq!(c.validate(), Err(ConfigError::NoPonds));
}

#[test]
fn rejects_inverted_range() {
    let c = Config {
        blimp_fuel: Span::new(10.0, 5.0),
        ..Config::default()
    };
    assert_eq!(
        c.validate(),
        Err(ConfigError::InvertedRange {
            field: "blimp_fuel",
            min: 10.0,
            max: 5.0
        })
    );
}

#[test]
fn rejects_bad_probability() {
    let c = Config {
        thunder_chance: 1.5,
        ..Config::default()
    };
    assert!(matches!(c.validate(), Err(ConfigError::Probability { field: "thunder_chance", .. })));
}

#[test]
fn rejects_cloud_counts_out_of_order() {
    let c = Config {
        min_clouds: 6,
        max_clouds: 5,
        ..Config::default()
    };
    assert_eq!(c.validate(), Err(ConfigError::CloudCount { min: 6, max: 5 }));
}

#[test]
fn rejects_non_positive_fuel() {
    let c = Config {
        starting_fuel: 0.0,
        ..Config::default()
    };
    assert!(matches!(c.validate(), Err(ConfigError::NotPositive { field: "starting_fuel", .. })));
}

#[test]
fn error_messages_name_the_field() {
    let err = ConfigError::Probability {
        field: "blimp_spawn_chance",
        value: -0.1,
    };
    assert_eq!(err.to_string(), "blimp_spawn_chance: probability -0.1 is outside [0, 1]");
}

#[test]
fn rejects_negative_or_nan_win_capacity() {
    for value in [-1.0, f64::NAN, f64::INFINITY] {
        let c = Config {
            win_capacity: value,
            ..Config::default()
        };
        assert!(
            matches!(c.validate(), Err(ConfigError::Negative { field: "win_capacity", .. })),
            "win_capacity {value} accepted"
        );
    }
}

#[test]
fn zero_win_capacity_is_allowed() {
    let c = Config {
        win_capacity: 0.0,
        ..Config::default()
    };
    assert_eq!(c.validate(), Ok(()));
}

#[test]
fn rejects_bad_control_steps() {
    let zero_step = Config {
        heli_speed_step: 0.0,
        ..Config::default()
    };
    assert!(matches!(zero_step.validate(), Err(ConfigError::NotPositive { field: "heli_speed_step", .. })));

    let nan_heading = Config {
        heli_heading_step: f64::NAN,
        ..Config::default()
    };
    assert!(matches!(nan_heading.validate(), Err(ConfigError::NotPositive { field: "heli_heading_step", .. })));

    let no_epsilon = Config {
        effectively_zero: -1e-3,
        ..Config::default()
    };
    assert!(matches!(no_epsilon.validate(), Err(ConfigError::NotPositive { field: "effectively_zero", .. })));
}

#[test]
fn rejects_negative_rates() {
    let burn = Config {
        base_fuel_consumption: -5.0,
        ..Config::default()
    };
    assert_eq!(
        burn.validate(),
        Err(ConfigError::Negative {
            field: "base_fuel_consumption",
            value: -5.0
        })
    );

    let margin = Config {
        refuel_speed_margin: -0.1,
        ..Config::default()
    };
    assert!(matches!(margin.validate(), Err(ConfigError::Negative { field: "refuel_speed_margin", .. })));
}
