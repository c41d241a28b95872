use approx::assert_relative_eq;

use crate::apis::{random_bodies, BodyRecord, FrameRecorder, NullSink};
use crate::models::{Body, Color};
use crate::simulation::{NBodySystem, MAX_TICK_SCALE};
use crate::tree::BarnesHutTree;
use crate::utils::{PhysicsError, SimulationConfig};

fn body(rx: f64, ry: f64, vx: f64, vy: f64, mass: f64, radius: f64) -> Body {
    Body::new(rx, ry, vx, vy, mass, radius, Color::BLACK).expect("valid body")
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn no_gravity() -> SimulationConfig {
    SimulationConfig { gravitational_constant: 0.0, ..Default::default() }
}

fn run_until(system: &mut NBodySystem, time: f64, sink: &mut FrameRecorder) {
    while system.time() < time {
        system.step(sink).unwrap();
    }
}

#[test]
fn test_rejects_invalid_configuration() {
    let config = SimulationConfig { arena_side: 0.0, ..Default::default() };
    assert_eq!(NBodySystem::new(vec![], config).err(), Some(PhysicsError::InvalidArena));

    let config = SimulationConfig { theta: -1.0, ..Default::default() };
    assert_eq!(NBodySystem::new(vec![], config).err(), Some(PhysicsError::InvalidTheta));
}

#[test]
fn test_initial_step_control() {
    let bodies = vec![body(0.3, 0.5, 0.1, 0.0, 1.0, 0.02), body(0.7, 0.5, -0.1, 0.0, 1.0, 0.02)];
    let system = NBodySystem::new(bodies, no_gravity()).unwrap();
    // radius / speed = 0.2, which equals the ceiling.
    assert_relative_eq!(system.dt(), 0.16, epsilon = 1e-15);
    assert_relative_eq!(system.hz(), 1.0 / (0.8 * 0.16), epsilon = 1e-12);
    assert_eq!(system.time(), 0.0);
    assert_eq!(system.steps(), 0);
}

#[test]
fn test_head_on_pair_collides_and_swaps_velocities() {
    init_logger();
    let r = 0.02;
    let bodies = vec![body(0.3, 0.5, 0.1, 0.0, 1.0, r), body(0.7, 0.5, -0.1, 0.0, 1.0, r)];
    let mut system = NBodySystem::new(bodies, no_gravity()).unwrap();
    let contact = (0.4 - 2.0 * r) / 0.2;

    let mut frames = FrameRecorder::new();
    run_until(&mut system, 3.0, &mut frames);

    let [a, b] = system.bodies() else { panic!("two bodies expected") };
    assert_relative_eq!(a.vx, -0.1, epsilon = 1e-12);
    assert_relative_eq!(b.vx, 0.1, epsilon = 1e-12);
    assert_eq!(a.count(), 1);
    assert_eq!(b.count(), 1);

    // Straight lines in, straight lines out, meeting at `contact`.
    let t = system.time();
    assert_relative_eq!(a.rx, 0.3 + 0.1 * contact - 0.1 * (t - contact), epsilon = 1e-9);
    assert_relative_eq!(b.rx, 0.7 - 0.1 * contact + 0.1 * (t - contact), epsilon = 1e-9);
    assert_relative_eq!(a.ry, 0.5, epsilon = 1e-12);

    let before = frames.frames.iter().filter(|f| f.bodies[0].vx > 0.0).map(|f| f.time).fold(0.0, f64::max);
    let after = frames.frames.iter().filter(|f| f.bodies[0].vx < 0.0).map(|f| f.time).fold(f64::INFINITY, f64::min);
    assert!(before <= contact && contact <= after);

    let (px, py) = system.total_momentum();
    assert_relative_eq!(px, 0.0, epsilon = 1e-12);
    assert_relative_eq!(py, 0.0, epsilon = 1e-12);
}

#[test]
fn test_single_body_reflects_off_nearer_wall() {
    let bodies = vec![body(0.4, 0.5, 0.25, 0.05, 1.0, 0.05)];
    let mut system = NBodySystem::new(bodies, no_gravity()).unwrap();
    // Right wall after (0.95 - 0.4) / 0.25, top wall only after (0.95 - 0.5) / 0.05.
    let contact = 2.2;

    let mut frames = FrameRecorder::new();
    run_until(&mut system, 3.0, &mut frames);

    let b = &system.bodies()[0];
    let t = system.time();
    assert_eq!(b.count(), 1);
    assert_relative_eq!(b.vx, -0.25, epsilon = 1e-12);
    assert_relative_eq!(b.vy, 0.05, epsilon = 1e-12);
    assert_relative_eq!(b.rx, 0.95 - 0.25 * (t - contact), epsilon = 1e-9);
    assert_relative_eq!(b.ry, 0.5 + 0.05 * t, epsilon = 1e-9);
    assert_relative_eq!(system.kinetic_energy(), 0.5 * (0.25f64.powi(2) + 0.05f64.powi(2)), epsilon = 1e-12);
}

#[test]
fn test_ticks_are_absolute_and_ordered() {
    let bodies = vec![body(0.5, 0.5, 0.05, 0.02, 1.0, 0.01)];
    let mut system = NBodySystem::new(bodies, no_gravity()).unwrap();
    let mut frames = FrameRecorder::new();
    system.run(4, &mut frames).unwrap();

    let times = frames.times();
    assert_eq!(times[0], 0.0);
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(times.last().copied(), Some(system.time()));
    assert_eq!(system.steps(), 4);

    // Each boundary between two steps is seen twice.
    let repeated = times.windows(2).filter(|w| w[0] == w[1]).count();
    assert_eq!(repeated, 3);
}

#[test]
fn test_empty_system_only_advances_time() {
    let mut system = NBodySystem::new(vec![], SimulationConfig::default()).unwrap();
    let report = system.step(&mut NullSink).unwrap();
    assert_eq!(report.tree_bodies, 0);
    assert_eq!(report.engine.pair_collisions + report.engine.wall_collisions, 0);
    assert_relative_eq!(system.time(), 0.16, epsilon = 1e-15);
}

#[test]
fn test_gravity_pulls_pair_together() {
    let config = SimulationConfig { gravitational_constant: 1.0, softening: 0.01, ..Default::default() };
    let bodies = vec![body(0.25, 0.5, 0.0, 0.0, 1.0, 0.01), body(0.75, 0.5, 0.0, 0.0, 1.0, 0.01)];
    let mut system = NBodySystem::new(bodies, config).unwrap();
    system.step(&mut NullSink).unwrap();

    let [a, b] = system.bodies() else { panic!("two bodies expected") };
    let accel = 1.0 / (0.25 + 0.0001);
    assert_relative_eq!(a.fx, accel, epsilon = 1e-9);
    assert_relative_eq!(a.vx, accel * 0.16, epsilon = 1e-9);
    assert_relative_eq!(b.vx, -accel * 0.16, epsilon = 1e-9);
    assert_relative_eq!(system.total_momentum().0, 0.0, epsilon = 1e-12);
    // Faster bodies shorten the next step.
    assert!(system.dt() < 0.16);
}

#[test]
fn test_bodies_outside_root_feel_but_do_not_pull() {
    init_logger();
    let config = SimulationConfig {
        gravitational_constant: 1.0,
        softening: 0.01,
        root_scale: 1.0,
        ..Default::default()
    };
    let bodies = vec![
        body(0.25, 0.5, 0.0, 0.0, 1.0, 0.01),
        body(0.75, 0.5, 0.0, 0.0, 1.0, 0.01),
        body(1.5, 0.5, 0.0, 0.0, 100.0, 0.01),
    ];
    let mut system = NBodySystem::new(bodies, config).unwrap();
    let report = system.step(&mut NullSink).unwrap();
    assert_eq!(report.tree_bodies, 2);

    let bodies = system.bodies();
    assert!(bodies[0].vx > 0.0);
    assert_relative_eq!(bodies[0].vx, -bodies[1].vx, epsilon = 1e-12);
    assert!(bodies[2].vx < 0.0);
}

#[test]
fn test_step_forces_match_tree() {
    let config = SimulationConfig { gravitational_constant: 1e-3, softening: 1e-2, ..Default::default() };
    let bodies = random_bodies(30, &config, 11).unwrap();
    let tree = BarnesHutTree::build(&bodies, config.root_quadrant().unwrap(), config.theta);
    let law = config.force_law();
    let expected: Vec<(f64, f64)> =
        bodies.iter().enumerate().map(|(i, b)| tree.compute_force(i, b, &law)).collect();

    let mut system = NBodySystem::new(bodies, config).unwrap();
    system.step(&mut NullSink).unwrap();
    for (b, (fx, fy)) in system.bodies().iter().zip(expected) {
        assert_relative_eq!(b.fx, fx, epsilon = 1e-15);
        assert_relative_eq!(b.fy, fy, epsilon = 1e-15);
    }
}

#[test]
fn test_from_records_applies_default_color() {
    let config = SimulationConfig { default_color: Color::new(10, 20, 30), ..no_gravity() };
    let records = vec![
        BodyRecord { position: (0.2, 0.2), velocity: (0.0, 0.0), radius: 0.05, mass: 1.0, color: None },
        BodyRecord {
            position: (0.8, 0.8),
            velocity: (0.0, 0.0),
            radius: 0.05,
            mass: 1.0,
            color: Some(Color::new(255, 0, 0)),
        },
    ];
    let system = NBodySystem::from_records(records, config).unwrap();
    assert_eq!(system.bodies()[0].color(), Color::new(10, 20, 30));
    assert_eq!(system.bodies()[1].color(), Color::new(255, 0, 0));

    let bad = vec![BodyRecord { position: (0.2, 0.2), velocity: (0.0, 0.0), radius: 0.05, mass: 0.0, color: None }];
    assert_eq!(NBodySystem::from_records(bad, config).err(), Some(PhysicsError::InvalidMass));
}

#[test]
fn test_tick_scale_clamped_once_at_construction() {
    let config = SimulationConfig { tick_scale: 1.5, ..no_gravity() };
    let bodies = vec![body(0.5, 0.5, 0.1, 0.0, 1.0, 0.02)];
    let mut system = NBodySystem::new(bodies, config).unwrap();
    assert_eq!(system.config().tick_scale, MAX_TICK_SCALE);
    assert_relative_eq!(system.hz(), 1.0 / (MAX_TICK_SCALE * system.dt()), epsilon = 1e-9);

    system.step(&mut NullSink).unwrap();
    assert_relative_eq!(system.hz(), 1.0 / (MAX_TICK_SCALE * system.dt()), epsilon = 1e-9);
}

#[test]
fn test_overflowing_gravity_still_finishes_steps() {
    init_logger();
    let config = SimulationConfig { gravitational_constant: 1e300, softening: 0.0, ..Default::default() };
    assert!(config.validate().is_ok());
    let bodies = vec![body(0.25, 0.5, 0.0, 0.0, 1e10, 0.01), body(0.75, 0.5, 0.0, 0.0, 1e10, 0.01)];
    let mut system = NBodySystem::new(bodies, config).unwrap();

    let report = system.step(&mut NullSink).unwrap();
    assert_eq!(report.engine.pair_collisions + report.engine.wall_collisions, 0);
    assert!(system.bodies().iter().all(|b| !b.is_finite()));
    assert!(system.dt().is_finite() && system.dt() > 0.0);

    system.step(&mut NullSink).unwrap();
    assert_eq!(system.steps(), 2);
}
