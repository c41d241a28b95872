// demos/head_on.rs
//
// Two bodies fly at each other inside a field of smaller ones. Run with
// `RUST_LOG=debug cargo run --example head_on` to see every frame.

use log::info;
use rs_nbody::apis::{random_bodies, LogSink};
use rs_nbody::models::{Body, Color};
use rs_nbody::simulation::NBodySystem;
use rs_nbody::utils::{PhysicsError, SimulationConfig};

fn main() -> Result<(), PhysicsError> {
    env_logger::init();

    let config = SimulationConfig { gravitational_constant: 1e-5, softening: 1e-3, ..Default::default() };
    let mut bodies = vec![
        Body::new(0.3, 0.5, 0.1, 0.0, 5.0, 0.04, Color::new(200, 30, 30))?,
        Body::new(0.7, 0.5, -0.1, 0.0, 5.0, 0.04, Color::new(30, 30, 200))?,
    ];
    let field: Vec<Body> = random_bodies(60, &config, 7)?
        .into_iter()
        .filter(|b| bodies.iter().all(|big| big.distance_to(b) > big.radius() + b.radius()))
        .collect();
    bodies.extend(field);

    let mut system = NBodySystem::new(bodies, config)?;
    let mut sink = LogSink::new();

    println!("Initial energy: {:.6e}, momentum: {:?}", system.kinetic_energy(), system.total_momentum());
    for _ in 0..50 {
        let report = system.step(&mut sink)?;
        info!(
            "t = {:.3}: {} pair and {} wall collisions, {} stale events",
            report.time, report.engine.pair_collisions, report.engine.wall_collisions, report.engine.stale
        );
    }
    println!("After {} steps (t = {:.3}):", system.steps(), system.time());
    for body in &system.bodies()[..2] {
        println!("{}", body);
    }
    println!("Final energy: {:.6e}, momentum: {:?}", system.kinetic_energy(), system.total_momentum());
    println!("Frames rendered: {}", sink.frames());

    Ok(())
}
