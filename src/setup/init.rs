use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::domain::types::{ProblemInstance, ServiceKind, World};
use crate::error::ConfigError;
use crate::solver::genetic::chromosome::Chromosome;

/// Validates the world and turns it into the read-only problem instance.
pub fn setup(world: World) -> Result<ProblemInstance, ConfigError> {
    info!(
        "Starting setup with {} warehouses, {} points, {} vehicles",
        world.warehouses.len(),
        world.points.len(),
        world.vehicles.len()
    );

    let pi = ProblemInstance::new(world.warehouses, world.points, world.vehicles)?;

    let delivery: u64 = total_demand(&pi, ServiceKind::Delivery);
    let pickup: u64 = total_demand(&pi, ServiceKind::Pickup);
    let capacity: u64 = pi.vehicles.iter().map(|v| u64::from(v.capacity)).sum();
    info!(
        "Delivery demand: {}kg, pickup demand: {}kg, fleet capacity: {}kg",
        delivery, pickup, capacity
    );
    if delivery.max(pickup) > capacity {
        warn!("Demand exceeds fleet capacity, expect penalized solutions");
    }

    info!("Setup completed successfully");
    Ok(pi)
}

fn total_demand(pi: &ProblemInstance, kind: ServiceKind) -> u64 {
    pi.points
        .iter()
        .filter(|p| p.kind == kind)
        .map(|p| p.demand.total_wide())
        .sum()
}

/// Random, structurally valid starting population.
pub fn initial_population(
    pi: &ProblemInstance,
    size: usize,
    rng: &mut ChaCha8Rng,
) -> Vec<Chromosome> {
    let population: Vec<Chromosome> = (0..size).map(|_| Chromosome::random(pi, rng)).collect();
    debug!("Initial population of {} individuals", population.len());
    population
}
