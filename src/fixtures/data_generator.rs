use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::config::constant::{
    COORD_MAX, COORD_MIN, DELIVERY_POINTS, MAX_POINT_DEMAND, MIN_POINT_DEMAND, PICKUP_POINTS,
    VEHICLE_CAPACITIES, WAREHOUSE_POSITIONS,
};
use crate::domain::types::{Coord, Goods, Point, ServiceKind, Vehicle, Warehouse, World};

/// Warehouses at fixed positions
pub fn generate_warehouses(positions: &[(f64, f64)]) -> Vec<Warehouse> {
    positions
        .iter()
        .enumerate()
        .map(|(id, &(x, y))| Warehouse {
            id,
            coord: Coord::new(x, y),
        })
        .collect()
}

/// Splits `total` kg randomly across the three commodities.
fn split_demand(total: u32, rng: &mut ChaCha8Rng) -> Goods {
    let a = rng.gen_range(0..=total);
    let b = rng.gen_range(0..=total);
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    Goods([low, high - low, total - high])
}

/// Service points with integer coordinates and a total demand within the
/// configured bounds. Ids start at `first_id`.
pub fn generate_points(
    count: usize,
    kind: ServiceKind,
    first_id: usize,
    rng: &mut ChaCha8Rng,
) -> Vec<Point> {
    (0..count)
        .map(|offset| {
            let x = rng.gen_range(COORD_MIN..=COORD_MAX);
            let y = rng.gen_range(COORD_MIN..=COORD_MAX);
            let total = rng.gen_range(MIN_POINT_DEMAND..=MAX_POINT_DEMAND);

            Point {
                id: first_id + offset,
                coord: Coord::new(f64::from(x), f64::from(y)),
                demand: split_demand(total, rng),
                kind,
            }
        })
        .collect()
}

/// One vehicle per capacity, each based at a random warehouse.
pub fn generate_fleet(
    capacities: &[u32],
    warehouses: &[Warehouse],
    rng: &mut ChaCha8Rng,
) -> Vec<Vehicle> {
    capacities
        .iter()
        .enumerate()
        .filter_map(|(id, &capacity)| {
            warehouses.choose(rng).map(|home| Vehicle {
                id,
                capacity,
                home: home.id,
            })
        })
        .collect()
}

/// Generate warehouses, delivery and pickup points and the fleet from `seed`
pub fn generate_random_inputs(seed: u64) -> World {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let warehouses = generate_warehouses(&WAREHOUSE_POSITIONS);
    info!("Created {} warehouses", warehouses.len());

    let mut points = generate_points(DELIVERY_POINTS, ServiceKind::Delivery, 0, &mut rng);
    points.extend(generate_points(
        PICKUP_POINTS,
        ServiceKind::Pickup,
        DELIVERY_POINTS,
        &mut rng,
    ));
    info!(
        "Generated {} delivery points and {} pickup points",
        DELIVERY_POINTS, PICKUP_POINTS
    );

    let vehicles = generate_fleet(&VEHICLE_CAPACITIES, &warehouses, &mut rng);
    info!("Vehicle Capacities: {:?}", VEHICLE_CAPACITIES);

    let total_demand: u32 = points.iter().map(|p| p.demand.total()).sum();
    let total_capacity: u32 = vehicles.iter().map(|v| v.capacity).sum();
    if total_capacity < total_demand {
        warn!(
            "Total fleet capacity ({}) is less than total demand ({}), expect penalties",
            total_capacity, total_demand
        );
    }

    World {
        warehouses,
        points,
        vehicles,
    }
}
