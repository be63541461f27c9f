use crate::domain::solution::{Solution, Stop, StopAction, VehicleRoute};
use crate::domain::types::{Goods, ProblemInstance, ServiceKind};

/// Runs the load model over an ordered list of point ids.
///
/// The vehicle leaves its warehouse with the whole delivery demand of the route
/// on board, hands it over stop by stop and accumulates every pickup until it
/// unloads at the terminal warehouse.
pub fn simulate_loads(pi: &ProblemInstance, points: &[usize]) -> (Goods, Vec<Stop>) {
    let departure_load = points
        .iter()
        .map(|&id| &pi.points[id])
        .filter(|p| p.kind == ServiceKind::Delivery)
        .fold(Goods::default(), |acc, p| acc + p.demand);

    let mut load = departure_load;
    let stops = points
        .iter()
        .map(|&id| {
            let point = &pi.points[id];
            let action = match point.kind {
                ServiceKind::Delivery => {
                    load -= point.demand;
                    StopAction::Deliver
                }
                ServiceKind::Pickup => {
                    load += point.demand;
                    StopAction::Pickup
                }
            };

            Stop {
                point: id,
                action,
                amounts: point.demand,
                load_after: load,
            }
        })
        .collect();

    (departure_load, stops)
}

/// Weight carried above `capacity`, in kg.
pub fn overflow(load: &Goods, capacity: u32) -> u64 {
    u64::from(load.total().saturating_sub(capacity))
}

/// Overflow summed over every load state of the route.
pub fn route_overflow(route: &VehicleRoute, capacity: u32) -> u64 {
    route
        .load_states()
        .map(|load| overflow(load, capacity))
        .sum()
}

pub fn total_overflow(pi: &ProblemInstance, solution: &Solution) -> u64 {
    solution
        .routes
        .iter()
        .map(|r| route_overflow(r, pi.vehicles[r.vehicle].capacity))
        .sum()
}

pub fn penalty(pi: &ProblemInstance, solution: &Solution) -> f64 {
    (total_overflow(pi, solution) as f64) * pi.penalty_value
}
