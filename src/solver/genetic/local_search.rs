use tracing::trace;

use super::chromosome::Chromosome;
use crate::domain::types::ProblemInstance;
use crate::evaluation::fitness::route_cost;

const MIN_GAIN: f64 = 1e-9;

/// 2-opt on one route: keep reversing segments while a reversal strictly lowers
/// the penalized route cost. Returns whether the route changed.
pub fn two_opt(pi: &ProblemInstance, vehicle: usize, route: &mut [usize]) -> bool {
    let n = route.len();
    if n < 2 {
        return false;
    }

    let mut best = route_cost(pi, vehicle, route);
    let mut changed = false;
    let mut improved = true;

    while improved {
        improved = false;
        for i in 0..n - 1 {
            for j in (i + 1)..n {
                route[i..=j].reverse();
                let cost = route_cost(pi, vehicle, route);
                if cost < best - MIN_GAIN {
                    best = cost;
                    improved = true;
                    changed = true;
                } else {
                    route[i..=j].reverse();
                }
            }
        }
    }

    changed
}

/// Runs 2-opt on every route of the chromosome.
pub fn improve(pi: &ProblemInstance, chromosome: &mut Chromosome) {
    for (vehicle, route) in chromosome.routes.iter_mut().enumerate() {
        if two_opt(pi, vehicle, route) {
            trace!("2-opt improved route of vehicle {}", vehicle);
        }
    }
}
