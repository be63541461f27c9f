use itertools::Itertools;
use serde::Serialize;

use crate::distance::matrix::Node;
use crate::domain::solution::{Solution, VehicleRoute};
use crate::domain::types::ProblemInstance;
use crate::error::CodecError;
use crate::evaluation::penalty::{route_overflow, total_overflow};
use crate::solver::genetic::chromosome::{build_route, decode, Chromosome};

/// Score of a chromosome. Lower `value` is better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fitness {
    pub distance: f64,
    /// Overflow in kg summed over every load state of every route.
    pub overflow: u64,
    pub value: f64,
}

impl Fitness {
    pub fn is_feasible(&self) -> bool {
        self.overflow == 0
    }

    pub fn penalty(&self) -> f64 {
        self.value - self.distance
    }
}

pub fn evaluate(pi: &ProblemInstance, chromosome: &Chromosome) -> Result<Fitness, CodecError> {
    let solution = decode(pi, chromosome)?;
    Ok(find_fitness(pi, &solution))
}

pub fn find_fitness(pi: &ProblemInstance, solution: &Solution) -> Fitness {
    let distance = find_distance(pi, solution);
    let overflow = total_overflow(pi, solution);

    Fitness {
        distance,
        overflow,
        value: distance + (overflow as f64) * pi.penalty_value,
    }
}

pub fn find_distance(pi: &ProblemInstance, solution: &Solution) -> f64 {
    solution
        .routes
        .iter()
        .map(|route| route_distance(pi, route))
        .sum()
}

/// Length of origin -> stops -> terminal. An empty route stays home.
pub fn route_distance(pi: &ProblemInstance, route: &VehicleRoute) -> f64 {
    if route.is_empty() {
        return 0.0;
    }

    std::iter::once(Node::Warehouse(route.origin))
        .chain(route.stops.iter().map(|s| Node::Point(s.point)))
        .chain(std::iter::once(Node::Warehouse(route.terminal)))
        .tuple_windows()
        .map(|(from, to)| pi.dist_between(from, to))
        .sum()
}

/// Penalized cost of serving `points` in order with `vehicle`.
pub fn route_cost(pi: &ProblemInstance, vehicle: usize, points: &[usize]) -> f64 {
    let route = build_route(pi, vehicle, points);
    let overflow = route_overflow(&route, pi.vehicles[vehicle].capacity);
    route_distance(pi, &route) + (overflow as f64) * pi.penalty_value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Coord, Goods, Point, ServiceKind, Vehicle, Warehouse};

    fn instance() -> ProblemInstance {
        let warehouses = vec![
            Warehouse {
                id: 0,
                coord: Coord::new(0.0, 0.0),
            },
            Warehouse {
                id: 1,
                coord: Coord::new(100.0, 0.0),
            },
        ];
        let points = vec![
            Point {
                id: 0,
                coord: Coord::new(30.0, 40.0),
                demand: Goods([100, 0, 0]),
                kind: ServiceKind::Delivery,
            },
            Point {
                id: 1,
                coord: Coord::new(90.0, 0.0),
                demand: Goods([0, 0, 150]),
                kind: ServiceKind::Pickup,
            },
        ];
        let vehicles = vec![
            Vehicle {
                id: 0,
                capacity: 200,
                home: 0,
            },
            Vehicle {
                id: 1,
                capacity: 120,
                home: 1,
            },
        ];
        ProblemInstance::new(warehouses, points, vehicles).unwrap()
    }

    #[test]
    fn route_ends_at_nearest_warehouse() {
        let pi = instance();
        let chromosome = Chromosome::new(vec![vec![0, 1], vec![]]);
        let fitness = evaluate(&pi, &chromosome).unwrap();

        // 0 -> (30,40) = 50, -> (90,0) = sqrt(3600 + 1600), -> warehouse 1 = 10
        let expected = 50.0 + 5200f64.sqrt() + 10.0;
        assert!((fitness.distance - expected).abs() < 1e-9);
        assert_eq!(fitness.overflow, 0);
        assert!(fitness.is_feasible());
        assert_eq!(fitness.value, fitness.distance);
    }

    #[test]
    fn overflow_is_penalized() {
        let pi = instance();
        // vehicle 1 picks up 150 with capacity 120
        let chromosome = Chromosome::new(vec![vec![0], vec![1]]);
        let fitness = evaluate(&pi, &chromosome).unwrap();

        assert_eq!(fitness.overflow, 30);
        assert!(!fitness.is_feasible());
        assert!((fitness.penalty() - 30.0 * pi.penalty_value).abs() < 1e-6);
    }

    #[test]
    fn empty_routes_cost_nothing() {
        let pi = instance();
        assert_eq!(route_cost(&pi, 1, &[]), 0.0);
        assert!(route_cost(&pi, 1, &[1]) > pi.penalty_value);
    }

    #[test]
    fn malformed_chromosome_is_rejected() {
        let pi = instance();
        let chromosome = Chromosome::new(vec![vec![0, 0], vec![1]]);
        assert_eq!(
            evaluate(&pi, &chromosome).unwrap_err(),
            CodecError::DuplicatePoint(0)
        );
    }
}
