//! Route-per-vehicle chromosome and its codec.
//!
//! # Encoding
//!
//! A chromosome holds one gene segment per vehicle: `routes[v]` lists the ids of
//! the points served by vehicle `v`, in visiting order. Segment boundaries are
//! therefore fixed by vehicle index and no marker genes are needed. Every
//! segment is anchored at its vehicle's home warehouse and ends at the
//! warehouse nearest to its last point.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::domain::solution::{Solution, VehicleRoute};
use crate::domain::types::ProblemInstance;
use crate::error::CodecError;
use crate::evaluation::fitness::route_cost;
use crate::evaluation::penalty::simulate_loads;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chromosome {
    pub routes: Vec<Vec<usize>>,
}

impl Chromosome {
    pub fn new(routes: Vec<Vec<usize>>) -> Self {
        Self { routes }
    }

    /// Every point dealt to a uniformly random vehicle, in shuffled order.
    pub fn random(pi: &ProblemInstance, rng: &mut ChaCha8Rng) -> Self {
        let mut ids: Vec<usize> = (0..pi.num_of_points()).collect();
        ids.shuffle(rng);

        let mut routes = vec![Vec::new(); pi.num_of_vehicles()];
        for id in ids {
            let vehicle = rng.gen_range(0..routes.len());
            routes[vehicle].push(id);
        }

        Self { routes }
    }

    /// Number of genes across all segments.
    pub fn len(&self) -> usize {
        self.routes.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn genes(&self) -> impl Iterator<Item = usize> + '_ {
        self.routes.iter().flatten().copied()
    }

    /// Maps a flat gene position to `(vehicle, offset)`.
    pub fn locate(&self, mut position: usize) -> Option<(usize, usize)> {
        for (vehicle, route) in self.routes.iter().enumerate() {
            if position < route.len() {
                return Some((vehicle, position));
            }
            position -= route.len();
        }
        None
    }
}

pub fn encode(solution: &Solution) -> Chromosome {
    Chromosome {
        routes: solution.routes.iter().map(VehicleRoute::point_ids).collect(),
    }
}

pub fn decode(pi: &ProblemInstance, chromosome: &Chromosome) -> Result<Solution, CodecError> {
    validate(pi, chromosome)?;

    let routes = chromosome
        .routes
        .iter()
        .enumerate()
        .map(|(vehicle, points)| build_route(pi, vehicle, points))
        .collect();

    Ok(Solution { routes })
}

/// Checks that every point is visited exactly once by a known vehicle.
pub fn validate(pi: &ProblemInstance, chromosome: &Chromosome) -> Result<(), CodecError> {
    if chromosome.routes.len() != pi.num_of_vehicles() {
        return Err(CodecError::RouteCountMismatch {
            expected: pi.num_of_vehicles(),
            found: chromosome.routes.len(),
        });
    }

    let mut seen = vec![false; pi.num_of_points()];
    for gene in chromosome.genes() {
        match seen.get_mut(gene) {
            None => return Err(CodecError::UnknownPoint(gene)),
            Some(true) => return Err(CodecError::DuplicatePoint(gene)),
            Some(visited) => *visited = true,
        }
    }

    match seen.iter().position(|visited| !visited) {
        Some(missing) => Err(CodecError::MissingPoint(missing)),
        None => Ok(()),
    }
}

pub(crate) fn build_route(pi: &ProblemInstance, vehicle: usize, points: &[usize]) -> VehicleRoute {
    let origin = pi.vehicles[vehicle].home;
    let terminal = points
        .last()
        .map_or(origin, |&last| pi.nearest_warehouse[last]);
    let (departure_load, stops) = simulate_loads(pi, points);

    VehicleRoute {
        vehicle,
        origin,
        terminal,
        departure_load,
        stops,
    }
}

/// Restores the exactly-once invariant.
///
/// Segments are padded or truncated to the fleet size, unknown genes and
/// repeated genes are dropped (the first occurrence in vehicle then stop order
/// is kept), and each missing point, in ascending id order, is inserted where
/// it raises the penalized route cost the least.
pub fn repair(pi: &ProblemInstance, mut chromosome: Chromosome) -> Chromosome {
    let num_of_points = pi.num_of_points();
    chromosome
        .routes
        .resize_with(pi.num_of_vehicles(), Vec::new);

    let mut seen = vec![false; num_of_points];
    for route in chromosome.routes.iter_mut() {
        route.retain(|&gene| gene < num_of_points && !std::mem::replace(&mut seen[gene], true));
    }

    let missing: Vec<usize> = (0..num_of_points).filter(|&id| !seen[id]).collect();
    for point in missing {
        insert_cheapest(pi, &mut chromosome.routes, point);
    }

    chromosome
}

fn insert_cheapest(pi: &ProblemInstance, routes: &mut [Vec<usize>], point: usize) {
    let mut best: Option<(f64, usize, usize)> = None;

    for (vehicle, route) in routes.iter().enumerate() {
        let base = route_cost(pi, vehicle, route);
        let mut candidate = route.clone();

        for position in 0..=route.len() {
            candidate.insert(position, point);
            let delta = route_cost(pi, vehicle, &candidate) - base;
            candidate.remove(position);

            if best.map_or(true, |(best_delta, _, _)| delta < best_delta) {
                best = Some((delta, vehicle, position));
            }
        }
    }

    if let Some((_, vehicle, position)) = best {
        routes[vehicle].insert(position, point);
    }
}
