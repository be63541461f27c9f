use serde::Serialize;

use crate::domain::types::Goods;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopAction {
    Deliver,
    Pickup,
}

/// A visit to one service point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    pub point: usize,
    pub action: StopAction,
    /// Goods handed over or collected at this stop.
    pub amounts: Goods,
    /// Vehicle load once the stop is served.
    pub load_after: Goods,
}

/// The decoded route of a single vehicle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleRoute {
    pub vehicle: usize,
    /// Warehouse the vehicle departs from.
    pub origin: usize,
    /// Warehouse the vehicle unloads at after the last stop.
    pub terminal: usize,
    pub departure_load: Goods,
    pub stops: Vec<Stop>,
}

impl VehicleRoute {
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn point_ids(&self) -> Vec<usize> {
        self.stops.iter().map(|s| s.point).collect()
    }

    /// Departure load followed by the load after every stop.
    pub fn load_states(&self) -> impl Iterator<Item = &Goods> {
        std::iter::once(&self.departure_load).chain(self.stops.iter().map(|s| &s.load_after))
    }
}

/// One route per vehicle, indexed by vehicle id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    pub routes: Vec<VehicleRoute>,
}

impl Solution {
    pub fn visited_points(&self) -> usize {
        self.routes.iter().map(|r| r.stops.len()).sum()
    }
}
