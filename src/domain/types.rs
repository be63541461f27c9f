use std::fmt;
use std::ops::{Add, AddAssign, Index, SubAssign};

use serde::Serialize;

use crate::config::constant::{MAX_POINT_DEMAND, MIN_POINT_DEMAND, PENALTY_WEIGHT};
use crate::distance::matrix::{DistanceMatrix, Node};
use crate::error::ConfigError;

pub const COMMODITY_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Commodity {
    Oranges,
    Uranium,
    Tuna,
}

impl Commodity {
    pub const ALL: [Commodity; COMMODITY_COUNT] =
        [Commodity::Oranges, Commodity::Uranium, Commodity::Tuna];

    pub fn name(self) -> &'static str {
        match self {
            Commodity::Oranges => "oranges",
            Commodity::Uranium => "uranium",
            Commodity::Tuna => "tuna",
        }
    }
}

/// Weight in kg per commodity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Goods(pub [u32; COMMODITY_COUNT]);

impl Goods {
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Total weight without the risk of `u32` overflow on unchecked input.
    pub fn total_wide(&self) -> u64 {
        self.0.iter().map(|&kg| u64::from(kg)).sum()
    }
}

impl Index<Commodity> for Goods {
    type Output = u32;

    fn index(&self, commodity: Commodity) -> &u32 {
        &self.0[commodity as usize]
    }
}

impl Add for Goods {
    type Output = Goods;

    fn add(mut self, rhs: Goods) -> Goods {
        self += rhs;
        self
    }
}

impl AddAssign for Goods {
    fn add_assign(&mut self, rhs: Goods) {
        for (lhs, rhs) in self.0.iter_mut().zip(rhs.0) {
            *lhs += rhs;
        }
    }
}

// A vehicle never hands over more than it carries.
impl SubAssign for Goods {
    fn sub_assign(&mut self, rhs: Goods) {
        for (lhs, rhs) in self.0.iter_mut().zip(rhs.0) {
            *lhs = lhs.saturating_sub(rhs);
        }
    }
}

impl fmt::Display for Goods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = Commodity::ALL
            .iter()
            .filter(|c| self[**c] > 0)
            .map(|c| format!("{} {}kg", c.name(), self[*c]))
            .collect();

        if parts.is_empty() {
            write!(f, "0kg")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ServiceKind {
    Delivery,
    Pickup,
}

/// A customer to deliver goods to or collect goods from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub id: usize,
    pub coord: Coord,
    pub demand: Goods,
    pub kind: ServiceKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Warehouse {
    pub id: usize,
    pub coord: Coord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vehicle {
    pub id: usize,
    /// Maximum total weight carried at any time, in kg.
    pub capacity: u32,
    /// Warehouse every route of this vehicle departs from.
    pub home: usize,
}

/// Raw input produced by the world generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct World {
    pub warehouses: Vec<Warehouse>,
    pub points: Vec<Point>,
    pub vehicles: Vec<Vehicle>,
}

/// Read-only world handed to the optimizer.
#[derive(Debug, Clone)]
pub struct ProblemInstance {
    pub warehouses: Vec<Warehouse>,
    pub points: Vec<Point>,
    pub vehicles: Vec<Vehicle>,
    pub distance_matrix: DistanceMatrix,
    /// Closest warehouse to each point, by point id.
    pub nearest_warehouse: Vec<usize>,
    pub penalty_value: f64,
}

impl ProblemInstance {
    pub fn new(
        warehouses: Vec<Warehouse>,
        points: Vec<Point>,
        vehicles: Vec<Vehicle>,
    ) -> Result<Self, ConfigError> {
        if warehouses.is_empty() {
            return Err(ConfigError::NoWarehouses);
        }
        if vehicles.is_empty() {
            return Err(ConfigError::NoVehicles);
        }

        check_ids("warehouse", warehouses.iter().map(|w| w.id))?;
        check_ids("point", points.iter().map(|p| p.id))?;
        check_ids("vehicle", vehicles.iter().map(|v| v.id))?;

        let demand_range = u64::from(MIN_POINT_DEMAND)..=u64::from(MAX_POINT_DEMAND);
        if let Some(point) = points
            .iter()
            .find(|p| !demand_range.contains(&p.demand.total_wide()))
        {
            return Err(ConfigError::DemandOutOfRange {
                point: point.id,
                total: point.demand.total_wide(),
                min: MIN_POINT_DEMAND,
                max: MAX_POINT_DEMAND,
            });
        }

        if let Some(vehicle) = vehicles.iter().find(|v| v.home >= warehouses.len()) {
            return Err(ConfigError::UnknownHomeWarehouse {
                vehicle: vehicle.id,
                warehouse: vehicle.home,
            });
        }

        let distance_matrix = DistanceMatrix::new(&warehouses, &points);
        let nearest_warehouse = points
            .iter()
            .map(|p| distance_matrix.nearest_warehouse(Node::Point(p.id)))
            .collect();

        Ok(Self {
            warehouses,
            points,
            vehicles,
            distance_matrix,
            nearest_warehouse,
            penalty_value: PENALTY_WEIGHT,
        })
    }

    pub fn num_of_vehicles(&self) -> usize {
        self.vehicles.len()
    }

    pub fn num_of_points(&self) -> usize {
        self.points.len()
    }

    pub fn dist_between(&self, from: Node, to: Node) -> f64 {
        self.distance_matrix.between(from, to)
    }
}

fn check_ids(kind: &'static str, ids: impl Iterator<Item = usize>) -> Result<(), ConfigError> {
    for (index, id) in ids.enumerate() {
        if index != id {
            return Err(ConfigError::IdMismatch { kind, index, id });
        }
    }
    Ok(())
}
