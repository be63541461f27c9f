use rayon::prelude::*;
use tracing::debug;

use super::euclidean;
use crate::domain::types::{Coord, Point, Warehouse};

/// A stop a vehicle can be at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Warehouse(usize),
    Point(usize),
}

/// Pairwise distances over all warehouses followed by all points.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    warehouse_count: usize,
    dm: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    pub fn new(warehouses: &[Warehouse], points: &[Point]) -> Self {
        let coords: Vec<Coord> = warehouses
            .iter()
            .map(|w| w.coord)
            .chain(points.iter().map(|p| p.coord))
            .collect();

        let dm: Vec<Vec<f64>> = coords
            .par_iter()
            .map(|&from| coords.iter().map(|&to| euclidean(from, to)).collect())
            .collect();

        debug!(
            "Built {}x{} distance matrix ({} warehouses)",
            dm.len(),
            dm.len(),
            warehouses.len()
        );

        Self {
            warehouse_count: warehouses.len(),
            dm,
        }
    }

    fn index(&self, node: Node) -> usize {
        match node {
            Node::Warehouse(id) => id,
            Node::Point(id) => self.warehouse_count + id,
        }
    }

    pub fn between(&self, from: Node, to: Node) -> f64 {
        self.dm[self.index(from)][self.index(to)]
    }

    /// Closest warehouse to `node`, lowest id on ties.
    pub fn nearest_warehouse(&self, node: Node) -> usize {
        (0..self.warehouse_count)
            .min_by(|&a, &b| {
                self.between(node, Node::Warehouse(a))
                    .total_cmp(&self.between(node, Node::Warehouse(b)))
            })
            .unwrap_or(0)
    }
}
