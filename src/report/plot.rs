use std::error::Error;
use std::path::Path;

use plotters::prelude::*;
use tracing::info;

use super::routes::ensure_parent_dir;
use crate::distance::matrix::Node;
use crate::domain::solution::{Solution, VehicleRoute};
use crate::domain::types::{Coord, ProblemInstance, ServiceKind};

const PLOT_SIZE: (u32, u32) = (800, 800);
const GRID_STEP: usize = 10;
const GRID_COLOR: RGBColor = RGBColor(220, 220, 220);
const DELIVERY_COLOR: RGBColor = RGBColor(30, 110, 200);
const PICKUP_COLOR: RGBColor = RGBColor(200, 60, 40);
const ROUTE_COLORS: [RGBColor; 6] = [RED, BLUE, GREEN, MAGENTA, CYAN, RGBColor(255, 140, 0)];

fn node_coord(pi: &ProblemInstance, node: Node) -> (f64, f64) {
    let Coord { x, y } = match node {
        Node::Warehouse(id) => pi.warehouses[id].coord,
        Node::Point(id) => pi.points[id].coord,
    };
    (x, y)
}

/// Origin warehouse, every stop, then the terminal warehouse.
pub fn route_polyline(pi: &ProblemInstance, route: &VehicleRoute) -> Vec<(f64, f64)> {
    if route.is_empty() {
        return Vec::new();
    }

    std::iter::once(Node::Warehouse(route.origin))
        .chain(route.stops.iter().map(|s| Node::Point(s.point)))
        .chain(std::iter::once(Node::Warehouse(route.terminal)))
        .map(|node| node_coord(pi, node))
        .collect()
}

/// Draws warehouses (squares), deliveries (filled dots), pickups (rings) and one
/// colored polyline per used vehicle. Shapes only: no font backend is compiled in.
pub fn plot_routes(
    pi: &ProblemInstance,
    solution: &Solution,
    filename: &str,
) -> Result<(), Box<dyn Error>> {
    ensure_parent_dir(Path::new(filename))?;

    let root = BitMapBackend::new(filename, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_2d(-5.0..105.0, -5.0..105.0)?;

    chart.draw_series((0..=100).step_by(GRID_STEP).flat_map(|step| {
        let at = step as f64;
        [
            PathElement::new(vec![(at, 0.0), (at, 100.0)], GRID_COLOR.stroke_width(1)),
            PathElement::new(vec![(0.0, at), (100.0, at)], GRID_COLOR.stroke_width(1)),
        ]
    }))?;

    for route in solution.routes.iter().filter(|r| !r.is_empty()) {
        let color = ROUTE_COLORS[route.vehicle % ROUTE_COLORS.len()];
        chart.draw_series(LineSeries::new(
            route_polyline(pi, route),
            color.stroke_width(2),
        ))?;
    }

    chart.draw_series(pi.points.iter().map(|p| {
        let style = match p.kind {
            ServiceKind::Delivery => DELIVERY_COLOR.filled(),
            ServiceKind::Pickup => PICKUP_COLOR.stroke_width(2),
        };
        Circle::new((p.coord.x, p.coord.y), 4, style)
    }))?;

    chart.draw_series(pi.warehouses.iter().map(|w| {
        let Coord { x, y } = w.coord;
        Rectangle::new([(x - 1.5, y - 1.5), (x + 1.5, y + 1.5)], BLACK.filled())
    }))?;

    root.present()?;
    info!("Route plot saved to {}", filename);
    Ok(())
}
