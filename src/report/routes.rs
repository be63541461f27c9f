use std::error::Error;
use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;

use chrono::Local;
use colored::*;
use tracing::{debug, info, warn};

use crate::domain::solution::{Solution, StopAction, VehicleRoute};
use crate::domain::types::{Coord, ProblemInstance};
use crate::evaluation::fitness::{route_distance, Fitness};
use crate::solver::genetic::search::SearchOutcome;

const RULE: &str = "============================================================";

pub(crate) fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir),
        _ => Ok(()),
    }
}

fn coord_label(coord: Coord) -> String {
    format!("({},{})", coord.x, coord.y)
}

fn warehouse_label(pi: &ProblemInstance, id: usize) -> String {
    format!("Warehouse {} {}", id + 1, coord_label(pi.warehouses[id].coord))
}

fn render_route(
    out: &mut String,
    pi: &ProblemInstance,
    route: &VehicleRoute,
) -> Result<f64, fmt::Error> {
    let vehicle = &pi.vehicles[route.vehicle];
    let capacity = vehicle.capacity;
    let over = |kg: u32| {
        let excess = kg.saturating_sub(capacity);
        if excess > 0 {
            format!(" (over capacity by {}kg)", excess)
        } else {
            String::new()
        }
    };

    writeln!(out, "\n{}", RULE)?;
    writeln!(out, "Vehicle {} (Capacity: {}kg)", vehicle.id + 1, capacity)?;
    writeln!(out, "Assigned Warehouse: {}", warehouse_label(pi, route.origin))?;
    writeln!(out, "{}", RULE)?;

    if route.is_empty() {
        writeln!(out, "No stops assigned")?;
        return Ok(0.0);
    }

    let departure = route.departure_load.total();
    writeln!(
        out,
        "Stop 1: {} | Initial load: {}kg{}",
        warehouse_label(pi, route.origin),
        departure,
        over(departure)
    )?;

    for (i, stop) in route.stops.iter().enumerate() {
        let point = &pi.points[stop.point];
        let load = stop.load_after.total();
        let (tag, verb, after) = match stop.action {
            StopAction::Deliver => ("Delivery", "Delivered", "delivery"),
            StopAction::Pickup => ("Pickup", "Picked up", "pickup"),
        };
        writeln!(
            out,
            "Stop {}: [{}] Point {} {} | {}: {}kg ({}) | Vehicle load after {}: {}kg{}",
            i + 2,
            tag,
            point.id + 1,
            coord_label(point.coord),
            verb,
            stop.amounts.total(),
            stop.amounts,
            after,
            load,
            over(load)
        )?;
    }

    writeln!(
        out,
        "Stop {}: {} | Unloaded to: 0kg",
        route.stops.len() + 2,
        warehouse_label(pi, route.terminal)
    )?;

    let distance = route_distance(pi, route);
    writeln!(
        out,
        "\nVehicle {} Total Distance: {:.2} km",
        vehicle.id + 1,
        distance
    )?;
    Ok(distance)
}

/// Human-readable route listing of a solution.
pub fn render_routes(
    pi: &ProblemInstance,
    solution: &Solution,
    fitness: &Fitness,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Number of vehicles: {}", solution.routes.len())?;
    if fitness.is_feasible() {
        writeln!(out, "Status: FEASIBLE")?;
    } else {
        writeln!(
            out,
            "Status: INFEASIBLE (capacity exceeded by {}kg in total)",
            fitness.overflow
        )?;
    }

    let mut total = 0.0;
    for route in &solution.routes {
        total += render_route(&mut out, pi, route)?;
    }

    writeln!(out, "\n{}", RULE)?;
    writeln!(out, "GRAND TOTAL DISTANCE: {:.2} km", total)?;
    writeln!(out, "{}", RULE)?;
    Ok(out)
}

pub fn save_routes(
    pi: &ProblemInstance,
    outcome: &SearchOutcome,
    filename: &str,
) -> Result<(), Box<dyn Error>> {
    let path = Path::new(filename);
    ensure_parent_dir(path)?;

    let mut report = String::from("=== VEHICLE ROUTING PROBLEM ===\n");
    writeln!(report, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(
        report,
        "Generations: {} ({:?})",
        outcome.generations, outcome.termination
    )?;
    report.push_str(&render_routes(pi, &outcome.solution, &outcome.fitness)?);

    fs::write(path, report)?;
    Ok(())
}

pub fn save_solution_json(solution: &Solution, filename: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(filename);
    ensure_parent_dir(path)?;
    fs::write(path, serde_json::to_string_pretty(solution)?)?;
    Ok(())
}

/// Logs a summary of the solution; infeasible results are flagged.
pub fn print_solution(pi: &ProblemInstance, solution: &Solution, fitness: &Fitness) {
    if fitness.is_feasible() {
        info!(
            "{} Distance: {:.2}, Fitness: {:.2}",
            "FEASIBLE".green(),
            fitness.distance,
            fitness.value
        );
    } else {
        warn!(
            "{} Distance: {:.2}, Fitness: {:.2}, Penalty: {:.2}",
            "INFEASIBLE".red(),
            fitness.distance,
            fitness.value,
            fitness.penalty()
        );
    }

    for route in &solution.routes {
        let peak = route.load_states().map(|l| l.total()).max().unwrap_or(0);
        debug!(
            "Vehicle {}: {} / {} : {:?} -> warehouse {}",
            route.vehicle,
            peak,
            pi.vehicles[route.vehicle].capacity,
            route.point_ids(),
            route.terminal
        );
    }
}
