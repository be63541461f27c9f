use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use vrp::config::GaConfig;
use vrp::domain::types::{
    Coord, Goods, Point, ProblemInstance, ServiceKind, Vehicle, Warehouse, World,
};
use vrp::error::{ConfigError, VrpError};
use vrp::evaluation::fitness::{evaluate, find_distance};
use vrp::fixtures::data_generator::generate_random_inputs;
use vrp::setup::init::{initial_population, setup};
use vrp::solver::genetic::chromosome::{decode, encode, validate};
use vrp::solver::genetic::operators::mutate;
use vrp::solver::genetic::search::{evaluate_population, solve, step, Termination};

fn two_delivery_world(capacity: u32) -> World {
    World {
        warehouses: vec![Warehouse {
            id: 0,
            coord: Coord::new(50.0, 50.0),
        }],
        points: vec![
            Point {
                id: 0,
                coord: Coord::new(20.0, 30.0),
                demand: Goods([60, 40, 20]),
                kind: ServiceKind::Delivery,
            },
            Point {
                id: 1,
                coord: Coord::new(70.0, 80.0),
                demand: Goods([50, 50, 50]),
                kind: ServiceKind::Delivery,
            },
        ],
        vehicles: vec![Vehicle {
            id: 0,
            capacity,
            home: 0,
        }],
    }
}

fn small_config() -> GaConfig {
    GaConfig {
        population_size: 24,
        generations: 40,
        stagnation_limit: 40,
        seed: 2024,
        ..GaConfig::default()
    }
}

#[test]
fn single_vehicle_serves_both_deliveries() {
    let pi = setup(two_delivery_world(300)).unwrap();
    let outcome = solve(&pi, &small_config()).unwrap();

    assert_eq!(outcome.solution.routes.len(), 1);
    let mut visited = outcome.solution.routes[0].point_ids();
    visited.sort_unstable();
    assert_eq!(visited, vec![0, 1]);
    assert_eq!(outcome.fitness.overflow, 0);
    assert_eq!(outcome.fitness.penalty(), 0.0);

    // warehouse -> (20,30) -> (70,80) -> warehouse, either direction
    let tour = 2.0 * 30f64.hypot(20.0) + 50f64.hypot(50.0);
    assert!((outcome.fitness.distance - tour).abs() < 1e-9);
}

#[test]
fn undersized_vehicle_is_penalized_from_the_start() {
    let pi = setup(two_delivery_world(100)).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let population = initial_population(&pi, 30, &mut rng);

    for fitness in evaluate_population(&pi, &population).unwrap() {
        assert!(fitness.overflow > 0);
        assert!(fitness.penalty() > 0.0);
    }
}

#[test]
fn no_points_stagnates_on_first_generation() {
    let world = World {
        warehouses: (0..5)
            .map(|id| Warehouse {
                id,
                coord: Coord::new(20.0 * id as f64, 10.0),
            })
            .collect(),
        points: vec![],
        vehicles: (0..3)
            .map(|id| Vehicle {
                id,
                capacity: 1000,
                home: id,
            })
            .collect(),
    };
    let pi = setup(world).unwrap();

    let outcome = solve(&pi, &GaConfig::default()).unwrap();
    assert_eq!(outcome.fitness.value, 0.0);
    assert_eq!(outcome.generations, 1);
    assert_eq!(outcome.termination, Termination::Stagnation);
    assert!(outcome.solution.routes.iter().all(|r| r.is_empty()));
}

#[test]
fn mutation_keeps_point_multiset() {
    let pi = setup(generate_random_inputs(7)).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for mut chromosome in initial_population(&pi, 20, &mut rng) {
        let mut before: Vec<usize> = chromosome.genes().collect();
        before.sort_unstable();

        for _ in 0..10 {
            mutate(&mut chromosome, &mut rng);
        }

        let mut after: Vec<usize> = chromosome.genes().collect();
        after.sort_unstable();
        assert_eq!(before, after);
        assert_eq!(validate(&pi, &chromosome), Ok(()));
    }
}

#[test]
fn every_generation_covers_every_point() {
    let pi = setup(generate_random_inputs(11)).unwrap();
    let config = small_config();
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    let mut population = initial_population(&pi, config.population_size, &mut rng);
    let mut fitness = evaluate_population(&pi, &population).unwrap();
    for _ in 0..10 {
        (population, fitness) = step(&pi, &config, population, &fitness, &mut rng).unwrap();
        assert_eq!(population.len(), config.population_size);
        for chromosome in &population {
            let solution = decode(&pi, chromosome).unwrap();
            assert_eq!(solution.visited_points(), pi.num_of_points());
            assert_eq!(&encode(&solution), chromosome);
        }
    }
}

#[test]
fn feasible_best_never_exceeds_capacity() {
    let mut world = generate_random_inputs(3);
    for vehicle in world.vehicles.iter_mut() {
        // larger than all demand combined
        vehicle.capacity = 10_000;
    }
    let pi = setup(world).unwrap();
    let outcome = solve(&pi, &small_config()).unwrap();

    assert!(outcome.fitness.is_feasible());
    for route in &outcome.solution.routes {
        let capacity = pi.vehicles[route.vehicle].capacity;
        assert!(route.load_states().all(|load| load.total() <= capacity));
    }
    assert!((find_distance(&pi, &outcome.solution) - outcome.fitness.distance).abs() < 1e-9);
}

#[test]
fn identical_seeds_give_identical_runs() {
    let pi = setup(generate_random_inputs(1)).unwrap();
    let config = small_config();

    let first = solve(&pi, &config).unwrap();
    let second = solve(&pi, &config).unwrap();
    assert_eq!(first.best, second.best);
    assert_eq!(first.history, second.history);
    assert_eq!(first.generations, second.generations);

    for pair in first.history.windows(2) {
        assert!(pair[1] <= pair[0]);
    }
    assert_eq!(evaluate(&pi, &first.best).unwrap(), first.fitness);
}

#[test]
fn configuration_errors_surface_before_search() {
    let mut world = two_delivery_world(300);
    world.vehicles.clear();
    assert_eq!(setup(world).unwrap_err(), ConfigError::NoVehicles);

    let pi: ProblemInstance = setup(two_delivery_world(300)).unwrap();
    let config = GaConfig {
        crossover_rate: 2.0,
        ..small_config()
    };
    assert!(matches!(
        solve(&pi, &config),
        Err(VrpError::Config(ConfigError::ProbabilityOutOfRange { .. }))
    ));
}
