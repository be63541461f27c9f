use std::error::Error;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info, span, trace, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::chromosome::{decode, validate, Chromosome};
use super::local_search::improve;
use super::operators::{crossover, mutate};
use super::selection::{elite_indices, tournament_selection};
use crate::config::constant::{
    HISTORY_CSV_PATH, ROUTES_PLOT_PATH, ROUTES_REPORT_PATH, SOLUTION_JSON_PATH,
};
use crate::config::GaConfig;
use crate::domain::solution::Solution;
use crate::domain::types::ProblemInstance;
use crate::error::{CodecError, VrpError};
use crate::evaluation::fitness::{evaluate, Fitness};
use crate::fixtures::data_generator::generate_random_inputs;
use crate::report::{plot_routes, print_solution, save_routes, save_solution_json, save_to_csv};
use crate::setup::init::{initial_population, setup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A feasible solution within the target distance was found.
    TargetReached,
    /// The best fitness stopped improving.
    Stagnation,
    /// The generation budget ran out.
    GenerationLimit,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best: Chromosome,
    pub fitness: Fitness,
    pub solution: Solution,
    /// Generation steps performed after the initial population.
    pub generations: usize,
    pub termination: Termination,
    /// Best-ever fitness after each generation; entry 0 is the initial population.
    pub history: Vec<f64>,
}

/// Best-ever record kept across generations.
#[derive(Debug)]
struct SearchState {
    best_so_far: Chromosome,
    best_fitness: Fitness,
    best_so_far_generation: usize,
    stagnation: usize,
    history: Vec<f64>,
}

impl SearchState {
    fn new(population: &[Chromosome], fitness: &[Fitness]) -> Self {
        let best = elite_indices(fitness, 1)[0];
        Self {
            best_so_far: population[best].clone(),
            best_fitness: fitness[best],
            best_so_far_generation: 0,
            stagnation: 0,
            history: vec![fitness[best].value],
        }
    }

    /// Records the generation and returns whether the best-ever improved.
    fn observe(
        &mut self,
        generation: usize,
        population: &[Chromosome],
        fitness: &[Fitness],
    ) -> bool {
        let best = elite_indices(fitness, 1)[0];
        let improved = fitness[best].value < self.best_fitness.value;

        if improved {
            self.best_so_far = population[best].clone();
            self.best_fitness = fitness[best];
            self.best_so_far_generation = generation;
            self.stagnation = 0;
            info!(
                "New best at generation {}: fitness = {:.2} (distance {:.2}, overflow {}kg)",
                generation,
                self.best_fitness.value,
                self.best_fitness.distance,
                self.best_fitness.overflow
            );
        } else {
            self.stagnation += 1;
        }

        self.history.push(self.best_fitness.value);
        improved
    }

    fn termination(&self, config: &GaConfig, generation: usize) -> Option<Termination> {
        if let Some(target) = config.target_distance {
            if self.best_fitness.is_feasible() && self.best_fitness.distance <= target {
                return Some(Termination::TargetReached);
            }
        }
        // Fitness is bounded below by zero, so a zero best cannot improve.
        if self.stagnation >= config.stagnation_limit || self.best_fitness.value <= 0.0 {
            return Some(Termination::Stagnation);
        }
        if generation >= config.generations {
            return Some(Termination::GenerationLimit);
        }
        None
    }
}

/// Scores every individual in parallel. Results keep population order.
pub fn evaluate_population(
    pi: &ProblemInstance,
    population: &[Chromosome],
) -> Result<Vec<Fitness>, CodecError> {
    population.par_iter().map(|c| evaluate(pi, c)).collect()
}

/// Breeds the next population: elites first, then children.
pub fn breed(
    pi: &ProblemInstance,
    config: &GaConfig,
    population: &[Chromosome],
    fitness: &[Fitness],
    rng: &mut ChaCha8Rng,
) -> Result<Vec<Chromosome>, CodecError> {
    let mut next: Vec<Chromosome> = elite_indices(fitness, config.elite_count)
        .into_iter()
        .map(|i| population[i].clone())
        .collect();

    while next.len() < config.population_size {
        let parent1 = &population[tournament_selection(fitness, config.tournament_size, rng)];
        let parent2 = &population[tournament_selection(fitness, config.tournament_size, rng)];

        let mut child = if rng.gen_bool(config.crossover_rate) {
            crossover(pi, parent1, parent2, rng)
        } else {
            parent1.clone()
        };

        if rng.gen_bool(config.mutation_rate) {
            if let Some(kind) = mutate(&mut child, rng) {
                trace!("Applied {:?} mutation", kind);
            }
        }

        if rng.gen_bool(config.local_search_rate) {
            improve(pi, &mut child);
        }

        validate(pi, &child)?;
        next.push(child);
    }

    Ok(next)
}

/// One generation: breed from the scored population, then score the result.
pub fn step(
    pi: &ProblemInstance,
    config: &GaConfig,
    population: Vec<Chromosome>,
    fitness: &[Fitness],
    rng: &mut ChaCha8Rng,
) -> Result<(Vec<Chromosome>, Vec<Fitness>), CodecError> {
    let next = breed(pi, config, &population, fitness, rng)?;
    let next_fitness = evaluate_population(pi, &next)?;
    Ok((next, next_fitness))
}

/// Runs the genetic search to termination and returns the best solution ever seen.
pub fn solve(pi: &ProblemInstance, config: &GaConfig) -> Result<SearchOutcome, VrpError> {
    config.validate()?;

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut population = initial_population(pi, config.population_size, &mut rng);
    let mut fitness = evaluate_population(pi, &population)?;
    let mut state = SearchState::new(&population, &fitness);

    info!(
        "Initial best fitness {:.2} over {} individuals",
        state.best_fitness.value,
        population.len()
    );

    let loop_span = span!(Level::INFO, "generations", total = config.generations);
    let _loop_guard = loop_span.enter();

    let mut generation = 0;
    let termination = loop {
        if generation >= config.generations {
            break Termination::GenerationLimit;
        }
        generation += 1;

        let gen_span = span!(Level::DEBUG, "generation", generation);
        let _gen_guard = gen_span.enter();

        (population, fitness) = step(pi, config, population, &fitness, &mut rng)?;
        state.observe(generation, &population, &fitness);
        debug!(
            "Generation {}: best-ever {:.2}, stagnation {}",
            generation, state.best_fitness.value, state.stagnation
        );

        if let Some(reason) = state.termination(config, generation) {
            break reason;
        }
    };

    info!(
        "Search finished after {} generations ({:?}); best found at generation {}",
        generation, termination, state.best_so_far_generation
    );

    let solution = decode(pi, &state.best_so_far)?;
    Ok(SearchOutcome {
        best: state.best_so_far,
        fitness: state.best_fitness,
        solution,
        generations: generation,
        termination,
        history: state.history,
    })
}

/// Initialize tracing and environment
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_span_events(fmt::format::FmtSpan::CLOSE))
        .init();
}

/// Process entry point: generate a world, optimize it and write the reports.
pub fn run() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let config = GaConfig::from_env()?;

    let world = generate_random_inputs(config.seed);
    let pi = {
        let span = span!(Level::INFO, "setup");
        let _guard = span.enter();
        setup(world)?
    };

    let outcome = solve(&pi, &config)?;
    print_solution(&pi, &outcome.solution, &outcome.fitness);

    save_routes(&pi, &outcome, ROUTES_REPORT_PATH)?;
    save_solution_json(&outcome.solution, SOLUTION_JSON_PATH)?;
    save_to_csv(&outcome.history, HISTORY_CSV_PATH)?;
    plot_routes(&pi, &outcome.solution, ROUTES_PLOT_PATH)?;

    info!("Results saved to: {}", ROUTES_REPORT_PATH);
    Ok(())
}
