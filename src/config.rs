use std::env;
use std::str::FromStr;

use dotenv::dotenv;
use tracing::{debug, info};

use crate::error::ConfigError;

pub mod constant {
    // Genetic search defaults
    pub const POPULATION_SIZE: usize = 50;
    pub const GENERATIONS: usize = 100;
    pub const CROSSOVER_RATE: f64 = 0.7;
    pub const MUTATION_RATE: f64 = 0.2;
    pub const ELITE_COUNT: usize = 2;
    pub const TOURNAMENT_SIZE: usize = 3;
    pub const STAGNATION_LIMIT: usize = 50;
    pub const LOCAL_SEARCH_RATE: f64 = 0.2;
    pub const SEED: u64 = 1;

    /// Fitness cost per kg of overflow.
    pub const PENALTY_WEIGHT: f64 = 1_000.0;

    // World generation
    pub const WAREHOUSE_POSITIONS: [(f64, f64); 5] =
        [(10.0, 10.0), (90.0, 10.0), (10.0, 90.0), (90.0, 90.0), (50.0, 50.0)];
    pub const DELIVERY_POINTS: usize = 20;
    pub const PICKUP_POINTS: usize = 10;
    pub const VEHICLE_CAPACITIES: [u32; 4] = [1000, 1500, 2000, 2000];
    pub const MIN_POINT_DEMAND: u32 = 100;
    pub const MAX_POINT_DEMAND: u32 = 200;
    pub const COORD_MIN: i32 = 10;
    pub const COORD_MAX: i32 = 90;

    // Report output
    pub const ROUTES_REPORT_PATH: &str = "output/routes_pickup_delivery.txt";
    pub const SOLUTION_JSON_PATH: &str = "output/solution.json";
    pub const HISTORY_CSV_PATH: &str = "output/best_so_far.csv";
    pub const ROUTES_PLOT_PATH: &str = "output/routes.png";
}

/// Tunables of the genetic search.
#[derive(Debug, Clone, PartialEq)]
pub struct GaConfig {
    pub population_size: usize,
    pub generations: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub elite_count: usize,
    pub tournament_size: usize,
    /// Consecutive generations without strict improvement before stopping.
    pub stagnation_limit: usize,
    /// Probability of running 2-opt on a bred child.
    pub local_search_rate: f64,
    /// Stop as soon as a feasible solution at most this long is found.
    pub target_distance: Option<f64>,
    pub seed: u64,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: constant::POPULATION_SIZE,
            generations: constant::GENERATIONS,
            crossover_rate: constant::CROSSOVER_RATE,
            mutation_rate: constant::MUTATION_RATE,
            elite_count: constant::ELITE_COUNT,
            tournament_size: constant::TOURNAMENT_SIZE,
            stagnation_limit: constant::STAGNATION_LIMIT,
            local_search_rate: constant::LOCAL_SEARCH_RATE,
            target_distance: None,
            seed: constant::SEED,
        }
    }
}

impl GaConfig {
    /// Builds the configuration from defaults overridden by `VRP_*` variables.
    /// A `.env` file in the working directory is read first when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let defaults = Self::default();
        let config = Self {
            population_size: env_or("VRP_POPULATION_SIZE", defaults.population_size)?,
            generations: env_or("VRP_GENERATIONS", defaults.generations)?,
            crossover_rate: env_or("VRP_CROSSOVER_RATE", defaults.crossover_rate)?,
            mutation_rate: env_or("VRP_MUTATION_RATE", defaults.mutation_rate)?,
            elite_count: env_or("VRP_ELITE_COUNT", defaults.elite_count)?,
            tournament_size: env_or("VRP_TOURNAMENT_SIZE", defaults.tournament_size)?,
            stagnation_limit: env_or("VRP_STAGNATION_LIMIT", defaults.stagnation_limit)?,
            local_search_rate: env_or("VRP_LOCAL_SEARCH_RATE", defaults.local_search_rate)?,
            target_distance: match env::var("VRP_TARGET_DISTANCE") {
                Ok(raw) => Some(parse_value("VRP_TARGET_DISTANCE", &raw)?),
                Err(_) => defaults.target_distance,
            },
            seed: env_or("VRP_SEED", defaults.seed)?,
        };

        config.validate()?;
        info!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.elite_count > self.population_size {
            return Err(ConfigError::EliteExceedsPopulation {
                elite: self.elite_count,
                population: self.population_size,
            });
        }
        if self.tournament_size == 0 {
            return Err(ConfigError::EmptyTournament);
        }
        if self.stagnation_limit == 0 {
            return Err(ConfigError::ZeroStagnationLimit);
        }

        for (name, value) in [
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
            ("local_search_rate", self.local_search_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { name, value });
            }
        }

        Ok(())
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    debug!("Override {}={}", key, raw);
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(GaConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_elite_larger_than_population() {
        let config = GaConfig {
            population_size: 4,
            elite_count: 5,
            ..GaConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::EliteExceedsPopulation {
                elite: 5,
                population: 4
            })
        );
    }

    #[test]
    fn rejects_probability_outside_unit_interval() {
        let config = GaConfig {
            mutation_rate: 1.5,
            ..GaConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ProbabilityOutOfRange {
                name: "mutation_rate",
                ..
            })
        ));

        let config = GaConfig {
            crossover_rate: -0.1,
            ..GaConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_population_and_tournament() {
        let config = GaConfig {
            population_size: 0,
            elite_count: 0,
            ..GaConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyPopulation));

        let config = GaConfig {
            tournament_size: 0,
            ..GaConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyTournament));
    }

    #[test]
    fn rejects_zero_stagnation_limit() {
        let config = GaConfig {
            stagnation_limit: 0,
            ..GaConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroStagnationLimit));
    }

    #[test]
    fn parse_value_reports_key() {
        let err = parse_value::<usize>("VRP_GENERATIONS", "many").unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "VRP_GENERATIONS".to_string(),
                value: "many".to_string()
            }
        );
    }
}
