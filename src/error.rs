use thiserror::Error;

/// Problems with the input data or the tunables, detected before the search starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("the fleet has no vehicles")]
    NoVehicles,

    #[error("there are no warehouses")]
    NoWarehouses,

    #[error("population size must be at least 1")]
    EmptyPopulation,

    #[error("elite count {elite} exceeds population size {population}")]
    EliteExceedsPopulation { elite: usize, population: usize },

    #[error("{name} must lie in [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error("tournament size must be at least 1")]
    EmptyTournament,

    #[error("stagnation limit must be at least 1")]
    ZeroStagnationLimit,

    #[error("point {point} demands {total}kg, expected {min}..={max}kg")]
    DemandOutOfRange {
        point: usize,
        total: u64,
        min: u32,
        max: u32,
    },

    #[error("vehicle {vehicle} is based at unknown warehouse {warehouse}")]
    UnknownHomeWarehouse { vehicle: usize, warehouse: usize },

    #[error("{kind} at index {index} carries id {id}")]
    IdMismatch {
        kind: &'static str,
        index: usize,
        id: usize,
    },

    #[error("cannot parse {key}={value}")]
    InvalidValue { key: String, value: String },
}

/// A chromosome that does not describe a structurally valid assignment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("expected {expected} routes, found {found}")]
    RouteCountMismatch { expected: usize, found: usize },

    #[error("gene {0} is not a known point")]
    UnknownPoint(usize),

    #[error("point {0} is visited more than once")]
    DuplicatePoint(usize),

    #[error("point {0} is not visited")]
    MissingPoint(usize),
}

#[derive(Debug, Error)]
pub enum VrpError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("chromosome invariant violated: {0}")]
    Codec(#[from] CodecError),
}
