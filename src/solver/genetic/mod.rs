pub mod chromosome;
pub mod local_search;
pub mod operators;
pub mod search;
pub mod selection;

pub use chromosome::*;
pub use search::*;
