pub mod history;
pub mod plot;
pub mod routes;

pub use history::*;
pub use plot::*;
pub use routes::*;
