use std::error::Error;
use std::path::Path;

use csv::Writer;

use super::routes::ensure_parent_dir;

/// Writes the best-ever fitness trajectory, one row per generation.
pub fn save_to_csv(history: &[f64], filename: &str) -> Result<(), Box<dyn Error>> {
    ensure_parent_dir(Path::new(filename))?;
    let mut wtr = Writer::from_path(filename)?;

    wtr.write_record(["generation", "best_fitness"])?;
    for (generation, value) in history.iter().enumerate() {
        wtr.write_record([generation.to_string(), format!("{:.4}", value)])?;
    }

    wtr.flush()?;
    Ok(())
}
