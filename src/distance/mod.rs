pub mod matrix;

use crate::domain::types::Coord;

/// Straight-line distance between two coordinates.
pub fn euclidean(a: Coord, b: Coord) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euclidean_is_symmetric() {
        let a = Coord::new(10.0, 10.0);
        let b = Coord::new(13.0, 14.0);
        assert_eq!(euclidean(a, b), 5.0);
        assert_eq!(euclidean(b, a), 5.0);
        assert_eq!(euclidean(a, a), 0.0);
    }
}
