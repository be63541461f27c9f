use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Random inclusive index range `(start, end)` within `0..len`. `len` must be non-zero.
pub fn random_segment(rng: &mut ChaCha8Rng, len: usize) -> (usize, usize) {
    let a = rng.gen_range(0..len);
    let b = rng.gen_range(0..len);
    ordered_pair(a, b)
}

pub fn ordered_pair(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
