use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::evaluation::fitness::Fitness;

/// Tournament of `size` contestants drawn with replacement; returns the index
/// of the fittest. Ties go to the earlier draw.
pub fn tournament_selection(fitness: &[Fitness], size: usize, rng: &mut ChaCha8Rng) -> usize {
    let mut winner = rng.gen_range(0..fitness.len());
    for _ in 1..size {
        let contestant = rng.gen_range(0..fitness.len());
        if fitness[contestant].value < fitness[winner].value {
            winner = contestant;
        }
    }
    winner
}

/// Indices of the `count` fittest individuals, best first. Equal fitness keeps
/// population order.
pub fn elite_indices(fitness: &[Fitness], count: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fitness.len()).collect();
    order.sort_by(|&a, &b| fitness[a].value.total_cmp(&fitness[b].value));
    order.truncate(count);
    order
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn scores(values: &[f64]) -> Vec<Fitness> {
        values
            .iter()
            .map(|&value| Fitness {
                distance: value,
                overflow: 0,
                value,
            })
            .collect()
    }

    #[test]
    fn elites_are_sorted_and_stable() {
        let fitness = scores(&[30.0, 10.0, 20.0, 10.0]);
        assert_eq!(elite_indices(&fitness, 3), vec![1, 3, 2]);
        assert_eq!(elite_indices(&fitness, 0), Vec::<usize>::new());
        assert_eq!(elite_indices(&fitness, 9).len(), 4);
    }

    #[test]
    fn every_individual_can_win() {
        let fitness = scores(&[5.0, 4.0, 3.0, 2.0, 1.0]);
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let mut wins = [0usize; 5];

        for _ in 0..5000 {
            wins[tournament_selection(&fitness, 3, &mut rng)] += 1;
        }

        assert!(wins.iter().all(|&w| w > 0), "{:?}", wins);
        assert!(wins[4] > wins[0]);
    }

    #[test]
    fn single_contestant_is_uniform_draw() {
        let fitness = scores(&[1.0, 1.0]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let picks: Vec<usize> = (0..100)
            .map(|_| tournament_selection(&fitness, 1, &mut rng))
            .collect();
        assert!(picks.contains(&0) && picks.contains(&1));
    }
}
