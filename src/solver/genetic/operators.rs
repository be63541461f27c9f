use rand::seq::{index, SliceRandom};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use super::chromosome::{repair, Chromosome};
use crate::domain::types::ProblemInstance;
use crate::utils::random_segment;

/// Two-point segment exchange followed by repair.
pub fn crossover(
    pi: &ProblemInstance,
    parent1: &Chromosome,
    parent2: &Chromosome,
    rng: &mut ChaCha8Rng,
) -> Chromosome {
    repair(pi, segment_exchange(parent1, parent2, rng))
}

/// Copies `parent1` and overwrites a random index range of one vehicle's
/// segment with the genes `parent2` holds at the same positions. The result may
/// visit some points twice and miss others until it is repaired.
pub fn segment_exchange(
    parent1: &Chromosome,
    parent2: &Chromosome,
    rng: &mut ChaCha8Rng,
) -> Chromosome {
    let mut child = parent1.clone();

    let donors: Vec<usize> = (0..parent2.routes.len())
        .filter(|&v| !parent2.routes[v].is_empty())
        .collect();
    let Some(&vehicle) = donors.choose(rng) else {
        return child;
    };

    let donor = &parent2.routes[vehicle];
    let (start, end) = random_segment(rng, donor.len());
    if child.routes.len() <= vehicle {
        child.routes.resize_with(vehicle + 1, Vec::new);
    }

    let target = &mut child.routes[vehicle];
    for (i, &gene) in donor.iter().enumerate().take(end + 1).skip(start) {
        if i < target.len() {
            target[i] = gene;
        } else {
            target.push(gene);
        }
    }

    trace!("Exchanged genes {}..={} of vehicle {}", start, end, vehicle);
    child
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Swap two genes anywhere in the chromosome.
    Swap,
    /// Reverse a sub-segment of one route.
    Reverse,
    /// Move one point into another vehicle's route.
    Reassign,
}

impl MutationKind {
    pub const ALL: [MutationKind; 3] = [
        MutationKind::Swap,
        MutationKind::Reverse,
        MutationKind::Reassign,
    ];

    fn applies_to(self, chromosome: &Chromosome) -> bool {
        match self {
            MutationKind::Swap => chromosome.len() >= 2,
            MutationKind::Reverse => chromosome.routes.iter().any(|r| r.len() >= 2),
            MutationKind::Reassign => chromosome.routes.len() >= 2 && !chromosome.is_empty(),
        }
    }
}

/// Applies one mutation chosen uniformly among those that can change the
/// chromosome. The point multiset is never altered.
pub fn mutate(chromosome: &mut Chromosome, rng: &mut ChaCha8Rng) -> Option<MutationKind> {
    let applicable: Vec<MutationKind> = MutationKind::ALL
        .into_iter()
        .filter(|kind| kind.applies_to(chromosome))
        .collect();
    let kind = *applicable.choose(rng)?;

    match kind {
        MutationKind::Swap => swap_mutation(chromosome, rng),
        MutationKind::Reverse => reverse_mutation(chromosome, rng),
        MutationKind::Reassign => reassign_mutation(chromosome, rng),
    }

    Some(kind)
}

fn swap_mutation(chromosome: &mut Chromosome, rng: &mut ChaCha8Rng) {
    let picked = index::sample(rng, chromosome.len(), 2);
    let (Some((va, oa)), Some((vb, ob))) = (
        chromosome.locate(picked.index(0)),
        chromosome.locate(picked.index(1)),
    ) else {
        return;
    };

    if va == vb {
        chromosome.routes[va].swap(oa, ob);
    } else {
        let gene = chromosome.routes[va][oa];
        chromosome.routes[va][oa] = chromosome.routes[vb][ob];
        chromosome.routes[vb][ob] = gene;
    }
}

fn reverse_mutation(chromosome: &mut Chromosome, rng: &mut ChaCha8Rng) {
    let candidates: Vec<usize> = (0..chromosome.routes.len())
        .filter(|&v| chromosome.routes[v].len() >= 2)
        .collect();
    let Some(&vehicle) = candidates.choose(rng) else {
        return;
    };

    let route = &mut chromosome.routes[vehicle];
    let (start, end) = random_segment(rng, route.len());
    route[start..=end].reverse();
}

fn reassign_mutation(chromosome: &mut Chromosome, rng: &mut ChaCha8Rng) {
    let num_of_vehicles = chromosome.routes.len();
    let position = rng.gen_range(0..chromosome.len());
    let Some((from, offset)) = chromosome.locate(position) else {
        return;
    };

    let mut to = rng.gen_range(0..num_of_vehicles - 1);
    if to >= from {
        to += 1;
    }

    let gene = chromosome.routes[from].remove(offset);
    let at = rng.gen_range(0..=chromosome.routes[to].len());
    chromosome.routes[to].insert(at, gene);
}
