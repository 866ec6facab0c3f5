//! Crossover and mutation strategies for fixed-length integer encodings.
//!
//! The strategy traits [`Crossover`] and [`Mutation`] are independent
//! contracts: any type implementing them plugs into
//! [`GaRunner`](super::GaRunner). The concrete strategies here work on
//! `Vec` encodings where gene `i` is one choice out of a fixed alphabet
//! (for a policy: the action taken in state `i`).
//!
//! # Crossover Operators
//!
//! - [`single_point_crossover`]: split both parents at one random cut
//!
//! # Mutation Operators
//!
//! - [`resample_mutation`]: per-gene replacement by a different symbol
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and
//!   Machine Learning*, Ch. 3

use super::types::Individual;
use crate::error::{Error, Result};
use rand::Rng;

/// Combines two parents into offspring.
pub trait Crossover<I: Individual>: Send + Sync {
    /// Produces offspring from `parent1` and `parent2`. Parents are not
    /// modified.
    fn mate<R: Rng>(&self, parent1: &I, parent2: &I, rng: &mut R) -> Result<Vec<I>>;
}

/// Perturbs an individual.
pub trait Mutation<I: Individual>: Send + Sync {
    /// Mutates `individual` **in place**, each gene with probability
    /// `rate`. An individual whose encoding changed has lost its cached
    /// fitness.
    fn mutate<R: Rng>(&self, individual: &mut I, rate: f64, rng: &mut R) -> Result<()>;
}

// ============================================================================
// Crossover operators
// ============================================================================

/// Single-point crossover at a fixed cut.
///
/// Child A is `parent1[..cut] + parent2[cut..]`, child B is
/// `parent2[..cut] + parent1[cut..]`.
pub fn crossover_at<G: Clone>(parent1: &[G], parent2: &[G], cut: usize) -> Result<(Vec<G>, Vec<G>)> {
    let n = parent1.len();
    if n != parent2.len() {
        return Err(Error::InvalidEncoding(format!(
            "parents have different lengths ({n} and {})",
            parent2.len()
        )));
    }
    if cut > n {
        return Err(Error::InvalidEncoding(format!(
            "cut {cut} beyond encoding length {n}"
        )));
    }
    let child_a = parent1[..cut].iter().chain(&parent2[cut..]).cloned().collect();
    let child_b = parent2[..cut].iter().chain(&parent1[cut..]).cloned().collect();
    Ok((child_a, child_b))
}

/// Single-point crossover at a random cut in `[1, len - 1]`.
///
/// Encodings shorter than 2 have no interior cut; the cut falls at the
/// end, so child A copies `parent1` and child B copies `parent2`.
///
/// # Complexity
/// O(n) time, O(n) space
pub fn single_point_crossover<G: Clone, R: Rng>(
    parent1: &[G],
    parent2: &[G],
    rng: &mut R,
) -> Result<(Vec<G>, Vec<G>)> {
    let n = parent1.len();
    let cut = if n < 2 { n } else { rng.random_range(1..n) };
    crossover_at(parent1, parent2, cut)
}

/// Strategy wrapper for [`single_point_crossover`].
///
/// Always produces exactly two children, built by cloning the parents and
/// replacing their encodings, so the children start unevaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinglePointCrossover;

impl<I, G> Crossover<I> for SinglePointCrossover
where
    I: Individual<Encoding = Vec<G>>,
    G: Clone + Send + Sync,
{
    fn mate<R: Rng>(&self, parent1: &I, parent2: &I, rng: &mut R) -> Result<Vec<I>> {
        let (genes_a, genes_b) = single_point_crossover(parent1.encoding(), parent2.encoding(), rng)?;
        let mut child_a = parent1.clone();
        child_a.set_encoding(genes_a)?;
        let mut child_b = parent2.clone();
        child_b.set_encoding(genes_b)?;
        Ok(vec![child_a, child_b])
    }
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Per-gene resampling mutation over the alphabet `0..alphabet`.
///
/// Each gene is, with probability `rate`, replaced by a uniformly drawn
/// symbol different from its current one (rejection sampling). With an
/// alphabet of one symbol no different value exists and nothing changes.
///
/// Returns the number of genes changed.
///
/// # Complexity
/// O(n) expected
pub fn resample_mutation<R: Rng>(genes: &mut [usize], alphabet: usize, rate: f64, rng: &mut R) -> usize {
    if alphabet < 2 {
        return 0;
    }
    let mut changed = 0;
    for gene in genes.iter_mut() {
        if rng.random_range(0.0..1.0) < rate {
            let old = *gene;
            *gene = loop {
                let candidate = rng.random_range(0..alphabet);
                if candidate != old {
                    break candidate;
                }
            };
            changed += 1;
        }
    }
    changed
}

/// Strategy wrapper for [`resample_mutation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResampleMutation {
    alphabet: usize,
}

impl ResampleMutation {
    /// Creates a mutation drawing genes from `0..alphabet`.
    pub fn new(alphabet: usize) -> Result<Self> {
        if alphabet == 0 {
            return Err(Error::Configuration("mutation alphabet must not be empty".into()));
        }
        Ok(Self { alphabet })
    }

    /// Number of distinct gene values.
    pub fn alphabet(&self) -> usize {
        self.alphabet
    }
}

impl<I> Mutation<I> for ResampleMutation
where
    I: Individual<Encoding = Vec<usize>>,
{
    fn mutate<R: Rng>(&self, individual: &mut I, rate: f64, rng: &mut R) -> Result<()> {
        let mut genes = individual.encoding().clone();
        if resample_mutation(&mut genes, self.alphabet, rate, rng) > 0 {
            individual.set_encoding(genes)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[derive(Clone, Debug)]
    struct Genes {
        genes: Vec<usize>,
        fitness: Option<f64>,
    }

    impl Individual for Genes {
        type Encoding = Vec<usize>;
        fn encoding(&self) -> &Vec<usize> {
            &self.genes
        }
        fn set_encoding(&mut self, genes: Vec<usize>) -> Result<()> {
            self.genes = genes;
            self.fitness = None;
            Ok(())
        }
        fn fitness(&self) -> Option<f64> {
            self.fitness
        }
    }

    // ---- Single-point crossover ----

    #[test]
    fn test_crossover_at_fixed_cut() {
        let p1 = vec![0, 0, 0, 0, 0];
        let p2 = vec![1, 1, 1, 1, 1];
        let (a, b) = crossover_at(&p1, &p2, 2).unwrap();
        assert_eq!(a, vec![0, 0, 1, 1, 1]);
        assert_eq!(b, vec![1, 1, 0, 0, 0]);
    }

    #[test]
    fn test_crossover_rejects_mismatched_parents() {
        assert!(matches!(
            crossover_at(&[0, 1], &[0, 1, 2], 1),
            Err(Error::InvalidEncoding(_))
        ));
        assert!(crossover_at(&[0, 1], &[1, 0], 3).is_err());
    }

    #[test]
    fn test_random_cut_is_interior() {
        let mut rng = create_rng(42);
        let p1 = vec![0; 6];
        let p2 = vec![1; 6];
        for _ in 0..200 {
            let (a, b) = single_point_crossover(&p1, &p2, &mut rng).unwrap();
            let cut = a.iter().position(|&g| g == 1).expect("cut must be before the end");
            assert!((1..6).contains(&cut), "cut {cut} not interior");
            assert!(a[..cut].iter().all(|&g| g == 0));
            assert!(a[cut..].iter().all(|&g| g == 1));
            assert!(b[..cut].iter().all(|&g| g == 1));
            assert!(b[cut..].iter().all(|&g| g == 0));
        }
    }

    #[test]
    fn test_short_encodings_copy_parents() {
        let mut rng = create_rng(42);
        let (a, b) = single_point_crossover(&[3], &[4], &mut rng).unwrap();
        assert_eq!((a, b), (vec![3], vec![4]));
        let (a, b) = single_point_crossover::<usize, _>(&[], &[], &mut rng).unwrap();
        assert!(a.is_empty() && b.is_empty());
    }

    #[test]
    fn test_strategy_produces_two_unevaluated_children() {
        let mut rng = create_rng(9);
        let p1 = Genes {
            genes: vec![0, 0, 0, 0],
            fitness: Some(1.0),
        };
        let p2 = Genes {
            genes: vec![2, 2, 2, 2],
            fitness: Some(2.0),
        };
        let children = SinglePointCrossover.mate(&p1, &p2, &mut rng).unwrap();
        assert_eq!(children.len(), 2);
        for child in &children {
            assert_eq!(child.genes.len(), 4);
            assert!(child.fitness.is_none());
        }
        assert_eq!(p1.fitness, Some(1.0));
    }

    // ---- Resample mutation ----

    #[test]
    fn test_mutation_rate_one_changes_every_gene() {
        let mut rng = create_rng(42);
        let original = vec![0, 1, 2, 3, 0, 1];
        let mut genes = original.clone();
        let changed = resample_mutation(&mut genes, 4, 1.0, &mut rng);
        assert_eq!(changed, 6);
        for (old, new) in original.iter().zip(&genes) {
            assert_ne!(old, new);
            assert!(*new < 4);
        }
    }

    #[test]
    fn test_mutation_rate_zero_is_identity() {
        let mut rng = create_rng(42);
        let mut genes = vec![0, 1, 2, 3];
        assert_eq!(resample_mutation(&mut genes, 4, 0.0, &mut rng), 0);
        assert_eq!(genes, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_single_symbol_alphabet_never_loops() {
        let mut rng = create_rng(42);
        let mut genes = vec![0, 0, 0];
        assert_eq!(resample_mutation(&mut genes, 1, 1.0, &mut rng), 0);
        assert_eq!(genes, vec![0, 0, 0]);
    }

    #[test]
    fn test_mutation_frequency_matches_rate() {
        let mut rng = create_rng(5);
        let mut genes = vec![0; 10_000];
        let changed = resample_mutation(&mut genes, 3, 0.1, &mut rng);
        assert!((800..1200).contains(&changed), "changed {changed}");
    }

    #[test]
    fn test_strategy_mutates_in_place_and_invalidates() {
        let mut rng = create_rng(1);
        let mutation = ResampleMutation::new(3).unwrap();
        let mut ind = Genes {
            genes: vec![0, 0, 0],
            fitness: Some(5.0),
        };
        mutation.mutate(&mut ind, 1.0, &mut rng).unwrap();
        assert!(ind.genes.iter().all(|&g| g == 1 || g == 2));
        assert!(ind.fitness.is_none());
    }

    #[test]
    fn test_strategy_keeps_cache_when_nothing_changes() {
        let mut rng = create_rng(1);
        let mutation = ResampleMutation::new(3).unwrap();
        let mut ind = Genes {
            genes: vec![0, 0, 0],
            fitness: Some(5.0),
        };
        mutation.mutate(&mut ind, 0.0, &mut rng).unwrap();
        assert_eq!(ind.fitness, Some(5.0));
        assert!(ResampleMutation::new(0).is_err());
    }
}
