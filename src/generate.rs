//! Random instance generation.
//!
//! All generators draw from a caller-supplied [Rng], so a seeded generator reproduces the same
//! instances.
use log::debug;
use rand::distributions::{Distribution, Uniform};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::cga::cga;
use crate::error::{check_groups, Error, Result};
use crate::instance::Instance;

/// Largest supported number of bits per generated weight.
pub const MAX_BITS: u32 = 32;

/// How the weights of an instance are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Weights are cut out of `n` equal group sums, so the optimum is known by construction.
    Balanced,
    /// Weights are drawn uniformly from `[1, 2^b - 1]` and the optimum is found by CGA.
    Random,
}

impl Strategy {
    /// Generate `m` weights for `n` groups with `b` bits, returning `(optimal makespan, weights)`.
    pub fn generate<R>(&self, n: usize, m: usize, b: u32, rng: &mut R) -> Result<(u64, Vec<u64>)>
    where
        R: Rng + ?Sized,
    {
        match self {
            Self::Balanced => balanced(n, m, b, rng),
            Self::Random => random(n, m, b, rng),
        }
    }
}

fn check_parameters(n: usize, m: usize, b: u32) -> Result<()> {
    check_groups(n)?;
    if m < n {
        return Err(Error::InvalidArgument(
            "number of weights must be at least the number of groups",
        ));
    }
    if b == 0 || b > MAX_BITS {
        return Err(Error::InvalidArgument("number of bits must be in 1..=32"));
    }
    Ok(())
}

/// Generate `m` weights that split into `n` groups of exactly the same sum.
///
/// The total is drawn from `[lb, 2*lb]` where `lb = 2^(b-1) * m`, then each group sum is cut into
/// `m / n` or `m / n + 1` positive parts and all the parts are shuffled. The optimal makespan is
/// the common group sum.
pub fn balanced<R>(n: usize, m: usize, b: u32, rng: &mut R) -> Result<(u64, Vec<u64>)>
where
    R: Rng + ?Sized,
{
    check_parameters(n, m, b)?;

    let lb = (1u64 << (b - 1)) * m as u64;
    let total = rng.gen_range(lb..=2 * lb);

    let (q, r) = (m / n, m % n);

    // each group must be able to hold one unit per part
    let group_sum = (total / n as u64).max((q + usize::from(r > 0)) as u64);

    let mut values = Vec::with_capacity(m);

    for g in 0..n {
        let size = if g < r { q + 1 } else { q };
        let mut remaining = group_sum;

        for k in 0..size {
            let rest = (size - k - 1) as u64;
            if rest == 0 {
                values.push(remaining);
            } else {
                let value = rng.gen_range(1..=remaining - rest);
                values.push(value);
                remaining -= value;
            }
        }
    }

    values.shuffle(rng);

    Ok((group_sum, values))
}

/// Generate `m` weights uniformly from `[1, 2^b - 1]` and compute the optimum with [cga].
pub fn random<R>(n: usize, m: usize, b: u32, rng: &mut R) -> Result<(u64, Vec<u64>)>
where
    R: Rng + ?Sized,
{
    check_parameters(n, m, b)?;

    let dist = Uniform::new_inclusive(1u64, (1u64 << b) - 1);
    let values = dist.sample_iter(&mut *rng).take(m).collect::<Vec<_>>();

    let optimal = cga(&values, n)?.makespan();

    Ok((optimal, values))
}

/// Parameters of a batch of generated instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// numbers of groups `n`
    pub groups: Vec<usize>,
    /// weights per instance range over `n..=max_weights`
    pub max_weights: usize,
    /// numbers of bits `b`
    pub bits: Vec<u32>,
    /// instances per `(n, m, b)` combination
    pub repeat: usize,
    pub strategy: Strategy,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            groups: vec![2, 3, 4, 5],
            max_weights: 20,
            bits: vec![4, 8, 16],
            repeat: 5,
            strategy: Strategy::Balanced,
        }
    }
}

/// Generate `repeat` instances for every combination of `n` in `groups`, `m` in
/// `n..=max_weights` and `b` in `bits`. Instances are numbered from 1.
pub fn generate_instances<R>(config: &GeneratorConfig, rng: &mut R) -> Result<Vec<Instance>>
where
    R: Rng + ?Sized,
{
    let mut instances = Vec::new();

    for &n in config.groups.iter() {
        for m in n..=config.max_weights {
            for &b in config.bits.iter() {
                debug!("Generating instances for config n={n} m={m} b={b}");
                for _ in 0..config.repeat {
                    let (optimal, weights) = config.strategy.generate(n, m, b, rng)?;
                    instances.push(Instance::new(instances.len() + 1, n, b, optimal, weights));
                }
            }
        }
    }

    Ok(instances)
}
