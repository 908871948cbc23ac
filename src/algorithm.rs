use std::fmt;
use std::ops::RangeInclusive;
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::partition::{lower_bound, Partition};
use crate::{cga, greedy, lrm, multifit, Weight};

/// Data structure that contains various statistics collected while partitioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats<T> {
    /// makespan of the returned partition (maximum group sum)
    pub makespan: T,
    /// trivial lower bound `ceil(total / n)` on the makespan
    pub lower_bound: T,
    /// number of groups
    pub num_groups: usize,
    /// number of weights
    pub num_weights: usize,
    /// elapsed time since partitioning started
    pub elapsed: Duration,
    /// no. search nodes expanded by CGA
    pub expanded: u64,
    /// no. branches pruned by CGA because they could not beat the incumbent
    pub pruned: u64,
    /// true iff the makespan is known to be optimal
    pub proved_optimal: bool,
}

impl<T: Weight> Stats<T> {
    /// Create new stats for a heuristic. All search-related statistics are set to 0 and the
    /// solution counts as optimal only if it meets the lower bound.
    pub fn approx(
        makespan: T,
        lower_bound: T,
        num_groups: usize,
        num_weights: usize,
        elapsed: Duration,
    ) -> Self {
        Self {
            makespan,
            lower_bound,
            num_groups,
            num_weights,
            elapsed,
            expanded: 0,
            pruned: 0,
            proved_optimal: makespan == lower_bound,
        }
    }

    /// Range of values in which the optimal makespan must lie.
    pub fn optimality_range(&self) -> RangeInclusive<T> {
        if self.proved_optimal {
            self.makespan..=self.makespan
        } else {
            self.lower_bound..=self.makespan
        }
    }
}

/// Partitioning algorithm to run through a uniform interface.
///
/// # Examples
/// ```
/// # extern crate partition;
/// use partition::Algorithm;
///
/// let weights: Vec<u32> = vec![8, 7, 6, 5, 4];
///
/// let (p, stats) = Algorithm::LPT.partition(&weights, 2).unwrap();
/// assert_eq!(p.makespan(), 17);
/// assert!(!stats.proved_optimal);
///
/// let (p, stats) = Algorithm::Cga { timeout: None }.partition(&weights, 2).unwrap();
/// assert_eq!(p.makespan(), 15);
/// assert!(stats.proved_optimal);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// List Scheduling in input order
    LS,
    /// Longest Processing Time First
    LPT,
    /// MULTIFIT with given number of binary search rounds
    Multifit { iterations: usize },
    /// Longest Remaining Magnitude
    Lrm,
    /// Complete Greedy Algorithm, optionally bounded in time
    Cga { timeout: Option<Duration> },
}

impl Algorithm {
    /// All algorithms with their default parameters, from the fastest to the exact one.
    pub fn all() -> [Self; 5] {
        [
            Self::LS,
            Self::LPT,
            Self::Multifit {
                iterations: multifit::DEFAULT_ITERATIONS,
            },
            Self::Lrm,
            Self::Cga { timeout: None },
        ]
    }

    /// Short name of the algorithm, also used as CSV column prefix.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LS => "LS",
            Self::LPT => "LPT",
            Self::Multifit { .. } => "MULTIFIT",
            Self::Lrm => "LRM",
            Self::Cga { .. } => "CGA",
        }
    }

    /// Run this algorithm on given `weights` and number of groups `n`.
    pub fn partition<T: Weight>(&self, weights: &[T], n: usize) -> Result<(Partition<T>, Stats<T>)> {
        let start = Instant::now();

        let partition = match *self {
            Self::LS => greedy::ls(weights, n)?,
            Self::LPT => greedy::lpt(weights, n)?,
            Self::Multifit { iterations } => {
                multifit::multifit_with_iterations(weights, n, iterations)?
            }
            Self::Lrm => lrm::lrm(weights, n)?,
            // CGA collects search statistics on its own
            Self::Cga { timeout } => return cga::cga_with_timeout(weights, n, timeout),
        };

        let elapsed = start.elapsed();
        let stats = Stats::approx(
            partition.makespan(),
            lower_bound(weights, n)?,
            n,
            weights.len(),
            elapsed,
        );

        Ok((partition, stats))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
