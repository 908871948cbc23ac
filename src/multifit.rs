//! **MULTIFIT** heuristic and its **First Fit Decreasing (FFD)** bin packing subroutine.
use log::{debug, trace};

use crate::error::{check_groups, Error, Result};
use crate::greedy::sort_descending;
use crate::partition::{Group, Partition};
use crate::Weight;

/// Number of binary search rounds [multifit] runs by default.
pub const DEFAULT_ITERATIONS: usize = 7;

/// Pack `weights` into bins of given `capacity` using First Fit: each weight goes to the first
/// (oldest) bin that still has room for it, or opens a new bin.
///
/// The weights are expected to be sorted in non-increasing order (which makes this FFD). This is
/// the caller's obligation and is only checked in debug builds. A weight larger than `capacity`
/// ends up alone in its own (overfull) bin.
///
/// The number of returned groups is not fixed in advance. It never increases as `capacity` grows,
/// which is what the binary search in [multifit] relies on.
///
/// ## Example
/// ```rust
/// # extern crate partition;
/// let bins = partition::ffd(&[8u32, 7, 6, 5, 4], 15);
/// assert_eq!(bins.len(), 2);
/// assert_eq!(bins[0].indices(), &[0, 1]);
/// assert_eq!(bins[1].indices(), &[2, 3, 4]);
/// ```
pub fn ffd<T: Weight>(weights: &[T], capacity: T) -> Vec<Group<T>> {
    debug_assert!(
        weights.windows(2).all(|w| w[0] >= w[1]),
        "FFD expects weights in non-increasing order"
    );
    first_fit(weights, 0..weights.len(), capacity)
}

fn first_fit<T, I>(weights: &[T], order: I, capacity: T) -> Vec<Group<T>>
where
    T: Weight,
    I: IntoIterator<Item = usize>,
{
    let mut bins: Vec<Group<T>> = Vec::new();

    for i in order {
        let w = weights[i];
        let fits = |bin: &&mut Group<T>| capacity.checked_sub(&bin.sum()).is_some_and(|r| r >= w);

        match bins.iter_mut().find(fits) {
            Some(bin) => bin.push(i, w),
            None => {
                let mut bin = Group::default();
                bin.push(i, w);
                bins.push(bin);
            }
        }
    }

    bins
}

/// Search for approx. solution using MULTIFIT with [DEFAULT_ITERATIONS] rounds.
///
/// See [multifit_with_iterations].
pub fn multifit<T: Weight>(weights: &[T], n: usize) -> Result<Partition<T>> {
    multifit_with_iterations(weights, n, DEFAULT_ITERATIONS)
}

/// Search for approx. solution using MULTIFIT: a binary search over bin capacity in which each
/// round packs the weights with [ffd] and checks whether at most `n` bins were needed.
///
/// The search starts from
///  - `lower = max(max_weight, total / n)`
///  - `upper = max(max_weight, 2 * total / n)`
///
/// and runs exactly `iterations` rounds (it does not stop early on convergence). Packing at the
/// initial `upper` always fits into `n` bins and serves as the first candidate. Each later round
/// that fits replaces the candidate unless its makespan is worse, so more rounds never yield a
/// worse makespan. The result is padded with empty groups to `n` groups.
///
/// ## Example
/// ```rust
/// # extern crate partition;
/// let p = partition::multifit(&[5u8, 5, 4, 4, 3, 3, 3], 3).expect("valid arguments");
/// assert_eq!(p.makespan(), 9);
/// ```
pub fn multifit_with_iterations<T: Weight>(
    weights: &[T],
    n: usize,
    iterations: usize,
) -> Result<Partition<T>> {
    check_groups(n)?;

    if iterations == 0 {
        return Err(Error::InvalidArgument(
            "number of MULTIFIT iterations must be positive",
        ));
    }

    if n == 1 {
        return Ok(Partition::single(weights));
    }

    let order = sort_descending(weights);

    let max_weight = match order.first() {
        Some(&i) => weights[i],
        None => return Ok(Partition::empty(n)),
    };

    let total: T = weights.iter().copied().sum();
    let groups = T::from_count(n);
    let two = T::one() + T::one();

    // 2 * total / n computed without overflowing 2 * total
    let (q, r) = (total / groups, total % groups);
    let double_avg = q.saturating_add(q) + r.saturating_add(r) / groups;

    let mut lower = max_weight.max(total / groups);
    let mut upper = max_weight.max(double_avg);

    // FFD at the initial upper bound always fits into n bins, so it seeds the candidate
    let bins = first_fit(weights, order.iter().copied(), upper);
    debug_assert!(bins.len() <= n, "FFD at {upper:?} must fit into {n} bins");
    let mut best = (makespan(&bins), bins);

    for round in 0..iterations {
        let capacity = lower + (upper - lower) / two;
        let bins = first_fit(weights, order.iter().copied(), capacity);

        trace!(
            "MULTIFIT round {round}: capacity={capacity:?} in [{lower:?}, {upper:?}] -> {} bins",
            bins.len()
        );

        if bins.len() > n {
            // capacity too tight
            lower = capacity;
            continue;
        }

        upper = capacity;

        let value = makespan(&bins);
        if value <= best.0 {
            best = (value, bins);
        }
    }

    let (value, bins) = best;

    debug!(
        "MULTIFIT: {} weights into {n} groups, makespan={value:?} using {} bins",
        weights.len(),
        bins.len()
    );

    Ok(Partition::padded(bins, n))
}

#[inline]
fn makespan<T: Weight>(bins: &[Group<T>]) -> T {
    bins.iter().map(Group::sum).max().unwrap_or_else(T::zero)
}
