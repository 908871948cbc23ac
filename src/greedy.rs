//! Greedy list heuristics: **List Scheduling (LS)** and **Longest Processing Time First (LPT)**.
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use itertools::Itertools;

use crate::error::{check_groups, Result};
use crate::partition::Partition;
use crate::Weight;

/// Search for approx. solution using List Scheduling: weights are taken **in input order** and
/// each one is assigned to the group with the currently smallest sum.
///
/// Ties are broken by the smallest group index, so the result is deterministic. Runs in
/// `O(m*log(n))` time where `m` is the number of weights.
///
/// ## Example
/// ```rust
/// # extern crate partition;
/// let p = partition::ls(&[8u32, 7, 6, 5, 4], 2).expect("valid number of groups");
/// assert_eq!(p.sums(), vec![17, 13]);
/// ```
pub fn ls<T: Weight>(weights: &[T], n: usize) -> Result<Partition<T>> {
    check_groups(n)?;

    if n == 1 {
        return Ok(Partition::single(weights));
    }

    Ok(list_schedule(weights, 0..weights.len(), n))
}

/// Search for approx. solution using LPT: weights are sorted in non-increasing order (stable, so
/// equal weights keep their input order) and then assigned by [ls].
///
/// Approximation factor is `r(LPT) = 4/3 - 1/3n`.
///
/// ## Example
/// ```rust
/// # extern crate partition;
/// let p = partition::lpt(&[5u8, 5, 4, 4, 3, 3, 3], 3).expect("valid number of groups");
/// assert_eq!(p.makespan(), 11); // opt = 9
/// ```
pub fn lpt<T: Weight>(weights: &[T], n: usize) -> Result<Partition<T>> {
    check_groups(n)?;

    if n == 1 {
        return Ok(Partition::single(weights));
    }

    Ok(list_schedule(weights, sort_descending(weights), n))
}

/// Indices of `weights` stably sorted by non-increasing weight.
#[inline]
pub(crate) fn sort_descending<T: Weight>(weights: &[T]) -> Vec<usize> {
    (0..weights.len())
        .sorted_by(|&i, &j| weights[j].cmp(&weights[i]))
        .collect()
}

/// Assign weights in given `order` to `n` groups, always picking the group with minimal
/// `(sum, index)`.
pub(crate) fn list_schedule<T, I>(weights: &[T], order: I, n: usize) -> Partition<T>
where
    T: Weight,
    I: IntoIterator<Item = usize>,
{
    let mut partition = Partition::empty(n);

    // min-heap over (sum, group) so that ties resolve to the lowest group index
    let mut heap = (0..n)
        .map(|g| Reverse((T::zero(), g)))
        .collect::<BinaryHeap<_>>();

    for i in order {
        if let Some(mut min) = heap.peek_mut() {
            let Reverse((sum, g)) = &mut *min;
            partition.group_mut(*g).push(i, weights[i]);
            *sum = *sum + weights[i];
        }
    }

    partition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use rstest::*;

    #[rstest]
    #[case(&[], &[])]
    #[case(&[1], &[0])]
    #[case(&[2, 5, 2, 5], &[1, 3, 0, 2])]
    #[case(&[1, 2, 3], &[2, 1, 0])]
    fn stable_descending_order(#[case] weights: &[u32], #[case] expected: &[usize]) {
        assert_eq!(sort_descending(weights), expected);
    }

    #[test]
    fn ls_keeps_input_order() {
        let weights = [4u32, 8, 7, 6, 5];
        let p = ls(&weights, 2).expect("feasible");

        // 4 -> G0, 8 -> G1, 7 -> G0 (11), 6 -> G1 (14), 5 -> G0 (16)
        assert_eq!(p.groups()[0].indices(), &[0, 2, 4]);
        assert_eq!(p.groups()[1].indices(), &[1, 3]);
        assert_eq!(p.makespan(), 16);
    }

    #[test]
    fn lpt_feasible() {
        let weights = [5u8, 5, 4, 4, 3, 3, 3];
        let p = lpt(&weights, 3).expect("feasible");

        // stable sort makes LPT deterministic
        assert_eq!(p.assignment(weights.len()), vec![0, 1, 2, 2, 0, 1, 0]);
        assert_eq!(p.group_sizes(), vec![3, 2, 2]);
        assert_eq!(p.makespan(), 11);
    }

    #[test]
    fn lpt_equal_weights_keep_relative_order() {
        let weights = [2u32, 5, 2, 5];
        let p = lpt(&weights, 2).expect("feasible");

        assert_eq!(p.groups()[0].indices(), &[1, 0]);
        assert_eq!(p.groups()[1].indices(), &[3, 2]);
    }

    #[rstest]
    #[case(&[], 0)]
    #[case(&[4, 2], 0)]
    fn no_groups(#[case] weights: &[u64], #[case] n: usize) {
        assert!(matches!(ls(weights, n), Err(Error::InvalidArgument(_))));
        assert!(matches!(lpt(weights, n), Err(Error::InvalidArgument(_))));
    }
}
