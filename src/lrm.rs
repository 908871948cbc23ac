//! **Longest Remaining Magnitude (LRM)** heuristic.
//!
//! The weights sorted in non-increasing order are dealt round-robin into `n` batches, so each
//! batch is itself sorted. Groups then take turns drawing the head of one batch. In an
//! *adjustment* pass (every `n`-th pass, starting with the first) a group draws the largest
//! remaining head. In a *normal* pass it draws from the batch with the largest spread (head minus
//! tail). Passes repeat until all batches are drained.
use std::cmp::Reverse;
use std::collections::VecDeque;

use log::debug;

use crate::error::{check_groups, Result};
use crate::greedy::sort_descending;
use crate::partition::Partition;
use crate::Weight;

/// Search for approx. solution using the Longest Remaining Magnitude heuristic.
///
/// Ties between batches are broken by the lowest batch index, so the result is deterministic.
///
/// ## Example
/// ```rust
/// # extern crate partition;
/// let p = partition::lrm(&[8u32, 7, 6, 5, 4], 2).expect("valid number of groups");
/// assert_eq!(p.sums(), vec![19, 11]);
/// ```
pub fn lrm<T: Weight>(weights: &[T], n: usize) -> Result<Partition<T>> {
    check_groups(n)?;

    if n == 1 {
        return Ok(Partition::single(weights));
    }

    let mut batches = vec![VecDeque::new(); n];
    for (k, i) in sort_descending(weights).into_iter().enumerate() {
        batches[k % n].push_back(i);
    }

    let total: T = weights.iter().copied().sum();
    let mut partition = Partition::empty(n);

    let mut pass = 0;
    'passes: loop {
        for g in 0..n {
            let batch = if pass % n == 0 {
                adjustment_batch(weights, &batches, total)
            } else {
                widest_batch(weights, &batches)
            };

            match batch.and_then(|b| batches[b].pop_front()) {
                Some(i) => partition.group_mut(g).push(i, weights[i]),
                None => break 'passes,
            }
        }
        pass += 1;
    }

    debug!(
        "LRM: {} weights into {n} groups, makespan={:?}",
        weights.len(),
        partition.makespan()
    );

    Ok(partition)
}

/// Non-empty batch whose head is closest to the `total` weight.
///
/// The total bounds every weight from above, so this is the batch with the largest head.
fn adjustment_batch<T: Weight>(
    weights: &[T],
    batches: &[VecDeque<usize>],
    total: T,
) -> Option<usize> {
    batches
        .iter()
        .enumerate()
        .filter_map(|(b, batch)| batch.front().map(|&i| (b, total - weights[i])))
        .min_by_key(|&(_, diff)| diff)
        .map(|(b, _)| b)
}

/// Non-empty batch with the largest spread between its head and tail.
fn widest_batch<T: Weight>(weights: &[T], batches: &[VecDeque<usize>]) -> Option<usize> {
    batches
        .iter()
        .enumerate()
        .filter_map(|(b, batch)| match (batch.front(), batch.back()) {
            (Some(&head), Some(&tail)) => Some((b, weights[head] - weights[tail])),
            _ => None,
        })
        .min_by_key(|&(_, spread)| Reverse(spread))
        .map(|(b, _)| b)
}
