//! Exact solver: **Complete Greedy Algorithm (CGA)**.
//!
//! Depth-first Branch&Bound over the weights sorted in non-increasing order. The search is
//! seeded with the [LPT](crate::lpt) partition as the incumbent and cut off globally as soon as
//! the incumbent meets the trivial [lower bound](crate::lower_bound).
use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::algorithm::Stats;
use crate::error::{check_groups, Result};
use crate::greedy::{list_schedule, sort_descending};
use crate::partition::{lower_bound, Partition};
use crate::Weight;

/// How many expanded nodes pass between two deadline checks.
const DEADLINE_CHECK_INTERVAL: u64 = 1024;

/// Search for optimal solution using the Complete Greedy Algorithm.
///
/// Note that the search takes exponential time in the worst case. See [cga_with_timeout] for a
/// variant that can be bounded in time.
///
/// ## Example
/// ```rust
/// # extern crate partition;
/// let p = partition::cga(&[5u8, 5, 4, 4, 3, 3, 3], 3).expect("valid number of groups");
/// assert_eq!(p.makespan(), 9);
/// ```
pub fn cga<T: Weight>(weights: &[T], n: usize) -> Result<Partition<T>> {
    cga_with_timeout(weights, n, None).map(|(partition, _)| partition)
}

/// Search for optimal solution using the Complete Greedy Algorithm, giving up after `timeout`.
///
/// If the time runs out, the best partition found so far is returned and
/// [Stats::proved_optimal] is `false`. Otherwise the returned partition is optimal.
pub fn cga_with_timeout<T: Weight>(
    weights: &[T],
    n: usize,
    timeout: Option<Duration>,
) -> Result<(Partition<T>, Stats<T>)> {
    let start = Instant::now();

    check_groups(n)?;

    let lower_bound = lower_bound(weights, n)?;
    let num_weights = weights.len();

    if n == 1 {
        let partition = Partition::single(weights);
        let stats = Stats::approx(
            partition.makespan(),
            lower_bound,
            n,
            num_weights,
            start.elapsed(),
        );
        return Ok((partition, stats));
    }

    // LPT seed gives the initial upper bound
    let order = sort_descending(weights);
    let seed = list_schedule(weights, order.iter().copied(), n);

    let mut stats = Stats::approx(seed.makespan(), lower_bound, n, num_weights, start.elapsed());

    if stats.proved_optimal {
        debug!("CGA: LPT seed meets the lower bound {lower_bound:?}");
        return Ok((seed, stats));
    }

    let sorted = order.iter().map(|&i| weights[i]).collect::<Vec<_>>();
    let deadline = timeout.and_then(|t| start.checked_add(t));

    let mut search = Search::new(sorted, n, seed.makespan(), lower_bound, deadline);
    search.run();

    stats.expanded = search.expanded;
    stats.pruned = search.pruned;
    stats.proved_optimal = !search.timed_out;

    if search.timed_out {
        warn!(
            "CGA: timed out after {} expanded nodes, best makespan {:?} (lower bound {lower_bound:?})",
            search.expanded, search.best
        );
    }

    let partition = match search.best_assignment {
        Some(assignment) => Partition::from_assignment(weights, &order, &assignment, n),
        None => seed,
    };

    stats.makespan = partition.makespan();
    stats.elapsed = start.elapsed();

    debug!(
        "CGA: makespan {:?} (lower bound {lower_bound:?}), expanded={} pruned={}",
        stats.makespan, stats.expanded, stats.pruned
    );

    Ok((partition, stats))
}

/// Node of the search tree whose children are still being explored.
struct Frame<T> {
    /// the weight at this depth is being placed
    depth: usize,
    /// makespan of the partial assignment above this node
    c_max: T,
    /// `(sum, group)` pairs with distinct sums in ascending order
    candidates: Vec<(T, usize)>,
    /// index of the next candidate to explore
    next: usize,
}

/// State of the depth-first search.
///
/// The search is driven by an explicit stack of [Frame]s, so its depth is bounded by the heap
/// rather than the call stack. `sums` and `assignment` are mutated in place when descending and
/// restored when backtracking.
struct Search<T> {
    /// weights in non-increasing order, `weights[k]` is placed at depth `k`
    weights: Vec<T>,
    /// current group sums
    sums: Vec<T>,
    /// `assignment[k] = g` iff weight at depth `k` currently sits in group `g`
    assignment: Vec<usize>,
    /// makespan of the incumbent
    best: T,
    /// incumbent found by the search (`None` while the seed is still the best)
    best_assignment: Option<Vec<usize>>,
    lower_bound: T,
    deadline: Option<Instant>,
    expanded: u64,
    pruned: u64,
    timed_out: bool,
}

impl<T: Weight> Search<T> {
    fn new(
        weights: Vec<T>,
        n: usize,
        best: T,
        lower_bound: T,
        deadline: Option<Instant>,
    ) -> Self {
        let m = weights.len();
        Self {
            weights,
            sums: vec![T::zero(); n],
            assignment: vec![0; m],
            best,
            best_assignment: None,
            lower_bound,
            deadline,
            expanded: 0,
            pruned: 0,
            timed_out: false,
        }
    }

    /// Explore the whole tree unless the incumbent hits the lower bound or the deadline passes.
    fn run(&mut self) {
        let mut stack = match self.expand(0, T::zero()) {
            ControlFlow::Continue(Some(root)) => vec![root],
            _ => return,
        };

        while let Some(frame) = stack.last_mut() {
            // backtrack from the child explored last
            if frame.next > 0 {
                let (sum, g) = frame.candidates[frame.next - 1];
                self.sums[g] = sum;

                if self.best == self.lower_bound {
                    return;
                }
            }

            let Some(&(sum, g)) = frame.candidates.get(frame.next) else {
                stack.pop();
                continue;
            };

            let depth = frame.depth;
            let value = frame.c_max.max(sum + self.weights[depth]);

            // candidates are ascending in sum, so no later group can do better either
            if value >= self.best {
                self.pruned += 1;
                stack.pop();
                continue;
            }

            frame.next += 1;
            self.sums[g] = sum + self.weights[depth];
            self.assignment[depth] = g;

            match self.expand(depth + 1, value) {
                ControlFlow::Break(()) => return,
                ControlFlow::Continue(Some(child)) => stack.push(child),
                ControlFlow::Continue(None) => {}
            }
        }
    }

    /// Enter the node at `depth` where `c_max` is the makespan of the current partial assignment.
    ///
    /// Leaves update the incumbent and yield no frame. Breaks once the deadline has passed.
    fn expand(&mut self, depth: usize, c_max: T) -> ControlFlow<(), Option<Frame<T>>> {
        self.expanded += 1;

        if self.expanded % DEADLINE_CHECK_INTERVAL == 0 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    self.timed_out = true;
                    return ControlFlow::Break(());
                }
            }
        }

        if depth == self.weights.len() {
            if c_max < self.best {
                self.best = c_max;
                match self.best_assignment.as_mut() {
                    Some(best) => best.copy_from_slice(&self.assignment),
                    None => self.best_assignment = Some(self.assignment.clone()),
                }
            }
            return ControlFlow::Continue(None);
        }

        // groups with the same sum span symmetric subtrees, so keep just one of them
        let mut candidates = self.sums.iter().copied().zip(0..).collect::<Vec<(T, usize)>>();
        candidates.sort_unstable();
        candidates.dedup_by_key(|(sum, _)| *sum);

        ControlFlow::Continue(Some(Frame {
            depth,
            c_max,
            candidates,
            next: 0,
        }))
    }
}
