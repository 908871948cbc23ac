//! # Multiway number partitioning
//! Given a multiset of `m` non-negative integer weights and a number of groups `n`, split the
//! weights into exactly `n` groups so that the largest group sum (the **makespan**) is minimal.
//!
//! In scheduling notation this is `P||C_max`: weights are processing times of non-preemptive
//! tasks and groups are parallel identical resources. The problem is *NP-hard*.
//!
//! ## Algorithms
//!  1. **List Scheduling (LS)** - greedy assignment to the least loaded group, see [ls]
//!  1. **Longest Processing Time First (LPT)** - LS over weights sorted in non-increasing order,
//!     see [lpt]
//!  1. **MULTIFIT** - binary search over bin capacity driving **First Fit Decreasing** bin
//!     packing, see [multifit()] and [ffd]
//!  1. **Longest Remaining Magnitude (LRM)** - sorted weights dealt into batches from which groups
//!     draw in turns, see [lrm()]
//!  1. **Complete Greedy Algorithm (CGA)** - exact depth-first Branch&Bound seeded by LPT, see
//!     [cga()] and [cga_with_timeout]
//!
//! All algorithms return a [Partition] of exactly `n` groups (some possibly empty) that refer to
//! the weights by their original index.
//!
//! ## Example
//! ```rust
//! # extern crate partition;
//! let weights: Vec<u32> = vec![8, 7, 6, 5, 4];
//!
//! let greedy = partition::lpt(&weights, 2).expect("valid number of groups");
//! assert_eq!(greedy.makespan(), 17);
//!
//! let optimal = partition::cga(&weights, 2).expect("valid number of groups");
//! assert_eq!(optimal.makespan(), 15);
//! ```
use std::fmt::Debug;
use std::iter::Sum;

use num_traits::{PrimInt, Unsigned};

pub mod algorithm;
pub mod cga;
pub mod error;
pub mod experiment;
pub mod generate;
pub mod greedy;
pub mod instance;
pub mod lrm;
pub mod multifit;
pub mod partition;

pub use crate::algorithm::{Algorithm, Stats};
pub use crate::cga::{cga, cga_with_timeout};
pub use crate::error::{Error, Result};
pub use crate::greedy::{lpt, ls};
pub use crate::lrm::lrm;
pub use crate::multifit::{ffd, multifit, multifit_with_iterations, DEFAULT_ITERATIONS};
pub use crate::partition::{lower_bound, Group, Partition};

/// Weight of a single item (e.g. processing time of a task).
///
/// Implemented for all unsigned primitive integers. Sums of weights are computed in `T` itself,
/// so it is up to the caller to pick a type wide enough for the total weight.
pub trait Weight: PrimInt + Unsigned + Sum + Debug {
    /// Convert a count (e.g. number of groups) into a weight, saturating at `T::max_value()`.
    #[inline]
    fn from_count(count: usize) -> Self {
        Self::from(count).unwrap_or_else(Self::max_value)
    }
}

impl<T> Weight for T where T: PrimInt + Unsigned + Sum + Debug {}
