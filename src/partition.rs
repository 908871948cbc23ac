use crate::error::{check_groups, Result};
use crate::Weight;

/// A single group of a [Partition]: original indices of its weights and their cached sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<T> {
    /// indices into the weight slice the partition was computed for
    indices: Vec<usize>,
    /// sum of the weights at `indices`
    sum: T,
}

impl<T: Weight> Default for Group<T> {
    fn default() -> Self {
        Self {
            indices: Vec::new(),
            sum: T::zero(),
        }
    }
}

impl<T: Weight> Group<T> {
    #[inline]
    pub(crate) fn push(&mut self, index: usize, weight: T) {
        self.indices.push(index);
        self.sum = self.sum + weight;
    }

    /// Original indices of the weights in this group (in order of assignment).
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Total weight of this group.
    pub fn sum(&self) -> T {
        self.sum
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Look up the actual weights of this group.
    pub fn values(&self, weights: &[T]) -> Vec<T> {
        self.indices.iter().map(|&i| weights[i]).collect()
    }
}

/// Partition of weights into exactly `n` pairwise disjoint [Group]s.
///
/// Groups reference weights by their index in the original input, so the multiset of values can
/// always be recovered with [Partition::values]. The number of groups is fixed even if some of
/// them end up empty (e.g. when there are fewer weights than groups).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition<T> {
    groups: Vec<Group<T>>,
}

impl<T: Weight> Partition<T> {
    /// `n` empty groups
    pub(crate) fn empty(n: usize) -> Self {
        Self {
            groups: vec![Group::default(); n],
        }
    }

    /// Single group holding all the weights in input order.
    pub(crate) fn single(weights: &[T]) -> Self {
        let mut group = Group::default();
        for (i, &w) in weights.iter().enumerate() {
            group.push(i, w);
        }
        Self {
            groups: vec![group],
        }
    }

    /// Wrap given groups and pad them with empty ones up to `n`.
    pub(crate) fn padded(mut groups: Vec<Group<T>>, n: usize) -> Self {
        debug_assert!(groups.len() <= n, "more than {n} groups");
        groups.resize_with(n, Group::default);
        Self { groups }
    }

    /// Build a partition from an assignment over a permutation of the weights, i.e. weight
    /// `order[k]` goes to group `assignment[k]`.
    pub(crate) fn from_assignment(
        weights: &[T],
        order: &[usize],
        assignment: &[usize],
        n: usize,
    ) -> Self {
        let mut partition = Self::empty(n);
        for (&i, &g) in order.iter().zip(assignment) {
            partition.groups[g].push(i, weights[i]);
        }
        partition
    }

    #[inline]
    pub(crate) fn group_mut(&mut self, g: usize) -> &mut Group<T> {
        &mut self.groups[g]
    }

    pub fn groups(&self) -> &[Group<T>] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<Group<T>> {
        self.groups
    }

    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Maximum group sum (zero if all groups are empty).
    pub fn makespan(&self) -> T {
        self.groups
            .iter()
            .map(Group::sum)
            .max()
            .unwrap_or_else(T::zero)
    }

    /// Sum of all group sums, which always equals the total input weight.
    pub fn total(&self) -> T {
        self.groups.iter().map(Group::sum).sum()
    }

    /// Group sums in group order.
    pub fn sums(&self) -> Vec<T> {
        self.groups.iter().map(Group::sum).collect()
    }

    /// Mapping of weights to groups, i.e. `assignment[i] = g` iff weight `i` belongs to group `g`.
    ///
    /// # Example
    /// ```
    /// # extern crate partition;
    /// let p = partition::ls(&[3u8, 2, 1, 4], 3).unwrap();
    /// assert_eq!(p.assignment(4), vec![0, 1, 2, 2]);
    /// ```
    pub fn assignment(&self, num_weights: usize) -> Vec<usize> {
        let mut assignment = vec![0usize; num_weights];
        for (g, group) in self.groups.iter().enumerate() {
            for &i in group.indices() {
                assignment[i] = g;
            }
        }
        assignment
    }

    /// Number of weights in each group, i.e. `sizes[g] = #weights`.
    ///
    /// # Example
    /// ```
    /// # extern crate partition;
    /// let p = partition::ls(&[3u8, 2, 1, 4], 3).unwrap();
    /// assert_eq!(p.group_sizes(), vec![1, 1, 2]);
    /// ```
    pub fn group_sizes(&self) -> Vec<usize> {
        self.groups.iter().map(Group::len).collect()
    }

    /// Materialize the groups as actual weights.
    pub fn values(&self, weights: &[T]) -> Vec<Vec<T>> {
        self.groups.iter().map(|g| g.values(weights)).collect()
    }

    /// Check that this is a valid partition of `weights` into `n` groups: every index is used
    /// exactly once and the cached sums match the weights.
    pub fn is_complete(&self, weights: &[T], n: usize) -> bool {
        if self.groups.len() != n {
            return false;
        }

        let mut seen = vec![false; weights.len()];
        for group in self.groups.iter() {
            for &i in group.indices() {
                if i >= weights.len() || seen[i] {
                    return false;
                }
                seen[i] = true;
            }
            if group.values(weights).into_iter().sum::<T>() != group.sum() {
                return false;
            }
        }

        seen.into_iter().all(|s| s)
    }
}

/// Trivial lower bound `ceil(sum(weights) / n)` on the makespan of any partition into `n` groups.
///
/// # Example
/// ```
/// # extern crate partition;
/// assert_eq!(partition::lower_bound(&[8u32, 7, 6, 5, 4], 2), Ok(15));
/// assert_eq!(partition::lower_bound(&[8u32, 7, 6, 5, 4], 4), Ok(8));
/// ```
pub fn lower_bound<T: Weight>(weights: &[T], n: usize) -> Result<T> {
    check_groups(n)?;
    Ok(ceil_div(weights.iter().copied().sum(), T::from_count(n)))
}

#[inline]
pub(crate) fn ceil_div<T: Weight>(x: T, y: T) -> T {
    if x.is_zero() {
        T::zero()
    } else {
        (x - T::one()) / y + T::one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use rstest::*;

    #[rstest]
    #[case(0, 3, 0)]
    #[case(1, 3, 1)]
    #[case(9, 3, 3)]
    #[case(10, 3, 4)]
    #[case(255, 1, 255)]
    fn ceil_div_cases(#[case] x: u8, #[case] y: u8, #[case] expected: u8) {
        assert_eq!(ceil_div(x, y), expected);
    }

    #[test]
    fn lower_bound_no_groups() {
        assert!(matches!(
            lower_bound(&[1u32, 2], 0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn lower_bound_saturates_group_count() {
        // more groups than any u8 can count
        assert_eq!(lower_bound(&[3u8, 4], 1000), Ok(1));
        assert_eq!(lower_bound::<u8>(&[], 1000), Ok(0));
    }

    #[test]
    fn from_assignment_follows_order() {
        let weights = [4u32, 9, 1];
        let order = [1, 0, 2];
        let assignment = [0, 1, 1];

        let p = Partition::from_assignment(&weights, &order, &assignment, 3);

        assert_eq!(p.groups()[0].indices(), &[1]);
        assert_eq!(p.groups()[1].indices(), &[0, 2]);
        assert!(p.groups()[2].is_empty());
        assert_eq!(p.sums(), vec![9, 5, 0]);
        assert_eq!(p.makespan(), 9);
        assert!(p.is_complete(&weights, 3));
    }

    #[test]
    fn incomplete_partitions() {
        let weights = [1u32, 2, 3];

        // wrong group count
        assert!(!Partition::single(&weights).is_complete(&weights, 2));

        // missing index
        let mut group = Group::default();
        group.push(0, 1u32);
        group.push(1, 2);
        let p = Partition::padded(vec![group], 2);
        assert!(!p.is_complete(&weights, 2));

        // duplicate index
        let mut group = Group::default();
        group.push(0, 1u32);
        group.push(0, 1);
        group.push(2, 3);
        let p = Partition::padded(vec![group], 1);
        assert!(!p.is_complete(&[1u32, 2, 3], 1));
    }

    #[test]
    fn padding_keeps_group_count() {
        let p: Partition<u16> = Partition::padded(vec![], 4);
        assert_eq!(p.num_groups(), 4);
        assert_eq!(p.makespan(), 0);
        assert_eq!(p.total(), 0);
        assert_eq!(p.group_sizes(), vec![0; 4]);
    }
}
