// ============================================================
// Layer 5 — Inversion Counting
// ============================================================
// An inversion is a pair (i, j) with i < j but seq[i] > seq[j].
//
// Merge-sort based count, O(n log n):
//   1. split the sequence in half
//   2. count inversions inside each half recursively
//   3. count the cross inversions while merging
//
// During the merge, when the head of the right half is smaller
// than the head of the left half, it is smaller than EVERY
// remaining left element too (the halves are sorted), so all
// of them are counted in one step:
//
//   left  = [2, 5, 7]     right = [3, 4]
//   take 2                 (no inversion)
//   take 3 before [5, 7]   +2
//   take 4 before [5, 7]   +2
//   take 5, 7              total cross = 4
//
// Equal elements are not inversions: on a tie the left element
// is taken first.
//
// Reference: CLRS §2.3 (Merge Sort), problem 2-4 (Inversions)

/// Count the inversions in `items` and return them together with
/// the sorted sequence produced by the same merge pass.
///
/// Sequences of length 0 or 1 have no inversions and come back
/// unchanged.
///
/// # Example
/// ```ignore
/// let (inv, sorted) = count_inversions(&[3, 2, 1]);
/// assert_eq!(inv, 3);
/// assert_eq!(sorted, vec![1, 2, 3]);
/// ```
pub fn count_inversions<T: Ord + Clone>(items: &[T]) -> (u64, Vec<T>) {
    if items.len() <= 1 {
        return (0, items.to_vec());
    }

    let mid = items.len() / 2;

    let (left_inv,  left)  = count_inversions(&items[..mid]);
    let (right_inv, right) = count_inversions(&items[mid..]);
    let (cross_inv, merged) = merge_and_count(&left, &right);

    (left_inv + right_inv + cross_inv, merged)
}

/// Merge two sorted halves, counting how many (left, right) pairs
/// are out of order.
fn merge_and_count<T: Ord + Clone>(left: &[T], right: &[T]) -> (u64, Vec<T>) {
    let mut merged     = Vec::with_capacity(left.len() + right.len());
    let mut inversions = 0u64;
    let (mut i, mut j) = (0usize, 0usize);

    while i < left.len() && j < right.len() {
        if left[i] <= right[j] {
            merged.push(left[i].clone());
            i += 1;
        } else {
            merged.push(right[j].clone());
            j += 1;
            // right[j] jumps over every remaining left element
            inversions += (left.len() - i) as u64;
        }
    }

    merged.extend_from_slice(&left[i..]);
    merged.extend_from_slice(&right[j..]);

    (inversions, merged)
}

/// Inversions of a fully reversed sequence of length `n`:
/// the number of unordered pairs, n * (n - 1) / 2.
pub fn max_inversions(n: usize) -> u64 {
    let n = n as u64;
    n * n.saturating_sub(1) / 2
}
