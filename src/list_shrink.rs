//! The list-shrinking algorithm of spec.md §4.3: bulk removals (halving
//! window sizes) followed by one-element shrinks. Used by the slice/string
//! generators in [`crate::collection`] and (in its tail-biased form) by
//! [`crate::shrink_search`].

/// All windows of size `k` removed from `xs`, for a single `k`. The
/// recursion keeps the leading `k` elements as a fixed prefix and recurses on
/// the remainder, so the *last* candidate produced is always "drop the first
/// `k`, keep everything else" and earlier candidates keep a growing prefix
/// intact — this ordering is pinned down by spec.md §8 scenario S6.
fn removes<T: Clone>(k: usize, xs: &[T]) -> Vec<Vec<T>> {
    if k == 0 || k > xs.len() {
        return Vec::new();
    }
    let prefix = &xs[..k];
    let rest = &xs[k..];
    let mut out: Vec<Vec<T>> = removes(k, rest)
        .into_iter()
        .map(|mut tail| {
            let mut candidate = prefix.to_vec();
            candidate.append(&mut tail);
            candidate
        })
        .collect();
    out.push(rest.to_vec());
    out
}

/// Step 1 of §4.3: for each `k` in `{n, n/2, n/4, ..., 1}`, every aligned
/// window of `k` consecutive elements removed.
pub fn bulk_removals<T: Clone>(xs: &[T]) -> Vec<Vec<T>> {
    let mut out = Vec::new();
    let mut k = xs.len();
    while k >= 1 {
        out.extend(removes(k, xs));
        k /= 2;
    }
    out
}

/// Step 2 of §4.3: for each position (from the head), every smaller
/// candidate for that single element, with all other positions held fixed.
pub fn one_element_shrinks<T: Clone>(
    xs: &[T],
    mut shrink_one: impl FnMut(&T) -> Vec<T>,
) -> Vec<Vec<T>> {
    let mut out = Vec::new();
    for index in 0..xs.len() {
        for smaller in shrink_one(&xs[index]) {
            let mut candidate = xs.to_vec();
            candidate[index] = smaller;
            out.push(candidate);
        }
    }
    out
}

/// The full §4.3 algorithm: bulk removals, then one-element shrinks, in that
/// order (property 7 of spec.md §8: the result contains every single-element
/// removal and every half-removal, among others).
pub fn shrink_list<T: Clone>(xs: &[T], shrink_one: impl FnMut(&T) -> Vec<T>) -> Vec<Vec<T>> {
    let mut out = bulk_removals(xs);
    out.extend(one_element_shrinks(xs, shrink_one));
    out
}

/// The tail-biased variant used by [`crate::shrink_search`] on a choice
/// tree's segment list (spec.md §4.8): only ever drops a suffix, in halving
/// steps, so earlier segments (the test's earlier decisions) are preserved
/// for as long as possible.
pub fn shrink_list_tail<T: Clone>(xs: &[T]) -> Vec<Vec<T>> {
    let n = xs.len();
    let mut out = Vec::new();
    let mut k = n;
    while k >= 1 {
        out.push(xs[..n - k].to_vec());
        k /= 2;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scenario S6 of spec.md §8.
    #[test]
    fn shrink_list_matches_scenario_s6() {
        let xs: Vec<i64> = (1..=10).collect();
        let candidates = shrink_list(&xs, |x| if *x == 0 { vec![] } else { vec![x / 2] });
        assert_eq!(
            candidates[..5],
            [
                vec![],
                vec![1, 2, 3, 4, 5],
                vec![6, 7, 8, 9, 10],
                vec![1, 2, 3, 4, 5, 6, 7, 8],
                vec![1, 2, 3, 4, 5, 6, 9, 10],
            ]
        );
    }

    #[test]
    fn contains_every_single_element_removal() {
        let xs = vec![1, 2, 3, 4];
        let candidates = shrink_list(&xs, |_| vec![]);
        for index in 0..xs.len() {
            let mut expected = xs.clone();
            expected.remove(index);
            assert!(
                candidates.contains(&expected),
                "missing removal of index {index}: {expected:?}"
            );
        }
    }

    #[test]
    fn contains_half_removals() {
        let xs: Vec<i32> = (0..8).collect();
        let candidates = shrink_list(&xs, |_| vec![]);
        assert!(candidates.contains(&xs[4..].to_vec()));
        assert!(candidates.contains(&xs[..4].to_vec()));
    }

    #[test]
    fn tail_shrink_only_drops_suffix() {
        let xs = vec![1, 2, 3, 4];
        let candidates = shrink_list_tail(&xs);
        for candidate in &candidates {
            assert!(xs.starts_with(candidate));
        }
        assert!(candidates.contains(&vec![]));
    }
}
