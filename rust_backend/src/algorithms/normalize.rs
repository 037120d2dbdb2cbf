use crate::core::domain::MatchCounts;

/// Halve every count produced by ordered-pair iteration.
///
/// Each unordered pair `{i, j}` is visited as `(i, j)` and `(j, i)`, and each
/// second-order chain `i-j-k` also as `k-j-i`, so raw counts are always even
/// and the division is exact. Apply once, after counting completes.
pub fn normalize(counts: &MatchCounts) -> MatchCounts {
    debug_assert!(
        counts.is_symmetric(),
        "raw match counts must be even: {:?}",
        counts
    );
    MatchCounts {
        ns: counts.ns / 2,
        n2s: counts.n2s / 2,
        nt: counts.nt / 2,
        n2t: counts.n2t / 2,
        x: counts.x / 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_halves_every_field() {
        let raw = MatchCounts { ns: 6, n2s: 12, nt: 4, n2t: 2, x: 2 };
        assert_eq!(
            normalize(&raw),
            MatchCounts { ns: 3, n2s: 6, nt: 2, n2t: 1, x: 1 }
        );
    }

    #[test]
    fn test_zero_counts() {
        assert_eq!(normalize(&MatchCounts::default()), MatchCounts::default());
    }
}
