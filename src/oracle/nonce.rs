//! Nonce sequencing for the record loop.
//!
//! Dispatches are not awaited, so the pending nonce reported by the node can lag behind what
//! this process has already handed out. The sequencer never hands out a nonce twice unless its
//! earlier submission was definitely rejected.

use std::collections::BTreeSet;

/// Per-process nonce counter, seeded from the ledger's pending nonce.
#[derive(Debug, Default, Clone)]
pub struct NonceSequencer {
    next: Option<u64>,
    /// Issued nonces whose submission was rejected, reused lowest first.
    gaps: BTreeSet<u64>,
}

impl NonceSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next nonce to use given the node's pending nonce `observed`.
    ///
    /// Released gaps at or above `observed` come first. Otherwise returns `max(local, observed)`
    /// and advances the local counter past it.
    pub fn next(&mut self, observed: u64) -> u64 {
        // Anything below the pending nonce is already taken on chain
        self.gaps = self.gaps.split_off(&observed);
        if let Some(gap) = self.gaps.pop_first() {
            return gap;
        }

        let nonce = match self.next {
            Some(local) => local.max(observed),
            None => observed,
        };
        self.next = Some(nonce.saturating_add(1));
        nonce
    }

    /// Make `nonce` available again after its submission was rejected.
    ///
    /// Only nonces this sequencer already issued are accepted; the local counter never moves
    /// backwards, so nonces issued after `nonce` stay used.
    pub fn release(&mut self, nonce: u64) {
        if self.next.is_some_and(|local| nonce < local) {
            self.gaps.insert(nonce);
        }
    }

    /// Nonce the next call would use if the node reported nothing newer.
    pub fn peek(&self) -> Option<u64> {
        self.gaps.first().copied().or(self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_from_observed() {
        let mut seq = NonceSequencer::new();
        assert_eq!(seq.peek(), None);
        assert_eq!(seq.next(17), 17);
        assert_eq!(seq.peek(), Some(18));
    }

    #[test]
    fn test_same_observed_twice_increments() {
        let mut seq = NonceSequencer::new();
        assert_eq!(seq.next(5), 5);
        assert_eq!(seq.next(5), 6);
        assert_eq!(seq.next(5), 7);
    }

    #[test]
    fn test_follows_ledger_when_ahead() {
        let mut seq = NonceSequencer::new();
        assert_eq!(seq.next(5), 5);
        // Another client used the account meanwhile
        assert_eq!(seq.next(9), 9);
        assert_eq!(seq.next(9), 10);
    }

    #[test]
    fn test_never_repeats() {
        let mut seq = NonceSequencer::new();
        let mut seen = Vec::new();
        for observed in [3, 3, 4, 4, 2, 6, 6] {
            let n = seq.next(observed);
            assert!(!seen.contains(&n), "nonce {n} handed out twice");
            seen.push(n);
        }
    }

    #[test]
    fn test_release_latest() {
        let mut seq = NonceSequencer::new();
        assert_eq!(seq.next(5), 5);
        assert_eq!(seq.next(5), 6);

        seq.release(6);
        assert_eq!(seq.next(6), 6);
        assert_eq!(seq.next(6), 7);
    }

    #[test]
    fn test_release_older_keeps_later_nonces() {
        let mut seq = NonceSequencer::new();
        assert_eq!(seq.next(5), 5);
        assert_eq!(seq.next(5), 6);
        assert_eq!(seq.next(5), 7);

        // 6 and 7 are in flight; only 5 was rejected
        seq.release(5);
        assert_eq!(seq.peek(), Some(5));
        assert_eq!(seq.next(5), 5);
        assert_eq!(seq.next(5), 8);
        assert_eq!(seq.next(5), 9);
    }

    #[test]
    fn test_gaps_reused_lowest_first() {
        let mut seq = NonceSequencer::new();
        for _ in 0..4 {
            seq.next(10);
        }
        seq.release(12);
        seq.release(10);

        assert_eq!(seq.next(10), 10);
        assert_eq!(seq.next(10), 12);
        assert_eq!(seq.next(10), 14);
    }

    #[test]
    fn test_gaps_below_pending_are_dropped() {
        let mut seq = NonceSequencer::new();
        seq.next(5);
        seq.next(5);
        seq.release(5);

        // The node already counts 5 as used
        assert_eq!(seq.next(6), 7);
        assert_eq!(seq.peek(), Some(8));
    }

    #[test]
    fn test_release_unissued_ignored() {
        let mut seq = NonceSequencer::new();
        seq.release(3);
        assert_eq!(seq.next(5), 5);

        seq.release(42);
        assert_eq!(seq.next(5), 6);
    }
}
