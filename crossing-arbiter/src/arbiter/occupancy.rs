//! Which trains currently claim each crossing.

use std::collections::HashMap;

use crate::domain::{CrossingId, TrainIndex};

/// Claim sets per crossing.
///
/// Each set holds a train at most once and keeps trains in the order they
/// registered, so the earliest claimant is always first.
#[derive(Debug, Clone, Default)]
pub struct CrossingOccupancy {
    claims: HashMap<CrossingId, Vec<TrainIndex>>,
}

impl CrossingOccupancy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trains claiming a crossing, earliest first.
    pub fn claimants(&self, crossing: CrossingId) -> &[TrainIndex] {
        self.claims
            .get(&crossing)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_claimed_by(&self, crossing: CrossingId, train: TrainIndex) -> bool {
        self.claimants(crossing).contains(&train)
    }

    /// Register a train on a crossing. Returns `false` if already present.
    pub fn claim(&mut self, crossing: CrossingId, train: TrainIndex) -> bool {
        let set = self.claims.entry(crossing).or_default();
        if set.contains(&train) {
            return false;
        }
        set.push(train);
        true
    }

    /// Remove a train from a crossing. Returns `false` if it was not present.
    pub fn release(&mut self, crossing: CrossingId, train: TrainIndex) -> bool {
        let Some(set) = self.claims.get_mut(&crossing) else {
            return false;
        };
        let Some(at) = set.iter().position(|t| *t == train) else {
            return false;
        };
        set.remove(at);
        if set.is_empty() {
            self.claims.remove(&crossing);
        }
        true
    }

    /// Other trains claiming a crossing, earliest first.
    pub fn others(
        &self,
        crossing: CrossingId,
        train: TrainIndex,
    ) -> impl Iterator<Item = TrainIndex> + '_ {
        self.claimants(crossing)
            .iter()
            .copied()
            .filter(move |t| *t != train)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const C: CrossingId = CrossingId(0);

    #[test]
    fn claim_is_a_set() {
        let mut occ = CrossingOccupancy::new();
        assert!(occ.claim(C, TrainIndex(0)));
        assert!(!occ.claim(C, TrainIndex(0)));
        assert_eq!(occ.claimants(C), &[TrainIndex(0)]);
    }

    #[test]
    fn claim_order_preserved() {
        let mut occ = CrossingOccupancy::new();
        occ.claim(C, TrainIndex(1));
        occ.claim(C, TrainIndex(0));
        assert_eq!(occ.claimants(C), &[TrainIndex(1), TrainIndex(0)]);
        assert_eq!(
            occ.others(C, TrainIndex(0)).collect::<Vec<_>>(),
            vec![TrainIndex(1)]
        );
    }

    #[test]
    fn release() {
        let mut occ = CrossingOccupancy::new();
        occ.claim(C, TrainIndex(0));
        occ.claim(C, TrainIndex(1));

        assert!(occ.release(C, TrainIndex(0)));
        assert!(!occ.release(C, TrainIndex(0)));
        assert!(!occ.is_claimed_by(C, TrainIndex(0)));
        assert!(occ.is_claimed_by(C, TrainIndex(1)));

        assert!(occ.release(C, TrainIndex(1)));
        assert!(occ.claimants(C).is_empty());
    }

    #[test]
    fn crossings_are_independent() {
        let mut occ = CrossingOccupancy::new();
        occ.claim(CrossingId(0), TrainIndex(0));
        assert!(occ.claimants(CrossingId(1)).is_empty());
        assert!(!occ.release(CrossingId(1), TrainIndex(0)));
    }
}
