//! # Stance Tally
//!
//! Groups weighted items by stance equality and picks the heaviest group.
//!
//! Groups keep first-seen order and ties go to the earliest group, so every
//! strategy built on the tally is deterministic for a given input order.

use crate::stance::Stance;
use std::collections::HashMap;

/// Items sharing one stance.
#[derive(Clone, Debug, PartialEq)]
pub struct StanceGroup {
    pub stance: Stance,
    /// Indices of the contributing items, in input order.
    pub members: Vec<usize>,
    /// Summed weight of the members.
    pub weight: f64,
}

/// Weighted grouping of stances.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StanceTally {
    groups: Vec<StanceGroup>,
    total: f64,
}

impl StanceTally {
    /// Group `(stance, weight)` pairs. Negative and NaN weights count as 0.
    pub fn from_weighted<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = (&'a Stance, f64)>,
    {
        let mut index: HashMap<&'a Stance, usize> = HashMap::new();
        let mut groups: Vec<StanceGroup> = Vec::new();
        let mut total = 0.0;

        for (i, (stance, weight)) in items.into_iter().enumerate() {
            let weight = if weight.is_nan() { 0.0 } else { weight.max(0.0) };
            total += weight;
            match index.get(stance) {
                Some(&g) => {
                    groups[g].members.push(i);
                    groups[g].weight += weight;
                }
                None => {
                    index.insert(stance, groups.len());
                    groups.push(StanceGroup {
                        stance: stance.clone(),
                        members: vec![i],
                        weight,
                    });
                }
            }
        }

        Self { groups, total }
    }

    /// Group stances with unit weight (head count).
    pub fn from_counts<'a, I>(stances: I) -> Self
    where
        I: IntoIterator<Item = &'a Stance>,
    {
        Self::from_weighted(stances.into_iter().map(|s| (s, 1.0)))
    }

    pub fn groups(&self) -> &[StanceGroup] {
        &self.groups
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Index of the heaviest group; ties go to the first-seen group.
    pub fn winner_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, group) in self.groups.iter().enumerate() {
            match best {
                Some(b) if self.groups[b].weight >= group.weight => {}
                _ => best = Some(i),
            }
        }
        best
    }

    pub fn winner(&self) -> Option<&StanceGroup> {
        self.winner_index().map(|i| &self.groups[i])
    }

    /// Weight share of a group; 0 when the total weight is 0.
    pub fn share(&self, group: &StanceGroup) -> f64 {
        if self.total > 0.0 {
            group.weight / self.total
        } else {
            0.0
        }
    }

    /// Share of the winning group, or 0 for an empty tally.
    pub fn agreement(&self) -> f64 {
        self.winner().map(|g| self.share(g)).unwrap_or(0.0)
    }

    /// Group containing the item at `index`.
    pub fn group_of(&self, index: usize) -> Option<&StanceGroup> {
        self.groups.iter().find(|g| g.members.contains(&index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_groups_in_first_seen_order() {
        let a = Stance::Numeric(80.0);
        let b = Stance::Numeric(120.0);
        let tally = StanceTally::from_weighted([(&a, 0.9), (&b, 0.6), (&a, 0.8)]);
        assert_eq!(tally.groups().len(), 2);
        assert_eq!(tally.groups()[0].stance, a);
        assert_eq!(tally.groups()[0].members, vec![0, 2]);
        assert!((tally.agreement() - 1.7 / 2.3).abs() < 1e-9);
    }

    #[test]
    fn test_tie_goes_to_first_group() {
        let a = Stance::from("a");
        let b = Stance::from("b");
        let tally = StanceTally::from_weighted([(&a, 0.5), (&b, 0.5)]);
        assert_eq!(tally.winner().unwrap().stance, a);
    }

    #[test]
    fn test_zero_total_has_zero_agreement() {
        let a = Stance::from("a");
        let tally = StanceTally::from_weighted([(&a, 0.0), (&a, f64::NAN)]);
        assert_eq!(tally.total(), 0.0);
        assert_eq!(tally.agreement(), 0.0);
        assert_eq!(tally.winner().unwrap().stance, a);
    }

    #[test]
    fn test_empty_tally() {
        let tally = StanceTally::from_counts(std::iter::empty());
        assert!(tally.is_empty());
        assert!(tally.winner().is_none());
        assert_eq!(tally.agreement(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_winner_dominates_every_group(
            picks in proptest::collection::vec((0usize..4, 0.0f64..1.0), 1..30)
        ) {
            let stances: Vec<Stance> = (0..4).map(|i| Stance::Numeric(i as f64)).collect();
            let tally = StanceTally::from_weighted(picks.iter().map(|(i, w)| (&stances[*i], *w)));
            let winner = tally.winner().unwrap();
            for group in tally.groups() {
                prop_assert!(winner.weight >= group.weight);
            }
        }
    }
}
