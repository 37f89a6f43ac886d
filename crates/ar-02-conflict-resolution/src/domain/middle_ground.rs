//! Middle ground and confidence-weighted agreement
//!
//! ```text
//! all numeric  → confidence-weighted average (plain mean if all confidence is 0)
//! all records  → per key, the most common value (ties → first seen)
//! otherwise    → the most common stance (ties → first seen)
//! ```

use super::Position;
use shared_types::{Stance, StanceTally};
use std::collections::BTreeMap;

/// Stance the positions could meet at. `None` when there are no positions.
pub fn middle_ground(positions: &[Position]) -> Option<Stance> {
    if positions.is_empty() {
        return None;
    }

    let numeric: Option<Vec<(f64, f64)>> = positions
        .iter()
        .map(|p| p.value.as_numeric().map(|v| (v, p.confidence)))
        .collect();
    if let Some(values) = numeric {
        return Some(Stance::Numeric(weighted_average(&values)));
    }

    let records: Option<Vec<&BTreeMap<String, Stance>>> =
        positions.iter().map(|p| p.value.as_record()).collect();
    if let Some(records) = records {
        return Some(Stance::Record(per_key_majority(&records)));
    }

    most_common(positions.iter().map(|p| &p.value))
}

/// Leading stance by summed confidence and its share of the total.
///
/// Share is 0 when every confidence is 0.
pub fn confidence_agreement(positions: &[Position]) -> Option<(Stance, f64)> {
    let tally = StanceTally::from_weighted(positions.iter().map(|p| (&p.value, p.confidence)));
    tally
        .winner()
        .map(|group| (group.stance.clone(), tally.share(group)))
}

/// Per-key majority merge of record stances.
pub fn per_key_majority(records: &[&BTreeMap<String, Stance>]) -> BTreeMap<String, Stance> {
    let mut keys: Vec<&String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }

    keys.into_iter()
        .filter_map(|key| {
            most_common(records.iter().filter_map(|r| r.get(key))).map(|v| (key.clone(), v))
        })
        .collect()
}

fn weighted_average(values: &[(f64, f64)]) -> f64 {
    let total: f64 = values.iter().map(|(_, c)| c).sum();
    if total > 0.0 {
        values.iter().map(|(v, c)| v * c).sum::<f64>() / total
    } else {
        values.iter().map(|(v, _)| v).sum::<f64>() / values.len() as f64
    }
}

fn most_common<'a, I>(stances: I) -> Option<Stance>
where
    I: IntoIterator<Item = &'a Stance>,
{
    StanceTally::from_counts(stances)
        .winner()
        .map(|group| group.stance.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_weighted_average() {
        let positions = vec![Position::new("a", 80, 0.9), Position::new("b", 120, 0.3)];
        assert_eq!(middle_ground(&positions), Some(Stance::Numeric(90.0)));
    }

    #[test]
    fn test_numeric_zero_confidence_uses_mean() {
        let positions = vec![Position::new("a", 80, 0.0), Position::new("b", 120, 0.0)];
        assert_eq!(middle_ground(&positions), Some(Stance::Numeric(100.0)));
    }

    #[test]
    fn test_record_per_key_majority() {
        let positions = vec![
            Position::new(
                "a",
                Stance::record([("lint", Stance::from("strict")), ("max", Stance::from(80))]),
                0.5,
            ),
            Position::new("b", Stance::record([("lint", Stance::from("loose"))]), 0.9),
            Position::new(
                "c",
                Stance::record([("lint", Stance::from("loose")), ("max", Stance::from(100))]),
                0.5,
            ),
        ];
        let merged = middle_ground(&positions).unwrap();
        let fields = merged.as_record().unwrap();
        assert_eq!(fields["lint"], Stance::from("loose"));
        // tie between 80 and 100, first seen wins
        assert_eq!(fields["max"], Stance::Numeric(80.0));
    }

    #[test]
    fn test_mixed_kinds_most_common() {
        let positions = vec![
            Position::new("a", "refactor", 0.9),
            Position::new("b", true, 0.9),
            Position::new("c", true, 0.1),
        ];
        assert_eq!(middle_ground(&positions), Some(Stance::Flag(true)));
        assert_eq!(middle_ground(&[]), None);
    }

    #[test]
    fn test_confidence_agreement() {
        let positions = vec![
            Position::new("a", "x", 0.6),
            Position::new("b", "y", 0.2),
            Position::new("c", "x", 0.2),
        ];
        let (stance, share) = confidence_agreement(&positions).unwrap();
        assert_eq!(stance, Stance::from("x"));
        assert!((share - 0.8).abs() < 1e-9);
    }
}
