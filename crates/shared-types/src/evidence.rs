//! # Evidence
//!
//! Supporting material attached to opinions and positions, and the scorer
//! that turns a list of it into a single strength in `[0, 1]`.
//!
//! ```text
//! item score = kind base × strength factor × (1.1 if verifiable)
//! list score = mean(item scores) clamped to ≤ 1.0, or 0.5 when empty
//! ```

use serde::{Deserialize, Serialize};

/// Score of an empty evidence list.
pub const NEUTRAL_EVIDENCE_SCORE: f64 = 0.5;

/// Multiplier for evidence that a third party can check.
pub const VERIFIABLE_BONUS: f64 = 1.1;

/// What kind of support an evidence item provides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvidenceKind {
    /// Measured or observed (benchmarks, test runs).
    Empirical,
    /// Derived by reasoning from principles.
    Theoretical,
    /// Formally or mechanically derived.
    Logical,
    /// Drawn from past practice.
    Experiential,
    /// Cites documentation or another source.
    Referenced,
    /// Backed by a recognised authority.
    Authoritative,
}

impl EvidenceKind {
    /// Base score for this kind.
    pub fn base_score(self) -> f64 {
        match self {
            Self::Empirical => 1.0,
            Self::Logical => 1.0,
            Self::Authoritative => 0.9,
            Self::Experiential => 0.8,
            Self::Referenced => 0.7,
            Self::Theoretical => 0.6,
        }
    }
}

/// How strongly an item supports its claim.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvidenceStrength {
    Weak,
    Moderate,
    Strong,
    /// Explicit strength in `[0, 1]`.
    Score(f64),
}

impl EvidenceStrength {
    /// Multiplicative factor applied to the kind's base score.
    pub fn factor(self) -> f64 {
        match self {
            Self::Strong => 1.0,
            Self::Moderate => 0.8,
            Self::Weak => 0.6,
            Self::Score(s) if s.is_nan() => 0.0,
            Self::Score(s) => s.clamp(0.0, 1.0),
        }
    }
}

/// A single piece of supporting evidence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub kind: EvidenceKind,
    pub strength: EvidenceStrength,
    /// Whether a third party can reproduce or check it.
    pub verifiable: bool,
    /// Where it came from (tool name, URL, file path).
    pub source: String,
}

impl Evidence {
    pub fn new(kind: EvidenceKind, strength: EvidenceStrength, source: impl Into<String>) -> Self {
        Self {
            kind,
            strength,
            verifiable: false,
            source: source.into(),
        }
    }

    /// Mark this item as verifiable.
    pub fn verified(mut self) -> Self {
        self.verifiable = true;
        self
    }

    /// Score of this single item (may exceed 1.0 before list clamping).
    pub fn score(&self) -> f64 {
        let base = self.kind.base_score() * self.strength.factor();
        if self.verifiable {
            base * VERIFIABLE_BONUS
        } else {
            base
        }
    }
}

/// Score a list of evidence.
///
/// Returns [`NEUTRAL_EVIDENCE_SCORE`] for an empty list, otherwise the mean
/// item score clamped to at most 1.0.
pub fn score_evidence(evidence: &[Evidence]) -> f64 {
    if evidence.is_empty() {
        return NEUTRAL_EVIDENCE_SCORE;
    }
    let total: f64 = evidence.iter().map(Evidence::score).sum();
    (total / evidence.len() as f64).min(1.0)
}

/// Aggregate view of the evidence behind an outcome.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSummary {
    /// Number of evidence items.
    pub items: usize,
    /// How many of them are verifiable.
    pub verifiable: usize,
    /// Combined score of all items.
    pub score: f64,
    /// Distinct sources in first-seen order.
    pub sources: Vec<String>,
}

impl EvidenceSummary {
    /// Summarise every item across the given lists.
    pub fn collect<'a, I>(lists: I) -> Self
    where
        I: IntoIterator<Item = &'a [Evidence]>,
    {
        let all: Vec<Evidence> = lists.into_iter().flatten().cloned().collect();
        let mut sources: Vec<String> = Vec::new();
        for item in &all {
            if !sources.contains(&item.source) {
                sources.push(item.source.clone());
            }
        }
        Self {
            items: all.len(),
            verifiable: all.iter().filter(|e| e.verifiable).count(),
            score: score_evidence(&all),
            sources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(kind: EvidenceKind, strength: EvidenceStrength) -> Evidence {
        Evidence::new(kind, strength, "test")
    }

    #[test]
    fn test_empty_list_is_neutral() {
        assert_eq!(score_evidence(&[]), 0.5);
    }

    #[test]
    fn test_kind_ordering() {
        let score = |k| score_evidence(&[item(k, EvidenceStrength::Strong)]);
        assert!(score(EvidenceKind::Empirical) > score(EvidenceKind::Experiential));
        assert!(score(EvidenceKind::Experiential) > score(EvidenceKind::Referenced));
        assert!(score(EvidenceKind::Referenced) > score(EvidenceKind::Theoretical));
        assert_eq!(score(EvidenceKind::Logical), 1.0);
        assert!((score(EvidenceKind::Authoritative) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_strength_factor() {
        let weak = score_evidence(&[item(EvidenceKind::Empirical, EvidenceStrength::Weak)]);
        let moderate =
            score_evidence(&[item(EvidenceKind::Empirical, EvidenceStrength::Moderate)]);
        assert!((weak - 0.6).abs() < 1e-9);
        assert!((moderate - 0.8).abs() < 1e-9);

        let numeric =
            score_evidence(&[item(EvidenceKind::Empirical, EvidenceStrength::Score(0.3))]);
        assert!((numeric - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_verifiable_bonus_is_clamped() {
        let strong = item(EvidenceKind::Empirical, EvidenceStrength::Strong).verified();
        assert_eq!(score_evidence(&[strong]), 1.0);

        let weak = item(EvidenceKind::Theoretical, EvidenceStrength::Weak).verified();
        assert!((score_evidence(&[weak]) - 0.6 * 0.6 * 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_mean_of_items() {
        let list = [
            item(EvidenceKind::Empirical, EvidenceStrength::Strong),
            item(EvidenceKind::Theoretical, EvidenceStrength::Strong),
        ];
        assert!((score_evidence(&list) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_summary_collects_sources_once() {
        let a = vec![item(EvidenceKind::Empirical, EvidenceStrength::Strong).verified()];
        let b = vec![
            item(EvidenceKind::Referenced, EvidenceStrength::Weak),
            Evidence::new(EvidenceKind::Logical, EvidenceStrength::Strong, "proof"),
        ];
        let summary = EvidenceSummary::collect([a.as_slice(), b.as_slice()]);
        assert_eq!(summary.items, 3);
        assert_eq!(summary.verifiable, 1);
        assert_eq!(summary.sources, vec!["test".to_string(), "proof".to_string()]);
    }
}
