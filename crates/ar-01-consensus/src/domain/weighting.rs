//! Opinion weighting
//!
//! ```text
//! weight = reliability × confidence × domain expertise × evidence score × trust
//! ```
//!
//! With `expertise_weight = e` the expertise bonus `|expertise| / 10` is
//! blended in: `weight × (1 − e) + bonus × e`. At `e = 1` the expertise
//! count alone decides.
//!
//! Strategies never touch the live registry or trust tracker. The service
//! captures a [`WeightContext`] once per request and every strategy reads it.

use super::{ConsensusRequest, Opinion};
use shared_types::{
    score_evidence, Participant, ParticipantId, ParticipantRegistry, StanceTally, TrustTracker,
};
use std::collections::HashMap;

/// Snapshot of participant profiles and trust for one request.
#[derive(Clone, Debug, Default)]
pub struct WeightContext {
    profiles: HashMap<ParticipantId, Participant>,
    trust: HashMap<ParticipantId, f64>,
    default_trust: f64,
}

impl WeightContext {
    /// Capture the current registry and trust state.
    pub fn capture(registry: &ParticipantRegistry, trust: &TrustTracker) -> Self {
        Self {
            profiles: registry.snapshot(),
            trust: trust.snapshot(),
            default_trust: trust.config().initial,
        }
    }

    /// Context from explicit maps (used by tests and offline replays).
    pub fn from_parts(
        profiles: impl IntoIterator<Item = Participant>,
        trust: HashMap<ParticipantId, f64>,
    ) -> Self {
        Self {
            profiles: profiles.into_iter().map(|p| (p.id.clone(), p)).collect(),
            trust,
            default_trust: 1.0,
        }
    }

    /// Profile for a participant, or the neutral default.
    pub fn profile(&self, id: &str) -> Participant {
        self.profiles
            .get(id)
            .cloned()
            .unwrap_or_else(|| Participant::unknown(id))
    }

    pub fn trust(&self, id: &str) -> f64 {
        self.trust.get(id).copied().unwrap_or(self.default_trust)
    }

    pub fn specialization(&self, id: &str, domain: &str) -> Option<f64> {
        self.profiles.get(id).and_then(|p| p.specialization(domain))
    }

    /// Weight of one opinion before any strategy-specific boost.
    pub fn opinion_weight(&self, opinion: &Opinion, request: &ConsensusRequest) -> f64 {
        let profile = self.profile(&opinion.participant);
        let mut weight = profile.reliability()
            * opinion.confidence
            * profile.domain_expertise(request.domain.as_deref())
            * score_evidence(&opinion.evidence)
            * self.trust(&opinion.participant);

        if let Some(expertise_weight) = request.requirements.expertise_weight {
            let e = expertise_weight.clamp(0.0, 1.0);
            let bonus = profile.expertise.len() as f64 / 10.0;
            weight = weight * (1.0 - e) + bonus * e;
        }
        weight
    }

    /// Tally the request's opinions, scaling each weight by `boost`.
    pub fn tally<F>(&self, request: &ConsensusRequest, boost: F) -> StanceTally
    where
        F: Fn(&Opinion) -> f64,
    {
        StanceTally::from_weighted(
            request
                .opinions
                .iter()
                .map(|op| (&op.value, self.opinion_weight(op, request) * boost(op))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{Evidence, EvidenceKind, EvidenceStrength, Stance};

    fn request(opinions: Vec<Opinion>) -> ConsensusRequest {
        ConsensusRequest::new("topic", opinions)
    }

    #[test]
    fn test_unknown_participant_weight() {
        let ctx = WeightContext::default();
        let op = Opinion::new("ghost", 1.0, 0.8);
        let req = request(vec![op.clone()]);
        // 0.5 reliability × 0.8 × 0.5 expertise × 0.5 evidence × 1.0 trust
        assert!((ctx.opinion_weight(&op, &req) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_domain_specialization_and_trust() {
        let profile = Participant::new("sec", 0.9).with_specialization("security", 0.95);
        let mut trust = HashMap::new();
        trust.insert("sec".to_string(), 1.2);
        let ctx = WeightContext::from_parts([profile], trust);

        let op = Opinion::new("sec", Stance::from("block"), 1.0).with_evidence(Evidence::new(
            EvidenceKind::Empirical,
            EvidenceStrength::Strong,
            "cve-db",
        ));
        let req = request(vec![op.clone()]).with_domain("security");
        assert!((ctx.opinion_weight(&op, &req) - 0.9 * 0.95 * 1.0 * 1.2).abs() < 1e-9);
    }

    fn with_expertise_weight(req: ConsensusRequest, e: f64) -> ConsensusRequest {
        req.with_requirements(super::super::Requirements {
            expertise_weight: Some(e),
            ..Default::default()
        })
    }

    #[test]
    fn test_expertise_weight_blends_bonus() {
        let profile = Participant::new("p", 1.0).with_expertise(["a", "b", "c", "d", "e"]);
        let ctx = WeightContext::from_parts([profile], HashMap::new());
        let op = Opinion::new("p", 1.0, 1.0);
        let req = request(vec![op.clone()]);

        // 1.0 × 1.0 × 0.5 expertise × 0.5 evidence
        assert!((ctx.opinion_weight(&op, &req) - 0.25).abs() < 1e-9);
        // bonus 0.5: 0.25 × 0.5 + 0.5 × 0.5
        let half = with_expertise_weight(req.clone(), 0.5);
        assert!((ctx.opinion_weight(&op, &half) - 0.375).abs() < 1e-9);
        let full = with_expertise_weight(req, 1.0);
        assert!((ctx.opinion_weight(&op, &full) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_full_expertise_weight_favours_tag_count_over_reliability() {
        let reliable = Participant::new("a", 1.0).with_expertise(["style"]);
        let broad = Participant::new("b", 0.6)
            .with_expertise(["a", "b", "c", "d", "e", "f", "g", "h"]);
        let ctx = WeightContext::from_parts([reliable, broad], HashMap::new());
        let a = Opinion::new("a", 1.0, 1.0);
        let b = Opinion::new("b", 2.0, 1.0);
        let req = with_expertise_weight(request(vec![a.clone(), b.clone()]), 1.0);

        assert!((ctx.opinion_weight(&a, &req) - 0.1).abs() < 1e-9);
        assert!((ctx.opinion_weight(&b, &req) - 0.8).abs() < 1e-9);
    }
}
