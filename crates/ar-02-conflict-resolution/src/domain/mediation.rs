//! Bounded mediation
//!
//! Mediation is a small state machine over a private copy of the
//! conflict's positions.
//!
//! ```text
//! [ROUND 1] ──steps──→ agreement ≥ 0.7? ──yes──→ [AGREED]
//!     │                      │
//!     │                      no
//!     │                      ↓
//!     │        round = max? ──yes──→ [EXHAUSTED]
//!     │                      │
//!     │                      no: flexibility ×1.1, confidence ×0.95
//!     ↓                      ↓
//! [ROUND n+1] ←──────────────┘
//! ```
//!
//! Across the whole run flexibility never decreases and confidence never
//! increases.

use super::middle_ground::{confidence_agreement, middle_ground};
use super::{Compromise, Conflict, ConflictKind, Position, ResolutionContext};
use serde::{Deserialize, Serialize};
use shared_types::{score_evidence, Stance, NEUTRAL_EVIDENCE_SCORE};
use std::collections::BTreeMap;

/// Confidence multiplier for positions backed by weak evidence.
const WEAK_EVIDENCE_DISCOUNT: f64 = 0.9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediationState {
    /// Round `n` is next to run (1-based).
    Round(u8),
    Agreed,
    Exhausted,
}

impl MediationState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Round(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediationStep {
    /// Record where everyone stands.
    ClarifyPositions,
    /// Record what the positions already share.
    FindCommonGround,
    /// Discount positions backed by weak evidence.
    EvaluateEvidence,
    /// Loosen non-experts in the conflict's domain.
    WeightByExpertise,
    /// Flexible positions adopt the middle ground.
    SeekCompromise,
}

impl MediationStep {
    /// Ordered steps run in every round for a conflict kind.
    pub fn plan(kind: ConflictKind) -> &'static [MediationStep] {
        use MediationStep::*;
        match kind {
            ConflictKind::ValueDisagreement => {
                &[ClarifyPositions, EvaluateEvidence, WeightByExpertise, SeekCompromise]
            }
            ConflictKind::Interpretation | ConflictKind::Priority | ConflictKind::Scope => {
                &[ClarifyPositions, FindCommonGround, SeekCompromise]
            }
            ConflictKind::Methodology | ConflictKind::Prediction => {
                &[EvaluateEvidence, WeightByExpertise, SeekCompromise]
            }
            ConflictKind::Definition => &[ClarifyPositions, WeightByExpertise, SeekCompromise],
        }
    }
}

/// State of the positions at the end of one round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub round: u8,
    pub agreement: f64,
    pub leading: Option<Stance>,
    /// Per position, in conflict order.
    pub flexibility: Vec<f64>,
    /// Per position, in conflict order.
    pub confidence: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MediationReport {
    pub rounds: Vec<RoundSnapshot>,
    pub final_state: MediationState,
    pub best_agreement: f64,
    pub best_stance: Option<Stance>,
    pub notes: Vec<String>,
}

impl MediationReport {
    fn new() -> Self {
        Self {
            rounds: Vec::new(),
            final_state: MediationState::Round(1),
            best_agreement: 0.0,
            best_stance: None,
            notes: Vec::new(),
        }
    }

    pub fn rounds_run(&self) -> u8 {
        self.rounds.last().map(|r| r.round).unwrap_or(0)
    }
}

/// Everything a finished mediation produced.
#[derive(Clone, Debug)]
pub struct MediationOutcome {
    pub positions: Vec<Position>,
    pub compromises: Vec<Compromise>,
    pub report: MediationReport,
}

pub struct Mediator<'a> {
    ctx: &'a ResolutionContext<'a>,
    kind: ConflictKind,
    domain: Option<&'a str>,
    state: MediationState,
    positions: Vec<Position>,
    compromises: Vec<Compromise>,
    report: MediationReport,
}

impl<'a> Mediator<'a> {
    pub fn new(conflict: &'a Conflict, ctx: &'a ResolutionContext<'a>) -> Self {
        Self {
            ctx,
            kind: conflict.kind,
            domain: conflict.domain.as_deref(),
            state: MediationState::Round(1),
            positions: conflict.positions.clone(),
            compromises: Vec::new(),
            report: MediationReport::new(),
        }
    }

    pub fn state(&self) -> MediationState {
        self.state
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Run rounds until a terminal state.
    pub fn run(mut self) -> MediationOutcome {
        while !self.state.is_terminal() {
            self.run_round();
        }
        self.report.final_state = self.state;
        MediationOutcome {
            positions: self.positions,
            compromises: self.compromises,
            report: self.report,
        }
    }

    /// Run the current round and transition.
    ///
    /// No-op once terminal.
    pub fn run_round(&mut self) -> MediationState {
        let MediationState::Round(round) = self.state else {
            return self.state;
        };

        let mut agreement = 0.0;
        for step in MediationStep::plan(self.kind) {
            self.apply(*step, round);
            agreement = self.observe();
            if agreement >= self.ctx.config.agreement_threshold {
                self.snapshot(round, agreement);
                self.state = MediationState::Agreed;
                return self.state;
            }
        }

        self.snapshot(round, agreement);
        self.state = if round >= self.ctx.config.max_rounds.max(1) {
            MediationState::Exhausted
        } else {
            self.relax();
            MediationState::Round(round + 1)
        };
        self.state
    }

    fn apply(&mut self, step: MediationStep, round: u8) {
        match step {
            MediationStep::ClarifyPositions => self.clarify(round),
            MediationStep::FindCommonGround => self.find_common_ground(round),
            MediationStep::EvaluateEvidence => self.evaluate_evidence(round),
            MediationStep::WeightByExpertise => self.weight_by_expertise(round),
            MediationStep::SeekCompromise => self.seek_compromise(round),
        }
    }

    fn clarify(&mut self, round: u8) {
        let mut distinct: Vec<&Stance> = Vec::new();
        for position in &self.positions {
            if !distinct.contains(&&position.value) {
                distinct.push(&position.value);
            }
        }
        self.report.notes.push(format!(
            "Round {round}: {} position(s) across {} distinct stance(s)",
            self.positions.len(),
            distinct.len()
        ));
    }

    fn find_common_ground(&mut self, round: u8) {
        let records: Option<Vec<&BTreeMap<String, Stance>>> =
            self.positions.iter().map(|p| p.value.as_record()).collect();

        let note = match records {
            Some(records) if !records.is_empty() => {
                let shared: Vec<&str> = records[0]
                    .iter()
                    .filter(|(k, v)| records.iter().all(|r| r.get(*k) == Some(*v)))
                    .map(|(k, _)| k.as_str())
                    .collect();
                if shared.is_empty() {
                    format!("Round {round}: no shared fields")
                } else {
                    format!("Round {round}: common ground on {}", shared.join(", "))
                }
            }
            _ => match middle_ground(&self.positions) {
                Some(middle) => format!("Round {round}: middle ground is `{middle}`"),
                None => format!("Round {round}: no common ground"),
            },
        };
        self.report.notes.push(note);
    }

    fn evaluate_evidence(&mut self, round: u8) {
        let mut discounted = 0;
        for position in &mut self.positions {
            if score_evidence(&position.evidence) < NEUTRAL_EVIDENCE_SCORE {
                position.confidence *= WEAK_EVIDENCE_DISCOUNT;
                discounted += 1;
            }
        }
        self.report.notes.push(format!(
            "Round {round}: {discounted} position(s) discounted for weak evidence"
        ));
    }

    fn weight_by_expertise(&mut self, round: u8) {
        let Some(domain) = self.domain else {
            return;
        };
        let growth = self.ctx.config.flexibility_growth.max(1.0);
        let mut loosened = 0;
        for position in &mut self.positions {
            if !self.ctx.is_expert(&position.participant, domain) {
                position.flexibility = (position.flexibility * growth).min(1.0).max(position.flexibility);
                loosened += 1;
            }
        }
        self.report.notes.push(format!(
            "Round {round}: {loosened} non-expert position(s) in `{domain}` loosened"
        ));
    }

    fn seek_compromise(&mut self, round: u8) {
        let Some(middle) = middle_ground(&self.positions) else {
            return;
        };
        let threshold = self.ctx.config.adoption_flexibility;
        let mut adopted = 0;
        for position in &mut self.positions {
            if position.flexibility >= threshold && position.value != middle {
                self.compromises.push(Compromise {
                    participant: position.participant.clone(),
                    original: position.value.clone(),
                    adopted: middle.clone(),
                    flexibility: position.flexibility,
                });
                position.value = middle.clone();
                position
                    .reasoning
                    .push(format!("Adopted middle ground `{middle}` in round {round}"));
                adopted += 1;
            }
        }
        self.report.notes.push(format!(
            "Round {round}: {adopted} position(s) adopted `{middle}`"
        ));
    }

    /// Flexibility up, confidence down.
    fn relax(&mut self) {
        let growth = self.ctx.config.flexibility_growth.max(1.0);
        let decay = self.ctx.config.confidence_decay.clamp(0.0, 1.0);
        for position in &mut self.positions {
            position.flexibility = (position.flexibility * growth).min(1.0).max(position.flexibility);
            position.confidence *= decay;
        }
    }

    /// Current agreement; tracks the best seen so far.
    fn observe(&mut self) -> f64 {
        let Some((stance, agreement)) = confidence_agreement(&self.positions) else {
            return 0.0;
        };
        if agreement > self.report.best_agreement || self.report.best_stance.is_none() {
            self.report.best_agreement = agreement;
            self.report.best_stance = Some(stance);
        }
        agreement
    }

    fn snapshot(&mut self, round: u8, agreement: f64) {
        self.report.rounds.push(RoundSnapshot {
            round,
            agreement,
            leading: confidence_agreement(&self.positions).map(|(s, _)| s),
            flexibility: self.positions.iter().map(|p| p.flexibility).collect(),
            confidence: self.positions.iter().map(|p| p.confidence).collect(),
        });
    }
}
