//! Resolution strategies
//!
//! | Method | Outcome | Agreement | Confidence |
//! |--------|---------|-----------|------------|
//! | mediation | agreed stance, or escalation when exhausted | leading confidence share | mean of holders |
//! | arbitration | best `0.5 × confidence + 0.5 × evidence` | confidence share of winner | winner's score |
//! | synthesis | per-key merge from the most confident contributor | 0.8 | mean |
//! | voting | confidence-weighted vote | winner share | mean of winners |
//! | evidence-evaluation | best `evidence × confidence` | margin over runner-up | winner's score |
//! | compromise | middle ground | `(unchanged + Σ flexibility of movers) / n` | 0.7 |
//! | partition | every position as `partition_i` | 1.0 | mean |
//! | deferral | none | 0 | 0 |
//! | escalation | escalated, with the leading stance | leading confidence share | 0 |

use super::mediation::{MediationState, Mediator};
use super::middle_ground::{confidence_agreement, middle_ground};
use super::{
    Compromise, Conflict, DissentRecord, DissentSeverity, PartitionShare, Position, Resolution,
    ResolutionContext, ResolutionError, ResolutionMethod, ResolutionOutcome, ResolutionResult,
};
use shared_types::{score_evidence, Stance, StanceTally};
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub const FOLLOW_UP_REVISIT: &str = "revisit-conflict";
pub const FOLLOW_UP_HUMAN_REVIEW: &str = "human-review";

/// Outvoted positions at least this confident object instead of holding reservations.
const OBJECTION_CONFIDENCE: f64 = 0.8;

/// Run the given strategy.
pub fn run_strategy(
    method: ResolutionMethod,
    conflict: &Conflict,
    ctx: &ResolutionContext<'_>,
) -> ResolutionResult<Resolution> {
    match method {
        ResolutionMethod::Mediation => mediation(conflict, ctx),
        ResolutionMethod::Arbitration => arbitration(conflict),
        ResolutionMethod::Synthesis => synthesis(conflict, ctx),
        ResolutionMethod::Voting => voting(conflict),
        ResolutionMethod::EvidenceEvaluation => evidence_evaluation(conflict),
        ResolutionMethod::Compromise => compromise(conflict, ctx),
        ResolutionMethod::Partition => partition(conflict),
        ResolutionMethod::Deferral => Ok(deferral(conflict)),
        ResolutionMethod::Escalation => Ok(escalation(conflict, "Escalation requested")),
    }
}

// =============================================================================
// MEDIATION
// =============================================================================

/// Bounded multi-round mediation. Exhaustion resolves as escalation.
pub fn mediation(conflict: &Conflict, ctx: &ResolutionContext<'_>) -> ResolutionResult<Resolution> {
    require_positions(conflict)?;
    let outcome = Mediator::new(conflict, ctx).run();
    let report = outcome.report;

    if report.final_state != MediationState::Agreed {
        let reason = format!(
            "Mediation exhausted after {} round(s); best agreement {:.3}",
            report.rounds_run(),
            report.best_agreement
        );
        let mut resolution = escalate(
            &conflict.id,
            &reason,
            report.best_stance.clone(),
            report.best_agreement,
        );
        let mut explanation = report.notes.clone();
        explanation.append(&mut resolution.explanation);
        resolution.explanation = explanation;
        resolution.mediation = Some(report);
        return Ok(resolution);
    }

    let (stance, agreement) =
        confidence_agreement(&outcome.positions).ok_or(ResolutionError::EmptyInput)?;
    let rounds = report.rounds_run();

    let mut resolution = Resolution::new(&conflict.id, ResolutionMethod::Mediation);
    resolution.agreement_level = agreement;
    resolution.confidence = mean_confidence(outcome.positions.iter().filter(|p| p.value == stance));
    resolution.dissent = outcome
        .positions
        .iter()
        .filter(|p| p.value != stance)
        .map(|p| DissentRecord {
            participant: p.participant.clone(),
            severity: DissentSeverity::Reservations,
            reason: format!("Kept `{}` after {} round(s)", p.value, rounds),
        })
        .collect();
    resolution.compromises = outcome.compromises;
    resolution.explanation = report.notes.clone();
    resolution.explanation.push(format!(
        "Agreed on `{stance}` in round {rounds} with agreement {agreement:.3}"
    ));
    resolution.outcome = Some(ResolutionOutcome::Decided(stance));
    resolution.mediation = Some(report);
    Ok(resolution)
}

// =============================================================================
// ARBITRATION
// =============================================================================

/// Single winner by `0.5 × confidence + 0.5 × evidence score`.
///
/// A position is eligible if it has positive confidence or any evidence.
pub fn arbitration(conflict: &Conflict) -> ResolutionResult<Resolution> {
    require_positions(conflict)?;
    let scores: Vec<f64> = conflict
        .positions
        .iter()
        .map(|p| 0.5 * p.confidence + 0.5 * score_evidence(&p.evidence))
        .collect();

    let winner_index = conflict
        .positions
        .iter()
        .enumerate()
        .filter(|(_, p)| p.confidence > 0.0 || !p.evidence.is_empty())
        .map(|(i, _)| i)
        .fold(None, |best: Option<usize>, i| match best {
            Some(b) if scores[b] >= scores[i] => Some(b),
            _ => Some(i),
        })
        .ok_or(ResolutionError::NoValidPosition)?;

    let winner = conflict.positions[winner_index].value.clone();
    let winner_score = scores[winner_index];

    let mut resolution = Resolution::new(&conflict.id, ResolutionMethod::Arbitration);
    resolution.agreement_level = confidence_share(&conflict.positions, &winner);
    resolution.confidence = winner_score.min(1.0);
    resolution.dissent = conflict
        .positions
        .iter()
        .zip(scores.iter())
        .filter(|(p, _)| p.value != winner)
        .map(|(p, score)| DissentRecord {
            participant: p.participant.clone(),
            severity: DissentSeverity::Accepts,
            reason: format!("Arbitrated for `{winner}` (score {score:.3} vs {winner_score:.3})"),
        })
        .collect();
    resolution.explanation = vec![format!(
        "Arbitration over {} position(s): {} wins with `{}` (score {:.3})",
        conflict.positions.len(),
        conflict.positions[winner_index].participant,
        winner,
        winner_score
    )];
    resolution.outcome = Some(ResolutionOutcome::Decided(winner));
    Ok(resolution)
}

// =============================================================================
// SYNTHESIS
// =============================================================================

/// Merge record stances per key, taking each key from the most confident
/// position that has it. Non-record conflicts take the most confident stance.
pub fn synthesis(conflict: &Conflict, ctx: &ResolutionContext<'_>) -> ResolutionResult<Resolution> {
    require_positions(conflict)?;

    let mut by_confidence: Vec<&Position> = conflict.positions.iter().collect();
    by_confidence.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });

    let mut resolution = Resolution::new(&conflict.id, ResolutionMethod::Synthesis);
    let synthesized = if conflict.all_records() {
        let mut merged: BTreeMap<String, Stance> = BTreeMap::new();
        for position in &by_confidence {
            if let Some(fields) = position.value.as_record() {
                for (key, value) in fields {
                    merged.entry(key.clone()).or_insert_with(|| value.clone());
                }
            }
        }
        resolution.dissent = conflict
            .positions
            .iter()
            .filter_map(|p| {
                let overridden: Vec<&str> = p
                    .value
                    .as_record()?
                    .iter()
                    .filter(|(k, v)| merged.get(*k) != Some(*v))
                    .map(|(k, _)| k.as_str())
                    .collect();
                (!overridden.is_empty()).then(|| DissentRecord {
                    participant: p.participant.clone(),
                    severity: DissentSeverity::Reservations,
                    reason: format!("Overridden field(s): {}", overridden.join(", ")),
                })
            })
            .collect();
        resolution.explanation.push(format!(
            "Merged {} field(s) from {} record position(s)",
            merged.len(),
            conflict.positions.len()
        ));
        Stance::Record(merged)
    } else {
        let top = by_confidence[0].value.clone();
        resolution.dissent = conflict
            .positions
            .iter()
            .filter(|p| p.value != top)
            .map(|p| DissentRecord {
                participant: p.participant.clone(),
                severity: DissentSeverity::Reservations,
                reason: format!("Superseded by `{top}`"),
            })
            .collect();
        resolution
            .explanation
            .push(format!("Non-record stances; took most confident `{top}`"));
        top
    };

    resolution.agreement_level = ctx.config.synthesis_agreement;
    resolution.confidence = mean_confidence(conflict.positions.iter());
    resolution.outcome = Some(ResolutionOutcome::Decided(synthesized));
    Ok(resolution)
}

// =============================================================================
// VOTING
// =============================================================================

/// Confidence-weighted vote.
pub fn voting(conflict: &Conflict) -> ResolutionResult<Resolution> {
    require_positions(conflict)?;
    let tally = StanceTally::from_weighted(
        conflict
            .positions
            .iter()
            .map(|p| (&p.value, p.confidence)),
    );
    let group = tally.winner().ok_or(ResolutionError::EmptyInput)?;
    let winner = group.stance.clone();
    let share = tally.share(group);

    let mut resolution = Resolution::new(&conflict.id, ResolutionMethod::Voting);
    resolution.agreement_level = share;
    resolution.confidence =
        mean_confidence(group.members.iter().map(|&i| &conflict.positions[i]));
    resolution.dissent = conflict
        .positions
        .iter()
        .filter(|p| p.value != winner)
        .map(|p| DissentRecord {
            participant: p.participant.clone(),
            severity: if p.confidence >= OBJECTION_CONFIDENCE {
                DissentSeverity::Objects
            } else {
                DissentSeverity::Reservations
            },
            reason: format!("Outvoted: {:.1}% for `{}`", share * 100.0, winner),
        })
        .collect();
    resolution.explanation = tally
        .groups()
        .iter()
        .map(|g| {
            format!(
                "`{}`: {:.3} vote weight from {} position(s)",
                g.stance,
                g.weight,
                g.members.len()
            )
        })
        .collect();
    resolution.outcome = Some(ResolutionOutcome::Decided(winner));
    Ok(resolution)
}

// =============================================================================
// EVIDENCE EVALUATION
// =============================================================================

/// Best `evidence score × confidence` wins; agreement is the margin.
pub fn evidence_evaluation(conflict: &Conflict) -> ResolutionResult<Resolution> {
    require_positions(conflict)?;
    let scores: Vec<f64> = conflict
        .positions
        .iter()
        .map(|p| score_evidence(&p.evidence) * p.confidence)
        .collect();

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(Ordering::Equal));
    let top = scores[order[0]];
    let agreement = match order.get(1) {
        None => 1.0,
        Some(_) if top <= 0.0 => 0.0,
        Some(&second) => (top - scores[second]) / top,
    };
    let winner = conflict.positions[order[0]].value.clone();

    let mut resolution = Resolution::new(&conflict.id, ResolutionMethod::EvidenceEvaluation);
    resolution.agreement_level = agreement;
    resolution.confidence = top.min(1.0);
    resolution.dissent = order
        .iter()
        .filter(|&&i| conflict.positions[i].value != winner)
        .map(|&i| {
            let position = &conflict.positions[i];
            DissentRecord {
                participant: position.participant.clone(),
                severity: DissentSeverity::Reservations,
                reason: format!(
                    "Evidence score {:.3} (weighted {:.3} vs winning {:.3})",
                    score_evidence(&position.evidence),
                    scores[i],
                    top
                ),
            }
        })
        .collect();
    resolution.explanation = vec![format!(
        "Evidence favours `{}` with margin {:.3}",
        winner, agreement
    )];
    resolution.outcome = Some(ResolutionOutcome::Decided(winner));
    Ok(resolution)
}

// =============================================================================
// COMPROMISE
// =============================================================================

/// Everyone moves to the middle ground.
pub fn compromise(conflict: &Conflict, ctx: &ResolutionContext<'_>) -> ResolutionResult<Resolution> {
    require_positions(conflict)?;
    let middle = middle_ground(&conflict.positions).ok_or(ResolutionError::EmptyInput)?;

    let mut resolution = Resolution::new(&conflict.id, ResolutionMethod::Compromise);
    let mut unchanged = 0usize;
    let mut conceded = 0.0;
    for position in &conflict.positions {
        if position.value == middle {
            unchanged += 1;
            continue;
        }
        conceded += position.flexibility;
        resolution.compromises.push(Compromise {
            participant: position.participant.clone(),
            original: position.value.clone(),
            adopted: middle.clone(),
            flexibility: position.flexibility,
        });
        if position.flexibility < ctx.config.adoption_flexibility {
            resolution.dissent.push(DissentRecord {
                participant: position.participant.clone(),
                severity: DissentSeverity::Reservations,
                reason: format!(
                    "Moved from `{}` with flexibility {:.2}",
                    position.value, position.flexibility
                ),
            });
        }
    }

    resolution.agreement_level =
        (unchanged as f64 + conceded) / conflict.positions.len() as f64;
    resolution.confidence = ctx.config.compromise_confidence;
    resolution.explanation = vec![format!(
        "Middle ground `{}`; {} position(s) moved",
        middle,
        resolution.compromises.len()
    )];
    resolution.outcome = Some(ResolutionOutcome::Decided(middle));
    Ok(resolution)
}

// =============================================================================
// PARTITION / DEFERRAL / ESCALATION
// =============================================================================

/// Every position keeps its own scope.
pub fn partition(conflict: &Conflict) -> ResolutionResult<Resolution> {
    require_positions(conflict)?;
    let shares: BTreeMap<String, PartitionShare> = conflict
        .positions
        .iter()
        .enumerate()
        .map(|(i, p)| {
            (
                format!("partition_{i}"),
                PartitionShare {
                    participant: p.participant.clone(),
                    stance: p.value.clone(),
                },
            )
        })
        .collect();

    let mut resolution = Resolution::new(&conflict.id, ResolutionMethod::Partition);
    resolution.agreement_level = 1.0;
    resolution.confidence = mean_confidence(conflict.positions.iter());
    resolution.explanation = vec![format!("Split into {} partition(s)", shares.len())];
    resolution.outcome = Some(ResolutionOutcome::Partitioned(shares));
    Ok(resolution)
}

/// No decision now; revisit later.
pub fn deferral(conflict: &Conflict) -> Resolution {
    let mut resolution = Resolution::new(&conflict.id, ResolutionMethod::Deferral);
    resolution.follow_up.push(FOLLOW_UP_REVISIT.to_string());
    resolution.explanation = vec![format!(
        "Deferred {} conflict on `{}`",
        conflict.severity, conflict.topic
    )];
    resolution
}

/// Hand the conflict to a human, noting the leading stance.
pub fn escalation(conflict: &Conflict, reason: &str) -> Resolution {
    let (best, agreement) = match confidence_agreement(&conflict.positions) {
        Some((stance, share)) => (Some(stance), share),
        None => (None, 0.0),
    };
    escalate(&conflict.id, reason, best, agreement)
}

/// Escalation resolution with an explicit leading stance.
pub fn escalate(
    conflict_id: &str,
    reason: &str,
    best: Option<Stance>,
    agreement: f64,
) -> Resolution {
    let mut resolution = Resolution::new(conflict_id, ResolutionMethod::Escalation);
    resolution.agreement_level = agreement;
    resolution.follow_up.push(FOLLOW_UP_HUMAN_REVIEW.to_string());
    resolution.explanation = vec![format!("Escalated: {reason}")];
    resolution.outcome = Some(ResolutionOutcome::Escalated {
        reason: reason.to_string(),
        best,
    });
    resolution
}

// =============================================================================
// HELPERS
// =============================================================================

fn require_positions(conflict: &Conflict) -> ResolutionResult<()> {
    if conflict.positions.is_empty() {
        return Err(ResolutionError::EmptyInput);
    }
    Ok(())
}

fn mean_confidence<'a, I>(positions: I) -> f64
where
    I: Iterator<Item = &'a Position>,
{
    let (sum, count) = positions.fold((0.0, 0usize), |(s, c), p| (s + p.confidence, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn confidence_share(positions: &[Position], stance: &Stance) -> f64 {
    let tally = StanceTally::from_weighted(positions.iter().map(|p| (&p.value, p.confidence)));
    tally
        .groups()
        .iter()
        .find(|g| g.stance == *stance)
        .map(|g| tally.share(g))
        .unwrap_or(0.0)
}
