//! Consensus strategies
//!
//! Every strategy is a pure function of the request, a [`WeightContext`]
//! snapshot and the configuration. None of them touch shared state; the
//! service applies trust updates after the fact.
//!
//! | Strategy | Decides by |
//! |----------|------------|
//! | unanimous | all stances equal, else weighted-majority |
//! | weighted-majority | heaviest stance group |
//! | expert-led | weighted-majority with experts' confidence doubled |
//! | evidence-based | highest evidence × confidence |
//! | byzantine-fault-tolerant | group of at least N − ⌊N/3⌋, else weighted-majority |
//! | delphi-method | up to 3 weighted-majority rounds with confidence feedback |
//! | hybrid | confidence vote across weighted-majority, expert-led, evidence-based |

use super::{
    ConsensusConfig, ConsensusError, ConsensusMethod, ConsensusRequest, ConsensusResult,
    Dissenter, EngineResult, Opinion, WeightContext,
};
use shared_types::{score_evidence, EvidenceSummary, Stance, StanceTally};
use std::cmp::Ordering;
use std::time::Duration;

/// Run the given strategy.
pub fn run_strategy(
    method: ConsensusMethod,
    request: &ConsensusRequest,
    ctx: &WeightContext,
    config: &ConsensusConfig,
) -> EngineResult<ConsensusResult> {
    match method {
        ConsensusMethod::Unanimous => unanimous(request, ctx),
        ConsensusMethod::WeightedMajority => weighted_majority(request, ctx),
        ConsensusMethod::ExpertLed => expert_led(request, ctx, config),
        ConsensusMethod::EvidenceBased => evidence_based(request),
        ConsensusMethod::ByzantineFaultTolerant => byzantine_fault_tolerant(request, ctx),
        ConsensusMethod::DelphiMethod => delphi(request, ctx, config),
        ConsensusMethod::Hybrid => hybrid(request, ctx, config),
    }
}

// =============================================================================
// WEIGHTED MAJORITY
// =============================================================================

/// Heaviest stance group wins; agreement is its share of the total weight.
pub fn weighted_majority(
    request: &ConsensusRequest,
    ctx: &WeightContext,
) -> EngineResult<ConsensusResult> {
    boosted_majority(request, ctx, ConsensusMethod::WeightedMajority, |_| 1.0)
}

fn boosted_majority<F>(
    request: &ConsensusRequest,
    ctx: &WeightContext,
    method: ConsensusMethod,
    boost: F,
) -> EngineResult<ConsensusResult>
where
    F: Fn(&Opinion) -> f64,
{
    require_opinions(request)?;
    let tally = ctx.tally(request, boost);
    let winner = tally
        .winner()
        .ok_or_else(|| ConsensusError::NoConsensus("no stance groups".to_string()))?;
    let agreement = tally.share(winner);
    let confidence = mean_confidence(winner.members.iter().map(|&i| &request.opinions[i]));

    let mut explanation = vec![format!(
        "{} over {} opinion(s) in {} group(s)",
        method,
        request.opinions.len(),
        tally.groups().len()
    )];
    for group in tally.groups() {
        explanation.push(format!(
            "`{}`: weight {:.3} ({:.1}%) from {} opinion(s)",
            group.stance,
            group.weight,
            tally.share(group) * 100.0,
            group.members.len()
        ));
    }
    if tally.total() == 0.0 {
        explanation.push("Total weight is zero; agreement reported as 0".to_string());
    }
    explanation.push(format!(
        "Selected `{}` with agreement {:.3}",
        winner.stance, agreement
    ));

    let dissenters = dissenters_against(request, &tally, &winner.stance);
    Ok(outcome(
        request,
        method,
        winner.stance.clone(),
        agreement,
        confidence,
        dissenters,
        explanation,
    ))
}

// =============================================================================
// UNANIMOUS
// =============================================================================

/// Full agreement when every stance is equal, weighted-majority otherwise.
pub fn unanimous(request: &ConsensusRequest, ctx: &WeightContext) -> EngineResult<ConsensusResult> {
    require_opinions(request)?;
    let first = &request.opinions[0].value;
    if request.opinions.iter().all(|o| o.value == *first) {
        return Ok(outcome(
            request,
            ConsensusMethod::Unanimous,
            first.clone(),
            1.0,
            mean_confidence(request.opinions.iter()),
            Vec::new(),
            vec![format!(
                "All {} opinion(s) agree on `{}`",
                request.opinions.len(),
                first
            )],
        ));
    }

    let mut result = weighted_majority(request, ctx)?;
    result.explanation.insert(
        0,
        "Opinions are not unanimous; delegated to weighted-majority".to_string(),
    );
    Ok(result)
}

// =============================================================================
// EXPERT-LED
// =============================================================================

/// Weighted-majority with the confidence of domain experts doubled.
pub fn expert_led(
    request: &ConsensusRequest,
    ctx: &WeightContext,
    config: &ConsensusConfig,
) -> EngineResult<ConsensusResult> {
    require_opinions(request)?;
    let Some(domain) = request.domain.as_deref() else {
        return delegate(request, ctx, "No domain given; expert-led delegated to weighted-majority");
    };

    let mut experts: Vec<(&str, f64)> = Vec::new();
    for opinion in &request.opinions {
        let Some(score) = ctx.specialization(&opinion.participant, domain) else {
            continue;
        };
        if score > config.expert_threshold
            && !experts.iter().any(|(id, _)| *id == opinion.participant)
        {
            experts.push((opinion.participant.as_str(), score));
        }
    }

    let Some(&(top_id, top_score)) = experts
        .iter()
        .fold(None, |best: Option<&(&str, f64)>, e| match best {
            Some(b) if b.1 >= e.1 => Some(b),
            _ => Some(e),
        })
    else {
        return delegate(
            request,
            ctx,
            "No experts for this domain; expert-led delegated to weighted-majority",
        );
    };

    let boost = config.expert_boost;
    let mut result = boosted_majority(request, ctx, ConsensusMethod::ExpertLed, |op| {
        if experts.iter().any(|(id, _)| *id == op.participant) {
            boost
        } else {
            1.0
        }
    })?;
    result.explanation.insert(
        0,
        format!(
            "{} expert(s) in `{}`; top expert {} ({:.2})",
            experts.len(),
            domain,
            top_id,
            top_score
        ),
    );
    Ok(result)
}

// =============================================================================
// EVIDENCE-BASED
// =============================================================================

/// Highest `evidence score × confidence` wins.
///
/// Agreement is the winner's margin over the runner-up relative to the
/// winner's score.
pub fn evidence_based(request: &ConsensusRequest) -> EngineResult<ConsensusResult> {
    require_opinions(request)?;
    let scores: Vec<f64> = request
        .opinions
        .iter()
        .map(|o| score_evidence(&o.evidence) * o.confidence)
        .collect();

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(Ordering::Equal));

    let top = scores[order[0]];
    let agreement = match order.get(1) {
        None => 1.0,
        Some(_) if top <= 0.0 => 0.0,
        Some(&second) => (top - scores[second]) / top,
    };
    let winner = request.opinions[order[0]].value.clone();

    let mut explanation = vec![format!(
        "Evidence-based over {} opinion(s)",
        request.opinions.len()
    )];
    for &i in &order {
        let op = &request.opinions[i];
        explanation.push(format!(
            "{} → `{}` scored {:.3} ({} evidence item(s))",
            op.participant,
            op.value,
            scores[i],
            op.evidence.len()
        ));
    }
    explanation.push(format!(
        "Selected `{}` with margin agreement {:.3}",
        winner, agreement
    ));

    let tally = StanceTally::from_weighted(
        request
            .opinions
            .iter()
            .zip(scores.iter())
            .map(|(o, s)| (&o.value, *s)),
    );
    let dissenters = dissenters_against(request, &tally, &winner);
    Ok(outcome(
        request,
        ConsensusMethod::EvidenceBased,
        winner,
        agreement,
        top.min(1.0),
        dissenters,
        explanation,
    ))
}

// =============================================================================
// BYZANTINE FAULT TOLERANT
// =============================================================================

/// Quorum heuristic: a stance held by at least `N − ⌊N/3⌋` opinions wins.
///
/// Opinions are counted, not weighted. Two opinions from the same
/// participant id both count; double voting is not detected.
pub fn byzantine_fault_tolerant(
    request: &ConsensusRequest,
    ctx: &WeightContext,
) -> EngineResult<ConsensusResult> {
    require_opinions(request)?;
    let n = request.opinions.len();
    let f = n / 3;
    let required = n - f;

    let counts = StanceTally::from_counts(request.opinions.iter().map(|o| &o.value));
    if let Some(group) = counts.winner().filter(|g| g.members.len() >= required) {
        let size = group.members.len();
        let dissenters = dissenters_against(request, &counts, &group.stance);
        return Ok(outcome(
            request,
            ConsensusMethod::ByzantineFaultTolerant,
            group.stance.clone(),
            size as f64 / n as f64,
            mean_confidence(group.members.iter().map(|&i| &request.opinions[i])),
            dissenters,
            vec![
                format!("Quorum: {size} of {n} opinions agree (f = {f}, required {required})"),
                format!("Selected `{}`", group.stance),
            ],
        ));
    }

    let mut result = weighted_majority(request, ctx)?;
    result.explanation.insert(
        0,
        format!("No group reached the quorum of {required} of {n} (f = {f}); fell back to weighted-majority"),
    );
    Ok(result)
}

// =============================================================================
// DELPHI
// =============================================================================

/// Iterated weighted-majority with confidence feedback between rounds.
pub fn delphi(
    request: &ConsensusRequest,
    ctx: &WeightContext,
    config: &ConsensusConfig,
) -> EngineResult<ConsensusResult> {
    require_opinions(request)?;
    let max_rounds = config.delphi_max_rounds.max(1);
    let mut current = request.clone();
    let mut trail = Vec::new();
    let mut round: u8 = 1;

    loop {
        let mut interim = weighted_majority(&current, ctx)?;
        trail.push(format!(
            "Round {}: `{}` at agreement {:.3}",
            round, interim.final_value, interim.agreement_level
        ));

        if interim.agreement_level > config.delphi_early_stop || round >= max_rounds {
            trail.append(&mut interim.explanation);
            interim.method = ConsensusMethod::DelphiMethod;
            interim.rounds = round;
            interim.explanation = trail;
            return Ok(interim);
        }

        let opinions = current
            .opinions
            .iter()
            .map(|o| {
                let mut o = o.clone();
                o.confidence = if o.value == interim.final_value {
                    (o.confidence * config.delphi_agree_factor).min(1.0)
                } else {
                    o.confidence * config.delphi_disagree_factor
                };
                o
            })
            .collect();
        current = current.with_opinions(opinions);
        round += 1;
    }
}

// =============================================================================
// HYBRID
// =============================================================================

/// Confidence vote across weighted-majority, expert-led and evidence-based.
pub fn hybrid(
    request: &ConsensusRequest,
    ctx: &WeightContext,
    config: &ConsensusConfig,
) -> EngineResult<ConsensusResult> {
    require_opinions(request)?;
    let runs = [
        weighted_majority(request, ctx)?,
        expert_led(request, ctx, config)?,
        evidence_based(request)?,
    ];

    let votes = StanceTally::from_weighted(runs.iter().map(|r| (&r.final_value, r.confidence)));
    let winner = votes
        .winner()
        .map(|g| g.stance.clone())
        .ok_or_else(|| ConsensusError::NoConsensus("hybrid runs produced no value".to_string()))?;

    let count = runs.len() as f64;
    let agreement = runs.iter().map(|r| r.agreement_level).sum::<f64>() / count;
    let confidence = runs.iter().map(|r| r.confidence).sum::<f64>() / count;

    let mut explanation = vec!["Hybrid of three independent strategies".to_string()];
    for run in &runs {
        explanation.push(format!(
            "{} → `{}` (agreement {:.3}, confidence {:.3})",
            run.method, run.final_value, run.agreement_level, run.confidence
        ));
    }
    explanation.push(format!("Selected `{winner}` by summed confidence"));

    let tally = ctx.tally(request, |_| 1.0);
    let dissenters = dissenters_against(request, &tally, &winner);
    Ok(outcome(
        request,
        ConsensusMethod::Hybrid,
        winner,
        agreement,
        confidence,
        dissenters,
        explanation,
    ))
}

// =============================================================================
// HELPERS
// =============================================================================

fn require_opinions(request: &ConsensusRequest) -> EngineResult<()> {
    if request.opinions.is_empty() {
        return Err(ConsensusError::EmptyInput);
    }
    Ok(())
}

fn delegate(
    request: &ConsensusRequest,
    ctx: &WeightContext,
    note: &str,
) -> EngineResult<ConsensusResult> {
    let mut result = weighted_majority(request, ctx)?;
    result.explanation.insert(0, note.to_string());
    Ok(result)
}

fn mean_confidence<'a, I>(opinions: I) -> f64
where
    I: Iterator<Item = &'a Opinion>,
{
    let (sum, count) = opinions.fold((0.0, 0usize), |(s, c), o| (s + o.confidence, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn dissenters_against(
    request: &ConsensusRequest,
    tally: &StanceTally,
    winner: &Stance,
) -> Vec<Dissenter> {
    request
        .opinions
        .iter()
        .enumerate()
        .filter(|(_, op)| op.value != *winner)
        .map(|(i, op)| Dissenter {
            participant: op.participant.clone(),
            value: op.value.clone(),
            confidence: op.confidence,
            weight_share: tally.group_of(i).map(|g| tally.share(g)).unwrap_or(0.0),
        })
        .collect()
}

fn outcome(
    request: &ConsensusRequest,
    method: ConsensusMethod,
    final_value: Stance,
    agreement_level: f64,
    confidence: f64,
    dissenters: Vec<Dissenter>,
    explanation: Vec<String>,
) -> ConsensusResult {
    let evidence = EvidenceSummary::collect(
        request
            .opinions
            .iter()
            .filter(|o| o.value == final_value)
            .map(|o| o.evidence.as_slice()),
    );
    ConsensusResult {
        topic: request.topic.clone(),
        final_value,
        agreement_level,
        confidence,
        method,
        dissenters,
        explanation,
        evidence,
        rounds: 1,
        duration: Duration::ZERO,
    }
}
