use crate::domain::{ConsensusMethod, ConsensusMetrics, ConsensusResult};
use parking_lot::RwLock;
use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

/// Bounded consensus history.
///
/// Past `capacity` entries the oldest result is dropped.
pub struct ConsensusState {
    history: RwLock<VecDeque<ConsensusResult>>,
    capacity: usize,
}

impl ConsensusState {
    pub fn new(capacity: usize) -> Self {
        Self {
            history: RwLock::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity: capacity.max(1),
        }
    }

    pub fn record(&self, result: ConsensusResult) {
        let mut history = self.history.write();
        while history.len() >= self.capacity {
            history.pop_front();
        }
        history.push_back(result);
    }

    pub fn history(&self) -> Vec<ConsensusResult> {
        self.history.read().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.history.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.read().is_empty()
    }

    /// Aggregate the retained history.
    pub fn metrics(&self) -> ConsensusMetrics {
        let history = self.history.read();
        let total = history.len();
        if total == 0 {
            return ConsensusMetrics::default();
        }

        let mut method_distribution: BTreeMap<ConsensusMethod, usize> = BTreeMap::new();
        let mut agreement = 0.0;
        let mut confidence = 0.0;
        let mut duration = Duration::ZERO;
        let mut with_dissent = 0usize;
        for result in history.iter() {
            *method_distribution.entry(result.method).or_default() += 1;
            agreement += result.agreement_level;
            confidence += result.confidence;
            duration += result.duration;
            if !result.dissenters.is_empty() {
                with_dissent += 1;
            }
        }

        let n = total as f64;
        ConsensusMetrics {
            total_consensus: total,
            method_distribution,
            average_agreement: agreement / n,
            average_confidence: confidence / n,
            average_duration: duration / total as u32,
            dissent_rate: with_dissent as f64 / n,
        }
    }
}
