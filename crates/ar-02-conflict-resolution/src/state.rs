use crate::domain::{Resolution, ResolutionMethod, ResolutionStatistics};
use parking_lot::RwLock;
use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

/// Bounded resolution history; the oldest entry goes first.
pub struct ResolverState {
    history: RwLock<VecDeque<Resolution>>,
    capacity: usize,
}

impl ResolverState {
    pub fn new(capacity: usize) -> Self {
        Self {
            history: RwLock::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn record(&self, resolution: Resolution) {
        let mut history = self.history.write();
        while history.len() >= self.capacity {
            history.pop_front();
        }
        history.push_back(resolution);
    }

    pub fn history(&self) -> Vec<Resolution> {
        self.history.read().iter().cloned().collect()
    }

    pub fn statistics(&self) -> ResolutionStatistics {
        let history = self.history.read();
        if history.is_empty() {
            return ResolutionStatistics::default();
        }

        let mut method_distribution: BTreeMap<ResolutionMethod, usize> = BTreeMap::new();
        let mut agreement = 0.0;
        let mut duration = Duration::ZERO;
        let mut escalated = 0usize;
        for resolution in history.iter() {
            *method_distribution.entry(resolution.method).or_default() += 1;
            agreement += resolution.agreement_level;
            duration += resolution.duration;
            if resolution.method == ResolutionMethod::Escalation {
                escalated += 1;
            }
        }

        let total = history.len();
        ResolutionStatistics {
            total_resolutions: total,
            method_distribution,
            average_agreement: agreement / total as f64,
            average_duration: duration / total as u32,
            escalation_rate: escalated as f64 / total as f64,
        }
    }
}
