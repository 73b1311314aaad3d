use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::tree::ids::StateId;

/// Controls how a particle histogram turns its counts into a knowledge measure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeMode {
    /// Frequency of the most common particle over all particles.
    #[default]
    MaxFrequency,
    /// Running negative Shannon entropy of the particle frequencies.
    Entropy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
/// Occurrences of a single state, plus its last entropy term in `Entropy` mode.
struct ParticleCount {
    count: u32,
    negative_entropy: f64,
}

#[derive(Debug, Clone)]
/// Counts how often each state was seen at a belief node.
/// Most nodes only ever see a handful of distinct states, so this is a sparse
/// map with O(1) insertion rather than a dense vector over all states.
pub struct ParticleHistogram {
    mode: KnowledgeMode,
    counts: HashMap<StateId, ParticleCount>,
    total: u32,
    knowledge: f64,
    peak: Option<StateId>,
}

impl ParticleHistogram {
    /// Create a new empty histogram
    pub fn new(mode: KnowledgeMode) -> Self {
        ParticleHistogram {
            mode,
            counts: HashMap::new(),
            total: 0,
            knowledge: 0.0,
            peak: None,
        }
    }

    /// Add one particle for `state` and refresh the cached knowledge measure.
    /// Returns the new knowledge measure.
    pub fn update(&mut self, state: StateId) -> f64 {
        self.total += 1;
        let total = self.total as f64;

        let entry = self.counts.entry(state).or_default();
        entry.count += 1;
        let count = entry.count;

        match self.mode {
            KnowledgeMode::MaxFrequency => {
                let peak_count = self
                    .peak
                    .and_then(|peak| self.counts.get(&peak))
                    .map_or(0, |peak| peak.count);
                if count > peak_count {
                    self.peak = Some(state);
                }
                let peak_count = count.max(peak_count);
                self.knowledge = peak_count as f64 / total;
            }
            KnowledgeMode::Entropy => {
                // Only the touched state's term is refreshed; the other terms
                // keep the probabilities they had when last touched.
                let p = count as f64 / total;
                let term = p * p.ln();
                self.knowledge += term - entry.negative_entropy;
                entry.negative_entropy = term;
            }
        }

        self.knowledge
    }

    /// Return the cached knowledge measure.
    pub fn knowledge(&self) -> f64 {
        self.knowledge
    }

    /// Return the mode used to compute the knowledge measure.
    pub fn mode(&self) -> KnowledgeMode {
        self.mode
    }

    /// Return the total number of particles added.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Return the amount of distinct states seen.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Return the count for a given state, if it has been seen.
    pub fn count_for(&self, state: StateId) -> Option<u32> {
        self.counts.get(&state).map(|particle| particle.count)
    }

    /// Return the state with the highest count seen so far in `MaxFrequency` mode.
    pub fn peak(&self) -> Option<StateId> {
        self.peak
    }

    /// Consume the histogram into a `(state, count)` list sorted by state.
    pub fn into_particles(self) -> Vec<(StateId, u32)> {
        let mut particles: Vec<(StateId, u32)> = self
            .counts
            .into_iter()
            .map(|(state, particle)| (state, particle.count))
            .collect();
        particles.sort_unstable_by_key(|(state, _)| *state);
        particles
    }
}
