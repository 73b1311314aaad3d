use std::collections::HashMap;

use proptest::prelude::*;

use crate::tree::{
    histogram::{KnowledgeMode, ParticleHistogram},
    ids::StateId,
};

fn mode_strategy() -> impl Strategy<Value = KnowledgeMode> {
    prop_oneof![Just(KnowledgeMode::MaxFrequency), Just(KnowledgeMode::Entropy)]
}

proptest! {
    #[test]
    fn histogram_counts_always_sum_to_total(
        mode in mode_strategy(),
        sequence in proptest::collection::vec(0usize..8, 1..256),
    ) {
        let mut histogram = ParticleHistogram::new(mode);
        let mut expected_counts: HashMap<usize, u32> = HashMap::new();

        for raw_state in sequence.iter().copied() {
            histogram.update(StateId::from(raw_state));
            *expected_counts.entry(raw_state).or_insert(0) += 1;
        }

        prop_assert_eq!(histogram.total() as usize, sequence.len());
        prop_assert_eq!(histogram.len(), expected_counts.len());

        for (raw_state, count) in &expected_counts {
            prop_assert_eq!(histogram.count_for(StateId::from(*raw_state)), Some(*count));
        }

        let particles = histogram.into_particles();
        let sum: u32 = particles.iter().map(|(_, count)| *count).sum();
        prop_assert_eq!(sum as usize, sequence.len());
    }

    #[test]
    fn repeating_a_state_never_lowers_max_frequency(
        prefix in proptest::collection::vec(0usize..6, 0..64),
        repeated in 0usize..6,
        repeats in 1usize..64,
    ) {
        let mut histogram = ParticleHistogram::new(KnowledgeMode::MaxFrequency);
        for raw_state in prefix {
            histogram.update(StateId::from(raw_state));
        }

        let mut previous = histogram.knowledge();
        for _ in 0..repeats {
            let knowledge = histogram.update(StateId::from(repeated));
            prop_assert!(knowledge >= previous - 1e-12);
            previous = knowledge;
        }
    }

    #[test]
    fn max_frequency_matches_peak_count(sequence in proptest::collection::vec(0usize..5, 1..128)) {
        let mut histogram = ParticleHistogram::new(KnowledgeMode::MaxFrequency);
        let mut counts = [0u32; 5];

        for raw_state in sequence.iter().copied() {
            histogram.update(StateId::from(raw_state));
            counts[raw_state] += 1;
        }

        let peak = counts.iter().copied().max().unwrap_or(0);
        let expected = peak as f64 / sequence.len() as f64;
        prop_assert!((histogram.knowledge() - expected).abs() < 1e-12);
        prop_assert!(histogram.knowledge() > 0.0 && histogram.knowledge() <= 1.0);
    }
}
