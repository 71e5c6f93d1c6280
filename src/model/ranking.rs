//! Turning raw model scores into ranked predictions

use super::{Labels, Prediction};

/// Numerically stable softmax
pub fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|&s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();

    if sum > 0.0 && sum.is_finite() {
        exps.into_iter().map(|e| e / sum).collect()
    } else {
        vec![0.0; scores.len()]
    }
}

/// Top `k` predictions, highest probability first
pub fn rank(scores: &[f32], labels: &Labels, k: usize, apply_softmax: bool) -> Vec<Prediction> {
    let probabilities = if apply_softmax {
        softmax(scores)
    } else {
        scores.to_vec()
    };

    let mut indexed: Vec<(usize, f32)> = probabilities
        .into_iter()
        .map(|p| if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) })
        .enumerate()
        .collect();
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1));
    indexed.truncate(k);

    indexed
        .into_iter()
        .map(|(index, probability)| Prediction {
            label: labels.get(index),
            probability,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Labels {
        Labels::parse("cat\ndog\nfox\nowl").unwrap()
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0, 1000.0]);
        let sum: f32 = probs.iter().sum();

        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probs[3] > 0.99);
    }

    #[test]
    fn test_rank_orders_descending_and_truncates() {
        let ranked = rank(&[0.1, 0.5, 0.15, 0.25], &labels(), 3, false);

        let names: Vec<&str> = ranked.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(names, vec!["dog", "owl", "fox"]);
        assert!(ranked.windows(2).all(|w| w[0].probability >= w[1].probability));
    }

    #[test]
    fn test_rank_with_softmax_yields_probabilities() {
        let ranked = rank(&[2.0, -1.0, 5.0, 0.0], &labels(), 2, true);

        assert_eq!(ranked[0].label, "fox");
        assert_eq!(ranked[1].label, "cat");
        assert!(ranked.iter().all(|p| (0.0..=1.0).contains(&p.probability)));
    }

    #[test]
    fn test_rank_clamps_out_of_range_scores() {
        let ranked = rank(&[3.0, -2.0], &labels(), 5, false);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].probability, 1.0);
        assert_eq!(ranked[1].probability, 0.0);
    }
}
