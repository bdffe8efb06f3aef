//! Evaluation metrics for a fitted cultivar classifier.

#[derive(Debug, Clone)]
/// Confusion matrix over a fixed, ordered list of class ids.
pub struct ConfusionMatrix {
    /// Class ids, in row/column order.
    pub class_ids: Vec<u32>,
    /// Row-major `KxK` counts (`truth * K + predicted`).
    pub counts: Vec<u32>,
}

impl ConfusionMatrix {
    pub fn new(class_ids: Vec<u32>) -> Self {
        let k = class_ids.len();
        Self {
            class_ids,
            counts: vec![0; k * k],
        }
    }

    pub fn n_classes(&self) -> usize {
        self.class_ids.len()
    }

    /// Record one prediction. Ids outside the matrix are ignored and reported as `false`.
    pub fn add(&mut self, truth: u32, predicted: u32) -> bool {
        let (Some(t), Some(p)) = (self.position(truth), self.position(predicted)) else {
            return false;
        };
        let idx = t * self.n_classes() + p;
        self.counts[idx] = self.counts[idx].saturating_add(1);
        true
    }

    pub fn get(&self, truth_idx: usize, predicted_idx: usize) -> u32 {
        self.counts[truth_idx * self.n_classes() + predicted_idx]
    }

    fn position(&self, class_id: u32) -> Option<usize> {
        self.class_ids.iter().position(|&id| id == class_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Precision/recall statistics for a single class.
pub struct PerClassStats {
    pub class_id: u32,
    /// `TP / (TP + FP)`.
    pub precision: f64,
    /// `TP / (TP + FN)`.
    pub recall: f64,
    /// Number of true examples of the class.
    pub support: u32,
}

impl PerClassStats {
    pub fn f1(&self) -> f64 {
        if self.precision + self.recall == 0.0 {
            0.0
        } else {
            2.0 * self.precision * self.recall / (self.precision + self.recall)
        }
    }
}

pub fn precision_recall_by_class(cm: &ConfusionMatrix) -> Vec<PerClassStats> {
    let k = cm.n_classes();
    (0..k)
        .map(|class_idx| {
            let tp = cm.get(class_idx, class_idx) as f64;
            let support: u32 = (0..k).map(|j| cm.get(class_idx, j)).sum();
            let predicted: u32 = (0..k).map(|i| cm.get(i, class_idx)).sum();
            let precision = if predicted == 0 { 0.0 } else { tp / predicted as f64 };
            let recall = if support == 0 { 0.0 } else { tp / support as f64 };
            PerClassStats {
                class_id: cm.class_ids[class_idx],
                precision,
                recall,
                support,
            }
        })
        .collect()
}

/// Fraction of correct predictions; 0 for an empty matrix.
pub fn accuracy(cm: &ConfusionMatrix) -> f64 {
    let total: u64 = cm.counts.iter().map(|&v| v as u64).sum();
    if total == 0 {
        return 0.0;
    }
    let correct: u64 = (0..cm.n_classes()).map(|i| cm.get(i, i) as u64).sum();
    correct as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_class_stats_from_counts() {
        let mut cm = ConfusionMatrix::new(vec![1, 2, 3]);
        for (truth, predicted) in [(1, 1), (1, 1), (1, 2), (2, 2), (3, 3), (3, 2)] {
            assert!(cm.add(truth, predicted));
        }
        assert!(!cm.add(9, 1));
        let stats = precision_recall_by_class(&cm);
        assert_eq!(stats[0].support, 3);
        assert!((stats[0].recall - 2.0 / 3.0).abs() < 1e-12);
        assert!((stats[0].precision - 1.0).abs() < 1e-12);
        assert!((stats[1].precision - 1.0 / 3.0).abs() < 1e-12);
        assert!((accuracy(&cm) - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn f1_handles_zero_scores() {
        let stats = PerClassStats {
            class_id: 1,
            precision: 0.0,
            recall: 0.0,
            support: 0,
        };
        assert_eq!(stats.f1(), 0.0);
    }

    #[test]
    fn empty_matrix_has_zero_accuracy() {
        assert_eq!(accuracy(&ConfusionMatrix::new(vec![1, 2])), 0.0);
    }
}
