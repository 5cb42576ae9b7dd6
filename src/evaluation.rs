//! Ranking quality of a score map against the true infected set
//!
//! Observed nodes are excluded: they are known infected, so ranking them
//! says nothing about a measure. The remaining nodes are labeled positive
//! when infected and scored by the map under test.
//!
//! - AUC is the Mann-Whitney statistic: the probability that a random
//!   positive outscores a random negative, ties counted as 0.5.
//! - The ROC curve sweeps thresholds from the highest score down. It starts
//!   at `(0, 0)` with an infinite threshold and, by default, omits points
//!   collinear with their neighbors.
//!
//! When all evaluated nodes share one label the AUC is undefined and
//! [`LocalizationError::DegenerateEvaluation`] is returned.

use crate::error::{LocalizationError, Result};
use crate::graph::{Node, NodeSet};
use crate::scores::ScoreMap;
use serde::{Deserialize, Serialize};

/// One operating point of the classifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocPoint {
    /// False positive rate
    pub fpr: f64,
    /// True positive rate
    pub tpr: f64,
    /// Nodes scoring at or above this value are predicted infected
    pub threshold: f64,
}

/// ROC curve, ordered by descending threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocCurve {
    pub points: Vec<RocPoint>,
}

impl RocCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn fpr(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.fpr).collect()
    }

    pub fn tpr(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.tpr).collect()
    }

    pub fn thresholds(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.threshold).collect()
    }

    /// Trapezoidal area under the curve
    pub fn area(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| (w[1].fpr - w[0].fpr) * (w[1].tpr + w[0].tpr) / 2.0)
            .sum()
    }
}

/// Outcome of evaluating one score map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub auc: f64,
    pub roc: RocCurve,
    /// Infected nodes among the evaluated ones
    pub positives: usize,
    /// Healthy nodes among the evaluated ones
    pub negatives: usize,
}

/// Computes AUC and ROC for score maps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingEvaluator {
    drop_intermediate: bool,
}

impl Default for RankingEvaluator {
    fn default() -> Self {
        Self {
            drop_intermediate: true,
        }
    }
}

impl RankingEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep every distinct threshold on the ROC curve.
    pub fn keep_intermediate() -> Self {
        Self {
            drop_intermediate: false,
        }
    }

    /// Evaluate `scores` on every node outside `observed`.
    pub fn evaluate<N: Node>(
        &self,
        infected: &NodeSet<N>,
        scores: &ScoreMap<N>,
        observed: &NodeSet<N>,
    ) -> Result<EvaluationResult> {
        let (labels, values): (Vec<bool>, Vec<f64>) = scores
            .iter()
            .filter(|(node, _)| !observed.contains(node))
            .map(|(node, score)| (infected.contains(node), score))
            .unzip();

        self.evaluate_labels(&labels, &values)
    }

    /// Evaluate parallel label and score arrays.
    pub fn evaluate_labels(&self, labels: &[bool], scores: &[f64]) -> Result<EvaluationResult> {
        let (positives, negatives) = class_counts(labels, scores)?;
        Ok(EvaluationResult {
            auc: mann_whitney_auc(labels, scores, positives, negatives),
            roc: build_roc(labels, scores, positives, negatives, self.drop_intermediate),
            positives,
            negatives,
        })
    }
}

/// Evaluate with the default evaluator.
pub fn auc_score<N: Node>(
    infected: &NodeSet<N>,
    scores: &ScoreMap<N>,
    observed: &NodeSet<N>,
) -> Result<EvaluationResult> {
    RankingEvaluator::default().evaluate(infected, scores, observed)
}

/// Area under the ROC curve for parallel label/score arrays.
pub fn roc_auc(labels: &[bool], scores: &[f64]) -> Result<f64> {
    let (positives, negatives) = class_counts(labels, scores)?;
    Ok(mann_whitney_auc(labels, scores, positives, negatives))
}

/// ROC curve for parallel label/score arrays.
pub fn roc_curve(labels: &[bool], scores: &[f64], drop_intermediate: bool) -> Result<RocCurve> {
    let (positives, negatives) = class_counts(labels, scores)?;
    Ok(build_roc(labels, scores, positives, negatives, drop_intermediate))
}

/// Validate inputs and count both classes.
fn class_counts(labels: &[bool], scores: &[f64]) -> Result<(usize, usize)> {
    if labels.len() != scores.len() {
        return Err(LocalizationError::config(format!(
            "{} labels but {} scores",
            labels.len(),
            scores.len()
        )));
    }
    if let Some(i) = scores.iter().position(|s| s.is_nan()) {
        return Err(LocalizationError::config(format!("score {} is NaN", i)));
    }

    let positives = labels.iter().filter(|&&l| l).count();
    let negatives = labels.len() - positives;
    if positives == 0 || negatives == 0 {
        return Err(LocalizationError::DegenerateEvaluation {
            positives,
            negatives,
        });
    }
    Ok((positives, negatives))
}

fn mann_whitney_auc(labels: &[bool], scores: &[f64], positives: usize, negatives: usize) -> f64 {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    // Tied scores share their average rank.
    let mut sum_rank_pos = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        let avg_rank = (start + 1 + end) as f64 * 0.5;
        let pos_in_group = order[start..end].iter().filter(|&&i| labels[i]).count();
        sum_rank_pos += avg_rank * pos_in_group as f64;
        start = end;
    }

    let p = positives as f64;
    let n = negatives as f64;
    (sum_rank_pos - p * (p + 1.0) / 2.0) / (p * n)
}

fn build_roc(
    labels: &[bool],
    scores: &[f64],
    positives: usize,
    negatives: usize,
    drop_intermediate: bool,
) -> RocCurve {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    // Cumulative counts at the last index of each distinct score.
    let mut tps = Vec::new();
    let mut fps = Vec::new();
    let mut thresholds = Vec::new();
    let (mut tp, mut fp) = (0usize, 0usize);
    for (pos, &i) in order.iter().enumerate() {
        if labels[i] {
            tp += 1;
        } else {
            fp += 1;
        }
        let group_ends = order
            .get(pos + 1)
            .map_or(true, |&next| scores[next] != scores[i]);
        if group_ends {
            tps.push(tp);
            fps.push(fp);
            thresholds.push(scores[i]);
        }
    }

    let keep: Vec<usize> = if drop_intermediate && fps.len() > 2 {
        let last = fps.len() - 1;
        (0..fps.len())
            .filter(|&k| {
                k == 0
                    || k == last
                    || fps[k - 1] + fps[k + 1] != 2 * fps[k]
                    || tps[k - 1] + tps[k + 1] != 2 * tps[k]
            })
            .collect()
    } else {
        (0..fps.len()).collect()
    };

    let mut points = Vec::with_capacity(keep.len() + 1);
    points.push(RocPoint {
        fpr: 0.0,
        tpr: 0.0,
        threshold: f64::INFINITY,
    });
    points.extend(keep.into_iter().map(|k| RocPoint {
        fpr: fps[k] as f64 / negatives as f64,
        tpr: tps[k] as f64 / positives as f64,
        threshold: thresholds[k],
    }));

    RocCurve { points }
}
