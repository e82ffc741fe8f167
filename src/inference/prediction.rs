//! Logits to label and confidence.

use crate::error::{Error, Result};
use crate::inference::labels::LabelTable;

/// Outcome of one forward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassPrediction {
    /// Index of the most probable class.
    pub index: usize,
    /// Lower-cased label of that class.
    pub label: String,
    /// Probability of that class.
    pub confidence: f32,
    /// Full probability distribution.
    pub probabilities: Vec<f32>,
}

impl ClassPrediction {
    /// Softmax the logits, pick the argmax and look up its label.
    pub fn from_logits(logits: &[f32], labels: &LabelTable) -> Result<Self> {
        if let Some(bad) = logits.iter().find(|l| !l.is_finite()) {
            return Err(Error::Inference {
                reason: format!("model produced non-finite logit {bad}"),
            });
        }
        let probabilities = softmax(logits);
        let index = argmax(&probabilities).ok_or_else(|| Error::Inference {
            reason: "model produced no logits".to_string(),
        })?;
        let confidence = probabilities[index];
        let label = labels.label(index)?;
        Ok(Self {
            index,
            label,
            confidence,
            probabilities,
        })
    }
}

/// Numerically stable softmax.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index of the largest value; the first one wins ties.
fn argmax(values: &[f32]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}
