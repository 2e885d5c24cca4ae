//! Score vector -> probability distribution -> top label.

use crate::common::{ClassificationResult, LabelTable};
use crate::data::{PipelineError, PipelineResult, Tensor};

/// Picks the most probable class of a `[1, N]` score tensor.
///
/// Scores go through softmax (max-shifted, so large logits do not overflow);
/// ties resolve to the lowest index and NaN scores are skipped. A class with
/// no label is reported with `name: None` rather than failing the call.
pub fn decode(output: &Tensor, labels: &LabelTable) -> PipelineResult<ClassificationResult> {
    let scores = class_scores(output)?;
    let probs = softmax(&scores);
    let (class_id, _) = argmax(scores.iter().copied())
        .ok_or_else(|| no_usable_scores(output))?;
    Ok(ClassificationResult::new(class_id, labels.name(class_id), probs[class_id]))
}

/// The `k` most probable classes, most probable first, ties by lowest index.
/// Classes with a NaN score are left out.
pub fn decode_top_k(output: &Tensor, labels: &LabelTable, k: usize) -> PipelineResult<Vec<ClassificationResult>> {
    let scores = class_scores(output)?;
    let probs = softmax(&scores);
    let mut order: Vec<usize> = (0..scores.len()).filter(|&i| !scores[i].is_nan()).collect();
    // stable sort keeps index order among equal probabilities
    order.sort_by(|&a, &b| probs[b].total_cmp(&probs[a]));
    Ok(order
        .into_iter()
        .take(k)
        .map(|i| ClassificationResult::new(i, labels.name(i), probs[i]))
        .collect())
}

/// Softmax over the class axis of a classification output.
///
/// Accepts `[N]`, `[1, N]` or a `[1, N, 1, ...]` tensor with trailing unit
/// axes; anything else, an empty score vector, or one holding only NaNs is a
/// shape mismatch.
pub fn probabilities(output: &Tensor) -> PipelineResult<Vec<f32>> {
    let scores = class_scores(output)?;
    Ok(softmax(&scores))
}

fn class_scores(output: &Tensor) -> PipelineResult<Vec<f32>> {
    let dims = output.dims();
    let valid = match dims.as_slice() {
        [n] => *n > 0,
        [1, n, rest @ ..] => *n > 0 && rest.iter().all(|&d| d == 1),
        _ => false,
    };
    if !valid {
        return Err(PipelineError::shape_mismatch("[1, num_classes]", &dims));
    }
    let scores: Vec<f32> = output.iter().copied().collect();
    if scores.iter().all(|x| x.is_nan()) {
        return Err(no_usable_scores(output));
    }
    Ok(scores)
}

fn no_usable_scores(output: &Tensor) -> PipelineError {
    PipelineError::shape_mismatch("at least one non-NaN class score", &output.dims())
}

/// Max-shifted softmax. NaN scores take no part in the max or the sum and
/// get probability 0.
pub fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores
        .iter()
        .copied()
        .filter(|x| !x.is_nan())
        .fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores
        .iter()
        .map(|x| if x.is_nan() { 0. } else { (x - max).exp() })
        .collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|x| x / sum).collect()
}

/// Index and value of the maximum, lowest index on ties, NaNs skipped.
pub fn argmax<I: IntoIterator<Item = f32>>(xs: I) -> Option<(usize, f32)> {
    xs.into_iter()
        .enumerate()
        .filter(|(_, x)| !x.is_nan())
        .fold(None, |best, (i, x)| match best {
            Some((_, b)) if x <= b => best,
            _ => Some((i, x)),
        })
}
