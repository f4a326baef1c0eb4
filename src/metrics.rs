//! Scoring model output against padded targets.
//!
//! Three numbers come out of [`accuracy`]:
//!
//! * raw: the fraction of positions where prediction and target agree. Simple, but a model that
//!   only learned where the padding goes already scores well.
//! * token: one minus the mean normalised edit distance between each predicted and target row.
//! * word: the fraction of rows predicted exactly.
//!
//! Before any of these are computed `<PAD>` is mapped to 0 in both arrays and the edit distance
//! ignores 0 entirely, so only the content symbols are compared. Target vocabularies start their
//! content at 1 for exactly this reason. If a vocabulary does put a real symbol at 0 that symbol
//! becomes invisible to the edit distance, we warn about it but can't fix it here.
use crate::error::{PrepError, Result};
use crate::vocab::Vocabulary;
use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewD, Axis, Ix2, Ix3, Zip};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// What the prediction array holds
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScoringMode {
    /// `[batch, time, classes]` scores straight out of the network, reduced with argmax
    Train,
    /// `[batch, time]` symbol ids, for example from greedy decoding
    Test,
}

impl FromStr for ScoringMode {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "train" => Ok(Self::Train),
            "test" => Ok(Self::Test),
            s => Err(PrepError::InvalidMode(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Accuracy {
    /// Positional accuracy
    pub raw: f64,
    /// `1 - mean(normalised edit distance)`
    pub token: f64,
    /// Fraction of exact matches
    pub word: f64,
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "raw: {:.4} token: {:.4} word: {:.4}",
            self.raw, self.token, self.word
        )
    }
}

/// Scores predictions with the mode given as a string, `"train"` or `"test"`. Anything else is
/// an error.
pub fn accuracy(
    predictions: ArrayViewD<f32>,
    targets: ArrayView2<i64>,
    vocab: &Vocabulary,
    mode: &str,
) -> Result<Accuracy> {
    score(predictions, targets, vocab, mode.parse()?)
}

/// Scores predictions against targets, see the module docs for what each number means.
pub fn score(
    predictions: ArrayViewD<f32>,
    targets: ArrayView2<i64>,
    vocab: &Vocabulary,
    mode: ScoringMode,
) -> Result<Accuracy> {
    let mut predicted = match mode {
        ScoringMode::Train => {
            let scores = predictions
                .into_dimensionality::<Ix3>()
                .map_err(|_| PrepError::Shape("train mode expects [batch, time, classes]".into()))?;
            scores.map_axis(Axis(2), argmax)
        }
        ScoringMode::Test => predictions
            .into_dimensionality::<Ix2>()
            .map_err(|_| PrepError::Shape("test mode expects [batch, time]".into()))?
            .mapv(|x| x as i64),
    };
    if predicted.dim() != targets.dim() {
        return Err(PrepError::Shape(format!(
            "predictions {:?} don't match targets {:?}",
            predicted.dim(),
            targets.dim()
        )));
    }
    if predicted.is_empty() {
        return Err(PrepError::Shape("nothing to score".into()));
    }

    let mut targets = targets.to_owned();
    if let Some(pad) = vocab.pad() {
        if vocab.has_content_at_zero() {
            warn!("Vocabulary has a real symbol at 0, it will be treated as padding when scoring");
        }
        remap_padding(&mut predicted, pad);
        remap_padding(&mut targets, pad);
    }

    let matches = Zip::from(&predicted)
        .and(&targets)
        .fold(0usize, |acc, p, t| acc + usize::from(p == t));
    let raw = matches as f64 / predicted.len() as f64;

    let distances = predicted
        .outer_iter()
        .zip(targets.outer_iter())
        .map(|(p, t)| normalised_edit_distance(p, t))
        .collect::<Vec<_>>();
    let rows = distances.len() as f64;
    let token = 1.0 - distances.iter().sum::<f64>() / rows;
    let word = distances.iter().filter(|x| **x == 0.0).count() as f64 / rows;

    Ok(Accuracy { raw, token, word })
}

fn remap_padding(x: &mut Array2<i64>, pad: i64) {
    x.mapv_inplace(|v| if v == pad { 0 } else { v });
}

/// Index of the highest score, the first one wins ties. NaN counts as the highest score.
fn argmax(scores: ArrayView1<f32>) -> i64 {
    let mut best = 0;
    let mut best_score = f32::NEG_INFINITY;
    for (i, score) in scores.iter().enumerate() {
        if score.is_nan() {
            return i as i64;
        }
        if *score > best_score {
            best = i;
            best_score = *score;
        }
    }
    best as i64
}

/// Edit distance between the non-zero entries of two rows, divided by the number of non-zero
/// entries in the target. An empty target scores 0 against an empty prediction and 1 against
/// anything else.
fn normalised_edit_distance(predicted: ArrayView1<i64>, target: ArrayView1<i64>) -> f64 {
    let predicted = predicted.iter().copied().filter(|x| *x != 0).collect::<Vec<_>>();
    let target = target.iter().copied().filter(|x| *x != 0).collect::<Vec<_>>();
    if target.is_empty() {
        return if predicted.is_empty() { 0.0 } else { 1.0 };
    }
    edit_distance(&predicted, &target) as f64 / target.len() as f64
}

/// Levenshtein distance, the number of insertions, deletions and substitutions to turn `a` into
/// `b`.
pub fn edit_distance<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let mut previous = (0..=b.len()).collect::<Vec<_>>();
    let mut current = vec![0; b.len() + 1];
    for (i, x) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, y) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(x != y);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}
