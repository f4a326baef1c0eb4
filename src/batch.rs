//! Mini batch iteration. Each call shuffles the whole dataset once and then walks through it in
//! fixed size steps. Rows left over at the end that can't fill a batch are skipped for that pass,
//! a different shuffle next epoch means they'll be seen eventually.
use crate::error::{PrepError, Result};
use ndarray::{Array2, ArrayView2, Axis};
use rand::seq::SliceRandom;
use rand::Rng;

/// One batch of inputs and the matching targets
pub type Batch = (Array2<i64>, Array2<i64>);

pub struct Batches<'a> {
    inputs: ArrayView2<'a, i64>,
    targets: ArrayView2<'a, i64>,
    order: Vec<usize>,
    batch_size: usize,
    start: usize,
}

/// Shuffles the rows of `inputs` and `targets` together and returns an iterator over full
/// batches.
pub fn batches<'a>(
    inputs: ArrayView2<'a, i64>,
    targets: ArrayView2<'a, i64>,
    batch_size: usize,
    rng: &mut impl Rng,
) -> Result<Batches<'a>> {
    if inputs.nrows() != targets.nrows() {
        return Err(PrepError::LengthMismatch {
            sources: inputs.nrows(),
            targets: targets.nrows(),
        });
    }
    if batch_size == 0 {
        return Err(PrepError::Shape("batch size must be at least 1".into()));
    }
    let mut order = (0..inputs.nrows()).collect::<Vec<_>>();
    order.shuffle(rng);
    Ok(Batches {
        inputs,
        targets,
        order,
        batch_size,
        start: 0,
    })
}

impl<'a> Batches<'a> {
    /// Number of full batches in one pass
    pub fn num_batches(&self) -> usize {
        self.order.len() / self.batch_size
    }
}

impl<'a> Iterator for Batches<'a> {
    type Item = Batch;

    fn next(&mut self) -> Option<Self::Item> {
        let end = self.start + self.batch_size;
        if end > self.order.len() {
            return None;
        }
        let rows = &self.order[self.start..end];
        self.start = end;
        Some((
            self.inputs.select(Axis(0), rows),
            self.targets.select(Axis(0), rows),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.order.len() - self.start) / self.batch_size;
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for Batches<'a> {}
