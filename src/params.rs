//! The hyper-parameters a sequence to sequence model needs that are fixed by the data rather than
//! chosen, sequence lengths and dictionary sizes.
use crate::padding::PaddedDataset;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ModelParams {
    /// Number of input symbols including `<PAD>`
    pub x_dict_size: usize,
    /// Number of output classes including `<GO>` and `<PAD>`
    pub num_classes: usize,
    /// Width of the padded inputs
    pub x_seq_length: usize,
    /// Number of symbols the decoder emits, the target width without the `<GO>` column
    pub y_seq_length: usize,
    #[serde(skip)]
    pub num2char_x: BTreeMap<i64, String>,
    #[serde(skip)]
    pub num2char_y: BTreeMap<i64, String>,
}

impl ModelParams {
    pub fn from_dataset(dataset: &PaddedDataset) -> Self {
        Self {
            x_dict_size: dataset.input_vocab.len(),
            num_classes: dataset.target_vocab.len(),
            x_seq_length: dataset.inputs.ncols(),
            y_seq_length: dataset.targets.ncols().saturating_sub(1),
            num2char_x: dataset.input_vocab.reverse_mapping().clone(),
            num2char_y: dataset.target_vocab.reverse_mapping().clone(),
        }
    }
}
