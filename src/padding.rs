//! Turns a parallel corpus into the fixed width integer arrays a sequence to sequence network
//! consumes.
//!
//! The two sides are padded differently. Sources are left padded so the real content sits against
//! the right edge, which is where the encoder finishes reading. Targets start with `<GO>` (the
//! token the decoder is primed with) followed by left padding and then the content, so every row
//! has a decode length of `1 + longest target`.
use crate::corpus::{ParallelCorpus, RawSequence};
use crate::error::{PrepError, Result};
use crate::vocab::{Side, Vocabulary};
use ndarray::{Array2, ArrayView1};
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PaddingOptions {
    /// Pad targets up to the longest target. When disabled every target must already have the
    /// same length.
    pub pad_targets: bool,
}

impl Default for PaddingOptions {
    fn default() -> Self {
        Self { pad_targets: true }
    }
}

/// The numerical form of a corpus plus the dictionaries to get back to symbols.
#[derive(Clone, Debug, PartialEq)]
pub struct PaddedDataset {
    /// `[n, max_source_len]`
    pub inputs: Array2<i64>,
    /// `[n, 1 + max_target_len]`
    pub targets: Array2<i64>,
    pub input_vocab: Vocabulary,
    pub target_vocab: Vocabulary,
}

impl PaddedDataset {
    /// Builds the vocabularies for both sides and pads every sequence.
    pub fn from_corpus(corpus: &ParallelCorpus, options: PaddingOptions) -> Result<Self> {
        if corpus.sources.len() != corpus.targets.len() {
            return Err(PrepError::LengthMismatch {
                sources: corpus.sources.len(),
                targets: corpus.targets.len(),
            });
        }
        if corpus.is_empty() {
            return Err(PrepError::EmptyCorpus);
        }
        let input_vocab = Vocabulary::build(&corpus.sources, Side::Input)?;
        let target_vocab = Vocabulary::build(&corpus.targets, Side::Target)?;
        debug!(
            "Input vocabulary: {} entries, target vocabulary: {} entries",
            input_vocab.len(),
            target_vocab.len()
        );

        let inputs = pad_sources(&corpus.sources, &input_vocab)?;
        let targets = pad_targets(&corpus.targets, &target_vocab, options)?;
        info!(
            "Padded {} sequences, inputs {:?} targets {:?}",
            corpus.len(),
            inputs.dim(),
            targets.dim()
        );

        Ok(Self {
            inputs,
            targets,
            input_vocab,
            target_vocab,
        })
    }

    pub fn len(&self) -> usize {
        self.inputs.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Symbols of source row `i` with the padding removed
    pub fn source_row(&self, i: usize) -> Result<Vec<&str>> {
        decode_row(&self.input_vocab, self.inputs.row(i))
    }

    /// Symbols of target row `i` with `<GO>` and the padding removed
    pub fn target_row(&self, i: usize) -> Result<Vec<&str>> {
        decode_row(&self.target_vocab, self.targets.row(i))
    }
}

fn decode_row<'a>(vocab: &'a Vocabulary, row: ArrayView1<i64>) -> Result<Vec<&'a str>> {
    vocab.decode(&row.to_vec())
}

fn sentinel(index: Option<i64>, name: &str) -> Result<i64> {
    index.ok_or_else(|| PrepError::UnknownSymbol(name.to_string()))
}

/// Left pads every sequence with `<PAD>` up to the longest one.
pub fn pad_sources(sequences: &[RawSequence], vocab: &Vocabulary) -> Result<Array2<i64>> {
    let pad = sentinel(vocab.pad(), crate::vocab::PAD)?;
    let width = sequences.iter().map(RawSequence::len).max().unwrap_or(0);

    let mut data = Vec::with_capacity(sequences.len() * width);
    for seq in sequences {
        let symbols = seq.symbols();
        data.extend(std::iter::repeat(pad).take(width - symbols.len()));
        data.extend(vocab.encode(&symbols)?);
    }
    Array2::from_shape_vec((sequences.len(), width), data)
        .map_err(|e| PrepError::Shape(e.to_string()))
}

/// Prefixes every sequence with `<GO>` then left pads with `<PAD>` up to the longest one.
pub fn pad_targets(
    sequences: &[RawSequence],
    vocab: &Vocabulary,
    options: PaddingOptions,
) -> Result<Array2<i64>> {
    let go = sentinel(vocab.go(), crate::vocab::GO)?;
    let width = sequences.iter().map(RawSequence::len).max().unwrap_or(0);
    let pad = if options.pad_targets {
        Some(sentinel(vocab.pad(), crate::vocab::PAD)?)
    } else {
        let min = sequences.iter().map(RawSequence::len).min().unwrap_or(0);
        if min != width {
            return Err(PrepError::RaggedTargets { min, max: width });
        }
        None
    };

    let mut data = Vec::with_capacity(sequences.len() * (width + 1));
    for seq in sequences {
        let symbols = seq.symbols();
        data.push(go);
        if let Some(pad) = pad {
            data.extend(std::iter::repeat(pad).take(width - symbols.len()));
        }
        data.extend(vocab.encode(&symbols)?);
    }
    Array2::from_shape_vec((sequences.len(), width + 1), data)
        .map_err(|e| PrepError::Shape(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CorpusLoader;
    use crate::corpus::DateCorpus;
    use ndarray::arr2;

    fn corpus(sources: &[&str], targets: &[&str]) -> ParallelCorpus {
        ParallelCorpus::new(
            sources.iter().map(|x| RawSequence::from(*x)).collect(),
            targets.iter().map(|x| RawSequence::from(*x)).collect(),
        )
        .unwrap()
    }

    #[test]
    fn left_pads_sources() {
        let sources = [RawSequence::from("ab"), RawSequence::from("abc")];
        let vocab = Vocabulary::build(&sources, Side::Input).unwrap();
        let padded = pad_sources(&sources, &vocab).unwrap();
        assert_eq!(padded, arr2(&[[3, 0, 1], [0, 1, 2]]));
    }

    #[test]
    fn go_prefixed_targets() {
        let targets = [RawSequence::from("xy")];
        let vocab = Vocabulary::build(&targets, Side::Target).unwrap();
        let padded = pad_targets(&targets, &vocab, PaddingOptions::default()).unwrap();
        assert_eq!(padded, arr2(&[[3, 1, 2]]));

        let targets = [RawSequence::from("xy"), RawSequence::from("y")];
        let vocab = Vocabulary::build(&targets, Side::Target).unwrap();
        let padded = pad_targets(&targets, &vocab, PaddingOptions::default()).unwrap();
        assert_eq!(padded, arr2(&[[3, 1, 2], [3, 4, 2]]));
    }

    #[test]
    fn round_trip_rows() {
        let dataset = PaddedDataset::from_corpus(
            &corpus(&["hat", "a", "chair"], &["h a t", "a", "ch ai r"]),
            PaddingOptions::default(),
        )
        .unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.inputs.ncols(), 5);
        assert_eq!(dataset.targets.ncols(), 8);

        let go = dataset.target_vocab.go().unwrap();
        for i in 0..dataset.len() {
            assert_eq!(dataset.targets[[i, 0]], go);
        }
        assert_eq!(dataset.source_row(0).unwrap().concat(), "hat");
        assert_eq!(dataset.source_row(1).unwrap().concat(), "a");
        assert_eq!(dataset.target_row(2).unwrap().concat(), "ch ai r");
    }

    #[test]
    fn full_length_rows_unpadded() {
        let dataset =
            PaddedDataset::from_corpus(&corpus(&["ab", "cd"], &["x", "y"]), PaddingOptions::default())
                .unwrap();
        let pad = dataset.input_vocab.pad().unwrap();
        assert!(dataset.inputs.iter().all(|x| *x != pad));
        let pad = dataset.target_vocab.pad().unwrap();
        assert!(dataset.targets.iter().all(|x| *x != pad));
    }

    #[test]
    fn unpadded_targets_must_align() {
        let options = PaddingOptions { pad_targets: false };
        let res = PaddedDataset::from_corpus(&corpus(&["a", "b"], &["xy", "x"]), options);
        assert!(matches!(res, Err(PrepError::RaggedTargets { min: 1, max: 2 })));

        let dates = DateCorpus::new(3, 50).load().unwrap();
        let dataset = PaddedDataset::from_corpus(&dates, options).unwrap();
        assert_eq!(dataset.targets.ncols(), 11);
    }

    #[test]
    fn unpadded_targets_need_no_pad_symbol() {
        let targets = [RawSequence::from("xy"), RawSequence::from("yx")];
        let mut mapping = std::collections::BTreeMap::new();
        mapping.insert("x".to_string(), 1);
        mapping.insert("y".to_string(), 2);
        mapping.insert(crate::vocab::GO.to_string(), 3);
        let vocab = Vocabulary::from_mapping(mapping).unwrap();

        let options = PaddingOptions { pad_targets: false };
        let padded = pad_targets(&targets, &vocab, options).unwrap();
        assert_eq!(padded, arr2(&[[3, 1, 2], [3, 2, 1]]));

        assert!(matches!(
            pad_targets(&targets, &vocab, PaddingOptions::default()),
            Err(PrepError::UnknownSymbol(s)) if s == crate::vocab::PAD
        ));
    }

    #[test]
    fn empty_corpus() {
        let res = PaddedDataset::from_corpus(&ParallelCorpus::default(), PaddingOptions::default());
        assert!(matches!(res, Err(PrepError::EmptyCorpus)));
    }
}
