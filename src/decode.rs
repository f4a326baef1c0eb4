//! Greedy autoregressive decoding, independent of whatever framework runs the network.
//!
//! The decoder is primed with `<GO>` and then repeatedly asked for the next symbol given the source
//! and everything decoded so far. Models plug in through [`StepFunction`], which is implemented
//! for closures so a test or a quick experiment doesn't need a type.
//!
//! The loop always terminates, either once `horizon` symbols have been produced or when the
//! configured end token comes out.
use crate::corpus::{graphemes, Task};
use crate::error::{PrepError, Result};
use crate::padding::PaddedDataset;
use crate::vocab::Vocabulary;
use tracing::{debug, info};

/// Predicts the next target symbol
pub trait StepFunction {
    fn predict_next(&mut self, source: &[i64], decoded: &[i64]) -> Result<i64>;
}

impl<F> StepFunction for F
where
    F: FnMut(&[i64], &[i64]) -> Result<i64>,
{
    fn predict_next(&mut self, source: &[i64], decoded: &[i64]) -> Result<i64> {
        self(source, decoded)
    }
}

/// A trained model, which knows which direction it converts in
pub trait Seq2SeqModel: StepFunction {
    fn task(&self) -> Task;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DecodeLimits {
    /// Maximum number of symbols to produce
    pub horizon: usize,
    /// Stop early when this symbol is produced, it isn't included in the output
    pub end: Option<i64>,
}

/// Runs the decode loop returning the produced symbols without the leading `go`.
pub fn greedy_decode(
    source: &[i64],
    go: i64,
    limits: DecodeLimits,
    step: &mut impl StepFunction,
) -> Result<Vec<i64>> {
    let mut decoded = Vec::with_capacity(limits.horizon + 1);
    decoded.push(go);
    for _ in 0..limits.horizon {
        let next = step.predict_next(source, &decoded)?;
        if Some(next) == limits.end {
            debug!("End token after {} steps", decoded.len() - 1);
            break;
        }
        decoded.push(next);
    }
    decoded.remove(0);
    Ok(decoded)
}

/// A word handed to [`read_word`] or [`write_word`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WordInput {
    /// Text split into graphemes, one symbol each
    Text(String),
    /// Symbols given individually, for phonemes spanning more than one character
    Symbols(Vec<String>),
    /// Already converted to indices in the source vocabulary
    Ids(Vec<i64>),
}

impl WordInput {
    fn to_ids(&self, vocab: &Vocabulary) -> Result<Vec<i64>> {
        let encoded = match self {
            Self::Text(t) => vocab.encode(&graphemes(t).collect::<Vec<_>>()),
            Self::Symbols(s) => vocab.encode(s),
            Self::Ids(ids) => {
                if let Some(bad) = ids.iter().find(|x| vocab.symbol_of(**x).is_none()) {
                    return Err(PrepError::InvalidInput(format!(
                        "index {} is not in the source vocabulary",
                        bad
                    )));
                }
                Ok(ids.clone())
            }
        };
        encoded.map_err(|e| PrepError::InvalidInput(e.to_string()))
    }
}

/// Reads a word out loud, the model must have been trained for grapheme-to-phoneme.
pub fn read_word(
    model: &mut impl Seq2SeqModel,
    word: &WordInput,
    dataset: &PaddedDataset,
) -> Result<Vec<String>> {
    transcribe(model, word, dataset, Task::Read)
}

/// Writes down a spoken word, the model must have been trained for phoneme-to-grapheme.
pub fn write_word(
    model: &mut impl Seq2SeqModel,
    word: &WordInput,
    dataset: &PaddedDataset,
) -> Result<Vec<String>> {
    transcribe(model, word, dataset, Task::Write)
}

/// The dataset the model was trained on fixes the vocabularies, the input width the source gets
/// padded to and the decode horizon.
fn transcribe(
    model: &mut impl Seq2SeqModel,
    word: &WordInput,
    dataset: &PaddedDataset,
    expected: Task,
) -> Result<Vec<String>> {
    if model.task() != expected {
        return Err(PrepError::TaskMismatch {
            expected,
            actual: model.task(),
        });
    }
    let ids = word.to_ids(&dataset.input_vocab)?;
    let width = dataset.inputs.ncols();
    if ids.len() > width {
        return Err(PrepError::InvalidInput(format!(
            "{} symbols but the model only takes {}",
            ids.len(),
            width
        )));
    }
    let pad = dataset
        .input_vocab
        .pad()
        .ok_or_else(|| PrepError::UnknownSymbol(crate::vocab::PAD.to_string()))?;
    let mut source = vec![pad; width - ids.len()];
    source.extend_from_slice(&ids);

    let go = dataset
        .target_vocab
        .go()
        .ok_or_else(|| PrepError::UnknownSymbol(crate::vocab::GO.to_string()))?;
    let limits = DecodeLimits {
        horizon: dataset.targets.ncols().saturating_sub(1),
        end: None,
    };
    let decoded = greedy_decode(&source, go, limits, model)?;
    let symbols = dataset
        .target_vocab
        .decode(&decoded)?
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    info!("{:?} => {:?}", word, symbols);
    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::ParallelCorpus;
    use crate::padding::PaddingOptions;

    /// Plays back a fixed answer regardless of input
    struct Scripted {
        task: Task,
        answer: Vec<i64>,
        calls: usize,
    }

    impl StepFunction for Scripted {
        fn predict_next(&mut self, source: &[i64], decoded: &[i64]) -> Result<i64> {
            assert_eq!(decoded.len(), self.calls + 1);
            assert!(!source.is_empty());
            let next = self.answer[self.calls % self.answer.len()];
            self.calls += 1;
            Ok(next)
        }
    }

    impl Seq2SeqModel for Scripted {
        fn task(&self) -> Task {
            self.task
        }
    }

    fn g2p_dataset() -> PaddedDataset {
        let corpus = ParallelCorpus::new(
            vec!["hat".into(), "a".into()],
            vec![
                vec!["hh".to_string(), "ae".to_string(), "t".to_string()].into(),
                vec!["ah".to_string()].into(),
            ],
        )
        .unwrap();
        PaddedDataset::from_corpus(&corpus, PaddingOptions::default()).unwrap()
    }

    #[test]
    fn stops_at_horizon() {
        let mut step = |_: &[i64], decoded: &[i64]| -> Result<i64> { Ok(decoded.len() as i64) };
        let limits = DecodeLimits {
            horizon: 4,
            end: None,
        };
        let out = greedy_decode(&[1, 2], 9, limits, &mut step).unwrap();
        assert_eq!(out, vec![1, 2, 3, 4]);
    }

    #[test]
    fn stops_at_end_token() {
        let mut step = |_: &[i64], decoded: &[i64]| -> Result<i64> { Ok(decoded.len() as i64) };
        let limits = DecodeLimits {
            horizon: 10,
            end: Some(3),
        };
        let out = greedy_decode(&[1], 0, limits, &mut step).unwrap();
        assert_eq!(out, vec![1, 2]);

        let limits = DecodeLimits {
            horizon: 0,
            end: None,
        };
        assert!(greedy_decode(&[1], 0, limits, &mut step).unwrap().is_empty());
    }

    #[test]
    fn read_word_decodes() {
        let dataset = g2p_dataset();
        let vocab = &dataset.target_vocab;
        let pad = vocab.pad().unwrap();
        let answer = vec![
            pad,
            vocab.index_of("hh").unwrap(),
            vocab.index_of("ae").unwrap(),
        ];
        let mut model = Scripted {
            task: Task::Read,
            answer,
            calls: 0,
        };

        let out = read_word(&mut model, &WordInput::Text("ha".into()), &dataset).unwrap();
        assert_eq!(out, vec!["hh".to_string(), "ae".to_string()]);
        // horizon is the target width without <GO>
        assert_eq!(model.calls, 3);

        let ids = WordInput::Ids(dataset.input_vocab.encode(&["h", "a", "t"]).unwrap());
        model.calls = 0;
        assert!(read_word(&mut model, &ids, &dataset).is_ok());
    }

    #[test]
    fn task_mismatch() {
        let dataset = g2p_dataset();
        let mut model = Scripted {
            task: Task::Read,
            answer: vec![1],
            calls: 0,
        };
        let res = write_word(&mut model, &WordInput::Text("hat".into()), &dataset);
        assert!(matches!(
            res,
            Err(PrepError::TaskMismatch {
                expected: Task::Write,
                actual: Task::Read
            })
        ));
        assert_eq!(model.calls, 0);
    }

    #[test]
    fn invalid_inputs() {
        let dataset = g2p_dataset();
        let mut model = Scripted {
            task: Task::Read,
            answer: vec![1],
            calls: 0,
        };
        for word in [
            WordInput::Text("xyz".into()),
            WordInput::Text("hatha".into()),
            WordInput::Ids(vec![100]),
            WordInput::Symbols(vec!["hh".into()]),
        ] {
            assert!(matches!(
                read_word(&mut model, &word, &dataset),
                Err(PrepError::InvalidInput(_))
            ));
        }
    }
}
