//! Symbol to integer dictionaries. A symbol is either a grapheme (for words) or a whole phoneme
//! (for pronunciations where one phone can be several characters, like `hh` or `aa`).
//!
//! Inputs and targets are numbered slightly differently. Input symbols start at 0, target symbols
//! start at 1. Edit distance treats 0 as "nothing here" so a target symbol living at 0 would be
//! invisible to the token accuracy. The sentinels are appended after the content symbols so they
//! can never collide with them.
use crate::corpus::RawSequence;
use crate::error::{PrepError, Result};
use std::collections::{btree_map, BTreeMap, BTreeSet};
use tracing::debug;

/// Padding sentinel
pub const PAD: &str = "<PAD>";
/// Decoder start sentinel, only present in target vocabularies
pub const GO: &str = "<GO>";

/// Which side of the sequence pair a vocabulary is built for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    /// Encoder input, numbered from 0 with a trailing `<PAD>`
    Input,
    /// Decoder target, numbered from 1 with trailing `<GO>` and `<PAD>`
    Target,
}

impl Side {
    fn first_index(self) -> i64 {
        match self {
            Self::Input => 0,
            Self::Target => 1,
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Vocabulary {
    char2num: BTreeMap<String, i64>,
    num2char: BTreeMap<i64, String>,
}

impl Vocabulary {
    /// Builds a vocabulary covering every symbol in `sequences`. Symbols are numbered in sorted
    /// order so the same corpus always gives the same dictionary. A corpus symbol spelled like one
    /// of the sentinels is an error, it would otherwise share an index with the sentinel.
    pub fn build(sequences: &[RawSequence], side: Side) -> Result<Self> {
        let symbols = distinct_symbols(sequences);
        if let Some(s) = symbols.iter().find(|s| s.as_str() == PAD || s.as_str() == GO) {
            return Err(PrepError::Corpus(format!(
                "corpus contains the reserved symbol '{}'",
                s
            )));
        }
        let mut vocab = Self::default();
        let mut next = side.first_index();
        for symbol in symbols {
            vocab.insert(symbol, next);
            next += 1;
        }
        if side == Side::Target {
            vocab.insert(GO.to_string(), next);
            next += 1;
        }
        vocab.insert(PAD.to_string(), next);
        Ok(vocab)
    }

    /// Rebuilds a vocabulary from a persisted `symbol -> index` mapping. The mapping has to be a
    /// bijection, otherwise decoding would be ambiguous.
    pub fn from_mapping(mapping: BTreeMap<String, i64>) -> Result<Self> {
        let mut num2char: BTreeMap<i64, String> = BTreeMap::new();
        for (symbol, index) in &mapping {
            if let Some(first) = num2char.insert(*index, symbol.clone()) {
                return Err(PrepError::DuplicateIndex {
                    index: *index,
                    first,
                    second: symbol.clone(),
                });
            }
        }
        Ok(Self {
            char2num: mapping,
            num2char,
        })
    }

    fn insert(&mut self, symbol: String, index: i64) {
        self.num2char.insert(index, symbol.clone());
        self.char2num.insert(symbol, index);
    }

    /// Number of entries including sentinels
    pub fn len(&self) -> usize {
        self.char2num.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn index_of(&self, symbol: &str) -> Option<i64> {
        self.char2num.get(symbol).copied()
    }

    pub fn symbol_of(&self, index: i64) -> Option<&str> {
        self.num2char.get(&index).map(String::as_str)
    }

    pub fn pad(&self) -> Option<i64> {
        self.index_of(PAD)
    }

    pub fn go(&self) -> Option<i64> {
        self.index_of(GO)
    }

    pub fn is_sentinel(&self, index: i64) -> bool {
        Some(index) == self.pad() || Some(index) == self.go()
    }

    /// Whether a non-sentinel symbol sits at index 0. Scoring maps padding onto 0, so this makes
    /// padding and that symbol indistinguishable.
    pub fn has_content_at_zero(&self) -> bool {
        matches!(self.symbol_of(0), Some(s) if s != PAD && s != GO)
    }

    /// The `symbol -> index` mapping
    pub fn mapping(&self) -> &BTreeMap<String, i64> {
        &self.char2num
    }

    /// The reverse `index -> symbol` mapping
    pub fn reverse_mapping(&self) -> &BTreeMap<i64, String> {
        &self.num2char
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, i64> {
        self.char2num.iter()
    }

    /// Converts symbols to their indices, failing on the first symbol we don't know.
    pub fn encode<S: AsRef<str>>(&self, symbols: &[S]) -> Result<Vec<i64>> {
        symbols
            .iter()
            .map(|s| {
                self.index_of(s.as_ref())
                    .ok_or_else(|| PrepError::UnknownSymbol(s.as_ref().to_string()))
            })
            .collect()
    }

    /// Converts indices back to symbols dropping any `<PAD>` and `<GO>` entries.
    pub fn decode(&self, ids: &[i64]) -> Result<Vec<&str>> {
        ids.iter()
            .filter(|x| !self.is_sentinel(**x))
            .map(|x| self.symbol_of(*x).ok_or(PrepError::UnknownIndex(*x)))
            .collect()
    }
}

/// Collects the distinct symbols of a corpus. Plain words are split into graphemes, but as soon
/// as one element is already a list of symbols (multi-character phonemes) splitting by character
/// would be wrong for that element, so we fall back to taking every element's own symbols.
fn distinct_symbols(sequences: &[RawSequence]) -> BTreeSet<String> {
    if sequences.iter().all(RawSequence::is_word) {
        sequences
            .iter()
            .filter_map(RawSequence::as_word)
            .flat_map(crate::corpus::graphemes)
            .map(str::to_string)
            .collect()
    } else {
        debug!("Corpus contains symbol lists, flattening symbols instead of splitting words");
        sequences
            .iter()
            .flat_map(|x| x.symbols().into_iter().map(|s| s.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(x: &[&str]) -> Vec<RawSequence> {
        x.iter().map(|w| RawSequence::from(*w)).collect()
    }

    #[test]
    fn input_vocabulary_starts_at_zero() {
        let vocab = Vocabulary::build(&words(&["ab", "abc"]), Side::Input).unwrap();

        assert_eq!(vocab.len(), 4);
        assert_eq!(vocab.index_of("a"), Some(0));
        assert_eq!(vocab.index_of("b"), Some(1));
        assert_eq!(vocab.index_of("c"), Some(2));
        assert_eq!(vocab.pad(), Some(3));
        assert_eq!(vocab.go(), None);
    }

    #[test]
    fn target_vocabulary_reserves_zero() {
        let vocab = Vocabulary::build(&words(&["xy"]), Side::Target).unwrap();

        assert_eq!(vocab.index_of("x"), Some(1));
        assert_eq!(vocab.index_of("y"), Some(2));
        assert_eq!(vocab.go(), Some(3));
        assert_eq!(vocab.pad(), Some(4));
        assert_eq!(vocab.symbol_of(0), None);
        assert!(!vocab.has_content_at_zero());
    }

    #[test]
    fn indices_contiguous_and_sentinels_last() {
        let corpus = vec![
            RawSequence::Symbols(vec!["hh".into(), "eh".into(), "l".into(), "ow".into()]),
            RawSequence::Symbols(vec!["w".into(), "er".into(), "l".into(), "d".into()]),
        ];
        let vocab = Vocabulary::build(&corpus, Side::Target).unwrap();

        let mut indices = vocab.iter().map(|(_, v)| *v).collect::<Vec<_>>();
        indices.sort_unstable();
        assert_eq!(indices, (1..=vocab.len() as i64).collect::<Vec<_>>());

        let go = vocab.go().unwrap();
        let pad = vocab.pad().unwrap();
        for (symbol, index) in vocab.iter() {
            if symbol != GO && symbol != PAD {
                assert!(*index < go);
                assert!(*index < pad);
            }
        }
        // Multi-character phonemes stay whole
        assert!(vocab.index_of("hh").is_some());
        assert!(vocab.index_of("h").is_none());
    }

    #[test]
    fn sentinel_spelled_symbols_rejected() {
        for reserved in [GO, PAD] {
            let corpus = vec![RawSequence::Symbols(vec![reserved.to_string(), "a".into()])];
            for side in [Side::Input, Side::Target] {
                assert!(matches!(
                    Vocabulary::build(&corpus, side),
                    Err(PrepError::Corpus(_))
                ));
            }
        }
        // Only whole symbols are reserved, graphemes of a word never match
        let vocab = Vocabulary::build(&words(&["<GO>"]), Side::Target).unwrap();
        assert_eq!(vocab.len(), vocab.reverse_mapping().len());
        assert_eq!(vocab.index_of("G"), Some(3));
    }

    #[test]
    fn mixed_corpus_falls_back_to_symbols() {
        let corpus = vec![
            RawSequence::from("ab"),
            RawSequence::Symbols(vec!["ch".into()]),
        ];
        let vocab = Vocabulary::build(&corpus, Side::Input).unwrap();
        assert_eq!(vocab.index_of("a"), Some(0));
        assert_eq!(vocab.index_of("b"), Some(1));
        assert_eq!(vocab.index_of("ch"), Some(2));
        assert_eq!(vocab.pad(), Some(3));
    }

    #[test]
    fn encode_decode() {
        let vocab = Vocabulary::build(&words(&["ab", "abc"]), Side::Input).unwrap();
        let ids = vocab.encode(&["c", "a"]).unwrap();
        assert_eq!(ids, vec![2, 0]);
        assert_eq!(vocab.decode(&[3, 3, 2, 0]).unwrap(), vec!["c", "a"]);

        assert!(matches!(
            vocab.encode(&["z"]),
            Err(PrepError::UnknownSymbol(s)) if s == "z"
        ));
        assert!(matches!(vocab.decode(&[9]), Err(PrepError::UnknownIndex(9))));
    }

    #[test]
    fn mapping_must_be_bijective() {
        let vocab = Vocabulary::build(&words(&["ab"]), Side::Target).unwrap();
        let restored = Vocabulary::from_mapping(vocab.mapping().clone()).unwrap();
        assert_eq!(restored, vocab);

        let mut broken = BTreeMap::new();
        broken.insert("a".to_string(), 1);
        broken.insert("b".to_string(), 1);
        assert!(matches!(
            Vocabulary::from_mapping(broken),
            Err(PrepError::DuplicateIndex { index: 1, .. })
        ));
    }
}
