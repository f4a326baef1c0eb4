//! Corpus loaders reduce a specific corpus to two parallel lists of raw sequences, sources and
//! targets. Anything corpus specific (file layouts, cleaning, manual corrections) lives in here so
//! the vocabulary and padding code never has to know where the data came from.
//!
//! Most corpora we care about are lexicons: a word and its pronunciation. These are loaded into a
//! [`Lexicon`] and then oriented by a [`Task`], reading is grapheme-to-phoneme and writing is
//! phoneme-to-grapheme.
use crate::error::{PrepError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;
use unicode_segmentation::UnicodeSegmentation;

pub mod clean;
pub mod dates;
pub mod delimited;
pub mod pronunciation;

pub use clean::*;
pub use dates::DateCorpus;
pub use delimited::DelimitedLexicon;
pub use pronunciation::PronunciationDictionary;

/// Splits a word into extended grapheme clusters, so things like `ä` written with a combining
/// diaeresis stay one symbol.
pub fn graphemes(word: &str) -> unicode_segmentation::Graphemes<'_> {
    word.graphemes(true)
}

/// One element of a corpus before it's been turned into numbers.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum RawSequence {
    /// Plain text, every grapheme is a symbol
    Word(String),
    /// Already split into symbols, used for phonemes that span multiple characters
    Symbols(Vec<String>),
}

impl RawSequence {
    pub fn is_word(&self) -> bool {
        matches!(self, Self::Word(_))
    }

    pub fn as_word(&self) -> Option<&str> {
        match self {
            Self::Word(w) => Some(w.as_str()),
            Self::Symbols(_) => None,
        }
    }

    /// The symbols making up this sequence
    pub fn symbols(&self) -> Vec<&str> {
        match self {
            Self::Word(w) => graphemes(w).collect(),
            Self::Symbols(s) => s.iter().map(String::as_str).collect(),
        }
    }

    /// Number of symbols, which is what the padded width is measured in
    pub fn len(&self) -> usize {
        match self {
            Self::Word(w) => graphemes(w).count(),
            Self::Symbols(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for RawSequence {
    fn from(s: &str) -> Self {
        Self::Word(s.to_string())
    }
}

impl From<String> for RawSequence {
    fn from(s: String) -> Self {
        Self::Word(s)
    }
}

impl From<Vec<String>> for RawSequence {
    fn from(s: Vec<String>) -> Self {
        Self::Symbols(s)
    }
}

impl fmt::Display for RawSequence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Word(w) => write!(f, "{}", w),
            Self::Symbols(s) => write!(f, "{}", s.join(" ")),
        }
    }
}

/// Direction of the conversion a dataset (and any model trained on it) is for.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Task {
    /// Grapheme-to-phoneme, reading a word out loud
    #[default]
    Read,
    /// Phoneme-to-grapheme, writing down a spoken word
    Write,
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

impl FromStr for Task {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "read" | "g2p" => Ok(Self::Read),
            "write" | "p2g" => Ok(Self::Write),
            s => Err(format!("unknown task '{}', expected read/g2p or write/p2g", s)),
        }
    }
}

/// Parallel source and target sequences, index `i` of one side pairs with index `i` of the other.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParallelCorpus {
    pub sources: Vec<RawSequence>,
    pub targets: Vec<RawSequence>,
}

impl ParallelCorpus {
    pub fn new(sources: Vec<RawSequence>, targets: Vec<RawSequence>) -> Result<Self> {
        if sources.len() != targets.len() {
            return Err(PrepError::LengthMismatch {
                sources: sources.len(),
                targets: targets.len(),
            });
        }
        Ok(Self { sources, targets })
    }

    /// Number of sequence pairs
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Anything that can produce a parallel corpus. The synthetic date corpus is seeded, the lexicon
/// based ones read files.
pub trait CorpusLoader {
    fn load(&self) -> Result<ParallelCorpus>;
}

/// A word and one way of saying it
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct LexiconEntry {
    pub word: String,
    pub pronunciation: RawSequence,
}

/// A list of word/pronunciation pairs in file order. Duplicates are allowed until
/// [`Lexicon::dedup`] is called.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Lexicon {
    entries: Vec<LexiconEntry>,
}

impl Lexicon {
    pub fn push(&mut self, word: impl Into<String>, pronunciation: impl Into<RawSequence>) {
        self.entries.push(LexiconEntry {
            word: word.into(),
            pronunciation: pronunciation.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LexiconEntry> {
        self.entries.iter()
    }

    pub(crate) fn entries_mut(&mut self) -> &mut Vec<LexiconEntry> {
        &mut self.entries
    }

    /// Orients the lexicon for a task. Reading maps words to pronunciations, writing the reverse.
    pub fn into_corpus(self, task: Task) -> ParallelCorpus {
        let (words, prons): (Vec<_>, Vec<_>) = self
            .entries
            .into_iter()
            .map(|e| (RawSequence::Word(e.word), e.pronunciation))
            .unzip();
        match task {
            Task::Read => ParallelCorpus {
                sources: words,
                targets: prons,
            },
            Task::Write => ParallelCorpus {
                sources: prons,
                targets: words,
            },
        }
    }
}

impl FromIterator<LexiconEntry> for Lexicon {
    fn from_iter<I: IntoIterator<Item = LexiconEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Source of lexicon entries, implemented by the file format readers.
pub trait LexiconLoader {
    fn load_lexicon(&self) -> Result<Lexicon>;
}

/// Turns a lexicon source into a corpus: load, deduplicate, report suspicious entries, drop the
/// configured exclusions and orient for the task.
#[derive(Debug, Clone)]
pub struct LexiconCorpus<L> {
    pub loader: L,
    pub task: Task,
    pub exclusions: ExclusionList,
}

impl<L: LexiconLoader> LexiconCorpus<L> {
    pub fn new(loader: L, task: Task) -> Self {
        Self {
            loader,
            task,
            exclusions: ExclusionList::default(),
        }
    }

    pub fn with_exclusions(mut self, exclusions: ExclusionList) -> Self {
        self.exclusions = exclusions;
        self
    }
}

impl<L: LexiconLoader> CorpusLoader for LexiconCorpus<L> {
    fn load(&self) -> Result<ParallelCorpus> {
        let mut lexicon = self.loader.load_lexicon()?;
        info!("Amount of non-unique words in corpus is {}", lexicon.len());
        for mistake in lexicon.possible_mistakes() {
            info!("Possible mistake: {}", mistake);
        }
        lexicon.dedup();
        info!("Amount of unique words in corpus is {}", lexicon.len());
        self.exclusions.apply(&mut lexicon);
        info!("After cleaning {} different words remain", lexicon.len());
        if lexicon.is_empty() {
            return Err(PrepError::EmptyCorpus);
        }
        Ok(lexicon.into_corpus(self.task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orient_lexicon() {
        let mut lexicon = Lexicon::default();
        lexicon.push("hat", vec!["h".to_string(), "a".to_string(), "t".to_string()]);

        let read = lexicon.clone().into_corpus(Task::Read);
        assert_eq!(read.sources, vec![RawSequence::from("hat")]);
        assert!(!read.targets[0].is_word());

        let write = lexicon.into_corpus(Task::Write);
        assert_eq!(write.targets, vec![RawSequence::from("hat")]);
        assert_eq!(write.sources[0].len(), 3);
    }

    #[test]
    fn grapheme_lengths() {
        // 'a' followed by a combining diaeresis is one grapheme
        let word = RawSequence::from("ma\u{0308}n");
        assert_eq!(word.len(), 3);
        assert_eq!(word.symbols(), vec!["m", "a\u{0308}", "n"]);
        assert_eq!(word.to_string(), "ma\u{0308}n");

        let phones = RawSequence::from(vec!["aa".to_string(), "hh".to_string()]);
        assert_eq!(phones.len(), 2);
        assert_eq!(phones.to_string(), "aa hh");
    }

    #[test]
    fn task_parsing() {
        assert_eq!("g2p".parse::<Task>().unwrap(), Task::Read);
        assert_eq!("Write".parse::<Task>().unwrap(), Task::Write);
        assert!("sing".parse::<Task>().is_err());
    }

    #[test]
    fn mismatched_corpus() {
        let res = ParallelCorpus::new(vec!["a".into()], vec![]);
        assert!(matches!(
            res,
            Err(PrepError::LengthMismatch {
                sources: 1,
                targets: 0
            })
        ));
    }

    struct InMemory(Lexicon);

    impl LexiconLoader for InMemory {
        fn load_lexicon(&self) -> Result<Lexicon> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn lexicon_corpus_cleans() {
        let mut lexicon = Lexicon::default();
        lexicon.push("mit", "mIt");
        lexicon.push("Mit", "mIt");
        lexicon.push("mit", "mIt");
        lexicon.push("neu", "nOY");

        let corpus = LexiconCorpus::new(InMemory(lexicon.clone()), Task::Write)
            .with_exclusions(ExclusionList::new(["Mit"]))
            .load()
            .unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(
            corpus.targets,
            vec![RawSequence::from("mit"), RawSequence::from("neu")]
        );

        let everything = ExclusionList::new(["mit", "Mit", "neu"]);
        let res = LexiconCorpus::new(InMemory(lexicon), Task::Read)
            .with_exclusions(everything)
            .load();
        assert!(matches!(res, Err(PrepError::EmptyCorpus)));
    }
}
