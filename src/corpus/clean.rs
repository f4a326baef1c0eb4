//! Corpus cleaning. Real lexicons have repeated entries, inconsistent capitalisation and the odd
//! misspelling. Repeats are handled automatically, but deciding which of `Mit` and `mit` is the
//! mistake needs a human, so [`Lexicon::possible_mistakes`] lists candidates and the decisions go
//! in an [`ExclusionList`] that's passed in as configuration.
use super::*;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::io::{self, prelude::*};
use std::path::Path;
use tracing::{debug, warn};

/// An entry pair that a human should probably look at
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PossibleMistake {
    /// Different spellings with the same pronunciation. Could be a homophone (`Meer`, `mehr`) or
    /// a misspelling.
    SharedPronunciation {
        pronunciation: RawSequence,
        words: Vec<String>,
    },
    /// One spelling with several pronunciations
    AlternativePronunciations {
        word: String,
        pronunciations: Vec<RawSequence>,
    },
}

impl fmt::Display for PossibleMistake {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::SharedPronunciation {
                pronunciation,
                words,
            } => write!(f, "{} -> [{}]", words.join(", "), pronunciation),
            Self::AlternativePronunciations {
                word,
                pronunciations,
            } => {
                let prons = pronunciations
                    .iter()
                    .map(|x| x.to_string())
                    .collect::<Vec<_>>();
                write!(f, "{} -> [{}]", word, prons.join("], ["))
            }
        }
    }
}

impl Lexicon {
    /// Removes repeated words keeping the first pronunciation seen. Homophones are different
    /// words so they're all kept. Returns how many entries were removed.
    pub fn dedup(&mut self) -> usize {
        let before = self.len();
        let mut seen = HashSet::new();
        self.entries_mut().retain(|entry| {
            if seen.contains(&entry.word) {
                debug!("Dropping repeated entry for {}: {}", entry.word, entry.pronunciation);
                false
            } else {
                seen.insert(entry.word.clone());
                true
            }
        });
        before - self.len()
    }

    /// Finds entries where either the spelling or the pronunciation is shared with another,
    /// different, entry. Exact repeats aren't reported.
    pub fn possible_mistakes(&self) -> Vec<PossibleMistake> {
        let mut by_pron: BTreeMap<&RawSequence, BTreeSet<&str>> = BTreeMap::new();
        let mut by_word: BTreeMap<&str, BTreeSet<&RawSequence>> = BTreeMap::new();
        for entry in self.iter() {
            by_pron
                .entry(&entry.pronunciation)
                .or_default()
                .insert(&entry.word);
            by_word
                .entry(&entry.word)
                .or_default()
                .insert(&entry.pronunciation);
        }

        let mut res = vec![];
        for (pron, words) in by_pron.into_iter().filter(|(_, v)| v.len() > 1) {
            res.push(PossibleMistake::SharedPronunciation {
                pronunciation: pron.clone(),
                words: words.into_iter().map(str::to_string).collect(),
            });
        }
        for (word, prons) in by_word.into_iter().filter(|(_, v)| v.len() > 1) {
            res.push(PossibleMistake::AlternativePronunciations {
                word: word.to_string(),
                pronunciations: prons.into_iter().cloned().collect(),
            });
        }
        res
    }
}

/// Words to drop from a lexicon after manual inspection.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExclusionList {
    words: BTreeSet<String>,
}

impl ExclusionList {
    pub fn new(words: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Opens an exclusion file, one word per line, `#` starts a comment.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = fs::File::open(path)?;
        Self::from_reader(io::BufReader::new(file))
    }

    fn from_reader(reader: impl BufRead) -> io::Result<Self> {
        let mut words = BTreeSet::new();
        for line in reader.lines() {
            let line = line?;
            let word = match line.split_once('#') {
                Some((w, _comment)) => w.trim(),
                None => line.trim(),
            };
            if !word.is_empty() {
                words.insert(word.to_string());
            }
        }
        Ok(Self { words })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn iter(&self) -> std::collections::btree_set::Iter<'_, String> {
        self.words.iter()
    }

    /// Adds the words from another list
    pub fn extend(&mut self, other: ExclusionList) {
        self.words.extend(other.words);
    }

    /// Drops every excluded word from the lexicon, returns the number of entries removed.
    /// Exclusions that don't match anything are logged since they usually mean the list was made
    /// for a different version of the corpus.
    pub fn apply(&self, lexicon: &mut Lexicon) -> usize {
        let before = lexicon.len();
        let mut matched = HashSet::new();
        lexicon.entries_mut().retain(|entry| {
            if self.words.contains(&entry.word) {
                matched.insert(entry.word.clone());
                false
            } else {
                true
            }
        });
        for word in self.words.iter().filter(|x| !matched.contains(*x)) {
            warn!("Excluded word '{}' not found in lexicon", word);
        }
        before - lexicon.len()
    }
}
