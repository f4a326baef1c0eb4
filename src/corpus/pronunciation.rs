//! Pronunciation dictionaries in the CMU dict layout, a word then its phones separated by
//! whitespace:
//!
//! ```text
//! ;;; comment
//! HELLO  HH AH0 L OW1
//! HELLO(2)  HH EH0 L OW1
//! ```
//!
//! The TIMIT lexicon is close enough that it goes through the same reader, its pronunciations are
//! wrapped in slashes (`hello /hh eh l ow/`) which we strip. Phones are kept as strings rather than
//! parsed into a fixed phone set, the vocabulary gets built from whatever the corpus contains.
use super::*;
use crate::text::{dict_normalise, normalise_text};
use std::fs;
use std::io::{self, prelude::*};
use std::path::PathBuf;
use tracing::error;

/// How to treat the headword before it goes into the lexicon
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordNormalisation {
    /// Leave the word alone apart from removing variant markers like `(2)`
    #[default]
    Keep,
    /// ASCII fold and uppercase, dropping punctuation
    Fold,
}

/// Options for reading a pronunciation dictionary
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PronunciationDictionary {
    pub path: PathBuf,
    pub words: WordNormalisation,
    /// Remove the trailing stress digits from vowels, `AH0` becomes `AH`
    pub strip_stress: bool,
}

impl PronunciationDictionary {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Opens a dictionary from a file
    pub fn open(&self) -> io::Result<Lexicon> {
        let file = fs::File::open(&self.path)?;
        let reader = io::BufReader::new(file);
        self.read(reader)
    }

    /// Parses from any reader so tests can use in-memory dictionaries. Lines we can't make sense
    /// of are logged and skipped.
    fn read(&self, reader: impl BufRead) -> io::Result<Lexicon> {
        let mut lexicon = Lexicon::default();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') {
                continue;
            }
            let (word, phones) = match line.split_once(char::is_whitespace) {
                Some(s) => s,
                None => {
                    error!("Line {} has no pronunciation: '{}'", line_no + 1, line);
                    continue;
                }
            };
            let word = match self.words {
                WordNormalisation::Keep => dict_normalise(word),
                WordNormalisation::Fold => normalise_text(&dict_normalise(word)),
            };
            let phones = phones.trim().trim_start_matches('/').trim_end_matches('/');
            let pronunciation = phones
                .split_whitespace()
                .map(|x| self.phone(x))
                .collect::<Vec<_>>();
            if word.is_empty() || pronunciation.is_empty() {
                error!("Line {} is incomplete: '{}'", line_no + 1, line);
                continue;
            }
            lexicon.push(word, pronunciation);
        }
        Ok(lexicon)
    }

    fn phone(&self, phone: &str) -> String {
        if self.strip_stress {
            phone.trim_end_matches(|c: char| c.is_ascii_digit()).to_string()
        } else {
            phone.to_string()
        }
    }
}

impl LexiconLoader for PronunciationDictionary {
    fn load_lexicon(&self) -> Result<Lexicon> {
        Ok(self.open()?)
    }
}
