//! Lexicons stored as delimiter separated records, for example CELEX where `gpl.cd` lines look
//! like `1\Aal\...\'al\...` with the orthography in the second field and the phonology second
//! from last. Which columns hold what is configuration, so the same reader covers any lexicon in
//! a flat table.
use super::*;
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::error;

/// How the pronunciation column is split into symbols
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PronunciationFormat {
    /// Every grapheme is a symbol, used for notations with one character per phone
    #[default]
    Graphemes,
    /// Phones are separated by whitespace
    Whitespace,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelimitedLexicon {
    pub path: PathBuf,
    pub delimiter: char,
    /// Column holding the word, negative values count back from the end of the record
    pub word_column: isize,
    /// Column holding the pronunciation, negative values count back from the end of the record
    pub pronunciation_column: isize,
    pub format: PronunciationFormat,
}

impl Default for DelimitedLexicon {
    fn default() -> Self {
        Self::celex(PathBuf::new())
    }
}

impl DelimitedLexicon {
    /// Column layout of the CELEX `gpl.cd`/`epl.cd` files
    pub fn celex(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: '\\',
            word_column: 1,
            pronunciation_column: -2,
            format: PronunciationFormat::Graphemes,
        }
    }

    pub fn open(&self) -> Result<Lexicon> {
        let f = File::open(&self.path)?;
        self.read(io::BufReader::new(f))
    }

    fn read(&self, reader: impl Read) -> Result<Lexicon> {
        if !self.delimiter.is_ascii() {
            return Err(PrepError::Corpus(format!(
                "delimiter '{}' must be a single byte character",
                self.delimiter
            )));
        }
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .delimiter(self.delimiter as u8)
            .quoting(false)
            .flexible(true)
            .from_reader(reader);

        let mut lexicon = Lexicon::default();
        for result in rdr.records() {
            let record = result?;
            let word = column(&record, self.word_column);
            let pron = column(&record, self.pronunciation_column);
            match (word, pron) {
                (Some(word), Some(pron)) if !word.is_empty() && !pron.is_empty() => {
                    let pronunciation = match self.format {
                        PronunciationFormat::Graphemes => RawSequence::Word(pron.to_string()),
                        PronunciationFormat::Whitespace => RawSequence::Symbols(
                            pron.split_whitespace().map(str::to_string).collect(),
                        ),
                    };
                    lexicon.push(word, pronunciation);
                }
                _ => error!("Incomplete record: {:?}", record),
            }
        }
        Ok(lexicon)
    }
}

fn column(record: &csv::StringRecord, index: isize) -> Option<&str> {
    let index = if index < 0 {
        record.len().checked_sub(index.unsigned_abs())?
    } else {
        index as usize
    };
    record.get(index).map(str::trim)
}

impl LexiconLoader for DelimitedLexicon {
    fn load_lexicon(&self) -> Result<Lexicon> {
        self.open()
    }
}
