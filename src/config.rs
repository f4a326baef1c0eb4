//! Pipeline configuration. A JSON file says which corpus to load, which way round to use it, any
//! manual exclusions and how to name the arrays in the output archive:
//!
//! ```json
//! {
//!     "corpus": { "kind": "delimited", "path": "data/gpl.cd" },
//!     "task": "write",
//!     "exclusions": ["Mit", "Bei"],
//!     "exclusion_file": "data/celex_exclusions.txt",
//!     "layout": { "inputs": "phons", "targets": "words", "input_dict": "phon_dict", "target_dict": "word_dict" }
//! }
//! ```
use crate::archive::ArchiveLayout;
use crate::corpus::*;
use crate::error::Result;
use crate::padding::{PaddedDataset, PaddingOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;

/// Which corpus to load
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CorpusSource {
    /// Synthetic human date to ISO date pairs
    Dates(DateCorpus),
    /// CMU/TIMIT style `WORD  PH PH` dictionary
    Pronunciation(PronunciationDictionary),
    /// Delimiter separated lexicon such as CELEX
    Delimited(DelimitedLexicon),
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub corpus: CorpusSource,
    #[serde(default)]
    pub task: Task,
    /// Words removed from lexicons after manual inspection
    #[serde(default)]
    pub exclusions: Vec<String>,
    /// More exclusions, one word per line
    #[serde(default)]
    pub exclusion_file: Option<PathBuf>,
    /// Pad targets to a common length, defaults to on for everything apart from dates
    #[serde(default)]
    pub pad_targets: Option<bool>,
    #[serde(default)]
    pub layout: ArchiveLayout,
}

impl PipelineConfig {
    pub fn new(corpus: CorpusSource) -> Self {
        Self {
            corpus,
            task: Task::default(),
            exclusions: vec![],
            exclusion_file: None,
            pad_targets: None,
            layout: ArchiveLayout::default(),
        }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = fs::File::open(path)?;
        Self::from_reader(io::BufReader::new(file))
    }

    fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Inline exclusions merged with the exclusion file if there is one
    pub fn exclusion_list(&self) -> Result<ExclusionList> {
        let mut list = ExclusionList::new(self.exclusions.iter().cloned());
        if let Some(path) = &self.exclusion_file {
            list.extend(ExclusionList::open(path)?);
        }
        Ok(list)
    }

    pub fn padding_options(&self) -> PaddingOptions {
        let pad_targets = self
            .pad_targets
            .unwrap_or(!matches!(self.corpus, CorpusSource::Dates(_)));
        PaddingOptions { pad_targets }
    }

    pub fn loader(&self) -> Result<Box<dyn CorpusLoader>> {
        let exclusions = self.exclusion_list()?;
        let loader: Box<dyn CorpusLoader> = match &self.corpus {
            CorpusSource::Dates(d) => {
                if !exclusions.is_empty() {
                    info!("Exclusions don't apply to the date corpus, ignoring them");
                }
                Box::new(d.clone())
            }
            CorpusSource::Pronunciation(p) => Box::new(
                LexiconCorpus::new(p.clone(), self.task).with_exclusions(exclusions),
            ),
            CorpusSource::Delimited(d) => Box::new(
                LexiconCorpus::new(d.clone(), self.task).with_exclusions(exclusions),
            ),
        };
        Ok(loader)
    }

    /// Loads the corpus and turns it into a padded dataset
    pub fn prepare(&self) -> Result<PaddedDataset> {
        let corpus = self.loader()?.load()?;
        PaddedDataset::from_corpus(&corpus, self.padding_options())
    }
}
