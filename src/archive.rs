//! Saving and restoring prepared datasets as `.npz` archives so they can be moved to a training
//! machine without the raw corpus, and opened from numpy if needed.
//!
//! An archive holds four arrays: the padded inputs and targets as `i64` matrices and the two
//! dictionaries. Dictionaries are stored as a `u8` array holding a JSON object of
//! `symbol -> index`, which numpy reads back with `json.loads(bytes(arr))`. They're turned back
//! into a [`Vocabulary`] as soon as they're read so nothing past this module has to care how they
//! were stored.
use crate::error::{PrepError, Result};
use crate::padding::PaddedDataset;
use crate::vocab::Vocabulary;
use ndarray::{Array1, Array2};
use ndarray_npy::{NpzReader, NpzWriter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read, Seek, Write};
use std::path::Path;
use tracing::info;

/// Names of the arrays inside an archive
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ArchiveLayout {
    pub inputs: String,
    pub targets: String,
    pub input_dict: String,
    pub target_dict: String,
}

impl Default for ArchiveLayout {
    fn default() -> Self {
        Self::standard()
    }
}

impl ArchiveLayout {
    /// `inputs`, `targets`, `inp_dict`, `tar_dict`
    pub fn standard() -> Self {
        Self {
            inputs: "inputs".to_string(),
            targets: "targets".to_string(),
            input_dict: "inp_dict".to_string(),
            target_dict: "tar_dict".to_string(),
        }
    }

    /// Layout used for CELEX archives: `phons`, `words`, `phon_dict`, `word_dict`
    pub fn celex() -> Self {
        Self {
            inputs: "phons".to_string(),
            targets: "words".to_string(),
            input_dict: "phon_dict".to_string(),
            target_dict: "word_dict".to_string(),
        }
    }
}

/// Saves a dataset to `path`
pub fn save(path: impl AsRef<Path>, dataset: &PaddedDataset, layout: &ArchiveLayout) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let file = write(io::BufWriter::new(file), dataset, layout)?;
    file.into_inner().map_err(|e| e.into_error())?;
    info!("Saved dataset to {}", path.as_ref().display());
    Ok(())
}

/// Loads a dataset from `path`
pub fn load(path: impl AsRef<Path>, layout: &ArchiveLayout) -> Result<PaddedDataset> {
    let file = File::open(path.as_ref())?;
    let dataset = read(io::BufReader::new(file), layout)?;
    info!(
        "Loaded {} sequences from {}",
        dataset.len(),
        path.as_ref().display()
    );
    Ok(dataset)
}

/// Writes the archive to any seekable writer, returning the writer once the archive is finished.
pub fn write<W: Write + Seek>(
    writer: W,
    dataset: &PaddedDataset,
    layout: &ArchiveLayout,
) -> Result<W> {
    let mut npz = NpzWriter::new_compressed(writer);
    npz.add_array(layout.inputs.as_str(), &dataset.inputs)?;
    npz.add_array(layout.targets.as_str(), &dataset.targets)?;
    npz.add_array(
        layout.input_dict.as_str(),
        &vocab_to_array(&dataset.input_vocab)?,
    )?;
    npz.add_array(
        layout.target_dict.as_str(),
        &vocab_to_array(&dataset.target_vocab)?,
    )?;
    Ok(npz.finish()?)
}

/// Reads an archive from any seekable reader
pub fn read<R: Read + Seek>(reader: R, layout: &ArchiveLayout) -> Result<PaddedDataset> {
    let mut npz = NpzReader::new(reader)?;
    let inputs: Array2<i64> = npz.by_name(&layout.inputs)?;
    let targets: Array2<i64> = npz.by_name(&layout.targets)?;
    if inputs.nrows() != targets.nrows() {
        return Err(PrepError::LengthMismatch {
            sources: inputs.nrows(),
            targets: targets.nrows(),
        });
    }
    let input_dict: Array1<u8> = npz.by_name(&layout.input_dict)?;
    let target_dict: Array1<u8> = npz.by_name(&layout.target_dict)?;

    Ok(PaddedDataset {
        inputs,
        targets,
        input_vocab: array_to_vocab(&input_dict)?,
        target_vocab: array_to_vocab(&target_dict)?,
    })
}

fn vocab_to_array(vocab: &Vocabulary) -> Result<Array1<u8>> {
    Ok(Array1::from(serde_json::to_vec(vocab.mapping())?))
}

fn array_to_vocab(array: &Array1<u8>) -> Result<Vocabulary> {
    let mapping: BTreeMap<String, i64> = serde_json::from_slice(&array.to_vec())?;
    Vocabulary::from_mapping(mapping)
}
