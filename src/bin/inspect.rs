use anyhow::Context;
use clap::Parser;
use g2p_data::archive::{self, ArchiveLayout};
use g2p_data::batch::batches;
use g2p_data::metrics::accuracy;
use g2p_data::params::ModelParams;
use ndarray::{s, ArrayD};
use ndarray_npy::read_npy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
pub struct Args {
    /// Archive created by `prepare`
    #[clap(long, short)]
    input: PathBuf,
    /// Use the CELEX array names (phons, words, phon_dict, word_dict)
    #[clap(long)]
    celex: bool,
    /// Number of rows to print
    #[clap(long, default_value = "5")]
    rows: usize,
    /// Batch size to report batching for
    #[clap(long, default_value = "128")]
    batch_size: usize,
    /// Seed for the batch shuffle
    #[clap(long, default_value = "0")]
    seed: u64,
    /// `.npy` file with model output for the targets (without the `<GO>` column)
    #[clap(long)]
    predictions: Option<PathBuf>,
    /// How to interpret the predictions, `train` for scores, `test` for symbol ids
    #[clap(long, default_value = "test")]
    mode: String,
}

fn main() -> anyhow::Result<()> {
    g2p_data::setup_logging();
    let args = Args::parse();

    let layout = if args.celex {
        ArchiveLayout::celex()
    } else {
        ArchiveLayout::standard()
    };
    let dataset = archive::load(&args.input, &layout)
        .with_context(|| format!("loading archive {}", args.input.display()))?;

    let params = ModelParams::from_dataset(&dataset);
    println!("{}", serde_json::to_string_pretty(&params)?);

    for i in 0..args.rows.min(dataset.len()) {
        println!(
            "{} => {}",
            dataset.source_row(i)?.join(" "),
            dataset.target_row(i)?.join(" ")
        );
    }

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let iter = batches(
        dataset.inputs.view(),
        dataset.targets.view(),
        args.batch_size,
        &mut rng,
    )?;
    info!(
        "{} batches of {} per epoch, {} rows skipped",
        iter.len(),
        args.batch_size,
        dataset.len() - iter.len() * args.batch_size
    );

    if let Some(path) = &args.predictions {
        let predictions: ArrayD<f32> =
            read_npy(path).with_context(|| format!("reading predictions {}", path.display()))?;
        let targets = dataset.targets.slice(s![.., 1..]);
        let acc = accuracy(
            predictions.view(),
            targets,
            &dataset.target_vocab,
            &args.mode,
        )?;
        println!("{}", acc);
    }

    Ok(())
}
