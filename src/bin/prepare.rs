use anyhow::Context;
use clap::Parser;
use g2p_data::archive;
use g2p_data::config::PipelineConfig;
use g2p_data::corpus::{ExclusionList, Task};
use g2p_data::params::ModelParams;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
pub struct Args {
    /// JSON pipeline configuration describing the corpus to load
    #[clap(long, short)]
    config: PathBuf,
    /// Overrides the task in the configuration, read (g2p) or write (p2g)
    #[clap(long)]
    task: Option<Task>,
    /// Extra exclusion file, one word per line
    #[clap(long)]
    exclusions: Option<PathBuf>,
    /// Location to save the prepared archive
    #[clap(short, long, default_value = "data/dataset.npz")]
    output: PathBuf,
    /// Saves the derived model parameters as JSON
    #[clap(long)]
    params: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    g2p_data::setup_logging();
    let args = Args::parse();

    let mut config = PipelineConfig::open(&args.config)
        .with_context(|| format!("loading config {}", args.config.display()))?;
    if let Some(task) = args.task {
        config.task = task;
    }
    if let Some(path) = &args.exclusions {
        let extra = ExclusionList::open(path)
            .with_context(|| format!("loading exclusions {}", path.display()))?;
        info!("{} extra exclusions", extra.len());
        config.exclusions.extend(extra.iter().cloned());
    }

    info!("Preparing {:?} corpus for the {} task", config.corpus, config.task);
    let dataset = config.prepare().context("preparing dataset")?;

    archive::save(&args.output, &dataset, &config.layout)
        .with_context(|| format!("saving archive {}", args.output.display()))?;

    let params = ModelParams::from_dataset(&dataset);
    println!("Input dictionary size: {}", params.x_dict_size);
    println!("Output classes: {}", params.num_classes);
    println!("Input sequence length: {}", params.x_seq_length);
    println!("Output sequence length: {}", params.y_seq_length);

    if let Some(path) = &args.params {
        let report = serde_json::to_string_pretty(&params)?;
        std::fs::write(path, report)?;
    }

    Ok(())
}
