use std::env;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::{Layer, Registry};

pub mod archive;
pub mod batch;
pub mod config;
pub mod corpus;
pub mod decode;
pub mod error;
pub mod metrics;
pub mod padding;
pub mod params;
pub mod text;
pub mod vocab;

pub use error::{PrepError, Result};
pub use padding::{PaddedDataset, PaddingOptions};
pub use vocab::Vocabulary;

pub fn setup_logging() {
    let filter = match env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_env("RUST_LOG"),
        _ => EnvFilter::new("g2p_data=info,prepare=info,inspect=info"),
    };

    let fmt = tracing_subscriber::fmt::Layer::default();

    let subscriber = filter.and_then(fmt).with_subscriber(Registry::default());

    tracing::subscriber::set_global_default(subscriber).unwrap();
}
