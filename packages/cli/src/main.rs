#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line host for the pothole assistant.
//!
//! ```text
//! pothole_assistant ask "How many potholes are there?"
//! pothole_assistant --data-dir ./data
//! ```
//!
//! Running with no subcommand enters the interactive chat loop.

mod interactive;
mod transcript;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use pothole_assistant_ai::FallbackResponder;
use pothole_assistant_ai::providers::ChatOptions;
use pothole_assistant_resolver::QueryResolver;

#[derive(Parser)]
#[command(
    name = "pothole_assistant",
    about = "Answer questions about San Antonio pothole complaints"
)]
struct Cli {
    /// Directory containing the CSV datasets (defaults to `POTHOLE_DATA_DIR`
    /// or `data`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Skip the model explanation after average repair time answers
    #[arg(long, global = true)]
    no_explain: bool,

    /// Sampling temperature for fallback model replies
    #[arg(long, global = true)]
    temperature: Option<f32>,

    /// Maximum tokens in a fallback model reply
    #[arg(long, global = true)]
    max_tokens: Option<u32>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single question and exit
    Ask {
        /// The question, in plain English
        question: String,
    },
}

impl Cli {
    /// Fallback sampling options, with flags overriding the defaults.
    fn chat_options(&self) -> ChatOptions {
        let defaults = ChatOptions::default();
        ChatOptions {
            temperature: self.temperature.unwrap_or(defaults.temperature),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let chat_options = cli.chat_options();

    let data_dir = cli
        .data_dir
        .unwrap_or_else(pothole_assistant_dataset::data_dir_from_env);

    log::info!("Loading datasets from {}", data_dir.display());
    let datasets = pothole_assistant_dataset::load_from_dir(&data_dir)?;
    log::info!(
        "Loaded {} complaints, {} pavement segments, {} bus stops",
        datasets.complaints.len(),
        datasets.pavement.len(),
        datasets.bus_stops.len()
    );

    let fallback = FallbackResponder::from_env().with_options(chat_options);
    let resolver = QueryResolver::new(Arc::new(datasets), fallback)
        .with_repair_time_explanation(!cli.no_explain);

    match cli.command {
        Some(Commands::Ask { question }) => {
            println!("{}", resolver.handle_query(&question).await);
        }
        None => interactive::run(&resolver).await?,
    }

    Ok(())
}
