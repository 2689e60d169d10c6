// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and routes each subcommand to its
// use case. Printing results happens here, nowhere else.

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, ParseArgs, PredictArgs, TopicsArgs, TrainArgs};

use crate::data::raw::RAW_FILE_NAME;

#[derive(Parser, Debug)]
#[command(
    name = "coco-topics",
    version,
    about = "Parse MSCOCO 2017 and train a topic classifier on pre-extracted image features."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Parse(args)   => run_parse(args),
            Commands::Topics(args)  => run_topics(args),
            Commands::Train(args)   => run_train(args),
            Commands::Predict(args) => run_predict(args),
        }
    }
}

fn run_parse(args: ParseArgs) -> Result<()> {
    use crate::application::parse_use_case::ParseUseCase;
    use crate::data::coco::CocoParser;

    let output = args.root.join(RAW_FILE_NAME);
    let raw = ParseUseCase::new(CocoParser::new(&args.root), &output).execute()?;

    println!(
        "Parsed {} train / {} val images, {} categories -> {}",
        raw.images_data_train.len(),
        raw.images_data_val.len(),
        raw.category_id.len(),
        output.display()
    );
    Ok(())
}

fn run_topics(args: TopicsArgs) -> Result<()> {
    use crate::application::topics_use_case::TopicsUseCase;

    for (split, shape) in TopicsUseCase::new(args.raw, &args.data).execute()? {
        println!("{split}: topics {shape:?}");
    }
    Ok(())
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on caches in: {}", args.data.display());
    let summary = TrainUseCase::new(args.into()).execute()?;

    println!("\n\nModel training finished.");
    if let Some(path) = summary.best_checkpoint {
        println!(
            "Best val_loss {:.4} at epoch {} -> {}",
            summary.best_val_loss,
            summary.best_epoch.unwrap_or_default(),
            path.display()
        );
    }
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let prediction = PredictUseCase::new(args.into()).execute()?;

    match prediction.image_id {
        Some(id) => println!("Row {} (image {})", prediction.row, id),
        None => println!("Row {}", prediction.row),
    }
    for (name, p) in &prediction.topics {
        println!("  {name:<20} {p:.4}");
    }
    if !prediction.actual.is_empty() {
        println!("Annotated: {}", prediction.actual.join(", "));
    }
    Ok(())
}
