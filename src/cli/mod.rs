// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, built on clap.
// All work is delegated to Layer 2 (application).
//
// Commands:
//   1. `score`    — score a predicted orders file
//   2. `evaluate` — score one epoch of model output, record
//                   metrics and update the training state
//   3. `split`    — split orders into train / validation
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EvaluateArgs, ScoreArgs, SplitArgs};

use crate::domain::traits::MetricsSink;
use crate::infra::metrics::{CsvMetricsSink, TracingMetricsSink};

/// The main CLI struct
#[derive(Parser, Debug)]
#[command(
    name = "notebook-order",
    version,
    about = "Score predicted notebook cell orderings against the ground truth."
)]
pub struct Cli {
    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match &self.command {
            Commands::Score(args)    => self.run_score(args),
            Commands::Evaluate(args) => self.run_evaluate(args),
            Commands::Split(args)    => self.run_split(args),
        }
    }

    fn run_score(&self, args: &ScoreArgs) -> Result<()> {
        use crate::application::score_use_case::ScoreUseCase;

        let report = ScoreUseCase::new(&args.orders, &args.predicted).execute()?;
        println!("Score: {:.6}", report.score);
        Ok(())
    }

    fn run_evaluate(&self, args: &EvaluateArgs) -> Result<()> {
        use crate::application::evaluate_use_case::EvaluateUseCase;

        tracing::info!("Evaluating scores from: {}", args.scores);

        let csv_sink = CsvMetricsSink::new(&args.checkpoint_dir)?;
        tracing::info!("Appending metrics to '{}'", csv_sink.csv_path().display());

        let mut sinks: Vec<Box<dyn MetricsSink>> = vec![
            Box::new(TracingMetricsSink),
            Box::new(csv_sink),
        ];

        let use_case = EvaluateUseCase::new(args.into());
        let outcome  = use_case.execute(args.into(), &mut sinks)?;

        println!(
            "Epoch {} score: {:.6}{}",
            outcome.epoch,
            outcome.score,
            if outcome.improved { " (new best, keep checkpoint)" } else { "" },
        );
        Ok(())
    }

    fn run_split(&self, args: &SplitArgs) -> Result<()> {
        use crate::application::split_use_case::SplitUseCase;

        let (train, val) =
            SplitUseCase::new(&args.orders, &args.out_dir, args.train_fraction, args.seed).execute()?;
        println!("Split: {train} train / {val} validation notebooks");
        Ok(())
    }
}
