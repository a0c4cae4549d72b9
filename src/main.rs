use std::path::PathBuf;

use clap::{Parser, Subcommand};
use postag::{DefaultTrainer, Evaluator, ModelCache, TrainParams};

/// Train and evaluate part-of-speech tagging models
#[derive(Debug, Parser)]
#[command(version)]
struct Argv {
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate a trained model against a reference corpus
    Eval {
        /// read a model from a file (MODEL)
        #[arg(short, long, required = true, value_name = "MODEL")]
        model: String,
        /// reference corpus with one `word_TAG` sentence per line
        #[arg(short, long, value_name = "FILE")]
        test_data: PathBuf,
        /// beam width for decoding (0 leaves the backend's search alone)
        #[arg(short, long, default_value_t = 0)]
        beam: usize,
        /// write the fine-grained per-tag report to a file
        #[arg(short, long, value_name = "FILE")]
        detail: Option<PathBuf>,
        /// print every mismatched token during the pass
        #[arg(short, long)]
        errors: bool,
    },
    /// Train a model on a word/tag corpus
    Train {
        /// language of the corpus
        #[arg(short, long, default_value = "en")]
        lang: String,
        /// training corpus with one `word_TAG` sentence per line
        #[arg(long, value_name = "FILE")]
        train_data: PathBuf,
        /// held-out corpus scored after training
        #[arg(short, long, value_name = "FILE")]
        test_data: PathBuf,
        /// beam width for decoding (0 leaves the backend's search alone)
        #[arg(short, long, default_value_t = 0)]
        beam: usize,
        /// JSON file with backend training parameters
        #[arg(short, long, value_name = "FILE")]
        params: Option<PathBuf>,
        /// write the trained model to a file (MODEL)
        #[arg(short, long, required = true, value_name = "MODEL")]
        model: String,
    },
}

fn main() {
    env_logger::init();
    let argv = Argv::parse();
    log::debug!("{argv:?}");
    let cache = ModelCache::new();
    match argv.command {
        Command::Eval {
            model,
            test_data,
            beam,
            detail,
            errors,
        } => {
            let evaluator = Evaluator::new(&test_data, &model, beam, &cache)
                .expect("failed to construct evaluator");
            if let Some(output) = detail {
                evaluator
                    .detail_evaluate(&output)
                    .expect("failed to write evaluation report");
            } else if errors {
                evaluator.eval_error().expect("evaluation failed");
            } else {
                evaluator.evaluate().expect("evaluation failed");
            }
        }
        Command::Train {
            lang,
            train_data,
            test_data,
            beam,
            params,
            model,
        } => {
            let mut params = match params {
                Some(path) => TrainParams::from_file(&path).expect("failed to read parameters"),
                None => TrainParams::default(),
            };
            params.verbose |= argv.verbose > 0;
            let trainer = DefaultTrainer::new(&lang, train_data, test_data, beam).params(params);
            let accuracy = trainer.train(&model, &cache).expect("training failed");
            println!("{accuracy}");
        }
    }
}
