//! Train and evaluate part-of-speech tagging models.
//!
//! This crate is a thin orchestration layer over the [`crfsuite`] sequence
//! labeling library: it reads word/tag corpora and drives model training
//! and evaluation. Decoding and parameter estimation happen entirely
//! inside the backend; what lives here is stream construction, model
//! caching, listener wiring, and report printing.
//!
//! The reference corpus format is one sentence per line, each token written
//! as `word_TAG`:
//!
//! ```text
//! The_DT dog_NN barked_VBD ._.
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error as ThisError;

pub mod corpus;
pub mod eval;
pub mod features;
pub mod model;
pub mod report;
pub mod train;

pub use corpus::{WordTagSample, WordTagSampleStream};
pub use eval::{run_pass, CrfTagger, EvaluationMonitor, Evaluator, Tag};
pub use features::{DefaultFeatureSet, FeatureSet};
pub use model::ModelCache;
pub use report::{FineGrainedReport, MismatchPrinter};
pub use train::{DefaultTrainer, PosTrainer, TrainAlgorithm, TrainParams};

/// Errors surfaced by corpus reading, model loading, tagging and training.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The model file could not be deserialized by the tagging backend.
    /// Construction never proceeds past this; there is no placeholder model.
    #[error("failed to load model from `{path}`")]
    ModelLoad {
        path: String,
        #[source]
        source: crfsuite::CrfError,
    },
    #[error(transparent)]
    Crf(#[from] crfsuite::CrfError),
    #[error("invalid training parameters in `{path}`")]
    Params {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
