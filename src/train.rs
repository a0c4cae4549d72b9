//! Model training: corpus encoding and delegation to the backend trainer.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crfsuite::{Algorithm, GraphicalModel, Trainer};
use serde::{Deserialize, Serialize};

use crate::corpus::WordTagSampleStream;
use crate::eval::Evaluator;
use crate::features::{DefaultFeatureSet, FeatureSet};
use crate::model::ModelCache;
use crate::{Error, Result};

/// Training algorithm selection, mirroring what the backend supports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainAlgorithm {
    #[default]
    Lbfgs,
    L2sgd,
    /// Averaged perceptron.
    Ap,
    /// Passive aggressive.
    Pa,
    Arow,
}

impl TrainAlgorithm {
    fn to_backend(self) -> Algorithm {
        match self {
            Self::Lbfgs => Algorithm::LBFGS,
            Self::L2sgd => Algorithm::L2SGD,
            Self::Ap => Algorithm::AP,
            Self::Pa => Algorithm::PA,
            Self::Arow => Algorithm::AROW,
        }
    }
}

/// Training-side configuration, loadable from a JSON parameters file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainParams {
    pub algorithm: TrainAlgorithm,
    /// Raw backend parameters, applied in order with `Trainer::set`.
    pub parameters: BTreeMap<String, String>,
    /// Emit backend progress messages while training.
    pub verbose: bool,
}

impl TrainParams {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| Error::Params {
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Base trainer: reads the training corpus, encodes each sentence with the
/// configured feature set, and delegates the optimization loop and model
/// serialization to the backend. Trainer variants differ only in the
/// feature set they install.
pub struct PosTrainer<F> {
    lang: String,
    train_data: PathBuf,
    test_data: PathBuf,
    beam: usize,
    params: TrainParams,
    features: F,
}

impl<F: FeatureSet> PosTrainer<F> {
    pub fn with_features(
        lang: &str,
        train_data: impl Into<PathBuf>,
        test_data: impl Into<PathBuf>,
        beam: usize,
        features: F,
    ) -> Self {
        Self {
            lang: lang.to_string(),
            train_data: train_data.into(),
            test_data: test_data.into(),
            beam,
            params: TrainParams::default(),
            features,
        }
    }

    /// Replace the default training parameters.
    pub fn params(mut self, params: TrainParams) -> Self {
        self.params = params;
        self
    }

    /// Train a model, write it to `model_out`, then score it against the
    /// held-out test corpus. Returns the held-out word accuracy.
    pub fn train(&self, model_out: &str, cache: &ModelCache) -> Result<f64> {
        log::info!(
            "training `{}` tagger from `{}` (beam width {})",
            self.lang,
            self.train_data.display(),
            self.beam
        );
        let mut trainer = Trainer::new(self.params.verbose);
        trainer.select(self.params.algorithm.to_backend(), GraphicalModel::CRF1D)?;
        for (name, value) in &self.params.parameters {
            trainer.set(name, value)?;
        }
        let samples = WordTagSampleStream::open(&self.train_data)?;
        let mut appended = 0usize;
        for sample in samples {
            let sample = sample?;
            if sample.is_empty() {
                continue;
            }
            let items = self.features.encode(sample.words());
            trainer.append(&items, sample.tags(), 0)?;
            appended += 1;
        }
        log::info!("appended {appended} training sentences");
        trainer.train(model_out, -1)?;
        log::info!("wrote model to `{model_out}`");

        let accuracy =
            Evaluator::new(&self.test_data, model_out, self.beam, cache)?.accuracy()?;
        log::info!("held-out word accuracy: {accuracy}");
        Ok(accuracy)
    }
}

/// The no-custom-feature-set trainer variant.
pub type DefaultTrainer = PosTrainer<DefaultFeatureSet>;

impl PosTrainer<DefaultFeatureSet> {
    pub fn new(
        lang: &str,
        train_data: impl Into<PathBuf>,
        test_data: impl Into<PathBuf>,
        beam: usize,
    ) -> Self {
        Self::with_features(lang, train_data, test_data, beam, DefaultFeatureSet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_default_to_lbfgs() {
        let params: TrainParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.algorithm, TrainAlgorithm::Lbfgs);
        assert!(params.parameters.is_empty());
        assert!(!params.verbose);
    }

    #[test]
    fn params_parse_from_json() {
        let params: TrainParams = serde_json::from_str(
            r#"{"algorithm": "l2sgd", "parameters": {"c2": "0.5"}, "verbose": true}"#,
        )
        .unwrap();
        assert_eq!(params.algorithm, TrainAlgorithm::L2sgd);
        assert_eq!(params.parameters["c2"], "0.5");
        assert!(params.verbose);
    }
}
