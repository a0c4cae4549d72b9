use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use postag::{DefaultTrainer, Evaluator, ModelCache, TrainAlgorithm, TrainParams};

const CORPUS: &str = "\
The_DT dog_NN barked_VBD ._.
The_DT cat_NN slept_VBD ._.
A_DT dog_NN slept_VBD ._.
A_DT cat_NN barked_VBD ._.
The_DT dog_NN slept_VBD ._.
";

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("postag-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).expect("failed to create scratch dir");
    dir
}

#[test]
fn train_then_evaluate_end_to_end() {
    let dir = scratch("train-eval");
    let train = dir.join("train.pos");
    let test = dir.join("test.pos");
    fs::write(&train, CORPUS.repeat(10)).expect("failed to write train corpus");
    fs::write(&test, CORPUS).expect("failed to write test corpus");
    let model_path = dir.join("pos.crfsuite");
    let model_path = model_path.to_str().expect("non-utf8 scratch path");

    let cache = ModelCache::new();
    let trainer = DefaultTrainer::new("en", &train, &test, 0);
    let accuracy = trainer.train(model_path, &cache).expect("training failed");
    assert!((0.0..=1.0).contains(&accuracy));
    assert!(
        fs::metadata(model_path).expect("model file missing").len() > 0,
        "trained model is empty"
    );

    // The held-out scoring already went through the cache; repeated
    // construction must reuse the same loaded instance.
    assert!(cache.contains(model_path));
    let first = cache.load(model_path).expect("load failed");
    let second = cache.load(model_path).expect("reload failed");
    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);

    // A fresh evaluator over the same path must not trigger a second load.
    let evaluator = Evaluator::new(&test, model_path, 0, &cache).expect("evaluator failed");
    let again = evaluator.accuracy().expect("evaluation failed");
    assert_eq!(cache.len(), 1);
    assert!((again - accuracy).abs() < f64::EPSILON);
}

#[test]
fn detail_evaluate_writes_flushed_report() {
    let dir = scratch("detail");
    let train = dir.join("train.pos");
    let test = dir.join("test.pos");
    fs::write(&train, CORPUS.repeat(10)).expect("failed to write train corpus");
    fs::write(&test, CORPUS).expect("failed to write test corpus");
    let model_path = dir.join("pos.crfsuite");
    let model_path = model_path.to_str().expect("non-utf8 scratch path");

    let cache = ModelCache::new();
    DefaultTrainer::new("en", &train, &test, 0)
        .train(model_path, &cache)
        .expect("training failed");

    let report = dir.join("report.txt");
    Evaluator::new(&test, model_path, 0, &cache)
        .expect("evaluator failed")
        .detail_evaluate(&report)
        .expect("detail evaluation failed");

    let text = fs::read_to_string(&report).expect("report not readable");
    assert!(!text.is_empty());
    assert!(text.contains("Word accuracy:"));
    assert!(text.contains("\tNN:"));
}

#[test]
fn evaluator_construction_fails_on_missing_model() {
    let dir = scratch("missing-model");
    let test = dir.join("test.pos");
    fs::write(&test, CORPUS).expect("failed to write test corpus");

    let cache = ModelCache::new();
    let missing = dir.join("nope.crfsuite");
    let err = Evaluator::new(&test, missing.to_str().unwrap(), 0, &cache).unwrap_err();
    assert!(matches!(err, postag::Error::ModelLoad { .. }));
    assert!(cache.is_empty());
}

#[test]
fn params_file_parses() {
    let dir = scratch("params");
    let path = dir.join("params.json");
    fs::write(
        &path,
        r#"{"algorithm": "ap", "parameters": {"max_iterations": "10"}}"#,
    )
    .expect("failed to write params");
    let params = TrainParams::from_file(&path).expect("params failed to parse");
    assert_eq!(params.algorithm, TrainAlgorithm::Ap);
    assert_eq!(params.parameters["max_iterations"], "10");
}
