//! Path-keyed cache of loaded tagging models.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crfsuite::Model;

use crate::{Error, Result};

/// Cache of deserialized models, keyed by the model file path.
///
/// Deserializing a model is the expensive part of evaluator construction;
/// the cache makes repeated constructions against the same path hit the
/// file once per process. Distinct paths get distinct entries, so two
/// evaluators over different models never alias. The whole tool is
/// single-threaded, which is why interior mutability is a `RefCell` and
/// sharing is `Rc`.
#[derive(Default)]
pub struct ModelCache {
    loaded: RefCell<HashMap<String, Rc<Model>>>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the model at `path`, reusing a previously loaded instance for
    /// the same path. A failed load surfaces as [`Error::ModelLoad`] and
    /// leaves the cache untouched; callers never observe a stale or
    /// placeholder model. The backend opens and releases the file handle
    /// on both outcomes.
    pub fn load(&self, path: &str) -> Result<Rc<Model>> {
        if let Some(model) = self.loaded.borrow().get(path) {
            log::debug!("reusing loaded model `{path}`");
            return Ok(model.clone());
        }
        let model = Model::from_file(path).map_err(|source| Error::ModelLoad {
            path: path.to_string(),
            source,
        })?;
        let model = Rc::new(model);
        self.loaded
            .borrow_mut()
            .insert(path.to_string(), model.clone());
        log::info!("loaded model `{path}`");
        Ok(model)
    }

    /// Whether a model for `path` is already resident.
    pub fn contains(&self, path: &str) -> bool {
        self.loaded.borrow().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.loaded.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.borrow().is_empty()
    }
}
