//! Persistence for trained price models

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{PipelineError, Result};
use crate::io::check_extension;
use crate::training::PriceModel;

pub trait ModelStore: Send + Sync {
    fn store_model(&self, model: &PriceModel) -> Result<()>;
    fn load_model(&self) -> Result<PriceModel>;
}

/// Stores the model as a MessagePack blob in a `.pkl` file.
pub struct MsgpackModelStore {
    path: PathBuf,
}

impl MsgpackModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ModelStore for MsgpackModelStore {
    fn store_model(&self, model: &PriceModel) -> Result<()> {
        check_extension(&self.path, "pkl", "pickle")?;

        let model_bytes = rmp_serde::to_vec(model)?;
        let mut f = File::create(&self.path)?;
        f.write_all(&model_bytes)?;

        info!("Model saved to {} ({} bytes)", self.path.display(), model_bytes.len());
        Ok(())
    }

    fn load_model(&self) -> Result<PriceModel> {
        check_extension(&self.path, "pkl", "pickle")?;

        if !self.path.exists() {
            return Err(PipelineError::NotFound(self.path.clone()));
        }

        let mut model_bytes = Vec::new();
        File::open(&self.path)?.read_to_end(&mut model_bytes)?;
        let model: PriceModel = rmp_serde::from_slice(&model_bytes)?;

        info!("Model loaded from {}", self.path.display());
        Ok(model)
    }
}
