use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Persists rendered artifacts into the project directory.
pub struct Generator {
    project_dir: PathBuf,
}

impl Generator {
    pub fn new(project_dir: PathBuf) -> Self {
        Self { project_dir }
    }

    pub fn write(&self, file_name: &str, contents: &str) -> Result<()> {
        let path = self.project_dir.join(file_name);
        fs::write(&path, contents).with_context(|| format!("cannot write file {file_name}"))
    }
}
