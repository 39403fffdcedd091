use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::InputEvent;
use crate::data::loader;
use crate::data::model::Dataset;

/// The loaded input file and its columns.
#[derive(Debug, Default)]
pub struct InputFileBox {
    path: Option<PathBuf>,
    data: Option<Dataset>,
}

impl InputFileBox {
    pub fn data(&self) -> Option<&Dataset> {
        self.data.as_ref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// File name shown next to the "Choose file" button.
    pub fn file_label(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "No file chosen".to_string())
    }

    /// Replace the dataset wholesale.
    pub fn set_data(&mut self, path: Option<PathBuf>, data: Dataset) -> InputEvent {
        self.path = path;
        self.data = Some(data);
        InputEvent::InputFileChanged
    }

    pub fn load(&mut self, path: &Path) -> Result<InputEvent> {
        let dataset = loader::load_file(path)
            .with_context(|| format!("loading {}", path.display()))?;
        log::info!(
            "Loaded {} records with columns {:?} from {}",
            dataset.records(),
            dataset.column_names(),
            path.display()
        );
        Ok(self.set_data(Some(path.to_path_buf()), dataset))
    }

    /// Read the current file again; `None` when no file was loaded.
    pub fn reload(&mut self) -> Option<Result<InputEvent>> {
        let path = self.path.clone()?;
        Some(self.load(&path))
    }

    pub fn clear(&mut self) -> InputEvent {
        self.path = None;
        self.data = None;
        InputEvent::InputFileChanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_failure_keeps_previous_data() {
        let dir = tempfile::tempdir().expect("tempdir");
        let good = dir.path().join("good.csv");
        std::fs::write(&good, "x,y\n1,2\n").unwrap();

        let mut input = InputFileBox::default();
        assert_eq!(input.load(&good).unwrap(), InputEvent::InputFileChanged);
        assert_eq!(input.file_label(), "good.csv");

        assert!(input.load(&dir.path().join("missing.csv")).is_err());
        assert_eq!(input.data().unwrap().records(), 1);
        assert_eq!(input.path(), Some(good.as_path()));
    }

    #[test]
    fn reload_without_file_is_none() {
        let mut input = InputFileBox::default();
        assert!(input.reload().is_none());
        assert_eq!(input.file_label(), "No file chosen");
    }
}
