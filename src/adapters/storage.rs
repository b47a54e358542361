use crate::adapters::http::HttpDataset;
use crate::domain::dataset::ReferenceDataset;
use crate::domain::ports::DatasetSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

/// Reference dataset stored as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct LocalDataset {
    path: PathBuf,
}

impl LocalDataset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DatasetSource for LocalDataset {
    async fn load(&self) -> Result<ReferenceDataset> {
        let data = tokio::fs::read(&self.path).await?;
        ReferenceDataset::from_json_slice(&data)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Picks the HTTP or file source based on the location's scheme.
pub fn dataset_source_for(location: &str, timeout: Duration) -> Box<dyn DatasetSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpDataset::new(location, timeout))
    } else {
        Box::new(LocalDataset::new(location))
    }
}
