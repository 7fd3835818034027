//! Pod source reading a saved `kubectl get pods -o json` document

use super::{parse_pod_list, PodSource, SourceError};
use crate::models::PodDescriptor;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

/// Reads a pod list from a file, or from stdin when the path is `-`
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_stdin(&self) -> bool {
        self.path == Path::new("-")
    }

    async fn read(&self) -> std::io::Result<Vec<u8>> {
        if self.is_stdin() {
            let mut buf = Vec::new();
            tokio::io::stdin().read_to_end(&mut buf).await?;
            Ok(buf)
        } else {
            tokio::fs::read(&self.path).await
        }
    }
}

#[async_trait]
impl PodSource for FileSource {
    async fn fetch(&self) -> Result<Vec<PodDescriptor>, SourceError> {
        let bytes = self.read().await.map_err(|source| SourceError::Read {
            path: self.path.clone(),
            source,
        })?;
        parse_pod_list(&bytes)
    }

    fn describe(&self) -> String {
        if self.is_stdin() {
            "stdin".to_string()
        } else {
            self.path.display().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_pod_list_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pods.json");
        tokio::fs::write(
            &path,
            r#"{"items": [{"metadata": {"name": "a", "namespace": "b"}, "spec": {"containers": [{"name": "c"}]}}]}"#,
        )
        .await
        .unwrap();

        let pods = FileSource::new(&path).fetch().await.unwrap();

        assert_eq!(pods.len(), 1);
        assert_eq!(pods[0].spec.containers[0].name, "c");
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let source = FileSource::new(dir.path().join("nope.json"));

        let err = source.fetch().await.unwrap_err();

        assert!(matches!(err, SourceError::Read { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn test_describe() {
        assert_eq!(FileSource::new("-").describe(), "stdin");
        assert_eq!(FileSource::new("dump.json").describe(), "dump.json");
    }
}
