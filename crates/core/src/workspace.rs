//! Per-job scratch directories.

use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Base name of every file the pipeline writes into a job directory.
const FILE_STEM: &str = "orb";

/// Lays out and removes the `<root>/<id>/` directory of each job.
#[derive(Debug, Clone)]
pub struct JobWorkspace {
    root: PathBuf,
}

impl JobWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn job_dir(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    /// Creates the job directory and any missing parents.
    pub async fn create(&self, id: &str) -> io::Result<PathBuf> {
        let dir = self.job_dir(id);
        tokio::fs::create_dir_all(&dir).await?;
        Ok(dir)
    }

    /// Where the downloaded source is stored.
    pub fn input_path(&self, id: &str, extension: &str) -> PathBuf {
        self.job_dir(id)
            .join(format!("{}-input.{}", FILE_STEM, extension))
    }

    /// Where a normalized animated source is written.
    pub fn normalized_path(&self, id: &str) -> PathBuf {
        self.job_dir(id).join(format!("{}-input.mp4", FILE_STEM))
    }

    /// Where the renderer writes its video.
    pub fn render_path(&self, id: &str) -> PathBuf {
        self.job_dir(id).join(format!("{}.mp4", FILE_STEM))
    }

    /// Prefix handed to the export script.
    pub fn export_prefix(&self, id: &str) -> PathBuf {
        self.job_dir(id).join(FILE_STEM)
    }

    /// Deletes the job directory. A missing directory is not an error.
    pub async fn remove(&self, id: &str) -> io::Result<()> {
        let dir = self.job_dir(id);
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => {
                debug!("Removed job directory {}", dir.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout() {
        let workspace = JobWorkspace::new("/tmp/orbs");
        assert_eq!(workspace.job_dir("42"), PathBuf::from("/tmp/orbs/42"));
        assert_eq!(
            workspace.input_path("42", "png"),
            PathBuf::from("/tmp/orbs/42/orb-input.png")
        );
        assert_eq!(
            workspace.normalized_path("42"),
            PathBuf::from("/tmp/orbs/42/orb-input.mp4")
        );
        assert_eq!(
            workspace.render_path("42"),
            PathBuf::from("/tmp/orbs/42/orb.mp4")
        );
        assert_eq!(
            workspace.export_prefix("42"),
            PathBuf::from("/tmp/orbs/42/orb")
        );
    }

    #[tokio::test]
    async fn test_create_and_remove() {
        let temp = TempDir::new().unwrap();
        let workspace = JobWorkspace::new(temp.path().join("nested"));

        let dir = workspace.create("7").await.unwrap();
        assert!(dir.is_dir());
        tokio::fs::write(dir.join("orb.mp4"), b"x").await.unwrap();

        workspace.remove("7").await.unwrap();
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_remove_missing_is_ok() {
        let temp = TempDir::new().unwrap();
        let workspace = JobWorkspace::new(temp.path());
        assert!(workspace.remove("never-created").await.is_ok());
    }
}
