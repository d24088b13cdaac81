use crate::domain::ports::FixtureSource;
use crate::utils::error::{Result, SuiteError};
use std::path::{Component, Path, PathBuf};

/// Reads fixtures from `<root>/<format>/<id>.<ext>` on the local filesystem.
#[derive(Debug, Clone)]
pub struct FixtureLoader {
    root: PathBuf,
}

impl FixtureLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Loader rooted at the crate's own `data/` directory.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, relative_path: &str) -> Result<PathBuf> {
        let invalid = |reason: &str| SuiteError::InvalidFixturePathError {
            path: relative_path.to_string(),
            reason: reason.to_string(),
        };

        if relative_path.trim().is_empty() {
            return Err(invalid("path is empty"));
        }

        for component in Path::new(relative_path).components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => return Err(invalid("path escapes the fixture root")),
                Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid("path must be relative to the fixture root"))
                }
            }
        }

        Ok(self.root.join(relative_path))
    }
}

impl FixtureSource for FixtureLoader {
    async fn read_data_file(&self, relative_path: &str) -> Result<String> {
        let full_path = self.resolve(relative_path)?;
        tracing::debug!("Reading fixture {}", full_path.display());

        match tokio::fs::read_to_string(&full_path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SuiteError::FixtureNotFoundError {
                    path: full_path.display().to_string(),
                })
            }
            Err(e) => Err(SuiteError::IoError(e)),
        }
    }
}
