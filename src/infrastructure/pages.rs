//! Filesystem user pages
//!
//! One markdown file per account under a pages directory, named after
//! the canonical username with spaces turned into underscores.

use std::fs;
use std::path::PathBuf;

use crate::domain::ports::{PageError, UserPagePublisher};
use crate::domain::value_objects::Username;

pub struct FsPagePublisher {
    dir: PathBuf,
}

impl FsPagePublisher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn page_path(&self, username: &Username) -> PathBuf {
        self.dir
            .join(format!("{}.md", username.as_str().replace(' ', "_")))
    }
}

impl UserPagePublisher for FsPagePublisher {
    fn page_exists(&self, username: &Username) -> bool {
        self.page_path(username).exists()
    }

    fn publish(&self, username: &Username, content: &str) -> Result<(), PageError> {
        if username.as_str().contains(['/', '\\']) {
            return Err(PageError::Other(format!(
                "username '{}' cannot be used as a page name",
                username
            )));
        }
        fs::create_dir_all(&self.dir)?;
        fs::write(self.page_path(username), content)?;
        Ok(())
    }
}
