// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Filesystem based Debian repositories. */

use {
    crate::{
        error::{ContentsError, Result},
        io::DataResolver,
    },
    async_trait::async_trait,
    futures::{io::BufReader, AsyncRead},
    std::{
        path::{Path, PathBuf},
        pin::Pin,
    },
};

/// A readable interface to a Debian repository backed by a filesystem.
///
/// Paths are resolved relative to the directory the instance is bound to,
/// which plays the same role as the base URL of an HTTP mirror.
#[derive(Clone, Debug)]
pub struct FilesystemRepositoryReader {
    root_dir: PathBuf,
}

impl FilesystemRepositoryReader {
    /// Construct a new instance, bound to the root directory specified.
    ///
    /// No validation of the passed path is performed.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            root_dir: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl DataResolver for FilesystemRepositoryReader {
    async fn get_path(&self, path: &str) -> Result<Pin<Box<dyn AsyncRead + Send>>> {
        let path = self.root_dir.join(path);

        let f = std::fs::File::open(&path)
            .map_err(|e| ContentsError::RepositoryIoPath(format!("{}", path.display()), e))?;

        Ok(Box::pin(BufReader::new(futures::io::AllowStdIo::new(f))))
    }
}

#[cfg(test)]
mod test {
    use {super::*, futures::AsyncReadExt};

    #[tokio::test]
    async fn get_path() -> Result<()> {
        let td = tempfile::tempdir()?;
        std::fs::write(td.path().join("Contents-all"), b"usr/bin/foo utils/foo\n")?;

        let reader = FilesystemRepositoryReader::new(td.path());

        let mut data = vec![];
        reader
            .get_path("Contents-all")
            .await?
            .read_to_end(&mut data)
            .await?;
        assert_eq!(data, b"usr/bin/foo utils/foo\n");

        assert!(matches!(
            reader.get_path("missing").await,
            Err(ContentsError::RepositoryIoPath(_, _))
        ));

        Ok(())
    }
}
