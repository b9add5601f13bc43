use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

/// Request-scoped audio file under the scratch directory.
///
/// The name embeds a v4 uuid, so concurrent requests never collide on the
/// shared scratch namespace. Dropping the guard removes the file; that
/// covers success, failure, and cancellation, since the handler future owns
/// the guard for the whole transcription.
pub struct TempAudioFile {
    path: PathBuf,
}

impl TempAudioFile {
    pub async fn create(scratch_dir: &Path, data: &[u8]) -> io::Result<Self> {
        let path = scratch_dir.join(format!("audio_{}.wav", Uuid::new_v4()));
        tokio::fs::write(&path, data).await?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempAudioFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(
                    "failed to remove temp audio file {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_is_written_and_removed_on_drop() {
        let dir = std::env::temp_dir();
        let path;
        {
            let tmp = TempAudioFile::create(&dir, b"RIFF....WAVE").await.unwrap();
            path = tmp.path().to_path_buf();
            assert!(path.exists());
            assert_eq!(std::fs::read(&path).unwrap(), b"RIFF....WAVE");
        }
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn concurrent_files_get_distinct_paths() {
        let dir = std::env::temp_dir();
        let a = TempAudioFile::create(&dir, b"a").await.unwrap();
        let b = TempAudioFile::create(&dir, b"b").await.unwrap();
        assert_ne!(a.path(), b.path());
    }
}
