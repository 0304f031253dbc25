use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncReadExt;
use uuid::Uuid;

/// Lazily readable binary content of a candidate file.
#[async_trait]
pub trait ByteSource: Send + Sync {
    /// Read at most `limit` bytes starting at offset 0.
    ///
    /// A source shorter than `limit` returns what it has.
    async fn read_prefix(&self, limit: usize) -> io::Result<Vec<u8>>;
}

/// In-memory content, e.g. a request body.
#[derive(Debug, Clone)]
pub struct MemorySource(Bytes);

impl MemorySource {
    pub fn new(content: impl Into<Bytes>) -> Self {
        Self(content.into())
    }
}

#[async_trait]
impl ByteSource for MemorySource {
    async fn read_prefix(&self, limit: usize) -> io::Result<Vec<u8>> {
        let end = self.0.len().min(limit);
        Ok(self.0[..end].to_vec())
    }
}

/// Content backed by a file on disk. Nothing is read until asked.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ByteSource for FileSource {
    async fn read_prefix(&self, limit: usize) -> io::Result<Vec<u8>> {
        let file = tokio::fs::File::open(&self.path).await?;
        let mut buffer = Vec::with_capacity(limit);
        file.take(limit as u64).read_to_end(&mut buffer).await?;
        Ok(buffer)
    }
}

/// The file currently under evaluation.
///
/// `mime_type` is advisory and never consulted by validation. Cloning shares
/// the underlying byte source and keeps the same identity.
#[derive(Clone)]
pub struct UploadCandidate {
    id: Uuid,
    name: String,
    byte_size: u64,
    mime_type: String,
    source: Arc<dyn ByteSource>,
}

impl UploadCandidate {
    pub fn new(
        name: impl Into<String>,
        byte_size: u64,
        mime_type: impl Into<String>,
        source: Arc<dyn ByteSource>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            byte_size,
            mime_type: mime_type.into(),
            source,
        }
    }

    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        let content = content.into();
        let byte_size = content.len() as u64;
        Self::new(name, byte_size, mime_type, Arc::new(MemorySource::new(content)))
    }

    /// Build a candidate from a file on disk; only its metadata is read here.
    pub async fn from_path(path: impl AsRef<Path>, mime_type: impl Into<String>) -> io::Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::new(
            name,
            metadata.len(),
            mime_type,
            Arc::new(FileSource::new(path)),
        ))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn byte_size(&self) -> u64 {
        self.byte_size
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub async fn read_prefix(&self, limit: usize) -> io::Result<Vec<u8>> {
        self.source.read_prefix(limit).await
    }
}

impl fmt::Debug for UploadCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadCandidate")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("byte_size", &self.byte_size)
            .field("mime_type", &self.mime_type)
            .finish_non_exhaustive()
    }
}
