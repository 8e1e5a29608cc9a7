use std::io::Write;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// An uploaded resume persisted to a uniquely named file in the upload directory.
///
/// The file is removed by `discard`, or on drop if the request unwinds first.
#[derive(Debug)]
pub struct UploadedDocument {
    file: NamedTempFile,
    file_name: Option<String>,
    size: usize,
    has_pdf_signature: bool,
}

impl UploadedDocument {
    /// Writes `data` into a fresh temporary file under `upload_dir`.
    pub async fn persist(
        upload_dir: &Path,
        data: Bytes,
        file_name: Option<String>,
    ) -> std::io::Result<Self> {
        let upload_dir = upload_dir.to_path_buf();
        let size = data.len();
        let has_pdf_signature = data.starts_with(PDF_SIGNATURE);

        let file = tokio::task::spawn_blocking(move || -> std::io::Result<NamedTempFile> {
            let mut file = tempfile::Builder::new()
                .prefix("resume-")
                .suffix(".pdf")
                .tempfile_in(&upload_dir)?;
            file.write_all(&data)?;
            file.flush()?;
            Ok(file)
        })
        .await
        .map_err(std::io::Error::other)??;

        debug!(path = %file.path().display(), size, "Stored uploaded document");

        Ok(Self {
            file,
            file_name,
            size,
            has_pdf_signature,
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn has_pdf_signature(&self) -> bool {
        self.has_pdf_signature
    }

    /// Deletes the backing file. Consumes the document so deletion happens once.
    pub fn discard(self) {
        let path: PathBuf = self.file.path().to_path_buf();
        match self.file.close() {
            Ok(()) => debug!(path = %path.display(), "Removed uploaded document"),
            Err(e) => warn!(path = %path.display(), "Failed to remove uploaded document: {e}"),
        }
    }
}
