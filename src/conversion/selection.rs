use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const WEBP_MEDIA_TYPE: &str = "image/webp";
const WEBP_SUFFIX: &str = ".webp";

/// Where the bytes of a picked file live until a conversion pass reads them.
#[derive(Debug, Clone)]
pub enum FileSource {
    Path(PathBuf),
    /// Drag and drop payloads that arrive with their contents attached.
    Bytes(Arc<[u8]>),
}

/// A file the user picked, with whatever media type the platform declared.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    name: String,
    media_type: Option<String>,
    size_kb: Option<u64>,
    source: FileSource,
}

impl SelectedFile {
    /// The media type of a dialog-picked path is guessed from its extension,
    /// mirroring what a file picker would declare.
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Unknown".to_string());
        let media_type = image::ImageFormat::from_path(&path)
            .ok()
            .map(|format| format.to_mime_type().to_string());
        let size_kb = std::fs::metadata(&path).ok().map(|m| m.len() / 1024);

        Self {
            name,
            media_type,
            size_kb,
            source: FileSource::Path(path),
        }
    }

    pub fn from_bytes(
        name: impl Into<String>,
        media_type: Option<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let bytes: Arc<[u8]> = bytes.into();
        Self {
            name: name.into(),
            media_type: media_type.filter(|m| !m.is_empty()),
            size_kb: Some(bytes.len() as u64 / 1024),
            source: FileSource::Bytes(bytes),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            FileSource::Path(path) => Some(path),
            FileSource::Bytes(_) => None,
        }
    }

    /// Size at the time the file was picked.
    pub fn size_kb(&self) -> Option<u64> {
        self.size_kb
    }

    /// Declared media type or a case-insensitive `.webp` suffix. Content is
    /// not sniffed here; a mislabelled file fails later, at decode.
    pub fn is_webp(&self) -> bool {
        let declared = self
            .media_type
            .as_deref()
            .is_some_and(|m| m.eq_ignore_ascii_case(WEBP_MEDIA_TYPE));

        declared || has_webp_suffix(&self.name)
    }

    pub fn read_bytes(&self) -> std::io::Result<Cow<'_, [u8]>> {
        match &self.source {
            FileSource::Path(path) => std::fs::read(path).map(Cow::Owned),
            FileSource::Bytes(bytes) => Ok(Cow::Borrowed(&bytes[..])),
        }
    }
}

fn has_webp_suffix(name: &str) -> bool {
    let split = name.len().saturating_sub(WEBP_SUFFIX.len());
    name.is_char_boundary(split) && name[split..].eq_ignore_ascii_case(WEBP_SUFFIX)
}

/// Keeps the WebP files of a raw selection, in the order they were picked.
pub fn filter_selection(files: impl IntoIterator<Item = SelectedFile>) -> Vec<SelectedFile> {
    files.into_iter().filter(SelectedFile::is_webp).collect()
}
