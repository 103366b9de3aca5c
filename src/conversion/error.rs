use thiserror::Error;

/// Everything that can go wrong between picking a file and saving a download.
///
/// Conversion errors always carry the original file name so the single error
/// line in the UI tells the user which input broke the batch.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to encode {name} as JPEG: {source}")]
    Encode {
        name: String,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to build archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("Malformed data reference for {name}: {reason}")]
    Payload { name: String, reason: String },
    #[error("Failed to save {name}: {source}")]
    Save {
        name: String,
        #[source]
        source: std::io::Error,
    },
}
