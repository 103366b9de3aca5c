use std::io::{Cursor, Write};
use std::path::PathBuf;

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::batch::BatchState;
use super::convert::ConversionResult;
use super::error::ConvertError;

pub const ARCHIVE_NAME: &str = "converted_images.zip";

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    Cancelled,
}

/// Somewhere a finished download can go. The exporter only hands over a
/// suggested name and the bytes; choosing the destination is up to the sink.
pub trait DownloadSink {
    fn save(&mut self, suggested_name: &str, bytes: &[u8]) -> Result<SaveOutcome, ConvertError>;
}

/// Packs every result as `<name>` -> raw JPEG bytes. Nothing is written
/// anywhere unless the whole archive finalizes.
pub fn build_archive(results: &[ConversionResult]) -> Result<Vec<u8>, ConvertError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for result in results {
        let jpeg = result.jpeg_bytes()?;
        writer.start_file(result.name.as_str(), options)?;
        writer.write_all(&jpeg).map_err(zip::result::ZipError::from)?;
    }

    Ok(writer.finish()?.into_inner())
}

/// Bundles the current results and offers them as `converted_images.zip`.
/// Empty result sets do nothing. Failures land in `state.error`.
pub fn export_archive(state: &mut BatchState, sink: &mut dyn DownloadSink) -> Option<SaveOutcome> {
    if state.converted_images().is_empty() {
        return None;
    }
    state.clear_error();

    let saved = build_archive(state.converted_images()).and_then(|archive| {
        log::info!(
            "Built {ARCHIVE_NAME} ({} entries, {} KB)",
            state.converted_images().len(),
            archive.len() / 1024
        );
        sink.save(ARCHIVE_NAME, &archive)
    });

    match saved {
        Ok(outcome) => {
            if let SaveOutcome::Saved(path) = &outcome {
                log::info!("Saved archive to {}", path.display());
            }
            Some(outcome)
        }
        Err(err) => {
            state.fail(&err);
            None
        }
    }
}

/// Offers a single result under its own name.
pub fn save_result(
    state: &mut BatchState,
    index: usize,
    sink: &mut dyn DownloadSink,
) -> Option<SaveOutcome> {
    let result = state.converted_images().get(index)?;
    let saved = result
        .jpeg_bytes()
        .and_then(|jpeg| sink.save(&result.name, &jpeg));

    match saved {
        Ok(outcome) => {
            state.clear_error();
            Some(outcome)
        }
        Err(err) => {
            state.fail(&err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::convert::{convert_file, decode_data_url};
    use crate::conversion::test_support::webp_file;
    use pretty_assertions::assert_eq;
    use std::io::Read;
    use zip::ZipArchive;

    #[derive(Default)]
    struct RecordingSink {
        saved: Vec<(String, Vec<u8>)>,
        fail: bool,
        cancel: bool,
    }

    impl DownloadSink for RecordingSink {
        fn save(&mut self, suggested_name: &str, bytes: &[u8]) -> Result<SaveOutcome, ConvertError> {
            if self.fail {
                return Err(ConvertError::Save {
                    name: suggested_name.to_string(),
                    source: std::io::Error::other("disk full"),
                });
            }
            if self.cancel {
                return Ok(SaveOutcome::Cancelled);
            }
            self.saved.push((suggested_name.to_string(), bytes.to_vec()));
            Ok(SaveOutcome::Saved(PathBuf::from(suggested_name)))
        }
    }

    fn converted_state(count: usize) -> BatchState {
        let mut state = BatchState::new();
        state.select((0..count).map(|i| webp_file(&format!("in-{i}.webp"), 3 + i as u32, 2)));
        state.run_batch(convert_file);
        assert_eq!(state.converted_images().len(), count);
        state
    }

    #[test]
    fn export_of_empty_results_does_nothing() {
        let mut state = BatchState::new();
        let mut sink = RecordingSink::default();

        assert_eq!(export_archive(&mut state, &mut sink), None);
        assert!(sink.saved.is_empty());
        assert_eq!(state.error(), None);
    }

    #[test]
    fn archive_holds_one_raw_jpeg_per_result() {
        let mut state = converted_state(2);
        let mut sink = RecordingSink::default();

        let outcome = export_archive(&mut state, &mut sink);

        assert_eq!(outcome, Some(SaveOutcome::Saved(PathBuf::from(ARCHIVE_NAME))));
        assert_eq!(sink.saved.len(), 1);
        let (name, bytes) = &sink.saved[0];
        assert_eq!(name, ARCHIVE_NAME);

        let mut archive = ZipArchive::new(Cursor::new(bytes.clone())).unwrap();
        let mut entries: Vec<&str> = archive.file_names().collect();
        entries.sort_unstable();
        assert_eq!(entries, vec!["img-1.jpg", "img-2.jpg"]);

        for result in state.converted_images() {
            let mut entry = archive.by_name(&result.name).unwrap();
            let mut stored = Vec::new();
            entry.read_to_end(&mut stored).unwrap();
            assert_eq!(stored, decode_data_url(&result.name, &result.url).unwrap());
            assert_eq!(image::guess_format(&stored).unwrap(), image::ImageFormat::Jpeg);
        }
    }

    #[test]
    fn sink_failure_is_reported_not_raised() {
        let mut state = converted_state(1);
        let mut sink = RecordingSink { fail: true, ..Default::default() };

        assert_eq!(export_archive(&mut state, &mut sink), None);
        assert!(state.error().unwrap().contains("disk full"));
        assert_eq!(state.converted_images().len(), 1);
    }

    #[test]
    fn cancelled_save_is_not_an_error() {
        let mut state = converted_state(1);
        let mut sink = RecordingSink { cancel: true, ..Default::default() };

        assert_eq!(export_archive(&mut state, &mut sink), Some(SaveOutcome::Cancelled));
        assert_eq!(state.error(), None);
    }

    #[test]
    fn malformed_payload_aborts_the_whole_archive() {
        let state = converted_state(2);
        let mut results = state.converted_images().to_vec();
        results[1].url = "data:image/jpeg;base64,%%%".to_string();

        let err = build_archive(&results).unwrap_err();

        assert!(matches!(err, ConvertError::Payload { ref name, .. } if name == "img-2.jpg"));
    }

    #[test]
    fn single_result_saves_under_its_own_name() {
        let mut state = converted_state(2);
        let mut sink = RecordingSink::default();

        let outcome = save_result(&mut state, 1, &mut sink);

        assert_eq!(outcome, Some(SaveOutcome::Saved(PathBuf::from("img-2.jpg"))));
        assert_eq!(sink.saved[0].0, "img-2.jpg");
        assert_eq!(sink.saved[0].1, state.converted_images()[1].jpeg_bytes().unwrap());
        assert_eq!(save_result(&mut state, 5, &mut sink), None);
    }
}
