use std::path::Path;

use crate::conversion::{ConvertError, DownloadSink, SaveOutcome};
use crate::settings::AppSettings;

/// Native "Save As" dialog pre-filled with the suggested name. Remembers the
/// folder of the last successful save.
pub struct DialogSink<'a> {
    settings: &'a mut AppSettings,
}

impl<'a> DialogSink<'a> {
    pub fn new(settings: &'a mut AppSettings) -> Self {
        Self { settings }
    }
}

impl DownloadSink for DialogSink<'_> {
    fn save(&mut self, suggested_name: &str, bytes: &[u8]) -> Result<SaveOutcome, ConvertError> {
        let mut dialog = rfd::FileDialog::new().set_file_name(suggested_name);
        if let Some(ext) = Path::new(suggested_name).extension().and_then(|e| e.to_str()) {
            dialog = dialog.add_filter(ext.to_uppercase(), &[ext]);
        }
        if let Some(dir) = &self.settings.last_save_dir {
            dialog = dialog.set_directory(dir);
        }

        let Some(path) = dialog.save_file() else {
            log::info!("Save of {suggested_name} cancelled");
            return Ok(SaveOutcome::Cancelled);
        };

        std::fs::write(&path, bytes).map_err(|source| ConvertError::Save {
            name: path.display().to_string(),
            source,
        })?;
        log::info!("Wrote {} ({} KB)", path.display(), bytes.len() / 1024);
        self.settings.remember_save_dir(&path);

        Ok(SaveOutcome::Saved(path))
    }
}
