use super::convert::ConversionResult;
use super::error::ConvertError;
use super::selection::{SelectedFile, filter_selection};

/// What a finished (or aborted) run hands back to the state owner.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub results: Vec<ConversionResult>,
    pub error: Option<ConvertError>,
}

/// The whole conversion state of one window. Owned by the UI and passed by
/// reference to every operation; nothing else holds it.
#[derive(Debug, Default)]
pub struct BatchState {
    selected_files: Vec<SelectedFile>,
    converted_images: Vec<ConversionResult>,
    is_converting: bool,
    error: Option<String>,
}

impl BatchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_files(&self) -> &[SelectedFile] {
        &self.selected_files
    }

    pub fn converted_images(&self) -> &[ConversionResult] {
        &self.converted_images
    }

    pub fn is_converting(&self) -> bool {
        self.is_converting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn can_convert(&self) -> bool {
        !self.selected_files.is_empty() && !self.is_converting
    }

    /// Replaces the selection with the WebP subset of `files`. Previous
    /// results and errors are dropped even if nothing survives the filter.
    pub fn select(&mut self, files: impl IntoIterator<Item = SelectedFile>) {
        self.selected_files = filter_selection(files);
        self.converted_images.clear();
        self.error = None;
        log::info!("Selected {} WebP file(s)", self.selected_files.len());
    }

    /// Marks a run as started and returns the files it should convert, or
    /// `None` when there is nothing to do.
    pub fn begin_run(&mut self) -> Option<Vec<SelectedFile>> {
        if !self.can_convert() {
            return None;
        }
        self.is_converting = true;
        self.error = None;
        self.converted_images.clear();
        log::info!("Converting {} file(s)", self.selected_files.len());
        Some(self.selected_files.clone())
    }

    pub fn finish_run(&mut self, outcome: BatchOutcome) {
        log::info!("Conversion finished with {} result(s)", outcome.results.len());
        self.converted_images = outcome.results;
        if let Some(err) = outcome.error {
            self.fail(&err);
        }
        self.is_converting = false;
    }

    /// The run ended without reporting an outcome (worker died or never
    /// started).
    pub fn abandon_run(&mut self, reason: &str) {
        log::error!("Conversion aborted: {reason}");
        self.error = Some(format!("Conversion aborted: {reason}"));
        self.is_converting = false;
    }

    /// Converts the current selection on the calling thread.
    pub fn run_batch<F>(&mut self, convert: F)
    where
        F: FnMut(&SelectedFile, usize) -> Result<ConversionResult, ConvertError>,
    {
        let Some(files) = self.begin_run() else {
            return;
        };
        let outcome = convert_all(&files, convert, |_, _, _| {});
        self.finish_run(outcome);
    }

    pub(crate) fn clear_error(&mut self) {
        self.error = None;
    }

    pub(crate) fn fail(&mut self, err: &ConvertError) {
        log::error!("{err}");
        self.error = Some(err.to_string());
    }
}

/// Converts `files` one at a time, in order, stopping at the first failure.
/// `progress` is told `(position, total, file)` before each file starts.
pub fn convert_all<F, P>(files: &[SelectedFile], mut convert: F, mut progress: P) -> BatchOutcome
where
    F: FnMut(&SelectedFile, usize) -> Result<ConversionResult, ConvertError>,
    P: FnMut(usize, usize, &SelectedFile),
{
    let mut outcome = BatchOutcome::default();

    for (idx, file) in files.iter().enumerate() {
        let position = idx + 1;
        progress(position, files.len(), file);

        match convert(file, position) {
            Ok(result) => {
                log::debug!("{} -> {}", file.name(), result.name);
                outcome.results.push(result);
            }
            Err(err) => {
                log::warn!(
                    "Stopping after {} of {} file(s): {err}",
                    outcome.results.len(),
                    files.len()
                );
                outcome.error = Some(err);
                break;
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::convert::convert_file;
    use crate::conversion::test_support::{corrupt_file, webp_file};
    use crate::logging;
    use pretty_assertions::assert_eq;

    fn result_names(state: &BatchState) -> Vec<&str> {
        state.converted_images().iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn select_filters_and_clears_previous_results() {
        logging::initialize_for_tests();
        let mut state = BatchState::new();
        state.select(vec![webp_file("a.webp", 2, 2)]);
        state.run_batch(convert_file);
        assert_eq!(state.converted_images().len(), 1);

        state.select(vec![SelectedFile::from_bytes("b.png", None, Vec::new())]);

        assert!(state.selected_files().is_empty());
        assert!(state.converted_images().is_empty());
        assert_eq!(state.error(), None);
        assert!(!state.can_convert());
    }

    #[test]
    fn selecting_the_same_files_twice_is_idempotent() {
        let picked = || vec![webp_file("a.webp", 1, 1), SelectedFile::from_bytes("b.png", None, Vec::new())];
        let mut state = BatchState::new();

        state.select(picked());
        let first: Vec<String> = state.selected_files().iter().map(|f| f.name().to_string()).collect();
        state.run_batch(convert_file);
        state.select(picked());

        let second: Vec<&str> = state.selected_files().iter().map(SelectedFile::name).collect();
        assert_eq!(second, first);
        assert!(state.converted_images().is_empty());
    }

    #[test]
    fn results_are_named_by_position() {
        logging::initialize_for_tests();
        let mut state = BatchState::new();
        state.select(vec![
            webp_file("zebra.webp", 4, 3),
            webp_file("apple.webp", 5, 6),
            webp_file("mango.webp", 1, 1),
        ]);

        state.run_batch(convert_file);

        assert_eq!(result_names(&state), vec!["img-1.jpg", "img-2.jpg", "img-3.jpg"]);
        let originals: Vec<&str> = state.converted_images().iter().map(|r| r.original.name()).collect();
        assert_eq!(originals, vec!["zebra.webp", "apple.webp", "mango.webp"]);
        assert_eq!(state.error(), None);
        assert!(!state.is_converting());
    }

    #[test]
    fn first_failure_keeps_earlier_results_and_reports_the_file() {
        logging::initialize_for_tests();
        let mut state = BatchState::new();
        state.select(vec![webp_file("a.webp", 3, 3), corrupt_file("b.webp")]);

        state.run_batch(convert_file);

        assert_eq!(result_names(&state), vec!["img-1.jpg"]);
        assert!(state.error().unwrap().contains("b.webp"));
        assert!(!state.is_converting());
    }

    #[test]
    fn files_after_a_failure_are_not_attempted() {
        let mut state = BatchState::new();
        state.select(vec![
            webp_file("a.webp", 1, 1),
            corrupt_file("b.webp"),
            webp_file("c.webp", 1, 1),
        ]);
        let mut attempted = Vec::new();

        state.run_batch(|file, position| {
            attempted.push(file.name().to_string());
            convert_file(file, position)
        });

        assert_eq!(attempted, vec!["a.webp", "b.webp"]);
        assert_eq!(state.converted_images().len(), 1);
    }

    #[test]
    fn empty_selection_is_a_no_op() {
        let mut state = BatchState::new();
        let mut calls = 0;

        state.run_batch(|file, position| {
            calls += 1;
            convert_file(file, position)
        });

        assert_eq!(calls, 0);
        assert!(!state.is_converting());
        assert_eq!(state.error(), None);
    }

    #[test]
    fn begin_run_refuses_while_converting() {
        let mut state = BatchState::new();
        state.select(vec![webp_file("a.webp", 1, 1)]);

        assert!(state.begin_run().is_some());
        assert!(state.is_converting());
        assert!(!state.can_convert());
        assert!(state.begin_run().is_none());

        state.finish_run(BatchOutcome::default());
        assert!(!state.is_converting());
    }

    #[test]
    fn new_run_clears_previous_error() {
        let mut state = BatchState::new();
        state.select(vec![corrupt_file("bad.webp")]);
        state.run_batch(convert_file);
        assert!(state.error().is_some());

        state.begin_run();

        assert_eq!(state.error(), None);
    }

    #[test]
    fn abandoned_run_still_releases_the_busy_flag() {
        let mut state = BatchState::new();
        state.select(vec![webp_file("a.webp", 1, 1)]);
        state.begin_run();

        state.abandon_run("worker disconnected");

        assert!(!state.is_converting());
        assert!(state.error().unwrap().contains("worker disconnected"));
    }

    #[test]
    fn progress_reports_each_position_before_converting() {
        let files = vec![webp_file("a.webp", 1, 1), webp_file("b.webp", 1, 1)];
        let mut seen = Vec::new();

        let outcome = convert_all(&files, convert_file, |position, total, file| {
            seen.push((position, total, file.name().to_string()));
        });

        assert_eq!(outcome.results.len(), 2);
        assert_eq!(seen, vec![(1, 2, "a.webp".to_string()), (2, 2, "b.webp".to_string())]);
    }
}
