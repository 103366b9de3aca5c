use chrono::{DateTime, Local};
use eframe::egui;
use std::time::Duration;

use crate::conversion::{
    self, ARCHIVE_NAME, BatchEvent, BatchProgress, BatchState, BatchWorker, ConversionResult,
    SelectedFile,
};
use crate::settings::AppSettings;
use crate::style::{self, Palette, ThemeMode};
use super::save_dialog::DialogSink;

const THUMBNAIL_EDGE: u32 = 72;

#[derive(Debug, Clone, Copy)]
struct RunSummary {
    finished_at: DateTime<Local>,
    converted: usize,
    failed: bool,
}

#[derive(Default)]
pub struct ImageConverter {
    state: BatchState,
    worker: Option<BatchWorker>,
    progress: Option<BatchProgress>,
    thumbnails: Vec<Option<egui::TextureHandle>>,
    last_run: Option<RunSummary>,
    drag_hover: bool,
}

impl ImageConverter {
    pub fn new() -> Self {
        Self::default()
    }

    fn select(&mut self, files: impl IntoIterator<Item = SelectedFile>) {
        self.state.select(files);
        self.thumbnails.clear();
        self.last_run = None;
    }

    fn pick_files(&mut self, settings: &mut AppSettings) {
        let mut dialog = rfd::FileDialog::new().add_filter("WebP images", &["webp"]);
        if let Some(dir) = &settings.last_open_dir {
            dialog = dialog.set_directory(dir);
        }

        if let Some(paths) = dialog.pick_files() {
            if let Some(first) = paths.first() {
                settings.remember_open_dir(first);
            }
            self.select(paths.into_iter().map(SelectedFile::from_path));
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) = ctx.input(|i| {
            (!i.raw.hovered_files.is_empty(), i.raw.dropped_files.clone())
        });
        self.drag_hover = hovering && !self.state.is_converting();

        if dropped.is_empty() || self.state.is_converting() {
            return;
        }
        self.select(dropped.iter().filter_map(dropped_file));
    }

    fn start_conversion(&mut self) {
        let Some(files) = self.state.begin_run() else {
            return;
        };
        self.thumbnails.clear();
        self.progress = None;
        self.last_run = None;

        match BatchWorker::spawn(files) {
            Ok(worker) => self.worker = Some(worker),
            Err(err) => self.state.abandon_run(&format!("could not start worker: {err}")),
        }
    }

    fn poll_worker(&mut self) {
        let events = match &self.worker {
            Some(worker) => worker.poll(),
            None => return,
        };

        for event in events {
            match event {
                BatchEvent::Progress(progress) => self.progress = Some(progress),
                BatchEvent::Finished(outcome) => {
                    let failed = outcome.error.is_some();
                    self.state.finish_run(outcome);
                    self.end_run(failed);
                    return;
                }
                BatchEvent::Lost => {
                    self.state.abandon_run("the conversion worker stopped unexpectedly");
                    self.end_run(true);
                    return;
                }
            }
        }
    }

    fn end_run(&mut self, failed: bool) {
        self.worker = None;
        self.progress = None;
        self.last_run = Some(RunSummary {
            finished_at: Local::now(),
            converted: self.state.converted_images().len(),
            failed,
        });
    }

    fn ensure_thumbnails(&mut self, ctx: &egui::Context) {
        let results = self.state.converted_images();
        if self.thumbnails.len() == results.len() {
            return;
        }
        self.thumbnails = results.iter().map(|r| load_thumbnail(ctx, r)).collect();
    }

    fn export_all(&mut self, settings: &mut AppSettings) {
        let mut sink = DialogSink::new(settings);
        conversion::export_archive(&mut self.state, &mut sink);
    }

    fn save_one(&mut self, index: usize, settings: &mut AppSettings) {
        let mut sink = DialogSink::new(settings);
        conversion::save_result(&mut self.state, index, &mut sink);
    }

    fn render_header(&self, ui: &mut egui::Ui, palette: &Palette) {
        ui.add_space(12.0);
        ui.label(
            egui::RichText::new("WebP to JPEG")
                .size(24.0)
                .color(palette.title),
        );
        ui.add_space(4.0);
        ui.label(
            egui::RichText::new("Convert WebP images to JPEG locally. Nothing is uploaded.")
                .size(13.0)
                .color(palette.subtitle),
        );
        ui.add_space(12.0);
    }

    fn render_selection(&mut self, ui: &mut egui::Ui, palette: &Palette, settings: &mut AppSettings) {
        let busy = self.state.is_converting();

        palette.section().show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(format!("WebP Files ({})", self.state.selected_files().len()))
                        .size(14.0)
                        .color(palette.text),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let has_files = !self.state.selected_files().is_empty();
                    if has_files && ui.add_enabled(!busy, egui::Button::new("Clear")).clicked() {
                        self.select(Vec::new());
                    }
                    if ui.add_enabled(!busy, egui::Button::new("Add WebP Images")).clicked() {
                        self.pick_files(settings);
                    }
                });
            });

            ui.add_space(8.0);
            ui.separator();
            ui.add_space(8.0);

            if self.state.selected_files().is_empty() {
                self.render_drop_zone(ui, palette, settings);
                return;
            }

            egui::ScrollArea::vertical()
                .id_salt("selected_files")
                .max_height(220.0)
                .show(ui, |ui| {
                    for file in self.state.selected_files() {
                        let info = format!(
                            "{} | {}",
                            file.media_type().unwrap_or("unknown type"),
                            file.size_kb()
                                .map(|kb| format!("{kb} KB"))
                                .unwrap_or_else(|| "Unknown size".to_string())
                        );
                        ui.horizontal(|ui| {
                            let name = ui.label(egui::RichText::new(file.name()).size(13.0).color(palette.text));
                            if let Some(path) = file.path() {
                                name.on_hover_text(path.display().to_string());
                            }
                            ui.label(egui::RichText::new(info).size(11.0).color(palette.weak));
                        });
                    }
                });
        });
    }

    fn render_drop_zone(&mut self, ui: &mut egui::Ui, palette: &Palette, settings: &mut AppSettings) {
        let (fill, border) = if self.drag_hover {
            (palette.drop_zone_hover, style::ColorPalette::BLUE_500)
        } else {
            (palette.drop_zone, palette.drop_zone_border)
        };

        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), 150.0),
            egui::Sense::click(),
        );
        ui.painter().rect_filled(rect, 6.0, fill);
        ui.painter().rect_stroke(
            rect,
            6.0,
            egui::Stroke::new(2.0, border),
            egui::StrokeKind::Outside,
        );
        ui.painter().text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "Drop .webp files here or click to browse",
            egui::FontId::proportional(14.0),
            palette.weak,
        );

        if response.clicked() && !self.state.is_converting() {
            self.pick_files(settings);
        }
    }

    fn render_progress(&self, ui: &mut egui::Ui, palette: &Palette) {
        if !self.state.is_converting() {
            return;
        }

        palette.section().show(ui, |ui| {
            let (fraction, message) = match &self.progress {
                Some(p) => (
                    (p.current - 1) as f32 / p.total.max(1) as f32,
                    format!("Converting {} ({}/{})", p.file_name, p.current, p.total),
                ),
                None => (0.0, "Starting conversion...".to_string()),
            };

            let (rect, _) = ui.allocate_exact_size(
                egui::vec2(ui.available_width(), 20.0),
                egui::Sense::hover(),
            );
            ui.painter().rect_filled(rect, 4.0, palette.track);
            let filled = egui::Rect::from_min_size(
                rect.min,
                egui::vec2(rect.width() * fraction, rect.height()),
            );
            ui.painter().rect_filled(filled, 4.0, style::ColorPalette::BLUE_500);

            ui.add_space(6.0);
            ui.label(egui::RichText::new(message).size(12.0).color(palette.text));
        });
        ui.add_space(12.0);
    }

    fn render_error(&self, ui: &mut egui::Ui, palette: &Palette) {
        let Some(error) = self.state.error() else {
            return;
        };

        egui::Frame::new()
            .fill(palette.error_bg)
            .stroke(egui::Stroke::new(1.0, palette.error_text))
            .corner_radius(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(egui::RichText::new(error).size(13.0).color(palette.error_text));
            });
        ui.add_space(12.0);
    }

    fn render_results(&mut self, ui: &mut egui::Ui, palette: &Palette, settings: &mut AppSettings) {
        if self.state.converted_images().is_empty() {
            return;
        }

        let mut to_save = None;
        let mut export = false;

        palette.section().show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(format!("Converted ({})", self.state.converted_images().len()))
                        .size(14.0)
                        .color(palette.text),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    export = ui
                        .button("Download All (ZIP)")
                        .on_hover_text(ARCHIVE_NAME)
                        .clicked();
                });
            });

            ui.add_space(8.0);

            for (idx, result) in self.state.converted_images().iter().enumerate() {
                let thumbnail = self.thumbnails.get(idx).and_then(Option::as_ref);
                if render_result_row(ui, palette, result, thumbnail) {
                    to_save = Some(idx);
                }
                ui.add_space(6.0);
            }
        });
        ui.add_space(12.0);

        if export {
            self.export_all(settings);
        } else if let Some(idx) = to_save {
            self.save_one(idx, settings);
        }
    }

    fn render_actions(&mut self, ui: &mut egui::Ui, palette: &Palette, theme: ThemeMode) {
        ui.horizontal(|ui| {
            let label = if self.state.is_converting() { "Converting..." } else { "Convert to JPEG" };
            if style::primary_button(ui, label, self.state.can_convert(), theme).clicked() {
                self.start_conversion();
            }

            if let Some(summary) = &self.last_run {
                let text = format!(
                    "{} image(s) converted at {}",
                    summary.converted,
                    summary.finished_at.format("%H:%M:%S")
                );
                ui.label(egui::RichText::new(text).size(12.0).color(style::status_color(summary.failed)));
            } else if !self.state.selected_files().is_empty() && !self.state.is_converting() {
                ui.label(egui::RichText::new("Ready").size(12.0).color(palette.weak));
            }
        });
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, theme: ThemeMode, settings: &mut AppSettings) {
        self.poll_worker();
        self.handle_dropped_files(ctx);
        self.ensure_thumbnails(ctx);

        let palette = Palette::for_theme(theme);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                self.render_header(ui, &palette);

                self.render_selection(ui, &palette, settings);
                ui.add_space(12.0);

                self.render_progress(ui, &palette);
                self.render_error(ui, &palette);
                self.render_results(ui, &palette, settings);

                self.render_actions(ui, &palette, theme);
                ui.add_space(16.0);
            });

        if self.worker.is_some() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}

/// Returns true when the row's "Save" button was clicked.
fn render_result_row(
    ui: &mut egui::Ui,
    palette: &Palette,
    result: &ConversionResult,
    thumbnail: Option<&egui::TextureHandle>,
) -> bool {
    let mut clicked = false;

    egui::Frame::new()
        .fill(palette.item_bg)
        .stroke(egui::Stroke::new(1.0, palette.border))
        .corner_radius(6.0)
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                let edge = THUMBNAIL_EDGE as f32;
                match thumbnail {
                    Some(texture) => {
                        let sized = egui::load::SizedTexture::from_handle(texture);
                        ui.add(egui::Image::from_texture(sized).max_size(egui::vec2(edge, edge)));
                    }
                    None => {
                        ui.allocate_exact_size(egui::vec2(edge, edge), egui::Sense::hover());
                    }
                }

                ui.vertical(|ui| {
                    ui.label(egui::RichText::new(&result.name).size(13.0).color(palette.text));
                    ui.label(
                        egui::RichText::new(format!(
                            "{} x {} | from {}",
                            result.width,
                            result.height,
                            result.original.name()
                        ))
                        .size(11.0)
                        .color(palette.weak),
                    );
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    clicked = ui.button("Save").clicked();
                });
            });
        });

    clicked
}

fn dropped_file(file: &egui::DroppedFile) -> Option<SelectedFile> {
    if let Some(bytes) = &file.bytes {
        return Some(SelectedFile::from_bytes(
            file.name.clone(),
            Some(file.mime.clone()),
            bytes.clone(),
        ));
    }
    file.path.clone().map(SelectedFile::from_path)
}

fn load_thumbnail(ctx: &egui::Context, result: &ConversionResult) -> Option<egui::TextureHandle> {
    let decoded = result.jpeg_bytes().ok().and_then(|jpeg| {
        image::load_from_memory_with_format(&jpeg, image::ImageFormat::Jpeg).ok()
    });
    let Some(decoded) = decoded else {
        log::warn!("No preview for {}", result.name);
        return None;
    };

    let thumb = decoded.thumbnail(THUMBNAIL_EDGE, THUMBNAIL_EDGE).to_rgba8();
    let size = [thumb.width() as usize, thumb.height() as usize];
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, thumb.as_raw());

    Some(ctx.load_texture(
        format!("thumb-{}", result.name),
        color_image,
        egui::TextureOptions::LINEAR,
    ))
}
