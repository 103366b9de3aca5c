use eframe::egui;

use crate::modules::image_converter::ImageConverter;
use crate::settings::{AppSettings, ThemePreference};
use crate::style::{self, ThemeMode};

pub struct ConverterApp {
    converter: ImageConverter,
    settings: AppSettings,
    theme_mode: ThemeMode,
}

impl ConverterApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = AppSettings::load();
        let theme_mode = resolve_theme(settings.theme_preference, &cc.egui_ctx);
        style::apply_theme(&cc.egui_ctx, theme_mode);

        Self {
            converter: ImageConverter::new(),
            settings,
            theme_mode,
        }
    }

    fn set_theme_preference(&mut self, ctx: &egui::Context, preference: ThemePreference) {
        self.settings.theme_preference = preference;
        self.theme_mode = resolve_theme(preference, ctx);
        style::apply_theme(ctx, self.theme_mode);
        self.settings.save();
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("WebP to JPEG").strong());

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let mut preference = self.settings.theme_preference;
                    egui::ComboBox::from_id_salt("theme_preference")
                        .selected_text(preference.label())
                        .show_ui(ui, |ui| {
                            for option in ThemePreference::all() {
                                ui.selectable_value(&mut preference, option, option.label());
                            }
                        });
                    ui.label("Theme");

                    if preference != self.settings.theme_preference {
                        self.set_theme_preference(ctx, preference);
                    }
                });
            });
            ui.add_space(4.0);
        });
    }
}

fn resolve_theme(preference: ThemePreference, ctx: &egui::Context) -> ThemeMode {
    match preference {
        ThemePreference::System => ThemeMode::from_egui(ctx.theme()),
        ThemePreference::Light => ThemeMode::Light,
        ThemePreference::Dark => ThemeMode::Dark,
    }
}

impl eframe::App for ConverterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.render_top_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.converter.ui(ui, ctx, self.theme_mode, &mut self.settings);
        });
    }
}
