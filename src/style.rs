use eframe::egui;
use egui::Color32;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn from_egui(theme: egui::Theme) -> Self {
        match theme {
            egui::Theme::Dark => ThemeMode::Dark,
            egui::Theme::Light => ThemeMode::Light,
        }
    }
}

pub struct ColorPalette;

impl ColorPalette {
    pub const BLUE_400: Color32 = Color32::from_rgb(96, 165, 250);
    pub const BLUE_500: Color32 = Color32::from_rgb(59, 130, 246);
    pub const BLUE_600: Color32 = Color32::from_rgb(37, 99, 235);

    pub const SLATE_100: Color32 = Color32::from_rgb(241, 245, 249);
    pub const SLATE_200: Color32 = Color32::from_rgb(226, 232, 240);
    pub const SLATE_300: Color32 = Color32::from_rgb(203, 213, 225);

    pub const GRAY_50: Color32 = Color32::from_rgb(249, 250, 251);
    pub const GRAY_100: Color32 = Color32::from_rgb(243, 244, 246);
    pub const GRAY_200: Color32 = Color32::from_rgb(229, 231, 235);
    pub const GRAY_300: Color32 = Color32::from_rgb(209, 213, 219);
    pub const GRAY_400: Color32 = Color32::from_rgb(156, 163, 175);
    pub const GRAY_500: Color32 = Color32::from_rgb(107, 114, 128);
    pub const GRAY_700: Color32 = Color32::from_rgb(55, 65, 81);
    pub const GRAY_800: Color32 = Color32::from_rgb(31, 41, 55);
    pub const GRAY_900: Color32 = Color32::from_rgb(17, 24, 39);

    pub const ZINC_100: Color32 = Color32::from_rgb(244, 244, 245);
    pub const ZINC_200: Color32 = Color32::from_rgb(228, 228, 231);
    pub const ZINC_400: Color32 = Color32::from_rgb(161, 161, 170);
    pub const ZINC_500: Color32 = Color32::from_rgb(113, 113, 122);
    pub const ZINC_600: Color32 = Color32::from_rgb(82, 82, 91);
    pub const ZINC_700: Color32 = Color32::from_rgb(63, 63, 70);
    pub const ZINC_800: Color32 = Color32::from_rgb(39, 39, 42);
    pub const ZINC_900: Color32 = Color32::from_rgb(24, 24, 27);

    pub const GREEN_500: Color32 = Color32::from_rgb(34, 197, 94);
    pub const RED_300: Color32 = Color32::from_rgb(252, 165, 165);
    pub const RED_500: Color32 = Color32::from_rgb(239, 68, 68);
    pub const RED_700: Color32 = Color32::from_rgb(185, 28, 28);
}

/// Colors the converter panel draws with, resolved once per frame for the
/// active theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub title: Color32,
    pub subtitle: Color32,
    pub panel_bg: Color32,
    pub item_bg: Color32,
    pub border: Color32,
    pub text: Color32,
    pub weak: Color32,
    pub drop_zone: Color32,
    pub drop_zone_hover: Color32,
    pub drop_zone_border: Color32,
    pub track: Color32,
    pub error_bg: Color32,
    pub error_text: Color32,
}

impl Palette {
    pub fn for_theme(theme: ThemeMode) -> Self {
        match theme {
            ThemeMode::Dark => Self {
                title: ColorPalette::ZINC_100,
                subtitle: ColorPalette::ZINC_400,
                panel_bg: ColorPalette::ZINC_800,
                item_bg: ColorPalette::ZINC_900,
                border: ColorPalette::ZINC_700,
                text: ColorPalette::ZINC_200,
                weak: ColorPalette::ZINC_500,
                drop_zone: ColorPalette::ZINC_900,
                drop_zone_hover: ColorPalette::ZINC_700,
                drop_zone_border: ColorPalette::ZINC_600,
                track: ColorPalette::ZINC_700,
                error_bg: Color32::from_rgb(69, 10, 10),
                error_text: ColorPalette::RED_300,
            },
            ThemeMode::Light => Self {
                title: ColorPalette::GRAY_900,
                subtitle: ColorPalette::ZINC_600,
                panel_bg: ColorPalette::GRAY_50,
                item_bg: Color32::WHITE,
                border: ColorPalette::GRAY_300,
                text: ColorPalette::GRAY_800,
                weak: ColorPalette::ZINC_500,
                drop_zone: Color32::WHITE,
                drop_zone_hover: ColorPalette::GRAY_200,
                drop_zone_border: ColorPalette::GRAY_400,
                track: ColorPalette::GRAY_200,
                error_bg: Color32::from_rgb(254, 242, 242),
                error_text: ColorPalette::RED_700,
            },
        }
    }

    /// Rounded, bordered section used for every block of the panel.
    pub fn section(&self) -> egui::Frame {
        egui::Frame::new()
            .fill(self.panel_bg)
            .stroke(egui::Stroke::new(1.0, self.border))
            .corner_radius(8.0)
            .inner_margin(16.0)
    }
}

pub fn apply_theme(ctx: &egui::Context, theme: ThemeMode) {
    let mut style = (*ctx.style()).clone();

    style.visuals.widgets.noninteractive.corner_radius = egui::CornerRadius::same(4);
    style.visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(4);
    style.visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(4);
    style.visuals.widgets.active.corner_radius = egui::CornerRadius::same(4);

    style.spacing.item_spacing = egui::vec2(8.0, 8.0);
    style.spacing.button_padding = egui::vec2(12.0, 6.0);

    match theme {
        ThemeMode::Dark => {
            style.visuals.dark_mode = true;
            style.visuals.panel_fill = ColorPalette::ZINC_900;
            style.visuals.window_fill = ColorPalette::ZINC_900;
            style.visuals.faint_bg_color = ColorPalette::ZINC_800;
            style.visuals.widgets.inactive.bg_fill = Color32::from_rgb(30, 30, 35);
            style.visuals.widgets.inactive.weak_bg_fill = ColorPalette::ZINC_800;
            style.visuals.widgets.hovered.weak_bg_fill = ColorPalette::ZINC_700;
            style.visuals.widgets.noninteractive.fg_stroke = egui::Stroke::new(1.0, ColorPalette::SLATE_300);
            style.visuals.widgets.inactive.fg_stroke = egui::Stroke::new(1.0, ColorPalette::SLATE_200);
            style.visuals.widgets.hovered.fg_stroke = egui::Stroke::new(1.0, ColorPalette::SLATE_100);
            style.visuals.hyperlink_color = ColorPalette::BLUE_400;
        }
        ThemeMode::Light => {
            style.visuals.dark_mode = false;
            style.visuals.panel_fill = ColorPalette::GRAY_50;
            style.visuals.window_fill = ColorPalette::GRAY_50;
            style.visuals.faint_bg_color = ColorPalette::GRAY_100;
            style.visuals.widgets.inactive.bg_fill = ColorPalette::GRAY_50;
            style.visuals.widgets.inactive.weak_bg_fill = ColorPalette::GRAY_100;
            style.visuals.widgets.hovered.weak_bg_fill = ColorPalette::GRAY_200;
            style.visuals.widgets.noninteractive.fg_stroke = egui::Stroke::new(1.0, ColorPalette::GRAY_700);
            style.visuals.widgets.inactive.fg_stroke = egui::Stroke::new(1.0, ColorPalette::GRAY_800);
            style.visuals.widgets.hovered.fg_stroke = egui::Stroke::new(1.0, ColorPalette::GRAY_900);
            style.visuals.hyperlink_color = ColorPalette::BLUE_600;
        }
    }

    ctx.set_style(style);
}

/// Filled accent button; greys out when `enabled` is false.
pub fn primary_button(ui: &mut egui::Ui, text: &str, enabled: bool, theme: ThemeMode) -> egui::Response {
    let (bg, hover, fg) = match (enabled, theme) {
        (true, _) => (ColorPalette::BLUE_600, ColorPalette::BLUE_500, Color32::WHITE),
        (false, ThemeMode::Dark) => (ColorPalette::ZINC_700, ColorPalette::ZINC_700, ColorPalette::ZINC_500),
        (false, ThemeMode::Light) => (ColorPalette::GRAY_300, ColorPalette::GRAY_300, ColorPalette::GRAY_500),
    };

    ui.scope(|ui| {
        let style = ui.style_mut();
        style.visuals.widgets.inactive.weak_bg_fill = bg;
        style.visuals.widgets.hovered.weak_bg_fill = hover;
        style.visuals.widgets.active.weak_bg_fill = bg;
        style.visuals.widgets.noninteractive.weak_bg_fill = bg;

        let button = egui::Button::new(egui::RichText::new(text).size(15.0).color(fg))
            .min_size(egui::vec2(160.0, 40.0))
            .corner_radius(6.0);

        ui.add_enabled(enabled, button)
    })
    .inner
}

pub fn status_color(failed: bool) -> Color32 {
    if failed { ColorPalette::RED_500 } else { ColorPalette::GREEN_500 }
}
