//! Local WebP to JPEG conversion with ZIP export, plus the egui front end
//! that drives it.

pub mod app;
pub mod conversion;
pub mod logging;
pub mod modules;
pub mod settings;
pub mod style;
