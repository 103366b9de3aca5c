pub mod image_converter;
pub mod save_dialog;
