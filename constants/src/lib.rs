pub mod drawing;
pub mod imagery;
pub mod render_settings;
