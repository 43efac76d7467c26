//! Project configuration loaded from `.secretary.toml`.

pub mod settings;

pub use settings::Settings;
