//! Configuration loaded from `.strongpass.toml`.

pub mod settings;

pub use settings::Settings;
