//! Configuration for the letitgo binary.

pub mod dependencies;
pub mod logging;
pub mod settings;

pub use dependencies::Dependencies;
pub use logging::{init_tracing, LogFormat};
pub use settings::Settings;
