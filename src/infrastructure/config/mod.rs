//! Infrastructure configuration modules.

pub mod fleet;
pub mod llm;
pub mod logging;
pub mod settings;

pub use settings::Config;
