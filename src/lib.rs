pub mod config;
pub mod consts;
pub mod error;
pub mod loader;
pub mod optimizer;
pub mod scorer;
pub mod track;

pub use error::{MfResult, MixForgeError};
