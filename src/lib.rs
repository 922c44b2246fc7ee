pub mod cli;
pub mod color;
pub mod config;
pub mod contrast;
pub mod error;
pub mod extract;
pub mod format;
pub mod gradient;
pub mod settings;
pub mod store;

pub use color::Color;
pub use error::{ParseColorError, StoreError};
pub use format::ColorFormat;
