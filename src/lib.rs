//! CV tailoring library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod session;

pub use config::Config;
pub use error::{Result, TailorError};
pub use pipeline::{TailoringInputs, TailoringPipeline};
pub use session::SessionContext;
