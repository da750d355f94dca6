pub mod config;
pub mod error;
pub mod heuristics;
pub mod io;
pub mod pipeline;
pub mod plan;
pub mod route;
pub mod scaffold;
pub mod spec;
pub mod synth;
pub mod templates;
pub mod toolchain;
pub mod validate;

pub use error::{AppgenError, Result};
