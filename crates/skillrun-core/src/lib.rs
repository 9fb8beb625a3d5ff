pub mod args;
pub mod config;
pub mod error;
pub mod io;
pub mod paths;
pub mod role;
pub mod settings;
pub mod types;

pub use error::{Result, SkillError};
