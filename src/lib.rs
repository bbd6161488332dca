pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::Cli;

pub use adapters::session_store::{FileSessionStore, MemorySessionStore};
pub use app::commands::App;
pub use config::Settings;
pub use core::{client::ApiClient, session::Session};
pub use domain::cpf::{is_valid as is_valid_cpf, Cpf};
pub use utils::error::{CaminharError, Result};
