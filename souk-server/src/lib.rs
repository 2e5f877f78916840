//! Souk Server - local-commerce marketplace backend
//!
//! # Architecture
//!
//! One axum process over an embedded SurrealDB. Three roles share the
//! surface (customers, retailers, couriers); the interesting part is the
//! courier assignment protocol, where concurrent claims on the same
//! order are settled by a single conditional update in the database.
//!
//! # Module layout
//!
//! ```text
//! souk-server/src/
//! ├── core/          # config, shared state, server lifecycle
//! ├── auth/          # JWT issuing, validation, extractor
//! ├── services/      # assignment, checkout, lifecycle rules
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # embedded SurrealDB, models, repositories
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Prepare the process environment: dotenv, working directory, logging
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/souk".into());
    std::fs::create_dir_all(&work_dir)?;

    let log_dir = format!("{work_dir}/logs");
    std::fs::create_dir_all(&log_dir)?;
    init_logger_with_file(std::env::var("RUST_LOG").ok().as_deref(), Some(&log_dir));

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   _____             __
  / ___/____  __  __/ /__
  \__ \/ __ \/ / / / //_/
 ___/ / /_/ / /_/ / ,<
/____/\____/\__,_/_/|_|
    "#
    );
}
