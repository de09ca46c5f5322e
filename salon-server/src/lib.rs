//! Salon Server - nail salon management backend
//!
//! # Overview
//!
//! - **Scheduling** (`scheduling`): free-slot calculation and booking conflicts
//! - **Reporting** (`reporting`): period sales summaries and staff performance
//! - **Database** (`db`): SQLite repositories behind the `RecordStore` capability
//! - **HTTP API** (`api`): JSON routes per resource
//!
//! # Layout
//!
//! ```text
//! salon-server/src/
//! ├── core/          # config, state, server
//! ├── api/           # HTTP routes and handlers
//! ├── scheduling/    # availability calculator
//! ├── reporting/     # sales summary aggregator
//! ├── db/            # pool, migrations, repositories
//! └── utils/         # logging, time, validation
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod error;
pub mod menu;
pub mod reporting;
pub mod scheduling;
pub mod utils;

pub use self::core::{Config, Server, ServerState};
pub use db::{FetchError, RecordStore, SqliteStore};
pub use error::{CoreError, CoreResult};
pub use reporting::{Reporter, compute_summary};
pub use scheduling::{Scheduler, compute_available_slots, has_conflict};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

/// Load `.env`, read the configuration and start logging
pub fn setup_environment() -> anyhow::Result<Config> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;
    let log_dir = config.log_dir();
    init_logger_with_file(&config.log_level, config.log_json, Some(log_dir.as_str()))?;
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
   _____       __
  / ___/____ _/ /___  ____
  \__ \/ __ `/ / __ \/ __ \
 ___/ / /_/ / / /_/ / / / /
/____/\__,_/_/\____/_/ /_/
    "#
    );
}
