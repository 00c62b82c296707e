//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - HTTP server setup (server)
//! - Repository implementations (repositories)
//! - Application state (state)
//!
//! Configuration, schema bootstrap and demo data live at the crate root
//! (`config`, `db`, `seed`).

pub mod repositories;
pub mod server;
pub mod state;

pub use repositories::*;
pub use state::AppState;
