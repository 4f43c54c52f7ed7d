//! namematch server - HTTP API for matching free-text names to candidates
//!
//! Exposes [`matcher::MatchService`] over axum:
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe, reports the configured model backend
//! - `GET /match` - Match with query-string parameters, plain-text errors
//! - `POST /match` - Match with a JSON body, JSON errors
//!
//! Server settings come from `server.{toml,yaml,json}` and
//! `NAMEMATCH_SERVER__*` variables; matching settings from `namematch.*` and
//! the `USE_MOCK_LLM` / `AZURE_OPENAI_*` family.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::{load_settings, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     dotenvy::dotenv().ok();
//!     let config = ServerConfig::load()?;
//!     server::start_server(config, load_settings()?).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{load_settings, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
