//! Common utilities and shared types for tallysheet.
//!
//! This crate provides foundational components used across all tallysheet
//! crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Pagination**: Normalized page queries via [`PageQuery`] and [`PageInfo`]
//!
//! # Example
//!
//! ```no_run
//! use tallysheet_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod pagination;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::{IdGenerator, validate_id};
pub use pagination::{PageInfo, PageQuery, Paginated};
