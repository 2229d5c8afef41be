//! userprefs-cli library crate.
//!
//! The `userprefs` binary is a thin shell over this library so the command
//! logic can be tested without spawning processes.
//!
//! ```text
//! main.rs        clap parsing, logging setup, exit code
//!   ├── config   TOML config file (defaults for flags)
//!   ├── commands show / get / check / fmt
//!   └── output   text / JSON / TOML formatting
//!         ↓
//! userprefs-core (loader, parser, preference set)
//! ```

pub mod commands;
pub mod config;
pub mod output;
