//! Personal task tracker backed by a flat text file.
//!
//! The [`store::TaskStore`] holds tasks in memory and reads/writes the
//! `;`-delimited task file; [`menu::MenuApp`] is the interactive console on
//! top of it, and [`cmd`] holds the one-shot subcommands.

pub mod cli;
pub mod cmd;
pub mod config;
pub mod fields;
pub mod menu;
pub mod store;
pub mod task;
