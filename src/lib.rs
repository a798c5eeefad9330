//! Growable array of string-like elements with explicit capacity tracking,
//! and a line-oriented script driver for exercising it.

pub mod array;
pub mod cli;
pub mod config;
pub mod debug;
pub mod error;
pub mod logging;
pub mod output;
pub mod script;
pub mod session;

pub use array::DynamicArray;
pub use error::{DynarrError, Result};
