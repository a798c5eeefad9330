use bstr::BString;

use crate::array::DynamicArray;
use crate::cli::Args;
use crate::error::{DynarrError, Result};

/// Runtime configuration derived from CLI arguments
#[derive(Clone, Debug)]
pub struct Config {
    pub capacity: usize,
    pub keep_going: bool,
    pub debug: bool,
    pub verbose: bool,
    pub output_file: Option<String>,
    pub script_files: Vec<String>,
}

impl Config {
    /// Build configuration from parsed CLI arguments
    pub fn from_args(args: &Args) -> Result<Self> {
        Ok(Config {
            capacity: parse_capacity(args.capacity)?,
            keep_going: args.keep_going,
            debug: args.debug,
            verbose: args.verbose,
            output_file: args.output.clone(),
            script_files: args.files.clone(),
        })
    }

    /// Whether the built-in demo script should run
    pub fn use_demo(&self) -> bool {
        self.script_files.is_empty()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            capacity: 1,
            keep_going: false,
            debug: false,
            verbose: false,
            output_file: None,
            script_files: vec![],
        }
    }
}

/// Validate a raw capacity; must be >= 1 and addressable as one block
pub fn parse_capacity(raw: i64) -> Result<usize> {
    if raw <= 0 {
        return Err(DynarrError::InvalidArgument(format!(
            "capacity must be >= 1, got {}",
            raw
        )));
    }
    let max = DynamicArray::<BString>::MAX_CAPACITY;
    usize::try_from(raw)
        .ok()
        .filter(|capacity| *capacity <= max)
        .ok_or_else(|| {
            DynarrError::InvalidArgument(format!(
                "capacity {} exceeds maximum of {}",
                raw, max
            ))
        })
}
