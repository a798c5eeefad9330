use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "dynarr",
    about = "Run operation scripts against a growable string array",
    allow_negative_numbers = true
)]
pub struct Args {
    /// Initial capacity of the array
    #[arg(short = 'c', long, value_name = "N", default_value_t = 1)]
    pub capacity: i64,

    /// Write renderings to FILE instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<String>,

    /// Report failed operations and continue with the next line
    #[arg(short = 'k', long = "keep-going")]
    pub keep_going: bool,

    /// Annotate each operation with the slot layout on stderr
    #[arg(long)]
    pub debug: bool,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Operation scripts; runs the built-in demo when none are given
    #[arg(value_name = "FILE")]
    pub files: Vec<String>,
}
