use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};

use clap::Parser;

use dynarr::cli::Args;
use dynarr::config::Config;
use dynarr::error::Result;
use dynarr::logging::init_logger;
use dynarr::output;
use dynarr::script::{self, DEMO_ORIGIN, DEMO_SCRIPT, STDIN_ORIGIN};
use dynarr::session::Session;

/// Set up SIGPIPE handling for Unix systems
/// This prevents "broken pipe" errors when output is piped to commands like `head`
#[cfg(unix)]
fn setup_sigpipe() {
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

#[cfg(not(unix))]
fn setup_sigpipe() {
    // Windows doesn't have SIGPIPE
}

fn main() {
    setup_sigpipe();

    if let Err(e) = run() {
        eprintln!("dynarr: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_args(&args)?;
    init_logger(config.verbose);

    // Parse every script up front so a typo fails before anything runs
    let steps = if config.use_demo() {
        script::read_script(Cursor::new(DEMO_SCRIPT.as_bytes()), DEMO_ORIGIN)?
    } else {
        let mut all_steps = Vec::new();
        for path in &config.script_files {
            let reader: Box<dyn BufRead> = if path == "-" {
                Box::new(BufReader::new(io::stdin().lock()))
            } else {
                Box::new(BufReader::new(File::open(path)?))
            };
            let origin = if path == "-" { STDIN_ORIGIN } else { path.as_str() };
            all_steps.extend(script::read_script(reader, origin)?);
        }
        all_steps
    };

    let mut session = Session::new(&config)?;
    let mut out = output::open_output(&config)?;
    let stderr = io::stderr();
    let mut diag = stderr.lock();

    let result = session.run_and_flush(&steps, &mut out, &mut diag);
    session.finish();

    result
}
