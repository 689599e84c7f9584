use clap::Parser;
use volguard::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
