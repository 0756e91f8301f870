use clap::Parser;
use turtlebt::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
