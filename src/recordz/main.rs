//! # Recordz CLI
//!
//! The binary is intentionally thin: argument definitions live in `args.rs`,
//! handlers and printing in `cli/`, and this file only invokes `cli::run()`
//! and handles process termination.

mod args;
mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
