//! popchart - Rust implementation
//!
//! Interactive population chart for Tokyo municipalities, with SVG/PNG export.

mod aggregation;
mod cli;
mod commands;
mod config;
mod data;
mod models;
mod session;
mod state;
mod visualization;


fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
