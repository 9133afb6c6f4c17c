//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands;
use crate::config::{get_log_path, init_logging, LogTarget};


/// popchart - Chinese residents of Tokyo municipalities over time
#[derive(Parser)]
#[command(name = "popchart")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}


#[derive(Subcommand)]
enum Commands {
    /// Open the interactive chart dashboard
    View {
        /// Population dataset (JSON)
        #[arg(long, env = "POPCHART_DATA")]
        data: Option<PathBuf>,

        /// Directory for exported charts
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Fixed chart width in px (default: follows terminal width)
        #[arg(long)]
        width: Option<u32>,
    },

    /// Render the chart once and write it as PNG or SVG
    Export {
        /// Export as SVG instead of PNG
        #[arg(long)]
        svg: bool,

        /// Open file after export
        #[arg(long)]
        open: bool,

        /// Population dataset (JSON)
        #[arg(long, env = "POPCHART_DATA")]
        data: Option<PathBuf>,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Chart width in px
        #[arg(long)]
        width: Option<u32>,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show totals for the selected period and the drawn series
    Stats {
        /// Population dataset (JSON)
        #[arg(long, env = "POPCHART_DATA")]
        data: Option<PathBuf>,

        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// List municipalities with their colors and year coverage
    List {
        /// Population dataset (JSON)
        #[arg(long, env = "POPCHART_DATA")]
        data: Option<PathBuf>,
    },
}


/// Which municipalities and years to chart.
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Municipality group: all, top (first 15), 23, tama, islands
    #[arg(long, default_value = "top", value_parser = ["all", "top", "23", "wards", "tama", "islands"])]
    pub select: String,

    /// Chart exactly these municipalities (repeatable, overrides --select)
    #[arg(long = "ward", value_name = "NAME")]
    pub wards: Vec<String>,

    /// Year range preset: all, early (1979-1999), recent (2000-2025)
    #[arg(long, value_parser = ["all", "early", "recent"])]
    pub range: Option<String>,

    /// First year (applied after --range)
    #[arg(long)]
    pub from: Option<i32>,

    /// Last year (applied after --range)
    #[arg(long)]
    pub to: Option<i32>,
}


/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_path = get_log_path();
    let target = match cli.command {
        Some(Commands::View { .. }) => LogTarget::File(&log_path),
        _ => LogTarget::Stderr,
    };
    init_logging(cli.verbose, target)?;

    match cli.command {
        Some(Commands::View { data, output_dir, width }) => {
            commands::view::run(data, output_dir, width)?;
        }
        Some(Commands::Export { svg, open, data, selection, width, output }) => {
            commands::export::run(svg, open, data, &selection, width, output)?;
        }
        Some(Commands::Stats { data, selection }) => {
            commands::stats::run(data, &selection)?;
        }
        Some(Commands::List { data }) => {
            commands::list::run(data)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
