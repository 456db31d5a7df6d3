use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod export;

use export::{export_site, ExportLayout};

#[derive(Parser, Debug)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Copy the build output and public assets into a distributable folder.
    Export {
        #[arg(long, default_value = ".next")]
        build_dir: PathBuf,
        #[arg(long, default_value = "public")]
        public_dir: PathBuf,
        #[arg(long, default_value = "out")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.command {
        Command::Export {
            build_dir,
            public_dir,
            out_dir,
        } => {
            let layout = ExportLayout {
                build_dir,
                public_dir,
                out_dir,
            };
            let report = export_site(&layout)?;
            println!(
                "exported {} files to {}",
                report.files_copied,
                layout.out_dir.display()
            );
        }
    }

    Ok(())
}
