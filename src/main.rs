use clap::{Parser, Subcommand};
use std::path::PathBuf;

use lesson_conv_rs::cli::{
    default_decode_output, default_encode_output, run_decode, run_encode, timestamp,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a JSON lesson into the fixed spreadsheet layout
    Encode {
        /// Input lesson JSON (a missing file encodes as an empty lesson)
        #[arg(long, conflicts_with = "new", required_unless_present = "new")]
        json: Option<PathBuf>,

        /// Start from an empty lesson instead of a JSON file
        #[arg(long)]
        new: bool,

        /// Output workbook path (default: input name plus a timestamp suffix)
        #[arg(long)]
        xlsx: Option<PathBuf>,
    },
    /// Parse a lesson spreadsheet back into JSON
    Decode {
        /// Input workbook path
        #[arg(long)]
        xlsx: PathBuf,

        /// Output JSON path (default: input name plus a timestamp suffix)
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Encode { json, new: _, xlsx } => {
            let xlsx = xlsx.unwrap_or_else(|| default_encode_output(json.as_deref(), &timestamp()));
            run_encode(json.as_deref(), &xlsx)
        }
        Command::Decode { xlsx, json } => {
            let json = json.unwrap_or_else(|| default_decode_output(&xlsx, &timestamp()));
            run_decode(&xlsx, &json)
        }
    }
}
