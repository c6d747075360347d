//! recast CLI - Convert JSON to document formats
//!
//! # Main Commands
//!
//! ```bash
//! recast serve                          # Start HTTP server (port 3000)
//! recast convert input.json -f csv      # Convert a JSON file offline
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! recast flatten input.json             # Show the flattened record set
//! recast formats                        # List registered output formats
//! ```

use clap::{Parser, Subcommand};
use recast::{convert, flatten, supported_formats, ConvertRequest};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "recast")]
#[command(about = "Convert JSON data to CSV, Excel, PDF, Word or XML", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a JSON file to an output format
    Convert {
        /// Input JSON file (an object or an array of objects)
        input: PathBuf,

        /// Output format: csv, excel, pdf, docx or xml
        #[arg(short, long)]
        format: String,

        /// Output file (default: data.<ext> in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Flatten a JSON file and print the record set
    Flatten {
        /// Input JSON file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List registered output formats
    Formats,

    /// Start HTTP server
    Serve {
        /// Port to listen on (falls back to the PORT env variable)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            format,
            output,
        } => cmd_convert(&input, &format, output.as_deref()).await,

        Commands::Flatten { input, output } => cmd_flatten(&input, output.as_deref()),

        Commands::Formats => cmd_formats(),

        Commands::Serve { port } => cmd_serve(port).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_convert(
    input: &Path,
    format: &str,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Converting: {}", input.display());

    let content = fs::read_to_string(input)?;
    let data = serde_json::from_str(&content)?;

    let request = ConvertRequest {
        data: Some(data),
        output_type: Some(format.to_string()),
    };
    let conversion = convert(request).await?;

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&conversion.filename));
    fs::write(&path, &conversion.bytes)?;

    eprintln!(
        "Wrote {} bytes ({}) to: {}",
        conversion.bytes.len(),
        conversion.content_type,
        path.display()
    );
    Ok(())
}

fn cmd_flatten(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Flattening: {}", input.display());

    let content = fs::read_to_string(input)?;
    let data = serde_json::from_str(&content)?;
    let records = flatten::normalize(&data)?;

    eprintln!("  {} record(s)", records.len());

    let json = serde_json::to_string_pretty(&records)?;
    match output {
        Some(p) => {
            fs::write(p, &json)?;
            eprintln!("Output written to: {}", p.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn cmd_formats() -> Result<(), Box<dyn std::error::Error>> {
    for name in supported_formats() {
        println!("{}", name);
    }
    Ok(())
}

async fn cmd_serve(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let port = match port {
        Some(p) => p,
        None => std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000),
    };
    recast::server::start_server(port).await
}
