//! CAPT job container inspection and extraction utility.
//!
//! # Usage
//!
//! ```bash
//! # Print version and page count
//! captctl info job.capt
//!
//! # Decode page 1 to a P4 bitmap on stdout
//! captctl extract job.capt
//!
//! # Decode page 2 to a raw (still-compressed) page file
//! captctl extract job.capt --out page2.raw --out-format raw --page 2
//! ```

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use capt_types::container::{PageFormat, Stream};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "captctl")]
#[command(author = "capt-toolkit project")]
#[command(version)]
#[command(about = "Inspect and extract pages from Canon CAPT print job files", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Print the detected CAPT version and codec
	Info {
		/// Job file to inspect
		#[arg(value_name = "JOB_FILE")]
		job_file: PathBuf,
	},
	/// Extract one page as a raw or P4 bitmap
	Extract {
		/// Job file to read from
		#[arg(value_name = "JOB_FILE")]
		job_file: PathBuf,

		/// Output file path (defaults to standard output)
		#[arg(long = "out", value_name = "OUT_FILE")]
		out_file: Option<PathBuf>,

		/// Output format
		#[arg(long = "out-format", value_name = "FORMAT", default_value = "p4")]
		out_format: String,

		/// 1-based page number
		#[arg(long, default_value_t = 1)]
		page: u32,
	},
}

fn run() -> capt_types::error::Result<()> {
	let cli = Cli::parse();
	match cli.command {
		Commands::Info { job_file } => {
			let file = File::open(&job_file)?;
			let stream = Stream::new(file)?;
			let version = stream.version();
			println!("capt_version={}", match version {
				capt_types::container::CaptVersion::Capt1 => 1,
				capt_types::container::CaptVersion::Capt2 => 2,
			});
			println!("capt_codec={}", version.codec_name());
		}
		Commands::Extract { job_file, out_file, out_format, page } => {
			let format: PageFormat = out_format.parse()?;
			let file = File::open(&job_file)?;
			let mut stream = Stream::new(file)?;
			let bytes = stream.get_page(page, format)?;
			match out_file {
				Some(path) => {
					let mut out = File::create(path)?;
					out.write_all(&bytes)?;
				}
				None => {
					io::stdout().write_all(&bytes)?;
				}
			}
		}
	}
	Ok(())
}

fn main() -> ExitCode {
	env_logger::init();
	match run() {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			eprintln!("captctl: {e}");
			ExitCode::FAILURE
		}
	}
}
