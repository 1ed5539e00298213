use clap::Parser;
use std::path::PathBuf;

/// CLI for losslessly encoding and decoding raw CD-ROM images.
#[derive(Parser, Debug)]
#[command(
	author,                   // pulls env!("CARGO_PKG_AUTHORS")
	version,                  // pulls env!("CARGO_PKG_VERSION")
	about,                    // doc-comment or Cargo.toml description
	help_template = "\
{before-help}{name} {version}\n\
{about-with-newline}\n\
{usage-heading}\n    {usage}\n\n\
{all-args}\n\n\
Made with ❤ by {author}
"
)]
pub struct Cli {
    /// Input file: a raw CD-ROM image to encode, or an ECM2 file to decode
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: PathBuf,

    /// Output file
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: PathBuf,

    /// Decode an ECM2 file back into a raw CD-ROM image
    #[arg(short = 'd', long = "decode", default_value_t = false)]
    pub decode: bool,
}
