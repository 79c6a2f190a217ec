use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "helper", version, about = "File checksums and host utilities")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the CRC-32 of each file
    Crc(CrcArgs),
    /// Copy a directory tree
    Copy(CopyArgs),
    /// Delete everything inside a directory
    Clear {
        dir: PathBuf,
    },
    /// Print a file as base64
    Encode {
        file: PathBuf,
        /// Emit a single line instead of 76-column lines
        #[arg(long)]
        single_line: bool,
    },
    /// Decode a base64 file into another file
    Decode {
        input: PathBuf,
        output: PathBuf,
        /// Replace the output file if it exists
        #[arg(long)]
        force: bool,
    },
    /// Find a free port
    Port(PortArgs),
    /// Show host name, addresses, interfaces and connectivity
    Net {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the per-user temp directory
    Temp,
    /// Print the hash of a string
    Digest {
        text: String,
        #[arg(long, value_enum, default_value_t = DigestAlgorithm::Md5)]
        algorithm: DigestAlgorithm,
    },
    /// GZip-compress a file
    Gzip {
        input: PathBuf,
        output: PathBuf,
    },
    /// Decompress a GZip file
    Gunzip {
        input: PathBuf,
        output: PathBuf,
    },
    /// Extract a Zip archive into a directory
    Unzip {
        archive: PathBuf,
        dir: PathBuf,
        /// File names to leave out (case-insensitive); repeatable
        #[arg(long, value_name = "NAME")]
        exclude: Vec<String>,
    },
    /// Print a random integer in MIN..MAX
    Random {
        #[arg(allow_hyphen_values = true)]
        min: i32,
        #[arg(allow_hyphen_values = true)]
        max: i32,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Md5,
    Sha256,
}

#[derive(Args, Clone)]
pub struct CrcArgs {
    /// Files to checksum
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    /// Expected CRC (hex); exit with an error on mismatch. Needs a single file
    #[arg(long, value_name = "HEX")]
    pub expect: Option<String>,
}

#[derive(Args, Clone)]
pub struct CopyArgs {
    pub source: PathBuf,
    pub target: PathBuf,
    /// Fail instead of replacing existing files
    #[arg(long)]
    pub no_overwrite: bool,
    /// Copy the files of each directory in parallel (always replaces)
    #[arg(long, conflicts_with = "no_overwrite")]
    pub parallel: bool,
}

#[derive(Args, Clone)]
pub struct PortArgs {
    /// First port to probe (defaults to HELPER_PORT_RANGE_START)
    #[arg(long)]
    pub start: Option<u16>,
    /// Stop before this port (defaults to HELPER_PORT_RANGE_END)
    #[arg(long)]
    pub end: Option<u16>,
    /// Let the OS pick any free loopback port instead
    #[arg(long, conflicts_with_all = ["start", "end"])]
    pub any: bool,
}
