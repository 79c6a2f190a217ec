//! `helper` - command line front end for helper-tools.
//!
//! Configuration comes from the environment (and `.env`); see
//! [`helper_tools::Config`]. Logs go to stderr, results to stdout.

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use helper_core::Stopwatch;
use helper_tools::{checksum, compress, digest, fs, local, network, random, Config};
use serde_json::json;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

use crate::cli::{Cli, Command, CopyArgs, CrcArgs, DigestAlgorithm, PortArgs};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    helper_tools::init_tracing();

    let config = Config::from_env();
    log_startup_info(&config);

    let cli = Cli::parse();
    match cli.command {
        Command::Crc(args) => crc(&config, &args),
        Command::Copy(args) => copy(&config, &args),
        Command::Clear { dir } => {
            fs::clear_directory(&dir)?;
            info!(dir = %dir.display(), "Directory cleared");
            Ok(())
        }
        Command::Encode { file, single_line } => {
            let line_breaks = config.base64_line_breaks && !single_line;
            println!("{}", fs::file_to_base64(&file, line_breaks)?);
            Ok(())
        }
        Command::Decode {
            input,
            output,
            force,
        } => {
            let data = std::fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            fs::base64_to_file(&data, &output, force)?;
            Ok(())
        }
        Command::Port(args) => port(&config, &args),
        Command::Net { json } => net(&config, json).await,
        Command::Temp => {
            println!("{}", local::user_temp_path()?.display());
            Ok(())
        }
        Command::Digest { text, algorithm } => {
            let hash = match algorithm {
                DigestAlgorithm::Md5 => digest::md5_hex(&text),
                DigestAlgorithm::Sha256 => digest::sha256_hex(&text),
            };
            println!("{hash}");
            Ok(())
        }
        Command::Gzip { input, output } => {
            let read = compress::compress_to(open(&input)?, File::create(&output)?)?;
            info!(
                input = %input.display(),
                output = %output.display(),
                bytes = read,
                "Compressed"
            );
            Ok(())
        }
        Command::Gunzip { input, output } => {
            let written = compress::decompress_to(open(&input)?, File::create(&output)?)?;
            info!(
                input = %input.display(),
                output = %output.display(),
                bytes = written,
                "Decompressed"
            );
            Ok(())
        }
        Command::Unzip {
            archive,
            dir,
            exclude,
        } => {
            let exclude: Vec<&str> = exclude.iter().map(String::as_str).collect();
            let files = compress::unzip_to_folder(&archive, &dir, &exclude)?;
            println!("{files} files");
            Ok(())
        }
        Command::Random { min, max } => {
            println!("{}", random::random_number(min, max)?);
            Ok(())
        }
    }
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Log effective configuration.
fn log_startup_info(config: &Config) {
    debug!(
        read_buffer_size = config.read_buffer_size,
        port_range_start = config.port_range_start,
        port_range_end = config.port_range_end,
        probe_host = %config.probe_host,
        copy_overwrite = config.copy_overwrite,
        "Loaded configuration"
    );
}

fn crc(config: &Config, args: &CrcArgs) -> Result<()> {
    if let Some(expected) = &args.expect {
        let [file] = args.files.as_slice() else {
            bail!("--expect takes exactly one file");
        };
        let expected = u32::from_str_radix(expected.trim_start_matches("0x"), 16)
            .with_context(|| format!("invalid CRC `{expected}`"))?;
        checksum::verify_file_with(file, expected, config.read_buffer_size)?;
        println!("{}  {}  OK", checksum::format_crc(expected), file.display());
        return Ok(());
    }

    let watch = Stopwatch::start_new();
    let results = checksum::file_crcs(&args.files, config.read_buffer_size);
    debug!(
        files = results.len(),
        elapsed = %watch.elapsed_formatted(),
        "Checksummed files"
    );

    let mut failed = 0usize;
    for (path, result) in results {
        match result {
            Ok(value) => println!("{}  {}", checksum::format_crc(value), path.display()),
            Err(e) => {
                eprintln!("{e}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} files could not be read", args.files.len());
    }
    Ok(())
}

fn copy(config: &Config, args: &CopyArgs) -> Result<()> {
    let stats = if args.parallel {
        fs::copy_files_recursively(&args.source, &args.target)?
    } else {
        let overwrite = config.copy_overwrite && !args.no_overwrite;
        fs::copy_directory(&args.source, &args.target, overwrite)?
    };
    println!(
        "{} files, {} directories, {} bytes",
        stats.files, stats.directories, stats.bytes
    );
    Ok(())
}

fn port(config: &Config, args: &PortArgs) -> Result<()> {
    let port = if args.any {
        network::available_port()?
    } else {
        network::free_port_in_range(
            args.start.unwrap_or(config.port_range_start),
            args.end.unwrap_or(config.port_range_end),
        )?
    };
    println!("{port}");
    Ok(())
}

async fn net(config: &Config, as_json: bool) -> Result<()> {
    let host = network::host_name();
    let ip = network::local_ip();
    let interfaces = network::interfaces().unwrap_or_default();
    let mac = network::mac_address();
    let online = network::is_connected_to_internet(config).await;

    if as_json {
        let report = json!({
            "host_name": host,
            "local_ip": ip,
            "mac_address": mac,
            "online": online,
            "interfaces": interfaces,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("host:   {host}");
    println!(
        "ip:     {}",
        ip.map_or_else(|| "-".to_string(), |ip| ip.to_string())
    );
    println!("mac:    {}", mac.as_deref().unwrap_or("-"));
    println!("online: {online}");
    for iface in &interfaces {
        println!(
            "  {:<12} {:<9} {:<5} {}",
            iface.name,
            format!("{:?}", iface.kind).to_lowercase(),
            if iface.up { "up" } else { "down" },
            iface.mac.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
