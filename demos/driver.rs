//! Line-oriented command driver for [`prbtree::PersistentRbTree`].
//!
//! Reads `INC/REM/SUC/IMP` commands (one per line, whitespace-separated,
//! case-insensitive keyword) from a file or stdin and writes the
//! `SUC`/`IMP` results to a file or stdout, matching the external
//! interface this crate's operations are meant to drive. This binary
//! contains no tree logic of its own -- it only parses commands and
//! formats their results.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use clap::Parser;
use prbtree::PersistentRbTree;
use tracing::{debug, warn};

/// Drive a partially persistent red-black tree from a command file.
#[derive(Parser, Debug)]
#[command(name = "driver", about = "Run INC/REM/SUC/IMP commands against a versioned red-black tree")]
struct Args {
    /// Input file; reads stdin if omitted.
    input: Option<PathBuf>,
    /// Output file; writes stdout if omitted.
    output: Option<PathBuf>,
}

enum Command {
    Insert(i64),
    Remove(i64),
    Successor(i64, i64),
    InOrder(i64),
}

fn parse_line(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();
    let keyword = parts.next()?.to_ascii_uppercase();
    match keyword.as_str() {
        "INC" => Some(Command::Insert(parts.next()?.parse().ok()?)),
        "REM" => Some(Command::Remove(parts.next()?.parse().ok()?)),
        "SUC" => {
            let key = parts.next()?.parse().ok()?;
            let version = parts.next()?.parse().ok()?;
            Some(Command::Successor(key, version))
        }
        "IMP" => Some(Command::InOrder(parts.next()?.parse().ok()?)),
        _ => None,
    }
}

fn run(lines: impl Iterator<Item = io::Result<String>>, out: &mut impl Write) -> io::Result<()> {
    let mut tree = PersistentRbTree::new();

    for (lineno, line) in lines.enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let Some(command) = parse_line(trimmed) else {
            warn!(lineno, line = trimmed, "skipping malformed command");
            continue;
        };
        match command {
            Command::Insert(key) => {
                let effective = tree.insert(key);
                debug!(key, effective, "INC");
            }
            Command::Remove(key) => {
                let effective = tree.remove(key).map_err(io::Error::other)?;
                debug!(key, effective, "REM");
            }
            Command::Successor(key, version) => {
                writeln!(out, "SUC {key} {version}")?;
                match tree.successor(key, version).map_err(io::Error::other)? {
                    Some(s) => writeln!(out, "{s}")?,
                    None => writeln!(out, "infinito")?,
                }
            }
            Command::InOrder(version) => {
                writeln!(out, "IMP {version}")?;
                let rows = tree.in_order(version).map_err(io::Error::other)?;
                let line = rows
                    .iter()
                    .map(|(key, depth, color)| format!("{key},{depth},{color}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                writeln!(out, "{line}")?;
            }
        }
    }
    Ok(())
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let stdin;
    let input_file;
    let lines: Box<dyn Iterator<Item = io::Result<String>>> = match &args.input {
        Some(path) => {
            input_file = BufReader::new(File::open(path)?);
            Box::new(input_file.lines())
        }
        None => {
            stdin = BufReader::new(io::stdin());
            Box::new(stdin.lines())
        }
    };

    match &args.output {
        Some(path) => run(lines, &mut File::create(path)?),
        None => run(lines, &mut io::stdout().lock()),
    }
}
