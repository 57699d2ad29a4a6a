//! Command-line tool for checking JSON documents and printing their tree.
//!
//! Usage: jsontree [OPTIONS] [FILE]
//!
//! Options:
//!   --check                Check if the document is valid (exit 0 if valid, 1 if invalid)
//!   --max-depth <N>        Reject documents nested deeper than N containers
//!   -v, --verbose          Log parser activity to stderr
//!   -h, --help             Print help
//!   -V, --version          Print version
//!
//! Without --check, the document tree is printed as an outline: one line per
//! node with its kind, zero-based `line:column` span and, for values, the
//! scalar payload.

use libjsontree::{parse_with_options, Kind, Node, ParseOptions};
use std::fs;
use std::io::{self, Read, Write};
use std::process;
use tracing::{debug, Level};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut check_only = false;
    let mut verbose = false;
    let mut options = ParseOptions::default();
    let mut input_path: Option<&str> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-V" | "--version" => {
                println!("jsontree {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "--check" => {
                check_only = true;
            }
            "-v" | "--verbose" => {
                verbose = true;
            }
            "--max-depth" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --max-depth requires a number");
                    process::exit(1);
                }
                match args[i].parse::<usize>() {
                    Ok(n) => options = ParseOptions::bounded(n),
                    Err(_) => {
                        eprintln!("Error: Invalid --max-depth: {}", args[i]);
                        process::exit(1);
                    }
                }
            }
            "-" => {
                // Explicit stdin
                input_path = None;
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                process::exit(1);
            }
            arg => {
                if input_path.is_some() {
                    eprintln!("Error: Only one input file may be given");
                    process::exit(1);
                }
                input_path = Some(arg);
            }
        }
        i += 1;
    }

    init_logging(verbose);

    let (content, display_name) = match read_input(input_path) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    debug!(input = %display_name, bytes = content.len(), "read input");

    let root = match parse_with_options(&content, options) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("{}: {}", display_name, e);
            process::exit(1);
        }
    };

    if check_only {
        return;
    }

    let mut out = String::new();
    write_outline(&mut out, &root, None, 0);
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = handle.write_all(out.as_bytes()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn print_help() {
    println!(
        "jsontree - check JSON documents and print their tree

Usage: jsontree [OPTIONS] [FILE]

Reads FILE, or stdin when FILE is omitted or '-'.

Options:
  --check                Check if the document is valid (exit 0 if valid, 1 if invalid)
  --max-depth <N>        Reject documents nested deeper than N containers
  -v, --verbose          Log parser activity to stderr
  -h, --help             Print help
  -V, --version          Print version"
    );
}

/// Install a stderr subscriber; debug output only with --verbose.
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .try_init();
}

/// Read the whole input, returning its content and a name for messages.
fn read_input(path: Option<&str>) -> io::Result<(String, String)> {
    match path {
        Some(path) => Ok((fs::read_to_string(path)?, path.to_string())),
        None => {
            let mut content = String::new();
            io::stdin().read_to_string(&mut content)?;
            Ok((content, "<stdin>".to_string()))
        }
    }
}

/// Append one line per node, children indented below their parent.
fn write_outline(out: &mut String, node: &Node, label: Option<&str>, depth: usize) {
    let indent = "  ".repeat(depth);
    let label = label.map(|l| format!("{} ", l)).unwrap_or_default();
    let end = node
        .end()
        .map(|p| p.to_string())
        .unwrap_or_else(|| "?".to_string());
    let span = format!("{}-{}", node.start(), end);

    match node.kind() {
        Kind::Value => {
            let scalar = node
                .scalar()
                .map(|s| s.to_string())
                .unwrap_or_else(|e| e.to_string());
            out.push_str(&format!("{}{}{} {}\n", indent, label, span, scalar));
        }
        Kind::List => {
            let len = node.len().unwrap_or(0);
            out.push_str(&format!("{}{}List[{}] {}\n", indent, label, len, span));
            if let Ok(items) = node.iter() {
                for (index, item) in items.enumerate() {
                    write_outline(out, item, Some(&format!("[{}]", index)), depth + 1);
                }
            }
        }
        Kind::Object => {
            let len = node.len().unwrap_or(0);
            out.push_str(&format!("{}{}Object{{{}}} {}\n", indent, label, len, span));
            if let Ok(entries) = node.entries() {
                let mut entries: Vec<_> = entries.collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                for (key, child) in entries {
                    write_outline(out, child, Some(&format!("{:?}:", key)), depth + 1);
                }
            }
        }
    }
}
