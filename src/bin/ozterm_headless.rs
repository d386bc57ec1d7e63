//! Headless terminal runner
//!
//! Feeds a byte stream through the terminal engine without any frontend
//! and emits a snapshot of the resulting screen. Useful for testing and
//! for generating deterministic captures of escape-sequence traffic.
//!
//! ```bash
//! # Process input from stdin and print a JSON snapshot
//! printf 'Hello\x1b[31mRed\x1b[0m' | ozterm-headless
//!
//! # Process a recorded file, emit plain text
//! ozterm-headless --input session.bin --text
//! ```

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use ozterm::{Config, Snapshot, Terminal};

struct Args {
    /// Input file; stdin when absent
    input: Option<PathBuf>,
    /// Output file; stdout when absent
    output: Option<PathBuf>,
    /// Emit plain text instead of JSON
    text: bool,
    rows: usize,
    cols: usize,
    scrollback: usize,
    help: bool,
}

impl Default for Args {
    fn default() -> Self {
        let config = Config::default();
        Self {
            input: None,
            output: None,
            text: false,
            rows: config.rows,
            cols: config.cols,
            scrollback: config.scrollback_lines,
            help: false,
        }
    }
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let argv: Vec<String> = std::env::args().skip(1).collect();

    let mut i = 0;
    while i < argv.len() {
        match argv[i].as_str() {
            "-h" | "--help" => {
                args.help = true;
            }
            "-i" | "--input" => {
                i += 1;
                if i < argv.len() {
                    args.input = Some(PathBuf::from(&argv[i]));
                }
            }
            "-o" | "--output" => {
                i += 1;
                if i < argv.len() {
                    args.output = Some(PathBuf::from(&argv[i]));
                }
            }
            "-t" | "--text" => {
                args.text = true;
            }
            "-r" | "--rows" => {
                i += 1;
                if i < argv.len() {
                    args.rows = argv[i].parse().unwrap_or(args.rows);
                }
            }
            "-c" | "--cols" => {
                i += 1;
                if i < argv.len() {
                    args.cols = argv[i].parse().unwrap_or(args.cols);
                }
            }
            "-s" | "--scrollback" => {
                i += 1;
                if i < argv.len() {
                    args.scrollback = argv[i].parse().unwrap_or(args.scrollback);
                }
            }
            other => {
                log::warn!("ignoring unknown argument {:?}", other);
            }
        }
        i += 1;
    }

    args
}

fn print_help() {
    eprintln!(
        r#"ozterm-headless - drive the terminal engine without a frontend

USAGE:
    ozterm-headless [OPTIONS]

OPTIONS:
    -h, --help              Show this help message
    -i, --input <FILE>      Input file (stdin if not specified)
    -o, --output <FILE>     Output file (stdout if not specified)
    -t, --text              Output plain text instead of JSON
    -r, --rows <N>          Terminal rows (default: 24)
    -c, --cols <N>          Terminal columns (default: 80)
    -s, --scrollback <N>    Scrollback capacity (default: 1000)
"#
    );
}

fn run(args: &Args) -> io::Result<()> {
    let input_data = if let Some(path) = &args.input {
        std::fs::read(path)?
    } else {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        data
    };

    let config = Config {
        rows: args.rows,
        cols: args.cols,
        scrollback_lines: args.scrollback,
        ..Config::default()
    };
    let mut terminal = Terminal::with_config(&config)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    terminal.feed(&input_data);

    let snapshot = Snapshot::capture(&terminal);
    let output_data = if args.text {
        snapshot.to_text()
    } else {
        snapshot
            .to_json()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
    };

    if let Some(path) = &args.output {
        let mut file = File::create(path)?;
        file.write_all(output_data.as_bytes())?;
        file.write_all(b"\n")?;
    } else {
        let mut stdout = io::stdout();
        stdout.write_all(output_data.as_bytes())?;
        stdout.write_all(b"\n")?;
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = parse_args();
    if args.help {
        print_help();
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
