//! irviz CLI entry point.
//!
//! Loads a compiler phase dump, optionally filters phases by name, lays
//! out the selected graphs and prints their scene elements.

use std::fs;
use std::io::{self, Read, Write};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use irviz::config::ViewConfig;
use irviz::phases::PhaseKind;
use irviz::{AnalysisSession, load_dump, render_elements};

/// Compiler IR phase dump layout tool.
#[derive(Parser, Debug)]
#[command(name = "irviz", about = "Lay out compiler IR phase dumps")]
struct Cli {
    /// Input dump file (reads from stdin if not provided)
    input: Option<String>,

    /// List phase names and types, without laying anything out
    #[arg(short = 'l', long = "list")]
    list: bool,

    /// Only process phases whose name matches this regex
    #[arg(short = 'f', long = "phase")]
    phase: Option<String>,

    /// Include node property rows when measuring heights
    #[arg(long = "show-properties")]
    show_properties: bool,

    /// Write output to this file instead of stdout
    #[arg(short = 'o', long = "output")]
    output: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let text = if let Some(ref path) = cli.input {
        match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: cannot read '{}': {}", path, e);
                process::exit(1);
            }
        }
    } else {
        let mut buf = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buf) {
            eprintln!("error: cannot read stdin: {}", e);
            process::exit(1);
        }
        buf
    };

    let mut session = AnalysisSession::new();
    let dump = match load_dump(&text, &mut session) {
        Ok(dump) => dump,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    let mut config = ViewConfig::from_session(&session);
    config.show_properties = cli.show_properties;
    config.store(&mut session);

    let mut out = String::new();
    if cli.list {
        for phase in &dump.phases {
            out.push_str(&format!("{}\t{}\n", phase.kind().as_str(), phase.name()));
        }
    } else {
        let selected: Vec<String> = match cli.phase.as_deref() {
            Some(pattern) => match dump.filter_phases(pattern) {
                Ok(matched) => matched.iter().map(|p| p.name().to_string()).collect(),
                Err(e) => {
                    eprintln!("error: {}", e);
                    process::exit(1);
                }
            },
            None => dump.phases.iter().map(|p| p.name().to_string()).collect(),
        };

        for phase in dump.phases {
            if !selected.iter().any(|name| name == phase.name()) {
                continue;
            }
            if !matches!(phase.kind(), PhaseKind::Graph | PhaseKind::TurboshaftGraph) {
                continue;
            }
            let name = phase.name().to_string();
            match render_elements(phase, config.show_properties) {
                Ok(elements) => {
                    out.push_str(&format!("== {}\n", name));
                    for element in elements {
                        out.push_str(&element);
                        out.push('\n');
                    }
                }
                Err(e) => {
                    eprintln!("error: phase '{}': {}", name, e);
                    process::exit(1);
                }
            }
        }
    }

    if let Some(ref path) = cli.output {
        if let Err(e) = fs::write(path, out) {
            eprintln!("error: cannot write '{}': {}", path, e);
            process::exit(1);
        }
    } else {
        print!("{}", out);
        if let Err(e) = io::stdout().flush() {
            eprintln!("error: cannot flush stdout: {}", e);
            process::exit(1);
        }
    }
}
