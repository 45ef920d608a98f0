// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// CLI entrypoint for irforge.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use log::info;
use serde_json::json;

use irforge::assembler::{Assembler, LineDiagnostic};
use irforge::core::operand::Word;
use irforge::grammar_defaults::build_default_registry;

const LONG_ABOUT: &str = "Assembler for the word-oriented annotation instruction stream.

Reads one source unit of annotation instructions (one instruction per line,
';' comments) and emits the binary word sequence, four little-endian bytes
per word. With -x/--hex, one hexadecimal word per line is written instead.
When -o/--outfile is omitted the output is named after the input with a
.bin (or .hex) extension.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "irforge",
    version,
    about = "Annotation instruction assembler with registry-extensible grammars",
    long_about = LONG_ABOUT
)]
struct Cli {
    /// Input source file.
    input: Option<PathBuf>,
    #[arg(
        short = 'o',
        long = "outfile",
        value_name = "FILE",
        long_help = "Write the assembled output to FILE instead of deriving the name from the input."
    )]
    outfile: Option<PathBuf>,
    #[arg(
        short = 'x',
        long = "hex",
        action = ArgAction::SetTrue,
        long_help = "Emit one 0x-prefixed hexadecimal word per line instead of binary."
    )]
    hex: bool,
    #[arg(
        long = "format",
        value_enum,
        default_value_t = OutputFormat::Text,
        long_help = "Select diagnostics output format. text is default; json emits one machine-readable object per diagnostic."
    )]
    format: OutputFormat,
    #[arg(
        short = 'q',
        long = "quiet",
        action = ArgAction::SetTrue,
        long_help = "Suppress the summary line for successful runs."
    )]
    quiet: bool,
    #[arg(
        long = "print-opcodes",
        action = ArgAction::SetTrue,
        long_help = "Print the registered opcode mnemonics and exit without assembling."
    )]
    print_opcodes: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("irforge: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let registry = build_default_registry().map_err(|err| err.to_string())?;

    if cli.print_opcodes {
        match cli.format {
            OutputFormat::Text => {
                for mnemonic in registry.mnemonic_list() {
                    println!("{mnemonic}");
                }
            }
            OutputFormat::Json => {
                println!("{}", json!({ "opcodes": registry.mnemonic_list() }));
            }
        }
        return Ok(());
    }

    let Some(input) = cli.input.as_deref() else {
        return Err("no input file given".to_string());
    };
    let source =
        fs::read_to_string(input).map_err(|err| format!("{}: {err}", input.display()))?;
    let mut assembler = Assembler::new(&registry);

    let words = match assembler.assemble_source(&source) {
        Ok(words) => words,
        Err(err) => {
            emit_diagnostics(err.diagnostics(), input, cli.format);
            return Err(err.to_string());
        }
    };

    let output = cli
        .outfile
        .clone()
        .unwrap_or_else(|| default_output_path(input, cli.hex));
    write_words(&output, &words, cli.hex)
        .map_err(|err| format!("{}: {err}", output.display()))?;

    info!(
        "assembled {} word(s), id bound {}",
        words.len(),
        assembler.id_bound()
    );
    if !cli.quiet {
        println!(
            "{} -> {} ({} words)",
            input.display(),
            output.display(),
            words.len()
        );
    }
    Ok(())
}

fn emit_diagnostics(diagnostics: &[LineDiagnostic], file: &Path, format: OutputFormat) {
    for diag in diagnostics {
        match format {
            OutputFormat::Text => {
                eprintln!("{}:{}", file.display(), diag.format());
            }
            OutputFormat::Json => {
                let line = json!({
                    "severity": "error",
                    "message": diag.error.to_string(),
                    "file": file.display().to_string(),
                    "line": diag.line,
                    "source": diag.source,
                });
                eprintln!("{line}");
            }
        }
    }
}

fn default_output_path(input: &Path, hex: bool) -> PathBuf {
    input.with_extension(if hex { "hex" } else { "bin" })
}

fn write_words(path: &Path, words: &[Word], hex: bool) -> std::io::Result<()> {
    if hex {
        let mut out = String::with_capacity(words.len() * 11);
        for word in words {
            out.push_str(&format!("0x{word:08x}\n"));
        }
        fs::write(path, out)
    } else {
        let mut bytes = Vec::with_capacity(words.len() * 4);
        for word in words {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        fs::write(path, bytes)
    }
}
