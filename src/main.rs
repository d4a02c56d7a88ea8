use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context;
use clap::Parser as ClapParser;
use clap_stdin::FileOrStdin;

use ratc::lexer::{read_listing, Lexer};

#[derive(ClapParser)]
#[command(version, about = "Rat25S compiler front end", long_about = None)]
struct Args {
    /// Source file, or `-` for stdin
    input: FileOrStdin,

    /// Treat the input as a lexical-analysis listing (`<category> <lexeme>` per line)
    #[arg(short, long)]
    listing: bool,

    /// Header lines to skip at the top of a listing
    #[arg(long, default_value_t = 4)]
    skip_header: usize,

    /// Write the derivation trace to this file
    #[arg(short, long)]
    trace: Option<PathBuf>,

    /// Write the instruction and symbol tables to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Don't echo the derivation trace to stderr
    #[arg(short, long)]
    quiet: bool,
}

fn create(path: &Path) -> anyhow::Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("can't create {:?}", path))?;
    Ok(BufWriter::new(file))
}

fn run(args: Args) -> anyhow::Result<bool> {
    let user_input = args.input.contents().context("can't read input")?;

    let tokens = if args.listing {
        read_listing(user_input.as_bytes(), args.skip_header)?
    } else {
        Lexer::tokenize(&user_input)
    };

    let compilation = ratc::compile_tokens(tokens)?;

    if let Some(path) = &args.trace {
        let mut out = create(path)?;
        write!(out, "{}", compilation.trace)?;
        out.flush()?;
    }
    if !args.quiet {
        eprint!("{}", compilation.trace);
    }

    match &args.output {
        Some(path) => {
            let mut out = create(path)?;
            write!(out, "{}", compilation.program)?;
            out.flush()?;
        }
        None => {
            let mut out = io::stdout().lock();
            write!(out, "{}", compilation.program)?;
        }
    }

    for error in &compilation.errors {
        log::error!("{}", error);
    }
    Ok(compilation.is_ok())
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Args::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
