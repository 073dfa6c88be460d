use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use yul_driver::{load_module, optimise_file, write_module, DriverError, OptimiserSettings};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), DriverError> {
    let mut args = env::args().skip(1);
    let Some(command) = args.next() else {
        print_help();
        return Ok(());
    };
    let rest: Vec<String> = args.collect();

    match command.as_str() {
        "-h" | "--help" => {
            print_help();
            Ok(())
        }
        "-V" | "--version" => {
            println!("yul-opt {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "inline" => cmd_inline(&rest),
        "print" => {
            let Some(input) = rest.first() else {
                return Err(DriverError::InvalidCommand(
                    "print expects an input file".to_string(),
                ));
            };
            println!("{}", load_module(Path::new(input))?);
            Ok(())
        }
        other => Err(DriverError::InvalidCommand(other.to_string())),
    }
}

struct InlineArgs {
    input: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    print: bool,
}

fn parse_inline_args(args: &[String]) -> Result<InlineArgs, DriverError> {
    let mut input = None;
    let mut output = None;
    let mut config = None;
    let mut print = false;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-o" | "--output" => {
                let Some(path) = iter.next() else {
                    return Err(DriverError::InvalidCommand(format!("{arg} expects a path")));
                };
                output = Some(PathBuf::from(path));
            }
            "--config" => {
                let Some(path) = iter.next() else {
                    return Err(DriverError::InvalidCommand(format!("{arg} expects a path")));
                };
                config = Some(PathBuf::from(path));
            }
            "--print" => print = true,
            flag if flag.starts_with('-') => {
                return Err(DriverError::InvalidCommand(format!("unknown flag {flag}")));
            }
            path if input.is_none() => input = Some(PathBuf::from(path)),
            extra => {
                return Err(DriverError::InvalidCommand(format!(
                    "unexpected argument {extra}"
                )));
            }
        }
    }
    let Some(input) = input else {
        return Err(DriverError::InvalidCommand(
            "inline expects an input file".to_string(),
        ));
    };
    Ok(InlineArgs {
        input,
        output,
        config,
        print,
    })
}

fn cmd_inline(args: &[String]) -> Result<(), DriverError> {
    let args = parse_inline_args(args)?;
    let settings = match &args.config {
        Some(path) => OptimiserSettings::load(path)?,
        None => {
            let dir = args.input.parent().unwrap_or(Path::new("."));
            OptimiserSettings::discover(dir)?
        }
    };
    let module = optimise_file(&args.input, &settings)?;
    if let Some(output) = &args.output {
        write_module(output, &module)?;
    }
    if args.print {
        println!("{module}");
    } else if args.output.is_none() {
        println!("{}", serde_json::to_string_pretty(&module)?);
    }
    Ok(())
}

fn print_help() {
    println!(
        "yul-opt\n\n\
USAGE:\n  yul-opt <command> [args]\n\n\
COMMANDS:\n  \
inline <module.json> [-o <out.json>] [--config <yulopt.toml>] [--print]\n      \
Run the configured optimiser steps (default: full-inliner)\n  \
print <module.json>\n      \
Render a module in Yul-like form\n\n\
ENVIRONMENT:\n  \
RUST_LOG            log filter (e.g. yul_optimiser=debug)\n  \
YUL_TRACE_TIMING=1  print per-step timings to stderr"
    );
}
