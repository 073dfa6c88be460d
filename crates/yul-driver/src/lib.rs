#![deny(clippy::unwrap_used)]

//! Loads JSON-encoded Yul modules, runs the configured optimiser steps and
//! writes the result back out.

mod settings;

use std::fs;
use std::path::Path;
use std::time::Instant;

use tracing::info;
use yul_ir::Block;
use yul_optimiser::{full_inline, NameDispenser, OptimiserError};

pub use settings::{OptimiserSettings, Step, SETTINGS_FILE_NAME};

fn trace_timing() -> bool {
    std::env::var("YUL_TRACE_TIMING").is_ok_and(|v| v == "1")
}

macro_rules! timing_step {
    ($trace:expr, $label:expr, $block:expr) => {{
        let _t0 = if $trace { Some(Instant::now()) } else { None };
        let result = $block;
        if let Some(t0) = _t0 {
            eprintln!(
                "[YUL_TIMING] {:40} {:>8.1}ms",
                $label,
                t0.elapsed().as_secs_f64() * 1000.0
            );
        }
        result
    }};
}

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid module JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Optimiser error: {0}")]
    Optimiser(#[from] OptimiserError),
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

/// Reads a module from its JSON encoding.
pub fn load_module(path: &Path) -> Result<Block, DriverError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn write_module(path: &Path, module: &Block) -> Result<(), DriverError> {
    let mut output = serde_json::to_string_pretty(module)?;
    output.push('\n');
    fs::write(path, output)?;
    Ok(())
}

/// Runs every configured step over `module`.
///
/// The name dispenser is seeded once from the whole module plus the
/// reserved names of the settings and then threaded through all steps.
pub fn optimise(mut module: Block, settings: &OptimiserSettings) -> Result<Block, DriverError> {
    let trace = trace_timing();
    let mut dispenser = NameDispenser::from_module(&module);
    for name in &settings.reserved_names {
        dispenser.reserve(name.as_str());
    }
    for step in &settings.steps {
        info!(step = step.name(), "running optimiser step");
        dispenser = match step {
            Step::FullInliner => timing_step!(
                trace,
                step.name(),
                full_inline(&mut module, dispenser)?
            ),
        };
    }
    Ok(module)
}

/// Loads `input`, optimises it and returns the rewritten module.
pub fn optimise_file(input: &Path, settings: &OptimiserSettings) -> Result<Block, DriverError> {
    let trace = trace_timing();
    let module = timing_step!(trace, "load module", load_module(input)?);
    optimise(module, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use yul_ir::builders::*;

    #[test]
    fn reserved_names_are_never_dispensed() {
        let module = block(vec![
            function("id", &["x"], &["y"], vec![assign(&["y"], ident("x"))]),
            nested(vec![let_(&["r"], Some(call("id", vec![number("5")])))]),
        ]);
        let settings = OptimiserSettings {
            reserved_names: vec!["id_x".to_string()],
            ..OptimiserSettings::default()
        };

        let output = optimise(module, &settings).expect("optimise");
        assert_eq!(
            output.statements[1].to_string(),
            "{\n    let id_x_1 := 5\n    let id_y\n    {\n        id_y := id_x_1\n    }\n    let r := id_y\n}"
        );
    }

    #[test]
    fn no_steps_leaves_module_untouched() {
        let module = block(vec![
            function("id", &["x"], &["y"], vec![assign(&["y"], ident("x"))]),
            nested(vec![let_(&["r"], Some(call("id", vec![number("5")])))]),
        ]);
        let settings = OptimiserSettings {
            steps: Vec::new(),
            ..OptimiserSettings::default()
        };

        assert_eq!(optimise(module.clone(), &settings).expect("optimise"), module);
    }

    #[test]
    fn optimiser_errors_are_wrapped() {
        let module = block(vec![nested(vec![expr_stmt(call("missing", vec![]))])]);

        let err = optimise(module, &OptimiserSettings::default()).expect_err("unknown callee");
        assert!(matches!(
            err,
            DriverError::Optimiser(OptimiserError::UnknownFunction { .. })
        ));
        assert_eq!(
            err.to_string(),
            "Optimiser error: call to unknown function `missing`"
        );
    }
}
