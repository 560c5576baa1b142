//! ArgMatches → MergeRequest conversion.
//!
//! Blend parameters resolve in three layers, highest first:
//! - explicit command-line flags
//! - the `--config` JSON file
//! - command-line defaults (`--alpha-par 0.25`, `--alpha-orth 0.50`, the
//!   library defaults for the rest)

use std::path::{Path, PathBuf};

use clap::ArgMatches;
use orbit_core::BlendParams;
use orbit_merge::MergeOptions;
use serde::Deserialize;

use crate::commands::{CLI_ALPHA_ORTH, CLI_ALPHA_PAR};
use crate::format::OutputMode;

/// How much the CLI logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Info,
    Debug,
}

impl Verbosity {
    /// Default filter directive when `RUST_LOG` is unset.
    pub fn filter(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
        }
    }
}

/// Everything a merge run needs.
#[derive(Debug, Clone)]
pub struct MergeRequest {
    pub model_a: PathBuf,
    pub model_b: PathBuf,
    pub output: PathBuf,
    pub options: MergeOptions,
    pub mode: OutputMode,
    pub verbosity: Verbosity,
    pub progress: bool,
}

/// Blend parameters as they may appear in a config file; every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParamsFile {
    alpha_par: Option<f32>,
    alpha_orth: Option<f32>,
    trust_k: Option<f32>,
    eps: Option<f32>,
    coef_clip: Option<f32>,
}

/// Parameters used when neither a flag nor a config file sets a value.
pub fn cli_default_params() -> BlendParams {
    BlendParams::default()
        .with_alpha_par(CLI_ALPHA_PAR)
        .with_alpha_orth(CLI_ALPHA_ORTH)
}

/// Convert clap ArgMatches into a MergeRequest.
pub fn matches_to_request(matches: &ArgMatches) -> Result<MergeRequest, String> {
    let model_a = required_path(matches, "modela")?;
    let model_b = required_path(matches, "modelb")?;
    let output = required_path(matches, "output")?;

    let file = match matches.get_one::<String>("config") {
        Some(path) => load_params_file(Path::new(path))?,
        None => ParamsFile::default(),
    };
    let params = resolve_params(matches, &file);
    params
        .validate()
        .map_err(|e| format!("Invalid blend parameters: {}", e))?;

    let mut options = MergeOptions::new()
        .params(params)
        .keep_metadata(!matches.get_flag("no-metadata"));
    if let Some(&threads) = matches.get_one::<u64>("threads") {
        options = options.threads(threads as usize);
    }

    let mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let verbosity = if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else {
        match matches.get_count("verbose") {
            0 => Verbosity::Normal,
            1 => Verbosity::Info,
            _ => Verbosity::Debug,
        }
    };

    Ok(MergeRequest {
        model_a,
        model_b,
        output,
        options,
        mode,
        verbosity,
        progress: !matches.get_flag("no-progress") && mode == OutputMode::Human,
    })
}

fn required_path(matches: &ArgMatches, id: &str) -> Result<PathBuf, String> {
    matches
        .get_one::<String>(id)
        .map(PathBuf::from)
        .ok_or_else(|| format!("Missing --{}", id))
}

fn load_params_file(path: &Path) -> Result<ParamsFile, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config '{}': {}", path.display(), e))?;
    serde_json::from_str(&text)
        .map_err(|e| format!("Failed to parse config '{}': {}", path.display(), e))
}

fn resolve_params(matches: &ArgMatches, file: &ParamsFile) -> BlendParams {
    let base = cli_default_params();
    let pick = |id: &str, from_file: Option<f32>, default: f32| {
        matches
            .get_one::<f32>(id)
            .copied()
            .or(from_file)
            .unwrap_or(default)
    };

    BlendParams {
        alpha_par: pick("alpha-par", file.alpha_par, base.alpha_par),
        alpha_orth: pick("alpha-orth", file.alpha_orth, base.alpha_orth),
        trust_k: pick("trust-k", file.trust_k, base.trust_k),
        eps: pick("eps", file.eps, base.eps),
        coef_clip: pick("coef-clip", file.coef_clip, base.coef_clip),
    }
}
