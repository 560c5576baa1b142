//! `orbit`: merge two SafeTensors models with the ORBIT blend.
//!
//! ```text
//! orbit --modela base.safetensors --modelb donor.safetensors -o merged.safetensors
//! ```
//!
//! Logs go to stderr (`RUST_LOG`, or `-v`/`-q`); the result goes to stdout.

mod commands;
mod format;
mod parse;
mod spinner;

use std::process;

use orbit_merge::{merge_files, MergeObserver, NoopObserver};
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use format::{format_error, format_summary};
use parse::{matches_to_request, MergeRequest, Verbosity};
use spinner::{params_label, Spinner};

fn main() {
    let matches = build_cli().get_matches();

    let request = match matches_to_request(&matches) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("(error) {}", e);
            process::exit(1);
        }
    };

    init_logging(request.verbosity);
    process::exit(run(&request));
}

fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(request: &MergeRequest) -> i32 {
    let params = request.options.params;
    let mut spinner = if request.progress {
        Spinner::start(
            "orbit",
            params_label(params.alpha_par, params.alpha_orth, params.trust_k),
        )
    } else {
        Spinner::disabled()
    };

    let observer: &dyn MergeObserver = if request.progress {
        &spinner
    } else {
        &NoopObserver
    };
    let result = merge_files(
        &request.model_a,
        &request.model_b,
        &request.output,
        &request.options,
        observer,
    );
    spinner.finish();

    match result {
        Ok(summary) => {
            println!("{}", format_summary(&request.output, &summary, request.mode));
            if summary.has_issues() {
                tracing::warn!(
                    missing_in_b = summary.tensors_missing_in_b,
                    dropped = summary.tensors_dropped,
                    fallback_elements = summary.elements_fallback,
                    "models did not line up cleanly"
                );
            }
            0
        }
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string(), request.mode));
            1
        }
    }
}
