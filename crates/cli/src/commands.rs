//! Clap command tree.

use clap::{value_parser, Arg, ArgAction, Command};

/// Default `--alpha-par` for the command line.
pub const CLI_ALPHA_PAR: f32 = 0.25;
/// Default `--alpha-orth` for the command line.
pub const CLI_ALPHA_ORTH: f32 = 0.50;

/// Build the `orbit` command.
///
/// Blend parameters carry no clap defaults so a `--config` file can supply
/// values that explicit flags still override; defaults are applied in
/// [`crate::parse`].
pub fn build_cli() -> Command {
    Command::new("orbit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("ORBIT merge: inject B's orthogonal novelty into A.")
        .arg(
            Arg::new("modela")
                .long("modela")
                .value_name("PATH")
                .required(true)
                .help("Path to base model A (.safetensors)"),
        )
        .arg(
            Arg::new("modelb")
                .long("modelb")
                .value_name("PATH")
                .required(true)
                .help("Path to donor model B (.safetensors)"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("PATH")
                .required(true)
                .help("Output path for merged model"),
        )
        .arg(
            Arg::new("alpha-par")
                .long("alpha-par")
                .value_name("F")
                .value_parser(value_parser!(f32))
                .allow_negative_numbers(true)
                .help(format!(
                    "Weight for parallel adjustment toward B (default: {:.2})",
                    CLI_ALPHA_PAR
                )),
        )
        .arg(
            Arg::new("alpha-orth")
                .long("alpha-orth")
                .value_name("F")
                .value_parser(value_parser!(f32))
                .allow_negative_numbers(true)
                .help(format!(
                    "Weight for orthogonal infusion from B (default: {:.2})",
                    CLI_ALPHA_ORTH
                )),
        )
        .arg(
            Arg::new("trust-k")
                .long("trust-k")
                .value_name("F")
                .value_parser(value_parser!(f32))
                .help("MAD trust radius multiplier (default: 3.0)"),
        )
        .arg(
            Arg::new("eps")
                .long("eps")
                .value_name("F")
                .value_parser(value_parser!(f32))
                .help("Numerical epsilon (default: 1e-8)"),
        )
        .arg(
            Arg::new("coef-clip")
                .long("coef-clip")
                .value_name("F")
                .value_parser(value_parser!(f32))
                .allow_negative_numbers(true)
                .help("Clamp for projection coefficient (default: 8.0; 0 disables)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("JSON file with blend parameters; flags take precedence"),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .short('j')
                .value_name("N")
                .value_parser(value_parser!(u64).range(1..))
                .help("Worker threads (default: all cores)"),
        )
        .arg(
            Arg::new("no-metadata")
                .long("no-metadata")
                .action(ArgAction::SetTrue)
                .help("Do not copy model A's metadata into the output"),
        )
        .arg(
            Arg::new("no-progress")
                .long("no-progress")
                .action(ArgAction::SetTrue)
                .help("Disable the progress spinner"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the merge summary as JSON"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count)
                .help("More log output (-v info, -vv debug)"),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .help("Only log errors"),
        )
}
