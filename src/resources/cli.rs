use std::path::PathBuf;

use bevy::prelude::*;

/// Command-line arguments parsed at startup.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct CliArgs {
    /// Region JSON to paint instead of the bundled outlines.
    /// Usage: `cargo run -- --regions <path>`
    pub regions: Option<PathBuf>,

    /// Fixed RNG seed for reproducible sample attributes.
    /// Usage: `cargo run -- --seed 42`
    pub seed: Option<u64>,

    /// Replacement reveal script, e.g. `--text "Hi {ni hao|你好}"`.
    pub text: Option<String>,

    /// Settings file to read instead of the platform default.
    pub settings: Option<PathBuf>,
}

impl CliArgs {
    /// Parse the process arguments.
    pub fn parse() -> Self {
        Self::parse_from(std::env::args().skip(1))
    }

    /// Parse an argument list that excludes the program name.
    /// Supports:
    /// - `--regions <path>`
    /// - `--seed <u64>`
    /// - `--text <string>`
    /// - `--settings <path>`
    pub fn parse_from<I>(args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut cli = CliArgs::default();

        let mut i = 0;
        while i < args.len() {
            let flag = args[i].as_str();
            let value = args.get(i + 1);
            match (flag, value) {
                ("--regions", Some(path)) => {
                    info!("CLI: Painting regions from '{}'", path);
                    cli.regions = Some(PathBuf::from(path));
                    i += 2;
                }
                ("--seed", Some(raw)) => {
                    match raw.parse::<u64>() {
                        Ok(seed) => cli.seed = Some(seed),
                        Err(_) => warn!("CLI: --seed expects an unsigned integer, got '{}'", raw),
                    }
                    i += 2;
                }
                ("--text", Some(text)) => {
                    cli.text = Some(text.clone());
                    i += 2;
                }
                ("--settings", Some(path)) => {
                    cli.settings = Some(PathBuf::from(path));
                    i += 2;
                }
                ("--regions" | "--seed" | "--text" | "--settings", None) => {
                    warn!("CLI: {} requires an argument", flag);
                    i += 1;
                }
                (arg, _) => {
                    if arg.starts_with('-') {
                        warn!("CLI: Unknown argument '{}'", arg);
                    }
                    i += 1;
                }
            }
        }

        cli
    }
}
