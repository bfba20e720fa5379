//! Lumina headless application: argument handling and script replay.

pub mod script;

use lumina_core::{EditorConfig, ExportOptions};
use script::{ScriptError, Session, format_for_path, parse_script};
use std::path::PathBuf;

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub script: PathBuf,
    pub config: Option<PathBuf>,
    pub out: Option<PathBuf>,
}

pub const USAGE: &str = "usage: lumina <script.json> [--config file] [--out file]";

impl Args {
    /// Parse arguments, excluding the program name.
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
        let mut script = None;
        let mut config = None;
        let mut out = None;
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => config = Some(args.next().ok_or("--config needs a file")?.into()),
                "--out" => out = Some(args.next().ok_or("--out needs a file")?.into()),
                flag if flag.starts_with("--") => return Err(format!("unknown flag '{flag}'")),
                _ if script.is_none() => script = Some(PathBuf::from(arg)),
                _ => return Err(format!("unexpected argument '{arg}'")),
            }
        }
        Ok(Self {
            script: script.ok_or("missing script file")?,
            config,
            out,
        })
    }
}

/// Replay the script and write the final export, if requested.
pub fn run(args: &Args) -> Result<Session, ScriptError> {
    let config = match &args.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let json = std::fs::read_to_string(&args.script)
        .map_err(|e| ScriptError::Io(format!("{}: {e}", args.script.display())))?;
    let actions = parse_script(&json)?;
    log::info!("Replaying {} actions from {}", actions.len(), args.script.display());

    let mut session = Session::new(config)?;
    session.run(&actions)?;

    if let Some(out) = &args.out {
        let options = ExportOptions {
            format: format_for_path(out),
            ..Default::default()
        };
        session.export_to(out, &options)?;
    }
    Ok(session)
}
