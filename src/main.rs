//! Entry point for the egui wine cultivar form.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use std::path::PathBuf;
use std::sync::Arc;

use cultivar::serving::ModelSource;
use cultivar::{config, logging, ui};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    if let Err(err) = logging::init("cultivar") {
        eprintln!("Logging disabled: {err}");
    }
    let config_path = parse_args(std::env::args().skip(1).collect())?;
    let config = config::load_or_default(config_path.as_deref()).map_err(|err| err.to_string())?;
    tracing::info!("Model path: {}", config.model_path.display());
    let source = Arc::new(ModelSource::new(config.model_path));
    ui::run(source).map_err(|err| format!("UI failed: {err}"))
}

fn parse_args(args: Vec<String>) -> Result<Option<PathBuf>, String> {
    let mut config = None;
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--config" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--config requires a value".to_string())?;
                config = Some(PathBuf::from(value));
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }
    Ok(config)
}

fn help_text() -> String {
    [
        "cultivar",
        "",
        "Open the wine cultivar prediction form.",
        "",
        "Usage:",
        "  cultivar [--config <cultivar.toml>]",
        "",
        "The model file comes from `model_path` in the config (default model.json).",
    ]
    .join("\n")
}
