//! HTTP endpoint for wine cultivar predictions.

use std::path::PathBuf;
use std::sync::Arc;

use cultivar::serving::ModelSource;
use cultivar::{config, logging, server};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Clone, Default)]
struct CliOptions {
    config: Option<PathBuf>,
    bind: Option<String>,
    model: Option<PathBuf>,
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    if let Err(err) = logging::init("cultivar-serve") {
        eprintln!("Logging disabled: {err}");
    }
    let config = config::load_or_default(options.config.as_deref()).map_err(|err| err.to_string())?;
    let model_path = options.model.unwrap_or(config.model_path);
    let bind = options.bind.unwrap_or(config.server.bind);

    let source = Arc::new(ModelSource::new(model_path));
    if let Some(path) = source.path() {
        tracing::info!("Serving predictions from {}", path.display());
    }
    if let Err(err) = source.try_load() {
        tracing::warn!("{err}; requests will retry loading. Run cultivar-train first.");
    }
    server::run_blocking(&bind, source).map_err(|err| err.to_string())
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--config" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--config requires a value".to_string())?;
                options.config = Some(PathBuf::from(value));
            }
            "--bind" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--bind requires a value".to_string())?;
                options.bind = Some(value.clone());
            }
            "--model" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--model requires a value".to_string())?;
                options.model = Some(PathBuf::from(value));
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }
    Ok(options)
}

fn help_text() -> String {
    [
        "cultivar-serve",
        "",
        "Serves the prediction form and the JSON /predict endpoint.",
        "",
        "Usage:",
        "  cultivar-serve [--bind 127.0.0.1:5000] [--model model.json] [--config <file>]",
        "",
        "Routes:",
        "  GET  /         HTML form",
        "  POST /predict  JSON body with the 13 feature keys",
        "  GET  /health   Liveness and model status",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bind_and_model() {
        let args = ["--bind", "0.0.0.0:8080", "--model", "m.json"]
            .iter()
            .map(|value| value.to_string())
            .collect();
        let options = parse_args(args).unwrap();
        assert_eq!(options.bind.as_deref(), Some("0.0.0.0:8080"));
        assert_eq!(options.model, Some(PathBuf::from("m.json")));
    }

    #[test]
    fn unknown_argument_includes_help() {
        let err = parse_args(vec!["--port".to_string()]).unwrap_err();
        assert!(err.starts_with("Unknown argument: --port"));
        assert!(err.contains("cultivar-serve"));
    }
}
