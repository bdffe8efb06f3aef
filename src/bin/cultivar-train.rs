//! Offline trainer: fetch or read the wine CSV, fit the classifier, write `model.json`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use cultivar::config::{self, AppConfig};
use cultivar::dataset::{self, fetch_dataset};
use cultivar::labels::class_label;
use cultivar::logging;
use cultivar::ml::naive_bayes::{LabeledRow, save_json, train};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Clone, Default)]
struct CliOptions {
    data: Option<PathBuf>,
    url: Option<String>,
    out: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    if let Err(err) = logging::init("cultivar-train") {
        eprintln!("Logging disabled: {err}");
    }
    let config = config::load_or_default(options.config.as_deref()).map_err(|err| err.to_string())?;
    let rows = load_rows(&options, &config)?;
    report_classes(&rows);

    let model = train(&rows).map_err(|err| format!("Training failed: {err}"))?;
    tracing::info!("Training complete (Gaussian Naive Bayes parameters calculated)");

    let out = options.out.unwrap_or(config.model_path);
    save_json(&out, &model).map_err(|err| err.to_string())?;
    println!("Model saved to {}", out.display());
    Ok(())
}

fn load_rows(options: &CliOptions, config: &AppConfig) -> Result<Vec<LabeledRow>, String> {
    if let Some(path) = &options.data {
        tracing::info!("Reading dataset from {}", path.display());
        return dataset::load_csv(path).map_err(|err| err.to_string());
    }
    let mut download = config.dataset.download_options();
    if let Some(url) = &options.url {
        download.url = url.clone();
    }
    let text = fetch_dataset(&download).map_err(|err| err.to_string())?;
    dataset::parse_csv(&text).map_err(|err| err.to_string())
}

fn report_classes(rows: &[LabeledRow]) {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for row in rows {
        *counts.entry(row.class_id).or_default() += 1;
    }
    println!("Data parsed. Found classes: {:?}", counts.keys().collect::<Vec<_>>());
    for (&class_id, &count) in &counts {
        tracing::info!(class_id, rows = count, "{}", class_label(class_id));
    }
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--data" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--data requires a value".to_string())?;
                options.data = Some(PathBuf::from(value));
            }
            "--url" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--url requires a value".to_string())?;
                options.url = Some(value.clone());
            }
            "--out" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--out requires a value".to_string())?;
                options.out = Some(PathBuf::from(value));
            }
            "--config" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--config requires a value".to_string())?;
                options.config = Some(PathBuf::from(value));
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }
    if options.data.is_some() && options.url.is_some() {
        return Err("--data and --url are mutually exclusive".to_string());
    }
    Ok(options)
}

fn help_text() -> String {
    [
        "cultivar-train",
        "",
        "Fits the Gaussian Naive Bayes wine classifier and writes its parameters as JSON.",
        "",
        "Usage:",
        "  cultivar-train [--data <wine.data> | --url <url>] [--out model.json] [--config <file>]",
        "",
        "Options:",
        "  --data <file>    Local CSV (class id, then 13 measurements per line).",
        "  --url <url>      Download the CSV from this URL instead of the configured one.",
        "  --out <file>     Output model path (default: model_path from config, model.json).",
        "  --config <file>  TOML config file.",
    ]
    .join("\n")
}
