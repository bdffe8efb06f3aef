//! Evaluate a saved cultivar model against a labeled CSV.

use std::path::PathBuf;

use cultivar::dataset::load_csv;
use cultivar::labels::class_label;
use cultivar::ml::metrics::{ConfusionMatrix, accuracy, precision_recall_by_class};
use cultivar::ml::naive_bayes::load_json;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Clone)]
struct CliOptions {
    model_path: PathBuf,
    data_path: PathBuf,
    top: usize,
}

#[derive(Debug, Clone)]
struct MisclassifiedRow {
    line: usize,
    truth: u32,
    predicted: u32,
    confidence: f64,
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    let model = load_json(&options.model_path).map_err(|err| err.to_string())?;
    let rows = load_csv(&options.data_path).map_err(|err| err.to_string())?;

    let mut cm = ConfusionMatrix::new(model.class_ids().collect());
    let mut misclassified = Vec::new();
    let mut skipped = 0usize;
    for (idx, row) in rows.iter().enumerate() {
        let prediction = model
            .predict(&row.features)
            .map_err(|err| format!("Row {}: {err}", idx + 1))?;
        if !cm.add(row.class_id, prediction.class_id) {
            skipped += 1;
            continue;
        }
        if prediction.class_id != row.class_id {
            misclassified.push(MisclassifiedRow {
                line: idx + 1,
                truth: row.class_id,
                predicted: prediction.class_id,
                confidence: prediction.confidence,
            });
        }
    }

    println!("accuracy: {:.4}", accuracy(&cm));
    if skipped > 0 {
        println!("skipped {skipped} row(s) with classes unknown to the model");
    }
    for stats in precision_recall_by_class(&cm) {
        println!(
            "class {:>2} {:<28}  precision={:.3}  recall={:.3}  f1={:.3}  support={}",
            stats.class_id,
            class_label(stats.class_id),
            stats.precision,
            stats.recall,
            stats.f1(),
            stats.support
        );
    }
    println!("confusion matrix (rows=true, cols=pred):");
    for truth in 0..cm.n_classes() {
        let mut row = String::new();
        for pred in 0..cm.n_classes() {
            row.push_str(&format!("{:6}", cm.get(truth, pred)));
        }
        println!("{row}");
    }

    if !misclassified.is_empty() {
        println!();
        println!("Top misclassified rows (highest confidence):");
        misclassified.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        for item in misclassified.iter().take(options.top) {
            println!(
                "- row {}  truth={}  pred={}  conf={:.2}%",
                item.line, item.truth, item.predicted, item.confidence
            );
        }
    }
    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut model_path = PathBuf::from("model.json");
    let mut data_path: Option<PathBuf> = None;
    let mut top = 10usize;

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--model" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--model requires a value".to_string())?;
                model_path = PathBuf::from(value);
            }
            "--data" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--data requires a value".to_string())?;
                data_path = Some(PathBuf::from(value));
            }
            "--top" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--top requires a value".to_string())?;
                top = value
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid --top value: {value}"))?;
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }

    let data_path = data_path.ok_or_else(|| "--data is required".to_string())?;
    Ok(CliOptions {
        model_path,
        data_path,
        top,
    })
}

fn help_text() -> String {
    [
        "cultivar-eval",
        "",
        "Reports accuracy, per-class precision/recall and the confusion matrix of a saved model.",
        "",
        "Usage:",
        "  cultivar-eval --data <wine.data> [--model model.json] [--top <n>]",
        "",
        "Options:",
        "  --data <file>   Labeled CSV in training format (required).",
        "  --model <file>  Model JSON (default: model.json).",
        "  --top <n>       Misclassified rows to list (default: 10).",
    ]
    .join("\n")
}
