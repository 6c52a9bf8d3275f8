use std::{error::Error, path::PathBuf};

use opf_metrics::{config::EvalConfig, dataset::load_label_pairs, MetricsReport};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "opf_metrics=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("eval.json"));
    let config = EvalConfig::load_from_file(&mut std::fs::File::open(&config_path)?)?;

    // Load every (label, prediction) pair in memory
    let (labels, preds) = load_label_pairs(
        &config.dataset,
        config.label_column,
        config.prediction_column,
    )?;

    let report = MetricsReport::evaluate(&labels, &preds)?;

    println!("Samples: {}, classes: {}", report.n_samples, report.n_classes);
    println!("Accuracy: {}", report.accuracy);
    println!("OPF accuracy: {}", report.opf_accuracy);
    println!("Purity: {}", report.purity);

    if let Some(path) = &config.report {
        report.save_to_file(&mut std::fs::File::create(path)?)?;
        tracing::info!("Report saved to: {}.", path.display());
    }

    Ok(())
}
