//! egui form shell: thirteen numeric inputs and a predict button.

pub mod style;

use std::sync::Arc;

use eframe::egui::{self, RichText, ScrollArea};

use crate::features::{FEATURE_COUNT, FEATURE_LABELS};
use crate::labels::class_label;
use crate::ml::naive_bayes::StoreError;
use crate::serving::{ModelSource, format_confidence};

pub const WINDOW_TITLE: &str = "Wine Cultivar Prediction System";

/// Result line shown under the form after the last submit.
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    Predicted { label: String, confidence: String },
    Failed(String),
}

pub struct CultivarForm {
    source: Arc<ModelSource>,
    values: [f64; FEATURE_COUNT],
    startup_notice: Option<String>,
    outcome: Option<FormOutcome>,
}

impl CultivarForm {
    /// Build the form and attempt the initial model load.
    pub fn new(source: Arc<ModelSource>) -> Self {
        let startup_notice = match source.try_load() {
            Ok(_) => None,
            Err(StoreError::NotFound { .. }) => Some("Model file not found.".to_string()),
            Err(err) => {
                tracing::warn!("Initial model load failed: {err}");
                Some(err.to_string())
            }
        };
        Self {
            source,
            values: [0.0; FEATURE_COUNT],
            startup_notice,
            outcome: None,
        }
    }

    pub fn values_mut(&mut self) -> &mut [f64; FEATURE_COUNT] {
        &mut self.values
    }

    pub fn startup_notice(&self) -> Option<&str> {
        self.startup_notice.as_deref()
    }

    pub fn outcome(&self) -> Option<&FormOutcome> {
        self.outcome.as_ref()
    }

    /// Classify the current inputs, as the "Predict Cultivar" button does.
    pub fn submit(&mut self) -> &FormOutcome {
        let state = self.source.current();
        let outcome = if !state.is_loaded() {
            FormOutcome::Failed("Model not loaded.".to_string())
        } else {
            match state.predict(&self.values) {
                Ok(prediction) => FormOutcome::Predicted {
                    label: class_label(prediction.class_id),
                    confidence: format_confidence(prediction.confidence),
                },
                Err(err) => FormOutcome::Failed(err.to_string()),
            }
        };
        if state.is_loaded() {
            self.startup_notice = None;
        }
        self.outcome.insert(outcome)
    }

    fn render_inputs(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("wine_features")
            .num_columns(2)
            .spacing([16.0, 6.0])
            .striped(true)
            .show(ui, |ui| {
                for (label, value) in FEATURE_LABELS.iter().zip(self.values.iter_mut()) {
                    ui.label(*label);
                    ui.add(egui::DragValue::new(value).speed(0.01).max_decimals(4));
                    ui.end_row();
                }
            });
    }

    fn render_outcome(&self, ui: &mut egui::Ui) {
        let palette = style::palette();
        match &self.outcome {
            Some(FormOutcome::Predicted { label, confidence }) => {
                ui.label(
                    RichText::new(format!("Prediction: {label}"))
                        .color(palette.success)
                        .strong(),
                );
                ui.label(format!("Confidence: {confidence}"));
            }
            Some(FormOutcome::Failed(message)) => {
                ui.label(RichText::new(message).color(palette.warning));
            }
            None => {}
        }
    }
}

impl eframe::App for CultivarForm {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let palette = style::palette();
            ui.heading(WINDOW_TITLE);
            ui.label(
                RichText::new("Predicts the wine cultivar using a Naive Bayes model.")
                    .color(palette.text_muted),
            );
            if let Some(notice) = &self.startup_notice {
                ui.label(RichText::new(notice).color(palette.warning));
            }
            ui.separator();
            ui.label(RichText::new("Enter Wine Chemical Properties").strong());
            ScrollArea::vertical().show(ui, |ui| {
                self.render_inputs(ui);
                ui.add_space(8.0);
                if ui.button("Predict Cultivar").clicked() {
                    self.submit();
                }
                ui.add_space(8.0);
                self.render_outcome(ui);
            });
        });
    }
}

/// Open the native window; blocks until it is closed.
pub fn run(source: Arc<ModelSource>) -> eframe::Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 720.0])
            .with_min_inner_size([360.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        WINDOW_TITLE,
        native_options,
        Box::new(move |cc| {
            let mut visuals = cc.egui_ctx.style().visuals.clone();
            style::apply_visuals(&mut visuals);
            cc.egui_ctx.set_visuals(visuals);
            Ok(Box::new(CultivarForm::new(source)))
        }),
    )
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::ml::naive_bayes::{self, ClassStat, NaiveBayesModel};
    use tempfile::tempdir;

    fn tiny_model() -> NaiveBayesModel {
        NaiveBayesModel::from_classes(BTreeMap::from([
            (1, BTreeMap::from([(0, ClassStat { mean: 13.0, stdev: 0.5 })])),
            (2, BTreeMap::from([(0, ClassStat { mean: 12.0, stdev: 0.5 })])),
        ]))
    }

    #[test]
    fn missing_model_file_is_reported_without_panicking() {
        let dir = tempdir().unwrap();
        let mut form = CultivarForm::new(Arc::new(ModelSource::new(dir.path().join("model.json"))));
        assert_eq!(form.startup_notice(), Some("Model file not found."));
        assert_eq!(
            form.submit(),
            &FormOutcome::Failed("Model not loaded.".to_string())
        );
    }

    #[test]
    fn submit_reports_label_and_confidence() {
        let mut form = CultivarForm::new(Arc::new(ModelSource::from_model(tiny_model())));
        assert_eq!(form.startup_notice(), None);
        form.values_mut()[0] = 12.0;
        match form.submit() {
            FormOutcome::Predicted { label, confidence } => {
                assert_eq!(label, "Cultivar 2 (e.g. Grignolino)");
                assert!(confidence.ends_with('%'));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn model_trained_after_launch_is_picked_up() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        let mut form = CultivarForm::new(Arc::new(ModelSource::new(&path)));
        naive_bayes::save_json(&path, &tiny_model()).unwrap();
        form.values_mut()[0] = 13.0;
        assert!(matches!(form.submit(), FormOutcome::Predicted { .. }));
        assert_eq!(form.startup_notice(), None);
        assert!(form.outcome().is_some());
    }
}
