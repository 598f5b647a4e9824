use crate::domain::errors::ModelError;
use crate::domain::market::IndicatorRow;
use crate::domain::ml::feature_registry::FeatureVector;
use crate::domain::ports::SignalClassifier;
use crate::infrastructure::persistence::IndicatorJsonStore;
use tracing::{info, warn};

/// Replaces each row's `signal` with the classifier's prediction. Rows
/// without a complete feature vector keep their rule signal. Returns the
/// number of rows rewritten.
pub fn annotate_rows(
    rows: &mut [IndicatorRow],
    classifier: &dyn SignalClassifier,
) -> Result<usize, ModelError> {
    let (indices, features): (Vec<usize>, Vec<FeatureVector>) = rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            FeatureVector::from_row(row)
                .filter(FeatureVector::is_finite)
                .map(|f| (i, f))
        })
        .unzip();

    let predictions = classifier.predict_batch(&features)?;
    for (i, signal) in indices.iter().zip(predictions) {
        rows[*i].signal = Some(signal);
    }
    Ok(indices.len())
}

/// Runs [`annotate_rows`] over every indicator file in the store.
pub fn annotate_store(
    store: &IndicatorJsonStore,
    classifier: &dyn SignalClassifier,
) -> Result<usize, ModelError> {
    let names = store.list().map_err(|e| ModelError::Prediction {
        reason: e.to_string(),
    })?;

    let mut files = 0;
    for name in names {
        let mut rows = match store.load(&name) {
            Ok(rows) => rows,
            Err(e) => {
                warn!(ticker = %name, error = %e, "Skipping indicator file");
                continue;
            }
        };
        let updated = annotate_rows(&mut rows, classifier)?;
        if let Err(e) = store.save(&name, &rows) {
            warn!(ticker = %name, error = %e, "Failed to rewrite indicator file");
            continue;
        }
        info!(ticker = %name, updated, model = classifier.name(), "Annotated with model signals");
        files += 1;
    }
    Ok(files)
}
