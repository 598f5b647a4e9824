// Signal classifier: labelling, training, inference
pub mod annotate;
pub mod labeling;
pub mod scaler;
pub mod smartcore_predictor;
pub mod trainer;

pub use smartcore_predictor::{ModelArtifact, SmartCorePredictor};
pub use trainer::{ClassificationReport, ModelTrainer};
