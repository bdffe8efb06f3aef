//! Machine learning building blocks: the Naive Bayes classifier and evaluation metrics.

pub mod metrics;
pub mod naive_bayes;
