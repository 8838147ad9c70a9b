use crate::domain::errors::ModelError;
use crate::domain::health::features::{ClinicalRecord, FeatureVector};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::warn;

/// Threshold applied to the raw `output` column to get a binary label.
pub const LABEL_THRESHOLD: f64 = 0.5;

/// One row of the heart dataset. Columns not listed here (chol, fbs, caa,
/// thall) are ignored.
#[derive(Debug, Deserialize)]
struct HeartRecord {
    age: f64,
    sex: f64,
    cp: f64,
    trtbps: f64,
    restecg: f64,
    thalachh: f64,
    exng: f64,
    oldpeak: f64,
    slp: f64,
    output: f64,
}

impl HeartRecord {
    fn to_clinical(&self) -> ClinicalRecord {
        ClinicalRecord {
            age: self.age,
            sex: self.sex,
            chest_pain_type: self.cp,
            resting_bp: self.trtbps,
            resting_ecg: self.restecg,
            max_heart_rate: self.thalachh,
            exercise_angina: self.exng,
            st_depression: self.oldpeak,
            slope: self.slp,
        }
    }

    fn label(&self) -> i32 {
        if self.output >= LABEL_THRESHOLD { 1 } else { 0 }
    }
}

/// Labeled feature rows ready for scaling and fitting.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub features: Vec<Vec<f64>>,
    pub labels: Vec<i32>,
}

impl Dataset {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let file = File::open(path).map_err(|e| ModelError::DatasetUnavailable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut dataset = Dataset::default();

        for (line, result) in rdr.deserialize::<HeartRecord>().enumerate() {
            let record = result.map_err(|e| ModelError::Training {
                reason: format!("Invalid dataset row {}: {}", line + 1, e),
            })?;

            // cardio_stress divides by thalachh
            if record.thalachh <= 0.0 {
                warn!("Skipping dataset row {}: thalachh is {}", line + 1, record.thalachh);
                continue;
            }

            let features = FeatureVector::from_record(&record.to_clinical());
            dataset.features.push(features.to_vec());
            dataset.labels.push(record.label());
        }

        if dataset.is_empty() {
            return Err(ModelError::EmptyDataset);
        }
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Count of rows per label, in label order.
    pub fn class_counts(&self) -> BTreeMap<i32, usize> {
        let mut counts = BTreeMap::new();
        for label in &self.labels {
            *counts.entry(*label).or_insert(0) += 1;
        }
        counts
    }

    /// Split into `(train, test)` keeping each label's share in both halves.
    pub fn stratified_split(&self, test_fraction: f64, seed: u64) -> (Dataset, Dataset) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut by_label: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
        for (idx, label) in self.labels.iter().enumerate() {
            by_label.entry(*label).or_default().push(idx);
        }

        let mut train_idx = Vec::with_capacity(self.len());
        let mut test_idx = Vec::new();
        for indices in by_label.values_mut() {
            indices.shuffle(&mut rng);
            let n_test = (indices.len() as f64 * test_fraction).round() as usize;
            // keep at least one row of every class in the training half
            let n_test = n_test.min(indices.len().saturating_sub(1));
            test_idx.extend_from_slice(&indices[..n_test]);
            train_idx.extend_from_slice(&indices[n_test..]);
        }
        train_idx.shuffle(&mut rng);
        test_idx.shuffle(&mut rng);

        (self.select(&train_idx), self.select(&test_idx))
    }

    fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
age,sex,cp,trtbps,chol,fbs,restecg,thalachh,exng,oldpeak,slp,caa,thall,output
63,1,3,145,233,1,0,150,0,2.3,0,0,1,1
37,1,2,130,250,0,1,187,0,3.5,0,0,2,1
41,0,1,130,204,0,0,172,0,1.4,2,0,2,1
56,1,1,120,236,0,1,178,0,0.8,2,0,2,1
57,0,0,120,354,0,1,163,1,0.6,2,0,2,0
57,1,0,140,192,0,1,148,0,0.4,1,0,1,0
56,0,1,140,294,0,0,153,0,1.3,1,0,2,0
44,1,1,120,263,0,1,0,0,0,2,0,3,0
52,1,2,172,199,1,1,162,0,0.5,2,0,3,0
";

    #[test]
    fn test_parses_rows_and_derives_cardio_stress() {
        let dataset = Dataset::from_reader(CSV.as_bytes()).unwrap();

        // row with thalachh == 0 is skipped
        assert_eq!(dataset.len(), 8);
        let first = &dataset.features[0];
        assert_eq!(first.len(), 10);
        assert_eq!(first[0], 63.0);
        assert_eq!(first[5], 150.0);
        assert!((first[9] - 145.0 / 150.0).abs() < 1e-12);
        assert_eq!(dataset.labels[0], 1);
    }

    #[test]
    fn test_binarizes_target() {
        let csv = "age,sex,cp,trtbps,restecg,thalachh,exng,oldpeak,slp,output\n\
                   50,1,0,120,1,150,0,0.5,1,0.49\n\
                   50,1,0,120,1,150,0,0.5,1,0.5\n";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.labels, vec![0, 1]);
    }

    #[test]
    fn test_stratified_split_keeps_class_balance() {
        let dataset = Dataset::from_reader(CSV.as_bytes()).unwrap();
        let (train, test) = dataset.stratified_split(0.25, 42);

        assert_eq!(train.len() + test.len(), dataset.len());
        assert_eq!(test.class_counts().get(&0), Some(&1));
        assert_eq!(test.class_counts().get(&1), Some(&1));
        assert_eq!(train.class_counts().len(), 2);
    }

    #[test]
    fn test_split_is_deterministic_for_seed() {
        let dataset = Dataset::from_reader(CSV.as_bytes()).unwrap();
        let (a, _) = dataset.stratified_split(0.2, 7);
        let (b, _) = dataset.stratified_split(0.2, 7);
        assert_eq!(a.labels, b.labels);
        assert_eq!(a.features, b.features);
    }

    #[test]
    fn test_missing_file_is_dataset_unavailable() {
        let err = Dataset::load(Path::new("/nonexistent/heart.csv")).unwrap_err();
        assert!(matches!(err, ModelError::DatasetUnavailable { .. }));
    }

    #[test]
    fn test_header_only_is_empty() {
        let csv = "age,sex,cp,trtbps,restecg,thalachh,exng,oldpeak,slp,output\n";
        assert!(matches!(
            Dataset::from_reader(csv.as_bytes()),
            Err(ModelError::EmptyDataset)
        ));
    }
}
