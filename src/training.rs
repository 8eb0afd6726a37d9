//! Random forest training over cleaned listings

use std::collections::BTreeMap;

use polars::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use smartcore::ensemble::random_forest_classifier::*;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::metrics::accuracy;
use smartcore::tree::decision_tree_classifier::SplitCriterion;
use tracing::{debug, info, warn};

use crate::error::{PipelineError, Result};
use crate::features::{encode_table, feature_matrix, feature_rows, target_labels};
use crate::io::DataLoader;
use crate::model_store::ModelStore;

pub type PriceModel = RandomForestClassifier<f64, u8, DenseMatrix<f64>, Vec<u8>>;

#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Share of rows held out for evaluation.
    pub test_size: f64,
    pub split_seed: u64,
    pub n_trees: u16,
    pub seed: u64,
    /// Oversample minority categories up to the majority count before fitting.
    pub balance_classes: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_size: 0.15,
            split_seed: 1,
            n_trees: 500,
            seed: 0,
            balance_classes: true,
        }
    }
}

/// Shuffles rows with a seeded generator and splits off `test_size` of them.
pub fn train_test_split(
    df: &DataFrame,
    test_size: f64,
    seed: u64,
) -> Result<(DataFrame, DataFrame)> {
    let mut indices: Vec<IdxSize> = (0..df.height() as IdxSize).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = (df.height() as f64 * test_size).ceil() as usize;
    let (test_indices, train_indices) = indices.split_at(n_test.min(indices.len()));

    let train_df = df.take(&IdxCa::from_vec("", train_indices.to_vec()))?;
    let test_df = df.take(&IdxCa::from_vec("", test_indices.to_vec()))?;
    Ok((train_df, test_df))
}

/// Random oversampling so every category appears as often as the largest one.
pub fn balance_classes(
    mut x: Vec<Vec<f64>>,
    mut y: Vec<u8>,
    seed: u64,
) -> (Vec<Vec<f64>>, Vec<u8>) {
    let mut by_class: BTreeMap<u8, Vec<usize>> = BTreeMap::new();
    for (i, label) in y.iter().enumerate() {
        by_class.entry(*label).or_default().push(i);
    }
    let max_count = by_class.values().map(Vec::len).max().unwrap_or(0);

    let mut rng = StdRng::seed_from_u64(seed);
    for (label, indices) in &by_class {
        for _ in indices.len()..max_count {
            if let Some(&i) = indices.choose(&mut rng) {
                x.push(x[i].clone());
                y.push(*label);
            }
        }
    }
    (x, y)
}

/// Trains the price model from a cleaned listings table.
pub struct ListingTrainer {
    loader: Box<dyn DataLoader>,
    store: Box<dyn ModelStore>,
    config: TrainingConfig,
}

impl ListingTrainer {
    pub fn new(loader: Box<dyn DataLoader>, store: Box<dyn ModelStore>) -> Self {
        Self {
            loader,
            store,
            config: TrainingConfig::default(),
        }
    }

    pub fn with_config(mut self, config: TrainingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn load_data(&self) -> Result<DataFrame> {
        self.loader.load_data()
    }

    pub fn store_model(&self, model: &PriceModel) -> Result<()> {
        self.store.store_model(model)
    }

    pub fn run(&self) -> Result<PriceModel> {
        let data = self.load_data()?;
        let model = self.train(data)?;
        self.store_model(&model)?;
        Ok(model)
    }

    pub fn train(&self, data: DataFrame) -> Result<PriceModel> {
        let data = encode_table(data)?;
        let (train_df, test_df) =
            train_test_split(&data, self.config.test_size, self.config.split_seed)?;
        info!(
            "Split {} rows into {} training and {} held-out rows",
            data.height(),
            train_df.height(),
            test_df.height()
        );

        if train_df.height() == 0 {
            return Err(PipelineError::Training("no rows left to train on".to_string()));
        }

        let mut x = feature_rows(&train_df)?;
        let mut y = target_labels(&train_df)?;
        // The forest needs at least two categories to split on
        if y.iter().all(|&c| c == y[0]) {
            return Err(PipelineError::Training(format!(
                "every training row is in price category {}",
                y[0]
            )));
        }
        if self.config.balance_classes {
            let before = y.len();
            (x, y) = balance_classes(x, y, self.config.seed);
            debug!("Oversampled {} rows to balance categories", y.len() - before);
        }

        let params = RandomForestClassifierParameters {
            criterion: SplitCriterion::Gini,
            max_depth: None,
            min_samples_leaf: 1,
            min_samples_split: 2,
            n_trees: self.config.n_trees,
            m: None,
            keep_samples: false,
            seed: self.config.seed,
        };

        info!("Fitting random forest with {} trees", params.n_trees);
        let model = PriceModel::fit(&DenseMatrix::from_2d_vec(&x), &y, params)
            .map_err(|e| PipelineError::Training(e.to_string()))?;

        if test_df.height() > 0 {
            let y_test = target_labels(&test_df)?;
            let predictions = model
                .predict(&feature_matrix(&test_df)?)
                .map_err(|e| PipelineError::Training(e.to_string()))?;
            info!("Held-out accuracy: {:.3}", accuracy(&y_test, &predictions));
        } else {
            warn!("Held-out partition is empty, skipping evaluation");
        }

        Ok(model)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::encoding::{Neighbourhood, RoomType};
    use crate::io::CsvDataLoader;
    use crate::model_store::MsgpackModelStore;

    pub(crate) fn fitted_model() -> PriceModel {
        let x = DenseMatrix::from_2d_vec(&vec![
            vec![1.0, 1.0, 1.0, 1.0, 1.0],
            vec![2.0, 2.0, 1.0, 1.0, 2.0],
            vec![4.0, 3.0, 2.0, 2.0, 4.0],
            vec![6.0, 3.0, 3.0, 3.0, 5.0],
            vec![1.0, 2.0, 1.0, 1.0, 1.0],
            vec![3.0, 3.0, 1.5, 2.0, 4.0],
            vec![5.0, 3.0, 2.0, 3.0, 5.0],
            vec![8.0, 3.0, 3.5, 4.0, 5.0],
        ]);
        let y: Vec<u8> = vec![0, 0, 2, 3, 0, 1, 2, 3];
        let params = RandomForestClassifierParameters {
            criterion: SplitCriterion::Gini,
            max_depth: None,
            min_samples_leaf: 1,
            min_samples_split: 2,
            n_trees: 10,
            m: None,
            keep_samples: false,
            seed: 0,
        };
        PriceModel::fit(&x, &y, params).unwrap()
    }

    pub(crate) fn cleaned_listings(n: usize) -> DataFrame {
        let mut room_type = Vec::with_capacity(n);
        let mut neighbourhood = Vec::with_capacity(n);
        let mut accommodates = Vec::with_capacity(n);
        let mut bathrooms = Vec::with_capacity(n);
        let mut bedrooms = Vec::with_capacity(n);
        let mut category = Vec::with_capacity(n);

        for i in 0..n {
            let tier = (i % 4) as i64;
            room_type.push(RoomType::ALL[i % 4].label());
            neighbourhood.push(Neighbourhood::ALL[i % 5].label());
            accommodates.push(1 + tier * 2);
            bathrooms.push(1.0 + tier as f64 * 0.5);
            bedrooms.push(1 + tier);
            category.push(tier);
        }

        df!(
            "id" => (0..n as i64).collect::<Vec<_>>(),
            "neighbourhood" => neighbourhood,
            "room_type" => room_type,
            "accommodates" => accommodates,
            "bathrooms" => bathrooms,
            "bedrooms" => bedrooms,
            "category" => category,
        )
        .unwrap()
    }

    fn trainer(config: TrainingConfig) -> ListingTrainer {
        ListingTrainer::new(
            Box::new(CsvDataLoader::new("cleaned.csv").with_dropna(true)),
            Box::new(MsgpackModelStore::new("model.pkl")),
        )
        .with_config(config)
    }

    #[test]
    fn test_default_config() {
        let config = TrainingConfig::default();
        assert_eq!(config.n_trees, 500);
        assert_eq!(config.test_size, 0.15);
        assert!(config.balance_classes);
    }

    #[test]
    fn test_train_test_split_is_seeded() {
        let df = cleaned_listings(40);
        let (train_a, test_a) = train_test_split(&df, 0.15, 1).unwrap();
        let (train_b, test_b) = train_test_split(&df, 0.15, 1).unwrap();

        assert_eq!(test_a.height(), 6);
        assert_eq!(train_a.height(), 34);
        assert!(train_a.frame_equal(&train_b));
        assert!(test_a.frame_equal(&test_b));
    }

    #[test]
    fn test_balance_classes() {
        let x = vec![vec![0.0], vec![1.0], vec![2.0], vec![3.0]];
        let y = vec![0, 0, 0, 1];
        let (x, y) = balance_classes(x, y, 0);

        assert_eq!(x.len(), 6);
        assert_eq!(y.iter().filter(|&&c| c == 1).count(), 3);
        assert!(x[4..].iter().all(|row| row == &vec![3.0]));
    }

    #[test]
    fn test_train_predicts_categories() {
        let model = trainer(TrainingConfig::default())
            .train(cleaned_listings(40))
            .unwrap();

        let x = DenseMatrix::from_2d_vec(&vec![vec![1.0, 1.0, 1.0, 1.0, 1.0], vec![7.0, 4.0, 2.5, 4.0, 5.0]]);
        let predictions = model.predict(&x).unwrap();
        assert_eq!(predictions.len(), 2);
        assert!(predictions.iter().all(|&p| p <= 3));
    }

    #[test]
    fn test_train_is_deterministic() {
        let config = TrainingConfig {
            n_trees: 25,
            ..Default::default()
        };
        let a = trainer(config.clone()).train(cleaned_listings(40)).unwrap();
        let b = trainer(config).train(cleaned_listings(40)).unwrap();

        let x = feature_matrix(&encode_table(cleaned_listings(40)).unwrap()).unwrap();
        assert_eq!(a.predict(&x).unwrap(), b.predict(&x).unwrap());
    }

    #[test]
    fn test_train_unknown_label_is_fatal() {
        let mut df = cleaned_listings(10);
        let mut rooms = vec!["Private room"; 10];
        rooms[4] = "Treehouse";
        df.with_column(Series::new("room_type", rooms)).unwrap();

        let err = trainer(TrainingConfig::default()).train(df).unwrap_err();
        assert!(matches!(err, PipelineError::UnknownLabel { .. }));
    }

    #[test]
    fn test_train_single_category() {
        let mut df = cleaned_listings(20);
        df.with_column(Series::new("category", vec![2i64; 20])).unwrap();

        let err = trainer(TrainingConfig::default()).train(df).unwrap_err();
        assert!(matches!(err, PipelineError::Training(_)));
        assert_eq!(err.to_string(), "Training error: every training row is in price category 2");
    }

    #[test]
    fn test_train_empty_table() {
        let df = cleaned_listings(0);
        assert!(trainer(TrainingConfig::default()).train(df).is_err());
    }
}
