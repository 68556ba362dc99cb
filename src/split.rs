// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Seeded train/test partitioning
//!
//! The permutation depends only on the seed and the input order, so the same
//! evaluation can be reproduced across runs and machines.

use crate::error::{DatasetError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_TEST_SIZE: f64 = 0.2;

/// Disjoint train and test subsets of one collection
#[derive(Debug, Clone, PartialEq)]
pub struct Split<T> {
    pub train: Vec<T>,
    pub test: Vec<T>,
}

impl<T> Split<T> {
    pub fn len(&self) -> usize {
        self.train.len() + self.test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.train.is_empty() && self.test.is_empty()
    }
}

/// Index separating train from test: floor(len * (1 - test_size))
pub fn cutoff(len: usize, test_size: f64) -> usize {
    ((len as f64) * (1.0 - test_size)).floor() as usize
}

/// Shuffle a copy of `records` with a seeded RNG and split it.
///
/// The first `cutoff` shuffled records form the train set, the rest the test set.
pub fn train_test_split<T: Clone>(records: &[T], seed: u64, test_size: f64) -> Result<Split<T>> {
    if !test_size.is_finite() || !(0.0..=1.0).contains(&test_size) {
        return Err(DatasetError::InvalidTestSize(test_size));
    }

    let mut shuffled = records.to_vec();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    shuffled.shuffle(&mut rng);

    let split_at = cutoff(shuffled.len(), test_size).min(shuffled.len());
    let test = shuffled.split_off(split_at);

    tracing::debug!(
        "Split {} records (seed={}, test_size={}): train={}, test={}",
        records.len(),
        seed,
        test_size,
        shuffled.len(),
        test.len()
    );

    Ok(Split {
        train: shuffled,
        test,
    })
}
