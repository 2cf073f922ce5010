//! One affine-plus-threshold layer of the driving network.

use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::simulation::geometric_utils::lerp;

/// A single level of the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Weight matrix (`input_size` × `output_size`); `weights[[i, j]]` links input `i` to output `j`.
    pub weights: Array2<f32>,
    /// Per-output activation thresholds (`output_size`).
    pub biases: Array1<f32>,
}

impl Level {
    /// Creates a level with weights and biases drawn uniformly from `[-1, 1]`.
    pub fn new_random(input_size: usize, output_size: usize) -> Self {
        Self {
            weights: Array2::random((input_size, output_size), Uniform::new_inclusive(-1.0, 1.0)),
            biases: Array1::random(output_size, Uniform::new_inclusive(-1.0, 1.0)),
        }
    }

    /// Number of inputs this level consumes.
    pub fn input_size(&self) -> usize {
        self.weights.nrows()
    }

    /// Number of outputs this level produces.
    pub fn output_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Feeds inputs through the level with a binary step activation.
    ///
    /// Output `j` is `1.0` when `Σ inputs[i]·weights[i][j]` strictly exceeds
    /// `biases[j]`, otherwise `0.0`.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let sums = inputs.dot(&self.weights);
        sums.iter()
            .zip(self.biases.iter())
            .map(|(&sum, &bias)| if sum > bias { 1.0 } else { 0.0 })
            .collect()
    }

    /// Pulls every parameter toward a fresh uniform `[-1, 1]` sample.
    ///
    /// `amount = 0` leaves the level untouched, `amount = 1` fully re-randomizes it.
    pub fn mutate(&mut self, amount: f32) {
        let mut rng = rand::rng();
        self.biases
            .mapv_inplace(|b| lerp(b, rng.random_range(-1.0..=1.0), amount));
        self.weights
            .mapv_inplace(|w| lerp(w, rng.random_range(-1.0..=1.0), amount));
    }
}
