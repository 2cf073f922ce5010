//! Feedforward network that turns sensor readings into driving controls.
//!
//! Networks are evolved, never trained: a fresh network is random, and later
//! generations are copies of a saved winner pulled toward new random values.

use std::fmt;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

pub mod level;

pub use level::Level;

/// Number of outputs the final level must produce (forward, left, right, reverse).
pub const CONTROL_OUTPUTS: usize = 4;

/// Reasons a network cannot drive a car with the current configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// The network has no levels.
    Empty,
    /// The first level does not accept the expected number of inputs.
    InputMismatch {
        /// Inputs the configuration provides.
        expected: usize,
        /// Inputs the first level accepts.
        found: usize,
    },
    /// The last level does not produce the expected number of outputs.
    OutputMismatch {
        /// Outputs the configuration consumes.
        expected: usize,
        /// Outputs the last level produces.
        found: usize,
    },
    /// A level does not accept the previous level's output width.
    BrokenChain {
        /// Index of the offending level.
        level: usize,
        /// Output width of the previous level.
        expected: usize,
        /// Input width of this level.
        found: usize,
    },
    /// A level's bias vector does not match its output width.
    BiasMismatch {
        /// Index of the offending level.
        level: usize,
        /// Output width of the weight matrix.
        expected: usize,
        /// Length of the bias vector.
        found: usize,
    },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "network has no levels"),
            Self::InputMismatch { expected, found } => {
                write!(f, "network takes {found} inputs, expected {expected}")
            }
            Self::OutputMismatch { expected, found } => {
                write!(f, "network produces {found} outputs, expected {expected}")
            }
            Self::BrokenChain {
                level,
                expected,
                found,
            } => write!(
                f,
                "level {level} takes {found} inputs but the previous level produces {expected}"
            ),
            Self::BiasMismatch {
                level,
                expected,
                found,
            } => write!(
                f,
                "level {level} has {found} biases for {expected} outputs"
            ),
        }
    }
}

impl std::error::Error for ShapeError {}

/// An ordered sequence of levels evaluated from input to output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    /// Ordered levels from input to output.
    pub levels: Vec<Level>,
}

impl Network {
    /// Creates a network with random parameters.
    ///
    /// # Arguments
    ///
    /// * `layer_sizes` - Widths from input to output, e.g. `[5, 6, 4]`
    pub fn new(layer_sizes: &[usize]) -> Self {
        let levels = layer_sizes
            .windows(2)
            .map(|pair| Level::new_random(pair[0], pair[1]))
            .collect();

        Self { levels }
    }

    /// Runs the inputs through every level in order.
    ///
    /// Evaluation is deterministic: the same parameters and inputs always give
    /// the same outputs.
    #[inline]
    pub fn evaluate(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = inputs.clone();
        for level in &self.levels {
            output = level.forward(&output);
        }
        output
    }

    /// Mutates every level in place.
    pub fn mutate(&mut self, amount: f32) {
        for level in &mut self.levels {
            level.mutate(amount);
        }
    }

    /// Returns the layer widths, input first.
    pub fn shape(&self) -> Vec<usize> {
        let mut shape = Vec::with_capacity(self.levels.len() + 1);
        if let Some(first) = self.levels.first() {
            shape.push(first.input_size());
        }
        shape.extend(self.levels.iter().map(Level::output_size));
        shape
    }

    /// Checks that the network maps `inputs` values to `outputs` values.
    pub fn validate(&self, inputs: usize, outputs: usize) -> Result<(), ShapeError> {
        let (Some(first), Some(last)) = (self.levels.first(), self.levels.last()) else {
            return Err(ShapeError::Empty);
        };

        if first.input_size() != inputs {
            return Err(ShapeError::InputMismatch {
                expected: inputs,
                found: first.input_size(),
            });
        }

        for (i, level) in self.levels.iter().enumerate() {
            if level.biases.len() != level.output_size() {
                return Err(ShapeError::BiasMismatch {
                    level: i,
                    expected: level.output_size(),
                    found: level.biases.len(),
                });
            }
        }

        for (i, pair) in self.levels.windows(2).enumerate() {
            if pair[0].output_size() != pair[1].input_size() {
                return Err(ShapeError::BrokenChain {
                    level: i + 1,
                    expected: pair[0].output_size(),
                    found: pair[1].input_size(),
                });
            }
        }

        if last.output_size() != outputs {
            return Err(ShapeError::OutputMismatch {
                expected: outputs,
                found: last.output_size(),
            });
        }

        Ok(())
    }

    /// Calculates the Euclidean distance between two networks' parameters.
    ///
    /// Levels are compared pairwise; extra levels on either side are ignored.
    pub fn distance(a: &Network, b: &Network) -> f32 {
        let mut sum_sq = 0.0;
        for (la, lb) in a.levels.iter().zip(&b.levels) {
            for (wa, wb) in la.weights.iter().zip(lb.weights.iter()) {
                let diff = wa - wb;
                sum_sq += diff * diff;
            }
            for (ba, bb) in la.biases.iter().zip(lb.biases.iter()) {
                let diff = ba - bb;
                sum_sq += diff * diff;
            }
        }
        sum_sq.sqrt()
    }

    /// Flattens all weights and biases into a single vector, level by level.
    pub fn to_flat_vector(&self) -> Vec<f32> {
        let mut flat = Vec::new();
        for level in &self.levels {
            flat.extend(level.weights.iter().copied());
            flat.extend(level.biases.iter().copied());
        }
        flat
    }
}
