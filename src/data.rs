//! Training data.
//!
//! `Dataset` stores samples contiguously in row-major layout so the training loop can hand
//! out slices without per-step allocations. It is generated once and traversed in the same
//! order every epoch.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Error, Result};

/// A borrowed `(x, y)` training pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample<'a> {
    pub x: &'a [f64],
    pub y: &'a [f64],
}

/// A supervised dataset: inputs (X) and targets (Y).
///
/// Stored as contiguous buffers with row-major layout:
/// - `inputs.len() == len * input_dim`
/// - `targets.len() == len * target_dim`
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    inputs: Vec<f64>,
    targets: Vec<f64>,
    len: usize,
    input_dim: usize,
    target_dim: usize,
}

impl Dataset {
    /// Build a dataset from flat buffers.
    ///
    /// `inputs` is `(len, input_dim)` and `targets` is `(len, target_dim)`.
    pub fn from_flat(
        inputs: Vec<f64>,
        targets: Vec<f64>,
        input_dim: usize,
        target_dim: usize,
    ) -> Result<Self> {
        if input_dim == 0 {
            return Err(Error::InvalidData("input_dim must be > 0".to_owned()));
        }
        if target_dim == 0 {
            return Err(Error::InvalidData("target_dim must be > 0".to_owned()));
        }
        if !inputs.len().is_multiple_of(input_dim) {
            return Err(Error::InvalidData(format!(
                "inputs length {} is not divisible by input_dim {input_dim}",
                inputs.len()
            )));
        }

        let len = inputs.len() / input_dim;
        if targets.len() != len * target_dim {
            return Err(Error::InvalidData(format!(
                "targets length {} does not match len * target_dim ({len} * {target_dim})",
                targets.len()
            )));
        }

        Ok(Self {
            inputs,
            targets,
            len,
            input_dim,
            target_dim,
        })
    }

    /// Build a dataset from per-sample rows.
    ///
    /// This is a convenience constructor (it copies into contiguous storage).
    pub fn from_rows(inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<Self> {
        if inputs.len() != targets.len() {
            return Err(Error::InvalidData(format!(
                "inputs/targets length mismatch: {} vs {}",
                inputs.len(),
                targets.len()
            )));
        }
        if inputs.is_empty() {
            return Err(Error::InvalidData("inputs must not be empty".to_owned()));
        }

        let input_dim = inputs[0].len();
        let target_dim = targets[0].len();
        for (i, (x, y)) in inputs.iter().zip(targets).enumerate() {
            if x.len() != input_dim {
                return Err(Error::InvalidData(format!(
                    "input row {i} has len {}, expected {input_dim}",
                    x.len()
                )));
            }
            if y.len() != target_dim {
                return Err(Error::InvalidData(format!(
                    "target row {i} has len {}, expected {target_dim}",
                    y.len()
                )));
            }
        }

        Self::from_flat(inputs.concat(), targets.concat(), input_dim, target_dim)
    }

    /// `samples` addition problems with seeded inputs.
    pub fn addition_with_seed(samples: usize, input_dim: usize, seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::addition_with_rng(samples, input_dim, &mut rng)
    }

    /// `samples` addition problems: every input coordinate is drawn from `U[0, 1)` and the
    /// single target is the sum of the coordinates.
    pub fn addition_with_rng<R: Rng + ?Sized>(
        samples: usize,
        input_dim: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if samples == 0 {
            return Err(Error::InvalidConfig("sample count must be > 0".to_owned()));
        }
        if input_dim == 0 {
            return Err(Error::InvalidConfig("input width must be > 0".to_owned()));
        }

        let dist = Uniform::new(0.0, 1.0);
        let mut inputs = Vec::with_capacity(samples * input_dim);
        let mut targets = Vec::with_capacity(samples);
        for _ in 0..samples {
            let start = inputs.len();
            inputs.extend((0..input_dim).map(|_| dist.sample(&mut *rng)));
            let sum: f64 = inputs[start..].iter().sum();
            tracing::trace!(x = ?&inputs[start..], y = sum, "addition sample");
            targets.push(sum);
        }

        let data = Self::from_flat(inputs, targets, input_dim, 1)?;
        tracing::debug!(samples, input_dim, "generated addition dataset");
        Ok(data)
    }

    #[inline]
    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    /// Returns true if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    /// Returns the per-sample input dimension.
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    #[inline]
    /// Returns the per-sample target dimension.
    pub fn target_dim(&self) -> usize {
        self.target_dim
    }

    #[inline]
    /// Returns the `idx`-th input row (shape: `(input_dim,)`).
    ///
    /// Panics if `idx >= len`.
    pub fn input(&self, idx: usize) -> &[f64] {
        let start = idx * self.input_dim;
        &self.inputs[start..start + self.input_dim]
    }

    #[inline]
    /// Returns the `idx`-th target row (shape: `(target_dim,)`).
    ///
    /// Panics if `idx >= len`.
    pub fn target(&self, idx: usize) -> &[f64] {
        let start = idx * self.target_dim;
        &self.targets[start..start + self.target_dim]
    }

    #[inline]
    pub fn sample(&self, idx: usize) -> Sample<'_> {
        Sample {
            x: self.input(idx),
            y: self.target(idx),
        }
    }

    /// Samples in storage order. Re-iterable; the order never changes.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Sample<'_>> + '_ {
        self.inputs
            .chunks_exact(self.input_dim)
            .zip(self.targets.chunks_exact(self.target_dim))
            .map(|(x, y)| Sample { x, y })
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = Sample<'a>;
    type IntoIter = Box<dyn ExactSizeIterator<Item = Sample<'a>> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
