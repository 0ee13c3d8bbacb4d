use rand::Rng;
use rand::distributions::{Distribution, Uniform};

use crate::{Error, Result};

/// Upper bound (exclusive) of the uniform weight initializer.
pub const INIT_WEIGHT_MAX: f64 = 0.1;

/// A dense affine layer: `outputs = inputs W + b`.
///
/// The activation (if any) is applied by the caller; see [`crate::Network`].
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    in_dim: usize,
    out_dim: usize,
    /// Row-major matrix with shape (in_dim, out_dim).
    weights: Vec<f64>,
    biases: Vec<f64>,
}

impl Layer {
    /// Zero-initialized layer.
    #[inline]
    pub fn new(in_dim: usize, out_dim: usize) -> Self {
        Self {
            in_dim,
            out_dim,
            weights: vec![0.0; in_dim * out_dim],
            biases: vec![0.0; out_dim],
        }
    }

    /// Weights drawn independently from `U[0, 0.1)` in row-major order, biases zero.
    pub fn new_with_rng<R: Rng + ?Sized>(in_dim: usize, out_dim: usize, rng: &mut R) -> Self {
        let dist = Uniform::new(0.0, INIT_WEIGHT_MAX);
        let weights = (0..in_dim * out_dim).map(|_| dist.sample(&mut *rng)).collect();
        Self {
            in_dim,
            out_dim,
            weights,
            biases: vec![0.0; out_dim],
        }
    }

    /// Build a layer from explicit parameters.
    ///
    /// `weights` is row-major `(in_dim, out_dim)`; all values must be finite.
    pub fn from_parts(
        in_dim: usize,
        out_dim: usize,
        weights: Vec<f64>,
        biases: Vec<f64>,
    ) -> Result<Self> {
        if weights.len() != in_dim * out_dim {
            return Err(Error::InvalidShape(format!(
                "weights length {} does not match in_dim * out_dim ({in_dim} * {out_dim})",
                weights.len()
            )));
        }
        if biases.len() != out_dim {
            return Err(Error::InvalidShape(format!(
                "biases length {} does not match out_dim {out_dim}",
                biases.len()
            )));
        }
        if !weights.iter().chain(&biases).all(|v| v.is_finite()) {
            return Err(Error::InvalidData(
                "layer parameters must be finite".to_owned(),
            ));
        }
        Ok(Self {
            in_dim,
            out_dim,
            weights,
            biases,
        })
    }

    #[inline]
    pub fn in_dim(&self) -> usize {
        self.in_dim
    }

    #[inline]
    pub fn out_dim(&self) -> usize {
        self.out_dim
    }

    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[inline]
    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    #[inline]
    pub fn weights_mut(&mut self) -> &mut [f64] {
        &mut self.weights
    }

    #[inline]
    pub fn biases_mut(&mut self) -> &mut [f64] {
        &mut self.biases
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.weights.iter().chain(&self.biases).all(|v| v.is_finite())
    }

    /// Forward pass for a single sample.
    ///
    /// Computes `outputs[j] = sum_i inputs[i] * W[i, j] + b[j]`.
    ///
    /// Shape contract:
    /// - `inputs.len() == self.in_dim`
    /// - `outputs.len() == self.out_dim`
    #[inline]
    pub fn forward(&self, inputs: &[f64], outputs: &mut [f64]) {
        debug_assert_eq!(inputs.len(), self.in_dim);
        debug_assert_eq!(outputs.len(), self.out_dim);

        outputs.copy_from_slice(&self.biases);
        for (i, &x) in inputs.iter().enumerate() {
            let row = &self.weights[i * self.out_dim..(i + 1) * self.out_dim];
            for (out, &w) in outputs.iter_mut().zip(row) {
                *out = w.mul_add(x, *out);
            }
        }
    }

    /// Backward pass for a single sample.
    ///
    /// This uses overwrite semantics:
    /// - `d_weights[i, j] = inputs[i] * d_outputs[j]` (outer product)
    /// - `d_biases = d_outputs`
    /// - `d_inputs[i] = sum_j W[i, j] * d_outputs[j]`, if requested
    ///
    /// `d_inputs` is computed from the weights as they are now, so call this before any
    /// update to the layer.
    ///
    /// Shape contract:
    /// - `inputs.len() == self.in_dim`
    /// - `d_outputs.len() == self.out_dim`
    /// - `d_inputs.len() == self.in_dim`
    /// - `d_weights.len() == self.weights.len()`
    /// - `d_biases.len() == self.out_dim`
    #[inline]
    pub fn backward(
        &self,
        inputs: &[f64],
        d_outputs: &[f64],
        d_inputs: Option<&mut [f64]>,
        d_weights: &mut [f64],
        d_biases: &mut [f64],
    ) {
        debug_assert_eq!(inputs.len(), self.in_dim);
        debug_assert_eq!(d_outputs.len(), self.out_dim);
        debug_assert_eq!(d_weights.len(), self.weights.len());
        debug_assert_eq!(d_biases.len(), self.out_dim);

        d_biases.copy_from_slice(d_outputs);

        for (i, &x) in inputs.iter().enumerate() {
            let row = i * self.out_dim..(i + 1) * self.out_dim;
            for (dw, &g) in d_weights[row].iter_mut().zip(d_outputs) {
                *dw = x * g;
            }
        }

        if let Some(d_inputs) = d_inputs {
            debug_assert_eq!(d_inputs.len(), self.in_dim);
            for (i, d_in) in d_inputs.iter_mut().enumerate() {
                let row = &self.weights[i * self.out_dim..(i + 1) * self.out_dim];
                let mut acc = 0.0;
                for (&w, &g) in row.iter().zip(d_outputs) {
                    acc = w.mul_add(g, acc);
                }
                *d_in = acc;
            }
        }
    }

    /// `param -= lr * d_param` for every weight and bias.
    #[inline]
    pub fn sgd_step(&mut self, d_weights: &[f64], d_biases: &[f64], lr: f64) {
        debug_assert_eq!(d_weights.len(), self.weights.len());
        debug_assert_eq!(d_biases.len(), self.biases.len());

        for (w, &g) in self.weights.iter_mut().zip(d_weights) {
            *w = (-lr).mul_add(g, *w);
        }
        for (b, &g) in self.biases.iter_mut().zip(d_biases) {
            *b = (-lr).mul_add(g, *b);
        }
    }
}
