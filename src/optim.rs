//! Optimizer.
//!
//! Plain per-sample stochastic gradient descent: no momentum, no adaptive scaling. The
//! update is applied in place right after each sample's backward pass.

use crate::{Error, Gradients, Network, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
/// Stochastic gradient descent with a fixed learning rate.
pub struct Sgd {
    lr: f64,
}

impl Sgd {
    #[inline]
    /// Construct an SGD optimizer.
    ///
    /// Returns an error if `lr` is not finite or `lr <= 0`.
    pub fn new(lr: f64) -> Result<Self> {
        if !(lr.is_finite() && lr > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "learning rate must be finite and > 0, got {lr}"
            )));
        }
        Ok(Self { lr })
    }

    #[inline]
    /// Returns the learning rate.
    pub fn lr(&self) -> f64 {
        self.lr
    }

    #[inline]
    /// Apply one optimizer step: `param -= lr * d_param`.
    pub fn step(&self, network: &mut Network, grads: &Gradients) {
        network.sgd_step(grads, self.lr);
    }
}
