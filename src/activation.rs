//! Activation functions.
//!
//! The hidden layer computes a pre-activation `z1 = x W1 + b1` and applies the rectified-linear
//! activation element-wise: `a1 = relu(z1)`. The output layer is linear (no activation).
//!
//! Unlike a cache-the-output design, `ForwardState` keeps `z1` around, so the derivative is
//! expressed in terms of the pre-activation.

/// Rectified-linear activation: `max(0, z)`.
#[inline]
pub fn relu(z: f64) -> f64 {
    z.max(0.0)
}

/// Derivative of [`relu`] w.r.t. its input.
///
/// `1` where `z > 0`, `0` otherwise. The sub-gradient at exactly `0` is `0`.
#[inline]
pub fn relu_grad(z: f64) -> f64 {
    if z > 0.0 { 1.0 } else { 0.0 }
}

/// Applies [`relu`] element-wise, `outputs[j] = relu(inputs[j])`.
#[inline]
pub(crate) fn relu_into(inputs: &[f64], outputs: &mut [f64]) {
    debug_assert_eq!(inputs.len(), outputs.len());
    for (y, &z) in outputs.iter_mut().zip(inputs) {
        *y = relu(z);
    }
}
