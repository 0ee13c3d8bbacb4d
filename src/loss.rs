//! Loss functions.
//!
//! The network is trained on the squared error summed over output units:
//!
//! - run `network.forward(...)`
//! - compute `d_output` via [`sum_squared_error_backward`]
//! - back-propagate and update parameters

/// Sum of squared errors: `sum_k (pred[k] - target[k])^2`.
///
/// With one output unit this is the plain squared error of the sample.
#[inline]
pub fn sum_squared_error(pred: &[f64], target: &[f64]) -> f64 {
    assert_eq!(
        pred.len(),
        target.len(),
        "pred len {} does not match target len {}",
        pred.len(),
        target.len()
    );

    let mut sum_sq = 0.0_f64;
    for (&p, &t) in pred.iter().zip(target) {
        let diff = p - t;
        sum_sq = diff.mul_add(diff, sum_sq);
    }
    sum_sq
}

/// Sum of squared errors + gradient w.r.t. `pred`.
///
/// Writes `d_pred[k] = 2 * (pred[k] - target[k])` and returns the loss.
#[inline]
pub fn sum_squared_error_backward(pred: &[f64], target: &[f64], d_pred: &mut [f64]) -> f64 {
    assert_eq!(
        pred.len(),
        target.len(),
        "pred len {} does not match target len {}",
        pred.len(),
        target.len()
    );
    assert_eq!(
        pred.len(),
        d_pred.len(),
        "pred len {} does not match d_pred len {}",
        pred.len(),
        d_pred.len()
    );

    let mut sum_sq = 0.0_f64;
    for k in 0..pred.len() {
        let diff = pred[k] - target[k];
        d_pred[k] = 2.0 * diff;
        sum_sq = diff.mul_add(diff, sum_sq);
    }
    sum_sq
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squared_error_sums_over_outputs() {
        assert_eq!(sum_squared_error(&[1.0, 2.0], &[0.0, 4.0]), 1.0 + 4.0);
        assert_eq!(sum_squared_error(&[], &[]), 0.0);
    }

    #[test]
    fn backward_writes_twice_the_residual() {
        let mut d = [0.0; 2];
        let loss = sum_squared_error_backward(&[1.5, -1.0], &[1.0, 1.0], &mut d);
        assert_eq!(loss, 0.25 + 4.0);
        assert_eq!(d, [1.0, -4.0]);
    }

    #[test]
    #[should_panic]
    fn mismatched_lengths_panic() {
        sum_squared_error(&[1.0], &[1.0, 2.0]);
    }
}
