//! Post-training evaluation against the exact sum.
//!
//! A trained network approximates addition; its output is almost never bit-equal to the
//! exact sum, so the comparison goes through a [`Tolerance`].

use std::fmt;

use crate::{Error, Network, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "eps", rename_all = "snake_case"))]
/// How close a prediction must be to the expected value.
pub enum Tolerance {
    /// `|predicted - expected| <= eps`.
    Absolute(f64),
    /// `|predicted - expected| <= eps * |expected|`.
    Relative(f64),
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance::Absolute(0.05)
    }
}

impl Tolerance {
    pub fn validate(self) -> Result<()> {
        let (Tolerance::Absolute(eps) | Tolerance::Relative(eps)) = self;
        if !(eps.is_finite() && eps >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "tolerance must be finite and >= 0, got {eps}"
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn accepts(self, predicted: f64, expected: f64) -> bool {
        let diff = (predicted - expected).abs();
        match self {
            Tolerance::Absolute(eps) => diff <= eps,
            Tolerance::Relative(eps) => diff <= eps * expected.abs(),
        }
    }
}

/// Result of running the network on one test input.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Evaluation {
    pub input: Vec<f64>,
    pub predicted: Vec<f64>,
    /// Exact sum of the input coordinates.
    pub expected: f64,
    /// Largest `|predicted[k] - expected|` over the output units.
    pub abs_error: f64,
    pub tolerance: Tolerance,
    /// Every output unit is within `tolerance` of `expected`.
    pub passed: bool,
}

/// Runs the forward pass on `input` and compares the output with the sum of its coordinates.
pub fn evaluate(network: &Network, input: &[f64], tolerance: Tolerance) -> Result<Evaluation> {
    tolerance.validate()?;
    if let Some(v) = input.iter().find(|v| !v.is_finite()) {
        return Err(Error::InvalidData(format!(
            "test input must be finite, got {v}"
        )));
    }

    let predicted = network.predict(input)?;
    let expected: f64 = input.iter().sum();

    let abs_error = predicted
        .iter()
        .map(|p| (p - expected).abs())
        .fold(0.0, f64::max);
    let passed = predicted.iter().all(|&p| tolerance.accepts(p, expected));

    tracing::debug!(?predicted, expected, abs_error, passed, "evaluated test input");

    Ok(Evaluation {
        input: input.to_vec(),
        predicted,
        expected,
        abs_error,
        tolerance,
        passed,
    })
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, x) in self.input.iter().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            write!(f, "{x}")?;
        }
        f.write_str(" =")?;
        for p in &self.predicted {
            write!(f, " {p:.5}")?;
        }
        if self.passed {
            f.write_str(" CORRECT!")
        } else {
            write!(f, " MISTAKEN! | correct result: {:.5}", self.expected)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::Dims;

    // Exact adder: one hidden unit per input, W2 = 1.
    fn adder() -> Network {
        Network::from_parts(
            Dims::new(2, 2, 1),
            vec![1.0, 0.0, 0.0, 1.0],
            vec![0.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0],
        )
        .unwrap()
    }

    #[test]
    fn tolerance_kinds() {
        assert!(Tolerance::Absolute(0.05).accepts(0.54, 0.5));
        assert!(!Tolerance::Absolute(0.05).accepts(0.56, 0.5));
        assert!(Tolerance::Relative(0.1).accepts(10.9, 10.0));
        assert!(!Tolerance::Relative(0.1).accepts(11.5, 10.0));
        assert!(Tolerance::Absolute(0.0).accepts(0.5, 0.5));
    }

    #[test]
    fn tolerance_validation() {
        assert!(Tolerance::Absolute(-1.0).validate().is_err());
        assert!(Tolerance::Relative(f64::NAN).validate().is_err());
        assert!(Tolerance::default().validate().is_ok());
    }

    #[test]
    fn exact_network_passes() {
        let eval = evaluate(&adder(), &[0.25, 0.5], Tolerance::Absolute(0.0)).unwrap();
        assert_eq!(eval.expected, 0.75);
        assert_eq!(eval.predicted, vec![0.75]);
        assert!(eval.passed);
        assert_eq!(eval.to_string(), "0.25 + 0.5 = 0.75000 CORRECT!");
    }

    #[test]
    fn near_miss_is_reported_not_an_error() {
        let mut net = adder();
        net.output_layer_mut().biases_mut()[0] = 0.1;
        let eval = evaluate(&net, &[7.0, 3.5], Tolerance::Absolute(0.05)).unwrap();
        assert!(!eval.passed);
        assert!((eval.abs_error - 0.1).abs() < 1e-12);
        assert_eq!(
            eval.to_string(),
            "7 + 3.5 = 10.60000 MISTAKEN! | correct result: 10.50000"
        );
    }

    #[test]
    fn rejects_wrong_length_and_non_finite_input() {
        assert!(matches!(
            evaluate(&adder(), &[1.0], Tolerance::default()),
            Err(Error::InvalidShape(_))
        ));
        assert!(matches!(
            evaluate(&adder(), &[1.0, f64::NAN], Tolerance::default()),
            Err(Error::InvalidData(_))
        ));
    }
}
