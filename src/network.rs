use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::activation::{relu_grad, relu_into};
use crate::{Error, Layer, Result, Trainer, loss};

/// Layer widths of the two-layer network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dims {
    pub input: usize,
    pub hidden: usize,
    pub output: usize,
}

impl Dims {
    #[inline]
    pub const fn new(input: usize, hidden: usize, output: usize) -> Self {
        Self {
            input,
            hidden,
            output,
        }
    }

    /// Input and output widths must be positive. `hidden == 0` is a valid degenerate
    /// network whose output is `b2` for every input.
    pub fn validate(self) -> Result<()> {
        if self.input == 0 {
            return Err(Error::InvalidConfig("input width must be > 0".to_owned()));
        }
        if self.output == 0 {
            return Err(Error::InvalidConfig("output width must be > 0".to_owned()));
        }
        Ok(())
    }
}

/// Network parameters: `W1`/`b1` (hidden layer) and `W2`/`b2` (output layer).
///
/// The hidden layer uses ReLU; the output layer is linear.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    hidden: Layer,
    output: Layer,
}

/// Reusable per-sample buffers for `Network::forward`.
///
/// Holds the pre-activation `z1`, the activation `a1 = relu(z1)` and the raw output `z2`
/// of the most recent forward pass.
#[derive(Debug, Clone)]
pub struct ForwardState {
    z1: Vec<f64>,
    a1: Vec<f64>,
    z2: Vec<f64>,
}

/// Parameter gradients for a `Network` (overwrite semantics).
///
/// Allocate once via `Network::gradients()` and reuse across training steps.
#[derive(Debug, Clone)]
pub struct Gradients {
    dw1: Vec<f64>,
    db1: Vec<f64>,
    dw2: Vec<f64>,
    db2: Vec<f64>,

    // dL/d(z2), written by the loss.
    d_output: Vec<f64>,
    // dL/d(a1), then masked in place into dL/d(z1).
    d_hidden: Vec<f64>,
}

impl Network {
    pub fn new_with_seed(dims: Dims, seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::new_with_rng(dims, &mut rng)
    }

    /// Draws `W1` then `W2` (row-major) from `U[0, 0.1)`; biases start at zero.
    pub fn new_with_rng<R: Rng + ?Sized>(dims: Dims, rng: &mut R) -> Result<Self> {
        dims.validate()?;

        let hidden = Layer::new_with_rng(dims.input, dims.hidden, rng);
        let output = Layer::new_with_rng(dims.hidden, dims.output, rng);
        tracing::debug!(
            input = dims.input,
            hidden = dims.hidden,
            output = dims.output,
            "initialized network"
        );
        Ok(Self { hidden, output })
    }

    /// Build a network from explicit parameters (row-major matrices).
    pub fn from_parts(
        dims: Dims,
        w1: Vec<f64>,
        b1: Vec<f64>,
        w2: Vec<f64>,
        b2: Vec<f64>,
    ) -> Result<Self> {
        dims.validate()?;
        let hidden = Layer::from_parts(dims.input, dims.hidden, w1, b1)?;
        let output = Layer::from_parts(dims.hidden, dims.output, w2, b2)?;
        Ok(Self { hidden, output })
    }

    #[inline]
    pub fn dims(&self) -> Dims {
        Dims::new(self.input_dim(), self.hidden_dim(), self.output_dim())
    }

    #[inline]
    pub fn input_dim(&self) -> usize {
        self.hidden.in_dim()
    }

    #[inline]
    pub fn hidden_dim(&self) -> usize {
        self.hidden.out_dim()
    }

    #[inline]
    pub fn output_dim(&self) -> usize {
        self.output.out_dim()
    }

    /// `W1`, row-major `(input, hidden)`.
    #[inline]
    pub fn w1(&self) -> &[f64] {
        self.hidden.weights()
    }

    #[inline]
    pub fn b1(&self) -> &[f64] {
        self.hidden.biases()
    }

    /// `W2`, row-major `(hidden, output)`.
    #[inline]
    pub fn w2(&self) -> &[f64] {
        self.output.weights()
    }

    #[inline]
    pub fn b2(&self) -> &[f64] {
        self.output.biases()
    }

    #[inline]
    pub fn hidden_layer(&self) -> &Layer {
        &self.hidden
    }

    #[inline]
    pub fn output_layer(&self) -> &Layer {
        &self.output
    }

    #[inline]
    pub fn hidden_layer_mut(&mut self) -> &mut Layer {
        &mut self.hidden
    }

    #[inline]
    pub fn output_layer_mut(&mut self) -> &mut Layer {
        &mut self.output
    }

    /// True if every weight and bias is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.hidden.is_finite() && self.output.is_finite()
    }

    pub fn forward_state(&self) -> ForwardState {
        ForwardState::new(self)
    }

    pub fn gradients(&self) -> Gradients {
        Gradients::new(self)
    }

    /// Convenience constructor: allocate all training buffers.
    #[inline]
    pub fn trainer(&self) -> Trainer {
        Trainer::new(self)
    }

    /// Forward pass for a single sample.
    ///
    /// Writes `z1`, `a1` and `z2` into `state` and returns `z2`.
    ///
    /// Shape contract:
    /// - `input.len() == self.input_dim()`
    /// - `state` must be built for a network with the same dims
    pub fn forward<'a>(&self, input: &[f64], state: &'a mut ForwardState) -> &'a [f64] {
        assert_eq!(
            input.len(),
            self.input_dim(),
            "input len {} does not match network input_dim {}",
            input.len(),
            self.input_dim()
        );
        self.assert_state(state);

        self.hidden.forward(input, &mut state.z1);
        relu_into(&state.z1, &mut state.a1);
        self.output.forward(&state.a1, &mut state.z2);

        &state.z2
    }

    /// Backward pass for a single sample.
    ///
    /// You must call `forward` first using the same `input` and `state`. Reads `W2` as it is
    /// now, so the update for this sample must come after.
    ///
    /// Overwrite semantics: `grads` is overwritten with the gradients for this sample.
    ///
    /// Returns the sample loss `sum_k (z2[k] - target[k])^2`.
    pub fn backward(
        &self,
        input: &[f64],
        target: &[f64],
        state: &ForwardState,
        grads: &mut Gradients,
    ) -> f64 {
        assert_eq!(
            input.len(),
            self.input_dim(),
            "input len {} does not match network input_dim {}",
            input.len(),
            self.input_dim()
        );
        assert_eq!(
            target.len(),
            self.output_dim(),
            "target len {} does not match network output_dim {}",
            target.len(),
            self.output_dim()
        );
        self.assert_state(state);
        self.assert_grads(grads);

        let loss = loss::sum_squared_error_backward(&state.z2, target, &mut grads.d_output);

        self.output.backward(
            &state.a1,
            &grads.d_output,
            Some(grads.d_hidden.as_mut_slice()),
            &mut grads.dw2,
            &mut grads.db2,
        );

        for (g, &z) in grads.d_hidden.iter_mut().zip(&state.z1) {
            *g *= relu_grad(z);
        }

        self.hidden.backward(
            input,
            &grads.d_hidden,
            None,
            &mut grads.dw1,
            &mut grads.db1,
        );

        loss
    }

    /// Applies `param -= lr * grad` to every weight and bias.
    #[inline]
    pub fn sgd_step(&mut self, grads: &Gradients, lr: f64) {
        assert!(
            lr.is_finite() && lr > 0.0,
            "learning rate must be finite and > 0"
        );
        self.assert_grads(grads);

        self.hidden.sgd_step(&grads.dw1, &grads.db1, lr);
        self.output.sgd_step(&grads.dw2, &grads.db2, lr);
    }

    /// Shape-checked, allocating inference for one input.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.input_dim() {
            return Err(Error::InvalidShape(format!(
                "input len {} does not match network input_dim {}",
                input.len(),
                self.input_dim()
            )));
        }
        let mut state = self.forward_state();
        Ok(self.forward(input, &mut state).to_vec())
    }

    fn assert_state(&self, state: &ForwardState) {
        assert!(
            state.z1.len() == self.hidden_dim()
                && state.a1.len() == self.hidden_dim()
                && state.z2.len() == self.output_dim(),
            "forward state (hidden {}, output {}) does not match network (hidden {}, output {})",
            state.z1.len(),
            state.z2.len(),
            self.hidden_dim(),
            self.output_dim()
        );
    }

    fn assert_grads(&self, grads: &Gradients) {
        assert!(
            grads.dw1.len() == self.w1().len()
                && grads.db1.len() == self.b1().len()
                && grads.dw2.len() == self.w2().len()
                && grads.db2.len() == self.b2().len(),
            "gradients do not match network dims {:?}",
            self.dims()
        );
    }
}

impl ForwardState {
    pub fn new(network: &Network) -> Self {
        Self {
            z1: vec![0.0; network.hidden_dim()],
            a1: vec![0.0; network.hidden_dim()],
            z2: vec![0.0; network.output_dim()],
        }
    }

    #[inline]
    pub fn z1(&self) -> &[f64] {
        &self.z1
    }

    #[inline]
    pub fn a1(&self) -> &[f64] {
        &self.a1
    }

    #[inline]
    pub fn z2(&self) -> &[f64] {
        &self.z2
    }

    /// The network output of the last forward pass (same as `z2`).
    #[inline]
    pub fn output(&self) -> &[f64] {
        &self.z2
    }
}

impl Gradients {
    pub fn new(network: &Network) -> Self {
        Self {
            dw1: vec![0.0; network.w1().len()],
            db1: vec![0.0; network.b1().len()],
            dw2: vec![0.0; network.w2().len()],
            db2: vec![0.0; network.b2().len()],
            d_output: vec![0.0; network.output_dim()],
            d_hidden: vec![0.0; network.hidden_dim()],
        }
    }

    #[inline]
    pub fn dw1(&self) -> &[f64] {
        &self.dw1
    }

    #[inline]
    pub fn db1(&self) -> &[f64] {
        &self.db1
    }

    #[inline]
    pub fn dw2(&self) -> &[f64] {
        &self.dw2
    }

    #[inline]
    pub fn db2(&self) -> &[f64] {
        &self.db2
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.dw1
            .iter()
            .chain(&self.db1)
            .chain(&self.dw2)
            .chain(&self.db2)
            .all(|g| g.is_finite())
    }
}
