//! A two-layer network that learns to add.
//!
//! `adder-mlp` trains a fixed architecture, `input -> hidden (ReLU) -> output (linear)`,
//! with hand-written forward/backward passes and per-sample stochastic gradient descent on
//! synthetic addition data, then checks the result on a held-out input.
//!
//! # Panics vs `Result`
//!
//! Like most numeric crates, two layers of API are exposed:
//!
//! - Low-level hot path (panics on misuse):
//!   - [`Network::forward`], [`Network::backward`], [`Network::sgd_step`]
//!     Shape mismatches are programmer error and panic via `assert!`.
//!
//! - High-level APIs (shape-checked):
//!   - [`Network::fit`], [`Network::predict`], [`evaluate`], [`run`]
//!     These validate inputs and return [`Result`].
//!
//! # Data layout
//!
//! - Scalars are `f64`.
//! - `W1` is row-major `(input, hidden)`, `W2` is row-major `(hidden, output)`.
//! - [`Dataset`] stores samples contiguously, row-major.
//!
//! # Quick start
//!
//! ```rust
//! use adder_mlp::{Dataset, Dims, FitConfig, Network, Silent, Tolerance};
//!
//! # fn main() -> adder_mlp::Result<()> {
//! let train = Dataset::addition_with_seed(200, 2, 1)?;
//! let mut network = Network::new_with_seed(Dims::new(2, 9, 1), 42)?;
//!
//! let report = network.fit(&train, FitConfig { epochs: 50, lr: 0.01 }, &mut Silent)?;
//! assert!(report.final_loss() < report.first_loss());
//!
//! let eval = adder_mlp::evaluate(&network, &[0.2, 0.3], Tolerance::Absolute(0.5))?;
//! println!("{eval}");
//! # Ok(())
//! # }
//! ```
//!
//! # Driving training by hand
//!
//! Buffers are allocated once and reused across steps:
//!
//! ```rust
//! use adder_mlp::{Dims, Network, Sgd};
//!
//! # fn main() -> adder_mlp::Result<()> {
//! let mut network = Network::new_with_seed(Dims::new(2, 4, 1), 0)?;
//! let mut trainer = network.trainer();
//! let opt = Sgd::new(1e-2)?;
//!
//! let x = [0.25, 0.5];
//! let y = [0.75];
//!
//! network.forward(&x, &mut trainer.state);
//! let _loss = network.backward(&x, &y, &trainer.state, &mut trainer.grads);
//! opt.step(&mut network, &trainer.grads);
//! # Ok(())
//! # }
//! ```

pub mod activation;
pub mod config;
pub mod data;
pub mod error;
pub mod eval;
pub mod layer;
pub mod loss;
pub mod network;
pub mod optim;
pub mod train;

#[cfg(feature = "serde")]
pub mod serde_model;

pub use config::TrainConfig;
pub use data::{Dataset, Sample};
pub use error::{Error, Result};
pub use eval::{Evaluation, Tolerance, evaluate};
pub use layer::Layer;
pub use network::{Dims, ForwardState, Gradients, Network};
pub use optim::Sgd;
pub use train::{
    FitConfig, FitReport, LogProgress, Observer, RunReport, Silent, Trainer, run,
};
