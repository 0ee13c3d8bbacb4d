//! Training loop.
//!
//! Every epoch walks the dataset in storage order and, for each sample, runs forward,
//! backward and an SGD update before touching the next sample. Updates are never batched:
//! the order of samples within an epoch is part of the trajectory.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::{
    Dataset, Error, Evaluation, ForwardState, Gradients, Network, Result, Sgd, TrainConfig,
    evaluate,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitConfig {
    pub epochs: usize,
    pub lr: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            epochs: 10,
            lr: 1e-2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FitReport {
    /// Mean sample loss of every epoch, in order.
    pub epoch_losses: Vec<f64>,
}

impl FitReport {
    #[inline]
    pub fn first_loss(&self) -> f64 {
        self.epoch_losses.first().copied().unwrap_or(f64::NAN)
    }

    #[inline]
    pub fn final_loss(&self) -> f64 {
        self.epoch_losses.last().copied().unwrap_or(f64::NAN)
    }
}

/// Receives the mean loss at the end of every epoch.
pub trait Observer {
    fn on_epoch_end(&mut self, epoch: usize, mean_loss: f64);
}

/// Observer that ignores every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Observer for Silent {
    #[inline]
    fn on_epoch_end(&mut self, _epoch: usize, _mean_loss: f64) {}
}

impl<F: FnMut(usize, f64)> Observer for F {
    #[inline]
    fn on_epoch_end(&mut self, epoch: usize, mean_loss: f64) {
        self(epoch, mean_loss)
    }
}

/// Logs the mean loss through `tracing` on epochs `0, every, 2 * every, ...`.
#[derive(Debug, Clone, Copy)]
pub struct LogProgress {
    every: usize,
}

impl LogProgress {
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
        }
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl Observer for LogProgress {
    fn on_epoch_end(&mut self, epoch: usize, mean_loss: f64) {
        if epoch.is_multiple_of(self.every) {
            tracing::info!("Epoch {epoch}, Loss {mean_loss:.5}");
        }
    }
}

/// Reusable buffers for training a specific `Network`.
#[derive(Debug, Clone)]
pub struct Trainer {
    pub state: ForwardState,
    pub grads: Gradients,
}

impl Trainer {
    pub fn new(network: &Network) -> Self {
        Self {
            state: ForwardState::new(network),
            grads: Gradients::new(network),
        }
    }

    /// One sample: forward, backward, then an in-place SGD update.
    ///
    /// Returns the sample loss, or `None` if the loss or a gradient is non-finite. In that
    /// case the network is left untouched.
    pub fn step(
        &mut self,
        network: &mut Network,
        opt: &Sgd,
        input: &[f64],
        target: &[f64],
    ) -> Option<f64> {
        network.forward(input, &mut self.state);
        let loss = network.backward(input, target, &self.state, &mut self.grads);
        if !(loss.is_finite() && self.grads.is_finite()) {
            return None;
        }
        opt.step(network, &self.grads);
        Some(loss)
    }
}

impl Network {
    /// Train on `train` with per-sample SGD for exactly `cfg.epochs` epochs.
    ///
    /// Stops with `Error::Diverged` as soon as a loss, gradient or parameter becomes
    /// non-finite. The buffers are allocated once; the per-sample path does not allocate.
    pub fn fit<O: Observer + ?Sized>(
        &mut self,
        train: &Dataset,
        cfg: FitConfig,
        observer: &mut O,
    ) -> Result<FitReport> {
        if train.is_empty() {
            return Err(Error::InvalidData(
                "train dataset must not be empty".to_owned(),
            ));
        }
        if train.input_dim() != self.input_dim() {
            return Err(Error::InvalidData(format!(
                "train input_dim {} does not match network input_dim {}",
                train.input_dim(),
                self.input_dim()
            )));
        }
        if train.target_dim() != self.output_dim() {
            return Err(Error::InvalidData(format!(
                "train target_dim {} does not match network output_dim {}",
                train.target_dim(),
                self.output_dim()
            )));
        }
        if cfg.epochs == 0 {
            return Err(Error::InvalidConfig("epochs must be > 0".to_owned()));
        }

        let opt = Sgd::new(cfg.lr)?;
        let mut trainer = Trainer::new(self);
        let mut epoch_losses = Vec::with_capacity(cfg.epochs);

        for epoch in 0..cfg.epochs {
            let mut epoch_loss = 0.0_f64;
            for (sample, s) in train.iter().enumerate() {
                let loss = trainer.step(self, &opt, s.x, s.y);
                match loss {
                    Some(loss) if self.is_finite() => epoch_loss += loss,
                    _ => {
                        let last_epoch_loss = epoch_losses.last().copied();
                        tracing::warn!(epoch, sample, ?last_epoch_loss, "training diverged");
                        return Err(Error::Diverged {
                            epoch,
                            sample,
                            last_epoch_loss,
                        });
                    }
                }
            }

            let mean = epoch_loss / train.len() as f64;
            epoch_losses.push(mean);
            observer.on_epoch_end(epoch, mean);
        }

        Ok(FitReport { epoch_losses })
    }
}

/// Everything a full run produces.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub network: Network,
    pub dataset: Dataset,
    pub fit: FitReport,
    pub evaluation: Evaluation,
}

/// Validate `cfg`, initialize the network and the addition dataset from `cfg.seed`, train,
/// then evaluate on `cfg.test_input`.
///
/// One seeded generator feeds the weight initializer first and the data generator second.
pub fn run(cfg: &TrainConfig) -> Result<RunReport> {
    cfg.validate()?;

    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let mut network = Network::new_with_rng(cfg.dims(), &mut rng)?;
    let dataset = Dataset::addition_with_rng(cfg.samples, cfg.input_dim, &mut rng)?;
    tracing::info!("{} training samples ready", dataset.len());

    tracing::info!(
        "Starting {} neurons training ({} epochs)...",
        cfg.hidden_dim,
        cfg.epochs
    );
    let fit = network.fit(
        &dataset,
        FitConfig {
            epochs: cfg.epochs,
            lr: cfg.learning_rate,
        },
        &mut LogProgress::new(cfg.report_every),
    )?;
    tracing::info!("Training complete!");

    let evaluation = evaluate(&network, &cfg.test_input, cfg.tolerance)?;

    Ok(RunReport {
        network,
        dataset,
        fit,
        evaluation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::Dims;

    fn tiny_data() -> Dataset {
        Dataset::from_rows(
            &[vec![0.1, 0.2], vec![0.5, 0.4], vec![0.9, 0.3]],
            &[vec![0.3], vec![0.9], vec![1.2]],
        )
        .unwrap()
    }

    #[test]
    fn fit_reports_one_loss_per_epoch_and_observes_each() {
        let mut net = Network::new_with_seed(Dims::new(2, 4, 1), 0).unwrap();
        let mut seen = Vec::new();
        let report = net
            .fit(
                &tiny_data(),
                FitConfig { epochs: 7, lr: 0.05 },
                &mut |epoch: usize, loss: f64| seen.push((epoch, loss)),
            )
            .unwrap();

        assert_eq!(report.epoch_losses.len(), 7);
        assert_eq!(seen.len(), 7);
        for (i, &(epoch, loss)) in seen.iter().enumerate() {
            assert_eq!(epoch, i);
            assert_eq!(loss, report.epoch_losses[i]);
        }
    }

    #[test]
    fn epoch_loss_is_mean_of_sample_losses_along_the_trajectory() {
        let data = tiny_data();
        let start = Network::new_with_seed(Dims::new(2, 3, 1), 5).unwrap();

        let mut manual = start.clone();
        let opt = Sgd::new(0.1).unwrap();
        let mut trainer = manual.trainer();
        let mut sum = 0.0;
        for s in data.iter() {
            sum += trainer.step(&mut manual, &opt, s.x, s.y).unwrap();
        }

        let mut fitted = start;
        let report = fitted
            .fit(&data, FitConfig { epochs: 1, lr: 0.1 }, &mut Silent)
            .unwrap();

        assert_eq!(report.epoch_losses[0], sum / 3.0);
        assert_eq!(manual, fitted);
    }

    #[test]
    fn fit_validates_shapes_and_config() {
        let mut net = Network::new_with_seed(Dims::new(3, 2, 1), 0).unwrap();
        assert!(matches!(
            net.fit(&tiny_data(), FitConfig::default(), &mut Silent),
            Err(Error::InvalidData(_))
        ));

        let mut net = Network::new_with_seed(Dims::new(2, 2, 1), 0).unwrap();
        assert!(matches!(
            net.fit(&tiny_data(), FitConfig { epochs: 0, lr: 0.1 }, &mut Silent),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            net.fit(&tiny_data(), FitConfig { epochs: 1, lr: 0.0 }, &mut Silent),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn step_refuses_non_finite_gradients() {
        let mut net = Network::new_with_seed(Dims::new(2, 2, 1), 0).unwrap();
        let before = net.clone();
        let opt = Sgd::new(0.1).unwrap();
        let mut trainer = net.trainer();
        assert!(
            trainer
                .step(&mut net, &opt, &[0.1, 0.2], &[f64::INFINITY])
                .is_none()
        );
        assert_eq!(net, before);
    }

    #[test]
    fn run_rejects_invalid_config_before_training() {
        let cfg = TrainConfig {
            test_input: vec![1.0, 2.0, 3.0],
            ..TrainConfig::default()
        };
        assert!(matches!(run(&cfg), Err(Error::InvalidConfig(_))));
    }
}
