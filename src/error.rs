use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    InvalidData(String),
    InvalidConfig(String),
    InvalidShape(String),
    /// A loss, gradient or parameter became non-finite during training.
    Diverged {
        epoch: usize,
        sample: usize,
        /// Mean loss of the last fully completed epoch, if any.
        last_epoch_loss: Option<f64>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            Error::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Error::InvalidShape(msg) => write!(f, "invalid shape: {msg}"),
            Error::Diverged {
                epoch,
                sample,
                last_epoch_loss: Some(loss),
            } => write!(
                f,
                "training diverged at epoch {epoch}, sample {sample} (last epoch loss {loss})"
            ),
            Error::Diverged {
                epoch,
                sample,
                last_epoch_loss: None,
            } => write!(
                f,
                "training diverged at epoch {epoch}, sample {sample} (no completed epoch)"
            ),
        }
    }
}

impl std::error::Error for Error {}
