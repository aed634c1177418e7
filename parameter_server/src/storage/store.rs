use crate::{
    optimization::Optimizer,
    storage::{Result, StoreErr},
};

/// The shared weights of the model together with the rules to update them and to
/// decide when training is over.
///
/// The dimension of the weights is unknown until the first gradient arrives, from
/// then on every gradient must match it.
#[derive(Debug)]
pub struct ParameterStore<O: Optimizer> {
    params: Option<Vec<f32>>,
    optimizer: O,
    max_epochs: u64,
}

impl<O: Optimizer> ParameterStore<O> {
    /// The default epoch from which workers are told to stop.
    pub const DEFAULT_MAX_EPOCHS: u64 = 10;

    /// Creates a new, uninitialized, `ParameterStore`.
    ///
    /// # Arguments
    /// * `optimizer` - The update rule applied on every gradient.
    /// * `max_epochs` - The epoch from which workers are told to stop.
    ///
    /// # Returns
    /// A new `ParameterStore` instance.
    pub fn new(optimizer: O, max_epochs: u64) -> Self {
        Self {
            params: None,
            optimizer,
            max_epochs,
        }
    }

    /// Applies a gradient to the weights, initializing them to zeros on the first call.
    ///
    /// # Arguments
    /// * `grad` - A flat slice containing a worker's gradient.
    ///
    /// # Returns
    /// A `StoreErr` if `grad` is empty or doesn't match the weights dimension, in which
    /// case the weights are left untouched.
    pub fn apply_gradient(&mut self, grad: &[f32]) -> Result<()> {
        if grad.is_empty() {
            return Err(StoreErr::EmptyGradient);
        }

        let params = self.params.get_or_insert_with(|| vec![0.; grad.len()]);
        self.optimizer.update_params(grad, params)
    }

    /// Whether a worker reporting `epoch` should stop training.
    ///
    /// Only the epoch of the current request counts, no per worker history is kept.
    pub fn decide_stop(&self, epoch: u64) -> bool {
        epoch >= self.max_epochs
    }

    /// The current weights, empty if no gradient has been applied yet.
    pub fn snapshot(&self) -> &[f32] {
        self.params.as_deref().unwrap_or_default()
    }

    /// Returns the size of the storage.
    ///
    /// # Returns
    /// The weights dimension, 0 while uninitialized.
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_initialized(&self) -> bool {
        self.params.is_some()
    }

    pub fn max_epochs(&self) -> u64 {
        self.max_epochs
    }
}
