use crate::storage::Result;

/// Defines the strategy for updating the weights with an incoming gradient.
pub trait Optimizer {
    /// Updates the provided slice of weights using the given gradient.
    ///
    /// # Arguments
    /// * `grad` - A reference to the model's gradient.
    /// * `params` - The weights to update.
    ///
    /// # Returns
    /// An error if there's a mismatch in the sizes of `grad` and `params`.
    fn update_params(&mut self, grad: &[f32], params: &mut [f32]) -> Result<()>;
}
