use super::Optimizer;
use crate::storage::{Result, StoreErr};

/// Adds every gradient in full into the weights, plus a constant step on each element.
///
/// There's no learning rate nor averaging, concurrent workers' gradients are summed up.
#[derive(Debug, Clone)]
pub struct Accumulate {
    step: f32,
}

impl Accumulate {
    /// The default step added to every element on each update.
    pub const DEFAULT_STEP: f32 = 0.01;

    /// Creates a new `Accumulate` optimizer.
    ///
    /// # Arguments
    /// * `step` - The regularization step added to every weight on each update.
    ///
    /// # Returns
    /// A new `Accumulate` instance.
    pub fn new(step: f32) -> Self {
        Self { step }
    }

    pub fn step(&self) -> f32 {
        self.step
    }
}

impl Default for Accumulate {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STEP)
    }
}

impl Optimizer for Accumulate {
    fn update_params(&mut self, grad: &[f32], params: &mut [f32]) -> Result<()> {
        if grad.len() != params.len() {
            return Err(StoreErr::DimensionMismatch {
                expected: params.len(),
                got: grad.len(),
            });
        }

        let step = self.step;

        for (p, g) in params.iter_mut().zip(grad) {
            *p += g + step;
        }

        Ok(())
    }
}
