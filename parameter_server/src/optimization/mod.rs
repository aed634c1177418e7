mod accumulate;
mod optimizer;

pub use accumulate::Accumulate;
pub use optimizer::Optimizer;
