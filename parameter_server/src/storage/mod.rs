mod error;
mod store;

pub use error::{Result, StoreErr};
pub use store::ParameterStore;
