pub mod kind;

pub use stepwise_error::Error;
