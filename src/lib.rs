mod classifier;
mod error;
mod helpers;
mod os_helpers;
mod signatures;
mod tokenizer;
mod types;

pub use classifier::UaClassifier;
pub use error::{Error, Result};
pub use types::*;
