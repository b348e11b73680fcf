pub mod error;

pub use error::MenuError;
