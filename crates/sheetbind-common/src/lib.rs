pub mod address;
pub mod decimal;
pub mod error;
pub mod value;

pub use address::*;
pub use decimal::*;
pub use error::*;
pub use value::*;
