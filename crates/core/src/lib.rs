pub mod error;
pub mod sample;
pub mod session;

pub use error::Error;
pub use sample::*;
pub use session::*;
