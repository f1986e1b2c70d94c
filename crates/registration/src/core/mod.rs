pub mod types;
pub mod form;
pub mod result;

pub use types::*;
pub use form::*;
pub use result::*;
