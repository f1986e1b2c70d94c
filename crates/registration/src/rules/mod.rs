pub mod gate;
pub mod validators;
pub mod visibility;

pub use gate::*;
pub use validators::*;
pub use visibility::{apply_auto_fill, is_locked, is_visible, visible_fields};
