pub mod image;
pub mod service;

pub use image::{IMAGE_EXTENSIONS, MAX_IMAGE_BYTES};
pub use service::{validate_update, ProfileService};
