pub mod backend;
pub mod http;
pub mod locations;

pub use self::backend::BackendClient;
pub use self::locations::IbgeClient;
