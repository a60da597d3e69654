// Storage transports

pub mod backend;
pub mod http;
pub mod sdk;
pub mod wire;

pub use backend::ObjectStore;
pub use http::HttpStore;
pub use sdk::SdkStore;
