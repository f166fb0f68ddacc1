pub mod api;
pub mod session;

pub use api::NikePlusClient;
pub use session::Session;
