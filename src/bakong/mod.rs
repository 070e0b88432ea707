pub mod client;
pub mod error;
pub mod khqr;
pub mod qr_image;
pub mod service;
pub mod token;
pub mod types;

pub use error::{BakongError, BakongResult};
pub use service::BakongService;
