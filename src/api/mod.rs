pub mod client;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use error::{ApiError, ErrorKind};
pub use types::{ApiRequest, ApiResponse, Attachment, FilePart, FormPayload, RequestBody};
