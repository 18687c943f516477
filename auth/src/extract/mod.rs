pub mod errors;
pub mod headers;

pub use errors::ExtractError;
pub use headers::api_key;
pub use headers::bearer_token;
