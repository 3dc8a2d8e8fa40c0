pub mod api_key;

pub use api_key::{RequireApiKey, API_KEY_HEADER};
