pub mod ip;
pub mod url_validator;

pub use ip::{anonymize_ip, extract_client_ip, is_private_or_local};
pub use url_validator::validate_target_url;
