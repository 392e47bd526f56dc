//! Request middleware specific to the rescue API

pub mod body_limit;
pub mod error_details;

pub use body_limit::reject_oversized_body;
pub use error_details::hide_error_details;
