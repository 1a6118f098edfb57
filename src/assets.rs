pub mod cache;
pub mod decode;
pub mod fetch;
pub mod source;
