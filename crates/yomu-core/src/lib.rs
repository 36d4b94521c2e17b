pub mod config;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod request;
pub mod view;
