pub mod mangadex;
pub mod models;
pub mod traits;
