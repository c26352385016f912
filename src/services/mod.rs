pub mod candidates;
pub mod catalog;
pub mod images;
pub mod ranking;
pub mod recommendations;
pub mod session;
pub mod taste;

pub use catalog::{CatalogClient, TmdbCatalog};
pub use images::ImageUrls;
pub use recommendations::RecommendationEngine;
pub use session::Session;
