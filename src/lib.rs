pub mod analysis;
pub mod catalog;
pub mod enrich;
pub mod error;
pub mod logging;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod reader;
pub mod report;
pub mod util;
pub mod validation;

pub use error::{CatalogError, SalesError};
pub use models::{CatalogEntry, CatalogProduct, EnrichedTransaction, Transaction};
