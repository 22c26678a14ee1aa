//! Drug data domain.
//!
//! The tools never own drug data; they query it through the [`DrugStore`]
//! capability. Two backends are provided:
//!
//! - `memory` - an in-memory catalog loaded from a JSON export (catalog
//!   records or openFDA drug labels)
//! - `remote` - a REST client for the web application's drug API

mod memory;
mod model;
mod openfda;
mod remote;
mod source;
mod store;
mod text;

#[cfg(test)]
pub(crate) mod fixtures;

pub use memory::InMemoryDrugStore;
pub use model::{DrugRecord, Page, PageRequest, Pagination};
pub use remote::RemoteDrugStore;
pub use source::open_store;
pub use store::{DrugStore, StoreError};
pub use text::{decode_entities, searchable, strip_markup};
