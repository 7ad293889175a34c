//! Reference data for the sales-order entry core.
//!
//! The order and validation engines never mutate this data; they only look
//! records up by code through the [`ReferenceData`] contract. The in-memory
//! store ships with the legacy screen's fixture (three customers, three
//! products, three warehouses) so the engines can run without any backend.

pub mod records;
pub mod store;

pub use records::{Customer, Product, Salesperson, Warehouse};
pub use store::{CreditProfile, InMemoryReferenceData, ReferenceData};
