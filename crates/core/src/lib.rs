//! `retroerp-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the error model, strongly-typed record identifiers, and the amount
//! rounding/coercion helpers shared by the order and validation engines.

pub mod amount;
pub mod entity;
pub mod error;
pub mod id;

pub use amount::{parse_amount, round2};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CustomerId, ProductId, SalespersonId, WarehouseId};
