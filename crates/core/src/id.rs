//! Strongly-typed identifiers used across the domain.
//!
//! The legacy dataset keys every record by a short code (`C001`, `P001`,
//! `W01`, `S01`). Each record kind gets its own newtype so an order cannot
//! accidentally point a customer field at a product code.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a customer record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

/// Identifier of a product record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

/// Identifier of a warehouse record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WarehouseId(String);

/// Identifier of a salesperson record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SalespersonId(String);

macro_rules! impl_code_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Create an identifier from a record code.
            ///
            /// Codes must be non-empty ASCII alphanumerics (the legacy scheme
            /// never used anything else).
            pub fn new(code: impl Into<String>) -> Result<Self, DomainError> {
                let code = code.into();
                if code.is_empty() {
                    return Err(DomainError::invalid_id(concat!($name, ": empty code")));
                }
                if !code.bytes().all(|b| b.is_ascii_alphanumeric()) {
                    return Err(DomainError::invalid_id(format!(
                        "{}: malformed code {:?}",
                        $name, code
                    )));
                }
                Ok(Self(code))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

impl_code_newtype!(CustomerId, "CustomerId");
impl_code_newtype!(ProductId, "ProductId");
impl_code_newtype!(WarehouseId, "WarehouseId");
impl_code_newtype!(SalespersonId, "SalespersonId");
