//! Sales-order entry core.
//!
//! Two cooperating engines, both pure and state-local:
//!
//! - the **order computation engine** ([`order`]): a [`SalesOrder`] owned by
//!   the caller, mutated through field setters and a single line-item edit
//!   reducer, with totals rederived after every change;
//! - the **validation engine** ([`validation`]): a pure function from the
//!   order snapshot plus read-only reference data to blocking errors and
//!   non-blocking warnings.
//!
//! The [`save`] module gates the terminal save action on the validation
//! outcome as an explicit two-phase commit.

pub mod order;
pub mod save;
pub mod validation;

pub use order::{
    LineItem, LineItemEdit, LineItemId, OrderNumber, OrderStatus, PaymentMethod, SalesOrder,
    TaxMode, TAX_RATE,
};
pub use save::SaveOutcome;
pub use validation::{validate, OrderError, OrderWarning, ValidationReport};
