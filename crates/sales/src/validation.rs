//! Validation engine: derives errors and warnings from an order snapshot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use retroerp_refdata::ReferenceData;

use crate::order::SalesOrder;

/// Blocking validation error: the save action is disabled while any exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderError {
    /// No customer selected on the header.
    MissingCustomer,
    /// No order date entered.
    MissingOrderDate,
}

impl core::fmt::Display for OrderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            OrderError::MissingCustomer => f.write_str("please select a customer"),
            OrderError::MissingOrderDate => f.write_str("please enter the order date"),
        }
    }
}

/// Non-blocking warning: save proceeds only after explicit confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderWarning {
    /// `outstanding balance + order total` would exceed the customer's limit.
    CreditLimitExceeded { limit: Decimal },
    /// A row orders more than the product has on hand. `line` is the row's
    /// zero-based position in the grid.
    InsufficientStock { line: usize, available: i64 },
    /// The order has no rows at all.
    NoLineItems,
}

impl core::fmt::Display for OrderWarning {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            OrderWarning::CreditLimitExceeded { limit } => {
                write!(f, "order would exceed the customer credit limit ({limit})")
            }
            OrderWarning::InsufficientStock { available, .. } => {
                write!(f, "insufficient stock (available: {available})")
            }
            OrderWarning::NoLineItems => f.write_str("no products have been added"),
        }
    }
}

/// Outcome of one validation pass, rebuilt from scratch on every order change.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<OrderError>,
    pub warnings: Vec<OrderWarning>,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Nothing to report at all.
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

/// Evaluate the order against the business rules.
///
/// Pure: reads the snapshot and reference data, mutates nothing. Errors gate
/// the save action entirely; warnings require user confirmation.
pub fn validate(order: &SalesOrder, refdata: &dyn ReferenceData) -> ValidationReport {
    let mut report = ValidationReport::default();

    if order.customer_id().is_none() {
        report.errors.push(OrderError::MissingCustomer);
    }
    if order.order_date().is_none() {
        report.errors.push(OrderError::MissingOrderDate);
    }

    // Credit exposure: outstanding balance plus this order against the limit.
    // Unknown customers resolve to a zero-credit profile.
    if let Some(customer_id) = order.customer_id() {
        let credit = refdata.customer_credit(customer_id);
        if credit.balance + order.total_amount() > credit.limit {
            report.warnings.push(OrderWarning::CreditLimitExceeded {
                limit: credit.limit,
            });
        }
    }

    for (line, item) in order.items().iter().enumerate() {
        if let Some(product_id) = item.product_id() {
            if item.quantity() > Decimal::ZERO {
                let available = refdata.product_stock(product_id);
                if item.quantity() > Decimal::from(available) {
                    report
                        .warnings
                        .push(OrderWarning::InsufficientStock { line, available });
                }
            }
        }
    }

    if order.items().is_empty() {
        report.warnings.push(OrderWarning::NoLineItems);
    }

    report
}
