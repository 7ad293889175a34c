//! Save gate: two-phase commit over the validation outcome.
//!
//! The legacy screen blocked on a synchronous confirm() prompt when warnings
//! were present. Here the prompt lives with the caller: `attempt_save` reports
//! what stands in the way, and `confirm_and_save` is the explicit second phase
//! once the user has acknowledged the warnings.

use retroerp_refdata::ReferenceData;

use crate::order::{OrderStatus, SalesOrder};
use crate::validation::{validate, OrderError, OrderWarning};

/// Result of a save attempt. Save is terminal with respect to storage; the
/// only durable effect is the order's status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Order saved; status is now [`OrderStatus::Confirmed`].
    Saved,
    /// Warnings stand; nothing changed. Call `confirm_and_save` to proceed.
    NeedsConfirmation(Vec<OrderWarning>),
    /// Blocking errors stand; nothing changed.
    Blocked(Vec<OrderError>),
}

impl SalesOrder {
    /// First save phase: blocked by errors, paused by warnings, otherwise
    /// confirms the order.
    pub fn attempt_save(&mut self, refdata: &dyn ReferenceData) -> SaveOutcome {
        let report = validate(self, refdata);

        if report.has_errors() {
            tracing::debug!(
                order = %self.order_number(),
                errors = report.errors.len(),
                "save blocked by validation errors"
            );
            return SaveOutcome::Blocked(report.errors);
        }

        if report.has_warnings() {
            tracing::debug!(
                order = %self.order_number(),
                warnings = report.warnings.len(),
                "save paused pending confirmation"
            );
            return SaveOutcome::NeedsConfirmation(report.warnings);
        }

        self.mark_confirmed();
        tracing::info!(order = %self.order_number(), "order saved");
        SaveOutcome::Saved
    }

    /// Second save phase: the user has acknowledged the warnings. Errors
    /// still block; warnings no longer do.
    pub fn confirm_and_save(&mut self, refdata: &dyn ReferenceData) -> SaveOutcome {
        let report = validate(self, refdata);

        if report.has_errors() {
            tracing::debug!(
                order = %self.order_number(),
                errors = report.errors.len(),
                "confirmed save still blocked by validation errors"
            );
            return SaveOutcome::Blocked(report.errors);
        }

        self.mark_confirmed();
        tracing::info!(
            order = %self.order_number(),
            warnings_acknowledged = report.warnings.len(),
            "order saved after confirmation"
        );
        SaveOutcome::Saved
    }

    /// Whether the save action should be enabled at all in the UI.
    pub fn can_save(&self, refdata: &dyn ReferenceData) -> bool {
        !validate(self, refdata).has_errors()
    }
}
