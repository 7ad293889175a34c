//! Sales order model and the order computation engine.

use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use retroerp_core::{round2, CustomerId, DomainError, DomainResult, ProductId, SalespersonId, WarehouseId};
use retroerp_refdata::ReferenceData;

/// Fixed business tax rate (5%).
pub const TAX_RATE: Decimal = dec!(0.05);

/// How many days after the order date payment falls due by default.
const DEFAULT_PAYMENT_TERM_DAYS: u64 = 30;

/// Tax treatment mode selected on the order header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxMode {
    /// No tax at all.
    Exempt,
    /// Tax added on top of the subtotal.
    External,
    /// Tax already embedded in the subtotal; derived figure is informational.
    Included,
}

/// Order status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Draft,
    Confirmed,
    Shipped,
    Completed,
    Cancelled,
}

/// Payment method selected on the order header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Credit,
    Transfer,
    Check,
}

/// Line item identifier, unique within the order.
///
/// UUIDv7: unique without counter state and time-ordered at millisecond
/// granularity. Row ordering itself lives in the order's item vector.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(Uuid);

impl LineItemId {
    fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl core::fmt::Display for LineItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Order number in the legacy `SO<yyyymmdd><nnn>` scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Generate a number for the given instant. The three-digit suffix comes
    /// from the sub-second millis, so the core needs no RNG.
    pub fn generate(now: DateTime<Utc>) -> Self {
        Self(format!(
            "SO{}{:03}",
            now.format("%Y%m%d"),
            now.timestamp_subsec_millis() % 1000
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the order grid.
///
/// `subtotal` is derived; it only changes through the edit reducer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    id: LineItemId,
    product_id: Option<ProductId>,
    price: Decimal,
    quantity: Decimal,
    subtotal: Decimal,
    warehouse_id: Option<WarehouseId>,
    is_attachment: bool,
    note: String,
}

impl LineItem {
    fn empty(warehouse_id: Option<WarehouseId>) -> Self {
        Self {
            id: LineItemId::new(),
            product_id: None,
            price: Decimal::ZERO,
            quantity: Decimal::ZERO,
            subtotal: Decimal::ZERO,
            warehouse_id,
            is_attachment: false,
            note: String::new(),
        }
    }

    pub fn id(&self) -> LineItemId {
        self.id
    }

    pub fn product_id(&self) -> Option<&ProductId> {
        self.product_id.as_ref()
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    pub fn warehouse_id(&self) -> Option<&WarehouseId> {
        self.warehouse_id.as_ref()
    }

    pub fn is_attachment(&self) -> bool {
        self.is_attachment
    }

    pub fn note(&self) -> &str {
        &self.note
    }
}

/// One editable field of a line item.
///
/// The legacy screen dispatched edits by field name string; this sum type is
/// the typed replacement, routed through [`SalesOrder::apply_line_edit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineItemEdit {
    SetProduct(ProductId),
    SetQuantity(Decimal),
    SetPrice(Decimal),
    SetWarehouse(Option<WarehouseId>),
    ToggleAttachment,
    SetNote(String),
}

impl LineItemEdit {
    /// Quantity edit from raw field text; non-numeric input becomes zero,
    /// the legacy grid's coercion rule.
    pub fn quantity_from_text(raw: &str) -> Self {
        Self::SetQuantity(retroerp_core::parse_amount(raw))
    }

    /// Price edit from raw field text, same coercion rule.
    pub fn price_from_text(raw: &str) -> Self {
        Self::SetPrice(retroerp_core::parse_amount(raw))
    }
}

/// The aggregate root: one in-flight sales order.
///
/// All derived fields (`subtotal_before_tax`, `tax`, `total_amount`,
/// `remaining_amount`, line subtotals) are rederived by the engine after each
/// mutation; callers never write them directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesOrder {
    order_number: OrderNumber,
    order_date: Option<NaiveDate>,
    customer_id: Option<CustomerId>,
    salesperson_id: Option<SalespersonId>,
    /// Default warehouse for newly added lines.
    warehouse_id: Option<WarehouseId>,
    payment_method: PaymentMethod,
    payment_due_date: Option<NaiveDate>,
    is_rental: bool,
    notes: String,
    discount: Decimal,
    tax_mode: TaxMode,
    subtotal_before_tax: Decimal,
    tax: Decimal,
    total_amount: Decimal,
    paid_amount: Decimal,
    remaining_amount: Decimal,
    status: OrderStatus,
    items: Vec<LineItem>,
}

impl SalesOrder {
    /// Start a fresh draft: generated order number, today's date, payment due
    /// in 30 days, zero totals, no items.
    pub fn new(now: DateTime<Utc>) -> Self {
        let order_date = now.date_naive();
        Self {
            order_number: OrderNumber::generate(now),
            order_date: Some(order_date),
            customer_id: None,
            salesperson_id: None,
            warehouse_id: None,
            payment_method: PaymentMethod::Cash,
            payment_due_date: order_date.checked_add_days(Days::new(DEFAULT_PAYMENT_TERM_DAYS)),
            is_rental: false,
            notes: String::new(),
            discount: Decimal::ZERO,
            tax_mode: TaxMode::Exempt,
            subtotal_before_tax: Decimal::ZERO,
            tax: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            paid_amount: Decimal::ZERO,
            remaining_amount: Decimal::ZERO,
            status: OrderStatus::Draft,
            items: Vec::new(),
        }
    }

    /// Discard everything and start over (the screen's clear action).
    pub fn reset(&mut self, now: DateTime<Utc>) {
        *self = Self::new(now);
    }

    // ---- header accessors -------------------------------------------------

    pub fn order_number(&self) -> &OrderNumber {
        &self.order_number
    }

    pub fn order_date(&self) -> Option<NaiveDate> {
        self.order_date
    }

    pub fn customer_id(&self) -> Option<&CustomerId> {
        self.customer_id.as_ref()
    }

    pub fn salesperson_id(&self) -> Option<&SalespersonId> {
        self.salesperson_id.as_ref()
    }

    pub fn default_warehouse_id(&self) -> Option<&WarehouseId> {
        self.warehouse_id.as_ref()
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn payment_due_date(&self) -> Option<NaiveDate> {
        self.payment_due_date
    }

    pub fn is_rental(&self) -> bool {
        self.is_rental
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn discount(&self) -> Decimal {
        self.discount
    }

    pub fn tax_mode(&self) -> TaxMode {
        self.tax_mode
    }

    pub fn subtotal_before_tax(&self) -> Decimal {
        self.subtotal_before_tax
    }

    pub fn tax(&self) -> Decimal {
        self.tax
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn paid_amount(&self) -> Decimal {
        self.paid_amount
    }

    pub fn remaining_amount(&self) -> Decimal {
        self.remaining_amount
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    // ---- header setters ---------------------------------------------------

    pub fn set_customer(&mut self, customer_id: Option<CustomerId>) {
        self.customer_id = customer_id;
    }

    pub fn set_order_date(&mut self, date: Option<NaiveDate>) {
        self.order_date = date;
    }

    pub fn set_salesperson(&mut self, salesperson_id: Option<SalespersonId>) {
        self.salesperson_id = salesperson_id;
    }

    pub fn set_default_warehouse(&mut self, warehouse_id: Option<WarehouseId>) {
        self.warehouse_id = warehouse_id;
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    pub fn set_payment_due_date(&mut self, date: Option<NaiveDate>) {
        self.payment_due_date = date;
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub fn set_rental(&mut self, is_rental: bool) {
        self.is_rental = is_rental;
    }

    // ---- computation engine -----------------------------------------------

    /// Append a zero-valued row, warehouse defaulted from the order header.
    ///
    /// Returns the new row's index. Totals need no recomputation: the new
    /// subtotal is zero.
    pub fn add_line_item(&mut self) -> usize {
        self.items.push(LineItem::empty(self.warehouse_id.clone()));
        self.items.len() - 1
    }

    /// Apply one field edit to the row at `index`, then rederive order totals.
    ///
    /// `SetProduct` copies the product's list price onto the row and defaults
    /// its warehouse (product's own warehouse, falling back to the order
    /// header's); an unknown product id is stored as-is with no enrichment.
    /// Only direct `SetQuantity`/`SetPrice` edits recompute the row subtotal.
    pub fn apply_line_edit(
        &mut self,
        index: usize,
        edit: LineItemEdit,
        refdata: &dyn ReferenceData,
    ) -> DomainResult<()> {
        let len = self.items.len();
        let order_warehouse = self.warehouse_id.clone();
        let item = self
            .items
            .get_mut(index)
            .ok_or(DomainError::LineIndexOutOfRange { index, len })?;

        match edit {
            LineItemEdit::SetProduct(product_id) => {
                if let Some(product) = refdata.find_product(&product_id) {
                    item.price = product.price;
                    if item.warehouse_id.is_none() {
                        item.warehouse_id = refdata
                            .default_warehouse_for_product(&product_id)
                            .or(order_warehouse);
                    }
                }
                item.product_id = Some(product_id);
            }
            LineItemEdit::SetQuantity(quantity) => {
                item.quantity = quantity;
                item.subtotal = round2(item.quantity * item.price);
            }
            LineItemEdit::SetPrice(price) => {
                item.price = price;
                item.subtotal = round2(item.quantity * item.price);
            }
            LineItemEdit::SetWarehouse(warehouse_id) => {
                item.warehouse_id = warehouse_id;
            }
            LineItemEdit::ToggleAttachment => {
                item.is_attachment = !item.is_attachment;
            }
            LineItemEdit::SetNote(note) => {
                item.note = note;
            }
        }

        self.recompute_totals();
        Ok(())
    }

    /// Remove the row at `index`, shifting later rows down, then rederive
    /// order totals.
    pub fn remove_line_item(&mut self, index: usize) -> DomainResult<()> {
        if index >= self.items.len() {
            return Err(DomainError::LineIndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        self.items.remove(index);
        self.recompute_totals();
        Ok(())
    }

    /// Switch tax treatment; recomputes tax and total without touching rows.
    pub fn set_tax_mode(&mut self, mode: TaxMode) {
        self.tax_mode = mode;
        self.recompute_totals();
    }

    /// Change the order-level discount; tax is unaffected (it derives from the
    /// subtotal only).
    pub fn set_discount(&mut self, amount: Decimal) {
        self.discount = amount;
        self.recompute_totals();
    }

    /// Record a payment; only the remaining amount changes.
    pub fn set_paid_amount(&mut self, amount: Decimal) {
        self.paid_amount = amount;
        self.remaining_amount = self.total_amount - self.paid_amount;
    }

    pub(crate) fn mark_confirmed(&mut self) {
        self.status = OrderStatus::Confirmed;
    }

    /// Rederive every order-level figure from the current rows and header.
    ///
    /// Included-mode tax is informational: it is assumed pre-embedded in the
    /// subtotal, so it never adds to the total.
    fn recompute_totals(&mut self) {
        self.subtotal_before_tax = self.items.iter().map(|item| item.subtotal).sum();

        self.tax = match self.tax_mode {
            TaxMode::Exempt => Decimal::ZERO,
            TaxMode::External => round2(self.subtotal_before_tax * TAX_RATE),
            TaxMode::Included => {
                round2(self.subtotal_before_tax * TAX_RATE / (Decimal::ONE + TAX_RATE))
            }
        };

        let after_discount = self.subtotal_before_tax - self.discount;
        self.total_amount = round2(match self.tax_mode {
            TaxMode::External => after_discount + self.tax,
            TaxMode::Exempt | TaxMode::Included => after_discount,
        });

        self.remaining_amount = self.total_amount - self.paid_amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retroerp_refdata::{InMemoryReferenceData, Product};

    fn seeded() -> InMemoryReferenceData {
        InMemoryReferenceData::seeded().unwrap()
    }

    fn test_now() -> DateTime<Utc> {
        Utc::now()
    }

    fn product_id(code: &str) -> ProductId {
        ProductId::new(code).unwrap()
    }

    /// Order with one row whose subtotal is exactly `amount`.
    fn order_with_subtotal(amount: Decimal, refdata: &dyn ReferenceData) -> SalesOrder {
        let mut order = SalesOrder::new(test_now());
        let idx = order.add_line_item();
        order
            .apply_line_edit(idx, LineItemEdit::SetQuantity(Decimal::ONE), refdata)
            .unwrap();
        order
            .apply_line_edit(idx, LineItemEdit::SetPrice(amount), refdata)
            .unwrap();
        order
    }

    #[test]
    fn new_order_starts_zeroed() {
        let order = SalesOrder::new(test_now());

        assert!(order.order_number().as_str().starts_with("SO"));
        assert_eq!(order.order_number().as_str().len(), "SO".len() + 8 + 3);
        assert!(order.order_date().is_some());
        assert_eq!(order.status(), OrderStatus::Draft);
        assert_eq!(order.tax_mode(), TaxMode::Exempt);
        assert!(order.items().is_empty());
        assert_eq!(order.subtotal_before_tax(), Decimal::ZERO);
        assert_eq!(order.total_amount(), Decimal::ZERO);
        assert_eq!(order.remaining_amount(), Decimal::ZERO);
    }

    #[test]
    fn payment_due_defaults_to_thirty_days_out() {
        let order = SalesOrder::new(test_now());
        let order_date = order.order_date().unwrap();
        let due = order.payment_due_date().unwrap();
        assert_eq!(due - order_date, chrono::Duration::days(30));
    }

    #[test]
    fn added_line_inherits_order_default_warehouse() {
        let mut order = SalesOrder::new(test_now());
        order.set_default_warehouse(Some(WarehouseId::new("W01").unwrap()));

        let idx = order.add_line_item();
        let item = &order.items()[idx];
        assert_eq!(item.warehouse_id(), Some(&WarehouseId::new("W01").unwrap()));
        assert_eq!(item.quantity(), Decimal::ZERO);
        assert_eq!(item.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn selecting_product_copies_list_price_and_warehouse() {
        let refdata = seeded();
        let mut order = SalesOrder::new(test_now());
        let idx = order.add_line_item();

        order
            .apply_line_edit(idx, LineItemEdit::SetProduct(product_id("P001")), &refdata)
            .unwrap();

        let item = &order.items()[idx];
        assert_eq!(item.product_id(), Some(&product_id("P001")));
        assert_eq!(item.price(), dec!(32.5));
        assert_eq!(item.warehouse_id(), Some(&WarehouseId::new("W03").unwrap()));
    }

    #[test]
    fn selecting_product_without_own_warehouse_falls_back_to_order_default() {
        let mut refdata = InMemoryReferenceData::new();
        refdata
            .insert_product(Product {
                id: product_id("P100"),
                name: "散裝品".to_string(),
                unit: "件".to_string(),
                price: dec!(10),
                cost: None,
                stock_quantity: 10,
                warehouse_id: None,
                category: None,
                taxable: true,
            })
            .unwrap();

        let mut order = SalesOrder::new(test_now());
        order.set_default_warehouse(Some(WarehouseId::new("W02").unwrap()));
        let idx = order.add_line_item();
        // Clear the inherited default so the fallback path is exercised.
        order
            .apply_line_edit(idx, LineItemEdit::SetWarehouse(None), &refdata)
            .unwrap();

        order
            .apply_line_edit(idx, LineItemEdit::SetProduct(product_id("P100")), &refdata)
            .unwrap();
        assert_eq!(
            order.items()[idx].warehouse_id(),
            Some(&WarehouseId::new("W02").unwrap())
        );
    }

    #[test]
    fn selecting_product_keeps_already_chosen_warehouse() {
        let refdata = seeded();
        let mut order = SalesOrder::new(test_now());
        let idx = order.add_line_item();

        order
            .apply_line_edit(
                idx,
                LineItemEdit::SetWarehouse(Some(WarehouseId::new("W01").unwrap())),
                &refdata,
            )
            .unwrap();
        order
            .apply_line_edit(idx, LineItemEdit::SetProduct(product_id("P001")), &refdata)
            .unwrap();

        assert_eq!(
            order.items()[idx].warehouse_id(),
            Some(&WarehouseId::new("W01").unwrap())
        );
    }

    #[test]
    fn unknown_product_is_stored_without_enrichment() {
        let refdata = seeded();
        let mut order = SalesOrder::new(test_now());
        let idx = order.add_line_item();

        order
            .apply_line_edit(idx, LineItemEdit::SetProduct(product_id("P999")), &refdata)
            .unwrap();

        let item = &order.items()[idx];
        assert_eq!(item.product_id(), Some(&product_id("P999")));
        assert_eq!(item.price(), Decimal::ZERO);
        assert_eq!(item.warehouse_id(), None);
    }

    #[test]
    fn selecting_product_updates_price_without_touching_subtotal() {
        // The legacy screen only recomputed a row subtotal on direct
        // quantity/price edits; product selection leaves it as-is.
        let refdata = seeded();
        let mut order = SalesOrder::new(test_now());
        let idx = order.add_line_item();

        order
            .apply_line_edit(idx, LineItemEdit::SetQuantity(dec!(5)), &refdata)
            .unwrap();
        order
            .apply_line_edit(idx, LineItemEdit::SetProduct(product_id("P001")), &refdata)
            .unwrap();

        let item = &order.items()[idx];
        assert_eq!(item.price(), dec!(32.5));
        assert_eq!(item.subtotal(), Decimal::ZERO);

        // The next direct edit catches the row up.
        order
            .apply_line_edit(idx, LineItemEdit::SetQuantity(dec!(5)), &refdata)
            .unwrap();
        assert_eq!(order.items()[idx].subtotal(), dec!(162.50));
    }

    #[test]
    fn text_edits_coerce_non_numeric_input_to_zero() {
        let refdata = seeded();
        let mut order = order_with_subtotal(dec!(100), &refdata);

        order
            .apply_line_edit(0, LineItemEdit::quantity_from_text("3"), &refdata)
            .unwrap();
        order
            .apply_line_edit(0, LineItemEdit::price_from_text("abc"), &refdata)
            .unwrap();

        let item = &order.items()[0];
        assert_eq!(item.quantity(), dec!(3));
        assert_eq!(item.price(), Decimal::ZERO);
        assert_eq!(item.subtotal(), Decimal::ZERO);
        assert_eq!(order.subtotal_before_tax(), Decimal::ZERO);
    }

    #[test]
    fn quantity_and_price_edits_recompute_row_subtotal() {
        let refdata = seeded();
        let mut order = SalesOrder::new(test_now());
        let idx = order.add_line_item();

        order
            .apply_line_edit(idx, LineItemEdit::SetPrice(dec!(32.5)), &refdata)
            .unwrap();
        order
            .apply_line_edit(idx, LineItemEdit::SetQuantity(dec!(3)), &refdata)
            .unwrap();

        assert_eq!(order.items()[idx].subtotal(), dec!(97.50));
        assert_eq!(order.subtotal_before_tax(), dec!(97.50));
    }

    #[test]
    fn row_subtotal_rounds_half_away_from_zero() {
        let refdata = seeded();
        let mut order = SalesOrder::new(test_now());
        let idx = order.add_line_item();

        order
            .apply_line_edit(idx, LineItemEdit::SetPrice(dec!(0.335)), &refdata)
            .unwrap();
        order
            .apply_line_edit(idx, LineItemEdit::SetQuantity(dec!(3)), &refdata)
            .unwrap();

        // 3 × 0.335 = 1.005 → 1.01
        assert_eq!(order.items()[idx].subtotal(), dec!(1.01));
    }

    #[test]
    fn external_tax_scenario() {
        let refdata = seeded();
        let mut order = order_with_subtotal(dec!(1000), &refdata);
        order.set_tax_mode(TaxMode::External);

        assert_eq!(order.subtotal_before_tax(), dec!(1000));
        assert_eq!(order.tax(), dec!(50.00));
        assert_eq!(order.total_amount(), dec!(1050.00));
    }

    #[test]
    fn included_tax_scenario() {
        let refdata = seeded();
        let mut order = order_with_subtotal(dec!(1000), &refdata);
        order.set_tax_mode(TaxMode::Included);

        // 1000 × 0.05 / 1.05 = 47.619… → 47.62; total excludes the derived tax.
        assert_eq!(order.tax(), dec!(47.62));
        assert_eq!(order.total_amount(), dec!(1000.00));
    }

    #[test]
    fn exempt_mode_has_no_tax() {
        let refdata = seeded();
        let mut order = order_with_subtotal(dec!(1000), &refdata);
        order.set_tax_mode(TaxMode::Exempt);

        assert_eq!(order.tax(), Decimal::ZERO);
        assert_eq!(order.total_amount(), dec!(1000.00));
    }

    #[test]
    fn discount_reduces_total_but_not_tax() {
        let refdata = seeded();
        let mut order = order_with_subtotal(dec!(1000), &refdata);
        order.set_tax_mode(TaxMode::External);

        order.set_discount(dec!(100));
        assert_eq!(order.tax(), dec!(50.00));
        assert_eq!(order.total_amount(), dec!(950.00));
    }

    #[test]
    fn remaining_amount_tracks_total_minus_paid() {
        let refdata = seeded();
        let mut order = order_with_subtotal(dec!(1000), &refdata);

        order.set_paid_amount(dec!(400));
        assert_eq!(order.remaining_amount(), dec!(600.00));

        order.set_tax_mode(TaxMode::External);
        assert_eq!(order.remaining_amount(), dec!(650.00));
    }

    #[test]
    fn removing_the_only_row_returns_totals_to_zero() {
        let refdata = seeded();
        let mut order = order_with_subtotal(dec!(1000), &refdata);
        order.set_tax_mode(TaxMode::External);

        order.remove_line_item(0).unwrap();
        assert!(order.items().is_empty());
        assert_eq!(order.subtotal_before_tax(), Decimal::ZERO);
        assert_eq!(order.tax(), Decimal::ZERO);
        assert_eq!(order.total_amount(), Decimal::ZERO);
    }

    #[test]
    fn removing_a_row_shifts_later_rows_down() {
        let refdata = seeded();
        let mut order = SalesOrder::new(test_now());
        for price in [dec!(10), dec!(20), dec!(30)] {
            let idx = order.add_line_item();
            order
                .apply_line_edit(idx, LineItemEdit::SetQuantity(Decimal::ONE), &refdata)
                .unwrap();
            order
                .apply_line_edit(idx, LineItemEdit::SetPrice(price), &refdata)
                .unwrap();
        }

        order.remove_line_item(1).unwrap();
        assert_eq!(order.items().len(), 2);
        assert_eq!(order.items()[0].subtotal(), dec!(10.00));
        assert_eq!(order.items()[1].subtotal(), dec!(30.00));
        assert_eq!(order.subtotal_before_tax(), dec!(40.00));
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let refdata = seeded();
        let mut order = SalesOrder::new(test_now());
        order.add_line_item();

        let err = order
            .apply_line_edit(3, LineItemEdit::SetQuantity(Decimal::ONE), &refdata)
            .unwrap_err();
        assert_eq!(err, DomainError::LineIndexOutOfRange { index: 3, len: 1 });

        let err = order.remove_line_item(1).unwrap_err();
        assert_eq!(err, DomainError::LineIndexOutOfRange { index: 1, len: 1 });
    }

    #[test]
    fn tax_mode_switch_leaves_subtotal_untouched() {
        let refdata = seeded();
        let mut order = order_with_subtotal(dec!(500), &refdata);

        for mode in [TaxMode::External, TaxMode::Included, TaxMode::Exempt] {
            order.set_tax_mode(mode);
            assert_eq!(order.subtotal_before_tax(), dec!(500.00));
        }
    }

    #[test]
    fn toggle_attachment_and_note_edits_are_plain_field_writes() {
        let refdata = seeded();
        let mut order = order_with_subtotal(dec!(100), &refdata);

        order
            .apply_line_edit(0, LineItemEdit::ToggleAttachment, &refdata)
            .unwrap();
        order
            .apply_line_edit(0, LineItemEdit::SetNote("隨貨附贈".to_string()), &refdata)
            .unwrap();

        let item = &order.items()[0];
        assert!(item.is_attachment());
        assert_eq!(item.note(), "隨貨附贈");
        assert_eq!(order.subtotal_before_tax(), dec!(100.00));
    }

    #[test]
    fn reset_discards_all_state() {
        let refdata = seeded();
        let mut order = order_with_subtotal(dec!(1000), &refdata);
        order.set_customer(Some(CustomerId::new("C001").unwrap()));
        order.set_tax_mode(TaxMode::External);

        order.reset(test_now());
        assert!(order.customer_id().is_none());
        assert!(order.items().is_empty());
        assert_eq!(order.total_amount(), Decimal::ZERO);
        assert_eq!(order.status(), OrderStatus::Draft);
    }

    #[test]
    fn line_item_ids_are_unique_within_the_order() {
        let mut order = SalesOrder::new(test_now());
        order.add_line_item();
        order.add_line_item();
        order.add_line_item();

        let mut ids: Vec<_> = order.items().iter().map(|i| *i.id().as_uuid()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn order_snapshot_round_trips_through_json() {
        let refdata = seeded();
        let mut order = order_with_subtotal(dec!(97.5), &refdata);
        order.set_customer(Some(CustomerId::new("C002").unwrap()));
        order.set_tax_mode(TaxMode::Included);

        let json = serde_json::to_string(&order).unwrap();
        let back: SalesOrder = serde_json::from_str(&json).unwrap();
        assert_eq!(back, order);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        /// Non-negative amount with up to two decimal places.
        fn amount() -> impl Strategy<Value = Decimal> {
            (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: a row subtotal is always round2(quantity × price)
            /// after a direct quantity/price edit.
            #[test]
            fn row_subtotal_matches_rounded_product(qty in amount(), price in amount()) {
                let refdata = InMemoryReferenceData::new();
                let mut order = SalesOrder::new(Utc::now());
                let idx = order.add_line_item();

                order.apply_line_edit(idx, LineItemEdit::SetPrice(price), &refdata).unwrap();
                order.apply_line_edit(idx, LineItemEdit::SetQuantity(qty), &refdata).unwrap();

                prop_assert_eq!(order.items()[idx].subtotal(), round2(qty * price));
            }

            /// Property: the order subtotal is the sum of row subtotals, for
            /// any sequence of adds and edits.
            #[test]
            fn order_subtotal_is_sum_of_rows(
                rows in prop::collection::vec((amount(), amount()), 0..12)
            ) {
                let refdata = InMemoryReferenceData::new();
                let mut order = SalesOrder::new(Utc::now());

                for (qty, price) in &rows {
                    let idx = order.add_line_item();
                    order.apply_line_edit(idx, LineItemEdit::SetPrice(*price), &refdata).unwrap();
                    order.apply_line_edit(idx, LineItemEdit::SetQuantity(*qty), &refdata).unwrap();
                }

                let expected: Decimal = order.items().iter().map(|i| i.subtotal()).sum();
                prop_assert_eq!(order.subtotal_before_tax(), expected);
            }

            /// Property: switching tax mode never changes the subtotal, and
            /// tax/total always follow the mode formulas.
            #[test]
            fn tax_mode_switch_follows_the_formulas(
                qty in amount(),
                price in amount(),
                discount in amount()
            ) {
                let refdata = InMemoryReferenceData::new();
                let mut order = SalesOrder::new(Utc::now());
                let idx = order.add_line_item();
                order.apply_line_edit(idx, LineItemEdit::SetPrice(price), &refdata).unwrap();
                order.apply_line_edit(idx, LineItemEdit::SetQuantity(qty), &refdata).unwrap();
                order.set_discount(discount);

                let subtotal = order.subtotal_before_tax();

                order.set_tax_mode(TaxMode::External);
                prop_assert_eq!(order.subtotal_before_tax(), subtotal);
                prop_assert_eq!(order.tax(), round2(subtotal * TAX_RATE));
                prop_assert_eq!(
                    order.total_amount(),
                    round2(subtotal - discount + order.tax())
                );

                order.set_tax_mode(TaxMode::Included);
                prop_assert_eq!(order.subtotal_before_tax(), subtotal);
                prop_assert_eq!(
                    order.tax(),
                    round2(subtotal * TAX_RATE / (Decimal::ONE + TAX_RATE))
                );
                prop_assert_eq!(order.total_amount(), round2(subtotal - discount));

                order.set_tax_mode(TaxMode::Exempt);
                prop_assert_eq!(order.subtotal_before_tax(), subtotal);
                prop_assert_eq!(order.tax(), Decimal::ZERO);
                prop_assert_eq!(order.total_amount(), round2(subtotal - discount));
            }

            /// Property: remaining == total − paid after every mutation.
            #[test]
            fn remaining_always_equals_total_minus_paid(
                qty in amount(),
                price in amount(),
                paid in amount(),
                discount in amount()
            ) {
                let refdata = InMemoryReferenceData::new();
                let mut order = SalesOrder::new(Utc::now());
                let idx = order.add_line_item();

                order.apply_line_edit(idx, LineItemEdit::SetPrice(price), &refdata).unwrap();
                prop_assert_eq!(order.remaining_amount(), order.total_amount() - order.paid_amount());

                order.apply_line_edit(idx, LineItemEdit::SetQuantity(qty), &refdata).unwrap();
                prop_assert_eq!(order.remaining_amount(), order.total_amount() - order.paid_amount());

                order.set_paid_amount(paid);
                prop_assert_eq!(order.remaining_amount(), order.total_amount() - order.paid_amount());

                order.set_discount(discount);
                prop_assert_eq!(order.remaining_amount(), order.total_amount() - order.paid_amount());

                order.set_tax_mode(TaxMode::External);
                prop_assert_eq!(order.remaining_amount(), order.total_amount() - order.paid_amount());

                order.remove_line_item(idx).unwrap();
                prop_assert_eq!(order.remaining_amount(), order.total_amount() - order.paid_amount());
            }
        }
    }
}
