//! Reference-data lookup contract and the in-memory store behind it.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use retroerp_core::{CustomerId, DomainError, DomainResult, Entity, ProductId, SalespersonId, WarehouseId};

use crate::records::{Customer, Product, Salesperson, Warehouse};

/// Credit standing of a customer, as the validation engine consumes it.
///
/// Unknown customers resolve to all-zero values rather than an error; the
/// engines treat missing reference data as "no credit granted".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreditProfile {
    pub limit: Decimal,
    pub balance: Decimal,
}

/// Read-only lookup contract consumed by both engines.
///
/// The derived lookups have default implementations in terms of the record
/// finders, so alternative stores only need the four `find_*` methods.
pub trait ReferenceData {
    fn find_customer(&self, id: &CustomerId) -> Option<&Customer>;
    fn find_product(&self, id: &ProductId) -> Option<&Product>;
    fn find_warehouse(&self, id: &WarehouseId) -> Option<&Warehouse>;
    fn find_salesperson(&self, id: &SalespersonId) -> Option<&Salesperson>;

    /// Stock on hand for a product, zero when unknown.
    fn product_stock(&self, id: &ProductId) -> i64 {
        self.find_product(id).map_or(0, |p| p.stock_quantity)
    }

    /// Credit limit and outstanding balance, zeros when unknown.
    fn customer_credit(&self, id: &CustomerId) -> CreditProfile {
        self.find_customer(id).map_or_else(CreditProfile::default, |c| CreditProfile {
            limit: c.credit_limit,
            balance: c.outstanding_balance,
        })
    }

    /// Warehouse a product ships from by default, if any.
    fn default_warehouse_for_product(&self, id: &ProductId) -> Option<WarehouseId> {
        self.find_product(id).and_then(|p| p.warehouse_id.clone())
    }

    /// Display name of a product, empty-handed when unknown.
    fn product_name(&self, id: &ProductId) -> Option<&str> {
        self.find_product(id).map(|p| p.name.as_str())
    }

    /// Unit label of a product, empty-handed when unknown.
    fn product_unit(&self, id: &ProductId) -> Option<&str> {
        self.find_product(id).map(|p| p.unit.as_str())
    }
}

/// HashMap-backed reference data, the only store this core ships with.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReferenceData {
    customers: HashMap<CustomerId, Customer>,
    products: HashMap<ProductId, Product>,
    warehouses: HashMap<WarehouseId, Warehouse>,
    salespersons: HashMap<SalespersonId, Salesperson>,
}

/// Index a record by its entity id, rejecting duplicate codes.
fn insert_unique<E: Entity>(
    map: &mut HashMap<E::Id, E>,
    record: E,
    kind: &str,
) -> DomainResult<()> {
    let id = record.id().clone();
    if map.contains_key(&id) {
        return Err(DomainError::validation(format!(
            "duplicate {kind} code {id:?}"
        )));
    }
    map.insert(id, record);
    Ok(())
}

impl InMemoryReferenceData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_customer(&mut self, customer: Customer) -> DomainResult<()> {
        insert_unique(&mut self.customers, customer, "customer")
    }

    pub fn insert_product(&mut self, product: Product) -> DomainResult<()> {
        insert_unique(&mut self.products, product, "product")
    }

    pub fn insert_warehouse(&mut self, warehouse: Warehouse) -> DomainResult<()> {
        insert_unique(&mut self.warehouses, warehouse, "warehouse")
    }

    pub fn insert_salesperson(&mut self, salesperson: Salesperson) -> DomainResult<()> {
        insert_unique(&mut self.salespersons, salesperson, "salesperson")
    }

    /// The legacy screen's synthetic dataset: three customers, three products,
    /// three warehouses, two salespersons.
    pub fn seeded() -> DomainResult<Self> {
        let mut store = Self::new();

        store.insert_warehouse(Warehouse {
            id: WarehouseId::new("W01")?,
            name: "一號倉".to_string(),
            location: Some("台北市南港區".to_string()),
            manager: Some("李經理".to_string()),
            is_active: true,
        })?;
        store.insert_warehouse(Warehouse {
            id: WarehouseId::new("W02")?,
            name: "備品倉".to_string(),
            location: Some("台北市內湖區".to_string()),
            manager: Some("張經理".to_string()),
            is_active: true,
        })?;
        store.insert_warehouse(Warehouse {
            id: WarehouseId::new("W03")?,
            name: "油品區".to_string(),
            location: Some("桃園市蘆竹區".to_string()),
            manager: Some("陳經理".to_string()),
            is_active: true,
        })?;

        store.insert_customer(Customer {
            id: CustomerId::new("C001")?,
            name: "台北貿易行".to_string(),
            contact_person: Some("張先生".to_string()),
            phone: Some("02-2345-6789".to_string()),
            address: Some("台北市中山區中山北路123號".to_string()),
            credit_limit: dec!(100000),
            outstanding_balance: dec!(45000),
        })?;
        store.insert_customer(Customer {
            id: CustomerId::new("C002")?,
            name: "台中鑫豐企業".to_string(),
            contact_person: Some("林小姐".to_string()),
            phone: Some("04-2345-6789".to_string()),
            address: Some("台中市西區民生路456號".to_string()),
            credit_limit: dec!(80000),
            outstanding_balance: dec!(12000),
        })?;
        store.insert_customer(Customer {
            id: CustomerId::new("C003")?,
            name: "高雄電工社".to_string(),
            contact_person: Some("王先生".to_string()),
            phone: Some("07-2345-6789".to_string()),
            address: Some("高雄市前鎮區中山路789號".to_string()),
            credit_limit: dec!(50000),
            outstanding_balance: Decimal::ZERO,
        })?;

        store.insert_product(Product {
            id: ProductId::new("P001")?,
            name: "柴油".to_string(),
            unit: "公升".to_string(),
            price: dec!(32.5),
            cost: Some(dec!(28.5)),
            stock_quantity: 5000,
            warehouse_id: Some(WarehouseId::new("W03")?),
            category: Some("油品".to_string()),
            taxable: true,
        })?;
        store.insert_product(Product {
            id: ProductId::new("P002")?,
            name: "齒輪油".to_string(),
            unit: "瓶".to_string(),
            price: dec!(180),
            cost: Some(dec!(120)),
            stock_quantity: 200,
            warehouse_id: Some(WarehouseId::new("W03")?),
            category: Some("油品".to_string()),
            taxable: true,
        })?;
        store.insert_product(Product {
            id: ProductId::new("P003")?,
            name: "引擎潤滑油".to_string(),
            unit: "桶".to_string(),
            price: dec!(1500),
            cost: Some(dec!(1100)),
            stock_quantity: 50,
            warehouse_id: Some(WarehouseId::new("W03")?),
            category: Some("油品".to_string()),
            taxable: true,
        })?;

        store.insert_salesperson(Salesperson {
            id: SalespersonId::new("S01")?,
            name: "王小明".to_string(),
            department: Some("銷售部".to_string()),
            commission_rate: Some(dec!(0.05)),
            phone: Some("0912-345-678".to_string()),
        })?;
        store.insert_salesperson(Salesperson {
            id: SalespersonId::new("S02")?,
            name: "陳美華".to_string(),
            department: Some("銷售部".to_string()),
            commission_rate: Some(dec!(0.06)),
            phone: Some("0923-456-789".to_string()),
        })?;

        tracing::debug!(
            customers = store.customers.len(),
            products = store.products.len(),
            warehouses = store.warehouses.len(),
            salespersons = store.salespersons.len(),
            "seeded in-memory reference data"
        );

        Ok(store)
    }
}

impl ReferenceData for InMemoryReferenceData {
    fn find_customer(&self, id: &CustomerId) -> Option<&Customer> {
        self.customers.get(id)
    }

    fn find_product(&self, id: &ProductId) -> Option<&Product> {
        self.products.get(id)
    }

    fn find_warehouse(&self, id: &WarehouseId) -> Option<&Warehouse> {
        self.warehouses.get(id)
    }

    fn find_salesperson(&self, id: &SalespersonId) -> Option<&Salesperson> {
        self.salespersons.get(id)
    }
}
