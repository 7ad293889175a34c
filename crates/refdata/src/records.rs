//! Read-only master records the legacy screen looked up by code.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use retroerp_core::{CustomerId, Entity, ProductId, SalespersonId, WarehouseId};

/// Customer master record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Maximum credit exposure the customer is allowed.
    pub credit_limit: Decimal,
    /// Balance currently outstanding against that limit.
    pub outstanding_balance: Decimal,
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Product master record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit label shown next to quantities (litre, bottle, drum, ...).
    pub unit: String,
    /// List price copied onto a line when the product is selected.
    pub price: Decimal,
    pub cost: Option<Decimal>,
    pub stock_quantity: i64,
    /// Warehouse the product normally ships from.
    pub warehouse_id: Option<WarehouseId>,
    pub category: Option<String>,
    pub taxable: bool,
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Warehouse master record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: WarehouseId,
    pub name: String,
    pub location: Option<String>,
    pub manager: Option<String>,
    pub is_active: bool,
}

impl Entity for Warehouse {
    type Id = WarehouseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Salesperson master record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salesperson {
    pub id: SalespersonId,
    pub name: String,
    pub department: Option<String>,
    pub commission_rate: Option<Decimal>,
    pub phone: Option<String>,
}

impl Entity for Salesperson {
    type Id = SalespersonId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
