//! # Domain Types
//!
//! Core domain types used throughout Pawshop POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │  PaymentEntry   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id ("000001")  │   │  method (name)  │       │
//! │  │  code (barcode) │   │  items          │   │  amount_cents   │       │
//! │  │  price_cents    │   │  total_cents    │   │  fee_cents      │       │
//! │  │  stock (f64)    │   │  payments       │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    FeeRate      │   │    UnitType     │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Un (each)      │   │  id, name, icon │       │
//! │  │  190 = 1.9%     │   │  Kg (weighed)   │   │  fee_bps        │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A sale stores copies of everything it touched at transaction time: line
//! items carry the product's code/name/prices, payments carry the method's
//! name and the fee computed with the rate in force. Later edits to the
//! catalog or fee configuration never rewrite history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::SERVICES_CATEGORY;

// =============================================================================
// Fee Rate
// =============================================================================

/// Payment-method fee rate (merchant discount) in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 190 bps = 1.9% (typical débito), 350 bps = 3.5% (crédito)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRate(u32);

impl FeeRate {
    /// Creates a fee rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        FeeRate(bps)
    }

    /// Creates a fee rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        FeeRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero fee rate.
    #[inline]
    pub const fn zero() -> Self {
        FeeRate(0)
    }

    /// Checks if the fee rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for FeeRate {
    fn default() -> Self {
        FeeRate::zero()
    }
}

// =============================================================================
// Unit Type
// =============================================================================

/// How a product is measured and sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    /// Sold by the unit (closed bag, accessory, service).
    Un,
    /// Sold by weight (ração a granel); quantities are fractional kilograms.
    Kg,
}

impl UnitType {
    /// Weighed products accept fractional quantities and amount-based entry.
    #[inline]
    pub const fn is_weighed(&self) -> bool {
        matches!(self, UnitType::Kg)
    }

    /// Step used by the register's +/- quantity buttons.
    #[inline]
    pub const fn quantity_step(&self) -> f64 {
        match self {
            UnitType::Un => 1.0,
            UnitType::Kg => 0.1,
        }
    }

    /// Formats a quantity for display: whole units, or kilos to 3 decimals.
    pub fn format_quantity(&self, quantity: f64) -> String {
        match self {
            UnitType::Un => format!("{}", quantity.round() as i64),
            UnitType::Kg => format!("{:.3}", quantity),
        }
    }
}

impl Default for UnitType {
    fn default() -> Self {
        UnitType::Un
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product (or service) available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Barcode / SKU - business identifier, unique in practice.
    pub code: String,

    /// Display name shown to the cashier and on the receipt.
    pub name: String,

    /// Category ("Ração", "Acessórios", ... or "Serviços").
    pub category: String,

    /// Optional subgroup (brand) used by report filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subgroup: Option<String>,

    /// Acquisition cost in centavos (for COGS).
    pub cost_price_cents: i64,

    /// Sale price in centavos, per unit or per kilogram.
    pub price_cents: i64,

    /// Quantity on hand. Fractional for weighed (`kg`) products.
    pub stock: f64,

    /// How this product is measured and sold.
    pub unit_type: UnitType,

    /// Display color for the register's catalog tile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Product {
    /// Returns the sale price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the cost price as a Money type.
    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_cents(self.cost_price_cents)
    }

    /// Services have infinite effective stock: they are never decremented
    /// when sold and never restored when a sale is cancelled.
    #[inline]
    pub fn is_service(&self) -> bool {
        self.category == SERVICES_CATEGORY
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// A line of an in-progress or committed sale.
///
/// Uses the snapshot pattern: product data is frozen at the moment the line
/// enters the cart. The cashier may override `unit_price_cents` per line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product this line references (for stock reconciliation).
    pub product_id: String,

    /// Barcode at time of sale (frozen).
    pub code: String,

    /// Product name at time of sale (frozen).
    pub name: String,

    /// Category at time of sale (frozen; drives the service rule and reports).
    pub category: String,

    /// Subgroup/brand at time of sale (frozen).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subgroup: Option<String>,

    /// Unit type at time of sale (frozen).
    pub unit_type: UnitType,

    /// Cost in centavos at time of sale (frozen, for COGS).
    pub cost_price_cents: i64,

    /// Unit price in centavos. Starts as the catalog price; the cashier can
    /// override it at checkout.
    pub unit_price_cents: i64,

    /// Quantity sold: whole units for `un`, fractional kilos for `kg`.
    pub quantity: f64,
}

impl CartItem {
    /// Creates a cart line from a product snapshot and a quantity.
    pub fn from_product(product: &Product, quantity: f64) -> Self {
        CartItem {
            product_id: product.id.clone(),
            code: product.code.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            subgroup: product.subgroup.clone(),
            unit_type: product.unit_type,
            cost_price_cents: product.cost_price_cents,
            unit_price_cents: product.price_cents,
            quantity,
        }
    }

    /// Returns the (possibly overridden) unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line total: unit price × quantity, rounded to the centavo.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().scale(self.quantity)
    }

    /// Line cost: cost price × quantity, rounded to the centavo.
    #[inline]
    pub fn line_cost(&self) -> Money {
        Money::from_cents(self.cost_price_cents).scale(self.quantity)
    }

    /// The service rule follows the frozen category.
    #[inline]
    pub fn is_service(&self) -> bool {
        self.category == SERVICES_CATEGORY
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// A configured way of paying (Dinheiro, Pix, cartões...).
///
/// Mutable configuration entity: sales snapshot the name and the fee at
/// transaction time, so later changes never alter historical sales.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: String,
    pub name: String,
    pub icon: String,
    /// Merchant discount rate in basis points (190 = 1.9%).
    pub fee_bps: u32,
}

impl PaymentMethod {
    /// Returns the fee rate.
    #[inline]
    pub fn fee_rate(&self) -> FeeRate {
        FeeRate::from_bps(self.fee_bps)
    }
}

// =============================================================================
// Payment Entry
// =============================================================================

/// One tender of a (possibly split) payment, as stored on a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEntry {
    /// Method name copied at time of sale - not a live reference.
    pub method: String,
    /// Amount tendered in centavos.
    pub amount_cents: i64,
    /// Fee in centavos, computed from this tender's share of the total.
    pub fee_cents: i64,
}

impl PaymentEntry {
    /// Returns the tendered amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }

    /// Returns the fee as Money.
    #[inline]
    pub fn fee(&self) -> Money {
        Money::from_cents(self.fee_cents)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A committed sale transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    /// Sequential zero-padded code, e.g. "000001". Stable across edits.
    pub id: String,

    /// Lines sold, in the order they entered the cart.
    pub items: Vec<CartItem>,

    /// Sum of line totals at finalization, in centavos.
    pub total_cents: i64,

    /// Change due at finalization, in centavos.
    pub change_cents: i64,

    /// Creation time. Preserved when the sale is edited.
    pub timestamp: DateTime<Utc>,

    /// Tenders used to settle the sale.
    pub payments: Vec<PaymentEntry>,

    /// Optional customer reference (id + denormalized name). Deleting the
    /// customer later leaves the name dangling on purpose: historical
    /// receipts are not rewritten.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns the change due as Money.
    #[inline]
    pub fn change(&self) -> Money {
        Money::from_cents(self.change_cents)
    }

    /// Sum of tendered amounts.
    pub fn paid(&self) -> Money {
        self.payments.iter().map(PaymentEntry::amount).sum()
    }

    /// Sum of payment fees snapshotted on this sale.
    pub fn total_fee(&self) -> Money {
        self.payments.iter().map(PaymentEntry::fee).sum()
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A registered customer. Phone is the one required contact field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
}

// =============================================================================
// Company Info
// =============================================================================

/// Company identity printed on receipt headers. Edit-in-place, no lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    pub name: String,
    /// CNPJ/CPF shown on the receipt.
    pub document: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Default for CompanyInfo {
    fn default() -> Self {
        CompanyInfo {
            name: "Pawshop Pet".to_string(),
            document: "00.000.000/0001-00".to_string(),
            address: "Rua dos Pets, 123 - Centro".to_string(),
            phone: Some("(00) 00000-0000".to_string()),
        }
    }
}

// =============================================================================
// Credential
// =============================================================================

/// A stored username/password pair, kept in plaintext. This gate exists to
/// stop a walk-up, not an attacker; do not put real passwords in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub username: String,
    pub password: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ration_product() -> Product {
        Product {
            id: "1".to_string(),
            code: "RAC-KG".to_string(),
            name: "Ração Adulto Frango (Granel)".to_string(),
            category: "Ração".to_string(),
            subgroup: Some("Golden".to_string()),
            cost_price_cents: 1200,
            price_cents: 1850,
            stock: 50.0,
            unit_type: UnitType::Kg,
            color: None,
        }
    }

    #[test]
    fn test_fee_rate_conversions() {
        let rate = FeeRate::from_bps(190);
        assert_eq!(rate.bps(), 190);
        assert!((rate.percentage() - 1.9).abs() < 0.001);

        let rate = FeeRate::from_percentage(3.5);
        assert_eq!(rate.bps(), 350);
    }

    #[test]
    fn test_unit_type_formatting() {
        assert_eq!(UnitType::Un.format_quantity(2.0), "2");
        assert_eq!(UnitType::Kg.format_quantity(0.540_540_5), "0.541");
        assert_eq!(UnitType::Un.quantity_step(), 1.0);
        assert_eq!(UnitType::Kg.quantity_step(), 0.1);
    }

    #[test]
    fn test_service_rule_follows_category() {
        let mut product = ration_product();
        assert!(!product.is_service());

        product.category = crate::SERVICES_CATEGORY.to_string();
        assert!(product.is_service());
    }

    #[test]
    fn test_cart_item_snapshot_and_totals() {
        let product = ration_product();
        let item = CartItem::from_product(&product, 2.0);

        assert_eq!(item.unit_price_cents, 1850);
        assert_eq!(item.line_total().cents(), 3700);
        assert_eq!(item.line_cost().cents(), 2400);

        // Overriding the line price does not touch the catalog product
        let mut discounted = item.clone();
        discounted.unit_price_cents = 1700;
        assert_eq!(discounted.line_total().cents(), 3400);
        assert_eq!(product.price_cents, 1850);
    }

    #[test]
    fn test_sale_aggregates() {
        let sale = Sale {
            id: "000001".to_string(),
            items: vec![],
            total_cents: 3700,
            change_cents: 300,
            timestamp: Utc::now(),
            payments: vec![
                PaymentEntry {
                    method: "Dinheiro".to_string(),
                    amount_cents: 2000,
                    fee_cents: 0,
                },
                PaymentEntry {
                    method: "Cartão de Crédito".to_string(),
                    amount_cents: 2000,
                    fee_cents: 65,
                },
            ],
            customer_id: None,
            customer_name: None,
        };

        assert_eq!(sale.paid().cents(), 4000);
        assert_eq!(sale.total_fee().cents(), 65);
    }

    #[test]
    fn test_serde_round_trip_uses_camel_case() {
        let product = ration_product();
        let json = serde_json::to_string(&product).unwrap();
        assert!(json.contains("\"costPriceCents\""));
        assert!(json.contains("\"unitType\":\"kg\""));

        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(back.code, product.code);
        assert_eq!(back.price_cents, product.price_cents);
    }
}
