//! Print shop invoicing models: mandates, members, associations, products,
//! orders and invoices.

use chrono::NaiveDate;
use hyperion_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/* --------------------------------------------------------------------------
Mandates
-------------------------------------------------------------------------- */

/// A row from the `sdec_facturation_mandate` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Mandate {
    pub year: i32,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMandate {
    pub name: String,
}

/* --------------------------------------------------------------------------
Members
-------------------------------------------------------------------------- */

/// A row from the `sdec_facturation_member` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Member {
    pub id: DbId,
    pub name: String,
    pub mandate: i32,
    pub role: String,
    pub visible: bool,
    pub modified_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct CreateMember {
    pub name: String,
    pub mandate: i32,
    pub role: String,
    pub visible: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMember {
    pub name: Option<String>,
    pub mandate: Option<i32>,
    pub role: Option<String>,
    pub visible: Option<bool>,
}

/* --------------------------------------------------------------------------
Associations
-------------------------------------------------------------------------- */

/// A row from the `sdec_facturation_association` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Association {
    pub id: DbId,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub association_type: String,
    pub structure: String,
    pub visible: bool,
    pub modified_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct CreateAssociation {
    pub name: String,
    #[serde(rename = "type")]
    pub association_type: String,
    pub structure: String,
    pub visible: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAssociation {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub association_type: Option<String>,
    pub structure: Option<String>,
    pub visible: Option<bool>,
}

/* --------------------------------------------------------------------------
Products
-------------------------------------------------------------------------- */

/// A row from the `sdec_facturation_product` table. Each price change adds
/// a row sharing the same `code`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub individual_price: f64,
    pub association_price: f64,
    pub ae_price: f64,
    pub category: String,
    pub for_sale: bool,
    pub creation_date: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateProduct {
    pub code: String,
    pub name: String,
    pub individual_price: f64,
    pub association_price: f64,
    pub ae_price: f64,
    pub category: String,
}

/// New prices for a product. Stored as a new row.
#[derive(Debug, Deserialize)]
pub struct UpdateProductPrice {
    pub individual_price: f64,
    pub association_price: f64,
    pub ae_price: f64,
}

/// Name and category change applied to every row of a product code.
#[derive(Debug, Deserialize)]
pub struct UpdateProductMinor {
    pub name: Option<String>,
    pub category: Option<String>,
}

/* --------------------------------------------------------------------------
Orders
-------------------------------------------------------------------------- */

/// A row from the `sdec_facturation_order` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub association_id: DbId,
    pub member_id: DbId,
    pub order: String,
    pub creation_date: Timestamp,
    pub valid: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrder {
    pub association_id: DbId,
    pub member_id: DbId,
    pub order: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrder {
    pub order: Option<String>,
    pub valid: Option<bool>,
}

/* --------------------------------------------------------------------------
Invoices
-------------------------------------------------------------------------- */

/// A row from the `sdec_facturation_invoice_association` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InvoiceAssociation {
    pub id: DbId,
    pub facture_number: String,
    pub member_id: DbId,
    pub association_id: DbId,
    pub association_order: Vec<i32>,
    pub price: f64,
    pub facture_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub valid: bool,
    pub paid: bool,
    pub payment_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct CreateInvoiceAssociation {
    pub facture_number: String,
    pub member_id: DbId,
    pub association_id: DbId,
    #[serde(default)]
    pub association_order: Vec<i32>,
    pub price: f64,
    pub facture_date: Option<NaiveDate>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A row from the `sdec_facturation_invoice_individual` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InvoiceIndividual {
    pub id: DbId,
    pub facture_number: String,
    pub member_id: DbId,
    pub individual_order: String,
    pub individual_category: String,
    pub price: f64,
    pub firstname: String,
    pub lastname: String,
    pub adresse: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
    pub facture_date: NaiveDate,
    pub valid: bool,
    pub paid: bool,
    pub payment_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct CreateInvoiceIndividual {
    pub facture_number: String,
    pub member_id: DbId,
    pub individual_order: String,
    pub individual_category: String,
    pub price: f64,
    pub firstname: String,
    pub lastname: String,
    pub adresse: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
    pub facture_date: Option<NaiveDate>,
}

/// Status change shared by both invoice kinds.
#[derive(Debug, Deserialize)]
pub struct UpdateInvoice {
    pub valid: Option<bool>,
    pub paid: Option<bool>,
    pub payment_date: Option<NaiveDate>,
}
