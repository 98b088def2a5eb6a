//! Invoicing (SDeC facturation) value sets and validation rules.

use chrono::NaiveDate;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Value sets
// ---------------------------------------------------------------------------

/// Roles a print-shop member can hold in a mandate.
pub const MEMBER_ROLES: &[&str] = &["prez", "trez", "sg", "com", "membre"];

/// Which federation an association belongs to.
pub const ASSOCIATION_TYPES: &[&str] = &["aeecl", "useecl", "independant"];

/// Legal structure of an association.
pub const ASSOCIATION_STRUCTURES: &[&str] = &["asso", "club", "section"];

/// Product categories sold by the print shop.
pub const PRODUCT_CATEGORIES: &[&str] = &[
    "impression",
    "papier_a",
    "papier_s",
    "enveloppe",
    "ticket",
    "divers",
];

/// Customer categories for individual invoices.
pub const INDIVIDUAL_CATEGORIES: &[&str] = &["pe", "profs", "admin", "autre"];

/// Validate that `value` belongs to `allowed`, naming `kind` in the error.
pub fn validate_one_of(kind: &str, value: &str, allowed: &[&str]) -> Result<(), CoreError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid {kind} '{value}'. Must be one of: {}",
            allowed.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

/// Reject blank names.
pub fn validate_name(kind: &str, name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(format!("{kind} name must not be empty")));
    }
    Ok(())
}

/// Every price of a product must be a finite, non-negative amount.
pub fn validate_prices(
    individual_price: f64,
    association_price: f64,
    ae_price: f64,
) -> Result<(), CoreError> {
    for (label, price) in [
        ("individual_price", individual_price),
        ("association_price", association_price),
        ("ae_price", ae_price),
    ] {
        validate_amount(label, price)?;
    }
    Ok(())
}

/// A single amount must be finite and non-negative.
pub fn validate_amount(label: &str, amount: f64) -> Result<(), CoreError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(CoreError::Validation(format!(
            "{label} must be a positive amount"
        )));
    }
    Ok(())
}

/// An invoice covers an ordered period.
pub fn validate_invoice_period(start: NaiveDate, end: NaiveDate) -> Result<(), CoreError> {
    if start > end {
        return Err(CoreError::Validation(
            "Invoice start_date must not be after end_date".into(),
        ));
    }
    Ok(())
}

/// Invoice numbers are free-form but must not be blank.
pub fn validate_invoice_number(number: &str) -> Result<(), CoreError> {
    if number.trim().is_empty() {
        return Err(CoreError::Validation(
            "facture_number must not be empty".into(),
        ));
    }
    Ok(())
}

/// Payment date to store when an invoice is marked paid.
///
/// An explicit date wins; marking an invoice paid without one stamps
/// `today`. Otherwise nothing changes.
pub fn resolve_payment_date(
    paid: Option<bool>,
    payment_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Option<NaiveDate> {
    match (paid, payment_date) {
        (_, Some(date)) => Some(date),
        (Some(true), None) => Some(today),
        _ => None,
    }
}
