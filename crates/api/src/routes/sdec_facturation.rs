//! Route definitions for the print shop invoicing module.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::sdec_facturation as sdec;
use crate::state::AppState;

/// Routes mounted at `/sdec_facturation`.
///
/// Reads need authentication, writes the `sdec_facturation_admin` group.
///
/// ```text
/// GET    /mandate                    -> list_mandates
/// POST   /mandate                    -> create_mandate
/// PATCH  /mandate/{year}             -> update_mandate
/// DELETE /mandate/{year}             -> delete_mandate
///
/// GET    /member                     -> list_members
/// POST   /member                     -> create_member
/// PATCH  /member/{id}                -> update_member
/// DELETE /member/{id}                -> delete_member (hide)
///
/// GET    /association                -> list_associations
/// POST   /association                -> create_association
/// PATCH  /association/{id}           -> update_association
/// DELETE /association/{id}           -> delete_association (hide)
///
/// GET    /product                    -> list_products
/// POST   /product                    -> create_product
/// PATCH  /product/{code}             -> update_product_minor
/// DELETE /product/{code}             -> delete_product (withdraw)
/// POST   /product/{code}/price       -> update_product_price
///
/// GET    /order                      -> list_orders
/// POST   /order                      -> create_order
/// PATCH  /order/{id}                 -> update_order
/// DELETE /order/{id}                 -> delete_order (invalidate)
///
/// GET    /invoice_association        -> list_association_invoices
/// POST   /invoice_association        -> create_association_invoice
/// PATCH  /invoice_association/{id}   -> update_association_invoice
/// DELETE /invoice_association/{id}   -> delete_association_invoice
///
/// GET    /invoice_individual         -> list_individual_invoices
/// POST   /invoice_individual         -> create_individual_invoice
/// PATCH  /invoice_individual/{id}    -> update_individual_invoice
/// DELETE /invoice_individual/{id}    -> delete_individual_invoice
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/mandate", get(sdec::list_mandates).post(sdec::create_mandate))
        .route(
            "/mandate/{year}",
            patch(sdec::update_mandate).delete(sdec::delete_mandate),
        )
        .route("/member", get(sdec::list_members).post(sdec::create_member))
        .route(
            "/member/{id}",
            patch(sdec::update_member).delete(sdec::delete_member),
        )
        .route(
            "/association",
            get(sdec::list_associations).post(sdec::create_association),
        )
        .route(
            "/association/{id}",
            patch(sdec::update_association).delete(sdec::delete_association),
        )
        .route("/product", get(sdec::list_products).post(sdec::create_product))
        .route(
            "/product/{code}",
            patch(sdec::update_product_minor).delete(sdec::delete_product),
        )
        .route("/product/{code}/price", post(sdec::update_product_price))
        .route("/order", get(sdec::list_orders).post(sdec::create_order))
        .route(
            "/order/{id}",
            patch(sdec::update_order).delete(sdec::delete_order),
        )
        .route(
            "/invoice_association",
            get(sdec::list_association_invoices).post(sdec::create_association_invoice),
        )
        .route(
            "/invoice_association/{id}",
            patch(sdec::update_association_invoice).delete(sdec::delete_association_invoice),
        )
        .route(
            "/invoice_individual",
            get(sdec::list_individual_invoices).post(sdec::create_individual_invoice),
        )
        .route(
            "/invoice_individual/{id}",
            patch(sdec::update_individual_invoice).delete(sdec::delete_individual_invoice),
        )
}
