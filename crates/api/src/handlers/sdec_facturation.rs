//! Handlers for the print shop invoicing module (`/sdec_facturation`).
//!
//! Reads are open to any authenticated user; writes require the
//! `sdec_facturation_admin` group. Deletions are soft: members and
//! associations are hidden, products withdrawn from sale, orders and
//! invoices invalidated.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use hyperion_core::error::CoreError;
use hyperion_core::facturation::{
    resolve_payment_date, validate_amount, validate_invoice_number, validate_invoice_period,
    validate_name, validate_one_of, validate_prices, ASSOCIATION_STRUCTURES, ASSOCIATION_TYPES,
    INDIVIDUAL_CATEGORIES, MEMBER_ROLES, PRODUCT_CATEGORIES,
};
use hyperion_core::types::DbId;
use hyperion_db::models::sdec_facturation::{
    CreateAssociation, CreateInvoiceAssociation, CreateInvoiceIndividual, CreateMember,
    CreateOrder, CreateProduct, Mandate, UpdateAssociation, UpdateInvoice, UpdateMandate,
    UpdateMember, UpdateOrder, UpdateProductMinor, UpdateProductPrice,
};
use hyperion_db::repositories::{
    AssociationRepo, InvoiceAssociationRepo, InvoiceIndividualRepo, MandateRepo, OrderRepo,
    ProductRepo, SdecMemberRepo,
};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireSdecAdmin;
use crate::query::IncludeHiddenParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Turn a unique violation into a 400 carrying `message`.
fn duplicate_as_validation(err: sqlx::Error, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            AppError::validation(message)
        }
        _ => AppError::Database(err),
    }
}

async fn ensure_member_exists(pool: &PgPool, member_id: DbId) -> AppResult<()> {
    if SdecMemberRepo::find_by_id(pool, member_id).await?.is_none() {
        return Err(AppError::validation(format!("Unknown member {member_id}")));
    }
    Ok(())
}

async fn ensure_association_exists(pool: &PgPool, association_id: DbId) -> AppResult<()> {
    if AssociationRepo::find_by_id(pool, association_id).await?.is_none() {
        return Err(AppError::validation(format!("Unknown association {association_id}")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Mandates
// ---------------------------------------------------------------------------

/// GET /api/v1/sdec_facturation/mandate
pub async fn list_mandates(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let mandates = MandateRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: mandates }))
}

/// POST /api/v1/sdec_facturation/mandate
pub async fn create_mandate(
    RequireSdecAdmin(_admin): RequireSdecAdmin,
    State(state): State<AppState>,
    Json(input): Json<Mandate>,
) -> AppResult<impl IntoResponse> {
    validate_name("Mandate", &input.name)?;
    if MandateRepo::find_by_year(&state.pool, input.year).await?.is_some() {
        return Err(AppError::validation(format!(
            "A mandate already exists for year {}",
            input.year
        )));
    }
    let mandate = MandateRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: mandate })))
}

/// PATCH /api/v1/sdec_facturation/mandate/{year}
pub async fn update_mandate(
    RequireSdecAdmin(_admin): RequireSdecAdmin,
    State(state): State<AppState>,
    Path(year): Path<i32>,
    Json(input): Json<UpdateMandate>,
) -> AppResult<impl IntoResponse> {
    validate_name("Mandate", &input.name)?;
    let mandate = MandateRepo::update_name(&state.pool, year, &input.name)
        .await?
        .ok_or_else(|| CoreError::not_found("Mandate", year))?;
    Ok(Json(DataResponse { data: mandate }))
}

/// DELETE /api/v1/sdec_facturation/mandate/{year}
///
/// A mandate still referenced by members cannot be deleted.
pub async fn delete_mandate(
    RequireSdecAdmin(_admin): RequireSdecAdmin,
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> AppResult<impl IntoResponse> {
    if MandateRepo::find_by_year(&state.pool, year).await?.is_none() {
        return Err(AppError::Core(CoreError::not_found("Mandate", year)));
    }
    if MandateRepo::has_members(&state.pool, year).await? {
        return Err(AppError::validation(format!("Mandate {year} still has members")));
    }
    MandateRepo::delete(&state.pool, year).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------------

/// GET /api/v1/sdec_facturation/member
pub async fn list_members(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeHiddenParams>,
) -> AppResult<impl IntoResponse> {
    let members = SdecMemberRepo::list(&state.pool, params.include_hidden).await?;
    Ok(Json(DataResponse { data: members }))
}

/// POST /api/v1/sdec_facturation/member
pub async fn create_member(
    RequireSdecAdmin(_admin): RequireSdecAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateMember>,
) -> AppResult<impl IntoResponse> {
    validate_name("Member", &input.name)?;
    validate_one_of("role", &input.role, MEMBER_ROLES)?;
    if MandateRepo::find_by_year(&state.pool, input.mandate).await?.is_none() {
        return Err(AppError::validation(format!("Unknown mandate {}", input.mandate)));
    }
    if SdecMemberRepo::find_by_name(&state.pool, &input.name).await?.is_some() {
        return Err(AppError::validation(format!("A member named '{}' already exists", input.name)));
    }
    let member = SdecMemberRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: member })))
}

/// PATCH /api/v1/sdec_facturation/member/{id}
pub async fn update_member(
    RequireSdecAdmin(_admin): RequireSdecAdmin,
    State(state): State<AppState>,
    Path(member_id): Path<DbId>,
    Json(input): Json<UpdateMember>,
) -> AppResult<impl IntoResponse> {
    SdecMemberRepo::find_by_id(&state.pool, member_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Member", member_id))?;
    if let Some(role) = &input.role {
        validate_one_of("role", role, MEMBER_ROLES)?;
    }
    if let Some(name) = &input.name {
        validate_name("Member", name)?;
        if let Some(existing) = SdecMemberRepo::find_by_name(&state.pool, name).await? {
            if existing.id != member_id {
                return Err(AppError::validation(format!("A member named '{name}' already exists")));
            }
        }
    }
    if let Some(mandate) = input.mandate {
        if MandateRepo::find_by_year(&state.pool, mandate).await?.is_none() {
            return Err(AppError::validation(format!("Unknown mandate {mandate}")));
        }
    }

    let member = SdecMemberRepo::update(&state.pool, member_id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Member", member_id))?;
    Ok(Json(DataResponse { data: member }))
}

/// DELETE /api/v1/sdec_facturation/member/{id}
pub async fn delete_member(
    RequireSdecAdmin(_admin): RequireSdecAdmin,
    State(state): State<AppState>,
    Path(member_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !SdecMemberRepo::hide(&state.pool, member_id).await? {
        return Err(AppError::Core(CoreError::not_found("Member", member_id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Associations
// ---------------------------------------------------------------------------

/// GET /api/v1/sdec_facturation/association
pub async fn list_associations(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeHiddenParams>,
) -> AppResult<impl IntoResponse> {
    let associations = AssociationRepo::list(&state.pool, params.include_hidden).await?;
    Ok(Json(DataResponse { data: associations }))
}

/// POST /api/v1/sdec_facturation/association
pub async fn create_association(
    RequireSdecAdmin(_admin): RequireSdecAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateAssociation>,
) -> AppResult<impl IntoResponse> {
    validate_name("Association", &input.name)?;
    validate_one_of("association type", &input.association_type, ASSOCIATION_TYPES)?;
    validate_one_of("association structure", &input.structure, ASSOCIATION_STRUCTURES)?;
    if AssociationRepo::find_by_name(&state.pool, &input.name).await?.is_some() {
        return Err(AppError::validation(format!(
            "An association named '{}' already exists",
            input.name
        )));
    }
    let association = AssociationRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: association })))
}

/// PATCH /api/v1/sdec_facturation/association/{id}
pub async fn update_association(
    RequireSdecAdmin(_admin): RequireSdecAdmin,
    State(state): State<AppState>,
    Path(association_id): Path<DbId>,
    Json(input): Json<UpdateAssociation>,
) -> AppResult<impl IntoResponse> {
    AssociationRepo::find_by_id(&state.pool, association_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Association", association_id))?;
    if let Some(association_type) = &input.association_type {
        validate_one_of("association type", association_type, ASSOCIATION_TYPES)?;
    }
    if let Some(structure) = &input.structure {
        validate_one_of("association structure", structure, ASSOCIATION_STRUCTURES)?;
    }
    if let Some(name) = &input.name {
        validate_name("Association", name)?;
        if let Some(existing) = AssociationRepo::find_by_name(&state.pool, name).await? {
            if existing.id != association_id {
                return Err(AppError::validation(format!(
                    "An association named '{name}' already exists"
                )));
            }
        }
    }

    let association = AssociationRepo::update(&state.pool, association_id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Association", association_id))?;
    Ok(Json(DataResponse { data: association }))
}

/// DELETE /api/v1/sdec_facturation/association/{id}
pub async fn delete_association(
    RequireSdecAdmin(_admin): RequireSdecAdmin,
    State(state): State<AppState>,
    Path(association_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !AssociationRepo::hide(&state.pool, association_id).await? {
        return Err(AppError::Core(CoreError::not_found(
            "Association",
            association_id,
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// GET /api/v1/sdec_facturation/product
///
/// Latest price row of each product.
pub async fn list_products(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeHiddenParams>,
) -> AppResult<impl IntoResponse> {
    let products = ProductRepo::list_latest(&state.pool, params.include_hidden).await?;
    Ok(Json(DataResponse { data: products }))
}

/// POST /api/v1/sdec_facturation/product
pub async fn create_product(
    RequireSdecAdmin(_admin): RequireSdecAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateProduct>,
) -> AppResult<impl IntoResponse> {
    validate_name("Product", &input.name)?;
    if input.code.trim().is_empty() {
        return Err(AppError::validation("Product code must not be empty"));
    }
    validate_one_of("product category", &input.category, PRODUCT_CATEGORIES)?;
    validate_prices(input.individual_price, input.association_price, input.ae_price)?;

    if ProductRepo::find_latest_by_code(&state.pool, &input.code)
        .await?
        .is_some()
    {
        return Err(AppError::validation(format!(
            "A product with code '{}' already exists",
            input.code
        )));
    }
    if ProductRepo::name_taken(&state.pool, &input.name, None).await? {
        return Err(AppError::validation(format!(
            "A product named '{}' already exists",
            input.name
        )));
    }

    let product = ProductRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: product })))
}

/// POST /api/v1/sdec_facturation/product/{code}/price
///
/// Record new prices. The previous row stays as price history.
pub async fn update_product_price(
    RequireSdecAdmin(admin): RequireSdecAdmin,
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(input): Json<UpdateProductPrice>,
) -> AppResult<impl IntoResponse> {
    validate_prices(input.individual_price, input.association_price, input.ae_price)?;

    let current = ProductRepo::find_latest_by_code(&state.pool, &code)
        .await?
        .ok_or_else(|| CoreError::not_found("Product", &code))?;
    let product = ProductRepo::insert_price(&state.pool, &current, &input).await?;

    tracing::info!(code = %code, admin_id = %admin.user_id, "Product price updated");

    Ok((StatusCode::CREATED, Json(DataResponse { data: product })))
}

/// PATCH /api/v1/sdec_facturation/product/{code}
///
/// Rename or recategorize a product across its whole price history.
pub async fn update_product_minor(
    RequireSdecAdmin(_admin): RequireSdecAdmin,
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(input): Json<UpdateProductMinor>,
) -> AppResult<impl IntoResponse> {
    if let Some(category) = &input.category {
        validate_one_of("product category", category, PRODUCT_CATEGORIES)?;
    }
    if let Some(name) = &input.name {
        validate_name("Product", name)?;
        if ProductRepo::name_taken(&state.pool, name, Some(&code)).await? {
            return Err(AppError::validation(format!("A product named '{name}' already exists")));
        }
    }

    if ProductRepo::update_minor(&state.pool, &code, &input).await? == 0 {
        return Err(AppError::Core(CoreError::not_found("Product", &code)));
    }
    let product = ProductRepo::find_latest_by_code(&state.pool, &code)
        .await?
        .ok_or_else(|| CoreError::not_found("Product", &code))?;
    Ok(Json(DataResponse { data: product }))
}

/// DELETE /api/v1/sdec_facturation/product/{code}
pub async fn delete_product(
    RequireSdecAdmin(_admin): RequireSdecAdmin,
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<impl IntoResponse> {
    if ProductRepo::withdraw(&state.pool, &code).await? == 0 {
        return Err(AppError::Core(CoreError::not_found("Product", &code)));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// GET /api/v1/sdec_facturation/order
pub async fn list_orders(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeHiddenParams>,
) -> AppResult<impl IntoResponse> {
    let orders = OrderRepo::list(&state.pool, params.include_hidden).await?;
    Ok(Json(DataResponse { data: orders }))
}

/// POST /api/v1/sdec_facturation/order
pub async fn create_order(
    RequireSdecAdmin(_admin): RequireSdecAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateOrder>,
) -> AppResult<impl IntoResponse> {
    ensure_association_exists(&state.pool, input.association_id).await?;
    ensure_member_exists(&state.pool, input.member_id).await?;
    let order = OrderRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: order })))
}

/// PATCH /api/v1/sdec_facturation/order/{id}
pub async fn update_order(
    RequireSdecAdmin(_admin): RequireSdecAdmin,
    State(state): State<AppState>,
    Path(order_id): Path<DbId>,
    Json(input): Json<UpdateOrder>,
) -> AppResult<impl IntoResponse> {
    let order = OrderRepo::update(&state.pool, order_id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Order", order_id))?;
    Ok(Json(DataResponse { data: order }))
}

/// DELETE /api/v1/sdec_facturation/order/{id}
pub async fn delete_order(
    RequireSdecAdmin(_admin): RequireSdecAdmin,
    State(state): State<AppState>,
    Path(order_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !OrderRepo::invalidate(&state.pool, order_id).await? {
        return Err(AppError::Core(CoreError::not_found("Order", order_id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Association invoices
// ---------------------------------------------------------------------------

/// GET /api/v1/sdec_facturation/invoice_association
pub async fn list_association_invoices(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeHiddenParams>,
) -> AppResult<impl IntoResponse> {
    let invoices = InvoiceAssociationRepo::list(&state.pool, params.include_hidden).await?;
    Ok(Json(DataResponse { data: invoices }))
}

/// POST /api/v1/sdec_facturation/invoice_association
pub async fn create_association_invoice(
    RequireSdecAdmin(admin): RequireSdecAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateInvoiceAssociation>,
) -> AppResult<impl IntoResponse> {
    validate_invoice_number(&input.facture_number)?;
    validate_amount("price", input.price)?;
    validate_invoice_period(input.start_date, input.end_date)?;
    ensure_member_exists(&state.pool, input.member_id).await?;
    ensure_association_exists(&state.pool, input.association_id).await?;

    let invoice = InvoiceAssociationRepo::create(&state.pool, &input)
        .await
        .map_err(|e| duplicate_as_validation(e, "Invoice number already used"))?;

    tracing::info!(
        invoice_id = %invoice.id,
        facture_number = %invoice.facture_number,
        admin_id = %admin.user_id,
        "Association invoice created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: invoice })))
}

/// PATCH /api/v1/sdec_facturation/invoice_association/{id}
pub async fn update_association_invoice(
    RequireSdecAdmin(_admin): RequireSdecAdmin,
    State(state): State<AppState>,
    Path(invoice_id): Path<DbId>,
    Json(input): Json<UpdateInvoice>,
) -> AppResult<impl IntoResponse> {
    let payment_date =
        resolve_payment_date(input.paid, input.payment_date, Utc::now().date_naive());
    let invoice =
        InvoiceAssociationRepo::update_status(&state.pool, invoice_id, input.valid, input.paid, payment_date)
            .await?
            .ok_or_else(|| CoreError::not_found("Invoice", invoice_id))?;
    Ok(Json(DataResponse { data: invoice }))
}

/// DELETE /api/v1/sdec_facturation/invoice_association/{id}
pub async fn delete_association_invoice(
    RequireSdecAdmin(_admin): RequireSdecAdmin,
    State(state): State<AppState>,
    Path(invoice_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !InvoiceAssociationRepo::invalidate(&state.pool, invoice_id).await? {
        return Err(AppError::Core(CoreError::not_found("Invoice", invoice_id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Individual invoices
// ---------------------------------------------------------------------------

/// GET /api/v1/sdec_facturation/invoice_individual
pub async fn list_individual_invoices(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeHiddenParams>,
) -> AppResult<impl IntoResponse> {
    let invoices = InvoiceIndividualRepo::list(&state.pool, params.include_hidden).await?;
    Ok(Json(DataResponse { data: invoices }))
}

/// POST /api/v1/sdec_facturation/invoice_individual
pub async fn create_individual_invoice(
    RequireSdecAdmin(admin): RequireSdecAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateInvoiceIndividual>,
) -> AppResult<impl IntoResponse> {
    validate_invoice_number(&input.facture_number)?;
    validate_amount("price", input.price)?;
    validate_one_of(
        "individual category",
        &input.individual_category,
        INDIVIDUAL_CATEGORIES,
    )?;
    ensure_member_exists(&state.pool, input.member_id).await?;

    let invoice = InvoiceIndividualRepo::create(&state.pool, &input)
        .await
        .map_err(|e| duplicate_as_validation(e, "Invoice number already used"))?;

    tracing::info!(
        invoice_id = %invoice.id,
        facture_number = %invoice.facture_number,
        admin_id = %admin.user_id,
        "Individual invoice created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: invoice })))
}

/// PATCH /api/v1/sdec_facturation/invoice_individual/{id}
pub async fn update_individual_invoice(
    RequireSdecAdmin(_admin): RequireSdecAdmin,
    State(state): State<AppState>,
    Path(invoice_id): Path<DbId>,
    Json(input): Json<UpdateInvoice>,
) -> AppResult<impl IntoResponse> {
    let payment_date =
        resolve_payment_date(input.paid, input.payment_date, Utc::now().date_naive());
    let invoice =
        InvoiceIndividualRepo::update_status(&state.pool, invoice_id, input.valid, input.paid, payment_date)
            .await?
            .ok_or_else(|| CoreError::not_found("Invoice", invoice_id))?;
    Ok(Json(DataResponse { data: invoice }))
}

/// DELETE /api/v1/sdec_facturation/invoice_individual/{id}
pub async fn delete_individual_invoice(
    RequireSdecAdmin(_admin): RequireSdecAdmin,
    State(state): State<AppState>,
    Path(invoice_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !InvoiceIndividualRepo::invalidate(&state.pool, invoice_id).await? {
        return Err(AppError::Core(CoreError::not_found("Invoice", invoice_id)));
    }
    Ok(StatusCode::NO_CONTENT)
}
