//! Borrow Service - borrow form submission and the approval/issue desk

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use super::{account_service, inventory_service, timestamp};
use crate::domain::borrow::reference_code;
use crate::domain::{BorrowForm, BorrowFormRepository, BorrowLine, BorrowStatus, DomainError};
use crate::models::borrow_form::{self, Entity as BorrowFormEntity};
use crate::models::borrow_form_item::{self, Entity as BorrowFormItemEntity};
use crate::models::cart_item::{self, Entity as CartItem};

/// Details a student supplies when turning a cart into a form
#[derive(Debug, Clone)]
pub struct NewBorrowRequest {
    pub student_email: String,
    pub student_name: String,
    pub student_number: String,
    pub professor_email: String,
    pub subject_code: String,
}

impl NewBorrowRequest {
    fn validate(&self) -> Result<(), DomainError> {
        if !account_service::is_valid_email(&self.professor_email) {
            return Err(DomainError::Validation(
                "A valid professor email is required".to_string(),
            ));
        }
        if self.subject_code.trim().is_empty() {
            return Err(DomainError::Validation(
                "Subject code is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Turn the student's cart into a pending borrow form and empty the cart.
///
/// Stock is not touched here; it moves when the form is issued.
pub async fn create_from_cart(
    db: &DatabaseConnection,
    request: NewBorrowRequest,
) -> Result<BorrowForm, DomainError> {
    request.validate()?;

    let txn = db.begin().await?;

    let cart = CartItem::find()
        .filter(cart_item::Column::UserEmail.eq(&request.student_email))
        .order_by_asc(cart_item::Column::Id)
        .all(&txn)
        .await?;

    if cart.is_empty() {
        return Err(DomainError::Validation("Cart is empty".to_string()));
    }

    let form = borrow_form::ActiveModel {
        reference_code: Set(reference_code(&Utc::now(), Uuid::new_v4())),
        student_name: Set(request.student_name),
        student_number: Set(request.student_number),
        student_email: Set(request.student_email.clone()),
        professor_email: Set(request.professor_email),
        subject_code: Set(request.subject_code.trim().to_owned()),
        submitted_at: Set(timestamp()),
        is_approved: Set(None),
        processed_at: Set(None),
        processed_by: Set(String::new()),
        rejection_reason: Set(String::new()),
        is_issued: Set(false),
        is_returned: Set(false),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let lines = cart.iter().map(|row| borrow_form_item::ActiveModel {
        department: Set(row.department.clone()),
        item_name: Set(row.item_name.clone()),
        quantity: Set(row.quantity),
        borrow_form_id: Set(form.id),
        ..Default::default()
    });
    BorrowFormItemEntity::insert_many(lines).exec(&txn).await?;

    CartItem::delete_many()
        .filter(cart_item::Column::UserEmail.eq(&request.student_email))
        .exec(&txn)
        .await?;

    let items = form
        .find_related(BorrowFormItemEntity)
        .order_by_asc(borrow_form_item::Column::Id)
        .all(&txn)
        .await?;

    txn.commit().await?;

    tracing::info!(
        "Borrow form {} submitted by {} ({} lines)",
        form.reference_code,
        form.student_email,
        items.len()
    );
    Ok(form.into_domain(items))
}

pub async fn pending_forms(forms: &dyn BorrowFormRepository) -> Result<Vec<BorrowForm>, DomainError> {
    forms.find_by_status(BorrowStatus::Pending).await
}

pub async fn approved_not_issued(
    forms: &dyn BorrowFormRepository,
) -> Result<Vec<BorrowForm>, DomainError> {
    forms.find_by_status(BorrowStatus::Approved).await
}

pub async fn issued_not_returned(
    forms: &dyn BorrowFormRepository,
) -> Result<Vec<BorrowForm>, DomainError> {
    forms.find_by_status(BorrowStatus::Issued).await
}

pub async fn forms_for_student(
    forms: &dyn BorrowFormRepository,
    email: &str,
) -> Result<Vec<BorrowForm>, DomainError> {
    forms.find_for_student(email).await
}

pub async fn find_by_reference(
    forms: &dyn BorrowFormRepository,
    code: &str,
) -> Result<BorrowForm, DomainError> {
    forms
        .find_by_reference(code.trim())
        .await?
        .ok_or_else(|| DomainError::NotFound("Form".to_string()))
}

async fn load_form<C: ConnectionTrait>(conn: &C, form_id: i32) -> Result<BorrowForm, DomainError> {
    let form = BorrowFormEntity::find_by_id(form_id)
        .one(conn)
        .await?
        .ok_or_else(|| DomainError::NotFound("Form".to_string()))?;

    let items = form
        .find_related(BorrowFormItemEntity)
        .order_by_asc(borrow_form_item::Column::Id)
        .all(conn)
        .await?;

    Ok(form.into_domain(items))
}

/// Record the approval decision, but only if nobody decided first
async fn decide(
    db: &DatabaseConnection,
    form_id: i32,
    approved: bool,
    processed_by: &str,
    reason: &str,
) -> Result<BorrowForm, DomainError> {
    let result = BorrowFormEntity::update_many()
        .col_expr(borrow_form::Column::IsApproved, Expr::value(approved))
        .col_expr(borrow_form::Column::ProcessedAt, Expr::value(timestamp()))
        .col_expr(borrow_form::Column::ProcessedBy, Expr::value(processed_by))
        .col_expr(borrow_form::Column::RejectionReason, Expr::value(reason))
        .filter(borrow_form::Column::Id.eq(form_id))
        .filter(borrow_form::Column::IsApproved.is_null())
        .exec(db)
        .await?;

    let form = load_form(db, form_id).await?;
    if result.rows_affected == 0 {
        form.status.ensure_can_decide()?;
        // Pending but untouched: the row changed between update and read
        return Err(DomainError::InvalidState(
            "Form already processed".to_string(),
        ));
    }

    Ok(form)
}

pub async fn approve(
    db: &DatabaseConnection,
    form_id: i32,
    processed_by: &str,
) -> Result<BorrowForm, DomainError> {
    let form = decide(db, form_id, true, processed_by, "").await?;
    tracing::info!("Form {} approved by {}", form.reference_code, processed_by);
    Ok(form)
}

pub async fn reject(
    db: &DatabaseConnection,
    form_id: i32,
    processed_by: &str,
    reason: &str,
) -> Result<BorrowForm, DomainError> {
    let form = decide(db, form_id, false, processed_by, reason.trim()).await?;
    tracing::info!("Form {} rejected by {}", form.reference_code, processed_by);
    Ok(form)
}

/// Load a form inside `txn`, check `allowed`, and return it with its lines
async fn form_for_desk(
    txn: &DatabaseTransaction,
    form_id: i32,
    allowed: fn(BorrowStatus) -> Result<(), DomainError>,
) -> Result<(borrow_form::Model, Vec<BorrowLine>), DomainError> {
    let form = BorrowFormEntity::find_by_id(form_id)
        .one(txn)
        .await?
        .ok_or_else(|| DomainError::NotFound("Form".to_string()))?;

    allowed(form.status())?;

    let lines = form
        .find_related(BorrowFormItemEntity)
        .order_by_asc(borrow_form_item::Column::Id)
        .all(txn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok((form, lines))
}

/// Hand out the items of an approved form, taking them off the shelf.
///
/// If any line lacks stock the form stays approved and no quantity changes.
pub async fn issue(db: &DatabaseConnection, form_id: i32) -> Result<BorrowForm, DomainError> {
    let txn = db.begin().await?;

    let (form, lines) = form_for_desk(&txn, form_id, BorrowStatus::ensure_can_issue).await?;
    inventory_service::issue_items(&txn, &lines).await?;

    let mut active: borrow_form::ActiveModel = form.into();
    active.is_issued = Set(true);
    active.update(&txn).await?;

    let issued = load_form(&txn, form_id).await?;
    txn.commit().await?;

    tracing::info!("Form {} issued", issued.reference_code);
    Ok(issued)
}

/// Take back the items of an issued form and restock them
pub async fn mark_returned(db: &DatabaseConnection, form_id: i32) -> Result<BorrowForm, DomainError> {
    let txn = db.begin().await?;

    let (form, lines) = form_for_desk(&txn, form_id, BorrowStatus::ensure_can_return).await?;
    inventory_service::return_items(&txn, &lines).await?;

    let mut active: borrow_form::ActiveModel = form.into();
    active.is_returned = Set(true);
    active.update(&txn).await?;

    let returned = load_form(&txn, form_id).await?;
    txn.commit().await?;

    tracing::info!("Form {} returned", returned.reference_code);
    Ok(returned)
}
