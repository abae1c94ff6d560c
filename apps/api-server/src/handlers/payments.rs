//! Payment handlers.

use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, web};

use warikan_core::domain::{Id, NewPayment, Payment};
use warikan_core::ports::Page;
use warikan_shared::dto::{ConsumerResponse, PaymentPatch, PaymentRequest, PaymentResponse};

use super::checks::FieldErrors;
use super::pagination::{PageQuery, page_request, paginate};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/payments
pub async fn list(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let request = page_request(query.page.as_deref(), state.settings.page_size)?;
    let page = state.payments.list(request).await?;
    let count = page.count;
    let results = to_responses(&state, page.items).await?;

    Ok(HttpResponse::Ok().json(paginate(&req, request, Page::new(results, count))?))
}

/// POST /api/payments
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<PaymentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let payment = NewPayment::new(
        req.paid_by,
        req.paid_for,
        req.amount,
        &req.title,
        req.date,
        req.cleared.unwrap_or(false),
    );

    let mut errors = FieldErrors::from_validation(payment.validate())?;
    check_users(&state, payment.paid_by, &payment.paid_for, &mut errors).await?;
    errors.finish()?;

    let saved = state.payments.create(payment).await?;
    tracing::info!(payment_id = saved.id, amount = saved.amount, "Payment created");

    Ok(HttpResponse::Created().json(to_response(&state, saved).await?))
}

/// GET /api/payments/{id}
pub async fn retrieve(state: web::Data<AppState>, path: web::Path<Id>) -> AppResult<HttpResponse> {
    let payment = find(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(to_response(&state, payment).await?))
}

/// PUT /api/payments/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<Id>,
    body: web::Json<PaymentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let mut payment = find(&state, path.into_inner()).await?;

    payment.paid_by = req.paid_by;
    payment.set_paid_for(req.paid_for);
    payment.amount = req.amount;
    payment.set_title(&req.title);
    if let Some(date) = req.date {
        payment.date = date;
    }
    if let Some(cleared) = req.cleared {
        payment.cleared = cleared;
    }

    save(&state, payment).await
}

/// PATCH /api/payments/{id}
pub async fn partial_update(
    state: web::Data<AppState>,
    path: web::Path<Id>,
    body: web::Json<PaymentPatch>,
) -> AppResult<HttpResponse> {
    let patch = body.into_inner();
    let mut payment = find(&state, path.into_inner()).await?;

    if let Some(paid_by) = patch.paid_by {
        payment.paid_by = paid_by;
    }
    if let Some(paid_for) = patch.paid_for {
        payment.set_paid_for(paid_for);
    }
    if let Some(amount) = patch.amount {
        payment.amount = amount;
    }
    if let Some(title) = patch.title {
        payment.set_title(&title);
    }
    if let Some(date) = patch.date {
        payment.date = date;
    }
    if let Some(cleared) = patch.cleared {
        payment.cleared = cleared;
    }

    save(&state, payment).await
}

/// DELETE /api/payments/{id}
pub async fn destroy(state: web::Data<AppState>, path: web::Path<Id>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state
        .payments
        .delete(id)
        .await
        .map_err(|e| AppError::from_repo(e, "Payment", id))?;
    tracing::info!(payment_id = id, "Payment deleted");

    Ok(HttpResponse::NoContent().finish())
}

async fn find(state: &AppState, id: Id) -> AppResult<Payment> {
    state
        .payments
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Payment", id))
}

async fn save(state: &AppState, payment: Payment) -> AppResult<HttpResponse> {
    let mut errors = FieldErrors::from_validation(payment.validate())?;
    check_users(state, payment.paid_by, &payment.paid_for, &mut errors).await?;
    errors.finish()?;

    let saved = state.payments.update(payment).await?;
    tracing::info!(payment_id = saved.id, cleared = saved.cleared, "Payment updated");

    Ok(HttpResponse::Ok().json(to_response(state, saved).await?))
}

/// Every referenced user must exist.
async fn check_users(
    state: &AppState,
    paid_by: Id,
    paid_for: &[Id],
    errors: &mut FieldErrors,
) -> AppResult<()> {
    if state.users.find_by_id(paid_by).await?.is_none() {
        errors.missing_pk("paid_by", paid_by);
    }
    for &id in paid_for {
        if state.users.find_by_id(id).await?.is_none() {
            errors.missing_pk("paid_for", id);
        }
    }
    Ok(())
}

async fn to_response(state: &AppState, payment: Payment) -> AppResult<PaymentResponse> {
    let mut responses = to_responses(state, vec![payment]).await?;
    responses
        .pop()
        .ok_or_else(|| AppError::Internal("payment vanished while rendering".to_string()))
}

/// Render payments, looking each payer up once.
async fn to_responses(state: &AppState, payments: Vec<Payment>) -> AppResult<Vec<PaymentResponse>> {
    let mut payers: HashMap<Id, ConsumerResponse> = HashMap::new();
    let mut responses = Vec::with_capacity(payments.len());

    for payment in payments {
        let paid_by = match payers.get(&payment.paid_by) {
            Some(payer) => payer.clone(),
            None => {
                let user = state.users.find_by_id(payment.paid_by).await?.ok_or_else(|| {
                    AppError::Internal(format!(
                        "payment {} references missing user {}",
                        payment.id, payment.paid_by
                    ))
                })?;
                let payer = ConsumerResponse {
                    id: user.id,
                    username: user.username,
                };
                payers.insert(payer.id, payer.clone());
                payer
            }
        };

        responses.push(PaymentResponse {
            id: payment.id,
            paid_by,
            paid_for: payment.paid_for,
            amount: payment.amount,
            title: payment.title,
            date: payment.date,
            cleared: payment.cleared,
        });
    }

    Ok(responses)
}
