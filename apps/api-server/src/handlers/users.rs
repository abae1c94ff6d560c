//! User handlers - full accounts with hyperlinked relations.

use actix_web::{HttpRequest, HttpResponse, web};

use warikan_core::domain::{Id, NewUser, User};
use warikan_core::ports::Page;
use warikan_shared::dto::{UserPatch, UserRequest, UserResponse};

use super::checks::FieldErrors;
use super::pagination::{PageQuery, absolute_url, page_request, paginate};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/users
pub async fn list(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let request = page_request(query.page.as_deref(), state.settings.page_size)?;
    let page = state.users.list(request).await?;

    let mut results = Vec::with_capacity(page.items.len());
    for user in page.items {
        results.push(to_response(&req, &state, user).await?);
    }

    Ok(HttpResponse::Ok().json(paginate(&req, request, Page::new(results, page.count))?))
}

/// POST /api/users
pub async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<UserRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let user = NewUser::new(body.username, body.email, body.groups);

    let mut errors = FieldErrors::from_validation(user.validate())?;
    check_username(&state, &user.username, None, &mut errors).await?;
    check_groups(&state, &user.groups, &mut errors).await?;
    errors.finish()?;

    let saved = state.users.create(user).await?;
    tracing::info!(user_id = saved.id, username = %saved.username, "User created");

    Ok(HttpResponse::Created().json(to_response(&req, &state, saved).await?))
}

/// GET /api/users/{id}
pub async fn retrieve(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Id>,
) -> AppResult<HttpResponse> {
    let user = find(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(to_response(&req, &state, user).await?))
}

/// PUT /api/users/{id}
pub async fn update(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Id>,
    body: web::Json<UserRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let mut user = find(&state, path.into_inner()).await?;

    user.set_username(&body.username);
    user.set_email(&body.email);
    user.set_groups(body.groups);

    save(&req, &state, user).await
}

/// PATCH /api/users/{id}
pub async fn partial_update(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Id>,
    body: web::Json<UserPatch>,
) -> AppResult<HttpResponse> {
    let patch = body.into_inner();
    let mut user = find(&state, path.into_inner()).await?;

    if let Some(username) = patch.username {
        user.set_username(&username);
    }
    if let Some(email) = patch.email {
        user.set_email(&email);
    }
    if let Some(groups) = patch.groups {
        user.set_groups(groups);
    }

    save(&req, &state, user).await
}

/// DELETE /api/users/{id}
///
/// Payments the user paid go with it; payments they were paid for lose
/// them as a payee.
pub async fn destroy(state: web::Data<AppState>, path: web::Path<Id>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state
        .users
        .delete(id)
        .await
        .map_err(|e| AppError::from_repo(e, "User", id))?;
    tracing::info!(user_id = id, "User deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// Usernames are unique; `except` is the user being updated.
pub(crate) async fn check_username(
    state: &AppState,
    username: &str,
    except: Option<Id>,
    errors: &mut FieldErrors,
) -> AppResult<()> {
    if username.is_empty() {
        return Ok(());
    }
    if let Some(existing) = state.users.find_by_username(username).await? {
        if Some(existing.id) != except {
            errors.push("username", "A user with that username already exists.");
        }
    }
    Ok(())
}

async fn check_groups(state: &AppState, groups: &[Id], errors: &mut FieldErrors) -> AppResult<()> {
    for &id in groups {
        if state.groups.find_by_id(id).await?.is_none() {
            errors.missing_pk("groups", id);
        }
    }
    Ok(())
}

async fn find(state: &AppState, id: Id) -> AppResult<User> {
    state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))
}

async fn save(req: &HttpRequest, state: &AppState, user: User) -> AppResult<HttpResponse> {
    let mut errors = FieldErrors::from_validation(user.validate())?;
    check_username(state, &user.username, Some(user.id), &mut errors).await?;
    check_groups(state, &user.groups, &mut errors).await?;
    errors.finish()?;

    let saved = state.users.update(user).await?;
    tracing::info!(user_id = saved.id, "User updated");

    Ok(HttpResponse::Ok().json(to_response(req, state, saved).await?))
}

async fn to_response(req: &HttpRequest, state: &AppState, user: User) -> AppResult<UserResponse> {
    let payments = state.payments.ids_paid_by(user.id).await?;
    let treats = state.payments.ids_paid_for(user.id).await?;
    let links = |prefix: &str, ids: &[Id]| -> Vec<String> {
        ids.iter()
            .map(|id| absolute_url(req, &format!("/api/{}/{}", prefix, id)))
            .collect()
    };

    Ok(UserResponse {
        url: absolute_url(req, &format!("/api/users/{}", user.id)),
        id: user.id,
        groups: links("groups", &user.groups),
        payments: links("payments", &payments),
        treats: links("payments", &treats),
        username: user.username,
        email: user.email,
    })
}
