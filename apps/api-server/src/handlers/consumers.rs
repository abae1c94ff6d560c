//! Consumer handlers - users enrolled in the consumer group.

use actix_web::{HttpRequest, HttpResponse, web};

use warikan_core::domain::{Group, Id, NewGroup, NewUser, User};
use warikan_core::ports::Page;
use warikan_shared::dto::{ConsumerPatch, ConsumerRequest, ConsumerResponse};

use super::checks::FieldErrors;
use super::pagination::{PageQuery, page_request, paginate};
use super::users::check_username;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn to_response(user: User) -> ConsumerResponse {
    ConsumerResponse {
        id: user.id,
        username: user.username,
    }
}

/// GET /api/consumers
pub async fn list(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let request = page_request(query.page.as_deref(), state.settings.page_size)?;
    let page = match consumer_group(&state).await? {
        Some(group) => state.users.list_in_group(group.id, request).await?,
        None => Page::new(Vec::new(), 0),
    };

    Ok(HttpResponse::Ok().json(paginate(&req, request, page.map(to_response))?))
}

/// POST /api/consumers
///
/// Creates the user and enrols it in the consumer group, creating the
/// group on first use.
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<ConsumerRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let mut user = NewUser::new(req.username, String::new(), Vec::new());

    let mut errors = FieldErrors::from_validation(user.validate())?;
    check_username(&state, &user.username, None, &mut errors).await?;
    errors.finish()?;

    let group = match consumer_group(&state).await? {
        Some(group) => group,
        None => {
            let group = state
                .groups
                .create(NewGroup::new(&state.settings.consumer_group))
                .await?;
            tracing::info!(group_id = group.id, name = %group.name, "Consumer group created");
            group
        }
    };
    user.groups = vec![group.id];

    let saved = state.users.create(user).await?;
    tracing::info!(user_id = saved.id, username = %saved.username, "Consumer created");

    Ok(HttpResponse::Created().json(to_response(saved)))
}

/// GET /api/consumers/{id}
pub async fn retrieve(state: web::Data<AppState>, path: web::Path<Id>) -> AppResult<HttpResponse> {
    let user = find(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(to_response(user)))
}

/// PUT /api/consumers/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<Id>,
    body: web::Json<ConsumerRequest>,
) -> AppResult<HttpResponse> {
    let mut user = find(&state, path.into_inner()).await?;
    user.set_username(&body.into_inner().username);
    save(&state, user).await
}

/// PATCH /api/consumers/{id}
pub async fn partial_update(
    state: web::Data<AppState>,
    path: web::Path<Id>,
    body: web::Json<ConsumerPatch>,
) -> AppResult<HttpResponse> {
    let mut user = find(&state, path.into_inner()).await?;
    if let Some(username) = body.into_inner().username {
        user.set_username(&username);
    }
    save(&state, user).await
}

/// DELETE /api/consumers/{id}
///
/// Removes the user itself, not just the membership.
pub async fn destroy(state: web::Data<AppState>, path: web::Path<Id>) -> AppResult<HttpResponse> {
    let user = find(&state, path.into_inner()).await?;
    state
        .users
        .delete(user.id)
        .await
        .map_err(|e| AppError::from_repo(e, "Consumer", user.id))?;
    tracing::info!(user_id = user.id, "Consumer deleted");

    Ok(HttpResponse::NoContent().finish())
}

async fn consumer_group(state: &AppState) -> AppResult<Option<Group>> {
    Ok(state
        .groups
        .find_by_name(&state.settings.consumer_group)
        .await?)
}

/// A user that is a member of the consumer group.
async fn find(state: &AppState, id: Id) -> AppResult<User> {
    let group = consumer_group(state).await?;
    let user = state.users.find_by_id(id).await?;

    match (group, user) {
        (Some(group), Some(user)) if user.is_member_of(group.id) => Ok(user),
        _ => Err(AppError::not_found("Consumer", id)),
    }
}

async fn save(state: &AppState, user: User) -> AppResult<HttpResponse> {
    let mut errors = FieldErrors::from_validation(user.validate())?;
    check_username(state, &user.username, Some(user.id), &mut errors).await?;
    errors.finish()?;

    let saved = state.users.update(user).await?;
    tracing::info!(user_id = saved.id, "Consumer updated");

    Ok(HttpResponse::Ok().json(to_response(saved)))
}
