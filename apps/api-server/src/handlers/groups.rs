//! Group handlers.

use actix_web::{HttpRequest, HttpResponse, web};

use warikan_core::domain::{Group, Id, NewGroup};
use warikan_shared::dto::{GroupPatch, GroupRequest, GroupResponse};

use super::checks::FieldErrors;
use super::pagination::{PageQuery, absolute_url, page_request, paginate};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn to_response(req: &HttpRequest, group: Group) -> GroupResponse {
    GroupResponse {
        url: absolute_url(req, &format!("/api/groups/{}", group.id)),
        id: group.id,
        name: group.name,
    }
}

/// GET /api/groups
pub async fn list(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let request = page_request(query.page.as_deref(), state.settings.page_size)?;
    let page = state.groups.list(request).await?;
    let page = page.map(|group| to_response(&req, group));

    Ok(HttpResponse::Ok().json(paginate(&req, request, page)?))
}

/// POST /api/groups
pub async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<GroupRequest>,
) -> AppResult<HttpResponse> {
    let group = NewGroup::new(&body.into_inner().name);

    let mut errors = FieldErrors::from_validation(group.validate())?;
    check_name(&state, &group.name, None, &mut errors).await?;
    errors.finish()?;

    let saved = state.groups.create(group).await?;
    tracing::info!(group_id = saved.id, name = %saved.name, "Group created");

    Ok(HttpResponse::Created().json(to_response(&req, saved)))
}

/// GET /api/groups/{id}
pub async fn retrieve(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Id>,
) -> AppResult<HttpResponse> {
    let group = find(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(to_response(&req, group)))
}

/// PUT /api/groups/{id}
pub async fn update(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Id>,
    body: web::Json<GroupRequest>,
) -> AppResult<HttpResponse> {
    let mut group = find(&state, path.into_inner()).await?;
    group.set_name(&body.into_inner().name);
    save(&req, &state, group).await
}

/// PATCH /api/groups/{id}
pub async fn partial_update(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Id>,
    body: web::Json<GroupPatch>,
) -> AppResult<HttpResponse> {
    let mut group = find(&state, path.into_inner()).await?;
    if let Some(name) = body.into_inner().name {
        group.set_name(&name);
    }
    save(&req, &state, group).await
}

/// DELETE /api/groups/{id}
pub async fn destroy(state: web::Data<AppState>, path: web::Path<Id>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state
        .groups
        .delete(id)
        .await
        .map_err(|e| AppError::from_repo(e, "Group", id))?;
    tracing::info!(group_id = id, "Group deleted");

    Ok(HttpResponse::NoContent().finish())
}

async fn check_name(
    state: &AppState,
    name: &str,
    except: Option<Id>,
    errors: &mut FieldErrors,
) -> AppResult<()> {
    if let Some(existing) = state.groups.find_by_name(name).await? {
        if Some(existing.id) != except {
            errors.push("name", "group with this name already exists.");
        }
    }
    Ok(())
}

async fn find(state: &AppState, id: Id) -> AppResult<Group> {
    state
        .groups
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Group", id))
}

async fn save(req: &HttpRequest, state: &AppState, group: Group) -> AppResult<HttpResponse> {
    let mut errors = FieldErrors::from_validation(group.validate())?;
    check_name(state, &group.name, Some(group.id), &mut errors).await?;
    errors.finish()?;

    let saved = state.groups.update(group).await?;
    tracing::info!(group_id = saved.id, "Group updated");

    Ok(HttpResponse::Ok().json(to_response(req, saved)))
}
