//! Blog user handlers.

use actix_web::{HttpRequest, HttpResponse, web};

use warikan_core::domain::{Author, Id, NewAuthor};
use warikan_shared::dto::{AuthorPatch, AuthorRequest, AuthorResponse};

use super::pagination::{PageQuery, page_request, paginate};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

pub(crate) fn to_response(author: Author) -> AuthorResponse {
    AuthorResponse {
        id: author.id,
        name: author.name,
        mail: author.mail,
    }
}

/// GET /api/blog/users
pub async fn list(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let request = page_request(query.page.as_deref(), state.settings.page_size)?;
    let page = state.authors.list(request).await?;

    Ok(HttpResponse::Ok().json(paginate(&req, request, page.map(to_response))?))
}

/// POST /api/blog/users
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<AuthorRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let author = NewAuthor::new(&req.name, &req.mail);
    author.validate()?;

    let saved = state.authors.create(author).await?;
    tracing::info!(author_id = saved.id, "Blog user created");

    Ok(HttpResponse::Created().json(to_response(saved)))
}

/// GET /api/blog/users/{id}
pub async fn retrieve(state: web::Data<AppState>, path: web::Path<Id>) -> AppResult<HttpResponse> {
    let author = find(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(to_response(author)))
}

/// PUT /api/blog/users/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<Id>,
    body: web::Json<AuthorRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let mut author = find(&state, path.into_inner()).await?;
    author.set_name(&req.name);
    author.set_mail(&req.mail);
    save(&state, author).await
}

/// PATCH /api/blog/users/{id}
pub async fn partial_update(
    state: web::Data<AppState>,
    path: web::Path<Id>,
    body: web::Json<AuthorPatch>,
) -> AppResult<HttpResponse> {
    let patch = body.into_inner();
    let mut author = find(&state, path.into_inner()).await?;
    if let Some(name) = patch.name {
        author.set_name(&name);
    }
    if let Some(mail) = patch.mail {
        author.set_mail(&mail);
    }
    save(&state, author).await
}

/// DELETE /api/blog/users/{id}
///
/// Deletes the user's entries as well.
pub async fn destroy(state: web::Data<AppState>, path: web::Path<Id>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state
        .authors
        .delete(id)
        .await
        .map_err(|e| AppError::from_repo(e, "Blog user", id))?;
    tracing::info!(author_id = id, "Blog user deleted");

    Ok(HttpResponse::NoContent().finish())
}

pub(crate) async fn find(state: &AppState, id: Id) -> AppResult<Author> {
    state
        .authors
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Blog user", id))
}

async fn save(state: &AppState, author: Author) -> AppResult<HttpResponse> {
    author.validate()?;
    let saved = state.authors.update(author).await?;
    tracing::info!(author_id = saved.id, "Blog user updated");

    Ok(HttpResponse::Ok().json(to_response(saved)))
}
