//! Blog entry handlers.

use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use warikan_core::DomainError;
use warikan_core::domain::{Entry, EntryStatus, Id, NewEntry};
use warikan_core::ports::{EntryFilter, Page};
use warikan_shared::dto::{AuthorResponse, EntryPatch, EntryRequest, EntryResponse};

use super::authors;
use super::checks::FieldErrors;
use super::pagination::{page_request, paginate};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const INVALID_AUTHOR: &str = "Select a valid choice. That choice is not one of the available choices.";

/// `?page=`, `?author=<id>` and `?status=draft|public`.
#[derive(Debug, Default, Deserialize)]
pub struct EntryQuery {
    pub page: Option<String>,
    pub author: Option<String>,
    pub status: Option<String>,
}

/// GET /api/blog/entries
pub async fn list(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<EntryQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let filter = entry_filter(&state, &query).await?;
    let request = page_request(query.page.as_deref(), state.settings.page_size)?;

    let page = state.entries.list_filtered(filter, request).await?;
    let count = page.count;
    let results = to_responses(&state, page.items).await?;

    Ok(HttpResponse::Ok().json(paginate(&req, request, Page::new(results, count))?))
}

/// POST /api/blog/entries
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<EntryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let status = parse_status(req.status.as_deref());
    let mut entry = NewEntry::new(req.title, req.body, EntryStatus::default(), req.author);

    let mut errors = FieldErrors::from_validation(entry.validate())?;
    if let Some(status) = errors.collect(status)?.flatten() {
        entry.status = status;
    }
    check_author(&state, entry.author_id, &mut errors).await?;
    errors.finish()?;

    let saved = state.entries.create(entry).await?;
    tracing::info!(entry_id = saved.id, status = %saved.status, "Entry created");

    Ok(HttpResponse::Created().json(to_response(&state, saved).await?))
}

/// GET /api/blog/entries/{id}
pub async fn retrieve(state: web::Data<AppState>, path: web::Path<Id>) -> AppResult<HttpResponse> {
    let entry = find(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(to_response(&state, entry).await?))
}

/// PUT /api/blog/entries/{id}
///
/// An omitted status leaves the current one in place.
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<Id>,
    body: web::Json<EntryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let mut entry = find(&state, path.into_inner()).await?;

    entry.set_title(&req.title);
    entry.body = req.body;
    entry.author_id = req.author;

    save(&state, entry, parse_status(req.status.as_deref())).await
}

/// PATCH /api/blog/entries/{id}
pub async fn partial_update(
    state: web::Data<AppState>,
    path: web::Path<Id>,
    body: web::Json<EntryPatch>,
) -> AppResult<HttpResponse> {
    let patch = body.into_inner();
    let mut entry = find(&state, path.into_inner()).await?;

    if let Some(title) = patch.title {
        entry.set_title(&title);
    }
    if let Some(body) = patch.body {
        entry.body = body;
    }
    if let Some(author) = patch.author {
        entry.author_id = author;
    }

    save(&state, entry, parse_status(patch.status.as_deref())).await
}

/// DELETE /api/blog/entries/{id}
pub async fn destroy(state: web::Data<AppState>, path: web::Path<Id>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state
        .entries
        .delete(id)
        .await
        .map_err(|e| AppError::from_repo(e, "Entry", id))?;
    tracing::info!(entry_id = id, "Entry deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// Turn the query string into a filter. An author filter must name an
/// existing blog user.
async fn entry_filter(state: &AppState, query: &EntryQuery) -> AppResult<EntryFilter> {
    let mut filter = EntryFilter::default();

    if let Some(raw) = query.author.as_deref().filter(|s| !s.is_empty()) {
        let author = match raw.trim().parse::<Id>() {
            Ok(id) => state.authors.find_by_id(id).await?,
            Err(_) => None,
        };
        match author {
            Some(author) => filter.author_id = Some(author.id),
            None => {
                let mut errors = FieldErrors::default();
                errors.push("author", INVALID_AUTHOR);
                errors.finish()?;
            }
        }
    }

    if let Some(raw) = query.status.as_deref().filter(|s| !s.is_empty()) {
        filter.status = Some(raw.parse()?);
    }

    Ok(filter)
}

/// An omitted status parses to `None`.
fn parse_status(raw: Option<&str>) -> Result<Option<EntryStatus>, DomainError> {
    raw.map(str::parse).transpose()
}

async fn check_author(state: &AppState, author_id: Id, errors: &mut FieldErrors) -> AppResult<()> {
    if state.authors.find_by_id(author_id).await?.is_none() {
        errors.missing_pk("author", author_id);
    }
    Ok(())
}

async fn find(state: &AppState, id: Id) -> AppResult<Entry> {
    state
        .entries
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Entry", id))
}

async fn save(
    state: &AppState,
    mut entry: Entry,
    status: Result<Option<EntryStatus>, DomainError>,
) -> AppResult<HttpResponse> {
    let mut errors = FieldErrors::from_validation(entry.validate())?;
    if let Some(status) = errors.collect(status)?.flatten() {
        entry.status = status;
    }
    check_author(state, entry.author_id, &mut errors).await?;
    errors.finish()?;

    entry.touch();
    let saved = state.entries.update(entry).await?;
    tracing::info!(entry_id = saved.id, status = %saved.status, "Entry updated");

    Ok(HttpResponse::Ok().json(to_response(state, saved).await?))
}

async fn to_response(state: &AppState, entry: Entry) -> AppResult<EntryResponse> {
    let author = authors::find(state, entry.author_id).await?;
    Ok(render(entry, authors::to_response(author)))
}

/// Render entries, looking each author up once.
async fn to_responses(state: &AppState, entries: Vec<Entry>) -> AppResult<Vec<EntryResponse>> {
    let mut seen: HashMap<Id, AuthorResponse> = HashMap::new();
    let mut responses = Vec::with_capacity(entries.len());

    for entry in entries {
        let author = match seen.get(&entry.author_id) {
            Some(author) => author.clone(),
            None => {
                let author = authors::to_response(authors::find(state, entry.author_id).await?);
                seen.insert(author.id, author.clone());
                author
            }
        };
        responses.push(render(entry, author));
    }

    Ok(responses)
}

fn render(entry: Entry, author: AuthorResponse) -> EntryResponse {
    EntryResponse {
        id: entry.id,
        title: entry.title,
        body: entry.body,
        created_at: entry.created_at,
        updated_at: entry.updated_at,
        status: entry.status.to_string(),
        author,
    }
}
