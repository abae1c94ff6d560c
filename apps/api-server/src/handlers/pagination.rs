//! Page-number pagination for list endpoints.

use actix_web::HttpRequest;
use serde::Deserialize;
use url::Url;

use warikan_core::ports::{Page, PageRequest};
use warikan_shared::Paginated;

use crate::middleware::error::{AppError, AppResult};

const INVALID_PAGE: &str = "Invalid page.";

/// `?page=N` on any list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Parse the raw `page` parameter. Missing means the first page.
///
/// The row offset of the page must fit a SQL `BIGINT`.
pub fn page_request(page: Option<&str>, page_size: u64) -> AppResult<PageRequest> {
    let number = match page {
        None => 1,
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(n) if n >= 1 => n,
            _ => return Err(invalid_page()),
        },
    };
    let offset = (number - 1).checked_mul(page_size.max(1));
    if offset.is_none_or(|o| o > i64::MAX as u64) {
        return Err(invalid_page());
    }
    Ok(PageRequest::new(number, page_size))
}

/// Wrap one page of results in the listing envelope.
///
/// Page 1 of an empty listing is valid; any other page past the end is not.
pub fn paginate<T>(
    req: &HttpRequest,
    request: PageRequest,
    page: Page<T>,
) -> AppResult<Paginated<T>> {
    let num_pages = page.num_pages(request.page_size);
    if request.page > 1 && request.page > num_pages {
        return Err(invalid_page());
    }

    let current = current_url(req)?;
    let next = (request.page < num_pages).then(|| page_link(&current, Some(request.page + 1)));
    let previous = (request.page > 1).then(|| {
        // Page 1 is addressed without a page parameter.
        let target = request.page - 1;
        page_link(&current, (target > 1).then_some(target))
    });

    Ok(Paginated {
        count: page.count,
        next,
        previous,
        results: page.items,
    })
}

/// Absolute URL for a path on this server, e.g. `/api/users/3`.
pub fn absolute_url(req: &HttpRequest, path: &str) -> String {
    let info = req.connection_info();
    format!("{}://{}{}", info.scheme(), info.host(), path)
}

fn current_url(req: &HttpRequest) -> AppResult<Url> {
    let raw = absolute_url(req, &req.uri().to_string());
    Url::parse(&raw).map_err(|e| AppError::Internal(format!("bad request url {}: {}", raw, e)))
}

fn page_link(current: &Url, page: Option<u64>) -> String {
    let kept: Vec<(String, String)> = current
        .query_pairs()
        .filter(|(key, _)| key != "page")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = current.clone();
    url.set_query(None);
    if !kept.is_empty() || page.is_some() {
        let mut query = url.query_pairs_mut();
        query.extend_pairs(kept);
        if let Some(page) = page {
            query.append_pair("page", &page.to_string());
        }
    }
    url.to_string()
}

fn invalid_page() -> AppError {
    AppError::NotFound(INVALID_PAGE.to_string())
}
