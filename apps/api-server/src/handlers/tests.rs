//! Route-level tests against the in-memory store.

use actix_web::{
    App,
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    middleware::NormalizePath,
    test, web,
};
use serde_json::{Value, json};

use super::configure_routes;
use crate::config::ApiSettings;
use crate::state::AppState;

macro_rules! test_app {
    () => {
        test_app!(ApiSettings::default())
    };
    ($settings:expr) => {
        test::init_service(
            App::new()
                .wrap(NormalizePath::trim())
                .app_data(web::Data::new(AppState::in_memory($settings)))
                .configure(configure_routes),
        )
        .await
    };
}

async fn send<S, R, B>(app: &S, req: R) -> (StatusCode, Value)
where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(app, req).await;
    let status = res.status();
    let body = test::read_body(res).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn get(uri: &str) -> test::TestRequest {
    test::TestRequest::get().uri(uri)
}

fn post(uri: &str, body: Value) -> test::TestRequest {
    test::TestRequest::post().uri(uri).set_json(body)
}

fn put(uri: &str, body: Value) -> test::TestRequest {
    test::TestRequest::put().uri(uri).set_json(body)
}

fn patch(uri: &str, body: Value) -> test::TestRequest {
    test::TestRequest::patch().uri(uri).set_json(body)
}

fn delete(uri: &str) -> test::TestRequest {
    test::TestRequest::delete().uri(uri)
}

/// Create a consumer and return its id.
macro_rules! consumer {
    ($app:expr, $username:expr) => {{
        let (status, body) = send(
            $app,
            post("/api/consumers", json!({ "username": $username })).to_request(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }};
}

fn field_errors(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .map(|list| {
            list.iter()
                .filter_map(|e| e.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

#[actix_web::test]
async fn test_health_reports_storage() {
    let app = test_app!();
    let (status, body) = send(&app, get("/api/health").to_request()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
    assert!(body["version"].is_string());
}

#[actix_web::test]
async fn test_create_and_retrieve_payment() {
    let app = test_app!();
    let taro = consumer!(&app, "taro");
    let hanako = consumer!(&app, "hanako");

    let (status, created) = send(
        &app,
        post(
            "/api/payments",
            json!({
                "paid_by": taro,
                "paid_for": [hanako, taro, hanako],
                "amount": 1200,
                "title": "  lunch  ",
            }),
        )
        .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert_eq!(created["paid_by"], json!({ "id": taro, "username": "taro" }));
    assert_eq!(created["paid_for"], json!([taro, hanako]));
    assert_eq!(created["title"], "lunch");
    assert_eq!(created["cleared"], false);
    assert_eq!(
        created["date"],
        chrono::Utc::now().date_naive().to_string()
    );

    let uri = format!("/api/payments/{}", created["id"]);
    let (status, fetched) = send(&app, get(&uri).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[actix_web::test]
async fn test_payment_rejects_unknown_users_and_bad_amount() {
    let app = test_app!();
    let taro = consumer!(&app, "taro");

    let (status, body) = send(
        &app,
        post(
            "/api/payments",
            json!({ "paid_by": taro, "paid_for": [99], "amount": 100_001, "title": "" }),
        )
        .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = field_errors(&body);
    assert!(errors.iter().any(|e| e.starts_with("amount:")));
    assert!(errors.iter().any(|e| e.starts_with("title:")));
    assert!(errors.contains(&"paid_for: Invalid pk \"99\" - object does not exist.".to_string()));

    let (status, body) = send(
        &app,
        post(
            "/api/payments",
            json!({ "paid_by": taro, "paid_for": [], "amount": 0, "title": "x" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = field_errors(&body);
    assert!(errors.iter().any(|e| e.starts_with("amount:")));
    assert!(errors.iter().any(|e| e.starts_with("paid_for:")));
}

#[actix_web::test]
async fn test_payment_update_and_delete() {
    let app = test_app!();
    let taro = consumer!(&app, "taro");
    let jiro = consumer!(&app, "jiro");

    let (_, created) = send(
        &app,
        post(
            "/api/payments",
            json!({
                "paid_by": taro,
                "paid_for": [jiro],
                "amount": 500,
                "title": "coffee",
                "date": "2024-03-01",
            }),
        )
        .to_request(),
    )
    .await;
    let uri = format!("/api/payments/{}", created["id"]);

    // Settling a debt.
    let (status, patched) = send(&app, patch(&uri, json!({ "cleared": true })).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["cleared"], true);
    assert_eq!(patched["title"], "coffee");

    let (status, replaced) = send(
        &app,
        put(
            &uri,
            json!({ "paid_by": jiro, "paid_for": [taro], "amount": 800, "title": "cake" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["paid_by"]["username"], "jiro");
    assert_eq!(replaced["amount"], 800);
    assert_eq!(replaced["date"], "2024-03-01");
    assert_eq!(replaced["cleared"], true);

    let (status, _) = send(&app, delete(&uri).to_request()).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, get(&uri).to_request()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, delete(&uri).to_request()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_consumers_are_group_members() {
    let app = test_app!();

    // No consumer group yet.
    let (status, body) = send(&app, get("/api/consumers").to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);

    let taro = consumer!(&app, "taro");

    let (_, groups) = send(&app, get("/api/groups").to_request()).await;
    assert_eq!(groups["count"], 1);
    assert_eq!(groups["results"][0]["name"], "consumer");

    let (_, outsider) = send(
        &app,
        post("/api/users", json!({ "username": "outsider" })).to_request(),
    )
    .await;

    let (_, body) = send(&app, get("/api/consumers").to_request()).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0], json!({ "id": taro, "username": "taro" }));

    let uri = format!("/api/consumers/{}", outsider["id"]);
    let (status, _) = send(&app, get(&uri).to_request()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        post("/api/consumers", json!({ "username": "taro" })).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        field_errors(&body),
        vec!["username: A user with that username already exists.".to_string()]
    );
}

#[actix_web::test]
async fn test_consumer_rename_and_delete() {
    let app = test_app!();
    let taro = consumer!(&app, "taro");
    let uri = format!("/api/consumers/{taro}");

    let (status, body) = send(&app, patch(&uri, json!({ "username": "taro2" })).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "taro2");

    let (status, _) = send(&app, delete(&uri).to_request()).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, get(&format!("/api/users/{taro}")).to_request()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_users_link_payments_and_treats() {
    let app = test_app!();
    let taro = consumer!(&app, "taro");
    let hanako = consumer!(&app, "hanako");

    let (_, payment) = send(
        &app,
        post(
            "/api/payments",
            json!({ "paid_by": taro, "paid_for": [hanako], "amount": 300, "title": "tea" }),
        )
        .to_request(),
    )
    .await;

    let (status, user) = send(&app, get(&format!("/api/users/{taro}")).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(user["url"].as_str().unwrap().ends_with(&format!("/api/users/{taro}")));
    let payment_link = format!("/api/payments/{}", payment["id"]);
    assert!(user["payments"][0].as_str().unwrap().ends_with(&payment_link));
    assert_eq!(user["treats"], json!([]));
    assert!(user["groups"][0].as_str().unwrap().contains("/api/groups/"));

    let (_, payee) = send(&app, get(&format!("/api/users/{hanako}")).to_request()).await;
    assert_eq!(payee["payments"], json!([]));
    assert!(payee["treats"][0].as_str().unwrap().ends_with(&payment_link));

    // Newest first.
    let (_, list) = send(&app, get("/api/users").to_request()).await;
    assert_eq!(list["results"][0]["id"], hanako);
    assert_eq!(list["results"][1]["id"], taro);
}

#[actix_web::test]
async fn test_user_writes_check_groups() {
    let app = test_app!();
    let (_, group) = send(&app, post("/api/groups", json!({ "name": "family" })).to_request()).await;

    let (status, body) = send(
        &app,
        post(
            "/api/users",
            json!({ "username": "saburo", "email": "nope", "groups": [group["id"], 42] }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = field_errors(&body);
    assert!(errors.iter().any(|e| e.starts_with("email:")));
    assert!(errors.contains(&"groups: Invalid pk \"42\" - object does not exist.".to_string()));

    let (status, user) = send(
        &app,
        post(
            "/api/users",
            json!({ "username": "saburo", "email": "saburo@example.com", "groups": [group["id"]] }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/api/users/{}", user["id"]);
    let (status, updated) = send(&app, patch(&uri, json!({ "groups": [] })).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["groups"], json!([]));
    assert_eq!(updated["email"], "saburo@example.com");
}

#[actix_web::test]
async fn test_deleting_user_cascades_to_paid_payments() {
    let app = test_app!();
    let taro = consumer!(&app, "taro");
    let jiro = consumer!(&app, "jiro");

    let (_, paid) = send(
        &app,
        post(
            "/api/payments",
            json!({ "paid_by": taro, "paid_for": [jiro], "amount": 100, "title": "gum" }),
        )
        .to_request(),
    )
    .await;
    let (_, treated) = send(
        &app,
        post(
            "/api/payments",
            json!({ "paid_by": jiro, "paid_for": [taro, jiro], "amount": 200, "title": "ramen" }),
        )
        .to_request(),
    )
    .await;

    let (status, _) = send(&app, delete(&format!("/api/users/{taro}")).to_request()).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, get(&format!("/api/payments/{}", paid["id"])).to_request()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) =
        send(&app, get(&format!("/api/payments/{}", treated["id"])).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["paid_for"], json!([jiro]));
}

#[actix_web::test]
async fn test_group_names_are_unique() {
    let app = test_app!();
    let (status, group) = send(&app, post("/api/groups", json!({ "name": "family" })).to_request()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(group["url"].as_str().unwrap().ends_with(&format!("/api/groups/{}", group["id"])));

    let (status, body) = send(&app, post("/api/groups", json!({ "name": "family" })).to_request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        field_errors(&body),
        vec!["name: group with this name already exists.".to_string()]
    );

    // Renaming to its own name is not a conflict.
    let uri = format!("/api/groups/{}", group["id"]);
    let (status, _) = send(&app, put(&uri, json!({ "name": "family" })).to_request()).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn test_pagination_links_and_bounds() {
    let app = test_app!(ApiSettings {
        page_size: 2,
        ..ApiSettings::default()
    });
    for name in ["a", "b", "c"] {
        send(&app, post("/api/groups", json!({ "name": name })).to_request()).await;
    }

    let (status, first) = send(&app, get("/api/groups").to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["count"], 3);
    assert_eq!(first["results"].as_array().unwrap().len(), 2);
    assert!(first["next"].as_str().unwrap().ends_with("/api/groups?page=2"));
    assert!(first["previous"].is_null());

    let (status, second) = send(&app, get("/api/groups/?page=2").to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["results"].as_array().unwrap().len(), 1);
    assert!(second["next"].is_null());
    assert!(second["previous"].as_str().unwrap().ends_with("/api/groups"));

    for page in ["3", "0", "abc", "18446744073709551615", "4611686018427387905"] {
        let (status, body) =
            send(&app, get(&format!("/api/groups?page={page}")).to_request()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Invalid page.");
    }
}

#[actix_web::test]
async fn test_entries_default_to_draft_and_nest_author() {
    let app = test_app!();
    let (status, author) = send(
        &app,
        post("/api/blog/users", json!({ "name": "kenji", "mail": "kenji@example.com" }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, entry) = send(
        &app,
        post(
            "/api/blog/entries",
            json!({ "title": "hello", "body": "first post", "author": author["id"] }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{entry}");
    assert_eq!(entry["status"], "draft");
    assert_eq!(entry["author"], author);
    assert_eq!(entry["created_at"], entry["updated_at"]);

    let uri = format!("/api/blog/entries/{}", entry["id"]);
    let (status, published) = send(&app, patch(&uri, json!({ "status": "public" })).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(published["status"], "public");
    assert_eq!(published["created_at"], entry["created_at"]);
    assert_ne!(published["updated_at"], entry["updated_at"]);

    let (status, body) = send(&app, patch(&uri, json!({ "status": "secret" })).to_request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        field_errors(&body),
        vec!["status: \"secret\" is not a valid choice.".to_string()]
    );
}

#[actix_web::test]
async fn test_entry_filters() {
    let app = test_app!();
    let mut authors = Vec::new();
    for (name, mail) in [("kenji", "kenji@example.com"), ("yuki", "yuki@example.com")] {
        let (_, author) = send(
            &app,
            post("/api/blog/users", json!({ "name": name, "mail": mail })).to_request(),
        )
        .await;
        authors.push(author["id"].as_i64().unwrap());
    }
    for (author, status) in [(authors[0], "draft"), (authors[0], "public"), (authors[1], "public")] {
        send(
            &app,
            post(
                "/api/blog/entries",
                json!({ "title": "t", "body": "b", "status": status, "author": author }),
            )
            .to_request(),
        )
        .await;
    }

    let (_, body) = send(&app, get("/api/blog/entries?status=public").to_request()).await;
    assert_eq!(body["count"], 2);

    let uri = format!("/api/blog/entries?author={}&status=public", authors[0]);
    let (_, body) = send(&app, get(&uri).to_request()).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["author"]["name"], "kenji");

    let (status, body) = send(&app, get("/api/blog/entries?status=hidden").to_request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        field_errors(&body),
        vec!["status: \"hidden\" is not a valid choice.".to_string()]
    );

    let (status, _) = send(&app, get("/api/blog/entries?author=999").to_request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_entry_requires_existing_author() {
    let app = test_app!();
    let (status, body) = send(
        &app,
        post(
            "/api/blog/entries",
            json!({ "title": "orphan", "body": "text", "author": 7 }),
        )
        .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        field_errors(&body),
        vec!["author: Invalid pk \"7\" - object does not exist.".to_string()]
    );
}

#[actix_web::test]
async fn test_entry_reports_bad_status_with_other_fields() {
    let app = test_app!();
    let (status, body) = send(
        &app,
        post(
            "/api/blog/entries",
            json!({ "title": "", "body": "", "status": "archived", "author": 999 }),
        )
        .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = field_errors(&body);
    for field in ["title:", "body:", "status:", "author:"] {
        assert!(errors.iter().any(|e| e.starts_with(field)), "{field} missing from {errors:?}");
    }

    let (_, author) = send(
        &app,
        post("/api/blog/users", json!({ "name": "kenji", "mail": "kenji@example.com" }))
            .to_request(),
    )
    .await;
    let (_, entry) = send(
        &app,
        post(
            "/api/blog/entries",
            json!({ "title": "hello", "body": "text", "author": author["id"] }),
        )
        .to_request(),
    )
    .await;

    let uri = format!("/api/blog/entries/{}", entry["id"]);
    let (status, body) = send(
        &app,
        put(&uri, json!({ "title": " ", "body": "text", "status": "archived", "author": 999 }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_errors(&body).len(), 3, "{body}");
}

#[actix_web::test]
async fn test_text_fields_are_trimmed() {
    let app = test_app!();

    let (status, group) = send(&app, post("/api/groups", json!({ "name": " family " })).to_request()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(group["name"], "family");

    let (status, body) = send(&app, post("/api/groups", json!({ "name": "family\t" })).to_request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        field_errors(&body),
        vec!["name: group with this name already exists.".to_string()]
    );

    let (status, author) = send(
        &app,
        post(
            "/api/blog/users",
            json!({ "name": "  twelve_chars ", "mail": " kenji@example.com " }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{author}");
    assert_eq!(author["name"], "twelve_chars");
    assert_eq!(author["mail"], "kenji@example.com");

    let (status, entry) = send(
        &app,
        post(
            "/api/blog/entries",
            json!({ "title": " hello ", "body": "text", "author": author["id"] }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["title"], "hello");

    let uri = format!("/api/blog/entries/{}", entry["id"]);
    let (_, entry) = send(&app, patch(&uri, json!({ "title": "renamed  " })).to_request()).await;
    assert_eq!(entry["title"], "renamed");
}

#[actix_web::test]
async fn test_deleting_blog_user_removes_entries() {
    let app = test_app!();
    let (_, author) = send(
        &app,
        post("/api/blog/users", json!({ "name": "kenji", "mail": "kenji@example.com" }))
            .to_request(),
    )
    .await;
    let (_, entry) = send(
        &app,
        post(
            "/api/blog/entries",
            json!({ "title": "bye", "body": "soon gone", "author": author["id"] }),
        )
        .to_request(),
    )
    .await;

    let uri = format!("/api/blog/users/{}", author["id"]);
    let (status, _) = send(&app, delete(&uri).to_request()).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let uri = format!("/api/blog/entries/{}", entry["id"]);
    let (status, _) = send(&app, get(&uri).to_request()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_blog_user_rules() {
    let app = test_app!();
    let (status, body) = send(
        &app,
        post(
            "/api/blog/users",
            json!({ "name": "a-very-long-name", "mail": "" }),
        )
        .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = field_errors(&body);
    assert!(errors.iter().any(|e| e.starts_with("name:")));
    assert!(errors.iter().any(|e| e.starts_with("mail:")));
}

#[actix_web::test]
async fn test_malformed_requests() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/groups")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (status, _) = send(&app, get("/api/payments/abc").to_request()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
