//! Data Transfer Objects - request/response types for the API.
//!
//! `*Request` bodies are used for create and full update, `*Patch` bodies
//! for partial update (every field optional).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// Payments tracker

/// Consumer projection of a user: just enough to pick a payer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumerResponse {
    pub id: i32,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumerRequest {
    pub username: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsumerPatch {
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub id: i32,
    pub paid_by: ConsumerResponse,
    pub paid_for: Vec<i32>,
    pub amount: i32,
    pub title: String,
    pub date: NaiveDate,
    pub cleared: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub paid_by: i32,
    pub paid_for: Vec<i32>,
    pub amount: i32,
    pub title: String,
    /// Defaults to today on create, unchanged on update.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Defaults to `false` on create, unchanged on update.
    #[serde(default)]
    pub cleared: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentPatch {
    pub paid_by: Option<i32>,
    pub paid_for: Option<Vec<i32>>,
    pub amount: Option<i32>,
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub cleared: Option<bool>,
}

/// Full user view with hyperlinks to related resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub url: String,
    pub id: i32,
    pub username: String,
    pub email: String,
    pub groups: Vec<String>,
    /// Payments this user paid.
    pub payments: Vec<String>,
    /// Payments this user was paid for.
    pub treats: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRequest {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub groups: Vec<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub groups: Option<Vec<i32>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupResponse {
    pub url: String,
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupPatch {
    pub name: Option<String>,
}

// Blog

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: i32,
    pub name: String,
    pub mail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorRequest {
    pub name: String,
    pub mail: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorPatch {
    pub name: Option<String>,
    pub mail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryResponse {
    pub id: i32,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// `draft` or `public`.
    pub status: String,
    pub author: AuthorResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryRequest {
    pub title: String,
    pub body: String,
    /// Defaults to `draft`.
    #[serde(default)]
    pub status: Option<String>,
    pub author: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub status: Option<String>,
    pub author: Option<i32>,
}
