//! HTTP handlers
//!
//! Reads answer `{"status":"ok","data":..}`, writes answer
//! `{"status":"success","message":..,"data":..}`; failures come from
//! `WebServerError`'s response conversion.

pub mod assignments;
pub mod courses;
pub mod enrollments;
pub mod health;
pub mod progress;
pub mod users;

use axum::Json;
use serde::Serialize;
use serde_json::{Value, json};

pub type JsonResult = crate::error::WebServerResult<Json<Value>>;

pub fn ok<T: Serialize>(data: T) -> JsonResult {
    Ok(Json(json!({
        "status": "ok",
        "data": serde_json::to_value(data)?,
    })))
}

pub fn success<T: Serialize>(message: impl Into<String>, data: T) -> JsonResult {
    Ok(Json(json!({
        "status": "success",
        "message": message.into(),
        "data": serde_json::to_value(data)?,
    })))
}
