//! WASM HTTP client implementation using gloo_net
//!
//! This module provides HTTP functionality for WASM environments
//! using the gloo_net crate for making HTTP requests via the browser's fetch API.

use crate::error::Result;
use crate::interface::{ApiResponse, HttpClient, RequestApi};
use crate::model::dtos::{
    BookingQuery, LoginParams, NewBookingParams, NewSlotParams, RatingParams, RegisterParams,
};
use crate::model::structs::BookingStatus;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde_json::{json, Value};
use wasm_bindgen::JsCast;
use web_sys::RequestCredentials;

const CSRF_COOKIE: &str = "csrftoken";
const CSRF_HEADER: &str = "X-CSRFToken";

/// HTTP client for WASM environments using gloo_net. The SPA is served from
/// the same origin as the API, so URLs are relative and the session rides on
/// the browser's cookies.
#[derive(Debug, Clone)]
pub struct WasmClient;

impl HttpClient for WasmClient {
    async fn new() -> Result<Self> {
        Ok(Self)
    }
}

/// Reads one cookie out of `document.cookie`, URI-decoded.
pub fn cookie_value(name: &str) -> Option<String> {
    let doc: web_sys::HtmlDocument = web_sys::window()?.document()?.dyn_into().ok()?;
    let cookies = doc.cookie().ok()?;

    for part in cookies.split(';') {
        let part = part.trim();
        if let Some(raw) = part.strip_prefix(name).and_then(|rest| rest.strip_prefix('=')) {
            return match js_sys::decode_uri_component(raw) {
                Ok(decoded) => Some(String::from(decoded)),
                Err(_) => Some(raw.to_string()),
            };
        }
    }

    None
}

impl WasmClient {
    /// Build a request with common headers and settings
    fn build(builder: RequestBuilder) -> RequestBuilder {
        builder
            .credentials(RequestCredentials::Include)
            .header("Accept", "application/json")
    }

    /// Same, plus the CSRF cookie echoed in a header (mutating calls only).
    fn build_mutating(builder: RequestBuilder) -> RequestBuilder {
        let builder = Self::build(builder);
        match cookie_value(CSRF_COOKIE) {
            Some(token) => builder.header(CSRF_HEADER, &token),
            None => builder,
        }
    }

    async fn envelope(resp: Response) -> Result<ApiResponse> {
        let status = resp.status();
        let text = resp.text().await?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(ApiResponse { status, body })
    }
}

impl RequestApi for WasmClient {
    async fn login(&self, params: LoginParams) -> Result<ApiResponse> {
        let resp = Self::build_mutating(Request::post("/api/login/"))
            .json(&params)?
            .send()
            .await?;

        Self::envelope(resp).await
    }

    async fn register(&self, params: RegisterParams) -> Result<ApiResponse> {
        let resp = Self::build_mutating(Request::post("/api/cadastro/"))
            .json(&params)?
            .send()
            .await?;

        Self::envelope(resp).await
    }

    async fn logout(&self) -> Result<ApiResponse> {
        let resp = Self::build_mutating(Request::post("/api/logout/"))
            .send()
            .await?;

        Self::envelope(resp).await
    }

    async fn list_subjects(&self) -> Result<ApiResponse> {
        let resp = Self::build(Request::get("/api/disciplinas/")).send().await?;

        Self::envelope(resp).await
    }

    async fn list_teachers(&self) -> Result<ApiResponse> {
        let resp = Self::build(Request::get("/api/professores/")).send().await?;

        Self::envelope(resp).await
    }

    async fn get_teacher(&self, teacher_id: i64) -> Result<ApiResponse> {
        let url = format!("/api/professores/{teacher_id}/");
        let resp = Self::build(Request::get(&url)).send().await?;

        Self::envelope(resp).await
    }

    async fn list_bookings(&self, query: BookingQuery) -> Result<ApiResponse> {
        let (key, id) = query.query_pair();
        let id = id.to_string();
        let resp = Self::build(Request::get("/api/agendamentos/"))
            .query([(key, id.as_str())])
            .send()
            .await?;

        Self::envelope(resp).await
    }

    async fn create_booking(&self, params: NewBookingParams) -> Result<ApiResponse> {
        let resp = Self::build_mutating(Request::post("/api/agendamentos/"))
            .json(&params)?
            .send()
            .await?;

        Self::envelope(resp).await
    }

    async fn patch_booking_status(
        &self,
        booking_id: i64,
        status: BookingStatus,
    ) -> Result<ApiResponse> {
        let url = format!("/api/agendamentos/{booking_id}/");
        let resp = Self::build_mutating(Request::patch(&url))
            .json(&json!({ "status": status.wire() }))?
            .send()
            .await?;

        Self::envelope(resp).await
    }

    async fn create_slot(&self, params: NewSlotParams) -> Result<ApiResponse> {
        let resp = Self::build_mutating(Request::post("/api/disponibilidades/"))
            .json(&params)?
            .send()
            .await?;

        Self::envelope(resp).await
    }

    async fn delete_slot(&self, slot_id: i64) -> Result<ApiResponse> {
        let url = format!("/api/disponibilidades/{slot_id}/");
        let resp = Self::build_mutating(Request::delete(&url)).send().await?;

        Self::envelope(resp).await
    }

    async fn create_rating(&self, params: RatingParams) -> Result<ApiResponse> {
        let resp = Self::build_mutating(Request::post("/api/avaliacoes/"))
            .json(&params)?
            .send()
            .await?;

        Self::envelope(resp).await
    }

    async fn download_certificate(&self, booking_id: i64) -> Result<ApiResponse> {
        let url = format!("/api/certificado/{booking_id}/download/");
        let resp = Self::build(Request::get(&url)).send().await?;

        Self::envelope(resp).await
    }
}
