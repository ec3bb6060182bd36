//! No-WASM HTTP client implementation using reqwest
//!
//! This module provides HTTP functionality for non-WASM environments
//! using the reqwest crate for making HTTP requests.

use crate::error::Result;
use crate::interface::{ApiResponse, HttpClient, RequestApi};
use crate::model::dtos::{
    BookingQuery, LoginParams, NewBookingParams, NewSlotParams, RatingParams, RegisterParams,
};
use crate::model::structs::BookingStatus;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client, Response,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

const DEFAULT_BASE: &str = "http://127.0.0.1:8000";
const CSRF_COOKIE: &str = "csrftoken";
const CSRF_HEADER: &str = "X-CSRFToken";

/// HTTP client for no-WASM environments using reqwest. Keeps a cookie jar so
/// the Django session survives across calls, and remembers the last CSRF
/// cookie seen so mutating calls can echo it back in a header.
#[derive(Debug, Clone)]
pub struct NoWasmClient {
    client: Client,
    base: String,
    csrf: Arc<Mutex<Option<String>>>,
}

impl HttpClient for NoWasmClient {
    async fn new() -> Result<Self> {
        NoWasmClient::with_base(DEFAULT_BASE)
    }
}

impl NoWasmClient {
    pub fn with_base(base: &str) -> Result<Self> {
        let client = Client::builder().cookie_store(true).build()?;

        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
            csrf: Arc::new(Mutex::new(None)),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn remember_csrf(&self, resp: &Response) {
        for cookie in resp.cookies() {
            if cookie.name() == CSRF_COOKIE {
                if let Ok(mut slot) = self.csrf.lock() {
                    *slot = Some(cookie.value().to_string());
                }
            }
        }
    }

    fn csrf_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let token = self.csrf.lock().ok().and_then(|slot| slot.clone());
        if let Some(token) = token {
            if let Ok(value) = HeaderValue::from_str(&token) {
                headers.insert(CSRF_HEADER, value);
            }
        }
        headers
    }

    async fn envelope(&self, resp: Response) -> Result<ApiResponse> {
        self.remember_csrf(&resp);
        let status = resp.status().as_u16();
        let text = resp.text().await?;

        // DELETE and logout answer with empty bodies.
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(ApiResponse { status, body })
    }
}

impl RequestApi for NoWasmClient {
    async fn login(&self, params: LoginParams) -> Result<ApiResponse> {
        let resp = self
            .client
            .post(self.url("/api/login/"))
            .headers(self.csrf_headers())
            .json(&params)
            .send()
            .await?;

        self.envelope(resp).await
    }

    async fn register(&self, params: RegisterParams) -> Result<ApiResponse> {
        let resp = self
            .client
            .post(self.url("/api/cadastro/"))
            .headers(self.csrf_headers())
            .json(&params)
            .send()
            .await?;

        self.envelope(resp).await
    }

    async fn logout(&self) -> Result<ApiResponse> {
        let resp = self
            .client
            .post(self.url("/api/logout/"))
            .headers(self.csrf_headers())
            .send()
            .await?;

        self.envelope(resp).await
    }

    async fn list_subjects(&self) -> Result<ApiResponse> {
        let resp = self.client.get(self.url("/api/disciplinas/")).send().await?;

        self.envelope(resp).await
    }

    async fn list_teachers(&self) -> Result<ApiResponse> {
        let resp = self.client.get(self.url("/api/professores/")).send().await?;

        self.envelope(resp).await
    }

    async fn get_teacher(&self, teacher_id: i64) -> Result<ApiResponse> {
        let resp = self
            .client
            .get(self.url(&format!("/api/professores/{teacher_id}/")))
            .send()
            .await?;

        self.envelope(resp).await
    }

    async fn list_bookings(&self, query: BookingQuery) -> Result<ApiResponse> {
        let (key, id) = query.query_pair();
        let resp = self
            .client
            .get(self.url("/api/agendamentos/"))
            .query(&[(key, id)])
            .send()
            .await?;

        self.envelope(resp).await
    }

    async fn create_booking(&self, params: NewBookingParams) -> Result<ApiResponse> {
        let resp = self
            .client
            .post(self.url("/api/agendamentos/"))
            .headers(self.csrf_headers())
            .json(&params)
            .send()
            .await?;

        self.envelope(resp).await
    }

    async fn patch_booking_status(
        &self,
        booking_id: i64,
        status: BookingStatus,
    ) -> Result<ApiResponse> {
        let resp = self
            .client
            .patch(self.url(&format!("/api/agendamentos/{booking_id}/")))
            .headers(self.csrf_headers())
            .json(&json!({ "status": status.wire() }))
            .send()
            .await?;

        self.envelope(resp).await
    }

    async fn create_slot(&self, params: NewSlotParams) -> Result<ApiResponse> {
        let resp = self
            .client
            .post(self.url("/api/disponibilidades/"))
            .headers(self.csrf_headers())
            .json(&params)
            .send()
            .await?;

        self.envelope(resp).await
    }

    async fn delete_slot(&self, slot_id: i64) -> Result<ApiResponse> {
        let resp = self
            .client
            .delete(self.url(&format!("/api/disponibilidades/{slot_id}/")))
            .headers(self.csrf_headers())
            .send()
            .await?;

        self.envelope(resp).await
    }

    async fn create_rating(&self, params: RatingParams) -> Result<ApiResponse> {
        let resp = self
            .client
            .post(self.url("/api/avaliacoes/"))
            .headers(self.csrf_headers())
            .json(&params)
            .send()
            .await?;

        self.envelope(resp).await
    }

    async fn download_certificate(&self, booking_id: i64) -> Result<ApiResponse> {
        let resp = self
            .client
            .get(self.url(&format!("/api/certificado/{booking_id}/download/")))
            .send()
            .await?;

        self.envelope(resp).await
    }
}
