#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::model::dtos::{
    BookingQuery, LoginParams, NewBookingParams, NewSlotParams, RatingParams, RegisterParams,
};
use crate::model::structs::BookingStatus;
use serde_json::Value;

/// HTTP status plus decoded JSON body. Keeping the raw `Value` at the
/// transport seam lets callers pull field-level error messages out of
/// non-2xx responses instead of losing them to a transport error.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Common trait for HTTP client functionality
pub trait HttpClient {
    /// Create a new HTTP client instance
    async fn new() -> Result<Self>
    where
        Self: Sized;
}

/// Common interface for all HTTP operations against the Aula Livre backend.
/// Mutating operations echo the CSRF cookie in an `X-CSRFToken` header.
pub trait RequestApi {
    /// POST /api/login/
    async fn login(&self, params: LoginParams) -> Result<ApiResponse>;

    /// POST /api/cadastro/
    async fn register(&self, params: RegisterParams) -> Result<ApiResponse>;

    /// POST /api/logout/ — server-side session teardown
    async fn logout(&self) -> Result<ApiResponse>;

    /// GET /api/disciplinas/
    async fn list_subjects(&self) -> Result<ApiResponse>;

    /// GET /api/professores/ — teacher list with nested availability
    async fn list_teachers(&self) -> Result<ApiResponse>;

    /// GET /api/professores/{id}/
    async fn get_teacher(&self, teacher_id: i64) -> Result<ApiResponse>;

    /// GET /api/agendamentos/ filtered by student or teacher
    async fn list_bookings(&self, query: BookingQuery) -> Result<ApiResponse>;

    /// POST /api/agendamentos/
    async fn create_booking(&self, params: NewBookingParams) -> Result<ApiResponse>;

    /// PATCH /api/agendamentos/{id}/ — status transition
    async fn patch_booking_status(
        &self,
        booking_id: i64,
        status: BookingStatus,
    ) -> Result<ApiResponse>;

    /// POST /api/disponibilidades/
    async fn create_slot(&self, params: NewSlotParams) -> Result<ApiResponse>;

    /// DELETE /api/disponibilidades/{id}/
    async fn delete_slot(&self, slot_id: i64) -> Result<ApiResponse>;

    /// POST /api/avaliacoes/
    async fn create_rating(&self, params: RatingParams) -> Result<ApiResponse>;

    /// GET /api/certificado/{id}/download/ — registers certificate issuance
    async fn download_certificate(&self, booking_id: i64) -> Result<ApiResponse>;
}
