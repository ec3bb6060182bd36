//! Canned transport for tests: per-endpoint response queues plus a record of
//! every call made. An endpoint with nothing queued reports a transport
//! error, which doubles as the "connection failed" scenario.

use crate::error::{ErrorKind, Result};
use crate::interface::{ApiResponse, RequestApi};
use crate::model::dtos::{
    BookingQuery, LoginParams, NewBookingParams, NewSlotParams, RatingParams, RegisterParams,
};
use crate::model::structs::BookingStatus;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

#[derive(Default)]
pub(crate) struct StubApi {
    queues: RefCell<HashMap<&'static str, VecDeque<ApiResponse>>>,
    pub calls: RefCell<Vec<String>>,
}

impl StubApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, op: &'static str, status: u16, body: Value) {
        self.queues
            .borrow_mut()
            .entry(op)
            .or_default()
            .push_back(ApiResponse { status, body });
    }

    fn next(&self, op: &'static str, call: String) -> Result<ApiResponse> {
        self.calls.borrow_mut().push(call);
        self.queues
            .borrow_mut()
            .get_mut(op)
            .and_then(|q| q.pop_front())
            .ok_or_else(|| ErrorKind::ParseError(format!("stub: no response queued for {op}")).into())
    }
}

impl RequestApi for StubApi {
    async fn login(&self, params: LoginParams) -> Result<ApiResponse> {
        self.next("login", format!("login {}", params.email))
    }

    async fn register(&self, params: RegisterParams) -> Result<ApiResponse> {
        self.next("register", format!("register {}", params.email))
    }

    async fn logout(&self) -> Result<ApiResponse> {
        self.next("logout", "logout".to_string())
    }

    async fn list_subjects(&self) -> Result<ApiResponse> {
        self.next("list_subjects", "list_subjects".to_string())
    }

    async fn list_teachers(&self) -> Result<ApiResponse> {
        self.next("list_teachers", "list_teachers".to_string())
    }

    async fn get_teacher(&self, teacher_id: i64) -> Result<ApiResponse> {
        self.next("get_teacher", format!("get_teacher {teacher_id}"))
    }

    async fn list_bookings(&self, query: BookingQuery) -> Result<ApiResponse> {
        let (key, id) = query.query_pair();
        self.next("list_bookings", format!("list_bookings {key}={id}"))
    }

    async fn create_booking(&self, params: NewBookingParams) -> Result<ApiResponse> {
        self.next(
            "create_booking",
            format!(
                "create_booking aluno={} disponibilidade={}",
                params.student_id, params.availability_id
            ),
        )
    }

    async fn patch_booking_status(
        &self,
        booking_id: i64,
        status: BookingStatus,
    ) -> Result<ApiResponse> {
        self.next(
            "patch_booking_status",
            format!("patch_booking_status {booking_id} {}", status.wire()),
        )
    }

    async fn create_slot(&self, params: NewSlotParams) -> Result<ApiResponse> {
        let payload = serde_json::to_string(&params).unwrap_or_default();
        self.next("create_slot", format!("create_slot {payload}"))
    }

    async fn delete_slot(&self, slot_id: i64) -> Result<ApiResponse> {
        self.next("delete_slot", format!("delete_slot {slot_id}"))
    }

    async fn create_rating(&self, params: RatingParams) -> Result<ApiResponse> {
        self.next(
            "create_rating",
            format!(
                "create_rating agendamento={} nota={}",
                params.booking_id, params.score
            ),
        )
    }

    async fn download_certificate(&self, booking_id: i64) -> Result<ApiResponse> {
        self.next(
            "download_certificate",
            format!("download_certificate {booking_id}"),
        )
    }
}
