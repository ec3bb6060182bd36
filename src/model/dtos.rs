use crate::model::structs::UserRole;
use chrono::NaiveDate;
use serde::Serialize;

/// Common parameters for login requests
#[derive(Debug, Clone, Serialize)]
pub struct LoginParams {
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
}

/// Common parameters for account registration
#[derive(Debug, Clone, Serialize)]
pub struct RegisterParams {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
    #[serde(rename = "tipo")]
    pub role: UserRole,
}

/// Booking list filter, one of the two backend query parameters.
#[derive(Debug, Clone, Copy)]
pub enum BookingQuery {
    ByStudent(i64),
    ByTeacher(i64),
}

impl BookingQuery {
    pub fn query_pair(&self) -> (&'static str, i64) {
        match *self {
            BookingQuery::ByStudent(id) => ("aluno_id", id),
            BookingQuery::ByTeacher(id) => ("professor_id", id),
        }
    }
}

/// Common parameters for creating a booking
#[derive(Debug, Clone, Serialize)]
pub struct NewBookingParams {
    #[serde(rename = "aluno")]
    pub student_id: i64,
    #[serde(rename = "disponibilidade")]
    pub availability_id: i64,
}

/// Common parameters for publishing an availability slot
#[derive(Debug, Clone, Serialize)]
pub struct NewSlotParams {
    #[serde(rename = "professor")]
    pub teacher_id: i64,
    #[serde(rename = "disciplina", skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<i64>,
    #[serde(rename = "data")]
    pub date: NaiveDate,
    #[serde(rename = "horario_inicio")]
    pub start_time: String,
    #[serde(rename = "assunto", skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(rename = "nivel", skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(rename = "descricao", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Common parameters for submitting a rating
#[derive(Debug, Clone, Serialize)]
pub struct RatingParams {
    #[serde(rename = "agendamento")]
    pub booking_id: i64,
    #[serde(rename = "tipo_avaliador")]
    pub reviewer_role: UserRole,
    #[serde(rename = "nota")]
    pub score: u8,
    #[serde(rename = "comentario")]
    pub comment: String,
}

/// Raw new-slot form input as read from the DOM, before validation and
/// weekday resolution.
#[derive(Debug, Clone, Default)]
pub struct NewSlotForm {
    pub weekday: String,
    pub time: String,
    pub subject_id: String,
    pub level: String,
    pub topic: String,
    pub link: String,
}
