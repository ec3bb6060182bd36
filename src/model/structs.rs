use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Wire field names follow the backend (Portuguese); struct fields are renamed.

/// Account role, stored canonically upper-case server-side. Older backend
/// revisions emitted lower-case values from the login endpoint, so both are
/// accepted when decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "ALUNO", alias = "aluno", alias = "Aluno")]
    Student,
    #[serde(rename = "PROFESSOR", alias = "professor", alias = "Professor")]
    Teacher,
}

impl UserRole {
    pub fn wire(&self) -> &'static str {
        match self {
            UserRole::Student => "ALUNO",
            UserRole::Teacher => "PROFESSOR",
        }
    }
}

/// Client-held record of the authenticated user, persisted verbatim in the
/// session store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "tipo")]
    pub role: UserRole,
}

impl Session {
    /// Short display name used in the navbar greeting.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(default, rename = "descricao")]
    pub description: Option<String>,
}

/// A teacher-published open time window for a lesson.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub id: i64,
    #[serde(rename = "professor")]
    pub teacher_id: i64,
    #[serde(default, rename = "disciplina")]
    pub subject_id: Option<i64>,
    #[serde(default, rename = "assunto")]
    pub topic: Option<String>,
    #[serde(default, rename = "nivel")]
    pub level: Option<String>,
    #[serde(default, rename = "descricao")]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(rename = "data")]
    pub date: NaiveDate,
    #[serde(rename = "horario_inicio")]
    pub start_time: String,
    #[serde(rename = "disponivel")]
    pub is_open: bool,
}

impl AvailabilitySlot {
    /// "2026-08-10 às 18:00" — the label shown on scheduling buttons.
    pub fn when(&self) -> String {
        format!("{} às {}", self.date.format("%d/%m/%Y"), short_time(&self.start_time))
    }
}

/// Booking status lifecycle. Wire values are the backend's state names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    #[serde(rename = "AGENDADO")]
    Requested,
    #[serde(rename = "CONFIRMADO")]
    Confirmed,
    #[serde(rename = "CONCLUIDO")]
    Completed,
    #[serde(rename = "CANCELADO")]
    Cancelled,
}

impl BookingStatus {
    pub fn wire(&self) -> &'static str {
        match self {
            BookingStatus::Requested => "AGENDADO",
            BookingStatus::Confirmed => "CONFIRMADO",
            BookingStatus::Completed => "CONCLUIDO",
            BookingStatus::Cancelled => "CANCELADO",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Requested => "Aguardando Confirmação",
            BookingStatus::Confirmed => "Confirmado",
            BookingStatus::Completed => "Concluído",
            BookingStatus::Cancelled => "Cancelado",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            BookingStatus::Requested => "bg-warning text-dark",
            BookingStatus::Confirmed => "bg-primary",
            BookingStatus::Completed => "bg-success",
            BookingStatus::Cancelled => "bg-secondary",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingInfo {
    #[serde(rename = "nota")]
    pub score: u8,
    #[serde(default, rename = "comentario")]
    pub comment: Option<String>,
}

/// Read-only context the list endpoints embed alongside a booking so rows can
/// be rendered without extra lookups. Tolerated as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingDetail {
    #[serde(default, rename = "professor_nome")]
    pub teacher_name: Option<String>,
    #[serde(default, rename = "aluno_nome")]
    pub student_name: Option<String>,
    #[serde(default, rename = "disciplina_nome")]
    pub subject_name: Option<String>,
    #[serde(default, rename = "data")]
    pub date: Option<NaiveDate>,
    #[serde(default, rename = "horario_inicio")]
    pub start_time: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// A student's reservation against an availability slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    #[serde(rename = "aluno")]
    pub student_id: i64,
    #[serde(rename = "disponibilidade")]
    pub availability_id: i64,
    pub status: BookingStatus,
    #[serde(default, rename = "detalhes")]
    pub detail: Option<BookingDetail>,
    #[serde(default, rename = "avaliacao")]
    pub rating: Option<RatingInfo>,
}

impl Booking {
    pub fn is_rated(&self) -> bool {
        self.rating.is_some()
    }
}

/// Teacher profile as listed by the backend, with nested availability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherDto {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub disciplinas: Vec<String>,
    #[serde(default, rename = "disponibilidades")]
    pub slots: Vec<AvailabilitySlot>,
    #[serde(default, rename = "avaliacoes")]
    pub ratings: Vec<RatingInfo>,
}

/// View-friendly record backing the explore cards and the scheduling dialog.
#[derive(Debug, Clone)]
pub struct TeacherCard {
    pub id: i64,
    pub name: String,
    pub main_subject: String,
    pub description: String,
    pub open_slots: Vec<AvailabilitySlot>,
}

impl TeacherCard {
    pub fn from_dto(dto: TeacherDto) -> TeacherCard {
        let main_subject = dto
            .disciplinas
            .first()
            .cloned()
            .unwrap_or_else(|| "Geral".to_string());
        let description = if dto.disciplinas.is_empty() {
            "Professor voluntário".to_string()
        } else {
            format!("Professor de {}", dto.disciplinas.join(", "))
        };
        let open_slots = dto.slots.into_iter().filter(|s| s.is_open).collect();

        TeacherCard {
            id: dto.id,
            name: dto.name,
            main_subject,
            description,
            open_slots,
        }
    }
}

/// "18:00:00" -> "18:00"; anything shorter passes through unchanged.
pub fn short_time(t: &str) -> &str {
    if t.len() >= 5 { &t[..5] } else { t }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn role_accepts_legacy_lowercase() {
        let upper: UserRole = serde_json::from_str("\"PROFESSOR\"").unwrap();
        let lower: UserRole = serde_json::from_str("\"professor\"").unwrap();
        assert_eq!(upper, UserRole::Teacher);
        assert_eq!(lower, UserRole::Teacher);
    }

    #[test]
    fn booking_status_decodes_wire_names() {
        let status: BookingStatus = serde_json::from_str("\"AGENDADO\"").unwrap();
        assert_eq!(status, BookingStatus::Requested);
        assert_eq!(BookingStatus::Completed.wire(), "CONCLUIDO");
    }

    #[test]
    fn booking_tolerates_flat_payload() {
        let booking: Booking = serde_json::from_value(serde_json::json!({
            "id": 7,
            "aluno": 3,
            "disponibilidade": 12,
            "status": "CONFIRMADO"
        }))
        .unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert!(booking.detail.is_none());
        assert!(!booking.is_rated());
    }

    #[test]
    fn teacher_card_reshapes_subjects() {
        let dto = TeacherDto {
            id: 1,
            name: "Ana Souza".to_string(),
            email: None,
            disciplinas: vec!["Matemática".to_string(), "Física".to_string()],
            slots: vec![],
            ratings: vec![],
        };
        let card = TeacherCard::from_dto(dto);
        assert_eq!(card.main_subject, "Matemática");
        assert_eq!(card.description, "Professor de Matemática, Física");
    }

    #[test]
    fn teacher_card_falls_back_to_general() {
        let dto = TeacherDto {
            id: 2,
            name: "Bruno Lima".to_string(),
            email: None,
            disciplinas: vec![],
            slots: vec![],
            ratings: vec![],
        };
        assert_eq!(TeacherCard::from_dto(dto).main_subject, "Geral");
    }
}
