//! Application module - handles core application logic
//!
//! This module provides the shared application context and the mutating
//! actions behind every form and button, with platform-specific DOM wiring
//! for WASM environments.

#[cfg(feature = "wasm")]
pub mod wasm;

use crate::client::api_result;
use crate::error::{ErrorKind, Result};
use crate::interface::RequestApi;
use crate::model::dtos::{NewBookingParams, NewSlotForm, NewSlotParams, RatingParams};
use crate::model::structs::{BookingStatus, Session, Subject, TeacherCard};
use crate::router::NavTokens;
use crate::schedule::{next_date_for_weekday, parse_weekday};
use crate::session::SessionStore;
use std::cell::RefCell;

/// Action armed by a management button and dispatched by the confirmation
/// dialog's confirm button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Accept(i64),
    Reject(i64),
    Complete(i64),
    Cancel(i64),
    DeleteSlot(i64),
}

impl PendingAction {
    /// Maps a `data-action` attribute to the action it arms.
    pub fn from_parts(action: &str, id: i64) -> Option<PendingAction> {
        match action {
            "aceitar" => Some(PendingAction::Accept(id)),
            "recusar" => Some(PendingAction::Reject(id)),
            "concluir" => Some(PendingAction::Complete(id)),
            "cancelar" => Some(PendingAction::Cancel(id)),
            "excluir" => Some(PendingAction::DeleteSlot(id)),
            _ => None,
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            PendingAction::Accept(_) => "Confirmar esta aula?",
            PendingAction::Reject(_) => "Recusar esta solicitação?",
            PendingAction::Complete(_) => "Deseja marcar esta aula como concluída?",
            PendingAction::Cancel(_) => "Deseja cancelar o agendamento?",
            PendingAction::DeleteSlot(_) => "Excluir este horário?",
        }
    }

    pub fn done_message(&self) -> &'static str {
        match self {
            PendingAction::Accept(_) => "Aula confirmada!",
            PendingAction::Reject(_) => "Solicitação recusada.",
            PendingAction::Complete(_) => "Aula concluída!",
            PendingAction::Cancel(_) => "Cancelado.",
            PendingAction::DeleteSlot(_) => "Horário excluído.",
        }
    }
}

/// Shared state threaded through navigation and action handlers instead of
/// process-wide variables: the teacher-card cache written by the explore
/// view, the armed confirmation action, and the navigation token counter.
pub struct AppContext<A: RequestApi> {
    pub api: A,
    pub session: SessionStore,
    pub teachers: RefCell<Vec<TeacherCard>>,
    pub pending: RefCell<Option<PendingAction>>,
    /// Booking the open rating dialog is about, if any.
    pub rating_target: RefCell<Option<i64>>,
    pub nav: NavTokens,
}

impl<A: RequestApi> AppContext<A> {
    pub fn new(api: A) -> Self {
        AppContext {
            api,
            session: SessionStore::new(),
            teachers: RefCell::new(Vec::new()),
            pending: RefCell::new(None),
            rating_target: RefCell::new(None),
            nav: NavTokens::new(),
        }
    }

    pub fn cache_teachers(&self, cards: Vec<TeacherCard>) {
        *self.teachers.borrow_mut() = cards;
    }

    /// Lookup for the scheduling dialog, served from the explore cache.
    pub fn teacher_card(&self, id: i64) -> Option<TeacherCard> {
        self.teachers.borrow().iter().find(|c| c.id == id).cloned()
    }

    pub fn arm(&self, action: PendingAction) {
        *self.pending.borrow_mut() = Some(action);
    }

    fn require_session(&self) -> Result<Session> {
        self.session
            .get_user()
            .ok_or_else(|| ErrorKind::Api("Você precisa fazer login.".to_string()).into())
    }

    pub async fn load_subjects(&self) -> Result<Vec<Subject>> {
        let body = api_result(
            self.api.list_subjects().await?,
            "Erro ao carregar disciplinas",
        )?;

        Ok(serde_json::from_value(body)?)
    }

    /// Publishes a new availability slot. The form carries a weekday name;
    /// the concrete date is its next occurrence (today or up to seven days
    /// ahead).
    pub async fn add_slot(&self, form: &NewSlotForm) -> Result<()> {
        let session = self.require_session()?;
        if form.time.trim().is_empty() {
            return Err(ErrorKind::Api("Informe o horário da aula.".to_string()).into());
        }

        let weekday = parse_weekday(&form.weekday)?;
        let date = next_date_for_weekday(today(), weekday);
        let subject_id = form.subject_id.trim().parse::<i64>().ok();

        let params = NewSlotParams {
            teacher_id: session.id,
            subject_id,
            date,
            start_time: form.time.trim().to_string(),
            topic: non_empty(&form.topic),
            level: non_empty(&form.level),
            description: None,
            link: non_empty(&form.link),
        };

        api_result(self.api.create_slot(params).await?, "Erro ao criar horário")?;
        Ok(())
    }

    /// Books an open slot for the logged-in student.
    pub async fn request_booking(&self, slot_id: i64) -> Result<()> {
        let session = self.require_session()?;
        let params = NewBookingParams {
            student_id: session.id,
            availability_id: slot_id,
        };

        api_result(
            self.api.create_booking(params).await?,
            "Erro ao agendar a aula",
        )?;
        Ok(())
    }

    pub async fn transition_booking(&self, booking_id: i64, status: BookingStatus) -> Result<()> {
        api_result(
            self.api.patch_booking_status(booking_id, status).await?,
            "Erro ao atualizar o agendamento",
        )?;
        Ok(())
    }

    pub async fn delete_slot(&self, slot_id: i64) -> Result<()> {
        api_result(
            self.api.delete_slot(slot_id).await?,
            "Erro ao excluir o horário",
        )?;
        Ok(())
    }

    /// Dispatches the armed confirmation action, if any, and returns it so
    /// the caller can report what happened.
    pub async fn confirm_pending(&self) -> Result<Option<PendingAction>> {
        let action = self.pending.borrow_mut().take();
        let Some(action) = action else {
            return Ok(None);
        };

        match action {
            PendingAction::Accept(id) => {
                self.transition_booking(id, BookingStatus::Confirmed).await?
            }
            PendingAction::Reject(id) | PendingAction::Cancel(id) => {
                self.transition_booking(id, BookingStatus::Cancelled).await?
            }
            PendingAction::Complete(id) => {
                self.transition_booking(id, BookingStatus::Completed).await?
            }
            PendingAction::DeleteSlot(id) => self.delete_slot(id).await?,
        }

        Ok(Some(action))
    }

    /// Submits a 1–5 rating for a completed booking as the logged-in role.
    pub async fn submit_rating(&self, booking_id: i64, score: u8, comment: &str) -> Result<()> {
        let session = self.require_session()?;
        if !(1..=5).contains(&score) {
            return Err(ErrorKind::Api("Escolha uma nota de 1 a 5.".to_string()).into());
        }

        let params = RatingParams {
            booking_id,
            reviewer_role: session.role,
            score,
            comment: comment.trim().to_string(),
        };

        api_result(
            self.api.create_rating(params).await?,
            "Erro ao enviar a avaliação",
        )?;
        Ok(())
    }

    /// Registers certificate issuance for a completed, rated booking.
    pub async fn issue_certificate(&self, booking_id: i64) -> Result<()> {
        api_result(
            self.api.download_certificate(booking_id).await?,
            "Erro ao emitir o certificado",
        )?;
        Ok(())
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::structs::UserRole;
    use crate::testutil::StubApi;
    use chrono::Datelike;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    async fn logged_in_ctx(role: UserRole) -> AppContext<StubApi> {
        let ctx = AppContext::new(StubApi::new());
        ctx.api.push(
            "login",
            200,
            json!({"id": 9, "nome": "Ana Souza", "email": "ana@x.br", "tipo": role.wire()}),
        );
        ctx.session.login(&ctx.api, "ana@x.br", "s3nh4").await.unwrap();
        ctx
    }

    #[tokio::test]
    async fn add_slot_resolves_weekday_to_a_date() {
        let ctx = logged_in_ctx(UserRole::Teacher).await;
        ctx.api.push("create_slot", 201, json!({"id": 1}));

        let form = NewSlotForm {
            weekday: "segunda".to_string(),
            time: "18:00".to_string(),
            subject_id: "3".to_string(),
            level: "Fundamental".to_string(),
            topic: "Frações".to_string(),
            link: String::new(),
        };
        ctx.add_slot(&form).await.unwrap();

        let calls = ctx.api.calls.borrow();
        let call = calls.iter().find(|c| c.starts_with("create_slot")).unwrap();
        let payload: serde_json::Value =
            serde_json::from_str(call.strip_prefix("create_slot ").unwrap()).unwrap();

        assert_eq!(payload["professor"], 9);
        assert_eq!(payload["disciplina"], 3);
        assert_eq!(payload["horario_inicio"], "18:00");
        assert_eq!(payload["assunto"], "Frações");
        assert!(payload.get("link").is_none());

        let date: chrono::NaiveDate = payload["data"].as_str().unwrap().parse().unwrap();
        assert_eq!(date.weekday(), chrono::Weekday::Mon);
    }

    #[tokio::test]
    async fn add_slot_requires_a_time() {
        let ctx = logged_in_ctx(UserRole::Teacher).await;
        let form = NewSlotForm {
            weekday: "terça".to_string(),
            ..Default::default()
        };
        let err = ctx.add_slot(&form).await.unwrap_err();
        assert_eq!(err.user_message(), "Informe o horário da aula.");
    }

    #[tokio::test]
    async fn booking_requires_login() {
        let ctx: AppContext<StubApi> = AppContext::new(StubApi::new());
        let err = ctx.request_booking(7).await.unwrap_err();
        assert_eq!(err.user_message(), "Você precisa fazer login.");
    }

    #[tokio::test]
    async fn confirm_pending_dispatches_the_armed_action() {
        let ctx = logged_in_ctx(UserRole::Teacher).await;
        ctx.api.push("patch_booking_status", 200, json!({"id": 42}));

        ctx.arm(PendingAction::Accept(42));
        let done = ctx.confirm_pending().await.unwrap();
        assert_eq!(done, Some(PendingAction::Accept(42)));
        assert!(ctx.pending.borrow().is_none());

        let calls = ctx.api.calls.borrow();
        assert!(calls.contains(&"patch_booking_status 42 CONFIRMADO".to_string()));
    }

    #[tokio::test]
    async fn confirm_pending_without_armed_action_is_a_no_op() {
        let ctx = logged_in_ctx(UserRole::Teacher).await;
        assert_eq!(ctx.confirm_pending().await.unwrap(), None);
        assert_eq!(ctx.api.calls.borrow().len(), 1); // just the login
    }

    #[tokio::test]
    async fn delete_goes_through_the_slot_endpoint() {
        let ctx = logged_in_ctx(UserRole::Teacher).await;
        ctx.api.push("delete_slot", 204, json!(null));

        ctx.arm(PendingAction::DeleteSlot(5));
        ctx.confirm_pending().await.unwrap();

        let calls = ctx.api.calls.borrow();
        assert!(calls.contains(&"delete_slot 5".to_string()));
    }

    #[tokio::test]
    async fn rating_score_is_validated_client_side() {
        let ctx = logged_in_ctx(UserRole::Student).await;
        let err = ctx.submit_rating(42, 0, "").await.unwrap_err();
        assert_eq!(err.user_message(), "Escolha uma nota de 1 a 5.");
        assert_eq!(ctx.api.calls.borrow().len(), 1); // nothing sent

        ctx.api.push("create_rating", 201, json!({"id": 1}));
        ctx.submit_rating(42, 5, "Ótima aula").await.unwrap();
        assert!(ctx
            .api
            .calls
            .borrow()
            .contains(&"create_rating agendamento=42 nota=5".to_string()));
    }

    #[test]
    fn data_action_names_map_to_pending_actions() {
        assert_eq!(
            PendingAction::from_parts("aceitar", 1),
            Some(PendingAction::Accept(1))
        );
        assert_eq!(
            PendingAction::from_parts("excluir", 2),
            Some(PendingAction::DeleteSlot(2))
        );
        assert_eq!(PendingAction::from_parts("avaliar", 3), None);
    }

    #[tokio::test]
    async fn teacher_card_lookup_hits_the_cache() {
        let ctx: AppContext<StubApi> = AppContext::new(StubApi::new());
        ctx.cache_teachers(vec![TeacherCard {
            id: 7,
            name: "Bruno Lima".to_string(),
            main_subject: "História".to_string(),
            description: String::new(),
            open_slots: vec![],
        }]);

        assert_eq!(ctx.teacher_card(7).unwrap().name, "Bruno Lima");
        assert!(ctx.teacher_card(8).is_none());
    }
}
