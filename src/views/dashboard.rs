//! Dashboard view: role-appropriate tables grouped by booking status.
//!
//! Students get their bookings in one request; teachers get their profile
//! (with availability) and their bookings fetched in parallel. Action
//! buttons carry `data-action`/`data-id` attributes consumed by the
//! delegated click handler.

use crate::client::api_result;
use crate::error::Result;
use crate::interface::RequestApi;
use crate::model::dtos::BookingQuery;
use crate::model::structs::{
    short_time, AvailabilitySlot, Booking, BookingStatus, Session, TeacherDto, UserRole,
};
use futures::join;

pub async fn render(api: &impl RequestApi, session: &Session) -> String {
    match session.role {
        UserRole::Student => render_student(api, session).await,
        UserRole::Teacher => render_teacher(api, session).await,
    }
}

fn error_page() -> String {
    r#"
    <div class="container py-5">
        <p class="text-danger text-center">Erro ao carregar seus dados. Tente novamente.</p>
    </div>
    "#
    .to_string()
}

pub(crate) async fn fetch_bookings(
    api: &impl RequestApi,
    query: BookingQuery,
) -> Result<Vec<Booking>> {
    let body = api_result(
        api.list_bookings(query).await?,
        "Erro ao carregar agendamentos",
    )?;

    Ok(serde_json::from_value(body)?)
}

fn by_status(bookings: &[Booking], status: BookingStatus) -> Vec<&Booking> {
    bookings.iter().filter(|b| b.status == status).collect()
}

fn subject_of(b: &Booking) -> &str {
    b.detail
        .as_ref()
        .and_then(|d| d.subject_name.as_deref())
        .unwrap_or("Aula")
}

fn counterpart_name(b: &Booking, viewer: UserRole) -> &str {
    let detail = b.detail.as_ref();
    let name = match viewer {
        UserRole::Student => detail.and_then(|d| d.teacher_name.as_deref()),
        UserRole::Teacher => detail.and_then(|d| d.student_name.as_deref()),
    };
    name.unwrap_or("-")
}

fn when_of(b: &Booking) -> String {
    match b.detail.as_ref() {
        Some(d) => {
            let date = d
                .date
                .map(|date| date.format("%d/%m/%Y").to_string())
                .unwrap_or_else(|| "-".to_string());
            match d.start_time.as_deref() {
                Some(t) => format!("{date} às {}", short_time(t)),
                None => date,
            }
        }
        None => "-".to_string(),
    }
}

fn status_badge(b: &Booking) -> String {
    format!(
        r#"<span class="badge {}">{}</span>"#,
        b.status.badge_class(),
        b.status.label()
    )
}

// ---------------------------------------------------------------- student --

/// Per-booking actions on the student dashboard. A completed lesson offers
/// exactly one of evaluate / view-rating, depending on whether a rating
/// exists; the certificate unlocks together with view-rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentAction {
    Cancel,
    Evaluate,
    ViewRating,
    Certificate,
}

pub fn student_actions(b: &Booking) -> Vec<StudentAction> {
    match b.status {
        BookingStatus::Requested | BookingStatus::Confirmed => vec![StudentAction::Cancel],
        BookingStatus::Completed => {
            if b.is_rated() {
                vec![StudentAction::ViewRating, StudentAction::Certificate]
            } else {
                vec![StudentAction::Evaluate]
            }
        }
        BookingStatus::Cancelled => vec![],
    }
}

fn student_action_html(action: StudentAction, b: &Booking) -> String {
    let id = b.id;
    let teacher = counterpart_name(b, UserRole::Student);
    let score = b.rating.as_ref().map(|r| r.score).unwrap_or(0);
    let comment = b
        .rating
        .as_ref()
        .and_then(|r| r.comment.as_deref())
        .unwrap_or("");
    let subject = subject_of(b);
    match action {
        StudentAction::Cancel => format!(
            r#"<button class="btn btn-sm btn-outline-danger" data-action="cancelar" data-id="{id}" title="Cancelar"><i class="bi bi-trash"></i></button>"#
        ),
        StudentAction::Evaluate => format!(
            r#"<button class="btn btn-sm btn-warning fw-bold" data-action="avaliar" data-id="{id}" data-nome="{teacher}"><i class="bi bi-star-fill me-1"></i> Avaliar Aula</button>
               <button class="btn btn-sm btn-light text-muted border" disabled title="Avalie para liberar"><i class="bi bi-lock-fill me-1"></i> Bloqueado</button>"#
        ),
        StudentAction::ViewRating => format!(
            r#"<button class="btn btn-sm btn-info text-white" data-action="ver-avaliacao" data-id="{id}" data-nome="{teacher}" data-nota="{score}" data-comentario="{comment}"><i class="bi bi-eye-fill me-1"></i> Ver Avaliação</button>"#
        ),
        StudentAction::Certificate => format!(
            r#"<button class="btn btn-sm btn-outline-dark" data-action="certificado" data-id="{id}" data-materia="{subject}"><i class="bi bi-award-fill me-1"></i> Certificado</button>"#
        ),
    }
}

fn student_row(b: &Booking) -> String {
    let actions = student_actions(b)
        .into_iter()
        .map(|a| student_action_html(a, b))
        .collect::<Vec<_>>()
        .join(" ");

    let link = match (b.status, b.detail.as_ref().and_then(|d| d.link.as_deref())) {
        (BookingStatus::Confirmed, Some(link)) => format!(
            r#"<br><a href="{link}" target="_blank" class="small text-primary">Link da aula</a>"#
        ),
        _ => String::new(),
    };

    format!(
        r#"
        <tr>
            <td>
                <div class="fw-bold">{subject}</div>
                <small class="text-muted">Prof. {teacher}</small>
            </td>
            <td class="align-middle">{when}</td>
            <td class="align-middle">{badge}{link}</td>
            <td class="text-end align-middle">{actions}</td>
        </tr>"#,
        subject = subject_of(b),
        teacher = counterpart_name(b, UserRole::Student),
        when = when_of(b),
        badge = status_badge(b),
    )
}

fn booking_table(rows: &[&Booking], row_fn: fn(&Booking) -> String, empty_msg: &str) -> String {
    let body = if rows.is_empty() {
        format!(r#"<tr><td colspan="4" class="text-center text-muted py-3">{empty_msg}</td></tr>"#)
    } else {
        rows.iter().map(|&b| row_fn(b)).collect::<Vec<_>>().join("")
    };

    format!(
        r#"
        <div class="table-responsive">
            <table class="table table-hover align-middle mb-0">
                <thead class="bg-light">
                    <tr><th class="ps-4">Conteúdo</th><th>Data</th><th>Status</th><th class="text-end pe-4">Ações</th></tr>
                </thead>
                <tbody class="ps-4">{body}</tbody>
            </table>
        </div>"#
    )
}

fn section(title: &str, table: String) -> String {
    format!(
        r#"
        <div class="card border-0 shadow-sm mb-4">
            <div class="card-header bg-white py-3"><h5 class="mb-0 fw-bold">{title}</h5></div>
            <div class="card-body p-0">{table}</div>
        </div>"#
    )
}

async fn render_student(api: &impl RequestApi, session: &Session) -> String {
    let bookings = match fetch_bookings(api, BookingQuery::ByStudent(session.id)).await {
        Ok(bookings) => bookings,
        Err(e) => {
            log::error!("student dashboard fetch failed: {e:?}");
            return error_page();
        }
    };

    student_page(session, &bookings)
}

pub fn student_page(session: &Session, bookings: &[Booking]) -> String {
    let pending = by_status(bookings, BookingStatus::Requested);
    let confirmed = by_status(bookings, BookingStatus::Confirmed);
    let completed = by_status(bookings, BookingStatus::Completed);

    let sections = [
        section(
            "Solicitações Pendentes",
            booking_table(&pending, student_row, "Nenhuma solicitação aguardando confirmação."),
        ),
        section(
            "Aulas Confirmadas",
            booking_table(&confirmed, student_row, "Nenhuma aula confirmada."),
        ),
        section(
            "Histórico",
            booking_table(&completed, student_row, "Nenhuma aula concluída ainda."),
        ),
    ]
    .join("");

    format!(
        r#"
    <div class="container py-5">
        <div class="row mb-4 align-items-center">
            <div class="col">
                <h2 class="fw-bold text-primary">Área do Aluno</h2>
                <p class="text-muted">Bons estudos, <strong>{name}</strong>!</p>
            </div>
            <div class="col-auto">
                <button class="btn botao-verde" data-route="explorar">
                    <i class="bi bi-search me-1"></i> Buscar Professor
                </button>
            </div>
        </div>
        {sections}
    </div>"#,
        name = session.name,
    )
}

// ---------------------------------------------------------------- teacher --

/// Per-booking actions on the teacher dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeacherAction {
    Accept,
    Reject,
    Complete,
    Cancel,
}

pub fn teacher_actions(status: BookingStatus) -> Vec<TeacherAction> {
    match status {
        BookingStatus::Requested => vec![TeacherAction::Accept, TeacherAction::Reject],
        BookingStatus::Confirmed => vec![TeacherAction::Complete, TeacherAction::Cancel],
        BookingStatus::Completed | BookingStatus::Cancelled => vec![],
    }
}

fn teacher_action_html(action: TeacherAction, id: i64) -> String {
    match action {
        TeacherAction::Accept => format!(
            r#"<button class="btn btn-sm btn-success me-1" data-action="aceitar" data-id="{id}" title="Aceitar"><i class="bi bi-check-lg"></i></button>"#
        ),
        TeacherAction::Reject => format!(
            r#"<button class="btn btn-sm btn-outline-danger" data-action="recusar" data-id="{id}" title="Recusar"><i class="bi bi-x-lg"></i></button>"#
        ),
        TeacherAction::Complete => format!(
            r#"<button class="btn btn-sm btn-success me-1" data-action="concluir" data-id="{id}" title="Concluir Aula"><i class="bi bi-check-lg"></i></button>"#
        ),
        TeacherAction::Cancel => format!(
            r#"<button class="btn btn-sm btn-outline-danger" data-action="cancelar" data-id="{id}" title="Cancelar"><i class="bi bi-trash"></i></button>"#
        ),
    }
}

fn teacher_row(b: &Booking) -> String {
    let actions = match b.status {
        BookingStatus::Completed => {
            r#"<span class="badge bg-success"><i class="bi bi-check-circle"></i> Finalizado</span>"#
                .to_string()
        }
        _ => teacher_actions(b.status)
            .into_iter()
            .map(|a| teacher_action_html(a, b.id))
            .collect::<Vec<_>>()
            .join(" "),
    };

    format!(
        r#"
        <tr>
            <td>
                <div class="fw-bold text-primary">{subject}</div>
                <small class="text-muted"><i class="bi bi-person"></i> {student}</small>
            </td>
            <td class="align-middle">{when}</td>
            <td class="align-middle">{badge}</td>
            <td class="text-end align-middle">{actions}</td>
        </tr>"#,
        subject = subject_of(b),
        student = counterpart_name(b, UserRole::Teacher),
        when = when_of(b),
        badge = status_badge(b),
    )
}

fn slot_row(slot: &AvailabilitySlot) -> String {
    format!(
        r#"
        <tr>
            <td>
                <div class="fw-bold text-primary">{topic}</div>
                <small class="text-muted">{level}</small>
            </td>
            <td class="align-middle">{when}</td>
            <td class="align-middle"><span class="badge bg-info text-dark">Livre</span></td>
            <td class="text-end align-middle">
                <button class="btn btn-sm btn-outline-danger" data-action="excluir" data-id="{id}" title="Excluir Horário"><i class="bi bi-trash"></i></button>
            </td>
        </tr>"#,
        topic = slot.topic.as_deref().unwrap_or("Geral"),
        level = slot.level.as_deref().unwrap_or(""),
        when = slot.when(),
        id = slot.id,
    )
}

fn subject_tags(subjects: &[String]) -> String {
    if subjects.is_empty() {
        return r#"<span class="text-muted small">Nenhuma selecionada.</span>"#.to_string();
    }

    subjects
        .iter()
        .map(|s| format!(r#"<span class="badge bg-light text-primary border me-1 mb-1">{s}</span>"#))
        .collect::<Vec<_>>()
        .join("")
}

async fn render_teacher(api: &impl RequestApi, session: &Session) -> String {
    let (profile_resp, bookings_resp) = join!(
        api.get_teacher(session.id),
        api.list_bookings(BookingQuery::ByTeacher(session.id))
    );

    let profile: Result<TeacherDto> = profile_resp
        .and_then(|r| api_result(r, "Erro ao carregar perfil"))
        .and_then(|body| Ok(serde_json::from_value(body)?));
    let bookings: Result<Vec<Booking>> = bookings_resp
        .and_then(|r| api_result(r, "Erro ao carregar agendamentos"))
        .and_then(|body| Ok(serde_json::from_value(body)?));

    match (profile, bookings) {
        (Ok(profile), Ok(bookings)) => teacher_page(session, &profile, &bookings),
        (profile, bookings) => {
            if let Err(e) = profile {
                log::error!("teacher profile fetch failed: {e:?}");
            }
            if let Err(e) = bookings {
                log::error!("teacher bookings fetch failed: {e:?}");
            }
            error_page()
        }
    }
}

pub fn teacher_page(session: &Session, profile: &TeacherDto, bookings: &[Booking]) -> String {
    let pending = by_status(bookings, BookingStatus::Requested);
    let confirmed = by_status(bookings, BookingStatus::Confirmed);
    let completed = by_status(bookings, BookingStatus::Completed);
    let open_slots: Vec<&AvailabilitySlot> = profile.slots.iter().filter(|s| s.is_open).collect();

    let slot_rows = if open_slots.is_empty() {
        r#"<tr><td colspan="4" class="text-center text-muted py-3">Nenhum horário cadastrado.</td></tr>"#
            .to_string()
    } else {
        open_slots.iter().map(|&s| slot_row(s)).collect::<Vec<_>>().join("")
    };
    let slots_table = format!(
        r#"
        <div class="table-responsive">
            <table class="table table-hover align-middle mb-0">
                <thead class="bg-light">
                    <tr><th class="ps-4">Conteúdo</th><th>Dia/Hora</th><th>Status</th><th class="text-end pe-4">Ação</th></tr>
                </thead>
                <tbody class="ps-4">{slot_rows}</tbody>
            </table>
        </div>"#
    );

    let sections = [
        section(
            "Solicitações Pendentes",
            booking_table(&pending, teacher_row, "Nenhuma solicitação no momento."),
        ),
        section(
            "Aulas Confirmadas",
            booking_table(&confirmed, teacher_row, "Nenhuma aula confirmada."),
        ),
        section(
            "Histórico",
            booking_table(&completed, teacher_row, "Nenhuma aula concluída ainda."),
        ),
        section("Horários Abertos", slots_table),
    ]
    .join("");

    format!(
        r#"
    <div class="container py-5">
        <div class="row mb-4 align-items-center">
            <div class="col">
                <h2 class="fw-bold text-primary">Painel do Professor</h2>
                <p class="text-muted">Bem vindo, <strong>{name}</strong>!</p>
            </div>
            <div class="col-auto">
                <button class="btn botao-verde" data-action="novo-horario">
                    <i class="bi bi-plus-circle me-1"></i> Novo Horário
                </button>
            </div>
        </div>

        <div class="row mb-4">
            <div class="col-md-4 mb-3">
                <div class="card border-0 shadow-sm p-3 h-100">
                    <div class="d-flex align-items-center">
                        <div class="bg-light p-3 rounded-circle me-3 text-primary"><i class="bi bi-book fs-4"></i></div>
                        <div><h6 class="mb-1 text-muted">Leciono:</h6><div>{tags}</div></div>
                    </div>
                </div>
            </div>
        </div>
        {sections}
    </div>"#,
        name = session.name,
        tags = subject_tags(&profile.disciplinas),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::structs::{BookingDetail, RatingInfo};
    use crate::testutil::StubApi;
    use serde_json::json;

    fn session(role: UserRole) -> Session {
        Session {
            id: 9,
            name: "Ana Souza".to_string(),
            email: "ana@x.br".to_string(),
            role,
        }
    }

    fn booking(status: BookingStatus, rating: Option<RatingInfo>) -> Booking {
        Booking {
            id: 42,
            student_id: 9,
            availability_id: 7,
            status,
            detail: Some(BookingDetail {
                teacher_name: Some("Bruno Lima".to_string()),
                student_name: Some("Ana Souza".to_string()),
                subject_name: Some("Matemática".to_string()),
                date: None,
                start_time: None,
                link: None,
            }),
            rating,
        }
    }

    #[test]
    fn completed_unrated_offers_evaluate_only() {
        let actions = student_actions(&booking(BookingStatus::Completed, None));
        assert_eq!(actions, vec![StudentAction::Evaluate]);
    }

    #[test]
    fn completed_rated_offers_view_never_evaluate() {
        let rated = booking(
            BookingStatus::Completed,
            Some(RatingInfo {
                score: 5,
                comment: None,
            }),
        );
        let actions = student_actions(&rated);
        assert!(actions.contains(&StudentAction::ViewRating));
        assert!(actions.contains(&StudentAction::Certificate));
        assert!(!actions.contains(&StudentAction::Evaluate));
    }

    #[test]
    fn student_rows_switch_between_evaluate_and_view() {
        let s = session(UserRole::Student);
        let unrated = student_page(&s, &[booking(BookingStatus::Completed, None)]);
        assert!(unrated.contains(r#"data-action="avaliar""#));
        assert!(!unrated.contains(r#"data-action="ver-avaliacao""#));

        let rated = student_page(
            &s,
            &[booking(
                BookingStatus::Completed,
                Some(RatingInfo {
                    score: 4,
                    comment: Some("Ótima aula".to_string()),
                }),
            )],
        );
        assert!(rated.contains(r#"data-action="ver-avaliacao""#));
        assert!(!rated.contains(r#"data-action="avaliar""#));
    }

    #[test]
    fn pending_teacher_rows_offer_accept_and_reject() {
        assert_eq!(
            teacher_actions(BookingStatus::Requested),
            vec![TeacherAction::Accept, TeacherAction::Reject]
        );
        assert_eq!(
            teacher_actions(BookingStatus::Confirmed),
            vec![TeacherAction::Complete, TeacherAction::Cancel]
        );
        assert!(teacher_actions(BookingStatus::Completed).is_empty());
    }

    #[tokio::test]
    async fn teacher_dashboard_renders_both_fetches() {
        let api = StubApi::new();
        api.push(
            "get_teacher",
            200,
            json!({
                "id": 9,
                "nome": "Ana Souza",
                "disciplinas": ["Matemática"],
                "disponibilidades": [
                    {"id": 1, "professor": 9, "assunto": "Frações", "data": "2026-08-10",
                     "horario_inicio": "18:00:00", "disponivel": true}
                ]
            }),
        );
        api.push(
            "list_bookings",
            200,
            json!([
                {"id": 42, "aluno": 3, "disponibilidade": 1, "status": "AGENDADO",
                 "detalhes": {"aluno_nome": "Carla Dias", "disciplina_nome": "Matemática"}}
            ]),
        );

        let html = render(&api, &session(UserRole::Teacher)).await;
        assert!(html.contains("Painel do Professor"));
        assert!(html.contains("Carla Dias"));
        assert!(html.contains(r#"data-action="aceitar" data-id="42""#));
        assert!(html.contains("Frações"));
        assert!(html.contains(r#"data-action="excluir" data-id="1""#));
    }

    #[tokio::test]
    async fn student_dashboard_fetch_failure_degrades() {
        let api = StubApi::new(); // nothing queued: transport error
        let html = render(&api, &session(UserRole::Student)).await;
        assert!(html.contains("Erro ao carregar"));
    }
}
