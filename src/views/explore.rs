//! Explore view: the teacher card grid. The reshaped teacher list is handed
//! back to the caller so the scheduling dialog can look cards up later
//! without refetching.

use crate::client::api_result;
use crate::error::Result;
use crate::interface::RequestApi;
use crate::model::structs::{TeacherCard, TeacherDto};

pub async fn render(api: &impl RequestApi, logged_in: bool) -> (String, Vec<TeacherCard>) {
    let cards = match fetch_teachers(api).await {
        Ok(cards) => cards,
        Err(e) => {
            log::error!("explore fetch failed: {e:?}");
            let body = r#"<p class="text-danger text-center">Erro ao carregar professores.</p>"#;
            return (page(body), Vec::new());
        }
    };

    let body = if cards.is_empty() {
        r#"
            <div class="col-12 text-center py-5">
                <p class="text-muted">Nenhum professor encontrado.</p>
            </div>"#
            .to_string()
    } else {
        cards
            .iter()
            .map(|card| card_html(card, logged_in))
            .collect::<Vec<_>>()
            .join("")
    };

    (page(&body), cards)
}

async fn fetch_teachers(api: &impl RequestApi) -> Result<Vec<TeacherCard>> {
    let body = api_result(api.list_teachers().await?, "Erro ao carregar professores")?;
    let dtos: Vec<TeacherDto> = serde_json::from_value(body)?;

    Ok(dtos.into_iter().map(TeacherCard::from_dto).collect())
}

fn page(body: &str) -> String {
    format!(
        r#"
    <div class="container py-5">
        <h2 class="mb-4 fw-bold text-primary">Professores Disponíveis</h2>
        <div class="row">
            {body}
        </div>
    </div>
    "#
    )
}

fn card_html(card: &TeacherCard, logged_in: bool) -> String {
    let action = if logged_in {
        format!(
            r#"<button class="btn btn-outline-primary btn-sm" data-action="ver-horarios" data-id="{}">
            Ver Horários
        </button>"#,
            card.id
        )
    } else {
        r#"<button class="btn btn-secondary btn-sm" data-action="abrir-login">
            <i class="bi bi-lock-fill me-1"></i> Entre para ver horários
        </button>"#
            .to_string()
    };

    format!(
        r#"
        <div class="col-md-4 mb-4">
            <div class="card shadow-sm border-0 h-100">
                <div class="card-body text-center d-flex flex-column p-4">
                    <div class="mb-3">
                        <i class="bi bi-person-circle text-secondary" style="font-size: 3rem;"></i>
                    </div>
                    <h5 class="card-title fw-bold">{name}</h5>
                    <span class="badge bg-primary mb-3 align-self-center">
                        {subject}
                    </span>
                    <p class="card-text small text-muted mb-4">
                        {description}
                    </p>
                    <div class="d-grid mt-auto">
                        {action}
                    </div>
                </div>
            </div>
        </div>
    "#,
        name = card.name,
        subject = card.main_subject,
        description = card.description,
    )
}

/// Body of the scheduling dialog for one teacher: a button per open slot.
pub fn schedule_dialog_html(card: &TeacherCard) -> String {
    if card.open_slots.is_empty() {
        return r#"<p class="text-muted text-center">Sem horários livres no momento.</p>"#
            .to_string();
    }

    card.open_slots
        .iter()
        .map(|slot| {
            format!(
                r#"<button class="btn btn-outline-primary text-start mb-2 w-100" data-action="agendar" data-id="{}">
                <i class="bi bi-calendar-event me-2"></i> {}</button>"#,
                slot.id,
                slot.when(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::structs::AvailabilitySlot;
    use crate::testutil::StubApi;
    use chrono::NaiveDate;
    use serde_json::json;

    fn teacher_list() -> serde_json::Value {
        json!([
            {
                "id": 1,
                "nome": "Ana Souza",
                "disciplinas": ["Matemática", "Física"],
                "disponibilidades": [
                    {
                        "id": 10,
                        "professor": 1,
                        "data": "2026-08-10",
                        "horario_inicio": "18:00:00",
                        "disponivel": true
                    },
                    {
                        "id": 11,
                        "professor": 1,
                        "data": "2026-08-11",
                        "horario_inicio": "19:00:00",
                        "disponivel": false
                    }
                ]
            },
            { "id": 2, "nome": "Bruno Lima", "disciplinas": [] }
        ])
    }

    #[tokio::test]
    async fn renders_cards_and_fills_cache() {
        let api = StubApi::new();
        api.push("list_teachers", 200, teacher_list());

        let (html, cards) = render(&api, true).await;
        assert!(html.contains("Ana Souza"));
        assert!(html.contains("Matemática"));
        assert!(html.contains("Geral")); // Bruno's fallback subject
        assert!(html.contains(r#"data-action="ver-horarios""#));
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].open_slots.len(), 1); // closed slot filtered out
    }

    #[tokio::test]
    async fn logged_out_visitors_get_login_button() {
        let api = StubApi::new();
        api.push("list_teachers", 200, teacher_list());

        let (html, _) = render(&api, false).await;
        assert!(html.contains("Entre para ver horários"));
        assert!(!html.contains(r#"data-action="ver-horarios""#));
    }

    #[tokio::test]
    async fn fetch_failure_renders_error_fragment() {
        let api = StubApi::new(); // nothing queued: transport error

        let (html, cards) = render(&api, true).await;
        assert!(html.contains("Erro ao carregar professores."));
        assert!(cards.is_empty());
    }

    #[test]
    fn dialog_lists_open_slots() {
        let card = TeacherCard {
            id: 1,
            name: "Ana Souza".to_string(),
            main_subject: "Matemática".to_string(),
            description: String::new(),
            open_slots: vec![AvailabilitySlot {
                id: 10,
                teacher_id: 1,
                subject_id: None,
                topic: None,
                level: None,
                description: None,
                link: None,
                date: NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
                start_time: "18:00:00".to_string(),
                is_open: true,
            }],
        };

        let html = schedule_dialog_html(&card);
        assert!(html.contains(r#"data-action="agendar" data-id="10""#));
        assert!(html.contains("18:00"));

        let empty = TeacherCard {
            open_slots: vec![],
            ..card
        };
        assert!(schedule_dialog_html(&empty).contains("Sem horários livres"));
    }
}
