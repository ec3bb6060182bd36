//! WASM application implementation
//!
//! DOM wiring for the browser build: navigation commit, form handlers,
//! toasts and dialogs. Handlers are registered attach-once — the registry
//! keeps every `Closure` handle and removes the previous listener before
//! re-attaching, so re-wiring after a render never stacks duplicates.

use crate::app::{AppContext, PendingAction};
use crate::client::WasmClient;
use crate::model::dtos::NewSlotForm;
use crate::model::structs::UserRole;
use crate::router::{gate, NavDecision, Route};
use crate::views::home::HomePanel;
use crate::views::{dashboard, explore, home};
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, Element, Event, HtmlElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement,
};

type Ctx = Rc<AppContext<WasmClient>>;

thread_local! {
    static APP: RefCell<Option<Ctx>> = RefCell::new(None);
    static LISTENERS: RefCell<HashMap<String, Closure<dyn FnMut(Event)>>> =
        RefCell::new(HashMap::new());
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);

    let ctx: Ctx = Rc::new(AppContext::new(WasmClient));
    APP.with(|app| *app.borrow_mut() = Some(ctx.clone()));

    update_navbar(&ctx);
    wire_handlers(&ctx);
    load_subject_options(&ctx);

    let initial = web_sys::window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default();
    navigate(initial.trim_start_matches('#'));
}

fn ctx() -> Option<Ctx> {
    APP.with(|app| app.borrow().clone())
}

// ------------------------------------------------------------- DOM helpers --

fn document() -> Option<Document> {
    web_sys::window()?.document()
}

fn element(id: &str) -> Option<Element> {
    document()?.get_element_by_id(id)
}

fn set_text(id: &str, text: &str) {
    if let Some(el) = element(id) {
        el.set_text_content(Some(text));
    }
}

fn set_hidden(id: &str, hidden: bool) {
    if let Some(el) = element(id) {
        let classes = el.class_list();
        let _ = if hidden {
            classes.add_1("d-none")
        } else {
            classes.remove_1("d-none")
        };
    }
}

/// Form field reader covering inputs, selects and textareas.
fn field_value(id: &str) -> String {
    let Some(el) = element(id) else {
        return String::new();
    };
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        return input.value();
    }
    if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
        return select.value();
    }
    if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
        return area.value();
    }
    String::new()
}

fn modal_show(id: &str) {
    if let Some(el) = element(id) {
        let _ = el.class_list().add_1("show");
        if let Some(html) = el.dyn_ref::<HtmlElement>() {
            let _ = html.style().set_property("display", "block");
        }
    }
}

fn modal_hide(id: &str) {
    if let Some(el) = element(id) {
        let _ = el.class_list().remove_1("show");
        if let Some(html) = el.dyn_ref::<HtmlElement>() {
            let _ = html.style().set_property("display", "none");
        }
    }
}

/// System toast, green for success and red for errors. Missing toast markup
/// degrades to a silent no-op.
pub fn notify(message: &str, is_error: bool) {
    let Some(toast) = element("toast-sistema") else {
        return;
    };

    let (toast_class, icon_class) = if is_error {
        (
            "toast align-items-center text-white border-0 bg-danger show",
            "bi bi-exclamation-triangle-fill me-2",
        )
    } else {
        (
            "toast align-items-center text-white border-0 bg-success show",
            "bi bi-check-circle-fill me-2",
        )
    };

    toast.set_class_name(toast_class);
    if let Some(icon) = element("toast-icone") {
        icon.set_class_name(icon_class);
    }
    set_text("toast-mensagem", message);

    Timeout::new(4_000, || {
        if let Some(toast) = element("toast-sistema") {
            let _ = toast.class_list().remove_1("show");
        }
    })
    .forget();
}

/// Registers `closure` for `event` on the element with id `key`, detaching
/// whatever was registered under that key before.
fn attach_listener(key: &str, event: &str, closure: Closure<dyn FnMut(Event)>) {
    let Some(target) = element(key) else {
        return;
    };

    LISTENERS.with(|listeners| {
        let mut map = listeners.borrow_mut();
        if let Some(old) = map.remove(&format!("{key}:{event}")) {
            let _ = target.remove_event_listener_with_callback(event, old.as_ref().unchecked_ref());
        }
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        map.insert(format!("{key}:{event}"), closure);
    });
}

/// Same, for the document itself (delegated listeners).
fn attach_document_listener(event: &str, closure: Closure<dyn FnMut(Event)>) {
    let Some(doc) = document() else {
        return;
    };

    LISTENERS.with(|listeners| {
        let mut map = listeners.borrow_mut();
        if let Some(old) = map.remove(&format!("document:{event}")) {
            let _ = doc.remove_event_listener_with_callback(event, old.as_ref().unchecked_ref());
        }
        let _ = doc.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        map.insert(format!("document:{event}"), closure);
    });
}

// -------------------------------------------------------------- navigation --

pub fn navigate(name: &str) {
    let Some(ctx) = ctx() else {
        return;
    };
    let route = Route::resolve(name);

    if gate(route, ctx.session.is_logged_in()) == NavDecision::RedirectToLogin {
        notify("Você precisa fazer login para acessar essa página.", true);
        navigate(Route::Home.as_str());
        modal_show("modal-entrar");
        return;
    }

    let token = ctx.nav.issue();
    spawn_local(async move {
        let html = match route {
            Route::Home => home::render(),
            Route::Explore => {
                let (html, cards) = explore::render(&ctx.api, ctx.session.is_logged_in()).await;
                ctx.cache_teachers(cards);
                html
            }
            Route::Dashboard => match ctx.session.get_user() {
                Some(session) => dashboard::render(&ctx.api, &session).await,
                None => return,
            },
        };

        // Only the latest navigation may write into the container.
        if !ctx.nav.is_current(token) {
            return;
        }

        let Some(container) = element("conteudo-principal") else {
            return;
        };
        container.set_inner_html(&html);

        if route == Route::Home {
            update_home_panels(&ctx);
        }

        if let Some(win) = web_sys::window() {
            let _ = win.location().set_hash(route.as_str());
            win.scroll_to_with_x_and_y(0.0, 0.0);
        }
    });
}

fn update_home_panels(ctx: &Ctx) {
    let session = ctx.session.get_user();
    let active = HomePanel::for_session(session.as_ref());

    for panel in HomePanel::ALL {
        set_hidden(panel.element_id(), panel != active);
    }

    match session {
        Some(user) => {
            set_text("nome-usuario", &user.name);
            set_text("subtitulo-boas-vindas", "Bem-vindo ao seu portal de ensino.");
        }
        None => set_text("nome-usuario", "Visitante"),
    }
}

fn update_navbar(ctx: &Ctx) {
    match ctx.session.get_user() {
        Some(user) => {
            set_hidden("nav-visitante", true);
            set_hidden("nav-logado", false);
            set_text("nome-usuario-nav", user.first_name());
            // A busca de professores é recurso de aluno.
            set_hidden("link-explorar", user.role == UserRole::Teacher);
        }
        None => {
            set_hidden("nav-visitante", false);
            set_hidden("nav-logado", true);
            set_hidden("link-explorar", false);
        }
    }
}

// ----------------------------------------------------------------- wiring --

fn wire_handlers(ctx: &Ctx) {
    wire_login(ctx);
    wire_register(ctx);
    wire_new_slot(ctx);
    wire_rating(ctx);
    wire_logout(ctx);
    wire_confirm(ctx);
    wire_delegated_clicks(ctx);
}

fn wire_login(ctx: &Ctx) {
    let ctx = ctx.clone();
    let closure = Closure::wrap(Box::new(move |e: Event| {
        e.prevent_default();
        let ctx = ctx.clone();
        let email = field_value("campo-email");
        let password = field_value("campo-senha");

        spawn_local(async move {
            match ctx.session.login(&ctx.api, &email, &password).await {
                Ok(user) => {
                    modal_hide("modal-entrar");
                    update_navbar(&ctx);
                    navigate(Route::Home.as_str());
                    notify(&format!("Bem vindo de volta, {}!", user.name), false);
                }
                Err(e) => notify(&e.user_message(), true),
            }
        });
    }) as Box<dyn FnMut(Event)>);

    attach_listener("form-login", "submit", closure);
}

fn wire_register(ctx: &Ctx) {
    let ctx = ctx.clone();
    let closure = Closure::wrap(Box::new(move |e: Event| {
        e.prevent_default();
        let ctx = ctx.clone();
        let name = field_value("cad-nome");
        let email = field_value("cad-email");
        let password = field_value("cad-senha");
        let role = if field_value("cad-tipo").to_lowercase().starts_with("prof") {
            UserRole::Teacher
        } else {
            UserRole::Student
        };

        spawn_local(async move {
            match ctx.session.register(&ctx.api, &name, &email, &password, role).await {
                Ok(user) => {
                    modal_hide("modal-cadastro");
                    update_navbar(&ctx);
                    navigate(Route::Home.as_str());
                    notify(&format!("Conta criada! Bem vindo, {}.", user.name), false);
                }
                Err(e) => notify(&e.user_message(), true),
            }
        });
    }) as Box<dyn FnMut(Event)>);

    attach_listener("form-cadastro", "submit", closure);
}

fn wire_new_slot(ctx: &Ctx) {
    let ctx = ctx.clone();
    let closure = Closure::wrap(Box::new(move |e: Event| {
        e.prevent_default();
        let ctx = ctx.clone();
        let form = NewSlotForm {
            weekday: field_value("horario-dia"),
            time: field_value("horario-hora"),
            subject_id: field_value("horario-disciplina"),
            level: field_value("horario-nivel"),
            topic: field_value("horario-assunto"),
            link: field_value("horario-link"),
        };

        spawn_local(async move {
            match ctx.add_slot(&form).await {
                Ok(()) => {
                    modal_hide("modal-novo-horario");
                    notify("Horário publicado!", false);
                    navigate(Route::Dashboard.as_str());
                }
                Err(e) => notify(&e.user_message(), true),
            }
        });
    }) as Box<dyn FnMut(Event)>);

    attach_listener("form-novo-horario", "submit", closure);
}

fn wire_rating(ctx: &Ctx) {
    let ctx = ctx.clone();
    let closure = Closure::wrap(Box::new(move |e: Event| {
        e.prevent_default();
        let ctx = ctx.clone();
        let Some(booking_id) = *ctx.rating_target.borrow() else {
            return;
        };
        let score = field_value("nota-final").parse::<u8>().unwrap_or(0);
        let comment = field_value("comentario-avaliacao");

        spawn_local(async move {
            match ctx.submit_rating(booking_id, score, &comment).await {
                Ok(()) => {
                    *ctx.rating_target.borrow_mut() = None;
                    modal_hide("modal-avaliacao");
                    notify("Avaliação enviada. Obrigado!", false);
                    navigate(Route::Dashboard.as_str());
                }
                Err(e) => notify(&e.user_message(), true),
            }
        });
    }) as Box<dyn FnMut(Event)>);

    attach_listener("form-avaliacao", "submit", closure);
}

fn wire_logout(ctx: &Ctx) {
    let ctx = ctx.clone();
    let closure = Closure::wrap(Box::new(move |_: Event| {
        let ctx = ctx.clone();
        spawn_local(async move {
            ctx.session.logout(&ctx.api).await;
            update_navbar(&ctx);
            notify("Você saiu.", false);
            navigate(Route::Home.as_str());
        });
    }) as Box<dyn FnMut(Event)>);

    attach_listener("btn-logout", "click", closure);
}

fn wire_confirm(ctx: &Ctx) {
    let ctx = ctx.clone();
    let closure = Closure::wrap(Box::new(move |_: Event| {
        let ctx = ctx.clone();
        modal_hide("modal-confirmacao");
        spawn_local(async move {
            match ctx.confirm_pending().await {
                Ok(Some(action)) => {
                    notify(action.done_message(), false);
                    navigate(Route::Dashboard.as_str());
                }
                Ok(None) => {}
                Err(e) => notify(&e.user_message(), true),
            }
        });
    }) as Box<dyn FnMut(Event)>);

    attach_listener("btn-confirmar-acao", "click", closure);
}

/// One document-level listener covers `[data-route]` navigation links,
/// `[data-action]` buttons and the interactive rating stars, wherever a
/// render puts them.
fn wire_delegated_clicks(ctx: &Ctx) {
    let ctx = ctx.clone();
    let closure = Closure::wrap(Box::new(move |e: Event| {
        let Some(target) = e.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };

        if let Ok(Some(link)) = target.closest("[data-route]") {
            e.prevent_default();
            if let Some(route) = link.get_attribute("data-route") {
                navigate(&route);
            }
            return;
        }

        if let Ok(Some(star)) = target.closest(".estrela-interativa") {
            let score = star
                .get_attribute("data-nota")
                .and_then(|v| v.parse::<u8>().ok())
                .unwrap_or(0);
            select_star(score);
            return;
        }

        if let Ok(Some(button)) = target.closest("[data-action]") {
            e.prevent_default();
            if let Some(action) = button.get_attribute("data-action") {
                handle_action(&ctx, &action, &button);
            }
        }
    }) as Box<dyn FnMut(Event)>);

    attach_document_listener("click", closure);
}

fn handle_action(ctx: &Ctx, action: &str, button: &Element) {
    let id = button
        .get_attribute("data-id")
        .and_then(|v| v.parse::<i64>().ok());

    match action {
        "abrir-login" => modal_show("modal-entrar"),
        "abrir-cadastro" => modal_show("modal-cadastro"),
        "novo-horario" => {
            load_subject_options(ctx);
            modal_show("modal-novo-horario");
        }
        "ver-horarios" => {
            if let Some(id) = id {
                open_schedule_dialog(ctx, id);
            }
        }
        "agendar" => {
            if let Some(id) = id {
                modal_hide("modal-agendamento");
                let ctx = ctx.clone();
                spawn_local(async move {
                    match ctx.request_booking(id).await {
                        Ok(()) => {
                            notify("Sucesso! Aula solicitada ao professor.", false);
                            navigate(Route::Dashboard.as_str());
                        }
                        Err(e) => notify(&e.user_message(), true),
                    }
                });
            }
        }
        "avaliar" => {
            if let Some(id) = id {
                let teacher = button.get_attribute("data-nome").unwrap_or_default();
                open_rating_dialog(ctx, id, &teacher);
            }
        }
        "ver-avaliacao" => {
            let teacher = button.get_attribute("data-nome").unwrap_or_default();
            let score = button
                .get_attribute("data-nota")
                .and_then(|v| v.parse::<u8>().ok())
                .unwrap_or(0);
            let comment = button.get_attribute("data-comentario").unwrap_or_default();
            open_rating_view(ctx, &teacher, score, &comment);
        }
        "certificado" => {
            if let Some(id) = id {
                let subject = button.get_attribute("data-materia").unwrap_or_default();
                open_certificate(ctx, id, &subject);
            }
        }
        // Booking/slot management goes through the confirmation dialog.
        _ => {
            if let Some(pending) = id.and_then(|id| PendingAction::from_parts(action, id)) {
                ctx.arm(pending);
                set_text("texto-confirmacao", pending.prompt());
                modal_show("modal-confirmacao");
            }
        }
    }
}

// ---------------------------------------------------------------- dialogs --

fn open_schedule_dialog(ctx: &Ctx, teacher_id: i64) {
    if !ctx.session.is_logged_in() {
        modal_show("modal-entrar");
        return;
    }

    let Some(card) = ctx.teacher_card(teacher_id) else {
        return;
    };

    set_text("titulo-modal-agendamento", &format!("Agenda de {}", card.name));
    if let Some(list) = element("lista-horarios") {
        list.set_inner_html(&explore::schedule_dialog_html(&card));
    }
    modal_show("modal-agendamento");
}

fn open_rating_dialog(ctx: &Ctx, booking_id: i64, teacher_name: &str) {
    *ctx.rating_target.borrow_mut() = Some(booking_id);

    if let Some(input) = element("nota-final").and_then(|e| e.dyn_into::<HtmlInputElement>().ok()) {
        input.set_value("0");
        input.set_disabled(false);
    }
    if let Some(area) =
        element("comentario-avaliacao").and_then(|e| e.dyn_into::<HtmlTextAreaElement>().ok())
    {
        area.set_value("");
        area.set_disabled(false);
    }
    paint_stars(0);
    set_hidden("btn-enviar-avaliacao", false);
    set_text("nome-avaliado", teacher_name);
    modal_show("modal-avaliacao");
}

/// Read-only variant of the rating dialog: stars painted, fields locked,
/// submit hidden.
fn open_rating_view(ctx: &Ctx, teacher_name: &str, score: u8, comment: &str) {
    *ctx.rating_target.borrow_mut() = None;

    if let Some(input) = element("nota-final").and_then(|e| e.dyn_into::<HtmlInputElement>().ok()) {
        input.set_value(&score.to_string());
        input.set_disabled(true);
    }
    if let Some(area) =
        element("comentario-avaliacao").and_then(|e| e.dyn_into::<HtmlTextAreaElement>().ok())
    {
        area.set_value(comment);
        area.set_disabled(true);
    }
    paint_stars(score);
    set_hidden("btn-enviar-avaliacao", true);
    set_text("nome-avaliado", &format!("{teacher_name} (Sua Avaliação)"));
    modal_show("modal-avaliacao");
}

fn select_star(score: u8) {
    let locked = element("nota-final")
        .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        .map(|i| i.disabled())
        .unwrap_or(true);
    if locked {
        return;
    }

    if let Some(input) = element("nota-final").and_then(|e| e.dyn_into::<HtmlInputElement>().ok()) {
        input.set_value(&score.to_string());
    }
    paint_stars(score);
}

fn paint_stars(score: u8) {
    let Some(doc) = document() else {
        return;
    };
    let Ok(stars) = doc.query_selector_all(".estrela-interativa") else {
        return;
    };

    for i in 0..stars.length() {
        let Some(star) = stars.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let value = star
            .get_attribute("data-nota")
            .and_then(|v| v.parse::<u8>().ok())
            .unwrap_or(0);
        let classes = star.class_list();
        if value <= score && score > 0 {
            let _ = classes.remove_1("bi-star");
            let _ = classes.add_1("bi-star-fill");
        } else {
            let _ = classes.remove_1("bi-star-fill");
            let _ = classes.add_1("bi-star");
        }
    }
}

fn open_certificate(ctx: &Ctx, booking_id: i64, subject: &str) {
    let Some(user) = ctx.session.get_user() else {
        return;
    };

    let subject = subject.to_string();
    let ctx = ctx.clone();
    spawn_local(async move {
        match ctx.issue_certificate(booking_id).await {
            Ok(()) => {
                set_text("cert-nome-pessoa", &user.name);
                set_text("cert-materia", &subject);
                let today = chrono::Local::now().format("%d/%m/%Y").to_string();
                set_text("cert-data", &today);
                modal_show("modal-certificado");
            }
            Err(e) => notify(&e.user_message(), true),
        }
    });
}

// ---------------------------------------------------------------- startup --

/// Fills the new-slot subject select from the backend.
fn load_subject_options(ctx: &Ctx) {
    let Some(select) = element("horario-disciplina") else {
        return;
    };

    let ctx = ctx.clone();
    spawn_local(async move {
        match ctx.load_subjects().await {
            Ok(subjects) => {
                let mut options = String::from(
                    r#"<option selected disabled value="">Selecione a disciplina</option>"#,
                );
                for subject in subjects {
                    options.push_str(&format!(
                        r#"<option value="{}">{}</option>"#,
                        subject.id, subject.name
                    ));
                }
                select.set_inner_html(&options);
            }
            Err(e) => {
                log::error!("subject load failed: {e:?}");
                select.set_inner_html(r#"<option disabled>Erro ao carregar lista</option>"#);
            }
        }
    });
}
