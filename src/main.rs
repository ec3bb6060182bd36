use aula_livre_core::app::AppContext;
use aula_livre_core::client::{api_result, NoWasmClient};
use aula_livre_core::error::Result;
use aula_livre_core::interface::RequestApi;
use aula_livre_core::model::dtos::BookingQuery;
use aula_livre_core::model::structs::{Booking, UserRole};
use aula_livre_core::views::explore;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        println!("Uso: {} email senha [url-base]", args[0]);
        return Ok(());
    }

    let base = args
        .get(3)
        .map(String::as_str)
        .unwrap_or("http://127.0.0.1:8000");
    let api = NoWasmClient::with_base(base)?;
    let ctx = AppContext::new(api);

    let user = match ctx.session.login(&ctx.api, &args[1], &args[2]).await {
        Ok(user) => user,
        Err(e) => {
            println!("Falha no login: {}", e.user_message());
            return Ok(());
        }
    };

    println!("Login ok!");
    println!("=====================================");
    println!("Nome:  {}", user.name);
    println!("Email: {}", user.email);
    println!("Tipo:  {}", user.role.wire());
    println!("=====================================");

    let (_, cards) = explore::render(&ctx.api, true).await;
    ctx.cache_teachers(cards);

    println!("==============Professores============");
    for card in ctx.teachers.borrow().iter() {
        println!(
            "{:<25}{:<15}{} horários livres",
            card.name,
            card.main_subject,
            card.open_slots.len()
        );
    }

    let query = match user.role {
        UserRole::Teacher => BookingQuery::ByTeacher(user.id),
        UserRole::Student => BookingQuery::ByStudent(user.id),
    };
    let body = api_result(
        ctx.api.list_bookings(query).await?,
        "Erro ao carregar agendamentos",
    )?;
    let bookings: Vec<Booking> = serde_json::from_value(body)?;

    println!("==============Minhas Aulas===========");
    if bookings.is_empty() {
        println!("Nenhum agendamento.");
    }
    for booking in &bookings {
        let subject = booking
            .detail
            .as_ref()
            .and_then(|d| d.subject_name.as_deref())
            .unwrap_or("Aula");
        println!("#{:<5}{:<25}{}", booking.id, subject, booking.status.label());
    }
    println!("=====================================");

    ctx.session.logout(&ctx.api).await;

    Ok(())
}
