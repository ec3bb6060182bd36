//! Home view: static hero plus the three role panels. Which panel shows is
//! decided after render by the role-panel updater.

use crate::model::structs::{Session, UserRole};

/// Which home panel is visible for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomePanel {
    Visitor,
    Student,
    Teacher,
}

impl HomePanel {
    pub fn for_session(session: Option<&Session>) -> HomePanel {
        match session {
            None => HomePanel::Visitor,
            Some(s) if s.role == UserRole::Teacher => HomePanel::Teacher,
            Some(_) => HomePanel::Student,
        }
    }

    /// Element id of the panel this variant corresponds to.
    pub fn element_id(&self) -> &'static str {
        match self {
            HomePanel::Visitor => "painel-visitante",
            HomePanel::Student => "painel-aluno",
            HomePanel::Teacher => "painel-professor",
        }
    }

    pub const ALL: [HomePanel; 3] = [HomePanel::Visitor, HomePanel::Student, HomePanel::Teacher];
}

pub fn render() -> String {
    r#"
    <header class="py-5 bg-white">
        <div class="container">
            <div class="row align-items-center">
                <div class="col-lg-6">
                    <h1 class="display-5 fw-bold text-primary mb-3">A Ponte do Conhecimento Voluntário.</h1>
                    <p class="lead mb-4" id="subtitulo-boas-vindas">Conectamos professores que querem doar conhecimento a alunos que precisam de apoio gratuito e estruturado.</p>
                    <p class="fw-bold mb-4">Olá, <span id="nome-usuario">Visitante</span>!</p>

                    <div id="painel-visitante" class="d-grid gap-2 d-md-flex justify-content-md-start">
                        <button type="button" data-route="explorar" class="btn botao-verde btn-lg px-4 me-md-2">
                            Encontrar Professor
                        </button>
                        <button type="button" class="btn btn-outline-secondary btn-lg px-4" data-action="abrir-cadastro">
                            Sou Professor
                        </button>
                    </div>

                    <div id="painel-aluno" class="d-grid gap-2 d-md-flex justify-content-md-start d-none">
                        <button type="button" data-route="explorar" class="btn botao-verde btn-lg px-4 me-md-2">
                            Buscar Professor
                        </button>
                        <button type="button" data-route="dashboard" class="btn btn-outline-primary btn-lg px-4">
                            Minhas Aulas
                        </button>
                    </div>

                    <div id="painel-professor" class="d-grid gap-2 d-md-flex justify-content-md-start d-none">
                        <button type="button" data-route="dashboard" class="btn botao-verde btn-lg px-4 me-md-2">
                            Minha Agenda
                        </button>
                    </div>
                </div>

                <div class="col-lg-6 d-none d-lg-block text-center">
                    <i class="bi bi-people-fill text-primary" style="font-size: 10rem; opacity: 0.2;"></i>
                </div>
            </div>
        </div>
    </header>

    <section class="py-5 bg-light">
        <div class="container">
            <h2 class="text-center mb-5 fw-bold text-primary">Como funciona</h2>
            <div class="row text-center">
                <div class="col-md-4 mb-4">
                    <div class="card h-100 border-0 shadow-sm p-4">
                        <div class="card-body">
                            <i class="bi bi-search display-4 text-primary mb-3"></i>
                            <h5 class="card-title fw-bold">Busque</h5>
                            <p class="card-text text-muted">Encontre professores voluntários na disciplina que você precisa.</p>
                        </div>
                    </div>
                </div>
                <div class="col-md-4 mb-4">
                    <div class="card h-100 border-0 shadow-sm p-4">
                        <div class="card-body">
                            <i class="bi bi-calendar-check display-4 text-primary mb-3"></i>
                            <h5 class="card-title fw-bold">Agende</h5>
                            <p class="card-text text-muted">Escolha o melhor horário e garanta sua aula de reforço.</p>
                        </div>
                    </div>
                </div>
                <div class="col-md-4 mb-4">
                    <div class="card h-100 border-0 shadow-sm p-4">
                        <div class="card-body">
                            <i class="bi bi-award display-4 text-primary mb-3"></i>
                            <h5 class="card-title fw-bold">Aprenda</h5>
                            <p class="card-text text-muted">Tenha aulas de qualidade e evolua nos seus estudos.</p>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    </section>
    "#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: UserRole) -> Session {
        Session {
            id: 1,
            name: "Ana Souza".to_string(),
            email: "ana@x.br".to_string(),
            role,
        }
    }

    #[test]
    fn panel_follows_session_role() {
        assert_eq!(HomePanel::for_session(None), HomePanel::Visitor);
        let student = session(UserRole::Student);
        assert_eq!(HomePanel::for_session(Some(&student)), HomePanel::Student);
        let teacher = session(UserRole::Teacher);
        assert_eq!(HomePanel::for_session(Some(&teacher)), HomePanel::Teacher);
    }

    #[test]
    fn render_carries_all_panels() {
        let html = render();
        for panel in HomePanel::ALL {
            assert!(html.contains(panel.element_id()));
        }
    }
}
