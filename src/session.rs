//! Client-held session state.
//!
//! The authenticated profile is persisted verbatim under a single storage
//! key: browser localStorage on WASM, an in-process slot on native hosts
//! (CLI and tests). There is no expiry and no refresh; if the backend
//! invalidates the session independently the stored profile goes stale
//! until the next failed call.

use crate::client::api_result;
use crate::error::Result;
use crate::interface::RequestApi;
use crate::model::dtos::{LoginParams, RegisterParams};
use crate::model::structs::{Session, UserRole};

pub const SESSION_KEY: &str = "aulalivre_usuario";

#[cfg(feature = "wasm")]
use gloo_storage::{LocalStorage, Storage};

#[derive(Debug, Default)]
pub struct SessionStore {
    #[cfg(feature = "no-wasm")]
    slot: std::sync::RwLock<Option<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synchronous read of the persisted profile.
    pub fn get_user(&self) -> Option<Session> {
        #[cfg(feature = "wasm")]
        {
            LocalStorage::get(SESSION_KEY).ok()
        }
        #[cfg(feature = "no-wasm")]
        {
            self.slot.read().ok().and_then(|slot| slot.clone())
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.get_user().is_some()
    }

    fn persist(&self, session: &Session) -> Result<()> {
        #[cfg(feature = "wasm")]
        {
            LocalStorage::set(SESSION_KEY, session)?;
        }
        #[cfg(feature = "no-wasm")]
        {
            if let Ok(mut slot) = self.slot.write() {
                *slot = Some(session.clone());
            }
        }
        Ok(())
    }

    fn clear(&self) {
        #[cfg(feature = "wasm")]
        {
            LocalStorage::delete(SESSION_KEY);
        }
        #[cfg(feature = "no-wasm")]
        {
            if let Ok(mut slot) = self.slot.write() {
                *slot = None;
            }
        }
    }

    /// POSTs credentials; on success persists the returned profile verbatim.
    /// HTTP failures carry the extracted server message.
    pub async fn login(
        &self,
        api: &impl RequestApi,
        email: &str,
        password: &str,
    ) -> Result<Session> {
        let resp = api
            .login(LoginParams {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        let body = api_result(resp, "Falha no login")?;
        let session: Session = serde_json::from_value(body)?;
        self.persist(&session)?;

        Ok(session)
    }

    /// Registration doubles as login: the backend answers with the same
    /// profile shape, which is persisted right away.
    pub async fn register(
        &self,
        api: &impl RequestApi,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<Session> {
        let resp = api
            .register(RegisterParams {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                role,
            })
            .await?;

        let body = api_result(resp, "Falha no cadastro")?;
        let session: Session = serde_json::from_value(body)?;
        self.persist(&session)?;

        Ok(session)
    }

    /// Server-side teardown is best-effort; the local clear always happens,
    /// in that order (matching the original flow — the two are not atomic).
    pub async fn logout(&self, api: &impl RequestApi) {
        if let Err(e) = api.logout().await {
            log::error!("logout request failed: {e}");
        }
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::StubApi;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn login_persists_profile_and_logout_clears_it() {
        let api = StubApi::new();
        api.push(
            "login",
            200,
            json!({"id": 5, "nome": "Carla Dias", "email": "carla@x.br", "tipo": "ALUNO"}),
        );
        api.push("logout", 200, json!({"detail": "Logout realizado com sucesso."}));

        let store = SessionStore::new();
        assert!(!store.is_logged_in());

        let session = store.login(&api, "carla@x.br", "s3nh4").await.unwrap();
        assert_eq!(session.name, "Carla Dias");

        let read_back = store.get_user().unwrap();
        assert_eq!(read_back.id, 5);
        assert_eq!(read_back.role, UserRole::Student);
        assert!(store.is_logged_in());

        store.logout(&api).await;
        assert!(store.get_user().is_none());
    }

    #[tokio::test]
    async fn login_failure_surfaces_server_detail() {
        let api = StubApi::new();
        api.push(
            "login",
            401,
            json!({"detail": "Credenciais inválidas ou conta não encontrada."}),
        );

        let store = SessionStore::new();
        let err = store.login(&api, "x@x.br", "errada").await.unwrap_err();
        assert_eq!(
            err.user_message(),
            "Credenciais inválidas ou conta não encontrada."
        );
        assert!(!store.is_logged_in());
    }

    #[tokio::test]
    async fn register_field_error_uses_first_entry() {
        let api = StubApi::new();
        api.push("register", 400, json!({"senha": ["too short"]}));

        let store = SessionStore::new();
        let err = store
            .register(&api, "Davi", "davi@x.br", "1", UserRole::Teacher)
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "senha: too short");
    }

    #[tokio::test]
    async fn logout_clears_locally_even_when_server_fails() {
        let api = StubApi::new();
        api.push(
            "login",
            200,
            json!({"id": 1, "nome": "Eva", "email": "eva@x.br", "tipo": "PROFESSOR"}),
        );
        // No logout response queued: the stub reports a transport error.

        let store = SessionStore::new();
        store.login(&api, "eva@x.br", "ok").await.unwrap();
        store.logout(&api).await;
        assert!(!store.is_logged_in());
    }
}
