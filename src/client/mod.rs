//! Client module - handles HTTP requests for both WASM and no-WASM environments
//!
//! This module provides a unified interface for talking to the Aula Livre
//! backend while supporting different implementations for WASM (gloo_net)
//! and no-WASM (reqwest) environments.

#[cfg(feature = "no-wasm")]
pub mod request;
#[cfg(feature = "no-wasm")]
pub use request::*;

#[cfg(feature = "wasm")]
pub mod gloo;
#[cfg(feature = "wasm")]
pub use gloo::*;

use crate::error::{ErrorKind, Result};
use crate::interface::ApiResponse;
use serde_json::Value;

/// Human-readable message for a non-2xx response body: the `detail` string
/// when the backend sends one, otherwise the first field-level error found
/// (prefixed with the field name), otherwise the caller's fallback.
pub fn extract_error_message(body: &Value, fallback: &str) -> String {
    if let Some(detail) = body.get("detail").and_then(Value::as_str) {
        return detail.to_string();
    }

    if let Some(fields) = body.as_object() {
        for (field, errors) in fields {
            if let Some(first) = errors
                .as_array()
                .and_then(|a| a.first())
                .and_then(Value::as_str)
            {
                return format!("{field}: {first}");
            }
        }
    }

    fallback.to_string()
}

/// Collapse a response envelope into its body, turning HTTP-level failure
/// into an `Api` error carrying the extracted server message.
pub fn api_result(resp: ApiResponse, fallback: &str) -> Result<Value> {
    if resp.ok() {
        Ok(resp.body)
    } else {
        Err(ErrorKind::Api(extract_error_message(&resp.body, fallback)).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn detail_wins_over_field_errors() {
        let body = json!({"detail": "Credenciais inválidas.", "senha": ["curta"]});
        assert_eq!(
            extract_error_message(&body, "Falha no login"),
            "Credenciais inválidas."
        );
    }

    #[test]
    fn first_field_error_is_used() {
        let body = json!({"senha": ["too short", "too simple"]});
        assert_eq!(
            extract_error_message(&body, "Falha no cadastro"),
            "senha: too short"
        );
    }

    #[test]
    fn falls_back_on_unrecognized_bodies() {
        assert_eq!(
            extract_error_message(&json!("oops"), "Falha no cadastro"),
            "Falha no cadastro"
        );
        assert_eq!(extract_error_message(&json!({}), "x"), "x");
    }

    #[test]
    fn api_result_maps_status() {
        let ok = ApiResponse {
            status: 200,
            body: json!({"id": 1}),
        };
        assert_eq!(api_result(ok, "x").unwrap(), json!({"id": 1}));

        let bad = ApiResponse {
            status: 400,
            body: json!({"senha": ["too short"]}),
        };
        let err = api_result(bad, "Falha no cadastro").unwrap_err();
        assert_eq!(err.user_message(), "senha: too short");
    }
}
