//! Generic verb methods and envelope decoding.

use super::cancel::CancellationToken;
use super::envelope::{ApiError, ApiResult, ApiSuccess, Envelope, ErrorBody, SUCCESS_CODE};
use super::transport::{ApiRequest, Method, RawResponse, Transport, TransportFailure};
use crate::logging::sanitize_message;
use crate::model::session::Session;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use uuid::Uuid;

const MAX_LOGGED_DETAIL_CHARS: usize = 120;

/// API client over a transport, carrying the current bearer token.
pub struct ApiClient<T: Transport> {
    transport: T,
    token: Option<String>,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            token: None,
        }
    }

    /// Adopts the token of `session`; called whenever the session changes.
    pub fn set_session(&mut self, session: &Session) {
        self.token = session.token.clone().filter(|token| !token.is_empty());
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn get<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        cancel: &CancellationToken,
    ) -> ApiResult<R> {
        let query = query
            .iter()
            .map(|(key, value)| ((*key).to_string(), value.clone()))
            .collect();
        self.execute(Method::Get, path, query, None, cancel)
    }

    pub fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        cancel: &CancellationToken,
    ) -> ApiResult<R> {
        let body = encode_body(body)?;
        self.execute(Method::Post, path, Vec::new(), Some(body), cancel)
    }

    pub fn put<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        cancel: &CancellationToken,
    ) -> ApiResult<R> {
        let body = encode_body(body)?;
        self.execute(Method::Put, path, Vec::new(), Some(body), cancel)
    }

    pub fn delete<R: DeserializeOwned>(
        &self,
        path: &str,
        cancel: &CancellationToken,
    ) -> ApiResult<R> {
        self.execute(Method::Delete, path, Vec::new(), None, cancel)
    }

    fn execute<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<Value>,
        cancel: &CancellationToken,
    ) -> ApiResult<R> {
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        let request = ApiRequest {
            method,
            path: path.to_string(),
            query,
            body,
            bearer_token: self.token.clone(),
            request_id: Uuid::new_v4(),
        };
        let started_at = Instant::now();
        let sent = self.transport.send(&request);

        if cancel.is_cancelled() {
            info!(
                "event=api_call module=api status=cancelled method={} path={} request_id={}",
                method.as_str(),
                path,
                request.request_id
            );
            return Err(ApiError::Cancelled);
        }

        let result = match sent {
            Ok(raw) => decode_response(raw),
            Err(failure) => Err(transport_error(failure)),
        };

        let duration_ms = started_at.elapsed().as_millis();
        match &result {
            Ok(_) => info!(
                "event=api_call module=api status=ok method={} path={} request_id={} duration_ms={}",
                method.as_str(),
                path,
                request.request_id,
                duration_ms
            ),
            Err(err) => warn!(
                "event=api_call module=api status=error kind={} method={} path={} request_id={} duration_ms={} error={}",
                err.kind(),
                method.as_str(),
                path,
                request.request_id,
                duration_ms,
                sanitize_message(&err.to_string(), MAX_LOGGED_DETAIL_CHARS)
            ),
        }
        result
    }
}

/// Maps a raw HTTP exchange onto the discriminated result.
pub fn decode_response<R: DeserializeOwned>(raw: RawResponse) -> ApiResult<R> {
    if !raw.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&raw.body)
            .ok()
            .and_then(|body| body.message);
        return Err(ApiError::Transport {
            status: Some(raw.status),
            message,
            detail: format!("unexpected status {}", raw.status),
        });
    }

    let envelope: Envelope<R> =
        serde_json::from_str(&raw.body).map_err(|err| ApiError::Transport {
            status: Some(raw.status),
            message: None,
            detail: format!("invalid response body: {err}"),
        })?;

    if envelope.code != SUCCESS_CODE {
        return Err(ApiError::App {
            code: envelope.code,
            message: envelope.message,
        });
    }

    Ok(ApiSuccess {
        data: envelope.data,
        message: envelope.message.unwrap_or_default(),
        total: envelope.total,
    })
}

fn transport_error(failure: TransportFailure) -> ApiError {
    ApiError::Transport {
        status: None,
        message: None,
        detail: failure.to_string(),
    }
}

fn encode_body<B: Serialize>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|err| ApiError::Transport {
        status: None,
        message: None,
        detail: format!("cannot encode request body: {err}"),
    })
}
