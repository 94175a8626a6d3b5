//! Interrogation Middleware.
//! Attaches the request's ParameterMap as an extension for downstream handlers.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::metrics;

pub async fn interrogation_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Pin the current interrogator for the whole request, even across a reload.
    let interrogator = state.interrogator.load_full();
    let pending = interrogator.interrogate(&req);

    match pending.await {
        Ok(params) => {
            tracing::debug!(
                request_id = %request_id(&req),
                parameters = params.len(),
                "Parameters attached"
            );
            metrics::record_interrogation("ok", params.len());
            req.extensions_mut().insert(params);
            next.run(req).await
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id(&req), error = %e, "Interrogation failed");
            metrics::record_interrogation("rejected", 0);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}
