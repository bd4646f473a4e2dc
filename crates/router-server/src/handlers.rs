use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use router_core::HttpError;

use crate::dto::{ErrorResponse, ModelInfo, ModelsActionResponse, ModelsResponse, RouteRequest};
use crate::state::AppState;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// `GET /models` — list every registered model and its availability.
pub async fn get_models(State(state): State<AppState>) -> impl IntoResponse {
    let models = state
        .service
        .routing_engine()
        .registry()
        .iter()
        .map(|entry| {
            let descriptor = &entry.descriptor;
            let categories: Vec<String> = router_core::Category::CLASSIFIABLE
                .iter()
                .filter(|c| descriptor.supports_category(**c))
                .map(|c| format!("{c}={:.2}", descriptor.quality_prior(*c)))
                .collect();

            ModelInfo {
                name: descriptor.key.clone(),
                model_name: descriptor.provider_model_name.clone(),
                provider: descriptor.provider,
                is_available: entry.is_available(),
                notes: if categories.is_empty() {
                    "no declared category support".to_owned()
                } else {
                    categories.join(", ")
                },
            }
        })
        .collect();

    Json(ModelsResponse { models })
}

/// `PUT /models` — admin reset. Only `{"action": "reset"}` is recognised;
/// anything else is a 400.
pub async fn put_models(
    State(state): State<AppState>,
    body: Result<Json<crate::dto::ModelsAction>, axum::extract::rejection::JsonRejection>,
) -> Response {
    let Ok(Json(action)) = body else {
        return bad_request("invalid_request_error", "request body must be JSON with an `action` field");
    };

    if action.action != "reset" {
        return bad_request(
            "invalid_request_error",
            &format!("unknown action: `{}`", action.action),
        );
    }

    state.service.routing_engine().reset_all_availability();
    (StatusCode::OK, Json(ModelsActionResponse { message: "All models reset to available".to_owned() }))
        .into_response()
}

/// `POST /route` — classify, route, invoke, and return the result.
pub async fn post_route(
    State(state): State<AppState>,
    body: Result<Json<RouteRequest>, axum::extract::rejection::JsonRejection>,
) -> Response {
    let Ok(Json(request)) = body else {
        return bad_request("invalid_request_error", "request body must be valid JSON");
    };

    let prompt = match request.prompt_str() {
        Ok(prompt) => prompt,
        Err(message) => return bad_request("invalid_request_error", message),
    };

    let preset = match request.resolve_preset(state.default_preset) {
        Ok(preset) => preset,
        Err(message) => return bad_request("invalid_request_error", &message),
    };

    match state
        .service
        .route_prompt(prompt, preset, request.user_id.clone(), request.session_id.clone())
        .await
    {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(error) => {
            let status = error.status_code();
            let body = ErrorResponse { error: error.error_type().to_owned(), details: error.client_message() };
            (status, Json(body)).into_response()
        }
    }
}

fn bad_request(error: &str, details: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: error.to_owned(), details: details.to_owned() }))
        .into_response()
}
