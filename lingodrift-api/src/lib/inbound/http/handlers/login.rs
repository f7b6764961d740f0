use axum::extract::State;
use axum::Form;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

/// OAuth2 password-grant token endpoint.
///
/// Responds with the bare OAuth2 token shape rather than the API envelope so
/// standard OAuth2 clients can consume it.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponseData>, ApiError> {
    let token = state
        .user_service
        .login(&form.username, &form.password)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(TokenResponseData {
        access_token: token.into_inner(),
        token_type: "bearer".to_string(),
    }))
}

/// `username` carries the user's email, as in the OAuth2 password grant.
#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenResponseData {
    pub access_token: String,
    pub token_type: String,
}
