//! Session gate for protected routes

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use common::models::{AccessClaims, TOKEN_AUDIENCE};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::warn;
use uuid::Uuid;

use crate::state::AppState;

/// Where unauthenticated requests are sent
pub const LOGIN_PATH: &str = "/login";

/// Verifies backend access tokens (HS256, audience `authenticated`)
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(jwt_secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_audience(&[TOKEN_AUDIENCE]);

        Self {
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
        decode::<AccessClaims>(token, &self.decoding_key, &self.validation).map(|data| data.claims)
    }
}

/// Signed-in staff member behind the current request
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub access_token: String,
}

/// Let the request through only with the token of a live session
pub async fn session_gate(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        return Redirect::to(LOGIN_PATH).into_response();
    };
    let token = bearer.token();

    let claims = match state.verifier.verify(token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("Rejected access token: {}", e);
            return Redirect::to(LOGIN_PATH).into_response();
        }
    };

    let Some(user) = state.sessions.current_user(claims.sub, token).await else {
        warn!("No live session for user: {}", claims.sub);
        return Redirect::to(LOGIN_PATH).into_response();
    };

    req.extensions_mut().insert(CurrentUser {
        id: user.id,
        email: user.email,
        access_token: token.to_string(),
    });

    next.run(req).await
}
