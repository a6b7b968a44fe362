use axum::{
    body::Body,
    extract::State,
    http::{header, request::Parts, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// Cookie the web client stores the Supabase access token in
pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";

/// Audience Supabase puts in tokens of signed-in users
pub const AUTHENTICATED_AUDIENCE: &str = "authenticated";

/// Claims of a Supabase access token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User email, if any
    #[serde(default)]
    pub email: Option<String>,
    /// Postgres role
    #[serde(default)]
    pub role: Option<String>,
    /// Audience
    pub aud: String,
    /// Expiration time (as UTC timestamp)
    pub exp: usize,
}

/// The signed-in user, attached to requests by [`require_auth`]
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

/// Authentication error
#[derive(Debug)]
pub enum AuthError {
    /// Token is missing
    MissingToken,
    /// Token is invalid or expired
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "Authentication required",
            AuthError::InvalidToken => "Invalid or expired session",
        };
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
    }
}

/// Extract the access token from the Authorization header, falling back to the session cookie
pub fn extract_token(parts: &Parts) -> Result<String, AuthError> {
    if let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header.to_str().map_err(|_| AuthError::InvalidToken)?;
        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?
            .trim();
        if !token.is_empty() {
            return Ok(token.to_string());
        }
    }

    let cookie = parts
        .headers
        .get(header::COOKIE)
        .ok_or(AuthError::MissingToken)?;
    let cookie_str = cookie.to_str().map_err(|_| AuthError::InvalidToken)?;
    cookie_str
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == ACCESS_TOKEN_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
        .ok_or(AuthError::MissingToken)
}

/// Verifies Supabase access tokens
pub struct AuthService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthService {
    /// Create a verifier for tokens signed with the project's JWT secret
    pub fn new(jwt_secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[AUTHENTICATED_AUDIENCE]);
        Self {
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Validate a token and return the user it belongs to
    pub fn validate_token(&self, token: &str) -> Result<AuthUser, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| AuthUser {
                id: data.claims.sub,
                email: data.claims.email,
            })
            .map_err(|e| {
                debug!("Token validation error: {:?}", e);
                AuthError::InvalidToken
            })
    }
}

/// Middleware rejecting requests without a valid session
pub async fn require_auth(
    State(auth_service): State<Arc<AuthService>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let (parts, body) = req.into_parts();
    let token = extract_token(&parts)?;
    let user = auth_service.validate_token(&token).map_err(|e| {
        warn!("Rejected request to {} with an invalid token", parts.uri.path());
        e
    })?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
