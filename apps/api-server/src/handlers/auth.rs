//! Identity provider bridge endpoints: OAuth sign-in, session lookup,
//! sign-out, and the session-change event feed.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{HttpRequest, HttpResponse, http::header, web};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use tandang_core::domain::SessionEvent;
use tandang_core::ports::{AuthError, IdentityProvider, TokenService};
use tandang_shared::dto::{AuthResponse, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const STATE_COOKIE: &str = "oauth_state";

/// GET /api/auth/login
///
/// The sign-in affordance: redirect out to the provider. The random state
/// parameter is pinned in a short-lived cookie and checked on the way back.
pub async fn login(provider: web::Data<Arc<dyn IdentityProvider>>) -> HttpResponse {
    let state_param = Uuid::new_v4().simple().to_string();
    let authorize_url = provider.authorize_url(&state_param);

    let cookie = Cookie::build(STATE_COOKIE, state_param)
        .path("/api/auth")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::minutes(10))
        .finish();

    HttpResponse::Found()
        .cookie(cookie)
        .insert_header((header::LOCATION, authorize_url))
        .finish()
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: String,
    pub state: String,
}

/// GET /api/auth/callback
///
/// Provider redirect target: verify the state, exchange the code, issue a
/// session token, and report the sign-in through the event feed.
pub async fn callback(
    req: HttpRequest,
    state: web::Data<AppState>,
    provider: web::Data<Arc<dyn IdentityProvider>>,
    token_service: web::Data<Arc<dyn TokenService>>,
    query: web::Query<CallbackQuery>,
) -> AppResult<HttpResponse> {
    let pinned = req
        .cookie(STATE_COOKIE)
        .ok_or(AppError::from(AuthError::StateMismatch))?;
    if pinned.value() != query.state {
        return Err(AuthError::StateMismatch.into());
    }

    let identity = provider.exchange_code(&query.code).await?;
    let token = token_service.issue_token(&identity)?;

    tracing::info!(handle = %identity.handle, "Signed in via OAuth");
    state.events.publish(SessionEvent::SignedIn {
        handle: identity.handle.clone(),
        email: identity.email.clone(),
    });

    let mut removal = pinned.clone();
    removal.make_removal();

    Ok(HttpResponse::Ok().cookie(removal).json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds() as u64,
    }))
}

/// GET /api/auth/me - current session lookup.
pub async fn me(identity: Identity) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(UserResponse {
        id: identity.subject,
        handle: identity.handle,
        email: identity.email,
    }))
}

/// POST /api/auth/logout
///
/// Tokens are stateless, so sign-out tears down the editing session and
/// reports the change; clients discard their token.
pub async fn logout(identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    state.sessions.close(&identity.subject).await;
    tracing::info!(handle = %identity.handle, "Signed out");
    state.events.publish(SessionEvent::SignedOut {
        handle: identity.handle,
    });

    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/auth/events
///
/// Session changes as Server-Sent Events. The broadcast subscription is
/// acquired when the stream starts and released when the client disconnects
/// and the stream is dropped.
pub async fn events(state: web::Data<AppState>) -> HttpResponse {
    let subscription = state.events.subscribe();

    let stream = futures::stream::unfold(subscription, |mut sub| async move {
        let event = sub.recv().await?;
        let payload = serde_json::to_string(&event).ok()?;
        let frame = web::Bytes::from(format!("data: {payload}\n\n"));
        Some((Ok::<_, std::convert::Infallible>(frame), sub))
    });

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test};
    use async_trait::async_trait;

    use tandang_core::ports::OAuthIdentity;
    use tandang_infra::auth::{JwtConfig, JwtTokenService};
    use tandang_infra::{LocalObjectStore, SessionBroadcast};

    use crate::sessions::StudioSessions;
    use crate::state::{AppState, InMemoryPostRepository};

    /// Offline identity provider: accepts one fixed code.
    struct StubProvider;

    #[async_trait]
    impl IdentityProvider for StubProvider {
        fn authorize_url(&self, state: &str) -> String {
            format!("https://provider.test/authorize?state={state}")
        }

        async fn exchange_code(&self, code: &str) -> Result<OAuthIdentity, AuthError> {
            if code == "good-code" {
                Ok(OAuthIdentity {
                    provider_id: "1337".into(),
                    handle: "sangar".into(),
                    email: "sangar@example.com".into(),
                })
            } else {
                Err(AuthError::SignInFailed("bad code".into()))
            }
        }
    }

    async fn test_state() -> AppState {
        let dir = std::env::temp_dir().join(format!("tandang-auth-{}", uuid::Uuid::new_v4()));
        AppState {
            posts: std::sync::Arc::new(InMemoryPostRepository::default()),
            storage: std::sync::Arc::new(
                LocalObjectStore::new(dir, "http://zine.test")
                    .await
                    .unwrap(),
            ),
            events: std::sync::Arc::new(SessionBroadcast::default()),
            sessions: StudioSessions::default(),
            demo_mode: true,
        }
    }

    fn services() -> (Arc<dyn IdentityProvider>, Arc<dyn TokenService>) {
        (
            Arc::new(StubProvider),
            Arc::new(JwtTokenService::new(JwtConfig {
                secret: "test-secret".into(),
                expiration_hours: 1,
                issuer: "test".into(),
            })),
        )
    }

    macro_rules! auth_app {
        ($state:expr, $provider:expr, $tokens:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .app_data(web::Data::new($provider.clone()))
                    .app_data(web::Data::new($tokens.clone()))
                    .route("/api/auth/login", web::get().to(login))
                    .route("/api/auth/callback", web::get().to(callback))
                    .route("/api/auth/me", web::get().to(me))
                    .route("/api/auth/logout", web::post().to(logout)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_login_redirects_with_pinned_state() {
        let state = test_state().await;
        let (provider, tokens) = services();
        let app = auth_app!(state, provider, tokens);

        let req = test::TestRequest::get().uri("/api/auth/login").to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::FOUND);
        let location = res.headers().get(header::LOCATION).unwrap().to_str().unwrap();
        assert!(location.starts_with("https://provider.test/authorize"));

        let cookie = res
            .response()
            .cookies()
            .find(|c| c.name() == STATE_COOKIE)
            .expect("state cookie must be set");
        assert!(location.ends_with(cookie.value()));
    }

    #[actix_web::test]
    async fn test_callback_rejects_state_mismatch() {
        let state = test_state().await;
        let (provider, tokens) = services();
        let app = auth_app!(state, provider, tokens);

        let req = test::TestRequest::get()
            .uri("/api/auth/callback?code=good-code&state=forged")
            .cookie(Cookie::new(STATE_COOKIE, "pinned"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_sign_in_is_reported_through_the_event_feed() {
        let state = test_state().await;
        let (provider, tokens) = services();
        let app = auth_app!(state, provider, tokens);

        let mut subscription = state.events.subscribe();

        let req = test::TestRequest::get()
            .uri("/api/auth/callback?code=good-code&state=pinned")
            .cookie(Cookie::new(STATE_COOKIE, "pinned"))
            .to_request();
        let body: AuthResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.token_type, "Bearer");
        assert!(!body.access_token.is_empty());

        match subscription.recv().await {
            Some(SessionEvent::SignedIn { handle, .. }) => assert_eq!(handle, "sangar"),
            other => panic!("unexpected event: {other:?}"),
        }

        // The issued token opens the gate.
        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("Authorization", format!("Bearer {}", body.access_token)))
            .to_request();
        let user: UserResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(user.handle, "sangar");
    }

    #[actix_web::test]
    async fn test_me_requires_a_session() {
        let state = test_state().await;
        let (provider, tokens) = services();
        let app = auth_app!(state, provider, tokens);

        let req = test::TestRequest::get().uri("/api/auth/me").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_logout_reports_and_tears_down() {
        let state = test_state().await;
        let (provider, tokens) = services();
        let app = auth_app!(state, provider, tokens);

        let token = tokens
            .issue_token(&OAuthIdentity {
                provider_id: "1337".into(),
                handle: "sangar".into(),
                email: "sangar@example.com".into(),
            })
            .unwrap();

        let mut subscription = state.events.subscribe();

        let req = test::TestRequest::post()
            .uri("/api/auth/logout")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        match subscription.recv().await {
            Some(SessionEvent::SignedOut { handle }) => assert_eq!(handle, "sangar"),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
