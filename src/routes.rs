use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::notify::NotificationHub;

/// Shared by every handler. Cloning is cheap: the pool and the hub are handles.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: DatabaseManager,
    pub hub: NotificationHub,
    pub page_length: i64,
}

impl AppState {
    pub fn new(db: DatabaseManager, hub: NotificationHub, config: &AppConfig) -> Self {
        Self {
            db,
            hub,
            page_length: config.api.default_page_length,
        }
    }

    pub fn pool(&self) -> PgPool {
        self.db.pool().clone()
    }
}

/// Build the complete router
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let api = Router::new()
        .merge(form_routes())
        .merge(workflow_routes())
        .merge(user_routes())
        .merge(satellite_routes())
        .merge(notification_routes())
        .route_layer(middleware::from_fn(jwt_auth_middleware))
        // Authenticates from the query string, so it sits outside the middleware
        .route("/notifications/ws", get(protected::notification_ws::notification_socket));

    let mut router = Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .nest("/api/v1", api)
        .fallback(public::not_found)
        // Oversized bodies surface through the ApiJson rejection as a 413 envelope
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

fn form_routes() -> Router<AppState> {
    use protected::forms;

    Router::new()
        .route("/forms", get(forms::form_get).post(forms::form_create))
        .route("/forms/getAllForms", get(forms::form_list))
        .route("/forms/publish", patch(forms::form_publish))
        .route("/forms/lock", patch(forms::form_lock))
        .route("/forms/active", patch(forms::form_active))
        .route("/forms/casesubtype", post(forms::form_by_case_subtype))
        .route("/forms/:id", patch(forms::form_update).delete(forms::form_delete))
}

fn workflow_routes() -> Router<AppState> {
    use protected::workflows;

    Router::new()
        .route("/workflows", get(workflows::workflow_list).post(workflows::workflow_create))
        .route(
            "/workflows/:id",
            get(workflows::workflow_get)
                .patch(workflows::workflow_update)
                .delete(workflows::workflow_delete),
        )
}

fn user_routes() -> Router<AppState> {
    use protected::users;

    Router::new()
        .route("/users", get(users::user_list))
        .route("/users/add", post(users::user_create))
        .route(
            "/users/username/:username",
            get(users::user_get_by_username).patch(users::user_update_by_username),
        )
        .route(
            "/users/:id",
            get(users::user_get).patch(users::user_update).delete(users::user_delete),
        )
}

fn satellite_routes() -> Router<AppState> {
    use protected::{user_contacts as contacts, user_skills as skills, user_socials as socials};

    Router::new()
        .route("/users_with_skills", get(skills::skill_list))
        .route("/users_with_skills/add", post(skills::skill_create))
        .route("/users_with_skills/username/:username", get(skills::skill_by_username))
        .route("/users_with_skills/skillId/:skill_id", get(skills::skill_by_skill_id))
        .route(
            "/users_with_skills/:id",
            get(skills::skill_get).patch(skills::skill_update).delete(skills::skill_delete),
        )
        .route("/users_with_contacts", get(contacts::contact_list))
        .route("/users_with_contacts/add", post(contacts::contact_create))
        .route("/users_with_contacts/username/:username", get(contacts::contact_by_username))
        .route(
            "/users_with_contacts/:id",
            get(contacts::contact_get).patch(contacts::contact_update).delete(contacts::contact_delete),
        )
        .route("/users_with_socials", get(socials::social_list))
        .route("/users_with_socials/add", post(socials::social_create))
        .route("/users_with_socials/username/:username", get(socials::social_by_username))
        .route(
            "/users_with_socials/:id",
            get(socials::social_get).patch(socials::social_update).delete(socials::social_delete),
        )
}

fn notification_routes() -> Router<AppState> {
    use axum::routing::delete;
    use protected::notifications;

    Router::new()
        .route("/notifications/noti/:id", get(notifications::notification_get))
        .route("/notifications/recipient/:username", get(notifications::notification_by_recipient))
        .route("/notifications/new", post(notifications::notification_create))
        .route("/notifications/edit/:id", put(notifications::notification_update))
        .route("/notifications/delete/:id", delete(notifications::notification_delete))
}
