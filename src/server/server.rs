use anyhow::Result;
use std::sync::{Arc, Mutex};

use tracing::{debug, error};

use crate::job_store::{ApplicationStatus, JobPatch, JobRecord, NewJob, RecruiterApplication};
use crate::ranking::{recommend, search, RankingError};
use crate::user::{AuthTokenValue, UserManager, UserRole, UserStore};
use axum_extra::extract::cookie::{Cookie, SameSite};

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{response, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{log_requests, session::Session, state::*, RequestsLoggingLevel, ServerConfig};

#[derive(Deserialize, Debug)]
struct RegisterBody {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Deserialize)]
struct LoginBody {
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Serialize)]
struct LoginSuccessResponse {
    token: String,
    user_id: usize,
    name: String,
    role: UserRole,
}

#[derive(Deserialize)]
struct SearchParams {
    pub query: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApplyBody {
    #[serde(default)]
    pub resume_url: Option<String>,
}

#[derive(Deserialize, Debug)]
struct StatusBody {
    pub status: String,
}

/// Recruiter application listing entry, the bare application enriched with
/// its job and the candidate's contact details.
#[derive(Serialize)]
struct EnrichedApplication {
    #[serde(flatten)]
    entry: RecruiterApplication,
    candidate_name: Option<String>,
    candidate_email: Option<String>,
}

async fn register(
    State(user_manager): State<GuardedUserManager>,
    Json(body): Json<RegisterBody>,
) -> Response {
    let role = match UserRole::from_str(&body.role) {
        Some(role) => role,
        None => return (StatusCode::BAD_REQUEST, "Invalid role.").into_response(),
    };
    match user_manager
        .lock()
        .unwrap()
        .register(&body.name, &body.email, &body.password, role)
    {
        Ok(user_id) => (StatusCode::CREATED, Json(user_id)).into_response(),
        Err(err) => (StatusCode::BAD_REQUEST, format!("{}", err)).into_response(),
    }
}

async fn login(
    State(user_manager): State<GuardedUserManager>,
    Json(body): Json<LoginBody>,
) -> Response {
    let role = match UserRole::from_str(&body.role) {
        Some(role) => role,
        None => return (StatusCode::BAD_REQUEST, "Invalid role.").into_response(),
    };
    match user_manager
        .lock()
        .unwrap()
        .login(&body.email, &body.password, role)
    {
        Ok(Some((user, auth_token))) => {
            let response_body = LoginSuccessResponse {
                token: auth_token.value.0.clone(),
                user_id: user.id,
                name: user.name,
                role: user.role,
            };
            let response_body = serde_json::to_string(&response_body).unwrap();

            let cookie_value = HeaderValue::from_str(&format!(
                "session_token={}; Path=/; HttpOnly",
                auth_token.value.0
            ))
            .unwrap();
            response::Builder::new()
                .status(StatusCode::CREATED)
                .header(axum::http::header::SET_COOKIE, cookie_value)
                .body(Body::from(response_body))
                .unwrap()
        }
        Ok(None) => StatusCode::FORBIDDEN.into_response(),
        Err(err) => {
            error!("Error during login: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn logout(State(user_manager): State<GuardedUserManager>, session: Session) -> Response {
    match user_manager
        .lock()
        .unwrap()
        .logout(&AuthTokenValue(session.token))
    {
        Ok(true) => {
            let cookie_value = Cookie::build(Cookie::new("session_token", ""))
                .path("/")
                .expires(time::OffsetDateTime::now_utc() - time::Duration::days(1)) // Expire it in the past
                .same_site(SameSite::Lax)
                .build();

            response::Builder::new()
                .status(StatusCode::OK)
                .header(axum::http::header::SET_COOKIE, cookie_value.to_string())
                .body(Body::empty())
                .unwrap()
        }
        Ok(false) => StatusCode::BAD_REQUEST.into_response(),
        Err(err) => {
            error!("Error during logout: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn board_search(
    State(job_store): State<GuardedJobStore>,
    Query(params): Query<SearchParams>,
) -> Response {
    let corpus = match job_store.get_all_jobs() {
        Ok(corpus) => corpus,
        Err(err) => {
            error!("Failed to load jobs for search: {}", err);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    match search(params.query.as_deref().unwrap_or(""), &corpus) {
        Ok(results) => Json(results).into_response(),
        Err(RankingError::InvalidQuery) => {
            (StatusCode::BAD_REQUEST, RankingError::InvalidQuery.to_string()).into_response()
        }
        Err(err) => {
            error!("Search failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn recommended_jobs(job_store: &GuardedJobStore, candidate_id: usize) -> Option<Vec<JobRecord>> {
    let history = match job_store.get_candidate_applications(candidate_id) {
        Ok(history) => history,
        Err(err) => {
            debug!("Failed to load application history: {}", err);
            return None;
        }
    };
    match recommend(&history, job_store.as_ref()) {
        Ok(Some(jobs)) if !jobs.is_empty() => Some(jobs),
        Ok(_) => None,
        Err(err) => {
            debug!("Recommendation failed, falling back to recency: {}", err);
            None
        }
    }
}

async fn board_jobs(
    session: Option<Session>,
    State(job_store): State<GuardedJobStore>,
) -> Response {
    if let Some(session) = session {
        if session.role == UserRole::Candidate {
            if let Some(jobs) = recommended_jobs(&job_store, session.user_id) {
                return Json(jobs).into_response();
            }
        }
    }
    match job_store.get_all_jobs_newest_first() {
        Ok(jobs) => Json(jobs).into_response(),
        Err(err) => {
            error!("Failed to list jobs: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn board_job(
    State(job_store): State<GuardedJobStore>,
    Path(id): Path<usize>,
) -> Response {
    match job_store.get_job(id) {
        Ok(Some(job)) => Json(job).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            error!("Failed to get job {}: {}", id, err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn board_profile(session: Session) -> Response {
    if session.role != UserRole::Candidate {
        return StatusCode::FORBIDDEN.into_response();
    }
    Json(serde_json::json!({ "name": session.name })).into_response()
}

async fn apply_to_job(
    session: Session,
    State(job_store): State<GuardedJobStore>,
    Path(job_id): Path<usize>,
    Json(body): Json<ApplyBody>,
) -> Response {
    if session.role != UserRole::Candidate {
        return StatusCode::FORBIDDEN.into_response();
    }
    match job_store.get_job(job_id) {
        Ok(Some(_)) => {}
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            error!("Failed to get job {}: {}", job_id, err);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }
    match job_store.create_application(job_id, session.user_id, body.resume_url) {
        Ok(Some(application)) => (StatusCode::CREATED, Json(application)).into_response(),
        Ok(None) => (StatusCode::BAD_REQUEST, "Already applied to this job.").into_response(),
        Err(err) => {
            error!("Failed to create application: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn my_applications(
    session: Session,
    State(job_store): State<GuardedJobStore>,
) -> Response {
    if session.role != UserRole::Candidate {
        return StatusCode::FORBIDDEN.into_response();
    }
    match job_store.get_candidate_applications(session.user_id) {
        Ok(applications) => Json(applications).into_response(),
        Err(err) => {
            error!("Failed to list applications: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn withdraw_application(
    session: Session,
    State(job_store): State<GuardedJobStore>,
    Path(id): Path<usize>,
) -> Response {
    if session.role != UserRole::Candidate {
        return StatusCode::FORBIDDEN.into_response();
    }
    match job_store.delete_application(id, session.user_id) {
        Ok(true) => StatusCode::OK.into_response(),
        Ok(false) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            error!("Failed to delete application {}: {}", id, err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn post_job(
    session: Session,
    State(job_store): State<GuardedJobStore>,
    Json(body): Json<NewJob>,
) -> Response {
    if session.role != UserRole::Recruiter {
        return StatusCode::FORBIDDEN.into_response();
    }
    match job_store.create_job(session.user_id, body) {
        Ok(job) => (StatusCode::CREATED, Json(job)).into_response(),
        Err(err) => {
            error!("Failed to create job: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn recruiter_jobs(
    session: Session,
    State(job_store): State<GuardedJobStore>,
) -> Response {
    if session.role != UserRole::Recruiter {
        return StatusCode::FORBIDDEN.into_response();
    }
    match job_store.get_recruiter_jobs(session.user_id) {
        Ok(jobs) if jobs.is_empty() => {
            (StatusCode::NOT_FOUND, "No jobs found.").into_response()
        }
        Ok(jobs) => Json(jobs).into_response(),
        Err(err) => {
            error!("Failed to list recruiter jobs: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn put_job(
    session: Session,
    State(job_store): State<GuardedJobStore>,
    Path(id): Path<usize>,
    Json(body): Json<JobPatch>,
) -> Response {
    if session.role != UserRole::Recruiter {
        return StatusCode::FORBIDDEN.into_response();
    }
    match job_store.update_job(id, session.user_id, body) {
        Ok(Some(job)) => Json(job).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            error!("Failed to update job {}: {}", id, err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn remove_job(
    session: Session,
    State(job_store): State<GuardedJobStore>,
    Path(id): Path<usize>,
) -> Response {
    if session.role != UserRole::Recruiter {
        return StatusCode::FORBIDDEN.into_response();
    }
    match job_store.delete_job(id, session.user_id) {
        Ok(true) => StatusCode::OK.into_response(),
        Ok(false) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            error!("Failed to delete job {}: {}", id, err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn recruiter_applications(
    session: Session,
    State(state): State<ServerState>,
) -> Response {
    if session.role != UserRole::Recruiter {
        return StatusCode::FORBIDDEN.into_response();
    }
    let entries = match state.job_store.get_recruiter_applications(session.user_id) {
        Ok(entries) => entries,
        Err(err) => {
            error!("Failed to list recruiter applications: {}", err);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let user_manager = state.user_manager.lock().unwrap();
    let enriched: Vec<EnrichedApplication> = entries
        .into_iter()
        .map(|entry| {
            let candidate = user_manager
                .get_user(entry.application.candidate_id)
                .unwrap_or_else(|err| {
                    debug!("Failed to resolve candidate: {}", err);
                    None
                });
            let (candidate_name, candidate_email) = match candidate {
                Some(account) => (Some(account.name), Some(account.email)),
                None => (None, None),
            };
            EnrichedApplication {
                entry,
                candidate_name,
                candidate_email,
            }
        })
        .collect();
    Json(enriched).into_response()
}

async fn set_application_status(
    session: Session,
    State(job_store): State<GuardedJobStore>,
    Path(id): Path<usize>,
    Json(body): Json<StatusBody>,
) -> Response {
    if session.role != UserRole::Recruiter {
        return StatusCode::FORBIDDEN.into_response();
    }
    let status = match ApplicationStatus::from_str(&body.status) {
        Some(status @ (ApplicationStatus::Accepted | ApplicationStatus::Rejected)) => status,
        _ => {
            return (StatusCode::BAD_REQUEST, "Status must be accepted or rejected.")
                .into_response()
        }
    };
    match job_store.update_application_status(id, status) {
        Ok(Some(application)) => Json(application).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            error!("Failed to update application {} status: {}", id, err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

impl ServerState {
    fn new(
        config: ServerConfig,
        job_store: GuardedJobStore,
        user_manager: UserManager,
    ) -> ServerState {
        ServerState {
            config,
            job_store,
            user_manager: Arc::new(Mutex::new(user_manager)),
        }
    }
}

fn make_app(
    config: ServerConfig,
    job_store: GuardedJobStore,
    user_store: Box<dyn UserStore>,
) -> Result<Router> {
    let user_manager = UserManager::new(user_store);
    let state = ServerState::new(config, job_store, user_manager);

    let auth_routes: Router = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", get(logout))
        .with_state(state.clone());

    let board_routes: Router = Router::new()
        .route("/search", get(board_search))
        .route("/jobs", get(board_jobs))
        .route("/jobs/{id}", get(board_job))
        .route("/profile", get(board_profile))
        .with_state(state.clone());

    let application_routes: Router = Router::new()
        .route("/apply/{job_id}", post(apply_to_job))
        .route("/mine", get(my_applications))
        .route("/mine/{id}", delete(withdraw_application))
        .with_state(state.clone());

    let recruiter_routes: Router = Router::new()
        .route("/jobs", post(post_job))
        .route("/jobs", get(recruiter_jobs))
        .route("/jobs/{id}", put(put_job))
        .route("/jobs/{id}", delete(remove_job))
        .route("/applications", get(recruiter_applications))
        .route("/applications/{id}/status", put(set_application_status))
        .with_state(state.clone());

    let app: Router = Router::new()
        .nest("/v1/auth", auth_routes)
        .nest("/v1/board", board_routes)
        .nest("/v1/applications", application_routes)
        .nest("/v1/recruiter", recruiter_routes)
        .layer(middleware::from_fn_with_state(state, log_requests));

    Ok(app)
}

pub async fn run_server(
    job_store: GuardedJobStore,
    user_store: Box<dyn UserStore>,
    requests_logging_level: RequestsLoggingLevel,
    port: u16,
) -> Result<()> {
    let config = ServerConfig {
        requests_logging_level,
        port,
    };
    let app = make_app(config, job_store, user_store)?;

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;

    Ok(axum::serve(listener, app).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job_store::{JobStore, SqliteJobStore};
    use crate::user::SqliteUserStore;
    use axum::{body::Body, http::Request};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn make_test_app() -> (Router, Arc<SqliteJobStore>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let job_store = Arc::new(SqliteJobStore::new(temp_dir.path().join("jobs.db")).unwrap());
        let user_store = Box::new(SqliteUserStore::new(temp_dir.path().join("users.db")).unwrap());
        let app = make_app(ServerConfig::default(), job_store.clone(), user_store).unwrap();
        (app, job_store, temp_dir)
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn new_job(title: &str, category: &str, description: &str) -> NewJob {
        serde_json::from_value(serde_json::json!({
            "title": title,
            "company": "Acme",
            "category": category,
            "location": "Remote",
            "description": description,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn responds_forbidden_on_protected_routes() {
        let (app, _job_store, _temp_dir) = make_test_app();

        let protected_routes = vec![
            "/v1/auth/logout",
            "/v1/board/profile",
            "/v1/applications/mine",
            "/v1/recruiter/jobs",
            "/v1/recruiter/applications",
        ];

        for route in protected_routes.into_iter() {
            println!("Trying route {}", route);
            let request = Request::builder().uri(route).body(Body::empty()).unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
        }

        let request = json_request("POST", "/v1/recruiter/jobs", serde_json::json!({}));
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn only_versioned_routes_are_exposed() {
        let (app, _job_store, _temp_dir) = make_test_app();

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn blank_search_query_is_bad_request() {
        let (app, _job_store, _temp_dir) = make_test_app();

        for uri in ["/v1/board/search", "/v1/board/search?query=%20%20"] {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn search_is_public_and_ranks_by_relevance() {
        let (app, job_store, _temp_dir) = make_test_app();
        job_store
            .create_job(1, new_job("Go Engineer", "engineering", "backend systems"))
            .unwrap();
        job_store
            .create_job(1, new_job("Bartender", "hospitality", "serves drinks"))
            .unwrap();

        let request = Request::builder()
            .uri("/v1/board/search?query=engineer%20backend")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let results = body_json(response).await;
        let results = results.as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["title"], "Go Engineer");
        assert!(results[0]["relevance_score"].as_f64().unwrap() > 0.0);
    }

    #[tokio::test]
    async fn board_listing_without_session_is_newest_first() {
        let (app, job_store, _temp_dir) = make_test_app();
        let first = job_store
            .create_job(1, new_job("Oldest", "engineering", ""))
            .unwrap();
        let second = job_store
            .create_job(1, new_job("Newest", "engineering", ""))
            .unwrap();

        let request = Request::builder()
            .uri("/v1/board/jobs")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let results = body_json(response).await;
        let ids: Vec<u64> = results
            .as_array()
            .unwrap()
            .iter()
            .map(|j| j["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![second.id as u64, first.id as u64]);
    }

    #[tokio::test]
    async fn register_login_and_role_enforcement() {
        let (app, _job_store, _temp_dir) = make_test_app();

        let request = json_request(
            "POST",
            "/v1/auth/register",
            serde_json::json!({
                "name": "Ada",
                "email": "ada@example.com",
                "password": "hunter2",
                "role": "candidate",
            }),
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let request = json_request(
            "POST",
            "/v1/auth/login",
            serde_json::json!({
                "email": "ada@example.com",
                "password": "hunter2",
                "role": "candidate",
            }),
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(response.headers().contains_key("set-cookie"));
        let login = body_json(response).await;
        let token = login["token"].as_str().unwrap().to_string();
        assert_eq!(login["role"], "candidate");

        // Candidate token works on candidate routes.
        let request = Request::builder()
            .uri("/v1/board/profile")
            .header("Authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["name"], "Ada");

        // But not on recruiter routes.
        let request = Request::builder()
            .uri("/v1/recruiter/jobs")
            .header("Authorization", token.clone())
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // Logout invalidates the token.
        let request = Request::builder()
            .uri("/v1/auth/logout")
            .header("Authorization", token.clone())
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder()
            .uri("/v1/board/profile")
            .header("Authorization", token)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn application_round_trip() {
        let (app, job_store, _temp_dir) = make_test_app();
        let job = job_store
            .create_job(1, new_job("Engineer", "engineering", ""))
            .unwrap();

        for (email, role) in [
            ("ada@example.com", "candidate"),
            ("bob@example.com", "recruiter"),
        ] {
            let request = json_request(
                "POST",
                "/v1/auth/register",
                serde_json::json!({
                    "name": "x",
                    "email": email,
                    "password": "pw",
                    "role": role,
                }),
            );
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let request = json_request(
            "POST",
            "/v1/auth/login",
            serde_json::json!({
                "email": "ada@example.com",
                "password": "pw",
                "role": "candidate",
            }),
        );
        let login = body_json(app.clone().oneshot(request).await.unwrap()).await;
        let token = login["token"].as_str().unwrap().to_string();

        let uri = format!("/v1/applications/apply/{}", job.id);
        let request = Request::builder()
            .method("POST")
            .uri(&uri)
            .header("Authorization", token.clone())
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({ "resume_url": "http://cv" }).to_string(),
            ))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        // Applying twice is rejected.
        let request = Request::builder()
            .method("POST")
            .uri(&uri)
            .header("Authorization", token.clone())
            .header("content-type", "application/json")
            .body(Body::from(serde_json::json!({}).to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let request = Request::builder()
            .uri("/v1/applications/mine")
            .header("Authorization", token)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let mine = body_json(response).await;
        let mine = mine.as_array().unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0]["job"]["title"], "Engineer");
        assert_eq!(mine[0]["application"]["status"], "pending");
    }
}
