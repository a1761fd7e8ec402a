//! Integration tests for the session protocol and job flows
//!
//! These tests drive the use cases against an in-process fake backend that
//! validates bearer tokens, issues refreshed tokens and keeps job state.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use hireloop_application::{
    ApplicationError, ApplyToJob, ApplyToJobInput, ClearSession, CloseJob, Endpoints, FetchJob,
    HttpClient, HttpFuture, HttpTokenRefresher, ListApplications, LogoutReason, SessionClient,
    SessionStore, TokenStore,
};
use hireloop_domain::{
    ApiRequest, ApiResponse, ApplyOutcome, DomainError, HttpMethod, Identity, JobId, JobPosting,
    JobStatus, OrgRole, Session,
};

#[derive(Default)]
struct BackendState {
    access_token: String,
    refresh_token: String,
    refresh_accepted: bool,
    issued: usize,
    job_status: String,
    applied: HashSet<String>,
    requests: Vec<(HttpMethod, String)>,
    refreshes: usize,
}

/// Fake backend honouring the client's endpoint contract.
struct FakeBackend {
    state: Mutex<BackendState>,
}

impl FakeBackend {
    fn new(job_status: &str) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(BackendState {
                access_token: "access-0".to_string(),
                refresh_token: "refresh".to_string(),
                refresh_accepted: true,
                job_status: job_status.to_string(),
                ..BackendState::default()
            }),
        })
    }

    /// Invalidates the current access token, as expiry would.
    fn expire_access_token(&self) {
        self.state.lock().unwrap().access_token = "expired-elsewhere".to_string();
    }

    fn reject_refresh(&self) {
        self.state.lock().unwrap().refresh_accepted = false;
    }

    /// Requests other than refreshes.
    fn resource_calls(&self) -> usize {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|(_, path)| path != "auth/token/refresh/")
            .count()
    }

    fn refreshes(&self) -> usize {
        self.state.lock().unwrap().refreshes
    }

    fn job_json(status: &str) -> Value {
        json!({
            "job_id": "7",
            "title": "Backend Engineer",
            "status": status,
            "application_close_date": "2026-12-31",
            "openings": 2
        })
    }

    fn handle(&self, request: &ApiRequest) -> ApiResponse {
        let mut state = self.state.lock().unwrap();
        state.requests.push((request.method, request.path.clone()));

        if request.path == "auth/token/refresh/" {
            state.refreshes += 1;
            let body: Value = serde_json::from_str(request.body.as_deref().unwrap_or("{}")).unwrap();
            if !state.refresh_accepted || body["refresh_token"] != state.refresh_token.as_str() {
                return ApiResponse::with_body(400, r#"{"detail": "Token is invalid or expired"}"#);
            }
            state.issued += 1;
            state.access_token = format!("access-{}", state.issued);
            return ApiResponse::with_body(
                200,
                json!({ "access_token": state.access_token }).to_string(),
            );
        }

        let expected = format!("Bearer {}", state.access_token);
        if request.headers.get("Authorization") != Some(expected.as_str()) {
            return ApiResponse::with_body(401, r#"{"detail": "Given token not valid"}"#);
        }

        match (request.method, request.path.as_str()) {
            (HttpMethod::Get, "jobs/7/") => {
                ApiResponse::with_body(200, Self::job_json(&state.job_status).to_string())
            }
            (HttpMethod::Post, "jobs/7/apply/") => {
                if state.applied.insert("7".to_string()) {
                    ApiResponse::with_body(201, r#"{"status": "applied"}"#)
                } else {
                    ApiResponse::with_body(400, r#"{"detail": "Already registered for this job"}"#)
                }
            }
            (HttpMethod::Post, "jobs/7/close/") => {
                state.job_status = "closed".to_string();
                ApiResponse::with_body(200, r#"{"detail": "Job closed"}"#)
            }
            (HttpMethod::Get, "applications/") => {
                let list: Vec<Value> = state
                    .applied
                    .iter()
                    .map(|job| json!({ "job_id": job, "status": "applied", "resume_url": "https://cdn/cv.pdf" }))
                    .collect();
                ApiResponse::with_body(200, Value::Array(list).to_string())
            }
            _ => ApiResponse::with_body(404, r#"{"detail": "Not found."}"#),
        }
    }
}

impl HttpClient for FakeBackend {
    fn execute<'a>(&'a self, request: &'a ApiRequest) -> HttpFuture<'a> {
        let response = self.handle(request);
        Box::pin(async move { Ok(response) })
    }
}

struct Client {
    backend: Arc<FakeBackend>,
    store: Arc<TokenStore>,
    handler: Arc<ClearSession>,
    session: Arc<SessionClient<FakeBackend>>,
    endpoints: Endpoints,
}

fn client(backend: Arc<FakeBackend>, session: Session) -> Client {
    let endpoints = Endpoints::default();
    let store = Arc::new(TokenStore::with_session(session));
    let refresher = Arc::new(HttpTokenRefresher::new(
        backend.clone(),
        store.clone(),
        endpoints.refresh.clone(),
    ));
    let handler = Arc::new(ClearSession::new(store.clone()));
    let session = Arc::new(SessionClient::new(
        backend.clone(),
        store.clone(),
        refresher,
        handler.clone(),
    ));
    Client {
        backend,
        store,
        handler,
        session,
        endpoints,
    }
}

fn candidate_session() -> Session {
    Session::established("access-0", "refresh", Some(Identity::candidate("c@x.io")))
}

fn open_job() -> JobPosting {
    JobPosting {
        job_id: JobId::new("7").unwrap(),
        title: "Backend Engineer".to_string(),
        status: JobStatus::Open,
        application_close_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        openings: 2,
        applied_candidates: Vec::new(),
        closed_at: None,
    }
}

fn apply_input() -> ApplyToJobInput {
    ApplyToJobInput {
        job: open_job(),
        resume_url: Some("https://cdn/cv.pdf".to_string()),
    }
}

#[tokio::test]
async fn test_apply_twice_resolves_to_applied() {
    let c = client(FakeBackend::new("open"), candidate_session());
    let apply = ApplyToJob::new(c.session.clone(), c.endpoints.clone());

    let first = apply.execute(&apply_input()).await.unwrap();
    let second = apply.execute(&apply_input()).await.unwrap();

    assert_eq!(first, ApplyOutcome::Applied);
    assert_eq!(second, ApplyOutcome::AlreadyRegistered);
    assert!(second.is_applied());
}

#[tokio::test]
async fn test_token_expiry_mid_session_refreshes_once() {
    let c = client(FakeBackend::new("open"), candidate_session());
    let apply = ApplyToJob::new(c.session.clone(), c.endpoints.clone());
    let list = ListApplications::new(c.session.clone(), c.endpoints.my_applications.clone());

    apply.execute(&apply_input()).await.unwrap();
    c.backend.expire_access_token();

    let applications = list.execute().await.unwrap();

    assert_eq!(applications.len(), 1);
    assert_eq!(c.backend.refreshes(), 1);
    assert_eq!(c.store.read().await.access_token(), Some("access-1"));
    assert_eq!(c.store.read().await.refresh_token(), Some("refresh"));

    // The refreshed token keeps working without another refresh.
    list.execute().await.unwrap();
    assert_eq!(c.backend.refreshes(), 1);
}

#[tokio::test]
async fn test_rejected_refresh_clears_session_without_retry() {
    let c = client(FakeBackend::new("open"), candidate_session());
    c.backend.expire_access_token();
    c.backend.reject_refresh();
    let fetch = FetchJob::new(c.session.clone(), c.endpoints.clone());

    let result = fetch.execute(&JobId::new("7").unwrap()).await;

    assert!(matches!(result, Err(ApplicationError::SessionExpired)));
    assert_eq!(c.backend.resource_calls(), 1);
    assert_eq!(c.backend.refreshes(), 1);
    assert!(c.store.read().await.is_empty());
    assert_eq!(c.handler.last_reason(), Some(LogoutReason::RefreshFailed));
}

#[tokio::test]
async fn test_missing_refresh_token_clears_session_without_retry() {
    let mut session = Session::empty();
    session.apply(hireloop_domain::SessionUpdate::access_token("stale"));
    let c = client(FakeBackend::new("open"), session);
    let list = ListApplications::new(c.session.clone(), c.endpoints.my_applications.clone());

    let result = list.execute().await;

    assert!(matches!(result, Err(ApplicationError::SessionExpired)));
    assert_eq!(c.backend.resource_calls(), 1);
    assert_eq!(c.backend.refreshes(), 0);
    assert!(c.store.read().await.is_empty());
}

#[tokio::test]
async fn test_apply_without_resume_sends_nothing() {
    let c = client(FakeBackend::new("open"), candidate_session());
    let apply = ApplyToJob::new(c.session.clone(), c.endpoints.clone());

    let result = apply
        .execute(&ApplyToJobInput {
            job: open_job(),
            resume_url: None,
        })
        .await;

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::MissingResume))
    ));
    assert_eq!(c.backend.resource_calls(), 0);
}

#[tokio::test]
async fn test_owner_closes_ongoing_job_and_adopts_server_state() {
    let owner = Session::established(
        "access-0",
        "refresh",
        Some(Identity::organization("o@acme.io", OrgRole::Owner)),
    );
    let c = client(FakeBackend::new("ongoing"), owner);
    let fetch = FetchJob::new(c.session.clone(), c.endpoints.clone());
    let close = CloseJob::new(c.session.clone(), c.endpoints.clone());

    let job = fetch.execute(&JobId::new("7").unwrap()).await.unwrap();
    assert_eq!(job.status, JobStatus::Ongoing);

    let closed = close.execute(&job).await.unwrap();

    assert_eq!(closed.status, JobStatus::Closed);
    assert!(closed.status.legal_actions().is_empty());
}

#[tokio::test]
async fn test_candidate_cannot_close_job() {
    let c = client(FakeBackend::new("ongoing"), candidate_session());
    let close = CloseJob::new(c.session.clone(), c.endpoints.clone());
    let mut job = open_job();
    job.status = JobStatus::Ongoing;

    let result = close.execute(&job).await;

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::ActorNotPermitted { .. }))
    ));
    assert_eq!(c.backend.resource_calls(), 0);
}
