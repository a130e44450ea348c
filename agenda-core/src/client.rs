//! HTTP client for the agenda backend.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{AgendaError, AgendaResult, ValidationError};
use crate::model::{
    CalendarItem, Credentials, Event, EventBatch, EventUpdate, FeedRange, LoginResponse, NewEvent,
    NewTask, Task, TaskUpdate,
};
use crate::session::Session;
use crate::slot::CalendarDay;

/// Operations the boards need from the backend.
#[async_trait]
pub trait AgendaApi: Send + Sync {
    async fn list_events(&self) -> AgendaResult<Vec<Event>>;
    async fn create_event(&self, event: &NewEvent) -> AgendaResult<Event>;
    async fn update_event(&self, id: i64, update: &EventUpdate) -> AgendaResult<Event>;
    async fn delete_event(&self, id: i64) -> AgendaResult<()>;

    async fn list_tasks(&self, date: Option<CalendarDay>) -> AgendaResult<Vec<Task>>;
    async fn create_task(&self, task: &NewTask) -> AgendaResult<Task>;
    async fn update_task(&self, id: i64, update: &TaskUpdate) -> AgendaResult<Task>;
    async fn toggle_task(&self, id: i64) -> AgendaResult<Task>;
    async fn delete_task(&self, id: i64) -> AgendaResult<()>;

    async fn calendar_feed(&self, range: FeedRange) -> AgendaResult<Vec<CalendarItem>>;
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: Option<String>,
    msg: Option<String>,
}

#[derive(Deserialize)]
struct SignupResponse {
    msg: Option<String>,
}

/// HTTP client carrying the session's bearer token.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(base_url: &str, session: Arc<Session>) -> AgendaResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AgendaError::Config(e.to_string()))?;

        Ok(ApiClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.http.request(method, self.url(path));
        match self.session.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Send an authenticated request. A 401 ends the session.
    async fn send(&self, req: RequestBuilder) -> AgendaResult<Response> {
        let resp = req
            .send()
            .await
            .map_err(|e| AgendaError::Connection(e.to_string()))?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            warn!("Backend rejected the session token");
            self.session.logout();
            return Err(AgendaError::Unauthorized);
        }

        check_status(resp).await
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> AgendaResult<T> {
        let resp = self.send(req).await?;
        decode(resp).await
    }

    /// POST /api/token. Stores the token in the session on success.
    pub async fn login(&self, credentials: &Credentials) -> AgendaResult<LoginResponse> {
        require_credentials(credentials)?;
        debug!("POST /api/token");

        let resp = self
            .http
            .post(self.url("/api/token"))
            .json(credentials)
            .send()
            .await
            .map_err(|e| AgendaError::Connection(e.to_string()))?;
        let login: LoginResponse = decode(check_status(resp).await?).await?;

        self.session.login(login.access_token.clone())?;
        Ok(login)
    }

    /// POST /api/signup. Returns the backend's confirmation message.
    pub async fn signup(&self, credentials: &Credentials) -> AgendaResult<String> {
        require_credentials(credentials)?;
        debug!("POST /api/signup");

        let resp = self
            .http
            .post(self.url("/api/signup"))
            .json(credentials)
            .send()
            .await
            .map_err(|e| AgendaError::Connection(e.to_string()))?;
        let body: SignupResponse = decode(check_status(resp).await?).await?;

        Ok(body.msg.unwrap_or_else(|| "User created".to_string()))
    }

    /// POST /api/events/batch: one event per day in `startDay..=endDay`.
    pub async fn create_event_batch(&self, batch: &EventBatch) -> AgendaResult<Vec<Event>> {
        debug!("POST /api/events/batch {}..{}", batch.start_day, batch.end_day);
        self.send_json(self.request(Method::POST, "/api/events/batch").json(batch))
            .await
    }
}

#[async_trait]
impl AgendaApi for ApiClient {
    /// GET /api/events
    async fn list_events(&self) -> AgendaResult<Vec<Event>> {
        debug!("GET /api/events");
        self.send_json(self.request(Method::GET, "/api/events")).await
    }

    /// POST /api/events
    async fn create_event(&self, event: &NewEvent) -> AgendaResult<Event> {
        debug!("POST /api/events {}", event.start);
        self.send_json(self.request(Method::POST, "/api/events").json(event))
            .await
    }

    /// PUT /api/events/:id
    async fn update_event(&self, id: i64, update: &EventUpdate) -> AgendaResult<Event> {
        debug!("PUT /api/events/{}", id);
        self.send_json(
            self.request(Method::PUT, &format!("/api/events/{}", id))
                .json(update),
        )
        .await
    }

    /// DELETE /api/events/:id
    async fn delete_event(&self, id: i64) -> AgendaResult<()> {
        debug!("DELETE /api/events/{}", id);
        self.send(self.request(Method::DELETE, &format!("/api/events/{}", id)))
            .await?;
        Ok(())
    }

    /// GET /api/tasks
    async fn list_tasks(&self, date: Option<CalendarDay>) -> AgendaResult<Vec<Task>> {
        debug!("GET /api/tasks");
        let mut req = self.request(Method::GET, "/api/tasks");
        if let Some(day) = date {
            req = req.query(&[("date", day.to_string())]);
        }
        self.send_json(req).await
    }

    /// POST /api/tasks
    async fn create_task(&self, task: &NewTask) -> AgendaResult<Task> {
        debug!("POST /api/tasks");
        self.send_json(self.request(Method::POST, "/api/tasks").json(task))
            .await
    }

    /// PUT /api/tasks/:id
    async fn update_task(&self, id: i64, update: &TaskUpdate) -> AgendaResult<Task> {
        debug!("PUT /api/tasks/{}", id);
        self.send_json(
            self.request(Method::PUT, &format!("/api/tasks/{}", id))
                .json(update),
        )
        .await
    }

    /// POST /api/tasks/:id/toggle
    async fn toggle_task(&self, id: i64) -> AgendaResult<Task> {
        debug!("POST /api/tasks/{}/toggle", id);
        self.send_json(self.request(Method::POST, &format!("/api/tasks/{}/toggle", id)))
            .await
    }

    /// DELETE /api/tasks/:id
    async fn delete_task(&self, id: i64) -> AgendaResult<()> {
        debug!("DELETE /api/tasks/{}", id);
        self.send(self.request(Method::DELETE, &format!("/api/tasks/{}", id)))
            .await?;
        Ok(())
    }

    /// GET /api/calendar
    async fn calendar_feed(&self, range: FeedRange) -> AgendaResult<Vec<CalendarItem>> {
        debug!("GET /api/calendar");
        let req = self
            .request(Method::GET, "/api/calendar")
            .query(&range.query());
        self.send_json(req).await
    }
}

fn require_credentials(credentials: &Credentials) -> Result<(), ValidationError> {
    if credentials.email.trim().is_empty() || credentials.password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    Ok(())
}

/// Turn a non-success response into an error carrying the backend message.
async fn check_status(resp: Response) -> AgendaResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .ok()
        .and_then(|e| e.message.or(e.msg))
        .unwrap_or(text);

    if status == StatusCode::NOT_FOUND {
        return Err(AgendaError::NotFound(if message.is_empty() {
            "Not found".to_string()
        } else {
            message
        }));
    }

    Err(AgendaError::Http {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(resp: Response) -> AgendaResult<T> {
    resp.json()
        .await
        .map_err(|e| AgendaError::Decode(e.to_string()))
}
