//! Nike+ service client
//!
//! Logs in with an email and password, then fetches activity listings and
//! activity details over the cookie session the login establishes. Every
//! operation issues exactly one request.

use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response, StatusCode, Url};
use std::sync::Arc;
use std::time::Duration;

use crate::client::session::Session;
use crate::config::ClientConfig;
use crate::error::{NikePlusError, Result};
use crate::models::{ActivityDetail, ActivityRecord, ActivitySummary, Record};

/// Application id the Nike+ website identifies itself with at login
const APP_ID: &str = "b31990e7-8583-4251-808f-9dc67b40f5d2";

/// User agent sent with every request
const CLIENT_USER_AGENT: &str = concat!("nikeplus-cli/", env!("CARGO_PKG_VERSION"));

/// Listing index range; the service returns at most this many activities
const INDEX_START: u32 = 0;
const INDEX_END: u32 = 9999;

/// Nike+ API client
pub struct NikePlusClient {
    client: Client,
    auth_base_url: String,
    base_url: String,
    debug: bool,
    session: Option<Session>,
    authorization_response: Option<Record>,
}

impl NikePlusClient {
    /// Create an unauthenticated client for the hosts in `config`
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .cookie_provider(Arc::new(Jar::default()))
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(NikePlusError::Http)?;

        Ok(Self {
            client,
            auth_base_url: config.auth_base_url.clone(),
            base_url: config.base_url.clone(),
            debug: config.debug,
            session: None,
            authorization_response: None,
        })
    }

    /// Create a client and log in with the credentials in `config`
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let mut client = Self::new(config)?;
        client.login(&config.email, &config.password).await?;
        Ok(client)
    }

    /// Log in, establishing the session used by later requests.
    ///
    /// On failure the client is left unauthenticated, even if an earlier
    /// login succeeded.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&Session> {
        self.session = None;

        let url = format!("{}/nsl/services/user/login", self.auth_base_url);
        let query = [
            ("app", APP_ID),
            ("format", "json"),
            ("contentType", "plaintext"),
        ];
        let form = [("email", email), ("password", password)];

        tracing::debug!(%url, "POST login");
        let response = self
            .client
            .post(&url)
            .query(&query)
            .form(&form)
            .send()
            .await
            .map_err(NikePlusError::Http)?;
        let envelope = self.read_record(response).await?;

        let session = Session::from_login_response(&envelope);
        self.authorization_response = Some(envelope);
        let session = session?;

        tracing::info!(screen_name = session.screen_name(), "Logged in to Nike+");
        Ok(&*self.session.insert(session))
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn screen_name(&self) -> Option<&str> {
        self.session.as_ref().map(Session::screen_name)
    }

    /// The `User` object returned at login
    pub fn user(&self) -> Option<&Record> {
        self.session.as_ref().map(Session::user)
    }

    /// The full decoded body of the last login response
    pub fn authorization_response(&self) -> Option<&Record> {
        self.authorization_response.as_ref()
    }

    /// List the user's activities.
    ///
    /// Returns an empty list when the service sends no activities or a body
    /// that cannot be decoded.
    pub async fn list_activities(&self) -> Result<Vec<ActivitySummary>> {
        let session = self.session.as_ref().ok_or(NikePlusError::NotAuthenticated)?;
        let url = self.endpoint(&[
            "plus",
            "activity",
            "running",
            session.screen_name(),
            "lifetime",
            "activities",
        ])?;
        let query = [
            ("indexStart", INDEX_START.to_string()),
            ("indexEnd", INDEX_END.to_string()),
        ];

        let data = self.get(url, &query).await?;
        let activities: Vec<ActivitySummary> = data
            .get("activities")
            .iter()
            .map(|item| ActivitySummary::new(item.get("activity").to_record().unwrap_or_default()))
            .collect();

        tracing::debug!(count = activities.len(), "Fetched activity list");
        Ok(activities)
    }

    /// Ids of the user's activities, in listing order.
    ///
    /// Entries without an id are left out.
    pub async fn list_activity_ids(&self) -> Result<Vec<String>> {
        let activities = self.list_activities().await?;
        Ok(activities.iter().filter_map(|a| a.activity_id()).collect())
    }

    /// Fetch the full record for one activity.
    ///
    /// Returns `None` when the response has no `activity` object.
    pub async fn get_activity(&self, id: &str) -> Result<Option<ActivityDetail>> {
        let id = validate_activity_id(id)?;
        let url = self.endpoint(&["plus", "running", "ajax", id])?;

        let data = self.get(url, &[]).await?;
        Ok(data.get("activity").to_record().map(ActivityDetail::new))
    }

    /// Append path segments to the activity host, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            NikePlusError::config(format!("Invalid base URL {}: {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| NikePlusError::config(format!("Base URL cannot take a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issue a GET and decode the body
    async fn get(&self, url: Url, query: &[(&str, String)]) -> Result<Record> {
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(NikePlusError::Http)?;

        self.read_record(response).await
    }

    /// Check the status, then decode the body, falling back to an empty record
    async fn read_record(&self, response: Response) -> Result<Record> {
        let response = self.handle_response_status(response).await?;
        let body = response.text().await.map_err(NikePlusError::Http)?;
        Ok(Record::parse(&body, self.debug))
    }

    /// Convert non-success status codes to errors
    async fn handle_response_status(&self, response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(NikePlusError::Api {
            status: status.as_u16(),
            message: summarize_body(status, &body),
        })
    }
}

/// Activity ids are opaque, but they go into a URL path
fn validate_activity_id(id: &str) -> Result<&str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(NikePlusError::invalid_param("activity id is empty"));
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(NikePlusError::invalid_param(format!(
            "activity id contains unexpected characters: {}",
            id
        )));
    }
    Ok(id)
}

fn summarize_body(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string();
    }
    match body.char_indices().nth(200) {
        Some((end, _)) => format!("{}...", &body[..end]),
        None => body.to_string(),
    }
}
