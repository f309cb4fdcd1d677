//! Integration tests for the summarize HTTP surface.
//!
//! Each test spins up the Axum app on a random port with stub mail and LLM
//! backends and drives it over real HTTP with reqwest.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use reqwest::StatusCode;
use reqwest::header::{COOKIE, LOCATION, SET_COOKIE};
use secrecy::SecretString;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::time::timeout;

use inbox_digest::config::{GoogleConfig, PipelineConfig};
use inbox_digest::error::{LlmError, MailError};
use inbox_digest::gmail::types::{Header, MessagePart, PartBody};
use inbox_digest::gmail::{MailProvider, MessageRef, RawMessage};
use inbox_digest::llm::{CompletionRequest, CompletionResponse, FinishReason, LlmProvider};
use inbox_digest::oauth::{OAuthClient, TokenBundle};
use inbox_digest::pipeline::{Summarizer, SummarizeWorkflow};
use inbox_digest::session::SessionStore;
use inbox_digest::web::{AppState, app_routes};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Stub mailbox: a fixed list of messages, or a blanket 401.
struct StubMail {
    messages: Vec<RawMessage>,
    reject: bool,
    calls: AtomicUsize,
}

impl StubMail {
    fn with(messages: Vec<RawMessage>) -> Self {
        Self {
            messages,
            reject: false,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl MailProvider for StubMail {
    async fn list_recent(
        &self,
        _access_token: &SecretString,
        max_results: u32,
    ) -> Result<Vec<MessageRef>, MailError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.reject {
            return Err(MailError::Unauthorized("Invalid Credentials".into()));
        }
        Ok(self
            .messages
            .iter()
            .take(max_results as usize)
            .map(|m| MessageRef {
                id: m.id.clone(),
                thread_id: None,
            })
            .collect())
    }

    async fn get_message(
        &self,
        _access_token: &SecretString,
        id: &str,
    ) -> Result<RawMessage, MailError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.messages
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| MailError::NotFound(id.to_string()))
    }
}

/// Stub LLM: canned summary per subject, failing for one subject if asked.
struct StubLlm {
    fail_subject: Option<&'static str>,
    calls: AtomicUsize,
}

#[async_trait]
impl LlmProvider for StubLlm {
    fn model_name(&self) -> &str {
        "stub"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let prompt = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        let subject = prompt
            .lines()
            .find_map(|l| l.strip_prefix("Subject: "))
            .unwrap_or_default()
            .to_string();

        if self.fail_subject == Some(subject.as_str()) {
            return Err(LlmError::RequestFailed {
                provider: "stub".into(),
                reason: "HTTP 500: upstream".into(),
            });
        }
        Ok(CompletionResponse {
            content: format!("Summary of {subject}."),
            input_tokens: 0,
            output_tokens: 0,
            finish_reason: FinishReason::Stop,
            response_id: None,
        })
    }
}

struct TestServer {
    base: String,
    sessions: Arc<SessionStore>,
    client: reqwest::Client,
}

/// Start the app on a random port.
async fn start_server(mail: Arc<StubMail>, llm: Arc<StubLlm>) -> TestServer {
    let sessions = SessionStore::new();
    let oauth = OAuthClient::new(&GoogleConfig {
        client_id: "client-123".into(),
        client_secret: SecretString::from("shh"),
        redirect_uri: "http://localhost/api/gmail/callback".into(),
        auth_url: "https://accounts.google.com/o/oauth2/v2/auth".into(),
        token_url: "http://127.0.0.1:9/token".into(),
        gmail_api_base: "http://127.0.0.1:9".into(),
    });
    let workflow = SummarizeWorkflow::new(mail, Summarizer::new(llm), PipelineConfig::default());
    let app = app_routes(AppState {
        sessions: sessions.clone(),
        oauth: Arc::new(oauth),
        workflow: Arc::new(workflow),
        secure_cookies: false,
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestServer {
        base: format!("http://127.0.0.1:{port}"),
        sessions,
        client,
    }
}

impl TestServer {
    async fn connect(&self) -> String {
        let session = self.sessions.create(TokenBundle::bearer("ya29.test")).await;
        format!("gmail_session={}", session.id)
    }

    async fn summarize(&self, cookie: Option<&str>) -> reqwest::Response {
        let mut req = self.client.post(format!("{}/api/gmail/summarize", self.base));
        if let Some(c) = cookie {
            req = req.header(COOKIE, c);
        }
        timeout(TEST_TIMEOUT, req.send())
            .await
            .expect("request timed out")
            .unwrap()
    }
}

fn message(i: usize) -> RawMessage {
    let headers = [
        ("From", format!("Sender {i} <sender{i}@example.com>")),
        ("Subject", format!("Topic {i}")),
        ("Date", "Mon, 8 Jan 2024 09:30:00 -0500".to_string()),
    ];
    RawMessage {
        id: format!("msg-{i}"),
        payload: Some(MessagePart {
            mime_type: Some("text/html".into()),
            headers: headers
                .into_iter()
                .map(|(name, value)| Header {
                    name: name.into(),
                    value,
                })
                .collect(),
            body: Some(PartBody {
                data: Some(URL_SAFE_NO_PAD.encode(format!("<p>Body <b>{i}</b></p>"))),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn inbox(n: usize) -> Vec<RawMessage> {
    (0..n).map(message).collect()
}

fn llm() -> Arc<StubLlm> {
    Arc::new(StubLlm {
        fail_subject: None,
        calls: AtomicUsize::new(0),
    })
}

// ── Tests ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_cookie_is_rejected_without_outbound_calls() {
    let mail = Arc::new(StubMail::with(inbox(3)));
    let llm = llm();
    let server = start_server(mail.clone(), llm.clone()).await;

    let response = server.summarize(None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Not authenticated. Please connect Gmail first.");

    assert_eq!(mail.calls.load(Ordering::SeqCst), 0);
    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn ten_summaries_in_mailbox_order() {
    let mail = Arc::new(StubMail::with(inbox(12)));
    let server = start_server(mail, llm()).await;
    let cookie = server.connect().await;

    let response = server.summarize(Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    let summaries = body["summaries"].as_array().unwrap();
    assert_eq!(summaries.len(), 10);

    for (i, row) in summaries.iter().enumerate() {
        assert_eq!(row["from"], format!("Sender {i}"));
        assert_eq!(row["subject"], format!("Topic {i}"));
        assert_eq!(row["summary"], format!("Summary of Topic {i}."));
        assert_eq!(row["date"], "Jan 8, 9:30 AM");
    }
}

#[tokio::test]
async fn empty_mailbox_returns_empty_list() {
    let mail = Arc::new(StubMail::with(Vec::new()));
    let llm = llm();
    let server = start_server(mail, llm.clone()).await;
    let cookie = server.connect().await;

    let response = server.summarize(Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"summaries": []}));
    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn one_failed_summary_fails_whole_request() {
    let mail = Arc::new(StubMail::with(inbox(10)));
    let llm = Arc::new(StubLlm {
        fail_subject: Some("Topic 6"),
        calls: AtomicUsize::new(0),
    });
    let server = start_server(mail, llm).await;
    let cookie = server.connect().await;

    let response = server.summarize(Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"error": "Failed to summarize emails. Please try again."}));

    // Session survives a processing failure.
    let response = server.summarize(Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn revoked_credential_clears_cookie_and_session() {
    let mail = Arc::new(StubMail {
        messages: inbox(3),
        reject: true,
        calls: AtomicUsize::new(0),
    });
    let server = start_server(mail, llm()).await;
    let cookie = server.connect().await;

    let response = server.summarize(Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(set_cookie.contains("Max-Age=0"));
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Gmail session expired. Please reconnect.");

    let response = server.summarize(Some(&cookie)).await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Not authenticated. Please connect Gmail first.");
}

#[tokio::test]
async fn callback_errors_redirect_to_workflow_page() {
    let server = start_server(Arc::new(StubMail::with(Vec::new())), llm()).await;

    for (query, expected) in [
        ("error=access_denied", "/workflows/gmail-summarizer?error=access_denied"),
        ("", "/workflows/gmail-summarizer?error=no_code"),
    ] {
        let response = timeout(
            TEST_TIMEOUT,
            server
                .client
                .get(format!("{}/api/gmail/callback?{query}", server.base))
                .send(),
        )
        .await
        .expect("request timed out")
        .unwrap();

        assert!(response.status().is_redirection());
        assert_eq!(response.headers().get(LOCATION).unwrap(), expected);
    }
}

#[tokio::test]
async fn auth_endpoint_returns_consent_url() {
    let server = start_server(Arc::new(StubMail::with(Vec::new())), llm()).await;

    let body: Value = server
        .client
        .get(format!("{}/api/gmail/auth", server.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let url = body["authUrl"].as_str().unwrap();
    assert!(url.contains("client_id=client-123"));
    assert!(url.contains("response_type=code"));
}
