use crate::models::{AccountInfo, Category, Note};
use crate::storage::{TOKEN_KEY, USER_KEY};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    /// No identity available; the call never reached the network.
    AuthRequired,
    Unauthorized,
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    /// HTTP status for `Http`/`Unauthorized`; `None` for local and
    /// transport-level failures.
    pub status: Option<u16>,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ApiError {
    fn auth_required() -> Self {
        Self {
            kind: ApiErrorKind::AuthRequired,
            status: None,
            message: "Not signed in".to_string(),
        }
    }

    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            status: None,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            status: None,
            message: e.to_string(),
        }
    }

    fn unauthorized() -> Self {
        Self {
            kind: ApiErrorKind::Unauthorized,
            status: Some(401),
            message: "Unauthorized".to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            status: Some(status.as_u16()),
            message: format!("{ctx} ({status}): {}", extract_error_message(&body)),
        }
    }
}

/// Backend error bodies are `{"message": "..."}`; tolerate plain text too.
fn extract_error_message(body: &str) -> String {
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = v.get("message").and_then(|m| m.as_str()) {
            return msg.to_string();
        }
    }
    body.trim().to_string()
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        let default_api_url = "http://localhost:5000".to_string();

        // We support BOTH `window.ENV.API_URL` (documented in README) and
        // `window.ENV.api_url` (legacy/implementation detail) for compatibility.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    // 1) Prefer README style: API_URL
                    if let Ok(api_url) = js_sys::Reflect::get(&env, &"API_URL".into()) {
                        if let Some(url_str) = api_url.as_string() {
                            return Self { api_url: url_str };
                        }
                    }

                    // 2) Fallback: api_url
                    if let Ok(api_url) = js_sys::Reflect::get(&env, &"api_url".into()) {
                        if let Some(url_str) = api_url.as_string() {
                            return Self { api_url: url_str };
                        }
                    }
                }
            }
        }

        Self {
            api_url: default_api_url,
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn get_api_url() -> String {
    EnvConfig::new().api_url
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct LoginResponse {
    pub token: String,
    pub user: AccountInfo,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct SignupResponse {
    pub token: String,
    pub user: AccountInfo,
}

/// Create/update payload. The backend fills in `_id` and `createdAt`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct SaveNoteRequest {
    pub title: String,
    pub content: String,
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct SetPinnedRequest {
    pub pinned: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct AiTextRequest {
    pub content: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct SuggestTitleResponse {
    #[serde(default)]
    pub title: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct SummarizeResponse {
    #[serde(default)]
    pub summary: String,
}

#[derive(Clone)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            token: None,
        }
    }

    pub fn load_from_storage() -> Self {
        let base_url = get_api_url();
        let token = leptos::web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|s| s.get_item(TOKEN_KEY).ok().flatten());

        Self { base_url, token }
    }

    pub fn save_to_storage(&self) {
        if let Some(storage) =
            leptos::web_sys::window().and_then(|w| w.local_storage().ok().flatten())
        {
            if let Some(token) = &self.token {
                let _ = storage.set_item(TOKEN_KEY, token);
            }
        }
    }

    pub fn clear_storage() {
        if let Some(storage) =
            leptos::web_sys::window().and_then(|w| w.local_storage().ok().flatten())
        {
            let _ = storage.remove_item(TOKEN_KEY);
            let _ = storage.remove_item(USER_KEY);
        }
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn logout(&mut self) {
        self.token = None;
        Self::clear_storage();
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Fresh bearer credential, re-read on every call rather than captured
    /// once. Fails with `AuthRequired` before any network I/O when nobody
    /// is signed in.
    pub(crate) fn credential(&self) -> ApiResult<String> {
        self.token.clone().ok_or_else(ApiError::auth_required)
    }

    fn bearer_header(token: &str) -> String {
        format!("Bearer {token}")
    }

    fn with_auth_header(
        mut req: reqwest::RequestBuilder,
        token: Option<String>,
    ) -> reqwest::RequestBuilder {
        if let Some(token) = token {
            req = req.header("Authorization", Self::bearer_header(&token));
        }
        req
    }

    async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&impl serde::Serialize>,
        authed: bool,
    ) -> ApiResult<reqwest::Response> {
        // Resolve the credential first: an unauthenticated call must fail
        // without touching the network.
        let token = if authed {
            Some(self.credential()?)
        } else {
            None
        };

        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);
        let mut req = client.request(method, url);
        req = Self::with_auth_header(req, token);

        if let Some(b) = body {
            req = req.json(b);
        }

        let res = req.send().await.map_err(ApiError::network)?;

        if res.status().is_success() {
            Ok(res)
        } else if res.status().as_u16() == 401 {
            Err(ApiError::unauthorized())
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, "Request failed"))
        }
    }

    async fn request_json<T: serde::de::DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&impl serde::Serialize>,
        authed: bool,
    ) -> ApiResult<T> {
        let res = self.send(method, path, body, authed).await?;
        res.json().await.map_err(ApiError::parse)
    }

    /// For endpoints whose acknowledgment body carries nothing we use.
    async fn request_unit(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&impl serde::Serialize>,
        authed: bool,
    ) -> ApiResult<()> {
        self.send(method, path, body, authed).await.map(|_| ())
    }

    fn note_path(id: &str) -> String {
        format!("/api/notes/{}", urlencoding::encode(id))
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        self.request_json(
            reqwest::Method::POST,
            "/auth/login",
            Some(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            }),
            false,
        )
        .await
    }

    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> ApiResult<SignupResponse> {
        self.request_json(
            reqwest::Method::POST,
            "/auth/signup",
            Some(&SignupRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            }),
            false,
        )
        .await
    }

    /// Fetch every note belonging to the signed-in account.
    pub async fn get_notes(&self) -> ApiResult<Vec<Note>> {
        self.request_json(reqwest::Method::GET, "/api/notes", None::<&()>, true)
            .await
    }

    pub async fn get_note(&self, id: &str) -> ApiResult<Note> {
        self.request_json(reqwest::Method::GET, &Self::note_path(id), None::<&()>, true)
            .await
    }

    pub async fn create_note(&self, req: &SaveNoteRequest) -> ApiResult<Note> {
        self.request_json(reqwest::Method::POST, "/api/notes", Some(req), true)
            .await
    }

    pub async fn update_note(&self, id: &str, req: &SaveNoteRequest) -> ApiResult<Note> {
        self.request_json(reqwest::Method::PUT, &Self::note_path(id), Some(req), true)
            .await
    }

    pub async fn delete_note(&self, id: &str) -> ApiResult<()> {
        self.request_unit(
            reqwest::Method::DELETE,
            &Self::note_path(id),
            None::<&()>,
            true,
        )
        .await
    }

    /// Pin/unpin a note. Returns the updated record; callers still reload
    /// afterwards so the cache matches server truth.
    pub async fn set_note_pinned(&self, id: &str, pinned: bool) -> ApiResult<Note> {
        self.request_json(
            reqwest::Method::PATCH,
            &format!("{}/pin", Self::note_path(id)),
            Some(&SetPinnedRequest { pinned }),
            true,
        )
        .await
    }

    pub async fn suggest_title(&self, content: &str) -> ApiResult<String> {
        let res: SuggestTitleResponse = self
            .request_json(
                reqwest::Method::POST,
                "/api/gemini/suggest-title",
                Some(&AiTextRequest {
                    content: content.to_string(),
                }),
                false,
            )
            .await?;
        Ok(res.title)
    }

    pub async fn summarize(&self, content: &str) -> ApiResult<String> {
        let res: SummarizeResponse = self
            .request_json(
                reqwest::Method::POST,
                "/api/gemini/summarize",
                Some(&AiTextRequest {
                    content: content.to_string(),
                }),
                false,
            )
            .await?;
        Ok(res.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_client_new() {
        let client = ApiClient::new("http://localhost:5000".to_string());
        assert_eq!(client.base_url, "http://localhost:5000");
        assert!(client.token.is_none());
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_credential_fails_before_network_when_signed_out() {
        let client = ApiClient::new("http://localhost:5000".to_string());
        let err = client.credential().expect_err("no identity, no credential");
        assert_eq!(err.kind, ApiErrorKind::AuthRequired);
        assert!(err.status.is_none());
    }

    #[test]
    fn test_credential_is_fresh_per_call() {
        let mut client = ApiClient::new("http://localhost:5000".to_string());
        client.set_token("t1".to_string());
        assert_eq!(client.credential().expect("token set"), "t1");
        client.set_token("t2".to_string());
        assert_eq!(client.credential().expect("token replaced"), "t2");
    }

    #[test]
    fn test_bearer_header_shape() {
        assert_eq!(ApiClient::bearer_header("my-jwt"), "Bearer my-jwt");
    }

    #[test]
    fn test_note_path_encodes_id() {
        assert_eq!(ApiClient::note_path("a b/c"), "/api/notes/a%20b%2Fc");
    }

    #[test]
    fn test_extract_error_message_json_body() {
        assert_eq!(extract_error_message(r#"{"message": "Note not found"}"#), "Note not found");
    }

    #[test]
    fn test_extract_error_message_plain_body() {
        assert_eq!(extract_error_message("  internal error \n"), "internal error");
    }

    #[test]
    fn test_http_error_carries_status_and_message() {
        let err = ApiError::http(
            reqwest::StatusCode::NOT_FOUND,
            r#"{"message": "Note not found"}"#.to_string(),
            "Request failed",
        );
        assert_eq!(err.kind, ApiErrorKind::Http);
        assert_eq!(err.status, Some(404));
        assert!(err.message.contains("Note not found"));
    }

    #[test]
    fn test_unauthorized_error_is_401() {
        let err = ApiError::unauthorized();
        assert_eq!(err.kind, ApiErrorKind::Unauthorized);
        assert_eq!(err.status, Some(401));
    }

    #[test]
    fn test_login_response_contract_deserialize() {
        let json = r#"{
            "token": "jwt-token",
            "user": {"uid": "u1", "email": "u@example.com", "name": "U"}
        }"#;
        let parsed: LoginResponse = serde_json::from_str(json).expect("login response should parse");
        assert_eq!(parsed.token, "jwt-token");
        assert!(parsed.user.extra.is_object());
    }

    #[test]
    fn test_save_note_request_skips_absent_summary() {
        let req = SaveNoteRequest {
            title: "t".to_string(),
            content: "c".to_string(),
            category: Some(Category::Ideas),
            summary: None,
        };
        let v = serde_json::to_value(req).expect("should serialize");
        assert_eq!(v["category"], "Ideas");
        assert!(v.get("summary").is_none());
    }

    #[test]
    fn test_ai_response_contracts_tolerate_missing_fields() {
        let t: SuggestTitleResponse = serde_json::from_str("{}").expect("should parse");
        assert_eq!(t.title, "");
        let s: SummarizeResponse =
            serde_json::from_str(r#"{"summary": "short"}"#).expect("should parse");
        assert_eq!(s.summary, "short");
    }

    #[test]
    fn test_note_list_contract_deserialize() {
        let json = r#"[
            {"_id": "1", "title": "Trip", "content": "beach", "category": "Personal",
             "createdAt": "2024-01-01T00:00:00.000Z"},
            {"_id": "2", "title": "Work plan", "content": "launch", "category": "Work",
             "createdAt": "2024-01-02T00:00:00.000Z", "pinned": true}
        ]"#;
        let notes: Vec<Note> = serde_json::from_str(json).expect("note list should parse");
        assert_eq!(notes.len(), 2);
        assert!(!notes[0].pinned);
        assert!(notes[1].pinned);
    }
}
