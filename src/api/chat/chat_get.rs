#![forbid(unsafe_code)]

use std::sync::Arc;

use poem::{http::Method, Endpoint, IntoResponse, Request, Response};
use poem_openapi::{ OpenApi, payload::PlainText, param::Path, ApiResponse };
use log::error;

use crate::utils::chat_types::{ChatRecord, ChatStore};
use crate::utils::chat_utils::{self, RequestDebug};
use crate::utils::errors::ChatError;

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
/** Serves chat lookups from the store it owns.  The store is handed over
 * at construction and is never mutated by a request.
 */
pub struct GetChatApi {
    store: Arc<ChatStore>,
}

struct ReqGetChat
{
    raw_id: String,
}

// Implement the debug record trait for logging.
impl RequestDebug for ReqGetChat {
    fn get_request_info(&self) -> String {
        let mut s = String::with_capacity(64);
        s.push_str("  Request path:");
        s.push_str("\n    id: ");
        s.push_str(&self.raw_id);
        s
    }
}

// ------------------- HTTP Status Codes -------------------
#[derive(Debug, ApiResponse)]
pub enum ChatResponse {
    // Rendered by render_chat rather than Json<_> so serialization failures surface as 500s.
    #[oai(status = 200, content_type = "application/json")]
    Http200(PlainText<String>),
    #[oai(status = 400)]
    Http400(PlainText<String>),
    #[oai(status = 404)]
    Http404(PlainText<String>),
    #[oai(status = 500)]
    Http500(PlainText<String>),
}

fn make_http_200(body: String) -> ChatResponse {
    ChatResponse::Http200(PlainText(body))
}
fn make_http_400(msg: String) -> ChatResponse {
    ChatResponse::Http400(PlainText(msg))
}
fn make_http_404(msg: String) -> ChatResponse {
    ChatResponse::Http404(PlainText(msg))
}
fn make_http_500(msg: String) -> ChatResponse {
    ChatResponse::Http500(PlainText(msg))
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl GetChatApi {
    #[oai(path = "/chat/:id", method = "get")]
    async fn get_chat_api(&self, http_req: &Request, id: Path<String>) -> ChatResponse {
        // Package the request parameters.
        let req = ReqGetChat { raw_id: id.0 };

        // Conditional logging depending on log level.
        chat_utils::debug_request(http_req, &req);

        process(&self.store, &req)
    }
}

// ***************************************************************************
//                          Request/Response Methods
// ***************************************************************************
impl GetChatApi {
    pub fn new(store: Arc<ChatStore>) -> Self {
        GetChatApi { store }
    }
}

// ***************************************************************************
//                          Unrouted Chat Paths
// ***************************************************************************
// ---------------------------------------------------------------------------
// get_unrouted_chat:
// ---------------------------------------------------------------------------
/** The router only matches /chat/:id when the id is a single non-empty
 * segment.  GET requests for /chat/ or /chat/1/2 carry a token the router
 * can't bind, so they are resolved here through the same lookup and get
 * the same parse error as any other malformed id.  Everything else passes
 * through to the wrapped endpoint.
 */
pub async fn get_unrouted_chat<E: Endpoint>(ep: Arc<E>, req: Request, store: Arc<ChatStore>)
-> poem::Result<Response> {
    match unrouted_chat_token(&req) {
        Some(raw_id) => {
            let chat_req = ReqGetChat { raw_id };
            chat_utils::debug_request(&req, &chat_req);
            Ok(process(&store, &chat_req).into_response())
        },
        None => ep.call(req).await.map(IntoResponse::into_response),
    }
}

// ---------------------------------------------------------------------------
// unrouted_chat_token:
// ---------------------------------------------------------------------------
fn unrouted_chat_token(req: &Request) -> Option<String> {
    if req.method() != Method::GET {
        return None;
    }
    req.uri()
        .path()
        .strip_prefix("/chat/")
        .filter(|rest| rest.is_empty() || rest.contains('/'))
        .map(str::to_string)
}

// ***************************************************************************
//                          Private Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// process:
// ---------------------------------------------------------------------------
/// Resolve the request and map the outcome to its status code.
fn process(store: &ChatStore, req: &ReqGetChat) -> ChatResponse {
    let result = store.lookup(&req.raw_id).and_then(render_chat);
    match result {
        Ok(body) => make_http_200(body),
        Err(e @ ChatError::Parse(_)) => make_http_400(e.to_string()),
        Err(e @ ChatError::NotFound(_)) => make_http_404(e.to_string()),
        Err(e) => {
            let msg = e.to_string();
            error!("ERROR: unable to render chat {}: {}", req.raw_id, msg);
            make_http_500(msg)
        }
    }
}

// ---------------------------------------------------------------------------
// render_chat:
// ---------------------------------------------------------------------------
fn render_chat(chat: &ChatRecord) -> Result<String, ChatError> {
    serde_json::to_string(chat).map_err(|e| ChatError::Render(e.to_string()))
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use poem::http::{Method, StatusCode, Uri};
    use poem::test::TestClient;
    use poem::Request;
    use serde_json::json;

    use super::unrouted_chat_token;

    use crate::api::chat::make_app;
    use crate::utils::chat_types::{ChatRecord, ChatStore};

    fn seeded_client() -> TestClient<poem::Route> {
        TestClient::new(make_app(ChatStore::seeded().unwrap(), "Chat Server", "http://localhost:3000"))
    }

    #[tokio::test]
    async fn first_seeded_chat() {
        let cli = seeded_client();
        let resp = cli.get("/chat/0").send().await;
        resp.assert_status_is_ok();
        resp.assert_content_type("application/json");
        resp.assert_json(json!({"id": 0, "message": "Chat-1!", "IsRead": false})).await;
    }

    #[tokio::test]
    async fn second_seeded_chat() {
        let cli = seeded_client();
        let resp = cli.get("/chat/1").send().await;
        resp.assert_status_is_ok();
        resp.assert_text(r#"{"id":1,"message":"Chat-2","IsRead":true}"#).await;
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let cli = seeded_client();
        for path in ["/chat/5", "/chat/99"] {
            let resp = cli.get(path).send().await;
            resp.assert_status(StatusCode::NOT_FOUND);
            resp.assert_text("No item found.").await;
        }
    }

    #[tokio::test]
    async fn malformed_id_is_bad_request() {
        let cli = seeded_client();
        for path in ["/chat/x", "/chat/abc", "/chat/1.5"] {
            let resp = cli.get(path).send().await;
            resp.assert_status(StatusCode::BAD_REQUEST);
            resp.assert_text("Unable to parse request id.").await;
        }
    }

    #[tokio::test]
    async fn repeated_requests_agree() {
        let cli = seeded_client();
        for _ in 0..3 {
            let resp = cli.get("/chat/1").send().await;
            resp.assert_status_is_ok();
            resp.assert_json(json!({"id": 1, "message": "Chat-2", "IsRead": true})).await;
        }
    }

    #[tokio::test]
    async fn concurrent_requests_do_not_interfere() {
        let cli = seeded_client();
        let (r0, r1) = tokio::join!(cli.get("/chat/0").send(), cli.get("/chat/1").send());
        r0.assert_status_is_ok();
        r1.assert_status_is_ok();
        r0.assert_json(json!({"id": 0, "message": "Chat-1!", "IsRead": false})).await;
        r1.assert_json(json!({"id": 1, "message": "Chat-2", "IsRead": true})).await;
    }

    #[tokio::test]
    async fn serves_the_store_it_was_given() {
        let store = ChatStore::new(vec![
            ChatRecord::new(12, "twelve", true),
            ChatRecord::new(4, "four", false),
        ]).unwrap();
        let cli = TestClient::new(make_app(store, "Chat Server", "http://localhost:3000"));

        let resp = cli.get("/chat/4").send().await;
        resp.assert_status_is_ok();
        resp.assert_json(json!({"id": 4, "message": "four", "IsRead": false})).await;

        let resp = cli.get("/chat/0").send().await;
        resp.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unroutable_tokens_are_bad_requests() {
        let cli = seeded_client();
        for path in ["/chat/", "/chat/1/2", "/chat/0/"] {
            let resp = cli.get(path).send().await;
            resp.assert_status(StatusCode::BAD_REQUEST);
            resp.assert_text("Unable to parse request id.").await;
        }
    }

    #[test]
    fn only_multi_segment_or_empty_tokens_are_unrouted() {
        let req = |method: Method, uri: &'static str| {
            Request::builder().method(method).uri(Uri::from_static(uri)).finish()
        };
        assert_eq!(unrouted_chat_token(&req(Method::GET, "/chat/")), Some(String::new()));
        assert_eq!(unrouted_chat_token(&req(Method::GET, "/chat/1/2")), Some("1/2".to_string()));
        assert_eq!(unrouted_chat_token(&req(Method::GET, "/chat/1")), None);
        assert_eq!(unrouted_chat_token(&req(Method::GET, "/chats/")), None);
        assert_eq!(unrouted_chat_token(&req(Method::POST, "/chat/")), None);
    }

    #[tokio::test]
    async fn no_other_routes() {
        let cli = seeded_client();
        cli.get("/chat").send().await.assert_status(StatusCode::NOT_FOUND);
        cli.get("/other/0").send().await.assert_status(StatusCode::NOT_FOUND);
        cli.post("/chat/0").send().await.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    }
}
