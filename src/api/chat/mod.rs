#![forbid(unsafe_code)]

use std::sync::Arc;

use poem::{EndpointExt, Route};
use poem_openapi::OpenApiService;

use crate::utils::chat_types::ChatStore;
use self::chat_get::{get_unrouted_chat, GetChatApi};

pub mod chat_get;

// From cargo.toml.
const CHAT_VERSION: &str = env!("CARGO_PKG_VERSION");

// ---------------------------------------------------------------------------
// make_app:
// ---------------------------------------------------------------------------
/** Build the route table around the given store.  The API instance and the
 * unrouted path handler share the one immutable collection.
 */
pub fn make_app(store: ChatStore, title: &str, server_url: &str) -> Route {
    let store = Arc::new(store);
    let unrouted_store = store.clone();
    let api_service = OpenApiService::new(GetChatApi::new(store), title, CHAT_VERSION)
        .server(server_url)
        .around(move |ep, req| get_unrouted_chat(ep, req, unrouted_store.clone()));
    Route::new().nest("/", api_service)
}
