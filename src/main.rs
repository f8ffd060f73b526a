#![forbid(unsafe_code)]

use anyhow::Result;
use log::info;
use poem::listener::TcpListener;

// Chat Utilities
use crate::api::chat::make_app;
use crate::utils::chat_types::ChatStore;
use crate::utils::config::{init_chat_dirs, init_runtime_context, ChatDirs, RuntimeCtx, CHAT_ARGS};
use crate::utils::errors::Errors;

// Modules
mod api;
mod utils;

// ***************************************************************************
//                                Constants
// ***************************************************************************
const SERVER_NAME : &str = "ChatServer"; // for poem logging

// ---------------------------------------------------------------------------
// main:
// ---------------------------------------------------------------------------
#[tokio::main]
async fn main() -> Result<()> {
    // --------------- Initialize Server --------------
    // Announce ourselves.
    println!("Starting chat_server!");

    // Create the data directories, possibly stopping right after.
    let chat_dirs = init_chat_dirs()?;
    if CHAT_ARGS.create_dirs_only {
        println!("Data directories created under {}.", chat_dirs.root_dir);
        return Ok(());
    }

    // Read parameters and configure logging.
    let runtime_ctx = chat_init(chat_dirs)?;

    // --------------- Main Loop Set Up ---------------
    // Assign base URL.
    let config = &runtime_ctx.parms.config;
    let chat_url = format!("{}:{}", config.http_addr, config.http_port);

    // The seeded collection is built once here and owned by the api.
    let store = ChatStore::seeded()?;
    let ids: Vec<i32> = store.iter().map(|c| c.id).collect();
    info!("Serving seeded chat ids {:?}.", ids);
    let app = make_app(store, &config.title, &chat_url);

    // ------------------ Main Loop -------------------
    let addr = format!("{}{}", "0.0.0.0:", config.http_port);
    poem::Server::new(TcpListener::bind(addr))
        .name(SERVER_NAME)
        .run(app)
        .await?;
    Ok(())
}

// ***************************************************************************
//                             Private Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// chat_init:
// ---------------------------------------------------------------------------
/** Initialize logging and the runtime context needed to configure the main
 * loop processor.
 */
fn chat_init(chat_dirs: ChatDirs) -> Result<RuntimeCtx> {
    // Logging is configured as part of the runtime context.
    let runtime_ctx = init_runtime_context(chat_dirs)?;
    info!("{}", Errors::InputParms(format!("{:#?}", runtime_ctx)));
    if runtime_ctx.parms.config_file.is_empty() {
        info!("No configuration file installed, using defaults.");
    } else {
        info!("Configuration read from {}.", runtime_ctx.parms.config_file);
    }
    info!("Log files are written under {}.", runtime_ctx.chat_dirs.logs_dir);

    // Log build info.
    print_version_info();
    Ok(runtime_ctx)
}

// ---------------------------------------------------------------------------
// print_version_info:
// ---------------------------------------------------------------------------
fn print_version_info() {
    info!("\n*** Running CHAT={}, BRANCH={}, COMMIT={}, DIRTY={}, SRC_TS={}, RUSTC={}.",
          env!("CARGO_PKG_VERSION"),
          option_env!("GIT_BRANCH").unwrap_or("unknown"),
          option_env!("GIT_COMMIT_SHORT").unwrap_or("unknown"),
          option_env!("GIT_DIRTY").unwrap_or("unknown"),
          option_env!("SOURCE_TIMESTAMP").unwrap_or("unknown"),
          option_env!("RUSTC_VERSION").unwrap_or("unknown"));
}
