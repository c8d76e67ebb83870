// src/main.rs

use axum::{extract::State, routing::get, routing::post, Json, Router};
use erc1155_mcp_server::{
    config::Config,
    mcp::{
        handler::handle_mcp_request,
        protocol::{error_codes, Request, Response},
    },
    token::{Erc1155Service, TokenRegistry},
    wallet::EvmWalletClient,
    AppState,
};
use ethers_core::types::Address;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// --- HTTP Server Logic ---
async fn run_http_server(state: AppState) {
    let api_router = Router::new()
        .route("/health", get(health_handler))
        // JSON-RPC endpoint for MCP tool calls
        .route("/rpc", post(rpc_handler));

    let app = Router::new()
        .nest("/api", api_router)
        .with_state(state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([127, 0, 0, 1], state.config.port));
    info!("HTTP server listening on {}", addr);
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            return;
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        error!("HTTP server error: {}", e);
    }
}

async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "chain_id": state.config.default_chain_id,
        "tokens": state.service.registry().len()
    }))
}

// Forward JSON-RPC requests over HTTP to the MCP handler
async fn rpc_handler(State(state): State<AppState>, Json(req): Json<Request>) -> Json<Response> {
    match handle_mcp_request(req, state).await {
        Some(resp) => Json(resp),
        None => Json(Response::error(
            serde_json::Value::Null,
            error_codes::INVALID_REQUEST,
            "Notifications are not supported over HTTP".into(),
        )),
    }
}

// --- MCP Server Logic ---
async fn run_mcp_server(state: AppState) {
    info!("Starting MCP server on stdin/stdout...");

    let mut stdin = io::BufReader::new(io::stdin());
    let mut stdout = io::stdout();

    loop {
        let mut line = String::new();

        match stdin.read_line(&mut line).await {
            Ok(0) => {
                info!("EOF received, shutting down MCP server");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                debug!("Received: {}", line);

                let response = match serde_json::from_str::<Request>(line) {
                    Ok(request) => handle_mcp_request(request, state.clone()).await,
                    Err(parse_error) => {
                        error!("JSON parse error: {}", parse_error);
                        Some(Response::error(
                            serde_json::Value::Null,
                            error_codes::PARSE_ERROR,
                            format!("Parse error: {}", parse_error),
                        ))
                    }
                };

                if let Some(response) = response {
                    if let Ok(response_json) = serde_json::to_string(&response) {
                        debug!("Sending: {}", response_json);
                        if let Err(e) = stdout
                            .write_all(format!("{}\n", response_json).as_bytes())
                            .await
                        {
                            error!("Failed to write response: {}", e);
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                error!("Failed to read from stdin: {}", e);
                break;
            }
        }
    }

    info!("MCP server shutting down");
}

fn build_state(config: Config) -> anyhow::Result<AppState> {
    use anyhow::Context;

    let registry = match config.token_registry_json.as_deref() {
        Some(json) => TokenRegistry::from_json(json).context("Invalid TOKEN_REGISTRY JSON")?,
        None => TokenRegistry::with_defaults(),
    };
    info!("Token registry loaded with {} tokens", registry.len());

    let rpc_url = config
        .rpc_url_for(config.default_chain_id)
        .with_context(|| {
            format!(
                "CHAIN_RPC_URLS has no entry for DEFAULT_CHAIN_ID {}",
                config.default_chain_id
            )
        })?
        .to_string();

    let signer = match config.tx_private_key.as_deref() {
        Some(key) => Some(
            ethers_signers::LocalWallet::from_str(key).context("Invalid TX_PRIVATE_KEY")?,
        ),
        None => None,
    };
    if signer.is_none() {
        info!("No TX_PRIVATE_KEY set; write tools will be rejected");
    }

    let mut wallet = EvmWalletClient::new(rpc_url, config.default_chain_id, signer);
    if let Some(registry_addr) = config.ens_registry_address.as_deref() {
        let registry_addr = Address::from_str(registry_addr)
            .context("Invalid ENS_REGISTRY_ADDRESS")?;
        wallet = wallet.with_ens_registry(registry_addr);
    }

    let service = Erc1155Service::new(registry, Arc::new(wallet));
    Ok(AppState {
        config,
        service: Arc::new(service),
    })
}

#[tokio::main]
async fn main() {
    // Initialize tracing; logs go to stderr so stdout stays clean for JSON-RPC
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "erc1155_mcp_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            return;
        }
    };

    let app_state = match build_state(config) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize server state: {:#}", e);
            return;
        }
    };

    // Check if running in MCP mode (stdin/stdout) or HTTP server mode
    let args: Vec<String> = env::args().collect();
    if args.contains(&"--mcp".to_string()) || env::var("MCP_MODE").is_ok() {
        run_mcp_server(app_state).await;
    } else {
        run_http_server(app_state).await;
    }
}
