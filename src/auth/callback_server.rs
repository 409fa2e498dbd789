use crate::error::AuthError;
use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};

/// Query parameters of the OAuth redirect
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorizationResponse {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

type CallbackSender = Arc<Mutex<Option<oneshot::Sender<AuthorizationResponse>>>>;

/// Running redirect listener
pub struct CallbackServer {
    pub redirect_uri: String,
    pub receiver: oneshot::Receiver<AuthorizationResponse>,
    _shutdown: ShutdownOnDrop,
}

/// Stops the listener when dropped
struct ShutdownOnDrop(Option<oneshot::Sender<()>>);

impl Drop for ShutdownOnDrop {
    fn drop(&mut self) {
        if let Some(shutdown) = self.0.take() {
            let _ = shutdown.send(());
        }
    }
}

/// Listen on 127.0.0.1:`port` for a single `/callback` redirect
///
/// Port 0 picks a free port; `redirect_uri` reports the one bound.
/// The server stops when the returned handle is dropped.
pub async fn start_callback_server(port: u16) -> Result<CallbackServer, AuthError> {
    let (tx, rx) = oneshot::channel();
    let sender: CallbackSender = Arc::new(Mutex::new(Some(tx)));

    let app = Router::new()
        .route("/callback", get(handle_callback))
        .with_state(sender);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .map_err(|e| AuthError::CallbackServer(e.to_string()))?;
    let bound = listener
        .local_addr()
        .map_err(|e| AuthError::CallbackServer(e.to_string()))?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await;
        if let Err(e) = result {
            tracing::warn!(error = %e, "Sign-in callback server stopped with error");
        }
    });

    tracing::debug!(port = bound.port(), "Sign-in callback server listening");

    Ok(CallbackServer {
        redirect_uri: format!("http://127.0.0.1:{}/callback", bound.port()),
        receiver: rx,
        _shutdown: ShutdownOnDrop(Some(shutdown_tx)),
    })
}

async fn handle_callback(
    State(sender): State<CallbackSender>,
    Query(params): Query<AuthorizationResponse>,
) -> Html<&'static str> {
    let denied = params.error.is_some();
    if let Some(tx) = sender.lock().await.take() {
        let _ = tx.send(params);
    }

    if denied {
        Html(SIGN_IN_FAILED_PAGE)
    } else {
        Html(SIGN_IN_DONE_PAGE)
    }
}

const SIGN_IN_DONE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>GunIQ sign-in</title></head>
<body style="font-family: sans-serif; background: #171717; color: #f5f5f5; text-align: center; padding-top: 20vh">
    <h1 style="color: #4ade80">Signed in</h1>
    <p>You can close this window and return to the terminal.</p>
</body>
</html>
"#;

const SIGN_IN_FAILED_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>GunIQ sign-in</title></head>
<body style="font-family: sans-serif; background: #171717; color: #f5f5f5; text-align: center; padding-top: 20vh">
    <h1 style="color: #f87171">Sign-in cancelled</h1>
    <p>You can close this window and return to the terminal.</p>
</body>
</html>
"#;
