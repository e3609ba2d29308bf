use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use notify_debouncer_full::{
    new_debouncer,
    notify::{Error as NotifyError, RecursiveMode, Watcher},
    DebouncedEvent,
};
use tracing::{debug, error, info};

use crate::content_loader::reload_templates;
use crate::state::{AppState, RefreshBroadcaster};

const DEBOUNCE: Duration = Duration::from_millis(200);

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(tx): State<RefreshBroadcaster>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, tx))
}

async fn handle_socket(mut socket: WebSocket, tx: RefreshBroadcaster) {
    let mut rx = tx.subscribe();

    if rx.recv().await.is_ok()
        && socket
            .send(Message::Text("reload".to_string().into()))
            .await
            .is_err()
    {
        debug!("Client disconnected before reload message could be sent");
    }
}

/// Emacs lock files (`.#name`) and backups (`name~`).
fn is_editor_temp_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|s| s.starts_with(".#") || s.ends_with('~'))
}

fn is_relevant(event: &DebouncedEvent) -> bool {
    let kind = &event.kind;
    (kind.is_modify() || kind.is_create() || kind.is_remove())
        && !event.event.paths.iter().any(|p| is_editor_temp_file(p))
}

/// Watches the local content directory; on change, reloads the site
/// templates and tells connected browsers to refresh.
pub fn start_content_watcher(tx: RefreshBroadcaster, app_state: Arc<AppState>) {
    let content_dir: PathBuf = app_state.config.content_dir.clone();
    info!(dir = %content_dir.display(), "Starting content watcher for hot-reload...");

    tokio::spawn(async move {
        let (watcher_tx, mut watcher_rx) = tokio::sync::mpsc::channel(1);

        let debouncer = new_debouncer(
            DEBOUNCE,
            None,
            move |res: Result<Vec<DebouncedEvent>, Vec<NotifyError>>| match res {
                Ok(events) => {
                    let changed: Vec<_> = events
                        .iter()
                        .filter(|e| is_relevant(e))
                        .flat_map(|e| &e.event.paths)
                        .collect();
                    if !changed.is_empty() {
                        debug!("Relevant file change detected: {:?}", changed);
                        if let Err(e) = watcher_tx.blocking_send(()) {
                            error!("Failed to send watcher event: {}", e);
                        }
                    }
                }
                Err(errors) => {
                    for e in errors {
                        error!("Watcher error: {}", e);
                    }
                }
            },
        );
        let mut debouncer = match debouncer {
            Ok(d) => d,
            Err(e) => {
                error!("Failed to create debouncer: {}", e);
                return;
            }
        };

        if let Err(e) = debouncer
            .watcher()
            .watch(&content_dir, RecursiveMode::Recursive)
        {
            error!(dir = %content_dir.display(), "Failed to watch content directory: {}", e);
            return;
        }

        while watcher_rx.recv().await.is_some() {
            info!("Content change detected, reloading templates and sending signal...");

            reload_templates(&app_state).await;

            // No receivers just means no browser tab is open.
            if tx.send(()).is_err() {
                debug!("No websocket clients to notify");
            }
        }
    });
}
