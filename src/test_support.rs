//! A throwaway content host for tests: an axum router on an ephemeral port
//! serving an in-memory `posts.json` and post bodies.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use tokio::{net::TcpListener, task::JoinHandle};

use crate::config::SourceConfig;
use crate::models::Post;
use crate::source::ContentHost;

pub fn post(filename: &str, date: &str, deleted: bool) -> Post {
    Post {
        title: filename.to_uppercase(),
        date: date.to_string(),
        filename: filename.to_string(),
        deleted,
        content: None,
    }
}

pub fn source_config(addr: SocketAddr) -> SourceConfig {
    SourceConfig {
        base_url: format!("http://{addr}"),
        owner: "owner".to_string(),
        repo: "repo".to_string(),
        branch: "main".to_string(),
        path: "blogs".to_string(),
        timeout_secs: 5,
    }
}

/// A client aimed at a port nothing listens on.
pub fn unreachable_host() -> ContentHost {
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .unwrap();
    ContentHost::new(&source_config(addr)).unwrap()
}

#[derive(Default)]
struct Files {
    by_name: HashMap<String, String>,
    requested: Mutex<Vec<String>>,
}

#[derive(Default)]
pub struct FakeHost {
    files: Files,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(self, json: &str) -> Self {
        self.file("posts.json", json)
    }

    pub fn file(mut self, name: &str, body: &str) -> Self {
        self.files.by_name.insert(name.to_string(), body.to_string());
        self
    }

    pub async fn spawn(self) -> RunningHost {
        let files = Arc::new(self.files);
        let app = Router::new()
            .route("/{*path}", get(serve_file))
            .with_state(files.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        RunningHost { addr, files, task }
    }
}

async fn serve_file(
    Path(path): Path<String>,
    State(files): State<Arc<Files>>,
) -> Result<String, StatusCode> {
    let name = path.rsplit('/').next().unwrap_or_default().to_string();
    files.requested.lock().unwrap().push(name.clone());
    files.by_name.get(&name).cloned().ok_or(StatusCode::NOT_FOUND)
}

pub struct RunningHost {
    addr: SocketAddr,
    files: Arc<Files>,
    task: JoinHandle<()>,
}

impl RunningHost {
    pub fn source(&self) -> SourceConfig {
        source_config(self.addr)
    }

    pub fn client(&self) -> ContentHost {
        ContentHost::new(&self.source()).unwrap()
    }

    pub fn requested(&self, name: &str) -> bool {
        self.files.requested.lock().unwrap().iter().any(|n| n == name)
    }
}

impl Drop for RunningHost {
    fn drop(&mut self) {
        self.task.abort();
    }
}
