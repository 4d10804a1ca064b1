//! Development server with live reload
//!
//! The index routes are rendered per request from an in-memory snapshot of
//! the blog, so each request starts from a fresh page load with its own
//! drafts flag. Everything else is served from the public directory.

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{Request, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tower_http::services::ServeDir;

use crate::config::SiteConfig;
use crate::content::loader::ContentLoader;
use crate::content::PostRecord;
use crate::filter::{PostFilter, VisibilityFlag};
use crate::generator::Generator;
use crate::helpers::url_for;
use crate::page::{index_path, IndexPage};
use crate::Blog;

/// Live reload script injected into HTML pages
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
</body>
"#;

/// Everything an index request needs, replaced wholesale on rebuild
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub config: SiteConfig,
    pub filter: PostFilter,
    pub posts: Vec<PostRecord>,
}

impl Snapshot {
    pub fn load(blog: &Blog) -> Result<Self> {
        Ok(Self {
            config: blog.config.clone(),
            filter: PostFilter::from_config(&blog.config.index)?,
            posts: ContentLoader::new(blog).load_posts()?,
        })
    }

    /// Render the index as a fresh page load with the given flag.
    /// `None` when the policy has no page for that flag.
    pub fn render_index(&self, flag: VisibilityFlag) -> Option<String> {
        if flag.includes_drafts() && !self.filter.uses_flag() {
            return None;
        }

        let mut page = IndexPage::new(&self.config, &self.filter, &self.posts);
        page.toggle(flag.includes_drafts());
        Some(page.render())
    }
}

/// Server state
struct ServerState {
    public_dir: PathBuf,
    root: String,
    snapshot: RwLock<Snapshot>,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

/// Start the development server
pub async fn start(blog: &Blog, ip: &str, port: u16, watch: bool) -> Result<()> {
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let state = Arc::new(ServerState {
        public_dir: blog.public_dir.clone(),
        root: blog.config.root.clone(),
        snapshot: RwLock::new(Snapshot::load(blog)?),
        reload_tx,
        live_reload: watch,
    });

    let home = url_for(&blog.config, index_path(VisibilityFlag::new(false)));
    let drafts = url_for(&blog.config, index_path(VisibilityFlag::new(true)));

    let app = Router::new()
        .route("/__livereload", get(livereload_handler))
        .route(&home, get(home_handler))
        .route(&drafts, get(drafts_handler))
        .fallback(fallback_handler)
        .with_state(state.clone());

    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}{}", ip, port, home);
    if watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if watch {
        let base_dir = blog.base_dir.clone();
        let state = state.clone();
        // The debouncer hands events over a std channel, so the loop blocks
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_reload(base_dir, state) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Rebuild the site and the snapshot after changes, then tell browsers to reload
fn watch_and_reload(base_dir: PathBuf, state: Arc<ServerState>) -> Result<()> {
    let blog = Blog::new(&base_dir)?;
    let (tx, rx) = std::sync::mpsc::channel();

    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    if blog.source_dir.exists() {
        debouncer
            .watcher()
            .watch(&blog.source_dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", blog.source_dir);
    }

    let config_path = blog.config_path();
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events.iter().any(|e| {
                    let path = e.path.to_string_lossy();
                    !path.contains(".git") && !path.contains(".DS_Store") && !path.ends_with('~')
                });
                if !relevant {
                    continue;
                }

                for event in &events {
                    tracing::info!("File changed: {}", event.path.display());
                }

                match rebuild(&base_dir) {
                    Ok(snapshot) => {
                        *state.snapshot.blocking_write() = snapshot;
                        tracing::info!("Regenerated successfully");
                        let _ = state.reload_tx.send(());
                    }
                    Err(e) => tracing::error!("Generation failed: {}", e),
                }
            }
            Ok(Err(e)) => tracing::error!("Watch error: {:?}", e),
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

fn rebuild(base_dir: &Path) -> Result<Snapshot> {
    let blog = Blog::new(base_dir)?;
    let snapshot = Snapshot::load(&blog)?;
    Generator::new(&blog)?.generate(&snapshot.posts)?;
    Ok(snapshot)
}

async fn home_handler(State(state): State<Arc<ServerState>>) -> Response {
    render_index(&state, VisibilityFlag::new(false)).await
}

async fn drafts_handler(State(state): State<Arc<ServerState>>) -> Response {
    render_index(&state, VisibilityFlag::new(true)).await
}

async fn render_index(state: &ServerState, flag: VisibilityFlag) -> Response {
    let html = state.snapshot.read().await.render_index(flag);
    match html {
        Some(html) if state.live_reload => Html(inject_live_reload(&html)).into_response(),
        Some(html) => Html(html).into_response(),
        None => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Path of a request relative to the public directory.
///
/// Pages link through `root`, but the public directory is laid out without
/// it. `None` for requests outside `root`.
fn public_path<'a>(root: &str, request_path: &'a str) -> Option<&'a str> {
    let root = root.trim_end_matches('/');
    let rest = request_path.strip_prefix(root)?;

    if rest.is_empty() || rest.starts_with('/') {
        Some(rest.trim_start_matches('/'))
    } else {
        None
    }
}

/// Serve generated files, injecting the live reload script into HTML
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    mut request: Request<Body>,
) -> Response {
    let Some(path) = public_path(&state.root, request.uri().path()).map(str::to_string) else {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };

    let candidate = state.public_dir.join(&path);
    let file_path = if candidate.is_dir() {
        candidate.join("index.html")
    } else {
        candidate
    };

    let is_html = file_path
        .extension()
        .map(|ext| ext == "html" || ext == "htm")
        .unwrap_or(false);

    if is_html && state.live_reload {
        match tokio::fs::read_to_string(&file_path).await {
            Ok(content) => Html(inject_live_reload(&content)).into_response(),
            Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        }
    } else {
        let rewritten = match request.uri().query() {
            Some(query) => format!("/{}?{}", path, query),
            None => format!("/{}", path),
        };
        match rewritten.parse::<Uri>() {
            Ok(uri) => *request.uri_mut() = uri,
            Err(_) => return (StatusCode::BAD_REQUEST, "Bad request").into_response(),
        }

        let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
        match service.try_call(request).await {
            Ok(response) => response.into_response(),
            Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
        }
    }
}

/// Inject live reload script into HTML content
fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replacen("</body>", LIVE_RELOAD_SCRIPT, 1)
    } else {
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
    }
}
