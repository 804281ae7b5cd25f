use hyper::body::Bytes;
use hyper::{Method, Request, StatusCode};
use serde::Serialize;
use std::sync::Arc;

use webdispatch::config::{self, Config};
use webdispatch::server::{self, ConnectionSettings};
use webdispatch::logger::LogWriter;
use webdispatch::{http, logger, ReplyChain, Router, RouterError, StaticDir};

const WELCOME_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>webdispatch</title>
</head>
<body>
    <h1>webdispatch</h1>
    <p>Static files are served under the configured prefixes.</p>
    <p>Service status: <a href="/api/status">/api/status</a></p>
</body>
</html>"#;

#[derive(Serialize)]
struct StatusReport {
    ok: bool,
    service: &'static str,
    version: &'static str,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Build the Tokio runtime, sized by the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let router = build_router(&cfg, None)?;
    let listener = server::bind_listener(addr, cfg.server.backlog)?;

    logger::log_server_start(&addr, &cfg);
    server::serve(
        listener,
        router,
        ConnectionSettings::from(&cfg),
        server::shutdown_signal(),
    )
    .await?;
    Ok(())
}

/// Register the application routes
///
/// Handlers hold a [`ReplyChain`] on the router they are registered on, so
/// their 404s go through the router's status replies.
fn build_router(cfg: &Config, log: Option<LogWriter>) -> Result<Arc<Router>, RouterError> {
    let router = Arc::new(Router::new(log));
    let replies = ReplyChain::new(&router);

    // "/" also covers every unmatched path, so only the root itself gets the page
    let root_replies = replies.clone();
    router.register_default("/", move |req: Request<Bytes>| {
        let replies = root_replies.clone();
        async move {
            if http::request_path(&req) == "/" {
                http::build_html_response(StatusCode::OK, WELCOME_PAGE.to_string())
            } else {
                replies
                    .reply(StatusCode::NOT_FOUND, http::NOT_FOUND_MESSAGE, req)
                    .await
            }
        }
    })?;
    router.register_default("/home", |_req: Request<Bytes>| async {
        http::redirect("/", StatusCode::MOVED_PERMANENTLY)
    })?;
    router.register_default("/api/status", |req: Request<Bytes>| async move {
        if let Err(resp) = http::check_method(&req, &[Method::GET, Method::HEAD]) {
            return resp;
        }
        let report = StatusReport {
            ok: true,
            service: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        };
        http::serve_json(&req, &report, StatusCode::OK)
    })?;

    for route in &cfg.static_routes {
        router.register_default(
            &route.prefix,
            StaticDir::new(&route.dir, cfg.index_files.clone(), replies.clone()),
        )?;
    }

    Ok(router)
}
