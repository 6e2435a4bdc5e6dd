//! Identicon HTTP server.
//!
//! # Routes
//!
//! | URL                     | Response                          |
//! |-------------------------|-----------------------------------|
//! | `/<hash>.svg`           | document                          |
//! | `/<hash>.json`          | inspection JSON                   |
//! | `/text/<text>.svg`      | document for the digest of `text` |
//! | `/events`               | event stream of served documents  |
//!
//! Invalid hashes get 400, everything else 404.

mod lifecycle;
mod response;
mod route;

use crate::{
    config::{AppConfig, cfg},
    debug,
    identicon::{DocumentCache, IdenticonError, IdenticonGenerator},
    log,
    sse::{Event, EventHub},
    utils::{hash::digest_text, mime::types::JSON},
};
use anyhow::{Context, Result};
use response::Reply;
use route::Route;
use serde::Serialize;
use std::sync::Arc;
use std::thread;
use tiny_http::{Request, Server};

/// Worker threads for ordinary requests. Event streams run on their own threads.
const REQUEST_THREADS: usize = 4;

/// Shared by every request handler.
struct ServerState {
    generator: IdenticonGenerator,
    cache: Option<DocumentCache>,
    hub: Arc<EventHub>,
}

/// Announced on `/events` for each served document.
#[derive(Debug, Serialize)]
struct RenderNotice<'a> {
    hash: &'a str,
    cached: bool,
}

impl ServerState {
    fn new(config: &AppConfig) -> Self {
        let cache = config
            .serve
            .cache
            .then(|| DocumentCache::new(config.serve.cache_capacity));

        Self {
            generator: IdenticonGenerator::new(config.identicon.clone()),
            cache,
            hub: Arc::new(EventHub::new()),
        }
    }

    /// Resolve every route except `/events`.
    fn resolve(&self, route: &Route) -> Reply {
        let result = match route {
            Route::Svg(hash) => self.document(hash),
            Route::Text(text) => self.document(&digest_text(text)),
            Route::Json(hash) => self.inspection(hash),
            Route::Events | Route::NotFound => return Reply::not_found(),
        };

        match result {
            Ok(reply) => reply,
            Err(e) if e.is_bad_input() => Reply::bad_request(&e),
            Err(e) => Reply::internal_error(&e.into()),
        }
    }

    fn document(&self, hash: &str) -> Result<Reply, IdenticonError> {
        let hash = hash.to_ascii_lowercase();
        let format = self.generator.config().format;

        let reply = match &self.cache {
            Some(cache) => {
                let (document, hit) = cache.get_or_render(&self.generator, &hash)?;
                self.announce(&hash, hit);
                Reply::ok(format.mime(), &*document).with_cache(hit)
            }
            None => {
                let document = self.generator.render(&hash)?;
                self.announce(&hash, false);
                Reply::ok(format.mime(), document)
            }
        };
        Ok(reply)
    }

    fn inspection(&self, hash: &str) -> Result<Reply, IdenticonError> {
        let hash = hash.to_ascii_lowercase();
        let inspection = self.generator.inspect(&hash, false)?;
        Ok(match serde_json::to_string(&inspection) {
            Ok(json) => Reply::ok(JSON, json),
            Err(e) => Reply::internal_error(&e.into()),
        })
    }

    fn announce(&self, hash: &str, cached: bool) {
        match Event::json(&RenderNotice { hash, cached }) {
            Ok(event) => {
                let reached = self.hub.publish(event.with_event("render"));
                debug!("serve"; "{} ({}), {} listening", hash, if cached { "hit" } else { "miss" }, reached);
            }
            Err(e) => log!("serve"; "failed to encode event: {}", e),
        }
    }
}

/// Bind and serve until Ctrl+C.
pub fn serve() -> Result<()> {
    let config = cfg();
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    let state = Arc::new(ServerState::new(&config));

    lifecycle::register_server_for_shutdown(Arc::clone(&server), Arc::clone(&state.hub));
    log!("serve"; "http://{}", addr);

    run_request_loop(&server, &state)?;
    state.hub.close();
    Ok(())
}

fn run_request_loop(server: &Server, state: &Arc<ServerState>) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_THREADS)
        .build()
        .context("failed to create request thread pool")?;

    for request in server.incoming_requests() {
        let state = Arc::clone(state);

        // Streams stay open indefinitely and would starve the pool
        if !crate::core::is_shutdown() && Route::parse(request.url()) == Route::Events {
            let subscription = state.hub.subscribe();
            thread::spawn(move || {
                if let Err(e) = response::respond_events(request, subscription) {
                    log!("serve"; "event stream error: {e}");
                }
            });
            continue;
        }

        pool.spawn(move || {
            if let Err(e) = handle_request(request, &state) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, state: &ServerState) -> Result<()> {
    // Early exit if shutdown requested
    if crate::core::is_shutdown() {
        return response::send(request, Reply::unavailable());
    }

    let route = Route::parse(request.url());
    let reply = state.resolve(&route);
    if reply.status >= 400 {
        debug!("serve"; "{} {} -> {}", request.method(), request.url(), reply.status);
    }
    response::send(request, reply)
}
