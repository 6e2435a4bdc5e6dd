//! HTTP response handlers.

use crate::sse::Subscription;
use crate::utils::mime::types::{EVENT_STREAM, PLAIN};
use anyhow::Result;
use std::io::Write;
use tiny_http::{Header, Method, Request, Response, StatusCode};

/// Header reporting whether a document came from the cache.
const CACHE_HEADER: &str = "X-Hashicon-Cache";

/// A fully resolved response, independent of the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    /// `Some(hit)` when the document passed through the cache.
    pub cache: Option<bool>,
}

impl Reply {
    pub fn ok(content_type: &'static str, body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type,
            body: body.into(),
            cache: None,
        }
    }

    pub fn bad_request(message: impl std::fmt::Display) -> Self {
        Self::plain(400, format!("400 Bad Request: {message}"))
    }

    pub fn not_found() -> Self {
        Self::plain(404, "404 Not Found")
    }

    /// Server shutting down.
    pub fn unavailable() -> Self {
        Self::plain(503, "503 Service Unavailable")
    }

    pub fn internal_error(error: &anyhow::Error) -> Self {
        Self::plain(500, format!("500 Internal Server Error: {error:#}"))
    }

    pub fn with_cache(mut self, hit: bool) -> Self {
        self.cache = Some(hit);
        self
    }

    fn plain(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: PLAIN,
            body: body.into(),
            cache: None,
        }
    }
}

/// Send a reply. HEAD requests get the headers only.
pub fn send(request: Request, reply: Reply) -> Result<()> {
    let mut headers = vec![make_header("Content-Type", reply.content_type)];
    if let Some(hit) = reply.cache {
        headers.push(make_header(CACHE_HEADER, if hit { "hit" } else { "miss" }));
    }

    if is_head_request(&request) {
        let mut response = Response::empty(StatusCode(reply.status));
        for header in headers {
            response.add_header(header);
        }
        request.respond(response)?;
        return Ok(());
    }

    let mut response =
        Response::from_data(reply.body.into_bytes()).with_status_code(StatusCode(reply.status));
    for header in headers {
        response.add_header(header);
    }
    request.respond(response)?;
    Ok(())
}

/// Status line and headers opening an event stream.
pub fn event_stream_head() -> String {
    format!(
        "HTTP/1.1 200 OK\r\n\
         Content-Type: {EVENT_STREAM}\r\n\
         Cache-Control: no-cache\r\n\
         Connection: keep-alive\r\n\
         \r\n"
    )
}

/// Stream events on the raw connection until the hub closes or the client
/// disconnects. Blocks the calling thread.
pub fn respond_events(request: Request, subscription: Subscription) -> Result<()> {
    let mut writer = request.into_writer();
    writer.write_all(event_stream_head().as_bytes())?;
    writer.flush()?;

    match subscription.pump(&mut *writer) {
        Ok(()) => Ok(()),
        // Client went away
        Err(e) if is_disconnect(&e) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn is_disconnect(error: &std::io::Error) -> bool {
    use std::io::ErrorKind::{BrokenPipe, ConnectionAborted, ConnectionReset};
    matches!(error.kind(), BrokenPipe | ConnectionAborted | ConnectionReset)
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    Header::from_bytes(key, value).unwrap()
}
