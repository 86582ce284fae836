//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use windlytics::config::ServiceConfig;
use windlytics::error::ServiceError;
use windlytics::geo::GeoPoint;
use windlytics::placement::{PlacementId, PlacementStore, Toggle};
use windlytics::service::{YieldReport, YieldRequest, YieldService};

/// Adds an untyped-then-typed placement at `(lat, lng)`.
pub fn add_typed(store: &mut PlacementStore, lat: f64, lng: f64, model: &str) -> PlacementId {
    let Toggle::Added(id) = store.toggle_at(GeoPoint::new(lat, lng)) else {
        panic!("expected ({lat}, {lng}) to add a placement");
    };
    store
        .set_type(id, Some(model.to_string()))
        .expect("freshly added placement exists");
    id
}

/// One scripted reply of [`FakeYieldService`].
pub enum Reply {
    Total(f64),
    Fail(ServiceError),
}

/// Replies from a queue in call order and records every request.
///
/// Once the queue is exhausted every call fails with a transport error.
#[derive(Default)]
pub struct FakeYieldService {
    replies: RefCell<VecDeque<Reply>>,
    pub calls: RefCell<Vec<YieldRequest>>,
}

impl FakeYieldService {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl YieldService for FakeYieldService {
    fn simulate(&self, request: &YieldRequest) -> Result<YieldReport, ServiceError> {
        self.calls.borrow_mut().push(request.clone());
        match self.replies.borrow_mut().pop_front() {
            Some(Reply::Total(total)) => Ok(YieldReport {
                daily_energies: Vec::new(),
                total_energy_mwh: Some(total),
            }),
            Some(Reply::Fail(err)) => Err(err),
            None => Err(ServiceError::Transport {
                message: "no scripted reply".to_string(),
            }),
        }
    }
}

/// A canned HTTP response.
pub struct CannedResponse {
    pub status: u16,
    pub body: String,
}

impl CannedResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Minimal loopback HTTP server answering one connection per canned response.
pub struct LoopbackServer {
    pub addr: SocketAddr,
    /// Request bodies received, in arrival order.
    pub requests: Arc<Mutex<Vec<(String, String)>>>,
    handle: Option<JoinHandle<()>>,
}

impl LoopbackServer {
    pub fn start(responses: Vec<CannedResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
        let addr = listener.local_addr().expect("local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        let handle = thread::spawn(move || {
            for response in responses {
                let Ok((stream, _)) = listener.accept() else {
                    return;
                };
                let mut reader = BufReader::new(stream);
                let mut request_line = String::new();
                if reader.read_line(&mut request_line).unwrap_or(0) == 0 {
                    continue;
                }
                let path = request_line
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or_default()
                    .to_string();

                let mut content_length = 0usize;
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
                        break;
                    }
                    if let Some((name, value)) = line.split_once(':') {
                        if name.eq_ignore_ascii_case("content-length") {
                            content_length = value.trim().parse().unwrap_or(0);
                        }
                    }
                }
                let mut body = vec![0u8; content_length];
                if reader.read_exact(&mut body).is_err() {
                    continue;
                }
                seen.lock()
                    .expect("request log")
                    .push((path, String::from_utf8_lossy(&body).into_owned()));

                let reply = format!(
                    "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    response.status,
                    response.body.len(),
                    response.body
                );
                let mut stream = reader.into_inner();
                let _ = stream.write_all(reply.as_bytes());
                let _ = stream.flush();
            }
        });

        Self {
            addr,
            requests,
            handle: Some(handle),
        }
    }

    /// Service config pointing both endpoints at this server.
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            yield_url: format!("http://{}/generated-energy", self.addr),
            generation_url: format!("http://{}/generate-placements", self.addr),
            timeout_ms: 5_000,
        }
    }

    /// Waits for the server thread to finish its scripted responses.
    pub fn join(mut self) -> Vec<(String, String)> {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        self.requests.lock().expect("request log").clone()
    }
}
