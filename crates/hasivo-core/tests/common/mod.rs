//! In-process fake switch built on tiny_http.

use serde_json::Value;
use std::collections::HashMap;
use std::io::Read;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tiny_http::{Header, Response, Server, StatusCode};

pub const SESSION_COOKIE: &str = "sid=fake-session";

/// One request as the fake switch saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub body: Value,
    pub headers: HashMap<String, String>,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

pub struct FakeSwitch {
    pub host: String,
    handle: JoinHandle<Vec<Recorded>>,
}

impl FakeSwitch {
    /// Answer up to `expected` requests. Paths not in `routes` get `200` with
    /// an empty body. The login reply always sets a session cookie.
    pub fn start(expected: usize, routes: &[(&'static str, u16, String)]) -> Self {
        let server = Server::http("127.0.0.1:0").expect("bind fake switch");
        let addr = server.server_addr().to_ip().expect("tcp listener");
        let routes: HashMap<&'static str, (u16, String)> = routes
            .iter()
            .map(|(path, status, body)| (*path, (*status, body.clone())))
            .collect();

        let handle = thread::spawn(move || {
            let mut log = Vec::new();
            while log.len() < expected {
                let mut request = match server.recv_timeout(Duration::from_secs(5)) {
                    Ok(Some(request)) => request,
                    _ => break,
                };

                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let headers = request
                    .headers()
                    .iter()
                    .map(|h| (h.field.to_string().to_ascii_lowercase(), h.value.to_string()))
                    .collect();
                let path = request.url().to_string();

                let (status, reply) = routes
                    .get(path.as_str())
                    .cloned()
                    .unwrap_or((200, String::new()));
                let mut response =
                    Response::from_string(reply).with_status_code(StatusCode(status));
                if path == "/123" {
                    let cookie = Header::from_bytes("Set-Cookie", SESSION_COOKIE)
                        .expect("valid header");
                    response = response.with_header(cookie);
                }

                log.push(Recorded {
                    path,
                    body: serde_json::from_str(&body).unwrap_or(Value::Null),
                    headers,
                });
                let _ = request.respond(response);
            }
            log
        });

        Self {
            host: addr.to_string(),
            handle,
        }
    }

    /// Wait for the server thread and return what it recorded.
    pub fn finish(self) -> Vec<Recorded> {
        self.handle.join().expect("fake switch thread")
    }
}

pub fn paths(log: &[Recorded]) -> Vec<&str> {
    log.iter().map(|r| r.path.as_str()).collect()
}
