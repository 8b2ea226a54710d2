#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;

pub const TOKEN: &str = "test-token-123456";

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or_default()
    }

    pub fn query(&self) -> Option<&str> {
        self.target.split_once('?').map(|(_, query)| query)
    }
}

pub struct MetastoreStub {
    pub endpoint: String,
    requests: Receiver<CapturedRequest>,
}

impl MetastoreStub {
    /// Serves exactly one request with the given status and JSON body.
    pub fn start(status: u16, reason: &str, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
        let addr = listener.local_addr().expect("local addr");
        let reason = reason.to_string();
        let body = body.to_string();
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            if let Ok((stream, _peer)) = listener.accept() {
                let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
                let request = read_request(&mut reader);
                let response = format!(
                    concat!(
                        "HTTP/1.1 {} {}\r\n",
                        "Content-Type: application/json\r\n",
                        "Content-Length: {}\r\n",
                        "Connection: close\r\n\r\n{}",
                    ),
                    status,
                    reason,
                    body.len(),
                    body
                );
                let mut stream = stream;
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
                let _ = tx.send(request);
            }
        });

        Self {
            endpoint: format!("http://{}/v1", addr),
            requests: rx,
        }
    }

    pub fn request(&self) -> CapturedRequest {
        self.requests
            .recv_timeout(Duration::from_secs(10))
            .expect("stub received a request")
    }
}

fn read_request<R: BufRead>(reader: &mut R) -> CapturedRequest {
    let mut request_line = String::new();
    reader.read_line(&mut request_line).expect("request line");
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((key, value)) = line.split_once(':') {
            headers.push((key.trim().to_string(), value.trim().to_string()));
        }
    }

    let length = headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).expect("request body");

    CapturedRequest {
        method,
        target,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    }
}

/// A `blmcli` invocation isolated from the host's config, .env and proxies.
pub fn blmcli(workdir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("blmcli");
    cmd.current_dir(workdir)
        .env("XDG_CONFIG_HOME", workdir)
        .env("HOME", workdir)
        .env("NO_COLOR", "1")
        .env_remove("BIGLAKE_CONFIG")
        .env_remove("BIGLAKE_PROFILE")
        .env_remove("BIGLAKE_ENDPOINT")
        .env_remove("BIGLAKE_ACCESS_TOKEN")
        .env_remove("GOOGLE_OAUTH_ACCESS_TOKEN")
        .env_remove("BIGLAKE_QUOTA_PROJECT")
        .env_remove("GOOGLE_CLOUD_QUOTA_PROJECT")
        .env_remove("RUST_LOG");
    for proxy in [
        "HTTP_PROXY",
        "http_proxy",
        "HTTPS_PROXY",
        "https_proxy",
        "ALL_PROXY",
        "all_proxy",
    ] {
        cmd.env_remove(proxy);
    }
    cmd
}
