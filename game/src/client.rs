//! HTTP client for the ranking server

use chrono::Utc;
use log::error;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Upper bound on a whole request, so an unresponsive server surfaces as an error
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Entry of the ranking as sent by the server
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RankingEntry {
    pub nome: String,
    pub tempo: f64,
}

#[derive(Debug, Serialize)]
struct SaveRequest<'a> {
    nome: &'a str,
    tempo: f64,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    message: String,
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be sent or the response body was unreadable
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// The server answered with a non-success status
    #[error("server responded with {0}")]
    Status(StatusCode),
}

#[derive(Clone)]
pub struct RankingClient {
    http: reqwest::Client,
    base_url: String,
}

impl RankingClient {
    /// Creates a client for the API rooted at `base_url` (e.g. `http://localhost:3000/api`)
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let base_url: String = base_url.into();
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(RankingClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn ranking_url(&self) -> String {
        format!("{}/ranking", self.base_url)
    }

    pub fn save_url(&self) -> String {
        format!("{}/salvar", self.base_url)
    }

    /// Fetches the current top times. A timestamp query parameter keeps
    /// intermediaries from serving a cached list.
    pub async fn fetch_ranking(&self) -> Result<Vec<RankingEntry>, ClientError> {
        let response = self
            .http
            .get(self.ranking_url())
            .query(&[("timestamp", Utc::now().timestamp_millis())])
            .send()
            .await
            .inspect_err(|err| error!("Failed to fetch ranking: {}", err))?;

        let status = response.status();
        if !status.is_success() {
            error!("Failed to fetch ranking: server responded with {}", status);
            return Err(ClientError::Status(status));
        }

        Ok(response.json().await?)
    }

    /// Submits a finish time, returning the server's message describing
    /// whether it became the player's record
    pub async fn save_time(&self, name: &str, seconds: f64) -> Result<String, ClientError> {
        let response = self
            .http
            .post(self.save_url())
            .json(&SaveRequest {
                nome: name,
                tempo: seconds,
            })
            .send()
            .await
            .inspect_err(|err| error!("Failed to save time: {}", err))?;

        let status = response.status();
        if !status.is_success() {
            error!("Failed to save time: server responded with {}", status);
            return Err(ClientError::Status(status));
        }

        let body: MessageResponse = response.json().await?;
        Ok(body.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    #[test]
    fn test_urls_ignore_trailing_slash() {
        let client = RankingClient::new("http://localhost:3000/api/").unwrap();
        assert_eq!(client.ranking_url(), "http://localhost:3000/api/ranking");
        assert_eq!(client.save_url(), "http://localhost:3000/api/salvar");
    }

    #[test]
    fn test_save_request_wire_format() {
        let body = serde_json::to_value(SaveRequest {
            nome: "Ana",
            tempo: 12.5,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"nome": "Ana", "tempo": 12.5}));
    }

    #[test]
    fn test_ranking_wire_format() {
        let entries: Vec<RankingEntry> =
            serde_json::from_str(r#"[{"nome":"Bia","tempo":5.0},{"nome":"Ana","tempo":9}]"#)
                .unwrap();
        assert_eq!(entries[1].nome, "Ana");
        assert_eq!(entries[1].tempo, 9.0);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Port 9 (discard) on localhost is expected to refuse connections
        let client = RankingClient::new("http://127.0.0.1:9/api").unwrap();
        let err = client.fetch_ranking().await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
    }

    /// Serves a single connection: reads one request, writes `response` back
    async fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            read_request(&mut stream).await;
            stream.write_all(response.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;
        });
        format!("http://{}/api", addr)
    }

    /// Reads the request head and as much body as its Content-Length announces
    async fn read_request(stream: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let length = text[..head_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        if name.eq_ignore_ascii_case("content-length") {
                            value.trim().parse::<usize>().ok()
                        } else {
                            None
                        }
                    })
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + length {
                    return;
                }
            }
        }
    }

    fn json_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    #[tokio::test]
    async fn test_save_time_returns_server_message() {
        let url = serve_once(json_response(
            "201 Created",
            r#"{"message":"Seu primeiro tempo foi salvo!"}"#,
        ))
        .await;
        let client = RankingClient::new(url).unwrap();
        let message = client.save_time("Ana", 12.5).await.unwrap();
        assert_eq!(message, "Seu primeiro tempo foi salvo!");
    }

    #[tokio::test]
    async fn test_save_time_server_error_is_status_error() {
        let url = serve_once(json_response(
            "500 Internal Server Error",
            r#"{"message":"Erro ao salvar tempo"}"#,
        ))
        .await;
        let client = RankingClient::new(url).unwrap();
        let err = client.save_time("Ana", 12.5).await.unwrap_err();
        assert!(matches!(err, ClientError::Status(status) if status == StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn test_fetch_ranking_decodes_entries() {
        let url = serve_once(json_response(
            "200 OK",
            r#"[{"nome":"Bia","tempo":5.0},{"nome":"Ana","tempo":9.0}]"#,
        ))
        .await;
        let client = RankingClient::new(url).unwrap();
        let entries = client.fetch_ranking().await.unwrap();
        assert_eq!(
            entries,
            vec![
                RankingEntry {
                    nome: "Bia".into(),
                    tempo: 5.0
                },
                RankingEntry {
                    nome: "Ana".into(),
                    tempo: 9.0
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_ranking_server_error_is_status_error() {
        let url = serve_once(json_response(
            "500 Internal Server Error",
            r#"{"message":"Erro ao buscar ranking"}"#,
        ))
        .await;
        let client = RankingClient::new(url).unwrap();
        let err = client.fetch_ranking().await.unwrap_err();
        assert!(matches!(err, ClientError::Status(status) if status == StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        // Accepts the connection but never answers
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.unwrap();
            std::future::pending::<()>().await;
        });

        let client =
            RankingClient::with_timeout(format!("http://{}/api", addr), Duration::from_millis(200))
                .unwrap();
        let err = client.fetch_ranking().await.unwrap_err();
        assert!(matches!(err, ClientError::Network(ref e) if e.is_timeout()));
    }
}
