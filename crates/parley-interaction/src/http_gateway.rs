//! HttpCapabilityGateway - JSON-over-HTTP client for a local model server.
//!
//! Endpoints, relative to the configured base URL:
//!
//! | method | path            | request                                   | response                  |
//! |--------|-----------------|-------------------------------------------|---------------------------|
//! | GET    | `/capabilities` |                                           | `CapabilityReport`        |
//! | POST   | `/prepare`      | `{capability}`                            | any 2xx                   |
//! | POST   | `/detect`       | `{text}`                                  | `{results: [..]}`         |
//! | POST   | `/translate`    | `{text, sourceLanguage, targetLanguage}`  | `{text}`                  |
//! | POST   | `/summarize`    | `{text, options}`                         | `{summary}`               |
//!
//! A `501 Not Implemented` reply means the capability does not exist on the
//! server and is reported as [`ParleyError::Unavailable`].

use async_trait::async_trait;
use parley_core::capability::{Capability, CapabilityGateway, CapabilityReport, SummarizeOptions};
use parley_core::error::{ParleyError, Result};
use parley_core::language::DetectedLanguage;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Gateway backed by an HTTP model server.
#[derive(Clone)]
pub struct HttpCapabilityGateway {
    client: Client,
    base_url: String,
}

impl HttpCapabilityGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Uses a preconfigured client (proxies, TLS roots, ...).
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<R>(&self, operation: &'static str, path: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|err| request_error(operation, err))?;
        read_json(operation, response).await
    }

    async fn post_json<B, R>(&self, operation: &'static str, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.post(operation, path, body).await?;
        read_json(operation, response).await
    }

    async fn post<B>(&self, operation: &'static str, path: &str, body: &B) -> Result<reqwest::Response>
    where
        B: Serialize + ?Sized,
    {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|err| request_error(operation, err))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(operation, status, &body_text));
        }
        Ok(response)
    }
}

#[async_trait]
impl CapabilityGateway for HttpCapabilityGateway {
    async fn probe(&self) -> Result<CapabilityReport> {
        let report: CapabilityReport = self.get_json("probe", "/capabilities").await?;
        tracing::debug!("[HttpCapabilityGateway] capabilities: {:?}", report);
        Ok(report)
    }

    async fn prepare(&self, capability: Capability) -> Result<()> {
        tracing::info!("[HttpCapabilityGateway] preparing {:?}", capability);
        self.post("prepare", "/prepare", &PrepareRequest { capability })
            .await?;
        Ok(())
    }

    async fn detect_language(&self, text: &str) -> Result<Vec<DetectedLanguage>> {
        let response: DetectResponse = self
            .post_json("detect", "/detect", &DetectRequest { text })
            .await?;
        Ok(response.results)
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let request = TranslateRequest {
            text,
            source_language: source,
            target_language: target,
        };
        let response: TranslateResponse = self.post_json("translate", "/translate", &request).await?;
        Ok(response.text)
    }

    async fn summarize(&self, text: &str, options: &SummarizeOptions) -> Result<String> {
        let request = SummarizeRequest { text, options };
        let response: SummarizeResponse = self.post_json("summarize", "/summarize", &request).await?;
        Ok(response.summary)
    }
}

#[derive(Serialize)]
struct PrepareRequest {
    capability: Capability,
}

#[derive(Serialize)]
struct DetectRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct DetectResponse {
    #[serde(default)]
    results: Vec<DetectedLanguage>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslateRequest<'a> {
    text: &'a str,
    source_language: &'a str,
    target_language: &'a str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    text: String,
}

#[derive(Serialize)]
struct SummarizeRequest<'a> {
    text: &'a str,
    options: &'a SummarizeOptions,
}

#[derive(Deserialize)]
struct SummarizeResponse {
    summary: String,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

async fn read_json<R>(operation: &'static str, response: reqwest::Response) -> Result<R>
where
    R: DeserializeOwned,
{
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|err| ParleyError::gateway(operation, format!("Failed to read response: {err}")))?;

    if !status.is_success() {
        return Err(map_http_error(operation, status, &body));
    }

    serde_json::from_str(&body)
        .map_err(|err| ParleyError::gateway(operation, format!("Failed to parse response: {err}")))
}

fn request_error(operation: &'static str, err: reqwest::Error) -> ParleyError {
    if err.is_connect() {
        ParleyError::unavailable(format!("Capability server is unreachable: {err}"))
    } else {
        ParleyError::gateway(operation, format!("Request failed: {err}"))
    }
}

fn map_http_error(operation: &'static str, status: StatusCode, body: &str) -> ParleyError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .and_then(|wrapper| wrapper.error.message)
        .unwrap_or_else(|| body.trim().to_string());

    if status == StatusCode::NOT_IMPLEMENTED {
        return ParleyError::unavailable(message);
    }
    ParleyError::gateway(operation, format!("{}: {}", status.as_u16(), message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves one request with a canned reply and returns the raw request.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }

            let reply = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).to_string()
        });

        (base_url, handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        request.len() >= header_end + 4 + content_length
    }

    #[tokio::test]
    async fn test_probe_parses_report() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"languageDetector":"readily","translator":"after-download","summarizer":"no"}"#,
        )
        .await;

        let gateway = HttpCapabilityGateway::new(format!("{base_url}/"));
        let report = gateway.probe().await.unwrap();
        assert_eq!(report.language_detector, parley_core::capability::Availability::Readily);
        assert_eq!(report.translator, parley_core::capability::Availability::AfterDownload);
        assert_eq!(report.summarizer, parley_core::capability::Availability::No);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /capabilities "));
    }

    #[tokio::test]
    async fn test_detect_sends_text_and_reads_results() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"results":[{"detectedLanguage":"fr","confidence":0.93}]}"#,
        )
        .await;

        let gateway = HttpCapabilityGateway::new(base_url);
        let results = gateway.detect_language("Bonjour le monde").await.unwrap();
        assert_eq!(results, vec![DetectedLanguage::new("fr", 0.93)]);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /detect "));
        assert!(request.contains(r#""text":"Bonjour le monde""#));
    }

    #[tokio::test]
    async fn test_translate_sends_language_pair() {
        let (base_url, server) = serve_once("200 OK", r#"{"text":"Hello world"}"#).await;

        let gateway = HttpCapabilityGateway::new(base_url);
        let text = gateway.translate("Bonjour le monde", "fr", "en").await.unwrap();
        assert_eq!(text, "Hello world");

        let request = server.await.unwrap();
        assert!(request.contains(r#""sourceLanguage":"fr""#));
        assert!(request.contains(r#""targetLanguage":"en""#));
    }

    #[tokio::test]
    async fn test_summarize_forwards_options() {
        let (base_url, server) = serve_once("200 OK", r#"{"summary":"Short."}"#).await;

        let gateway = HttpCapabilityGateway::new(base_url);
        let summary = gateway
            .summarize("long text", &SummarizeOptions::default())
            .await
            .unwrap();
        assert_eq!(summary, "Short.");

        let request = server.await.unwrap();
        assert!(request.contains(r#""type":"tl;dr""#));
        assert!(request.contains(r#""format":"plain-text""#));
        assert!(request.contains(r#""length":"medium""#));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_gateway_error() {
        let (base_url, server) = serve_once(
            "500 Internal Server Error",
            r#"{"error":{"message":"model crashed"}}"#,
        )
        .await;

        let gateway = HttpCapabilityGateway::new(base_url);
        let err = gateway.translate("hola", "es", "en").await.unwrap_err();
        assert_eq!(err, ParleyError::gateway("translate", "500: model crashed"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_not_implemented_maps_to_unavailable() {
        let (base_url, server) = serve_once("501 Not Implemented", "no summarizer").await;

        let gateway = HttpCapabilityGateway::new(base_url);
        let err = gateway.prepare(Capability::Summarizer).await.unwrap_err();
        assert!(err.is_unavailable());
        server.await.unwrap();
    }

    #[test]
    fn test_map_http_error_falls_back_to_body() {
        let err = map_http_error("detect", StatusCode::BAD_REQUEST, "  bad input\n");
        assert_eq!(err, ParleyError::gateway("detect", "400: bad input"));
    }
}
