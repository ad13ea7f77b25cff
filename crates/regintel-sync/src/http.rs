//! HTTP client for the dashboard's document feeds and NLP inbox.

use chrono::{DateTime, Utc};
use regintel_core::{ClassifiedDocument, Document, DocumentKind};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Client for the dashboard API's regulatory-update and legal-case feeds.
pub struct IngestClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct PushResponse {
    accepted: u64,
}

/// Feed path for a document kind.
fn feed_path(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Regulatory => "/api/regulatory-updates",
        DocumentKind::Legal => "/api/legal-cases",
    }
}

impl IngestClient {
    /// Create a client for the given dashboard base URL, e.g. `http://localhost:5000`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn pull_request(
        &self,
        kind: DocumentKind,
        since: Option<DateTime<Utc>>,
    ) -> Result<reqwest::Request, SyncError> {
        let url = format!("{}{}", self.base_url, feed_path(kind));
        let mut builder = self.client.get(url);
        if let Some(ts) = since {
            builder = builder.query(&[("since", ts.to_rfc3339())]);
        }
        Ok(builder.build()?)
    }

    /// Pull documents of one kind from the dashboard feed.
    ///
    /// If `since` is provided, only documents published after that timestamp
    /// are requested. Every document takes the feed's kind, whatever its payload says.
    pub async fn pull_documents(
        &self,
        kind: DocumentKind,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Document>, SyncError> {
        let request = self.pull_request(kind, since)?;
        info!(url = %request.url(), %kind, "pulling documents");
        let resp = self.client.execute(request).await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        let docs = parse_feed(&body, kind)?;
        info!(count = docs.len(), %kind, "pulled documents");
        Ok(docs)
    }

    /// Push classifications to the dashboard's NLP inbox.
    ///
    /// Returns the number of classifications accepted by the server.
    pub async fn push_classifications(
        &self,
        items: &[ClassifiedDocument],
    ) -> Result<u64, SyncError> {
        let url = format!("{}/api/nlp/classifications", self.base_url);

        info!(url = %url, count = items.len(), "pushing classifications");
        let resp = self.client.post(&url).json(items).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let result: PushResponse = resp.json().await?;
        info!(accepted = result.accepted, "push complete");
        Ok(result.accepted)
    }
}

/// Parse a feed body, stamping the feed's kind onto every document.
fn parse_feed(body: &str, kind: DocumentKind) -> Result<Vec<Document>, SyncError> {
    let mut docs: Vec<Document> = serde_json::from_str(body)?;
    for doc in &mut docs {
        doc.kind = kind;
    }
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use regintel_core::{CategoryAssignment, ImpactTier, RiskLevel};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn ingest_client_trims_trailing_slash() {
        let client = IngestClient::new("http://localhost:5000/".into());
        assert_eq!(client.base_url, "http://localhost:5000");
    }

    #[test]
    fn pull_url_per_kind() {
        let client = IngestClient::new("http://localhost:5000".into());
        let req = client.pull_request(DocumentKind::Regulatory, None).unwrap();
        assert_eq!(
            req.url().as_str(),
            "http://localhost:5000/api/regulatory-updates"
        );
        let req = client.pull_request(DocumentKind::Legal, None).unwrap();
        assert_eq!(req.url().path(), "/api/legal-cases");
    }

    #[test]
    fn pull_url_encodes_since() {
        let client = IngestClient::new("http://localhost:5000".into());
        let since = Utc.with_ymd_and_hms(2025, 1, 15, 8, 0, 0).unwrap();
        let req = client
            .pull_request(DocumentKind::Legal, Some(since))
            .unwrap();
        let pairs: Vec<(String, String)> = req
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs, vec![("since".to_string(), since.to_rfc3339())]);
    }

    #[test]
    fn feed_parses_dashboard_json() {
        let body = r#"[
            {
                "id": "LEG-00012",
                "title": "In re: Philips Recalled CPAP Products Litigation",
                "description": "Consolidated MDL over degraded PE-PUR foam.",
                "region": "US",
                "source": "W.D. Pa.",
                "reference": "MDL No. 3014",
                "publishedDate": "2024-04-29",
                "impact": "critical"
            },
            {
                "id": "LEG-00013",
                "title": "Hernia mesh bellwether",
                "publishedDate": "2024-05-02"
            }
        ]"#;
        let docs = parse_feed(body, DocumentKind::Legal).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].kind, DocumentKind::Legal);
        assert!(docs[0].content.starts_with("Consolidated MDL"));
        assert_eq!(docs[0].impact, ImpactTier::Critical);
        assert_eq!(docs[0].reference.as_deref(), Some("MDL No. 3014"));
        assert_eq!(docs[1].kind, DocumentKind::Legal);
        assert_eq!(docs[1].impact, ImpactTier::Medium);
        assert!(docs[1].reference.is_none());
    }

    #[test]
    fn feed_rejects_malformed_json() {
        let err = parse_feed(r#"{"not": "an array"}"#, DocumentKind::Regulatory).unwrap_err();
        assert!(matches!(err, SyncError::Json(_)));
    }

    #[test]
    fn classification_push_body_is_camel_case() {
        let item = ClassifiedDocument {
            document_id: "REG-00001".into(),
            assignment: CategoryAssignment {
                categories: vec!["cardiology".into()],
                device_types: vec!["implantable".into()],
                risk_level: RiskLevel::High,
                confidence: 0.5,
            },
        };
        let json = serde_json::to_value([&item]).unwrap();
        let obj = &json[0];
        assert_eq!(obj["documentId"], "REG-00001");
        assert_eq!(obj["deviceTypes"][0], "implantable");
        assert_eq!(obj["riskLevel"], "high");
        assert_eq!(obj["confidence"], 0.5);
    }

    #[test]
    fn push_response_parses() {
        let resp: PushResponse = serde_json::from_str(r#"{"accepted": 7}"#).unwrap();
        assert_eq!(resp.accepted, 7);
    }

    // ── Against a mock dashboard ──

    fn classified(id: &str) -> ClassifiedDocument {
        ClassifiedDocument {
            document_id: id.into(),
            assignment: CategoryAssignment {
                categories: vec!["cardiology".into()],
                device_types: vec!["implantable".into()],
                risk_level: RiskLevel::High,
                confidence: 0.6,
            },
        }
    }

    #[tokio::test]
    async fn pull_stamps_feed_kind() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/legal-cases"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"id": "LEG-00001", "kind": "regulatory", "title": "Hernia mesh verdict", "publishedDate": "2025-02-03"}]"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let client = IngestClient::new(server.uri());
        let docs = client
            .pull_documents(DocumentKind::Legal, None)
            .await
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "LEG-00001");
        assert_eq!(docs[0].kind, DocumentKind::Legal);
    }

    #[tokio::test]
    async fn pull_sends_since_parameter() {
        let server = MockServer::start().await;
        let since = Utc.with_ymd_and_hms(2025, 1, 15, 8, 0, 0).unwrap();
        Mock::given(method("GET"))
            .and(path("/api/regulatory-updates"))
            .and(query_param("since", since.to_rfc3339()))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&server)
            .await;

        let client = IngestClient::new(format!("{}/", server.uri()));
        let docs = client
            .pull_documents(DocumentKind::Regulatory, Some(since))
            .await
            .unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn pull_non_success_is_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/regulatory-updates"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let client = IngestClient::new(server.uri());
        let err = client
            .pull_documents(DocumentKind::Regulatory, None)
            .await
            .unwrap_err();
        match err {
            SyncError::Server { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "down");
            }
            other => panic!("expected server error, got {other}"),
        }
    }

    #[tokio::test]
    async fn pull_bad_body_is_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/legal-cases"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = IngestClient::new(server.uri());
        let err = client
            .pull_documents(DocumentKind::Legal, None)
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Json(_)));
    }

    #[tokio::test]
    async fn push_returns_accepted_count() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/nlp/classifications"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"accepted": 3}"#))
            .expect(1)
            .mount(&server)
            .await;

        let client = IngestClient::new(server.uri());
        let items = [classified("REG-00001"), classified("REG-00002"), classified("LEG-00001")];
        let accepted = client.push_classifications(&items).await.unwrap();
        assert_eq!(accepted, 3);

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body.as_array().unwrap().len(), 3);
        assert_eq!(body[0]["documentId"], "REG-00001");
    }

    #[tokio::test]
    async fn push_non_success_is_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/nlp/classifications"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let client = IngestClient::new(server.uri());
        let err = client
            .push_classifications(&[classified("REG-00001")])
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Server { status: 500, .. }));
    }

    #[tokio::test]
    async fn unreachable_server_is_http_error() {
        let client = IngestClient::new("http://127.0.0.1:1".into());
        let err = client
            .pull_documents(DocumentKind::Regulatory, None)
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Http(_)));
    }
}
