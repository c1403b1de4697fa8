//! HTTP client for the goal persistence service.

use crate::{
    api::GoalBackend,
    config::{ApiSettings, api::goals_url},
    entities::{Goal, GoalId, GoalPatch, NewGoal},
    errors::{Error, Result},
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, info};

/// REST client for `{base_url}/goals`
#[derive(Debug, Clone)]
pub struct HttpGoalBackend {
    client: Client,
    goals_url: String,
}

impl HttpGoalBackend {
    /// Creates a client for the service at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            goals_url: goals_url(base_url),
        })
    }

    /// Creates a client from the `[api]` settings, with `base_url` already resolved.
    pub fn from_settings(base_url: &str, settings: &ApiSettings) -> Result<Self> {
        Self::new(base_url, Duration::from_secs(settings.timeout_secs))
    }

    /// Collection URL this client talks to.
    #[must_use]
    pub fn goals_url(&self) -> &str {
        &self.goals_url
    }

    /// URL of a single goal record.
    #[must_use]
    pub fn goal_url(&self, id: &GoalId) -> String {
        format!("{}/{id}", self.goals_url)
    }
}

/// Turns a non-success response into [`Error::Api`].
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.is_empty() {
        status.canonical_reason().unwrap_or("unknown status").to_string()
    } else {
        body
    };

    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl GoalBackend for HttpGoalBackend {
    async fn list_goals(&self) -> Result<Vec<Goal>> {
        debug!("GET {}", self.goals_url);
        let response = self.client.get(&self.goals_url).send().await?;
        let goals: Vec<Goal> = ensure_success(response).await?.json().await?;
        info!("Fetched {} goals", goals.len());
        Ok(goals)
    }

    async fn create_goal(&self, new_goal: &NewGoal) -> Result<Goal> {
        debug!("POST {} {:?}", self.goals_url, new_goal);
        let response = self
            .client
            .post(&self.goals_url)
            .json(new_goal)
            .send()
            .await?;
        let goal: Goal = ensure_success(response).await?.json().await?;
        info!("Created goal '{}' with id {}", goal.name, goal.id);
        Ok(goal)
    }

    async fn patch_goal(&self, id: &GoalId, patch: &GoalPatch) -> Result<()> {
        let url = self.goal_url(id);
        debug!("PATCH {url} {:?}", patch);
        let response = self.client.patch(&url).json(patch).send().await?;
        ensure_success(response).await?;
        info!("Patched goal {id}");
        Ok(())
    }

    async fn delete_goal(&self, id: &GoalId) -> Result<()> {
        let url = self.goal_url(id);
        debug!("DELETE {url}");
        let response = self.client.delete(&url).send().await?;
        ensure_success(response).await?;
        info!("Deleted goal {id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Whether the bytes read so far hold the headers and the full body.
    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
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
        request.len() >= header_end + 4 + content_length
    }

    /// Serves one HTTP exchange on loopback: answers with `status` and `body`
    /// and hands back the raw request it received.
    async fn respond_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request_complete(&request) {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });

        (base_url, handle)
    }

    fn backend_for(base_url: &str) -> Result<HttpGoalBackend> {
        HttpGoalBackend::new(base_url, Duration::from_secs(5))
    }

    #[test]
    fn test_urls() -> Result<()> {
        let backend = HttpGoalBackend::new("http://localhost:3000/", Duration::from_secs(1))?;
        assert_eq!(backend.goals_url(), "http://localhost:3000/goals");
        assert_eq!(
            backend.goal_url(&GoalId::from("abc")),
            "http://localhost:3000/goals/abc"
        );
        Ok(())
    }

    #[test]
    fn test_from_settings_uses_resolved_base() -> Result<()> {
        let settings = ApiSettings::default();
        let backend = HttpGoalBackend::from_settings("http://goals.test", &settings)?;
        assert_eq!(backend.goals_url(), "http://goals.test/goals");
        Ok(())
    }

    #[tokio::test]
    async fn test_list_goals_decodes_array() -> Result<()> {
        let (base_url, server) = respond_once(
            "200 OK",
            r#"[{"id":1,"name":"Trip","targetAmount":"900","category":"travel","deadline":"2025-07-01","savedAmount":100}]"#,
        )
        .await;

        let goals = backend_for(&base_url)?.list_goals().await?;
        let request = server.await.unwrap();

        assert!(request.starts_with("GET /goals HTTP/1.1\r\n"));
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].id, GoalId::from("1"));
        assert_eq!(goals[0].target_amount, 900.0);
        assert_eq!(goals[0].saved_amount, 100.0);
        assert_eq!(goals[0].deadline, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        Ok(())
    }

    #[tokio::test]
    async fn test_server_error_becomes_api_error() -> Result<()> {
        let (base_url, server) =
            respond_once("500 Internal Server Error", r#"{"error":"boom"}"#).await;

        let result = backend_for(&base_url)?.list_goals().await;
        server.await.unwrap();

        match result {
            Err(Error::Api { status, message }) => {
                assert_eq!(status, 500);
                assert!(message.contains("boom"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_error_body_uses_reason_phrase() -> Result<()> {
        let (base_url, server) = respond_once("404 Not Found", "").await;

        let result = backend_for(&base_url)?
            .delete_goal(&GoalId::from("9"))
            .await;
        let request = server.await.unwrap();

        assert!(request.starts_with("DELETE /goals/9 HTTP/1.1\r\n"));
        assert!(matches!(
            result,
            Err(Error::Api { status: 404, ref message }) if message == "Not Found"
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_patch_sends_only_changed_fields() -> Result<()> {
        let (base_url, server) = respond_once("200 OK", "{}").await;

        backend_for(&base_url)?
            .patch_goal(&GoalId::from("7"), &GoalPatch::saved_amount(150.0))
            .await?;
        let request = server.await.unwrap();

        assert!(request.starts_with("PATCH /goals/7 HTTP/1.1\r\n"));
        assert!(request.ends_with(r#"{"savedAmount":150.0}"#));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_posts_new_goal_and_reads_record() -> Result<()> {
        let (base_url, server) = respond_once(
            "201 Created",
            r#"{"id":"a9","name":"Laptop","targetAmount":1200,"category":"tech","deadline":"2025-09-01","savedAmount":0,"createdAt":"2025-03-01T12:00:00Z"}"#,
        )
        .await;
        let new_goal = NewGoal {
            name: "Laptop".to_string(),
            target_amount: 1200.0,
            category: "tech".to_string(),
            deadline: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            saved_amount: 0.0,
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        };

        let created = backend_for(&base_url)?.create_goal(&new_goal).await?;
        let request = server.await.unwrap();

        assert!(request.starts_with("POST /goals HTTP/1.1\r\n"));
        assert!(request.contains(r#""targetAmount":1200.0"#));
        assert!(request.contains(r#""savedAmount":0.0"#));
        assert_eq!(created.id, GoalId::from("a9"));
        assert_eq!(created.name, "Laptop");
        Ok(())
    }
}
