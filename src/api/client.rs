use futures::Stream;
use futures::TryStreamExt;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use super::models::{ApiConfig, ReleasePage};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Server answered with status {0}")]
    UnexpectedStatus(StatusCode),
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    pub fn repo_base(&self) -> &str {
        &self.config.repo_base
    }

    /// Fetch the page listing every published version
    pub async fn fetch_release_page(&self) -> Result<ReleasePage> {
        log::info!(
            "Downloading available versions from {}",
            self.config.release_page_url
        );

        let response = self
            .http
            .get(&self.config.release_page_url)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        Ok(ReleasePage::new(body))
    }

    /// GET `url` and report the status only. The response is dropped before
    /// returning so the connection is released right away.
    pub async fn ping(&self, url: &str) -> Result<StatusCode> {
        let status = {
            let response = self.http.get(url).send().await?;
            response.status()
        };
        Ok(status)
    }

    /// Download file with progress stream
    /// Returns (total_size, stream)
    pub async fn download_file_stream(
        &self,
        download_url: &str,
    ) -> Result<(Option<u64>, impl Stream<Item = Result<bytes::Bytes>>)> {
        let response = self.http.get(download_url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::UnexpectedStatus(response.status()));
        }

        let total_size = response.content_length();
        let stream = response.bytes_stream().map_err(ApiError::RequestError);

        Ok((total_size, stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn client_for(server: &mockito::Server) -> ApiClient {
        ApiClient::new(ApiConfig {
            release_page_url: format!("{}/", server.url()),
            repo_base: "https://example.com/repo/".to_string(),
        })
    }

    #[tokio::test]
    async fn test_fetch_release_page_lines() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("<html>\nEA 12\n</html>\n")
            .create_async()
            .await;

        let page = client_for(&server).fetch_release_page().await.unwrap();

        assert_eq!(page.lines().collect::<Vec<_>>(), ["<html>", "EA 12", "</html>"]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_release_page_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .with_status(503)
            .create_async()
            .await;

        let result = client_for(&server).fetch_release_page().await;

        assert!(matches!(result, Err(ApiError::RequestError(_))));
    }

    #[tokio::test]
    async fn test_ping_reports_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing.zip")
            .with_status(404)
            .create_async()
            .await;

        let status = client_for(&server)
            .ping(&format!("{}/missing.zip", server.url()))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_download_file_stream() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/build.zip")
            .with_status(200)
            .with_body("0123456789")
            .create_async()
            .await;

        let (total, stream) = client_for(&server)
            .download_file_stream(&format!("{}/build.zip", server.url()))
            .await
            .unwrap();
        let chunks: Vec<_> = stream.collect().await;
        let body: Vec<u8> = chunks
            .into_iter()
            .flat_map(|chunk| chunk.unwrap().to_vec())
            .collect();

        assert_eq!(total, Some(10));
        assert_eq!(body, b"0123456789");
    }
}
