use reqwest::Client;
use url::Url;

use super::types::{OmdbDetailResponse, OmdbSearchItem, OmdbSearchResponse};
use crate::error::ApiError;
use crate::traits::{MovieDetail, MovieService, MovieSummary};

/// Public OMDb endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://www.omdbapi.com/";

/// OMDb (Open Movie Database) client.
pub struct OmdbClient {
    endpoint: Url,
    api_key: String,
    http: Client,
}

impl OmdbClient {
    pub fn new(endpoint: &str, api_key: String) -> Result<Self, ApiError> {
        Ok(Self {
            endpoint: Url::parse(endpoint)?,
            api_key,
            http: Client::new(),
        })
    }

    /// Base URL every request is issued against.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Turn a non-2xx status into an error carrying the reason phrase.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status();
            let reason = status.canonical_reason().unwrap_or("unknown status").to_string();
            tracing::warn!(status = status.as_u16(), %reason, "OMDb API error");
            Err(ApiError::Api {
                status: status.as_u16(),
                reason,
            })
        }
    }

    async fn get(&self, params: &[(&str, &str)]) -> Result<reqwest::Response, ApiError> {
        let resp = self
            .http
            .get(self.endpoint.clone())
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        Self::check_response(resp).await
    }
}

impl MovieService for OmdbClient {
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, ApiError> {
        tracing::debug!(query, "OMDb title search");
        let resp = self.get(&[("s", query)]).await?;
        let body: OmdbSearchResponse = resp
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        if !body.is_found() {
            return Err(ApiError::NotFound(
                body.error.unwrap_or_else(|| format!("no results for {query:?}")),
            ));
        }

        Ok(body
            .search
            .into_iter()
            .map(OmdbSearchItem::into_summary)
            .collect())
    }

    async fn get_movie(&self, id: &str) -> Result<MovieDetail, ApiError> {
        tracing::debug!(id, "OMDb detail lookup");
        let resp = self.get(&[("i", id)]).await?;
        let body: OmdbDetailResponse = resp
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        if !body.is_found() {
            return Err(ApiError::NotFound(
                body.error.unwrap_or_else(|| format!("no movie with id {id}")),
            ));
        }

        Ok(body.into_detail(id))
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;

    /// Answer one request with `status` and `body`; yields the request line.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (OmdbClient, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();

            String::from_utf8_lossy(&request)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });

        let client = OmdbClient::new(&format!("http://{addr}/"), "testkey".into()).unwrap();
        (client, handle)
    }

    #[tokio::test]
    async fn test_search_sends_key_and_query() {
        let body = r#"{"Search":[{"Title":"Inception","Year":"2010","imdbID":"tt1375666","Type":"movie","Poster":"https://example.com/inception.jpg"}],"totalResults":"1","Response":"True"}"#;
        let (client, request) = serve_once("200 OK", body).await;

        let results = client.search_movies("inception").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "tt1375666");
        assert_eq!(results[0].title, "Inception");
        assert_eq!(
            request.await.unwrap(),
            "GET /?apikey=testkey&s=inception HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn test_search_response_false_is_not_found() {
        let body = r#"{"Response":"False","Error":"Movie not found!"}"#;
        let (client, request) = serve_once("200 OK", body).await;

        let err = client.search_movies("qwertyuiop").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(ref msg) if msg == "Movie not found!"));
        assert_eq!(
            request.await.unwrap(),
            "GET /?apikey=testkey&s=qwertyuiop HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn test_error_status_carries_reason() {
        let (client, request) = serve_once("503 Service Unavailable", "").await;

        let err = client.search_movies("inception").await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Api { status: 503, ref reason } if reason == "Service Unavailable"
        ));
        assert!(request.await.unwrap().starts_with("GET /?apikey=testkey&s=inception "));
    }

    #[tokio::test]
    async fn test_get_movie_by_id() {
        let body = r#"{"Title":"Inception","Year":"2010","Released":"16 Jul 2010","Runtime":"148 min","Genre":"Action, Adventure, Sci-Fi","Director":"Christopher Nolan","Actors":"Leonardo DiCaprio","Plot":"A thief who steals corporate secrets.","Poster":"https://example.com/inception.jpg","imdbRating":"8.8","imdbID":"tt1375666","Response":"True"}"#;
        let (client, request) = serve_once("200 OK", body).await;

        let detail = client.get_movie("tt1375666").await.unwrap();
        assert_eq!(detail.title, "Inception");
        assert_eq!(detail.runtime_minutes, 148);
        assert_eq!(
            request.await.unwrap(),
            "GET /?apikey=testkey&i=tt1375666 HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn test_get_movie_response_false_is_not_found() {
        let body = r#"{"Response":"False","Error":"Incorrect IMDb ID."}"#;
        let (client, _request) = serve_once("200 OK", body).await;

        let err = client.get_movie("tt0").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_new_parses_endpoint() {
        let client = OmdbClient::new(DEFAULT_ENDPOINT, "key".into()).unwrap();
        assert_eq!(client.endpoint().host_str(), Some("www.omdbapi.com"));
    }

    #[test]
    fn test_new_rejects_invalid_endpoint() {
        let result = OmdbClient::new("not a url", "key".into());
        assert!(matches!(result, Err(ApiError::InvalidEndpoint(_))));
    }
}
