//! [`SongsApi`] over HTTP.

use std::time::Duration;

use log::debug;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Method, Response};
use riffshare_types::{NewSong, Song, SongId, VoteDirection, VoteRequest};
use serde::de::DeserializeOwned;
use strum::{Display, EnumString};

use crate::{AdminToken, ApiError, SongsApi};

/// characters that stay as-is in a path segment (RFC 3986 unreserved)
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// The HTTP verb used for the vote and download counters.
///
/// Deployments of the service disagree on this, so it is configurable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MutationMethod {
    #[default]
    Post,
    Patch,
}

impl From<MutationMethod> for Method {
    fn from(method: MutationMethod) -> Self {
        match method {
            MutationMethod::Post => Self::POST,
            MutationMethod::Patch => Self::PATCH,
        }
    }
}

/// A [`SongsApi`] backed by a `reqwest` client.
#[derive(Clone, Debug)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
    mutation_method: MutationMethod,
}

impl HttpClient {
    /// Create a client for the service rooted at `base_url` (e.g. `https://host/api`).
    ///
    /// `timeout` of `None` lets requests wait indefinitely.
    ///
    /// # Errors
    ///
    /// Fails if `base_url` is not an absolute http(s) url, or if the underlying client can't be built.
    pub fn new(
        base_url: &str,
        mutation_method: MutationMethod,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        let invalid = |reason: String| ApiError::InvalidUrl {
            url: base_url.to_owned(),
            reason,
        };
        let parsed = reqwest::Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme \"{}\"", parsed.scheme())));
        }

        let mut builder =
            reqwest::Client::builder().user_agent(concat!("riffshare/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_owned(),
            mutation_method,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.extend(utf8_percent_encode(segment, PATH_SEGMENT));
        }
        url
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let body = Self::check(response).await?.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            debug!("undecodable response body: {}", String::from_utf8_lossy(&body));
            ApiError::Decode(e)
        })
    }

    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            debug!("request failed with {status}: {body}");
            Err(ApiError::from_status(status.as_u16(), &body))
        }
    }
}

impl SongsApi for HttpClient {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn list_songs(&self) -> Result<Vec<Song>, ApiError> {
        let response = self.http.get(self.endpoint(&["songs"])).send().await?;
        let songs: Vec<Song> = Self::decode(response).await?;
        debug!("fetched {} songs", songs.len());
        Ok(songs)
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn create_song(&self, song: &NewSong) -> Result<Song, ApiError> {
        let response = self
            .http
            .post(self.endpoint(&["songs"]))
            .json(song)
            .send()
            .await?;
        Self::decode(response).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn vote(&self, id: &SongId, direction: VoteDirection) -> Result<Song, ApiError> {
        let response = self
            .http
            .request(
                self.mutation_method.into(),
                self.endpoint(&["songs", id.as_str(), "vote"]),
            )
            .json(&VoteRequest::new(direction))
            .send()
            .await?;
        Self::decode(response).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn record_download(&self, id: &SongId) -> Result<Song, ApiError> {
        let response = self
            .http
            .request(
                self.mutation_method.into(),
                self.endpoint(&["songs", id.as_str(), "download"]),
            )
            .send()
            .await?;
        Self::decode(response).await
    }

    #[tracing::instrument(skip(self, song, token), fields(id = %song.id), level = "debug")]
    async fn update_song(&self, song: &Song, token: &AdminToken) -> Result<Song, ApiError> {
        let response = self
            .http
            .put(self.endpoint(&["admin", "songs", song.id.as_str()]))
            .bearer_auth(token.expose())
            .json(song)
            .send()
            .await?;
        Self::decode(response).await
    }

    #[tracing::instrument(skip(self, token), level = "debug")]
    async fn delete_song(&self, id: &SongId, token: &AdminToken) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.endpoint(&["admin", "songs", id.as_str()]))
            .bearer_auth(token.expose())
            .send()
            .await?;
        Self::check(response).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        task::JoinHandle,
    };

    const SONG_JSON: &str = r#"{"_id":"abc","artist":"Tool","title":"Schism","type":"bass","tuning":"Drop D","link":"https://example.com/schism","author":"justin","upvotes":2,"downvotes":0,"downloads":7,"createdAt":"2025-01-01T00:00:00Z"}"#;

    /// Accept a single connection, answer it with `status` and `body`, and hand back the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/api", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });

        (url, handle)
    }

    fn client(url: &str, method: MutationMethod) -> HttpClient {
        HttpClient::new(url, method, Some(Duration::from_secs(5))).unwrap()
    }

    #[rstest]
    #[case("ftp://example.com")]
    #[case("not a url")]
    #[case("/relative/api")]
    fn test_rejects_bad_base_url(#[case] url: &str) {
        let result = HttpClient::new(url, MutationMethod::Post, None);
        assert!(matches!(result, Err(ApiError::InvalidUrl { .. })));
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = client("https://example.com/api/", MutationMethod::Post);
        assert_eq!(client.base_url(), "https://example.com/api");
        assert_eq!(
            client.endpoint(&["songs", "a b/c", "vote"]),
            "https://example.com/api/songs/a%20b%2Fc/vote"
        );
        assert_eq!(
            client.endpoint(&["songs", "65f0-ab_c.d~e"]),
            "https://example.com/api/songs/65f0-ab_c.d~e"
        );
    }

    #[rstest]
    #[case("post", MutationMethod::Post)]
    #[case("PATCH", MutationMethod::Patch)]
    fn test_parse_mutation_method(#[case] input: &str, #[case] expected: MutationMethod) {
        assert_eq!(input.parse::<MutationMethod>().unwrap(), expected);
    }

    #[tokio::test]
    async fn test_list_songs() {
        let body: &'static str = Box::leak(format!("[{SONG_JSON}]").into_boxed_str());
        let (url, server) = serve_once("200 OK", body).await;

        let songs = client(&url, MutationMethod::Post).list_songs().await.unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("GET /api/songs HTTP/1.1"));
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].title, "Schism");
        assert_eq!(songs[0].downloads, 7);
    }

    #[rstest]
    #[case(MutationMethod::Post, "POST")]
    #[case(MutationMethod::Patch, "PATCH")]
    #[tokio::test]
    async fn test_vote_uses_configured_method(
        #[case] method: MutationMethod,
        #[case] verb: &str,
    ) {
        let (url, server) = serve_once("200 OK", SONG_JSON).await;

        let song = client(&url, method)
            .vote(&SongId::new("abc"), VoteDirection::Up)
            .await
            .unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with(&format!("{verb} /api/songs/abc/vote HTTP/1.1")));
        assert!(request.ends_with(r#"{"voteType":"upvote"}"#));
        assert_eq!(song.id, SongId::new("abc"));
    }

    #[rstest]
    #[case("<html>maintenance</html>")]
    #[case(r#"[{"title":"missing everything else"}]"#)]
    #[tokio::test]
    async fn test_list_songs_undecodable_body(#[case] body: &'static str) {
        let (url, server) = serve_once("200 OK", body).await;

        let err = client(&url, MutationMethod::Post)
            .list_songs()
            .await
            .unwrap_err();
        server.await.unwrap();

        assert!(matches!(err, ApiError::Decode(_)), "{err:?}");
        assert!(
            err.to_string()
                .starts_with("Unexpected response from the server: "),
            "{err}"
        );
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_update_song_sends_bearer_token() {
        let (url, server) = serve_once("200 OK", SONG_JSON).await;
        let song: Song = serde_json::from_str(SONG_JSON).unwrap();
        let token = AdminToken::new("s3cret").unwrap();

        client(&url, MutationMethod::Post)
            .update_song(&song, &token)
            .await
            .unwrap();
        let request = server.await.unwrap();

        assert!(request.starts_with("PUT /api/admin/songs/abc HTTP/1.1"));
        assert!(
            request
                .lines()
                .any(|line| line.eq_ignore_ascii_case("authorization: Bearer s3cret"))
        );
    }

    #[tokio::test]
    async fn test_server_message_is_surfaced() {
        let (url, server) = serve_once("401 Unauthorized", r#"{"message":"Invalid token"}"#).await;
        let token = AdminToken::new("expired").unwrap();

        let err = client(&url, MutationMethod::Post)
            .delete_song(&SongId::new("abc"), &token)
            .await
            .unwrap_err();
        let request = server.await.unwrap();

        assert!(request.starts_with("DELETE /api/admin/songs/abc HTTP/1.1"));
        assert_eq!(err.to_string(), "Invalid token");
        assert!(err.is_unauthorized());
    }
}
