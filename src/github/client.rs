//! GitHub REST implementation of [`ForgeApi`].

use super::types::{AssetUpload, GitRef, NewRelease, NewTag, Release, ReleaseAsset, TagObject};
use super::{ForgeApi, ForgeResult};
use crate::config::RepoCoords;
use crate::error::ForgeError;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_util::io::ReaderStream;
use url::Url;

/// Public GitHub API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Per-request network timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const PAGE_SIZE: usize = 100;
const API_VERSION: &str = "2022-11-28";

/// Authenticated client scoped to one repository
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: Url,
    repo: RepoCoords,
}

impl GitHubClient {
    /// Create a client for `repo` against `api_url`, authenticated by `token`
    pub fn new(api_url: &str, repo: RepoCoords, token: &str) -> ForgeResult<Self> {
        let api_url = Url::parse(api_url).map_err(|source| ForgeError::InvalidUrl {
            url: api_url.to_string(),
            source,
        })?;
        if api_url.cannot_be_a_base() {
            return Err(ForgeError::CannotBeABase {
                url: api_url.to_string(),
            });
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ForgeError::InvalidHeader { name: "authorization" })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| ForgeError::Http {
                operation: "client-init",
                source,
            })?;

        Ok(Self { http, api_url, repo })
    }

    /// Repository this client is scoped to
    pub fn repo(&self) -> &RepoCoords {
        &self.repo
    }

    /// Build `<api>/repos/<owner>/<repo>/<segments...>`, encoding each segment
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> ForgeResult<Url> {
        let mut url = self.api_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| ForgeError::CannotBeABase {
                url: self.api_url.to_string(),
            })?;
            path.pop_if_empty()
                .extend(["repos", self.repo.owner.as_str(), self.repo.repo.as_str()])
                .extend(segments);
        }
        Ok(url)
    }

    async fn send(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> ForgeResult<reqwest::Response> {
        let request = request
            .build()
            .map_err(|source| ForgeError::Http { operation, source })?;
        log::debug!("{operation}: {} {}", request.method(), request.url());

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|source| ForgeError::Http { operation, source })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ForgeError::NotFound { operation });
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|value| value.get("message")?.as_str().map(str::to_string))
            .unwrap_or(text);
        Err(ForgeError::Status {
            operation,
            status: status.as_u16(),
            message,
        })
    }

    async fn json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> ForgeResult<T> {
        self.send(operation, request)
            .await?
            .json::<T>()
            .await
            .map_err(|source| ForgeError::Http { operation, source })
    }

    /// Fetch every page of a list endpoint
    async fn paginate<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        url: Url,
    ) -> ForgeResult<Vec<T>> {
        let mut items = Vec::new();
        for page in 1u32.. {
            let mut page_url = url.clone();
            page_url
                .query_pairs_mut()
                .append_pair("per_page", &PAGE_SIZE.to_string())
                .append_pair("page", &page.to_string());

            let batch: Vec<T> = self.json(operation, self.http.get(page_url)).await?;
            let last_page = batch.len() < PAGE_SIZE;
            items.extend(batch);
            if last_page {
                break;
            }
        }
        Ok(items)
    }
}

impl ForgeApi for GitHubClient {
    async fn get_ref(&self, reference: &str) -> ForgeResult<GitRef> {
        let url = self.endpoint(["git", "ref"].into_iter().chain(reference.split('/')))?;
        self.json("get-ref", self.http.get(url)).await
    }

    async fn list_releases(&self) -> ForgeResult<Vec<Release>> {
        let url = self.endpoint(["releases"])?;
        self.paginate("list-releases", url).await
    }

    async fn delete_release(&self, release_id: u64) -> ForgeResult<()> {
        let id = release_id.to_string();
        let url = self.endpoint(["releases", id.as_str()])?;
        self.send("delete-release", self.http.delete(url)).await?;
        Ok(())
    }

    async fn update_ref(&self, reference: &str, sha: &str, force: bool) -> ForgeResult<GitRef> {
        let url = self.endpoint(["git", "refs"].into_iter().chain(reference.split('/')))?;
        let body = serde_json::json!({ "sha": sha, "force": force });
        self.json("update-ref", self.http.patch(url).json(&body)).await
    }

    async fn create_tag_object(&self, tag: &NewTag) -> ForgeResult<TagObject> {
        let url = self.endpoint(["git", "tags"])?;
        self.json("create-tag-object", self.http.post(url).json(tag)).await
    }

    async fn create_ref(&self, full_reference: &str, sha: &str) -> ForgeResult<GitRef> {
        let url = self.endpoint(["git", "refs"])?;
        let body = serde_json::json!({ "ref": full_reference, "sha": sha });
        self.json("create-ref", self.http.post(url).json(&body)).await
    }

    async fn delete_ref(&self, reference: &str) -> ForgeResult<()> {
        let url = self.endpoint(["git", "refs"].into_iter().chain(reference.split('/')))?;
        self.send("delete-ref", self.http.delete(url)).await?;
        Ok(())
    }

    async fn create_release(&self, release: &NewRelease) -> ForgeResult<Release> {
        let url = self.endpoint(["releases"])?;
        self.json("create-release", self.http.post(url).json(release)).await
    }

    async fn list_release_assets(&self, release_id: u64) -> ForgeResult<Vec<ReleaseAsset>> {
        let id = release_id.to_string();
        let url = self.endpoint(["releases", id.as_str(), "assets"])?;
        self.paginate("list-release-assets", url).await
    }

    async fn delete_release_asset(&self, asset_id: u64) -> ForgeResult<()> {
        let id = asset_id.to_string();
        let url = self.endpoint(["releases", "assets", id.as_str()])?;
        self.send("delete-release-asset", self.http.delete(url)).await?;
        Ok(())
    }

    async fn upload_release_asset(
        &self,
        release: &Release,
        upload: &AssetUpload,
    ) -> ForgeResult<ReleaseAsset> {
        const OPERATION: &str = "upload-release-asset";

        // upload_url is a URI template such as ".../assets{?name,label}"
        let base = release
            .upload_url
            .split('{')
            .next()
            .unwrap_or(&release.upload_url);
        let mut url = Url::parse(base).map_err(|source| ForgeError::InvalidUrl {
            url: base.to_string(),
            source,
        })?;
        url.query_pairs_mut().append_pair("name", &upload.name);

        let file = tokio::fs::File::open(&upload.path)
            .await
            .map_err(|source| ForgeError::Io {
                operation: OPERATION,
                source,
            })?;
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));

        let request = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .header(CONTENT_LENGTH, upload.size)
            .body(body);
        self.json(OPERATION, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_url: &str) -> GitHubClient {
        let repo = RepoCoords {
            owner: "octo".to_string(),
            repo: "widgets".to_string(),
        };
        GitHubClient::new(api_url, repo, "secret").expect("client")
    }

    #[test]
    fn test_endpoint_appends_repository_path() {
        let url = client(DEFAULT_API_URL)
            .endpoint(["git", "ref", "tags", "v1.0.0"])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/octo/widgets/git/ref/tags/v1.0.0"
        );
    }

    #[test]
    fn test_endpoint_keeps_enterprise_prefix() {
        let url = client("https://ghe.example.com/api/v3/")
            .endpoint(["releases"])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/repos/octo/widgets/releases"
        );
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let url = client(DEFAULT_API_URL)
            .endpoint(["git", "ref", "tags", "v1#beta"])
            .expect("url");
        assert!(url.as_str().ends_with("/tags/v1%23beta"));
    }

    #[test]
    fn test_rejects_non_base_url() {
        let repo = RepoCoords {
            owner: "octo".to_string(),
            repo: "widgets".to_string(),
        };
        let result = GitHubClient::new("mailto:someone@example.com", repo, "secret");
        assert!(matches!(result, Err(ForgeError::CannotBeABase { .. })));
    }
}
