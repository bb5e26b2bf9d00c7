//! Github Platform
use std::collections::HashSet;

use super::{
    repo::{GithubAccount, GithubRepoCreation, RepoGithub},
    GITHUB_API_HEADER, GITHUB_API_URL, GITHUB_API_VERSION, GITHUB_PER_PAGE, GITHUB_URL,
};
use crate::{
    errors::{GitMoverError, GitMoverErrorKind},
    platform::{DestinationPlatform, LookupFuture, PlatformFuture, PlatformType, SourcePlatform},
    repo::Repo,
    utils::{authenticated_git_url, host_of, provider_error, read_json, send},
};
use log::{debug, info, warn};
use reqwest::{
    header::{ACCEPT, AUTHORIZATION, USER_AGENT},
    Method, RequestBuilder, StatusCode,
};
use serde::de::DeserializeOwned;
use url::Url;
use urlencoding::encode;

/// Repositories of `/user/repos` owned by or shared with the user, organizations are listed apart
const USER_AFFILIATION: &str = "owner,collaborator";

/// Github Platform
#[derive(Default, Debug, Clone)]
pub struct GithubPlatform {
    /// API base url
    api_url: String,

    /// Web base url, used for git urls
    web_url: String,

    /// Host of the web url
    host: String,

    /// Github username
    username: String,

    /// Github token
    token: String,

    /// Reqwest client
    client: reqwest::Client,
}

/// Web url matching an API url (`https://ghe.example.com/api/v3` -> `https://ghe.example.com`)
fn web_url_for(api_url: &str) -> String {
    if api_url == GITHUB_API_URL {
        return GITHUB_URL.to_string();
    }
    match Url::parse(api_url) {
        Ok(mut url) => {
            let path = url
                .path()
                .trim_end_matches('/')
                .trim_end_matches("/api/v3")
                .to_string();
            url.set_path(&path);
            url.to_string().trim_end_matches('/').to_string()
        }
        Err(_) => api_url.to_string(),
    }
}

impl GithubPlatform {
    /// Create a new GithubPlatform, `api_url` defaulting to api.github.com
    pub fn new(api_url: Option<&str>, username: String, token: String) -> Self {
        let api_url = api_url
            .unwrap_or(GITHUB_API_URL)
            .trim_end_matches('/')
            .to_string();
        let web_url = web_url_for(&api_url);
        Self {
            host: host_of(&web_url),
            web_url,
            api_url,
            username,
            token,
            client: reqwest::Client::new(),
        }
    }

    /// Authenticated request on the REST API
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.api_url, path))
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .header(GITHUB_API_HEADER, GITHUB_API_VERSION)
    }

    /// Probe `GET /user`
    async fn check_user(&self) -> Result<(), GitMoverError> {
        let response = send(self.request(Method::GET, "/user"), PlatformType::Github).await?;
        if !response.status().is_success() {
            return Err(provider_error(response, PlatformType::Github, "authentication").await);
        }
        Ok(())
    }

    /// Fetch every page of a listing endpoint, stopping on a short page
    async fn get_paged<T: DeserializeOwned + Send>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, GitMoverError> {
        let mut page: usize = 1;
        let mut all_items = vec![];
        loop {
            let request = self
                .request(Method::GET, path)
                .query(query)
                .query(&[
                    ("per_page", GITHUB_PER_PAGE.to_string()),
                    ("page", page.to_string()),
                ]);
            let response = send(request, PlatformType::Github).await?;
            if !response.status().is_success() {
                return Err(provider_error(response, PlatformType::Github, path).await);
            }
            let items: Vec<T> = read_json(response, PlatformType::Github).await?;
            let count = items.len();
            debug!("Requested github {} (page {}): {}", path, page, count);
            all_items.extend(items);
            if count < GITHUB_PER_PAGE {
                break;
            }
            page += 1;
        }
        Ok(all_items)
    }
}

/// Re-tag an error as a configuration error
fn configuration_error(e: GitMoverError) -> GitMoverError {
    GitMoverError::new(GitMoverErrorKind::Configuration)
        .with_platform(PlatformType::Github)
        .with_text(&format!("Failed to authenticate: {e}"))
}

impl SourcePlatform for GithubPlatform {
    fn validate_configuration(&self) -> PlatformFuture<'_, ()> {
        Box::pin(async move { self.check_user().await.map_err(configuration_error) })
    }

    fn list_accessible_repositories(&self) -> PlatformFuture<'_, Vec<Repo>> {
        Box::pin(async move {
            let mut repos: Vec<RepoGithub> = self
                .get_paged("/user/repos", &[("affiliation", USER_AFFILIATION)])
                .await?;
            let orgs: Vec<GithubAccount> = self.get_paged("/user/orgs", &[]).await?;
            for org in orgs {
                let path = format!("/orgs/{}/repos", encode(&org.login));
                match self.get_paged::<RepoGithub>(&path, &[]).await {
                    Ok(org_repos) => repos.extend(org_repos),
                    Err(e) => {
                        warn!("Could not fetch repositories of organization {}: {}", org.login, e);
                    }
                }
            }
            let mut seen = HashSet::new();
            let mut all_repos = Vec::with_capacity(repos.len());
            for repo in repos {
                let repo = Repo::try_from(repo)?;
                if seen.insert(repo.full_name()) {
                    all_repos.push(repo);
                }
            }
            Ok(all_repos)
        })
    }

    fn get_repository(&self, owner: &str, name: &str) -> LookupFuture<'_, Option<Repo>> {
        let path = format!("/repos/{}/{}", encode(owner), encode(name));
        Box::pin(async move {
            let response = send(self.request(Method::GET, &path), PlatformType::Github)
                .await
                .ok()?;
            if !response.status().is_success() {
                debug!("github answered {} for {}", response.status(), path);
                return None;
            }
            let repo: RepoGithub = read_json(response, PlatformType::Github).await.ok()?;
            Repo::try_from(repo).ok()
        })
    }

    fn build_authenticated_clone_url(&self, repo: &Repo) -> Result<String, GitMoverError> {
        authenticated_git_url(&self.web_url, &self.token, None, &repo.owner, &repo.name)
    }

    fn get_username(&self) -> &str {
        &self.username
    }

    fn get_remote_url(&self) -> &str {
        &self.host
    }
}

impl DestinationPlatform for GithubPlatform {
    fn validate_configuration(&self) -> PlatformFuture<'_, ()> {
        Box::pin(async move { self.check_user().await.map_err(configuration_error) })
    }

    fn create_repository(&self, source: &Repo, target_name: &str) -> PlatformFuture<'_, bool> {
        let json_body = GithubRepoCreation {
            name: target_name.to_string(),
            description: source.description.clone(),
            private: source.private,
            auto_init: false,
        };
        Box::pin(async move {
            let name = json_body.name.clone();
            if self.repository_exists(&name).await {
                warn!("Repository {} already exists on github", name);
                return Ok(true);
            }
            let request = self.request(Method::POST, "/user/repos").json(&json_body);
            let response = send(request, PlatformType::Github).await?;
            let status = response.status();
            if status.is_success() {
                info!("Created repository {} on github", name);
                return Ok(true);
            }
            let text = response.text().await.unwrap_or_default();
            if status == StatusCode::UNPROCESSABLE_ENTITY
                && text.to_lowercase().contains("already exists")
            {
                warn!("Repository {} already exists (422)", name);
                return Ok(true);
            }
            Err(GitMoverError::new(GitMoverErrorKind::Provider)
                .with_platform(PlatformType::Github)
                .with_text(&format!("create repository: {status} {text}")))
        })
    }

    fn repository_exists(&self, name: &str) -> LookupFuture<'_, bool> {
        let path = format!("/repos/{}/{}", encode(&self.username), encode(name));
        Box::pin(async move {
            match send(self.request(Method::GET, &path), PlatformType::Github).await {
                Ok(response) => response.status() == StatusCode::OK,
                Err(e) => {
                    debug!("Existence check of {} failed: {}", path, e);
                    false
                }
            }
        })
    }

    fn build_authenticated_push_url(&self, name: &str) -> Result<String, GitMoverError> {
        authenticated_git_url(&self.web_url, &self.token, None, &self.username, name)
    }

    fn get_username(&self) -> &str {
        &self.username
    }

    fn get_remote_url(&self) -> &str {
        &self.host
    }
}

#[cfg(test)]
mod test {
    use serde_json::{json, Value};
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::repo::test::sample_repo;

    fn github_repo(owner: &str, name: &str) -> Value {
        json!({
            "name": name,
            "owner": { "login": owner },
            "description": null,
            "private": true,
            "clone_url": format!("https://github.com/{owner}/{name}.git"),
            "ssh_url": format!("git@github.com:{owner}/{name}.git"),
            "html_url": format!("https://github.com/{owner}/{name}"),
            "default_branch": "main"
        })
    }

    fn platform(server: &MockServer) -> GithubPlatform {
        GithubPlatform::new(Some(&server.uri()), "alice".to_string(), "tok".to_string())
    }

    #[test]
    fn web_urls() {
        assert_eq!(web_url_for(GITHUB_API_URL), GITHUB_URL);
        assert_eq!(web_url_for("https://ghe.example.com/api/v3"), "https://ghe.example.com");
        assert_eq!(web_url_for("http://127.0.0.1:8080"), "http://127.0.0.1:8080");
    }

    #[test]
    fn token_only_credentials() {
        let platform = GithubPlatform::new(None, "alice".to_string(), "tok".to_string());
        assert_eq!(SourcePlatform::get_remote_url(&platform), "github.com");
        let clone = platform
            .build_authenticated_clone_url(&sample_repo("octo", "foo"))
            .unwrap();
        assert_eq!(clone, "https://tok@github.com/octo/foo.git");
        let push = platform.build_authenticated_push_url("foo").unwrap();
        assert_eq!(push, "https://tok@github.com/alice/foo.git");
    }

    #[tokio::test]
    async fn lists_user_and_organization_repositories() {
        let server = MockServer::start().await;
        let full: Vec<Value> = (0..GITHUB_PER_PAGE)
            .map(|i| github_repo("alice", &format!("r{i}")))
            .collect();
        Mock::given(method("GET"))
            .and(path("/user/repos"))
            .and(query_param("affiliation", "owner,collaborator"))
            .and(query_param("page", "1"))
            .and(header("Authorization", "Bearer tok"))
            .and(header(GITHUB_API_HEADER, GITHUB_API_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(full)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/user/repos"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                github_repo("bob", "shared"),
                github_repo("acme", "tool")
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/user/orgs"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{ "login": "acme" }, { "login": "locked" }])),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/orgs/acme/repos"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([github_repo("acme", "tool")])),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/orgs/locked/repos"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let platform = platform(&server);
        let all = platform.list_accessible_repositories().await.unwrap();
        assert_eq!(all.len(), GITHUB_PER_PAGE + 2);
        assert!(all.iter().any(|r| r.full_name() == "bob/shared"));
        assert_eq!(all.iter().filter(|r| r.full_name() == "acme/tool").count(), 1);
        assert_eq!(all[0].description, "");
        assert!(all[0].private);

        let own = platform.list_user_repositories().await.unwrap();
        assert_eq!(own.len(), GITHUB_PER_PAGE);
    }

    #[tokio::test]
    async fn create_accepts_already_exists_422() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/repos"))
            .and(body_partial_json(json!({ "name": "foo", "auto_init": false })))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "message": "Repository creation failed.",
                "errors": [{ "message": "name already exists on this account" }]
            })))
            .expect(1)
            .mount(&server)
            .await;
        assert!(platform(&server)
            .create_repository(&sample_repo("bob", "foo"), "foo")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn create_rejects_other_422() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/repos"))
            .respond_with(
                ResponseTemplate::new(422).set_body_json(json!({ "message": "name is invalid" })),
            )
            .mount(&server)
            .await;
        let err = platform(&server)
            .create_repository(&sample_repo("bob", "foo"), "foo")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), &GitMoverErrorKind::Provider);
    }

    #[tokio::test]
    async fn existing_repository_is_not_recreated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/alice/foo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(github_repo("alice", "foo")))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/user/repos"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;
        let platform = platform(&server);
        assert!(platform.repository_exists("foo").await);
        assert!(!platform.repository_exists("bar").await);
        assert!(platform
            .create_repository(&sample_repo("bob", "foo"), "foo")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn get_repository_swallows_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/broken"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;
        let platform = platform(&server);
        assert!(platform.get_repository("octo", "broken").await.is_none());
        assert!(platform.get_repository("octo", "missing").await.is_none());
    }
}
