use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, LINK};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{InboxError, Result};
use crate::filter::{apply_tab_query, has_type_qualifier};
use crate::forge::Forge;
use crate::types::{
    Comment, CommentPage, ItemDetail, ItemKind, ItemState, ItemSummary, PrMeta, Review,
    ReviewTally,
};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const SEARCH_PAGE_SIZE: u32 = 50;
const COMMENT_PAGE_SIZE: u32 = 10;
const USER_AGENT: &str = "gh-inbox";

pub struct GitHub {
    client: Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for GitHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHub")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

// GitHub REST API response types

#[derive(Deserialize)]
struct GhUser {
    #[serde(default)]
    login: String,
}

#[derive(Deserialize)]
struct GhLabel {
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct GhSearch {
    #[serde(default)]
    items: Vec<GhSearchItem>,
}

#[derive(Deserialize)]
struct GhSearchItem {
    title: String,
    number: u64,
    html_url: String,
    #[serde(default)]
    repository_url: String,
    pull_request: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct GhIssue {
    title: String,
    body: Option<String>,
    state: String,
    #[serde(default)]
    html_url: String,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    comments: u64,
    #[serde(default)]
    labels: Vec<GhLabel>,
    #[serde(default)]
    assignees: Vec<GhUser>,
    user: Option<GhUser>,
    pull_request: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct GhPull {
    #[serde(default)]
    draft: bool,
    mergeable: Option<bool>,
    #[serde(default)]
    additions: u64,
    #[serde(default)]
    deletions: u64,
    #[serde(default)]
    changed_files: u64,
    #[serde(default)]
    commits: u64,
}

#[derive(Deserialize)]
struct GhReview {
    #[serde(default)]
    state: String,
    user: Option<GhUser>,
    submitted_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct GhComment {
    body: Option<String>,
    updated_at: DateTime<Utc>,
    user: Option<GhUser>,
}

fn login(user: Option<GhUser>) -> String {
    user.map(|u| u.login).unwrap_or_default()
}

fn kind_of(pull_request: &Option<serde_json::Value>) -> ItemKind {
    if pull_request.is_some() {
        ItemKind::Pr
    } else {
        ItemKind::Issue
    }
}

fn ensure_target(item: &ItemSummary) -> Result<()> {
    if item.repo.is_empty() || item.number == 0 {
        return Err(InboxError::Precondition("missing repo or number".into()));
    }
    Ok(())
}

impl GitHub {
    pub fn new(token: String, base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn ensure_token(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(InboxError::Precondition("GITHUB_TOKEN is required".into()));
        }
        Ok(())
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(ACCEPT, "application/vnd.github+json")
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
    }

    /// Send a request, turning any non-2xx response into `InboxError::Api`.
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InboxError::Api {
                status,
                body: body.trim().to_string(),
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!(%url, "GET");
        let response = self.send(self.request(Method::GET, url)).await?;
        Ok(response.json().await?)
    }

    async fn search_once(&self, query: &str) -> Result<Vec<ItemSummary>> {
        tracing::debug!(query, "search");
        let request = self
            .request(Method::GET, &self.api_url("/search/issues"))
            .query(&[
                ("q", query.to_string()),
                ("per_page", SEARCH_PAGE_SIZE.to_string()),
            ]);
        let payload: GhSearch = self.send(request).await?.json().await?;

        Ok(payload
            .items
            .into_iter()
            .map(|item| ItemSummary {
                kind: kind_of(&item.pull_request),
                repo: repo_name_from_api_url(&item.repository_url),
                title: item.title,
                number: item.number,
                url: item.html_url,
            })
            .collect())
    }

    async fn fetch_comments(&self, item: &ItemSummary, page: u32) -> Result<CommentPage> {
        ensure_target(item)?;
        let url = self.api_url(&format!(
            "/repos/{}/issues/{}/comments",
            item.repo, item.number
        ));
        tracing::debug!(%url, page, "GET comments");
        let request = self.request(Method::GET, &url).query(&[
            ("per_page", COMMENT_PAGE_SIZE.to_string()),
            ("page", page.to_string()),
        ]);
        let response = self.send(request).await?;

        let link = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let payload: Vec<GhComment> = response.json().await?;
        let comments = payload
            .into_iter()
            .map(|c| Comment {
                author: login(c.user),
                body: c.body.unwrap_or_default(),
                updated_at: c.updated_at,
            })
            .collect();

        Ok(CommentPage {
            comments,
            page,
            has_next: has_link_rel(&link, "next"),
            has_prev: has_link_rel(&link, "prev"),
        })
    }

    async fn fetch_pr_meta(&self, item: &ItemSummary) -> Result<PrMeta> {
        let url = self.api_url(&format!("/repos/{}/pulls/{}", item.repo, item.number));
        let pr: GhPull = self.get_json(&url).await?;

        // Reviews are part of the PR metadata; failing here fails the detail.
        let reviews = self.fetch_reviews(item).await?;

        Ok(PrMeta {
            draft: pr.draft,
            mergeable: pr.mergeable.into(),
            additions: pr.additions,
            deletions: pr.deletions,
            changed_files: pr.changed_files,
            commits: pr.commits,
            reviews,
        })
    }

    async fn fetch_reviews(&self, item: &ItemSummary) -> Result<ReviewTally> {
        let url = self.api_url(&format!(
            "/repos/{}/pulls/{}/reviews",
            item.repo, item.number
        ));
        let payload: Vec<GhReview> = self.get_json(&url).await?;
        let reviews: Vec<Review> = payload
            .into_iter()
            .map(|r| Review {
                user: login(r.user),
                state: r.state,
                submitted_at: r.submitted_at,
            })
            .collect();
        Ok(ReviewTally::from_reviews(&reviews))
    }
}

#[async_trait]
impl Forge for GitHub {
    async fn search_items(&self, query: &str, kind: Option<ItemKind>) -> Result<Vec<ItemSummary>> {
        self.ensure_token()?;
        let query = match kind {
            Some(kind) => apply_tab_query(query, kind),
            None => query.trim().to_string(),
        };

        if has_type_qualifier(&query) {
            return self.search_once(&query).await;
        }

        // Without a type qualifier the search endpoint mixes results
        // ambiguously, so ask for each kind explicitly.
        let issues = self
            .search_once(format!("{} is:issue", query).trim())
            .await?;
        let prs = self.search_once(format!("{} is:pr", query).trim()).await?;
        Ok(merge_by_url(issues, prs))
    }

    async fn fetch_detail(&self, item: &ItemSummary, comment_page: u32) -> Result<ItemDetail> {
        self.ensure_token()?;
        ensure_target(item)?;
        let comment_page = comment_page.max(1);

        let url = self.api_url(&format!("/repos/{}/issues/{}", item.repo, item.number));
        let issue: GhIssue = self.get_json(&url).await?;
        let kind = kind_of(&issue.pull_request);

        let comments = self.fetch_comments(item, comment_page).await?;

        let pr = match kind {
            ItemKind::Pr => Some(self.fetch_pr_meta(item).await?),
            ItemKind::Issue => None,
        };

        let url = if issue.html_url.is_empty() {
            item.url.clone()
        } else {
            issue.html_url
        };

        Ok(ItemDetail {
            item: ItemSummary {
                title: issue.title,
                repo: item.repo.clone(),
                number: item.number,
                url,
                kind,
            },
            body: issue.body.unwrap_or_default(),
            state: if issue.state.eq_ignore_ascii_case("closed") {
                ItemState::Closed
            } else {
                ItemState::Open
            },
            author: login(issue.user),
            updated_at: issue.updated_at,
            comment_count: issue.comments,
            labels: issue
                .labels
                .into_iter()
                .map(|l| l.name)
                .filter(|n| !n.is_empty())
                .collect(),
            assignees: issue
                .assignees
                .into_iter()
                .map(|a| a.login)
                .filter(|l| !l.is_empty())
                .collect(),
            pr,
            comments,
        })
    }

    async fn post_comment(&self, item: &ItemSummary, body: &str) -> Result<()> {
        self.ensure_token()?;
        ensure_target(item)?;
        let url = self.api_url(&format!(
            "/repos/{}/issues/{}/comments",
            item.repo, item.number
        ));
        tracing::info!(repo = %item.repo, number = item.number, "posting comment");
        let payload = serde_json::json!({ "body": body });
        self.send(self.request(Method::POST, &url).json(&payload))
            .await?;
        Ok(())
    }

    async fn set_state(&self, item: &ItemSummary, state: ItemState) -> Result<()> {
        self.ensure_token()?;
        ensure_target(item)?;
        let url = self.api_url(&format!("/repos/{}/issues/{}", item.repo, item.number));
        tracing::info!(repo = %item.repo, number = item.number, %state, "updating state");
        let payload = serde_json::json!({ "state": state.as_api_str() });
        self.send(self.request(Method::PATCH, &url).json(&payload))
            .await?;
        Ok(())
    }
}

/// Concatenate two result sets, keeping only the first occurrence of each URL.
pub fn merge_by_url(first: Vec<ItemSummary>, second: Vec<ItemSummary>) -> Vec<ItemSummary> {
    let mut seen = HashSet::new();
    first
        .into_iter()
        .chain(second)
        .filter(|item| seen.insert(item.url.clone()))
        .collect()
}

/// Whether a `Link` header advertises the given relation.
pub fn has_link_rel(link_header: &str, rel: &str) -> bool {
    if link_header.is_empty() {
        return false;
    }
    let needle = format!("rel=\"{}\"", rel);
    link_header.split(',').any(|part| part.contains(&needle))
}

/// `https://api.github.com/repos/owner/name` -> `owner/name`
pub fn repo_name_from_api_url(api_url: &str) -> String {
    const UNKNOWN: &str = "unknown/repo";
    let Ok(parsed) = Url::parse(api_url) else {
        return UNKNOWN.to_string();
    };
    let parts: Vec<&str> = parsed
        .path()
        .trim_matches('/')
        .split('/')
        .filter(|p| !p.is_empty())
        .collect();
    match parts.as_slice() {
        [.., owner, name] => format!("{}/{}", owner, name),
        _ => UNKNOWN.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{any, body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GitHub {
        GitHub::new("t0ken".into(), &server.uri(), Duration::from_secs(5)).unwrap()
    }

    fn search_item(repo: &str, number: u64, pr: bool) -> serde_json::Value {
        let kind = if pr { "pull" } else { "issues" };
        let mut item = json!({
            "title": format!("item {}", number),
            "number": number,
            "html_url": format!("https://github.com/{}/{}/{}", repo, kind, number),
            "repository_url": format!("https://api.github.com/repos/{}", repo),
        });
        if pr {
            item["pull_request"] = json!({ "url": "x" });
        }
        item
    }

    fn target(kind: ItemKind) -> ItemSummary {
        ItemSummary {
            title: "t".into(),
            repo: "octo/app".into(),
            number: 12,
            url: "https://github.com/octo/app/issues/12".into(),
            kind,
        }
    }

    #[test]
    fn link_rel_detection() {
        let header = r#"<https://api.github.com/x?page=3>; rel="next", <https://api.github.com/x?page=1>; rel="prev""#;
        assert!(has_link_rel(header, "next"));
        assert!(has_link_rel(header, "prev"));
        assert!(!has_link_rel(header, "last"));
        assert!(!has_link_rel("", "next"));
    }

    #[test]
    fn repo_name_from_api_urls() {
        assert_eq!(
            repo_name_from_api_url("https://api.github.com/repos/rust-lang/rust"),
            "rust-lang/rust"
        );
        assert_eq!(repo_name_from_api_url(""), "unknown/repo");
        assert_eq!(repo_name_from_api_url("not a url"), "unknown/repo");
        assert_eq!(repo_name_from_api_url("https://example.com/solo"), "unknown/repo");
    }

    #[test]
    fn merge_keeps_first_occurrence() {
        let a = ItemSummary {
            title: "a".into(),
            repo: "o/r".into(),
            number: 1,
            url: "u1".into(),
            kind: ItemKind::Issue,
        };
        let b = ItemSummary {
            url: "u2".into(),
            number: 2,
            kind: ItemKind::Pr,
            ..a.clone()
        };
        let dup = ItemSummary {
            title: "dup".into(),
            kind: ItemKind::Pr,
            ..a.clone()
        };
        let merged = merge_by_url(vec![a.clone()], vec![dup, b.clone()]);
        assert_eq!(merged, vec![a, b]);
    }

    #[tokio::test]
    async fn search_without_qualifier_runs_both_passes_and_dedups() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .and(query_param("q", "is:open is:issue"))
            .and(query_param("per_page", "50"))
            .and(header("authorization", "Bearer t0ken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [search_item("octo/app", 1, false), search_item("octo/app", 3, true)]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .and(query_param("q", "is:open is:pr"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    search_item("octo/app", 2, true),
                    search_item("octo/app", 3, true),
                    search_item("octo/lib", 4, true),
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let items = client(&server).search_items("is:open", None).await.unwrap();
        let numbers: Vec<u64> = items.iter().map(|i| i.number).collect();
        assert_eq!(numbers, vec![1, 3, 2, 4]);
        assert_eq!(items[0].kind, ItemKind::Issue);
        assert_eq!(items[1].kind, ItemKind::Pr);
        assert_eq!(items[3].repo, "octo/lib");
    }

    #[tokio::test]
    async fn search_with_tab_kind_runs_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .and(query_param("q", "is:open archived:false involves:@me is:pr"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    search_item("octo/app", 1, true),
                    search_item("octo/app", 2, true),
                    search_item("octo/app", 3, true),
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let items = client(&server)
            .search_items("is:open archived:false involves:@me", Some(ItemKind::Pr))
            .await
            .unwrap();
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|i| i.kind == ItemKind::Pr));
    }

    #[tokio::test]
    async fn search_error_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .respond_with(ResponseTemplate::new(422).set_body_string("Validation Failed\n"))
            .mount(&server)
            .await;

        let err = client(&server)
            .search_items("is:pr", None)
            .await
            .unwrap_err();
        match err {
            InboxError::Api { status, body } => {
                assert_eq!(status.as_u16(), 422);
                assert_eq!(body, "Validation Failed");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_token_fails_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let github = GitHub::new(String::new(), &server.uri(), Duration::from_secs(5)).unwrap();
        let err = github.search_items("is:pr", None).await.unwrap_err();
        assert!(matches!(err, InboxError::Precondition(_)));
        let err = github
            .post_comment(&target(ItemKind::Issue), "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, InboxError::Precondition(_)));
    }

    #[tokio::test]
    async fn missing_number_fails_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut item = target(ItemKind::Issue);
        item.number = 0;
        let err = client(&server)
            .set_state(&item, ItemState::Closed)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "missing repo or number");
    }

    #[tokio::test]
    async fn issue_detail_with_paginated_comments() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/app/issues/12"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "title": "Crash on start",
                "body": "It crashes.",
                "state": "closed",
                "html_url": "https://github.com/octo/app/issues/12",
                "updated_at": "2024-05-01T10:00:00Z",
                "comments": 14,
                "labels": [{ "name": "bug" }, { "name": "" }, { "name": "P1" }],
                "assignees": [],
                "user": { "login": "alice" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/app/issues/12/comments"))
            .and(query_param("per_page", "10"))
            .and(query_param("page", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header(
                        "link",
                        r#"<https://api.github.com/x?page=1>; rel="prev", <https://api.github.com/x?page=1>; rel="first""#,
                    )
                    .set_body_json(json!([
                        { "body": "me too", "updated_at": "2024-05-02T10:00:00Z", "user": { "login": "bob" } },
                        { "body": null, "updated_at": "2024-05-03T10:00:00Z", "user": null }
                    ])),
            )
            .mount(&server)
            .await;

        let detail = client(&server)
            .fetch_detail(&target(ItemKind::Issue), 2)
            .await
            .unwrap();
        assert_eq!(detail.item.kind, ItemKind::Issue);
        assert_eq!(detail.state, ItemState::Closed);
        assert_eq!(detail.author, "alice");
        assert_eq!(detail.comment_count, 14);
        assert_eq!(detail.labels, vec!["bug", "P1"]);
        assert!(detail.assignees.is_empty());
        assert!(detail.pr.is_none());
        assert_eq!(detail.comments.page, 2);
        assert!(detail.comments.has_prev);
        assert!(!detail.comments.has_next);
        assert_eq!(detail.comments.comments.len(), 2);
        assert_eq!(detail.comments.comments[0].author, "bob");
        assert_eq!(detail.comments.comments[1].body, "");
    }

    #[tokio::test]
    async fn pr_detail_includes_metadata_and_review_tally() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/app/issues/12"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "title": "Add feature",
                "body": null,
                "state": "open",
                "html_url": "https://github.com/octo/app/pull/12",
                "updated_at": "2024-05-01T10:00:00Z",
                "comments": 0,
                "labels": [],
                "assignees": [{ "login": "carol" }],
                "user": { "login": "alice" },
                "pull_request": { "url": "https://api.github.com/repos/octo/app/pulls/12" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/app/issues/12/comments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/app/pulls/12"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "draft": true,
                "mergeable": null,
                "additions": 40,
                "deletions": 2,
                "changed_files": 3,
                "commits": 5
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/app/pulls/12/reviews"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "state": "COMMENTED", "user": { "login": "dan" }, "submitted_at": "2024-05-01T08:00:00Z" },
                { "state": "APPROVED", "user": { "login": "dan" }, "submitted_at": "2024-05-01T09:00:00Z" },
                { "state": "CHANGES_REQUESTED", "user": { "login": "eve" }, "submitted_at": "2024-05-01T09:30:00Z" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let detail = client(&server)
            .fetch_detail(&target(ItemKind::Issue), 1)
            .await
            .unwrap();
        assert_eq!(detail.item.kind, ItemKind::Pr);
        assert_eq!(detail.item.url, "https://github.com/octo/app/pull/12");
        assert_eq!(detail.assignees, vec!["carol"]);
        assert!(!detail.comments.has_next);
        assert!(!detail.comments.has_prev);
        let pr = detail.pr.expect("pr metadata");
        assert!(pr.draft);
        assert_eq!(pr.mergeable, crate::types::Mergeable::Unknown);
        assert_eq!((pr.additions, pr.deletions), (40, 2));
        assert_eq!((pr.changed_files, pr.commits), (3, 5));
        assert_eq!(
            pr.reviews,
            ReviewTally {
                approvals: 1,
                changes_requested: 1,
                commented: 0,
            }
        );
    }

    #[tokio::test]
    async fn failing_reviews_abort_the_detail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/app/issues/12"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "title": "Add feature",
                "state": "open",
                "updated_at": "2024-05-01T10:00:00Z",
                "pull_request": {}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/app/issues/12/comments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/app/pulls/12"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/app/pulls/12/reviews"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client(&server)
            .fetch_detail(&target(ItemKind::Pr), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, InboxError::Api { status, .. } if status.as_u16() == 500));
    }

    #[tokio::test]
    async fn post_comment_sends_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/octo/app/issues/12/comments"))
            .and(body_json(json!({ "body": "LGTM" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 1 })))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .post_comment(&target(ItemKind::Pr), "LGTM")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn set_state_patches_issue() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/repos/octo/app/issues/12"))
            .and(body_json(json!({ "state": "open" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .set_state(&target(ItemKind::Issue), ItemState::Open)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn set_state_forbidden_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/repos/octo/app/issues/12"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Must have admin rights"))
            .mount(&server)
            .await;

        let err = client(&server)
            .set_state(&target(ItemKind::Issue), ItemState::Closed)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "GitHub API error: 403 Forbidden: Must have admin rights"
        );
    }
}
