//! Mock GitHub API helpers
//!
//! Sets up wiremock endpoints for organization listings, release lookups,
//! and asset downloads.

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{ORG, TOKEN};

/// Mount `GET /orgs/{ORG}/repos` returning the given repository names
pub async fn mock_repositories(server: &MockServer, names: &[&str]) {
    let body: Vec<_> = names.iter().map(|name| json!({ "name": name })).collect();
    Mock::given(method("GET"))
        .and(path(format!("/orgs/{}/repos", ORG)))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a release JSON at `/repos/{ORG}/{repo}/releases/{suffix}`
///
/// Each asset named in `assets` downloads from `/downloads/{name}`.
pub async fn mock_release(server: &MockServer, repo: &str, suffix: &str, tag: &str, assets: &[&str]) {
    let assets: Vec<_> = assets
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "browser_download_url": format!("{}/downloads/{}", server.uri(), name),
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path(format!("/repos/{}/{}/releases/{}", ORG, repo, suffix)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tag_name": tag,
            "name": format!("Release {}", tag),
            "assets": assets,
        })))
        .mount(server)
        .await;
}

/// Mount a 404 at `/repos/{ORG}/{repo}/releases/{suffix}`
pub async fn mock_missing_release(server: &MockServer, repo: &str, suffix: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/{}/{}/releases/{}", ORG, repo, suffix)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found"
        })))
        .mount(server)
        .await;
}

/// Mount an asset download that must be requested exactly `times` times
pub async fn mock_asset(server: &MockServer, name: &str, content: &[u8], times: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/downloads/{}", name)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .expect(times)
        .mount(server)
        .await;
}

/// Fail every asset download; the server verifies none is attempted when `times` is 0
pub async fn mock_no_downloads(server: &MockServer) {
    Mock::given(method("GET"))
        .and(wiremock::matchers::path_regex(r"^/downloads/.*$"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}
