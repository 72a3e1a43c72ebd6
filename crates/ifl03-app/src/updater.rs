//! Release checker: GitHub Releases metadata for the update button and
//! the release notes modal.

use std::sync::OnceLock;
use std::time::Duration;

use ifl03_common::version::normalize_version;
use ifl03_common::RemoteFetchError;
use ifl03_config::schema::UpdatesConfig;
use ifl03_ui::LatestRelease;
use regex::Regex;
use serde::Deserialize;

pub const GITHUB_API: &str = "https://api.github.com";
pub const NO_RELEASE_NOTES: &str = "No release notes available.";

/// A GitHub release entry.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubRelease {
    /// The tag name, e.g. "v0.2.0".
    #[serde(default)]
    pub tag_name: String,
    /// URL to the release page.
    pub html_url: Option<String>,
    /// Release notes body (markdown).
    pub body: Option<String>,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    #[serde(default)]
    pub name: String,
    pub browser_download_url: Option<String>,
}

impl GithubRelease {
    /// Tag without its `v` prefix; `None` for an untagged release.
    pub fn version(&self) -> Option<String> {
        let version = normalize_version(&self.tag_name);
        (!version.is_empty()).then_some(version)
    }

    /// Where the update button sends the user: the installer asset, else
    /// the first asset, else the release page.
    pub fn download_url(&self) -> Option<String> {
        let is_installer = |a: &&ReleaseAsset| {
            let name = a.name.to_lowercase();
            name.contains("setup") && name.ends_with(".exe")
        };
        self.assets
            .iter()
            .find(is_installer)
            .or_else(|| self.assets.first())
            .and_then(|a| a.browser_download_url.clone())
            .or_else(|| self.html_url.clone())
    }

    pub fn to_latest(&self) -> Option<LatestRelease> {
        Some(LatestRelease {
            version: self.version()?,
            download_url: self.download_url(),
        })
    }
}

/// Fetches release metadata. Every failure is logged and swallowed.
pub struct UpdateChecker {
    enabled: bool,
    api_base: String,
    timeout: Duration,
}

impl UpdateChecker {
    pub fn new(config: &UpdatesConfig) -> Self {
        Self::with_api_base(config, GITHUB_API)
    }

    pub fn with_api_base(config: &UpdatesConfig, api_base: &str) -> Self {
        Self {
            enabled: config.enabled,
            api_base: format!(
                "{}/repos/{}",
                api_base.trim_end_matches('/'),
                config.repo_slug()
            ),
            timeout: Duration::from_secs(u64::from(config.timeout_secs)),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Newest published release, if reachable.
    pub async fn latest(&self) -> Option<GithubRelease> {
        if !self.enabled {
            return None;
        }
        self.fetch("releases/latest")
            .await
            .inspect_err(|e| tracing::debug!(error = %e, "release check failed"))
            .ok()
    }

    /// Formatted notes for the installed version, falling back to the
    /// latest release and then to a fixed message.
    pub async fn release_notes(&self, installed_version: Option<&str>) -> String {
        let mut body = None;

        if self.enabled {
            if let Some(version) = installed_version.filter(|v| !v.is_empty()) {
                let path = format!("releases/tags/v{version}");
                body = self.fetch_body(&path).await;
            }
            if body.is_none() {
                body = self.fetch_body("releases/latest").await;
            }
        }

        format_release_notes(body.as_deref().unwrap_or(NO_RELEASE_NOTES))
    }

    async fn fetch_body(&self, path: &str) -> Option<String> {
        match self.fetch(path).await {
            Ok(release) => release.body.filter(|b| !b.is_empty()),
            Err(e) => {
                tracing::debug!(path, error = %e, "release notes fetch failed");
                None
            }
        }
    }

    async fn fetch(&self, path: &str) -> Result<GithubRelease, RemoteFetchError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| RemoteFetchError::Network(e.to_string()))?;

        let response = client
            .get(format!("{}/{}", self.api_base, path))
            .header("User-Agent", "ifl03-updater")
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| RemoteFetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteFetchError::Status(status.as_u16()));
        }

        response
            .json::<GithubRelease>()
            .await
            .map_err(|e| RemoteFetchError::Parse(e.to_string()))
    }
}

fn sentence_newline() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.\r?\n").expect("valid regex"))
}

fn sentence_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.\s+([A-Z])").expect("valid regex"))
}

fn newline() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\r?\n").expect("valid regex"))
}

/// Render release notes as HTML: escape markup, put a blank line after
/// every sentence and turn remaining newlines into `<br>`.
pub fn format_release_notes(text: &str) -> String {
    let escaped = text
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");

    let t = sentence_newline().replace_all(&escaped, ".<br><br>");
    let mut t = sentence_break()
        .replace_all(&t, ".<br><br>${1}")
        .into_owned();
    if t.ends_with('.') {
        t.push_str("<br><br>");
    }
    newline().replace_all(&t, "<br>").into_owned()
}
