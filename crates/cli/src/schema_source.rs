//! Form schema loading from a local path or an http(s) URL.

use std::path::Path;
use std::time::Duration;

use concord_recon::FormSchema;
use url::Url;

use crate::exit_codes::EXIT_CONFIG;
use crate::CliError;

const FETCH_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("concord/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource<'a> {
    Path(&'a Path),
    Url(String),
}

impl<'a> SchemaSource<'a> {
    pub fn parse(source: &'a str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            SchemaSource::Url(github_raw_url(source))
        } else {
            SchemaSource::Path(Path::new(source))
        }
    }
}

/// Rewrite `github.com/<owner>/<repo>/blob/<ref>/<path>` to the raw file URL.
/// Anything else is returned unchanged.
pub fn github_raw_url(source: &str) -> String {
    let Ok(url) = Url::parse(source) else {
        return source.to_string();
    };
    if url.host_str() != Some("github.com") {
        return source.to_string();
    }
    let segments: Vec<&str> = match url.path_segments() {
        Some(s) => s.collect(),
        None => return source.to_string(),
    };
    match segments.as_slice() {
        [owner, repo, "blob", rest @ ..] if !rest.is_empty() => {
            format!("https://raw.githubusercontent.com/{owner}/{repo}/{}", rest.join("/"))
        }
        _ => source.to_string(),
    }
}

/// Load and parse a form schema from `source`.
pub fn load_schema(source: &str) -> Result<FormSchema, CliError> {
    let text = match SchemaSource::parse(source) {
        SchemaSource::Path(path) => std::fs::read_to_string(path).map_err(|e| {
            schema_err(format!("cannot read form schema {}: {e}", path.display()))
        })?,
        SchemaSource::Url(url) => fetch(&url)?,
    };

    let schema = FormSchema::from_json(&text)
        .map_err(|e| schema_err(format!("{source}: {e}")))?;
    tracing::debug!(
        source,
        fields = schema.fields.len(),
        columns = ?schema.column_names(),
        "loaded form schema"
    );
    Ok(schema)
}

fn fetch(url: &str) -> Result<String, CliError> {
    tracing::info!(url, "downloading form schema");

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| schema_err(format!("cannot build HTTP client: {e}")))?;

    let resp = client
        .get(url)
        .send()
        .map_err(|e| schema_err(format!("cannot fetch form schema {url}: {e}")))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(schema_err(format!("cannot fetch form schema {url}: HTTP {}", status.as_u16()))
            .with_hint("check the URL, or download the schema and pass a local path"));
    }

    resp.text()
        .map_err(|e| schema_err(format!("cannot read form schema response from {url}: {e}")))
}

fn schema_err(message: String) -> CliError {
    CliError {
        code: EXIT_CONFIG,
        message,
        hint: None,
    }
}
