//! URL decomposition for length checks and scoped rules.

use url::Url;

use crate::error::{Error, Result};

/// The parts of a URL the filter needs.
///
/// The `url` crate validates the URL and supplies the host. Lengths are
/// taken from the text as written, before percent-encoding or dot-segment
/// removal, so the guard limits what the crawler was actually handed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts {
    /// Lower-case host, empty for host-less URLs
    pub host: String,
    /// Byte length of the input string
    pub full_len: usize,
    /// Byte length of the path as written
    pub path_len: usize,
    /// Byte length of the query as written, without the `?`
    pub query_len: usize,
}

impl UrlParts {
    /// Decompose an absolute URL.
    pub fn parse(input: &str) -> Result<Self> {
        let url = Url::parse(input).map_err(|e| Error::MalformedUrl {
            url: input.to_string(),
            reason: e.to_string(),
        })?;

        let (path, query) = raw_path_and_query(input, &url);
        Ok(Self {
            host: url.host_str().unwrap_or("").to_ascii_lowercase(),
            full_len: input.len(),
            path_len: path.len(),
            query_len: query.map_or(0, str::len),
        })
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Locate the raw path and query of an input `Url::parse` accepted.
fn raw_path_and_query<'a>(input: &'a str, url: &Url) -> (&'a str, Option<&'a str>) {
    // Leading and trailing C0 controls and spaces are ignored by the parser.
    let input = input.trim_matches(|c: char| c <= ' ');
    let input = input.split_once('#').map_or(input, |(before, _)| before);
    let (rest, query) = match input.split_once('?') {
        Some((rest, query)) => (rest, Some(query)),
        None => (input, None),
    };

    let after_scheme = rest.get(url.scheme().len() + 1..).unwrap_or("");
    if url.cannot_be_a_base() {
        return (after_scheme, query);
    }

    let path = if url.host_str().map_or(false, |host| !host.is_empty()) {
        let authority = after_scheme.trim_start_matches(is_separator);
        authority
            .find(is_separator)
            .map_or("", |at| &authority[at..])
    } else {
        after_scheme.strip_prefix("//").unwrap_or(after_scheme)
    };
    (path, query)
}
