//! Pure steps of turning an `mpv://` link into player arguments.
//!
//! The application layer strings these together with logging and the
//! player-existence check:
//!
//! ```text
//! "mpv://https%3A%2F%2Fcdn.example%2Fhls%2Fa.m3u8"
//!    │ strip_scheme
//!    ▼
//! "https%3A%2F%2Fcdn.example%2Fhls%2Fa.m3u8"
//!    │ query_unescape
//!    ▼
//! "https://cdn.example/hls/a.m3u8"
//!    │ url_path + OverrideMap::first_match
//!    ▼
//! "/hls/a.m3u8"  →  ("/hls/", "AgentA")
//!    │ build_arguments
//!    ▼
//! ["--user-agent=AgentA", "https://cdn.example/hls/a.m3u8"]
//! ```

use std::path::Path;

use url::Url;

use crate::codec::percent::path_unescape;

/// Literal prefix every handled argument must start with.  Case-sensitive.
pub const SCHEME_PREFIX: &str = "mpv://";

/// Player flag carrying the selected override value.
pub const USER_AGENT_FLAG: &str = "--user-agent=";

/// Returns the payload after [`SCHEME_PREFIX`], or `None` when the prefix is absent.
pub fn strip_scheme(raw: &str) -> Option<&str> {
    raw.strip_prefix(SCHEME_PREFIX)
}

/// Extracts the percent-decoded path component used for override matching.
///
/// `Url::path` is the serialized form, so spaces and non-ASCII segments come
/// back escaped; they are decoded here so patterns are written as plain
/// text.
///
/// Returns `None` when `decoded` is not an absolute URL, is an opaque URL
/// such as `mailto:x`, has a malformed escape in its path, or has no path
/// beyond the root `/`.  The `url` crate normalizes an empty path to `/`, so
/// a bare `/` is treated as "no path" as well; a pattern of `/` therefore
/// never matches a root URL.
pub fn url_path(decoded: &str) -> Option<String> {
    let parsed = Url::parse(decoded).ok()?;
    if parsed.cannot_be_a_base() {
        return None;
    }
    match parsed.path() {
        "" | "/" => None,
        path => path_unescape(path).ok(),
    }
}

/// Builds the player's argument vector.
///
/// The decoded URL is always the last argument.  A non-empty override is
/// prepended as `--user-agent=<value>`.
pub fn build_arguments(decoded: &str, user_agent: Option<&str>) -> Vec<String> {
    let mut args = Vec::with_capacity(2);
    if let Some(ua) = user_agent.filter(|ua| !ua.is_empty()) {
        args.push(format!("{USER_AGENT_FLAG}{ua}"));
    }
    args.push(decoded.to_string());
    args
}

/// Human-readable command line for log output.  Not shell-quoted.
pub fn render_command_line(player: &Path, args: &[String]) -> String {
    let mut line = player.display().to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}
