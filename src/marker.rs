//! Marker composition and idempotent splicing.
//!
//! The marker is a single-line inline SQL comment appended after the query
//! text. Shape: `/*func_name=<NAME>,file=<LABEL>,line=<LINE>*/`, optionally
//! extended with `,col=<COL>`. Fields are emitted verbatim; missing call-site
//! parts fall back to `anonymous` / `unknown` / `0`.

use std::borrow::Cow;

use crate::callsite::CallSite;
use crate::config::AttributionConfig;
use crate::label::derive_label;

/// Opening token of an attribution marker.
pub(crate) const MARKER_OPEN: &str = "/*func_name=";

/// Closing delimiter of an inline SQL comment.
pub(crate) const COMMENT_CLOSE: &str = "*/";

/// Format the inline marker for a resolved call site.
pub fn format_marker(site: &CallSite, config: &AttributionConfig) -> String {
    let function = site.function.as_deref().unwrap_or("anonymous");
    let file = match &site.file {
        Some(path) => derive_label(path, &config.workspace_areas),
        None => "unknown".to_string(),
    };
    let line = site.line.unwrap_or(0);
    if config.record_column {
        let column = site.column.unwrap_or(0);
        format!("{MARKER_OPEN}{function},file={file},line={line},col={column}{COMMENT_CLOSE}")
    } else {
        format!("{MARKER_OPEN}{function},file={file},line={line}{COMMENT_CLOSE}")
    }
}

/// Whether the text already carries an attribution marker.
///
/// True when the trimmed text ends with a comment close and the marker's
/// opening token appears anywhere. Non-tracking trailing comments (no opening
/// token) do not count.
pub fn is_decorated(sql: &str) -> bool {
    sql.trim_end().ends_with(COMMENT_CLOSE) && sql.contains(MARKER_OPEN)
}

/// Append the call-site marker to `sql`.
///
/// With no call site, or when `sql` is already decorated, the original text is
/// returned borrowed and byte-identical — not even trailing whitespace is
/// touched. Otherwise the result is the trailing-trimmed text, one space, and
/// the marker. Interior text, placeholders, and unrelated comments are never
/// altered.
pub fn decorate<'a>(
    sql: &'a str,
    site: Option<&CallSite>,
    config: &AttributionConfig,
) -> Cow<'a, str> {
    let Some(site) = site else {
        return Cow::Borrowed(sql);
    };
    if is_decorated(sql) {
        return Cow::Borrowed(sql);
    }
    Cow::Owned(format!("{} {}", sql.trim_end(), format_marker(site, config)))
}
