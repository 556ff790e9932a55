//! Call-site resolution by walking the live stack.
//!
//! Walks frames innermost-out and yields the first one that belongs to
//! application code: a frame with a resolvable source file that is neither part
//! of this crate nor of the ORM/driver/runtime plumbing underneath it. The skip
//! is by identity, never by a fixed frame count, so wrapper layers can be added
//! or removed without breaking attribution.

use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::AttributionConfig;

/// A resolved application call site.
///
/// All fields are optional; marker composition substitutes sentinel values
/// (`anonymous`, `unknown`, `0`) for anything missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallSite {
    /// Demangled function path, hash and closure suffixes stripped.
    pub function: Option<String>,
    /// Absolute source file of the frame.
    pub file: Option<PathBuf>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

// This crate's own module path; its frames are always skipped.
static CRATE_MODULE: Lazy<String> = Lazy::new(|| env!("CARGO_PKG_NAME").replace('-', "_"));

// `app::load_user::hb2d43a1708a195e7` — legacy-mangling hash suffix.
static HASH_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"::h[0-9a-f]{16}$").unwrap());

// `app::load_user::{{closure}}` / `app::load_user::{closure#0}` — async fns and
// closures resolve to the enclosing function.
static CLOSURE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:::\{\{closure\}\}(?:#\d+)?|::\{closure(?:#\d+)?\})+$").unwrap());

/// Resolve the application call site of the current invocation.
///
/// Returns `None` when attribution is disabled or no frame outside the
/// internal skip-lists carries a source file. Never panics and touches no
/// process-wide state; the walk stops at the first acceptable frame.
pub fn resolve_call_site(config: &AttributionConfig) -> Option<CallSite> {
    if !config.enabled {
        return None;
    }

    let mut found: Option<CallSite> = None;
    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            if found.is_some() {
                return;
            }
            let Some(file) = symbol.filename() else {
                return;
            };
            let path = file.to_string_lossy();
            if config.exclude_paths.iter().any(|p| path.contains(p.as_str())) {
                return;
            }
            let name = symbol.name().map(|n| n.to_string());
            if let Some(raw) = name.as_deref() {
                if symbol_in_module(raw, &CRATE_MODULE)
                    || config
                        .internal_modules
                        .iter()
                        .any(|module| symbol_in_module(raw, module))
                {
                    return;
                }
            }
            found = Some(CallSite {
                function: name.as_deref().and_then(clean_symbol),
                file: Some(file.to_path_buf()),
                line: symbol.lineno(),
                column: symbol.colno(),
            });
        });
        found.is_none()
    });
    found
}

/// Whether a demangled symbol belongs to the given top-level module.
///
/// Handles both plain paths (`sea_orm::query::x`) and trait-impl paths
/// (`<sea_orm::DatabaseConnection as …>::execute`).
fn symbol_in_module(symbol: &str, module: &str) -> bool {
    let symbol = symbol.strip_prefix('<').unwrap_or(symbol);
    match symbol.strip_prefix(module) {
        Some(rest) => rest.starts_with("::"),
        None => false,
    }
}

/// Strip the mangling hash and trailing closure segments from a demangled
/// symbol. Empty results (nothing but closure machinery) become `None`.
fn clean_symbol(raw: &str) -> Option<String> {
    let without_hash = HASH_SUFFIX.replace(raw, "");
    let cleaned = CLOSURE_SUFFIX.replace(&without_hash, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}
