//! Path label derivation for the `file=` marker field.
//!
//! Turns an absolute source path into a short, stable label: a workspace-area
//! relative path for application code, a bracketed package name for dependency
//! checkouts, or the bare filename when neither applies.

use std::path::{Component, Path};

use once_cell::sync::Lazy;
use regex::Regex;

// `serde-1.0.190`, `async-trait-0.1.77` — crate dir inside a registry checkout.
static REGISTRY_VERSION_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-\d+\.\d+\.\d+(?:[-+][0-9A-Za-z.\-]+)?$").unwrap());

// `sea-orm-7f3a2b1c9d8e4f50` — repo dir inside a git checkout.
static GIT_HASH_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"-[0-9a-f]{7,}$").unwrap());

/// Derive the label for a source path.
///
/// Rules, first match wins:
/// 1. The path contains a workspace-area component from `workspace_areas` —
///    label is `<area>/<remainder>`. The allow-list is consulted in declaration
///    order, so when several areas could match, the first one declared wins
///    regardless of their positions in the path.
/// 2. The path points into a dependency checkout (cargo registry, cargo git
///    checkout, or rustc toolchain sources) — label is the bracketed package
///    name, e.g. `[serde]`, or `[dependency]` when the name cannot be isolated.
/// 3. Otherwise — the bare filename.
///
/// Pure and total: same path and allow-list always yield the same label, and
/// every input yields one.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use sea_orm_callsite::derive_label;
///
/// let areas = vec!["lib".to_string()];
/// assert_eq!(
///     derive_label(Path::new("/repo/lib/utils/date.rs"), &areas),
///     "lib/utils/date.rs"
/// );
/// ```
pub fn derive_label(path: &Path, workspace_areas: &[String]) -> String {
    let components: Vec<&str> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();

    // An area component inside a dependency checkout (every registry path has
    // a `src`) is not a workspace root, so area matching stops there.
    let dep_start = dependency_segment_start(&components);
    let area_space = &components[..dep_start.unwrap_or(components.len())];

    for area in workspace_areas {
        if let Some(idx) = area_space.iter().position(|c| c == area) {
            return components[idx..].join("/");
        }
    }

    if let Some(label) = dependency_label(&components, dep_start) {
        return label;
    }

    components
        .last()
        .map(|c| c.to_string())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Index of the earliest dependency-directory segment, if any.
fn dependency_segment_start(components: &[&str]) -> Option<usize> {
    let mut start: Option<usize> = None;
    let mut consider = |candidate: Option<usize>| {
        if let Some(i) = candidate {
            start = Some(start.map_or(i, |s| s.min(i)));
        }
    };
    consider(position_of_pair(components, "registry", "src"));
    consider(position_of_pair(components, "git", "checkouts"));
    consider((components.first() == Some(&"rustc")).then_some(0));
    start
}

fn position_of_pair(components: &[&str], first: &str, second: &str) -> Option<usize> {
    components
        .windows(2)
        .position(|pair| pair[0] == first && pair[1] == second)
}

fn dependency_label(components: &[&str], dep_start: Option<usize>) -> Option<String> {
    if let Some(start) = dep_start {
        let label = match (components[start], components.get(start + 1)) {
            // …/registry/src/<index>/<name>-<version>/…
            ("registry", Some(&"src")) => components
                .get(start + 3)
                .map(|dir| bracket(&REGISTRY_VERSION_SUFFIX.replace(dir, ""))),
            // …/git/checkouts/<repo>-<hash>/<rev>/…
            ("git", Some(&"checkouts")) => components
                .get(start + 2)
                .map(|dir| bracket(&GIT_HASH_SUFFIX.replace(dir, ""))),
            // /rustc/<hash>/library/<crate>/…
            ("rustc", _) => components
                .iter()
                .position(|c| *c == "library")
                .and_then(|i| components.get(i + 1))
                .map(|name| bracket(name)),
            _ => None,
        };
        return Some(label.unwrap_or_else(|| "[dependency]".to_string()));
    }
    // A `.cargo` path in an unrecognized layout is still a dependency.
    components
        .iter()
        .any(|c| *c == ".cargo")
        .then(|| "[dependency]".to_string())
}

fn bracket(name: &str) -> String {
    if name.is_empty() {
        "[dependency]".to_string()
    } else {
        format!("[{name}]")
    }
}
