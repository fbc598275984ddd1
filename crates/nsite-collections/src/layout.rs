//! Layout template assignment.
//!
//! Each page may name its template in a rich-text CMS property:
//!
//! ```json
//! { "Layout": { "rich_text": [ { "text": { "content": "Full Width" } } ] } }
//! ```
//!
//! The token is turned into a template path `"{dir}/{name}.{extension}"`
//! (by default `layouts/full-width.njk`). Pages without the property, or with
//! an empty one, get the default layout.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

static SPACES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" +").unwrap());
static INVALID_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]+").unwrap());

/// How a layout token is turned into a template name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutMode {
    /// Lowercase, spaces to hyphens, strip anything outside `[A-Za-z0-9_-]`.
    #[default]
    Normalized,
    /// Use the token exactly as entered in the CMS.
    Verbatim,
}

/// Template path settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Template directory prefix.
    pub dir: String,
    /// Template file extension (without dot).
    pub extension: String,
    /// Template name used when a page has no layout property.
    pub default_name: String,
    /// Token handling.
    pub mode: LayoutMode,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            dir: "layouts".to_owned(),
            extension: "njk".to_owned(),
            default_name: "base".to_owned(),
            mode: LayoutMode::Normalized,
        }
    }
}

impl LayoutOptions {
    /// Template path for a page with the given CMS properties.
    #[must_use]
    pub fn resolve(&self, props: &Map<String, Value>) -> String {
        let token = layout_token(props).unwrap_or(&self.default_name);
        let name = match self.mode {
            LayoutMode::Normalized => {
                let normalized = normalize_layout_name(token);
                if normalized.is_empty() {
                    normalize_layout_name(&self.default_name)
                } else {
                    normalized
                }
            }
            LayoutMode::Verbatim => token.to_owned(),
        };
        format!("{}/{}.{}", self.dir, name, self.extension)
    }
}

/// Raw layout token at `Layout.rich_text[0].text.content`.
///
/// Returns `None` if any step is missing, has the wrong type, or the content
/// is empty.
#[must_use]
pub fn layout_token(props: &Map<String, Value>) -> Option<&str> {
    props
        .get("Layout")?
        .get("rich_text")?
        .get(0)?
        .get("text")?
        .get("content")?
        .as_str()
        .filter(|s| !s.is_empty())
}

/// Normalize a layout token into a template file name.
///
/// ```
/// use nsite_collections::normalize_layout_name;
///
/// assert_eq!(normalize_layout_name("Full Width"), "full-width");
/// assert_eq!(normalize_layout_name("Blog: Post!"), "blog-post");
/// ```
#[must_use]
pub fn normalize_layout_name(token: &str) -> String {
    let lowered = token.trim().to_lowercase();
    let hyphenated = SPACES_RE.replace_all(&lowered, "-");
    INVALID_CHARS_RE.replace_all(&hyphenated, "").into_owned()
}
