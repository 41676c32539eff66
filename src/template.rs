//! HTML document rendering for a fetched profile.
//!
//! The layout lives in one template file; theme colors and escaped profile
//! fields are substituted into `{{KEY}}` placeholders in a single pass.

use std::collections::BTreeMap;
use std::fmt;

use crate::github::Profile;
use crate::theme::ColorTheme;

const PROFILE_TEMPLATE: &str = include_str!("templates/profile.html");

/// Text that is safe to place inside HTML element content or a quoted
/// attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlEscaped(String);

impl HtmlEscaped {
    /// Escape arbitrary text.
    pub fn new(raw: &str) -> Self {
        Self(escape_html(raw))
    }

    /// Wrap text that is already known to contain no markup-sensitive bytes.
    fn trusted(value: &'static str) -> Self {
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HtmlEscaped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escape the five HTML-sensitive characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render the full profile document for one theme.
pub fn render(profile: &Profile, theme: &ColorTheme) -> String {
    let mut vars = BTreeMap::<&str, HtmlEscaped>::new();
    vars.insert("WRAPPER_BACKGROUND", HtmlEscaped::trusted(theme.wrapper_background));
    vars.insert("HEADER_BACKGROUND", HtmlEscaped::trusted(theme.header_background));
    vars.insert("HEADER_COLOR", HtmlEscaped::trusted(theme.header_color));
    vars.insert("PHOTO_BORDER_COLOR", HtmlEscaped::trusted(theme.photo_border_color));
    vars.insert("TITLE", HtmlEscaped::new(&format!("{} | GitHub profile", profile.name)));
    vars.insert("NAME", HtmlEscaped::new(&profile.name));
    vars.insert("AVATAR_URL", HtmlEscaped::new(&profile.avatar_url));
    vars.insert("PROFILE_JSON", HtmlEscaped::new(&profile_dump(profile)));

    render_template(PROFILE_TEMPLATE, &vars)
}

fn profile_dump(profile: &Profile) -> String {
    // `Value` serialization cannot fail; fall back to compact form regardless.
    serde_json::to_string_pretty(&profile.raw).unwrap_or_else(|_| profile.raw.to_string())
}

/// Substitute `{{KEY}}` placeholders in one left-to-right pass.
///
/// Substituted values are never rescanned, so profile text containing
/// `{{...}}` stays literal. Unknown keys are left untouched.
fn render_template(template: &str, vars: &BTreeMap<&str, HtmlEscaped>) -> String {
    let mut rendered = String::with_capacity(template.len() + 1024);
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        rendered.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            rendered.push_str(&rest[start..]);
            return rendered;
        };
        let key = &after_open[..end];
        match vars.get(key) {
            Some(value) => rendered.push_str(value.as_str()),
            None => rendered.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after_open[end + 2..];
    }
    rendered.push_str(rest);
    rendered
}
