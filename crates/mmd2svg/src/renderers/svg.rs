//! SVG post-processing
//!
//! Mermaid sizes its output to the diagram. A requested width or height is
//! applied afterwards to the root `<svg>` element.

use std::sync::OnceLock;

use regex::Regex;

fn root_tag() -> &'static Regex {
    static ROOT: OnceLock<Regex> = OnceLock::new();
    ROOT.get_or_init(|| Regex::new(r"(?s)<svg\b[^>]*>").expect("static regex"))
}

fn dimension(name: &str) -> Regex {
    // The leading whitespace keeps `stroke-width` and friends out of the match.
    Regex::new(&format!(r#"(\s){name}="[^"]*""#)).expect("static regex")
}

fn width_attr() -> &'static Regex {
    static WIDTH: OnceLock<Regex> = OnceLock::new();
    WIDTH.get_or_init(|| dimension("width"))
}

fn height_attr() -> &'static Regex {
    static HEIGHT: OnceLock<Regex> = OnceLock::new();
    HEIGHT.get_or_init(|| dimension("height"))
}

/// Set `width`/`height` on the root `<svg>` element
///
/// Existing attributes are replaced, missing ones are added. Content without
/// a root `<svg>` tag is returned unchanged.
pub fn apply_size(svg: &str, width: Option<u32>, height: Option<u32>) -> String {
    if width.is_none() && height.is_none() {
        return svg.to_string();
    }

    let Some(root) = root_tag().find(svg) else {
        return svg.to_string();
    };

    let mut tag = root.as_str().to_string();
    if let Some(width) = width {
        tag = set_attribute(&tag, width_attr(), "width", width);
    }
    if let Some(height) = height {
        tag = set_attribute(&tag, height_attr(), "height", height);
    }

    format!("{}{}{}", &svg[..root.start()], tag, &svg[root.end()..])
}

fn set_attribute(tag: &str, pattern: &Regex, name: &str, value: u32) -> String {
    if pattern.is_match(tag) {
        return pattern
            .replacen(tag, 1, format!(r#"${{1}}{name}="{value}""#))
            .into_owned();
    }

    // "<svg" is four bytes; insert right after it.
    format!(r#"{} {name}="{value}"{}"#, &tag[..4], &tag[4..])
}
