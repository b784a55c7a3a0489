//! Allow-list sanitization of markup trees.
//!
//! Everything the [`AllowList`] does not name is stripped: disallowed elements are unwrapped
//! (their text survives as escaped text), script-like elements are dropped along with their
//! content, and disallowed attributes are removed. URL-valued attributes are additionally
//! checked against a set of permitted schemes.

use crate::markup::{Element, Node};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::collections::{HashMap, HashSet};

/// Schemes a sprite or icon reference may point at.
pub const DEFAULT_URL_SCHEMES: [&str; 2] = ["http", "https"];

/// Characters that can't appear raw in a relative URL embedded in markup.
const RELATIVE_URL: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'\'')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^');

#[derive(Debug, Clone)]
pub struct AllowList {
    elements: HashMap<String, HashSet<String>>,
    url_attributes: HashSet<String>,
    url_schemes: HashSet<String>,
    drop_content: HashSet<String>,
}

impl AllowList {
    /// An allow-list permitting nothing.
    ///
    /// Sanitizing with it reduces any tree to its (non-script) text.
    pub fn empty() -> Self {
        Self {
            elements: HashMap::new(),
            url_attributes: ["href", "xlink:href", "src"].map(String::from).into(),
            url_schemes: DEFAULT_URL_SCHEMES.map(String::from).into(),
            drop_content: ["script", "style", "iframe", "object", "noscript"]
                .map(String::from)
                .into(),
        }
    }

    /// Permits `element` with the given attributes. Names are matched case-insensitively.
    ///
    /// Calling this again for the same element adds to its attribute set.
    pub fn allow<I, S>(mut self, element: &str, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.elements
            .entry(element.to_ascii_lowercase())
            .or_default()
            .extend(
                attributes
                    .into_iter()
                    .map(|attr| attr.as_ref().to_ascii_lowercase()),
            );
        self
    }

    /// Replaces the permitted schemes for URL-valued attributes.
    pub fn url_schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.url_schemes = schemes
            .into_iter()
            .map(|scheme| scheme.as_ref().to_ascii_lowercase())
            .collect();
        self
    }

    pub fn is_allowed_element(&self, element: &str) -> bool {
        self.elements.contains_key(&element.to_ascii_lowercase())
    }

    pub fn is_allowed_attribute(&self, element: &str, attribute: &str) -> bool {
        self.elements
            .get(&element.to_ascii_lowercase())
            .is_some_and(|attrs| attrs.contains(&attribute.to_ascii_lowercase()))
    }

    /// Whether `url` is relative, or absolute with a permitted scheme.
    pub fn is_allowed_url(&self, url: &str) -> bool {
        match url::Url::parse(url) {
            Ok(parsed) => self.url_schemes.contains(parsed.scheme()),
            Err(url::ParseError::RelativeUrlWithoutBase) => true,
            Err(_) => false,
        }
    }

    /// Runs the allow-list over a sequence of sibling nodes.
    pub fn sanitize(&self, nodes: Vec<Node>) -> Vec<Node> {
        let mut clean = Vec::with_capacity(nodes.len());
        for node in nodes {
            self.sanitize_into(node, &mut clean);
        }
        clean
    }

    fn sanitize_into(&self, node: Node, out: &mut Vec<Node>) {
        let element = match node {
            Node::Text(text) => return out.push(Node::Text(text)),
            Node::Element(element) => element,
        };

        let name = element.name.to_ascii_lowercase();

        if self.drop_content.contains(&name) && !self.elements.contains_key(&name) {
            #[cfg(feature = "log")]
            log::debug!("dropping <{name}> and its content");

            return;
        }

        let Some(allowed_attributes) = self.elements.get(&name) else {
            #[cfg(feature = "log")]
            log::debug!("stripping disallowed element <{name}>");

            // unwrap: keep whatever is allowed inside it
            for child in element.children {
                self.sanitize_into(child, out);
            }
            return;
        };

        let Element {
            name: original_name,
            attributes,
            children,
        } = element;

        let attributes = attributes
            .into_iter()
            .filter(|attr| {
                let attr_name = attr.name.to_ascii_lowercase();

                if !allowed_attributes.contains(&attr_name) {
                    #[cfg(feature = "log")]
                    log::debug!("stripping attribute `{attr_name}` from <{name}>");

                    return false;
                }

                if self.url_attributes.contains(&attr_name) && !self.is_allowed_url(&attr.value) {
                    #[cfg(feature = "log")]
                    log::debug!("stripping `{attr_name}` with a disallowed URL from <{name}>");

                    return false;
                }

                true
            })
            .collect();

        let mut clean = Element {
            name: original_name,
            attributes,
            children: Vec::new(),
        };

        if !clean.is_void() {
            clean.children = self.sanitize(children);
        }

        out.push(Node::Element(clean));
    }
}

/// The allow-list for sprite icon markup.
///
/// Besides the reference (`use`) and root (`svg`) elements, the accessibility
/// sub-elements, the fallback `span` and a bare `path` are permitted, so the ARIA
/// wiring the builder emits survives sanitization.
impl Default for AllowList {
    fn default() -> Self {
        Self::empty()
            .allow(
                "svg",
                [
                    "class",
                    "aria-hidden",
                    "aria-labelledby",
                    "role",
                    "title",
                ],
            )
            .allow("title", ["id"])
            .allow("desc", ["id"])
            .allow("use", ["href", "xlink:href"])
            .allow("path", ["d"])
            .allow("span", ["class"])
    }
}

/// Makes a URL safe to embed in markup.
///
/// Absolute URLs are normalized; those with a scheme other than `http`/`https` become an
/// empty string. Relative URLs are kept, with unsafe characters percent-encoded.
pub fn escape_url(raw: &str) -> String {
    let raw = raw.trim();

    match url::Url::parse(raw) {
        Ok(parsed) if DEFAULT_URL_SCHEMES.contains(&parsed.scheme()) => parsed.into(),
        Ok(_parsed) => {
            #[cfg(feature = "log")]
            log::debug!("refusing URL with scheme `{}`", _parsed.scheme());

            String::new()
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            utf8_percent_encode(raw, RELATIVE_URL).to_string()
        }
        Err(_e) => {
            #[cfg(feature = "log")]
            log::debug!("refusing malformed URL: {_e}");

            String::new()
        }
    }
}

#[cfg(test)]
mod test {
    use super::{AllowList, escape_url};
    use crate::markup::{Element, Node, render_nodes};

    fn clean(element: Element) -> String {
        render_nodes(&AllowList::default().sanitize(vec![element.into()]))
    }

    #[test]
    fn keeps_allowed_markup_untouched() {
        let svg = Element::new("svg")
            .attr("class", "icon icon-github")
            .attr("aria-hidden", "true")
            .attr("role", "img")
            .text(" ")
            .child(
                Element::new("use")
                    .attr("href", "/icons.svg#icon-github")
                    .attr("xlink:href", "/icons.svg#icon-github"),
            )
            .text(" ");

        let expected = svg.to_string();
        assert_eq!(clean(svg), expected);
    }

    #[test]
    fn strips_disallowed_attributes() {
        let svg = Element::new("svg")
            .attr("class", "icon")
            .attr("onload", "alert(1)")
            .attr("style", "display:none");

        assert_eq!(clean(svg), r#"<svg class="icon"></svg>"#);
    }

    #[test]
    fn unwraps_disallowed_elements_but_keeps_text() {
        let svg = Element::new("svg").child(
            Element::new("title")
                .child(Element::new("a").attr("href", "https://evil.example").text("click")),
        );

        assert_eq!(clean(svg), "<svg><title>click</title></svg>");
    }

    #[test]
    fn drops_script_content_entirely() {
        let svg = Element::new("svg")
            .child(Element::new("script").text("alert(document.cookie)"))
            .child(Element::new("foreignObject").child(Element::new("style").text("*{}")));

        assert_eq!(clean(svg), "<svg></svg>");
    }

    #[test]
    fn strips_dangerous_urls() {
        let svg = Element::new("svg").child(
            Element::new("use")
                .attr("href", "javascript:alert(1)")
                .attr("xlink:href", "  JavaScript:alert(1)"),
        );

        assert_eq!(clean(svg), "<svg><use></use></svg>");
    }

    #[test]
    fn empty_allow_list_leaves_only_text() {
        let nodes = vec![Node::from(
            Element::new("svg").child(Element::new("title").text("GitHub")),
        )];

        assert_eq!(render_nodes(&AllowList::empty().sanitize(nodes)), "GitHub");
    }

    #[test]
    fn custom_schemes() {
        let list = AllowList::default().url_schemes(["https"]);
        assert!(list.is_allowed_url("https://example.com/icons.svg"));
        assert!(!list.is_allowed_url("http://example.com/icons.svg"));
        assert!(list.is_allowed_url("#icon-github"));
    }

    #[test]
    fn matches_names_case_insensitively() {
        let list = AllowList::default();
        assert!(list.is_allowed_element("SVG"));
        assert!(list.is_allowed_attribute("svg", "ARIA-HIDDEN"));
        assert!(!list.is_allowed_attribute("use", "class"));
    }

    #[test]
    fn escapes_urls() {
        assert_eq!(
            escape_url("https://example.com/theme/icons.svg"),
            "https://example.com/theme/icons.svg"
        );
        assert_eq!(
            escape_url("/theme/my icons.svg"),
            "/theme/my%20icons.svg"
        );
        assert_eq!(escape_url("javascript:alert(1)"), "");
        assert_eq!(escape_url("data:image/svg+xml;base64,AAAA"), "");
    }
}
