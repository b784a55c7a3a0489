use crate::markup::{Element, render_nodes};
use crate::sanitize::{AllowList, escape_url};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::fmt;

/// Characters that must be encoded when an icon identifier becomes a URL fragment.
const FRAGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#');

/// What to render: a sprite symbol, optionally labelled for assistive technology.
///
/// Without a `title` the icon is decorative and hidden from screen readers. The `description`
/// is only used when a `title` is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IconRequest {
    /// Name of the symbol in the sprite, without the `icon-` prefix.
    pub icon: String,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(rename = "desc"))]
    pub description: String,
    /// Append a `<span>` for renderers without SVG support.
    #[cfg_attr(feature = "serde", serde(rename = "fallback"))]
    pub include_fallback: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRequestError {
    #[error("no icon parameters were given; define at least an `icon`")]
    NoParameters,
    #[error("no icon identifier was given; define the SVG icon name as `icon`")]
    MissingIcon,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    InvalidRequest(#[from] InvalidRequestError),
    #[error("failed to write icon markup")]
    Write(#[from] fmt::Error),
}

impl IconRequest {
    pub fn new(icon: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_fallback(mut self, include_fallback: bool) -> Self {
        self.include_fallback = include_fallback;
        self
    }

    /// True when every field still has its default value.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Parses template-style arguments (`icon`, `title`, `desc`, `fallback`).
    ///
    /// Unknown keys are ignored. `fallback` is true for `true`, `1`, `yes` or `on`. An `icon`
    /// that is absent or empty is reported as [`InvalidRequestError::MissingIcon`].
    ///
    /// # Example
    ///
    /// ```
    /// use icon_sprite::{IconRequest, InvalidRequestError};
    ///
    /// let request = IconRequest::from_args([("icon", "github"), ("title", "GitHub")])?;
    /// assert_eq!(request, IconRequest::new("github").with_title("GitHub"));
    ///
    /// let none: [(&str, &str); 0] = [];
    /// assert_eq!(IconRequest::from_args(none), Err(InvalidRequestError::NoParameters));
    /// # Ok::<(), InvalidRequestError>(())
    /// ```
    pub fn from_args<I, K, V>(args: I) -> Result<Self, InvalidRequestError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut request = Self::default();
        let mut any_args = false;
        let mut has_icon = false;

        for (key, value) in args {
            any_args = true;
            let value = value.as_ref();

            match key.as_ref() {
                "icon" => {
                    has_icon = !value.is_empty();
                    request.icon = value.into();
                }
                "title" => request.title = value.into(),
                "desc" | "description" => request.description = value.into(),
                "fallback" => request.include_fallback = parse_flag(value),
                _ => {}
            }
        }

        if !any_args {
            return Err(InvalidRequestError::NoParameters);
        }
        if !has_icon {
            return Err(InvalidRequestError::MissingIcon);
        }

        Ok(request)
    }

    pub fn validate(&self) -> Result<(), InvalidRequestError> {
        if self.is_empty() {
            Err(InvalidRequestError::NoParameters)
        } else if self.icon.is_empty() {
            Err(InvalidRequestError::MissingIcon)
        } else {
            Ok(())
        }
    }
}

fn parse_flag(value: &str) -> bool {
    ["true", "1", "yes", "on"]
        .iter()
        .any(|truthy| value.trim().eq_ignore_ascii_case(truthy))
}

/// Sanitized SVG markup for one icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconMarkup(String);

impl IconMarkup {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for IconMarkup {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IconMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<IconMarkup> for String {
    fn from(markup: IconMarkup) -> Self {
        markup.0
    }
}

/// Builds icon markup against one sprite sheet.
///
/// Create it once per sprite (see [`crate::ThemeAssets::icon_builder`]) and reuse it for
/// every icon on the page; it holds no per-call state.
#[derive(Debug, Clone)]
pub struct IconBuilder {
    sprite_url: String,
    allow_list: AllowList,
    unique_id: fn() -> String,
}

impl IconBuilder {
    pub fn new(sprite_url: &str) -> Self {
        Self {
            sprite_url: escape_url(sprite_url),
            allow_list: AllowList::default(),
            unique_id,
        }
    }

    /// Replaces the allow-list applied to every rendered icon.
    pub fn with_allow_list(mut self, allow_list: AllowList) -> Self {
        self.allow_list = allow_list;
        self
    }

    /// Replaces the generator used for the ids linking `<title>`/`<desc>` to the icon.
    pub fn with_id_generator(mut self, unique_id: fn() -> String) -> Self {
        self.unique_id = unique_id;
        self
    }

    /// The sprite URL, as escaped for embedding.
    pub fn sprite_url(&self) -> &str {
        &self.sprite_url
    }

    pub fn build(&self, request: &IconRequest) -> Result<IconMarkup, InvalidRequestError> {
        request.validate()?;

        let svg = self.icon_element(request);
        let nodes = self.allow_list.sanitize(vec![svg.into()]);

        Ok(IconMarkup(render_nodes(&nodes)))
    }

    /// Builds the icon and writes it into `out`.
    pub fn render_to(
        &self,
        out: &mut impl fmt::Write,
        request: &IconRequest,
    ) -> Result<(), RenderError> {
        let markup = self.build(request)?;
        out.write_str(markup.as_str())?;
        Ok(())
    }

    /// The unsanitized element tree for a validated request.
    fn icon_element(&self, request: &IconRequest) -> Element {
        let IconRequest {
            icon,
            title,
            description,
            include_fallback,
        } = request;

        let mut svg = Element::new("svg").attr("class", format!("icon icon-{icon}"));

        let labels = (!title.is_empty()).then(|| {
            let id = (self.unique_id)();
            let title_id = format!("title-{id}");
            let desc_id = (!description.is_empty()).then(|| format!("desc-{id}"));
            (title_id, desc_id)
        });

        match &labels {
            None => svg = svg.attr("aria-hidden", "true"),
            Some((title_id, desc_id)) => {
                let labelled_by = match desc_id {
                    Some(desc_id) => format!("{title_id} {desc_id}"),
                    None => title_id.clone(),
                };
                svg = svg.attr("aria-labelledby", labelled_by);
            }
        }
        svg = svg.attr("role", "img");

        if let Some((title_id, desc_id)) = labels {
            svg = svg.child(Element::new("title").attr("id", title_id).text(title.as_str()));

            if let Some(desc_id) = desc_id {
                svg = svg.child(
                    Element::new("desc")
                        .attr("id", desc_id)
                        .text(description.as_str()),
                );
            }
        }

        let href = format!(
            "{}#icon-{}",
            self.sprite_url,
            utf8_percent_encode(icon, FRAGMENT)
        );

        // The spaces around `<use>` work around a keyboard navigation bug in Safari 10,
        // which loses focus on a `<use>` that has no sibling text nodes.
        svg = svg
            .text(" ")
            .child(
                Element::new("use")
                    .attr("href", href.as_str())
                    .attr("xlink:href", href),
            )
            .text(" ");

        if *include_fallback {
            svg = svg.child(
                Element::new("span").attr("class", format!("svg-fallback icon-{icon}")),
            );
        }

        svg
    }
}

fn unique_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Builds icon markup in one call.
///
/// Prefer keeping an [`IconBuilder`] around when rendering more than one icon.
pub fn build_icon_markup(
    request: &IconRequest,
    sprite_url: &str,
) -> Result<IconMarkup, InvalidRequestError> {
    IconBuilder::new(sprite_url).build(request)
}
