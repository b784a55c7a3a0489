use crate::icon::IconBuilder;
use crate::markup::Element;
use crate::sanitize::escape_url;

/// Directory of the icon assets, relative to the theme's stylesheet directory.
pub const ICON_ASSETS_DIR: &str = "includes/icons/assets";

/// Handle the icon stylesheet is registered under.
pub const ICONS_STYLE_HANDLE: &str = "icons-style";

/// Locates the icon sprite and stylesheet of a theme.
///
/// Both live in [`ICON_ASSETS_DIR`] below the theme's stylesheet directory URI, as
/// `icons.svg` and `icons.css`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeAssets {
    stylesheet_directory_uri: String,
}

impl ThemeAssets {
    pub fn new(stylesheet_directory_uri: impl Into<String>) -> Self {
        let mut uri = stylesheet_directory_uri.into();
        while uri.ends_with('/') {
            uri.pop();
        }

        Self {
            stylesheet_directory_uri: uri,
        }
    }

    pub fn stylesheet_directory_uri(&self) -> &str {
        &self.stylesheet_directory_uri
    }

    fn asset_url(&self, file_name: &str) -> String {
        format!(
            "{}/{ICON_ASSETS_DIR}/{file_name}",
            self.stylesheet_directory_uri
        )
    }

    pub fn sprite_url(&self) -> String {
        self.asset_url("icons.svg")
    }

    pub fn stylesheet(&self) -> Stylesheet {
        Stylesheet {
            handle: ICONS_STYLE_HANDLE.into(),
            src: self.asset_url("icons.css"),
            dependencies: Vec::new(),
            version: Some("1.0.0".into()),
            media: "all".into(),
        }
    }

    /// An [`IconBuilder`] for this theme's sprite.
    pub fn icon_builder(&self) -> IconBuilder {
        IconBuilder::new(&self.sprite_url())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    pub handle: String,
    pub src: String,
    /// Handles of stylesheets that must be linked before this one.
    pub dependencies: Vec<String>,
    /// Appended to the URL as `ver` to bust caches.
    pub version: Option<String>,
    pub media: String,
}

impl Stylesheet {
    /// The `<link>` element for this stylesheet.
    pub fn link_element(&self) -> Element {
        let mut href = escape_url(&self.src);
        if let Some(version) = &self.version {
            let separator = if href.contains('?') { '&' } else { '?' };
            href.push(separator);
            href.push_str("ver=");
            href.extend(url::form_urlencoded::byte_serialize(version.as_bytes()));
        }

        Element::new("link")
            .attr("rel", "stylesheet")
            .attr("id", format!("{}-css", self.handle))
            .attr("href", href)
            .attr("media", self.media.as_str())
    }
}

/// The stylesheets registered while rendering one page.
///
/// Each handle is registered at most once, no matter how many icons or menus ask for it.
#[derive(Debug, Default)]
pub struct PageAssets {
    stylesheets: Vec<Stylesheet>,
}

impl PageAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `stylesheet` unless its handle already is.
    ///
    /// Returns whether it was newly registered.
    pub fn enqueue(&mut self, stylesheet: Stylesheet) -> bool {
        if self.is_enqueued(&stylesheet.handle) {
            return false;
        }

        #[cfg(feature = "log")]
        log::debug!("enqueueing stylesheet `{}`", stylesheet.handle);

        self.stylesheets.push(stylesheet);
        true
    }

    pub fn is_enqueued(&self, handle: &str) -> bool {
        self.stylesheets.iter().any(|s| s.handle == handle)
    }

    pub fn stylesheets(&self) -> &[Stylesheet] {
        &self.stylesheets
    }

    /// The `<link>` tags for the page head, dependencies first.
    pub fn render_links(&self) -> String {
        let mut emitted: Vec<&str> = Vec::new();
        let mut out = String::new();

        for stylesheet in &self.stylesheets {
            self.emit(stylesheet, &mut emitted, &mut out);
        }

        out
    }

    fn emit<'s>(
        &'s self,
        stylesheet: &'s Stylesheet,
        emitted: &mut Vec<&'s str>,
        out: &mut String,
    ) {
        if emitted.contains(&stylesheet.handle.as_str()) {
            return;
        }
        emitted.push(&stylesheet.handle);

        for dependency in &stylesheet.dependencies {
            // dependencies that were never registered are skipped
            if let Some(dep) = self.stylesheets.iter().find(|s| s.handle == *dependency) {
                self.emit(dep, emitted, out);
            }
        }

        out.push_str(&stylesheet.link_element().to_string());
        out.push('\n');
    }
}

#[cfg(test)]
mod test {
    use super::{PageAssets, Stylesheet, ThemeAssets};
    use crate::icon::IconRequest;

    #[test]
    fn locates_icon_assets() {
        let assets = ThemeAssets::new("https://example.com/wp-content/themes/site/");

        assert_eq!(
            assets.sprite_url(),
            "https://example.com/wp-content/themes/site/includes/icons/assets/icons.svg"
        );

        let stylesheet = assets.stylesheet();
        assert_eq!(stylesheet.handle, "icons-style");
        assert_eq!(
            stylesheet.src,
            "https://example.com/wp-content/themes/site/includes/icons/assets/icons.css"
        );
        assert_eq!(stylesheet.media, "all");
    }

    #[test]
    fn icon_builder_uses_theme_sprite() {
        let assets = ThemeAssets::new("https://example.com/theme");
        let markup = assets
            .icon_builder()
            .build(&IconRequest::new("github"))
            .unwrap();

        assert!(markup.as_str().contains(
            r##"href="https://example.com/theme/includes/icons/assets/icons.svg#icon-github""##
        ));
    }

    #[test]
    fn stylesheet_is_registered_once_per_page() {
        let assets = ThemeAssets::new("https://example.com/theme");
        let mut page = PageAssets::new();

        assert!(page.enqueue(assets.stylesheet()));
        assert!(!page.enqueue(assets.stylesheet()));
        assert_eq!(page.stylesheets().len(), 1);

        assert_eq!(
            page.render_links(),
            concat!(
                r#"<link rel="stylesheet" id="icons-style-css" "#,
                r#"href="https://example.com/theme/includes/icons/assets/icons.css?ver=1.0.0" media="all" />"#,
                "\n"
            )
        );

        // a fresh page starts empty
        assert!(!PageAssets::new().is_enqueued("icons-style"));
    }

    #[test]
    fn dependencies_are_linked_first() {
        let mut page = PageAssets::new();
        page.enqueue(Stylesheet {
            handle: "icons-style".into(),
            src: "/icons.css".into(),
            dependencies: vec!["theme-style".into(), "missing".into()],
            version: None,
            media: "all".into(),
        });
        page.enqueue(Stylesheet {
            handle: "theme-style".into(),
            src: "/style.css".into(),
            dependencies: Vec::new(),
            version: Some("2.1".into()),
            media: "screen".into(),
        });

        let links = page.render_links();
        let lines = links.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(r#"href="/style.css?ver=2.1""#));
        assert!(lines[1].contains(r#"id="icons-style-css""#));
    }
}
