use crate::icon::{IconBuilder, IconRequest};
use crate::social::SocialIconTable;
use std::borrow::Cow;

/// Menu location whose items get social icons.
pub const SOCIAL_MENU_LOCATION: &str = "social-menu";

/// Where a menu item is being rendered.
#[derive(Debug, Copy, Clone)]
pub struct MenuContext<'a> {
    /// The theme location of the menu being rendered.
    pub location: &'a str,
    /// Markup the renderer emits right after each item's label, e.g. `</span>`.
    pub link_after: &'a str,
}

/// Swaps the label terminator of social menu items for an icon.
///
/// A social menu renders each link as
/// `<a href="…"><span class="screen-reader-text">Label</span></a>`, with `</span>` as its
/// "link after" marker. Decorating such an item replaces the marker with `</span>` followed
/// by the icon for the link's network, so the label stays readable by screen readers while
/// sighted users see the icon.
#[derive(Debug, Clone)]
pub struct SocialMenu<'a> {
    icons: &'a IconBuilder,
    table: &'a SocialIconTable,
    location: &'a str,
}

impl<'a> SocialMenu<'a> {
    pub fn new(icons: &'a IconBuilder, table: &'a SocialIconTable) -> Self {
        Self {
            icons,
            table,
            location: SOCIAL_MENU_LOCATION,
        }
    }

    /// Decorates items of another menu location instead of [`SOCIAL_MENU_LOCATION`].
    pub fn at_location(mut self, location: &'a str) -> Self {
        self.location = location;
        self
    }

    /// Decorates one rendered menu item linking to `item_url`.
    ///
    /// Only the last `link_after` marker is replaced: it closes the label, while earlier ones
    /// may close markup nested inside the label.
    ///
    /// The output is returned untouched for other menu locations, for URLs no table entry
    /// matches, and when the item has no `link_after` marker.
    pub fn decorate<'o>(
        &self,
        item_output: &'o str,
        item_url: &str,
        context: &MenuContext<'_>,
    ) -> Cow<'o, str> {
        if context.location != self.location {
            return Cow::Borrowed(item_output);
        }

        let marker = match item_output.rfind(context.link_after) {
            Some(marker) if !context.link_after.is_empty() => marker,
            _ => {
                #[cfg(feature = "log")]
                log::debug!("menu item for {item_url:?} has no link-after marker");

                return Cow::Borrowed(item_output);
            }
        };

        let Some(icon) = self.table.resolve(item_url) else {
            return Cow::Borrowed(item_output);
        };

        let markup = match self.icons.build(&IconRequest::new(icon)) {
            Ok(markup) => markup,
            Err(_e) => {
                #[cfg(feature = "log")]
                log::debug!("not decorating menu item for {item_url:?}: {_e}");

                return Cow::Borrowed(item_output);
            }
        };

        let mut decorated = item_output.to_owned();
        decorated.replace_range(
            marker..marker + context.link_after.len(),
            &format!("</span>{markup}"),
        );

        Cow::Owned(decorated)
    }
}
