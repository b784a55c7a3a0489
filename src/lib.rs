//! Inline SVG sprite icons for site templates, done accessibly and safely.
//!
//! This crate, `icon_sprite`, renders `<svg><use href="sprite.svg#icon-…"></use></svg>`
//! markup for icons stored in a single sprite sheet, wires up ARIA attributes so icons are
//! either hidden from or described to assistive technology, and runs every icon through an
//! allow-list before it reaches the page.
//! It also knows which icon belongs to a social network link, for decorating navigation menus.
//!
//! # Quick start
//!
//! ```
//! use icon_sprite::{IconBuilder, IconRequest, Preset};
//!
//! let icons = IconBuilder::new("https://example.com/theme/includes/icons/assets/icons.svg");
//!
//! // decorative: hidden from screen readers
//! let arrow = icons.build(&IconRequest::new("arrow-right"))?;
//! assert!(arrow.as_str().contains(r#"aria-hidden="true""#));
//!
//! // meaningful: labelled by its <title>
//! let network = Preset::Menu.table().resolve("https://github.com/rust-lang").unwrap_or("link");
//! let github = icons.build(&IconRequest::new(network).with_title("GitHub"))?;
//! assert!(github.as_str().contains("<title id=\"title-"));
//! # Ok::<(), icon_sprite::InvalidRequestError>(())
//! ```
//!
//! # High level design
//!
//! Rendering an icon goes through a few stages, each usable on its own:
//!
//! 1.  *Locating assets*:
//!
//!     The sprite sheet and the icon stylesheet live next to the theme. [`ThemeAssets`] turns
//!     the theme's directory URI into their URLs, and [`PageAssets`] makes sure the stylesheet
//!     is linked exactly once per page.
//!
//! 2.  *Building the markup*:
//!
//!     [`IconBuilder`] validates an [`IconRequest`] and assembles the icon as a
//!     [`markup::Element`] tree. Titles and descriptions are text nodes, so they are escaped
//!     rather than interpreted, and each labelled icon gets fresh ids for `aria-labelledby`.
//!
//! 3.  *Sanitizing*:
//!
//!     The whole tree then passes through an [`AllowList`]. Anything not on it is stripped,
//!     including URLs with unexpected schemes. The default list permits exactly what sprite
//!     icons need.
//!
//! 4.  *Picking icons for links* (optional):
//!
//!     [`SocialIconTable`] maps URL substrings to icon names, first match wins. Tables are
//!     immutable and layered: callers override or extend a [`Preset`] without touching it.
//!     [`SocialMenu`] uses a table to put icons into rendered social menu items.
//!
//! # Features
//!
//! - `log`: debug logging of stripped markup, unresolved links and skipped menu items.
//! - `serde`: (de)serialize [`IconRequest`]s and load [`SocialIconTable`]s from JSON.

mod assets;
mod icon;
pub mod markup;
mod menu;
pub mod sanitize;
pub mod social;

pub use assets::*;
pub use icon::*;
pub use menu::*;
pub use sanitize::AllowList;
pub use social::{Preset, SocialIcon, SocialIconTable, resolve_icon};
#[cfg(feature = "serde")]
pub use social::TableError;
