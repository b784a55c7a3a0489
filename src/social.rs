//! Mapping social network links to sprite icons.
//!
//! A [`SocialIconTable`] is an ordered list of `(domain substring, icon)` pairs. Resolving a
//! URL walks the list in order and the first entry whose substring occurs in the URL wins, so
//! overlapping entries (`skype.com` and `skype:`, say) are settled purely by position.
//!
//! Tables are immutable. Customizing one produces a new table layered over the old one:
//!
//! - [`SocialIconTable::with_overrides`] puts caller entries *before* the base, replacing any
//!   base entry for the same substring.
//! - [`SocialIconTable::with_additions`] appends caller entries *after* the base, for
//!   networks it doesn't know yet.
//!
//! The built-in tables are shared statics, see [`Preset`].

use std::sync::LazyLock;

/// Networks known to the built-in tables, in matching order.
const KNOWN_NETWORKS: &[(&str, &str)] = &[
    ("codepen.io", "codepen"),
    ("digg.com", "digg"),
    ("dribbble.com", "dribbble"),
    ("dropbox.com", "dropbox"),
    ("facebook.com", "facebook"),
    ("flickr.com", "flickr"),
    ("foursquare.com", "foursquare"),
    ("plus.google.com", "googleplus"),
    ("github.com", "github"),
    ("instagram.com", "instagram"),
    ("linkedin.com", "linkedin"),
    ("t.me", "telegram"),
    ("pinterest.com", "pinterest"),
    ("getpocket.com", "pocket"),
    ("reddit.com", "reddit"),
    ("skype.com", "skype"),
    ("skype:", "skype"),
    ("soundcloud.com", "soundcloud"),
    ("spotify.com", "spotify"),
    ("stumbleupon.com", "stumbleupon"),
    ("tumblr.com", "tumblr"),
    ("twitch.tv", "twitch"),
    ("twitter.com", "twitter"),
    ("vimeo.com", "vimeo"),
    ("vk.com", "vk"),
    ("wordpress.org", "wordpress"),
    ("wordpress.com", "wordpress"),
    ("youtube.com", "youtubecube"),
    ("viber.com", "viber"),
    ("whatsapp.com", "whatsapp"),
    ("ok.ru", "ok"),
    ("my.mail.ru", "mymail"),
];

static MENU_TABLE: LazyLock<SocialIconTable> =
    LazyLock::new(|| SocialIconTable::from_pairs(KNOWN_NETWORKS.iter().copied()));

static LINKS_TABLE: LazyLock<SocialIconTable> = LazyLock::new(|| {
    let entries = KNOWN_NETWORKS
        .iter()
        .map(|&(domain, icon)| match domain {
            "facebook.com" => (domain, "fb"),
            _ => (domain, icon),
        })
        .chain([("feed", "rss")]);

    SocialIconTable::from_pairs(entries)
});

/// The built-in tables.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Preset {
    /// Icons for the social links menu (`facebook.com` → `facebook`).
    Menu,
    /// Icons for inline social links: short Facebook icon (`fb`) and `feed` URLs as `rss`.
    Links,
}

impl Preset {
    pub fn table(self) -> &'static SocialIconTable {
        match self {
            Preset::Menu => &*MENU_TABLE,
            Preset::Links => &*LINKS_TABLE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SocialIcon {
    /// Substring looked for in the URL.
    pub domain: String,
    /// Sprite icon name.
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialIconTable {
    entries: Vec<SocialIcon>,
}

#[cfg(feature = "serde")]
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("invalid social icon table")]
    Json(#[from] serde_json::Error),
}

impl SocialIconTable {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Builds a table from pairs, keeping their order.
    ///
    /// Pairs with an empty substring or icon are skipped: an empty substring would match
    /// every URL.
    pub fn from_pairs<I, D, N>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (D, N)>,
        D: Into<String>,
        N: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(domain, icon)| SocialIcon {
                domain: domain.into(),
                icon: icon.into(),
            })
            .filter(|entry| {
                let keep = !entry.domain.is_empty() && !entry.icon.is_empty();

                if !keep {
                    #[cfg(feature = "log")]
                    log::debug!("skipping incomplete social icon entry {entry:?}");
                }

                keep
            })
            .collect();

        Self { entries }
    }

    /// Looks up the icon for `url`. The first matching entry wins.
    ///
    /// `None` means the URL belongs to no known network, which is not an error: the caller
    /// simply renders no icon.
    ///
    /// # Example
    ///
    /// ```
    /// use icon_sprite::{Preset, SocialIconTable};
    ///
    /// let table = SocialIconTable::default();
    /// assert_eq!(table.resolve("https://facebook.com/page"), Some("facebook"));
    /// assert_eq!(Preset::Links.table().resolve("https://facebook.com/page"), Some("fb"));
    /// assert_eq!(table.resolve("https://example.com"), None);
    /// ```
    pub fn resolve(&self, url: &str) -> Option<&str> {
        let found = self
            .entries
            .iter()
            .find(|entry| url.contains(entry.domain.as_str()))
            .map(|entry| entry.icon.as_str());

        if found.is_none() {
            #[cfg(feature = "log")]
            log::debug!("no social icon for {url:?}");
        }

        found
    }

    /// A new table with `overrides` consulted before this one.
    ///
    /// Entries of this table whose substring appears in `overrides` are dropped; the rest
    /// keep their relative order.
    pub fn with_overrides<I, D, N>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (D, N)>,
        D: Into<String>,
        N: Into<String>,
    {
        let mut entries = Self::from_pairs(overrides).entries;

        let base = self
            .entries
            .iter()
            .filter(|base| !entries.iter().any(|o| o.domain == base.domain))
            .cloned()
            .collect::<Vec<_>>();
        entries.extend(base);

        Self { entries }
    }

    /// A new table with `additions` consulted after this one.
    ///
    /// Additions for a substring this table already has are ignored.
    pub fn with_additions<I, D, N>(&self, additions: I) -> Self
    where
        I: IntoIterator<Item = (D, N)>,
        D: Into<String>,
        N: Into<String>,
    {
        let mut entries = self.entries.clone();

        for addition in Self::from_pairs(additions).entries {
            if !entries.iter().any(|e| e.domain == addition.domain) {
                entries.push(addition);
            }
        }

        Self { entries }
    }

    /// The icon mapped to exactly this substring, if any.
    pub fn get(&self, domain: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.domain == domain)
            .map(|entry| entry.icon.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SocialIcon> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads a table from a JSON array of `{"domain": ..., "icon": ...}` objects.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let entries: Vec<SocialIcon> = serde_json::from_str(json)?;

        Ok(Self::from_pairs(
            entries.into_iter().map(|entry| (entry.domain, entry.icon)),
        ))
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, TableError> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }
}

/// The [`Preset::Menu`] table.
impl Default for SocialIconTable {
    fn default() -> Self {
        Preset::Menu.table().clone()
    }
}

impl<'a> IntoIterator for &'a SocialIconTable {
    type Item = &'a SocialIcon;
    type IntoIter = std::slice::Iter<'a, SocialIcon>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Resolves `url` against `table`. See [`SocialIconTable::resolve`].
pub fn resolve_icon<'t>(url: &str, table: &'t SocialIconTable) -> Option<&'t str> {
    table.resolve(url)
}
