//! Site themes and the activation check for the fireworks layer
//!
//! The page applies one of these as a class on `<body>`. Only the themes
//! listed in the config light up the fireworks canvas.

use serde::{Deserialize, Serialize};

/// A site-wide visual theme, identified by its body class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Theme {
    #[serde(rename = "theme-default")]
    Default,
    #[serde(rename = "theme-christmas")]
    Christmas,
    #[serde(rename = "theme-newyear")]
    NewYear,
    #[serde(rename = "theme-valentines")]
    Valentines,
    #[serde(rename = "theme-stpatricks")]
    StPatricks,
    #[serde(rename = "theme-easter")]
    Easter,
    #[serde(rename = "theme-july4")]
    July4,
    #[serde(rename = "theme-halloween")]
    Halloween,
    #[serde(rename = "theme-thanksgiving")]
    Thanksgiving,
    #[serde(rename = "theme-veterans")]
    Veterans,
}

impl Theme {
    pub const ALL: [Theme; 10] = [
        Theme::Default,
        Theme::Christmas,
        Theme::NewYear,
        Theme::Valentines,
        Theme::StPatricks,
        Theme::Easter,
        Theme::July4,
        Theme::Halloween,
        Theme::Thanksgiving,
        Theme::Veterans,
    ];

    /// Themes that launch fireworks out of the box
    pub const FIREWORKS: [Theme; 2] = [Theme::NewYear, Theme::July4];

    /// CSS class applied to `<body>` for this theme
    pub fn class_name(self) -> &'static str {
        match self {
            Theme::Default => "theme-default",
            Theme::Christmas => "theme-christmas",
            Theme::NewYear => "theme-newyear",
            Theme::Valentines => "theme-valentines",
            Theme::StPatricks => "theme-stpatricks",
            Theme::Easter => "theme-easter",
            Theme::July4 => "theme-july4",
            Theme::Halloween => "theme-halloween",
            Theme::Thanksgiving => "theme-thanksgiving",
            Theme::Veterans => "theme-veterans",
        }
    }

    pub fn from_class(class: &str) -> Option<Theme> {
        Theme::ALL.into_iter().find(|t| t.class_name() == class)
    }
}

/// Whether a whitespace-separated class list contains any of `themes`
///
/// The body may carry unrelated classes next to the theme (e.g. a jungle
/// skin for the Vietnam view), so every token is checked.
pub fn fireworks_enabled(class_list: &str, themes: &[Theme]) -> bool {
    class_list
        .split_whitespace()
        .filter_map(Theme::from_class)
        .any(|t| themes.contains(&t))
}
