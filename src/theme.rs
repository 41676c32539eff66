//! Static color-theme table for the rendered profile document.

use crate::error::AppError;

/// Named set of the four colors substituted into the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTheme {
    pub name: &'static str,
    pub wrapper_background: &'static str,
    pub header_background: &'static str,
    pub header_color: &'static str,
    pub photo_border_color: &'static str,
}

/// All themes, in the order the color prompt offers them.
pub static THEMES: [ColorTheme; 4] = [
    ColorTheme {
        name: "red",
        wrapper_background: "#DE9967",
        header_background: "#870603",
        header_color: "white",
        photo_border_color: "white",
    },
    ColorTheme {
        name: "blue",
        wrapper_background: "#5F64D3",
        header_background: "#26175A",
        header_color: "white",
        photo_border_color: "#73448C",
    },
    ColorTheme {
        name: "pink",
        wrapper_background: "#879CDF",
        header_background: "#FF8374",
        header_color: "white",
        photo_border_color: "#FEE24C",
    },
    ColorTheme {
        name: "green",
        wrapper_background: "#E6E1C3",
        header_background: "#C1C72C",
        header_color: "black",
        photo_border_color: "black",
    },
];

/// Theme names in prompt order.
pub fn names() -> Vec<&'static str> {
    THEMES.iter().map(|theme| theme.name).collect()
}

/// Resolve a color name (case-insensitive, surrounding whitespace ignored).
pub fn lookup(name: &str) -> Result<&'static ColorTheme, AppError> {
    let wanted = name.trim();
    THEMES
        .iter()
        .find(|theme| theme.name.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| AppError::InvalidTheme(wanted.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_name_resolves_with_all_fields() {
        for name in names() {
            let theme = lookup(name).expect("listed theme must resolve");
            assert_eq!(theme.name, name);
            for value in [
                theme.wrapper_background,
                theme.header_background,
                theme.header_color,
                theme.photo_border_color,
            ] {
                assert!(!value.is_empty(), "empty color in {name}");
            }
        }
    }

    #[test]
    fn lookup_ignores_case_and_padding() {
        assert_eq!(lookup("  Blue ").unwrap().header_background, "#26175A");
    }

    #[test]
    fn unknown_names_are_rejected() {
        for bad in ["", "teal", "reds", "user"] {
            match lookup(bad) {
                Err(AppError::InvalidTheme(name)) => assert_eq!(name, bad.trim()),
                other => panic!("expected InvalidTheme for `{bad}`, got {other:?}"),
            }
        }
    }

    #[test]
    fn prompt_order_is_red_blue_pink_green() {
        assert_eq!(names(), vec!["red", "blue", "pink", "green"]);
    }
}
