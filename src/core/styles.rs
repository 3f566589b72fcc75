//! Style roles mapping logical output elements to `colored::Color`.
//!
//! Coloring is applied only when the `enabled` flag passed to `paint()` is true,
//! so callers decide once (TTY / `--color`) and no global state is involved.
//!
//! ```
//! use plugmesh::core::styles::StyleRole;
//! let plain = StyleRole::Header.paint("Interfaces", false);
//! assert_eq!(plain, "Interfaces");
//! let colored = StyleRole::Header.paint("Interfaces", true);
//! assert!(colored.starts_with("\x1b["));
//! assert!(colored.ends_with("\x1b[0m"));
//! ```

use crate::plugin::api::PluginStatus;
use clap::builder::styling::AnsiColor;
use colored::Color;

macro_rules! style {
    ( $( $variant:ident => $color:expr ),+ $(,)? ) => {
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        pub enum StyleRole { $( $variant ),+ }

        impl StyleRole {
            pub fn color(self) -> Option<Color> {
                match self { $( StyleRole::$variant => $color ),+ }
            }
        }
    }
}

style! {
    Header   => Some(Color::Yellow),
    Key      => Some(Color::BrightGreen),
    Value    => None,
    Literal  => Some(Color::Cyan),
    Active   => Some(Color::Green),
    Loading  => Some(Color::Blue),
    Inactive => Some(Color::BrightBlack),
    Failed   => Some(Color::BrightRed),
    Disabled => Some(Color::Magenta),
    Warning  => Some(Color::Yellow),
}

impl StyleRole {
    /// Role used to render a plugin status
    pub fn for_status(status: PluginStatus) -> Self {
        match status {
            PluginStatus::Inactive => StyleRole::Inactive,
            PluginStatus::Loading => StyleRole::Loading,
            PluginStatus::Active => StyleRole::Active,
            PluginStatus::Error => StyleRole::Failed,
            PluginStatus::Disabled => StyleRole::Disabled,
        }
    }

    pub fn ansi_code(self) -> Option<String> {
        map_color_code(self.color()?)
    }

    pub fn paint(self, text: &str, enabled: bool) -> String {
        if !enabled {
            return text.to_string();
        }
        match self.ansi_code() {
            Some(code) => format!("\x1b[{}m{}\x1b[0m", code, text),
            None => text.to_string(),
        }
    }

    /// prettytable style_spec for this role (foreground only)
    pub fn to_prettytable_spec(self) -> Option<String> {
        let spec_char = match self.color()? {
            Color::Black => "k",
            Color::Red => "r",
            Color::Green => "g",
            Color::Yellow => "y",
            Color::Blue => "b",
            Color::Magenta => "m",
            Color::Cyan => "c",
            Color::White => "w",
            Color::BrightBlack => "K",
            Color::BrightRed => "R",
            Color::BrightGreen => "G",
            Color::BrightYellow => "Y",
            Color::BrightBlue => "B",
            Color::BrightMagenta => "M",
            Color::BrightCyan => "C",
            Color::BrightWhite => "W",
            _ => return None,
        };
        Some(format!("F{}", spec_char))
    }
}

fn map_color_code(c: Color) -> Option<String> {
    use Color::*;
    let code = match c {
        Black => "30",
        Red => "31",
        Green => "32",
        Yellow => "33",
        Blue => "34",
        Magenta => "35",
        Cyan => "36",
        White => "37",
        BrightBlack => "90",
        BrightRed => "91",
        BrightGreen => "92",
        BrightYellow => "93",
        BrightBlue => "94",
        BrightMagenta => "95",
        BrightCyan => "96",
        BrightWhite => "97",
        TrueColor { r, g, b } => return Some(format!("38;2;{};{};{}", r, g, b)),
    };
    Some(code.to_string())
}

fn color_to_ansi(c: Color) -> Option<AnsiColor> {
    use AnsiColor as A;
    use Color::*;
    Some(match c {
        Black => A::Black,
        Red => A::Red,
        Green => A::Green,
        Yellow => A::Yellow,
        Blue => A::Blue,
        Magenta => A::Magenta,
        Cyan => A::Cyan,
        White => A::White,
        BrightBlack => A::BrightBlack,
        BrightRed => A::BrightRed,
        BrightGreen => A::BrightGreen,
        BrightYellow => A::BrightYellow,
        BrightBlue => A::BrightBlue,
        BrightMagenta => A::BrightMagenta,
        BrightCyan => A::BrightCyan,
        BrightWhite => A::BrightWhite,
        _ => return None,
    })
}

/// clap help styles derived from the same roles
pub fn palette_to_clap(enabled: bool) -> clap::builder::Styles {
    use clap::builder::styling::{Color as ClapColor, Style};
    if !enabled {
        return clap::builder::Styles::plain();
    }

    let style = |role: StyleRole, bold: bool| {
        let mut s = Style::new();
        if let Some(col) = role.color().and_then(color_to_ansi) {
            s = s.fg_color(Some(ClapColor::Ansi(col)));
        }
        if bold {
            s = s.bold();
        }
        s
    };

    clap::builder::Styles::styled()
        .header(style(StyleRole::Header, true))
        .usage(style(StyleRole::Header, true))
        .literal(style(StyleRole::Literal, false))
        .placeholder(style(StyleRole::Key, false))
        .valid(style(StyleRole::Active, false))
        .invalid(style(StyleRole::Warning, false))
        .error(style(StyleRole::Failed, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ansi_code_header() {
        assert_eq!(StyleRole::Header.ansi_code(), Some("33".to_string()));
        assert_eq!(StyleRole::Value.ansi_code(), None);
    }

    #[test]
    fn paint_enabled_disabled() {
        let painted = StyleRole::Active.paint("active", true);
        assert_eq!(painted, "\x1b[32mactive\x1b[0m");
        assert_eq!(StyleRole::Active.paint("active", false), "active");
        assert_eq!(StyleRole::Value.paint("plain", true), "plain");
    }

    #[test]
    fn status_roles_are_distinct() {
        let roles = [
            StyleRole::for_status(PluginStatus::Inactive),
            StyleRole::for_status(PluginStatus::Loading),
            StyleRole::for_status(PluginStatus::Active),
            StyleRole::for_status(PluginStatus::Error),
            StyleRole::for_status(PluginStatus::Disabled),
        ];
        for (i, a) in roles.iter().enumerate() {
            for b in roles.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn truecolor_code() {
        let code = map_color_code(Color::TrueColor {
            r: 255,
            g: 128,
            b: 64,
        });
        assert_eq!(code, Some("38;2;255;128;64".to_string()));
    }

    #[test]
    fn prettytable_specs() {
        assert_eq!(StyleRole::Failed.to_prettytable_spec(), Some("FR".to_string()));
        assert_eq!(StyleRole::Value.to_prettytable_spec(), None);
    }

    #[test]
    fn palette_to_clap_differs_when_enabled() {
        let plain_dbg = format!("{:?}", palette_to_clap(false));
        let styled_dbg = format!("{:?}", palette_to_clap(true));
        assert_ne!(plain_dbg, styled_dbg);
    }
}
