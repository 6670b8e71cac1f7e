use iced::color;
use iced::theme::Palette;
use iced::Theme;

use crate::settings::Appearance;

/// Resolve the iced Theme from the appearance setting.
pub fn resolve_theme(appearance: Appearance) -> Theme {
    let is_dark = match appearance {
        Appearance::Dark => true,
        Appearance::Light => false,
        Appearance::System => detect_system_dark_mode(),
    };

    let palette = if is_dark {
        dark_palette()
    } else {
        light_palette()
    };

    Theme::custom("VoxTitle", palette)
}

fn light_palette() -> Palette {
    Palette {
        background: color!(0xec, 0xef, 0xf4),
        text: color!(0x2e, 0x34, 0x40),
        primary: color!(0x5e, 0x81, 0xac),
        success: color!(0xa3, 0xbe, 0x8c),
        warning: color!(0xeb, 0xcb, 0x8b),
        danger: color!(0xbf, 0x61, 0x6a),
    }
}

fn dark_palette() -> Palette {
    Palette {
        background: color!(0x2e, 0x34, 0x40),
        text: color!(0xec, 0xef, 0xf4),
        primary: color!(0x81, 0xa1, 0xc1),
        success: color!(0xa3, 0xbe, 0x8c),
        warning: color!(0xeb, 0xcb, 0x8b),
        danger: color!(0xbf, 0x61, 0x6a),
    }
}

fn detect_system_dark_mode() -> bool {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("defaults")
            .args(["read", "-g", "AppleInterfaceStyle"])
            .output()
            .map(|o| {
                String::from_utf8_lossy(&o.stdout)
                    .trim()
                    .eq_ignore_ascii_case("dark")
            })
            .unwrap_or(true)
    }
    #[cfg(not(target_os = "macos"))]
    {
        true
    }
}
