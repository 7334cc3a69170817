use gpui::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn from_appearance(appearance: WindowAppearance) -> Self {
        match appearance {
            WindowAppearance::Dark | WindowAppearance::VibrantDark => ThemeMode::Dark,
            WindowAppearance::Light | WindowAppearance::VibrantLight => ThemeMode::Light,
        }
    }
}

pub struct Theme {
    pub background: Hsla,
    pub foreground: Hsla,
    pub border: Hsla,
    pub panel: Hsla,
    pub muted_foreground: Hsla,
    pub track: Hsla,
    pub start: Hsla,
    pub stop: Hsla,
    pub disabled: Hsla,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            background: rgb(0xffffff).into(),
            foreground: rgb(0x111827).into(),
            border: rgb(0xe5e7eb).into(),
            panel: rgb(0xf3f4f6).into(),
            muted_foreground: rgb(0x6b7280).into(),
            track: rgb(0xe5e7eb).into(),
            start: rgb(0x4caf50).into(),
            stop: rgb(0xf44336).into(),
            disabled: rgb(0xd1d5db).into(),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: rgb(0x111827).into(),
            foreground: rgb(0xf9fafb).into(),
            border: rgb(0x374151).into(),
            panel: rgb(0x1f2937).into(),
            muted_foreground: rgb(0x9ca3af).into(),
            track: rgb(0x374151).into(),
            start: rgb(0x4caf50).into(),
            stop: rgb(0xf44336).into(),
            disabled: rgb(0x4b5563).into(),
        }
    }

    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }

    pub fn for_window(window: &Window) -> Self {
        Self::from_mode(ThemeMode::from_appearance(window.appearance()))
    }
}
