use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Professional,
    Modern,
    Minimal,
}

/// Typst styling knobs for one theme. Colours are hex strings.
#[derive(Debug, Clone, Copy)]
pub struct ThemeStyle {
    pub fonts: &'static [&'static str],
    pub text_color: &'static str,
    pub accent_color: &'static str,
    pub muted_color: &'static str,
    pub body_size_pt: f32,
    pub name_size_pt: f32,
    pub centered_header: bool,
    pub heading_rule: bool,
    pub uppercase_headings: bool,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Professional, Theme::Modern, Theme::Minimal];

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Professional => "professional",
            Theme::Modern => "modern",
            Theme::Minimal => "minimal",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Theme::Professional => "Clean corporate style with serif typography and ruled headings",
            Theme::Modern => "Contemporary sans-serif layout with a left-aligned header",
            Theme::Minimal => "Plain black-on-white layout with no decoration",
        }
    }

    pub fn style(&self) -> ThemeStyle {
        match self {
            Theme::Professional => ThemeStyle {
                fonts: &["Libertinus Serif", "Linux Libertine"],
                text_color: "#262626",
                accent_color: "#334d80",
                muted_color: "#666666",
                body_size_pt: 10.5,
                name_size_pt: 22.0,
                centered_header: true,
                heading_rule: true,
                uppercase_headings: true,
            },
            Theme::Modern => ThemeStyle {
                fonts: &["Inter", "Helvetica Neue", "Liberation Sans", "Libertinus Serif"],
                text_color: "#1f2933",
                accent_color: "#0f766e",
                muted_color: "#52606d",
                body_size_pt: 10.0,
                name_size_pt: 24.0,
                centered_header: false,
                heading_rule: false,
                uppercase_headings: false,
            },
            Theme::Minimal => ThemeStyle {
                fonts: &["New Computer Modern", "Libertinus Serif"],
                text_color: "#000000",
                accent_color: "#000000",
                muted_color: "#444444",
                body_size_pt: 10.5,
                name_size_pt: 18.0,
                centered_header: false,
                heading_rule: false,
                uppercase_headings: false,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Pdf,
    Markdown,
    Typst,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Markdown => "md",
            ExportFormat::Typst => "typ",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Markdown => "text/markdown; charset=utf-8",
            ExportFormat::Typst => "text/plain; charset=utf-8",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ThemeInfo {
    pub name: &'static str,
    pub description: &'static str,
}

pub fn list_themes() -> Vec<ThemeInfo> {
    Theme::ALL
        .iter()
        .map(|t| ThemeInfo {
            name: t.name(),
            description: t.description(),
        })
        .collect()
}
