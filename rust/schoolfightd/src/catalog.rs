use crate::error::DashboardError;
use serde::Serialize;

pub const CLASSES: &[&str] = &[
    "Class 1", "Class 2", "Class 3", "Class 4", "Class 5", "Class 6",
];

/// The class the dashboard opens on and the menu's "Overview" entry returns to.
pub const CURRENT_CLASS: &str = "Class 6";

pub const TERMS: &[&str] = &["First Term Exam", "Second Term Exam", "Third Term Exam"];

pub const SUBJECTS: &[&str] = &[
    "Bangla",
    "English",
    "Science",
    "Mathematics",
    "Bangladesh and Global Studies",
];

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeDef {
    pub id: &'static str,
    pub label: &'static str,
    /// Swatch colors (the 500 shade of each palette).
    pub primary: &'static str,
    pub secondary: &'static str,
}

pub const THEMES: &[ThemeDef] = &[
    ThemeDef {
        id: "ocean",
        label: "Ocean",
        primary: "#06b6d4",
        secondary: "#3b82f6",
    },
    ThemeDef {
        id: "aurora",
        label: "Aurora",
        primary: "#10b981",
        secondary: "#14b8a6",
    },
    ThemeDef {
        id: "sunset",
        label: "Sunset",
        primary: "#f43f5e",
        secondary: "#f97316",
    },
    ThemeDef {
        id: "nebula",
        label: "Nebula",
        primary: "#8b5cf6",
        secondary: "#d946ef",
    },
    ThemeDef {
        id: "midnight",
        label: "Midnight",
        primary: "#6366f1",
        secondary: "#a855f7",
    },
];

pub const DEFAULT_THEME: &str = "ocean";

fn lookup(table: &[&'static str], raw: &str) -> Option<&'static str> {
    let raw = raw.trim();
    table.iter().copied().find(|name| name.eq_ignore_ascii_case(raw))
}

pub fn resolve_class(raw: &str) -> Result<&'static str, DashboardError> {
    lookup(CLASSES, raw).ok_or_else(|| DashboardError::UnknownClass(raw.to_string()))
}

pub fn resolve_term(raw: &str) -> Result<&'static str, DashboardError> {
    lookup(TERMS, raw).ok_or_else(|| DashboardError::UnknownTerm(raw.to_string()))
}

pub fn resolve_subject(raw: &str) -> Result<&'static str, DashboardError> {
    lookup(SUBJECTS, raw).ok_or_else(|| DashboardError::UnknownSubject(raw.to_string()))
}

pub fn resolve_theme(raw: &str) -> Result<&'static ThemeDef, DashboardError> {
    let raw = raw.trim();
    THEMES
        .iter()
        .find(|t| t.id.eq_ignore_ascii_case(raw))
        .ok_or_else(|| DashboardError::UnknownTheme(raw.to_string()))
}

/// Classes listed under Results History: every class before the current one.
pub fn past_classes() -> impl Iterator<Item = &'static str> {
    CLASSES.iter().copied().filter(|c| *c != CURRENT_CLASS)
}
