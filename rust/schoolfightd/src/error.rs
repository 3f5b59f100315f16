use serde_json::json;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error("unknown class: {0}")]
    UnknownClass(String),
    #[error("unknown term: {0}")]
    UnknownTerm(String),
    #[error("unknown subject: {0}")]
    UnknownSubject(String),
    #[error("unknown mark field: {0} (expected total or obtained)")]
    UnknownField(String),
    #[error("unknown theme: {0}")]
    UnknownTheme(String),
    #[error("unknown view: {0}")]
    UnknownView(String),
    #[error("onboarding is already complete")]
    OnboardingFinished,
    #[error("cannot {action} at onboarding step {step}")]
    OnboardingStep { action: &'static str, step: u8 },
    #[error("enter a demo mark before continuing")]
    DemoNotTried,
    #[error("pick a theme before continuing")]
    ThemeNotPicked,
}

impl DashboardError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownClass(_) => "unknown_class",
            Self::UnknownTerm(_) => "unknown_term",
            Self::UnknownSubject(_) => "unknown_subject",
            Self::UnknownField(_) => "unknown_field",
            Self::UnknownTheme(_) => "unknown_theme",
            Self::UnknownView(_) => "unknown_view",
            Self::OnboardingFinished => "onboarding_finished",
            Self::OnboardingStep { .. } => "onboarding_step",
            Self::DemoNotTried => "demo_not_tried",
            Self::ThemeNotPicked => "theme_not_picked",
        }
    }

    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::UnknownClass(v)
            | Self::UnknownTerm(v)
            | Self::UnknownSubject(v)
            | Self::UnknownField(v)
            | Self::UnknownTheme(v)
            | Self::UnknownView(v) => Some(json!({ "value": v })),
            Self::OnboardingStep { action, step } => {
                Some(json!({ "action": action, "step": step }))
            }
            Self::OnboardingFinished | Self::DemoNotTried | Self::ThemeNotPicked => None,
        }
    }
}
