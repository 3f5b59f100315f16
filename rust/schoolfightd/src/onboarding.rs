use crate::calc::{self, Grade, ParsedMark};
use crate::error::DashboardError;
use serde::Serialize;

/// Pre-filled into the name prompt when nothing is stored yet.
pub const DEFAULT_DRAFT_NAME: &str = "Spondon";
/// Stored when onboarding completes with a blank name.
pub const FALLBACK_USER_NAME: &str = "Student";

pub const DEMO_SUBJECT: &str = "Mathematics";
pub const DEMO_TOTAL: u32 = 100;

pub const STEP_COUNT: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingStep {
    Welcome,
    DemoInput,
    ThemePick,
    Ready,
    Done,
}

impl OnboardingStep {
    /// 1..=4 while in progress, 0 once done.
    pub fn number(self) -> u8 {
        match self {
            Self::Welcome => 1,
            Self::DemoInput => 2,
            Self::ThemePick => 3,
            Self::Ready => 4,
            Self::Done => 0,
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            Self::Welcome => Some(Self::DemoInput),
            Self::DemoInput => Some(Self::ThemePick),
            Self::ThemePick => Some(Self::Ready),
            Self::Ready | Self::Done => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Onboarding {
    step: OnboardingStep,
    theme_picked: bool,
    /// Last demo mark typed on the "how it works" step.
    demo_value: u32,
}

impl Onboarding {
    /// Start state from the persisted completion flag.
    pub fn resume(done: bool) -> Self {
        Self {
            step: if done {
                OnboardingStep::Done
            } else {
                OnboardingStep::Welcome
            },
            theme_picked: false,
            demo_value: 0,
        }
    }

    pub fn step(&self) -> OnboardingStep {
        self.step
    }

    pub fn is_done(&self) -> bool {
        self.step == OnboardingStep::Done
    }

    pub fn theme_picked(&self) -> bool {
        self.theme_picked
    }

    pub fn demo_entered(&self) -> bool {
        self.demo_value > 0
    }

    /// The name prompt only exists on the welcome step.
    pub fn edit_name(&self) -> Result<(), DashboardError> {
        self.require(OnboardingStep::Welcome, "set the name")
    }

    pub fn try_demo(&mut self, raw: &str) -> Result<DemoGrade, DashboardError> {
        self.require(OnboardingStep::DemoInput, "try the demo")?;
        let demo = demo_grade(raw);
        self.demo_value = demo.parsed.value;
        Ok(demo)
    }

    pub fn pick_theme(&mut self) -> Result<(), DashboardError> {
        self.require(OnboardingStep::ThemePick, "pick a theme")?;
        self.theme_picked = true;
        Ok(())
    }

    pub fn advance(&mut self) -> Result<OnboardingStep, DashboardError> {
        if self.step == OnboardingStep::DemoInput && !self.demo_entered() {
            return Err(DashboardError::DemoNotTried);
        }
        if self.step == OnboardingStep::ThemePick && !self.theme_picked {
            return Err(DashboardError::ThemeNotPicked);
        }
        match self.step {
            OnboardingStep::Done => Err(DashboardError::OnboardingFinished),
            step => {
                let next = step.next().ok_or(DashboardError::OnboardingStep {
                    action: "advance",
                    step: step.number(),
                })?;
                self.step = next;
                Ok(next)
            }
        }
    }

    /// Finishes the flow from the last step and returns the name to store.
    pub fn complete(&mut self, name: &str) -> Result<String, DashboardError> {
        self.require(OnboardingStep::Ready, "complete")?;
        self.step = OnboardingStep::Done;
        Ok(resolve_user_name(name))
    }

    fn require(
        &self,
        expected: OnboardingStep,
        action: &'static str,
    ) -> Result<(), DashboardError> {
        if self.step == OnboardingStep::Done {
            return Err(DashboardError::OnboardingFinished);
        }
        if self.step != expected {
            return Err(DashboardError::OnboardingStep {
                action,
                step: self.step.number(),
            });
        }
        Ok(())
    }
}

pub fn resolve_user_name(raw: &str) -> String {
    let name = raw.trim();
    if name.is_empty() {
        FALLBACK_USER_NAME.to_string()
    } else {
        name.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoGrade {
    pub subject: &'static str,
    pub total: u32,
    pub parsed: ParsedMark,
    pub grade: Grade,
    pub failing: bool,
}

/// Grades sample input against a fixed total. Never touches real marks.
pub fn demo_grade(raw: &str) -> DemoGrade {
    let parsed = calc::parse_mark(raw);
    let grade = calc::grade_for(parsed.value, DEMO_TOTAL);
    DemoGrade {
        subject: DEMO_SUBJECT,
        total: DEMO_TOTAL,
        parsed,
        grade,
        failing: grade.is_failing(),
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingView {
    pub step: u8,
    pub step_count: u8,
    pub done: bool,
    pub demo_entered: bool,
    pub theme_picked: bool,
}

impl From<&Onboarding> for OnboardingView {
    fn from(o: &Onboarding) -> Self {
        Self {
            step: o.step().number(),
            step_count: STEP_COUNT,
            done: o.is_done(),
            demo_entered: o.demo_entered(),
            theme_picked: o.theme_picked(),
        }
    }
}
