use crate::calc::{self, Aggregate, Grade, MarkEntry, ParsedMark};
use crate::catalog::{self, ThemeDef};
use crate::error::DashboardError;
use crate::onboarding::{DemoGrade, Onboarding, OnboardingView};
use serde::Serialize;
use std::collections::HashMap;

type MarkKey = (&'static str, &'static str, &'static str);
type RankKey = (&'static str, &'static str);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkField {
    Total,
    Obtained,
}

impl MarkField {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "total" => Some(Self::Total),
            "obtained" => Some(Self::Obtained),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum View {
    #[serde(rename = "Overview")]
    Overview,
    #[serde(rename = "Results History")]
    ResultsHistory,
}

impl View {
    fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Overview" | "overview" => Some(Self::Overview),
            "Results History" | "resultsHistory" | "results_history" | "history" => {
                Some(Self::ResultsHistory)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub class: &'static str,
    /// `None` means every term is collapsed.
    pub term: Option<&'static str>,
    pub view: View,
    pub theme: &'static str,
    pub dark_mode: bool,
    pub menu_open: bool,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            class: catalog::CURRENT_CLASS,
            term: catalog::TERMS.first().copied(),
            view: View::Overview,
            theme: catalog::DEFAULT_THEME,
            dark_mode: true,
            menu_open: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    marks: HashMap<MarkKey, MarkEntry>,
    ranks: HashMap<RankKey, String>,
    pub selection: Selection,
    pub onboarding: Onboarding,
    pub user_name: String,
}

impl DashboardState {
    pub fn new(onboarding: Onboarding, user_name: impl Into<String>) -> Self {
        let mut marks = HashMap::new();
        let mut ranks = HashMap::new();
        for &class in catalog::CLASSES {
            for &term in catalog::TERMS {
                ranks.insert((class, term), String::new());
                for &subject in catalog::SUBJECTS {
                    marks.insert((class, term, subject), MarkEntry::default());
                }
            }
        }
        Self {
            marks,
            ranks,
            selection: Selection::default(),
            onboarding,
            user_name: user_name.into(),
        }
    }

    pub fn mark(
        &self,
        class: &'static str,
        term: &'static str,
        subject: &'static str,
    ) -> MarkEntry {
        self.marks
            .get(&(class, term, subject))
            .copied()
            .unwrap_or_default()
    }

    pub fn rank(&self, class: &'static str, term: &'static str) -> &str {
        self.ranks
            .get(&(class, term))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn theme(&self) -> &'static ThemeDef {
        catalog::resolve_theme(self.selection.theme).unwrap_or(&catalog::THEMES[0])
    }

    pub fn term_report(&self, class: &'static str, term: &'static str) -> TermReport {
        let entries: Vec<(&'static str, MarkEntry)> = catalog::SUBJECTS
            .iter()
            .map(|&subject| (subject, self.mark(class, term, subject)))
            .collect();
        let aggregate = calc::aggregate_for(entries.iter().map(|(_, e)| e));
        let subjects = entries
            .into_iter()
            .map(|(subject, e)| {
                let grade = calc::grade_for(e.obtained, e.total);
                SubjectRow {
                    subject,
                    total: e.total,
                    obtained: e.obtained,
                    grade,
                    failing: grade.is_failing(),
                    obtained_exceeds_total: e.obtained > e.total,
                }
            })
            .collect();

        TermReport {
            class,
            term,
            active: self.selection.class == class && self.selection.term == Some(term),
            subjects,
            rank: self.rank(class, term).to_string(),
            aggregate,
        }
    }

    pub fn class_report(&self, class: &'static str) -> ClassReport {
        ClassReport {
            class,
            terms: catalog::TERMS
                .iter()
                .map(|&term| self.term_report(class, term))
                .collect(),
        }
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        catalog::past_classes()
            .map(|class| HistoryEntry {
                class,
                terms: catalog::TERMS
                    .iter()
                    .map(|&term| {
                        let report = self.term_report(class, term);
                        TermSummary {
                            term,
                            rank: report.rank,
                            aggregate: report.aggregate,
                        }
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            user_name: &self.user_name,
            onboarding: OnboardingView::from(&self.onboarding),
            selection: &self.selection,
            theme: self.theme(),
            report: self.class_report(self.selection.class),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRow {
    pub subject: &'static str,
    pub total: u32,
    pub obtained: u32,
    pub grade: Grade,
    pub failing: bool,
    pub obtained_exceeds_total: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TermReport {
    pub class: &'static str,
    pub term: &'static str,
    pub active: bool,
    pub subjects: Vec<SubjectRow>,
    pub rank: String,
    pub aggregate: Aggregate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassReport {
    pub class: &'static str,
    pub terms: Vec<TermReport>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TermSummary {
    pub term: &'static str,
    pub rank: String,
    pub aggregate: Aggregate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub class: &'static str,
    pub terms: Vec<TermSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<'a> {
    pub user_name: &'a str,
    pub onboarding: OnboardingView,
    pub selection: &'a Selection,
    pub theme: &'static ThemeDef,
    pub report: ClassReport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetMark {
        class: String,
        term: String,
        subject: String,
        field: String,
        raw: String,
    },
    SetRank {
        class: String,
        term: String,
        value: String,
    },
    SelectClass(String),
    SelectTerm(Option<String>),
    ToggleTerm(String),
    SetView(String),
    SetTheme(String),
    SetDarkMode(bool),
    ToggleMenu(bool),
    OpenOverview,
    OpenHistoryEntry(String),
    SetUserName(String),
    TryDemo(String),
    PickOnboardingTheme(String),
    AdvanceOnboarding,
    CompleteOnboarding(Option<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Updated,
    MarkSet {
        class: &'static str,
        term: &'static str,
        subject: &'static str,
        entry: MarkEntry,
        parsed: ParsedMark,
    },
    RankSet {
        class: &'static str,
        term: &'static str,
    },
    DemoGraded(DemoGrade),
    /// The caller persists `user_name` and the completion flag.
    OnboardingCompleted { user_name: String },
}

/// Single entry point for every state change.
pub fn reduce(state: &mut DashboardState, action: Action) -> Result<Outcome, DashboardError> {
    match action {
        Action::SetMark {
            class,
            term,
            subject,
            field,
            raw,
        } => {
            let class = catalog::resolve_class(&class)?;
            let term = catalog::resolve_term(&term)?;
            let subject = catalog::resolve_subject(&subject)?;
            let field = MarkField::parse(&field).ok_or(DashboardError::UnknownField(field))?;
            let parsed = calc::parse_mark(&raw);

            let entry = state.marks.entry((class, term, subject)).or_default();
            match field {
                MarkField::Total => entry.total = parsed.value,
                MarkField::Obtained => entry.obtained = parsed.value,
            }
            Ok(Outcome::MarkSet {
                class,
                term,
                subject,
                entry: *entry,
                parsed,
            })
        }
        Action::SetRank { class, term, value } => {
            let class = catalog::resolve_class(&class)?;
            let term = catalog::resolve_term(&term)?;
            state.ranks.insert((class, term), value);
            Ok(Outcome::RankSet { class, term })
        }
        Action::SelectClass(class) => {
            state.selection.class = catalog::resolve_class(&class)?;
            Ok(Outcome::Updated)
        }
        Action::SelectTerm(term) => {
            state.selection.term = term.map(|t| catalog::resolve_term(&t)).transpose()?;
            Ok(Outcome::Updated)
        }
        Action::ToggleTerm(term) => {
            let term = catalog::resolve_term(&term)?;
            state.selection.term = if state.selection.term == Some(term) {
                None
            } else {
                Some(term)
            };
            Ok(Outcome::Updated)
        }
        Action::SetView(view) => {
            state.selection.view = View::parse(&view).ok_or(DashboardError::UnknownView(view))?;
            Ok(Outcome::Updated)
        }
        Action::SetTheme(theme) => {
            state.selection.theme = catalog::resolve_theme(&theme)?.id;
            Ok(Outcome::Updated)
        }
        Action::SetDarkMode(enabled) => {
            state.selection.dark_mode = enabled;
            Ok(Outcome::Updated)
        }
        Action::ToggleMenu(open) => {
            state.selection.menu_open = open;
            Ok(Outcome::Updated)
        }
        Action::OpenOverview => {
            state.selection.class = catalog::CURRENT_CLASS;
            state.selection.view = View::Overview;
            state.selection.menu_open = false;
            Ok(Outcome::Updated)
        }
        Action::OpenHistoryEntry(class) => {
            state.selection.class = catalog::resolve_class(&class)?;
            state.selection.view = View::Overview;
            Ok(Outcome::Updated)
        }
        Action::SetUserName(name) => {
            state.onboarding.edit_name()?;
            state.user_name = name;
            Ok(Outcome::Updated)
        }
        Action::TryDemo(raw) => Ok(Outcome::DemoGraded(state.onboarding.try_demo(&raw)?)),
        Action::PickOnboardingTheme(theme) => {
            let theme = catalog::resolve_theme(&theme)?;
            state.onboarding.pick_theme()?;
            state.selection.theme = theme.id;
            Ok(Outcome::Updated)
        }
        Action::AdvanceOnboarding => {
            state.onboarding.advance()?;
            Ok(Outcome::Updated)
        }
        Action::CompleteOnboarding(name) => {
            let draft = name.unwrap_or_else(|| state.user_name.clone());
            let user_name = state.onboarding.complete(&draft)?;
            state.user_name = user_name.clone();
            Ok(Outcome::OnboardingCompleted { user_name })
        }
    }
}
