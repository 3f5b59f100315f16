use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

pub const DEFAULT_TOTAL_MARKS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkEntry {
    pub total: u32,
    pub obtained: u32,
}

impl Default for MarkEntry {
    fn default() -> Self {
        Self {
            total: DEFAULT_TOTAL_MARKS,
            obtained: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    APlus,
    A,
    AMinus,
    B,
    C,
    D,
    F,
    NotAvailable,
}

impl Grade {
    pub fn label(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::AMinus => "A-",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
            Self::NotAvailable => "N/A",
        }
    }

    pub fn is_failing(self) -> bool {
        self == Self::F
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Grade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Inclusive lower bounds, highest first. The scan order is what keeps the
/// bands disjoint.
const GRADE_BANDS: [(f64, Grade); 6] = [
    (80.0, Grade::APlus),
    (70.0, Grade::A),
    (60.0, Grade::AMinus),
    (50.0, Grade::B),
    (40.0, Grade::C),
    (33.0, Grade::D),
];

pub fn grade_for_percentage(percentage: f64) -> Grade {
    GRADE_BANDS
        .iter()
        .find(|(floor, _)| percentage >= *floor)
        .map(|(_, grade)| *grade)
        .unwrap_or(Grade::F)
}

// Multiply before dividing so whole-number percentages land exactly on a
// band boundary.
fn percentage_of(obtained: u64, total: u64) -> f64 {
    (obtained as f64 * 100.0) / total as f64
}

pub fn grade_for(obtained: u32, total: u32) -> Grade {
    if total == 0 {
        return Grade::NotAvailable;
    }
    grade_for_percentage(percentage_of(obtained as u64, total as u64))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    pub total: u64,
    pub obtained: u64,
    pub percentage: f64,
    /// Two-decimal rendering, e.g. "70.00".
    pub percentage_text: String,
    pub grade: Grade,
}

pub fn aggregate_for<'a, I>(entries: I) -> Aggregate
where
    I: IntoIterator<Item = &'a MarkEntry>,
{
    let mut total: u64 = 0;
    let mut obtained: u64 = 0;
    for e in entries {
        total += e.total as u64;
        obtained += e.obtained as u64;
    }

    let (percentage, grade) = if total == 0 {
        (0.0, Grade::NotAvailable)
    } else {
        let p = percentage_of(obtained, total);
        (p, grade_for_percentage(p))
    };

    Aggregate {
        total,
        obtained,
        percentage,
        percentage_text: format!("{:.2}", percentage),
        grade,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStatus {
    /// The whole input was a non-negative integer.
    Exact,
    /// Leading digits were used; trailing text was ignored ("95.5" -> 95).
    Truncated,
    /// Nothing usable; stored as 0.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParsedMark {
    pub value: u32,
    pub status: ParseStatus,
}

impl ParsedMark {
    pub fn is_fallback(&self) -> bool {
        self.status == ParseStatus::Fallback
    }
}

/// Mark input never fails: unusable text becomes 0 with `ParseStatus::Fallback`.
pub fn parse_mark(raw: &str) -> ParsedMark {
    let fallback = ParsedMark {
        value: 0,
        status: ParseStatus::Fallback,
    };

    let s = raw.trim();
    let body = s.strip_prefix('+').unwrap_or(s);
    let digits = body.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return fallback;
    }

    match body[..digits].parse::<u32>() {
        Ok(value) => ParsedMark {
            value,
            status: if digits == body.len() {
                ParseStatus::Exact
            } else {
                ParseStatus::Truncated
            },
        },
        Err(_) => fallback,
    }
}
