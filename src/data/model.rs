use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single raw spreadsheet cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as it comes out of a spreadsheet, CSV, JSON or
/// Parquet reader. Only lives until the row is converted to a [`RowRecord`].
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell. Text cells holding a number count too,
    /// since CSV exports and hand-edited sheets often store values as text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Categorical fields
// ---------------------------------------------------------------------------

/// A closed set of labels stored in one spreadsheet column.
pub trait Category: Copy + Eq + fmt::Debug + 'static {
    /// Every variant, in button order.
    const ALL: &'static [Self];

    /// Short label shown on the selection button.
    fn label(self) -> &'static str;

    /// Spellings accepted when parsing a cell (matched trimmed,
    /// ASCII-case-insensitive).
    fn aliases(self) -> &'static [&'static str];

    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::ALL.iter().copied().find(|v| {
            v.aliases()
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(text))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum PositionType {
    #[default]
    Bidirectional,
    Long,
    Short,
}

impl Category for PositionType {
    const ALL: &'static [Self] = &[Self::Bidirectional, Self::Long, Self::Short];

    fn label(self) -> &'static str {
        match self {
            Self::Bidirectional => "Bidirectional",
            Self::Long => "Long",
            Self::Short => "Short",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Bidirectional => &["양방향", "bidirectional", "both"],
            Self::Long => &["롱", "long"],
            Self::Short => &["숏", "short"],
        }
    }
}

/// Direction of the signal at time `t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum SignalT {
    #[default]
    Negative,
    Positive,
}

impl Category for SignalT {
    const ALL: &'static [Self] = &[Self::Negative, Self::Positive];

    fn label(self) -> &'static str {
        match self {
            Self::Negative => "n",
            Self::Positive => "p",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Negative => &["n", "negative"],
            Self::Positive => &["p", "positive"],
        }
    }
}

/// Share of signalling names relative to the 20% threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum NumsigRatio {
    #[default]
    Under20Percent,
    Over20Percent,
}

impl Category for NumsigRatio {
    const ALL: &'static [Self] = &[Self::Under20Percent, Self::Over20Percent];

    fn label(self) -> &'static str {
        match self {
            Self::Under20Percent => "Under20p",
            Self::Over20Percent => "Over20p",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Under20Percent => &["Under20p", "under_20_percent"],
            Self::Over20Percent => &["Over20p", "over_20_percent"],
        }
    }
}

/// Whether positive or negative signals outnumber the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum NumPvsN {
    #[default]
    MoreNegative,
    MorePositive,
}

impl Category for NumPvsN {
    const ALL: &'static [Self] = &[Self::MoreNegative, Self::MorePositive];

    fn label(self) -> &'static str {
        match self {
            Self::MoreNegative => "moreN",
            Self::MorePositive => "moreP",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::MoreNegative => &["moreN", "more_negative"],
            Self::MorePositive => &["moreP", "more_positive"],
        }
    }
}

/// Whether the signal at `t-1` matches the one at `t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum TMinus1VsT {
    #[default]
    Same,
    Different,
}

impl Category for TMinus1VsT {
    const ALL: &'static [Self] = &[Self::Same, Self::Different];

    fn label(self) -> &'static str {
        match self {
            Self::Same => "same",
            Self::Different => "diff",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Same => &["same"],
            Self::Different => &["diff", "different"],
        }
    }
}

// ---------------------------------------------------------------------------
// Condition keys
// ---------------------------------------------------------------------------

/// The four binary condition columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConditionKey {
    SignalT,
    NumsigRatio,
    NumPvsN,
    TMinus1VsT,
}

impl ConditionKey {
    pub const ALL: [ConditionKey; 4] = [
        ConditionKey::SignalT,
        ConditionKey::NumsigRatio,
        ConditionKey::NumPvsN,
        ConditionKey::TMinus1VsT,
    ];

    /// Canonical header name of the column.
    pub fn column(self) -> &'static str {
        match self {
            ConditionKey::SignalT => "signal_t",
            ConditionKey::NumsigRatio => "numsig_ratio",
            ConditionKey::NumPvsN => "num_PvsN",
            ConditionKey::TMinus1VsT => "t-1vst",
        }
    }

    /// Header names accepted for this column.
    pub fn header_aliases(self) -> &'static [&'static str] {
        match self {
            ConditionKey::SignalT => &["signal_t"],
            ConditionKey::NumsigRatio => &["numsig_ratio"],
            ConditionKey::NumPvsN => &["num_PvsN"],
            ConditionKey::TMinus1VsT => &["t-1vst", "t_minus1_vs_t"],
        }
    }

    /// The two choices for this key, in button order.
    pub fn choices(self) -> [ConditionChoice; 2] {
        match self {
            ConditionKey::SignalT => [
                ConditionChoice::SignalT(SignalT::Negative),
                ConditionChoice::SignalT(SignalT::Positive),
            ],
            ConditionKey::NumsigRatio => [
                ConditionChoice::NumsigRatio(NumsigRatio::Under20Percent),
                ConditionChoice::NumsigRatio(NumsigRatio::Over20Percent),
            ],
            ConditionKey::NumPvsN => [
                ConditionChoice::NumPvsN(NumPvsN::MoreNegative),
                ConditionChoice::NumPvsN(NumPvsN::MorePositive),
            ],
            ConditionKey::TMinus1VsT => [
                ConditionChoice::TMinus1VsT(TMinus1VsT::Same),
                ConditionChoice::TMinus1VsT(TMinus1VsT::Different),
            ],
        }
    }
}

/// A value for one condition key. The variant names the key, so a value can
/// never be paired with the wrong column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionChoice {
    SignalT(SignalT),
    NumsigRatio(NumsigRatio),
    NumPvsN(NumPvsN),
    TMinus1VsT(TMinus1VsT),
}

impl ConditionChoice {
    pub fn key(self) -> ConditionKey {
        match self {
            ConditionChoice::SignalT(_) => ConditionKey::SignalT,
            ConditionChoice::NumsigRatio(_) => ConditionKey::NumsigRatio,
            ConditionChoice::NumPvsN(_) => ConditionKey::NumPvsN,
            ConditionChoice::TMinus1VsT(_) => ConditionKey::TMinus1VsT,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConditionChoice::SignalT(v) => v.label(),
            ConditionChoice::NumsigRatio(v) => v.label(),
            ConditionChoice::NumPvsN(v) => v.label(),
            ConditionChoice::TMinus1VsT(v) => v.label(),
        }
    }
}

/// One chosen value per condition key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Conditions {
    pub signal_t: SignalT,
    pub numsig_ratio: NumsigRatio,
    pub num_pvs_n: NumPvsN,
    pub t_minus1_vs_t: TMinus1VsT,
}

impl Conditions {
    /// Current value for `key`.
    pub fn get(&self, key: ConditionKey) -> ConditionChoice {
        match key {
            ConditionKey::SignalT => ConditionChoice::SignalT(self.signal_t),
            ConditionKey::NumsigRatio => ConditionChoice::NumsigRatio(self.numsig_ratio),
            ConditionKey::NumPvsN => ConditionChoice::NumPvsN(self.num_pvs_n),
            ConditionKey::TMinus1VsT => ConditionChoice::TMinus1VsT(self.t_minus1_vs_t),
        }
    }

    /// Overwrite the entry named by the choice's key; the other three stay.
    pub fn set(&mut self, choice: ConditionChoice) {
        match choice {
            ConditionChoice::SignalT(v) => self.signal_t = v,
            ConditionChoice::NumsigRatio(v) => self.numsig_ratio = v,
            ConditionChoice::NumPvsN(v) => self.num_pvs_n = v,
            ConditionChoice::TMinus1VsT(v) => self.t_minus1_vs_t = v,
        }
    }
}

// ---------------------------------------------------------------------------
// RowRecord – one validated spreadsheet row
// ---------------------------------------------------------------------------

/// One metric value for one position type and condition combination.
#[derive(Debug, Clone, PartialEq)]
pub struct RowRecord {
    pub position_type: PositionType,
    pub conditions: Conditions,
    pub metric: String,
    pub value: f64,
}

/// Identity of a row; expected to be unique within a dataset.
pub type RowKey = (PositionType, Conditions, String);

impl RowRecord {
    pub fn key(&self) -> RowKey {
        (self.position_type, self.conditions, self.metric.clone())
    }
}

// ---------------------------------------------------------------------------
// MetricsDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The parsed rows in file order, plus bookkeeping from the load.
#[derive(Debug, Clone, Default)]
pub struct MetricsDataset {
    pub rows: Vec<RowRecord>,
    /// Rows dropped at the parse boundary because they failed validation.
    pub skipped: usize,
}

impl MetricsDataset {
    pub fn new(rows: Vec<RowRecord>, skipped: usize) -> Self {
        Self { rows, skipped }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct metric names in first-seen order.
    pub fn metric_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for row in &self.rows {
            if !names.iter().any(|n| *n == row.metric) {
                names.push(row.metric.clone());
            }
        }
        names
    }

    /// Keys that occur on more than one row, with their occurrence count.
    pub fn duplicate_keys(&self) -> Vec<(RowKey, usize)> {
        let mut counts: BTreeMap<RowKey, usize> = BTreeMap::new();
        for row in &self.rows {
            *counts.entry(row.key()).or_default() += 1;
        }
        counts.into_iter().filter(|(_, n)| *n > 1).collect()
    }
}
