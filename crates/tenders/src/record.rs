use core::str::FromStr;

use serde::{Deserialize, Serialize};

use tenderdesk_core::{DomainError, DomainResult, Entity, TenderId, ValueObject};

/// Suffix appended to the name of a cloned tender.
pub const CLONE_MARKER: &str = " (clone)";

/// Tender status lifecycle.
///
/// Serialized with the labels shown to users (`"Missing Docs"` keeps its space).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum TenderStatus {
    #[default]
    Draft,
    Submitted,
    Pending,
    #[serde(rename = "Missing Docs")]
    MissingDocs,
    Awarded,
}

impl TenderStatus {
    /// Every status, in display order.
    pub const ALL: [TenderStatus; 5] = [
        TenderStatus::Draft,
        TenderStatus::Submitted,
        TenderStatus::Pending,
        TenderStatus::MissingDocs,
        TenderStatus::Awarded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TenderStatus::Draft => "Draft",
            TenderStatus::Submitted => "Submitted",
            TenderStatus::Pending => "Pending",
            TenderStatus::MissingDocs => "Missing Docs",
            TenderStatus::Awarded => "Awarded",
        }
    }

    /// Parse a label, falling back to `Draft` for anything unrecognized.
    pub fn from_label_lenient(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }
}

impl core::fmt::Display for TenderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TenderStatus {
    type Err = DomainError;

    /// Case-insensitive; spaces, dashes and underscores are ignored so that
    /// `Missing Docs`, `missing-docs` and `MISSING_DOCS` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "draft" => Ok(TenderStatus::Draft),
            "submitted" => Ok(TenderStatus::Submitted),
            "pending" => Ok(TenderStatus::Pending),
            "missingdocs" => Ok(TenderStatus::MissingDocs),
            "awarded" => Ok(TenderStatus::Awarded),
            _ => Err(DomainError::validation(format!("unknown tender status: {s:?}"))),
        }
    }
}

/// Monetary value of a tender: finite and non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct TenderValue(f64);

impl ValueObject for TenderValue {}

impl TenderValue {
    pub const ZERO: TenderValue = TenderValue(0.0);

    pub fn new(amount: f64) -> DomainResult<Self> {
        if !amount.is_finite() {
            return Err(DomainError::validation("value must be a finite number"));
        }
        if amount < 0.0 {
            return Err(DomainError::validation("value must not be negative"));
        }
        // Normalize -0.0 so it serializes as `0`.
        Ok(Self(amount + 0.0))
    }

    /// Parse a value typed into a form.
    ///
    /// Blank or unparseable input becomes zero; a parseable negative amount is
    /// rejected.
    pub fn parse_form(input: &str) -> DomainResult<Self> {
        match input.trim().parse::<f64>() {
            Ok(amount) if amount.is_finite() => Self::new(amount),
            _ => Ok(Self::ZERO),
        }
    }

    pub fn amount(&self) -> f64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

impl TryFrom<f64> for TenderValue {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TenderValue> for f64 {
    fn from(value: TenderValue) -> Self {
        value.0
    }
}

impl core::fmt::Display for TenderValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// The mutable fields of a tender (everything except its id).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenderFields {
    pub name: String,
    pub org: String,
    pub status: TenderStatus,
    pub value: TenderValue,
    pub deadline: String,
    pub note: String,
}

impl TenderFields {
    /// Fields with the given name and everything else defaulted.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("tender name is required"));
        }
        Ok(())
    }
}

/// A tracked tender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenderRecord {
    id: TenderId,
    name: String,
    org: String,
    status: TenderStatus,
    value: TenderValue,
    deadline: String,
    note: String,
}

impl TenderRecord {
    /// Create a new tender from validated fields.
    pub fn new(id: TenderId, fields: TenderFields) -> DomainResult<Self> {
        fields.validate()?;
        Ok(Self::restore(id, fields))
    }

    /// Rebuild a tender from stored data without validation.
    ///
    /// Stored data is tolerated as-is (a blank name included); validation only
    /// applies to user-entered fields.
    pub fn restore(id: TenderId, fields: TenderFields) -> Self {
        let TenderFields {
            name,
            org,
            status,
            value,
            deadline,
            note,
        } = fields;
        Self {
            id,
            name,
            org,
            status,
            value,
            deadline,
            note,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    pub fn status(&self) -> TenderStatus {
        self.status
    }

    pub fn value(&self) -> TenderValue {
        self.value
    }

    pub fn deadline(&self) -> &str {
        &self.deadline
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    /// Snapshot of the mutable fields (used to prefill edit forms).
    pub fn fields(&self) -> TenderFields {
        TenderFields {
            name: self.name.clone(),
            org: self.org.clone(),
            status: self.status,
            value: self.value,
            deadline: self.deadline.clone(),
            note: self.note.clone(),
        }
    }

    /// Overwrite every mutable field in place; the id never changes.
    pub fn apply(&mut self, fields: TenderFields) -> DomainResult<()> {
        fields.validate()?;
        let id = self.id.clone();
        *self = Self::restore(id, fields);
        Ok(())
    }

    /// Deep copy under a new id, with the clone marker appended to the name.
    pub fn duplicate(&self, id: TenderId) -> Self {
        let mut copy = self.clone();
        copy.id = id;
        copy.name.push_str(CLONE_MARKER);
        copy
    }

    /// Lower-cased `"{name} {id} {org} {note}"`, the text searched by queries.
    pub fn search_text(&self) -> String {
        format!("{} {} {} {}", self.name, self.id, self.org, self.note).to_lowercase()
    }
}

impl Entity for TenderRecord {
    type Id = TenderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
