use std::fmt;

/// Opaque identifier of an external signal (a classifier, a bank lookup, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct SignalId(String);

impl SignalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SignalId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SignalId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The signal a leaf condition runs, as stored on the condition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct SignalRef {
    pub id: SignalId,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub subcategory: Option<String>,
}

impl SignalRef {
    pub fn new(id: impl Into<SignalId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            subcategory: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_owned());
        self
    }

    #[must_use]
    pub fn with_subcategory(mut self, subcategory: &str) -> Self {
        self.subcategory = Some(subcategory.to_owned());
        self
    }
}

/// Platform-computed inputs that exist on every item regardless of its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoopInput {
    #[cfg_attr(feature = "serde", serde(rename = "All text"))]
    AllText,
    #[cfg_attr(feature = "serde", serde(rename = "Any image"))]
    AnyImage,
    #[cfg_attr(feature = "serde", serde(rename = "Any geohash"))]
    AnyGeohash,
    #[cfg_attr(feature = "serde", serde(rename = "Any video"))]
    AnyVideo,
    #[cfg_attr(feature = "serde", serde(rename = "Content author (user)"))]
    AuthorUser,
    #[cfg_attr(feature = "serde", serde(rename = "Relevant Policy"))]
    PolicyId,
    #[cfg_attr(feature = "serde", serde(rename = "Source"))]
    Source,
}

impl fmt::Display for CoopInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CoopInput::AllText => "All text",
            CoopInput::AnyImage => "Any image",
            CoopInput::AnyGeohash => "Any geohash",
            CoopInput::AnyVideo => "Any video",
            CoopInput::AuthorUser => "Content author (user)",
            CoopInput::PolicyId => "Relevant Policy",
            CoopInput::Source => "Source",
        };
        f.write_str(label)
    }
}

/// Where a derived field reads the value it derives from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(
        tag = "type",
        rename_all = "SCREAMING_SNAKE_CASE",
        rename_all_fields = "camelCase"
    )
)]
pub enum DerivedFieldSource {
    FullItem,
    ContentField { name: String, item_type_id: String },
    #[cfg_attr(feature = "serde", serde(rename = "CONTENT_COOP_INPUT"))]
    CoopInput { name: CoopInput },
}

/// A field computed from the item by running one or more signals in
/// sequence (e.g. transcribing a video before classifying the transcript).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct DerivedFieldSpec {
    pub source: DerivedFieldSource,
    pub derivation_type: String,
    /// Signals run to produce the field, in order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub recipe: Vec<SignalId>,
}

/// The value a leaf condition feeds to its signal.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(
        tag = "type",
        rename_all = "SCREAMING_SNAKE_CASE",
        rename_all_fields = "camelCase"
    )
)]
pub enum ConditionInput {
    /// The id of the user being evaluated. Only meaningful for user rules.
    UserId,
    /// The whole item, optionally restricted to some item types. An empty
    /// list means every item type.
    FullItem {
        #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
        item_type_ids: Vec<String>,
    },
    ContentField { name: String, item_type_id: String },
    #[cfg_attr(feature = "serde", serde(rename = "CONTENT_COOP_INPUT"))]
    CoopInput { name: CoopInput },
    #[cfg_attr(feature = "serde", serde(rename = "CONTENT_DERIVED_FIELD"))]
    DerivedField { spec: DerivedFieldSpec },
}

/// How a signal's value is compared against the condition's threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum ValueComparator {
    Equals,
    NotEqualTo,
    LessThan,
    LessThanOrEquals,
    GreaterThan,
    GreaterThanOrEquals,
    /// The compared value is missing because the signal producing it failed.
    IsUnavailable,
    /// The compared value is missing because the item does not provide it.
    IsNotProvided,
}

impl fmt::Display for ValueComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueComparator::Equals => write!(f, "=="),
            ValueComparator::NotEqualTo => write!(f, "!="),
            ValueComparator::LessThan => write!(f, "<"),
            ValueComparator::LessThanOrEquals => write!(f, "<="),
            ValueComparator::GreaterThan => write!(f, ">"),
            ValueComparator::GreaterThanOrEquals => write!(f, ">="),
            ValueComparator::IsUnavailable => write!(f, "is unavailable"),
            ValueComparator::IsNotProvided => write!(f, "is not provided"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum Threshold {
    Number(f64),
    Text(String),
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::Number(n) => write!(f, "{n}"),
            Threshold::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

impl From<f64> for Threshold {
    fn from(n: f64) -> Self {
        Threshold::Number(n)
    }
}

#[allow(clippy::cast_precision_loss)]
impl From<i64> for Threshold {
    fn from(n: i64) -> Self {
        Threshold::Number(n as f64)
    }
}

impl From<&str> for Threshold {
    fn from(s: &str) -> Self {
        Threshold::Text(s.to_owned())
    }
}

/// Values a matching signal compares the input against. Resolving bank ids
/// to their contents is the signal's job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct MatchingValues {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub strings: Vec<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub text_bank_ids: Vec<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub location_bank_ids: Vec<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub image_bank_ids: Vec<String>,
}

/// A terminal node of a condition tree: one signal check against one input.
///
/// # Example
///
/// ```
/// use sieve::{ConditionInput, LeafCondition, SignalRef, ValueComparator};
///
/// let leaf = LeafCondition::new(ConditionInput::UserId)
///     .with_signal(SignalRef::new("toxicity").with_subcategory("insult"))
///     .with_comparator(ValueComparator::GreaterThan)
///     .with_threshold(0.8);
/// assert_eq!(leaf.to_string(), "toxicity > 0.8");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct LeafCondition {
    pub input: ConditionInput,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub signal: Option<SignalRef>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub comparator: Option<ValueComparator>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub threshold: Option<Threshold>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub matching_values: Option<MatchingValues>,
}

impl LeafCondition {
    #[must_use]
    pub fn new(input: ConditionInput) -> Self {
        Self {
            input,
            signal: None,
            comparator: None,
            threshold: None,
            matching_values: None,
        }
    }

    #[must_use]
    pub fn with_signal(mut self, signal: SignalRef) -> Self {
        self.signal = Some(signal);
        self
    }

    #[must_use]
    pub fn with_comparator(mut self, comparator: ValueComparator) -> Self {
        self.comparator = Some(comparator);
        self
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: impl Into<Threshold>) -> Self {
        self.threshold = Some(threshold.into());
        self
    }

    #[must_use]
    pub fn with_matching_values(mut self, values: MatchingValues) -> Self {
        self.matching_values = Some(values);
        self
    }

    #[must_use]
    pub fn signal_id(&self) -> Option<&SignalId> {
        self.signal.as_ref().map(|s| &s.id)
    }

    /// Every signal evaluating this leaf may run: the recipe of a derived
    /// field input first, then the leaf's own signal.
    pub fn signal_ids(&self) -> impl Iterator<Item = &SignalId> {
        let recipe: &[SignalId] = match &self.input {
            ConditionInput::DerivedField { spec } => spec.recipe.as_slice(),
            _ => &[],
        };
        recipe.iter().chain(self.signal_id())
    }
}

impl fmt::Display for LeafCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.signal {
            Some(signal) => write!(f, "{}", signal.id)?,
            None => write!(f, "<no signal>")?,
        }
        if let Some(comparator) = &self.comparator {
            write!(f, " {comparator}")?;
        }
        if let Some(threshold) = &self.threshold {
            write!(f, " {threshold}")?;
        }
        Ok(())
    }
}
