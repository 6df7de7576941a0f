use std::fmt;

/// Operator combining the outcomes of a condition set's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "UPPERCASE")
)]
pub enum ConditionConjunction {
    And,
    Or,
    Xor,
}

impl ConditionConjunction {
    pub const ALL: [ConditionConjunction; 3] = [
        ConditionConjunction::And,
        ConditionConjunction::Or,
        ConditionConjunction::Xor,
    ];
}

impl fmt::Display for ConditionConjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionConjunction::And => write!(f, "AND"),
            ConditionConjunction::Or => write!(f, "OR"),
            ConditionConjunction::Xor => write!(f, "XOR"),
        }
    }
}
