use thiserror::Error;

use super::ConditionConjunction;

#[derive(Debug, Error)]
pub enum ConditionSetError {
    #[error("condition set '{conjunction}' has no conditions; at least one is required")]
    Empty { conjunction: ConditionConjunction },
}
