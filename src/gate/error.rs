/// Gate Error Handling
///
/// Structural template errors. Any of these rejects the template it was
/// raised for; other templates keep loading.
use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("Layout has no rows")]
    EmptyLayout,

    #[error("Layout rows must be contiguous (stray row at line {line})")]
    TornLayout { line: usize },

    #[error("Expected exactly 2 control cells, found {found}")]
    ControlCount { found: usize },

    #[error("Layout has no entrance cells")]
    NoEntrances,

    #[error("Button material '{material}' is not an interactive block")]
    InvalidButton { material: String },

    #[error("Symbol '{symbol}' at row {row}, column {column} has no material mapping")]
    UnmappedSymbol {
        symbol: char,
        row: usize,
        column: usize,
    },

    #[error("Unknown material '{name}' for key '{key}'")]
    UnknownMaterial { key: String, name: String },

    #[error("Unknown tag '#{name}' for key '{key}'")]
    UnknownTag { key: String, name: String },

    #[error("Invalid value '{value}' for key '{key}'")]
    InvalidValue { key: String, value: String },
}

/// Attach the template name to a structural error
pub fn reject(template: &str, reason: TemplateError) -> EngineError {
    EngineError::TemplateRejected {
        template: template.to_string(),
        reason,
    }
}
