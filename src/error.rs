use juniper::{FieldError, IntoFieldError, graphql_value};
use thiserror::Error;

/// Failures raised while serving a single request. These never abort the
/// process; they end up in the `errors` list of the response envelope or are
/// returned to the caller building the request.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("no tutorial id left to assign after {last}")]
    IdSpaceExhausted { last: i32 },

    #[error("variables must be a JSON object")]
    VariablesNotObject,

    #[error("malformed variables: {0}")]
    MalformedVariables(serde_json::Error),

    #[error("failed to serialize response: {0}")]
    Serialization(serde_json::Error),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::IdSpaceExhausted { .. } => "ID_SPACE_EXHAUSTED",
            AppError::VariablesNotObject | AppError::MalformedVariables(_) => "BAD_VARIABLES",
            AppError::Serialization(_) => "INTERNAL",
        }
    }
}

impl IntoFieldError for AppError {
    fn into_field_error(self) -> FieldError {
        let code = self.code();
        tracing::warn!(code, "{self}");
        FieldError::new(self.to_string(), graphql_value!({ "code": code }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_error_carries_code_extension() {
        let err = AppError::IdSpaceExhausted { last: i32::MAX }.into_field_error();
        assert_eq!(
            err.message(),
            format!("no tutorial id left to assign after {}", i32::MAX)
        );
        assert_eq!(
            err.extensions(),
            &graphql_value!({ "code": "ID_SPACE_EXHAUSTED" })
        );
    }
}
