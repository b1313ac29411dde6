//! Runs query documents against the schema and shapes the response envelope.

use std::sync::Arc;

use juniper::InputValue;
use juniper::http::GraphQLRequest;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::schema::Schema;
use crate::state::AppData;

/// A query document plus the optional operation name and variables to run it with.
#[derive(Clone, Debug, Default)]
pub struct QueryRequest {
    query: String,
    operation_name: Option<String>,
    variables: Option<InputValue>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// Parses `json` as the variables map. Anything but a JSON object is refused.
    pub fn with_variables_json(mut self, json: &str) -> Result<Self, AppError> {
        let value: Value = serde_json::from_str(json).map_err(AppError::MalformedVariables)?;
        if !value.is_object() {
            return Err(AppError::VariablesNotObject);
        }
        let variables = serde_json::from_value(value).map_err(AppError::MalformedVariables)?;
        self.variables = Some(variables);
        Ok(self)
    }

    fn to_graphql(&self) -> GraphQLRequest {
        GraphQLRequest::new(
            self.query.clone(),
            self.operation_name.clone(),
            self.variables.clone(),
        )
    }
}

/// The `{data, errors}` envelope produced by one execution.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryResponse {
    body: Value,
}

impl QueryResponse {
    fn from_body(mut body: Value) -> Self {
        // Requests rejected before execution carry no `data` key.
        if let Some(map) = body.as_object_mut() {
            map.entry("data").or_insert(Value::Null);
        }
        Self { body }
    }

    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn errors(&self) -> &[Value] {
        self.body
            .get("errors")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_ok(&self) -> bool {
        self.errors().is_empty()
    }

    pub fn error_messages(&self) -> Vec<&str> {
        self.errors()
            .iter()
            .filter_map(|e| e.get("message").and_then(Value::as_str))
            .collect()
    }

    pub fn to_json(&self) -> &Value {
        &self.body
    }

    pub fn into_json(self) -> Value {
        self.body
    }

    pub fn to_json_string(&self, pretty: bool) -> Result<String, AppError> {
        let rendered = if pretty {
            serde_json::to_string_pretty(&self.body)
        } else {
            serde_json::to_string(&self.body)
        };
        rendered.map_err(AppError::Serialization)
    }
}

/// A built schema bound to the context its resolvers read from.
#[derive(Clone)]
pub struct QueryRunner {
    schema: Arc<Schema<'static>>,
    context: AppData,
}

impl QueryRunner {
    pub fn new(schema: Schema<'static>, context: AppData) -> Self {
        Self {
            schema: Arc::new(schema),
            context,
        }
    }

    pub fn context(&self) -> &AppData {
        &self.context
    }

    pub async fn execute(&self, request: &QueryRequest) -> Result<QueryResponse, AppError> {
        debug!(operation = ?request.operation_name, "executing query");
        let response = request.to_graphql().execute(&self.schema, &self.context).await;
        let body = serde_json::to_value(&response).map_err(AppError::Serialization)?;
        let response = QueryResponse::from_body(body);
        if !response.is_ok() {
            warn!(errors = ?response.error_messages(), "query finished with errors");
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn variables_must_be_an_object() {
        let request = QueryRequest::new("{ hello }");
        assert!(matches!(
            request.clone().with_variables_json("[1, 2]"),
            Err(AppError::VariablesNotObject)
        ));
        assert!(matches!(
            request.clone().with_variables_json("{ nope"),
            Err(AppError::MalformedVariables(_))
        ));
        let request = request.with_variables_json(r#"{"id": 2}"#).unwrap();
        assert!(request.variables.is_some());
    }

    #[test]
    fn envelope_without_data_gets_null_data() {
        let response = QueryResponse::from_body(json!({
            "errors": [{ "message": "Unknown field \"nope\" on type \"Query\"" }]
        }));
        assert_eq!(response.data(), &Value::Null);
        assert!(!response.is_ok());
        assert_eq!(
            response.error_messages(),
            vec!["Unknown field \"nope\" on type \"Query\""]
        );
    }

    #[test]
    fn renders_compact_and_pretty() {
        let response = QueryResponse::from_body(json!({ "data": { "hello": "world" } }));
        assert!(response.is_ok());
        assert_eq!(
            response.to_json_string(false).unwrap(),
            r#"{"data":{"hello":"world"}}"#
        );
        assert_eq!(
            response.to_json_string(true).unwrap(),
            "{\n  \"data\": {\n    \"hello\": \"world\"\n  }\n}"
        );
    }
}
