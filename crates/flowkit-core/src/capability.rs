// ── Capability contracts ──
//
// A capability is a named operation with a declared input shape, output
// shape, approval flag, and example invocations. Implementors write a
// strongly-typed `Tool`; the blanket `Capability` impl turns it into the
// object-safe, JSON-in/JSON-out surface the orchestrator consumes.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::CoreError;

/// Constraint checks beyond what the input's type already enforces.
pub trait Validate {
    fn validate(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

/// Every result shape carries an optional error; present means the
/// operation did not achieve its effect.
pub trait Outcome {
    fn error(&self) -> Option<&str>;
}

/// Strongly-typed capability.
///
/// `execute` never fails: every error path ends in an `Output` whose
/// [`Outcome::error`] is set.
#[async_trait]
pub trait Tool: Send + Sync + 'static {
    type Input: DeserializeOwned + JsonSchema + Validate + Send;
    type Output: Serialize + JsonSchema + Outcome + Send;

    const NAME: &'static str;
    const DESCRIPTION: &'static str;
    const REQUIRES_APPROVAL: bool;

    /// Example argument objects, each valid against `Input`.
    fn examples(&self) -> Vec<Value>;

    async fn execute(&self, input: Self::Input) -> Self::Output;
}

/// Everything an orchestrator needs to present a capability to a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub output_schema: Value,
    pub requires_approval: bool,
    pub examples: Vec<Value>,
}

/// Object-safe view of a [`Tool`], keyed by name in the registry.
#[async_trait]
pub trait Capability: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn requires_approval(&self) -> bool;
    fn input_schema(&self) -> Value;
    fn output_schema(&self) -> Value;
    fn examples(&self) -> Vec<Value>;

    /// Validate `args` and run the executor.
    ///
    /// `Err` is only ever [`CoreError::Validation`]; every other failure is
    /// reported inside the returned result object.
    async fn invoke(&self, args: Value) -> Result<Value, CoreError>;

    fn descriptor(&self) -> CapabilityDescriptor {
        CapabilityDescriptor {
            name: self.name().to_owned(),
            description: self.description().to_owned(),
            input_schema: self.input_schema(),
            output_schema: self.output_schema(),
            requires_approval: self.requires_approval(),
            examples: self.examples(),
        }
    }
}

/// Deserialize and constraint-check raw arguments. `null` reads as `{}`.
pub fn decode_input<I>(args: Value) -> Result<I, CoreError>
where
    I: DeserializeOwned + Validate,
{
    let args = if args.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        args
    };
    let input: I = serde_json::from_value(args).map_err(|e| CoreError::validation(e.to_string()))?;
    input.validate()?;
    Ok(input)
}

fn schema_value(schema: schemars::schema::RootSchema) -> Value {
    serde_json::to_value(schema).unwrap_or(Value::Null)
}

#[async_trait]
impl<T: Tool> Capability for T {
    fn name(&self) -> &'static str {
        T::NAME
    }

    fn description(&self) -> &'static str {
        T::DESCRIPTION
    }

    fn requires_approval(&self) -> bool {
        T::REQUIRES_APPROVAL
    }

    fn input_schema(&self) -> Value {
        schema_value(schemars::schema_for!(T::Input))
    }

    fn output_schema(&self) -> Value {
        schema_value(schemars::schema_for!(T::Output))
    }

    fn examples(&self) -> Vec<Value> {
        Tool::examples(self)
    }

    async fn invoke(&self, args: Value) -> Result<Value, CoreError> {
        let input: T::Input = decode_input(args).inspect_err(|e| {
            debug!(capability = T::NAME, error = %e, "rejected arguments");
        })?;

        let output = self.execute(input).await;
        if let Some(error) = output.error() {
            warn!(capability = T::NAME, error, "capability failed");
        }

        serde_json::to_value(output).map_err(|e| CoreError::Internal(e.to_string()))
    }
}

// ── Shared input constraints ─────────────────────────────────────────

pub const MAX_LIST_LIMIT: u32 = 100;

/// `limit`, when given, must be within `1..=100`.
pub fn check_limit(limit: Option<u32>) -> Result<(), CoreError> {
    match limit {
        Some(l) if !(1..=MAX_LIST_LIMIT).contains(&l) => Err(CoreError::validation(format!(
            "limit must be between 1 and {MAX_LIST_LIMIT}, got {l}"
        ))),
        _ => Ok(()),
    }
}

/// A required string argument must not be blank.
pub fn check_non_empty(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::validation(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Probe {
        #[serde(default)]
        limit: Option<u32>,
    }

    impl Validate for Probe {
        fn validate(&self) -> Result<(), CoreError> {
            check_limit(self.limit)
        }
    }

    #[test]
    fn null_args_read_as_empty_object() {
        let probe: Probe = decode_input(Value::Null).expect("null should decode");
        assert_eq!(probe.limit, None);
    }

    #[test]
    fn limit_bounds_are_inclusive() {
        assert!(check_limit(Some(1)).is_ok());
        assert!(check_limit(Some(100)).is_ok());
        assert!(check_limit(None).is_ok());
        assert!(matches!(
            check_limit(Some(0)),
            Err(CoreError::Validation { .. })
        ));
        assert!(matches!(
            check_limit(Some(101)),
            Err(CoreError::Validation { .. })
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = decode_input::<Probe>(serde_json::json!({ "limt": 5 }));
        assert!(matches!(result, Err(CoreError::Validation { .. })));
    }

    #[test]
    fn wrong_types_are_rejected() {
        let result = decode_input::<Probe>(serde_json::json!({ "limit": "ten" }));
        assert!(matches!(result, Err(CoreError::Validation { .. })));
    }

    #[test]
    fn blank_strings_are_rejected() {
        assert!(check_non_empty("pageId", "  ").is_err());
        assert!(check_non_empty("pageId", "p1").is_ok());
    }
}
