use derive_more::{Display, Error, From};
use juniper::Variables;
use tracing::{debug, info};

use crate::config::Config;
use crate::schema::registry::{self, RegistryError, TypeRegistry};
use crate::schema::{self, Schema};
use crate::state::AppData;
use crate::store::{IdPolicy, TutorialStore};

/// Configuration failures. Any of these is fatal: no query runs.
#[derive(Debug, Display, Error, From)]
pub enum SetupError {
    #[display("invalid type registry: {_0}")]
    #[from]
    Registry(RegistryError),

    #[display("schema introspection failed: {message}")]
    Introspection { message: String },
}

pub struct SetupResult {
    pub schema: Schema<'static>,
    pub registry: TypeRegistry,
    pub store: TutorialStore,
}

pub fn setup_all(config: &Config) -> Result<SetupResult, SetupError> {
    let registry = registry::tutorials_registry()?;
    let schema = schema::schema();
    verify_schema(&registry, &schema)?;
    info!(types = registry.types().count(), "schema ready");

    let id_policy = if config.sequential_ids {
        IdPolicy::Sequential
    } else {
        IdPolicy::Unassigned
    };
    let store = if config.seed {
        TutorialStore::seeded(id_policy)
    } else {
        TutorialStore::new(Vec::new(), id_policy)
    };
    debug!(len = store.len(), ?id_policy, "store populated");

    Ok(SetupResult {
        schema,
        registry,
        store,
    })
}

/// Introspects `schema` and checks it exposes exactly what `registry` declares.
pub fn verify_schema(registry: &TypeRegistry, schema: &Schema<'_>) -> Result<(), SetupError> {
    let (value, errors) = juniper::execute_sync(
        registry::INTROSPECTION_QUERY,
        None,
        schema,
        &Variables::new(),
        &AppData::default(),
    )
    .map_err(|e| SetupError::Introspection {
        message: e.to_string(),
    })?;

    if let Some(err) = errors.first() {
        return Err(SetupError::Introspection {
            message: err.error().message().to_string(),
        });
    }

    let introspection = serde_json::to_value(&value).map_err(|e| SetupError::Introspection {
        message: e.to_string(),
    })?;
    registry.verify(&introspection)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::registry::{FieldDef, FieldType, ObjectType};

    #[test]
    fn executable_schema_matches_registry() {
        let registry = registry::tutorials_registry().unwrap();
        verify_schema(&registry, &schema::schema()).unwrap();
    }

    #[test]
    fn drifted_registry_is_fatal() {
        let mut registry = TypeRegistry::new("Query", None);
        registry
            .register(
                ObjectType::new("Query")
                    .field(FieldDef::new("hello", FieldType::String.non_null())),
            )
            .unwrap();

        let err = verify_schema(&registry, &schema::schema()).unwrap_err();
        assert!(matches!(
            err,
            SetupError::Registry(RegistryError::UndeclaredField { .. })
        ));
    }

    #[test]
    fn config_controls_store_population() {
        let seeded = setup_all(&Config::default()).unwrap();
        assert_eq!(seeded.store.len(), 2);
        assert_eq!(seeded.store.id_policy(), IdPolicy::Unassigned);

        let config = Config {
            seed: false,
            sequential_ids: true,
            ..Config::default()
        };
        let empty = setup_all(&config).unwrap();
        assert!(empty.store.is_empty());
        assert_eq!(empty.store.id_policy(), IdPolicy::Sequential);
    }
}
