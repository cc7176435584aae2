use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::ReflectConfig;

/// JSON schema for the reflection engine's TOML configuration.
#[must_use]
pub fn json_schema() -> RootSchema {
    schema_for!(ReflectConfig)
}
