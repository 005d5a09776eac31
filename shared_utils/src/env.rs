use thiserror::Error;

/// An environment variable required by the application is not set.
#[derive(Debug, Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// Reads an environment variable, returning a structured error if it's missing.
///
/// Used for values that must come from the environment, like the broker
/// access token.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    std::env::var(name).map_err(|_| MissingEnvVarError(name.to_string()))
}

/// Reads an environment variable, falling back to a default when unset.
///
/// Used at CLI edges where a missing variable is not an error, e.g. the
/// data root directory.
pub fn env_var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_var_is_a_structured_error() {
        let err = get_env_var("MDS_TEST_DOES_NOT_EXIST").unwrap_err();
        assert!(err.to_string().contains("MDS_TEST_DOES_NOT_EXIST"));
    }

    #[test]
    fn fallback_applies_when_unset() {
        assert_eq!(
            env_var_or("MDS_TEST_DOES_NOT_EXIST", "data/historical"),
            "data/historical"
        );
    }
}
