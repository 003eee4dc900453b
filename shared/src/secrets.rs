//! AWS Secrets Manager integration.

use aws_sdk_secretsmanager::Client as SecretsClient;
use serde::Deserialize;

use crate::config::CompletionConfig;
use crate::{Error, Result};

/// Completion credential stored as a JSON secret.
#[derive(Debug, Deserialize)]
struct ApiKeySecret {
    api_key: String,
}

/// Get a secret value from Secrets Manager.
pub async fn get_secret(client: &SecretsClient, secret_arn: &str) -> Result<String> {
    let response = client
        .get_secret_value()
        .secret_id(secret_arn)
        .send()
        .await
        .map_err(|e| Error::Aws(format!("Failed to get secret: {}", e)))?;

    response
        .secret_string()
        .map(str::to_string)
        .ok_or_else(|| Error::Aws("Secret has no string value".to_string()))
}

/// Read an API key out of a secret string.
///
/// Accepts either `{"api_key": "..."}` or the bare key.
pub fn parse_api_key(secret: &str) -> Result<String> {
    let secret = secret.trim();
    let key = match serde_json::from_str::<ApiKeySecret>(secret) {
        Ok(parsed) => parsed.api_key,
        Err(_) if secret.starts_with('{') => {
            return Err(Error::Config("Secret JSON has no api_key".to_string()));
        }
        Err(_) => secret.to_string(),
    };

    if key.is_empty() {
        return Err(Error::Config("Completion API key is empty".to_string()));
    }
    Ok(key)
}

/// Resolve the completion API key, going to Secrets Manager only when the
/// key was not provided directly.
pub async fn resolve_completion_api_key(config: &CompletionConfig) -> Result<String> {
    if let Some(key) = &config.api_key {
        return Ok(key.clone());
    }

    let secret_arn = config.api_key_secret_arn.as_deref().ok_or_else(|| {
        Error::Config("Neither OPENAI_API_KEY nor OPENAI_API_KEY_SECRET_ARN is set".to_string())
    })?;

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let client = SecretsClient::new(&aws_config);

    parse_api_key(&get_secret(&client, secret_arn).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_secret() {
        let key = parse_api_key(r#"{"api_key":"sk-test-123"}"#).unwrap();
        assert_eq!(key, "sk-test-123");
    }

    #[test]
    fn test_parse_plain_secret() {
        assert_eq!(parse_api_key("  sk-plain\n").unwrap(), "sk-plain");
    }

    #[test]
    fn test_parse_bad_secrets() {
        assert!(matches!(parse_api_key(r#"{"token":"x"}"#), Err(Error::Config(_))));
        assert!(matches!(parse_api_key("   "), Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_inline_key_skips_secrets_manager() {
        let config = CompletionConfig {
            base_url: "http://localhost".to_string(),
            api_key: Some("sk-inline".to_string()),
            api_key_secret_arn: None,
        };
        assert_eq!(resolve_completion_api_key(&config).await.unwrap(), "sk-inline");
    }

    #[tokio::test]
    async fn test_missing_key_is_config_error() {
        let config = CompletionConfig {
            base_url: "http://localhost".to_string(),
            api_key: None,
            api_key_secret_arn: None,
        };
        assert!(matches!(
            resolve_completion_api_key(&config).await,
            Err(Error::Config(_))
        ));
    }
}
