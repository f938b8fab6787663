//! Configuration validation.

use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_upstream(config, &mut result);
        Self::validate_client(config, &mut result);
        Self::validate_mentor(config, &mut result);

        result
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }

        if config.server.body_limit_kb == 0 {
            result.add_error(ValidationError::new(
                "server.body_limit_kb",
                "body_limit_kb must be greater than 0",
            ));
        }

        if config.server.cors_origins.is_empty() {
            result.add_warning(ValidationWarning::new(
                "server.cors_origins",
                "No CORS origins allowed, browser clients will be rejected",
            ));
        }
    }

    fn validate_upstream(config: &Config, result: &mut ValidationResult) {
        if !is_http_url(&config.upstream.api_url) {
            result.add_error(ValidationError::new(
                "upstream.api_url",
                "api_url must start with http:// or https://",
            ));
        }

        if config.upstream.api_key.is_none() {
            result.add_warning(ValidationWarning::new(
                "upstream.api_key",
                "API key is not set, the server will answer with a configuration notice",
            ));
        }

        if config.upstream.model.trim().is_empty() {
            result.add_error(ValidationError::new("upstream.model", "Model cannot be empty"));
        }

        if !(0.0..=2.0).contains(&config.upstream.temperature) {
            result.add_error(ValidationError::new(
                "upstream.temperature",
                "temperature must be between 0.0 and 2.0",
            ));
        }
    }

    fn validate_client(config: &Config, result: &mut ValidationResult) {
        if !is_http_url(&config.client.endpoint) {
            result.add_error(ValidationError::new(
                "client.endpoint",
                "endpoint must start with http:// or https://",
            ));
        }
    }

    fn validate_mentor(config: &Config, result: &mut ValidationResult) {
        if !is_http_url(&config.mentor.site_origin) {
            result.add_error(ValidationError::new(
                "mentor.site_origin",
                "site_origin must start with http:// or https://",
            ));
        }

        if config.mentor.recommendation_threshold == 0 {
            result.add_error(ValidationError::new(
                "mentor.recommendation_threshold",
                "recommendation_threshold must be greater than 0",
            ));
        }

        if config.mentor.max_history_turns == 0 {
            result.add_warning(ValidationWarning::new(
                "mentor.max_history_turns",
                "max_history_turns is 0, the model will only see the current question",
            ));
        }
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
