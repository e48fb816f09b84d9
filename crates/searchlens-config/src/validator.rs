//! Settings validation.

use searchlens_protocols::types::ProviderKind;

use crate::schema::Settings;

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

/// Settings validator.
pub struct SettingsValidator;

impl SettingsValidator {
    pub fn validate(settings: &Settings) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_server(settings, &mut result);
        Self::validate_completion(settings, &mut result);
        Self::validate_scrape(settings, &mut result);
        Self::validate_defaults(settings, &mut result);

        result
    }

    fn validate_server(settings: &Settings, result: &mut ValidationResult) {
        if settings.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if settings.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_completion(settings: &Settings, result: &mut ValidationResult) {
        let endpoint = &settings.completion.endpoint;
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            result.add_error(ValidationError::new(
                "completion.endpoint",
                "endpoint must start with http:// or https://",
            ));
        }

        if settings.completion.request_timeout_secs == Some(0) {
            result.add_error(ValidationError::new(
                "completion.request_timeout_secs",
                "request_timeout_secs must be greater than 0 when set",
            ));
        }
    }

    fn validate_scrape(settings: &Settings, result: &mut ValidationResult) {
        let scrape = &settings.scrape;

        if !scrape.chat_url.starts_with("http://") && !scrape.chat_url.starts_with("https://") {
            result.add_error(ValidationError::new(
                "scrape.chat_url",
                "chat_url must start with http:// or https://",
            ));
        }

        if scrape.discovery_max_attempts == 0 {
            result.add_error(ValidationError::new(
                "scrape.discovery_max_attempts",
                "discovery_max_attempts must be greater than 0",
            ));
        }

        if scrape.answer_max_attempts == 0 {
            result.add_error(ValidationError::new(
                "scrape.answer_max_attempts",
                "answer_max_attempts must be greater than 0",
            ));
        }

        if scrape.poll_interval_ms == 0 {
            result.add_error(ValidationError::new(
                "scrape.poll_interval_ms",
                "poll_interval_ms must be greater than 0",
            ));
        }

        if scrape.max_open_contexts == Some(0) {
            result.add_error(ValidationError::new(
                "scrape.max_open_contexts",
                "max_open_contexts must be greater than 0 when set",
            ));
        }

        let worst_case_ms = u64::from(scrape.discovery_max_attempts.max(scrape.answer_max_attempts))
            .saturating_mul(scrape.poll_interval_ms);
        if worst_case_ms > 10 * 60 * 1000 {
            result.add_warning(ValidationWarning::new(
                "scrape",
                "polling bounds allow a single request to run for more than 10 minutes",
            ));
        }
    }

    fn validate_defaults(settings: &Settings, result: &mut ValidationResult) {
        if ProviderKind::parse(&settings.defaults.provider).is_none() {
            result.add_warning(ValidationWarning::new(
                "defaults.provider",
                format!(
                    "Unknown provider '{}', valid values: [\"direct\", \"scrape\"]",
                    settings.defaults.provider
                ),
            ));
        }

        if settings.defaults.max_tokens == 0 {
            result.add_error(ValidationError::new(
                "defaults.max_tokens",
                "max_tokens must be greater than 0",
            ));
        }

        let token_missing = settings
            .defaults
            .auth_token
            .as_deref()
            .is_none_or(str::is_empty);
        if token_missing && ProviderKind::parse(&settings.defaults.provider) == Some(ProviderKind::Direct) {
            result.add_warning(ValidationWarning::new(
                "defaults.auth_token",
                "auth token is not set, the completion endpoint will likely answer 401",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
