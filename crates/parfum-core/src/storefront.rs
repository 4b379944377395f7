use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_currency_code() -> String {
    "USD".to_string()
}

fn default_order_prefix() -> String {
    "ORD".to_string()
}

/// Brand-level settings shared by the invoice, the chat handoff and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontProfile {
    pub brand_name: String,
    pub tagline: Option<String>,
    /// Number orders are handed off to, in any human format (`+92 300 1234567`).
    pub whatsapp_number: String,
    pub support_email: Option<String>,
    pub support_phone: Option<String>,
    #[serde(default = "default_currency_code")]
    pub currency_code: String,
    #[serde(default = "default_order_prefix")]
    pub order_prefix: String,
}

impl StorefrontProfile {
    /// The WhatsApp number reduced to its digits, as `wa.me` expects.
    #[must_use]
    pub fn whatsapp_digits(&self) -> String {
        self.whatsapp_number
            .chars()
            .filter(char::is_ascii_digit)
            .collect()
    }

    /// One-line support contact for footers, e.g. `"care@x.com | +1 555 0100"`.
    #[must_use]
    pub fn support_line(&self) -> String {
        let parts: Vec<&str> = [self.support_email.as_deref(), self.support_phone.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect();
        if parts.is_empty() {
            format!("WhatsApp {}", self.whatsapp_number)
        } else {
            parts.join(" | ")
        }
    }
}

#[derive(Debug, Deserialize)]
struct StorefrontFile {
    storefront: StorefrontProfile,
}

/// Load and validate the storefront profile from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_storefront(path: &Path) -> Result<StorefrontProfile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::StorefrontFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_storefront(&content)
}

/// Parse and validate a storefront profile from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the text cannot be parsed or fails validation.
pub fn parse_storefront(content: &str) -> Result<StorefrontProfile, ConfigError> {
    let file: StorefrontFile =
        serde_yaml::from_str(content).map_err(ConfigError::StorefrontFileParse)?;
    validate_storefront(&file.storefront)?;
    Ok(file.storefront)
}

fn validate_storefront(profile: &StorefrontProfile) -> Result<(), ConfigError> {
    if profile.brand_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "brand_name must be non-empty".to_string(),
        ));
    }

    let digits = profile.whatsapp_digits();
    if digits.len() < 8 {
        return Err(ConfigError::Validation(format!(
            "whatsapp_number '{}' must contain at least 8 digits",
            profile.whatsapp_number
        )));
    }

    let code = &profile.currency_code;
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ConfigError::Validation(format!(
            "currency_code '{code}' must be a 3-letter upper-case ISO code"
        )));
    }

    let prefix = &profile.order_prefix;
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::Validation(format!(
            "order_prefix '{prefix}' must be non-empty and alphanumeric"
        )));
    }

    Ok(())
}
