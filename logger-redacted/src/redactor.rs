use std::sync::OnceLock;

use base64::{engine::general_purpose, Engine as _};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use sha2::{Digest, Sha256};

use crate::config::LoggerConfig;
use crate::error::LoggerResult;

lazy_static! {
    #[allow(clippy::expect_used)]
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("email pattern");
    #[allow(clippy::expect_used)]
    static ref PHONE_REGEX: Regex =
        Regex::new(r"(?:\+1[-.\s]?)?(?:\(\d{3}\)|\b\d{3})[-.\s]?\d{3}[-.\s]?\d{4}\b").expect("phone pattern");
    #[allow(clippy::expect_used)]
    static ref SSN_REGEX: Regex = Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").expect("ssn pattern");
    #[allow(clippy::expect_used)]
    static ref CARD_REGEX: Regex =
        Regex::new(r"\b(?:\d{4}[-\s]?){3}(\d{4})\b").expect("card pattern");
    #[allow(clippy::expect_used)]
    static ref MEMBER_ID_REGEX: Regex = Regex::new(r"\b[A-Z]{1,3}\d{7,12}\b").expect("member id pattern");
    #[allow(clippy::expect_used)]
    static ref AUTH_LABELLED_REGEX: Regex = Regex::new(
        r"(?i)\b(auth(?:orization)?(?:\s*(?:number|num|no\.?))?[\s:#]+)([A-Z0-9][A-Z0-9-]*\d[A-Z0-9-]*)\b"
    )
    .expect("labelled authorization pattern");
    #[allow(clippy::expect_used)]
    static ref AUTH_TOKEN_REGEX: Regex =
        Regex::new(r"\bAUTH[-#]?\d{4,}\b").expect("authorization token pattern");
    static ref DEFAULT_REDACTOR: PiiRedactor = PiiRedactor::new(RedactionConfig::default());
}

static GLOBAL_REDACTOR: OnceLock<PiiRedactor> = OnceLock::new();

/// PII redaction configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub enabled: bool,
    pub redact_emails: bool,
    pub redact_phones: bool,
    pub redact_ssn: bool,
    pub redact_card_numbers: bool,
    pub redact_member_ids: bool,
    /// Prior authorization numbers, labelled ("authorization 20240001") or `AUTH`-prefixed
    pub redact_authorizations: bool,
    pub hash_for_correlation: bool,
    pub custom_patterns: Vec<(Regex, String)>,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            redact_emails: true,
            redact_phones: true,
            redact_ssn: true,
            redact_card_numbers: true,
            redact_member_ids: true,
            redact_authorizations: true,
            hash_for_correlation: true,
            custom_patterns: Vec::new(),
        }
    }
}

impl RedactionConfig {
    /// Build from the logger section of the engine configuration
    ///
    /// # Errors
    ///
    /// Returns [`crate::LoggerError::InvalidPattern`] if a custom pattern does not compile.
    pub fn from_logger_config(config: &LoggerConfig) -> LoggerResult<Self> {
        let custom_patterns = config
            .custom_patterns
            .iter()
            .map(|p| Ok((Regex::new(&p.pattern)?, p.replacement.clone())))
            .collect::<LoggerResult<Vec<_>>>()?;

        Ok(Self {
            enabled: config.redaction_enabled,
            hash_for_correlation: config.hash_for_correlation,
            custom_patterns,
            ..Self::default()
        })
    }
}

/// PII redactor for log messages
#[derive(Debug, Clone)]
pub struct PiiRedactor {
    config: RedactionConfig,
}

impl PiiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn redact(&self, text: &str) -> String {
        if !self.config.enabled {
            return text.to_string();
        }

        let mut result = text.to_string();

        // Card numbers first: the phone pattern matches inside them.
        if self.config.redact_card_numbers {
            result = self.redact_card_numbers(&result);
        }

        // Before phones: an all-digit authorization number can look like one.
        if self.config.redact_authorizations {
            result = self.redact_authorizations(&result);
        }

        if self.config.redact_ssn {
            result = self.redact_ssn(&result);
        }

        if self.config.redact_phones {
            result = self.redact_phones(&result);
        }

        if self.config.redact_emails {
            result = self.redact_emails(&result);
        }

        if self.config.redact_member_ids {
            result = self.redact_member_ids(&result);
        }

        for (pattern, replacement) in &self.config.custom_patterns {
            result = pattern.replace_all(&result, replacement.as_str()).to_string();
        }

        result
    }

    fn redact_emails(&self, text: &str) -> String {
        EMAIL_REGEX
            .replace_all(text, |caps: &Captures| {
                let email = &caps[0];
                if self.config.hash_for_correlation {
                    return format!("EMAIL[{}]", hash_value(email));
                }
                match email.split_once('@') {
                    Some((local, domain)) => format!(
                        "{}***@{}***",
                        local.chars().next().unwrap_or('*'),
                        domain.chars().next().unwrap_or('*')
                    ),
                    None => "***@***".to_string(),
                }
            })
            .to_string()
    }

    fn redact_phones(&self, text: &str) -> String {
        PHONE_REGEX
            .replace_all(text, |caps: &Captures| {
                if self.config.hash_for_correlation {
                    format!("PHONE[{}]", hash_value(&caps[0]))
                } else {
                    "(***) ***-****".to_string()
                }
            })
            .to_string()
    }

    fn redact_ssn(&self, text: &str) -> String {
        SSN_REGEX
            .replace_all(text, |caps: &Captures| {
                if self.config.hash_for_correlation {
                    format!("SSN[{}]", hash_value(&caps[0]))
                } else {
                    "***-**-****".to_string()
                }
            })
            .to_string()
    }

    fn redact_card_numbers(&self, text: &str) -> String {
        CARD_REGEX
            .replace_all(text, |caps: &Captures| {
                if self.config.hash_for_correlation {
                    format!("CARD[{}]", hash_value(&caps[0]))
                } else {
                    format!("****-****-****-{}", &caps[1])
                }
            })
            .to_string()
    }

    fn redact_member_ids(&self, text: &str) -> String {
        MEMBER_ID_REGEX
            .replace_all(text, |caps: &Captures| {
                if self.config.hash_for_correlation {
                    format!("MEMBER[{}]", hash_value(&caps[0]))
                } else {
                    "MEMBER[REDACTED]".to_string()
                }
            })
            .to_string()
    }

    fn authorization_tag(&self, value: &str) -> String {
        if self.config.hash_for_correlation {
            format!("AUTH[{}]", hash_value(value))
        } else {
            "AUTH[REDACTED]".to_string()
        }
    }

    fn redact_authorizations(&self, text: &str) -> String {
        let labelled = AUTH_LABELLED_REGEX.replace_all(text, |caps: &Captures| {
            format!("{}{}", &caps[1], self.authorization_tag(&caps[2]))
        });
        AUTH_TOKEN_REGEX
            .replace_all(&labelled, |caps: &Captures| self.authorization_tag(&caps[0]))
            .to_string()
    }
}

fn hash_value(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    // First 8 bytes are enough to correlate log lines
    let prefix: Vec<u8> = digest.iter().take(8).copied().collect();
    general_purpose::URL_SAFE_NO_PAD.encode(prefix)
}

/// Install the process-wide redactor used by the logging macros.
///
/// Returns `false` if a redactor was already installed.
pub fn install_redactor(redactor: PiiRedactor) -> bool {
    GLOBAL_REDACTOR.set(redactor).is_ok()
}

/// Redact a message with the installed redactor, or the default one
pub fn redact(text: &str) -> String {
    GLOBAL_REDACTOR.get().unwrap_or(&*DEFAULT_REDACTOR).redact(text)
}
