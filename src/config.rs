//! Site configuration
//!
//! Every knob of the stack lives in one typed structure with fixed-meaning
//! fields, so invalid combinations are caught before anything is submitted
//! to the provider. Defaults reproduce the nekofoundation.org contract;
//! a `Site.toml` file can override any of them.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{SiteError, SiteResult};

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "Site.toml";

/// CDN price tier: how many edge locations the distribution uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PriceClass {
    /// Lowest-cost tier. Trades latency in some regions for cost.
    #[default]
    Lowest,
    Mid,
    All,
}

impl PriceClass {
    /// Provider-facing string value
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceClass::Lowest => "PriceClass_100",
            PriceClass::Mid => "PriceClass_200",
            PriceClass::All => "PriceClass_All",
        }
    }
}

/// Optional provider environment (account/region); when absent the
/// deployment engine picks them up from its own environment
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    #[serde(default)]
    pub account: Option<String>,

    #[serde(default)]
    pub region: Option<String>,
}

/// Complete declaration input for the site stack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Stack identity handed to the deployment engine
    #[serde(default = "default_stack_name")]
    pub stack_name: String,

    /// Origin bucket name. Must be globally unique across the provider
    /// namespace; that uniqueness is validated by the provider at
    /// provisioning time, not here.
    #[serde(default = "default_bucket_name")]
    pub bucket_name: String,

    /// Apex domain, also the certificate's primary domain name
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Additional domains served by the distribution and covered by the
    /// certificate as alternative names
    #[serde(default = "default_alternative_domains")]
    pub alternative_domains: Vec<String>,

    /// Domain whose mailbox receives the certificate validation emails.
    /// Defaults to the apex domain for every certificate domain, which is
    /// how the original site validates `www.` through the apex mailbox.
    #[serde(default)]
    pub validation_email_domain: Option<String>,

    /// Document served for `/`
    #[serde(default = "default_root_object")]
    pub default_root_object: String,

    /// Single-page-app fallback: the page served when the origin answers
    /// 403 for a path the app routes client-side
    #[serde(default = "default_fallback_path")]
    pub fallback_path: String,

    /// Local directory of static assets uploaded verbatim to the bucket
    #[serde(default = "default_assets")]
    pub assets: PathBuf,

    /// Cache entries purged after each deployment
    #[serde(default = "default_invalidation_paths")]
    pub invalidation_paths: Vec<String>,

    #[serde(default)]
    pub price_class: PriceClass,

    #[serde(default)]
    pub provider: ProviderConfig,
}

fn default_stack_name() -> String {
    "NekoFoundationSiteStack".to_string()
}

fn default_bucket_name() -> String {
    "nekofoundation.org".to_string()
}

fn default_domain() -> String {
    "nekofoundation.org".to_string()
}

fn default_alternative_domains() -> Vec<String> {
    vec!["www.nekofoundation.org".to_string()]
}

fn default_root_object() -> String {
    "index.html".to_string()
}

fn default_fallback_path() -> String {
    "/index.html".to_string()
}

fn default_assets() -> PathBuf {
    PathBuf::from("./site-contents")
}

fn default_invalidation_paths() -> Vec<String> {
    vec!["/*".to_string()]
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            stack_name: default_stack_name(),
            bucket_name: default_bucket_name(),
            domain: default_domain(),
            alternative_domains: default_alternative_domains(),
            validation_email_domain: None,
            default_root_object: default_root_object(),
            fallback_path: default_fallback_path(),
            assets: default_assets(),
            invalidation_paths: default_invalidation_paths(),
            price_class: PriceClass::default(),
            provider: ProviderConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load from a TOML file, falling back to defaults for absent fields
    pub fn load(path: &Path) -> SiteResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: SiteConfig =
            toml::from_str(&content).map_err(|e| SiteError::InvalidConfig {
                file: path.to_path_buf(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `Site.toml` if present, defaults otherwise
    pub fn load_or_default(dir: &Path) -> SiteResult<Self> {
        let path = dir.join(CONFIG_FILE);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// All domains the certificate must cover and the distribution serves:
    /// the apex first, then the alternatives
    pub fn domains(&self) -> Vec<String> {
        let mut all = vec![self.domain.clone()];
        all.extend(self.alternative_domains.iter().cloned());
        all
    }

    /// Where the validation email for `domain` goes
    pub fn validation_domain(&self) -> &str {
        self.validation_email_domain.as_deref().unwrap_or(&self.domain)
    }

    /// Check the fields that can be checked without talking to the provider
    pub fn validate(&self) -> SiteResult<()> {
        validate_bucket_name(&self.bucket_name)?;
        if self.domain.is_empty() {
            return Err(SiteError::NoDomains);
        }
        Ok(())
    }
}

/// DNS-compatible bucket naming rules: 3-63 characters of lowercase
/// letters, digits, dots, and hyphens, starting and ending with a letter
/// or digit
pub fn validate_bucket_name(name: &str) -> SiteResult<()> {
    let invalid = |reason: &str| SiteError::InvalidBucketName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.len() < 3 || name.len() > 63 {
        return Err(invalid("must be between 3 and 63 characters"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-')
    {
        return Err(invalid(
            "must contain only lowercase letters, digits, dots, and hyphens",
        ));
    }
    let first = name.chars().next().unwrap_or('.');
    let last = name.chars().last().unwrap_or('.');
    if !first.is_ascii_alphanumeric() || !last.is_ascii_alphanumeric() {
        return Err(invalid("must start and end with a letter or digit"));
    }
    if name.contains("..") {
        return Err(invalid("must not contain consecutive dots"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_site_contract() {
        let config = SiteConfig::default();

        assert_eq!(config.stack_name, "NekoFoundationSiteStack");
        assert_eq!(config.bucket_name, "nekofoundation.org");
        assert_eq!(
            config.domains(),
            vec!["nekofoundation.org", "www.nekofoundation.org"]
        );
        assert_eq!(config.default_root_object, "index.html");
        assert_eq!(config.fallback_path, "/index.html");
        assert_eq!(config.invalidation_paths, vec!["/*"]);
        assert_eq!(config.price_class, PriceClass::Lowest);
        assert_eq!(config.assets, PathBuf::from("./site-contents"));
    }

    #[test]
    fn test_validation_domain_defaults_to_apex() {
        // the www domain validates through the apex mailbox unless overridden
        let config = SiteConfig::default();
        assert_eq!(config.validation_domain(), "nekofoundation.org");

        let mut config = SiteConfig::default();
        config.validation_email_domain = Some("mail.example.org".to_string());
        assert_eq!(config.validation_domain(), "mail.example.org");
    }

    #[test]
    fn test_deserialize_empty_toml_gives_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();
        assert_eq!(config.bucket_name, "nekofoundation.org");
        assert_eq!(config.price_class, PriceClass::Lowest);
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let toml_src = r#"
bucket_name = "example.org"
domain = "example.org"
alternative_domains = ["www.example.org", "cdn.example.org"]
price_class = "all"

[provider]
region = "eu-west-1"
"#;
        let config: SiteConfig = toml::from_str(toml_src).unwrap();

        assert_eq!(config.bucket_name, "example.org");
        assert_eq!(config.alternative_domains.len(), 2);
        assert_eq!(config.price_class, PriceClass::All);
        assert_eq!(config.provider.region.as_deref(), Some("eu-west-1"));
        // untouched fields keep their defaults
        assert_eq!(config.fallback_path, "/index.html");
    }

    #[test]
    fn test_price_class_provider_strings() {
        assert_eq!(PriceClass::Lowest.as_str(), "PriceClass_100");
        assert_eq!(PriceClass::Mid.as_str(), "PriceClass_200");
        assert_eq!(PriceClass::All.as_str(), "PriceClass_All");
    }

    #[test]
    fn test_validate_bucket_name_accepts_dns_names() {
        assert!(validate_bucket_name("nekofoundation.org").is_ok());
        assert!(validate_bucket_name("my-bucket-123").is_ok());
    }

    #[test]
    fn test_validate_bucket_name_rejects_bad_names() {
        assert!(validate_bucket_name("ab").is_err());
        assert!(validate_bucket_name(&"a".repeat(64)).is_err());
        assert!(validate_bucket_name("Uppercase").is_err());
        assert!(validate_bucket_name("under_score").is_err());
        assert!(validate_bucket_name("-leading").is_err());
        assert!(validate_bucket_name("trailing.").is_err());
        assert!(validate_bucket_name("double..dot").is_err());
    }

    #[test]
    fn test_validate_rejects_empty_domain() {
        let mut config = SiteConfig::default();
        config.domain = String::new();
        assert!(matches!(config.validate(), Err(SiteError::NoDomains)));
    }
}
