//! Public TLS certificate
//!
//! One certificate covering the apex domain and its alternative names,
//! validated by an email challenge per domain. Approval of the validation
//! email is out-of-band; until it happens the certificate stays pending at
//! the provider and the stack cannot finish provisioning.

use serde_json::json;

use crate::template::Resource;

#[derive(Debug, Clone)]
pub struct CertificateSpec {
    pub domain: String,
    pub alternative_names: Vec<String>,

    /// Domain whose mailbox receives every validation email. The original
    /// site points the `www.` validation at the apex mailbox too.
    pub validation_domain: String,
}

impl CertificateSpec {
    pub fn new(
        domain: impl Into<String>,
        alternative_names: Vec<String>,
        validation_domain: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            alternative_names,
            validation_domain: validation_domain.into(),
        }
    }

    /// Every domain the certificate covers, apex first
    pub fn domains(&self) -> Vec<String> {
        let mut all = vec![self.domain.clone()];
        all.extend(self.alternative_names.iter().cloned());
        all
    }

    /// Whether `alias` may appear on a distribution using this certificate
    pub fn covers(&self, alias: &str) -> bool {
        self.domain == alias || self.alternative_names.iter().any(|d| d == alias)
    }

    pub fn lower(&self) -> Resource {
        let validation_options: Vec<_> = self
            .domains()
            .into_iter()
            .map(|domain| {
                json!({
                    "DomainName": domain,
                    "ValidationDomain": self.validation_domain,
                })
            })
            .collect();

        Resource::new(
            "AWS::CertificateManager::Certificate",
            json!({
                "DomainName": self.domain,
                "SubjectAlternativeNames": self.alternative_names,
                "ValidationMethod": "EMAIL",
                "DomainValidationOptions": validation_options,
            }),
        )
    }
}
