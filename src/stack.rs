//! SiteStack composition
//!
//! Wires the five resources together in one linear pass:
//! identity → bucket → policy → certificate → distribution → deployment.
//! Cross-resource invariants are checked when the stack is built from
//! config, before anything is lowered into a template.

use crate::assets::AssetManifest;
use crate::config::SiteConfig;
use crate::error::{SiteError, SiteResult};
use crate::resources::{
    BucketSpec, CertificateSpec, DeploymentSpec, DistributionSpec, OriginAccessIdentitySpec,
    SITE_BUCKET, SITE_BUCKET_POLICY, SITE_CERTIFICATE, SITE_DEPLOYMENT, SITE_DISTRIBUTION,
    SITE_IDENTITY,
};
use crate::template::{get_att, r#ref, Template};

/// Declared output keys, fixed part of the stack's public shape
pub const OUT_BUCKET_NAME: &str = "SiteBucketName";
pub const OUT_CERTIFICATE_ARN: &str = "SiteCertificateArn";
pub const OUT_DISTRIBUTION_ID: &str = "SiteDistributionId";
pub const OUT_DISTRIBUTION_DOMAIN: &str = "SiteDistributionDomainName";

/// The complete declaration of the static site hosting stack
#[derive(Debug, Clone)]
pub struct SiteStack {
    pub name: String,
    pub identity: OriginAccessIdentitySpec,
    pub bucket: BucketSpec,
    pub certificate: CertificateSpec,
    pub distribution: DistributionSpec,
    pub invalidation_paths: Vec<String>,
}

impl SiteStack {
    /// Build the stack from configuration, validating everything that can
    /// be validated without the provider
    pub fn from_config(config: &SiteConfig) -> SiteResult<Self> {
        config.validate()?;

        let certificate = CertificateSpec::new(
            config.domain.clone(),
            config.alternative_domains.clone(),
            config.validation_domain(),
        );

        let distribution = DistributionSpec {
            aliases: config.domains(),
            default_root_object: config.default_root_object.clone(),
            fallback_path: config.fallback_path.clone(),
            price_class: config.price_class,
        };

        validate_alias_coverage(&certificate, &distribution)?;

        Ok(Self {
            name: config.stack_name.clone(),
            identity: OriginAccessIdentitySpec::new(format!("access for {}", config.domain)),
            bucket: BucketSpec::new(config.bucket_name.clone()),
            certificate,
            distribution,
            invalidation_paths: config.invalidation_paths.clone(),
        })
    }

    /// Lower the whole declaration into a template. Pure: no I/O, evaluated
    /// once per synthesis.
    pub fn synthesize(&self, manifest: &AssetManifest) -> SiteResult<Template> {
        let mut template = Template::new(format!("{} static site hosting stack", self.name));

        template.add_resource(SITE_IDENTITY, self.identity.lower())?;
        template.add_resource(SITE_BUCKET, self.bucket.lower())?;
        template.add_resource(
            SITE_BUCKET_POLICY,
            self.bucket.lower_policy(self.identity.canonical_user()),
        )?;
        template.add_resource(SITE_CERTIFICATE, self.certificate.lower())?;
        template.add_resource(
            SITE_DISTRIBUTION,
            self.distribution.lower(
                self.bucket.regional_domain_name(),
                self.identity.origin_path(),
            ),
        )?;

        let deployment =
            DeploymentSpec::new(manifest.clone(), self.invalidation_paths.clone());
        template.add_resource(SITE_DEPLOYMENT, deployment.lower())?;

        template.add_output(OUT_BUCKET_NAME, "Origin bucket name", r#ref(SITE_BUCKET))?;
        template.add_output(
            OUT_CERTIFICATE_ARN,
            "TLS certificate ARN",
            r#ref(SITE_CERTIFICATE),
        )?;
        template.add_output(
            OUT_DISTRIBUTION_ID,
            "CDN distribution ID",
            r#ref(SITE_DISTRIBUTION),
        )?;
        template.add_output(
            OUT_DISTRIBUTION_DOMAIN,
            "CDN distribution domain name (CNAME target for DNS setup)",
            get_att(SITE_DISTRIBUTION, "DomainName"),
        )?;

        Ok(template)
    }

    /// The declared outputs and what they are for, in declaration order
    pub fn declared_outputs() -> [(&'static str, &'static str); 4] {
        [
            (OUT_BUCKET_NAME, "Origin bucket name"),
            (OUT_CERTIFICATE_ARN, "TLS certificate ARN"),
            (OUT_DISTRIBUTION_ID, "CDN distribution ID"),
            (
                OUT_DISTRIBUTION_DOMAIN,
                "CDN distribution domain name (CNAME target for DNS setup)",
            ),
        ]
    }
}

/// Every distribution alias must be covered by the certificate or
/// provisioning fails at the provider; catch it at declaration time instead
fn validate_alias_coverage(
    certificate: &CertificateSpec,
    distribution: &DistributionSpec,
) -> SiteResult<()> {
    for alias in &distribution.aliases {
        if !certificate.covers(alias) {
            return Err(SiteError::UncoveredAlias {
                alias: alias.clone(),
                domains: certificate.domains(),
            });
        }
    }
    Ok(())
}
