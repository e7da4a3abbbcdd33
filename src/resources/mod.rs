//! The five typed resource declarations composing the site stack
//!
//! Each spec struct holds the statically validated configuration for one
//! resource and lowers itself into a [`crate::template::Resource`]. Wiring
//! between resources happens through intrinsic references passed in by the
//! stack, never through hidden globals.

pub mod bucket;
pub mod certificate;
pub mod deployment;
pub mod distribution;
pub mod identity;

pub use bucket::BucketSpec;
pub use certificate::CertificateSpec;
pub use deployment::DeploymentSpec;
pub use distribution::DistributionSpec;
pub use identity::OriginAccessIdentitySpec;

/// Logical IDs of the stack's resources. Fixed: the stack owns exactly one
/// of each resource, so the IDs are part of its public shape.
pub const SITE_IDENTITY: &str = "SiteOriginAccessIdentity";
pub const SITE_BUCKET: &str = "SiteBucket";
pub const SITE_BUCKET_POLICY: &str = "SiteBucketPolicy";
pub const SITE_CERTIFICATE: &str = "SiteCertificate";
pub const SITE_DISTRIBUTION: &str = "SiteDistribution";
pub const SITE_DEPLOYMENT: &str = "SiteBucketDeployment";
