//! Asset deployment action
//!
//! A custom resource carrying the deployment contract: which local assets
//! go into which bucket, and which distribution cache entries to purge
//! afterwards. The external deployment engine realizes the upload and the
//! invalidation; re-runs are triggered by the source fingerprint changing.

use serde_json::json;

use crate::assets::AssetManifest;
use crate::template::{r#ref, Resource};

use super::{SITE_BUCKET, SITE_BUCKET_POLICY, SITE_DISTRIBUTION};

#[derive(Debug, Clone)]
pub struct DeploymentSpec {
    pub manifest: AssetManifest,
    pub invalidation_paths: Vec<String>,
}

impl DeploymentSpec {
    pub fn new(manifest: AssetManifest, invalidation_paths: Vec<String>) -> Self {
        Self {
            manifest,
            invalidation_paths,
        }
    }

    pub fn lower(&self) -> Resource {
        Resource::new(
            "Custom::SiteBucketDeployment",
            json!({
                "DestinationBucketName": r#ref(SITE_BUCKET),
                "DistributionId": r#ref(SITE_DISTRIBUTION),
                "DistributionPaths": self.invalidation_paths,
                "SourcePath": self.manifest.source.display().to_string(),
                "SourceObjectCount": self.manifest.object_count,
                "SourceFingerprint": self.manifest.fingerprint,
            }),
        )
        // upload only after the bucket is readable by the distribution and
        // the distribution exists to be invalidated
        .depends_on(SITE_BUCKET_POLICY)
        .depends_on(SITE_DISTRIBUTION)
    }
}
