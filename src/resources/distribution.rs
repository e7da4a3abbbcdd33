//! Content-delivery distribution
//!
//! Fronts the private bucket through the access identity, terminates TLS
//! with the stack's certificate, forces HTTPS for every viewer, and remaps
//! the origin's 403 (which the bucket returns for unknown keys) to a 404
//! served from the single-page-app entry document.

use serde_json::{json, Value};

use crate::config::PriceClass;
use crate::template::{r#ref, Resource};

use super::SITE_CERTIFICATE;

/// Origin ID inside the distribution config; only one origin exists
const ORIGIN_ID: &str = "SiteBucketOrigin";

/// The bucket answers 403, not 404, for keys that do not exist
const ORIGIN_ERROR_CODE: u16 = 403;
const REMAPPED_STATUS: u16 = 404;

#[derive(Debug, Clone)]
pub struct DistributionSpec {
    pub aliases: Vec<String>,
    pub default_root_object: String,
    pub fallback_path: String,
    pub price_class: PriceClass,
}

impl DistributionSpec {
    /// Lower into the provider resource. The origin domain and identity
    /// path are intrinsic references handed in by the stack so the wiring
    /// stays explicit.
    pub fn lower(&self, origin_domain: Value, origin_access_path: Value) -> Resource {
        Resource::new(
            "AWS::CloudFront::Distribution",
            json!({
                "DistributionConfig": {
                    "Aliases": self.aliases,
                    "CustomErrorResponses": [{
                        "ErrorCode": ORIGIN_ERROR_CODE,
                        "ResponseCode": REMAPPED_STATUS,
                        "ResponsePagePath": self.fallback_path,
                    }],
                    "DefaultCacheBehavior": {
                        "Compress": true,
                        "TargetOriginId": ORIGIN_ID,
                        "ViewerProtocolPolicy": "redirect-to-https",
                    },
                    "DefaultRootObject": self.default_root_object,
                    "Enabled": true,
                    "HttpVersion": "http2",
                    "IPV6Enabled": true,
                    "Origins": [{
                        "DomainName": origin_domain,
                        "Id": ORIGIN_ID,
                        "S3OriginConfig": {
                            "OriginAccessIdentity": origin_access_path,
                        },
                    }],
                    "PriceClass": self.price_class.as_str(),
                    "ViewerCertificate": {
                        "AcmCertificateArn": r#ref(SITE_CERTIFICATE),
                        "MinimumProtocolVersion": "TLSv1.2_2021",
                        "SslSupportMethod": "sni-only",
                    },
                },
            }),
        )
    }
}
