//! Origin access identity
//!
//! The opaque principal that lets the distribution read from the private
//! bucket without making the bucket public. Owned by the stack, referenced
//! by both the bucket policy and the distribution origin.

use serde_json::{json, Value};

use crate::template::{get_att, join, r#ref, Resource};

use super::SITE_IDENTITY;

#[derive(Debug, Clone)]
pub struct OriginAccessIdentitySpec {
    pub comment: String,
}

impl OriginAccessIdentitySpec {
    pub fn new(comment: impl Into<String>) -> Self {
        Self {
            comment: comment.into(),
        }
    }

    pub fn lower(&self) -> Resource {
        Resource::new(
            "AWS::CloudFront::CloudFrontOriginAccessIdentity",
            json!({
                "CloudFrontOriginAccessIdentityConfig": {
                    "Comment": self.comment,
                }
            }),
        )
    }

    /// The canonical user ID the bucket policy grants read access to
    pub fn canonical_user(&self) -> Value {
        get_att(SITE_IDENTITY, "S3CanonicalUserId")
    }

    /// The `origin-access-identity/cloudfront/<id>` path the distribution's
    /// origin config expects
    pub fn origin_path(&self) -> Value {
        join(
            "",
            vec![
                json!("origin-access-identity/cloudfront/"),
                r#ref(SITE_IDENTITY),
            ],
        )
    }
}
