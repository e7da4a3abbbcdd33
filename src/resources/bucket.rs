//! Origin bucket and its resource policy
//!
//! The bucket is the site's private origin: provider-managed encryption,
//! every public-access vector blocked, contents destroyed with the stack.
//! Nothing inside it is readable except through the access identity the
//! policy names, and only over TLS.

use serde_json::{json, Value};

use crate::template::{get_att, join, r#ref, Resource};

use super::SITE_BUCKET;

#[derive(Debug, Clone)]
pub struct BucketSpec {
    /// Globally unique across the provider namespace; the provider rejects
    /// collisions at provisioning time
    pub name: String,

    /// Reject any request arriving without TLS via a policy deny
    pub enforce_ssl: bool,
}

impl BucketSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enforce_ssl: true,
        }
    }

    pub fn lower(&self) -> Resource {
        Resource::new(
            "AWS::S3::Bucket",
            json!({
                "BucketName": self.name,
                "BucketEncryption": {
                    "ServerSideEncryptionConfiguration": [{
                        "ServerSideEncryptionByDefault": {
                            "SSEAlgorithm": "AES256",
                        }
                    }]
                },
                "PublicAccessBlockConfiguration": {
                    "BlockPublicAcls": true,
                    "BlockPublicPolicy": true,
                    "IgnorePublicAcls": true,
                    "RestrictPublicBuckets": true,
                },
            }),
        )
        .destroy_on_removal()
    }

    /// The bucket policy: one read grant scoped to the given canonical user,
    /// plus the TLS-only deny when SSL enforcement is on
    pub fn lower_policy(&self, reader_canonical_user: Value) -> Resource {
        let mut statements = vec![json!({
            "Effect": "Allow",
            "Action": "s3:GetObject",
            "Resource": self.arn_for_objects(),
            "Principal": { "CanonicalUser": reader_canonical_user },
        })];

        if self.enforce_ssl {
            statements.push(json!({
                "Effect": "Deny",
                "Action": "s3:*",
                "Resource": [self.arn(), self.arn_for_objects()],
                "Principal": { "AWS": "*" },
                "Condition": { "Bool": { "aws:SecureTransport": "false" } },
            }));
        }

        Resource::new(
            "AWS::S3::BucketPolicy",
            json!({
                "Bucket": r#ref(SITE_BUCKET),
                "PolicyDocument": {
                    "Version": "2012-10-17",
                    "Statement": statements,
                },
            }),
        )
    }

    /// Regional endpoint the distribution uses as its origin domain
    pub fn regional_domain_name(&self) -> Value {
        get_att(SITE_BUCKET, "RegionalDomainName")
    }

    fn arn(&self) -> Value {
        get_att(SITE_BUCKET, "Arn")
    }

    /// `<bucket-arn>/*`: all objects under the bucket
    fn arn_for_objects(&self) -> Value {
        join("", vec![self.arn(), json!("/*")])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket() -> BucketSpec {
        BucketSpec::new("nekofoundation.org")
    }

    #[test]
    fn test_lower_blocks_all_public_access() {
        let value = serde_json::to_value(bucket().lower()).unwrap();
        let block = &value["Properties"]["PublicAccessBlockConfiguration"];

        for flag in [
            "BlockPublicAcls",
            "BlockPublicPolicy",
            "IgnorePublicAcls",
            "RestrictPublicBuckets",
        ] {
            assert_eq!(block[flag], true, "{flag} must be blocked");
        }
    }

    #[test]
    fn test_lower_sets_managed_encryption_and_name() {
        let value = serde_json::to_value(bucket().lower()).unwrap();

        assert_eq!(value["Type"], "AWS::S3::Bucket");
        assert_eq!(value["Properties"]["BucketName"], "nekofoundation.org");
        assert_eq!(
            value["Properties"]["BucketEncryption"]["ServerSideEncryptionConfiguration"][0]
                ["ServerSideEncryptionByDefault"]["SSEAlgorithm"],
            "AES256"
        );
    }

    #[test]
    fn test_lower_destroys_contents_on_teardown() {
        let value = serde_json::to_value(bucket().lower()).unwrap();
        assert_eq!(value["DeletionPolicy"], "Delete");
        assert_eq!(value["UpdateReplacePolicy"], "Delete");
    }

    #[test]
    fn test_policy_grants_read_to_exactly_one_principal() {
        let reader = json!({ "Fn::GetAtt": ["SiteOriginAccessIdentity", "S3CanonicalUserId"] });
        let value = serde_json::to_value(bucket().lower_policy(reader.clone())).unwrap();
        let statements = value["Properties"]["PolicyDocument"]["Statement"]
            .as_array()
            .unwrap();

        let allows: Vec<_> = statements
            .iter()
            .filter(|s| s["Effect"] == "Allow")
            .collect();
        assert_eq!(allows.len(), 1);
        assert_eq!(allows[0]["Action"], "s3:GetObject");
        assert_eq!(allows[0]["Principal"]["CanonicalUser"], reader);
    }

    #[test]
    fn test_policy_denies_insecure_transport() {
        let value =
            serde_json::to_value(bucket().lower_policy(json!("canonical-user"))).unwrap();
        let statements = value["Properties"]["PolicyDocument"]["Statement"]
            .as_array()
            .unwrap();

        let deny = statements.iter().find(|s| s["Effect"] == "Deny").unwrap();
        assert_eq!(deny["Action"], "s3:*");
        assert_eq!(deny["Condition"]["Bool"]["aws:SecureTransport"], "false");
    }

    #[test]
    fn test_policy_without_ssl_enforcement_has_single_statement() {
        let mut spec = bucket();
        spec.enforce_ssl = false;
        let value = serde_json::to_value(spec.lower_policy(json!("u"))).unwrap();
        let statements = value["Properties"]["PolicyDocument"]["Statement"]
            .as_array()
            .unwrap();
        assert_eq!(statements.len(), 1);
    }
}
