//! Structural policy checks over a synthesized template
//!
//! The stack's security posture is fixed: private origin, one reader,
//! HTTPS everywhere. These checks re-derive that posture from the
//! synthesized template itself, so a refactor of the synthesis code cannot
//! silently loosen it. `check` walks the JSON the engine would receive,
//! not the typed specs that produced it.

use serde::Serialize;
use serde_json::Value;

use crate::template::{Resource, Template};

/// One broken rule, reported with enough context to fix it
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Violation {
    pub rule: &'static str,
    pub message: String,
}

impl Violation {
    fn new(rule: &'static str, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
        }
    }
}

/// Run every rule; an empty result means the template holds the posture
pub fn check_template(template: &Template) -> Vec<Violation> {
    let mut violations = Vec::new();

    check_public_access_block(template, &mut violations);
    check_single_read_principal(template, &mut violations);
    check_alias_coverage(template, &mut violations);
    check_viewer_protocol(template, &mut violations);
    check_error_remap(template, &mut violations);
    check_invalidation_paths(template, &mut violations);

    violations
}

fn find_by_type<'a>(template: &'a Template, ty: &str) -> Option<(&'a String, &'a Resource)> {
    template
        .resources
        .iter()
        .find(|(_, r)| r.resource_type == ty)
}

/// Rule 1: all four public-access vectors blocked on the bucket
fn check_public_access_block(template: &Template, out: &mut Vec<Violation>) {
    const RULE: &str = "public-access-block";
    let Some((_, bucket)) = find_by_type(template, "AWS::S3::Bucket") else {
        out.push(Violation::new(RULE, "no bucket resource declared"));
        return;
    };

    let block = &bucket.properties["PublicAccessBlockConfiguration"];
    for flag in [
        "BlockPublicAcls",
        "BlockPublicPolicy",
        "IgnorePublicAcls",
        "RestrictPublicBuckets",
    ] {
        if block[flag] != Value::Bool(true) {
            out.push(Violation::new(
                RULE,
                format!("bucket does not block public access vector {flag}"),
            ));
        }
    }
}

/// Rule 2: the bucket policy grants read to exactly one principal, the
/// stack's own access identity
fn check_single_read_principal(template: &Template, out: &mut Vec<Violation>) {
    const RULE: &str = "single-read-principal";
    let Some((_, policy)) = find_by_type(template, "AWS::S3::BucketPolicy") else {
        out.push(Violation::new(RULE, "no bucket policy declared"));
        return;
    };
    let Some((identity_id, _)) =
        find_by_type(template, "AWS::CloudFront::CloudFrontOriginAccessIdentity")
    else {
        out.push(Violation::new(RULE, "no origin access identity declared"));
        return;
    };

    let empty = Vec::new();
    let statements = policy.properties["PolicyDocument"]["Statement"]
        .as_array()
        .unwrap_or(&empty);
    let allows: Vec<&Value> = statements
        .iter()
        .filter(|s| s["Effect"] == "Allow")
        .collect();

    if allows.len() != 1 {
        out.push(Violation::new(
            RULE,
            format!("expected exactly 1 Allow statement, found {}", allows.len()),
        ));
        return;
    }

    let statement = allows[0];
    if statement["Action"] != "s3:GetObject" {
        out.push(Violation::new(
            RULE,
            format!("read grant allows {} instead of s3:GetObject", statement["Action"]),
        ));
    }

    let expected_principal =
        serde_json::json!({ "Fn::GetAtt": [identity_id, "S3CanonicalUserId"] });
    if statement["Principal"]["CanonicalUser"] != expected_principal {
        out.push(Violation::new(
            RULE,
            "read grant principal is not the stack's own access identity",
        ));
    }
}

/// Rule 3: every distribution alias is covered by the certificate
fn check_alias_coverage(template: &Template, out: &mut Vec<Violation>) {
    const RULE: &str = "alias-coverage";
    let Some((_, distribution)) = find_by_type(template, "AWS::CloudFront::Distribution")
    else {
        out.push(Violation::new(RULE, "no distribution declared"));
        return;
    };
    let Some((_, certificate)) =
        find_by_type(template, "AWS::CertificateManager::Certificate")
    else {
        out.push(Violation::new(RULE, "no certificate declared"));
        return;
    };

    let mut covered: Vec<&str> = certificate.properties["DomainName"]
        .as_str()
        .into_iter()
        .collect();
    if let Some(alternatives) = certificate.properties["SubjectAlternativeNames"].as_array() {
        covered.extend(alternatives.iter().filter_map(Value::as_str));
    }

    let empty = Vec::new();
    let aliases = distribution.properties["DistributionConfig"]["Aliases"]
        .as_array()
        .unwrap_or(&empty);
    for alias in aliases.iter().filter_map(Value::as_str) {
        if !covered.contains(&alias) {
            out.push(Violation::new(
                RULE,
                format!("alias {alias} lacks certificate coverage"),
            ));
        }
    }
}

/// Rule 4: viewer protocol policy is exactly redirect-to-https
fn check_viewer_protocol(template: &Template, out: &mut Vec<Violation>) {
    const RULE: &str = "viewer-protocol";
    let Some((_, distribution)) = find_by_type(template, "AWS::CloudFront::Distribution")
    else {
        return; // already reported by alias-coverage
    };

    let policy = &distribution.properties["DistributionConfig"]["DefaultCacheBehavior"]
        ["ViewerProtocolPolicy"];
    if policy.as_str() != Some("redirect-to-https") {
        out.push(Violation::new(
            RULE,
            format!("default behavior viewer protocol is {policy} instead of redirect-to-https"),
        ));
    }
}

/// Rule 5: origin 403 answers are remapped to 404 via the SPA fallback
fn check_error_remap(template: &Template, out: &mut Vec<Violation>) {
    const RULE: &str = "error-remap";
    let Some((_, distribution)) = find_by_type(template, "AWS::CloudFront::Distribution")
    else {
        return;
    };

    let empty = Vec::new();
    let responses = distribution.properties["DistributionConfig"]["CustomErrorResponses"]
        .as_array()
        .unwrap_or(&empty);
    let Some(remap) = responses.iter().find(|r| r["ErrorCode"] == 403) else {
        out.push(Violation::new(RULE, "no remap declared for origin 403 answers"));
        return;
    };

    if remap["ResponseCode"] != 404 {
        out.push(Violation::new(
            RULE,
            format!("403 remapped to {} instead of 404", remap["ResponseCode"]),
        ));
    }
    match remap["ResponsePagePath"].as_str() {
        Some(path) if path.starts_with('/') => {}
        other => out.push(Violation::new(
            RULE,
            format!("403 fallback page path is invalid: {other:?}"),
        )),
    }
}

/// Rule 6: the deployment invalidates `/*`
fn check_invalidation_paths(template: &Template, out: &mut Vec<Violation>) {
    const RULE: &str = "invalidation-paths";
    let Some((_, deployment)) = find_by_type(template, "Custom::SiteBucketDeployment") else {
        out.push(Violation::new(RULE, "no deployment declared"));
        return;
    };

    if deployment.properties["DistributionPaths"] != serde_json::json!(["/*"]) {
        out.push(Violation::new(
            RULE,
            format!(
                "deployment invalidates {} instead of /*",
                deployment.properties["DistributionPaths"]
            ),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetManifest;
    use crate::config::SiteConfig;
    use crate::stack::SiteStack;
    use std::path::Path;

    fn synthesized() -> Template {
        let stack = SiteStack::from_config(&SiteConfig::default()).unwrap();
        stack
            .synthesize(&AssetManifest::empty(Path::new("./site-contents")))
            .unwrap()
    }

    #[test]
    fn test_default_stack_passes_all_rules() {
        let violations = check_template(&synthesized());
        assert!(violations.is_empty(), "unexpected violations: {violations:?}");
    }

    #[test]
    fn test_unblocked_public_access_is_caught() {
        let mut template = synthesized();
        let bucket = template.resources.get_mut("SiteBucket").unwrap();
        bucket.properties["PublicAccessBlockConfiguration"]["BlockPublicPolicy"] =
            Value::Bool(false);

        let violations = check_template(&template);
        assert!(violations
            .iter()
            .any(|v| v.rule == "public-access-block" && v.message.contains("BlockPublicPolicy")));
    }

    #[test]
    fn test_extra_read_grant_is_caught() {
        let mut template = synthesized();
        let policy = template.resources.get_mut("SiteBucketPolicy").unwrap();
        let statements = policy.properties["PolicyDocument"]["Statement"]
            .as_array_mut()
            .unwrap();
        statements.push(serde_json::json!({
            "Effect": "Allow",
            "Action": "s3:GetObject",
            "Resource": "*",
            "Principal": { "AWS": "*" },
        }));

        let violations = check_template(&template);
        assert!(violations.iter().any(|v| v.rule == "single-read-principal"));
    }

    #[test]
    fn test_foreign_principal_is_caught() {
        let mut template = synthesized();
        let policy = template.resources.get_mut("SiteBucketPolicy").unwrap();
        policy.properties["PolicyDocument"]["Statement"][0]["Principal"]["CanonicalUser"] =
            Value::String("someone-else".to_string());

        let violations = check_template(&template);
        assert!(violations
            .iter()
            .any(|v| v.rule == "single-read-principal"
                && v.message.contains("not the stack's own access identity")));
    }

    #[test]
    fn test_uncovered_alias_is_caught() {
        let mut template = synthesized();
        let distribution = template.resources.get_mut("SiteDistribution").unwrap();
        distribution.properties["DistributionConfig"]["Aliases"]
            .as_array_mut()
            .unwrap()
            .push(Value::String("cdn.nekofoundation.org".to_string()));

        let violations = check_template(&template);
        assert!(violations
            .iter()
            .any(|v| v.rule == "alias-coverage" && v.message.contains("cdn.nekofoundation.org")));
    }

    #[test]
    fn test_allow_all_viewer_protocol_is_caught() {
        let mut template = synthesized();
        let distribution = template.resources.get_mut("SiteDistribution").unwrap();
        distribution.properties["DistributionConfig"]["DefaultCacheBehavior"]
            ["ViewerProtocolPolicy"] = Value::String("allow-all".to_string());

        let violations = check_template(&template);
        assert!(violations.iter().any(|v| v.rule == "viewer-protocol"));
    }

    #[test]
    fn test_missing_error_remap_is_caught() {
        let mut template = synthesized();
        let distribution = template.resources.get_mut("SiteDistribution").unwrap();
        distribution.properties["DistributionConfig"]["CustomErrorResponses"] =
            serde_json::json!([]);

        let violations = check_template(&template);
        assert!(violations.iter().any(|v| v.rule == "error-remap"));
    }

    #[test]
    fn test_wrong_invalidation_path_is_caught() {
        let mut template = synthesized();
        let deployment = template.resources.get_mut("SiteBucketDeployment").unwrap();
        deployment.properties["DistributionPaths"] = serde_json::json!(["/index.html"]);

        let violations = check_template(&template);
        assert!(violations.iter().any(|v| v.rule == "invalidation-paths"));
    }

    #[test]
    fn test_empty_template_reports_missing_resources() {
        let template = Template::new("empty");
        let violations = check_template(&template);

        let rules: Vec<_> = violations.iter().map(|v| v.rule).collect();
        assert!(rules.contains(&"public-access-block"));
        assert!(rules.contains(&"single-read-principal"));
        assert!(rules.contains(&"alias-coverage"));
        assert!(rules.contains(&"invalidation-paths"));
    }
}
