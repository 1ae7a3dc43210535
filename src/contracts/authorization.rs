//! Trusted image and credential resolution
//!
//! Given the catalogs of a builder configuration and the images a pipeline
//! uses, decides which trusted images apply to the pipeline and which
//! credentials get injected into them. All functions borrow from the
//! catalogs and return empty collections rather than nothing.

use super::credentials::{CredentialConfig, TrustedImageConfig};
use ahash::AHashSet;

/// Credentials grouped by type, in the order a trusted image requests them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CredentialsByType<'a> {
    entries: Vec<(&'a str, Vec<&'a CredentialConfig>)>,
}

impl<'a> CredentialsByType<'a> {
    /// Returns the credentials of `credential_type`, if any survived
    #[must_use]
    pub fn get(&self, credential_type: &str) -> Option<&[&'a CredentialConfig]> {
        self.entries
            .iter()
            .find(|(t, _)| *t == credential_type)
            .map(|(_, credentials)| credentials.as_slice())
    }

    /// Returns true if credentials of `credential_type` are present
    #[must_use]
    pub fn contains_type(&self, credential_type: &str) -> bool {
        self.get(credential_type).is_some()
    }

    /// Number of credential types present
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no credential type is present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over types and their credentials
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &[&'a CredentialConfig])> {
        self.entries.iter().map(|(t, c)| (*t, c.as_slice()))
    }
}

/// Looks up the trusted image for an image reference, ignoring its tag
#[must_use]
pub fn trusted_image<'a>(
    trusted_images: &'a [TrustedImageConfig],
    image_reference: &str,
) -> Option<&'a TrustedImageConfig> {
    trusted_images
        .iter()
        .find(|ti| ti.matches_reference(image_reference))
}

/// Returns all credentials of a type
#[must_use]
pub fn credentials_by_type<'a>(
    credentials: &'a [CredentialConfig],
    credential_type: &str,
) -> Vec<&'a CredentialConfig> {
    credentials
        .iter()
        .filter(|c| c.credential_type == credential_type)
        .collect()
}

/// Keeps the credentials whose trusted image allow-list admits `trusted_image`
#[must_use]
pub fn filter_credentials_by_trusted_image<'a>(
    credentials: Vec<&'a CredentialConfig>,
    trusted_image: &TrustedImageConfig,
) -> Vec<&'a CredentialConfig> {
    credentials
        .into_iter()
        .filter(|c| c.allows_trusted_image(trusted_image))
        .collect()
}

/// Keeps the credentials whose pipeline allow-list admits `full_repository_path`
#[must_use]
pub fn filter_credentials_by_pipeline<'a>(
    credentials: Vec<&'a CredentialConfig>,
    full_repository_path: &str,
) -> Vec<&'a CredentialConfig> {
    credentials
        .into_iter()
        .filter(|c| c.allows_pipeline(full_repository_path))
        .collect()
}

/// Keeps the trusted images whose pipeline allow-list admits `full_repository_path`
#[must_use]
pub fn filter_trusted_images_by_pipeline<'a>(
    trusted_images: Vec<&'a TrustedImageConfig>,
    full_repository_path: &str,
) -> Vec<&'a TrustedImageConfig> {
    trusted_images
        .into_iter()
        .filter(|ti| {
            let allowed = ti.allows_pipeline(full_repository_path);
            if !allowed {
                tracing::debug!(
                    image = %ti.image_path,
                    pipeline = %full_repository_path,
                    "Trusted image not allowed for pipeline"
                );
            }
            allowed
        })
        .collect()
}

/// Resolves the trusted images used by a pipeline.
///
/// Every reference is matched without its tag against the catalog; the first
/// match is kept once per image path, in the order the references were
/// declared. Images whose pipeline allow-list rejects the pipeline are then
/// dropped. References without a catalog entry are ignored.
#[must_use]
pub fn resolve_trusted_images<'a, S: AsRef<str>>(
    trusted_images: &'a [TrustedImageConfig],
    image_references: &[S],
    full_repository_path: &str,
) -> Vec<&'a TrustedImageConfig> {
    let mut seen: AHashSet<&str> = AHashSet::new();
    let mut used = Vec::new();

    for reference in image_references {
        if let Some(ti) = trusted_image(trusted_images, reference.as_ref()) {
            if seen.insert(ti.image_path.as_str()) {
                tracing::debug!(image = %ti.image_path, "Pipeline uses trusted image");
                used.push(ti);
            }
        }
    }

    filter_trusted_images_by_pipeline(used, full_repository_path)
}

/// Resolves the credentials a trusted image may receive, grouped by type.
///
/// Types are visited in the order the image requests them. Credentials whose
/// trusted image allow-list rejects the image are dropped, and a type left
/// without credentials is absent from the result.
#[must_use]
pub fn resolve_credentials_for_trusted_image<'a>(
    credentials: &'a [CredentialConfig],
    trusted_image: &'a TrustedImageConfig,
) -> CredentialsByType<'a> {
    let mut by_type = CredentialsByType::default();

    for credential_type in &trusted_image.injected_credential_types {
        if by_type.contains_type(credential_type) {
            continue;
        }

        let matching = filter_credentials_by_trusted_image(
            credentials_by_type(credentials, credential_type),
            trusted_image,
        );
        if !matching.is_empty() {
            by_type.entries.push((credential_type.as_str(), matching));
        }
    }

    by_type
}

/// Resolves the credentials to inject for a set of trusted images.
///
/// Each image's credentials are filtered by their pipeline allow-list and
/// merged into one list in which a `(name, type)` pair appears once, at the
/// position it was first reached.
#[must_use]
pub fn resolve_credentials<'a, I>(
    credentials: &'a [CredentialConfig],
    trusted_images: I,
    full_repository_path: &str,
) -> Vec<&'a CredentialConfig>
where
    I: IntoIterator<Item = &'a TrustedImageConfig>,
{
    let mut resolved = Vec::new();

    for trusted_image in trusted_images {
        let by_type = resolve_credentials_for_trusted_image(credentials, trusted_image);
        for (_, typed) in by_type.iter() {
            let allowed = filter_credentials_by_pipeline(typed.to_vec(), full_repository_path);
            add_credentials_if_not_present(&mut resolved, allowed);
        }
    }

    resolved
}

/// Appends credentials whose `(name, type)` pair is not present yet
pub fn add_credentials_if_not_present<'a>(
    target: &mut Vec<&'a CredentialConfig>,
    new_credentials: impl IntoIterator<Item = &'a CredentialConfig>,
) {
    let mut present: AHashSet<(&str, &str)> =
        target.iter().copied().map(CredentialConfig::key).collect();

    for credential in new_credentials {
        if present.insert(credential.key()) {
            target.push(credential);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(credentials: &[&CredentialConfig]) -> Vec<String> {
        credentials.iter().map(|c| c.name.clone()).collect()
    }

    fn paths(images: &[&TrustedImageConfig]) -> Vec<String> {
        images.iter().map(|i| i.image_path.clone()).collect()
    }

    fn credential_catalog() -> Vec<CredentialConfig> {
        vec![
            CredentialConfig::new("container-registry-extensions", "container-registry"),
            CredentialConfig::new("container-registry-private", "container-registry")
                .allow_pipelines("github.com/org/.+"),
            CredentialConfig::new("gke-production", "kubernetes-engine")
                .allow_trusted_images("extensions/gke"),
            CredentialConfig::new("gke-development", "kubernetes-engine"),
            CredentialConfig::new("bitbucket-api-token", "bitbucket-api-token"),
            CredentialConfig::new("github-api-token", "github-api-token"),
        ]
    }

    fn trusted_image_catalog() -> Vec<TrustedImageConfig> {
        vec![
            TrustedImageConfig::new("extensions/docker")
                .run_docker(true)
                .inject("container-registry"),
            TrustedImageConfig::new("extensions/gke").inject("kubernetes-engine"),
            TrustedImageConfig::new("extensions/helm").inject("kubernetes-engine"),
            TrustedImageConfig::new("multiple-git-sources-test")
                .allow_commands(true)
                .inject("bitbucket-api-token")
                .inject("github-api-token"),
            TrustedImageConfig::new("docker").run_docker(true),
            TrustedImageConfig::new("extensions/private")
                .inject("container-registry")
                .allow_pipelines("github.com/org/secret"),
        ]
    }

    #[test]
    fn test_trusted_image_lookup_ignores_tag() {
        let catalog = trusted_image_catalog();

        let image = trusted_image(&catalog, "extensions/gke:stable").unwrap();
        assert_eq!(image.image_path, "extensions/gke");
        assert!(!image.run_docker);

        assert!(trusted_image(&catalog, "golang:1.22-alpine").is_none());
    }

    #[test]
    fn test_credentials_by_type() {
        let catalog = credential_catalog();

        let registries = credentials_by_type(&catalog, "container-registry");
        assert_eq!(
            names(&registries),
            vec!["container-registry-extensions", "container-registry-private"]
        );
        assert!(credentials_by_type(&catalog, "aws-token").is_empty());
    }

    #[test]
    fn test_resolve_trusted_images_dedups_by_path() {
        let catalog = trusted_image_catalog();
        let references = [
            "golang:1.22",
            "extensions/gke:stable",
            "extensions/docker:dev",
            "extensions/gke:beta",
        ];

        let images = resolve_trusted_images(&catalog, &references, "github.com/org/repo");

        assert_eq!(paths(&images), vec!["extensions/gke", "extensions/docker"]);
    }

    #[test]
    fn test_resolve_trusted_images_digest_reference() {
        let catalog = trusted_image_catalog();
        let references = ["extensions/gke@sha256:4f53cda18c2baa0c0354bb5f9a3ecbe5ed12ab4d8e11ba873c2f11161202b945"];

        let images = resolve_trusted_images(&catalog, &references, "github.com/org/repo");

        assert_eq!(paths(&images), vec!["extensions/gke"]);
    }

    #[test]
    fn test_resolve_trusted_images_applies_pipeline_allow_list() {
        let catalog = trusted_image_catalog();
        let references = ["extensions/private:1.0", "extensions/gke:stable"];

        let allowed = resolve_trusted_images(&catalog, &references, "github.com/org/secret");
        assert_eq!(paths(&allowed), vec!["extensions/private", "extensions/gke"]);

        let denied = resolve_trusted_images(&catalog, &references, "github.com/org/other");
        assert_eq!(paths(&denied), vec!["extensions/gke"]);
    }

    #[test]
    fn test_resolve_trusted_images_without_matches_is_empty() {
        let catalog = trusted_image_catalog();
        let references: [&str; 2] = ["golang:1.22", "node:20"];

        assert!(resolve_trusted_images(&catalog, &references, "github.com/org/repo").is_empty());
        assert!(resolve_trusted_images::<&str>(&[], &[], "github.com/org/repo").is_empty());
    }

    #[test]
    fn test_credentials_for_trusted_image_single_type() {
        let credentials = credential_catalog();
        let images = trusted_image_catalog();
        let docker = trusted_image(&images, "extensions/docker").unwrap();

        let by_type = resolve_credentials_for_trusted_image(&credentials, docker);

        assert_eq!(by_type.len(), 1);
        assert_eq!(
            names(by_type.get("container-registry").unwrap()),
            vec!["container-registry-extensions", "container-registry-private"]
        );
    }

    #[test]
    fn test_credentials_for_trusted_image_multiple_types_keep_order() {
        let credentials = credential_catalog();
        let images = trusted_image_catalog();
        let git = trusted_image(&images, "multiple-git-sources-test").unwrap();

        let by_type = resolve_credentials_for_trusted_image(&credentials, git);

        let types: Vec<&str> = by_type.iter().map(|(t, _)| t).collect();
        assert_eq!(types, vec!["bitbucket-api-token", "github-api-token"]);
    }

    #[test]
    fn test_credentials_for_trusted_image_applies_image_allow_list() {
        let credentials = credential_catalog();
        let images = trusted_image_catalog();

        let gke = trusted_image(&images, "extensions/gke").unwrap();
        let for_gke = resolve_credentials_for_trusted_image(&credentials, gke);
        assert_eq!(
            names(for_gke.get("kubernetes-engine").unwrap()),
            vec!["gke-production", "gke-development"]
        );

        let helm = trusted_image(&images, "extensions/helm").unwrap();
        let for_helm = resolve_credentials_for_trusted_image(&credentials, helm);
        assert_eq!(
            names(for_helm.get("kubernetes-engine").unwrap()),
            vec!["gke-development"]
        );
    }

    #[test]
    fn test_credentials_for_trusted_image_omits_empty_types() {
        let credentials = vec![
            CredentialConfig::new("gke-production", "kubernetes-engine")
                .allow_trusted_images("extensions/gke"),
        ];
        let helm = TrustedImageConfig::new("extensions/helm")
            .inject("kubernetes-engine")
            .inject("slack-webhook");

        let by_type = resolve_credentials_for_trusted_image(&credentials, &helm);

        assert!(by_type.is_empty());
        assert!(!by_type.contains_type("kubernetes-engine"));
        assert!(by_type.get("slack-webhook").is_none());
    }

    #[test]
    fn test_credentials_for_image_without_injected_types() {
        let credentials = credential_catalog();
        let images = trusted_image_catalog();
        let docker = trusted_image(&images, "docker").unwrap();

        assert!(resolve_credentials_for_trusted_image(&credentials, docker).is_empty());
    }

    #[test]
    fn test_resolve_credentials_dedups_across_images() {
        let credentials = credential_catalog();
        let images = trusted_image_catalog();
        let used = resolve_trusted_images(
            &images,
            &["extensions/gke:stable", "extensions/helm:stable", "extensions/docker"],
            "github.com/org/repo",
        );

        let resolved = resolve_credentials(&credentials, used, "github.com/org/repo");

        assert_eq!(
            names(&resolved),
            vec![
                "gke-production",
                "gke-development",
                "container-registry-extensions",
                "container-registry-private",
            ]
        );
    }

    #[test]
    fn test_resolve_credentials_applies_pipeline_allow_list() {
        let credentials = credential_catalog();
        let images = trusted_image_catalog();
        let docker = trusted_image(&images, "extensions/docker").unwrap();

        let resolved = resolve_credentials(&credentials, [docker], "bitbucket.org/org/repo");

        assert_eq!(names(&resolved), vec!["container-registry-extensions"]);
    }

    #[test]
    fn test_resolve_credentials_same_name_different_type_kept() {
        let credentials = vec![
            CredentialConfig::new("shared", "github-api-token"),
            CredentialConfig::new("shared", "bitbucket-api-token"),
        ];
        let images = vec![
            TrustedImageConfig::new("a").inject("github-api-token"),
            TrustedImageConfig::new("b")
                .inject("github-api-token")
                .inject("bitbucket-api-token"),
        ];

        let resolved = resolve_credentials(&credentials, &images, "github.com/org/repo");

        let keys: Vec<(&str, &str)> = resolved.iter().map(|c| c.key()).collect();
        assert_eq!(
            keys,
            vec![("shared", "github-api-token"), ("shared", "bitbucket-api-token")]
        );
    }

    #[test]
    fn test_malformed_allow_list_fails_closed() {
        let credentials =
            vec![CredentialConfig::new("broken", "kubernetes-engine").allow_pipelines("(")];
        let images = vec![TrustedImageConfig::new("extensions/gke").inject("kubernetes-engine")];

        assert!(resolve_credentials(&credentials, &images, "(").is_empty());
    }

    #[test]
    fn test_end_to_end_pipeline_scoped_credential() {
        let credentials = vec![
            CredentialConfig::new("gke-a", "kubernetes-engine").allow_pipelines("github.com/org/repo"),
        ];
        let images = vec![TrustedImageConfig::new("extensions/gke").inject("kubernetes-engine")];
        let references = ["extensions/gke:stable"];

        let for_repo = resolve_trusted_images(&images, &references, "github.com/org/repo");
        let resolved = resolve_credentials(&credentials, for_repo, "github.com/org/repo");
        assert_eq!(names(&resolved), vec!["gke-a"]);

        let for_other = resolve_trusted_images(&images, &references, "github.com/org/other");
        let resolved = resolve_credentials(&credentials, for_other, "github.com/org/other");
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_add_credentials_if_not_present() {
        let catalog = credential_catalog();
        let mut target = vec![&catalog[0]];

        add_credentials_if_not_present(&mut target, [&catalog[0], &catalog[1], &catalog[1]]);

        assert_eq!(
            names(&target),
            vec!["container-registry-extensions", "container-registry-private"]
        );
    }
}
