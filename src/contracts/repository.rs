//! Repository identification shared by pipeline records

use super::builder_config::GitConfig;

/// Records that belong to a source repository
pub trait RepositoryRef {
    /// Source host, e.g. `github.com`
    fn repo_source(&self) -> &str;

    /// Repository owner
    fn repo_owner(&self) -> &str;

    /// Repository name
    fn repo_name(&self) -> &str;

    /// Full repository path `source/owner/name`, the subject of pipeline allow-lists
    fn full_repo_path(&self) -> String {
        format!(
            "{}/{}/{}",
            self.repo_source(),
            self.repo_owner(),
            self.repo_name()
        )
    }
}

/// Implements [`RepositoryRef`] for records with `repo_source`, `repo_owner`
/// and `repo_name` fields.
macro_rules! impl_repository_ref {
    ($($record:ty),+ $(,)?) => {
        $(
            impl $crate::contracts::repository::RepositoryRef for $record {
                fn repo_source(&self) -> &str {
                    &self.repo_source
                }

                fn repo_owner(&self) -> &str {
                    &self.repo_owner
                }

                fn repo_name(&self) -> &str {
                    &self.repo_name
                }
            }
        )+
    };
}

pub(crate) use impl_repository_ref;

impl_repository_ref!(GitConfig);
