//! The aggregate document emitted by the resolver.

use crate::commitlint_models::CommitlintConfig;
use crate::release_models::ReleaseConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use ts_rs::TS;

/// Everything the external release process needs, validated and with
/// environment variables substituted.
///
/// Built once per invocation and never mutated afterwards.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    /// Release engine configuration.
    pub release: ReleaseConfig,

    /// Commit-lint configuration, when the project has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commitlint: Option<CommitlintConfig>,

    /// Files the configuration was read from, in load order.
    #[ts(type = "Array<string>")]
    pub sources: Vec<PathBuf>,
}
