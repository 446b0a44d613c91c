use std::{fs, path::Path};

use pretty_assertions::assert_eq;
use reconcile_sequence::{Fallback, MergeConfig, MergeResult};
use serde::Deserialize;

/// A three-way merge together with its expected outcome, as read from the
/// YAML documents under `tests/examples`.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct MergeScenario {
    name: String,
    ancestor: Vec<String>,
    next: Vec<String>,
    current: Vec<String>,

    #[serde(default)]
    fallback: Option<String>,

    merged: Option<Vec<String>>,

    #[serde(default)]
    conflicts: Vec<usize>,

    #[serde(default)]
    errors: bool,
}

impl MergeScenario {
    pub fn name(&self) -> &str { &self.name }

    pub fn ancestor(&self) -> &[String] { &self.ancestor }

    pub fn next(&self) -> &[String] { &self.next }

    pub fn current(&self) -> &[String] { &self.current }

    pub fn config(&self) -> MergeConfig {
        let fallback = self.fallback.as_deref().map_or_else(Fallback::default, |fallback| {
            fallback.parse().expect("Invalid fallback in example")
        });

        MergeConfig::new(fallback)
    }

    /// Merges without conflicts or errors are expected to give the same
    /// result with the two sides swapped.
    pub fn is_clean(&self) -> bool { self.conflicts.is_empty() && !self.errors }

    pub fn assert_eq(&self, result: &MergeResult<String>) {
        assert_eq!(
            result.merged(),
            self.merged.as_deref(),
            "Merged sequence mismatch in `{}`",
            self.name
        );

        let conflicts = result
            .conflicts()
            .iter()
            .map(|conflict| conflict.index())
            .collect::<Vec<_>>();
        assert_eq!(conflicts, self.conflicts, "Conflict mismatch in `{}`", self.name);

        assert_eq!(
            result.log().has_errors(),
            self.errors,
            "Unexpected merge log in `{}`: {:?}",
            self.name,
            result.log().entries()
        );
    }

    pub fn assert_merged_eq(&self, merged: Option<&[String]>) {
        assert_eq!(merged, self.merged.as_deref(), "Merged sequence mismatch in `{}`", self.name);
    }
}

pub fn get_all_scenarios() -> Vec<MergeScenario> {
    let examples_dir = Path::new("tests/examples");
    let entries = fs::read_dir(examples_dir)
        .expect("Failed to read examples directory")
        .collect::<Vec<_>>();

    let mut scenarios = Vec::new();

    for entry in entries {
        let entry = entry.expect("Failed to read directory entry");
        let path = entry.path();

        if path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("yml") {
            let file = fs::File::open(&path).expect("Failed to open example file");
            for document in serde_yaml::Deserializer::from_reader(file) {
                let scenario =
                    MergeScenario::deserialize(document).expect("Failed to deserialize scenario");
                scenarios.push(scenario);
            }
        }
    }

    assert!(!scenarios.is_empty(), "No merge scenarios found");
    scenarios
}
