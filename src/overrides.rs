use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::models::{LicenseEntry, OverrideEntry, ProjectAttribution};

/// Parse an override document: a JSON array of
/// `{"project": "...", "licenses": [{"name": "..."}]}` objects.
pub fn parse_overrides(json: &str) -> Result<Vec<OverrideEntry>, serde_json::Error> {
    serde_json::from_str(json)
}

pub fn load_overrides(path: &Path) -> Result<Vec<OverrideEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("could not read override file {}", path.display()))?;
    parse_overrides(&content)
        .with_context(|| format!("invalid override file {}", path.display()))
}

/// Apply `overrides` to computed results.
///
/// Overridden projects get exactly the forced license names at confidence
/// 1.0, whatever was detected. Overrides naming unknown projects are added
/// at the end, in override order. Errors for overridden projects are dropped.
pub fn merge(
    computed: Vec<ProjectAttribution>,
    errors: Vec<ProjectAttribution>,
    overrides: &[OverrideEntry],
) -> (Vec<ProjectAttribution>, Vec<ProjectAttribution>) {
    // Entries for the same project accumulate, first appearance fixes the order.
    let mut order: Vec<&str> = Vec::new();
    let mut forced: HashMap<&str, Vec<LicenseEntry>> = HashMap::new();
    for entry in overrides {
        let licenses = forced.entry(entry.project.as_str()).or_insert_with(|| {
            order.push(entry.project.as_str());
            Vec::new()
        });
        licenses.extend(entry.licenses.iter().map(|l| LicenseEntry {
            name: l.name.clone(),
            confidence: 1.0,
        }));
    }

    let mut applied: HashSet<&str> = HashSet::new();
    let mut attributions = Vec::with_capacity(computed.len() + order.len());
    for mut attribution in computed {
        if let Some((&project, licenses)) = forced.get_key_value(attribution.project.as_str()) {
            info!(project, "license attribution overridden");
            attribution.licenses = licenses.clone();
            attribution.error = None;
            applied.insert(project);
        }
        attributions.push(attribution);
    }

    for project in &order {
        if applied.contains(project) {
            continue;
        }
        info!(project, "license attribution added by override");
        attributions.push(ProjectAttribution {
            project: project.to_string(),
            licenses: forced[project].clone(),
            error: None,
        });
    }

    let remaining = errors
        .into_iter()
        .filter(|e| !forced.contains_key(e.project.as_str()))
        .collect();

    (attributions, remaining)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OverrideLicense;

    fn detected(project: &str, name: &str, confidence: f64) -> ProjectAttribution {
        ProjectAttribution {
            project: project.to_string(),
            licenses: vec![LicenseEntry {
                name: name.to_string(),
                confidence,
            }],
            error: None,
        }
    }

    fn forced(project: &str, names: &[&str]) -> ProjectAttribution {
        ProjectAttribution {
            project: project.to_string(),
            licenses: names
                .iter()
                .map(|n| LicenseEntry {
                    name: n.to_string(),
                    confidence: 1.0,
                })
                .collect(),
            error: None,
        }
    }

    #[test]
    fn test_parse_overrides() {
        let json = r#"[
            {"project": "colors/missing", "licenses": [{"name": "override missing"}]},
            {"project": "colors/red", "licenses": [{"name": "override existing"}]},
            {"project": "colors/empty"}
        ]"#;
        let entries = parse_overrides(json).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].project, "colors/missing");
        assert_eq!(
            entries[1].licenses,
            vec![OverrideLicense {
                name: "override existing".to_string()
            }]
        );
        assert!(entries[2].licenses.is_empty());
    }

    #[test]
    fn test_parse_overrides_rejects_garbage() {
        assert!(parse_overrides("{\"project\": \"x\"}").is_err());
    }

    #[test]
    fn test_merge_overrides() {
        let computed = vec![
            detected("colors/broken", "GNU General Public License v3.0", 1.0),
            detected("colors/red", "MIT License", 0.98),
        ];
        let errors = vec![ProjectAttribution::failed("colors/missing", "cannot find package")];
        let overrides = parse_overrides(
            r#"[
                {"project": "colors/missing", "licenses": [{"name": "override missing"}]},
                {"project": "colors/red", "licenses": [{"name": "override existing"}]}
            ]"#,
        )
        .unwrap();

        let (attributions, errors) = merge(computed, errors, &overrides);
        assert!(errors.is_empty());
        assert_eq!(
            attributions,
            vec![
                detected("colors/broken", "GNU General Public License v3.0", 1.0),
                forced("colors/red", &["override existing"]),
                forced("colors/missing", &["override missing"]),
            ]
        );
    }

    #[test]
    fn test_unrelated_errors_pass_through() {
        let errors = vec![
            ProjectAttribution::failed("a/one", "No license detected"),
            ProjectAttribution::failed("b/two", "broken build"),
        ];
        let overrides = vec![OverrideEntry {
            project: "a/one".to_string(),
            licenses: vec![OverrideLicense {
                name: "Proprietary".to_string(),
            }],
        }];

        let (attributions, errors) = merge(Vec::new(), errors, &overrides);
        assert_eq!(attributions, vec![forced("a/one", &["Proprietary"])]);
        assert_eq!(errors, vec![ProjectAttribution::failed("b/two", "broken build")]);
    }

    #[test]
    fn test_repeated_project_entries_accumulate() {
        let overrides = parse_overrides(
            r#"[
                {"project": "v/x", "licenses": [{"name": "MIT License"}]},
                {"project": "v/y", "licenses": [{"name": "ISC License"}]},
                {"project": "v/x", "licenses": [{"name": "Apache License 2.0"}]}
            ]"#,
        )
        .unwrap();

        let (attributions, _) = merge(Vec::new(), Vec::new(), &overrides);
        assert_eq!(
            attributions,
            vec![
                forced("v/x", &["MIT License", "Apache License 2.0"]),
                forced("v/y", &["ISC License"]),
            ]
        );
    }

    #[test]
    fn test_no_overrides_is_identity() {
        let computed = vec![detected("p/q", "MIT License", 0.981)];
        let errors = vec![ProjectAttribution::failed("r/s", "No license detected")];
        let (a, e) = merge(computed.clone(), errors.clone(), &[]);
        assert_eq!(a, computed);
        assert_eq!(e, errors);
    }
}
