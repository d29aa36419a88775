//! Configuration normalizer — raw YAML in any accepted shape to the
//! canonical multi-build model.
//!
//! ## Pipeline
//!
//! 1. Parse YAML.
//! 2. Detect the input shape and tag it ([`ConfigShape`]).
//! 3. Lift legacy shapes to the canonical `{builds: [...], ...}` form,
//!    recording a deprecation warning that echoes the canonical YAML.
//! 4. Recursive structural merge of defaults at three levels: global,
//!    per-build, per-build compiler map.
//! 5. Synthesize `output-dir` for builds that lack one (`<base><index>`).
//! 6. Validate that all resolved output dirs are pairwise distinct.
//! 7. Deserialize into the typed [`GlobalOptions`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::defaults::ConfigDefaults;
use crate::error::ConfigError;
use crate::types::{BuildJob, GlobalOptions, NamespaceName};

// ---------------------------------------------------------------------------
// Shape detection
// ---------------------------------------------------------------------------

/// The detected shape of raw configuration input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigShape {
    /// A single build-options map with no `builds` wrapper.
    LegacySingle,
    /// A bare sequence of build-options maps.
    LegacySequence,
    /// A map containing `builds` plus global keys.
    Canonical,
}

impl ConfigShape {
    pub fn is_legacy(self) -> bool {
        !matches!(self, ConfigShape::Canonical)
    }
}

impl fmt::Display for ConfigShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigShape::LegacySingle => write!(f, "legacy single-build map"),
            ConfigShape::LegacySequence => write!(f, "legacy multi-build sequence"),
            ConfigShape::Canonical => write!(f, "canonical"),
        }
    }
}

/// Detect the shape of a parsed document and lift it to canonical form.
///
/// Detection order matters: sequence first, then map-without-builds, then
/// canonical. Anything else is a [`ConfigError::Shape`].
fn detect(value: Value) -> Result<(ConfigShape, Mapping), ConfigError> {
    match value {
        Value::Sequence(builds) => {
            let mut root = Mapping::new();
            root.insert("builds".into(), Value::Sequence(builds));
            Ok((ConfigShape::LegacySequence, root))
        }
        Value::Mapping(map) if !map.contains_key("builds") => {
            let mut root = Mapping::new();
            root.insert("builds".into(), Value::Sequence(vec![Value::Mapping(map)]));
            Ok((ConfigShape::LegacySingle, root))
        }
        Value::Mapping(map) => Ok((ConfigShape::Canonical, map)),
        _ => Err(ConfigError::Shape),
    }
}

// ---------------------------------------------------------------------------
// Deprecation warnings
// ---------------------------------------------------------------------------

/// A non-fatal warning emitted for legacy input shapes.
///
/// Echoes the equivalent canonical YAML so the user can migrate. The core
/// crate performs no logging; callers decide how to surface warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecationWarning {
    pub shape: ConfigShape,
    pub canonical: String,
}

impl fmt::Display for DeprecationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "deprecated configuration shape ({}); equivalent canonical form:\n{}",
            self.shape, self.canonical
        )
    }
}

/// Normalization output: the canonical options plus any warnings.
#[derive(Debug)]
pub struct Normalized {
    pub options: GlobalOptions,
    pub warnings: Vec<DeprecationWarning>,
}

// ---------------------------------------------------------------------------
// Recursive structural merge
// ---------------------------------------------------------------------------

/// Merge `overrides` onto `defaults`.
///
/// When both sides are maps, merge key-by-key recursively; for any other
/// pairing the override wins outright. No sequence concatenation, no
/// numeric merging.
pub fn deep_merge(defaults: &Value, overrides: &Value) -> Value {
    match (defaults, overrides) {
        (Value::Mapping(d), Value::Mapping(o)) => {
            let mut out = d.clone();
            for (key, over) in o {
                let merged = match out.get(key) {
                    Some(base) => deep_merge(base, over),
                    None => over.clone(),
                };
                out.insert(key.clone(), merged);
            }
            Value::Mapping(out)
        }
        _ => overrides.clone(),
    }
}

fn merge_mappings(defaults: &Mapping, overrides: &Mapping) -> Mapping {
    match deep_merge(
        &Value::Mapping(defaults.clone()),
        &Value::Mapping(overrides.clone()),
    ) {
        Value::Mapping(m) => m,
        _ => unreachable!("merging two mappings yields a mapping"),
    }
}

// ---------------------------------------------------------------------------
// Typed extraction
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawGlobal {
    crossover_path: PathBuf,
    crossovers: Vec<String>,
    search_paths: Vec<PathBuf>,
    pinned_files: Vec<PathBuf>,
    repl_listen_port: u16,
    repl_launch_commands: BTreeMap<String, Vec<String>>,
    test_commands: BTreeMap<String, Vec<String>>,
    compiler_command: Vec<String>,
    builds: Vec<RawBuild>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawBuild {
    source_path: PathBuf,
    compiler: Mapping,
    jar: bool,
}

// ---------------------------------------------------------------------------
// normalize
// ---------------------------------------------------------------------------

/// Normalize raw YAML configuration into the canonical model.
pub fn normalize(raw_yaml: &str, defaults: &ConfigDefaults) -> Result<Normalized, ConfigError> {
    let parsed: Value = serde_yaml::from_str(raw_yaml)?;
    let (shape, canonical) = detect(parsed)?;

    let mut warnings = Vec::new();
    if shape.is_legacy() {
        let echoed = serde_yaml::to_string(&Value::Mapping(canonical.clone()))
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        warnings.push(DeprecationWarning {
            shape,
            canonical: echoed,
        });
    }

    let mut root = merge_mappings(&defaults.global, &canonical);

    let builds_value = root
        .remove("builds")
        .ok_or(ConfigError::Shape)?;
    let Value::Sequence(raw_builds) = builds_value else {
        return Err(ConfigError::Invalid("`builds` must be a sequence".into()));
    };

    let mut merged_builds = Vec::with_capacity(raw_builds.len());
    for (index, entry) in raw_builds.into_iter().enumerate() {
        let Value::Mapping(build) = entry else {
            return Err(ConfigError::Invalid(format!(
                "build {index} must be a map"
            )));
        };
        let mut build = merge_mappings(&defaults.build, &build);

        let supplied_compiler = match build.remove("compiler") {
            Some(Value::Mapping(m)) => m,
            Some(_) => {
                return Err(ConfigError::Invalid(format!(
                    "build {index}: `compiler` must be a map"
                )))
            }
            None => Mapping::new(),
        };
        let mut compiler = merge_mappings(&defaults.compiler, &supplied_compiler);

        if !compiler.contains_key("output-dir") {
            compiler.insert(
                "output-dir".into(),
                format!("{}{}", defaults.output_dir_base, index).into(),
            );
        }

        build.insert("compiler".into(), Value::Mapping(compiler));
        merged_builds.push(Value::Mapping(build));
    }

    validate_output_dirs(&merged_builds)?;
    root.insert("builds".into(), Value::Sequence(merged_builds));

    let raw: RawGlobal = serde_yaml::from_value(Value::Mapping(root))
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;

    let builds = raw
        .builds
        .into_iter()
        .enumerate()
        .map(|(index, b)| BuildJob {
            index,
            source_path: b.source_path,
            compiler: b.compiler,
            jar: b.jar,
        })
        .collect();

    let options = GlobalOptions {
        crossover_path: raw.crossover_path,
        crossovers: raw.crossovers.into_iter().map(NamespaceName).collect(),
        search_paths: raw.search_paths,
        pinned_files: raw.pinned_files,
        repl_listen_port: raw.repl_listen_port,
        repl_launch_commands: raw.repl_launch_commands,
        test_commands: raw.test_commands,
        compiler_command: raw.compiler_command,
        builds,
    };

    Ok(Normalized { options, warnings })
}

/// Reject any pair of builds whose resolved `output-dir` values collide.
///
/// Explicitly supplied values participate: a user-supplied dir can collide
/// with another user-supplied dir or with a synthesized one.
fn validate_output_dirs(builds: &[Value]) -> Result<(), ConfigError> {
    let mut seen: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (index, build) in builds.iter().enumerate() {
        let dir = build
            .get("compiler")
            .and_then(|c| c.get("output-dir"))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ConfigError::Invalid(format!("build {index}: `output-dir` must be a string"))
            })?;
        seen.entry(dir.to_owned()).or_default().push(index);
    }
    for (value, jobs) in seen {
        if jobs.len() > 1 {
            return Err(ConfigError::DuplicateOutputDir { value, jobs });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).expect("test yaml")
    }

    #[test]
    fn deep_merge_override_wins_for_scalars() {
        let merged = deep_merge(&yaml("1"), &yaml("2"));
        assert_eq!(merged, yaml("2"));
    }

    #[test]
    fn deep_merge_no_sequence_concatenation() {
        let merged = deep_merge(&yaml("[a, b]"), &yaml("[c]"));
        assert_eq!(merged, yaml("[c]"));
    }

    #[test]
    fn deep_merge_recurses_into_maps() {
        let defaults = yaml("{compiler: {output-to: main.js, pretty-print: true}}");
        let overrides = yaml("{compiler: {output-to: app.js}}");
        let merged = deep_merge(&defaults, &overrides);
        assert_eq!(
            merged,
            yaml("{compiler: {output-to: app.js, pretty-print: true}}")
        );
    }

    #[test]
    fn detect_sequence_is_legacy_multi() {
        let (shape, root) = detect(yaml("[{source-path: a}, {source-path: b}]")).unwrap();
        assert_eq!(shape, ConfigShape::LegacySequence);
        let builds = root.get("builds").and_then(Value::as_sequence).unwrap();
        assert_eq!(builds.len(), 2);
    }

    #[test]
    fn detect_map_without_builds_is_legacy_single() {
        let (shape, root) = detect(yaml("{source-path: a}")).unwrap();
        assert_eq!(shape, ConfigShape::LegacySingle);
        let builds = root.get("builds").and_then(Value::as_sequence).unwrap();
        assert_eq!(builds.len(), 1);
    }

    #[test]
    fn detect_map_with_builds_is_canonical() {
        let (shape, _) = detect(yaml("{builds: [{}]}")).unwrap();
        assert_eq!(shape, ConfigShape::Canonical);
    }

    #[test]
    fn detect_scalar_is_shape_error() {
        assert!(matches!(detect(yaml("42")), Err(ConfigError::Shape)));
    }

    #[test]
    fn synthesized_output_dirs_use_base_and_index() {
        let normalized = normalize(
            "builds:\n  - source-path: a\n  - source-path: b\n",
            &ConfigDefaults::standard(),
        )
        .unwrap();
        let dirs: Vec<_> = normalized
            .options
            .builds
            .iter()
            .map(|b| b.output_dir().unwrap().to_owned())
            .collect();
        assert_eq!(
            dirs,
            vec![
                "target/crossbuild-compiler-0".to_owned(),
                "target/crossbuild-compiler-1".to_owned(),
            ]
        );
    }

    #[test]
    fn explicit_duplicate_output_dirs_rejected() {
        let raw = "builds:\n  - compiler: {output-dir: out}\n  - compiler: {output-dir: out}\n";
        let err = normalize(raw, &ConfigDefaults::standard()).unwrap_err();
        match err {
            ConfigError::DuplicateOutputDir { value, jobs } => {
                assert_eq!(value, "out");
                assert_eq!(jobs, vec![0, 1]);
            }
            other => panic!("expected DuplicateOutputDir, got {other:?}"),
        }
    }

    #[test]
    fn explicit_dir_colliding_with_synthesized_rejected() {
        let raw = "builds:\n  - {}\n  - compiler: {output-dir: target/crossbuild-compiler-0}\n";
        let err = normalize(raw, &ConfigDefaults::standard()).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateOutputDir { .. }));
    }

    #[test]
    fn legacy_single_warns_with_canonical_echo() {
        let normalized = normalize("source-path: a\n", &ConfigDefaults::standard()).unwrap();
        assert_eq!(normalized.warnings.len(), 1);
        let warning = &normalized.warnings[0];
        assert_eq!(warning.shape, ConfigShape::LegacySingle);
        assert!(warning.canonical.contains("builds:"));
        assert!(warning.canonical.contains("source-path: a"));
    }

    #[test]
    fn canonical_shape_produces_no_warning() {
        let normalized =
            normalize("builds:\n  - {}\n", &ConfigDefaults::standard()).unwrap();
        assert!(normalized.warnings.is_empty());
    }

    #[test]
    fn builds_must_be_a_sequence() {
        let err = normalize("builds: 3\n", &ConfigDefaults::standard()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn compiler_defaults_survive_partial_override() {
        let normalized = normalize(
            "builds:\n  - compiler: {output-to: app.js}\n",
            &ConfigDefaults::standard(),
        )
        .unwrap();
        let compiler = &normalized.options.builds[0].compiler;
        assert_eq!(
            compiler.get("output-to").and_then(Value::as_str),
            Some("app.js")
        );
        assert_eq!(
            compiler.get("optimizations").and_then(Value::as_str),
            Some("whitespace")
        );
        assert_eq!(
            compiler.get("pretty-print").and_then(Value::as_bool),
            Some(true)
        );
    }
}
