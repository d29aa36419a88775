//! Stock configuration defaults.
//!
//! Defaults are explicit immutable values handed to the normalizer as a
//! parameter, never ambient state. [`ConfigDefaults::standard`] is the stock
//! table; tests substitute their own to pin down merge behavior.

use serde_yaml::{Mapping, Value};

/// Default destination root for mirrored namespace files.
pub const DEFAULT_CROSSOVER_PATH: &str = "crossovers";

/// Default roots searched when resolving crossover namespaces.
pub const DEFAULT_SEARCH_PATHS: [&str; 2] = ["src-clj", "src"];

/// Default directory of target-runtime source for a build.
pub const DEFAULT_SOURCE_PATH: &str = "src-cljs";

/// Default port for the external REPL listener.
pub const DEFAULT_REPL_LISTEN_PORT: u16 = 9000;

/// Default external compiler argv.
pub const DEFAULT_COMPILER_COMMAND: [&str; 1] = ["cljsc"];

/// Base string for synthesized per-build output directories; the build's
/// zero-based index is appended, guaranteeing uniqueness by construction.
pub const OUTPUT_DIR_BASE: &str = "target/crossbuild-compiler-";

/// Immutable default tables consumed by the normalizer.
///
/// Three levels, matching the three merge sites: global keys, per-build
/// keys, and the per-build compiler-options map.
#[derive(Debug, Clone)]
pub struct ConfigDefaults {
    pub global: Mapping,
    pub build: Mapping,
    pub compiler: Mapping,
    pub output_dir_base: String,
}

impl ConfigDefaults {
    /// The stock defaults.
    pub fn standard() -> Self {
        let mut global = Mapping::new();
        global.insert("crossover-path".into(), DEFAULT_CROSSOVER_PATH.into());
        global.insert("crossovers".into(), Value::Sequence(vec![]));
        global.insert(
            "search-paths".into(),
            Value::Sequence(DEFAULT_SEARCH_PATHS.iter().map(|p| (*p).into()).collect()),
        );
        global.insert("pinned-files".into(), Value::Sequence(vec![]));
        global.insert(
            "repl-listen-port".into(),
            Value::Number(DEFAULT_REPL_LISTEN_PORT.into()),
        );
        global.insert("repl-launch-commands".into(), Value::Mapping(Mapping::new()));
        global.insert("test-commands".into(), Value::Mapping(Mapping::new()));
        global.insert(
            "compiler-command".into(),
            Value::Sequence(
                DEFAULT_COMPILER_COMMAND
                    .iter()
                    .map(|p| (*p).into())
                    .collect(),
            ),
        );

        let mut build = Mapping::new();
        build.insert("source-path".into(), DEFAULT_SOURCE_PATH.into());
        build.insert("jar".into(), Value::Bool(false));

        let mut compiler = Mapping::new();
        compiler.insert("output-to".into(), "main.js".into());
        compiler.insert("optimizations".into(), "whitespace".into());
        compiler.insert("pretty-print".into(), Value::Bool(true));

        Self {
            global,
            build,
            compiler,
            output_dir_base: OUTPUT_DIR_BASE.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_globals_cover_every_recognized_key() {
        let d = ConfigDefaults::standard();
        for key in [
            "crossover-path",
            "crossovers",
            "search-paths",
            "pinned-files",
            "repl-listen-port",
            "repl-launch-commands",
            "test-commands",
            "compiler-command",
        ] {
            assert!(d.global.contains_key(key), "missing default for {key}");
        }
    }

    #[test]
    fn standard_compiler_defaults() {
        let d = ConfigDefaults::standard();
        assert_eq!(
            d.compiler.get("output-to").and_then(Value::as_str),
            Some("main.js")
        );
        assert_eq!(
            d.compiler.get("optimizations").and_then(Value::as_str),
            Some("whitespace")
        );
        assert_eq!(
            d.compiler.get("pretty-print").and_then(Value::as_bool),
            Some(true)
        );
        assert!(
            !d.compiler.contains_key("output-dir"),
            "output-dir must be synthesized per build, not defaulted"
        );
    }
}
