//! Configured test-command execution.

use crossbuild_core::GlobalOptions;

use crate::aggregate::{aggregate_flags, ExitStatus};
use crate::error::RunnerError;
use crate::process;

/// Run all configured test commands, or just the named one.
///
/// An unknown name is a fatal configuration error; a test command that
/// runs and fails only fails the aggregate.
pub fn run_tests(options: &GlobalOptions, name: Option<&str>) -> Result<ExitStatus, RunnerError> {
    let selected: Vec<(&str, &[String])> = match name {
        Some(name) => vec![(name, options.test_command(name)?)],
        None => options
            .test_commands
            .iter()
            .map(|(label, argv)| (label.as_str(), argv.as_slice()))
            .collect(),
    };

    let mut flags = Vec::with_capacity(selected.len());
    for (label, argv) in selected {
        tracing::info!("running test command '{label}'");
        let ok = process::run_argv(argv)?;
        if !ok {
            tracing::error!("test command '{label}' failed");
        }
        flags.push(ok);
    }
    Ok(aggregate_flags(flags))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use crossbuild_core::ConfigError;

    use super::*;

    fn options(test_commands: BTreeMap<String, Vec<String>>) -> GlobalOptions {
        GlobalOptions {
            crossover_path: PathBuf::from("crossovers"),
            crossovers: vec![],
            search_paths: vec![],
            pinned_files: vec![],
            repl_listen_port: 9000,
            repl_launch_commands: BTreeMap::new(),
            test_commands,
            compiler_command: vec!["cljsc".to_owned()],
            builds: vec![],
        }
    }

    #[test]
    fn unknown_name_is_a_config_error() {
        let err = run_tests(&options(BTreeMap::new()), Some("unit")).unwrap_err();
        assert!(matches!(
            err,
            RunnerError::Config(ConfigError::UnknownCommand { kind: "test", .. })
        ));
    }

    #[test]
    fn no_configured_commands_is_success() {
        let status = run_tests(&options(BTreeMap::new()), None).unwrap();
        assert_eq!(status, ExitStatus::Success);
    }

    #[test]
    #[cfg(unix)]
    fn one_failing_command_fails_the_aggregate() {
        let mut commands = BTreeMap::new();
        commands.insert("pass".to_owned(), vec!["true".to_owned()]);
        commands.insert("fail".to_owned(), vec!["false".to_owned()]);
        let status = run_tests(&options(commands), None).unwrap();
        assert_eq!(status, ExitStatus::Failure);
    }

    #[test]
    #[cfg(unix)]
    fn named_command_runs_alone() {
        let mut commands = BTreeMap::new();
        commands.insert("pass".to_owned(), vec!["true".to_owned()]);
        commands.insert("fail".to_owned(), vec!["false".to_owned()]);
        let status = run_tests(&options(commands), Some("pass")).unwrap();
        assert_eq!(status, ExitStatus::Success);
    }
}
