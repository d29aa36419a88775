//! Removal of generated output.

use std::io::ErrorKind;
use std::path::Path;

use crossbuild_core::GlobalOptions;

use crate::error::{io_err, RunnerError};

/// Remove the crossover mirror and every job's generated output.
///
/// Safe to call when nothing has been generated yet; missing paths are not
/// errors.
pub fn clean(options: &GlobalOptions) -> Result<(), RunnerError> {
    remove_dir(&options.crossover_path)?;
    for job in &options.builds {
        if let Some(dir) = job.output_dir() {
            remove_dir(Path::new(dir))?;
        }
        if let Some(file) = job.output_to() {
            remove_file(Path::new(file))?;
        }
    }
    Ok(())
}

fn remove_dir(path: &Path) -> Result<(), RunnerError> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => {
            tracing::info!("removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_err(path, e)),
    }
}

fn remove_file(path: &Path) -> Result<(), RunnerError> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::info!("removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_err(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::PathBuf;

    use serde_yaml::Mapping;
    use tempfile::TempDir;

    use crossbuild_core::BuildJob;

    use super::*;

    fn options_in(root: &Path) -> GlobalOptions {
        let mut compiler = Mapping::new();
        compiler.insert(
            "output-dir".into(),
            root.join("out-0").to_string_lossy().into_owned().into(),
        );
        compiler.insert(
            "output-to".into(),
            root.join("main.js").to_string_lossy().into_owned().into(),
        );
        GlobalOptions {
            crossover_path: root.join("crossovers"),
            crossovers: vec![],
            search_paths: vec![],
            pinned_files: vec![],
            repl_listen_port: 9000,
            repl_launch_commands: BTreeMap::new(),
            test_commands: BTreeMap::new(),
            compiler_command: vec!["cljsc".to_owned()],
            builds: vec![BuildJob {
                index: 0,
                source_path: PathBuf::from("src-cljs"),
                compiler,
                jar: false,
            }],
        }
    }

    #[test]
    fn clean_removes_mirror_and_job_outputs() {
        let tmp = TempDir::new().unwrap();
        let options = options_in(tmp.path());

        fs::create_dir_all(tmp.path().join("crossovers/shared")).unwrap();
        fs::create_dir_all(tmp.path().join("out-0")).unwrap();
        fs::write(tmp.path().join("main.js"), "js").unwrap();

        clean(&options).unwrap();

        assert!(!tmp.path().join("crossovers").exists());
        assert!(!tmp.path().join("out-0").exists());
        assert!(!tmp.path().join("main.js").exists());
    }

    #[test]
    fn clean_is_safe_when_nothing_exists() {
        let tmp = TempDir::new().unwrap();
        let options = options_in(tmp.path());
        clean(&options).unwrap();
        clean(&options).unwrap();
    }
}
