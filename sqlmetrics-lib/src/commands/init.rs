use super::Host;
use super::config::{CONFIG_FILE_NAME, Config};
use crate::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use ohno::{IntoAppError, bail};
use std::fs;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Root directory of the metrics project
    #[arg(long, default_value = ".", value_name = "PATH")]
    pub project_dir: Utf8PathBuf,

    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Writes the default configuration and creates the metrics and data directories
pub fn init_project<H: Host>(host: &mut H, args: &InitArgs) -> Result<()> {
    let output = args.project_dir.join(CONFIG_FILE_NAME);
    if output.exists() && !args.force {
        bail!("configuration file '{output}' already exists, use --force to overwrite it");
    }

    fs::create_dir_all(&args.project_dir).into_app_err_with(|| format!("creating project directory '{}'", args.project_dir))?;
    Config::save_default(&output)?;

    let paths = Config::default().resolve(&args.project_dir);
    for dir in [&paths.metrics_dir, &paths.data_dir] {
        fs::create_dir_all(dir).into_app_err_with(|| format!("creating directory '{dir}'"))?;
    }

    let _ = writeln!(host.output(), "Generated default configuration file: {output}");
    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;

    fn temp_dir() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("temp dir should be UTF-8");
        (dir, path)
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_init_creates_layout() {
        let (_guard, dir) = temp_dir();
        let project_dir = dir.join("shop");

        let mut host = TestHost::new();
        init_project(&mut host, &InitArgs { project_dir: project_dir.clone(), force: false }).unwrap();

        assert!(project_dir.join(CONFIG_FILE_NAME).is_file());
        assert!(project_dir.join("metrics").is_dir());
        assert!(project_dir.join("data").is_dir());
        assert!(host.output_str().starts_with("Generated default configuration file: "));

        let loaded = Config::load(&project_dir, None).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_init_refuses_to_overwrite() {
        let (_guard, dir) = temp_dir();
        fs::write(dir.join(CONFIG_FILE_NAME), "metrics_dir = \"custom\"\n").unwrap();

        let mut host = TestHost::new();
        let result = init_project(&mut host, &InitArgs { project_dir: dir.clone(), force: false });
        assert!(result.is_err());
        assert_eq!(fs::read_to_string(dir.join(CONFIG_FILE_NAME)).unwrap(), "metrics_dir = \"custom\"\n");

        init_project(&mut host, &InitArgs { project_dir: dir.clone(), force: true }).unwrap();
        assert_eq!(Config::load(&dir, None).unwrap(), Config::default());
    }
}
