use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::config_io::{config_path, read_config};

const CONFIG_TEMPLATE: &str = r##"# jot configuration. Every setting is optional.

[store]
# Key the task list is stored under
key = "tasks"
# Store file, relative to this directory
file = "store.json"

[ids]
# New tasks are numbered <prefix>-001, <prefix>-002, ...
prefix = "T"

[export]
# Default file name for `jot export`
filename = "myTasks.txt"
"##;

pub fn cmd_init(data_dir: &Path, args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let path = config_path(data_dir);
    if path.exists() && !args.force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )
        .into());
    }

    fs::create_dir_all(data_dir)
        .map_err(|e| format!("could not create {}: {}", data_dir.display(), e))?;
    fs::write(&path, CONFIG_TEMPLATE)
        .map_err(|e| format!("could not write {}: {}", path.display(), e))?;

    // the template must load cleanly
    read_config(data_dir)?;

    println!("initialized {}", data_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_template_matches_defaults() {
        let config: crate::model::config::Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        let defaults = crate::model::config::Config::default();
        assert_eq!(config.store.key, defaults.store.key);
        assert_eq!(config.store.file, defaults.store.file);
        assert_eq!(config.ids.prefix, defaults.ids.prefix);
        assert_eq!(config.export.filename, defaults.export.filename);
    }

    #[test]
    fn test_init_creates_dir_and_refuses_overwrite() {
        let tmp = TempDir::new().unwrap();
        let data_dir = tmp.path().join("jot");

        cmd_init(&data_dir, InitArgs { force: false }).unwrap();
        assert!(config_path(&data_dir).exists());

        assert!(cmd_init(&data_dir, InitArgs { force: false }).is_err());
        assert!(cmd_init(&data_dir, InitArgs { force: true }).is_ok());
    }
}
