use std::path::{Path, PathBuf};

use anyhow::Context;
use toml::{map::Map, Value};

/// Directory holding the workspace `Cargo.toml`. `PROMPTBOX_WORKSPACE_DIR`
/// wins when set, for deployments where cargo is not around.
pub fn workspace_dir() -> anyhow::Result<PathBuf> {
    if let Ok(dir) = std::env::var("PROMPTBOX_WORKSPACE_DIR") {
        return Ok(PathBuf::from(dir));
    }

    let output = std::process::Command::new(env!("CARGO"))
        .arg("locate-project")
        .arg("--workspace")
        .arg("--message-format=plain")
        .output()
        .context("failed to run cargo locate-project")?
        .stdout;
    let cargo_path = std::str::from_utf8(&output)
        .context("cargo locate-project printed invalid utf-8")?;
    let dir = Path::new(cargo_path.trim())
        .parent()
        .context("workspace Cargo.toml has no parent directory")?;

    Ok(dir.to_path_buf())
}

pub fn load_config(config_name: &str) -> anyhow::Result<Map<String, Value>> {
    load_toml(&workspace_dir()?.join(config_name))
}

pub fn load_env(secrets_name: &str) -> anyhow::Result<Map<String, Value>> {
    load_toml(&workspace_dir()?.join(secrets_name))
}

pub fn load_toml(path: &Path) -> anyhow::Result<Map<String, Value>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    toml::from_str::<Map<String, Value>>(&text)
        .with_context(|| format!("failed to parse {}", path.display()))
}

/// String value at `table.key`.
pub fn get_str(
    config: &Map<String, Value>,
    table: &str,
    key: &str,
) -> anyhow::Result<String> {
    config
        .get(table)
        .with_context(|| format!("failed to get {} config", table))?
        .get(key)
        .with_context(|| format!("failed to load {}.{} config", table, key))?
        .as_str()
        .with_context(|| format!("failed to parse {}.{} config", table, key))
        .map(ToString::to_string)
}

/// Integer value at `table.key`.
pub fn get_integer(
    config: &Map<String, Value>,
    table: &str,
    key: &str,
) -> anyhow::Result<i64> {
    config
        .get(table)
        .with_context(|| format!("failed to get {} config", table))?
        .get(key)
        .with_context(|| format!("failed to load {}.{} config", table, key))?
        .as_integer()
        .with_context(|| format!("failed to parse {}.{} config", table, key))
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_load_toml() {
        // Arrange
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 8000\nsite_url = \"http://localhost:8000\"")
            .unwrap();

        // Act
        let config = load_toml(file.path()).unwrap();

        // Assert
        assert_eq!(get_integer(&config, "server", "port").unwrap(), 8000);
        assert_eq!(
            get_str(&config, "server", "site_url").unwrap(),
            "http://localhost:8000"
        );
        assert!(get_str(&config, "server", "port").is_err());
        assert!(get_str(&config, "session", "cookie_name").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load_toml(Path::new("/definitely/not/here.toml")).unwrap_err();

        assert!(err.to_string().contains("failed to read"));
    }
}
