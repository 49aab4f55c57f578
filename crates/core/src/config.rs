//! Configuration path utilities.
//!
//! Resolves the location of the command definition file and expands `~`.

/// Default path for the command definition file
const DEFAULT_CONFIG_PATH: &str = "~/.cmdtree/commands.yml";

/// Resolves the configuration file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// configuration path. Shell expansions like `~` are resolved.
///
/// # Arguments
///
/// * `config_path_arg` - Optional custom configuration file path
///
/// # Examples
///
/// ```
/// use cmdtree_core::config::get_config_path;
///
/// let default_path = get_config_path(&None);
/// assert!(default_path.ends_with(".cmdtree/commands.yml"));
///
/// let custom_path = get_config_path(&Some("/etc/cmdtree.yml".to_string()));
/// assert_eq!(custom_path, "/etc/cmdtree.yml");
/// ```
pub fn get_config_path(config_path_arg: &Option<String>) -> String {
    let config_path = match config_path_arg {
        Some(config_path) => config_path,
        None => DEFAULT_CONFIG_PATH,
    };

    shellexpand::tilde(config_path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_path_with_custom_path() {
        let custom_path = Some("/custom/path/commands.yml".to_string());
        assert_eq!(get_config_path(&custom_path), "/custom/path/commands.yml");
    }

    #[test]
    fn test_get_config_path_with_none() {
        let result = get_config_path(&None);
        assert!(result.ends_with("commands.yml"));
        assert!(!result.starts_with('~'));
    }

    #[test]
    fn test_get_config_path_with_tilde() {
        let result = get_config_path(&Some("~/levels.yml".to_string()));
        assert!(!result.starts_with('~'));
        assert!(result.ends_with("levels.yml"));
    }
}
