use std::path::PathBuf;

const CONFIG_FILE: &str = ".comment-tree.toml";

/// Read the first `.comment-tree.toml` found
///
/// The working directory is checked before the home directory.
pub fn load_config_file() -> Option<String> {
    config_paths().into_iter().find_map(|path| {
        let content = std::fs::read_to_string(&path).ok()?;
        log::debug!("Loaded config from {}", path.display());
        Some(content)
    })
}

/// Lookup order for the config file
fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE)];
    paths.extend(dirs::home_dir().map(|home| home.join(CONFIG_FILE)));
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_working_directory_is_searched_first() {
        let paths = config_paths();
        assert_eq!(paths[0], PathBuf::from(CONFIG_FILE));
        assert!(paths.iter().all(|path| path.ends_with(CONFIG_FILE)));
        assert!(paths.len() <= 2);
    }
}
