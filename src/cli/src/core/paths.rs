use std::path::Path;

pub fn clean_path_str(s: &str) -> &str {
    #[cfg(windows)]
    {
        if let Some(stripped) = s.strip_prefix(r"\\?\") {
            return stripped;
        }
    }
    s
}

pub fn clean_path(path: &Path) -> String {
    let s = path.display().to_string();
    clean_path_str(&s).to_string()
}

/// Name a configuration file is imported by: its path below `root` without
/// extension, components joined with `/` on every platform.
pub fn configuration_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path).with_extension("");
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_name_is_relative() {
        let root = Path::new("configs");
        assert_eq!(
            configuration_name(root, &root.join("shared").join("labels.mnky")),
            "shared/labels"
        );
        assert_eq!(configuration_name(root, &root.join("demo.mnky")), "demo");
    }

    #[test]
    fn test_configuration_name_outside_root() {
        assert_eq!(
            configuration_name(Path::new("configs"), Path::new("other/demo.mnky")),
            "other/demo"
        );
    }
}
