use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Manages the Chrome user data directory used while recording
pub struct ProfileManager {
    path: PathBuf,
    is_temporary: bool,
}

impl ProfileManager {
    /// Create a temporary profile that will be deleted on drop
    pub fn temporary() -> Result<Self> {
        let temp_dir = tempfile::Builder::new()
            .prefix("playscribe-profile-")
            .tempdir()?;

        let path = temp_dir.keep();
        tracing::debug!("Created temporary profile at {}", path.display());

        Ok(Self {
            path,
            is_temporary: true,
        })
    }

    /// Create or use a persistent profile at the given path
    pub fn persistent(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(&path)?;
        }

        Ok(Self {
            path,
            is_temporary: false,
        })
    }

    /// Create or use the named persistent profile under the profiles directory
    pub fn named(name: &str) -> Result<Self> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(Error::Browser(format!("Invalid profile name: '{}'", name)));
        }
        Self::persistent(Self::profiles_dir()?.join(name))
    }

    /// Directory holding named profiles (`~/.playscribe/profiles`)
    pub fn profiles_dir() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(".playscribe").join("profiles"))
            .ok_or_else(|| Error::Browser("Could not determine home directory".to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_temporary(&self) -> bool {
        self.is_temporary
    }

    /// Stop managing the directory; it is left on disk after drop
    pub fn keep(mut self) -> PathBuf {
        self.is_temporary = false;
        self.path.clone()
    }
}

impl Drop for ProfileManager {
    fn drop(&mut self) {
        if self.is_temporary && self.path.exists() {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_profile_creates_and_cleans_up() {
        let profile = ProfileManager::temporary().unwrap();
        let path = profile.path().to_path_buf();

        assert!(path.is_dir());
        assert!(profile.is_temporary());

        drop(profile);

        assert!(!path.exists());
    }

    #[test]
    fn test_persistent_profile_survives_drop() {
        let temp_dir = tempfile::tempdir().unwrap();
        let profile_path = temp_dir.path().join("nested").join("work");

        let profile = ProfileManager::persistent(profile_path.clone()).unwrap();
        assert!(profile_path.is_dir());
        assert!(!profile.is_temporary());

        drop(profile);

        assert!(profile_path.exists());
    }

    #[test]
    fn test_kept_temp_profile_is_not_deleted() {
        let profile = ProfileManager::temporary().unwrap();
        let path = profile.keep();

        assert!(path.is_dir());
        std::fs::remove_dir_all(path).unwrap();
    }

    #[test]
    fn test_named_profile_rejects_path_names() {
        assert!(ProfileManager::named("../escape").is_err());
        assert!(ProfileManager::named("").is_err());
        assert!(ProfileManager::named("..").is_err());
    }

    #[test]
    fn test_profiles_dir_is_under_home() {
        if let Ok(dir) = ProfileManager::profiles_dir() {
            assert!(dir.ends_with(".playscribe/profiles"));
        }
    }
}
