use std::fs;
use std::path::{Path, PathBuf};

use log::{trace, warn};

use crate::io::common::loader::RawAssetLoader;

/// Loads assets from a directory on the local file system. Asset paths are always relative to
/// that directory and use forward slashes, backslashes are accepted and converted.
pub struct FsLoader {
    data_folder: PathBuf,
}

impl FsLoader {
    pub fn new<P: AsRef<Path>>(data_folder: P) -> Self {
        let data_folder = data_folder.as_ref().to_path_buf();
        if !data_folder.is_dir() {
            warn!(
                "FsLoader: Asset folder {} does not exist, every load will fail",
                data_folder.display()
            );
        }

        Self { data_folder }
    }

    pub fn data_folder(&self) -> &Path {
        &self.data_folder
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let normalized = path.replace('\\', "/");
        self.data_folder.join(normalized.trim_start_matches('/'))
    }
}

impl RawAssetLoader for FsLoader {
    fn load_raw_owned(&self, path: &str) -> Option<Vec<u8>> {
        let full_path = self.resolve(path);
        match fs::read(&full_path) {
            Ok(buf) => {
                trace!("Loaded {} ({} bytes)", full_path.display(), buf.len());
                Some(buf)
            }
            Err(err) => {
                warn!("Could not load {}: {}", full_path.display(), err);
                None
            }
        }
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::FsLoader;
    use crate::io::common::loader::RawAssetLoader;
    use std::fs;

    #[test]
    fn loads_relative_to_the_data_folder() -> Result<(), anyhow::Error> {
        let folder = std::env::temp_dir().join(format!("wonderland-fs-loader-{}", std::process::id()));
        fs::create_dir_all(folder.join("models"))?;
        fs::write(folder.join("models").join("tree.gltf"), b"{}")?;

        let loader = FsLoader::new(&folder);
        assert_eq!(loader.load_raw_owned("models/tree.gltf"), Some(b"{}".to_vec()));
        assert_eq!(loader.load_raw_owned("models\\tree.gltf"), Some(b"{}".to_vec()));
        assert!(loader.exists("/models/tree.gltf"));
        assert!(!loader.exists("models/rock.gltf"));
        assert_eq!(loader.load_raw_owned("models/rock.gltf"), None);

        fs::remove_dir_all(&folder)?;
        Ok(())
    }
}
