pub trait AssetLoader<T> {
    fn load(&self, path: &str) -> T;
}

pub trait RawAssetLoader {
    /// The whole file, `None` if it could not be located or read. Implementations log the reason.
    fn load_raw_owned(&self, path: &str) -> Option<Vec<u8>>;

    fn exists(&self, path: &str) -> bool;
}
