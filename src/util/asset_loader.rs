use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use minijinja::{Environment, Error, State};
use sha2::{Digest, Sha256};

/// Resolves `{{ asset("app.css") }}` to a `/static` URL carrying a content
/// hash, so browsers refetch a file only after it changes.
#[derive(Debug, Clone)]
pub struct AssetLoader {
    root: PathBuf,
    cache: Arc<RwLock<HashMap<String, String>>>,
}

impl AssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: Arc::default(),
        }
    }

    pub fn asset_path(&self, path: &str) -> String {
        if let Some(hashed) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
        {
            return hashed.clone();
        }

        let Ok(contents) = fs::read(self.root.join(path)) else {
            return format!("/static/{path}");
        };
        let hash = Sha256::digest(contents);
        // Twelve hex digits are plenty to bust a cache.
        let hashed = format!("/static/{path}?v={}", &format!("{hash:x}")[..12]);
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_string(), hashed.clone());
        hashed
    }

    pub fn register(&self, env: &mut Environment<'_>) {
        let loader = self.clone();
        env.add_function(
            "asset",
            move |_state: &State, path: String| -> Result<String, Error> {
                Ok(loader.asset_path(&path))
            },
        );
    }
}
