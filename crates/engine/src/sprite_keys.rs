use std::path::{Path, PathBuf};

use thiserror::Error;

const MAX_SPRITE_KEY_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpriteKeyError {
    #[error("sprite key must not be empty")]
    Empty,
    #[error("sprite key is longer than {max} characters")]
    TooLong { max: usize },
    #[error("sprite key must not start or end with '/'")]
    EdgeSlash,
    #[error("sprite key must not contain '..'")]
    ParentTraversal,
    #[error("sprite key contains invalid character '{character}'")]
    InvalidCharacter { character: char },
}

pub(crate) fn validate_sprite_key(key: &str) -> Result<(), SpriteKeyError> {
    if key.is_empty() {
        return Err(SpriteKeyError::Empty);
    }
    if key.len() > MAX_SPRITE_KEY_LEN {
        return Err(SpriteKeyError::TooLong {
            max: MAX_SPRITE_KEY_LEN,
        });
    }
    if key.starts_with('/') || key.ends_with('/') {
        return Err(SpriteKeyError::EdgeSlash);
    }
    if key.contains("..") {
        return Err(SpriteKeyError::ParentTraversal);
    }
    for ch in key.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '/' | '-') {
            continue;
        }
        return Err(SpriteKeyError::InvalidCharacter { character: ch });
    }
    Ok(())
}

/// `<asset_root>/sprites/<key>.png`
pub(crate) fn sprite_path_for_key(asset_root: &Path, key: &str) -> Result<PathBuf, SpriteKeyError> {
    validate_sprite_key(key)?;
    Ok(asset_root.join("sprites").join(format!("{key}.png")))
}
