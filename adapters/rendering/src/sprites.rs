use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::SpriteKey;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Asset lookup table mapping every [`SpriteKey`] to an image path.
///
/// Manifests are TOML documents of the form:
///
/// ```toml
/// version = 1
///
/// [sprites]
/// red_piece = "pieces/red_piece.png"
/// ```
///
/// Paths are resolved relative to the directory containing the manifest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpriteManifest {
    paths: BTreeMap<SpriteKey, PathBuf>,
}

impl SpriteManifest {
    /// Builds the manifest matching the stock asset layout under `base`.
    #[must_use]
    pub fn default_layout(base: &Path) -> Self {
        let paths = SpriteKey::ALL
            .into_iter()
            .map(|key| (key, base.join(default_relative_path(key))))
            .collect();
        Self { paths }
    }

    /// Loads a manifest from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read sprite manifest at {}", path.display()))?;
        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::parse(&contents, &base)
    }

    /// Parses manifest `contents`, resolving paths against `base`.
    pub fn parse(contents: &str, base: &Path) -> Result<Self> {
        let manifest: Manifest =
            toml::from_str(contents).context("failed to parse sprite manifest toml contents")?;
        if manifest.version != SUPPORTED_MANIFEST_VERSION {
            bail!(
                "unsupported sprite manifest version {}; expected {}",
                manifest.version,
                SUPPORTED_MANIFEST_VERSION
            );
        }

        let mut resolved = BTreeMap::new();
        for (name, relative_path) in manifest.sprites {
            let key = parse_sprite_key(&name)
                .with_context(|| format!("unknown sprite key `{name}` in manifest"))?;
            let _ = resolved.insert(key, base.join(relative_path));
        }

        for key in SpriteKey::ALL {
            if !resolved.contains_key(&key) {
                bail!("sprite manifest missing entry for {}", key.name());
            }
        }

        Ok(Self { paths: resolved })
    }

    /// Image path registered for `key`.
    #[must_use]
    pub fn path(&self, key: SpriteKey) -> Option<&Path> {
        self.paths.get(&key).map(PathBuf::as_path)
    }

    /// Iterator over every entry in [`SpriteKey::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (SpriteKey, &Path)> {
        self.paths.iter().map(|(key, path)| (*key, path.as_path()))
    }
}

#[derive(Debug, Deserialize)]
struct Manifest {
    version: u32,
    sprites: HashMap<String, String>,
}

fn default_relative_path(key: SpriteKey) -> String {
    match key {
        SpriteKey::RedPiece | SpriteKey::WhitePiece | SpriteKey::BluePiece => {
            format!("pieces/{}.png", key.name())
        }
        SpriteKey::RedTower
        | SpriteKey::WhiteTower
        | SpriteKey::BlueTower
        | SpriteKey::UnclaimedTower => format!("towers/{}.png", key.name()),
    }
}

fn parse_sprite_key(name: &str) -> Result<SpriteKey> {
    match SpriteKey::ALL.into_iter().find(|key| key.name() == name) {
        Some(key) => Ok(key),
        None => bail!("unknown sprite key `{name}`"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL_MANIFEST: &str = r#"
        version = 1

        [sprites]
        red_piece = "pieces/red_piece.png"
        white_piece = "pieces/white_piece.png"
        blue_piece = "pieces/blue_piece.png"
        red_tower = "towers/red_tower.png"
        white_tower = "towers/white_tower.png"
        blue_tower = "towers/blue_tower.png"
        unclaimed_tower = "towers/unclaimed_tower.png"
    "#;

    #[test]
    fn default_layout_covers_every_sprite() {
        let manifest = SpriteManifest::default_layout(Path::new("graphics"));

        assert_eq!(manifest.iter().count(), SpriteKey::ALL.len());
        assert_eq!(
            manifest.path(SpriteKey::UnclaimedTower),
            Some(Path::new("graphics/towers/unclaimed_tower.png"))
        );
        assert_eq!(
            manifest.path(SpriteKey::WhitePiece),
            Some(Path::new("graphics/pieces/white_piece.png"))
        );
    }

    #[test]
    fn parsed_manifest_matches_default_layout() {
        let parsed = SpriteManifest::parse(FULL_MANIFEST, Path::new("graphics"))
            .expect("manifest should parse");
        assert_eq!(parsed, SpriteManifest::default_layout(Path::new("graphics")));
    }

    #[test]
    fn manifest_requires_all_known_keys() {
        let manifest = r#"
            version = 1

            [sprites]
            red_piece = "pieces/red_piece.png"
        "#;

        let result = SpriteManifest::parse(manifest, Path::new("assets"));
        assert!(result.is_err(), "manifest missing sprites should fail");
    }

    #[test]
    fn manifest_rejects_unknown_keys() {
        let manifest = format!("{FULL_MANIFEST}\n        green_piece = \"green.png\"\n");

        let result = SpriteManifest::parse(&manifest, Path::new("assets"));
        assert!(result.is_err(), "unknown keys must be rejected");
    }

    #[test]
    fn manifest_rejects_unsupported_versions() {
        let manifest = FULL_MANIFEST.replace("version = 1", "version = 2");

        let result = SpriteManifest::parse(&manifest, Path::new("assets"));
        assert!(result.is_err());
    }

    #[test]
    fn manifest_paths_resolve_relative_to_manifest_file() {
        let directory = tempfile::tempdir().expect("temporary directory");
        let path = directory.path().join("manifest.toml");
        let mut file = fs::File::create(&path).expect("create manifest");
        file.write_all(FULL_MANIFEST.as_bytes())
            .expect("write manifest");

        let manifest = SpriteManifest::from_path(&path).expect("manifest loads");

        assert_eq!(
            manifest.path(SpriteKey::RedTower),
            Some(directory.path().join("towers/red_tower.png").as_path())
        );
    }
}
