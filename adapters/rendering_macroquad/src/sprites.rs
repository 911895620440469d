use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use macroquad::{
    color::WHITE,
    math::Vec2 as MacroquadVec2,
    texture::{self, DrawTextureParams, Texture2D},
};
use space_shooter_rendering::{Rect, SpriteKey};

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Cache of textures loaded from the sprite manifest.
///
/// Every entry is optional. Sprites that are not listed, or that fail to load,
/// are simply absent and the painters fall back to procedural shapes.
#[derive(Debug, Default)]
pub(crate) struct SpriteAtlas {
    textures: HashMap<SpriteKey, Texture2D>,
}

impl SpriteAtlas {
    /// Manifest location used when none is configured.
    #[must_use]
    pub(crate) fn default_manifest_path() -> PathBuf {
        PathBuf::from("assets/manifest.toml")
    }

    /// Loads sprites from the manifest located at the provided path.
    pub(crate) fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_manifest_with_loader(path, default_loader)
    }

    /// Stretches the sprite over `rect`, returning whether it was available.
    pub(crate) fn draw(&self, key: SpriteKey, rect: Rect) -> bool {
        let Some(texture) = self.textures.get(&key).copied() else {
            return false;
        };

        let params = DrawTextureParams {
            dest_size: Some(MacroquadVec2::new(rect.width, rect.height)),
            ..DrawTextureParams::default()
        };
        texture::draw_texture_ex(texture, rect.x, rect.y, WHITE, params);
        true
    }

    #[cfg(test)]
    fn contains(&self, key: SpriteKey) -> bool {
        self.textures.contains_key(&key)
    }

    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.textures.len()
    }

    fn from_manifest_with_loader(
        path: impl AsRef<Path>,
        mut loader: impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read sprite manifest at {}",
                manifest_path.display()
            )
        })?;
        let base = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let entries = parse_manifest(&contents, &base)?;
        Ok(Self::from_entries(entries, &mut loader))
    }

    fn from_entries(
        entries: Vec<(SpriteKey, PathBuf)>,
        loader: &mut impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Self {
        let mut textures = HashMap::with_capacity(entries.len());
        for (key, path) in entries {
            match loader(key, &path) {
                Ok(texture) => {
                    let _ = textures.insert(key, texture);
                }
                Err(error) => tracing::warn!(
                    sprite = key.as_str(),
                    path = %path.display(),
                    error = %format!("{error:#}"),
                    "sprite failed to load; drawing procedurally"
                ),
            }
        }
        Self { textures }
    }
}

fn default_loader(_key: SpriteKey, path: &Path) -> Result<Texture2D> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read sprite asset at {}", path.display()))?;
    Ok(Texture2D::from_file_with_format(&bytes, None))
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    version: u32,
    #[serde(default)]
    sprites: HashMap<String, String>,
}

fn parse_manifest(contents: &str, base_path: &Path) -> Result<Vec<(SpriteKey, PathBuf)>> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse sprite manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported sprite manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let mut resolved = HashMap::with_capacity(manifest.sprites.len());
    for (name, relative_path) in manifest.sprites {
        let key = parse_sprite_key(&name)?;
        let _ = resolved.insert(key, base_path.join(relative_path));
    }

    Ok(SpriteKey::ALL
        .into_iter()
        .filter_map(|key| resolved.remove(&key).map(|path| (key, path)))
        .collect())
}

fn parse_sprite_key(name: &str) -> Result<SpriteKey> {
    match SpriteKey::ALL.into_iter().find(|key| key.as_str() == name) {
        Some(key) => Ok(key),
        None => bail!("unknown sprite key `{name}` in manifest"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn manifest_entries_are_optional() {
        let manifest = r#"
            version = 1

            [sprites]
            Boss = "ships/boss.png"
        "#;

        let parsed = parse_manifest(manifest, Path::new("assets")).expect("manifest should parse");
        assert_eq!(
            parsed,
            vec![(SpriteKey::Boss, PathBuf::from("assets/ships/boss.png"))]
        );
    }

    #[test]
    fn manifest_without_sprite_table_is_empty() {
        let parsed = parse_manifest("version = 1", Path::new("assets")).expect("manifest parses");
        assert!(parsed.is_empty());
    }

    #[test]
    fn manifest_rejects_unknown_keys() {
        let manifest = r#"
            version = 1

            [sprites]
            PlayerShip = "ships/player.png"
            Mothership = "ships/mother.png"
        "#;

        let error = parse_manifest(manifest, Path::new("assets")).expect_err("unknown key");
        assert!(format!("{error:#}").contains("Mothership"));
    }

    #[test]
    fn manifest_rejects_unknown_top_level_fields() {
        let manifest = r#"
            version = 1
            scale = 2
        "#;

        assert!(parse_manifest(manifest, Path::new("assets")).is_err());
    }

    #[test]
    fn manifest_rejects_unsupported_versions() {
        let error = parse_manifest("version = 2", Path::new("assets")).expect_err("version");
        assert!(format!("{error:#}").contains("unsupported sprite manifest version 2"));
    }

    #[test]
    fn entries_resolve_in_canonical_order() {
        let manifest = r#"
            version = 1

            [sprites]
            EnemyRocket = "rockets/enemy.png"
            PlayerShip = "ships/player.png"
            PlayerRocket = "rockets/player.png"
        "#;

        let parsed = parse_manifest(manifest, Path::new("root")).expect("manifest should parse");
        let keys: Vec<_> = parsed.iter().map(|(key, _)| *key).collect();
        assert_eq!(
            keys,
            vec![
                SpriteKey::PlayerShip,
                SpriteKey::PlayerRocket,
                SpriteKey::EnemyRocket
            ]
        );
    }

    #[test]
    fn failed_sprites_are_skipped_without_failing_the_atlas() {
        let entries = vec![
            (SpriteKey::PlayerShip, PathBuf::from("player.png")),
            (SpriteKey::EnemyShip, PathBuf::from("missing.png")),
        ];
        let attempts = RefCell::new(Vec::new());
        let atlas = SpriteAtlas::from_entries(entries, &mut |key, _| {
            attempts.borrow_mut().push(key);
            if key == SpriteKey::EnemyShip {
                bail!("decode failed");
            }
            Ok(Texture2D::empty())
        });

        assert_eq!(
            attempts.into_inner(),
            vec![SpriteKey::PlayerShip, SpriteKey::EnemyShip]
        );
        assert_eq!(atlas.len(), 1);
        assert!(atlas.contains(SpriteKey::PlayerShip));
        assert!(!atlas.contains(SpriteKey::EnemyShip));
    }

    #[test]
    fn missing_manifest_reports_its_path() {
        let error = SpriteAtlas::from_manifest_path("does/not/exist.toml").expect_err("missing");
        assert!(format!("{error:#}").contains("does/not/exist.toml"));
    }
}
