use crate::error::ManifestError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;

/// The input document: a target game version and the mods to pin for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ModList {
    /// The game release the manifest is generated for, e.g. "1.17.1".
    pub minecraft_version: String,

    /// Mod references in the order they should appear in the manifest.
    pub mods: Vec<ModReference>,
}

impl ModList {
    /// Parses and validates a mod list document.
    pub fn from_json(text: &str) -> Result<Self, ManifestError> {
        let list: ModList = serde_json::from_str(text)?;
        list.validate()?;
        Ok(list)
    }

    /// Checks that every mod name is unique, since names become manifest keys.
    pub fn validate(&self) -> Result<(), ManifestError> {
        let mut seen = HashSet::new();
        for reference in &self.mods {
            if !seen.insert(reference.name.as_str()) {
                return Err(ManifestError::DuplicateName(reference.name.clone()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModSource {
    CurseForge,
    DirectUrl,
    Modrinth,
}

impl fmt::Display for ModSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModSource::CurseForge => "curseforge",
            ModSource::DirectUrl => "directurl",
            ModSource::Modrinth => "modrinth",
        })
    }
}

/// A provider specific identifier: a numeric catalog id, a slug or a url.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModValue {
    Number(i64),
    Text(String),
}

impl ModValue {
    /// The value as a numeric catalog id, if it is one or parses as one.
    ///
    /// Negative numbers are never valid catalog ids.
    pub fn as_numeric(&self) -> Option<u64> {
        match self {
            ModValue::Number(n) => u64::try_from(*n).ok(),
            ModValue::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ModValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModValue::Number(n) => write!(f, "{n}"),
            ModValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModReference {
    /// Manifest key. Unique within a [`ModList`].
    pub name: String,
    pub source: ModSource,
    pub value: ModValue,
    #[serde(default, deserialize_with = "null_as_false")]
    pub server: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub client: bool,
}

fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// A mod reference pinned to a concrete download and its digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedArtifact {
    pub name: String,
    pub client: bool,
    pub server: bool,
    pub download_url: String,
    pub content_hash: String,
}

/// The generated build manifest, one artifact per input reference in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub artifacts: Vec<ResolvedArtifact>,
}

impl Manifest {
    pub fn new(artifacts: Vec<ResolvedArtifact>) -> Self {
        Self { artifacts }
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Renders the manifest as a nix expression taking `pkgs`.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ pkgs }}:\n\n{{")?;
        for artifact in &self.artifacts {
            write!(
                f,
                "\n  {name} = {{\
                 \n    client = {client};\
                 \n    server = {server};\
                 \n    src = pkgs.fetchurl {{\
                 \n      url = {url};\
                 \n      sha256 = \"{hash}\";\
                 \n    }};\
                 \n  }};",
                name = artifact.name,
                client = artifact.client,
                server = artifact.server,
                url = artifact.download_url,
                hash = artifact.content_hash,
            )?;
        }
        writeln!(f, "\n}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(name: &str, client: bool, server: bool, url: &str, hash: &str) -> ResolvedArtifact {
        ResolvedArtifact {
            name: name.to_string(),
            client,
            server,
            download_url: url.to_string(),
            content_hash: hash.to_string(),
        }
    }

    #[test]
    fn parses_mixed_sources_and_defaults() {
        let list = ModList::from_json(
            r#"{
                "minecraftVersion": "1.17.1",
                "mods": [
                    { "name": "jei", "source": "curseforge", "value": 238222, "client": true },
                    { "name": "sodium", "source": "modrinth", "value": "AANobbMI", "server": null },
                    { "name": "extra", "source": "directurl", "value": "https://example.com/extra.jar", "server": true }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(list.minecraft_version, "1.17.1");
        assert_eq!(list.mods.len(), 3);
        assert_eq!(list.mods[0].source, ModSource::CurseForge);
        assert_eq!(list.mods[0].value, ModValue::Number(238222));
        assert!(list.mods[0].client);
        assert!(!list.mods[0].server);
        assert!(!list.mods[1].server);
        assert!(!list.mods[1].client);
        assert_eq!(list.mods[2].value.as_text(), "https://example.com/extra.jar");
        assert!(list.mods[2].server);
    }

    #[test]
    fn rejects_unknown_fields() {
        let top_level = ModList::from_json(r#"{ "minecraftVersion": "1.17.1", "mods": [], "extra": 1 }"#);
        assert!(matches!(top_level, Err(ManifestError::Parse(_))));

        let per_mod = ModList::from_json(
            r#"{ "minecraftVersion": "1.17.1", "mods": [
                { "name": "a", "source": "directurl", "value": "http://x", "sha": "nope" }
            ] }"#,
        );
        assert!(matches!(per_mod, Err(ManifestError::Parse(_))));
    }

    #[test]
    fn rejects_unknown_source_and_missing_fields() {
        let bad_source = ModList::from_json(
            r#"{ "minecraftVersion": "1.17.1", "mods": [
                { "name": "a", "source": "github", "value": "x" }
            ] }"#,
        );
        assert!(matches!(bad_source, Err(ManifestError::Parse(_))));

        let missing_version = ModList::from_json(r#"{ "mods": [] }"#);
        assert!(matches!(missing_version, Err(ManifestError::Parse(_))));
    }

    #[test]
    fn rejects_duplicate_names() {
        let result = ModList::from_json(
            r#"{ "minecraftVersion": "1.17.1", "mods": [
                { "name": "a", "source": "directurl", "value": "http://x/1.jar" },
                { "name": "a", "source": "directurl", "value": "http://x/2.jar" }
            ] }"#,
        );
        assert!(matches!(result, Err(ManifestError::DuplicateName(name)) if name == "a"));
    }

    #[test]
    fn value_coercion() {
        assert_eq!(ModValue::Number(42).as_numeric(), Some(42));
        assert_eq!(ModValue::Text("42".into()).as_numeric(), Some(42));
        assert_eq!(ModValue::Text("sodium".into()).as_numeric(), None);
        assert_eq!(ModValue::Number(42).as_text(), "42");
        assert_eq!(ModValue::Number(-3).as_numeric(), None);
        assert_eq!(ModValue::Text("-3".into()).as_numeric(), None);
    }

    #[test]
    fn negative_ids_are_parsed_not_rejected() {
        let list = ModList::from_json(
            r#"{ "minecraftVersion": "1.17.1", "mods": [
                { "name": "a", "source": "curseforge", "value": -12 }
            ] }"#,
        )
        .unwrap();
        assert_eq!(list.mods[0].value, ModValue::Number(-12));
    }

    #[test]
    fn renders_records_in_order() {
        let manifest = Manifest::new(vec![
            artifact("a", true, false, "http://x/y.jar", "HASH_A"),
            artifact("b", false, true, "http://x/z.jar", "HASH_B"),
        ]);

        let expected = r#"{ pkgs }:

{
  a = {
    client = true;
    server = false;
    src = pkgs.fetchurl {
      url = http://x/y.jar;
      sha256 = "HASH_A";
    };
  };
  b = {
    client = false;
    server = true;
    src = pkgs.fetchurl {
      url = http://x/z.jar;
      sha256 = "HASH_B";
    };
  };
}
"#;
        assert_eq!(manifest.render(), expected);
    }

    #[test]
    fn renders_empty_manifest() {
        assert_eq!(Manifest::default().render(), "{ pkgs }:\n\n{\n}\n");
    }
}
