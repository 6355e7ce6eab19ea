use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Loader {
    Forge,
    Fabric,
    Quilt,
    Neoforge,
}

impl Loader {
    pub fn as_str(&self) -> &'static str {
        match self {
            Loader::Forge => "forge",
            Loader::Fabric => "fabric",
            Loader::Quilt => "quilt",
            Loader::Neoforge => "neoforge",
        }
    }

    pub fn parse(raw: &str) -> Option<Loader> {
        match raw.trim().to_lowercase().as_str() {
            "forge" => Some(Loader::Forge),
            "fabric" => Some(Loader::Fabric),
            "quilt" => Some(Loader::Quilt),
            "neoforge" | "neo forge" | "neo-forge" => Some(Loader::Neoforge),
            _ => None,
        }
    }
}

impl fmt::Display for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModReference {
    pub mod_id: String,
    #[serde(default)]
    pub slug: Option<String>,
}

impl ModReference {
    pub fn new(mod_id: impl Into<String>) -> Self {
        Self {
            mod_id: mod_id.into(),
            slug: None,
        }
    }

    pub fn numeric_id(&self) -> Result<i64, String> {
        self.mod_id
            .trim()
            .trim_start_matches("cf:")
            .parse::<i64>()
            .map_err(|_| format!("mod id '{}' is not numeric", self.mod_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityTarget {
    pub minecraft_version: String,
    pub loader: Loader,
}

impl CompatibilityTarget {
    pub fn new(minecraft_version: impl Into<String>, loader: Loader) -> Self {
        Self {
            minecraft_version: minecraft_version.into(),
            loader,
        }
    }

    pub fn same_as(&self, other: &CompatibilityTarget) -> bool {
        self.loader == other.loader
            && crate::pack::resolver::normalize_version_str(&self.minecraft_version)
                == crate::pack::resolver::normalize_version_str(&other.minecraft_version)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackItem {
    pub id: String,
    #[serde(default)]
    pub mod_ref: Option<ModReference>,
    #[serde(default)]
    pub file_id: Option<i64>,
    pub mod_name: String,
    #[serde(default)]
    pub mod_version: Option<String>,
    pub sort_order: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub minecraft_version: String,
    pub loader: Loader,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub items: Vec<PackItem>,
}

impl Pack {
    pub fn target(&self) -> CompatibilityTarget {
        CompatibilityTarget::new(self.minecraft_version.clone(), self.loader)
    }
}

// gameVersions arrives as string array, object array or bare scalar; old
// payloads use the singular gameVersion key instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateFile {
    pub id: i64,
    #[serde(default)]
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(default)]
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(default)]
    #[serde(rename = "fileDate")]
    pub release_date: Option<String>,
    #[serde(default)]
    #[serde(rename = "fileLength")]
    pub file_length: Option<u64>,
    #[serde(default)]
    #[serde(rename = "downloadUrl")]
    pub download_url: Option<String>,
    #[serde(default)]
    #[serde(rename = "gameVersions")]
    pub game_versions: Value,
    #[serde(default)]
    #[serde(rename = "gameVersion")]
    pub game_version: Option<Value>,
    #[serde(default)]
    pub dependencies: Vec<FileDependency>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDependency {
    #[serde(rename = "modId")]
    pub mod_id: i64,
    #[serde(default)]
    #[serde(rename = "relationType")]
    pub relation_type: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationBlocker {
    pub mod_name: String,
    pub requested_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationSkip {
    pub mod_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MigrationOutcome {
    AlreadyCurrent {
        pack_id: String,
    },
    Blocked {
        blockers: Vec<MigrationBlocker>,
    },
    Migrated {
        new_pack_id: String,
        #[serde(default)]
        skipped: Vec<MigrationSkip>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkUpdateReport {
    pub pack_id: String,
    pub updated_items: usize,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackStoreV1 {
    pub version: u32,
    #[serde(default)]
    pub packs: Vec<Pack>,
}

impl Default for PackStoreV1 {
    fn default() -> Self {
        Self {
            version: 1,
            packs: vec![],
        }
    }
}
