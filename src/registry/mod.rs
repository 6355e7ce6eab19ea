pub mod cache;
pub mod curseforge;
pub mod download;

use crate::pack::types::{CandidateFile, CompatibilityTarget, ModReference};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModSummary {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub summary: String,
}

pub trait RegistryGateway {
    fn search(&self, query: &str) -> Result<Vec<ModSummary>, String>;

    // A failed listing reads as empty; exact version matching happens in the
    // resolver, not here.
    fn list_files(&self, mod_ref: &ModReference, target: &CompatibilityTarget) -> Vec<CandidateFile>;

    fn fetch_file(&self, mod_ref: &ModReference, file_id: i64) -> Result<CandidateFile, String>;

    fn resolve_download_url(&self, mod_ref: &ModReference, file_id: i64) -> Result<String, String>;
}
