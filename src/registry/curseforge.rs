use crate::pack::types::{CandidateFile, CompatibilityTarget, Loader, ModReference};
use crate::registry::cache::{CacheKey, FileListCache};
use crate::registry::{ModSummary, RegistryGateway};
use reqwest::blocking::Client;
use serde::Deserialize;

const CURSEFORGE_API_BASE: &str = "https://api.curseforge.com/v1";
const GAME_ID_MINECRAFT: i64 = 432;
const FILES_PAGE_SIZE: u32 = 50;
const SEARCH_PAGE_SIZE: u32 = 30;

fn curseforge_api_base() -> String {
    std::env::var("MODSHELF_CURSEFORGE_API_BASE")
        .ok()
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| CURSEFORGE_API_BASE.to_string())
}

fn mod_loader_type(loader: Loader) -> u8 {
    match loader {
        Loader::Forge => 1,
        Loader::Fabric => 4,
        Loader::Quilt => 5,
        Loader::Neoforge => 6,
    }
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

pub struct CurseforgeGateway {
    client: Client,
    api_key: String,
    api_base: String,
    cache: Box<dyn FileListCache>,
}

impl CurseforgeGateway {
    pub fn new(api_key: &str, cache: Box<dyn FileListCache>) -> Result<Self, String> {
        Ok(Self {
            client: crate::build_http_client()?,
            api_key: api_key.trim().to_string(),
            api_base: curseforge_api_base(),
            cache,
        })
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T, String> {
        let resp = self
            .client
            .get(url)
            .query(query)
            .header("Accept", "application/json")
            .header("x-api-key", &self.api_key)
            .send()
            .map_err(|e| format!("registry request failed for {url}: {e}"))?;
        if !resp.status().is_success() {
            return Err(format!("registry request for {url} failed with status {}", resp.status()));
        }
        resp.json::<T>()
            .map_err(|e| format!("parse registry response for {url} failed: {e}"))
    }

    fn list_files_uncached(
        &self,
        mod_ref: &ModReference,
        target: &CompatibilityTarget,
    ) -> Result<Vec<CandidateFile>, String> {
        let mod_id = mod_ref.numeric_id()?;
        let url = format!("{}/mods/{}/files", self.api_base, mod_id);
        let query = [
            ("gameVersion", target.minecraft_version.clone()),
            ("modLoaderType", mod_loader_type(target.loader).to_string()),
            ("pageSize", FILES_PAGE_SIZE.to_string()),
        ];
        let envelope: DataEnvelope<Vec<CandidateFile>> = self.get_json(&url, &query)?;
        Ok(envelope.data)
    }
}

impl RegistryGateway for CurseforgeGateway {
    fn search(&self, query: &str) -> Result<Vec<ModSummary>, String> {
        let url = format!("{}/mods/search", self.api_base);
        let params = [
            ("gameId", GAME_ID_MINECRAFT.to_string()),
            ("searchFilter", query.trim().to_string()),
            ("pageSize", SEARCH_PAGE_SIZE.to_string()),
        ];
        let envelope: DataEnvelope<Vec<ModSummary>> = self.get_json(&url, &params)?;
        Ok(envelope.data)
    }

    fn list_files(&self, mod_ref: &ModReference, target: &CompatibilityTarget) -> Vec<CandidateFile> {
        let key = CacheKey::new(
            mod_ref.mod_id.clone(),
            target.minecraft_version.clone(),
            target.loader,
        );
        if let Some(cached) = self.cache.get(&key) {
            return cached;
        }

        match self.list_files_uncached(mod_ref, target) {
            Ok(files) => {
                self.cache.put(key, files.clone());
                files
            }
            Err(reason) => {
                tracing::warn!(
                    mod_id = %mod_ref.mod_id,
                    version = %target.minecraft_version,
                    loader = %target.loader,
                    %reason,
                    "file listing failed, treating as empty"
                );
                vec![]
            }
        }
    }

    fn fetch_file(&self, mod_ref: &ModReference, file_id: i64) -> Result<CandidateFile, String> {
        let mod_id = mod_ref.numeric_id()?;
        let url = format!("{}/mods/{}/files/{}", self.api_base, mod_id, file_id);
        let envelope: DataEnvelope<CandidateFile> = self.get_json(&url, &[])?;
        Ok(envelope.data)
    }

    fn resolve_download_url(&self, mod_ref: &ModReference, file_id: i64) -> Result<String, String> {
        let mod_id = mod_ref.numeric_id()?;
        let url = format!("{}/mods/{}/files/{}/download-url", self.api_base, mod_id, file_id);
        let envelope: DataEnvelope<String> = self.get_json(&url, &[])?;
        let resolved = envelope.data.trim().to_string();
        if resolved.is_empty() {
            return Err(format!("registry returned no download url for file {file_id}"));
        }
        Ok(resolved)
    }
}
