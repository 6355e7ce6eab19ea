use crate::pack::types::{CandidateFile, ModReference};
use crate::registry::RegistryGateway;
use url::Url;

const FORGECDN_BASE: &str = "https://edge.forgecdn.net/files";

fn usable_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Url::parse(trimmed).ok().map(|u| u.to_string())
}

// Percent-encode the filename so characters like '+' survive the path.
fn constructed_cdn_url(file_id: i64, file_name: &str) -> Option<String> {
    let name = file_name.trim();
    if name.is_empty() || file_id <= 0 {
        return None;
    }
    let raw = format!(
        "{}/{}/{}/{}",
        FORGECDN_BASE,
        file_id / 1000,
        file_id % 1000,
        urlencoding::encode(name)
    );
    usable_url(&raw)
}

pub fn resolve_download_link(
    gateway: &dyn RegistryGateway,
    mod_ref: &ModReference,
    file_id: i64,
    known_file: Option<&CandidateFile>,
) -> Result<String, String> {
    let record = match known_file {
        Some(file) if file.id == file_id => Some(file.clone()),
        _ => match gateway.fetch_file(mod_ref, file_id) {
            Ok(file) => Some(file),
            Err(reason) => {
                tracing::warn!(mod_id = %mod_ref.mod_id, file_id, %reason, "file metadata fetch failed");
                None
            }
        },
    };

    if let Some(url) = record
        .as_ref()
        .and_then(|file| file.download_url.as_deref())
        .and_then(usable_url)
    {
        return Ok(url);
    }

    match gateway.resolve_download_url(mod_ref, file_id) {
        Ok(raw) => {
            if let Some(url) = usable_url(&raw) {
                return Ok(url);
            }
            tracing::warn!(mod_id = %mod_ref.mod_id, file_id, url = %raw, "download-url endpoint returned unusable value");
        }
        Err(reason) => {
            tracing::warn!(mod_id = %mod_ref.mod_id, file_id, %reason, "download-url endpoint failed");
        }
    }

    if let Some(url) = record
        .as_ref()
        .and_then(|file| constructed_cdn_url(file.id, &file.file_name))
    {
        return Ok(url);
    }

    Err(format!(
        "download unavailable for mod {} file {file_id}",
        mod_ref.mod_id
    ))
}
