use crate::pack::types::{CandidateFile, CompatibilityTarget, ModReference};
use crate::registry::RegistryGateway;
use chrono::{DateTime, FixedOffset};
use serde_json::Value;

pub fn normalize_version_str(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(idx) = trimmed.find('-') {
        let head = trimmed[..idx].trim();
        if looks_like_numeric_version(head) {
            return Some(head.to_string());
        }
    }
    Some(trimmed.to_string())
}

fn looks_like_numeric_version(text: &str) -> bool {
    !text.is_empty() && text.split('.').all(|group| !group.is_empty() && group.chars().all(|c| c.is_ascii_digit()))
}

pub fn normalize_version_token(token: &Value) -> Option<String> {
    match token {
        Value::String(text) => normalize_version_str(text),
        Value::Object(map) => ["versionString", "name", "gameVersion"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str).and_then(normalize_version_str)),
        _ => None,
    }
}

pub fn advertised_versions(file: &CandidateFile) -> Vec<String> {
    let source = if file.game_versions.is_null() {
        file.game_version.clone().unwrap_or(Value::Null)
    } else {
        file.game_versions.clone()
    };

    match source {
        Value::Null => vec![],
        Value::Array(items) => items.iter().filter_map(normalize_version_token).collect(),
        other => normalize_version_token(&other).into_iter().collect(),
    }
}

pub fn compatible_files(files: Vec<CandidateFile>, target: &CompatibilityTarget) -> Vec<CandidateFile> {
    let Some(wanted) = normalize_version_str(&target.minecraft_version) else {
        return vec![];
    };
    files
        .into_iter()
        .filter(|file| advertised_versions(file).iter().any(|v| v == &wanted))
        .collect()
}

fn release_instant(file: &CandidateFile) -> Option<DateTime<FixedOffset>> {
    file.release_date
        .as_deref()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw.trim()).ok())
}

// Upstream dates can be date-only; ids break same-day ties.
pub fn select_latest(files: &[CandidateFile]) -> Option<&CandidateFile> {
    files.iter().max_by_key(|file| (release_instant(file), file.id))
}

pub struct CompatibilityResolver<'a> {
    gateway: &'a dyn RegistryGateway,
}

impl<'a> CompatibilityResolver<'a> {
    pub fn new(gateway: &'a dyn RegistryGateway) -> Self {
        Self { gateway }
    }

    pub fn has_compatible_file(&self, mod_ref: &ModReference, target: &CompatibilityTarget) -> bool {
        let files = self.gateway.list_files(mod_ref, target);
        !compatible_files(files, target).is_empty()
    }

    pub fn latest_compatible_file(
        &self,
        mod_ref: &ModReference,
        target: &CompatibilityTarget,
    ) -> Option<CandidateFile> {
        let files = self.gateway.list_files(mod_ref, target);
        let matching = compatible_files(files, target);
        select_latest(&matching).cloned()
    }
}
