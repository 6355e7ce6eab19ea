use crate::pack::types::{Pack, PackStoreV1};
use std::fs;
use std::path::{Path, PathBuf};

const STORE_FILE: &str = "store.v1.json";

pub fn store_path(data_dir: &Path) -> PathBuf {
    data_dir.join(STORE_FILE)
}

fn ensure_parent(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("mkdir pack store dir failed: {e}"))?;
    }
    Ok(())
}

pub fn read_store(data_dir: &Path) -> Result<PackStoreV1, String> {
    let path = store_path(data_dir);
    if !path.exists() {
        return Ok(PackStoreV1::default());
    }
    let raw = fs::read_to_string(&path).map_err(|e| format!("read pack store failed: {e}"))?;
    let mut store: PackStoreV1 =
        serde_json::from_str(&raw).map_err(|e| format!("parse pack store failed: {e}"))?;
    if store.version == 0 {
        store.version = 1;
    }
    Ok(store)
}

pub fn write_store(data_dir: &Path, store: &PackStoreV1) -> Result<(), String> {
    let path = store_path(data_dir);
    ensure_parent(&path)?;
    let mut next = store.clone();
    next.version = 1;
    let raw =
        serde_json::to_string_pretty(&next).map_err(|e| format!("serialize pack store failed: {e}"))?;
    fs::write(&path, raw).map_err(|e| format!("write pack store failed: {e}"))
}

pub fn get_pack(store: &PackStoreV1, pack_id: &str) -> Option<Pack> {
    store.packs.iter().find(|p| p.id == pack_id).cloned()
}

pub fn upsert_pack(store: &mut PackStoreV1, pack: Pack) {
    if let Some(found) = store.packs.iter_mut().find(|p| p.id == pack.id) {
        *found = pack;
    } else {
        store.packs.push(pack);
    }
    store
        .packs
        .sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
}

pub fn remove_pack(store: &mut PackStoreV1, pack_id: &str) {
    store.packs.retain(|p| p.id != pack_id);
}
