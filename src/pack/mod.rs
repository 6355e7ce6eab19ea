pub mod migration;
pub mod resolver;
pub mod store;
pub mod types;

use crate::pack::migration::migrate_pack;
use crate::pack::resolver::CompatibilityResolver;
use crate::pack::store::{get_pack, read_store, remove_pack, upsert_pack, write_store};
use crate::pack::types::{
    BulkUpdateReport, CompatibilityTarget, Loader, MigrationOutcome, ModReference, Pack, PackItem,
};
use crate::registry::RegistryGateway;
use std::path::Path;

pub fn list_packs(data_dir: &Path) -> Result<Vec<Pack>, String> {
    let store = read_store(data_dir)?;
    Ok(store.packs)
}

pub fn get_pack_by_id(data_dir: &Path, pack_id: &str) -> Result<Pack, String> {
    let store = read_store(data_dir)?;
    get_pack(&store, pack_id).ok_or_else(|| "Pack not found".to_string())
}

pub fn create_pack(
    data_dir: &Path,
    name: &str,
    minecraft_version: &str,
    loader: &str,
    description: Option<String>,
) -> Result<Pack, String> {
    let clean_name = name.trim();
    if clean_name.is_empty() {
        return Err("Pack name is required".to_string());
    }
    let clean_version = minecraft_version.trim();
    if clean_version.is_empty() {
        return Err("Minecraft version is required".to_string());
    }
    let loader = Loader::parse(loader).ok_or_else(|| format!("Unknown loader '{}'", loader.trim()))?;

    let created_at = crate::now_iso();
    let pack = Pack {
        id: format!("pack_{}", crate::now_millis()),
        name: clean_name.to_string(),
        description: description.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()),
        minecraft_version: clean_version.to_string(),
        loader,
        created_at: created_at.clone(),
        updated_at: created_at,
        items: vec![],
    };

    let mut store = read_store(data_dir)?;
    upsert_pack(&mut store, pack.clone());
    write_store(data_dir, &store)?;
    Ok(pack)
}

pub fn duplicate_pack(data_dir: &Path, pack_id: &str, new_name: Option<String>) -> Result<Pack, String> {
    let mut store = read_store(data_dir)?;
    let source = get_pack(&store, pack_id).ok_or_else(|| "Pack not found".to_string())?;

    let mut clone = source;
    clone.id = format!("pack_{}", crate::now_millis());
    clone.name = new_name
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| format!("{} copy", clone.name));
    clone.created_at = crate::now_iso();
    clone.updated_at = clone.created_at.clone();
    for (index, item) in clone.items.iter_mut().enumerate() {
        item.id = format!("item_{}_{}", clone.id, index);
    }

    upsert_pack(&mut store, clone.clone());
    write_store(data_dir, &store)?;
    Ok(clone)
}

pub fn delete_pack(data_dir: &Path, pack_id: &str) -> Result<bool, String> {
    let mut store = read_store(data_dir)?;
    let before = store.packs.len();
    remove_pack(&mut store, pack_id);
    let removed = store.packs.len() < before;
    if removed {
        write_store(data_dir, &store)?;
    }
    Ok(removed)
}

pub fn add_registry_item(
    data_dir: &Path,
    pack_id: &str,
    mod_ref: ModReference,
    mod_name: &str,
) -> Result<Pack, String> {
    add_item_inner(data_dir, pack_id, Some(mod_ref), mod_name, None)
}

pub fn add_custom_item(
    data_dir: &Path,
    pack_id: &str,
    mod_name: &str,
    mod_version: Option<String>,
) -> Result<Pack, String> {
    add_item_inner(data_dir, pack_id, None, mod_name, mod_version)
}

fn add_item_inner(
    data_dir: &Path,
    pack_id: &str,
    mod_ref: Option<ModReference>,
    mod_name: &str,
    mod_version: Option<String>,
) -> Result<Pack, String> {
    let clean_name = mod_name.trim();
    if clean_name.is_empty() {
        return Err("Mod name is required".to_string());
    }

    let mut store = read_store(data_dir)?;
    let mut pack = get_pack(&store, pack_id).ok_or_else(|| "Pack not found".to_string())?;

    let next_order = pack.items.iter().map(|i| i.sort_order).max().unwrap_or(0) + 1;
    pack.items.push(PackItem {
        id: format!("item_{}_{}", crate::now_millis(), next_order),
        mod_ref,
        file_id: None,
        mod_name: clean_name.to_string(),
        mod_version: mod_version.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()),
        sort_order: next_order,
    });
    pack.updated_at = crate::now_iso();

    upsert_pack(&mut store, pack.clone());
    write_store(data_dir, &store)?;
    Ok(pack)
}

pub fn remove_item(data_dir: &Path, pack_id: &str, item_id: &str) -> Result<Pack, String> {
    let mut store = read_store(data_dir)?;
    let mut pack = get_pack(&store, pack_id).ok_or_else(|| "Pack not found".to_string())?;

    let before = pack.items.len();
    pack.items.retain(|i| i.id != item_id);
    if pack.items.len() == before {
        return Err("Pack item not found".to_string());
    }

    // Keep sort order dense after removal.
    pack.items.sort_by_key(|i| i.sort_order);
    for (index, item) in pack.items.iter_mut().enumerate() {
        item.sort_order = index as u32 + 1;
    }
    pack.updated_at = crate::now_iso();

    upsert_pack(&mut store, pack.clone());
    write_store(data_dir, &store)?;
    Ok(pack)
}

pub fn update_items_to_latest(
    data_dir: &Path,
    gateway: &dyn RegistryGateway,
    pack_id: &str,
) -> Result<BulkUpdateReport, String> {
    let mut store = read_store(data_dir)?;
    let mut pack = get_pack(&store, pack_id).ok_or_else(|| "Pack not found".to_string())?;
    let target = pack.target();
    let resolver = CompatibilityResolver::new(gateway);

    let mut updated_items = 0usize;
    let mut warnings = Vec::new();
    for item in &mut pack.items {
        let Some(mod_ref) = item.mod_ref.as_ref() else {
            continue;
        };
        match resolver.latest_compatible_file(mod_ref, &target) {
            Some(file) => {
                // Already on the latest file; leave the pin and label alone.
                if item.file_id == Some(file.id) {
                    continue;
                }
                item.file_id = Some(file.id);
                item.mod_version = Some(if file.display_name.trim().is_empty() {
                    file.file_name.clone()
                } else {
                    file.display_name.clone()
                });
                updated_items += 1;
            }
            None => warnings.push(format!(
                "No file for '{}' at {} {}; keeping current pin.",
                item.mod_name, target.loader, target.minecraft_version
            )),
        }
    }

    if updated_items > 0 {
        pack.updated_at = crate::now_iso();
        upsert_pack(&mut store, pack);
        write_store(data_dir, &store)?;
    }

    Ok(BulkUpdateReport {
        pack_id: pack_id.to_string(),
        updated_items,
        warnings,
    })
}

// Blocked and already-current runs leave the store file untouched.
pub fn migrate_pack_to_target(
    data_dir: &Path,
    gateway: &dyn RegistryGateway,
    pack_id: &str,
    target: &CompatibilityTarget,
) -> Result<MigrationOutcome, String> {
    let mut store = read_store(data_dir)?;
    let resolver = CompatibilityResolver::new(gateway);
    let outcome = migrate_pack(&mut store, &resolver, pack_id, target)?;
    if matches!(outcome, MigrationOutcome::Migrated { .. }) {
        write_store(data_dir, &store)?;
    }
    Ok(outcome)
}
