use crate::pack::resolver::CompatibilityResolver;
use crate::pack::store::{get_pack, upsert_pack};
use crate::pack::types::{
    CompatibilityTarget, MigrationBlocker, MigrationOutcome, MigrationSkip, Pack, PackItem, PackStoreV1,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationState {
    Idle,
    Validating,
    Aborted,
    Materializing,
    Done,
}

impl MigrationState {
    pub fn can_advance(self, next: MigrationState) -> bool {
        matches!(
            (self, next),
            (MigrationState::Idle, MigrationState::Validating)
                | (MigrationState::Idle, MigrationState::Done)
                | (MigrationState::Validating, MigrationState::Aborted)
                | (MigrationState::Validating, MigrationState::Materializing)
                | (MigrationState::Aborted, MigrationState::Done)
                | (MigrationState::Materializing, MigrationState::Done)
        )
    }
}

struct MigrationRun {
    state: MigrationState,
}

impl MigrationRun {
    fn new() -> Self {
        Self {
            state: MigrationState::Idle,
        }
    }

    fn advance(&mut self, next: MigrationState) -> Result<(), String> {
        if !self.state.can_advance(next) {
            return Err(format!(
                "illegal migration transition {:?} -> {:?}",
                self.state, next
            ));
        }
        self.state = next;
        Ok(())
    }
}

pub fn migrate_pack(
    store: &mut PackStoreV1,
    resolver: &CompatibilityResolver<'_>,
    pack_id: &str,
    target: &CompatibilityTarget,
) -> Result<MigrationOutcome, String> {
    let pack = get_pack(store, pack_id).ok_or_else(|| "Pack not found".to_string())?;
    let mut run = MigrationRun::new();

    if pack.target().same_as(target) {
        run.advance(MigrationState::Done)?;
        return Ok(MigrationOutcome::AlreadyCurrent { pack_id: pack.id });
    }

    run.advance(MigrationState::Validating)?;
    let blockers = validate_items(&pack, resolver, target);
    if !blockers.is_empty() {
        run.advance(MigrationState::Aborted)?;
        run.advance(MigrationState::Done)?;
        return Ok(MigrationOutcome::Blocked { blockers });
    }

    run.advance(MigrationState::Materializing)?;
    let (new_pack, skipped) = materialize(&pack, resolver, target);
    let new_pack_id = new_pack.id.clone();
    upsert_pack(store, new_pack);
    run.advance(MigrationState::Done)?;

    Ok(MigrationOutcome::Migrated { new_pack_id, skipped })
}

// Items without a mod reference always pass.
fn validate_items(
    pack: &Pack,
    resolver: &CompatibilityResolver<'_>,
    target: &CompatibilityTarget,
) -> Vec<MigrationBlocker> {
    let mut blockers = Vec::new();
    for item in &pack.items {
        let Some(mod_ref) = item.mod_ref.as_ref() else {
            continue;
        };
        if !resolver.has_compatible_file(mod_ref, target) {
            blockers.push(MigrationBlocker {
                mod_name: item.mod_name.clone(),
                requested_version: target.minecraft_version.clone(),
            });
        }
    }
    blockers
}

fn materialize(
    pack: &Pack,
    resolver: &CompatibilityResolver<'_>,
    target: &CompatibilityTarget,
) -> (Pack, Vec<MigrationSkip>) {
    let new_pack_id = format!("pack_{}", crate::now_millis());
    let mut items = Vec::new();
    let mut skipped = Vec::new();

    for (index, item) in pack.items.iter().enumerate() {
        let item_id = format!("item_{}_{}", new_pack_id, index);
        let Some(mod_ref) = item.mod_ref.as_ref() else {
            items.push(PackItem {
                id: item_id,
                mod_ref: None,
                file_id: item.file_id,
                mod_name: item.mod_name.clone(),
                mod_version: item.mod_version.clone(),
                sort_order: item.sort_order,
            });
            continue;
        };

        // Re-resolve; a miss here skips only this item.
        match resolver.latest_compatible_file(mod_ref, target) {
            Some(file) => {
                let label = if file.display_name.trim().is_empty() {
                    file.file_name.clone()
                } else {
                    file.display_name.clone()
                };
                items.push(PackItem {
                    id: item_id,
                    mod_ref: Some(mod_ref.clone()),
                    file_id: Some(file.id),
                    mod_name: item.mod_name.clone(),
                    mod_version: Some(label),
                    sort_order: item.sort_order,
                });
            }
            None => {
                tracing::warn!(
                    mod_name = %item.mod_name,
                    mod_id = %mod_ref.mod_id,
                    version = %target.minecraft_version,
                    "file vanished between validation and materialization, skipping item"
                );
                skipped.push(MigrationSkip {
                    mod_name: item.mod_name.clone(),
                    reason: format!(
                        "no file for {} at materialization time",
                        target.minecraft_version
                    ),
                });
            }
        }
    }

    let created_at = crate::now_iso();
    let new_pack = Pack {
        id: new_pack_id,
        name: format!("{} ({})", pack.name, target.minecraft_version),
        description: pack.description.clone(),
        minecraft_version: target.minecraft_version.clone(),
        loader: target.loader,
        created_at: created_at.clone(),
        updated_at: created_at,
        items,
    };

    (new_pack, skipped)
}
