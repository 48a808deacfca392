mod names;
mod types;

pub use names::{episode_file_name, season_folder_name};
pub use types::*;

use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::fs::{EntryKind, Filesystem};
use crate::matcher::{NameMatch, PatternTable};
use crate::scanner::{scan_entries, Entry, ScannerError};

/// A matched entry and the name it should end up with
struct Claim<'a> {
    entry: &'a Entry,
    destination: String,
}

/// Walk `root` and compute the ordered rename batch.
///
/// Season folders directly under the root are matched first; episode files
/// inside each matched folder follow. Every file rename of a season is emitted
/// before the rename of the season folder itself. Any naming collision fails
/// the whole build.
pub fn build_plan<F: Filesystem + ?Sized>(
    fs: &F,
    root: &Path,
    series: &str,
    table: &PatternTable,
) -> Result<Plan, PlanError> {
    info!(root = ?root, series, "Building rename plan");

    let top_level = scan_entries(fs, root, 1)?;
    let mut season_claims = Vec::new();
    let mut operations = Vec::new();

    for entry in top_level.iter().filter(|e| e.kind == EntryKind::Folder) {
        let Some(matched) = table.classify(&entry.name, entry.kind) else {
            debug!(name = %entry.name, "Skipping unknown folder");
            continue;
        };
        let NameMatch::Season { season, .. } = matched else {
            continue;
        };
        debug!(name = %entry.name, rule = matched.rule(), season, "Season folder");

        let files = scan_entries(fs, &entry.path, entry.depth + 1)?;
        let mut episode_claims = Vec::new();

        for file in files.iter().filter(|e| e.kind == EntryKind::File) {
            let Some(matched) = table.classify(&file.name, file.kind) else {
                debug!(name = %file.name, "Skipping file, no episode found");
                continue;
            };
            debug!(name = %file.name, rule = matched.rule(), "Episode file");
            let NameMatch::Episode {
                season: embedded,
                episode,
                extension,
                ..
            } = matched
            else {
                continue;
            };

            if let Some(embedded) = embedded.filter(|s| *s != season) {
                warn!(
                    file = %file.name,
                    embedded,
                    folder = season,
                    "Season in file name differs from folder, using folder season"
                );
            }

            episode_claims.push(Claim {
                entry: file,
                destination: episode_file_name(series, season, episode, &extension),
            });
        }

        check_collisions(fs, &entry.path, &episode_claims)?;
        push_operations(&mut operations, &episode_claims, root);

        let claim = Claim {
            entry,
            destination: season_folder_name(series, season),
        };
        push_operations(&mut operations, std::slice::from_ref(&claim), root);
        season_claims.push(claim);
    }

    check_collisions(fs, root, &season_claims)?;

    info!(
        operations = operations.len(),
        seasons = season_claims.len(),
        "Plan complete"
    );

    Ok(Plan::new(root.to_path_buf(), operations))
}

fn push_operations(operations: &mut Vec<Operation>, claims: &[Claim<'_>], root: &Path) {
    for claim in claims {
        if claim.entry.name == claim.destination {
            debug!(name = %claim.entry.name, "Already normalized");
            continue;
        }

        let op = Operation::new(
            claim.entry.path.clone(),
            &claim.destination,
            claim.entry.kind,
            claim.entry.depth,
        );

        info!(
            "Planned {} rename: {} -> {}",
            op.kind.label(),
            relative_to(root, &op.source),
            relative_to(root, &op.destination)
        );

        operations.push(op);
    }
}

/// Fails if two claims in `directory` share a destination, or a destination
/// is already taken by some other entry.
fn check_collisions<F: Filesystem + ?Sized>(
    fs: &F,
    directory: &Path,
    claims: &[Claim<'_>],
) -> Result<(), PlanError> {
    let mut by_destination: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for claim in claims {
        by_destination
            .entry(claim.destination.as_str())
            .or_default()
            .push(claim.entry.name.as_str());
    }

    if let Some((destination, sources)) = by_destination.iter().find(|(_, s)| s.len() > 1) {
        warn!(directory = ?directory, destination, ?sources, "Naming collision");
        return Err(PlanError::Collision {
            directory: directory.to_path_buf(),
            destination: destination.to_string(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
        });
    }

    for claim in claims.iter().filter(|c| c.entry.name != c.destination) {
        let occupied = fs
            .exists(&directory.join(&claim.destination))
            .map_err(|source| ScannerError::IoError {
                path: directory.join(&claim.destination),
                source,
            })?;

        if occupied {
            warn!(
                directory = ?directory,
                destination = %claim.destination,
                source = %claim.entry.name,
                "Destination already occupied"
            );
            return Err(PlanError::Collision {
                directory: directory.to_path_buf(),
                destination: claim.destination.clone(),
                sources: vec![claim.entry.name.clone(), claim.destination.clone()],
            });
        }
    }

    Ok(())
}
