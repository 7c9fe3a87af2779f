use anyhow::{Context, Result};
use std::path::Path;
use std::process;

use tastytabs_core::backup::{BackupSelection, ImageMode, backup_file_name};
use tastytabs_core::service::TastyService;

#[allow(clippy::fn_params_excessive_bools)]
pub(crate) fn cmd_backup(
    svc: &TastyService,
    dest: &Path,
    recipes: bool,
    vault: bool,
    notes: bool,
    include_images: bool,
    json: bool,
) -> Result<()> {
    // No flags means "everything" — an explicit empty selection is still
    // rejected by the core layer.
    let selection = if recipes || vault || notes {
        BackupSelection {
            recipes,
            vault,
            notes,
        }
    } else {
        BackupSelection::all()
    };
    let mode = if include_images {
        ImageMode::Inline
    } else {
        ImageMode::TextOnly
    };

    let outcome = svc.backup(selection, mode)?;
    let document = outcome.to_json()?;

    let path = if dest.is_dir() {
        dest.join(backup_file_name())
    } else {
        dest.to_path_buf()
    };
    std::fs::write(&path, &document)
        .with_context(|| format!("Failed to write backup: {}", path.display()))?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "path": path.display().to_string(),
                "recipes": selection.recipes,
                "vault": selection.vault,
                "notes": selection.notes,
                "images_inlined": outcome.images_inlined,
                "images_failed": outcome.images_failed,
            })
        );
    } else {
        println!("Backup written to {}", path.display());
        if include_images {
            println!("  Images embedded: {}", outcome.images_inlined);
        }
        if !outcome.images_failed.is_empty() {
            println!(
                "  {} image(s) couldn't be converted and were left as device paths:",
                outcome.images_failed.len()
            );
            for failed in &outcome.images_failed {
                println!("    {failed}");
            }
        }
    }

    Ok(())
}

pub(crate) fn cmd_restore(svc: &mut TastyService, file: &Path, json: bool) -> Result<()> {
    let input = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read backup file: {}", file.display()))?;

    let report = svc.restore(&input)?;

    if report.is_empty() {
        if json {
            println!("{}", serde_json::json!({ "error": "no valid data" }));
        } else {
            eprintln!("No valid data found in backup file — nothing was changed.");
        }
        process::exit(2);
    }

    if json {
        println!(
            "{}",
            serde_json::json!({
                "applied": report.applied,
                "skipped": report.skipped,
                "images_restored": report.images_restored,
                "image_errors": report.image_errors,
            })
        );
    } else {
        println!("Restore complete.");
        println!("  Applied: {}", report.applied.join(", "));
        if !report.skipped.is_empty() {
            println!("  Skipped (unusable): {}", report.skipped.join(", "));
        }
        if report.images_restored > 0 {
            println!("  Images restored: {}", report.images_restored);
        }
        if !report.image_errors.is_empty() {
            println!(
                "  {} image(s) couldn't be restored (those fields were cleared):",
                report.image_errors.len()
            );
            for error in &report.image_errors {
                println!("    {error}");
            }
        }
    }

    Ok(())
}
