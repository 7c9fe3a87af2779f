use anyhow::{Result, bail};

use tastytabs_core::service::TastyService;

use super::helpers::prompt_confirm;

/// Clear selected stores. Personal-recipe image files are deleted from
/// disk before the store itself is emptied so nothing orphaned is left
/// behind.
#[allow(clippy::fn_params_excessive_bools)]
pub(crate) fn cmd_storage_clear(
    svc: &mut TastyService,
    recipes: bool,
    vault: bool,
    notes: bool,
    all: bool,
    json: bool,
) -> Result<()> {
    let (recipes, vault, notes) = if all {
        (true, true, true)
    } else {
        (recipes, vault, notes)
    };
    if !(recipes || vault || notes) {
        bail!("Nothing selected. Use --recipes, --vault, --notes, or --all");
    }

    let mut targets = Vec::new();
    if recipes {
        targets.push(format!("{} personal recipes", svc.personal_recipes().len()));
    }
    if vault {
        targets.push(format!("{} vault entries", svc.vault().len()));
    }
    if notes {
        targets.push(format!("{} notes", svc.notes().len()));
    }

    if !prompt_confirm(&format!(
        "Delete {}? This can't be undone.",
        targets.join(", ")
    ))? {
        println!("Cancelled");
        return Ok(());
    }

    let mut cleared = Vec::new();
    if recipes {
        svc.clear_personal_recipes()?;
        cleared.push("recipes");
    }
    if vault {
        svc.clear_vault()?;
        cleared.push("vault");
    }
    if notes {
        svc.clear_all_notes()?;
        cleared.push("notes");
    }

    if json {
        println!("{}", serde_json::json!({ "cleared": cleared }));
    } else {
        println!("Cleared: {}", cleared.join(", "));
    }

    Ok(())
}
