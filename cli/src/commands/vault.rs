use anyhow::Result;
use std::process;

use crate::mealdb::TheMealDbClient;
use tastytabs_core::models::Meal;
use tastytabs_core::service::TastyService;
use tastytabs_core::stores::VaultChange;

use super::helpers::{print_meal_table, prompt_confirm};

pub(crate) async fn cmd_vault_toggle(
    svc: &mut TastyService,
    client: &TheMealDbClient,
    id: &str,
    json: bool,
) -> Result<()> {
    // Removing needs no fetch — the vault already holds the snapshot.
    let meal = if let Some(stored) = svc.vault().iter().find(|m| m.id == id) {
        stored.clone()
    } else if let Some(cached) = svc.cache().get(id).filter(|m| m.instructions.is_some()) {
        cached.clone()
    } else {
        match client.lookup_async(id).await? {
            Some(meal) => meal,
            None => {
                eprintln!("No meal found with id '{id}'");
                process::exit(2);
            }
        }
    };

    let change = svc.toggle_vault(&meal)?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "id": meal.id,
                "name": meal.name,
                "in_vault": change == VaultChange::Added,
            })
        );
    } else {
        match change {
            VaultChange::Added => println!("Added '{}' to your vault", meal.name),
            VaultChange::Removed => println!("Removed '{}' from your vault", meal.name),
        }
    }

    Ok(())
}

pub(crate) fn cmd_vault_list(svc: &TastyService, json: bool) -> Result<()> {
    let meals = svc.vault();

    if meals.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("Your vault is empty");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(meals)?);
    } else {
        let refs: Vec<&Meal> = meals.iter().collect();
        print_meal_table(&refs);
    }

    Ok(())
}

pub(crate) fn cmd_vault_clear(svc: &mut TastyService, json: bool) -> Result<()> {
    let count = svc.vault().len();
    if count == 0 {
        println!("Your vault is already empty");
        return Ok(());
    }

    if !prompt_confirm(&format!("Delete all {count} vault entries? This can't be undone."))? {
        println!("Cancelled");
        return Ok(());
    }

    svc.clear_vault()?;

    if json {
        println!("{}", serde_json::json!({ "cleared": count }));
    } else {
        println!("Vault cleared ({count} entries removed)");
    }

    Ok(())
}
