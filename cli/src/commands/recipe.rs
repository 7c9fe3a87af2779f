use anyhow::Result;
use std::path::Path;
use std::process;

use tastytabs_core::models::{Meal, NewPersonalRecipe, PersonalRecipe};
use tastytabs_core::service::TastyService;

use super::helpers::{parse_ingredient, print_meal_table, prompt_confirm};

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_recipe_add(
    svc: &mut TastyService,
    name: &str,
    category: Option<String>,
    area: Option<String>,
    instructions: Option<String>,
    ingredients: &[String],
    image: Option<&Path>,
    json: bool,
) -> Result<()> {
    let ingredients = ingredients
        .iter()
        .map(|spec| parse_ingredient(spec))
        .collect::<Result<Vec<_>>>()?;

    let thumbnail = image.map(|path| svc.import_local_image(path)).transpose()?;

    let recipe = svc.add_personal_recipe(NewPersonalRecipe {
        name: name.to_string(),
        category,
        area,
        instructions,
        thumbnail,
        youtube: None,
        ingredients,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
    } else {
        println!("Added recipe: {} (id: {})", recipe.meal.name, recipe.id());
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_recipe_update(
    svc: &mut TastyService,
    id: &str,
    name: Option<String>,
    category: Option<String>,
    area: Option<String>,
    instructions: Option<String>,
    ingredients: &[String],
    image: Option<&Path>,
    json: bool,
) -> Result<()> {
    let Some(existing) = svc.personal_recipe(id).cloned() else {
        eprintln!("No personal recipe with id '{id}'");
        process::exit(2);
    };

    let mut updated = existing;
    if let Some(name) = name {
        updated.meal.name = name;
    }
    if let Some(category) = category {
        updated.meal.category = Some(category);
    }
    if let Some(area) = area {
        updated.meal.area = Some(area);
    }
    if let Some(instructions) = instructions {
        updated.meal.instructions = Some(instructions);
    }
    if !ingredients.is_empty() {
        updated.meal.ingredients = ingredients
            .iter()
            .map(|spec| parse_ingredient(spec))
            .collect::<Result<Vec<_>>>()?;
    }
    if let Some(path) = image {
        updated.meal.thumbnail = Some(svc.import_local_image(path)?);
    }

    svc.update_personal_recipe(updated.clone())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&updated)?);
    } else {
        println!("Updated recipe: {} (id: {id})", updated.meal.name);
    }

    Ok(())
}

pub(crate) fn cmd_recipe_delete(svc: &mut TastyService, id: &str, json: bool) -> Result<()> {
    let Some(recipe) = svc.personal_recipe(id) else {
        eprintln!("No personal recipe with id '{id}'");
        process::exit(2);
    };
    let name = recipe.meal.name.clone();

    if !prompt_confirm(&format!("Delete '{name}'? This can't be undone."))? {
        println!("Cancelled");
        return Ok(());
    }

    svc.delete_personal_recipe(id)?;

    if json {
        println!("{}", serde_json::json!({ "deleted": id }));
    } else {
        println!("Deleted recipe: {name}");
    }

    Ok(())
}

pub(crate) fn cmd_recipe_list(svc: &TastyService, json: bool) -> Result<()> {
    let recipes = svc.personal_recipes();

    if recipes.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No personal recipes yet");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(recipes)?);
    } else {
        let refs: Vec<&Meal> = recipes.iter().map(|r: &PersonalRecipe| &r.meal).collect();
        print_meal_table(&refs);
    }

    Ok(())
}
