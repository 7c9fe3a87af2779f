use anyhow::Result;
use std::process;

use crate::mealdb::TheMealDbClient;
use tastytabs_core::models::Meal;
use tastytabs_core::service::{BROWSE_LETTERS, SearchKind, TastyService};

use super::helpers::{print_category_table, print_meal_detail, print_meal_table};

/// Rebuild the browse feed from one page per starting letter, merged
/// through the deduplicating append — adjacent pages overlap in practice.
pub(crate) async fn cmd_browse(
    svc: &mut TastyService,
    client: &TheMealDbClient,
    category: Option<&str>,
    json: bool,
) -> Result<()> {
    svc.replace_cache(Vec::new());
    for letter in BROWSE_LETTERS {
        let page = client
            .search_async(&letter.to_string(), SearchKind::FirstLetter)
            .await?;
        svc.append_cache(page);
    }

    let meals: Vec<&Meal> = match category {
        Some(name) => svc.cache().by_category(name),
        None => svc.cache().meals().iter().collect(),
    };

    if meals.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No meals to show");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&meals)?);
    } else {
        print_meal_table(&meals);
    }

    Ok(())
}

pub(crate) async fn cmd_search(
    svc: &mut TastyService,
    client: &TheMealDbClient,
    query: &str,
    kind: SearchKind,
    json: bool,
) -> Result<()> {
    let results = client.search_async(query, kind).await?;
    svc.append_cache(results.clone());

    if results.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No results found for '{query}'");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        let refs: Vec<&Meal> = results.iter().collect();
        print_meal_table(&refs);
    }

    Ok(())
}

pub(crate) async fn cmd_show(
    svc: &mut TastyService,
    client: &TheMealDbClient,
    id: &str,
    json: bool,
) -> Result<()> {
    // Personal recipes resolve locally; everything else goes through the
    // cache and then the API.
    let meal = match svc.personal_recipe(id) {
        Some(recipe) => Some(recipe.meal.clone()),
        None => match svc.cache().get(id).filter(|m| m.instructions.is_some()) {
            Some(cached) => Some(cached.clone()),
            None => {
                let fetched = client.lookup_async(id).await?;
                if let Some(meal) = &fetched {
                    svc.append_cache(vec![meal.clone()]);
                }
                fetched
            }
        },
    };

    let Some(meal) = meal else {
        eprintln!("No meal found with id '{id}'");
        process::exit(2);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&meal)?);
    } else {
        print_meal_detail(&meal, svc.vault_contains(&meal.id), svc.note(&meal.id));
    }

    Ok(())
}

pub(crate) async fn cmd_random(
    svc: &mut TastyService,
    client: &TheMealDbClient,
    json: bool,
) -> Result<()> {
    let Some(meal) = client.random_async().await? else {
        eprintln!("The recipe service returned nothing — try again");
        process::exit(2);
    };
    svc.append_cache(vec![meal.clone()]);

    if json {
        println!("{}", serde_json::to_string_pretty(&meal)?);
    } else {
        print_meal_detail(&meal, svc.vault_contains(&meal.id), svc.note(&meal.id));
    }

    Ok(())
}

pub(crate) async fn cmd_categories(client: &TheMealDbClient, json: bool) -> Result<()> {
    let categories = client.categories_async().await?;

    if categories.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No categories found");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
    } else {
        print_category_table(&categories);
    }

    Ok(())
}
