use anyhow::{Result, bail};
use std::io::{self, BufRead, Write};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use tastytabs_core::models::{Category, Ingredient, Meal};

pub(crate) fn print_meal_table(meals: &[&Meal]) {
    #[derive(Tabled)]
    struct MealRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Category")]
        category: String,
        #[tabled(rename = "Area")]
        area: String,
    }

    let rows: Vec<MealRow> = meals
        .iter()
        .map(|m| MealRow {
            id: m.id.clone(),
            name: truncate(&m.name, 40),
            category: m.category.as_deref().unwrap_or("-").to_string(),
            area: m.area.as_deref().unwrap_or("-").to_string(),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::single(0)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

pub(crate) fn print_category_table(categories: &[Category]) {
    #[derive(Tabled)]
    struct CategoryRow {
        #[tabled(rename = "Category")]
        name: String,
        #[tabled(rename = "About")]
        about: String,
    }

    let rows: Vec<CategoryRow> = categories
        .iter()
        .map(|c| CategoryRow {
            name: c.name.clone(),
            about: c
                .description
                .as_deref()
                .map(|d| truncate(d, 60))
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
}

pub(crate) fn print_meal_detail(meal: &Meal, in_vault: bool, note: Option<&str>) {
    println!("{} (id: {})", meal.name, meal.id);
    let category = meal.category.as_deref().unwrap_or("-");
    let area = meal.area.as_deref().unwrap_or("-");
    println!("{area} • {category}");
    if in_vault {
        println!("In your vault");
    }
    if let Some(url) = &meal.youtube {
        println!("Video: {url}");
    }
    if !meal.ingredients.is_empty() {
        println!("\nIngredients:");
        for ing in &meal.ingredients {
            if ing.measure.is_empty() {
                println!("  - {}", ing.name);
            } else {
                println!("  - {} {}", ing.measure, ing.name);
            }
        }
    }
    if let Some(instructions) = &meal.instructions {
        println!("\n{instructions}");
    }
    if let Some(note) = note {
        if note.is_empty() {
            println!("\nYour note: (empty)");
        } else {
            println!("\nYour note: {note}");
        }
    }
}

/// Parse an `--ingredient "name:measure"` argument. The measure part is
/// optional; the name is not.
pub(crate) fn parse_ingredient(spec: &str) -> Result<Ingredient> {
    let (name, measure) = match spec.split_once(':') {
        Some((name, measure)) => (name.trim(), measure.trim()),
        None => (spec.trim(), ""),
    };
    if name.is_empty() {
        bail!("Invalid ingredient '{spec}'. Use 'name' or 'name:measure'");
    }
    Ok(Ingredient {
        name: name.to_string(),
        measure: measure.to_string(),
        image: None,
    })
}

/// Ask the user to confirm a destructive action. Anything other than
/// y/yes counts as cancellation, and cancelling is not an error.
pub(crate) fn prompt_confirm(message: &str) -> Result<bool> {
    eprint!("{message} [y/N] ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let answer = line.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ingredient_with_measure() {
        let ing = parse_ingredient("Chicken: 1 kg").unwrap();
        assert_eq!(ing.name, "Chicken");
        assert_eq!(ing.measure, "1 kg");
    }

    #[test]
    fn test_parse_ingredient_name_only() {
        let ing = parse_ingredient("Salt").unwrap();
        assert_eq!(ing.name, "Salt");
        assert_eq!(ing.measure, "");
    }

    #[test]
    fn test_parse_ingredient_rejects_empty_name() {
        assert!(parse_ingredient(": 2 tbsp").is_err());
        assert!(parse_ingredient("   ").is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world this is long", 10), "hello w...");
    }

    #[test]
    fn test_truncate_utf8() {
        assert_eq!(truncate("Crème fraîche", 10), "Crème f...");
        assert_eq!(truncate("Müsli", 10), "Müsli");
    }
}
