use anyhow::Result;
use std::process;

use tastytabs_core::service::TastyService;

use super::helpers::prompt_confirm;

pub(crate) fn cmd_note_set(svc: &mut TastyService, id: &str, text: &str, json: bool) -> Result<()> {
    svc.save_note(id, text)?;

    if json {
        println!("{}", serde_json::json!({ "id": id, "note": text }));
    } else {
        println!("Saved note for meal {id}");
    }

    Ok(())
}

pub(crate) fn cmd_note_show(svc: &TastyService, id: &str, json: bool) -> Result<()> {
    match svc.note(id) {
        Some(text) => {
            if json {
                println!("{}", serde_json::json!({ "id": id, "note": text }));
            } else if text.is_empty() {
                println!("(empty note)");
            } else {
                println!("{text}");
            }
            Ok(())
        }
        None => {
            if json {
                println!("null");
            } else {
                eprintln!("No note for meal {id}");
            }
            process::exit(2);
        }
    }
}

pub(crate) fn cmd_note_clear(svc: &mut TastyService, id: &str, json: bool) -> Result<()> {
    let removed = svc.clear_note(id)?;

    if json {
        println!("{}", serde_json::json!({ "id": id, "removed": removed }));
    } else if removed {
        println!("Note removed for meal {id}");
    } else {
        println!("No note to remove for meal {id}");
    }

    Ok(())
}

pub(crate) fn cmd_note_clear_all(svc: &mut TastyService, json: bool) -> Result<()> {
    let count = svc.notes().len();
    if count == 0 {
        println!("No notes to remove");
        return Ok(());
    }

    if !prompt_confirm(&format!("Delete all {count} notes? This can't be undone."))? {
        println!("Cancelled");
        return Ok(());
    }

    svc.clear_all_notes()?;

    if json {
        println!("{}", serde_json::json!({ "cleared": count }));
    } else {
        println!("All notes removed ({count})");
    }

    Ok(())
}
