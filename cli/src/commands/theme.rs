use anyhow::Result;

use tastytabs_core::service::TastyService;

pub(crate) fn cmd_theme_dark(svc: &mut TastyService, json: bool) -> Result<()> {
    let on = svc.toggle_dark_mode()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&svc.preferences())?);
    } else {
        println!("Dark mode {}", if on { "on" } else { "off" });
    }

    Ok(())
}

pub(crate) fn cmd_theme_contrast(svc: &mut TastyService, json: bool) -> Result<()> {
    let on = svc.toggle_amoled_mode()?;
    let prefs = svc.preferences();

    if json {
        println!("{}", serde_json::to_string_pretty(&prefs)?);
    } else {
        println!("Maximum contrast {}", if on { "on" } else { "off" });
        if on && !prefs.dark_mode {
            println!("(takes effect once dark mode is on)");
        }
    }

    Ok(())
}

pub(crate) fn cmd_theme_show(svc: &TastyService, json: bool) -> Result<()> {
    let prefs = svc.preferences();

    if json {
        println!("{}", serde_json::to_string_pretty(&prefs)?);
    } else {
        println!("Dark mode:        {}", if prefs.dark_mode { "on" } else { "off" });
        println!(
            "Maximum contrast: {}",
            if prefs.amoled_mode { "on" } else { "off" }
        );
    }

    Ok(())
}
