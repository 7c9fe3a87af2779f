mod backup;
mod browse;
mod helpers;
mod note;
mod recipe;
mod storage;
mod theme;
mod vault;

pub(crate) use backup::{cmd_backup, cmd_restore};
pub(crate) use browse::{cmd_browse, cmd_categories, cmd_random, cmd_search, cmd_show};
pub(crate) use note::{cmd_note_clear, cmd_note_clear_all, cmd_note_set, cmd_note_show};
pub(crate) use recipe::{cmd_recipe_add, cmd_recipe_delete, cmd_recipe_list, cmd_recipe_update};
pub(crate) use storage::cmd_storage_clear;
pub(crate) use theme::{cmd_theme_contrast, cmd_theme_dark, cmd_theme_show};
pub(crate) use vault::{cmd_vault_clear, cmd_vault_list, cmd_vault_toggle};
