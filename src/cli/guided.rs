//! Interactive guided filter selection.

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, MultiSelect, Select};

use crate::domain::{Column, Config, ProjectTable};
use crate::filter::{Preset, SessionState, OWNER_ALL};

const PRESETS: [Preset; 3] = [Preset::ActiveOnly, Preset::AwaitingKickoff, Preset::AllProjects];

/// Walk the user through preset, state and engineer selection.
///
/// Starts from `session` so that values loaded from a session file are the
/// pre-selected defaults.
pub fn choose_session(
    table: &ProjectTable,
    config: &Config,
    mut session: SessionState,
) -> Result<SessionState> {
    print_preview(table);
    let theme = ColorfulTheme::default();
    let available = table.distinct_states();

    let mut items: Vec<&str> = vec!["Keep current selection"];
    items.extend(PRESETS.iter().map(|p| p.label()));
    let choice = Select::with_theme(&theme)
        .with_prompt("Quick selection")
        .default(0)
        .items(&items)
        .interact()?;
    if let Some(preset) = choice.checked_sub(1).and_then(|i| PRESETS.get(i)) {
        session.apply_preset(*preset, &available, config);
    }

    if !available.is_empty() {
        let checked: Vec<bool> =
            available.iter().map(|s| session.selected_states.contains(s)).collect();
        let picked = MultiSelect::with_theme(&theme)
            .with_prompt("Project states (space to toggle)")
            .items(&available)
            .defaults(&checked)
            .interact()?;
        session.selected_states = picked.into_iter().filter_map(|i| available.get(i).cloned()).collect();
    }

    let mut engineers = vec![OWNER_ALL.to_string()];
    engineers.extend(table.distinct_values(Column::DesignEngineer));
    let current = engineers.iter().position(|e| *e == session.engineer).unwrap_or(0);
    let picked = Select::with_theme(&theme)
        .with_prompt("Design engineer")
        .default(current)
        .items(&engineers)
        .interact()?;
    session.engineer = engineers.swap_remove(picked);

    Ok(session)
}

fn print_preview(table: &ProjectTable) {
    println!();
    println!("Guided report");
    println!("  Projects loaded: {}", table.len());
    if let Some(at) = table.exported_at {
        println!("  Last export:     {}", at.format("%Y-%m-%d %H:%M"));
    }
    let states = table.distinct_states();
    if !states.is_empty() {
        println!("  States:          {}", states.join(", "));
    }
    println!();
}
