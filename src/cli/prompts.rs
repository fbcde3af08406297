//! Interactive prompts for language and scope selection.

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, MultiSelect, Select};

use crate::domain::SupportedLanguage;
use crate::scan::collapse_nested_scopes;

const SELECT_ALL_LABEL: &str = "Select All (include everything)";

pub fn select_language() -> Result<SupportedLanguage> {
    let items: Vec<&str> = SupportedLanguage::ALL.iter().map(|lang| lang.display_name()).collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Which language is this repository written in?")
        .default(0)
        .items(&items)
        .interact()?;
    Ok(SupportedLanguage::ALL[selection])
}

/// Ask which module roots to focus on. Returns `["."]` for everything.
pub fn select_scopes(modules: &[String]) -> Result<Vec<String>> {
    let labels: Vec<&str> = modules
        .iter()
        .map(|module| if module == "." { SELECT_ALL_LABEL } else { module.as_str() })
        .collect();

    let selected = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt(
            "Found multiple modules. Which ones should we focus on? \
             [SPACE] selects, [ENTER] submits",
        )
        .items(&labels)
        .interact()?;

    if selected.is_empty() {
        tracing::info!("no module selected, including everything");
        return Ok(vec![".".to_string()]);
    }

    let chosen: Vec<String> = selected
        .into_iter()
        .filter_map(|idx| modules.get(idx).cloned())
        .collect();
    Ok(collapse_nested_scopes(&chosen))
}
