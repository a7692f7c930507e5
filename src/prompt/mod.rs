//! Interactive prompts
//!
//! The session only talks to the [`Prompter`] trait, so tests can script the
//! answers. [`DialoguerPrompter`] is the terminal implementation.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{FuzzySelect, Input, Select};

use crate::error::{GeneratorError, Result};

/// Source of user answers
pub trait Prompter {
    /// Pick one of `choices`; returns its index
    fn present_choices(&self, prompt: &str, choices: &[String]) -> Result<usize>;

    /// Pick a value from the suggestions `source` produces for the typed input
    fn autocomplete(&self, prompt: &str, source: &dyn Fn(&str) -> Vec<String>) -> Result<String>;

    /// Free text answer
    fn input(&self, prompt: &str) -> Result<String>;
}

impl<P: Prompter + ?Sized> Prompter for &P {
    fn present_choices(&self, prompt: &str, choices: &[String]) -> Result<usize> {
        (**self).present_choices(prompt, choices)
    }

    fn autocomplete(&self, prompt: &str, source: &dyn Fn(&str) -> Vec<String>) -> Result<String> {
        (**self).autocomplete(prompt, source)
    }

    fn input(&self, prompt: &str) -> Result<String> {
        (**self).input(prompt)
    }
}

fn prompt_error(e: dialoguer::Error) -> GeneratorError {
    GeneratorError::Prompt(e.to_string())
}

/// Terminal prompts rendered with `dialoguer`
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn present_choices(&self, prompt: &str, choices: &[String]) -> Result<usize> {
        if choices.is_empty() {
            return Err(GeneratorError::Prompt(format!("{prompt}: nothing to choose from")));
        }

        // Long lists get type-to-filter
        let selection = if choices.len() > 10 {
            FuzzySelect::with_theme(&self.theme)
                .with_prompt(prompt)
                .items(choices)
                .default(0)
                .interact_opt()
        } else {
            Select::with_theme(&self.theme)
                .with_prompt(prompt)
                .items(choices)
                .default(0)
                .interact_opt()
        };

        selection
            .map_err(prompt_error)?
            .ok_or_else(|| GeneratorError::Prompt(format!("{prompt}: no selection")))
    }

    fn autocomplete(&self, prompt: &str, source: &dyn Fn(&str) -> Vec<String>) -> Result<String> {
        loop {
            let filter: String = Input::with_theme(&self.theme)
                .with_prompt(format!("{prompt} (type to filter, Enter for all)"))
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_error)?;

            let mut suggestions = source(filter.trim());
            match suggestions.len() {
                0 if filter.trim().is_empty() => {
                    return Err(GeneratorError::Prompt(format!("{prompt}: nothing to choose from")));
                }
                0 => {
                    crate::console::warn(&format!("Nothing matches \"{}\"", filter.trim()));
                }
                1 => return Ok(suggestions.swap_remove(0)),
                _ => {
                    let index = self.present_choices(prompt, &suggestions)?;
                    return Ok(suggestions[index].clone());
                }
            }
        }
    }

    fn input(&self, prompt: &str) -> Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .interact_text()
            .map(|answer| answer.trim().to_string())
            .map_err(prompt_error)
    }
}
