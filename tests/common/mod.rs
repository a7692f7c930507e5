//! Test utilities shared by the integration tests

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use critical_css_generator::{
    CriticalCssRenderer, GeneratorConfig, GeneratorError, Prompter, RenderRequest,
};
use mockito::{Mock, Server};
use tempfile::TempDir;

/// Creates a temporary directory used as working directory and domain root
#[allow(dead_code)]
pub fn create_test_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Config rooted at `root`, with screenshots on (the renderer is scripted)
#[allow(dead_code)]
pub fn test_config(root: &Path) -> GeneratorConfig {
    GeneratorConfig::builder()
        .domain_root(root)
        .build()
        .expect("Failed to create test config")
}

/// Creates a test HTML document linking the given stylesheets
#[allow(dead_code)]
pub fn create_test_html(title: &str, stylesheets: &[&str]) -> String {
    let links: String = stylesheets
        .iter()
        .map(|href| format!("    <link rel=\"stylesheet\" href=\"{href}\">\n"))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
{links}</head>
<body>
    <h1>{title}</h1>
</body>
</html>"#
    )
}

/// Writes `content` to `root/relative`, creating parent directories
#[allow(dead_code)]
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Creates a mock endpoint that returns HTML content
#[allow(dead_code)]
pub fn create_html_mock(server: &mut Server, path: &str, html: &str) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(html)
        .create()
}

/// Creates a mock endpoint that returns a stylesheet
#[allow(dead_code)]
pub fn create_css_mock(server: &mut Server, path: &str, css: &str) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/css")
        .with_body(css)
        .create()
}

/// Creates a mock endpoint that returns an error
#[allow(dead_code)]
pub fn create_error_mock(server: &mut Server, path: &str, status: usize) -> Mock {
    server
        .mock("GET", path)
        .with_status(status)
        .with_body("Error")
        .create()
}

/// Prompter answering from a script and recording what it was shown
#[allow(dead_code)]
#[derive(Default)]
pub struct ScriptedPrompter {
    choices: Mutex<VecDeque<usize>>,
    texts: Mutex<VecDeque<String>>,
    pub shown: Mutex<Vec<(String, Vec<String>)>>,
}

#[allow(dead_code)]
impl ScriptedPrompter {
    pub fn new(choices: &[usize], texts: &[&str]) -> Self {
        Self {
            choices: Mutex::new(choices.iter().copied().collect()),
            texts: Mutex::new(texts.iter().map(|t| (*t).to_string()).collect()),
            shown: Mutex::new(Vec::new()),
        }
    }

    /// Options presented for the prompt containing `needle`
    pub fn options_for(&self, needle: &str) -> Option<Vec<String>> {
        self.shown
            .lock()
            .unwrap()
            .iter()
            .find(|(prompt, _)| prompt.contains(needle))
            .map(|(_, options)| options.clone())
    }

    fn next_text(&self, prompt: &str) -> Result<String, GeneratorError> {
        self.texts
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| GeneratorError::Prompt(format!("{prompt}: script exhausted")))
    }
}

impl Prompter for ScriptedPrompter {
    fn present_choices(&self, prompt: &str, choices: &[String]) -> Result<usize, GeneratorError> {
        self.shown
            .lock()
            .unwrap()
            .push((prompt.to_string(), choices.to_vec()));
        self.choices
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| GeneratorError::Prompt(format!("{prompt}: script exhausted")))
    }

    fn autocomplete(
        &self,
        prompt: &str,
        source: &dyn Fn(&str) -> Vec<String>,
    ) -> Result<String, GeneratorError> {
        let typed = self.next_text(prompt)?;
        let suggestions = source(&typed);
        self.shown
            .lock()
            .unwrap()
            .push((prompt.to_string(), suggestions.clone()));
        suggestions
            .into_iter()
            .next()
            .ok_or_else(|| GeneratorError::Prompt(format!("{prompt}: nothing matches {typed}")))
    }

    fn input(&self, prompt: &str) -> Result<String, GeneratorError> {
        self.next_text(prompt)
    }
}

/// Renderer returning fixed CSS and recording every request
#[allow(dead_code)]
pub struct ScriptedRenderer {
    output: Result<String, String>,
    pub requests: Mutex<Vec<RenderRequest>>,
}

#[allow(dead_code)]
impl ScriptedRenderer {
    pub fn returning(css: &str) -> Self {
        Self {
            output: Ok(css.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            output: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl CriticalCssRenderer for ScriptedRenderer {
    async fn render(&self, request: &RenderRequest) -> anyhow::Result<Vec<u8>> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.output {
            Ok(css) => Ok(css.clone().into_bytes()),
            Err(message) => Err(anyhow::anyhow!(message.clone())),
        }
    }
}
