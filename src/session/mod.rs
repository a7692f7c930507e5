//! Interactive generation session
//!
//! Walks the user from a source (a folder of the working directory or a page
//! URL) to an HTML document, one of its stylesheets and finally the critical
//! CSS file. All errors end up as console messages in [`Session::run`].

mod types;

pub use types::{GenerationRequest, InvocationState, RequestOrigin, SourceMode};

use std::path::{Path, PathBuf};

use crate::config::GeneratorConfig;
use crate::console;
use crate::discovery::{filter_folders, find_html_files, list_folders};
use crate::error::{GeneratorError, Result};
use crate::invoker::{CriticalCssInvoker, CriticalCssRenderer, InvocationOutcome};
use crate::link_extractor::extract_stylesheet_references;
use crate::materializer::ResourceMaterializer;
use crate::prompt::Prompter;
use crate::resolver::{PathResolver, ResolvedResource, ResourceOrigin};
use crate::utils::parse_remote_url;

const MODE_PROMPT: &str = "Where is your HTML file?";
const FOLDER_PROMPT: &str = "Type or select your folder name.";
const HTML_PROMPT: &str = "Select your html file.";
const CSS_PROMPT: &str = "Select your css file.";
const URL_PROMPT: &str = "Enter the page URL.";

const NO_CSS_FILES: &str = "No CSS files found in HTML file.";

/// One interactive run over a renderer and a prompter
pub struct Session<R, P> {
    config: GeneratorConfig,
    materializer: ResourceMaterializer,
    renderer: R,
    prompter: P,
    working_dir: PathBuf,
    state: InvocationState,
}

impl<R: CriticalCssRenderer, P: Prompter> Session<R, P> {
    pub fn new(
        config: GeneratorConfig,
        renderer: R,
        prompter: P,
        working_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let materializer = ResourceMaterializer::new(&config)?;
        Ok(Self {
            config,
            materializer,
            renderer,
            prompter,
            working_dir: working_dir.into(),
            state: InvocationState::Idle,
        })
    }

    #[must_use]
    pub fn state(&self) -> InvocationState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run the session, printing the outcome instead of returning errors
    pub async fn run(&mut self) -> Option<InvocationOutcome> {
        match self.try_run().await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                if !self.state.is_terminal() && self.state != InvocationState::Idle {
                    self.transition(InvocationState::Failed);
                }
                if e.is_cancellation() {
                    log::info!("{e}");
                } else {
                    console::error(&e.to_string());
                }
                None
            }
        }
    }

    /// Run the session and return the first error
    pub async fn try_run(&mut self) -> Result<InvocationOutcome> {
        let modes: Vec<String> = SourceMode::ALL.iter().map(ToString::to_string).collect();
        let mode = SourceMode::ALL[self.prompter.present_choices(MODE_PROMPT, &modes)?];
        log::debug!("Source mode: {mode}");

        let request = match mode {
            SourceMode::CurrentFolder => self.prepare_local().await?,
            SourceMode::Domain => self.prepare_domain().await?,
        };

        self.generate(&request).await
    }

    /// Pick a folder, an HTML file in it and one of its stylesheets
    pub async fn prepare_local(&mut self) -> Result<GenerationRequest> {
        let folders = list_folders(&self.working_dir).await?;
        if folders.is_empty() {
            return Err(GeneratorError::Discovery(format!(
                "No folders found in {}.",
                self.working_dir.display()
            )));
        }

        let folder = self
            .prompter
            .autocomplete(FOLDER_PROMPT, &|input: &str| filter_folders(&folders, input))?;
        let folder_path = self.working_dir.join(&folder);

        let html_files = find_html_files(&folder_path).await?;
        if html_files.is_empty() {
            return Err(GeneratorError::Discovery(format!(
                "No HTML files found in {folder} folder."
            )));
        }

        let choices: Vec<String> = html_files
            .iter()
            .map(|path| self.display_path(path))
            .collect();
        let html_path = html_files[self.prompter.present_choices(HTML_PROMPT, &choices)?].clone();

        let html = tokio::fs::read_to_string(&html_path)
            .await
            .map_err(|e| GeneratorError::filesystem(&html_path, e))?;

        self.select_stylesheet(GenerationRequest::local(folder_path, html_path), &html)
            .await
    }

    /// Fetch a page into the domain mirror and pick one of its stylesheets
    pub async fn prepare_domain(&mut self) -> Result<GenerationRequest> {
        let input = self.prompter.input(URL_PROMPT)?;
        let url = parse_remote_url(&input)?;

        self.transition(InvocationState::Resolving);
        console::notice(&format!("Fetching {url}"));
        let page = self.materializer.materialize_page(&url).await?;

        self.select_stylesheet(GenerationRequest::remote(page.url, page.path), &page.html)
            .await
    }

    /// Resolve every stylesheet of `html` and let the user pick one
    async fn select_stylesheet(
        &mut self,
        request: GenerationRequest,
        html: &str,
    ) -> Result<GenerationRequest> {
        let references = extract_stylesheet_references(html);
        if references.is_empty() {
            return Err(GeneratorError::Discovery(NO_CSS_FILES.to_string()));
        }

        self.transition(InvocationState::Resolving);
        let report = PathResolver::new(&self.materializer)
            .resolve_all(&references, &request.html_path, request.page_url())
            .await;

        for failure in &report.failures {
            console::error(&failure.to_string());
        }
        if report.resolved.is_empty() {
            return Err(GeneratorError::Discovery(NO_CSS_FILES.to_string()));
        }

        let choices: Vec<String> = report
            .resolved
            .iter()
            .map(|resolved| self.stylesheet_label(resolved))
            .collect();
        let index = self.prompter.present_choices(CSS_PROMPT, &choices)?;
        console::selected("Selected CSS file:", &choices[index]);

        let mut resolved = report.resolved;
        Ok(request.with_stylesheet(resolved.swap_remove(index)))
    }

    /// Render and write the critical CSS for a fully resolved request
    pub async fn generate(&mut self, request: &GenerationRequest) -> Result<InvocationOutcome> {
        let css_path = request
            .css_path()
            .ok_or_else(|| GeneratorError::Discovery(NO_CSS_FILES.to_string()))?;

        self.transition(InvocationState::Invoking);
        console::progress("Optimizing CSS...");

        let result = CriticalCssInvoker::new(&self.renderer, &self.config)
            .invoke(&request.html_path, css_path)
            .await;

        match result {
            Ok(outcome) => {
                self.transition(InvocationState::Succeeded);
                console::success(
                    "Optimized CSS written to:",
                    &outcome.paths.output_file.display().to_string(),
                );
                Ok(outcome)
            }
            Err(e) => {
                self.transition(InvocationState::Failed);
                Err(e)
            }
        }
    }

    fn transition(&mut self, next: InvocationState) {
        if self.state != next {
            log::info!("Invocation state: {} -> {next}", self.state);
            self.state = next;
        }
    }

    /// Mirror path of a fetched stylesheet is followed by its reference
    fn stylesheet_label(&self, resolved: &ResolvedResource) -> String {
        let path = self.display_path(&resolved.local_path);
        match resolved.origin {
            ResourceOrigin::Local => path,
            ResourceOrigin::Remote => format!("{path} ({})", resolved.reference),
        }
    }

    /// Path as shown in prompts, relative to the working directory when possible
    fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.working_dir)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}
