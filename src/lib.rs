//! Interactive critical CSS generator
//!
//! Finds an HTML document (in a folder of the working directory or by
//! fetching a page URL), resolves one of its linked stylesheets to a local
//! file and asks a [`CriticalCssRenderer`] for the CSS needed to render the
//! first viewport. The result lands next to the HTML file:
//!
//! ```text
//! <html-dir>/critical-css-generator/critical-<css name>.css
//! ```

pub mod config;
pub mod console;
pub mod discovery;
pub mod error;
pub mod invoker;
pub mod link_extractor;
pub mod materializer;
pub mod prompt;
pub mod renderer;
pub mod resolver;
pub mod session;
pub mod utils;

pub use config::{GeneratorConfig, GeneratorConfigBuilder, ScreenshotFormat};
pub use error::{GeneratorError, Result};
pub use invoker::{
    CriticalCssInvoker, CriticalCssRenderer, InvocationOutcome, OutputPaths, RenderRequest,
    ScreenshotConfig,
};
pub use link_extractor::{StylesheetReference, extract_stylesheet_references};
pub use materializer::{MaterializedPage, ResourceKind, ResourceMaterializer};
pub use prompt::{DialoguerPrompter, Prompter};
pub use renderer::ChromiumRenderer;
pub use resolver::{PathResolver, ResolutionFailure, ResolutionReport, ResolvedResource, ResourceOrigin};
pub use session::{GenerationRequest, InvocationState, RequestOrigin, Session, SourceMode};
