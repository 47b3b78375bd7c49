mod browse;
mod envelope_flow;
mod figures;

pub use browse::{BrowseOutcome, BrowseSession};
pub use envelope_flow::{EnvelopeFlow, EnvelopeOutput, FlowError};
pub use figures::{draw_collage, draw_envelope, FigureStyle};

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::prompt::PromptError;
use crate::render::RenderError;
use crate::segy::SegyError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("prompt failed")]
    Prompt(#[from] PromptError),
    #[error("unable to list SEG-Y files")]
    Catalog(#[from] CatalogError),
    #[error("unable to decode SEG-Y file")]
    Decode(#[from] SegyError),
    #[error("unable to render figure")]
    Render(#[from] RenderError),
    #[error("signal flow failed")]
    Flow(#[from] FlowError),
    #[error("trace {index} requested but the file has {count} traces")]
    NoSuchTrace { index: usize, count: usize },
}
