use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use log::info;

use super::figures::{draw_collage, draw_envelope, FigureStyle};
use super::SessionError;
use crate::catalog::{AcquisitionMode, Catalog};
use crate::config::{Config, DEFAULT_OUTPUT_FILE};
use crate::prompt::{PlotKind, Prompter};
use crate::render::{SpectrogramPanel, Viewer};
use crate::segy::TraceDecoder;

/// What an interactive run produced.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseOutcome {
    Collage {
        output: PathBuf,
        panel: SpectrogramPanel,
    },
    Envelope {
        preview: PathBuf,
    },
}

/// One pass through the interactive flow: pick an acquisition mode, pick
/// a file from its folder, pick a figure, answer its questions, render
/// and show it.
pub struct BrowseSession<'a, R, W, D> {
    config: &'a Config,
    prompter: Prompter<R, W>,
    decoder: D,
    viewer: Viewer,
}

impl<'a, R: BufRead, W: Write, D: TraceDecoder> BrowseSession<'a, R, W, D> {
    pub fn new(config: &'a Config, prompter: Prompter<R, W>, decoder: D, viewer: Viewer) -> Self {
        Self {
            config,
            prompter,
            decoder,
            viewer,
        }
    }

    pub fn into_prompter(self) -> Prompter<R, W> {
        self.prompter
    }

    pub fn run(&mut self) -> Result<BrowseOutcome, SessionError> {
        let preset = self.config.preset;
        let mode = if preset.asks_acquisition_mode() {
            self.prompter.choose_mode(self.config)?
        } else {
            AcquisitionMode::Active
        };
        let dir = mode.directory(self.config);
        info!("browsing {}", dir.display());

        let mut catalog = Catalog::scan(&dir)?.require_files()?;
        catalog.probe_all(&self.decoder)?;
        catalog.render_tree(self.prompter.output())?;
        catalog.render_choices(self.prompter.output())?;
        let index = self.prompter.choose_index(catalog.len())?;
        let name = catalog.entries()[index].name.clone();
        let path = dir.join(&name);
        self.prompter.say(format!("Selected SEGY file: {name}"))?;

        let kind = if preset.offers_plot_menu() {
            self.prompter.choose_plot()?
        } else {
            PlotKind::Collage
        };
        let style = FigureStyle {
            size: (self.config.figure_width, self.config.figure_height),
            caption: preset.captions_figures().then(|| format!("File: {name}")),
        };

        match kind {
            PlotKind::Collage => self.collage(&path, &style),
            PlotKind::FilteredEnvelope => self.envelope(&path, &style),
        }
    }

    // Parameters are gathered before the file is decoded.
    fn collage(&mut self, path: &Path, style: &FigureStyle) -> Result<BrowseOutcome, SessionError> {
        let params = self.prompter.ask_collage_parameters(self.config.preset)?;
        let output = PathBuf::from(self.prompter.ask_output_file(DEFAULT_OUTPUT_FILE)?);
        let set = self.decoder.decode(path)?;
        let panel = draw_collage(&set, &self.config.traces_to_plot, params, style, &output)?;
        self.viewer.show(&output)?;
        Ok(BrowseOutcome::Collage { output, panel })
    }

    // The file is decoded before the filter questions are asked.
    fn envelope(&mut self, path: &Path, style: &FigureStyle) -> Result<BrowseOutcome, SessionError> {
        let set = self.decoder.decode(path)?;
        let params = self.prompter.ask_filter_parameters()?;
        let preview = self.config.preview_path.clone();
        draw_envelope(
            &set,
            self.config.envelope_trace,
            self.config.envelope_sample_rate,
            &params,
            style,
            &preview,
            None,
        )?;
        self.viewer.show(&preview)?;
        Ok(BrowseOutcome::Envelope { preview })
    }
}
