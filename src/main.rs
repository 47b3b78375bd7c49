//! Interactive SEG-Y browser. Lists the recordings of an acquisition
//! folder, decodes the chosen file and renders a seismic collage or a
//! filtered trace with its envelope.
use segy_view::catalog::Catalog;
use segy_view::config::{Config, FilterParameters, Preset, TimeWindow, DEFAULT_OUTPUT_FILE};
use segy_view::overrides::TraceSelection;
use segy_view::prompt::Prompter;
use segy_view::render::{Colormap, SpectrogramPanel, Viewer};
use segy_view::segy::{SampleFormat, SegyDecoder, SegyWriter, TraceDecoder};
use segy_view::session::{draw_collage, draw_envelope, BrowseOutcome, BrowseSession, FigureStyle};

use anyhow::{bail, Context, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(name = env!("CARGO_BIN_NAME"))]
/// Seismic SEG-Y browser and plotter
///
/// JSON Configuration Syntax (every key optional):
///
/// Config = {
///     "data_root" : string,
///     "active_dir" : string,
///     "passive_dir" : string,
///     "preset" : "quick" | "standard" | "pro",
///     "viewer" : string,
///     "preview_path" : string,
///     "traces_to_plot" : [ number* ],
///     "envelope_trace" : number,
///     "envelope_sample_rate" : number,
///     "figure_width" : number,
///     "figure_height" : number,
/// };
///
/// Keys may also be set from the environment as SEGYVIEW_<KEY>.
pub struct Cli {
    /// Configuration file to use (JSON format)
    #[arg(short = 'c')]
    config_path: Option<PathBuf>,

    /// Named set of plot defaults (quick, standard or pro)
    #[arg(long)]
    preset: Option<Preset>,

    /// Only log errors
    #[arg(short = 'q', long)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Pick a folder, a file and a figure interactively (default)
    Browse,

    /// Print the SEG-Y files of a directory with their trace counts
    List { dir: PathBuf },

    /// Render the four-panel collage of a file
    Collage {
        file: PathBuf,

        /// Colormap for the heat map and spectrogram
        #[arg(long)]
        cmap: Option<Colormap>,

        /// Spectrogram sampling frequency, in hertz
        #[arg(long)]
        fs: Option<f32>,

        /// Spectrogram FFT window, in samples
        #[arg(long)]
        nfft: Option<usize>,

        /// Spectrogram window overlap, in samples
        #[arg(long)]
        noverlap: Option<usize>,

        /// Traces to highlight; the seventh picks the spectrogram trace
        #[arg(short = 't', value_names = ["i,j,..."])]
        traces: Option<TraceSelection>,

        /// Output image
        #[arg(short = 'o')]
        output: Option<PathBuf>,

        /// Open the image in the configured viewer
        #[arg(long)]
        show: bool,
    },

    /// Band-pass one trace and render it with its envelope
    Envelope {
        file: PathBuf,

        /// Trace to filter
        #[arg(long)]
        trace: Option<usize>,

        /// Sampling rate of the trace, in hertz
        #[arg(long)]
        sample_rate: Option<f32>,

        /// Lower band-pass corner, in hertz
        #[arg(long)]
        freqmin: Option<f32>,

        /// Upper band-pass corner, in hertz
        #[arg(long)]
        freqmax: Option<f32>,

        /// Display window, in seconds
        #[arg(long, value_names = ["start:end"])]
        window: Option<TimeWindow>,

        /// Output image
        #[arg(short = 'o')]
        output: Option<PathBuf>,

        /// Dump input, filtered and envelope samples to a text file
        #[arg(long, value_names = ["dump-path"])]
        dump: Option<PathBuf>,

        /// Open the image in the configured viewer
        #[arg(long)]
        show: bool,
    },

    /// Wrap raw little-endian f32 samples into a SEG-Y file
    Convert {
        input: PathBuf,
        output: PathBuf,

        /// Samples per trace
        #[arg(long)]
        samples: usize,

        /// Sample interval, in microseconds
        #[arg(long, default_value_t = 1000)]
        interval_us: u16,

        /// Store samples as IBM floats instead of IEEE
        #[arg(long)]
        ibm: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.quiet {
        log::LevelFilter::Error
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .format_timestamp_secs()
        .parse_default_env()
        .init();

    let mut config = Config::new(cli.config_path.as_deref(), "SEGYVIEW", "__")
        .context("Failed to load configuration")?;
    if let Some(preset) = cli.preset {
        config.preset = preset;
    }

    match cli.command.unwrap_or(Command::Browse) {
        Command::Browse => browse(&config),
        Command::List { dir } => list(&dir),
        Command::Collage {
            file,
            cmap,
            fs,
            nfft,
            noverlap,
            traces,
            output,
            show,
        } => {
            let mut params = config.preset.collage_defaults();
            params.cmap = cmap.unwrap_or(params.cmap);
            params.fs = fs.unwrap_or(params.fs);
            params.nfft = nfft.unwrap_or(params.nfft);
            params.noverlap = noverlap.unwrap_or(params.noverlap);
            let traces = traces
                .map(|t| t.0)
                .unwrap_or_else(|| config.traces_to_plot.clone());
            let output = output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE));

            let set = SegyDecoder
                .decode(&file)
                .with_context(|| format!("Failed to decode {}", file.display()))?;
            let style = figure_style(&config, &file);
            let panel = draw_collage(&set, &traces, params, &style, &output)
                .context("Failed to render collage")?;
            if let Some(reason) = panel.placeholder() {
                warn!("{reason}");
            }
            show_if(show, &config, &output)
        }
        Command::Envelope {
            file,
            trace,
            sample_rate,
            freqmin,
            freqmax,
            window,
            output,
            dump,
            show,
        } => {
            let d = FilterParameters::DEFAULT;
            let params = FilterParameters {
                freqmin: freqmin.unwrap_or(d.freqmin),
                freqmax: freqmax.unwrap_or(d.freqmax),
                time_window: window.unwrap_or(d.time_window),
            };
            let output = output.unwrap_or_else(|| config.preview_path.clone());
            let set = SegyDecoder
                .decode(&file)
                .with_context(|| format!("Failed to decode {}", file.display()))?;
            let style = figure_style(&config, &file);
            draw_envelope(
                &set,
                trace.unwrap_or(config.envelope_trace),
                sample_rate.unwrap_or(config.envelope_sample_rate),
                &params,
                &style,
                &output,
                dump.as_deref(),
            )
            .context("Failed to render envelope")?;
            show_if(show, &config, &output)
        }
        Command::Convert {
            input,
            output,
            samples,
            interval_us,
            ibm,
        } => convert(&input, &output, samples, interval_us, ibm),
    }
}

fn browse(config: &Config) -> Result<()> {
    let stdin = io::stdin();
    let prompter = Prompter::new(stdin.lock(), io::stdout());
    let viewer = Viewer::new(config.viewer.clone());
    let mut session = BrowseSession::new(config, prompter, SegyDecoder, viewer);
    match session.run().context("Browse session failed")? {
        BrowseOutcome::Collage { output, panel } => {
            if let SpectrogramPanel::Trace(i) = panel {
                info!("spectrogram drawn for trace {i}");
            }
            info!("collage saved as {}", output.display());
        }
        BrowseOutcome::Envelope { preview } => {
            info!("envelope figure at {}", preview.display());
        }
    }
    Ok(())
}

fn list(dir: &Path) -> Result<()> {
    let mut catalog = Catalog::scan(dir)
        .and_then(|c| c.require_files())
        .context("Failed to list directory")?;
    catalog
        .probe_all(&SegyDecoder)
        .context("Failed to read SEG-Y headers")?;
    let mut out = io::stdout().lock();
    catalog.render_tree(&mut out)?;
    Ok(())
}

fn convert(input: &Path, output: &Path, samples: usize, interval_us: u16, ibm: bool) -> Result<()> {
    if samples == 0 {
        bail!("samples per trace must be positive");
    }
    let f = File::open(input).with_context(|| format!("Failed to open {}", input.display()))?;
    let bytes = f.metadata()?.len() as usize;
    let trace_bytes = samples * 4;
    if bytes % trace_bytes != 0 {
        bail!(
            "{} holds {bytes} bytes, not a whole number of {samples}-sample traces",
            input.display()
        );
    }
    let mut reader = BufReader::new(f);
    let mut traces = Vec::with_capacity(bytes / trace_bytes);
    for _ in 0..bytes / trace_bytes {
        let mut trace = vec![0f32; samples];
        reader.read_f32_into::<LittleEndian>(&mut trace)?;
        traces.push(trace);
    }

    let format = if ibm {
        SampleFormat::IbmFloat
    } else {
        SampleFormat::IeeeFloat
    };
    let out = File::create(output).with_context(|| format!("Failed to create {}", output.display()))?;
    let written = SegyWriter::new(interval_us)
        .format(format)
        .write(BufWriter::new(out), &traces)
        .context("Failed to write SEG-Y")?;
    info!("wrote {written} traces to {}", output.display());
    Ok(())
}

fn figure_style(config: &Config, file: &Path) -> FigureStyle {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    FigureStyle {
        size: (config.figure_width, config.figure_height),
        caption: config
            .preset
            .captions_figures()
            .then(|| format!("File: {name}")),
    }
}

fn show_if(show: bool, config: &Config, image: &Path) -> Result<()> {
    if show {
        Viewer::new(config.viewer.clone())
            .show(image)
            .context("Failed to show figure")?;
    }
    Ok(())
}
