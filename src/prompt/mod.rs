use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use log::warn;
use thiserror::Error;

use crate::catalog::AcquisitionMode;
use crate::config::{CollageParameters, Config, FilterParameters, Preset, TimeWindow};
use crate::render::Colormap;

pub const INVALID_NUMBER: &str = "Please enter a valid number.";
pub const INVALID_INDEX: &str = "Invalid SEGY file index.";
pub const INVALID_CHOICE: &str = "Invalid choice. Select 1 or 2.";
pub const INVALID_VALUES: &str = "Invalid values supplied, using defaults.";

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("input ended before a value was given")]
    EndOfInput,
    #[error("terminal i/o error")]
    Io(#[from] io::Error),
}

/// Which of the two figures to draw.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum PlotKind {
    Collage,
    FilteredEnvelope,
}

/// Outcome of reading one optional field.
#[derive(Debug, PartialEq)]
enum Answer<T> {
    Blank,
    Value(T),
    Invalid,
}

impl<T> Answer<T> {
    fn or(self, default: T) -> Option<T> {
        match self {
            Answer::Blank => Some(default),
            Answer::Value(v) => Some(v),
            Answer::Invalid => None,
        }
    }
}

/// Only a completely empty line means "use the default". Surrounding
/// whitespace around a value is accepted, a blank-looking line is not.
fn parse_answer<T: FromStr>(line: &str) -> Answer<T> {
    if line.is_empty() {
        return Answer::Blank;
    }
    match line.trim().parse::<T>() {
        Ok(v) if !line.trim().is_empty() => Answer::Value(v),
        _ => Answer::Invalid,
    }
}

/// Line oriented questions over any input/output pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    /// Stream for listings that go alongside the questions.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn say<D: Display>(&mut self, message: D) -> Result<(), PromptError> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    /// Show `question` and return the answer without its line ending.
    pub fn ask(&mut self, question: &str) -> Result<String, PromptError> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::EndOfInput);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }

    /// Keep asking until the answer is an index below `len`.
    pub fn choose_index(&mut self, len: usize) -> Result<usize, PromptError> {
        loop {
            let line = self.ask("Enter the number of the SEGY file to load: ")?;
            match line.trim().parse::<i64>() {
                Ok(i) if i >= 0 && (i as u64) < len as u64 => return Ok(i as usize),
                Ok(_) => self.say(INVALID_INDEX)?,
                Err(_) => self.say(INVALID_NUMBER)?,
            }
        }
    }

    fn choose_one_or_two(&mut self) -> Result<usize, PromptError> {
        loop {
            let line = self.ask("Choice (1 or 2): ")?;
            match line.trim().parse::<usize>() {
                Ok(n @ (1 | 2)) => return Ok(n),
                _ => self.say(INVALID_CHOICE)?,
            }
        }
    }

    pub fn choose_mode(&mut self, config: &Config) -> Result<AcquisitionMode, PromptError> {
        self.say("Select the type of seismic data:")?;
        for mode in AcquisitionMode::all() {
            let line = format!("{}: {}", mode.menu_number(), mode.label(config));
            self.say(line)?;
        }
        loop {
            let line = self.ask("Choice (1 or 2): ")?;
            match line.trim().parse::<usize>().map(AcquisitionMode::try_from) {
                Ok(Ok(mode)) => return Ok(mode),
                _ => self.say(INVALID_CHOICE)?,
            }
        }
    }

    pub fn choose_plot(&mut self) -> Result<PlotKind, PromptError> {
        self.say("Choose the type of plot:")?;
        self.say("├── 1: Seismic collage")?;
        self.say("└── 2: Filtered data with envelope")?;
        let kind = match self.choose_one_or_two()? {
            1 => PlotKind::Collage,
            _ => PlotKind::FilteredEnvelope,
        };
        Ok(kind)
    }

    fn field<T: FromStr>(&mut self, question: &str) -> Result<Answer<T>, PromptError> {
        Ok(parse_answer(&self.ask(question)?))
    }

    /// Ask for the collage settings. The first malformed number stops the
    /// questions and resets every numeric field to the preset's values.
    pub fn ask_collage_parameters(
        &mut self,
        preset: Preset,
    ) -> Result<CollageParameters, PromptError> {
        let defaults = preset.collage_defaults();
        let cmap_line = self.ask(&format!(
            "Colormap for the plots (ENTER for default: {}): ",
            defaults.cmap
        ))?;
        let cmap = if cmap_line.is_empty() {
            defaults.cmap
        } else {
            cmap_line.trim().parse::<Colormap>().unwrap_or_else(|e| {
                warn!("{e}, using {}", defaults.cmap);
                defaults.cmap
            })
        };

        let numbers = self.ask_collage_numbers(&defaults)?;
        let params = match numbers {
            Some((fs, nfft, noverlap)) => CollageParameters {
                cmap,
                fs,
                nfft,
                noverlap,
            },
            None => {
                self.say(INVALID_VALUES)?;
                CollageParameters { cmap, ..defaults }
            }
        };
        self.say("Collage parameters")?;
        self.say(format!("├── Cmap: {}", params.cmap))?;
        self.say(format!("├── Fs: {}", params.fs))?;
        self.say(format!("├── NFFT: {}", params.nfft))?;
        self.say(format!("└── Noverlap: {}", params.noverlap))?;
        Ok(params)
    }

    fn ask_collage_numbers(
        &mut self,
        defaults: &CollageParameters,
    ) -> Result<Option<(f32, usize, usize)>, PromptError> {
        let question = format!(
            "Sampling frequency (Fs) (ENTER for default: {}): ",
            defaults.fs
        );
        let Some(fs) = self.field(&question)?.or(defaults.fs) else {
            return Ok(None);
        };
        let question = format!(
            "FFT window size (NFFT) (ENTER for default: {}): ",
            defaults.nfft
        );
        let Some(nfft) = self.field(&question)?.or(defaults.nfft) else {
            return Ok(None);
        };
        let question = format!(
            "Overlap (noverlap) (ENTER for default: {}): ",
            defaults.noverlap
        );
        let Some(noverlap) = self.field(&question)?.or(defaults.noverlap) else {
            return Ok(None);
        };
        Ok(Some((fs, nfft, noverlap)))
    }

    /// Ask for the band-pass corners and display window, with the same
    /// all-or-nothing fallback as the collage settings.
    pub fn ask_filter_parameters(&mut self) -> Result<FilterParameters, PromptError> {
        let params = match self.ask_filter_numbers()? {
            Some(p) => p,
            None => {
                self.say(INVALID_VALUES)?;
                FilterParameters::FALLBACK
            }
        };
        self.say("Filter parameters")?;
        self.say(format!("├── Minimum frequency: {} Hz", params.freqmin))?;
        self.say(format!("├── Maximum frequency: {} Hz", params.freqmax))?;
        self.say(format!("├── Start time: {} s", params.time_window.start))?;
        self.say(format!("└── End time: {} s", params.time_window.end))?;
        Ok(params)
    }

    fn ask_filter_numbers(&mut self) -> Result<Option<FilterParameters>, PromptError> {
        let d = FilterParameters::DEFAULT;
        let Some(freqmin) = self
            .field("Minimum filter frequency (Hz): ")?
            .or(d.freqmin)
        else {
            return Ok(None);
        };
        let Some(freqmax) = self
            .field("Maximum filter frequency (Hz): ")?
            .or(d.freqmax)
        else {
            return Ok(None);
        };
        let Some(start) = self
            .field("Display start time (s): ")?
            .or(d.time_window.start)
        else {
            return Ok(None);
        };
        let Some(end) = self
            .field("Display end time (s): ")?
            .or(d.time_window.end)
        else {
            return Ok(None);
        };
        Ok(Some(FilterParameters {
            freqmin,
            freqmax,
            time_window: TimeWindow { start, end },
        }))
    }

    pub fn ask_output_file(&mut self, default: &str) -> Result<String, PromptError> {
        let line = self.ask(&format!(
            "Output file name (with .png extension) (default: '{default}'): "
        ))?;
        if line.is_empty() {
            Ok(default.to_owned())
        } else {
            Ok(line)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn said(p: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.into_inner().1).expect("utf8")
    }

    #[test]
    fn answers() {
        assert_eq!(parse_answer::<f32>(""), Answer::Blank);
        assert_eq!(parse_answer::<f32>(" 2.5 "), Answer::Value(2.5));
        assert_eq!(parse_answer::<f32>("   "), Answer::Invalid);
        assert_eq!(parse_answer::<usize>("-3"), Answer::Invalid);
        assert_eq!(parse_answer::<usize>("1.5"), Answer::Invalid);
    }

    #[test]
    fn index_is_retried_until_valid() {
        let mut p = prompter("x\n-1\n5\n2\n");
        assert_eq!(p.choose_index(3).expect("index"), 2);
        let out = said(p);
        assert_eq!(out.matches(INVALID_NUMBER).count(), 1);
        assert_eq!(out.matches(INVALID_INDEX).count(), 2);
    }

    #[test]
    fn end_of_input_aborts() {
        let mut p = prompter("abc\n");
        assert!(matches!(p.choose_index(3), Err(PromptError::EndOfInput)));
    }

    #[test]
    fn menus() {
        let config = Config::default();
        let mut p = prompter("3\n2\n0\n1\n");
        assert_eq!(p.choose_mode(&config).expect("mode"), AcquisitionMode::Passive);
        assert_eq!(p.choose_plot().expect("plot"), PlotKind::Collage);
        let out = said(p);
        assert!(out.contains("1: Sismica Ativa\n2: Sismica Passiva\n"));
        assert_eq!(out.matches(INVALID_CHOICE).count(), 2);
    }

    #[test]
    fn mode_numbers_map_to_folders() {
        let config = Config::default();
        let mut p = prompter("x\n0\n1\n");
        assert_eq!(p.choose_mode(&config).expect("mode"), AcquisitionMode::Active);
        assert_eq!(said(p).matches(INVALID_CHOICE).count(), 2);
    }

    #[test]
    fn blank_collage_answers_give_preset_defaults() {
        let mut p = prompter("\n\n\n\n");
        let params = p.ask_collage_parameters(Preset::Standard).expect("params");
        assert_eq!(params, Preset::Standard.collage_defaults());
    }

    #[test]
    fn collage_values_are_taken() {
        let mut p = prompter("viridis\n100\n256\n128\n");
        let params = p.ask_collage_parameters(Preset::Quick).expect("params");
        assert_eq!(params.cmap, "viridis".parse().expect("cmap"));
        assert_eq!((params.fs, params.nfft, params.noverlap), (100.0, 256, 128));
    }

    #[test]
    fn one_bad_collage_value_resets_the_group() {
        // fs is accepted, nfft is not, noverlap is never asked.
        let mut p = prompter("gray\n50\nlots\n");
        let params = p.ask_collage_parameters(Preset::Quick).expect("params");
        assert_eq!(params.cmap, Colormap::GRAY);
        assert_eq!((params.fs, params.nfft, params.noverlap), (24.0, 800, 700));
        assert!(said(p).contains(INVALID_VALUES));
    }

    #[test]
    fn unknown_colormap_uses_preset() {
        let mut p = prompter("rainbowish\n\n\n\n");
        let params = p.ask_collage_parameters(Preset::Pro).expect("params");
        assert_eq!(params.cmap, Colormap::GRAY);
    }

    #[test]
    fn filter_defaults_and_fallback() {
        let mut p = prompter("\n\n\n\n");
        assert_eq!(
            p.ask_filter_parameters().expect("params"),
            FilterParameters::DEFAULT
        );

        let mut p = prompter("5\n \n");
        assert_eq!(
            p.ask_filter_parameters().expect("params"),
            FilterParameters::FALLBACK
        );
    }

    #[test]
    fn filter_values_are_taken() {
        let mut p = prompter("1\n3\n0\n60\n");
        let params = p.ask_filter_parameters().expect("params");
        assert_eq!((params.freqmin, params.freqmax), (1.0, 3.0));
        assert_eq!(params.time_window, TimeWindow { start: 0.0, end: 60.0 });
    }

    #[test]
    fn output_file_default() {
        let mut p = prompter("\nlines.png\n");
        assert_eq!(p.ask_output_file("SEIS.png").expect("name"), "SEIS.png");
        assert_eq!(p.ask_output_file("SEIS.png").expect("name"), "lines.png");
    }
}
