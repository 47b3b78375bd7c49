use ndarray::Array1;
use num_traits::Float;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObserverError {
    #[error("unable to open dump file")]
    DumpFileError(#[from] std::io::Error),
    #[error("observed array lengths unequal")]
    LengthMismatch,
}

#[derive(Debug, Clone, Copy)]
pub enum FlowStep {
    Input,
    Filtered,
    Envelope,
}

/// Optional tap on the envelope flow. The null observer drops
/// everything.
pub enum FlowObserver<T> {
    NullObserver,
    Dumper(Box<FlowDumper<T>>),
}

impl<T: Float + Display> FlowObserver<T> {
    pub fn new_dumper(path: &Path, sample_rate_hz: T) -> Result<FlowObserver<T>, ObserverError> {
        let f = File::create(path)?;
        Ok(FlowObserver::Dumper(Box::new(FlowDumper::new(
            BufWriter::new(f),
            sample_rate_hz,
        ))))
    }

    pub fn null() -> FlowObserver<T> {
        FlowObserver::NullObserver
    }

    pub fn observe(&mut self, step: FlowStep, input: &Array1<T>) -> Result<(), ObserverError> {
        match self {
            Self::NullObserver => Ok(()),
            Self::Dumper(d) => d.observe(step, input),
        }
    }
}

/// Writes one `time input filtered envelope` row per sample once all
/// three stages of a trace have been seen.
pub struct FlowDumper<T> {
    out: Box<dyn Write>,
    sample_rate_hz: T,
    input: Array1<T>,
    filtered: Array1<T>,
}

impl<T: Float + Display> FlowDumper<T> {
    pub fn new<W: Write + 'static>(out: W, sample_rate_hz: T) -> FlowDumper<T> {
        FlowDumper {
            out: Box::new(out),
            sample_rate_hz,
            input: Array1::from_vec(vec![]),
            filtered: Array1::from_vec(vec![]),
        }
    }

    fn observe(&mut self, step: FlowStep, input: &Array1<T>) -> Result<(), ObserverError> {
        match step {
            FlowStep::Input => self.input = input.clone(),
            FlowStep::Filtered => self.filtered = input.clone(),
            FlowStep::Envelope => {
                let n = input.len();
                if self.input.len() != n || self.filtered.len() != n {
                    return Err(ObserverError::LengthMismatch);
                }
                for i in 0..n {
                    let t = T::from(i).unwrap_or_else(T::zero) / self.sample_rate_hz;
                    let inp = self.input[i];
                    let fil = self.filtered[i];
                    let env = input[i];
                    writeln!(self.out, "{t} {inp} {fil} {env}")?;
                }
                self.out.flush()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Shared(Rc<RefCell<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn dumps_rows_after_envelope() {
        let sink = Shared::default();
        let mut obs = FlowObserver::Dumper(Box::new(FlowDumper::new(sink.clone(), 2.0_f32)));
        obs.observe(FlowStep::Input, &array![1.0, 2.0]).expect("input");
        obs.observe(FlowStep::Filtered, &array![0.5, 0.25]).expect("filtered");
        assert!(sink.0.borrow().is_empty());
        obs.observe(FlowStep::Envelope, &array![0.5, 0.75]).expect("envelope");
        let text = String::from_utf8(sink.0.borrow().clone()).expect("utf8");
        assert_eq!(text, "0 1 0.5 0.5\n0.5 2 0.25 0.75\n");
    }

    #[test]
    fn mismatched_lengths_are_reported() {
        let mut obs = FlowObserver::Dumper(Box::new(FlowDumper::new(Shared::default(), 1.0_f32)));
        obs.observe(FlowStep::Input, &array![1.0]).expect("input");
        let res = obs.observe(FlowStep::Envelope, &array![1.0, 2.0]);
        assert!(matches!(res, Err(ObserverError::LengthMismatch)));
        assert!(FlowObserver::<f32>::null()
            .observe(FlowStep::Input, &array![1.0])
            .is_ok());
    }
}
