//! Destinations for action lines and reports.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Where a session writes its action lines and reports.
pub(crate) enum OutputSink {
    Stdout,
    File {
        path: PathBuf,
        writer: BufWriter<File>,
    },
    Writer(Box<dyn Write>),
}

impl OutputSink {
    /// Creates (or truncates) the file at `path` and returns a sink writing to it.
    pub(crate) fn open_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let file = File::create(&path).map_err(|source| Error::OutputFileOpen {
            path: path.clone(),
            source,
        })?;

        Ok(Self::File {
            path,
            writer: BufWriter::new(file),
        })
    }

    /// Writes one line. Output is best-effort: failures are reported on stderr and
    /// otherwise swallowed so that instrumentation never breaks the measured program.
    pub(crate) fn write_line(&mut self, line: fmt::Arguments<'_>) {
        let result = match self {
            Self::Stdout => writeln!(io::stdout().lock(), "{line}"),
            Self::File { writer, .. } => writeln!(writer, "{line}").and_then(|()| writer.flush()),
            Self::Writer(writer) => writeln!(writer, "{line}"),
        };

        if let Err(e) = result {
            eprintln!("action_clock: failed to write to {self:?}: {e}");
        }
    }
}

impl fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => write!(f, "stdout"),
            Self::File { path, .. } => write!(f, "file '{}'", path.display()),
            Self::Writer(_) => write!(f, "custom writer"),
        }
    }
}

/// Shared in-memory writer that lets tests read back what a session wrote.
#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub(crate) struct CapturedOutput {
    buffer: std::rc::Rc<std::cell::RefCell<Vec<u8>>>,
}

#[cfg(test)]
impl CapturedOutput {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn contents(&self) -> String {
        String::from_utf8(self.buffer.borrow().clone()).expect("sink output is always UTF-8")
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }

    pub(crate) fn clear(&self) {
        self.buffer.borrow_mut().clear();
    }
}

#[cfg(test)]
impl Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn writer_sink_receives_lines() {
        let captured = CapturedOutput::new();
        let mut sink = OutputSink::Writer(Box::new(captured.clone()));

        sink.write_line(format_args!("first {}", 1));
        sink.write_line(format_args!("second"));

        assert_eq!(captured.lines(), vec!["first 1", "second"]);
    }

    #[test]
    #[cfg_attr(miri, ignore)] // Miri cannot use the real file system.
    fn file_sink_writes_through_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timings.txt");

        let mut sink = OutputSink::open_file(&path).unwrap();
        sink.write_line(format_args!("hello"));

        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    #[cfg_attr(miri, ignore)] // Miri cannot use the real file system.
    fn open_file_in_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("timings.txt");

        let result = OutputSink::open_file(&path);

        assert!(matches!(
            result,
            Err(Error::OutputFileOpen { path: p, .. }) if p == path
        ));
    }

    #[test]
    fn debug_names_the_destination() {
        assert_eq!(format!("{:?}", OutputSink::Stdout), "stdout");
        assert_eq!(
            format!("{:?}", OutputSink::Writer(Box::new(io::sink()))),
            "custom writer"
        );
    }
}
