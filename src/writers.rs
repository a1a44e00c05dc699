use crate::WriteLine;
use std::io::{self, Write};

#[cfg(windows)]
use winapi_util::console as wincon;

/// `std::io` implements `Stdout` and `Stderr` (and their `Lock` variants) as
/// separate types, which makes it difficult to abstract over them. We use
/// some simple internal enum types to work around this.
#[derive(Clone, Copy, Debug)]
enum StandardStreamType {
    Stdout,
    Stderr,
}

#[derive(Debug)]
enum IoStandardStream {
    Stdout(io::Stdout),
    Stderr(io::Stderr),
}

impl IoStandardStream {
    fn new(sty: StandardStreamType) -> IoStandardStream {
        match sty {
            StandardStreamType::Stdout => {
                IoStandardStream::Stdout(io::stdout())
            }
            StandardStreamType::Stderr => {
                IoStandardStream::Stderr(io::stderr())
            }
        }
    }

    fn lock(&self) -> IoStandardStreamLock<'_> {
        match *self {
            IoStandardStream::Stdout(ref s) => {
                IoStandardStreamLock::StdoutLock(s.lock())
            }
            IoStandardStream::Stderr(ref s) => {
                IoStandardStreamLock::StderrLock(s.lock())
            }
        }
    }
}

// Same rigmarole for the locked variants of the standard streams.

#[derive(Debug)]
enum IoStandardStreamLock<'a> {
    StdoutLock(io::StdoutLock<'a>),
    StderrLock(io::StderrLock<'a>),
}

impl io::Write for IoStandardStreamLock<'_> {
    #[inline(always)]
    fn write(&mut self, b: &[u8]) -> io::Result<usize> {
        match *self {
            IoStandardStreamLock::StdoutLock(ref mut s) => s.write(b),
            IoStandardStreamLock::StderrLock(ref mut s) => s.write(b),
        }
    }

    #[inline(always)]
    fn flush(&mut self) -> io::Result<()> {
        match *self {
            IoStandardStreamLock::StdoutLock(ref mut s) => s.flush(),
            IoStandardStreamLock::StderrLock(ref mut s) => s.flush(),
        }
    }
}

/// A standard stream for writing styled lines to stdout or stderr.
///
/// Every line is written while holding the stream's lock, with a single
/// write followed by a flush.
///
/// On Windows, creating a `StandardStream` attempts to enable virtual
/// terminal processing on the console so that ANSI escape sequences are
/// interpreted. Failing to do so is not an error.
#[derive(Debug)]
pub struct StandardStream {
    stream: IoStandardStream,
}

impl StandardStream {
    /// Create a new `StandardStream` that writes to standard output.
    pub fn stdout() -> StandardStream {
        StandardStream::create(StandardStreamType::Stdout)
    }

    /// Create a new `StandardStream` that writes to standard error.
    pub fn stderr() -> StandardStream {
        StandardStream::create(StandardStreamType::Stderr)
    }

    fn create(sty: StandardStreamType) -> StandardStream {
        enable_virtual_terminal(sty);
        StandardStream { stream: IoStandardStream::new(sty) }
    }
}

#[cfg(not(windows))]
fn enable_virtual_terminal(_sty: StandardStreamType) {}

#[cfg(windows)]
fn enable_virtual_terminal(sty: StandardStreamType) {
    let con_res = match sty {
        StandardStreamType::Stdout => wincon::Console::stdout(),
        StandardStreamType::Stderr => wincon::Console::stderr(),
    };
    let result = con_res
        .and_then(|mut con| con.set_virtual_terminal_processing(true));
    if let Err(err) = result {
        tracing::debug!(
            stream = ?sty,
            %err,
            "could not enable virtual terminal processing"
        );
    }
}

impl WriteLine for StandardStream {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut wtr = self.stream.lock();
        wtr.write_all(with_newline(line).as_bytes())?;
        wtr.flush()
    }
}

fn with_newline(line: &str) -> String {
    let mut buf = String::with_capacity(line.len() + 1);
    buf.push_str(line);
    buf.push('\n');
    buf
}

/// Satisfies `WriteLine` for any `io::Write`, writing the line's ANSI
/// escape sequences as is.
#[derive(Clone, Debug)]
pub struct Ansi<W>(pub W);

impl<W: Write> Ansi<W> {
    /// Create a new writer that satisfies `WriteLine` for `wtr`.
    pub fn new(wtr: W) -> Ansi<W> {
        Ansi(wtr)
    }

    /// Consume this `Ansi` value and return the inner writer.
    pub fn into_inner(self) -> W {
        self.0
    }

    /// Return a reference to the inner writer.
    pub fn get_ref(&self) -> &W {
        &self.0
    }

    /// Return a mutable reference to the inner writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.0
    }
}

impl<W: io::Write> WriteLine for Ansi<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.0.write_all(with_newline(line).as_bytes())
    }
}

impl WriteLine for Vec<u8> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.extend_from_slice(line.as_bytes());
        self.push(b'\n');
        Ok(())
    }
}

impl WriteLine for String {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.push_str(line);
        self.push('\n');
        Ok(())
    }
}

impl WriteLine for io::Sink {
    fn write_line(&mut self, _line: &str) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Counts `write` calls to check that a line is a single write.
    #[derive(Debug, Default)]
    struct CountingWriter {
        writes: usize,
        bytes: Vec<u8>,
    }

    impl io::Write for CountingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes += 1;
            self.bytes.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn ansi_writes_line_and_newline_at_once() {
        let mut wtr = Ansi::new(CountingWriter::default());
        wtr.write_line("\x1B[1mhello\x1B[0m").unwrap();
        let inner = wtr.into_inner();
        assert_eq!(inner.writes, 1);
        assert_eq!(inner.bytes, b"\x1B[1mhello\x1B[0m\n");
    }

    #[test]
    fn in_memory_sinks() {
        let mut s = String::new();
        s.write_line("a").unwrap();
        s.write_line("").unwrap();
        assert_eq!(s, "a\n\n");

        let mut v: Vec<u8> = vec![];
        (&mut v).write_line("b").unwrap();
        assert_eq!(v, b"b\n");

        let mut boxed: Box<dyn WriteLine> = Box::new(io::sink());
        boxed.write_line("dropped").unwrap();
    }
}
