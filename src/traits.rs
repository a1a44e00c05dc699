use std::io;

/// This trait describes sinks that styled lines are written to.
pub trait WriteLine {
    /// Writes `line` followed by a single newline.
    ///
    /// Implementations should emit the line and its newline with one write
    /// so that lines from concurrent writers don't interleave.
    ///
    /// If there was a problem writing the line, then an error is returned.
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

impl<T: ?Sized + WriteLine> WriteLine for &mut T {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }
}

impl<T: ?Sized + WriteLine> WriteLine for Box<T> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }
}
