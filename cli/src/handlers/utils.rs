use core::fmt;
use std::io::{self, BufRead, IsTerminal};

use riffshare_core::actions::LinkOpener;

pub struct WriteAdapter<W>(pub W);

impl<W> fmt::Write for WriteAdapter<W>
where
    W: io::Write,
{
    fn write_str(&mut self, s: &str) -> Result<(), fmt::Error> {
        self.0.write_all(s.as_bytes()).map_err(|_| fmt::Error)
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), fmt::Error> {
        self.0.write_fmt(args).map_err(|_| fmt::Error)
    }
}

pub trait StdIn {
    fn is_terminal(&self) -> bool;
    fn lines(&self) -> impl Iterator<Item = io::Result<String>>;
}

impl StdIn for io::Stdin {
    fn is_terminal(&self) -> bool {
        self.lock().is_terminal()
    }
    fn lines(&self) -> impl Iterator<Item = io::Result<String>> {
        io::BufReader::new(self.lock()).lines()
    }
}

/// Read a yes/no answer from the first line of `stdin`. Anything but "y" or "yes" is a no.
pub fn confirm<S: StdIn>(stdin: &S) -> bool {
    stdin
        .lines()
        .next()
        .and_then(Result::ok)
        .is_some_and(|answer| matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Opens links with the system's default handler (usually the browser).
pub struct SystemOpener;

impl LinkOpener for SystemOpener {
    fn open(&self, link: &str) -> io::Result<()> {
        open::that_detached(link)
    }
}
