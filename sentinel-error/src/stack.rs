//! Call stack capture for chain links
//!
//! A [`StackTrace`] records the raw call stack when it is created and only
//! resolves symbols the first time it is asked for a [`Snapshot`]. The
//! snapshot is published whole through an `ArcSwapOption`: two threads that
//! miss the cache at the same time both resolve, both get equal results and
//! the last store wins.

use arc_swap::ArcSwapOption;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::sync::Arc;

#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

/// Maximum number of frames kept in a snapshot
pub const MAX_FRAMES: usize = 32;

const CRATE_PREFIX: &str = concat!(env!("CARGO_CRATE_NAME"), "::");

/// Functions of this crate that sit between the caller and the capture
const CONSTRUCTORS: &[&str] = &["::capture", "::with_stack", "::wrap_with_stack"];

/// One call site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub function: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.function)?;
        match (&self.file, self.line) {
            (Some(file), Some(line)) => writeln!(f, "\t{}:{}", file, line),
            (Some(file), None) => writeln!(f, "\t{}", file),
            _ => Ok(()),
        }
    }
}

/// A resolved, deduplicated call path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    frames: Vec<Frame>,
    rendered: String,
}

impl Snapshot {
    fn new(frames: Vec<Frame>) -> Self {
        let rendered = frames.iter().map(Frame::to_string).collect();
        Self { frames, rendered }
    }

    /// Frames ordered from the caller outwards
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn as_str(&self) -> &str {
        &self.rendered
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

/// A captured call stack with a lazily resolved snapshot
pub struct StackTrace {
    trace: Backtrace,
    snapshot: ArcSwapOption<Snapshot>,
    #[cfg(test)]
    resolves: AtomicUsize,
}

impl StackTrace {
    /// Record the current call stack without resolving it
    pub(crate) fn capture() -> Self {
        let trace = Backtrace::force_capture();
        tracing::trace!(status = ?trace.status(), "stack captured");
        Self {
            trace,
            snapshot: ArcSwapOption::empty(),
            #[cfg(test)]
            resolves: AtomicUsize::new(0),
        }
    }

    /// The resolved snapshot, computed on first use and cached afterwards
    pub fn snapshot(&self) -> Arc<Snapshot> {
        if let Some(snapshot) = self.snapshot.load_full() {
            return snapshot;
        }

        let snapshot = Arc::new(self.resolve());
        self.snapshot.store(Some(Arc::clone(&snapshot)));
        snapshot
    }

    fn resolve(&self) -> Snapshot {
        #[cfg(test)]
        self.resolves.fetch_add(1, Ordering::Relaxed);

        if self.trace.status() != BacktraceStatus::Captured {
            return Snapshot::new(Vec::new());
        }

        let frames = parse_frames(&self.trace.to_string());
        let mut kept: Vec<Frame> = Vec::with_capacity(MAX_FRAMES);
        for frame in frames.into_iter().skip_while(|frame| is_machinery(&frame.function)) {
            if kept.last() == Some(&frame) {
                continue;
            }
            kept.push(frame);
            if kept.len() == MAX_FRAMES {
                break;
            }
        }
        tracing::trace!(frames = kept.len(), "stack resolved");
        Snapshot::new(kept)
    }

    #[cfg(test)]
    pub(crate) fn resolve_count(&self) -> usize {
        self.resolves.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackTrace")
            .field("status", &self.trace.status())
            .field("resolved", &self.snapshot.load().is_some())
            .finish()
    }
}

/// Frames of the backtrace implementation and of this crate's constructors
fn is_machinery(function: &str) -> bool {
    if function.contains("std::backtrace") || function.contains("backtrace_rs") {
        return true;
    }
    // generic functions may be demangled with their arguments
    let name = function.split("::<").next().unwrap_or(function);
    name.trim_start_matches('<').starts_with(CRATE_PREFIX)
        && CONSTRUCTORS.iter().any(|suffix| name.ends_with(suffix))
}

/// Parse the text form of a `Backtrace`:
///
/// ```text
///    3: my_app::load
///              at ./src/main.rs:12:5
///       my_app::inlined_helper
///              at ./src/main.rs:30:9
/// ```
fn parse_frames(text: &str) -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(location) = line.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                let (file, number) = split_location(location);
                frame.file = Some(file.to_string());
                frame.line = number;
            }
            continue;
        }

        let function = match line.split_once(": ") {
            Some((index, name)) if index.chars().all(|c| c.is_ascii_digit()) => name,
            _ => line,
        };
        frames.push(Frame {
            function: function.to_string(),
            file: None,
            line: None,
        });
    }
    frames
}

/// `./src/main.rs:12:5` splits into `./src/main.rs` and `12`
fn split_location(location: &str) -> (&str, Option<u32>) {
    let mut parts = location.rsplitn(3, ':');
    let last = parts.next();
    let middle = parts.next();
    let rest = parts.next();
    match (rest, middle, last) {
        (Some(file), Some(line), Some(_column)) => match line.parse() {
            Ok(line) => (file, Some(line)),
            Err(_) => (location, None),
        },
        (None, Some(file), Some(line)) => match line.parse() {
            Ok(line) => (file, Some(line)),
            Err(_) => (location, None),
        },
        _ => (location, None),
    }
}
