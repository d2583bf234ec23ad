//! On-disk copy of a recording in progress.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tasbridge_movie::Movie;
use tracing::{debug, warn};

use crate::exit::{io_error, CliResult};

/// Appends recorded frames to the output dump as they are captured.
///
/// Clones share one file. The Ctrl-C handler keeps a clone so it can flush
/// every captured frame before it exits the process out from under a
/// session blocked on a silent device.
#[derive(Clone)]
pub struct Journal {
    inner: Arc<Mutex<JournalInner>>,
}

struct JournalInner {
    writer: Option<BufWriter<File>>,
    frames: usize,
}

impl Journal {
    pub fn create(path: &Path) -> CliResult<Self> {
        let file = File::create(path)
            .map_err(|err| io_error(&format!("cannot create {}", path.display()), err))?;
        debug!(path = %path.display(), "recording journal opened");
        Ok(Self {
            inner: Arc::new(Mutex::new(JournalInner {
                writer: Some(BufWriter::new(file)),
                frames: 0,
            })),
        })
    }

    /// Append the frames of `movie` not journaled yet.
    pub fn sync(&self, movie: &Movie) {
        let mut inner = self.lock();
        if let Err(err) = inner.append(movie) {
            warn!(error = %err, "recording journal write failed, journaling stopped");
            inner.writer = None;
        }
    }

    /// Push buffered frames to the file.
    pub fn flush(&self) {
        let mut inner = self.lock();
        let frames = inner.frames;
        if let Some(writer) = inner.writer.as_mut() {
            match writer.flush() {
                Ok(()) => debug!(frames, "recording journal flushed"),
                Err(err) => warn!(error = %err, frames, "recording journal flush failed"),
            }
        }
    }

    /// Flush and stop journaling. Later calls do nothing.
    pub fn close(&self) {
        self.flush();
        self.lock().writer = None;
    }

    /// Frames appended so far.
    pub fn frames(&self) -> usize {
        self.lock().frames
    }

    fn lock(&self) -> MutexGuard<'_, JournalInner> {
        // Poisoned only if a sync panicked; the file is still writable.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl JournalInner {
    fn append(&mut self, movie: &Movie) -> std::io::Result<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        while self.frames < movie.frames() {
            if let Some(samples) = movie.inputs().frame(self.frames) {
                for sample in samples {
                    writer.write_all(sample.as_bytes())?;
                }
            }
            self.frames += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tasbridge_movie::MovieMetadata;

    use super::*;

    fn unique_path(tag: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "tasbridge-journal-{tag}-{}-{}.raw",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time should be after epoch")
                .as_nanos()
        ))
    }

    fn movie(controllers: usize) -> Movie {
        Movie::new(MovieMetadata {
            system: "Nintendo 64".to_string(),
            game: String::new(),
            controllers,
            author: String::new(),
            description: String::new(),
        })
        .unwrap()
    }

    #[test]
    fn appends_only_new_frames() {
        let path = unique_path("append");
        let journal = Journal::create(&path).unwrap();
        let mut movie = movie(2);

        movie.write(&[1, 1, 1, 1, 2, 2, 2, 2]).unwrap();
        journal.sync(&movie);
        journal.sync(&movie);
        movie.write(&[3, 3, 3, 3, 4, 4, 4, 4]).unwrap();
        journal.sync(&movie);
        journal.flush();

        assert_eq!(journal.frames(), 2);
        assert_eq!(
            std::fs::read(&path).unwrap(),
            vec![1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4]
        );
    }

    #[test]
    fn clone_flushes_shared_file() {
        let path = unique_path("clone");
        let journal = Journal::create(&path).unwrap();
        let handler_copy = journal.clone();
        let mut movie = movie(1);

        movie.write(&[9, 9, 9, 9]).unwrap();
        journal.sync(&movie);
        handler_copy.flush();

        assert_eq!(std::fs::read(&path).unwrap(), vec![9, 9, 9, 9]);
    }

    #[test]
    fn closed_journal_ignores_new_frames() {
        let path = unique_path("closed");
        let journal = Journal::create(&path).unwrap();
        let mut movie = movie(1);

        journal.close();
        movie.write(&[5, 5, 5, 5]).unwrap();
        journal.sync(&movie);
        journal.flush();

        assert_eq!(journal.frames(), 0);
        assert!(std::fs::read(&path).unwrap().is_empty());
    }
}
