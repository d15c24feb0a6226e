use std::path::{Path, PathBuf};

/// Load the record from disk.
///
/// A missing, unreadable or non-numeric record file counts as no record
/// and yields `0.0`.
pub fn load(path: &Path) -> f64 {
    match std::fs::read_to_string(path) {
        Ok(content) => parse(&content).unwrap_or(0.0),
        Err(_) => 0.0,
    }
}

/// Save the record to disk.
///
/// The value is written with two decimals and replaces the file contents.
pub fn save(path: &Path, value: f64) -> std::io::Result<()> {
    std::fs::write(path, format(value))
}

fn parse(content: &str) -> Option<f64> {
    content
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn format(value: f64) -> String {
    format!("{:.2}", value)
}

/// Record store.
///
/// The record store owns the best balancing time. The in-memory value only
/// moves after the new value reached the disk.
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    best: f64,
}

impl RecordStore {
    /// Open the record store and load the current record.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let best = load(&path);

        log::trace!("Loaded record {:.2} s", best);

        Self { path, best }
    }

    /// Retrieve the best time in seconds.
    #[inline]
    pub fn best(&self) -> f64 {
        self.best
    }

    /// Retrieve the record file path.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Observe an elapsed time.
    ///
    /// Returns `true` when the elapsed time is strictly greater than the
    /// current record and was persisted.
    pub fn observe(&mut self, elapsed: f64) -> std::io::Result<bool> {
        if elapsed > self.best {
            save(&self.path, elapsed)?;
            self.best = elapsed;

            return Ok(true);
        }

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing() {
        let dir = tempfile::tempdir().unwrap();

        assert_eq!(load(&dir.path().join("best_time.txt")), 0.0);
    }

    #[test]
    fn test_load_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("best_time.txt");

        std::fs::write(&path, "abc").unwrap();
        assert_eq!(load(&path), 0.0);

        std::fs::write(&path, "").unwrap();
        assert_eq!(load(&path), 0.0);

        std::fs::write(&path, "NaN").unwrap();
        assert_eq!(load(&path), 0.0);
    }

    #[test]
    fn test_load_trims_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("best_time.txt");

        std::fs::write(&path, " 12.34\n").unwrap();
        assert_eq!(load(&path), 12.34);
    }

    #[test]
    fn test_load_directory() {
        let dir = tempfile::tempdir().unwrap();

        assert_eq!(load(dir.path()), 0.0);
    }

    #[test]
    fn test_save_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("best_time.txt");

        std::fs::write(&path, "5.00").unwrap();
        let before = std::fs::read(&path).unwrap();

        let value = load(&path);
        save(&path, value).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_save_rounds_two_decimals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("best_time.txt");

        for value in [0.0, 0.004, 1.005, 3.14159, 12.345678, 9_999.999] {
            save(&path, value).unwrap();

            let expected: f64 = format!("{:.2}", value).parse().unwrap();
            assert_eq!(load(&path), expected);
        }
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("best_time.txt");

        save(&path, 123.456).unwrap();
        save(&path, 7.0).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "7.00");
    }

    #[test]
    fn test_store_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("best_time.txt");

        let mut store = RecordStore::open(&path);
        assert_eq!(store.best(), 0.0);

        let saves: Vec<f64> = [1.5, 3.2, 2.8, 4.0]
            .into_iter()
            .filter(|elapsed| store.observe(*elapsed).unwrap())
            .collect();

        assert_eq!(saves, vec![1.5, 3.2, 4.0]);
        assert_eq!(store.best(), 4.0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "4.00");
    }

    #[test]
    fn test_store_equal_is_not_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("best_time.txt");

        std::fs::write(&path, "2.50").unwrap();

        let mut store = RecordStore::open(&path);
        assert_eq!(store.best(), 2.5);
        assert!(!store.observe(2.5).unwrap());
        assert!(!store.observe(1.0).unwrap());
        assert!(store.observe(2.51).unwrap());
    }

    #[test]
    fn test_store_write_failure_keeps_best() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("best_time.txt");

        let mut store = RecordStore::open(&path);

        assert!(store.observe(1.0).is_err());
        assert_eq!(store.best(), 0.0);
    }
}
