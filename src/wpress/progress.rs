/// Lifecycle callbacks for an extraction run.
///
/// All methods default to no-ops. Byte counts are archive offsets, so
/// progress can be rendered against the `total_bytes` passed to
/// [`on_start`](Self::on_start).
pub trait ExtractProgress {
    /// Called once the input is open, with its size in bytes.
    fn on_start(&mut self, _total_bytes: u64) {}

    /// Called after every entry with the number of archive bytes consumed so far.
    fn on_progress(&mut self, _bytes_consumed: u64) {}

    /// Called after the terminator with the number of extracted entries.
    fn on_finish(&mut self, _entry_count: u64) {}
}

impl ExtractProgress for () {}
