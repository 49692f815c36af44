mod local;
mod memory;

pub use local::LocalFileReader;

use async_trait::async_trait;

/// Trait for random access reading from a data source
///
/// Every read names its own offset. Implementations must not keep a notion
/// of "current position" that callers depend on.
#[async_trait]
pub trait ReadAt: Send + Sync {
    /// Read data at the specified offset into the buffer
    ///
    /// May return fewer bytes than requested; `Ok(0)` means the source is
    /// exhausted at `offset`.
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<usize>;

    /// Get the total size of the data source
    fn size(&self) -> u64;

    /// Keep reading until `buf` is full or the source runs out.
    ///
    /// Returns the number of bytes placed in `buf`.
    async fn read_full_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read_at(offset + filled as u64, &mut buf[filled..]).await {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}
