use super::ReadAt;
use async_trait::async_trait;

/// In-memory archives, e.g. a backup already downloaded into a buffer.
#[async_trait]
impl ReadAt for Vec<u8> {
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<usize> {
        let len = self.len() as u64;
        if offset >= len {
            return Ok(0);
        }
        let start = offset as usize;
        let n = buf.len().min(self.len() - start);
        buf[..n].copy_from_slice(&self[start..start + n]);
        Ok(n)
    }

    fn size(&self) -> u64 {
        self.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_past_end_return_zero() {
        let data = b"hello".to_vec();
        let mut buf = [0u8; 4];
        assert_eq!(data.read_at(3, &mut buf).await.unwrap(), 2);
        assert_eq!(&buf[..2], b"lo");
        assert_eq!(data.read_at(5, &mut buf).await.unwrap(), 0);
        assert_eq!(data.read_at(100, &mut buf).await.unwrap(), 0);
    }
}
