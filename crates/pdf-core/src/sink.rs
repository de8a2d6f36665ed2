//! Output sinks for finished documents
//!
//! A canvas hands its serialized bytes to a [`DocumentSink`] in order and then
//! signals completion once. Nothing is delivered before [`PdfCanvas::finish`].
//!
//! [`PdfCanvas::finish`]: crate::PdfCanvas::finish

use std::io::{self, Write};

/// Receiver of the document byte stream
pub trait DocumentSink {
    /// Receive the next chunk of the document
    fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()>;

    /// Called once after the last chunk
    fn complete(&mut self) -> io::Result<()>;
}

impl DocumentSink for Vec<u8> {
    fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.extend_from_slice(chunk);
        Ok(())
    }

    fn complete(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: DocumentSink + ?Sized> DocumentSink for &mut T {
    fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        (**self).write_chunk(chunk)
    }

    fn complete(&mut self) -> io::Result<()> {
        (**self).complete()
    }
}

/// Sink backed by a pair of callbacks
///
/// # Example
/// ```ignore
/// let mut pdf = Vec::new();
/// let sink = CallbackSink::new(|chunk: &[u8]| pdf.extend_from_slice(chunk), || println!("done"));
/// ```
pub struct CallbackSink<C, E>
where
    C: FnMut(&[u8]),
    E: FnOnce(),
{
    on_chunk: C,
    on_complete: Option<E>,
}

impl<C, E> CallbackSink<C, E>
where
    C: FnMut(&[u8]),
    E: FnOnce(),
{
    pub fn new(on_chunk: C, on_complete: E) -> Self {
        Self {
            on_chunk,
            on_complete: Some(on_complete),
        }
    }
}

impl<C, E> DocumentSink for CallbackSink<C, E>
where
    C: FnMut(&[u8]),
    E: FnOnce(),
{
    fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        (self.on_chunk)(chunk);
        Ok(())
    }

    fn complete(&mut self) -> io::Result<()> {
        if let Some(on_complete) = self.on_complete.take() {
            on_complete();
        }
        Ok(())
    }
}

/// Sink that forwards chunks to any [`Write`] and flushes on completion
pub struct WriteSink<W: Write> {
    inner: W,
}

impl<W: Write> WriteSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Unwrap the underlying writer
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> DocumentSink for WriteSink<W> {
    fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.inner.write_all(chunk)
    }

    fn complete(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Adapter that groups writes into sink chunks of a fixed size
pub(crate) struct ChunkWriter<'a, S: DocumentSink> {
    sink: &'a mut S,
    buffer: Vec<u8>,
    chunk_size: usize,
    failed: bool,
    pub(crate) chunks: usize,
    pub(crate) bytes: usize,
}

impl<'a, S: DocumentSink> ChunkWriter<'a, S> {
    pub(crate) fn new(sink: &'a mut S, chunk_size: usize) -> Self {
        Self {
            sink,
            buffer: Vec::with_capacity(chunk_size),
            chunk_size,
            failed: false,
            chunks: 0,
            bytes: 0,
        }
    }

    /// The sink is never called again once it has returned an error
    fn check_failed(&self) -> io::Result<()> {
        if self.failed {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "sink failed on an earlier chunk",
            ));
        }
        Ok(())
    }

    fn emit(&mut self, len: usize) -> io::Result<()> {
        let rest = self.buffer.split_off(len);
        let chunk = std::mem::replace(&mut self.buffer, rest);
        if let Err(e) = self.sink.write_chunk(&chunk) {
            self.failed = true;
            return Err(e);
        }
        self.chunks += 1;
        self.bytes += chunk.len();
        Ok(())
    }
}

impl<S: DocumentSink> Write for ChunkWriter<'_, S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.check_failed()?;
        self.buffer.extend_from_slice(buf);
        while self.buffer.len() >= self.chunk_size {
            self.emit(self.chunk_size)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.check_failed()?;
        if !self.buffer.is_empty() {
            self.emit(self.buffer.len())?;
        }
        Ok(())
    }
}
