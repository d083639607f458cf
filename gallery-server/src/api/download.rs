//! GET /api/images/download-all → application/zip
//!
//! Every non-deleted image, newest first, streamed as one archive. A fetch
//! task feeds objects one at a time to a blocking zip writer, whose output is
//! forwarded to the response body in chunks. Objects that cannot be fetched
//! are skipped.

use std::collections::HashSet;
use std::io::{self, Write};

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use shared::ListQuery;
use shared::models::{Image, file_stem};
use tokio::sync::mpsc;
use zip::write::FileOptions;

use crate::error::ServiceResult;
use crate::state::AppState;

const ARCHIVE_NAME: &str = "all_images.zip";

/// Compressed bytes buffered before a chunk is handed to the body
const CHUNK_BYTES: usize = 64 * 1024;
/// Chunks queued ahead of a slow client
const CHUNK_QUEUE: usize = 8;

type Chunk = Result<Vec<u8>, io::Error>;

pub async fn download_all(State(state): State<AppState>) -> ServiceResult<impl IntoResponse> {
    let images = state.images.list(&ListQuery::default()).await?;
    let total = images.len();

    // Capacity 1: at most one fetched image waits while another is compressed
    let (entry_tx, entry_rx) = mpsc::channel::<(String, Vec<u8>)>(1);
    let (chunk_tx, chunk_rx) = mpsc::channel::<Chunk>(CHUNK_QUEUE);

    let storage = state.storage.clone();
    tokio::spawn(async move {
        let mut names = EntryNames::default();
        for image in &images {
            match storage.fetch(&image.uri).await {
                Ok(bytes) => {
                    if entry_tx.send((names.next(image), bytes)).await.is_err() {
                        tracing::debug!("Archive writer stopped, abandoning fetches");
                        return;
                    }
                }
                Err(e) => {
                    tracing::warn!(image_id = %image.id, error = %e, "Skipping image in archive");
                }
            }
        }
    });

    tokio::task::spawn_blocking(move || {
        let error_tx = chunk_tx.clone();
        match write_archive(entry_rx, chunk_tx) {
            Ok(packed) => {
                tracing::info!(packed, skipped = total - packed, "Streamed image archive");
            }
            Err(e) => {
                tracing::error!(error = %e, "Image archive aborted");
                let _ = error_tx.blocking_send(Err(io::Error::other(e.to_string())));
            }
        }
    });

    let body = Body::from_stream(futures::stream::unfold(chunk_rx, |mut rx| async move {
        rx.recv().await.map(|chunk| (chunk, rx))
    }));

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{ARCHIVE_NAME}\""),
            ),
        ],
        body,
    ))
}

/// Runs on a blocking thread: one entry per received object, each object's
/// bytes dropped before the next is taken. Returns the number of entries.
fn write_archive(
    mut entries: mpsc::Receiver<(String, Vec<u8>)>,
    chunks: mpsc::Sender<Chunk>,
) -> zip::result::ZipResult<usize> {
    let mut zip = zip::ZipWriter::new_stream(ChannelWriter::new(chunks));
    let options: FileOptions<()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut packed = 0;
    while let Some((name, bytes)) = entries.blocking_recv() {
        zip.start_file(name, options)?;
        zip.write_all(&bytes)?;
        packed += 1;
    }
    zip.finish()?;
    Ok(packed)
}

/// Sync `Write` end of the body channel
struct ChannelWriter {
    tx: mpsc::Sender<Chunk>,
    buf: Vec<u8>,
}

impl ChannelWriter {
    fn new(tx: mpsc::Sender<Chunk>) -> Self {
        Self {
            tx,
            buf: Vec::with_capacity(CHUNK_BYTES),
        }
    }

    fn send_buffered(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let chunk = std::mem::replace(&mut self.buf, Vec::with_capacity(CHUNK_BYTES));
        self.tx
            .blocking_send(Ok(chunk))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "download client went away"))
    }
}

impl Write for ChannelWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        if self.buf.len() >= CHUNK_BYTES {
            self.send_buffered()?;
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.send_buffered()
    }
}

impl Drop for ChannelWriter {
    fn drop(&mut self) {
        // Trailing central directory bytes
        let _ = self.send_buffered();
    }
}

/// Unique, flat entry names for the archive
#[derive(Debug, Default)]
struct EntryNames {
    used: HashSet<String>,
}

impl EntryNames {
    /// `file_name`, with the extension added when missing and path separators
    /// flattened. Repeats get `-2`, `-3`, ... before the extension.
    fn next(&mut self, image: &Image) -> String {
        let raw = image.file_name.trim().replace(['/', '\\'], "_");
        let base = if raw.is_empty() || raw.chars().all(|c| c == '.' || c == '_') {
            image.id.clone()
        } else {
            raw
        };

        let ext = image.extension();
        let has_ext = file_stem(&base) != base && base.to_ascii_lowercase().ends_with(&ext);
        let stem = if has_ext { file_stem(&base) } else { base.as_str() }.to_string();

        let mut candidate = format!("{stem}.{ext}");
        let mut n = 2;
        while !self.used.insert(candidate.clone()) {
            candidate = format!("{stem}-{n}.{ext}");
            n += 1;
        }
        candidate
    }
}
