use std::time::Duration;

use async_trait::async_trait;
use lopdf::Document;

use crate::application::ports::{PageSegmenter, SegmenterError};
use crate::domain::{ContentType, PageDocument, StatementDocument};

pub struct LopdfPageSegmenter {
    max_pages: usize,
    timeout: Duration,
}

impl LopdfPageSegmenter {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    pub fn new(max_pages: usize) -> Self {
        Self {
            max_pages: max_pages.max(1),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl PageSegmenter for LopdfPageSegmenter {
    #[tracing::instrument(
        skip(self, document),
        fields(document_id = %document.id.as_uuid(), size_bytes = document.size_bytes())
    )]
    async fn split(
        &self,
        document: &StatementDocument,
    ) -> Result<Vec<PageDocument>, SegmenterError> {
        if document.content_type != ContentType::Pdf {
            return Err(SegmenterError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            ));
        }

        let data = document.data.clone();
        let max_pages = self.max_pages;

        let buffers = tokio::time::timeout(
            self.timeout,
            tokio::task::spawn_blocking(move || {
                std::panic::catch_unwind(|| split_pages(&data, max_pages)).unwrap_or_else(|_| {
                    Err(SegmenterError::ParseFailed(
                        "panic while splitting PDF pages".to_string(),
                    ))
                })
            }),
        )
        .await
        .map_err(|_| SegmenterError::TimedOut)?
        .map_err(|e| SegmenterError::ParseFailed(format!("task join error: {e}")))??;

        tracing::info!(page_count = buffers.len(), "PDF split into single pages");

        Ok(buffers
            .into_iter()
            .enumerate()
            .map(|(index, data)| PageDocument {
                index,
                content_type: ContentType::Pdf,
                data,
            })
            .collect())
    }
}

fn split_pages(data: &[u8], max_pages: usize) -> Result<Vec<Vec<u8>>, SegmenterError> {
    let source =
        Document::load_mem(data).map_err(|e| SegmenterError::ParseFailed(e.to_string()))?;

    let page_numbers: Vec<u32> = source.get_pages().keys().copied().collect();
    if page_numbers.is_empty() {
        return Err(SegmenterError::NoPages);
    }
    if page_numbers.len() > max_pages {
        tracing::warn!(
            page_count = page_numbers.len(),
            max_pages,
            "Statement exceeds page limit, trailing pages are skipped"
        );
    }

    let mut buffers = Vec::with_capacity(page_numbers.len().min(max_pages));
    for &page_number in page_numbers.iter().take(max_pages) {
        let others: Vec<u32> = page_numbers
            .iter()
            .copied()
            .filter(|n| *n != page_number)
            .collect();

        let mut single = source.clone();
        single.delete_pages(&others);
        single.prune_objects();

        let mut buffer = Vec::new();
        single
            .save_to(&mut buffer)
            .map_err(|e| SegmenterError::PageIsolationFailed {
                page_number: page_number as usize,
                reason: e.to_string(),
            })?;
        buffers.push(buffer);
    }

    Ok(buffers)
}
