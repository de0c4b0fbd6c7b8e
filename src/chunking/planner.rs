//! 批次规划
//!
//! 把页面序列切成不超过 `max_pages_per_batch` 页的连续批次，
//! 并把整篇文档的分块数限制在 `max_chunks` 以内。

use crate::models::{Batch, Chunk, TruncationWarning};

/// 批次规划器
#[derive(Debug, Clone, Copy)]
pub struct BatchPlanner {
    max_pages_per_batch: usize,
    max_chunks: usize,
}

impl BatchPlanner {
    pub fn new(max_pages_per_batch: usize, max_chunks: usize) -> Self {
        Self {
            max_pages_per_batch: max_pages_per_batch.max(1),
            max_chunks,
        }
    }

    /// 规划批次
    ///
    /// 批次无缝、无重叠地覆盖 `[0, total_pages)`，
    /// 批次数为 `ceil(total_pages / max_pages_per_batch)`。
    pub fn plan(&self, total_pages: usize) -> Vec<Batch> {
        (0..total_pages)
            .step_by(self.max_pages_per_batch)
            .map(|start| Batch {
                start,
                end: (start + self.max_pages_per_batch).min(total_pages),
            })
            .collect()
    }

    /// 限制分块数
    ///
    /// 保留前 `max_chunks` 个分块；发生截断时返回警告，由调用方负责上报。
    pub fn enforce_chunk_cap(&self, mut chunks: Vec<Chunk>) -> (Vec<Chunk>, Option<TruncationWarning>) {
        if chunks.len() <= self.max_chunks {
            return (chunks, None);
        }

        let dropped = chunks.len() - self.max_chunks;
        chunks.truncate(self.max_chunks);

        let warning = TruncationWarning::ChunksDropped {
            kept: chunks.len(),
            dropped,
        };
        (chunks, Some(warning))
    }
}

/// 限制总页数（可选）
pub fn enforce_page_cap(total_pages: usize, max_pages: Option<usize>) -> (usize, Option<TruncationWarning>) {
    match max_pages {
        Some(max) if total_pages > max => (
            max,
            Some(TruncationWarning::PagesDropped {
                kept: max,
                dropped: total_pages - max,
            }),
        ),
        _ => (total_pages, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(n: usize) -> Vec<Chunk> {
        (0..n).map(|i| Chunk::new(i, format!("c{}", i))).collect()
    }

    #[test]
    fn test_ten_pages_four_per_batch() {
        let batches = BatchPlanner::new(4, 100).plan(10);
        assert_eq!(
            batches,
            vec![
                Batch { start: 0, end: 4 },
                Batch { start: 4, end: 8 },
                Batch { start: 8, end: 10 },
            ]
        );
    }

    #[test]
    fn test_batches_tile_page_range() {
        for total in 0..40 {
            for per_batch in 1..9 {
                let batches = BatchPlanner::new(per_batch, 100).plan(total);
                assert_eq!(batches.len(), total.div_ceil(per_batch));

                let mut next = 0;
                for batch in &batches {
                    assert_eq!(batch.start, next);
                    assert!(!batch.is_empty() && batch.len() <= per_batch);
                    next = batch.end;
                }
                assert_eq!(next, total);
                assert_eq!(batches.iter().map(Batch::len).sum::<usize>(), total);
            }
        }
    }

    #[test]
    fn test_zero_pages_no_batches() {
        assert!(BatchPlanner::new(4, 10).plan(0).is_empty());
    }

    #[test]
    fn test_chunk_cap_truncates_and_warns() {
        let (kept, warning) = BatchPlanner::new(4, 100).enforce_chunk_cap(chunks(120));
        assert_eq!(kept.len(), 100);
        assert_eq!(kept.last().map(|c| c.position), Some(99));
        assert_eq!(
            warning,
            Some(TruncationWarning::ChunksDropped { kept: 100, dropped: 20 })
        );
    }

    #[test]
    fn test_chunk_cap_not_reached() {
        let (kept, warning) = BatchPlanner::new(4, 100).enforce_chunk_cap(chunks(100));
        assert_eq!(kept.len(), 100);
        assert!(warning.is_none());
    }

    #[test]
    fn test_page_cap() {
        assert_eq!(enforce_page_cap(10, None), (10, None));
        assert_eq!(enforce_page_cap(10, Some(20)), (10, None));
        assert_eq!(
            enforce_page_cap(30, Some(20)),
            (20, Some(TruncationWarning::PagesDropped { kept: 20, dropped: 10 }))
        );
    }
}
