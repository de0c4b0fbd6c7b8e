//! 分块器
//!
//! 贪心地把按空白切分的词装入文本块。块边界只出现在词之间，
//! 一个比上限还长的词自成一块，不会被从中间截断。
//! 长度按字符计数。

use crate::models::{Chunk, Page};

/// 分块器
#[derive(Debug, Clone, Copy)]
pub struct ChunkSplitter {
    max_chunk_chars: usize,
}

impl ChunkSplitter {
    pub fn new(max_chunk_chars: usize) -> Self {
        Self {
            max_chunk_chars: max_chunk_chars.max(1),
        }
    }

    /// 把一组页面切分成有序文本块
    ///
    /// 累加器跨页延续，所以同一批次内相邻页面的词可以落在同一块里。
    /// 返回块的 `position` 从 0 开始编号。
    pub fn split(&self, pages: &[Page]) -> Vec<Chunk> {
        let mut texts = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;

        for page in pages {
            for word in page.text.split_whitespace() {
                let word_len = word.chars().count();

                if current_len + word_len + 1 > self.max_chunk_chars && !current.is_empty() {
                    texts.push(std::mem::take(&mut current));
                    current_len = 0;
                }

                if current.is_empty() {
                    current.push_str(word);
                    current_len = word_len;
                } else {
                    current.push(' ');
                    current.push_str(word);
                    current_len += word_len + 1;
                }
            }
        }

        if !current.is_empty() {
            texts.push(current);
        }

        texts
            .into_iter()
            .enumerate()
            .map(|(position, text)| Chunk::new(position, text))
            .collect()
    }
}
