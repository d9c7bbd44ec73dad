use memchr::memchr;

/// Half-open `[start, end)` span of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn slice<'a>(&self, bytes: &'a [u8]) -> &'a [u8] {
        &bytes[self.start..self.end]
    }
}

/// Splits `bytes` into `workers` contiguous ranges, each interior boundary
/// moved forward to just after a newline.
///
/// Ranges are only roughly equal in size; some may be empty when records are
/// long relative to `bytes.len() / workers`.
pub fn partition(bytes: &[u8], workers: usize) -> Vec<ByteRange> {
    let workers = workers.max(1);
    let step = bytes.len() / workers;

    let mut starts = Vec::with_capacity(workers + 1);
    starts.push(0);
    starts.extend((1..workers).map(|i| align(bytes, i * step)));
    starts.push(bytes.len());

    starts
        .windows(2)
        .map(|w| ByteRange {
            start: w[0],
            end: w[1],
        })
        .collect()
}

/// First offset at or after `candidate` that begins a record.
fn align(bytes: &[u8], candidate: usize) -> usize {
    if candidate == 0 {
        return 0;
    }
    match memchr(b'\n', &bytes[candidate - 1..]) {
        Some(offset) => candidate + offset,
        None => bytes.len(),
    }
}
