//! Zero-copy record scanning.
//!
//! A record is `name;value\n`. The trusted scanners walk a window byte by
//! byte without bounds checks, hashing the name as they go. The checked
//! scanner validates each record and is used for untrusted input.

use memchr::{memchr, memrchr};

pub const FNV_PRIME: u64 = 1099511628211;
pub const FNV_SEED: u64 = 0;

/// Streaming FNV-1a style hash, fed one byte at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint(u64);

impl Fingerprint {
    #[inline(always)]
    pub const fn new() -> Self {
        Self(FNV_SEED)
    }

    #[inline(always)]
    pub fn push(&mut self, byte: u8) {
        self.0 = (self.0 ^ byte as u64).wrapping_mul(FNV_PRIME);
    }

    pub fn of(bytes: &[u8]) -> Self {
        let mut hash = Self::new();
        for &b in bytes {
            hash.push(b);
        }
        hash
    }

    #[inline(always)]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Default for Fingerprint {
    fn default() -> Self {
        Self::new()
    }
}

/// A borrowed station name plus its precomputed fingerprint.
///
/// Equality compares bytes only.
#[derive(Debug, Clone, Copy)]
pub struct Name<'a> {
    bytes: &'a [u8],
    fingerprint: u64,
}

impl<'a> Name<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            fingerprint: Fingerprint::of(bytes).get(),
        }
    }

    /// Pairs `bytes` with a fingerprint the caller has already computed.
    pub fn with_fingerprint(bytes: &'a [u8], fingerprint: u64) -> Self {
        Self { bytes, fingerprint }
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    #[inline(always)]
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }
}

impl PartialEq for Name<'_> {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for Name<'_> {}

/// Scans the name at the start of `window`, returning the offset of its `;`.
///
/// # Safety
///
/// `window` must contain a `;`.
#[inline(always)]
pub unsafe fn scan_name(window: &[u8]) -> (usize, Name<'_>) {
    let mut read = 0;
    let mut hash = Fingerprint::new();
    loop {
        let b = *window.get_unchecked(read);
        if b == b';' {
            break;
        }
        hash.push(b);
        read += 1;
    }
    let name = Name {
        bytes: window.get_unchecked(..read),
        fingerprint: hash.get(),
    };
    (read, name)
}

/// Scans the decimal at the start of `window`, returning the offset of its
/// terminating `\n` and the value.
///
/// Any number of fractional digits is accepted.
///
/// # Safety
///
/// `window` must contain a `.` followed, somewhere after it, by a `\n`.
#[inline(always)]
pub unsafe fn scan_value(window: &[u8]) -> (usize, f64) {
    let mut read = 0;
    let mut sign = 1.0;
    if *window.get_unchecked(0) == b'-' {
        sign = -1.0;
        read += 1;
    }

    let mut value = 0.0;
    loop {
        let b = *window.get_unchecked(read);
        if b == b'.' {
            break;
        }
        value = value * 10.0 + b.wrapping_sub(b'0') as f64;
        read += 1;
    }
    read += 1;

    let mut scale = 1.0;
    loop {
        let b = *window.get_unchecked(read);
        if b == b'\n' {
            break;
        }
        scale *= 0.1;
        value += scale * b.wrapping_sub(b'0') as f64;
        read += 1;
    }

    (read, value * sign)
}

/// Returns true if `bytes` is empty or its last record holds a `;`, then a
/// `.`, then the final `\n`.
///
/// Trusted scanning of a range satisfying this never reads past its end: every
/// scan loop is guaranteed to hit its stop byte no later than the last record's.
pub fn ends_with_complete_record(bytes: &[u8]) -> bool {
    let Some((&last, body)) = bytes.split_last() else {
        return true;
    };
    if last != b'\n' {
        return false;
    }
    let line = match memrchr(b'\n', body) {
        Some(nl) => &body[nl + 1..],
        None => body,
    };
    match memrchr(b';', line) {
        Some(semi) => memchr(b'.', &line[semi + 1..]).is_some(),
        None => false,
    }
}

/// A record parsed by [`scan_record_checked`].
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    pub name: Name<'a>,
    pub value: f64,
    /// Bytes consumed, including the terminating `\n`.
    pub len: usize,
}

/// Parses one record from the start of `window`, validating it against
/// `name;-?[0-9]+\.[0-9]+\n`.
pub fn scan_record_checked(window: &[u8]) -> Result<Record<'_>, &'static str> {
    let nl = memchr(b'\n', window).ok_or("missing terminating newline")?;
    let line = &window[..nl];
    let semi = memchr(b';', line).ok_or("missing ';' separator")?;
    let (name, value) = (&line[..semi], &line[semi + 1..]);
    if !is_decimal(value) {
        return Err("value is not a signed decimal");
    }
    let value = lexical_core::parse::<f64>(value).map_err(|_| "value out of range")?;
    Ok(Record {
        name: Name::new(name),
        value,
        len: nl + 1,
    })
}

fn is_decimal(bytes: &[u8]) -> bool {
    let digits = bytes.strip_prefix(b"-").unwrap_or(bytes);
    let Some(dot) = memchr(b'.', digits) else {
        return false;
    };
    let (int, frac) = (&digits[..dot], &digits[dot + 1..]);
    !int.is_empty()
        && !frac.is_empty()
        && int.iter().all(u8::is_ascii_digit)
        && frac.iter().all(u8::is_ascii_digit)
}
