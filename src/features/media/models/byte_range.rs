/// Inclusive byte span of a hosted upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub fn length(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` value for a body of `size` bytes
    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, size)
    }
}

/// What a `Range` request header asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeRequest {
    Full,
    Partial(ByteRange),
    Unsatisfiable,
}

impl RangeRequest {
    /// Interpret a `Range` header against a body of `size` bytes.
    ///
    /// Only a single `bytes=` range is honoured. Other units, multiple
    /// ranges and malformed values get the full body.
    pub fn parse(header: Option<&str>, size: u64) -> Self {
        let Some(spec) = header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
            return RangeRequest::Full;
        };
        if spec.contains(',') {
            return RangeRequest::Full;
        }
        let Some((start, end)) = spec.trim().split_once('-') else {
            return RangeRequest::Full;
        };
        let (start, end) = (start.trim(), end.trim());

        if start.is_empty() {
            // Suffix form: the last N bytes
            let Ok(suffix) = end.parse::<u64>() else {
                return RangeRequest::Full;
            };
            if suffix == 0 || size == 0 {
                return RangeRequest::Unsatisfiable;
            }
            return RangeRequest::Partial(ByteRange {
                start: size.saturating_sub(suffix),
                end: size - 1,
            });
        }

        let Ok(start) = start.parse::<u64>() else {
            return RangeRequest::Full;
        };
        let end = if end.is_empty() {
            None
        } else {
            match end.parse::<u64>() {
                Ok(end) if end >= start => Some(end),
                _ => return RangeRequest::Full,
            }
        };

        if start >= size {
            return RangeRequest::Unsatisfiable;
        }
        let last = size - 1;
        RangeRequest::Partial(ByteRange {
            start,
            end: end.map_or(last, |end| end.min(last)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(start: u64, end: u64) -> RangeRequest {
        RangeRequest::Partial(ByteRange { start, end })
    }

    #[test]
    fn test_no_header_is_full() {
        assert_eq!(RangeRequest::parse(None, 3), RangeRequest::Full);
    }

    #[test]
    fn test_single_ranges() {
        assert_eq!(RangeRequest::parse(Some("bytes=0-0"), 3), partial(0, 0));
        assert_eq!(RangeRequest::parse(Some("bytes=1-"), 3), partial(1, 2));
        assert_eq!(RangeRequest::parse(Some("bytes=1-99"), 3), partial(1, 2));
        assert_eq!(RangeRequest::parse(Some("bytes=-2"), 3), partial(1, 2));
        assert_eq!(RangeRequest::parse(Some("bytes=-10"), 3), partial(0, 2));
        assert_eq!(RangeRequest::parse(Some(" bytes= 0 - 1 "), 3), partial(0, 1));
    }

    #[test]
    fn test_unsatisfiable_ranges() {
        assert_eq!(
            RangeRequest::parse(Some("bytes=3-"), 3),
            RangeRequest::Unsatisfiable
        );
        assert_eq!(
            RangeRequest::parse(Some("bytes=-0"), 3),
            RangeRequest::Unsatisfiable
        );
        assert_eq!(
            RangeRequest::parse(Some("bytes=0-0"), 0),
            RangeRequest::Unsatisfiable
        );
    }

    #[test]
    fn test_unsupported_or_malformed_ranges_get_full_body() {
        for header in [
            "items=0-1",
            "bytes=0-1,2-2",
            "bytes=2-1",
            "bytes=a-b",
            "bytes=",
            "bytes=-",
        ] {
            assert_eq!(RangeRequest::parse(Some(header), 3), RangeRequest::Full, "{header}");
        }
    }

    #[test]
    fn test_content_range() {
        let range = ByteRange { start: 0, end: 0 };
        assert_eq!(range.length(), 1);
        assert_eq!(range.content_range(3), "bytes 0-0/3");
    }
}
