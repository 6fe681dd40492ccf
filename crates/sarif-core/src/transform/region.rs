use crate::model::v1::RegionV1;
use crate::model::v2::Region;

/// What is known about the artifact a region points into.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactHint<'a> {
    pub encoding: Option<&'a str>,
    pub text: Option<&'a str>,
}

fn is_utf16(encoding: &str) -> bool {
    matches!(
        encoding.to_ascii_lowercase().as_str(),
        "utf-16" | "utf-16le" | "utf-16be" | "utf16" | "unicode"
    )
}

/// Byte offset of the `chars`-th character of `text`, if it lies within it.
fn byte_index(text: &str, chars: usize) -> Option<usize> {
    if chars == 0 {
        return Some(0);
    }
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .nth(chars)
}

/// 1.0.0 regions only know byte offsets, so a char range is rescaled when
/// the artifact encoding or text allows it and passed through otherwise.
/// An absent length stays absent.
fn char_range_to_bytes(
    offset: i64,
    length: Option<i64>,
    hint: ArtifactHint<'_>,
) -> (i64, Option<i64>) {
    if hint.encoding.is_some_and(is_utf16) {
        let doubled_length = match length {
            None => Some(None),
            Some(l) => l.checked_mul(2).map(Some),
        };
        if let (Some(start), Some(len)) = (offset.checked_mul(2), doubled_length) {
            return (start, len);
        }
        return (offset, length);
    }

    if let (Some(text), Ok(start)) = (hint.text, usize::try_from(offset)) {
        if let Some(start_byte) = byte_index(text, start) {
            let len_bytes = match length.map(usize::try_from) {
                None => Some(None),
                Some(Ok(len)) => start
                    .checked_add(len)
                    .and_then(|end| byte_index(text, end))
                    .map(|end| Some(end - start_byte)),
                Some(Err(_)) => None,
            };
            if let Some(len_bytes) = len_bytes {
                return (start_byte as i64, len_bytes.map(|l| l as i64));
            }
        }
    }

    (offset, length)
}

pub fn region_to_v1(region: &Region, hint: ArtifactHint<'_>) -> RegionV1 {
    if region.has_line_info() {
        return RegionV1 {
            start_line: region.start_line,
            start_column: region.start_column.or(Some(1)),
            end_line: region.end_line,
            end_column: region.end_column,
            offset: region.byte_offset,
            length: region.byte_offset.and(region.byte_length),
        };
    }

    if let Some(offset) = region.byte_offset {
        return RegionV1 {
            offset: Some(offset),
            length: region.byte_length,
            ..Default::default()
        };
    }

    if let Some(offset) = region.char_offset {
        let (offset, length) = char_range_to_bytes(offset, region.char_length, hint);
        return RegionV1 {
            offset: Some(offset),
            length,
            ..Default::default()
        };
    }

    RegionV1::default()
}

pub fn region_to_v2(region: &RegionV1) -> Region {
    Region {
        start_line: region.start_line,
        start_column: region.start_column,
        end_line: region.end_line,
        end_column: region.end_column,
        byte_offset: region.offset,
        byte_length: region.length,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn char_region(offset: i64, length: Option<i64>) -> Region {
        Region {
            char_offset: Some(offset),
            char_length: length,
            ..Default::default()
        }
    }

    #[test]
    fn test_utf16_char_offset_doubles_without_inventing_length() {
        let hint = ArtifactHint {
            encoding: Some("UTF-16"),
            text: None,
        };
        let v1 = region_to_v1(&char_region(8, None), hint);
        assert_eq!(v1.offset, Some(16));
        assert_eq!(v1.length, None);
        assert_eq!(serde_json::to_string(&v1).unwrap(), r#"{"offset":16}"#);
    }

    #[test]
    fn test_utf16_offset_too_large_to_double_passes_through() {
        let hint = ArtifactHint {
            encoding: Some("utf-16"),
            text: None,
        };
        let v1 = region_to_v1(&char_region(i64::MAX, Some(4)), hint);
        assert_eq!((v1.offset, v1.length), (Some(i64::MAX), Some(4)));

        let v1 = region_to_v1(&char_region(3, Some(i64::MAX)), hint);
        assert_eq!((v1.offset, v1.length), (Some(3), Some(i64::MAX)));
    }

    #[test]
    fn test_char_length_overflowing_text_passes_through() {
        let hint = ArtifactHint {
            encoding: None,
            text: Some("abc"),
        };
        let v1 = region_to_v1(&char_region(1, Some(i64::MAX)), hint);
        assert_eq!((v1.offset, v1.length), (Some(1), Some(i64::MAX)));
    }

    #[test]
    fn test_char_offset_rescaled_against_utf8_text() {
        let hint = ArtifactHint {
            encoding: Some("utf-8"),
            text: Some("héllo wörld"),
        };
        // 'é' and 'ö' are two bytes each.
        let v1 = region_to_v1(&char_region(6, Some(5)), hint);
        assert_eq!(v1.offset, Some(7));
        assert_eq!(v1.length, Some(6));
    }

    #[test]
    fn test_char_offset_past_text_passes_through() {
        let hint = ArtifactHint {
            encoding: None,
            text: Some("abc"),
        };
        let v1 = region_to_v1(&char_region(10, Some(2)), hint);
        assert_eq!((v1.offset, v1.length), (Some(10), Some(2)));
    }

    #[test]
    fn test_line_region_defaults_start_column() {
        let region = Region {
            start_line: Some(3),
            end_line: Some(4),
            char_offset: Some(20),
            ..Default::default()
        };
        let v1 = region_to_v1(&region, ArtifactHint::default());
        assert_eq!(
            v1,
            RegionV1 {
                start_line: Some(3),
                start_column: Some(1),
                end_line: Some(4),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_v1_offsets_become_byte_offsets() {
        let v2 = region_to_v2(&RegionV1 {
            offset: Some(5),
            ..Default::default()
        });
        assert_eq!(v2.byte_offset, Some(5));
        assert_eq!(v2.byte_length, None);
        assert_eq!(v2.char_offset, None);
    }
}
