#[track_caller]
pub(crate) fn collect_array<T: Default + Copy, const N: usize>(
    mut iter: impl Iterator<Item = T>,
) -> Option<[T; N]> {
    let mut out = [T::default(); N];
    for item in out.iter_mut() {
        *item = iter.next()?
    }
    Some(out)
}

/// Find the first occurrence of `needle` in `haystack`.
///
/// An empty needle matches at offset 0.
pub fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }

    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Count the non-overlapping occurrences of `needle` in `haystack`.
pub(crate) fn count_bytes(mut haystack: &[u8], needle: &[u8]) -> usize {
    if needle.is_empty() {
        return 0;
    }

    let mut count = 0;
    while let Some(position) = find_bytes(haystack, needle) {
        count += 1;
        haystack = &haystack[position + needle.len()..];
    }
    count
}
