//! Bounding the continuity context handed to each prompt.

/// Select the most recent prior segments that fit in `max_chars`.
///
/// Order is preserved. With no cap every segment is returned. The latest
/// segment is always kept; when it alone exceeds the cap only its tail is
/// kept, cut on a character boundary.
///
/// # Examples
///
/// ```
/// use tourscribe_narrative::continuity_window;
///
/// let prior = vec!["aaaa".to_string(), "bbbb".to_string(), "cc".to_string()];
/// assert_eq!(continuity_window(&prior, None), prior);
/// assert_eq!(continuity_window(&prior, Some(7)), vec!["bbbb", "cc"]);
/// assert_eq!(continuity_window(&prior, Some(1)), vec!["c"]);
/// ```
pub fn continuity_window(prior: &[String], max_chars: Option<usize>) -> Vec<String> {
    let Some(max_chars) = max_chars else {
        return prior.to_vec();
    };
    let Some((latest, earlier)) = prior.split_last() else {
        return Vec::new();
    };

    let latest_len = latest.chars().count();
    if latest_len > max_chars {
        let tail: String = latest.chars().skip(latest_len - max_chars).collect();
        return vec![tail];
    }

    let mut used = latest_len;
    let mut kept = vec![latest.clone()];
    for segment in earlier.iter().rev() {
        let len = segment.chars().count();
        if used + len > max_chars {
            break;
        }
        used += len;
        kept.push(segment.clone());
    }
    kept.reverse();
    kept
}
