//! Sequence-name vocabulary of the PET metadata table

use regex::Regex;
use std::sync::OnceLock;

/// Substring marking a partial, early-timepoint acquisition
pub const EARLY_FRAME_MARKER: &str = "early";

/// Tracer name expected in the sequence of a raw AV45 acquisition
pub const AV45_TRACER: &str = "av45";

/// Sequence label of the co-registered, averaged derivative
pub const COREG_AVERAGED_SEQUENCE: &str = "AV45 Co-registered, Averaged";

/// Case-insensitive substring test
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Maps characters unsafe in a path component to `_`
///
/// The archive names sequence directories this way, so the sanitized name is
/// both the manifest value and the directory to walk into.
///
/// # Example
///
/// ```
/// use av45select_core::sanitize_sequence;
///
/// assert_eq!(
///     sanitize_sequence("AV45 Co-registered, Averaged"),
///     "AV45_Co-registered,_Averaged"
/// );
/// ```
pub fn sanitize_sequence(sequence: &str) -> String {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| Regex::new(r"[ /;*()<>:]").expect("Failed to compile regex"));
    re.replace_all(sequence, "_").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ADNI Brain PET: Raw AV45", "ADNI_Brain_PET__Raw_AV45")]
    #[case("AV45 Coreg, Avg, Std Img and Vox Siz", "AV45_Coreg,_Avg,_Std_Img_and_Vox_Siz")]
    #[case("a/b;c*d(e)f<g>h:i", "a_b_c_d_e_f_g_h_i")]
    #[case("plain", "plain")]
    fn test_sanitize_sequence(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_sequence(input), expected);
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("AV45 EARLY Frames", EARLY_FRAME_MARKER));
        assert!(contains_ignore_case("ADNI Brain PET: Raw AV45", AV45_TRACER));
        assert!(!contains_ignore_case("ADNI Brain PET: Raw FDG", AV45_TRACER));
    }
}
