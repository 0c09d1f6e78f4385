pub const BASE_IMAGE_INSTRUCTION: &str = "A high-quality, realistic portrait photo of a person who is suitable for online dating. Focus on the overall atmosphere and personality rather than specific facial features. The person should convey a friendly, approachable, and appealing aura suitable for a dating app profile picture. ";

pub const SUMMARY_CONNECTOR: &str = "\n\nBased on the following description: ";

pub const FALLBACK_CLAUSE: &str = " The person should have a friendly, approachable, and appealing aura, suitable for a dating app profile picture.";

/// Always starts with [`BASE_IMAGE_INSTRUCTION`]; ends with the summary when
/// one was extracted, otherwise with [`FALLBACK_CLAUSE`].
pub fn build_image_prompt(match_summary: Option<&str>) -> String {
    let mut prompt = String::from(BASE_IMAGE_INSTRUCTION);
    match match_summary.map(str::trim).filter(|summary| !summary.is_empty()) {
        Some(summary) => {
            prompt.push_str(SUMMARY_CONNECTOR);
            prompt.push_str(summary);
        }
        None => prompt.push_str(FALLBACK_CLAUSE),
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_summary_as_suffix() {
        let prompt = build_image_prompt(Some("Foo bar."));
        assert!(prompt.starts_with(BASE_IMAGE_INSTRUCTION));
        assert!(prompt.ends_with("Foo bar."));
        assert!(!prompt.contains(FALLBACK_CLAUSE));
    }

    #[test]
    fn falls_back_without_summary() {
        for summary in [None, Some(""), Some("  \n")] {
            let prompt = build_image_prompt(summary);
            assert!(prompt.starts_with(BASE_IMAGE_INSTRUCTION));
            assert!(prompt.ends_with(FALLBACK_CLAUSE));
        }
    }
}
