use regex::Regex;

pub const SUMMARY_ELLIPSIS: &str = "...";
pub const MAX_MATCHED_TERMS: usize = 8;

const MIN_TERM_CHARS: usize = 4;
const STOP_WORDS: [&str; 22] = [
	"the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
	"are", "was", "were", "case", "legal", "court", "this",
];

/// Returns the stored summary when it has content, otherwise a character-bounded preview of the
/// full text followed by an ellipsis.
pub fn summary_or_preview(summary: Option<&str>, text: &str, max_chars: usize) -> String {
	if let Some(summary) = summary.filter(|summary| !summary.trim().is_empty()) {
		return summary.to_string();
	}

	let mut preview: String = text.chars().take(max_chars).collect();

	preview.push_str(SUMMARY_ELLIPSIS);

	preview
}

/// Splits a query into lowercase content terms: non-word separators, short words and common
/// legal filler are dropped, first occurrence order is kept.
pub fn query_terms(query: &str) -> Vec<String> {
	let raw: Vec<&str> = match Regex::new(r"\W+") {
		Ok(re) => re.split(query).collect(),
		Err(_) => query.split_whitespace().collect(),
	};
	let mut out: Vec<String> = Vec::new();

	for word in raw {
		if word.chars().count() < MIN_TERM_CHARS {
			continue;
		}

		let lowered = word.to_lowercase();

		if STOP_WORDS.contains(&lowered.as_str()) || out.contains(&lowered) {
			continue;
		}

		out.push(lowered);
	}

	out
}

/// Query terms that occur in `text`, case-insensitively, capped at [`MAX_MATCHED_TERMS`].
pub fn match_terms_in_text(terms: &[String], text: &str) -> Vec<String> {
	let haystack = text.to_lowercase();

	terms
		.iter()
		.filter(|term| haystack.contains(term.as_str()))
		.take(MAX_MATCHED_TERMS)
		.cloned()
		.collect()
}
