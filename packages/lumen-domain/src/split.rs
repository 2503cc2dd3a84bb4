use std::sync::LazyLock;

use regex::Regex;

/// Conjunctions that join independent questions, tried in order.
pub const CONJUNCTIONS: [&str; 8] =
	[". и ", " и ", ". а также ", ". также ", ". кроме того, ", ". при этом ", ". еще ", ". плюс "];

/// Fallback separators for queries that span several topics.
const TOPIC_SEPARATORS: [&str; 2] = [". ", ", "];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topic {
	Weather,
	Financial,
	Crypto,
}

const TOPICS: [Topic; 3] = [Topic::Weather, Topic::Financial, Topic::Crypto];

static TOPIC_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
	[
		Regex::new(r"погод[аеуы]|температур[аеы]|осадк[иов]")
			.expect("Weather pattern must compile."),
		Regex::new(r"компани[яйи]|акци[яйи]|капитализаци[яйи]|рынок|биржа|рейтинг|топ")
			.expect("Financial pattern must compile."),
		Regex::new(r"крипто|биткоин|ethereum|блокчейн").expect("Crypto pattern must compile."),
	]
});

/// Splits a compound query into sub-queries. Never returns an empty vector.
///
/// Each step cuts the remaining text at the first occurrence of the first conjunction (in
/// [`CONJUNCTIONS`] order) that still occurs in it. Text left without any conjunction goes
/// through the multi-topic fallback.
pub fn split(query: &str) -> Vec<String> {
	let occurrences: Vec<Vec<(usize, usize)>> =
		CONJUNCTIONS.iter().map(|conjunction| match_ranges(query, conjunction)).collect();
	let mut cursors = [0_usize; CONJUNCTIONS.len()];
	let mut parts = Vec::new();
	let mut start = 0;

	loop {
		let next = occurrences.iter().zip(cursors.iter_mut()).find_map(|(ranges, cursor)| {
			while ranges.get(*cursor).is_some_and(|(from, _)| *from < start) {
				*cursor += 1;
			}

			ranges.get(*cursor).copied()
		});
		let Some((from, to)) = next else {
			parts.extend(split_by_topics(&query[start..]));

			break;
		};

		parts.push(query[start..from].to_string());

		if query[to..].trim().is_empty() {
			break;
		}

		start = to;
	}

	parts
}

/// Topics whose detector fires on `query`, in detector order.
pub fn detect_topics(query: &str) -> Vec<Topic> {
	let lowered = query.to_lowercase();

	TOPICS
		.into_iter()
		.zip(TOPIC_PATTERNS.iter())
		.filter(|(_, pattern)| pattern.is_match(&lowered))
		.map(|(topic, _)| topic)
		.collect()
}

fn split_by_topics(query: &str) -> Vec<String> {
	if detect_topics(query).len() > 1 {
		for separator in TOPIC_SEPARATORS {
			if !query.contains(separator) {
				continue;
			}

			let parts: Vec<String> = query
				.split(separator)
				.map(str::trim)
				.filter(|part| !part.is_empty())
				.map(str::to_string)
				.collect();

			if parts.len() > 1 {
				return parts;
			}
		}
	}

	vec![query.to_string()]
}

/// Byte ranges of every case-insensitive occurrence of a lowercase `needle`, by start offset.
fn match_ranges(haystack: &str, needle: &str) -> Vec<(usize, usize)> {
	haystack
		.char_indices()
		.filter_map(|(start, _)| match_at(haystack, start, needle).map(|end| (start, end)))
		.collect()
}

fn match_at(haystack: &str, start: usize, needle: &str) -> Option<usize> {
	let mut rest = haystack[start..].char_indices();
	let mut end = start;

	for expected in needle.chars() {
		let (offset, ch) = rest.next()?;

		if !ch.to_lowercase().eq(expected.to_lowercase()) {
			return None;
		}

		end = start + offset + ch.len_utf8();
	}

	Some(end)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn conjunction_match_ignores_case() {
		assert_eq!(split("Погода в Москве И курс евро"), vec!["Погода в Москве", "курс евро"]);
	}

	#[test]
	fn sentence_conjunction_wins_over_plain_one() {
		assert_eq!(
			split("Какая погода в Сочи. и сколько стоит биткоин"),
			vec!["Какая погода в Сочи", "сколько стоит биткоин"]
		);
	}

	#[test]
	fn every_tail_is_split_again() {
		assert_eq!(split("яблоки и груши и сливы"), vec!["яблоки", "груши", "сливы"]);
	}

	#[test]
	fn trailing_conjunction_keeps_head_only() {
		assert_eq!(split("чай и "), vec!["чай"]);
	}

	#[test]
	fn multi_topic_query_splits_on_sentences() {
		assert_eq!(
			split("Какая погода в Париже. Рейтинг компаний по выручке"),
			vec!["Какая погода в Париже", "Рейтинг компаний по выручке"]
		);
	}

	#[test]
	fn multi_topic_query_falls_back_to_commas() {
		assert_eq!(
			split("температура в Омске, курс ethereum"),
			vec!["температура в Омске", "курс ethereum"]
		);
	}

	#[test]
	fn long_conjunction_chain_splits_on_small_stack() {
		let query = vec!["а"; 30_000].join(" и ");
		let parts = std::thread::Builder::new()
			.stack_size(2 * 1024 * 1024)
			.spawn(move || split(&query))
			.expect("Failed to spawn splitter thread.")
			.join()
			.expect("Splitter thread panicked.");

		assert_eq!(parts.len(), 30_000);
		assert!(parts.iter().all(|part| part == "а"));
	}

	#[test]
	fn conjunction_order_is_rechecked_on_each_tail() {
		assert_eq!(split("чай и кофе. и сок. плюс вода"), vec!["чай и кофе", "сок", "вода"]);
	}

	#[test]
	fn topic_fallback_applies_to_last_tail() {
		assert_eq!(
			split("чай и погода в Омске, курс ethereum"),
			vec!["чай", "погода в Омске", "курс ethereum"]
		);
	}

	#[test]
	fn detects_topics() {
		assert_eq!(
			detect_topics("Погода в Москве, акция Газпрома"),
			vec![Topic::Weather, Topic::Financial]
		);
		assert!(detect_topics("Привет").is_empty());
	}

	#[test]
	fn matches_keep_original_offsets() {
		let haystack = "Чай. ПЛЮС кофе. плюс сок";
		let ranges = match_ranges(haystack, ". плюс ");

		assert_eq!(ranges.len(), 2);
		assert_eq!(&haystack[ranges[0].0..ranges[0].1], ". ПЛЮС ");
		assert_eq!(&haystack[ranges[1].0..ranges[1].1], ". плюс ");
	}
}
