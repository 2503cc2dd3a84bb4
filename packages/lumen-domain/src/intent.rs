//! Decides whether a chat message is worth a web search before it reaches the LLM.

use std::sync::LazyLock;

use regex::Regex;

/// Queries longer than this many characters are treated as searchable.
pub const LONG_QUERY_CHARS: usize = 50;

const STRONG_INDICATORS: &[&str] = &[
	"расскажи о",
	"что такое",
	"кто такой",
	"где находится",
	"как работает",
	"объясни",
	"опиши",
	"найди информацию",
	"поищи",
	"узнай",
	"сколько стоит",
	"какая цена",
	"как купить",
	"как сделать",
	"как использовать",
	"как применять",
	"инструкция",
	"найди топ",
	"покажи топ",
	"рейтинг",
	"кто самый",
	"найди список",
	"актуальный список",
	"текущий рейтинг",
	"на сегодня",
	"на текущий момент",
];
const RANKING_WORDS: [&str; 5] = ["топ", "рейтинг", "список", "самых", "лучших"];
const ENTITY_WORDS: [&str; 5] = ["компания", "компаний", "организация", "банк", "бренд"];
const YEAR_WORDS: [&str; 5] = ["2023", "2024", "2025", "год", "года"];
const FRESHNESS_KEYWORDS: &[&str] = &[
	// Time markers.
	"сейчас",
	"текущий",
	"актуальный",
	"свежий",
	"недавний",
	"сегодня",
	"вчера",
	"последний",
	"новый",
	"обновленный",
	"современный",
	"на данный момент",
	"в настоящее время",
	"2023",
	"2024",
	"2025",
	"этот год",
	"этот месяц",
	"эта неделя",
	"январь",
	"февраль",
	"март",
	"апрель",
	"май",
	"июнь",
	"июль",
	"август",
	"сентябрь",
	"октябрь",
	"ноябрь",
	"декабрь",
	// Categories that go stale.
	"новости",
	"погода",
	"цена",
	"курс",
	"статистика",
	"данные",
	"обновление",
	"событие",
	"происшествие",
	"случилось",
	// Concrete entities.
	"компания",
	"компаний",
	"организация",
	"технология",
	"продукт",
	"сервис",
	"приложение",
	"устройство",
	"гаджет",
	// Lists and rankings.
	"топ",
	"рейтинг",
	"список",
	"лидер",
	"самых",
	"лучших",
	"богатейших",
	"известных",
	"популярных",
	"дорогих",
	"крупнейших",
	"успешных",
	// Questions about the present.
	"как сейчас",
	"что нового",
	"последние изменения",
	"текущая ситуация",
	"как обстоят дела",
	"что происходит",
	"какие новости",
	// Finance and economy.
	"акции",
	"биржа",
	"валюта",
	"доллар",
	"евро",
	"рубль",
	"биткоин",
	"криптовалюта",
	"инвестиции",
	"экономика",
	"инфляция",
	"ставка",
	"банк",
	"капитализация",
	"рыночная стоимость",
	"стоимость",
	"цена акций",
	"выручка",
	"доход",
	"прибыль",
];

static YEAR_REFERENCE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"20[2-9][0-9]").expect("Year pattern must compile."));

/// Why a message was judged to need a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchTrigger {
	StrongIndicator,
	RankingWithEntity,
	YearWithEntity,
	FreshnessKeyword,
	YearReference,
	LongQuery,
}
impl SearchTrigger {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::StrongIndicator => "strong_indicator",
			Self::RankingWithEntity => "ranking_with_entity",
			Self::YearWithEntity => "year_with_entity",
			Self::FreshnessKeyword => "freshness_keyword",
			Self::YearReference => "year_reference",
			Self::LongQuery => "long_query",
		}
	}
}

struct TriggerRule {
	trigger: SearchTrigger,
	matches: fn(&str) -> bool,
}

/// Evaluated top to bottom on the lowercased, trimmed message; the first match wins.
const RULES: [TriggerRule; 6] = [
	TriggerRule { trigger: SearchTrigger::StrongIndicator, matches: has_strong_indicator },
	TriggerRule { trigger: SearchTrigger::RankingWithEntity, matches: has_ranking_with_entity },
	TriggerRule { trigger: SearchTrigger::YearWithEntity, matches: has_year_with_entity },
	TriggerRule { trigger: SearchTrigger::FreshnessKeyword, matches: has_freshness_keyword },
	TriggerRule { trigger: SearchTrigger::YearReference, matches: has_year_reference },
	TriggerRule { trigger: SearchTrigger::LongQuery, matches: is_long_query },
];

/// First rule that asks for a search, or `None` when the message can be answered as is.
pub fn search_trigger(message: &str) -> Option<SearchTrigger> {
	let lowered = message.trim().to_lowercase();

	RULES.iter().find(|rule| (rule.matches)(&lowered)).map(|rule| rule.trigger)
}

pub fn needs_search(message: &str) -> bool {
	search_trigger(message).is_some()
}

fn contains_any(lowered: &str, words: &[&str]) -> bool {
	words.iter().any(|word| lowered.contains(word))
}

fn has_strong_indicator(lowered: &str) -> bool {
	contains_any(lowered, STRONG_INDICATORS)
}

fn has_ranking_with_entity(lowered: &str) -> bool {
	contains_any(lowered, &RANKING_WORDS) && contains_any(lowered, &ENTITY_WORDS)
}

fn has_year_with_entity(lowered: &str) -> bool {
	contains_any(lowered, &YEAR_WORDS) && contains_any(lowered, &ENTITY_WORDS)
}

fn has_freshness_keyword(lowered: &str) -> bool {
	contains_any(lowered, FRESHNESS_KEYWORDS)
}

fn has_year_reference(lowered: &str) -> bool {
	YEAR_REFERENCE.is_match(lowered)
}

fn is_long_query(lowered: &str) -> bool {
	lowered.chars().count() > LONG_QUERY_CHARS
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn greetings_skip_search() {
		assert_eq!(search_trigger("Привет!"), None);
		assert!(!needs_search("  спасибо  "));
	}

	#[test]
	fn strong_indicator_outranks_keywords() {
		assert_eq!(search_trigger("Что такое биткоин?"), Some(SearchTrigger::StrongIndicator));
	}

	#[test]
	fn ranking_needs_an_entity() {
		assert_eq!(search_trigger("самых надежных банк"), Some(SearchTrigger::RankingWithEntity));
	}

	#[test]
	fn year_with_entity_and_bare_year() {
		assert_eq!(search_trigger("бренд года"), Some(SearchTrigger::YearWithEntity));
		assert_eq!(search_trigger("итоги 2031"), Some(SearchTrigger::YearReference));
	}

	#[test]
	fn long_message_counts_characters_not_bytes() {
		let short = "ы".repeat(LONG_QUERY_CHARS);
		let long = "ы".repeat(LONG_QUERY_CHARS + 1);

		assert!(!needs_search(&short));
		assert_eq!(search_trigger(&long), Some(SearchTrigger::LongQuery));
	}
}
