/// Companies the enhancer recognizes by name, in reporting order.
pub const RECOGNIZED_COMPANIES: [&str; 8] =
	["apple", "google", "microsoft", "amazon", "сбербанк", "газпром", "яндекс", "tesla"];

const COMPANY_GENERIC_WORDS: [&str; 2] = ["компании", "корпорации"];
const WEATHER_WORDS: [&str; 3] = ["погода", "температура", "осадки"];
const FINANCE_WORDS: [&str; 7] =
	["компани", "капитализац", "биржа", "акци", "бизнес", "рейтинг", "топ"];
const CRYPTO_WORDS: [&str; 5] = ["крипто", "биткоин", "bitcoin", "eth", "блокчейн"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DomainTag {
	Weather,
	MarketCap,
	StockPrice,
	GeneralFinance,
	Crypto,
	Generic,
}
impl DomainTag {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Weather => "weather",
			Self::MarketCap => "market_cap",
			Self::StockPrice => "stock_price",
			Self::GeneralFinance => "general_finance",
			Self::Crypto => "crypto",
			Self::Generic => "generic",
		}
	}

	/// Tags whose enhancement names the companies found in the query.
	pub fn mentions_companies(self) -> bool {
		matches!(self, Self::MarketCap | Self::StockPrice)
	}
}

struct ClassifyRule {
	tag: DomainTag,
	matches: fn(&str) -> bool,
}

/// Evaluated top to bottom; the first match wins.
const RULES: [ClassifyRule; 5] = [
	ClassifyRule { tag: DomainTag::Weather, matches: is_weather },
	ClassifyRule { tag: DomainTag::MarketCap, matches: is_market_cap },
	ClassifyRule { tag: DomainTag::StockPrice, matches: is_stock_price },
	ClassifyRule { tag: DomainTag::GeneralFinance, matches: is_general_finance },
	ClassifyRule { tag: DomainTag::Crypto, matches: is_crypto },
];

pub fn classify(query: &str) -> DomainTag {
	let lowered = query.to_lowercase();

	RULES
		.iter()
		.find(|rule| (rule.matches)(&lowered))
		.map(|rule| rule.tag)
		.unwrap_or(DomainTag::Generic)
}

/// Recognized companies mentioned in `query`, in [`RECOGNIZED_COMPANIES`] order.
pub fn recognized_companies(query: &str) -> Vec<&'static str> {
	let lowered = query.to_lowercase();

	RECOGNIZED_COMPANIES.into_iter().filter(|company| lowered.contains(company)).collect()
}

fn contains_any(lowered: &str, words: &[&str]) -> bool {
	words.iter().any(|word| lowered.contains(word))
}

fn mentions_company(lowered: &str) -> bool {
	contains_any(lowered, &RECOGNIZED_COMPANIES) || contains_any(lowered, &COMPANY_GENERIC_WORDS)
}

fn is_weather(lowered: &str) -> bool {
	contains_any(lowered, &WEATHER_WORDS)
}

fn is_market_cap(lowered: &str) -> bool {
	lowered.contains("капитализац") && mentions_company(lowered)
}

fn is_stock_price(lowered: &str) -> bool {
	lowered.contains("акци") && mentions_company(lowered)
}

fn is_general_finance(lowered: &str) -> bool {
	contains_any(lowered, &FINANCE_WORDS)
}

fn is_crypto(lowered: &str) -> bool {
	contains_any(lowered, &CRYPTO_WORDS)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn weather_outranks_finance() {
		assert_eq!(classify("Погода и капитализация Apple"), DomainTag::Weather);
	}

	#[test]
	fn stock_price_needs_a_company() {
		assert_eq!(classify("цена акций tesla"), DomainTag::StockPrice);
		assert_eq!(classify("что такое акции"), DomainTag::GeneralFinance);
	}

	#[test]
	fn crypto_and_generic() {
		assert_eq!(classify("Курс Bitcoin сегодня"), DomainTag::Crypto);
		assert_eq!(classify("Привет, как дела?"), DomainTag::Generic);
	}

	#[test]
	fn only_company_tags_mention_companies() {
		let tagged: Vec<DomainTag> = [
			DomainTag::Weather,
			DomainTag::MarketCap,
			DomainTag::StockPrice,
			DomainTag::GeneralFinance,
			DomainTag::Crypto,
			DomainTag::Generic,
		]
		.into_iter()
		.filter(|tag| tag.mentions_companies())
		.collect();

		assert_eq!(tagged, vec![DomainTag::MarketCap, DomainTag::StockPrice]);
	}

	#[test]
	fn companies_keep_list_order() {
		assert_eq!(recognized_companies("Tesla против Apple"), vec!["apple", "tesla"]);
		assert!(recognized_companies("ничего").is_empty());
	}
}
