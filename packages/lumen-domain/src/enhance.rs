use crate::classify::{self, DomainTag};

const UNNAMED_COMPANY: &str = "указанной компании";

/// Appends a directive for the search provider; the query itself is kept as the prefix.
pub fn enhance(query: &str, tag: DomainTag) -> String {
	let companies = if tag.mentions_companies() { company_list(query) } else { String::new() };
	let directive = match tag {
		DomainTag::Weather => {
			"Найди актуальный прогноз погоды с указанием даты и источника данных.".to_string()
		},
		DomainTag::MarketCap => format!(
			"Укажи ТЕКУЩУЮ рыночную капитализацию {companies} в долларах США на сегодняшний день. \
			 ОБЯЗАТЕЛЬНО укажи точную цифру, дату оценки и источник данных \
			 (например, биржа NYSE/NASDAQ/MOEX). Используй финансовые и новостные сайты \
			 с самыми актуальными данными - Bloomberg, Yahoo Finance, MarketWatch, Reuters \
			 или Google Finance."
		),
		DomainTag::StockPrice => format!(
			"Укажи ТОЛЬКО текущую цену акций {companies} на сегодняшний день. ОБЯЗАТЕЛЬНО укажи \
			 точную цифру стоимости за акцию, биржевой тикер, дату и источник данных - биржу \
			 или финансовый портал. Используй данные из Yahoo Finance, Bloomberg, MarketWatch \
			 или Reuters."
		),
		DomainTag::GeneralFinance => "Предоставь ТОЛЬКО актуальные данные на текущую дату. \
			 Укажи точные цифры и источники информации (биржа, финансовый портал, годовой отчет \
			 компании)."
			.to_string(),
		DomainTag::Crypto => "Предоставь ТОЛЬКО самые актуальные данные с сегодняшней даты. \
			 Укажи текущие цены и источники (биржи, криптовалютные трекеры)."
			.to_string(),
		DomainTag::Generic => {
			"Предоставь только проверенные факты с указанием актуальных источников информации."
				.to_string()
		},
	};

	format!("{query}. {directive}")
}

pub fn enhance_query(query: &str) -> String {
	enhance(query, classify::classify(query))
}

fn company_list(query: &str) -> String {
	let companies = classify::recognized_companies(query);

	if companies.is_empty() { UNNAMED_COMPANY.to_string() } else { companies.join(", ") }
}
