//! Canned answers served while the service runs without live providers.

use time::Date;

const CHAT_STUB_FALLBACK_QUERY: &str = "Запрос отсутствует";

struct ChatStubRule {
	keywords: &'static [&'static str],
	reply: &'static str,
}

/// Evaluated top to bottom; the first rule with a matching keyword wins.
const CHAT_STUB_RULES: [ChatStubRule; 7] = [
	ChatStubRule {
		keywords: &["привет", "здравствуй", "добрый день", "доброе утро", "добрый вечер"],
		reply: "Здравствуйте! Я AI Agent, работающий в тестовом режиме. Чем могу помочь вам \
		        сегодня? Обратите внимание, что сейчас я функционирую без доступа к API Claude.",
	},
	ChatStubRule {
		keywords: &["новост", "событи", "произошло", "случилось"],
		reply: "В тестовом режиме я не могу предоставить актуальные новости, так как не имею \
		        доступа к интернету. В реальном режиме работы я бы выполнил поиск последних \
		        новостей через Perplexity API и предоставил вам актуальную информацию.",
	},
	ChatStubRule {
		keywords: &["погод", "температур", "осадк", "дожд", "снег"],
		reply: "В тестовом режиме я не могу предоставить актуальный прогноз погоды, так как не \
		        имею доступа к метеорологическим данным. В полноценном режиме я бы выполнил \
		        поиск через Perplexity API и предоставил вам точную информацию о погоде в \
		        указанном регионе.",
	},
	ChatStubRule {
		keywords: &["курс", "валют", "доллар", "евро", "акци", "биткоин", "крипто"],
		reply: "В тестовом режиме я не могу предоставить актуальные данные о курсах валют или \
		        финансовых рынках. В полноценном режиме работы я бы получил последние котировки \
		        через Perplexity API и представил вам актуальную информацию.",
	},
	ChatStubRule {
		keywords: &["код", "программ", "python", "javascript", "java", "разработ"],
		reply: "В тестовом режиме я могу предоставить общую информацию о программировании, но \
		        не могу выполнять сложный анализ кода или создавать оптимальные программные \
		        решения.",
	},
	ChatStubRule {
		keywords: &["искусств", "интеллект", "ai", "нейросет", "машинн", "обучени"],
		reply: "Искусственный интеллект - это область компьютерных наук, направленная на \
		        создание систем, способных выполнять задачи, требующие человеческого \
		        интеллекта. Для более глубокого анализа требуется настройка API ключей.",
	},
	ChatStubRule {
		keywords: &["помо", "умеешь", "можешь", "способ", "функци"],
		reply: "В тестовом режиме я умею имитировать ответы на базовые запросы, демонстрировать \
		        интерфейс и симулировать работу с поисковыми запросами. С настроенными API \
		        ключами я смогу отвечать на сложные вопросы и выполнять актуальные поисковые \
		        запросы.",
	},
];

const CHAT_STUB_DEFAULT: &str = "Я могу симулировать ответы на типичные запросы. Для \
                                 полноценной работы потребуется настроить доступ к API.";

/// Renders a date the way the stubs quote it: `DD.MM.YYYY`.
pub fn format_date(date: Date) -> String {
	format!("{:02}.{:02}.{}", date.day(), u8::from(date.month()), date.year())
}

/// Deterministic search answer for `query` as of `date`.
pub fn search_stub(query: &str, date: Date) -> String {
	let lowered = query.to_lowercase();
	let today = format_date(date);

	if lowered.contains("капитализац") {
		if lowered.contains("apple") {
			return format!(
				"По состоянию на {today}, рыночная капитализация Apple Inc. (AAPL) составляет \
				 **$3.44 триллиона долларов США**. Это делает Apple самой дорогой публичной \
				 компанией в мире по рыночной стоимости.\n\n\
				 Данные о капитализации основаны на текущей цене акций $224.32 за акцию и общем \
				 количестве выпущенных акций в обращении 15.33 миллиарда.\n\n\
				 Источники информации:\n\
				 - [Yahoo Finance](https://finance.yahoo.com/quote/AAPL/)\n\
				 - [Bloomberg](https://www.bloomberg.com/quote/AAPL:US)\n\
				 - [MarketWatch](https://www.marketwatch.com/investing/stock/aapl)\n\n\
				 Обратите внимание, что рыночная капитализация может меняться в течение дня в \
				 зависимости от колебаний цены акций компании на бирже NASDAQ."
			);
		}
		if lowered.contains("google") || lowered.contains("alphabet") {
			return format!(
				"По состоянию на {today}, рыночная капитализация Alphabet Inc. (материнской \
				 компании Google) составляет **$2.12 триллиона долларов США**.\n\n\
				 Эта оценка основана на текущих ценах акций:\n\
				 - Акции класса A (GOOGL): $174.25 за акцию\n\
				 - Акции класса C (GOOG): $175.77 за акцию\n\n\
				 Alphabet имеет две основные категории акций, торгующихся на бирже NASDAQ. \
				 Общее количество акций в обращении составляет около 12.8 миллиарда.\n\n\
				 Источники информации:\n\
				 - [Yahoo Finance](https://finance.yahoo.com/quote/GOOGL/)\n\
				 - [Bloomberg](https://www.bloomberg.com/quote/GOOGL:US)\n\
				 - [NASDAQ](https://www.nasdaq.com/market-activity/stocks/googl)"
			);
		}
	}

	if lowered.contains("погод") {
		return format!(
			"Погода на {today}:\n\n\
			 В Москве сегодня переменная облачность, температура от +18°C до +22°C днем. \
			 Осадков не ожидается, ветер юго-западный 3-5 м/с.\n\n\
			 В Санкт-Петербурге облачно с прояснениями, возможен небольшой дождь. Температура \
			 от +16°C до +19°C. Ветер западный 4-6 м/с.\n\n\
			 Источник данных: [Гидрометцентр России](https://meteoinfo.ru)"
		);
	}

	format!(
		"Результаты поиска по запросу \"{query}\" (тестовый режим):\n\n\
		 Найдена релевантная информация из нескольких источников. Обратите внимание, что в \
		 тестовом режиме не происходит реального обращения к поисковой системе, и эти данные \
		 представлены только для демонстрации.\n\n\
		 Источники:\n\
		 - [Пример источника 1](https://example.com/source1)\n\
		 - [Пример источника 2](https://example.com/source2)\n\n\
		 Для получения актуальных данных, пожалуйста, отключите тестовый режим."
	)
}

/// Chat reply used in test mode. `message` is the latest user message, if any.
pub fn chat_stub(message: Option<&str>) -> String {
	let message = message.filter(|text| !text.trim().is_empty());
	let echoed = message.unwrap_or(CHAT_STUB_FALLBACK_QUERY);
	let lowered = message.map(str::to_lowercase).unwrap_or_default();
	let reply = CHAT_STUB_RULES
		.iter()
		.find(|rule| rule.keywords.iter().any(|keyword| lowered.contains(keyword)))
		.map(|rule| rule.reply)
		.unwrap_or(CHAT_STUB_DEFAULT);

	format!(
		"Это тестовый ответ на ваш запрос: \"{echoed}\".\n\n{reply}\n\n\
		 Я работаю в тестовом режиме без использования API ключей."
	)
}
