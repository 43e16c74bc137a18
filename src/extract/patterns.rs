//! Token patterns shared by the today/tomorrow and 10-day extractors.
//!
//! Every function here expects text that already went through
//! [`clean_text`](crate::utils::clean_text). Fragments are joined with a single
//! space before matching, so patterns tolerate a space between a number and its
//! unit (`10 %`, `28 ℃`) and tokens are re-emitted in their compact form.

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters that mark a weather description: clear, cloudy, rain, snow.
pub const WEATHER_CHARS: [char; 4] = ['晴', '曇', '雨', '雪'];

static DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*月\s*(\d+)\s*日").expect("date regex"));
static PERCENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*%").expect("percent regex"));
static LEADING_CELSIUS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([+-]?\d+)\s*(?:℃|°C)").expect("celsius regex"));
static CLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{2})\s*時\s*(\d{2})\s*分").expect("clock regex"));
static ANY_CLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,2}\s*[:：時]\s*\d{2}\s*分?").expect("any clock regex"));
static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[+-]?\d+").expect("integer regex"));

pub fn has_weather_char(text: &str) -> bool {
    text.contains(WEATHER_CHARS)
}

/// First `<digits>月<digits>日` label in the text, compacted.
pub fn first_date(text: &str) -> Option<String> {
    DATE.captures(text)
        .map(|c| format!("{}月{}日", &c[1], &c[2]))
}

/// Every date label in document order.
pub fn date_tokens(text: &str) -> Vec<String> {
    DATE.captures_iter(text)
        .map(|c| format!("{}月{}日", &c[1], &c[2]))
        .collect()
}

/// Every `<digits>%` token in document order.
pub fn percent_tokens(text: &str) -> Vec<String> {
    PERCENT
        .captures_iter(text)
        .map(|c| format!("{}%", &c[1]))
        .collect()
}

/// The (optionally signed) integer at the very start of `text`, when a Celsius
/// unit follows it. Kept as captured, sign included.
///
/// A token that does not fit an `i32` is treated as absent.
pub fn leading_celsius(text: &str) -> Option<String> {
    LEADING_CELSIUS
        .captures(text)
        .and_then(|c| degrees_token(&c[1]))
}

/// First `HH時MM分` time label.
pub fn first_clock(text: &str) -> Option<String> {
    CLOCK.captures(text)
        .map(|c| format!("{}時{}分", &c[1], &c[2]))
}

/// Integer tokens left once dates, percentages and clock times are masked out.
///
/// Entries keep their position even when a token overflows (`None`), so
/// callers pairing values by index stay aligned.
pub fn loose_integers(text: &str) -> Vec<Option<String>> {
    let masked = DATE.replace_all(text, " ");
    let masked = PERCENT.replace_all(&masked, " ");
    let masked = ANY_CLOCK.replace_all(&masked, " ");
    INTEGER
        .find_iter(&masked)
        .map(|m| degrees_token(m.as_str()))
        .collect()
}

fn degrees_token(token: &str) -> Option<String> {
    token.parse::<i32>().ok().map(|_| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_weather_char() {
        assert!(has_weather_char("晴のち曇"));
        assert!(has_weather_char("雪"));
        assert!(!has_weather_char("最高 28 ℃"));
    }

    #[test]
    fn test_date_tokens_compact_spaced_labels() {
        assert_eq!(first_date("今日 10月22日(火)"), Some("10月22日".to_string()));
        assert_eq!(
            date_tokens("10 月 23 日 (水) 10月24日(木)"),
            vec!["10月23日".to_string(), "10月24日".to_string()]
        );
        assert_eq!(first_date("今日の天気"), None);
    }

    #[test]
    fn test_percent_tokens() {
        assert_eq!(
            percent_tokens("降水確率 --- 10 % 20% 0%"),
            vec!["10%".to_string(), "20%".to_string(), "0%".to_string()]
        );
    }

    #[test]
    fn test_leading_celsius_keeps_captured_token() {
        assert_eq!(leading_celsius("28 ℃ [+1]").as_deref(), Some("28"));
        assert_eq!(leading_celsius("-3℃").as_deref(), Some("-3"));
        assert_eq!(leading_celsius("+5 °C").as_deref(), Some("+5"));
        assert_eq!(leading_celsius("--"), None);
        assert_eq!(leading_celsius("99999999999℃"), None);
    }

    #[test]
    fn test_leading_celsius_ignores_later_values() {
        assert_eq!(leading_celsius("--℃ 最低 19℃"), None);
        assert_eq!(leading_celsius("[前日比] 19℃"), None);
    }

    #[test]
    fn test_first_clock() {
        assert_eq!(first_clock("日の出 06時15分"), Some("06時15分".to_string()));
        assert_eq!(first_clock("日の出 6時15分"), None);
    }

    #[test]
    fn test_loose_integers_masks_dates_percents_and_times() {
        let text = "10月23日(水) 晴 23 15 30% 18:00発表 -2";
        let binding = loose_integers(text);
        let tokens: Vec<Option<&str>> = binding.iter().map(|t| t.as_deref()).collect();
        assert_eq!(tokens, vec![Some("23"), Some("15"), Some("-2")]);
    }
}
