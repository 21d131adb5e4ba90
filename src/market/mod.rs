use std::collections::HashMap;
use std::env;

use anyhow::{anyhow, Result};
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::Deserialize;

const RETRIES: u32 = 1;
const PRICE_API_BASE: &str = "https://min-api.cryptocompare.com/data";
const COIN_LIST_URL: &str = "https://pro-api.coinmarketcap.com/v1/cryptocurrency/map";
const CMC_API_KEY_ENV: &str = "COIN_MARKET_CAP_API_KEY";

/// Сколько монет запрашивать из листинга
const COIN_LIST_LIMIT: u32 = 300;

/// Лимит длины списка символов в одном запросе pricemulti
const MAX_SYMBOLS_LEN: usize = 300;

fn retry_client() -> ClientWithMiddleware {
    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(RETRIES);

    ClientBuilder::new(Client::new())
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build()
}

#[derive(Debug, Deserialize)]
struct CoinListResponse {
    status: CoinListStatus,
    #[serde(default)]
    data: Vec<CoinInfo>,
}

#[derive(Debug, Deserialize)]
struct CoinListStatus {
    error_code: i64,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CoinInfo {
    symbol: String,
    is_active: i64,
}

/// Список символов топовых монет из листинга
pub async fn fetch_coin_list() -> Result<Vec<String>> {
    let api_key = env::var(CMC_API_KEY_ENV)?;
    let limit = COIN_LIST_LIMIT.to_string();
    let client = retry_client();

    let response = client
        .get(COIN_LIST_URL)
        .query(&[("sort", "cmc_rank"), ("limit", limit.as_str())])
        .header("X-CMC_PRO_API_KEY", api_key)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(anyhow!("coin list request failed: {}", response.status()));
    }

    let body: CoinListResponse = response.json().await?;
    if body.status.error_code > 0 {
        return Err(anyhow!(
            "coin list api error: {}",
            body.status.error_message.unwrap_or_default()
        ));
    }

    // Берём только то, что торгуется
    Ok(body
        .data
        .into_iter()
        .filter(|coin| coin.is_active == 1)
        .map(|coin| coin.symbol)
        .collect())
}

/// Разбивает символы на порции для pricemulti
///
/// Символы в порции соединяются запятой, длина строки не превышает
/// `MAX_SYMBOLS_LEN`.
pub fn portion_symbols(symbols: &[String]) -> Vec<String> {
    let mut portions: Vec<String> = Vec::new();

    for symbol in symbols {
        match portions.last_mut() {
            Some(last) if last.len() + symbol.len() + 1 <= MAX_SYMBOLS_LEN => {
                last.push(',');
                last.push_str(symbol);
            }
            _ => portions.push(symbol.clone()),
        }
    }

    portions
}

/// Текущие цены в USD для пакета символов
///
/// Результат идёт в порядке `symbols`, чтобы порядок добавления
/// монет в отслеживание был стабильным. Символы без цены в ответе
/// опускаются.
pub async fn fetch_prices(symbols: &[String]) -> Result<Vec<(String, f64)>> {
    let client = retry_client();
    let mut prices: HashMap<String, f64> = HashMap::new();

    for portion in portion_symbols(symbols) {
        let response = client
            .get(format!("{PRICE_API_BASE}/pricemulti"))
            .query(&[("fsyms", portion.as_str()), ("tsyms", "USD")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("price request failed: {}", response.status()));
        }

        let body: serde_json::Value = response.json().await?;
        if body.get("Response").and_then(|value| value.as_str()) == Some("Error") {
            let message = body
                .get("Message")
                .and_then(|value| value.as_str())
                .unwrap_or("unknown error");
            return Err(anyhow!("price api error: {message}"));
        }

        let portion_prices: HashMap<String, HashMap<String, f64>> = serde_json::from_value(body)?;
        for (symbol, quotes) in portion_prices {
            if let Some(usd) = quotes.get("USD") {
                prices.insert(symbol, *usd);
            }
        }
    }

    Ok(symbols
        .iter()
        .filter_map(|symbol| prices.get(symbol).map(|price| (symbol.clone(), *price)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(count: usize, len: usize) -> Vec<String> {
        (0..count)
            .map(|i| format!("{:0width$}", i, width = len))
            .collect()
    }

    #[test]
    fn short_list_fits_one_portion() {
        let portions = portion_symbols(&symbols(10, 4));
        assert_eq!(portions.len(), 1);
        assert_eq!(portions[0].len(), 10 * 4 + 9);
    }

    #[test]
    fn long_list_is_split_into_bounded_portions() {
        // 100 символов по 5 знаков: одной строкой вышло бы 599 знаков
        let portions = portion_symbols(&symbols(100, 5));
        assert!(portions.len() >= 2);
        for portion in &portions {
            assert!(portion.len() <= 300);
        }
    }

    #[test]
    fn portions_preserve_order_and_all_symbols() {
        let input = symbols(100, 5);
        let portions = portion_symbols(&input);
        let rejoined: Vec<String> = portions
            .iter()
            .flat_map(|portion| portion.split(',').map(str::to_string))
            .collect();
        assert_eq!(rejoined, input);
    }
}
