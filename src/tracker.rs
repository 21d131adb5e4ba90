use serde::{Deserialize, Serialize};

/// Двухточечное скользящее окно цены монеты
///
/// Сначала заполняется `prev_price`, затем `last_price`; дальше каждое
/// обновление сдвигает `last -> prev`. Монета только с `prev_price`
/// ещё «прогревается» и в оценке не участвует.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub prev_price: Option<f64>,
    pub last_price: Option<f64>,
}

/// Отслеживаемые цены чата в порядке добавления монет
///
/// Порядок обхода — порядок добавления, он стабилен между циклами.
/// Монет не больше трёх сотен, линейный поиск достаточен.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackedPrices(Vec<(String, PriceSample)>);

impl TrackedPrices {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, symbol: &str) -> Option<&PriceSample> {
        self.0
            .iter()
            .find(|(tracked, _)| tracked == symbol)
            .map(|(_, sample)| sample)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PriceSample)> {
        self.0.iter().map(|(symbol, sample)| (symbol.as_str(), sample))
    }

    fn entry(&mut self, symbol: &str) -> &mut PriceSample {
        let position = match self.0.iter().position(|(tracked, _)| tracked == symbol) {
            Some(position) => position,
            None => {
                self.0.push((symbol.to_string(), PriceSample::default()));
                self.0.len() - 1
            }
        };
        &mut self.0[position].1
    }
}

/// Сворачивает свежие цены в окна отслеживания
///
/// Монеты, отсутствующие в `fresh`, сохраняют прежние значения
/// до следующего успешного обновления.
pub fn update_prices(tracked: &mut TrackedPrices, fresh: &[(String, f64)]) {
    for (symbol, price) in fresh {
        let sample = tracked.entry(symbol);
        match (sample.prev_price, sample.last_price) {
            // Первое наблюдение: оценивать ещё рано
            (None, _) => sample.prev_price = Some(*price),
            // Второе наблюдение: окно заполнено
            (Some(_), None) => sample.last_price = Some(*price),
            // Сдвиг окна
            (Some(_), Some(last)) => {
                sample.prev_price = Some(last);
                sample.last_price = Some(*price);
            }
        }
    }
}

/// Монета, пересёкшая порог за цикл
#[derive(Debug, Clone, PartialEq)]
pub struct Crossing {
    pub symbol: String,
    pub percent_change: f64,
    pub last_price: f64,
}

/// Отбирает монеты, у которых |изменение| достигло порога
///
/// Участвуют только монеты с обоими заполненными значениями окна;
/// равенство порогу включается. Порядок результата — порядок отслеживания.
pub fn evaluate(tracked: &TrackedPrices, threshold_percent: u32) -> Vec<Crossing> {
    let mut crossings = Vec::new();

    for (symbol, sample) in tracked.iter() {
        let (Some(prev_price), Some(last_price)) = (sample.prev_price, sample.last_price) else {
            continue;
        };

        let percent_change = last_price * 100.0 / prev_price - 100.0;
        if percent_change.abs() >= f64::from(threshold_percent) {
            crossings.push(Crossing {
                symbol: symbol.to_string(),
                percent_change,
                last_price,
            });
        }
    }

    crossings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh(pairs: &[(&str, f64)]) -> Vec<(String, f64)> {
        pairs
            .iter()
            .map(|(symbol, price)| (symbol.to_string(), *price))
            .collect()
    }

    #[test]
    fn first_update_only_sets_prev() {
        let mut tracked = TrackedPrices::default();
        update_prices(&mut tracked, &fresh(&[("BTC", 100.0)]));

        let sample = tracked.get("BTC").unwrap();
        assert_eq!(sample.prev_price, Some(100.0));
        assert_eq!(sample.last_price, None);
    }

    #[test]
    fn second_update_fills_the_window() {
        let mut tracked = TrackedPrices::default();
        update_prices(&mut tracked, &fresh(&[("BTC", 100.0)]));
        update_prices(&mut tracked, &fresh(&[("BTC", 105.0)]));

        let sample = tracked.get("BTC").unwrap();
        assert_eq!(sample.prev_price, Some(100.0));
        assert_eq!(sample.last_price, Some(105.0));
    }

    #[test]
    fn later_updates_shift_the_window() {
        let mut tracked = TrackedPrices::default();
        update_prices(&mut tracked, &fresh(&[("BTC", 100.0)]));
        update_prices(&mut tracked, &fresh(&[("BTC", 105.0)]));
        update_prices(&mut tracked, &fresh(&[("BTC", 110.0)]));

        let sample = tracked.get("BTC").unwrap();
        assert_eq!(sample.prev_price, Some(105.0));
        assert_eq!(sample.last_price, Some(110.0));
    }

    #[test]
    fn absent_coin_keeps_its_sample() {
        let mut tracked = TrackedPrices::default();
        update_prices(&mut tracked, &fresh(&[("BTC", 100.0), ("ETH", 10.0)]));
        update_prices(&mut tracked, &fresh(&[("BTC", 105.0)]));

        let sample = tracked.get("ETH").unwrap();
        assert_eq!(sample.prev_price, Some(10.0));
        assert_eq!(sample.last_price, None);
    }

    #[test]
    fn warming_up_coin_is_not_evaluated() {
        let mut tracked = TrackedPrices::default();
        update_prices(&mut tracked, &fresh(&[("BTC", 100.0)]));

        assert!(evaluate(&tracked, 1).is_empty());
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        let mut tracked = TrackedPrices::default();
        update_prices(&mut tracked, &fresh(&[("BTC", 100.0)]));
        update_prices(&mut tracked, &fresh(&[("BTC", 120.0)]));

        assert_eq!(evaluate(&tracked, 20).len(), 1);
        assert!(evaluate(&tracked, 21).is_empty());
    }

    #[test]
    fn percent_change_sign_follows_direction() {
        let mut tracked = TrackedPrices::default();
        update_prices(&mut tracked, &fresh(&[("UP", 100.0), ("DOWN", 100.0)]));
        update_prices(&mut tracked, &fresh(&[("UP", 120.0), ("DOWN", 80.0)]));

        let crossings = evaluate(&tracked, 20);
        assert_eq!(crossings.len(), 2);
        assert_eq!(crossings[0].percent_change, 20.0);
        assert_eq!(crossings[1].percent_change, -20.0);
    }

    #[test]
    fn crossings_follow_insertion_order() {
        let mut tracked = TrackedPrices::default();
        update_prices(&mut tracked, &fresh(&[("ZZZ", 100.0), ("AAA", 100.0)]));
        update_prices(&mut tracked, &fresh(&[("ZZZ", 200.0), ("AAA", 200.0)]));

        let crossings = evaluate(&tracked, 50);
        assert_eq!(crossings[0].symbol, "ZZZ");
        assert_eq!(crossings[1].symbol, "AAA");
    }

    #[test]
    fn subscription_default_threshold_catches_25_percent_pump() {
        let mut tracked = TrackedPrices::default();
        update_prices(&mut tracked, &fresh(&[("BTC", 100.0)]));
        update_prices(&mut tracked, &fresh(&[("BTC", 125.0)]));

        let crossings = evaluate(&tracked, 20);
        assert_eq!(crossings.len(), 1);
        assert_eq!(crossings[0].percent_change, 25.0);
        assert_eq!(crossings[0].last_price, 125.0);
    }

    #[test]
    fn subscription_default_threshold_ignores_10_percent_move() {
        let mut tracked = TrackedPrices::default();
        update_prices(&mut tracked, &fresh(&[("BTC", 100.0)]));
        update_prices(&mut tracked, &fresh(&[("BTC", 110.0)]));

        assert!(evaluate(&tracked, 20).is_empty());
    }
}
