//! Política de retry do orquestrador: staircase backoff e deadline de 48h.

use chrono::{DateTime, Duration as ChronoDuration, Utc};

pub const MAX_RETRIES: u32 = 5;
const DEADLINE_HOURS: i64 = 48;

/// Staircase {1m, 5m, 15m, 1h, 6h, 24h}; a partir do sexto retry o intervalo
/// satura em 24h em vez de crescer sem limite.
pub fn backoff(retry_count: u32) -> ChronoDuration {
    const STEPS_MINUTES: [i64; 6] = [1, 5, 15, 60, 360, 1440];
    let idx = (retry_count as usize).min(STEPS_MINUTES.len() - 1);
    ChronoDuration::minutes(STEPS_MINUTES[idx])
}

pub fn next_retry_at(now: DateTime<Utc>, retry_count: u32) -> DateTime<Utc> {
    now + backoff(retry_count)
}

/// Uma requisição mais velha que 48h nunca é retentada (prazo de negócio da SEFAZ).
pub fn deadline_exceeded(created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - created_at > ChronoDuration::hours(DEADLINE_HOURS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn backoff_segue_a_escada_e_satura() {
        assert_eq!(backoff(0), ChronoDuration::minutes(1));
        assert_eq!(backoff(1), ChronoDuration::minutes(5));
        assert_eq!(backoff(2), ChronoDuration::minutes(15));
        assert_eq!(backoff(3), ChronoDuration::minutes(60));
        assert_eq!(backoff(5), ChronoDuration::minutes(1440));
        assert_eq!(backoff(99), ChronoDuration::minutes(1440));
    }

    #[test]
    fn deadline_de_48h_e_respeitado() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(!deadline_exceeded(created, created + ChronoDuration::hours(47)));
        assert!(deadline_exceeded(created, created + ChronoDuration::hours(49)));
    }

    #[test]
    fn nao_excede_max_retries_apos_o_limite() {
        assert_eq!(MAX_RETRIES, 5);
    }
}
