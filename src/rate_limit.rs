use std::time::{Duration, Instant};

use axum::http::HeaderMap;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

// Fallback key when no forwarded address is present
pub const UNKNOWN_CLIENT: &str = "unknown-ip";

// Throttle entry - last accepted request per client key
pub struct ThrottleEntry {
    pub last_accepted: Instant,
}

pub enum Admission {
    Allow,
    Deny { retry_after_secs: u64 },
}

// Client identity for rate limiting, derived from the forwarded-address
// header. Only ever used as a map key.
pub fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

// Cooldown check. Allowing overwrites the stored timestamp immediately;
// a failure later in the pipeline does not refund the cooldown. Denial
// leaves the stored timestamp untouched. The entry API keeps the
// read-modify-write atomic per key under concurrent requests.
pub fn admit(
    throttle: &DashMap<String, ThrottleEntry>,
    cooldown: Duration,
    key: &str,
    now: Instant,
) -> Admission {
    match throttle.entry(key.to_string()) {
        Entry::Occupied(mut entry) => {
            let elapsed = now.duration_since(entry.get().last_accepted);
            if elapsed < cooldown {
                let remaining = cooldown - elapsed;
                Admission::Deny {
                    retry_after_secs: remaining.as_millis().div_ceil(1000) as u64,
                }
            } else {
                entry.get_mut().last_accepted = now;
                Admission::Allow
            }
        }
        Entry::Vacant(slot) => {
            slot.insert(ThrottleEntry { last_accepted: now });
            Admission::Allow
        }
    }
}

// Drops entries whose cooldown has fully elapsed so the map stays
// bounded over the process lifetime
pub fn sweep(throttle: &DashMap<String, ThrottleEntry>, cooldown: Duration, now: Instant) {
    throttle.retain(|_, entry| now.duration_since(entry.last_accepted) < cooldown);
}

#[cfg(test)]
mod tests {
    use super::*;

    const COOLDOWN: Duration = Duration::from_millis(5000);

    fn allow(admission: Admission) -> bool {
        matches!(admission, Admission::Allow)
    }

    #[test]
    fn first_request_is_admitted() {
        let map = DashMap::new();
        assert!(allow(admit(&map, COOLDOWN, "1.2.3.4", Instant::now())));
    }

    #[test]
    fn second_request_within_cooldown_is_denied() {
        let map = DashMap::new();
        let t0 = Instant::now();
        assert!(allow(admit(&map, COOLDOWN, "1.2.3.4", t0)));

        match admit(&map, COOLDOWN, "1.2.3.4", t0 + Duration::from_millis(2000)) {
            Admission::Deny { retry_after_secs } => assert_eq!(retry_after_secs, 3),
            Admission::Allow => panic!("expected denial inside the cooldown"),
        }
    }

    #[test]
    fn reported_wait_is_positive_and_bounded() {
        let map = DashMap::new();
        let t0 = Instant::now();
        admit(&map, COOLDOWN, "1.2.3.4", t0);

        match admit(&map, COOLDOWN, "1.2.3.4", t0 + Duration::from_millis(1)) {
            Admission::Deny { retry_after_secs } => {
                assert!(retry_after_secs > 0);
                assert!(retry_after_secs <= 5);
            }
            Admission::Allow => panic!("expected denial inside the cooldown"),
        }
    }

    #[test]
    fn request_at_cooldown_boundary_is_admitted() {
        let map = DashMap::new();
        let t0 = Instant::now();
        admit(&map, COOLDOWN, "1.2.3.4", t0);
        assert!(allow(admit(&map, COOLDOWN, "1.2.3.4", t0 + COOLDOWN)));
    }

    #[test]
    fn denial_does_not_extend_the_cooldown() {
        let map = DashMap::new();
        let t0 = Instant::now();
        admit(&map, COOLDOWN, "1.2.3.4", t0);
        admit(&map, COOLDOWN, "1.2.3.4", t0 + Duration::from_millis(4000));
        // measured from t0, not from the denied attempt
        assert!(allow(admit(&map, COOLDOWN, "1.2.3.4", t0 + COOLDOWN)));
    }

    #[test]
    fn distinct_clients_do_not_share_a_cooldown() {
        let map = DashMap::new();
        let t0 = Instant::now();
        admit(&map, COOLDOWN, "1.2.3.4", t0);
        assert!(allow(admit(&map, COOLDOWN, "5.6.7.8", t0)));
    }

    #[test]
    fn missing_forwarded_header_falls_back_to_sentinel() {
        let headers = HeaderMap::new();
        assert_eq!(client_key(&headers), UNKNOWN_CLIENT);
    }

    #[test]
    fn forwarded_header_is_used_verbatim() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.7".parse().unwrap());
        assert_eq!(client_key(&headers), "203.0.113.7");
    }

    #[test]
    fn sweep_drops_only_elapsed_entries() {
        let map = DashMap::new();
        let t0 = Instant::now();
        admit(&map, COOLDOWN, "stale", t0);
        admit(&map, COOLDOWN, "fresh", t0 + Duration::from_millis(4000));

        sweep(&map, COOLDOWN, t0 + Duration::from_millis(6000));

        assert!(!map.contains_key("stale"));
        assert!(map.contains_key("fresh"));
    }
}
