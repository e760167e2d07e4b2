use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::adapters::cache::memory_cache::MemoryFeedCache;
use crate::adapters::feed::sync::FeedSync;
use crate::adapters::store::memory::{
    InMemoryOverrideStore, InMemoryPropertyStore, InMemoryReservationStore,
};
use crate::config::types::SyncConfig;
use crate::domain::date::DayKey;
use crate::domain::property::Property;
use crate::error::Result;
use crate::ports::feed_transport::FeedTransport;
use crate::ports::stores::{OverrideStore, PropertyStore, ReservationStore};
use crate::service::availability::AvailabilityService;
use crate::service::booking::BookingService;

type FetchFn = Box<dyn Fn(&str) -> Result<String> + Send + Sync>;

/// Scriptable transport double with a call counter, for cache and
/// degradation tests.
pub struct MockFeedTransport {
    fetch_fn: Mutex<FetchFn>,
    calls: AtomicUsize,
}

impl Default for MockFeedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFeedTransport {
    pub fn new() -> Self {
        Self {
            fetch_fn: Mutex::new(Box::new(|_| Ok(empty_feed()))),
            calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn with_fetch(self, f: impl Fn(&str) -> Result<String> + Send + Sync + 'static) -> Self {
        *self.fetch_fn.lock().unwrap() = Box::new(f);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedTransport for MockFeedTransport {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let f = self.fetch_fn.lock().unwrap();
        f(url)
    }
}

/// Fully wired in-memory service graph for unit tests.
pub struct TestWorld {
    pub properties: Arc<InMemoryPropertyStore>,
    pub reservations: Arc<InMemoryReservationStore>,
    pub overrides: Arc<InMemoryOverrideStore>,
    pub transport: Arc<MockFeedTransport>,
    pub feeds: Arc<FeedSync>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    pub fn new() -> Self {
        Self::with_transport(MockFeedTransport::new())
    }

    pub fn with_transport(transport: MockFeedTransport) -> Self {
        let transport = Arc::new(transport);
        let dyn_transport: Arc<dyn FeedTransport> = Arc::clone(&transport) as _;
        let feeds = Arc::new(FeedSync::new(
            dyn_transport,
            Arc::new(MemoryFeedCache::new(100)),
            &SyncConfig::default(),
        ));
        Self {
            properties: Arc::new(InMemoryPropertyStore::new()),
            reservations: Arc::new(InMemoryReservationStore::new()),
            overrides: Arc::new(InMemoryOverrideStore::new()),
            transport,
            feeds,
        }
    }

    pub fn availability(&self) -> AvailabilityService {
        let properties: Arc<dyn PropertyStore> = Arc::clone(&self.properties) as _;
        let reservations: Arc<dyn ReservationStore> = Arc::clone(&self.reservations) as _;
        let overrides: Arc<dyn OverrideStore> = Arc::clone(&self.overrides) as _;
        AvailabilityService::new(properties, reservations, overrides, Arc::clone(&self.feeds))
    }

    pub fn booking(&self) -> BookingService {
        let properties: Arc<dyn PropertyStore> = Arc::clone(&self.properties) as _;
        let reservations: Arc<dyn ReservationStore> = Arc::clone(&self.reservations) as _;
        BookingService::new(properties, reservations, self.availability())
    }
}

// --- Factory functions ---

pub fn day(s: &str) -> DayKey {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn make_property(id: &str) -> Property {
    Property {
        id: id.to_string(),
        base_price: 10000,
        monthly_multipliers: [1.0; 12],
        cleaning_fee: 0,
        base_guests: 2,
        max_guests: 4,
        extra_guest_fee: 0,
        feed_urls: vec![],
    }
}

pub fn empty_feed() -> String {
    "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//test//EN\r\nEND:VCALENDAR\r\n".to_string()
}

/// A syntactically complete feed body with one `DTSTART`/`DTEND` event per
/// pair, markers in `YYYYMMDD` form.
pub fn feed_with_events(events: &[(&str, &str)]) -> String {
    let mut body = String::from("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//test//EN\r\n");
    for (i, (start, end)) in events.iter().enumerate() {
        body.push_str(&format!(
            "BEGIN:VEVENT\r\nUID:evt-{i}\r\nSUMMARY:Reserved\r\nDTSTART;VALUE=DATE:{start}\r\nDTEND;VALUE=DATE:{end}\r\nEND:VEVENT\r\n"
        ));
    }
    body.push_str("END:VCALENDAR\r\n");
    body
}
