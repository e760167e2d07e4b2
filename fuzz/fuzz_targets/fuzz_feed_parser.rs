#![no_main]
use chrono::NaiveDate;
use libfuzzer_sys::fuzz_target;
use staysync::adapters::feed::parser::{EndDateConvention, parse_feed};

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        let from = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2031, 1, 1).unwrap();
        let _ = parse_feed(raw, from, to, EndDateConvention::ExclusiveEnd);
        let _ = parse_feed(raw, from, to, EndDateConvention::InclusiveEnd);
    }
});
