#![no_main]
use chrono::{Days, NaiveDate};
use libfuzzer_sys::fuzz_target;
use rust_decimal::Decimal;

use staylite::domain::availability::{AvailabilityStatus, DateAvailability};
use staylite::domain::pricing::compute_breakdown;

fuzz_target!(|data: &[u8]| {
    if data.len() < 6 {
        return;
    }
    let Some(check_in) = NaiveDate::from_ymd_opt(2030, 1, 1)
        .and_then(|d| d.checked_add_days(Days::new(u64::from(data[0]))))
    else {
        return;
    };
    let check_out = check_in + Days::new(u64::from(data[1] % 60));
    let base = Decimal::new(i64::from(u16::from_le_bytes([data[2], data[3]])), 2);
    let cleaning = Decimal::new(i64::from(data[4]), 0);

    let records: Vec<DateAvailability> = data[5..]
        .chunks(3)
        .filter(|c| c.len() == 3)
        .map(|c| {
            let status = match c[1] % 3 {
                0 => AvailabilityStatus::Open,
                1 => AvailabilityStatus::Blocked,
                _ => AvailabilityStatus::Booked,
            };
            DateAvailability {
                date: check_in + Days::new(u64::from(c[0] % 64)),
                status,
                price_override: (c[2] > 0).then(|| Decimal::from(c[2])),
            }
        })
        .collect();

    if let Ok(b) = compute_breakdown(base, cleaning, check_in, check_out, &records) {
        assert_eq!(b.total, b.subtotal + b.cleaning_fee + b.service_fee + b.taxes);
    }
});
