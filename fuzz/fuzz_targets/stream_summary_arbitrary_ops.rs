#![no_main]

use freqkit::counter::StreamSummary;
use freqkit::traits::Counter;
use libfuzzer_sys::fuzz_target;

// Drives a small-capacity StreamSummary with an arbitrary byte-derived
// stream of unit and weighted appends (plus the occasional clear), and
// revalidates every structural invariant after each operation.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let capacity = usize::from(data[0] % 8) + 1;
    let mut summary: StreamSummary<u8, u32> = match StreamSummary::new(capacity) {
        Ok(summary) => summary,
        Err(_) => return,
    };

    for chunk in data[1..].chunks(2) {
        let key = chunk[0];
        let op = chunk.get(1).copied().unwrap_or(0);

        match op % 8 {
            0..=4 => summary.append(key),
            5 => summary.append_weighted(key, u32::from(op)),
            6 => {
                let _ = summary.count_of(&key);
                let _ = summary.top();
            }
            7 => {
                if key == 0 {
                    summary.clear();
                } else {
                    summary.append_weighted(key, 0);
                }
            }
            _ => unreachable!(),
        }

        summary.debug_validate_invariants();
        assert!(summary.len() <= capacity);
    }

    // The ranked view must be non-increasing and cover every tracked key.
    let counts: Vec<u32> = summary.iter().map(|(_, count, _)| count).collect();
    assert_eq!(counts.len(), summary.len());
    assert!(counts.windows(2).all(|w| w[0] >= w[1]));
});
