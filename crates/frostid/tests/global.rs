//! The process-wide generator is shared state, so everything that touches it
//! lives in one test.

mod common;

use frostid::{BitLayout, Components, Error};

#[test]
fn global_generator_lifecycle() {
    common::init_tracing();

    let first = frostid::generate(None).unwrap();
    let parsed = frostid::parse(first).unwrap();
    assert_eq!((parsed.cluster, parsed.worker), (1, 1));
    assert_eq!(parsed.epoch, 1_612_224_000_000_000);

    frostid::configure("2024-01-01 00:00:00", 2, 3).unwrap();
    let id = frostid::id(None).unwrap();
    let parsed = frostid::parse(id.as_str()).unwrap();
    assert_eq!((parsed.cluster, parsed.worker), (2, 3));
    assert_eq!(parsed.epoch, 1_704_067_200_000_000);

    assert!(matches!(
        frostid::configure("2024-01-01", 99, 3),
        Err(Error::Configuration(_))
    ));
    assert_eq!(frostid::global().config().unwrap().cluster(), 2);

    frostid::set_timestamp_source(Some(Box::new(|| -> i64 { 1_704_067_200_000_000 + 500 })))
        .unwrap();
    frostid::set_sequence_counter(Some(Box::new(|_: i64| -> i64 { 4 }))).unwrap();
    let parsed = frostid::parse(frostid::generate(None).unwrap()).unwrap();
    assert_eq!(parsed.timestamp, 500);
    assert_eq!(parsed.sequence, 4);
    assert_eq!(parsed.datetime_string(), "2024-01-01 00:00:00");

    frostid::set_identifier_encoder(Some(Box::new(
        |_: &BitLayout, parts: Components, group: Option<&str>| -> i64 {
            if group == Some("negated") { -parts.sequence } else { parts.sequence }
        },
    )))
    .unwrap();
    assert_eq!(frostid::id(Some("negated")).unwrap(), "-4");
    assert_eq!(frostid::id(None).unwrap(), "4");

    frostid::reset().unwrap();
    let parsed = frostid::parse(frostid::id(None).unwrap()).unwrap();
    assert_eq!((parsed.cluster, parsed.worker), (1, 1));
    assert!(parsed.datetime.timestamp() > 1_704_067_200);

    let ids: Vec<i64> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| (0..250).map(|_| frostid::generate(None).unwrap()).collect::<Vec<_>>()))
            .collect();
        handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
    });
    let unique: std::collections::HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), 1_000);
}
