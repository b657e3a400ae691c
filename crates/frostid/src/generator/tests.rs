use std::{
    collections::{HashSet, VecDeque},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    thread::scope,
};

use chrono::Utc;

use crate::{
    BitLayout, Components, Config, Error, IdentifierEncoder, MillisecondTimestamp, Poll,
    SequenceCounter, SharedSnowflake, Snowflake, TimeUnit, TimestampSource,
};

/// Microseconds in a Julian year.
const YEAR_MICROS: i64 = 31_557_600_000_000;

struct FixedTime(i64);

impl TimestampSource for FixedTime {
    fn timestamp(&mut self) -> i64 {
        self.0
    }
}

/// Replays `values`, then repeats the last one forever.
struct ScriptedTime {
    values: VecDeque<i64>,
    last: i64,
}

impl ScriptedTime {
    fn new(values: impl IntoIterator<Item = i64>) -> Self {
        Self {
            values: values.into_iter().collect(),
            last: 0,
        }
    }
}

impl TimestampSource for ScriptedTime {
    fn timestamp(&mut self) -> i64 {
        if let Some(next) = self.values.pop_front() {
            self.last = next;
        }
        self.last
    }
}

/// Reports every bucket below `free_from` as exhausted.
struct SaturatedBelow {
    free_from: i64,
    calls: Arc<AtomicUsize>,
}

impl SequenceCounter for SaturatedBelow {
    fn sequence(&mut self, current_time: i64) -> crate::Result<i64> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(if current_time < self.free_from { 8 } else { 0 })
    }
}

trait PollExt {
    fn unwrap_ready(self) -> i64;
    fn unwrap_pending(self) -> i64;
}

impl PollExt for Poll {
    fn unwrap_ready(self) -> i64 {
        match self {
            Self::Ready { id } => id,
            Self::Pending { bucket } => panic!("unexpected pending (bucket: {bucket})"),
        }
    }

    fn unwrap_pending(self) -> i64 {
        match self {
            Self::Ready { id } => panic!("unexpected ready ({id})"),
            Self::Pending { bucket } => bucket,
        }
    }
}

fn zero_epoch() -> Config {
    Config::from_epoch(0, 1, 1).unwrap()
}

#[test]
fn sequential_ids_increase() {
    let mut generator = Snowflake::default();
    let ids: Vec<i64> = (0..100).map(|_| generator.generate(None).unwrap()).collect();

    for pair in ids.windows(2) {
        assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
    }
    assert_eq!(ids.iter().collect::<HashSet<_>>().len(), ids.len());
}

#[test]
fn string_ids_match_numeric_ids() {
    let mut generator = Snowflake::default().with_timestamp_source(FixedTime(1_700_000_000_000_000));
    let id = generator.id(None).unwrap();
    assert!(id.chars().all(|c| c.is_ascii_digit()));

    let raw: i64 = id.parse().unwrap();
    assert_eq!(generator.parse(raw).unwrap(), generator.parse(id.as_str()).unwrap());
}

#[test]
fn sequence_increments_within_same_bucket() {
    let mut generator = Snowflake::new(zero_epoch()).with_timestamp_source(FixedTime(42));

    for expected in 0..=7 {
        let id = generator.try_poll_id(None).unwrap().unwrap_ready();
        let parsed = generator.parse(id).unwrap();
        assert_eq!(parsed.timestamp, 42);
        assert_eq!(parsed.sequence, expected);
    }
    assert_eq!(generator.try_poll_id(None).unwrap().unwrap_pending(), 42);
}

#[test]
fn configured_ids_round_trip() {
    let mut generator = Snowflake::default();
    generator.configure("2024-01-01 00:00:00", 2, 3).unwrap();

    let before = Utc::now().timestamp();
    let id = generator.id(None).unwrap();
    let after = Utc::now().timestamp();

    let parsed = generator.parse(id.as_str()).unwrap();
    assert_eq!(parsed.worker, 3);
    assert_eq!(parsed.cluster, 2);
    assert_eq!(parsed.epoch, 1_704_067_200_000_000);
    assert!((before - 1..=after + 1).contains(&parsed.datetime.timestamp()));
}

#[test]
fn failed_configure_keeps_previous_settings() {
    let mut generator = Snowflake::default();
    generator.configure("2024-01-01", 2, 3).unwrap();

    assert!(matches!(
        generator.configure("yesterday", 4, 4),
        Err(Error::Configuration(_))
    ));
    assert!(matches!(
        generator.configure("2024-01-01", 40, 4),
        Err(Error::Configuration(_))
    ));
    assert_eq!(generator.config().cluster(), 2);
    assert_eq!(generator.config().worker(), 3);
}

#[test]
fn exhausted_bucket_retries_with_fresh_timestamp() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut generator = Snowflake::new(zero_epoch())
        .with_timestamp_source(ScriptedTime::new([100, 100, 100, 101]))
        .with_sequence_counter(SaturatedBelow {
            free_from: 101,
            calls: Arc::clone(&calls),
        });

    let mut pending = Vec::new();
    let id = generator
        .try_next_id(None, |bucket| pending.push(bucket))
        .unwrap();

    assert_eq!(pending, vec![100, 100, 100]);
    assert_eq!(calls.load(Ordering::Relaxed), 4);
    let parsed = generator.parse(id).unwrap();
    assert_eq!(parsed.timestamp, 101);
    assert_eq!(parsed.sequence, 0);
}

#[test]
fn generate_sleeps_through_exhaustion() {
    let mut generator = Snowflake::new(zero_epoch())
        .with_timestamp_source(ScriptedTime::new([7, 7, 8]))
        .with_sequence_counter(SaturatedBelow {
            free_from: 8,
            calls: Arc::default(),
        });

    let id = generator.generate(None).unwrap();
    assert_eq!(generator.parse(id).unwrap().timestamp, 8);
}

#[cfg(feature = "file")]
#[test]
fn file_counter_reproduces_known_ids() {
    let dir = tempfile::tempdir().unwrap();
    let store = crate::FileSequence::new(dir.path().join("sequence.json"));

    let same_bucket = std::iter::repeat_n(1_738_450_629_796_380_011, 8);
    let mut generator = Snowflake::default()
        .with_sequence_counter(store)
        .with_timestamp_source(ScriptedTime::new(
            same_bucket.chain([1_738_450_629_796_380_012]),
        ));

    for expected in 5_740_539_453_880_754_441..=5_740_539_453_880_754_447 {
        assert_eq!(generator.try_poll_id(None).unwrap().unwrap_ready(), expected);
    }
    assert_eq!(
        generator.try_poll_id(None).unwrap().unwrap_pending(),
        1_738_450_629_796_380_011
    );
    assert_eq!(
        generator.try_poll_id(None).unwrap().unwrap_ready(),
        5_740_539_453_880_762_633
    );
}

#[test]
fn ids_turn_negative_after_timestamp_field_fills() {
    let epoch = Config::default().epoch();

    let mut young = Snowflake::default().with_timestamp_source(FixedTime(epoch + 35 * YEAR_MICROS));
    let id = young.generate(None).unwrap();
    assert!(id > 0);
    assert_eq!(id.to_string().len(), 19);

    let mut old = Snowflake::default().with_timestamp_source(FixedTime(epoch + 36 * YEAR_MICROS));
    let id = old.generate(None).unwrap();
    assert!(id < 0);

    let parsed = old.parse(id).unwrap();
    assert_eq!(parsed.timestamp, 36 * YEAR_MICROS);
    assert_eq!((parsed.cluster, parsed.worker), (1, 1));
}

#[test]
fn group_reaches_custom_encoder() {
    let seen: Arc<std::sync::Mutex<Vec<Option<String>>>> = Arc::default();
    let log = Arc::clone(&seen);
    let encoder = move |layout: &BitLayout, parts: Components, group: Option<&str>| -> i64 {
        log.lock().unwrap().push(group.map(str::to_owned));
        layout.pack(parts) ^ 1
    };

    let mut generator = Snowflake::new(zero_epoch()).with_timestamp_source(FixedTime(10));
    generator.set_identifier_encoder(Some(Box::new(encoder)));

    let custom = generator.generate(Some("orders")).unwrap();
    generator.generate(None).unwrap();
    assert_eq!(
        *seen.lock().unwrap(),
        vec![Some("orders".to_owned()), None]
    );
    assert_eq!(custom & 1, 1);

    generator.set_identifier_encoder(None);
    let plain = generator.generate(Some("orders")).unwrap();
    assert_eq!(seen.lock().unwrap().len(), 2);
    assert_eq!(generator.parse(plain).unwrap().sequence, 2);
}

#[test]
fn resetting_roles_restores_defaults() {
    let mut generator = Snowflake::default()
        .with_timestamp_source(FixedTime(0))
        .with_sequence_counter(|_: i64| -> i64 { 3 });
    let id = generator.generate(None).unwrap();
    assert_eq!(generator.parse(id).unwrap().sequence, 3);

    generator.set_timestamp_source(None);
    generator.set_sequence_counter(None);
    let id = generator.generate(None).unwrap();
    let parsed = generator.parse(id).unwrap();
    assert_eq!(parsed.sequence, 0);
    assert!((parsed.datetime.timestamp() - Utc::now().timestamp()).abs() <= 1);
}

#[test]
fn custom_layout_widths() {
    let layout = BitLayout::new(41, 5, 5, 12).unwrap();
    let config = zero_epoch().with_layout(layout).unwrap();
    let mut generator = Snowflake::new(config).with_timestamp_source(FixedTime(5));

    for _ in 0..4_096 {
        generator.try_poll_id(None).unwrap().unwrap_ready();
    }
    assert_eq!(generator.try_poll_id(None).unwrap().unwrap_pending(), 5);
}

#[test]
fn encoder_trait_objects_are_interchangeable() {
    struct Constant;
    impl IdentifierEncoder for Constant {
        fn identifier(&self, _: &BitLayout, _: Components, _: Option<&str>) -> i64 {
            99
        }
    }

    let mut generator = Snowflake::default().with_identifier_encoder(Constant);
    assert_eq!(generator.id(None).unwrap(), "99");
}

#[test]
fn shared_generator_is_unique_across_threads() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 1_000;

    let generator = SharedSnowflake::default();
    let ids: Vec<i64> = scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let generator = generator.clone();
                s.spawn(move || {
                    (0..PER_THREAD)
                        .map(|_| generator.generate(None).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });

    assert_eq!(ids.len(), THREADS * PER_THREAD);
    assert_eq!(ids.into_iter().collect::<HashSet<_>>().len(), THREADS * PER_THREAD);
}

#[test]
fn shared_generator_forwards_configuration() {
    let generator = SharedSnowflake::default();
    generator.configure("2023-06-01", 9, 10).unwrap();
    assert_eq!(generator.config().unwrap().cluster(), 9);

    let parsed = generator.parse(generator.id(None).unwrap()).unwrap();
    assert_eq!((parsed.cluster, parsed.worker), (9, 10));

    generator.set_config(Config::default()).unwrap();
    assert_eq!(generator.config().unwrap(), Config::default());
}

#[test]
fn rejects_malformed_ids() {
    let generator = Snowflake::default();
    assert!(matches!(generator.parse("12ab"), Err(Error::InvalidId(_))));
    assert!(matches!(generator.parse(""), Err(Error::InvalidId(_))));
    assert!(matches!(
        generator.parse("99999999999999999999"),
        Err(Error::InvalidId(_))
    ));
}

#[test]
fn negative_sequence_is_an_error() {
    let mut generator = Snowflake::new(zero_epoch())
        .with_timestamp_source(FixedTime(10))
        .with_sequence_counter(|_: i64| -> i64 { i64::MIN });

    assert!(matches!(
        generator.try_poll_id(None),
        Err(Error::InvalidSequence(i64::MIN))
    ));
    assert!(matches!(generator.generate(None), Err(Error::InvalidSequence(_))));
}

#[test]
fn millisecond_ids_round_trip() {
    let config = Config::default().with_unit(TimeUnit::Milliseconds);
    assert_eq!(config.epoch(), 1_612_224_000_000);

    let mut generator = Snowflake::new(config).with_timestamp_source(MillisecondTimestamp);
    let before = Utc::now().timestamp();
    let id = generator.generate(None).unwrap();
    let after = Utc::now().timestamp();

    let parsed = generator.parse(id).unwrap();
    assert_eq!(parsed.epoch, 1_612_224_000_000);
    assert!((before - 1..=after + 1).contains(&parsed.datetime.timestamp()));

    generator.configure("2024-01-01", 2, 3).unwrap();
    assert_eq!(generator.config().unit(), TimeUnit::Milliseconds);
    assert_eq!(generator.config().epoch(), 1_704_067_200_000);
    // Same bits, later epoch.
    let shifted = generator.parse(id).unwrap();
    assert!(shifted.datetime.timestamp() > after);
}
